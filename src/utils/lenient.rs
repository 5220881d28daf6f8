//! 宽松数值解析
//!
//! 表单输入和已保存的蓝图里可能出现空串、非数字、负数、小数。
//! 这里统一把它们规整为非负整数，永远不报错：
//! - 取开头的整数部分（`"12abc"` → 12，`"2.7"` → 2）
//! - 无法解析 → 0
//! - 负数 → 0
//! - 超出范围 → `u32::MAX`

use regex::Regex;
use serde::de::{self, Visitor};
use serde::Deserializer;
use std::fmt;
use std::sync::LazyLock;

static LEADING_INT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?\d+").expect("leading integer pattern is valid")
});

/// 把任意文本规整为非负计数
pub fn coerce_count(raw: &str) -> u32 {
    let Some(m) = LEADING_INT.find(raw.trim()) else {
        return 0;
    };
    let digits = m.as_str();
    if digits.starts_with('-') {
        return 0;
    }
    let digits = digits.trim_start_matches('+');
    match digits.parse::<u64>() {
        Ok(value) => clamp_u64(value),
        // 数字串过长
        Err(_) => u32::MAX,
    }
}

fn clamp_u64(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn clamp_i64(value: i64) -> u32 {
    if value < 0 {
        0
    } else {
        clamp_u64(value as u64)
    }
}

fn clamp_f64(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        0
    } else if value >= u32::MAX as f64 {
        u32::MAX
    } else {
        value.trunc() as u32
    }
}

/// 可以宽松地转换为计数的输入
pub trait IntoCount {
    fn into_count(self) -> u32;
}

impl IntoCount for u32 {
    fn into_count(self) -> u32 {
        self
    }
}

impl IntoCount for u64 {
    fn into_count(self) -> u32 {
        clamp_u64(self)
    }
}

impl IntoCount for usize {
    fn into_count(self) -> u32 {
        clamp_u64(self as u64)
    }
}

impl IntoCount for i32 {
    fn into_count(self) -> u32 {
        clamp_i64(i64::from(self))
    }
}

impl IntoCount for i64 {
    fn into_count(self) -> u32 {
        clamp_i64(self)
    }
}

impl IntoCount for f64 {
    fn into_count(self) -> u32 {
        clamp_f64(self)
    }
}

impl IntoCount for &str {
    fn into_count(self) -> u32 {
        coerce_count(self)
    }
}

impl IntoCount for String {
    fn into_count(self) -> u32 {
        coerce_count(&self)
    }
}

impl IntoCount for &String {
    fn into_count(self) -> u32 {
        coerce_count(self)
    }
}

/// serde 反序列化：接受整数、小数、字符串、null，统一规整为 `u32`
pub fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    struct CountVisitor;

    impl<'de> Visitor<'de> for CountVisitor {
        type Value = u32;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number, numeric string or null")
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(clamp_u64(value))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(clamp_i64(value))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(clamp_f64(value))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(coerce_count(value))
        }

        fn visit_bool<E>(self, _value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(0)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(0)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(0)
        }
    }

    deserializer.deserialize_any(CountVisitor)
}

/// serde 反序列化：字符串原样保留，数字转为文本，null 视为空串
pub fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number or null")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(String::new())
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(TextVisitor)
}
