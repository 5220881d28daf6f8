use phf::phf_map;
use serde::{Deserialize, Serialize};

/// 难度枚举
///
/// 序列化为大写（`EASY` / `MEDIUM` / `HARD`），这是生成服务使用的格式；
/// 保存蓝图时使用小写，见 [`Difficulty::as_lower`]。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    /// 简单
    #[default]
    Easy,
    /// 中等
    Medium,
    /// 困难
    Hard,
}

/// 可接受的难度写法（已转为小写）
static DIFFICULTY_ALIASES: phf::Map<&'static str, Difficulty> = phf_map! {
    "easy" => Difficulty::Easy,
    "e" => Difficulty::Easy,
    "simple" => Difficulty::Easy,
    "简单" => Difficulty::Easy,
    "medium" => Difficulty::Medium,
    "med" => Difficulty::Medium,
    "m" => Difficulty::Medium,
    "moderate" => Difficulty::Medium,
    "中等" => Difficulty::Medium,
    "hard" => Difficulty::Hard,
    "h" => Difficulty::Hard,
    "difficult" => Difficulty::Hard,
    "困难" => Difficulty::Hard,
};

impl Difficulty {
    /// MCQ 的派生顺序
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// 大写名称（生成服务格式）
    pub fn as_upper(self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }

    /// 小写名称（蓝图保存格式）
    pub fn as_lower(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// 尝试从字符串解析难度（忽略大小写和首尾空白）
    pub fn parse(s: &str) -> Option<Self> {
        DIFFICULTY_ALIASES.get(s.trim().to_lowercase().as_str()).copied()
    }

    /// 宽松解析：无法识别时回退为 `Easy`
    pub fn parse_lenient(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }
}

/// serde 反序列化：接受任意大小写和别名，无法识别时回退为 `Easy`
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Difficulty, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(Difficulty::parse_lenient).unwrap_or_default())
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_upper())
    }
}
