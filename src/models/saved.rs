//! 蓝图保存格式
//!
//! 与后端约定的 JSON 结构。加载时所有数值字段都走宽松解析：
//! 负数、字符串、小数、null 都会被规整，而不是让整个加载失败。

use crate::utils::lenient::{deserialize_count, deserialize_text};
use serde::{Deserialize, Serialize};

/// 主观题组的保存格式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptiveQuestionConfig {
    #[serde(default, deserialize_with = "deserialize_count")]
    pub marks: u32,
    /// 小写难度（easy / medium / hard）
    #[serde(default, deserialize_with = "deserialize_text")]
    pub difficulty: String,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub no_of_questions: u32,
}

/// 单个知识点的保存格式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub topic: String,
    #[serde(rename = "easyMCQs", default, deserialize_with = "deserialize_count")]
    pub easy_mcqs: u32,
    #[serde(rename = "mediumMCQs", default, deserialize_with = "deserialize_count")]
    pub medium_mcqs: u32,
    #[serde(rename = "hardMCQs", default, deserialize_with = "deserialize_count")]
    pub hard_mcqs: u32,
    #[serde(rename = "mcqMarks", default, deserialize_with = "deserialize_count")]
    pub mcq_marks: u32,
    #[serde(rename = "descriptiveQuestionConfig", default)]
    pub descriptive_question_config: Vec<DescriptiveQuestionConfig>,
}

/// 保存 / 更新蓝图请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBlueprintPayload {
    pub name: String,
    pub grade: u32,
    pub subject: String,
    pub total_marks: u32,
    pub breakdown: Vec<BreakdownEntry>,
}

/// 后端返回的已保存蓝图
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedBlueprint {
    #[serde(deserialize_with = "deserialize_text")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub grade: u32,
    #[serde(default)]
    pub subject: String,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub total_marks: u32,
    #[serde(default)]
    pub breakdown: Vec<BreakdownEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl SavedBlueprint {
    /// 最后修改时间（优先 updatedAt），无法解析时返回 None
    pub fn last_modified(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.updated_at
            .as_deref()
            .or(self.created_at.as_deref())
            .and_then(|ts| chrono::DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&chrono::Utc))
    }
}
