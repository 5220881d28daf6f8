use crate::models::difficulty::{self, Difficulty};
use crate::models::question::QuestionType;
use crate::utils::lenient::deserialize_count;
use serde::{Deserialize, Serialize};

/// 已生成试卷中的一道题
///
/// `id` 由生成 / 存储服务分配，是跨操作定位题目的唯一依据。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub question_text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default, deserialize_with = "difficulty::deserialize_lenient")]
    pub difficulty: Difficulty,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub marks: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// 试卷分区（如 "A"、"B"，也可以是自定义名称）
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Section {
    pub fn new(name: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            name: name.into(),
            questions,
        }
    }

    /// 默认分区名：0 → "A"，1 → "B"，超过 26 个之后使用 "Section 27" 这种形式
    pub fn default_name(index: usize) -> String {
        match u8::try_from(index) {
            Ok(i) if i < 26 => char::from(b'A' + i).to_string(),
            _ => format!("Section {}", index + 1),
        }
    }

    pub fn position_of(&self, question_id: &str) -> Option<usize> {
        self.questions.iter().position(|q| q.id == question_id)
    }

    pub fn total_marks(&self) -> u64 {
        self.questions.iter().map(|q| u64::from(q.marks)).sum()
    }
}

/// 分区保存请求：`{ id: docId, sections }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionsPayload {
    pub id: String,
    pub sections: Vec<Section>,
}

/// 删除题目请求：`{ questionId, questionPaperId }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteQuestionPayload {
    pub question_id: String,
    pub question_paper_id: String,
}
