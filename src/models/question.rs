use crate::models::difficulty::Difficulty;
use serde::{Deserialize, Serialize};

/// 题型
///
/// 派生和排序两处都对题型做穷尽匹配，新增题型时编译器会提示。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    /// 选择题
    #[serde(rename = "MCQ", alias = "mcq", alias = "Mcq")]
    Mcq,
    /// 主观题
    #[serde(rename = "Descriptive", alias = "descriptive", alias = "DESCRIPTIVE")]
    Descriptive,
}

impl QuestionType {
    pub fn name(self) -> &'static str {
        match self {
            QuestionType::Mcq => "MCQ",
            QuestionType::Descriptive => "Descriptive",
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 派生出的单个出题请求
///
/// 值类型，没有身份；三条相同的请求代表三个独立的题位。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionRequest {
    pub topic: String,
    pub difficulty: Difficulty,
    pub marks: u32,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
}

impl QuestionRequest {
    pub fn mcq(topic: impl Into<String>, difficulty: Difficulty, marks: u32) -> Self {
        Self {
            topic: topic.into(),
            difficulty,
            marks,
            question_type: QuestionType::Mcq,
        }
    }

    pub fn descriptive(topic: impl Into<String>, difficulty: Difficulty, marks: u32) -> Self {
        Self {
            topic: topic.into(),
            difficulty,
            marks,
            question_type: QuestionType::Descriptive,
        }
    }
}

impl std::fmt::Display for QuestionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.question_type, self.difficulty, self.marks, self.topic
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_request_json_shape() {
        let request = QuestionRequest::mcq("Algebra", Difficulty::Easy, 1);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "topic": "Algebra",
                "difficulty": "EASY",
                "marks": 1,
                "type": "MCQ"
            })
        );

        let request = QuestionRequest::descriptive("Algebra", Difficulty::Medium, 5);
        assert_eq!(request.to_string(), "Descriptive/MEDIUM/5/Algebra");
    }
}
