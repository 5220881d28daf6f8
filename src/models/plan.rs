use crate::models::metadata::ExamMetadata;
use crate::utils::lenient::{deserialize_count, deserialize_text};
use serde::{Deserialize, Serialize};

/// 方案文件中的主观题组
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDescriptive {
    #[serde(default, deserialize_with = "deserialize_count")]
    pub marks: u32,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub difficulty: String,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub question_count: u32,
}

/// 方案文件中的知识点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanTopic {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub easy_mcqs: u32,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub medium_mcqs: u32,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub hard_mcqs: u32,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub mcq_marks: u32,
    #[serde(default)]
    pub descriptive: Vec<PlanDescriptive>,
}

/// 方案动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanAction {
    /// 提交生成服务
    #[default]
    Generate,
    /// 只保存蓝图
    SaveBlueprint,
}

/// 试卷方案（TOML 文件）
///
/// 设置 `blueprint_id` 时先加载已保存的蓝图，整体替换 `topics`。
///
/// ```toml
/// action = "generate"
///
/// [exam]
/// title = "Unit Test 1"
/// standardGrade = 10
/// subject = "Mathematics"
/// totalMarks = 8
/// timeDuration = "1 hour"
///
/// [[topics]]
/// name = "Algebra"
/// easy_mcqs = 2
/// medium_mcqs = 1
/// mcq_marks = 1
///
/// [[topics.descriptive]]
/// marks = 5
/// difficulty = "medium"
/// question_count = 1
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamPlan {
    #[serde(default)]
    pub action: PlanAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blueprint_id: Option<String>,
    #[serde(default)]
    pub exam: ExamMetadata,
    #[serde(default)]
    pub topics: Vec<PlanTopic>,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl ExamPlan {
    /// 用于日志显示的名称
    pub fn display_name(&self) -> &str {
        if self.exam.title.trim().is_empty() {
            self.file_path.as_deref().unwrap_or("未命名方案")
        } else {
            &self.exam.title
        }
    }

    /// 非空的蓝图ID
    pub fn blueprint_id(&self) -> Option<&str> {
        self.blueprint_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    pub fn with_file_path(mut self, file_path: String) -> Self {
        self.file_path = Some(file_path);
        self
    }
}
