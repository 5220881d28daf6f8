//! 知识点配置仓库
//!
//! 每个修改操作只改一个字段，并返回该修改造成的分数变化量
//! （新贡献 − 旧贡献），调用方据此增量更新 `MarksAccumulator`，
//! 不需要每次按键都全量重算。

use crate::models::difficulty::Difficulty;
use crate::models::topic::{DescriptiveGroup, TopicConfig};
use crate::utils::lenient::{coerce_count, IntoCount};
use tracing::debug;

/// 分数变化量（可以为负）
pub type MarksDelta = i128;

/// 主观题组中可修改的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptiveField {
    Marks(u32),
    Difficulty(Difficulty),
    QuestionCount(u32),
}

impl DescriptiveField {
    /// 从表单字段名和原始输入构造，字段名无法识别时返回 None
    ///
    /// 数值字段走宽松解析，难度无法识别时回退为 easy。
    pub fn from_raw(field: &str, raw: &str) -> Option<Self> {
        match field.trim() {
            "marks" => Some(DescriptiveField::Marks(coerce_count(raw))),
            "difficulty" => Some(DescriptiveField::Difficulty(Difficulty::parse_lenient(raw))),
            "questionCount" | "question_count" | "noOfQuestions" => {
                Some(DescriptiveField::QuestionCount(coerce_count(raw)))
            }
            _ => None,
        }
    }
}

/// 对配置的一次修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicEdit {
    AddTopic(String),
    RemoveTopic(String),
    SetMcqCount {
        topic: String,
        difficulty: Difficulty,
        count: u32,
    },
    SetMcqMarks {
        topic: String,
        marks: u32,
    },
    AddDescriptiveGroup {
        topic: String,
    },
    UpdateDescriptiveGroup {
        topic: String,
        index: usize,
        field: DescriptiveField,
    },
    RemoveDescriptiveGroup {
        topic: String,
        index: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TopicEntry {
    name: String,
    config: TopicConfig,
}

/// 知识点配置仓库
///
/// 保持插入顺序，顺序决定了试卷的排版。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicConfigStore {
    entries: Vec<TopicEntry>,
}

impl TopicConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 唯一入口：应用一次修改并返回分数变化量
    pub fn apply(&mut self, edit: TopicEdit) -> MarksDelta {
        match edit {
            TopicEdit::AddTopic(name) => self.add_topic(&name),
            TopicEdit::RemoveTopic(name) => self.remove_topic(&name),
            TopicEdit::SetMcqCount {
                topic,
                difficulty,
                count,
            } => self.set_mcq_count(&topic, difficulty, count),
            TopicEdit::SetMcqMarks { topic, marks } => self.set_mcq_marks(&topic, marks),
            TopicEdit::AddDescriptiveGroup { topic } => self.add_descriptive_group(&topic),
            TopicEdit::UpdateDescriptiveGroup {
                topic,
                index,
                field,
            } => self.update_descriptive_group(&topic, index, field),
            TopicEdit::RemoveDescriptiveGroup { topic, index } => {
                self.remove_descriptive_group(&topic, index)
            }
        }
    }

    /// 添加知识点；名称为空或已存在时不做任何事
    pub fn add_topic(&mut self, name: &str) -> MarksDelta {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            debug!("忽略知识点添加: {:?}", name);
            return 0;
        }
        self.entries.push(TopicEntry {
            name: name.to_string(),
            config: TopicConfig::default(),
        });
        0
    }

    /// 删除知识点，返回其全部贡献的负值
    pub fn remove_topic(&mut self, name: &str) -> MarksDelta {
        match self.position(name) {
            Some(index) => -self.entries.remove(index).config.contribution(),
            None => 0,
        }
    }

    pub fn set_mcq_count(
        &mut self,
        topic: &str,
        difficulty: Difficulty,
        count: impl IntoCount,
    ) -> MarksDelta {
        let count = count.into_count();
        self.mutate(topic, |config| {
            *config.mcq.count_mut(difficulty) = count;
        })
    }

    pub fn set_mcq_marks(&mut self, topic: &str, marks: impl IntoCount) -> MarksDelta {
        let marks = marks.into_count();
        self.mutate(topic, |config| {
            config.mcq.marks_per_mcq = marks;
        })
    }

    /// 追加一个全零的主观题组
    pub fn add_descriptive_group(&mut self, topic: &str) -> MarksDelta {
        self.mutate(topic, |config| {
            config.descriptive_groups.push(DescriptiveGroup::default());
        })
    }

    /// 修改主观题组的一个字段；下标越界时不做任何事
    pub fn update_descriptive_group(
        &mut self,
        topic: &str,
        index: usize,
        field: DescriptiveField,
    ) -> MarksDelta {
        self.mutate(topic, |config| {
            if let Some(group) = config.descriptive_groups.get_mut(index) {
                match field {
                    DescriptiveField::Marks(marks) => group.marks = marks,
                    DescriptiveField::Difficulty(difficulty) => group.difficulty = difficulty,
                    DescriptiveField::QuestionCount(count) => group.question_count = count,
                }
            }
        })
    }

    /// 按表单字段名修改主观题组（`marks` / `difficulty` / `questionCount`）
    pub fn update_descriptive_group_raw(
        &mut self,
        topic: &str,
        index: usize,
        field: &str,
        raw: &str,
    ) -> MarksDelta {
        match DescriptiveField::from_raw(field, raw) {
            Some(field) => self.update_descriptive_group(topic, index, field),
            None => {
                debug!("未知的主观题字段: {}", field);
                0
            }
        }
    }

    pub fn remove_descriptive_group(&mut self, topic: &str, index: usize) -> MarksDelta {
        self.mutate(topic, |config| {
            if index < config.descriptive_groups.len() {
                config.descriptive_groups.remove(index);
            }
        })
    }

    // ========== 查询 ==========

    pub fn get(&self, name: &str) -> Option<&TopicConfig> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.config)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// 按插入顺序遍历 (名称, 配置)
    pub fn topics(&self) -> impl Iterator<Item = (&str, &TopicConfig)> {
        self.entries.iter().map(|e| (e.name.as_str(), &e.config))
    }

    pub fn topic_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// 直接插入完整配置（加载蓝图时使用）；名称为空或重复时返回 false
    pub(crate) fn insert(&mut self, name: &str, config: TopicConfig) -> bool {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.entries.push(TopicEntry {
            name: name.to_string(),
            config,
        });
        true
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// 修改单个知识点并返回贡献的变化量；知识点不存在时返回 0
    fn mutate(&mut self, topic: &str, f: impl FnOnce(&mut TopicConfig)) -> MarksDelta {
        let Some(index) = self.position(topic) else {
            debug!("知识点不存在: {}", topic);
            return 0;
        };
        let config = &mut self.entries[index].config;
        let before = config.contribution();
        f(config);
        config.contribution() - before
    }
}
