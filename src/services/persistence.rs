//! 蓝图保存格式转换
//!
//! 配置仓库 ⇄ 后端保存格式。对合法的非空配置，
//! [`derive_save_format`] 与 [`load_from_save_format`] 互为逆操作。

use crate::blueprint::store::TopicConfigStore;
use crate::models::difficulty::Difficulty;
use crate::models::metadata::ExamMetadata;
use crate::models::saved::{BreakdownEntry, DescriptiveQuestionConfig, SaveBlueprintPayload};
use crate::models::topic::{DescriptiveGroup, McqConfig, TopicConfig};
use tracing::warn;

/// 配置仓库 → 保存格式
pub fn derive_save_format(store: &TopicConfigStore) -> Vec<BreakdownEntry> {
    store
        .topics()
        .map(|(topic, config)| BreakdownEntry {
            topic: topic.to_string(),
            easy_mcqs: config.mcq.easy_count,
            medium_mcqs: config.mcq.medium_count,
            hard_mcqs: config.mcq.hard_count,
            mcq_marks: config.mcq.marks_per_mcq,
            descriptive_question_config: config
                .descriptive_groups
                .iter()
                .map(|group| DescriptiveQuestionConfig {
                    marks: group.marks,
                    difficulty: group.difficulty.as_lower().to_string(),
                    no_of_questions: group.question_count,
                })
                .collect(),
        })
        .collect()
}

/// 保存格式 → 配置仓库
///
/// 数值已在反序列化时规整；这里跳过空名称和重复名称（保留第一个），
/// 无法识别的难度回退为 easy。
pub fn load_from_save_format(breakdown: &[BreakdownEntry]) -> TopicConfigStore {
    let mut store = TopicConfigStore::new();

    for entry in breakdown {
        let config = TopicConfig {
            mcq: McqConfig {
                easy_count: entry.easy_mcqs,
                medium_count: entry.medium_mcqs,
                hard_count: entry.hard_mcqs,
                marks_per_mcq: entry.mcq_marks,
            },
            descriptive_groups: entry
                .descriptive_question_config
                .iter()
                .map(|group| DescriptiveGroup {
                    marks: group.marks,
                    difficulty: parse_saved_difficulty(&entry.topic, &group.difficulty),
                    question_count: group.no_of_questions,
                })
                .collect(),
        };

        if !store.insert(&entry.topic, config) {
            warn!("蓝图中的知识点为空或重复，已跳过: {:?}", entry.topic);
        }
    }

    store
}

fn parse_saved_difficulty(topic: &str, raw: &str) -> Difficulty {
    Difficulty::parse(raw).unwrap_or_else(|| {
        warn!("知识点 {} 的难度无法识别: {:?}，按 easy 处理", topic, raw);
        Difficulty::Easy
    })
}

/// 试卷信息 + 配置 → 保存请求；年级或总分缺失时返回 None
pub fn save_payload(metadata: &ExamMetadata, store: &TopicConfigStore) -> Option<SaveBlueprintPayload> {
    Some(SaveBlueprintPayload {
        name: metadata.title.trim().to_string(),
        grade: metadata.standard_grade?,
        subject: metadata.subject.trim().to_string(),
        total_marks: metadata.target_marks()?,
        breakdown: derive_save_format(store),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::store::DescriptiveField;

    fn sample_store() -> TopicConfigStore {
        let mut store = TopicConfigStore::new();
        store.add_topic("Algebra");
        store.set_mcq_count("Algebra", Difficulty::Easy, 2);
        store.set_mcq_count("Algebra", Difficulty::Medium, 1);
        store.set_mcq_marks("Algebra", 1);
        store.add_descriptive_group("Algebra");
        store.update_descriptive_group("Algebra", 0, DescriptiveField::Marks(5));
        store.update_descriptive_group("Algebra", 0, DescriptiveField::Difficulty(Difficulty::Medium));
        store.update_descriptive_group("Algebra", 0, DescriptiveField::QuestionCount(1));
        store.add_descriptive_group("Algebra");
        store.update_descriptive_group("Algebra", 1, DescriptiveField::Marks(10));
        store.update_descriptive_group("Algebra", 1, DescriptiveField::Difficulty(Difficulty::Hard));

        store.add_topic("Geometry");
        store.add_topic("Statistics");
        store.set_mcq_count("Statistics", Difficulty::Hard, 4);
        store.set_mcq_marks("Statistics", 2);
        store
    }

    #[test]
    fn test_round_trip() {
        let store = sample_store();
        let breakdown = derive_save_format(&store);
        assert_eq!(breakdown.len(), 3);
        assert_eq!(breakdown[0].descriptive_question_config[1].difficulty, "hard");
        assert_eq!(load_from_save_format(&breakdown), store);
    }

    #[test]
    fn test_round_trip_through_json() {
        let store = sample_store();
        let json = serde_json::to_string(&derive_save_format(&store)).unwrap();
        let breakdown: Vec<BreakdownEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(load_from_save_format(&breakdown), store);
    }

    #[test]
    fn test_load_skips_empty_and_duplicate_topics() {
        let json = r#"[
            {"topic": "Algebra", "easyMCQs": 1, "mcqMarks": 2},
            {"topic": "", "easyMCQs": 5},
            {"topic": "Algebra", "easyMCQs": 9},
            {"topic": "Optics", "descriptiveQuestionConfig": [
                {"marks": 3, "difficulty": "EXTREME", "noOfQuestions": "2"}
            ]}
        ]"#;
        let breakdown: Vec<BreakdownEntry> = serde_json::from_str(json).unwrap();
        let store = load_from_save_format(&breakdown);

        assert_eq!(store.topic_names(), vec!["Algebra", "Optics"]);
        assert_eq!(store.get("Algebra").unwrap().mcq.easy_count, 1);
        let group = store.get("Optics").unwrap().descriptive_groups[0];
        assert_eq!(group.difficulty, Difficulty::Easy);
        assert_eq!(group.question_count, 2);
    }

    #[test]
    fn test_save_payload_requires_grade_and_marks() {
        let store = sample_store();
        let mut metadata = ExamMetadata {
            title: " Half yearly ".to_string(),
            standard_grade: Some(8),
            subject: "Mathematics".to_string(),
            total_marks: Some(31),
            ..Default::default()
        };
        let payload = save_payload(&metadata, &store).unwrap();
        assert_eq!(payload.name, "Half yearly");
        assert_eq!(payload.grade, 8);
        assert_eq!(payload.breakdown.len(), 3);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["totalMarks"], 31);
        assert_eq!(json["breakdown"][2]["hardMCQs"], 4);

        metadata.standard_grade = None;
        assert!(save_payload(&metadata, &store).is_none());
    }
}
