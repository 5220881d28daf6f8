//! 蓝图派生
//!
//! 两步：
//! 1. [`derive`]：按知识点顺序展开为出题请求（知识点优先，便于追踪）
//! 2. [`reorder_by_type`]：稳定地按题型分组（生成服务要求题型优先）

use crate::blueprint::store::TopicConfigStore;
use crate::models::difficulty::Difficulty;
use crate::models::question::{QuestionRequest, QuestionType};
use std::collections::BTreeMap;

/// 把配置展开为出题请求序列
///
/// 对每个知识点（按插入顺序）：
/// - 先 easy、再 medium、再 hard 的选择题，分值为 `marks_per_mcq`
/// - 再按列表顺序展开每个主观题组
///
/// 空配置得到空序列；总分校验在上游完成，这里不做。
pub fn derive(store: &TopicConfigStore) -> Vec<QuestionRequest> {
    let mut requests = Vec::new();

    for (topic, config) in store.topics() {
        for difficulty in Difficulty::ALL {
            let count = config.mcq.count(difficulty);
            requests.extend(
                (0..count).map(|_| QuestionRequest::mcq(topic, difficulty, config.mcq.marks_per_mcq)),
            );
        }

        for group in &config.descriptive_groups {
            requests.extend(
                (0..group.question_count)
                    .map(|_| QuestionRequest::descriptive(topic, group.difficulty, group.marks)),
            );
        }
    }

    requests
}

/// 题型顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeOrder([QuestionType; 2]);

impl TypeOrder {
    /// 选择题在前
    pub const MCQ_FIRST: TypeOrder = TypeOrder([QuestionType::Mcq, QuestionType::Descriptive]);
    /// 主观题在前
    pub const DESCRIPTIVE_FIRST: TypeOrder =
        TypeOrder([QuestionType::Descriptive, QuestionType::Mcq]);

    fn rank(&self, question_type: QuestionType) -> usize {
        let [first, _] = self.0;
        if question_type == first {
            0
        } else {
            1
        }
    }
}

impl Default for TypeOrder {
    fn default() -> Self {
        TypeOrder::MCQ_FIRST
    }
}

/// 选择题在前、主观题在后，同题型内保持原相对顺序
pub fn reorder_by_type(requests: &[QuestionRequest]) -> Vec<QuestionRequest> {
    reorder_with(requests, &TypeOrder::default())
}

/// 按指定题型顺序稳定排序
pub fn reorder_with(requests: &[QuestionRequest], order: &TypeOrder) -> Vec<QuestionRequest> {
    let mut sorted = requests.to_vec();
    // sort_by_key 是稳定排序
    sorted.sort_by_key(|r| order.rank(r.question_type));
    sorted
}

/// 蓝图统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlueprintSummary {
    pub mcq_count: usize,
    pub descriptive_count: usize,
    pub total_marks: u64,
    /// 每个难度的题数
    pub by_difficulty: BTreeMap<&'static str, usize>,
}

impl BlueprintSummary {
    pub fn of(requests: &[QuestionRequest]) -> Self {
        let mut summary = Self::default();
        for request in requests {
            match request.question_type {
                QuestionType::Mcq => summary.mcq_count += 1,
                QuestionType::Descriptive => summary.descriptive_count += 1,
            }
            summary.total_marks += u64::from(request.marks);
            *summary
                .by_difficulty
                .entry(request.difficulty.as_upper())
                .or_default() += 1;
        }
        summary
    }

    pub fn question_count(&self) -> usize {
        self.mcq_count + self.descriptive_count
    }
}

impl std::fmt::Display for BlueprintSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "共 {} 题 (MCQ {}, 主观题 {}), 总分 {}",
            self.question_count(),
            self.mcq_count,
            self.descriptive_count,
            self.total_marks
        )
    }
}
