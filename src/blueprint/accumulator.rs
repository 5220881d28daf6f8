use crate::blueprint::store::{MarksDelta, TopicConfigStore};

/// 分数状态（相对目标总分）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarksStatus {
    /// 未填写目标总分，无法校验
    NoTarget,
    /// 不足
    Insufficient { missing: i128 },
    /// 恰好相等
    Satisfied,
    /// 超出
    Exceeded { excess: i128 },
}

impl MarksStatus {
    pub fn is_satisfied(self) -> bool {
        matches!(self, MarksStatus::Satisfied)
    }
}

/// 已配置总分的增量累加器
///
/// 每次修改都通过 [`MarksAccumulator::apply_delta`] 增量更新；
/// 全量重算只用于校验和加载蓝图时的初始化。
///
/// 使用 i128：题数和分值都在 u32 范围内时，乘积与求和都是精确的。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarksAccumulator {
    total: i128,
}

impl MarksAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以仓库当前状态初始化
    pub fn seeded(store: &TopicConfigStore) -> Self {
        Self {
            total: Self::recompute(store),
        }
    }

    pub fn apply_delta(&mut self, delta: MarksDelta) {
        self.total = self.total.saturating_add(delta);
    }

    pub fn current(&self) -> i128 {
        self.total
    }

    /// 全量重算
    pub fn recompute(store: &TopicConfigStore) -> i128 {
        store
            .topics()
            .fold(0, |acc: i128, (_, config)| acc.saturating_add(config.contribution()))
    }

    /// 丢弃累计值，按仓库重新初始化
    pub fn reseed(&mut self, store: &TopicConfigStore) {
        self.total = Self::recompute(store);
    }

    /// 增量值与全量重算是否一致
    pub fn is_consistent_with(&self, store: &TopicConfigStore) -> bool {
        self.total == Self::recompute(store)
    }

    pub fn is_exceeded(&self, target_marks: u32) -> bool {
        self.total > i128::from(target_marks)
    }

    pub fn is_satisfied(&self, target_marks: u32) -> bool {
        self.total == i128::from(target_marks)
    }

    pub fn status(&self, target_marks: Option<u32>) -> MarksStatus {
        let Some(target) = target_marks else {
            return MarksStatus::NoTarget;
        };
        let target = i128::from(target);
        match self.total.cmp(&target) {
            std::cmp::Ordering::Less => MarksStatus::Insufficient {
                missing: target - self.total,
            },
            std::cmp::Ordering::Equal => MarksStatus::Satisfied,
            std::cmp::Ordering::Greater => MarksStatus::Exceeded {
                excess: self.total - target,
            },
        }
    }
}
