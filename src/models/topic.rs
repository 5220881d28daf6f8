use crate::models::difficulty::Difficulty;
use serde::{Deserialize, Serialize};

/// 单个知识点的选择题配置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McqConfig {
    pub easy_count: u32,
    pub medium_count: u32,
    pub hard_count: u32,
    pub marks_per_mcq: u32,
}

impl McqConfig {
    /// 按难度取题数
    pub fn count(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.easy_count,
            Difficulty::Medium => self.medium_count,
            Difficulty::Hard => self.hard_count,
        }
    }

    pub fn count_mut(&mut self, difficulty: Difficulty) -> &mut u32 {
        match difficulty {
            Difficulty::Easy => &mut self.easy_count,
            Difficulty::Medium => &mut self.medium_count,
            Difficulty::Hard => &mut self.hard_count,
        }
    }

    pub fn total_count(&self) -> u64 {
        u64::from(self.easy_count) + u64::from(self.medium_count) + u64::from(self.hard_count)
    }

    /// 选择题总分；u32 上限的题数和分值相乘也不会溢出
    pub fn marks(&self) -> u128 {
        u128::from(self.total_count()) * u128::from(self.marks_per_mcq)
    }
}

/// 一组主观题：同分值、同难度的若干道题
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptiveGroup {
    pub marks: u32,
    pub difficulty: Difficulty,
    pub question_count: u32,
}

impl DescriptiveGroup {
    pub fn total_marks(&self) -> u128 {
        u128::from(self.marks) * u128::from(self.question_count)
    }
}

/// 知识点配置
///
/// 全部为零、没有主观题组的配置是合法的"空配置"，贡献 0 分。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicConfig {
    pub mcq: McqConfig,
    #[serde(default)]
    pub descriptive_groups: Vec<DescriptiveGroup>,
}

impl TopicConfig {
    /// 该知识点贡献的总分
    pub fn contribution(&self) -> i128 {
        let total = self
            .descriptive_groups
            .iter()
            .fold(self.mcq.marks(), |acc, g| acc.saturating_add(g.total_marks()));
        i128::try_from(total).unwrap_or(i128::MAX)
    }

    /// 该知识点会派生出的题目数量
    pub fn question_count(&self) -> u64 {
        self.mcq.total_count()
            + self
                .descriptive_groups
                .iter()
                .map(|g| u64::from(g.question_count))
                .sum::<u64>()
    }

    pub fn is_empty(&self) -> bool {
        self.question_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contribution() {
        let config = TopicConfig {
            mcq: McqConfig {
                easy_count: 2,
                medium_count: 1,
                hard_count: 0,
                marks_per_mcq: 1,
            },
            descriptive_groups: vec![DescriptiveGroup {
                marks: 5,
                difficulty: Difficulty::Medium,
                question_count: 1,
            }],
        };
        assert_eq!(config.contribution(), 8);
        assert_eq!(config.question_count(), 4);
        assert!(!config.is_empty());
    }

    #[test]
    fn test_empty_topic_contributes_nothing() {
        let config = TopicConfig::default();
        assert_eq!(config.contribution(), 0);
        assert!(config.is_empty());

        // 有分值但题数为 0 也不贡献分数
        let config = TopicConfig {
            mcq: McqConfig {
                marks_per_mcq: 4,
                ..Default::default()
            },
            descriptive_groups: vec![DescriptiveGroup {
                marks: 10,
                ..Default::default()
            }],
        };
        assert_eq!(config.contribution(), 0);
    }

    #[test]
    fn test_contribution_at_u32_limits() {
        let max = u32::MAX;
        let config = TopicConfig {
            mcq: McqConfig {
                easy_count: max,
                medium_count: max,
                hard_count: max,
                marks_per_mcq: max,
            },
            descriptive_groups: vec![DescriptiveGroup {
                marks: max,
                difficulty: Difficulty::Hard,
                question_count: max,
            }],
        };
        let m = i128::from(max);
        assert_eq!(config.contribution(), 3 * m * m + m * m);
        assert_eq!(config.question_count(), 4 * u64::from(max));
    }
}
