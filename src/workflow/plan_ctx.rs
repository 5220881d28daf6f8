//! 方案处理上下文
//!
//! 封装"我正在处理第几个方案"这一信息，只用于日志前缀

use std::fmt::Display;

/// 方案处理上下文
#[derive(Debug, Clone)]
pub struct PlanCtx {
    /// 方案索引（从1开始，仅用于日志显示）
    pub plan_index: usize,

    /// 方案名称（试卷标题或文件名）
    pub plan_name: String,
}

impl PlanCtx {
    pub fn new(plan_index: usize, plan_name: impl Into<String>) -> Self {
        Self {
            plan_index,
            plan_name: plan_name.into(),
        }
    }
}

impl Display for PlanCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[方案 {}]", self.plan_index)
    }
}
