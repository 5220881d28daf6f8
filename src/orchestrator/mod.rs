//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量方案处理器
//! - 管理应用生命周期（初始化、运行）
//! - 批量加载方案（Vec<ExamPlan>）
//! - 控制并发数量（Semaphore）
//! - 持有 API 客户端
//! - 输出全局统计信息
//!
//! ### `plan_processor` - 单个方案处理器
//! - 为方案构建 `ConfigSession`
//! - 按需加载已保存的蓝图
//! - 调用生成 / 保存流程
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<ExamPlan>)
//!     ↓
//! plan_processor (处理单个 ExamPlan)
//!     ↓
//! workflow::{GenerateFlow, BlueprintFlow}
//!     ↓
//! blueprint (会话 / 配置 / 累加器 / 派生) + services (请求构建 / 外部接口)
//!     ↓
//! clients (PaperApiClient)
//! ```

pub mod batch_processor;
pub mod plan_processor;

// 重新导出主要类型
pub use batch_processor::App;
pub use plan_processor::{process_plan, PlanResult};
