//! # Paper Blueprint
//!
//! 试卷蓝图引擎：配置知识点和题型难度分布，实时累计总分，
//! 派生出有序的题目规格列表并提交给生成服务；
//! 另外维护已生成试卷的分区题目顺序。
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 领域核心（Blueprint / Sections）
//! - `blueprint/` - 纯内存状态，不做任何 I/O
//! - `TopicConfigStore` - 知识点配置，每次修改返回分数增量
//! - `MarksAccumulator` - 已配置总分，增量更新，可全量校验
//! - `deriver` - 配置 → 题目规格列表，按题型分组
//! - `ConfigSession` - 一张试卷的编辑会话（校验 / 加载票据 / 生命周期）
//! - `sections/` - `SectionOrderStore`，分区内排序、删除、提交
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 外部接口 trait、请求构建、保存格式转换
//! - `GenerationBackend` / `BlueprintBackend` / `SectionBackend`
//! - `GenerationRequestBuilder` - 生成请求体
//! - `persistence` - 配置 ↔ 保存格式
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次生成 / 一次保存"的完整流程
//! - `PlanCtx` - 日志上下文
//! - `GenerateFlow` - 校验 → 派生 → 提交 → 丢弃配置
//! - `BlueprintFlow` - 保存（新建 / 更新）与加载
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量方案处理器，管理客户端和并发
//! - `orchestrator/plan_processor` - 单个方案处理器
//!
//! ## 模块结构

pub mod blueprint;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod sections;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use blueprint::{ConfigSession, MarksAccumulator, TopicConfigStore, ValidationState};
pub use clients::PaperApiClient;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{Difficulty, ExamMetadata, ExamPlan, QuestionRequest, QuestionType};
pub use orchestrator::{process_plan, App};
pub use sections::{SectionOrderStore, SyncState};
pub use workflow::{BlueprintFlow, GenerateFlow, GenerateOutcome, PlanCtx, SaveOutcome};
