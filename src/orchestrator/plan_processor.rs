//! 单个方案处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责处理单个试卷方案，是方案级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **构建会话**：把方案中的知识点逐条重放到 `ConfigSession`
//! 2. **加载蓝图**：方案指定 `blueprint_id` 时整体替换配置
//! 3. **流程调度**：按方案动作调用 `GenerateFlow` 或 `BlueprintFlow`
//! 4. **统计输出**：记录单个方案的结果

use crate::blueprint::session::{ConfigSession, LoadOutcome};
use crate::config::Config;
use crate::models::plan::{ExamPlan, PlanAction};
use crate::services::backend::{BlueprintBackend, GenerationBackend};
use crate::workflow::{BlueprintFlow, GenerateFlow, GenerateOutcome, PlanCtx, SaveOutcome};
use anyhow::{Context, Result};
use tracing::info;

/// 单个方案的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanResult {
    /// 已提交 / 已保存（dry run 也计为成功）
    Success,
    /// 校验未通过
    Blocked,
}

/// 处理单个方案
///
/// # 参数
/// - `backend`: 生成服务 + 蓝图存储
/// - `plan`: 方案数据
/// - `plan_index`: 方案索引（用于日志）
/// - `config`: 配置
pub async fn process_plan<B>(
    backend: &B,
    plan: ExamPlan,
    plan_index: usize,
    config: &Config,
) -> Result<PlanResult>
where
    B: GenerationBackend + BlueprintBackend + ?Sized,
{
    let ctx = PlanCtx::new(plan_index, plan.display_name());
    log_plan_start(&ctx, &plan);

    let mut session = ConfigSession::from_plan(&plan);

    // ========== 加载已保存的蓝图 ==========
    if let Some(blueprint_id) = plan.blueprint_id() {
        info!("{} 📥 加载蓝图 {}...", ctx, blueprint_id);
        let outcome = BlueprintFlow::new()
            .load(backend, &mut session, blueprint_id)
            .await
            .with_context(|| format!("{} 加载蓝图失败: {}", ctx, blueprint_id))?;
        if outcome == LoadOutcome::Stale {
            anyhow::bail!("{} 蓝图响应已过期: {}", ctx, blueprint_id);
        }
    }

    info!(
        "{} 📊 已配置总分 {} / 目标 {:?}",
        ctx,
        session.configured_marks(),
        session.metadata().target_marks()
    );

    // ========== 执行方案动作 ==========
    let result = match plan.action {
        PlanAction::Generate => {
            let outcome = GenerateFlow::new(config)
                .run(backend, &mut session, &ctx)
                .await
                .with_context(|| format!("{} 生成失败", ctx))?;
            match outcome {
                GenerateOutcome::Submitted { .. } | GenerateOutcome::DryRun(_) => PlanResult::Success,
                GenerateOutcome::Blocked(_) => PlanResult::Blocked,
            }
        }
        PlanAction::SaveBlueprint => {
            if config.dry_run {
                info!("{} 🧪 DRY RUN: {:?}", ctx, session.save_payload());
                return Ok(PlanResult::Success);
            }
            let outcome = BlueprintFlow::new()
                .save(backend, &mut session, &ctx)
                .await
                .with_context(|| format!("{} 保存蓝图失败", ctx))?;
            match outcome {
                SaveOutcome::Created(_) | SaveOutcome::Updated(_) => PlanResult::Success,
                SaveOutcome::Blocked(_) => PlanResult::Blocked,
            }
        }
    };

    log_plan_complete(&ctx, result);
    Ok(result)
}

// ========== 日志辅助函数 ==========

fn log_plan_start(ctx: &PlanCtx, plan: &ExamPlan) {
    info!("\n{}", "-".repeat(60));
    info!("{} 开始处理: {}", ctx, ctx.plan_name);
    info!(
        "{} 年级: {:?}, 学科: {}, 知识点: {} 个",
        ctx,
        plan.exam.standard_grade,
        plan.exam.subject,
        plan.topics.len()
    );
}

fn log_plan_complete(ctx: &PlanCtx, result: PlanResult) {
    match result {
        PlanResult::Success => info!("{} ✅ 处理完成", ctx),
        PlanResult::Blocked => info!("{} ⛔ 校验未通过，已跳过", ctx),
    }
}
