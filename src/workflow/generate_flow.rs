//! 试卷生成流程 - 流程层
//!
//! 流程顺序：
//! 1. 校验（分数严格相等 + 必填项）
//! 2. 派生蓝图，构建生成请求
//! 3. 提交生成服务（dry run 时跳过）
//! 4. 成功后丢弃当前配置；失败时配置保持不变，用户可以重试

use serde_json::Value as JsonValue;
use tracing::{error, info, warn};

use crate::blueprint::accumulator::MarksStatus;
use crate::blueprint::deriver::{BlueprintSummary, TypeOrder};
use crate::blueprint::session::{ConfigSession, ValidationState};
use crate::config::Config;
use crate::error::AppResult;
use crate::services::backend::GenerationBackend;
use crate::services::generation_request::{GenerationRequest, GenerationRequestBuilder};
use crate::workflow::plan_ctx::PlanCtx;

/// 生成结果
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateOutcome {
    /// 已提交生成服务
    Submitted {
        ack: JsonValue,
        question_count: usize,
    },
    /// 校验未通过，没有发送任何请求
    Blocked(ValidationState),
    /// dry run：只构建了请求
    DryRun(GenerationRequest),
}

/// 试卷生成流程
///
/// - 不持有会话，会话由调用方传入
/// - 只依赖 `GenerationBackend`
#[derive(Debug, Clone, Default)]
pub struct GenerateFlow {
    builder: GenerationRequestBuilder,
    dry_run: bool,
    verbose_logging: bool,
}

impl GenerateFlow {
    pub fn new(config: &Config) -> Self {
        Self {
            builder: GenerationRequestBuilder::new(),
            dry_run: config.dry_run,
            verbose_logging: config.verbose_logging,
        }
    }

    /// 使用自定义题型顺序
    pub fn with_type_order(mut self, type_order: TypeOrder) -> Self {
        self.builder = GenerationRequestBuilder::with_type_order(type_order);
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub async fn run<B>(
        &self,
        backend: &B,
        session: &mut ConfigSession,
        ctx: &PlanCtx,
    ) -> AppResult<GenerateOutcome>
    where
        B: GenerationBackend + ?Sized,
    {
        // ========== 1. 校验 ==========
        let validation = session.validation();
        if !validation.can_generate() {
            log_blocked(ctx, &validation);
            return Ok(GenerateOutcome::Blocked(validation));
        }

        // ========== 2. 构建请求 ==========
        let Some(request) = self.builder.build(session.metadata(), session.store()) else {
            return Ok(GenerateOutcome::Blocked(validation));
        };
        let summary = BlueprintSummary::of(&request.blueprint);
        info!("{} 📝 蓝图: {}", ctx, summary);
        if self.verbose_logging {
            for (idx, question) in request.blueprint.iter().enumerate() {
                info!("{}   {:>3}. {}", ctx, idx + 1, question);
            }
        }

        if self.dry_run {
            info!(
                "{} 🧪 DRY RUN: {}",
                ctx,
                serde_json::to_string(&request).unwrap_or_default()
            );
            return Ok(GenerateOutcome::DryRun(request));
        }

        // ========== 3. 提交 ==========
        info!("{} 🚀 提交生成请求 ({} 题)...", ctx, request.length_of_blueprint);
        let ack = match backend.generate(&request).await {
            Ok(ack) => ack,
            Err(e) => {
                error!("{} ❌ 生成请求失败，配置已保留: {}", ctx, e);
                return Err(e);
            }
        };

        // ========== 4. 丢弃配置 ==========
        session.discard_configuration();
        info!("{} ✓ 生成请求已提交: {}", ctx, ctx.plan_name);

        Ok(GenerateOutcome::Submitted {
            ack,
            question_count: summary.question_count(),
        })
    }
}

pub(crate) fn log_blocked(ctx: &PlanCtx, validation: &ValidationState) {
    match validation.marks {
        MarksStatus::Exceeded { excess } => {
            warn!("{} ⛔ 已配置总分超过目标总分 {} 分", ctx, excess)
        }
        MarksStatus::Insufficient { missing } => {
            warn!("{} ⛔ 已配置总分还差 {} 分", ctx, missing)
        }
        MarksStatus::NoTarget => warn!("{} ⛔ 未填写目标总分", ctx),
        MarksStatus::Satisfied => {}
    }
    if !validation.missing_fields.is_empty() {
        let names: Vec<&str> = validation.missing_fields.iter().map(|f| f.name()).collect();
        warn!("{} ⛔ 缺少必填项: {}", ctx, names.join(", "));
    }
}
