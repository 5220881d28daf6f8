//! 蓝图保存 / 加载流程 - 流程层
//!
//! - 保存：会话已关联蓝图ID时走更新，否则新建；成功后丢弃配置
//! - 加载：票据机制，过期响应直接丢弃

use tracing::{error, info, warn};

use crate::blueprint::session::{ConfigSession, LoadOutcome, ValidationState};
use crate::error::{AppResult, BusinessError};
use crate::models::saved::SavedBlueprint;
use crate::services::backend::BlueprintBackend;
use crate::workflow::plan_ctx::PlanCtx;

/// 保存结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// 新建蓝图
    Created(SavedBlueprint),
    /// 更新已有蓝图
    Updated(SavedBlueprint),
    /// 校验未通过，没有发送任何请求
    Blocked(ValidationState),
}

/// 蓝图保存 / 加载流程
#[derive(Debug, Clone, Copy, Default)]
pub struct BlueprintFlow;

impl BlueprintFlow {
    pub fn new() -> Self {
        Self
    }

    /// 保存当前配置
    ///
    /// 失败时会话保持不变，用户可以重试。
    pub async fn save<B>(
        &self,
        backend: &B,
        session: &mut ConfigSession,
        ctx: &PlanCtx,
    ) -> AppResult<SaveOutcome>
    where
        B: BlueprintBackend + ?Sized,
    {
        let Some(payload) = session.save_payload() else {
            let validation = session.validation();
            warn!(
                "{} ⛔ 蓝图无法保存: 分数 {:?}, 缺少 {:?}, 知识点 {} 个",
                ctx, validation.marks, validation.missing_save_fields, validation.topic_count
            );
            return Ok(SaveOutcome::Blocked(validation));
        };

        let result = match session.blueprint_id() {
            Some(id) => {
                info!("{} 💾 更新蓝图 {}...", ctx, id);
                backend.update_blueprint(id, &payload).await.map(SaveOutcome::Updated)
            }
            None => {
                info!("{} 💾 保存新蓝图: {}", ctx, payload.name);
                backend.save_blueprint(&payload).await.map(SaveOutcome::Created)
            }
        };

        match result {
            Ok(outcome) => {
                if let SaveOutcome::Created(saved) | SaveOutcome::Updated(saved) = &outcome {
                    info!("{} ✓ 蓝图已保存 (ID: {})", ctx, saved.id);
                }
                session.discard_configuration();
                Ok(outcome)
            }
            Err(e) => {
                error!("{} ❌ 蓝图保存失败，配置已保留: {}", ctx, e);
                Err(e)
            }
        }
    }

    /// 加载已保存的蓝图，整体替换当前配置
    ///
    /// 响应回来之前会话被修改（再次加载、重置、生成）时返回 `Stale`。
    pub async fn load<B>(
        &self,
        backend: &B,
        session: &mut ConfigSession,
        blueprint_id: &str,
    ) -> AppResult<LoadOutcome>
    where
        B: BlueprintBackend + ?Sized,
    {
        let blueprint_id = blueprint_id.trim();
        if blueprint_id.is_empty() {
            return Err(BusinessError::EmptyBlueprintId.into());
        }

        let ticket = session.begin_load(blueprint_id);
        let saved = backend.load_blueprint(blueprint_id).await?;
        Ok(session.complete_load(&ticket, saved))
    }
}
