//! 外部服务接口
//!
//! 生成服务、蓝图存储、试卷分区存储都是外部协作方。
//! 核心只依赖这些 trait；`PaperApiClient` 是基于 HTTP 的实现，
//! 测试中使用内存实现。

use crate::error::AppResult;
use crate::models::saved::{SaveBlueprintPayload, SavedBlueprint};
use crate::models::section::{DeleteQuestionPayload, SectionsPayload};
use crate::services::generation_request::GenerationRequest;
use futures::future::BoxFuture;
use serde_json::Value as JsonValue;

/// 试卷生成服务
pub trait GenerationBackend: Send + Sync {
    /// 提交生成请求，返回不透明的确认结果
    fn generate<'a>(&'a self, request: &'a GenerationRequest) -> BoxFuture<'a, AppResult<JsonValue>>;
}

/// 蓝图存储
pub trait BlueprintBackend: Send + Sync {
    fn save_blueprint<'a>(
        &'a self,
        payload: &'a SaveBlueprintPayload,
    ) -> BoxFuture<'a, AppResult<SavedBlueprint>>;

    fn update_blueprint<'a>(
        &'a self,
        id: &'a str,
        payload: &'a SaveBlueprintPayload,
    ) -> BoxFuture<'a, AppResult<SavedBlueprint>>;

    fn load_blueprint<'a>(&'a self, id: &'a str) -> BoxFuture<'a, AppResult<SavedBlueprint>>;
}

/// 已生成试卷的分区存储
pub trait SectionBackend: Send + Sync {
    fn save_sections<'a>(&'a self, payload: &'a SectionsPayload) -> BoxFuture<'a, AppResult<()>>;

    fn delete_question<'a>(
        &'a self,
        payload: &'a DeleteQuestionPayload,
    ) -> BoxFuture<'a, AppResult<()>>;
}
