//! 生成请求构建
//!
//! 把试卷信息和派生出的蓝图打包成生成服务需要的请求体

use crate::blueprint::deriver::{self, TypeOrder};
use crate::blueprint::store::TopicConfigStore;
use crate::models::metadata::ExamMetadata;
use crate::models::question::QuestionRequest;
use serde::{Deserialize, Serialize};

/// 生成服务请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub subject: String,
    pub grade: u32,
    pub name: String,
    pub blueprint: Vec<QuestionRequest>,
    pub total_marks: u32,
    pub length_of_blueprint: usize,
    pub academy_name: String,
    pub time_duration: String,
    pub number_of_sets: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub additional_instructions: String,
}

/// 生成请求构建器
#[derive(Debug, Clone, Default)]
pub struct GenerationRequestBuilder {
    type_order: TypeOrder,
}

impl GenerationRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用自定义题型顺序
    pub fn with_type_order(type_order: TypeOrder) -> Self {
        Self { type_order }
    }

    /// 从配置仓库派生蓝图并构建请求
    pub fn build(&self, metadata: &ExamMetadata, store: &TopicConfigStore) -> Option<GenerationRequest> {
        let blueprint = deriver::reorder_with(&deriver::derive(store), &self.type_order);
        self.build_from_blueprint(metadata, blueprint)
    }

    /// 使用已派生的蓝图构建请求；年级或总分缺失时返回 None
    pub fn build_from_blueprint(
        &self,
        metadata: &ExamMetadata,
        blueprint: Vec<QuestionRequest>,
    ) -> Option<GenerationRequest> {
        Some(GenerationRequest {
            subject: metadata.subject.trim().to_string(),
            grade: metadata.standard_grade?,
            name: metadata.title.trim().to_string(),
            total_marks: metadata.target_marks()?,
            length_of_blueprint: blueprint.len(),
            blueprint,
            academy_name: metadata.academy_name.trim().to_string(),
            time_duration: metadata.time_duration.trim().to_string(),
            number_of_sets: metadata.number_of_sets.max(1),
            additional_instructions: metadata.additional_instructions.trim().to_string(),
        })
    }
}
