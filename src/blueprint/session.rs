//! 配置会话
//!
//! 一张试卷的蓝图编辑过程：试卷信息 + 知识点配置 + 已配置总分。
//! 所有修改都经过 [`ConfigSession::apply`]，保证累加器与配置始终一致。
//!
//! ## 加载蓝图与过期响应
//!
//! 加载是异步的，响应回来时用户可能已经切换了学科 / 年级，或者又发起了
//! 另一次加载。[`ConfigSession::begin_load`] 发放一个带会话指纹的票据，
//! [`ConfigSession::complete_load`] 只接受指纹仍然匹配的响应，
//! 并整体替换配置（不与手动修改合并）。

use crate::blueprint::accumulator::{MarksAccumulator, MarksStatus};
use crate::blueprint::deriver::{self, TypeOrder};
use crate::blueprint::store::{DescriptiveField, MarksDelta, TopicConfigStore, TopicEdit};
use crate::models::difficulty::Difficulty;
use crate::models::metadata::{ExamMetadata, RequiredField};
use crate::models::plan::ExamPlan;
use crate::models::question::QuestionRequest;
use crate::models::saved::{SaveBlueprintPayload, SavedBlueprint};
use crate::services::persistence;
use crate::utils::lenient::IntoCount;
use tracing::{debug, info, warn};

/// 校验状态
///
/// 不是错误：只用于决定"生成"/"保存"按钮是否可用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationState {
    pub marks: MarksStatus,
    /// 生成试卷缺少的必填项
    pub missing_fields: Vec<RequiredField>,
    /// 保存蓝图缺少的必填项
    pub missing_save_fields: Vec<RequiredField>,
    pub topic_count: usize,
}

impl ValidationState {
    /// 生成要求已配置总分与目标总分严格相等
    pub fn can_generate(&self) -> bool {
        self.marks.is_satisfied() && self.missing_fields.is_empty()
    }

    /// 保存使用与生成相同的分数条件
    pub fn can_save(&self) -> bool {
        self.marks.is_satisfied() && self.missing_save_fields.is_empty() && self.topic_count > 0
    }

    pub fn is_exceeded(&self) -> bool {
        matches!(self.marks, MarksStatus::Exceeded { .. })
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self.marks, MarksStatus::Insufficient { .. })
    }
}

/// 会话指纹：判断一个异步响应是否仍属于当前会话
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFingerprint {
    pub epoch: u64,
    pub blueprint_id: Option<String>,
    pub standard_grade: Option<u32>,
    pub subject: String,
}

/// 加载票据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    fingerprint: SessionFingerprint,
}

impl LoadTicket {
    pub fn blueprint_id(&self) -> &str {
        self.fingerprint.blueprint_id.as_deref().unwrap_or_default()
    }
}

/// 加载结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// 已整体替换配置
    Applied,
    /// 响应已过期，被丢弃
    Stale,
}

/// 配置会话
#[derive(Debug, Clone, Default)]
pub struct ConfigSession {
    metadata: ExamMetadata,
    store: TopicConfigStore,
    marks: MarksAccumulator,
    blueprint_id: Option<String>,
    pending_load: Option<String>,
    epoch: u64,
}

impl ConfigSession {
    pub fn new(metadata: ExamMetadata) -> Self {
        Self {
            metadata,
            ..Default::default()
        }
    }

    /// 从方案文件构建会话：逐条重放修改，和手动编辑走同一条路径
    pub fn from_plan(plan: &ExamPlan) -> Self {
        let mut session = Self::new(plan.exam.clone());

        for topic in &plan.topics {
            if session.store.contains(topic.name.trim()) {
                warn!("方案 {} 中知识点重复，已忽略: {}", plan.display_name(), topic.name);
                continue;
            }
            session.add_topic(&topic.name);
            let name = topic.name.trim();
            session.set_mcq_count(name, Difficulty::Easy, topic.easy_mcqs);
            session.set_mcq_count(name, Difficulty::Medium, topic.medium_mcqs);
            session.set_mcq_count(name, Difficulty::Hard, topic.hard_mcqs);
            session.set_mcq_marks(name, topic.mcq_marks);

            let base = session
                .store
                .get(name)
                .map(|c| c.descriptive_groups.len())
                .unwrap_or_default();
            for (offset, group) in topic.descriptive.iter().enumerate() {
                let index = base + offset;
                session.add_descriptive_group(name);
                session.update_descriptive_group(name, index, DescriptiveField::Marks(group.marks));
                session.update_descriptive_group(
                    name,
                    index,
                    DescriptiveField::Difficulty(Difficulty::parse_lenient(&group.difficulty)),
                );
                session.update_descriptive_group(
                    name,
                    index,
                    DescriptiveField::QuestionCount(group.question_count),
                );
            }
        }

        session
    }

    // ========== 修改 ==========

    /// 应用一次修改，同时更新已配置总分
    pub fn apply(&mut self, edit: TopicEdit) -> MarksDelta {
        let delta = self.store.apply(edit);
        self.marks.apply_delta(delta);
        debug_assert!(
            self.marks.is_consistent_with(&self.store),
            "configured marks drifted from recomputed total"
        );
        delta
    }

    pub fn add_topic(&mut self, name: &str) -> MarksDelta {
        self.apply(TopicEdit::AddTopic(name.to_string()))
    }

    /// 删除知识点并扣除其全部贡献
    pub fn remove_topic(&mut self, name: &str) -> MarksDelta {
        self.apply(TopicEdit::RemoveTopic(name.to_string()))
    }

    pub fn set_mcq_count(
        &mut self,
        topic: &str,
        difficulty: Difficulty,
        count: impl IntoCount,
    ) -> MarksDelta {
        self.apply(TopicEdit::SetMcqCount {
            topic: topic.to_string(),
            difficulty,
            count: count.into_count(),
        })
    }

    pub fn set_mcq_marks(&mut self, topic: &str, marks: impl IntoCount) -> MarksDelta {
        self.apply(TopicEdit::SetMcqMarks {
            topic: topic.to_string(),
            marks: marks.into_count(),
        })
    }

    pub fn add_descriptive_group(&mut self, topic: &str) -> MarksDelta {
        self.apply(TopicEdit::AddDescriptiveGroup {
            topic: topic.to_string(),
        })
    }

    pub fn update_descriptive_group(
        &mut self,
        topic: &str,
        index: usize,
        field: DescriptiveField,
    ) -> MarksDelta {
        self.apply(TopicEdit::UpdateDescriptiveGroup {
            topic: topic.to_string(),
            index,
            field,
        })
    }

    /// 按表单字段名修改主观题组
    pub fn update_descriptive_group_raw(
        &mut self,
        topic: &str,
        index: usize,
        field: &str,
        raw: &str,
    ) -> MarksDelta {
        match DescriptiveField::from_raw(field, raw) {
            Some(field) => self.update_descriptive_group(topic, index, field),
            None => 0,
        }
    }

    pub fn remove_descriptive_group(&mut self, topic: &str, index: usize) -> MarksDelta {
        self.apply(TopicEdit::RemoveDescriptiveGroup {
            topic: topic.to_string(),
            index,
        })
    }

    pub fn metadata_mut(&mut self) -> &mut ExamMetadata {
        &mut self.metadata
    }

    pub fn set_metadata(&mut self, metadata: ExamMetadata) {
        self.metadata = metadata;
    }

    // ========== 查询 ==========

    pub fn metadata(&self) -> &ExamMetadata {
        &self.metadata
    }

    pub fn store(&self) -> &TopicConfigStore {
        &self.store
    }

    pub fn configured_marks(&self) -> i128 {
        self.marks.current()
    }

    pub fn blueprint_id(&self) -> Option<&str> {
        self.blueprint_id.as_deref()
    }

    /// 增量总分是否与全量重算一致
    pub fn is_consistent(&self) -> bool {
        self.marks.is_consistent_with(&self.store)
    }

    pub fn marks_status(&self) -> MarksStatus {
        self.marks.status(self.metadata.target_marks())
    }

    pub fn validation(&self) -> ValidationState {
        ValidationState {
            marks: self.marks_status(),
            missing_fields: self.metadata.missing_fields(),
            missing_save_fields: self.metadata.missing_save_fields(),
            topic_count: self.store.len(),
        }
    }

    pub fn can_generate(&self) -> bool {
        self.validation().can_generate()
    }

    pub fn can_save(&self) -> bool {
        self.validation().can_save()
    }

    /// 派生并按题型分组的蓝图
    pub fn derive_blueprint(&self) -> Vec<QuestionRequest> {
        self.derive_blueprint_with(&TypeOrder::default())
    }

    pub fn derive_blueprint_with(&self, order: &TypeOrder) -> Vec<QuestionRequest> {
        deriver::reorder_with(&deriver::derive(&self.store), order)
    }

    /// 保存 / 更新蓝图的请求体；校验未通过时返回 None
    pub fn save_payload(&self) -> Option<SaveBlueprintPayload> {
        if !self.can_save() {
            return None;
        }
        persistence::save_payload(&self.metadata, &self.store)
    }

    // ========== 加载 / 生命周期 ==========

    pub fn fingerprint(&self) -> SessionFingerprint {
        SessionFingerprint {
            epoch: self.epoch,
            blueprint_id: self.pending_load.clone(),
            standard_grade: self.metadata.standard_grade,
            subject: self.metadata.subject.clone(),
        }
    }

    /// 开始加载蓝图；之前发放的票据全部失效
    pub fn begin_load(&mut self, blueprint_id: &str) -> LoadTicket {
        self.epoch += 1;
        self.pending_load = Some(blueprint_id.to_string());
        LoadTicket {
            fingerprint: self.fingerprint(),
        }
    }

    /// 完成加载：指纹匹配时整体替换配置并重算总分，否则丢弃
    pub fn complete_load(&mut self, ticket: &LoadTicket, saved: SavedBlueprint) -> LoadOutcome {
        if ticket.fingerprint != self.fingerprint() {
            debug!("丢弃过期的蓝图响应: {}", ticket.blueprint_id());
            return LoadOutcome::Stale;
        }
        if saved.id != ticket.blueprint_id() {
            warn!(
                "蓝图响应ID不匹配: 请求 {}, 返回 {}",
                ticket.blueprint_id(),
                saved.id
            );
            return LoadOutcome::Stale;
        }

        self.store = persistence::load_from_save_format(&saved.breakdown);
        self.marks.reseed(&self.store);

        self.metadata.title = saved.name;
        self.metadata.standard_grade = Some(saved.grade).filter(|g| *g > 0);
        self.metadata.subject = saved.subject;
        self.metadata.total_marks = Some(saved.total_marks).filter(|m| *m > 0);

        self.blueprint_id = Some(saved.id);
        self.pending_load = None;

        info!(
            "✓ 已加载蓝图 {} ({} 个知识点, 总分 {})",
            self.blueprint_id.as_deref().unwrap_or_default(),
            self.store.len(),
            self.marks.current()
        );
        LoadOutcome::Applied
    }

    /// 记录保存后的蓝图ID，后续保存走更新
    pub fn mark_saved(&mut self, blueprint_id: impl Into<String>) {
        self.blueprint_id = Some(blueprint_id.into());
    }

    /// 生成或保存成功后丢弃配置（试卷信息保留）
    pub fn discard_configuration(&mut self) {
        self.epoch += 1;
        self.store.clear();
        self.marks.reseed(&self.store);
        self.blueprint_id = None;
        self.pending_load = None;
    }

    /// 开始一张新试卷
    pub fn reset(&mut self, metadata: ExamMetadata) {
        self.discard_configuration();
        self.metadata = metadata;
    }
}
