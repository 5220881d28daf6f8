//! 试卷分区排序
//!
//! 编辑页中一张试卷（`doc_id`）的分区和题目顺序。
//! 本地修改先生效（乐观更新），再提交到存储；提交失败时保留本地顺序，
//! 并把状态标记为 `StaleWarning`，由调用方提示用户。

use crate::error::{AppError, AppResult, BusinessError};
use crate::models::difficulty::Difficulty;
use crate::models::section::{DeleteQuestionPayload, Question, Section, SectionsPayload};
use crate::services::backend::SectionBackend;
use tracing::{debug, error, info};

/// 与存储的同步状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// 与存储一致
    Clean,
    /// 有本地修改尚未提交
    Reordering,
    /// 提交失败，本地顺序保留但与存储不一致
    StaleWarning,
}

/// 题目编辑（未设置的字段保持不变）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionEdit {
    pub question_text: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub marks: Option<u32>,
    pub options: Option<Vec<String>>,
    pub image_url: Option<Option<String>>,
}

/// 分区排序仓库
#[derive(Debug, Clone)]
pub struct SectionOrderStore {
    doc_id: String,
    sections: Vec<Section>,
    state: SyncState,
}

impl SectionOrderStore {
    /// 以已持久化的分区创建（初始状态为 Clean）
    pub fn new(doc_id: impl Into<String>, sections: Vec<Section>) -> Self {
        Self {
            doc_id: doc_id.into(),
            sections,
            state: SyncState::Clean,
        }
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn question_count(&self) -> usize {
        self.sections.iter().map(|s| s.questions.len()).sum()
    }

    pub fn total_marks(&self) -> u64 {
        self.sections.iter().map(Section::total_marks).sum()
    }

    /// 查找题目所在位置 (分区下标, 题目下标)
    pub fn locate(&self, question_id: &str) -> Option<(usize, usize)> {
        self.sections
            .iter()
            .enumerate()
            .find_map(|(si, section)| section.position_of(question_id).map(|qi| (si, qi)))
    }

    /// 同一分区内移动题目：从 `from` 取出，插入到 `to`
    ///
    /// 下标越界或 `from == to` 时不做任何事，返回 false。
    pub fn reorder(&mut self, section_index: usize, from: usize, to: usize) -> bool {
        let Some(section) = self.sections.get_mut(section_index) else {
            debug!("分区下标越界: {}", section_index);
            return false;
        };
        let len = section.questions.len();
        if from >= len || to >= len || from == to {
            return false;
        }

        let question = section.questions.remove(from);
        section.questions.insert(to, question);
        self.state = SyncState::Reordering;
        true
    }

    /// 拖拽移动：跨分区移动不支持，保持为空操作
    pub fn move_question(
        &mut self,
        from_section: usize,
        from: usize,
        to_section: usize,
        to: usize,
    ) -> bool {
        if from_section != to_section {
            debug!(
                "忽略跨分区移动: 分区 {} → 分区 {}",
                from_section, to_section
            );
            return false;
        }
        self.reorder(from_section, from, to)
    }

    /// 按ID删除题目；没有任何分区包含该ID时返回 NotFound 且不做修改
    pub fn delete(&mut self, question_id: &str) -> AppResult<Question> {
        let (si, qi) = self
            .locate(question_id)
            .ok_or_else(|| AppError::question_not_found(question_id))?;
        let removed = self.sections[si].questions.remove(qi);
        self.state = SyncState::Reordering;
        Ok(removed)
    }

    /// 编辑题目内容
    pub fn update_question(&mut self, question_id: &str, edit: QuestionEdit) -> AppResult<()> {
        let (si, qi) = self
            .locate(question_id)
            .ok_or_else(|| AppError::question_not_found(question_id))?;
        let question = &mut self.sections[si].questions[qi];

        if let Some(text) = edit.question_text {
            question.question_text = text;
        }
        if let Some(difficulty) = edit.difficulty {
            question.difficulty = difficulty;
        }
        if let Some(marks) = edit.marks {
            question.marks = marks;
        }
        if let Some(options) = edit.options {
            question.options = Some(options);
        }
        if let Some(image_url) = edit.image_url {
            question.image_url = image_url;
        }
        self.state = SyncState::Reordering;
        Ok(())
    }

    /// 当前完整分区列表的保存请求体
    pub fn payload(&self) -> SectionsPayload {
        SectionsPayload {
            id: self.doc_id.clone(),
            sections: self.sections.clone(),
        }
    }

    /// 提交当前顺序
    ///
    /// 成功 → Clean；失败 → StaleWarning，本地顺序不回滚，错误返回给调用方。
    pub async fn commit<B>(&mut self, backend: &B) -> AppResult<()>
    where
        B: SectionBackend + ?Sized,
    {
        if self.doc_id.trim().is_empty() {
            return Err(BusinessError::EmptyDocId.into());
        }

        let payload = self.payload();
        match backend.save_sections(&payload).await {
            Ok(()) => {
                self.state = SyncState::Clean;
                info!("✓ 试卷 {} 分区顺序已保存", self.doc_id);
                Ok(())
            }
            Err(e) => {
                self.state = SyncState::StaleWarning;
                error!("❌ 试卷 {} 分区顺序保存失败，本地顺序已保留: {}", self.doc_id, e);
                Err(e)
            }
        }
    }

    /// 移动后立即提交；未发生移动时不提交，返回 Ok(false)
    pub async fn reorder_and_commit<B>(
        &mut self,
        backend: &B,
        section_index: usize,
        from: usize,
        to: usize,
    ) -> AppResult<bool>
    where
        B: SectionBackend + ?Sized,
    {
        if !self.reorder(section_index, from, to) {
            return Ok(false);
        }
        self.commit(backend).await?;
        Ok(true)
    }

    /// 先删除远端题目，成功后再删除本地题目
    ///
    /// 本地不存在时直接返回 NotFound，不发请求；远端失败时本地不变。
    pub async fn delete_and_sync<B>(&mut self, backend: &B, question_id: &str) -> AppResult<Question>
    where
        B: SectionBackend + ?Sized,
    {
        if self.locate(question_id).is_none() {
            return Err(AppError::question_not_found(question_id));
        }

        let payload = DeleteQuestionPayload {
            question_id: question_id.to_string(),
            question_paper_id: self.doc_id.clone(),
        };
        backend.delete_question(&payload).await?;

        // 远端删除不会保存未提交的排序，删除前的同步状态保持不变
        let state = self.state;
        let removed = self.delete(question_id)?;
        self.state = state;
        Ok(removed)
    }
}
