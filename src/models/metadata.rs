use serde::{Deserialize, Serialize};

/// 试卷基本信息
///
/// `total_marks` 是校验的唯一依据；为空时无法进行分数校验。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub academy_name: String,
    #[serde(default)]
    pub standard_grade: Option<u32>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub total_marks: Option<u32>,
    #[serde(default)]
    pub time_duration: String,
    #[serde(default = "default_number_of_sets")]
    pub number_of_sets: u32,
    #[serde(default)]
    pub additional_instructions: String,
}

fn default_number_of_sets() -> u32 {
    1
}

impl Default for ExamMetadata {
    fn default() -> Self {
        Self {
            title: String::new(),
            academy_name: String::new(),
            standard_grade: None,
            subject: String::new(),
            total_marks: None,
            time_duration: String::new(),
            number_of_sets: default_number_of_sets(),
            additional_instructions: String::new(),
        }
    }
}

/// 必填项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    Title,
    Standard,
    Subject,
    TotalMarks,
    TimeDuration,
}

impl RequiredField {
    pub fn name(self) -> &'static str {
        match self {
            RequiredField::Title => "title",
            RequiredField::Standard => "standard",
            RequiredField::Subject => "subject",
            RequiredField::TotalMarks => "totalMarks",
            RequiredField::TimeDuration => "timeDuration",
        }
    }
}

impl std::fmt::Display for RequiredField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl ExamMetadata {
    /// 目标总分（0 视为未填写）
    pub fn target_marks(&self) -> Option<u32> {
        self.total_marks.filter(|m| *m > 0)
    }

    /// 生成试卷前缺少的必填项
    pub fn missing_fields(&self) -> Vec<RequiredField> {
        let mut missing = self.missing_save_fields();
        if self.time_duration.trim().is_empty() {
            missing.push(RequiredField::TimeDuration);
        }
        missing
    }

    /// 保存蓝图前缺少的必填项（不要求考试时长）
    pub fn missing_save_fields(&self) -> Vec<RequiredField> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push(RequiredField::Title);
        }
        if self.standard_grade.is_none() {
            missing.push(RequiredField::Standard);
        }
        if self.subject.trim().is_empty() {
            missing.push(RequiredField::Subject);
        }
        if self.target_marks().is_none() {
            missing.push(RequiredField::TotalMarks);
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> ExamMetadata {
        ExamMetadata {
            title: "Unit Test 1".to_string(),
            academy_name: "Sunrise Academy".to_string(),
            standard_grade: Some(10),
            subject: "Mathematics".to_string(),
            total_marks: Some(80),
            time_duration: "3 hours".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_metadata_has_no_missing_fields() {
        assert!(complete().missing_fields().is_empty());
        assert_eq!(complete().number_of_sets, 1);
    }

    #[test]
    fn test_missing_fields() {
        let meta = ExamMetadata::default();
        assert_eq!(
            meta.missing_fields(),
            vec![
                RequiredField::Title,
                RequiredField::Standard,
                RequiredField::Subject,
                RequiredField::TotalMarks,
                RequiredField::TimeDuration,
            ]
        );

        let mut meta = complete();
        meta.time_duration = "   ".to_string();
        assert_eq!(meta.missing_fields(), vec![RequiredField::TimeDuration]);
        assert!(meta.missing_save_fields().is_empty());
    }

    #[test]
    fn test_zero_total_marks_counts_as_missing() {
        let mut meta = complete();
        meta.total_marks = Some(0);
        assert_eq!(meta.target_marks(), None);
        assert_eq!(meta.missing_fields(), vec![RequiredField::TotalMarks]);
    }
}
