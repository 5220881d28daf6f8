pub mod difficulty;
pub mod loaders;
pub mod metadata;
pub mod plan;
pub mod question;
pub mod saved;
pub mod section;
pub mod topic;

pub use difficulty::Difficulty;
pub use loaders::{load_all_plans, load_plan};
pub use metadata::{ExamMetadata, RequiredField};
pub use plan::{ExamPlan, PlanAction, PlanDescriptive, PlanTopic};
pub use question::{QuestionRequest, QuestionType};
pub use saved::{BreakdownEntry, DescriptiveQuestionConfig, SaveBlueprintPayload, SavedBlueprint};
pub use section::{DeleteQuestionPayload, Question, Section, SectionsPayload};
pub use topic::{DescriptiveGroup, McqConfig, TopicConfig};
