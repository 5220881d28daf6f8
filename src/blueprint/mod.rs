pub mod accumulator;
pub mod deriver;
pub mod session;
pub mod store;

pub use accumulator::{MarksAccumulator, MarksStatus};
pub use deriver::{derive, reorder_by_type, reorder_with, BlueprintSummary, TypeOrder};
pub use session::{ConfigSession, LoadOutcome, LoadTicket, SessionFingerprint, ValidationState};
pub use store::{DescriptiveField, MarksDelta, TopicConfigStore, TopicEdit};
