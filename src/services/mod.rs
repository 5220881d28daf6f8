pub mod backend;
pub mod generation_request;
pub mod persistence;

pub use backend::{BlueprintBackend, GenerationBackend, SectionBackend};
pub use generation_request::{GenerationRequest, GenerationRequestBuilder};
pub use persistence::{derive_save_format, load_from_save_format};
