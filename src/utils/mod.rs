pub mod lenient;
pub mod logging;

pub use lenient::{coerce_count, IntoCount};
pub use logging::truncate_text;
