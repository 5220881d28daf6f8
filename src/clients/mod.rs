pub mod paper_api_client;

pub use paper_api_client::PaperApiClient;
