pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod service;
pub mod tasks;

pub use config::{RetrievalMode, Settings};
pub use error::PipelineError;
pub use llm::{GenerativeModel, OpenRouterModel};
pub use models::*;
pub use service::TriageService;
