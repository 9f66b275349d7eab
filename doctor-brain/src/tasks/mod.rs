pub mod context_retrieval;
pub mod document_extract;
pub mod image_normalize;
pub mod pdf_rasterize;
pub mod prompt;
pub mod response;
pub mod sanitize;

pub use context_retrieval::KnowledgeBase;
pub use document_extract::extract_document_text;
pub use image_normalize::normalize_image;
pub use pdf_rasterize::rasterize_pdf;
pub use prompt::{Upload, assemble_prompt};
pub use response::parse_model_response;
pub use sanitize::sanitize_text;
