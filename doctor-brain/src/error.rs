use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageProcessingError {
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image rebuild failed: pixel buffer does not match {width}x{height}")]
    Rebuild { width: u32, height: u32 },
}

#[derive(Debug, Error)]
pub enum RasterizeError {
    #[error("failed to load PDF: {0}")]
    Load(String),

    #[error("failed to render PDF pages: {0}")]
    Render(String),

    #[error("rasterize task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Error reading text file: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Error reading Word document: {0}")]
    Docx(String),

    #[error("Unsupported document type: {0}")]
    UnsupportedContentType(String),
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model request failed with status {0}")]
    Status(reqwest::StatusCode),

    #[error("invalid response format from model")]
    InvalidResponse,

    #[error("failed to encode prompt image: {0}")]
    ImageEncoding(#[from] image::ImageError),
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("response is not valid JSON: {0}")]
    Json(serde_json::Error),

    #[error("response does not match the result schema: {0}")]
    Schema(serde_json::Error),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Image processing failed: {0}")]
    ImageProcessing(#[from] ImageProcessingError),

    #[error("{0}")]
    Model(#[from] ModelError),

    #[error("{0}")]
    Parse(#[from] ParseError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum KnowledgeBaseError {
    #[error("failed to read knowledge base: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse knowledge base: {0}")]
    Json(#[from] serde_json::Error),
}
