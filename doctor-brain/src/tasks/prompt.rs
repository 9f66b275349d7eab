use super::document_extract::extract_document_text;
use super::image_normalize::normalize_image;
use super::pdf_rasterize::rasterize_pdf;
use crate::error::ImageProcessingError;
use crate::models::PromptContent;
use image::DynamicImage;
use tracing::{info, warn};

pub const SYSTEM_PROMPT: &str = r#"
You are a conservative medical AI assistant.
Use the [RETRIEVED CONTEXT] below to inform your analysis, but prioritize patient safety.
When in doubt, recommend seeing a doctor and set is_emergency to true for any sign of a medical emergency.
Analyze the input and return ONLY valid JSON matching this schema:
{
    "findings": "str",
    "potential_diagnosis": "str",
    "remedies": ["str"],
    "diet_plan": ["str"],
    "is_emergency": bool
}
Do not use markdown formatting. Just raw JSON.
"#;

pub const PDF_CONVERSION_FAILED: &str = "[PDF DOCUMENT: could not convert PDF to images]";

/// Which stage handles an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRoute {
    Pdf,
    Image,
    Document,
}

impl FileRoute {
    /// PDF beats image beats everything else.
    pub fn from_content_type(content_type: &str) -> Self {
        let mime = content_type.trim().to_ascii_lowercase();
        if mime.contains("pdf") {
            Self::Pdf
        } else if mime.starts_with("image/") {
            Self::Image
        } else {
            Self::Document
        }
    }
}

/// An uploaded file with its declared content type.
#[derive(Debug, Clone, Copy)]
pub struct Upload<'a> {
    pub bytes: &'a [u8],
    pub content_type: Option<&'a str>,
}

/// Build the ordered prompt: instructions, retrieved context, query, then any
/// file-derived parts.
///
/// Only image decoding can fail here. PDF and document problems are folded
/// into explanatory text so the request still reaches the model.
pub async fn assemble_prompt(
    safe_query: &str,
    context: Option<&str>,
    upload: Option<Upload<'_>>,
) -> Result<PromptContent, ImageProcessingError> {
    let mut content = PromptContent::new();
    content.push_text(SYSTEM_PROMPT);

    let query_block = match context {
        Some(context) => format!(
            "[RETRIEVED CONTEXT FROM DATABASE]\n{}\n\n[PATIENT QUERY]\n{}",
            context, safe_query
        ),
        None => format!("[PATIENT QUERY]\n{}", safe_query),
    };
    content.push_text(query_block);

    let Some(upload) = upload else {
        return Ok(content);
    };

    let content_type = upload.content_type.unwrap_or_default();
    let route = FileRoute::from_content_type(content_type);
    info!(
        "Routing {} byte upload ({}) to {:?}",
        upload.bytes.len(),
        content_type,
        route
    );

    match route {
        FileRoute::Pdf => {
            let pages = rasterize_pdf(upload.bytes.to_vec()).await;
            push_pdf_pages(&mut content, pages);
        }
        FileRoute::Image => {
            content.push_image(normalize_image(upload.bytes)?);
        }
        FileRoute::Document => {
            let text = extract_document_text(upload.bytes, content_type).unwrap_or_else(|e| {
                warn!("Document extraction failed: {}", e);
                e.to_string()
            });
            content.push_text(format!("[DOCUMENT CONTENT]\n{}", text));
        }
    }

    Ok(content)
}

/// A page-count marker followed by the pages in order, or the conversion
/// failure marker when nothing was rendered.
fn push_pdf_pages(content: &mut PromptContent, pages: Vec<DynamicImage>) {
    if pages.is_empty() {
        content.push_text(PDF_CONVERSION_FAILED);
        return;
    }
    content.push_text(format!("[PDF DOCUMENT: {} PAGES]", pages.len()));
    for page in pages {
        content.push_image(page);
    }
}
