use super::sanitize::sanitize_text;
use crate::error::ExtractionError;
use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};
use tracing::info;

/// Document formats with a text extraction path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Word,
    PlainText,
}

impl DocumentKind {
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type.trim().to_ascii_lowercase();
        if mime.contains("wordprocessingml") || mime == "application/msword" {
            Some(Self::Word)
        } else if mime.starts_with("text/") {
            Some(Self::PlainText)
        } else {
            None
        }
    }
}

/// Pull sanitized plain text out of a Word or text upload.
pub fn extract_document_text(bytes: &[u8], content_type: &str) -> Result<String, ExtractionError> {
    let kind = DocumentKind::from_content_type(content_type)
        .ok_or_else(|| ExtractionError::UnsupportedContentType(content_type.to_string()))?;

    let text = match kind {
        DocumentKind::Word => extract_docx_paragraphs(bytes)?,
        DocumentKind::PlainText => String::from_utf8(bytes.to_vec())?,
    };

    info!("Extracted {} characters from {:?} document", text.len(), kind);
    Ok(sanitize_text(&text))
}

fn extract_docx_paragraphs(bytes: &[u8]) -> Result<String, ExtractionError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                match run_child {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    _ => {}
                }
            }
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Run};
    use std::io::Cursor;

    fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = Docx::new();
        for text in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
        }
        let mut buf = Cursor::new(Vec::new());
        docx.build().pack(&mut buf).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_kind_detection() {
        assert_eq!(
            DocumentKind::from_content_type(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            ),
            Some(DocumentKind::Word)
        );
        assert_eq!(
            DocumentKind::from_content_type("text/plain; charset=utf-8"),
            Some(DocumentKind::PlainText)
        );
        assert_eq!(DocumentKind::from_content_type("application/zip"), None);
    }

    #[test]
    fn test_plain_text_is_sanitized() {
        let text = extract_document_text(
            "Lab results for jo@clinic.org\nGlucose 140".as_bytes(),
            "text/plain",
        )
        .unwrap();
        assert_eq!(text, "Lab results for [REDACTED_EMAIL]\nGlucose 140");
    }

    #[test]
    fn test_invalid_utf8() {
        let err = extract_document_text(&[0xff, 0xfe, 0xfd], "text/plain").unwrap_err();
        assert!(matches!(err, ExtractionError::InvalidUtf8(_)));
        assert!(err.to_string().starts_with("Error reading text file"));
    }

    #[test]
    fn test_docx_paragraphs_joined_with_newlines() {
        let bytes = build_docx(&["Patient notes", "Call 555-123-4567 for results"]);
        let text = extract_document_text(
            &bytes,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        )
        .unwrap();
        assert_eq!(text, "Patient notes\nCall [REDACTED_PHONE] for results");
    }

    #[test]
    fn test_corrupt_docx() {
        let err = extract_document_text(b"not a zip archive", "application/msword").unwrap_err();
        assert!(matches!(err, ExtractionError::Docx(_)));
    }

    #[test]
    fn test_unsupported_type() {
        let err = extract_document_text(b"PK..", "application/zip").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedContentType(_)));
    }
}
