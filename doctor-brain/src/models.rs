use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// One inbound `analyze` call. Consumed once by the service.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub query: String,
    pub file: Option<Vec<u8>>,
    pub content_type: Option<String>,
}

impl AnalysisRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            file: None,
            content_type: None,
        }
    }

    pub fn with_file(mut self, file: Vec<u8>, content_type: Option<String>) -> Self {
        self.file = Some(file);
        self.content_type = content_type;
        self
    }

    /// The uploaded bytes, treating an empty buffer as no upload.
    pub fn file_bytes(&self) -> Option<&[u8]> {
        self.file.as_deref().filter(|bytes| !bytes.is_empty())
    }
}

/// A topic in the local medical knowledge base.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// A single element of the prompt sent to the model.
#[derive(Debug, Clone)]
pub enum PromptPart {
    Text(String),
    Image(DynamicImage),
}

/// Ordered prompt parts. Order is what the model sees first.
#[derive(Debug, Clone, Default)]
pub struct PromptContent {
    parts: Vec<PromptPart>,
}

impl PromptContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.parts.push(PromptPart::Text(text.into()));
    }

    pub fn push_image(&mut self, image: DynamicImage) {
        self.parts.push(PromptPart::Image(image));
    }

    pub fn parts(&self) -> &[PromptPart] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn image_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|part| matches!(part, PromptPart::Image(_)))
            .count()
    }
}

/// Structured triage output. Every field is required when deserializing a
/// model reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub findings: String,
    pub potential_diagnosis: String,
    pub remedies: Vec<String>,
    pub diet_plan: Vec<String>,
    pub is_emergency: bool,
}

impl AnalysisResult {
    pub const UNKNOWN_DIAGNOSIS: &'static str = "Unknown";

    /// The canned result returned whenever any pipeline stage fails.
    pub fn fallback(findings: impl Into<String>) -> Self {
        Self {
            findings: findings.into(),
            potential_diagnosis: Self::UNKNOWN_DIAGNOSIS.to_string(),
            remedies: Vec::new(),
            diet_plan: Vec::new(),
            is_emergency: false,
        }
    }

    /// Shape check only: a genuine reply with an "Unknown" diagnosis and
    /// empty lists looks the same.
    #[cfg(test)]
    pub fn is_fallback(&self) -> bool {
        self.potential_diagnosis == Self::UNKNOWN_DIAGNOSIS
            && self.remedies.is_empty()
            && self.diet_plan.is_empty()
            && !self.is_emergency
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_upload_is_no_file() {
        let request = AnalysisRequest::new("rash").with_file(Vec::new(), Some("image/png".into()));
        assert!(request.file_bytes().is_none());

        let request = AnalysisRequest::new("rash").with_file(vec![1, 2], None);
        assert_eq!(request.file_bytes(), Some(&[1u8, 2][..]));
    }

    #[test]
    fn test_fallback_shape() {
        let result = AnalysisResult::fallback("AI Error: boom");
        let value = serde_json::to_value(&result).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 5);
        assert_eq!(object["potential_diagnosis"], "Unknown");
        assert_eq!(object["is_emergency"], false);
        assert!(object["remedies"].as_array().unwrap().is_empty());
        assert!(result.is_fallback());
    }

    #[test]
    fn test_knowledge_entry_missing_fields_default() {
        let entry: KnowledgeEntry = serde_json::from_str(r#"{"title":"A1C"}"#).unwrap();
        assert_eq!(entry.title, "A1C");
        assert!(entry.content.is_empty());
    }
}
