use crate::config::RetrievalMode;
use crate::error::KnowledgeBaseError;
use crate::models::KnowledgeEntry;
use std::path::Path;
use tracing::{info, warn};

pub const NO_DATABASE: &str = "No specific medical database available.";
pub const NO_TOPIC_FOUND: &str = "No specific medical topic found in database.";

/// Content-match passages are cut to this many characters.
pub const MAX_CONTENT_CHARS: usize = 2000;

/// Read-only topic list loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    pub fn new(entries: Vec<KnowledgeEntry>) -> Self {
        Self { entries }
    }

    /// Load a JSON array of `{title, content}` objects. A missing file gives
    /// an empty base.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, KnowledgeBaseError> {
        let path = path.as_ref();
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "{} not found, running without retrieved context",
                    path.display()
                );
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let entries: Vec<KnowledgeEntry> = serde_json::from_str(&raw)?;
        info!("Medical knowledge base loaded: {} topics", entries.len());
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the passage for a sanitized query. First match in list order wins
    /// and title matches beat content matches.
    pub fn retrieve(&self, query: &str, mode: RetrievalMode) -> String {
        if self.entries.is_empty() {
            return NO_DATABASE.to_string();
        }

        let query_lower = query.to_lowercase();

        // An untitled entry matches every query.
        let title_hit = self
            .entries
            .iter()
            .find(|entry| query_lower.contains(&entry.title.to_lowercase()));
        if let Some(entry) = title_hit {
            info!("Context retrieved by title match");
            return entry.content.clone();
        }

        if mode == RetrievalMode::TitleAndContent {
            let content_hit = self
                .entries
                .iter()
                .find(|entry| entry.content.to_lowercase().contains(&query_lower));
            if let Some(entry) = content_hit {
                info!("Context retrieved by content match");
                return entry.content.chars().take(MAX_CONTENT_CHARS).collect();
            }
        }

        NO_TOPIC_FOUND.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn entry(title: &str, content: &str) -> KnowledgeEntry {
        KnowledgeEntry {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_title_match_returns_full_content() {
        let long = "A1C measures average blood sugar. ".repeat(100);
        let kb = KnowledgeBase::new(vec![entry("Cholesterol", "Lipids."), entry("A1C", &long)]);

        assert_eq!(kb.retrieve("What is a1c?", RetrievalMode::TitleAndContent), long);
    }

    #[test]
    fn test_title_match_beats_earlier_content_match() {
        let kb = KnowledgeBase::new(vec![
            entry("Fasting", "An a1c test does not require fasting."),
            entry("A1C", "Hemoglobin A1C."),
        ]);
        assert_eq!(kb.retrieve("a1c test", RetrievalMode::TitleAndContent), "Hemoglobin A1C.");
    }

    #[test]
    fn test_content_match_truncated() {
        let content = format!("The diabetes test is simple. {}", "x".repeat(5000));
        let kb = KnowledgeBase::new(vec![entry("A1C", &content)]);

        let context = kb.retrieve("Diabetes Test", RetrievalMode::TitleAndContent);
        assert_eq!(context.chars().count(), MAX_CONTENT_CHARS);
        assert!(content.starts_with(&context));
    }

    #[test]
    fn test_title_only_mode_skips_content() {
        let kb = KnowledgeBase::new(vec![entry("A1C", "The diabetes test is simple.")]);
        assert_eq!(kb.retrieve("diabetes test", RetrievalMode::TitleOnly), NO_TOPIC_FOUND);
    }

    #[test]
    fn test_sentinels() {
        let empty = KnowledgeBase::default();
        assert_eq!(empty.retrieve("anything", RetrievalMode::TitleAndContent), NO_DATABASE);

        let kb = KnowledgeBase::new(vec![entry("A1C", "Blood sugar.")]);
        assert_eq!(
            kb.retrieve("broken arm", RetrievalMode::TitleAndContent),
            NO_TOPIC_FOUND
        );
        assert_eq!(kb.retrieve("", RetrievalMode::TitleOnly), NO_TOPIC_FOUND);
    }

    #[test]
    fn test_empty_query_matches_first_content() {
        let long = "y".repeat(3000);
        let kb = KnowledgeBase::new(vec![entry("A1C", &long), entry("Flu", "Influenza.")]);

        let context = kb.retrieve("", RetrievalMode::TitleAndContent);
        assert_eq!(context, "y".repeat(MAX_CONTENT_CHARS));

        let kb = KnowledgeBase::new(vec![entry("A1C", "Blood sugar.")]);
        assert_eq!(kb.retrieve("", RetrievalMode::TitleAndContent), "Blood sugar.");
    }

    #[test]
    fn test_untitled_entry_matches_any_query() {
        let kb = KnowledgeBase::new(vec![entry("", "General advice."), entry("Flu", "Influenza.")]);
        assert_eq!(kb.retrieve("headache", RetrievalMode::TitleOnly), "General advice.");
        assert_eq!(kb.retrieve("flu symptoms", RetrievalMode::TitleOnly), "General advice.");

        let kb = KnowledgeBase::new(vec![entry("Flu", "Influenza."), entry("", "General advice.")]);
        assert_eq!(kb.retrieve("flu symptoms", RetrievalMode::TitleOnly), "Influenza.");
    }

    #[test]
    fn test_load_from_file() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, r#"[{{"title":"A1C","content":"Blood sugar."}},{{"title":"Flu"}}]"#)?;

        let kb = KnowledgeBase::load(file.path())?;
        assert_eq!(kb.len(), 2);
        assert_eq!(kb.retrieve("flu", RetrievalMode::TitleOnly), "");
        Ok(())
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let kb = KnowledgeBase::load("/nonexistent/medical_knowledge.json").unwrap();
        assert!(kb.is_empty());
    }

    #[test]
    fn test_load_malformed_file() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, "{{not json")?;

        let err = KnowledgeBase::load(file.path()).unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::Json(_)));
        Ok(())
    }
}
