use crate::config::{RetrievalMode, Settings};
use crate::error::{KnowledgeBaseError, PipelineError};
use crate::llm::{GenerativeModel, OpenRouterModel};
use crate::models::{AnalysisRequest, AnalysisResult};
use crate::tasks::response::PARSE_FAILURE_FINDINGS;
use crate::tasks::{
    KnowledgeBase, Upload, assemble_prompt, parse_model_response, sanitize_text,
};
use std::sync::Arc;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

/// Runs the triage pipeline. Cheap to clone; the knowledge base and model
/// client are shared read-only across requests.
#[derive(Clone)]
pub struct TriageService {
    knowledge: Arc<KnowledgeBase>,
    model: Arc<dyn GenerativeModel>,
    retrieval: RetrievalMode,
}

impl TriageService {
    pub fn new(
        knowledge: Arc<KnowledgeBase>,
        model: Arc<dyn GenerativeModel>,
        retrieval: RetrievalMode,
    ) -> Self {
        Self {
            knowledge,
            model,
            retrieval,
        }
    }

    /// Load the knowledge base and build the OpenRouter client from settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, KnowledgeBaseError> {
        let knowledge = KnowledgeBase::load(&settings.knowledge_base_path)?;
        Ok(Self::new(
            Arc::new(knowledge),
            Arc::new(OpenRouterModel::new(settings)),
            settings.retrieval,
        ))
    }

    /// Analyze a query and optional upload. Always returns a well-formed
    /// result; failures become the fallback object.
    pub async fn analyze(&self, request: AnalysisRequest) -> AnalysisResult {
        let span = info_span!("analyze", request_id = %Uuid::new_v4());

        async move {
            info!("Received analysis request");
            match self.run_pipeline(&request).await {
                Ok(result) => {
                    info!(is_emergency = result.is_emergency, "Analysis completed");
                    result
                }
                Err(PipelineError::Parse(e)) => {
                    error!("Could not parse model response: {}", e);
                    AnalysisResult::fallback(PARSE_FAILURE_FINDINGS)
                }
                Err(e) => {
                    error!("Analysis pipeline failed: {}", e);
                    AnalysisResult::fallback(format!("AI Error: {}", e))
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run_pipeline(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, PipelineError> {
        let safe_query = sanitize_text(&request.query);

        let context = match self.retrieval {
            RetrievalMode::Disabled => None,
            mode => Some(self.knowledge.retrieve(&safe_query, mode)),
        };

        let upload = request.file_bytes().map(|bytes| Upload {
            bytes,
            content_type: request.content_type.as_deref(),
        });

        let content = assemble_prompt(&safe_query, context.as_deref(), upload).await?;
        let raw = self.model.generate(&content).await?;
        info!("Model returned {} characters", raw.len());

        Ok(parse_model_response(&raw)?)
    }
}
