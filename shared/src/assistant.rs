//! Rule-based chat replies and journal suggestions.

use tracing::info;

use crate::context::extract_context;
use crate::models::{ChatRequest, ChatResponse, JournalRequest, JournalResponse};
use crate::responses::ResponseCatalog;
use crate::sentiment::SentimentClassifier;
use crate::{Error, Result};

/// Classifier and response pools, built once per cold start.
#[derive(Debug, Clone)]
pub struct Assistant {
    classifier: SentimentClassifier,
    catalog: ResponseCatalog,
}

impl Assistant {
    pub fn new(classifier: SentimentClassifier, catalog: ResponseCatalog) -> Self {
        Self {
            classifier,
            catalog,
        }
    }

    /// Default keyword tables and the built-in response copy.
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(SentimentClassifier::default(), ResponseCatalog::builtin()?))
    }

    pub fn respond(&self, request: &ChatRequest) -> ChatResponse {
        let sentiment = self.classifier.classify_chat(&request.message);
        let context = extract_context(&request.previous_messages);
        let text = self.catalog.chat_response(sentiment, context).to_string();

        info!(
            sentiment = sentiment.as_str(),
            context = context.as_str(),
            history = request.previous_messages.len(),
            "Selected chat response"
        );

        ChatResponse {
            response_text: text.clone(),
            response: text,
            sentiment,
            context,
        }
    }

    pub fn suggest(&self, request: &JournalRequest) -> Result<JournalResponse> {
        if request.content.is_empty() {
            return Err(Error::Validation("No journal content provided".to_string()));
        }

        let sentiment = self.classifier.classify_journal(&request.content);
        let text = self.catalog.journal_suggestion(sentiment).to_string();

        info!(sentiment = sentiment.as_str(), "Selected journal suggestion");

        Ok(JournalResponse {
            suggestion_text: text.clone(),
            suggestion: text,
            sentiment,
        })
    }

    pub fn catalog(&self) -> &ResponseCatalog {
        &self.catalog
    }
}
