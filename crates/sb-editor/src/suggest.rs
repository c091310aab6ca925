//! Seam to the external text/image suggestion service.
//!
//! Both calls are opaque, fallible and asynchronous. Nothing is retried; a
//! failure leaves the node as it was.

use async_trait::async_trait;
use sb_core::props::{NodeProps, PropValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SuggestError {
    #[error("suggestion service unavailable: {0}")]
    Transport(String),
    #[error("malformed suggestion: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRequest {
    pub prompt: String,
    pub node_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSuggestion {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl TextSuggestion {
    /// Decode and check a service response.
    pub fn from_json(json: &str) -> Result<Self, SuggestError> {
        let s: Self = serde_json::from_str(json).map_err(|e| SuggestError::Malformed(e.to_string()))?;
        if s.title.trim().is_empty() && s.description.trim().is_empty() {
            return Err(SuggestError::Malformed("empty suggestion".into()));
        }
        Ok(s)
    }

    /// Prop assignments this suggestion makes on `props`: the title goes to
    /// the title-like field, the description (or the title when there is
    /// none) to the body field. Types with neither get nothing.
    pub fn assignments(&self, props: &NodeProps) -> Vec<(String, PropValue)> {
        let (title_key, body_key) = props.suggestion_slots();
        let body = if self.description.trim().is_empty() {
            &self.title
        } else {
            &self.description
        };
        title_key
            .map(|k| (k.to_owned(), PropValue::from(self.title.as_str())))
            .into_iter()
            .chain(body_key.map(|k| (k.to_owned(), PropValue::from(body.as_str()))))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageEditRequest {
    /// `data:` URL of the current image.
    pub image_data: String,
    pub instruction: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageEdit {
    pub modified_image_data: String,
}

impl ImageEdit {
    pub fn from_json(json: &str) -> Result<Self, SuggestError> {
        let edit: Self = serde_json::from_str(json).map_err(|e| SuggestError::Malformed(e.to_string()))?;
        edit.checked()
    }

    /// Only inline images are accepted back.
    pub fn checked(self) -> Result<Self, SuggestError> {
        if self.modified_image_data.starts_with("data:image/") {
            Ok(self)
        } else {
            Err(SuggestError::Malformed("response is not an inline image".into()))
        }
    }
}

#[async_trait(?Send)]
pub trait SuggestionService {
    async fn suggest_text(&self, request: &TextRequest) -> Result<TextSuggestion, SuggestError>;

    async fn modify_image(&self, request: &ImageEditRequest) -> Result<ImageEdit, SuggestError>;
}
