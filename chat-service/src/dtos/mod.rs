//! Request and response shapes for the HTTP surface.

use crate::models::{ChatTurn, GrammarAssessment, Role};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /prompt`.
///
/// `userInput` is optional so that a missing turn can be answered with the
/// placeholder message instead of a deserialization failure; the history
/// defaults to empty.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PromptRequest {
    #[serde(default)]
    #[validate(nested)]
    pub user_input: Option<ChatTurn>,
    #[serde(default)]
    pub message_history: Vec<ChatTurn>,
}

/// Successful relay reply: the model's message plus the grammar verdict.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptResponse {
    #[serde(rename = "userType")]
    pub role: Role,
    pub message: String,
    pub grammar_check: GrammarAssessment,
}

/// Placeholder and error replies share this single-field shape.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
