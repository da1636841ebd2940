//! The chat relay handler: grammar-check the latest user message, continue
//! the conversation, and merge the two model responses into one payload.

use crate::dtos::{MessageResponse, PromptRequest, PromptResponse};
use crate::models::{ChatTurn, GrammarAssessment, Role};
use crate::services::metrics;
use crate::services::providers::ProviderError;
use crate::startup::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use service_core::error::AppError;
use std::time::Instant;
use validator::Validate;

/// Reply sent when the request carries no user input.
const MISSING_INPUT_MESSAGE: &str = "Please enter message";

/// Uniform reply for any downstream failure. Clients never see the cause.
const INTERNAL_ERROR_MESSAGE: &str = "Internal Error";

/// Instruction template for the grammar check. The model answers with the
/// literal token `NO` when the paragraph is clean, or a description of the
/// error otherwise.
fn grammar_prompt(message: &str) -> String {
    format!(
        "Is this quoted paragraph contain any grammatical errors? If so response with that \
         particular grammatical error. Provide descriptive response on that particular \
         grammatical error. If there are no grammatical errors, just reply with the 'NO'. \
         Here is the paragraph {}",
        message
    )
}

/// `POST /prompt`
///
/// The three reply shapes (success, missing-input placeholder, internal
/// error) are all HTTP 200; that is the contract existing clients rely on.
pub async fn prompt(
    State(state): State<AppState>,
    Json(req): Json<PromptRequest>,
) -> Result<Response, AppError> {
    req.validate()?;

    let Some(user_input) = req.user_input else {
        metrics::record_prompt_request("missing_input");
        return Ok(Json(MessageResponse {
            message: MISSING_INPUT_MESSAGE.to_string(),
        })
        .into_response());
    };

    match relay(&state, &user_input, &req.message_history).await {
        Ok(response) => {
            metrics::record_prompt_request("ok");
            Ok(Json(response).into_response())
        }
        Err(err) => {
            tracing::error!(error = %err, kind = err.kind(), "Prompt relay failed");
            metrics::record_prompt_request("error");
            Ok(Json(MessageResponse {
                message: INTERNAL_ERROR_MESSAGE.to_string(),
            })
            .into_response())
        }
    }
}

/// The two sequential model calls: grammar verdict first, then the chat
/// continuation seeded with the mapped history.
async fn relay(
    state: &AppState,
    user_input: &ChatTurn,
    history: &[ChatTurn],
) -> Result<PromptResponse, ProviderError> {
    let started = Instant::now();
    let verdict = state
        .text_provider
        .generate(&grammar_prompt(&user_input.message))
        .await
        .inspect_err(|e| metrics::record_provider_error("grammar_check", e.kind()))?;
    metrics::record_provider_latency("grammar_check", started.elapsed().as_secs_f64());

    let started = Instant::now();
    let reply = state
        .text_provider
        .chat(history, &user_input.message)
        .await
        .inspect_err(|e| metrics::record_provider_error("chat", e.kind()))?;
    metrics::record_provider_latency("chat", started.elapsed().as_secs_f64());

    Ok(PromptResponse {
        role: Role::Model,
        message: reply,
        grammar_check: GrammarAssessment::from_verdict(verdict),
    })
}
