//! Conversation domain types shared by the HTTP surface and the providers.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Verdict token the model returns when the checked paragraph is clean.
pub const GRAMMAR_OK_VERDICT: &str = "NO";

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Model,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Model => "model",
            Role::User => "user",
        }
    }
}

/// One role-tagged message unit in a conversation.
///
/// The wire field is `userType`, the name the existing clients send.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChatTurn {
    #[serde(rename = "userType")]
    pub role: Role,
    #[validate(length(max = 32768, message = "Message too long"))]
    pub message: String,
}

/// Structured verdict describing whether the latest user message contains a
/// grammatical error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarAssessment {
    pub is_grammar_errors: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl GrammarAssessment {
    /// Derive the assessment from the raw verdict text: exactly
    /// [`GRAMMAR_OK_VERDICT`] means clean, anything else is carried verbatim
    /// as the error description.
    pub fn from_verdict(verdict: String) -> Self {
        if verdict == GRAMMAR_OK_VERDICT {
            Self {
                is_grammar_errors: false,
                error_description: None,
            }
        } else {
            Self {
                is_grammar_errors: true,
                error_description: Some(verdict),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_verdict_has_no_description() {
        let assessment = GrammarAssessment::from_verdict("NO".to_string());

        assert!(!assessment.is_grammar_errors);
        assert!(assessment.error_description.is_none());
    }

    #[test]
    fn any_other_verdict_is_carried_verbatim() {
        let verdict = "The verb does not agree with its subject.";
        let assessment = GrammarAssessment::from_verdict(verdict.to_string());

        assert!(assessment.is_grammar_errors);
        assert_eq!(assessment.error_description.as_deref(), Some(verdict));
    }

    #[test]
    fn verdict_matching_is_exact() {
        // Only the bare token counts as clean.
        let assessment = GrammarAssessment::from_verdict("NO.".to_string());

        assert!(assessment.is_grammar_errors);
        assert_eq!(assessment.error_description.as_deref(), Some("NO."));
    }

    #[test]
    fn roles_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Model).unwrap(), "\"model\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }

    #[test]
    fn chat_turn_uses_user_type_wire_field() {
        let turn: ChatTurn =
            serde_json::from_str(r#"{"userType":"user","message":"hi"}"#).unwrap();

        assert_eq!(turn.role, Role::User);
        assert_eq!(turn.message, "hi");
    }
}
