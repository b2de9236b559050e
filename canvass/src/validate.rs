//! Response validation.
//!
//! Validation is total and stateless: every call re-derives the error map
//! from the questions and the current responses.

use std::collections::HashMap;

use crate::{Question, QuestionId, Responses};

/// A validation failure attached to a single question.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// A required question has no usable answer: nothing, an empty string,
    /// no ticked boxes, or a value the question cannot take.
    #[error("This field is required.")]
    RequiredFieldMissing,
}

/// Validation failures keyed by question id. No entry means no error.
pub type ErrorMap = HashMap<QuestionId, FieldError>;

/// Validate responses against the questions they answer.
///
/// Only required questions can be flagged. An answer of the wrong shape,
/// or naming an option the question does not have, counts as missing.
pub fn validate(questions: &[Question], responses: &Responses) -> ErrorMap {
    let errors: ErrorMap = questions
        .iter()
        .filter(|q| q.is_required() && !responses.has_value(q))
        .map(|q| (q.id(), FieldError::RequiredFieldMissing))
        .collect();

    tracing::debug!(
        questions = questions.len(),
        errors = errors.len(),
        "validated responses"
    );
    errors
}

/// Check that every required question is answered.
pub fn is_valid(questions: &[Question], responses: &Responses) -> bool {
    validate(questions, responses).is_empty()
}
