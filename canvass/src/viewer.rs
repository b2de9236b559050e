//! Filling in a survey.
//!
//! A [`SurveyViewer`] runs one fill session over a fixed list of questions.
//! It owns the responses, the error map and the touched set, and moves from
//! [`ViewerState::Filling`] to [`ViewerState::Submitted`] on the first
//! successful submit. There is no way back within the same session.

use std::collections::HashSet;

use serde::{Serialize, Serializer};

use crate::input::{self, InputEvent, QuestionInput};
use crate::validate::{self, ErrorMap, FieldError};
use crate::{Answer, Question, QuestionId, QuestionType, Responses};

/// Where a fill session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewerState {
    #[default]
    Filling,
    Submitted,
}

/// Why a submit was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("{missing} required question(s) still need an answer")]
    Invalid { missing: usize },

    #[error("The survey has already been submitted")]
    AlreadySubmitted,
}

/// The answers of a successful submit, keyed by question text.
///
/// Entries are in display order. In the payload an unanswered question is
/// `""`, or `[]` for checkboxes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    entries: Vec<(String, QuestionType, Option<Answer>)>,
}

impl Submission {
    fn collect(questions: &[Question], responses: &Responses) -> Self {
        let entries = questions
            .iter()
            .map(|q| {
                let answer = responses.answer_for(q).cloned();
                (q.question_text().to_string(), q.kind(), answer)
            })
            .collect();
        Self { entries }
    }

    /// The answer given for a question text. With duplicate texts the last one wins.
    pub fn get(&self, question_text: &str) -> Option<&Answer> {
        self.entries
            .iter()
            .rev()
            .find(|(text, _, _)| text == question_text)
            .and_then(|(_, _, answer)| answer.as_ref())
    }

    /// Question texts with their answers. Unanswered questions yield `None`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Answer>)> {
        self.entries
            .iter()
            .map(|(text, _, answer)| (text.as_str(), answer.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The payload as a JSON object from question text to answer.
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .entries
            .iter()
            .map(|(text, kind, answer)| {
                let value = match answer {
                    Some(answer) => answer.to_json(),
                    None => Answer::unanswered_json(*kind),
                };
                (text.clone(), value)
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

impl Serialize for Submission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// One fill session over a fixed list of questions.
#[derive(Debug, Clone)]
pub struct SurveyViewer {
    questions: Vec<Question>,
    responses: Responses,
    errors: ErrorMap,
    touched: HashSet<QuestionId>,
    state: ViewerState,
}

impl SurveyViewer {
    /// Start a session. Errors are computed right away so that submit is
    /// disabled before anything is touched.
    pub fn new(questions: Vec<Question>) -> Self {
        let responses = Responses::new();
        let errors = validate::validate(&questions, &responses);
        Self {
            questions,
            responses,
            errors,
            touched: HashSet::new(),
            state: ViewerState::Filling,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn responses(&self) -> &Responses {
        &self.responses
    }

    /// Every current error, whether shown or not.
    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    pub fn is_submitted(&self) -> bool {
        self.state == ViewerState::Submitted
    }

    pub fn is_touched(&self, id: QuestionId) -> bool {
        self.touched.contains(&id)
    }

    /// The error to show for a question: only once it has been touched.
    pub fn visible_error(&self, id: QuestionId) -> Option<&FieldError> {
        if self.is_touched(id) {
            self.errors.get(&id)
        } else {
            None
        }
    }

    /// Whether the submit action is enabled, regardless of touched state.
    pub fn can_submit(&self) -> bool {
        self.state == ViewerState::Filling && self.errors.is_empty()
    }

    /// Render the input of one question with its current value and visible error.
    pub fn input_for(&self, id: QuestionId) -> Option<QuestionInput> {
        let question = self.questions.iter().find(|q| q.id() == id)?;
        Some(input::render(
            question,
            self.responses.get(id),
            self.visible_error(id),
        ))
    }

    /// Render every input, in display order.
    pub fn inputs(&self) -> Vec<QuestionInput> {
        self.questions
            .iter()
            .map(|q| input::render(q, self.responses.get(q.id()), self.visible_error(q.id())))
            .collect()
    }

    /// Apply an event reported by an input control.
    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::Changed { question, value } => self.change(question, value),
            InputEvent::Blurred { question } => self.blur(question),
        }
    }

    /// Record a new value for a question and re-validate.
    ///
    /// Values the question cannot take are ignored.
    pub fn change(&mut self, id: QuestionId, value: Answer) {
        if self.is_submitted() {
            return;
        }
        let Some(question) = self.questions.iter().find(|q| q.id() == id) else {
            return;
        };
        if !value.fits_question(question) {
            tracing::debug!(%id, answer = value.type_name(), kind = %question.kind(), "ignored answer");
            return;
        }
        self.responses.insert(id, value);
        self.errors.remove(&id);
        self.revalidate();
    }

    /// Mark a question as touched.
    pub fn blur(&mut self, id: QuestionId) {
        if self.is_submitted() || !self.knows(id) {
            return;
        }
        self.touched.insert(id);
    }

    /// Validate and, if every required question is answered, finish the session.
    pub fn submit(&mut self) -> Result<Submission, SubmitError> {
        if self.is_submitted() {
            return Err(SubmitError::AlreadySubmitted);
        }

        self.revalidate();
        if !self.errors.is_empty() {
            tracing::debug!(missing = self.errors.len(), "submit refused");
            return Err(SubmitError::Invalid {
                missing: self.errors.len(),
            });
        }

        let submission = Submission::collect(&self.questions, &self.responses);
        self.state = ViewerState::Submitted;
        tracing::info!(answers = submission.len(), "survey submitted");
        Ok(submission)
    }

    fn knows(&self, id: QuestionId) -> bool {
        self.questions.iter().any(|q| q.id() == id)
    }

    fn revalidate(&mut self) {
        self.errors = validate::validate(&self.questions, &self.responses);
    }
}
