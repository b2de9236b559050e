use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a question, unique within a survey.
///
/// Ids are never reused: the builder hands out a fresh one for every added
/// question, even after removals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(u64);

impl QuestionId {
    /// The largest id a survey file may carry.
    ///
    /// This is the largest integer every JSON reader holds exactly.
    pub const MAX: QuestionId = QuestionId((1 << 53) - 1);

    /// Wrap a raw id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for QuestionId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// The kind of question, determining the input control and answer shape.
///
/// This is a closed set: every frontend matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    /// Free-form single-line text.
    #[default]
    Text,

    /// Pick exactly one of the question's options.
    MultipleChoice,

    /// Pick any number of the question's options.
    Checkboxes,

    /// Pick a value from 1 to 5.
    Rating,

    /// Pick a calendar date.
    Date,
}

impl QuestionType {
    /// All question types, in the order they are offered to authors.
    pub const ALL: [QuestionType; 5] = [
        Self::Text,
        Self::MultipleChoice,
        Self::Checkboxes,
        Self::Rating,
        Self::Date,
    ];

    /// Whether questions of this type carry a list of options.
    pub fn has_options(self) -> bool {
        matches!(self, Self::MultipleChoice | Self::Checkboxes)
    }

    /// The name used in exported files.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::MultipleChoice => "multiple-choice",
            Self::Checkboxes => "checkboxes",
            Self::Rating => "rating",
            Self::Date => "date",
        }
    }

    /// Human-readable label for type pickers.
    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::MultipleChoice => "Multiple Choice",
            Self::Checkboxes => "Checkboxes",
            Self::Rating => "Rating Scale (1-5)",
            Self::Date => "Date Picker",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Returned when a string is not one of the known question type names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown question type: {0}")]
pub struct UnknownQuestionType(pub String);

impl FromStr for QuestionType {
    type Err = UnknownQuestionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.wire_name() == s)
            .ok_or_else(|| UnknownQuestionType(s.to_string()))
    }
}

/// A single question in a survey.
///
/// The serialized form is the portable file format:
/// `id`, `questionText`, `type`, `options` (choice types only) and `required`.
/// Options stored on a non-choice question are dropped while reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredQuestion")]
pub struct Question {
    id: QuestionId,

    question_text: String,

    #[serde(rename = "type")]
    kind: QuestionType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Vec<String>>,

    #[serde(default)]
    required: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredQuestion {
    id: QuestionId,
    question_text: String,
    #[serde(rename = "type")]
    kind: QuestionType,
    #[serde(default)]
    options: Option<Vec<String>>,
    #[serde(default)]
    required: bool,
}

impl From<StoredQuestion> for Question {
    fn from(stored: StoredQuestion) -> Self {
        let question = Question::new(stored.id, stored.question_text, stored.kind);
        match stored.options {
            Some(options) => question.with_options(options),
            None => question,
        }
        .required(stored.required)
    }
}

impl Question {
    /// Create a question without options.
    ///
    /// Use [`Question::with_options`] for choice types.
    pub fn new(id: impl Into<QuestionId>, question_text: impl Into<String>, kind: QuestionType) -> Self {
        Self {
            id: id.into(),
            question_text: question_text.into(),
            kind,
            options: None,
            required: false,
        }
    }

    /// Set the options. Ignored for types that have no options.
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.kind.has_options() {
            self.options = Some(options.into_iter().map(Into::into).collect());
        }
        self
    }

    /// Mark the question as required.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Get the question id.
    pub fn id(&self) -> QuestionId {
        self.id
    }

    /// Get the prompt text.
    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    /// Get the question type.
    pub fn kind(&self) -> QuestionType {
        self.kind
    }

    /// Get the options. Always empty for non-choice types.
    pub fn options(&self) -> &[String] {
        match &self.options {
            Some(options) if self.kind.has_options() => options,
            _ => &[],
        }
    }

    /// Check whether an answer is demanded before submission.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Replace the id (used when re-keying imported questions).
    pub fn with_id(mut self, id: QuestionId) -> Self {
        self.id = id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn type_names_round_trip_through_from_str() {
        for kind in QuestionType::ALL {
            assert_eq!(kind.wire_name().parse::<QuestionType>(), Ok(kind));
        }
        assert!("slider".parse::<QuestionType>().is_err());
    }

    #[test]
    fn serializes_with_portable_field_names() {
        let question = Question::new(7u64, "Colors?", QuestionType::Checkboxes)
            .with_options(["Red", "Blue"])
            .required(true);

        let json = serde_json::to_value(&question).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "questionText": "Colors?",
                "type": "checkboxes",
                "options": ["Red", "Blue"],
                "required": true,
            })
        );
    }

    #[test]
    fn options_are_omitted_for_non_choice_types() {
        let question = Question::new(1u64, "Name?", QuestionType::Text).with_options(["x"]);
        let json = serde_json::to_value(&question).unwrap();
        assert!(json.get("options").is_none());
        assert!(question.options().is_empty());
    }

    #[test]
    fn reading_drops_options_of_non_choice_types() {
        let question: Question = serde_json::from_str(
            r#"{"id": 1, "questionText": "Name?", "type": "text", "options": ["x"]}"#,
        )
        .unwrap();
        assert_eq!(question, Question::new(1u64, "Name?", QuestionType::Text));
        assert!(serde_json::to_value(&question).unwrap().get("options").is_none());
    }

    #[test]
    fn required_defaults_to_false() {
        let question: Question =
            serde_json::from_str(r#"{"id": 3, "questionText": "When?", "type": "date"}"#).unwrap();
        assert!(!question.is_required());
        assert_eq!(question.kind(), QuestionType::Date);
    }
}
