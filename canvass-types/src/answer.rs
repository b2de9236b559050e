use std::collections::BTreeSet;

use crate::{Question, QuestionType};

/// A single answer collected for a question.
///
/// There is one variant per [`QuestionType`], each with its own value shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Free-form text (from Text questions).
    Text(String),

    /// The chosen option (from MultipleChoice questions).
    MultipleChoice(String),

    /// The set of ticked options (from Checkboxes questions).
    Checkboxes(BTreeSet<String>),

    /// A rating between 1 and 5 (from Rating questions).
    Rating(u8),

    /// An ISO `YYYY-MM-DD` date, empty while the input is incomplete.
    Date(String),
}

impl Answer {
    /// Build a checkbox answer, dropping duplicate entries.
    pub fn checkboxes<I, S>(selected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Checkboxes(selected.into_iter().map(Into::into).collect())
    }

    /// The payload value of a question that was never answered.
    pub fn unanswered_json(kind: QuestionType) -> serde_json::Value {
        match kind {
            QuestionType::Checkboxes => serde_json::Value::Array(Vec::new()),
            _ => serde_json::Value::String(String::new()),
        }
    }

    /// Check if this answer carries nothing (empty string or empty set).
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) | Self::MultipleChoice(s) | Self::Date(s) => s.is_empty(),
            Self::Checkboxes(set) => set.is_empty(),
            Self::Rating(_) => false,
        }
    }

    /// Check whether this answer has the shape expected for a question type.
    pub fn fits(&self, kind: QuestionType) -> bool {
        matches!(
            (self, kind),
            (Self::Text(_), QuestionType::Text)
                | (Self::MultipleChoice(_), QuestionType::MultipleChoice)
                | (Self::Checkboxes(_), QuestionType::Checkboxes)
                | (Self::Rating(_), QuestionType::Rating)
                | (Self::Date(_), QuestionType::Date)
        )
    }

    /// Check whether this answer is a possible value of `question`.
    ///
    /// Beyond the shape, choices must be among the question's options and a
    /// rating must lie between 1 and 5. An empty choice is allowed.
    pub fn fits_question(&self, question: &Question) -> bool {
        let is_option = |value: &String| question.options().contains(value);
        self.fits(question.kind())
            && match self {
                Self::MultipleChoice(value) => value.is_empty() || is_option(value),
                Self::Checkboxes(set) => set.iter().all(is_option),
                Self::Rating(value) => (1..=5).contains(value),
                Self::Text(_) | Self::Date(_) => true,
            }
    }

    /// Try to get this answer as a string (Text, MultipleChoice or Date).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::MultipleChoice(s) | Self::Date(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the ticked options of a checkbox answer.
    pub fn as_selection(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Checkboxes(set) => Some(set),
            _ => None,
        }
    }

    /// Try to get the rating value.
    pub fn as_rating(&self) -> Option<u8> {
        match self {
            Self::Rating(r) => Some(*r),
            _ => None,
        }
    }

    /// The value as it appears in a submission payload.
    ///
    /// Ratings are reported in their string form.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Text(s) | Self::MultipleChoice(s) | Self::Date(s) => {
                serde_json::Value::String(s.clone())
            }
            Self::Checkboxes(set) => set
                .iter()
                .cloned()
                .map(serde_json::Value::String)
                .collect(),
            Self::Rating(r) => serde_json::Value::String(r.to_string()),
        }
    }

    /// Get the type name of this answer for log messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "Text",
            Self::MultipleChoice(_) => "MultipleChoice",
            Self::Checkboxes(_) => "Checkboxes",
            Self::Rating(_) => "Rating",
            Self::Date(_) => "Date",
        }
    }
}

impl From<String> for Answer {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Answer {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkboxes_are_deduplicated() {
        let answer = Answer::checkboxes(["Red", "Blue", "Red"]);
        assert_eq!(answer.as_selection().map(BTreeSet::len), Some(2));
    }

    #[test]
    fn emptiness_by_shape() {
        assert!(Answer::Text(String::new()).is_empty());
        assert!(!Answer::Text("  ".into()).is_empty());
        assert!(Answer::checkboxes(Vec::<String>::new()).is_empty());
        assert!(!Answer::Rating(3).is_empty());
    }

    #[test]
    fn rating_is_reported_as_string() {
        assert_eq!(Answer::Rating(4).to_json(), serde_json::json!("4"));
    }

    #[test]
    fn unanswered_values_per_type() {
        assert_eq!(
            Answer::unanswered_json(QuestionType::Checkboxes),
            serde_json::json!([])
        );
        assert_eq!(
            Answer::unanswered_json(QuestionType::Rating),
            serde_json::json!("")
        );
    }

    #[test]
    fn answers_must_match_the_question() {
        let pet = Question::new(1u64, "Pet?", QuestionType::MultipleChoice).with_options(["Cat"]);
        assert!(Answer::MultipleChoice("Cat".into()).fits_question(&pet));
        assert!(Answer::MultipleChoice(String::new()).fits_question(&pet));
        assert!(!Answer::MultipleChoice("Dragon".into()).fits_question(&pet));
        assert!(!Answer::Text("Cat".into()).fits_question(&pet));

        let colors = Question::new(2u64, "Colors?", QuestionType::Checkboxes).with_options(["Red"]);
        assert!(Answer::checkboxes(["Red"]).fits_question(&colors));
        assert!(!Answer::checkboxes(["Red", "Teal"]).fits_question(&colors));

        let rate = Question::new(3u64, "Rate", QuestionType::Rating);
        assert!(Answer::Rating(5).fits_question(&rate));
        assert!(!Answer::Rating(0).fits_question(&rate));
        assert!(!Answer::Text("banana".into()).fits_question(&rate));
    }
}
