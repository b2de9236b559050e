//! Survey authoring.
//!
//! A [`SurveyBuilder`] owns the survey being authored and a [`Draft`] of the
//! next question. The draft is checked from scratch on every call to
//! [`Draft::issues`], so frontends can show messages that follow the
//! author's edits and disable the add action while anything is wrong.

use crate::{Question, QuestionId, QuestionType, Survey};

/// Something that keeps a draft from being added.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    /// The question text is empty after trimming.
    #[error("Question text cannot be empty.")]
    EmptyQuestionText,

    /// A choice question has no options yet.
    #[error("Add at least one option.")]
    NoOptions,

    /// An option of a choice question is empty after trimming.
    #[error("Option {} must be filled out.", .index + 1)]
    BlankOption { index: usize },

    /// Every id up to [`QuestionId::MAX`] has been issued or reserved.
    #[error("No question ids left.")]
    IdsExhausted,
}

/// All problems of a draft, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("the question draft has {} problem(s)", .errors.len())]
pub struct DraftIssues {
    errors: Vec<DraftError>,
}

impl DraftIssues {
    /// Check if the draft can be added.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate over the problems.
    pub fn iter(&self) -> std::slice::Iter<'_, DraftError> {
        self.errors.iter()
    }

    /// Check for a specific problem.
    pub fn contains(&self, error: &DraftError) -> bool {
        self.errors.contains(error)
    }

    /// The problem with the question text, if any.
    pub fn question_text(&self) -> Option<&DraftError> {
        self.errors
            .iter()
            .find(|e| matches!(e, DraftError::EmptyQuestionText))
    }

    /// Indices of options that are blank.
    pub fn blank_options(&self) -> impl Iterator<Item = usize> + '_ {
        self.errors.iter().filter_map(|e| match e {
            DraftError::BlankOption { index } => Some(*index),
            _ => None,
        })
    }
}

/// The question being authored, before it is added to the survey.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    question_text: String,
    kind: QuestionType,
    options: Vec<String>,
    required: bool,
    /// Whether the author has left the question text field at least once.
    text_touched: bool,
}

impl Draft {
    /// Create an empty text-question draft.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    pub fn kind(&self) -> QuestionType {
        self.kind
    }

    /// The option slots, including blank ones.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn set_question_text(&mut self, text: impl Into<String>) {
        self.question_text = text.into();
    }

    /// Change the type. Option slots are kept so switching back loses nothing.
    pub fn set_kind(&mut self, kind: QuestionType) {
        self.kind = kind;
    }

    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    /// Mark the question text field as visited.
    pub fn blur_question_text(&mut self) {
        self.text_touched = true;
    }

    /// Append an empty option slot.
    pub fn add_option_slot(&mut self) {
        self.options.push(String::new());
    }

    /// Overwrite the option at `index`. Returns `false` if there is no such slot.
    pub fn update_option(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.options.get_mut(index) {
            Some(slot) => {
                *slot = text.into();
                true
            }
            None => false,
        }
    }

    /// Remove the option slot at `index`, if present.
    pub fn remove_option_slot(&mut self, index: usize) -> Option<String> {
        (index < self.options.len()).then(|| self.options.remove(index))
    }

    /// Every problem that blocks adding this draft.
    pub fn issues(&self) -> DraftIssues {
        let mut errors = Vec::new();
        if self.question_text.trim().is_empty() {
            errors.push(DraftError::EmptyQuestionText);
        }
        if self.kind.has_options() {
            if self.options.is_empty() {
                errors.push(DraftError::NoOptions);
            }
            errors.extend(
                self.options
                    .iter()
                    .enumerate()
                    .filter(|(_, option)| option.trim().is_empty())
                    .map(|(index, _)| DraftError::BlankOption { index }),
            );
        }
        DraftIssues { errors }
    }

    /// The problems to show right now.
    ///
    /// The empty-text message waits until the text field has been left once,
    /// so a fresh draft is not greeted with an error.
    pub fn visible_issues(&self) -> DraftIssues {
        let mut issues = self.issues();
        if !self.text_touched {
            issues
                .errors
                .retain(|e| !matches!(e, DraftError::EmptyQuestionText));
        }
        issues
    }

    /// Check if the draft can be added.
    pub fn is_valid(&self) -> bool {
        self.issues().is_empty()
    }

    /// Clear every field except the type, ready for the next question.
    fn reset(&mut self) {
        *self = Self {
            kind: self.kind,
            ..Self::default()
        };
    }

    fn to_question(&self, id: QuestionId) -> Question {
        Question::new(id, self.question_text.trim(), self.kind)
            .with_options(self.options.iter().map(|o| o.trim().to_string()))
            .required(self.required)
    }
}

/// Issues question ids derived from the wall clock.
///
/// Ids are milliseconds since the Unix epoch, bumped so that each one is
/// strictly greater than every id issued or reserved before it. Nothing
/// above [`QuestionId::MAX`] is issued.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure no future id is less than or equal to `id`.
    pub fn reserve(&mut self, id: QuestionId) {
        self.last = self.last.max(id.get());
    }

    /// Issue a fresh id, or `None` once the id space is used up.
    pub fn next_id(&mut self) -> Option<QuestionId> {
        let now = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);
        let next = now.max(self.last.checked_add(1)?);
        if next > QuestionId::MAX.get() {
            return None;
        }
        self.last = next;
        Some(QuestionId::new(next))
    }
}

/// Owns the survey under construction and the draft of its next question.
#[derive(Debug, Clone, Default)]
pub struct SurveyBuilder {
    survey: Survey,
    draft: Draft,
    ids: IdGenerator,
}

impl SurveyBuilder {
    /// Start authoring on top of an existing survey.
    pub fn new(survey: Survey) -> Self {
        let mut ids = IdGenerator::new();
        if let Some(max) = survey.max_id() {
            ids.reserve(max);
        }
        Self {
            survey,
            draft: Draft::new(),
            ids,
        }
    }

    pub fn survey(&self) -> &Survey {
        &self.survey
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    /// Whether the add action is enabled.
    pub fn can_add(&self) -> bool {
        self.draft.is_valid()
    }

    /// Add the draft as a new question at the end of the survey.
    ///
    /// On success the text and every option are trimmed, options are dropped
    /// for non-choice types, and the draft is cleared. On failure nothing
    /// changes.
    pub fn add_question(&mut self) -> Result<QuestionId, DraftIssues> {
        let issues = self.draft.issues();
        if !issues.is_empty() {
            return Err(issues);
        }

        let Some(id) = self.ids.next_id() else {
            tracing::warn!("no question ids left");
            return Err(DraftIssues {
                errors: vec![DraftError::IdsExhausted],
            });
        };
        let question = self.draft.to_question(id);
        tracing::info!(%id, kind = %question.kind(), "added question");
        self.survey.push(question);
        self.draft.reset();
        Ok(id)
    }

    /// Remove a question. Unknown ids are ignored.
    pub fn remove_question(&mut self, id: QuestionId) -> Option<Question> {
        let removed = self.survey.remove(id);
        if removed.is_some() {
            tracing::info!(%id, "removed question");
        }
        removed
    }

    /// Swap in a whole new survey, e.g. after an import. The draft is kept.
    pub fn replace_survey(&mut self, survey: Survey) {
        if let Some(max) = survey.max_id() {
            self.ids.reserve(max);
        }
        self.survey = survey;
    }
}
