use serde::{Deserialize, Serialize};

use crate::{Question, QuestionId};

/// An ordered list of questions.
///
/// Order is display order. Serialized transparently as a JSON array, which
/// is both the persisted form and the export file format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Survey {
    questions: Vec<Question>,
}

impl Survey {
    /// Create a survey with the given questions.
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Create an empty survey.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get the questions.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Append a question at the end.
    pub fn push(&mut self, question: Question) {
        self.questions.push(question);
    }

    /// Remove the question with the given id, keeping the order of the rest.
    pub fn remove(&mut self, id: QuestionId) -> Option<Question> {
        let index = self.questions.iter().position(|q| q.id() == id)?;
        Some(self.questions.remove(index))
    }

    /// Look up a question by id.
    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    /// Iterate over the questions in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    /// Iterate over the question ids in display order.
    pub fn ids(&self) -> impl Iterator<Item = QuestionId> + '_ {
        self.questions.iter().map(Question::id)
    }

    /// The highest id in use, if any.
    pub fn max_id(&self) -> Option<QuestionId> {
        self.ids().max()
    }

    /// Check if the survey has any questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Get the number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Consume the survey, returning its questions.
    pub fn into_questions(self) -> Vec<Question> {
        self.questions
    }
}

impl From<Vec<Question>> for Survey {
    fn from(questions: Vec<Question>) -> Self {
        Self::new(questions)
    }
}

impl<'a> IntoIterator for &'a Survey {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}
