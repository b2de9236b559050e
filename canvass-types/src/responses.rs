use std::collections::HashMap;

use crate::{Answer, Question, QuestionId};

/// Answers collected during one fill session, keyed by question id.
///
/// Responses are never persisted; a new, empty map is created for every
/// session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Responses {
    values: HashMap<QuestionId, Answer>,
}

impl Responses {
    /// Create a new empty responses collection.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Insert or replace the answer for a question.
    pub fn insert(&mut self, id: QuestionId, answer: impl Into<Answer>) {
        self.values.insert(id, answer.into());
    }

    /// Get the answer for a question.
    pub fn get(&self, id: QuestionId) -> Option<&Answer> {
        self.values.get(&id)
    }

    /// Check if an answer exists for a question.
    pub fn contains(&self, id: QuestionId) -> bool {
        self.values.contains_key(&id)
    }

    /// Remove the answer for a question.
    pub fn remove(&mut self, id: QuestionId) -> Option<Answer> {
        self.values.remove(&id)
    }

    /// Check if a question has a non-empty answer it can take.
    ///
    /// Returns `false` if the answer is missing, empty (empty string, no
    /// ticked boxes) or does not fit the question.
    pub fn has_value(&self, question: &Question) -> bool {
        self.answer_for(question)
            .is_some_and(|answer| !answer.is_empty())
    }

    /// Get the answer for a question, if it is a possible value of it.
    pub fn answer_for(&self, question: &Question) -> Option<&Answer> {
        self.get(question.id())
            .filter(|answer| answer.fits_question(question))
    }

    /// Get an iterator over all id-answer pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &Answer)> {
        self.values.iter()
    }

    /// Get the number of answers.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no answers.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<'a> IntoIterator for &'a Responses {
    type Item = (&'a QuestionId, &'a Answer);
    type IntoIter = std::collections::hash_map::Iter<'a, QuestionId, Answer>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl FromIterator<(QuestionId, Answer)> for Responses {
    fn from_iter<T: IntoIterator<Item = (QuestionId, Answer)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
