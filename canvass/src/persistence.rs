//! Saving, loading, exporting and importing surveys.
//!
//! The persisted value and the export file share one format: a JSON array of
//! questions. Saves are compact and write-through; exports are indented.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::builder::IdGenerator;
use crate::storage::{Storage, StorageError};
use crate::{Question, QuestionId, QuestionType, Survey};

/// Key under which the current survey is stored.
pub const DEFAULT_STORAGE_KEY: &str = "survey-questions";

/// Name of the file written by an export.
pub const EXPORT_FILE_NAME: &str = "survey.json";

/// Why an import was rejected. The current survey is never touched.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The top-level value is not a list.
    #[error("Invalid survey format: expected a list of questions")]
    NotAnArray,

    /// A question lacks its text, its type, or the options its type needs.
    #[error("Invalid survey format: question {} is missing required fields", .index + 1)]
    MissingFields { index: usize },

    /// The content is not valid JSON, or a field has the wrong type.
    #[error("Failed to parse survey: {0}")]
    Parse(#[from] serde_json::Error),

    /// The file could not be read.
    #[error("Failed to read survey file: {0}")]
    Io(#[from] io::Error),

    /// The file uses up every id, leaving none for questions without one.
    #[error("Invalid survey format: no question ids left for question {}", .index + 1)]
    IdsExhausted { index: usize },
}

impl ImportError {
    /// Whether the content was readable JSON of the wrong shape.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::NotAnArray | Self::MissingFields { .. } | Self::IdsExhausted { .. }
        )
    }
}

/// Error type for saving and exporting.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Failed to serialize survey: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write export file: {0}")]
    Io(#[from] io::Error),
}

/// A question as it may appear in an imported file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportedQuestion {
    #[serde(default)]
    id: Option<QuestionId>,
    question_text: String,
    #[serde(rename = "type")]
    kind: QuestionType,
    #[serde(default)]
    options: Option<Vec<String>>,
    #[serde(default)]
    required: bool,
}

/// Mirrors the current survey into a [`Storage`] and moves surveys in and
/// out of portable files.
#[derive(Debug, Clone)]
pub struct Persistence<S> {
    storage: S,
    key: String,
}

impl<S: Storage> Persistence<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }

    /// Use a different storage key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the saved survey.
    ///
    /// A missing, unreadable or corrupt value yields an empty survey.
    pub fn load(&self) -> Survey {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Survey::empty(),
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "could not read saved survey");
                return Survey::empty();
            }
        };

        match serde_json::from_str::<Survey>(&raw) {
            Ok(survey) => {
                tracing::debug!(questions = survey.len(), "loaded saved survey");
                survey
            }
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "saved survey is corrupt, starting empty");
                Survey::empty()
            }
        }
    }

    /// Write the full survey.
    pub fn save(&mut self, survey: &Survey) -> Result<(), PersistError> {
        let json = serde_json::to_string(survey)?;
        self.storage.set(&self.key, &json)?;
        Ok(())
    }

    /// Serialize a survey in the export format.
    pub fn export_json(&self, survey: &Survey) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(survey)?)
    }

    /// Write `survey.json` into `dir` and return its path.
    pub fn export_to_dir(&self, survey: &Survey, dir: &Path) -> Result<PathBuf, PersistError> {
        let path = dir.join(EXPORT_FILE_NAME);
        std::fs::write(&path, self.export_json(survey)?)?;
        tracing::info!(path = %path.display(), questions = survey.len(), "exported survey");
        Ok(path)
    }

    /// Parse a survey file.
    pub fn import_from_file(&self, path: &Path) -> Result<Survey, ImportError> {
        let content = std::fs::read_to_string(path)?;
        self.import_json(&content)
    }

    /// Parse survey content. Either every question is accepted or none is.
    ///
    /// Options of non-choice questions are dropped. Missing, duplicate and
    /// out-of-range ids are replaced by fresh ones.
    pub fn import_json(&self, content: &str) -> Result<Survey, ImportError> {
        let Value::Array(items) = serde_json::from_str::<Value>(content)? else {
            return Err(ImportError::NotAnArray);
        };

        for (index, item) in items.iter().enumerate() {
            if !has_required_fields(item) {
                return Err(ImportError::MissingFields { index });
            }
        }

        let imported = items
            .into_iter()
            .map(serde_json::from_value::<ImportedQuestion>)
            .collect::<Result<Vec<_>, _>>()?;

        let given = |q: &ImportedQuestion| q.id.filter(|id| *id <= QuestionId::MAX);
        let mut ids = IdGenerator::new();
        if let Some(max) = imported.iter().filter_map(given).max() {
            ids.reserve(max);
        }
        let mut seen = HashSet::new();
        let questions = imported
            .into_iter()
            .enumerate()
            .map(|(index, q)| -> Result<Question, ImportError> {
                let id = match given(&q) {
                    Some(id) if seen.insert(id) => id,
                    _ => ids.next_id().ok_or(ImportError::IdsExhausted { index })?,
                };
                Ok(Question::new(id, q.question_text, q.kind)
                    .with_options(q.options.unwrap_or_default())
                    .required(q.required))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let survey = Survey::new(questions);
        tracing::info!(questions = survey.len(), "imported survey");
        Ok(survey)
    }
}

/// Non-empty text, a known type, and for choice types at least one option
/// with none of them blank.
fn has_required_fields(item: &Value) -> bool {
    let has_text = item
        .get("questionText")
        .and_then(Value::as_str)
        .is_some_and(|text| !text.is_empty());
    let kind = item
        .get("type")
        .and_then(Value::as_str)
        .and_then(|name| name.parse::<QuestionType>().ok());

    match kind {
        Some(kind) if has_text && kind.has_options() => item
            .get("options")
            .and_then(Value::as_array)
            .is_some_and(|options| {
                !options.is_empty()
                    && options
                        .iter()
                        .all(|o| o.as_str().is_some_and(|s| !s.trim().is_empty()))
            }),
        Some(_) => has_text,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStorage;
    use pretty_assertions::assert_eq;

    fn persistence() -> Persistence<MemoryStorage> {
        Persistence::new(MemoryStorage::new())
    }

    fn sample() -> Survey {
        Survey::new(vec![
            Question::new(10u64, "Name?", QuestionType::Text).required(true),
            Question::new(11u64, "Colors?", QuestionType::Checkboxes).with_options(["Red", "Blue"]),
        ])
    }

    #[test]
    fn load_without_saved_value_is_empty() {
        assert!(persistence().load().is_empty());
    }

    #[test]
    fn load_corrupt_value_is_empty() {
        let persistence =
            Persistence::new(MemoryStorage::new().with_entry(DEFAULT_STORAGE_KEY, "{not json"));
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn save_then_load() {
        let mut persistence = persistence();
        persistence.save(&sample()).unwrap();
        assert_eq!(persistence.load(), sample());
    }

    #[test]
    fn custom_key() {
        let mut persistence = persistence().with_key("other");
        persistence.save(&sample()).unwrap();
        assert!(persistence.storage().entry("other").is_some());
        assert!(persistence.storage().entry(DEFAULT_STORAGE_KEY).is_none());
    }

    #[test]
    fn export_is_indented_array() {
        let json = persistence().export_json(&sample()).unwrap();
        assert!(json.starts_with("[\n  {"));
        assert!(json.contains("\"questionText\": \"Name?\""));
    }

    #[test]
    fn export_import_round_trip() {
        let persistence = persistence();
        let json = persistence.export_json(&sample()).unwrap();
        assert_eq!(persistence.import_json(&json).unwrap(), sample());
    }

    #[test]
    fn non_array_is_rejected() {
        let err = persistence().import_json(r#"{"foo": 1}"#).unwrap_err();
        assert!(matches!(err, ImportError::NotAnArray));
    }

    #[test]
    fn missing_type_is_rejected() {
        let err = persistence()
            .import_json(r#"[{"questionText": "Q1"}]"#)
            .unwrap_err();
        assert!(matches!(err, ImportError::MissingFields { index: 0 }));
    }

    #[test]
    fn unknown_type_and_empty_text_are_rejected() {
        let err = persistence()
            .import_json(r#"[{"questionText": "Q1", "type": "text"}, {"questionText": "Q2", "type": "slider"}]"#)
            .unwrap_err();
        assert!(matches!(err, ImportError::MissingFields { index: 1 }));

        let err = persistence()
            .import_json(r#"[{"questionText": "", "type": "text"}]"#)
            .unwrap_err();
        assert!(matches!(err, ImportError::MissingFields { index: 0 }));
    }

    #[test]
    fn choice_without_options_is_rejected() {
        let err = persistence()
            .import_json(r#"[{"questionText": "Pet?", "type": "multiple-choice", "options": [" "]}]"#)
            .unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn malformed_json_is_a_parse_failure() {
        let err = persistence().import_json("[{").unwrap_err();
        assert!(matches!(err, ImportError::Parse(_)));
        assert!(!err.is_format_error());
    }

    #[test]
    fn missing_and_duplicate_ids_are_replaced() {
        let survey = persistence()
            .import_json(
                r#"[
                    {"id": 5, "questionText": "A", "type": "text"},
                    {"id": 5, "questionText": "B", "type": "date"},
                    {"questionText": "C", "type": "rating", "options": ["ignored"]}
                ]"#,
            )
            .unwrap();

        let ids: HashSet<_> = survey.ids().collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(survey.questions()[0].id(), QuestionId::new(5));
        assert!(survey.questions()[2].options().is_empty());
        assert!(!survey.questions()[2].is_required());
    }

    #[test]
    fn out_of_range_ids_are_replaced() {
        let content = format!(
            r#"[
                {{"id": {}, "questionText": "A", "type": "text"}},
                {{"questionText": "B", "type": "text"}}
            ]"#,
            u64::MAX
        );
        let survey = persistence().import_json(&content).unwrap();

        let ids: HashSet<_> = survey.ids().collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.iter().all(|id| *id <= QuestionId::MAX));
    }

    #[test]
    fn file_without_spare_ids_is_rejected() {
        let content = format!(
            r#"[
                {{"id": {}, "questionText": "A", "type": "text"}},
                {{"questionText": "B", "type": "text"}}
            ]"#,
            QuestionId::MAX
        );
        let err = persistence().import_json(&content).unwrap_err();
        assert!(matches!(err, ImportError::IdsExhausted { index: 1 }));
        assert!(err.is_format_error());
    }

    #[test]
    fn blank_option_is_rejected() {
        let err = persistence()
            .import_json(r#"[{"questionText": "Pet?", "type": "multiple-choice", "options": ["Cat", ""]}]"#)
            .unwrap_err();
        assert!(matches!(err, ImportError::MissingFields { index: 0 }));
    }

    #[test]
    fn stray_options_do_not_survive_load() {
        let persistence = Persistence::new(MemoryStorage::new().with_entry(
            DEFAULT_STORAGE_KEY,
            r#"[{"id": 1, "questionText": "Name?", "type": "text", "options": ["x"]}]"#,
        ));
        let loaded = persistence.load();
        let json = persistence.export_json(&loaded).unwrap();

        assert!(!json.contains("options"));
        assert_eq!(persistence.import_json(&json).unwrap(), loaded);
    }

    #[test]
    fn file_export_and_import() {
        let tmp = tempfile::tempdir().unwrap();
        let persistence = persistence();
        let path = persistence.export_to_dir(&sample(), tmp.path()).unwrap();

        assert_eq!(path.file_name().unwrap(), EXPORT_FILE_NAME);
        assert_eq!(persistence.import_from_file(&path).unwrap(), sample());
    }

    #[test]
    fn missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = persistence()
            .import_from_file(&tmp.path().join("nope.json"))
            .unwrap_err();
        assert!(matches!(err, ImportError::Io(_)));
    }
}
