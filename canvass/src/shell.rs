//! The application shell: switches between authoring and filling, and keeps
//! storage in step with every change to the survey.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::builder::{Draft, DraftIssues, SurveyBuilder};
use crate::persistence::{ImportError, Persistence};
use crate::storage::Storage;
use crate::viewer::SurveyViewer;
use crate::{Question, QuestionId, Survey};

/// A message for the user about an import, export or save.
#[derive(Debug)]
pub enum Notice {
    /// An import replaced the survey.
    Imported { questions: usize },

    /// An import was refused; the survey is unchanged.
    ImportRejected(ImportError),

    /// The survey was written to a file.
    Exported(PathBuf),

    /// Writing the export file failed.
    ExportFailed(String),

    /// Writing through to storage failed. The in-memory survey is still current.
    SaveFailed(String),
}

impl Notice {
    /// Whether this notice reports a failure.
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::Imported { .. } | Self::Exported(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Imported { .. } => f.write_str("Survey imported successfully!"),
            Self::ImportRejected(err) if err.is_format_error() => {
                f.write_str("Invalid survey format!")
            }
            Self::ImportRejected(_) => {
                f.write_str("Failed to import survey. Please check the file.")
            }
            Self::Exported(path) => write!(f, "Survey exported to {}", path.display()),
            Self::ExportFailed(reason) => write!(f, "Failed to export survey: {reason}"),
            Self::SaveFailed(reason) => write!(f, "Failed to save survey: {reason}"),
        }
    }
}

/// Holds the canonical survey and the current mode.
///
/// In builder mode only the [`SurveyBuilder`] is live. In preview mode a
/// [`SurveyViewer`] runs over a snapshot of the questions taken when the
/// mode was entered.
#[derive(Debug)]
pub struct Shell<S> {
    builder: SurveyBuilder,
    persistence: Persistence<S>,
    viewer: Option<SurveyViewer>,
    notice: Option<Notice>,
}

impl<S: Storage> Shell<S> {
    /// Load the saved survey and start in builder mode.
    pub fn open(persistence: Persistence<S>) -> Self {
        let survey = persistence.load();
        Self {
            builder: SurveyBuilder::new(survey),
            persistence,
            viewer: None,
            notice: None,
        }
    }

    pub fn survey(&self) -> &Survey {
        self.builder.survey()
    }

    pub fn builder(&self) -> &SurveyBuilder {
        &self.builder
    }

    pub fn draft(&self) -> &Draft {
        self.builder.draft()
    }

    /// Edit the pending question. Draft edits are not persisted.
    pub fn draft_mut(&mut self) -> &mut Draft {
        self.builder.draft_mut()
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn is_preview(&self) -> bool {
        self.viewer.is_some()
    }

    pub fn viewer(&self) -> Option<&SurveyViewer> {
        self.viewer.as_ref()
    }

    pub fn viewer_mut(&mut self) -> Option<&mut SurveyViewer> {
        self.viewer.as_mut()
    }

    /// Switch between builder and preview. Entering preview starts a fresh
    /// fill session; leaving it discards the session.
    pub fn toggle_view(&mut self) {
        self.viewer = match self.viewer.take() {
            Some(_) => None,
            None => Some(self.new_session()),
        };
        tracing::debug!(preview = self.is_preview(), "toggled view");
    }

    /// Add the draft to the survey and save.
    pub fn add_question(&mut self) -> Result<QuestionId, DraftIssues> {
        let id = self.builder.add_question()?;
        self.persist();
        Ok(id)
    }

    /// Remove a question and save. Unknown ids are ignored.
    pub fn remove_question(&mut self, id: QuestionId) -> Option<Question> {
        let removed = self.builder.remove_question(id);
        if removed.is_some() {
            self.persist();
        }
        removed
    }

    /// Replace the survey with the content of a file, then save.
    pub fn import_from_file(&mut self, path: &Path) -> Result<(), &Notice> {
        let result = self.persistence.import_from_file(path);
        self.apply_import(result)
    }

    /// Replace the survey with JSON content, then save.
    pub fn import_json(&mut self, content: &str) -> Result<(), &Notice> {
        let result = self.persistence.import_json(content);
        self.apply_import(result)
    }

    /// Write `survey.json` into `dir`.
    pub fn export_to_dir(&mut self, dir: &Path) -> Result<PathBuf, &Notice> {
        match self.persistence.export_to_dir(self.builder.survey(), dir) {
            Ok(path) => {
                self.notice = Some(Notice::Exported(path.clone()));
                Ok(path)
            }
            Err(err) => {
                tracing::warn!(error = %err, "export failed");
                let notice: &Notice = self.notice.insert(Notice::ExportFailed(err.to_string()));
                Err(notice)
            }
        }
    }

    /// The most recent notice, if not yet taken.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Take the most recent notice.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    fn apply_import(&mut self, result: Result<Survey, ImportError>) -> Result<(), &Notice> {
        match result {
            Ok(survey) => {
                let questions = survey.len();
                self.builder.replace_survey(survey);
                if self.viewer.is_some() {
                    self.viewer = Some(self.new_session());
                }
                self.notice = Some(Notice::Imported { questions });
                self.persist();
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "import rejected");
                let notice: &Notice = self.notice.insert(Notice::ImportRejected(err));
                Err(notice)
            }
        }
    }

    fn new_session(&self) -> SurveyViewer {
        SurveyViewer::new(self.builder.survey().questions().to_vec())
    }

    fn persist(&mut self) {
        if let Err(err) = self.persistence.save(self.builder.survey()) {
            tracing::warn!(error = %err, "failed to save survey");
            self.notice = Some(Notice::SaveFailed(err.to_string()));
        }
    }
}
