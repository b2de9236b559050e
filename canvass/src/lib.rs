//! # canvass
//!
//! Author surveys, fill them in, and move them around as portable JSON.
//!
//! The crate is frontend-agnostic. A frontend drives three pieces of state:
//!
//! - [`SurveyBuilder`] - the survey being authored plus a [`Draft`] of the
//!   next question, checked live so the add action can be disabled
//! - [`SurveyViewer`] - one fill session: responses, errors, touched fields,
//!   and the `Filling -> Submitted` transition
//! - [`Shell`] - switches between the two and writes every change through to
//!   a [`Storage`] via [`Persistence`]
//!
//! Inputs are described by [`input::render`], which turns a question and its
//! current answer into a [`Control`]; the frontend reports interaction back as
//! [`ControlAction`]s and receives [`InputEvent`]s for the viewer.
//!
//! ## Usage
//!
//! ```rust
//! use canvass::{Answer, MemoryStorage, Persistence, QuestionType, Shell};
//!
//! let mut shell = Shell::open(Persistence::new(MemoryStorage::new()));
//! shell.draft_mut().set_question_text("Name?");
//! shell.draft_mut().set_kind(QuestionType::Text);
//! shell.draft_mut().set_required(true);
//! let name = shell.add_question().unwrap();
//!
//! shell.toggle_view();
//! let viewer = shell.viewer_mut().unwrap();
//! assert!(!viewer.can_submit());
//! viewer.change(name, Answer::Text("Alice".into()));
//! let submission = viewer.submit().unwrap();
//! assert_eq!(submission.to_json(), serde_json::json!({ "Name?": "Alice" }));
//! ```

// Re-export all types from canvass-types
pub use canvass_types::*;

pub mod builder;
pub use builder::{Draft, DraftError, DraftIssues, IdGenerator, SurveyBuilder};

pub mod input;
pub use input::{ChoiceItem, Control, ControlAction, InputEvent, QuestionInput};

pub mod persistence;
pub use persistence::{
    DEFAULT_STORAGE_KEY, EXPORT_FILE_NAME, ImportError, PersistError, Persistence,
};

pub mod shell;
pub use shell::{Notice, Shell};

pub mod storage;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};

pub mod validate;
pub use validate::{ErrorMap, FieldError, is_valid, validate};

pub mod viewer;
pub use viewer::{SubmitError, Submission, SurveyViewer, ViewerState};
