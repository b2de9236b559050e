//! # canvass-tui
//!
//! Terminal frontend for canvass.
//!
//! The builder screen edits a draft question and lists the survey; the
//! preview screen fills the survey in, one bordered field per question.
//! `F2` switches between them, `F5` exports, `F6` imports and `Esc` quits.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use canvass::{FileStorage, Persistence, Shell};
//! use canvass_tui::CanvassTui;
//!
//! fn main() -> anyhow::Result<()> {
//!     let shell = Shell::open(Persistence::new(FileStorage::new(".canvass")));
//!     let submissions = CanvassTui::new().with_title("Feedback").run(shell)?;
//!     println!("{}", serde_json::to_string_pretty(&submissions)?);
//!     Ok(())
//! }
//! ```

mod app;
mod backend;
mod draw;

pub use app::{App, BuilderFocus, Status};
pub use backend::{CanvassTui, Theme, TuiError};
