//! Core types for the canvass crate.
//!
//! This crate provides the foundational types shared by every component:
//! - `Question`, `QuestionId` and `QuestionType` - The authored question model
//! - `Survey` - An ordered list of questions, also the portable file format
//! - `Answer` and `Responses` - Values collected while filling a survey

mod question;
pub use question::{Question, QuestionId, QuestionType, UnknownQuestionType};

mod answer;
pub use answer::Answer;

mod responses;
pub use responses::Responses;

mod survey;
pub use survey::Survey;
