use canvass_types::{Question, QuestionType, Survey};

/// A simple user profile survey.
pub fn user_profile() -> Survey {
    Survey::new(vec![
        Question::new(1u64, "What is your name?", QuestionType::Text).required(true),
        Question::new(2u64, "When were you born?", QuestionType::Date),
        Question::new(3u64, "What is your email?", QuestionType::Text).required(true),
        Question::new(
            4u64,
            "Would you like to receive our newsletter?",
            QuestionType::MultipleChoice,
        )
        .with_options(["Yes", "No"]),
    ])
}
