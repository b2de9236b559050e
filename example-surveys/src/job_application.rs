use canvass_types::{Question, QuestionType, Survey};

/// A job application that uses every question type.
pub fn job_application() -> Survey {
    Survey::new(vec![
        Question::new(1u64, "Full name", QuestionType::Text).required(true),
        Question::new(2u64, "Position", QuestionType::MultipleChoice)
            .with_options(["Backend Engineer", "Frontend Engineer", "DevOps", "Data Scientist"])
            .required(true),
        Question::new(3u64, "Skills", QuestionType::Checkboxes)
            .with_options(["Rust", "TypeScript", "SQL", "Kubernetes", "Machine Learning"])
            .required(true),
        Question::new(4u64, "How much do you enjoy remote work?", QuestionType::Rating),
        Question::new(5u64, "Earliest start date", QuestionType::Date).required(true),
        Question::new(6u64, "How did you hear about us?", QuestionType::Text),
    ])
}
