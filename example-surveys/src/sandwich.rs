use canvass_types::{Question, QuestionType, Survey};

/// Order a sandwich. Nothing is required except the bread.
pub fn sandwich_order() -> Survey {
    Survey::new(vec![
        Question::new(1u64, "Bread", QuestionType::MultipleChoice)
            .with_options(["Italian", "Wheat", "Honey Oat", "Flatbread", "Wrap"])
            .required(true),
        Question::new(2u64, "Filling", QuestionType::MultipleChoice)
            .with_options(["Turkey", "Ham", "Roast Beef", "Tuna", "Veggie Patty"]),
        Question::new(3u64, "Toppings", QuestionType::Checkboxes)
            .with_options(["Lettuce", "Tomato", "Onion", "Pickles", "Jalapenos", "Olives"]),
        Question::new(4u64, "Special requests", QuestionType::Text),
        Question::new(5u64, "Rate your last visit", QuestionType::Rating),
    ])
}
