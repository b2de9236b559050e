//! Property tests for drafts, ids and validation

use std::collections::HashSet;

use canvass::{
    Answer, DraftError, Question, QuestionId, QuestionType, Responses, SurveyBuilder, validate,
};
use proptest::prelude::*;

fn question_type() -> impl Strategy<Value = QuestionType> {
    prop_oneof![
        Just(QuestionType::Text),
        Just(QuestionType::MultipleChoice),
        Just(QuestionType::Checkboxes),
        Just(QuestionType::Rating),
        Just(QuestionType::Date),
    ]
}

fn choice_type() -> impl Strategy<Value = QuestionType> {
    prop_oneof![Just(QuestionType::MultipleChoice), Just(QuestionType::Checkboxes)]
}

proptest! {
    #[test]
    fn prop_blank_text_never_adds(text in "[ \t]{0,8}", kind in question_type()) {
        let mut builder = SurveyBuilder::default();
        builder.draft_mut().set_question_text(text);
        builder.draft_mut().set_kind(kind);
        builder.draft_mut().add_option_slot();
        builder.draft_mut().update_option(0, "ok");

        let issues = builder.add_question().unwrap_err();
        prop_assert!(issues.contains(&DraftError::EmptyQuestionText));
        prop_assert!(builder.survey().is_empty());
    }

    #[test]
    fn prop_choice_with_blank_option_never_adds(
        kind in choice_type(),
        options in proptest::collection::vec("[a-z]{1,5}", 0..4),
        blank_at in 0usize..4,
    ) {
        let mut builder = SurveyBuilder::default();
        let draft = builder.draft_mut();
        draft.set_question_text("Pick one");
        draft.set_kind(kind);
        let mut options = options;
        let blank_at = blank_at.min(options.len());
        options.insert(blank_at, "  ".to_string());
        for (index, option) in options.iter().enumerate() {
            draft.add_option_slot();
            draft.update_option(index, option.clone());
        }

        let issues = builder.add_question().unwrap_err();
        prop_assert!(issues.blank_options().any(|i| i == blank_at));
        prop_assert!(builder.survey().is_empty());
    }

    #[test]
    fn prop_added_questions_have_unique_ids(count in 1usize..20) {
        let mut builder = SurveyBuilder::default();
        let mut ids = HashSet::new();
        for n in 0..count {
            builder.draft_mut().set_question_text(format!("Q{n}"));
            ids.insert(builder.add_question().unwrap());
        }
        prop_assert_eq!(ids.len(), count);
        prop_assert_eq!(builder.survey().len(), count);
    }

    #[test]
    fn prop_validation_flags_exactly_unanswered_required(
        spec in proptest::collection::vec((question_type(), any::<bool>(), any::<bool>()), 0..10),
    ) {
        let mut questions = Vec::new();
        let mut responses = Responses::new();
        let mut expected = HashSet::new();
        for (n, (kind, required, answered)) in spec.into_iter().enumerate() {
            let id = QuestionId::new(n as u64 + 1);
            questions.push(Question::new(id, format!("Q{n}"), kind).with_options(["a"]).required(required));
            if answered {
                let answer = match kind {
                    QuestionType::Text => Answer::Text("x".into()),
                    QuestionType::MultipleChoice => Answer::MultipleChoice("a".into()),
                    QuestionType::Checkboxes => Answer::checkboxes(["a"]),
                    QuestionType::Rating => Answer::Rating(3),
                    QuestionType::Date => Answer::Date("2024-01-01".into()),
                };
                responses.insert(id, answer);
            } else {
                let empty = match kind {
                    QuestionType::Text => Some(Answer::Text(String::new())),
                    QuestionType::MultipleChoice => Some(Answer::MultipleChoice(String::new())),
                    QuestionType::Checkboxes => Some(Answer::checkboxes(Vec::<String>::new())),
                    QuestionType::Date => Some(Answer::Date(String::new())),
                    QuestionType::Rating => None,
                };
                if let Some(empty) = empty {
                    responses.insert(id, empty);
                }
                if required {
                    expected.insert(id);
                }
            }
        }

        let first = validate(&questions, &responses);
        let second = validate(&questions, &responses);
        let flagged: HashSet<_> = first.keys().copied().collect();
        prop_assert_eq!(flagged, expected);
        prop_assert_eq!(first, second);
    }
}
