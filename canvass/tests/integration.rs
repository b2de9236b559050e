//! Integration tests for canvass

use canvass::{
    Answer, Control, ControlAction, FileStorage, ImportError, MemoryStorage, Notice, Persistence,
    QuestionType, Shell, Storage, SubmitError, Survey, ViewerState,
};
use pretty_assertions::assert_eq;

fn memory_shell() -> Shell<MemoryStorage> {
    Shell::open(Persistence::new(MemoryStorage::new()))
}

#[test]
fn test_author_then_fill_required_text() {
    let mut shell = memory_shell();
    let draft = shell.draft_mut();
    draft.set_question_text("Name?");
    draft.set_kind(QuestionType::Text);
    draft.set_required(true);
    let name = shell.add_question().unwrap();

    shell.toggle_view();
    let viewer = shell.viewer_mut().unwrap();

    // Nothing shown until the field is left.
    assert!(!viewer.can_submit());
    assert_eq!(viewer.input_for(name).unwrap().error(), None);

    let event = viewer
        .input_for(name)
        .unwrap()
        .handle(ControlAction::Blur)
        .unwrap();
    viewer.handle(event);
    assert_eq!(
        viewer.input_for(name).unwrap().error(),
        Some("This field is required.")
    );

    let event = viewer
        .input_for(name)
        .unwrap()
        .handle(ControlAction::Edit("Alice".into()))
        .unwrap();
    viewer.handle(event);
    assert_eq!(viewer.input_for(name).unwrap().error(), None);
    assert!(viewer.can_submit());

    let submission = viewer.submit().unwrap();
    assert_eq!(submission.to_json(), serde_json::json!({ "Name?": "Alice" }));
    assert_eq!(viewer.state(), ViewerState::Submitted);
}

#[test]
fn test_optional_checkboxes_submit_empty_list() {
    let mut shell = memory_shell();
    let draft = shell.draft_mut();
    draft.set_question_text("Colors?");
    draft.set_kind(QuestionType::Checkboxes);
    draft.add_option_slot();
    draft.update_option(0, "Red");
    draft.add_option_slot();
    draft.update_option(1, "Blue");
    shell.add_question().unwrap();

    shell.toggle_view();
    let viewer = shell.viewer_mut().unwrap();
    assert!(viewer.can_submit());
    let submission = viewer.submit().unwrap();
    assert_eq!(submission.to_json(), serde_json::json!({ "Colors?": [] }));
}

#[test]
fn test_required_checkboxes_need_a_tick() {
    let survey = example_surveys::job_application();
    let mut viewer = canvass::SurveyViewer::new(survey.questions().to_vec());
    let skills = survey
        .iter()
        .find(|q| q.question_text() == "Skills")
        .unwrap()
        .id();

    viewer.change(skills, Answer::checkboxes(Vec::<String>::new()));
    assert!(viewer.errors().contains_key(&skills));

    let input = viewer.input_for(skills).unwrap();
    viewer.handle(input.handle(ControlAction::Toggle(0)).unwrap());
    assert!(!viewer.errors().contains_key(&skills));

    let input = viewer.input_for(skills).unwrap();
    let Control::Checkboxes { items } = input.control() else {
        panic!("expected checkboxes");
    };
    assert!(items[0].checked);
}

#[test]
fn test_invalid_submit_reports_missing_count() {
    let survey = example_surveys::job_application();
    let required = survey.iter().filter(|q| q.is_required()).count();
    let mut viewer = canvass::SurveyViewer::new(survey.into_questions());

    assert_eq!(
        viewer.submit(),
        Err(SubmitError::Invalid { missing: required })
    );
    assert_eq!(viewer.state(), ViewerState::Filling);
}

#[test]
fn test_export_import_round_trip_for_every_example() {
    let tmp = tempfile::tempdir().unwrap();
    let persistence = Persistence::new(MemoryStorage::new());

    for (name, survey) in example_surveys::all() {
        let dir = tmp.path().join(name);
        std::fs::create_dir_all(&dir).unwrap();
        let path = persistence.export_to_dir(&survey, &dir).unwrap();
        assert_eq!(persistence.import_from_file(&path).unwrap(), survey, "{name}");
    }
}

#[test]
fn test_import_rejections_keep_current_survey() {
    let mut shell = memory_shell();
    shell.import_json(&serde_json::to_string(&example_surveys::sandwich_order()).unwrap())
        .unwrap();
    let before = shell.survey().clone();

    let notice = shell.import_json(r#"{"foo": 1}"#).unwrap_err();
    assert!(matches!(notice, Notice::ImportRejected(ImportError::NotAnArray)));

    let notice = shell.import_json(r#"[{"questionText": "Q1"}]"#).unwrap_err();
    assert!(matches!(
        notice,
        Notice::ImportRejected(ImportError::MissingFields { index: 0 })
    ));
    assert_eq!(notice.to_string(), "Invalid survey format!");

    assert_eq!(*shell.survey(), before);
}

#[test]
fn test_file_storage_survives_reopen() {
    let tmp = tempfile::tempdir().unwrap();

    let mut shell = Shell::open(Persistence::new(FileStorage::new(tmp.path())));
    shell.draft_mut().set_question_text("When?");
    shell.draft_mut().set_kind(QuestionType::Date);
    let id = shell.add_question().unwrap();

    let reopened = Shell::open(Persistence::new(FileStorage::new(tmp.path())));
    assert_eq!(reopened.survey().len(), 1);
    assert_eq!(reopened.survey().questions()[0].id(), id);
    assert_eq!(reopened.survey().questions()[0].kind(), QuestionType::Date);
}

#[test]
fn test_saved_value_is_compact_question_array() {
    let mut shell = memory_shell();
    shell.draft_mut().set_question_text("Rate us");
    shell.draft_mut().set_kind(QuestionType::Rating);
    shell.draft_mut().set_required(true);
    let id = shell.add_question().unwrap();

    let raw = shell
        .persistence()
        .storage()
        .get(canvass::DEFAULT_STORAGE_KEY)
        .unwrap()
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{
            "id": id.get(),
            "questionText": "Rate us",
            "type": "rating",
            "required": true
        }])
    );
    assert!(!raw.contains('\n'));
}

#[test]
fn test_rating_and_date_payload() {
    let survey = Survey::new(vec![
        canvass::Question::new(1u64, "Rate us", QuestionType::Rating),
        canvass::Question::new(2u64, "When?", QuestionType::Date),
    ]);
    let mut viewer = canvass::SurveyViewer::new(survey.into_questions());
    let rate = canvass::QuestionId::new(1);
    let when = canvass::QuestionId::new(2);

    let event = viewer.input_for(rate).unwrap().handle(ControlAction::Select(3));
    viewer.handle(event.unwrap());
    let event = viewer
        .input_for(when)
        .unwrap()
        .handle(ControlAction::Edit("24/12/2024".into()));
    viewer.handle(event.unwrap());

    let submission = viewer.submit().unwrap();
    assert_eq!(
        submission.to_json(),
        serde_json::json!({ "Rate us": "4", "When?": "2024-12-24" })
    );
}
