//! Question input controls.
//!
//! [`render`] maps a question, its current answer and an optional error to a
//! [`QuestionInput`]: a presentation-agnostic description of the control a
//! frontend should draw. Frontends feed user interaction back through
//! [`QuestionInput::handle`], which turns it into the only two events a form
//! cares about: a changed value or a lost focus. Controls never validate.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use chrono::NaiveDate;

use crate::{Answer, FieldError, Question, QuestionId, QuestionType};

/// The values offered by a rating control.
pub const RATING_SCALE: RangeInclusive<u8> = 1..=5;

/// Format of emitted dates.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format of the date placeholder, also accepted when editing.
pub const PLACEHOLDER_DATE_FORMAT: &str = "%d/%m/%Y";

/// What a control reports back to the form that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// The value of a question changed.
    Changed { question: QuestionId, value: Answer },

    /// The control of a question lost focus.
    Blurred { question: QuestionId },
}

impl InputEvent {
    /// The question this event belongs to.
    pub fn question(&self) -> QuestionId {
        match self {
            Self::Changed { question, .. } | Self::Blurred { question } => *question,
        }
    }
}

/// A user interaction with a control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlAction {
    /// Replace the typed text (text and date controls).
    Edit(String),

    /// Choose the item at an index (multiple choice and rating controls).
    Select(usize),

    /// Tick or untick the item at an index (checkbox controls).
    Toggle(usize),

    /// Pick a date directly (date controls).
    PickDate(NaiveDate),

    /// Leave the control.
    Blur,
}

/// One selectable entry of a choice, checkbox or rating control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceItem {
    pub label: String,
    pub checked: bool,
}

/// The control to draw, with its current display state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// Single-line text box.
    Text { value: String },

    /// Radio group; at most one item is checked.
    Choice { items: Vec<ChoiceItem> },

    /// Checkbox group.
    Checkboxes { items: Vec<ChoiceItem> },

    /// Radio group labeled 1 through 5.
    Rating { items: Vec<ChoiceItem> },

    /// Date entry; `value` is the ISO date, `placeholder` a hint for empty input.
    Date { value: String, placeholder: String },
}

/// A rendered question input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionInput {
    question: QuestionId,
    options: Vec<String>,
    current: Option<Answer>,
    control: Control,
    error: Option<String>,
}

/// Render the input for a question.
///
/// `value` is the current answer; an answer the question cannot take is
/// shown as unanswered. `error` is displayed as given.
pub fn render(question: &Question, value: Option<&Answer>, error: Option<&FieldError>) -> QuestionInput {
    let kind = question.kind();
    let current = value.filter(|answer| answer.fits_question(question)).cloned();
    let options = question.options().to_vec();

    let control = match kind {
        QuestionType::Text => Control::Text {
            value: current
                .as_ref()
                .and_then(Answer::as_str)
                .unwrap_or_default()
                .to_string(),
        },
        QuestionType::MultipleChoice => {
            let chosen = current.as_ref().and_then(Answer::as_str);
            Control::Choice {
                items: options
                    .iter()
                    .map(|option| ChoiceItem {
                        label: option.clone(),
                        checked: chosen == Some(option.as_str()),
                    })
                    .collect(),
            }
        }
        QuestionType::Checkboxes => {
            let ticked = current.as_ref().and_then(Answer::as_selection);
            Control::Checkboxes {
                items: options
                    .iter()
                    .map(|option| ChoiceItem {
                        label: option.clone(),
                        checked: ticked.is_some_and(|set| set.contains(option)),
                    })
                    .collect(),
            }
        }
        QuestionType::Rating => {
            let rating = current.as_ref().and_then(Answer::as_rating);
            Control::Rating {
                items: RATING_SCALE
                    .map(|n| ChoiceItem {
                        label: n.to_string(),
                        checked: rating == Some(n),
                    })
                    .collect(),
            }
        }
        QuestionType::Date => Control::Date {
            value: current
                .as_ref()
                .and_then(Answer::as_str)
                .unwrap_or_default()
                .to_string(),
            placeholder: date_placeholder(),
        },
    };

    QuestionInput {
        question: question.id(),
        options,
        current,
        control,
        error: error.map(ToString::to_string),
    }
}

impl QuestionInput {
    /// The question this input belongs to.
    pub fn question(&self) -> QuestionId {
        self.question
    }

    /// The control to draw.
    pub fn control(&self) -> &Control {
        &self.control
    }

    /// The error to show beneath the control, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Translate a user interaction into an input event.
    ///
    /// Returns `None` when the action does not apply to this control, such as
    /// toggling a text box or selecting an index past the last option.
    pub fn handle(&self, action: ControlAction) -> Option<InputEvent> {
        let question = self.question;
        let value = match (&self.control, action) {
            (_, ControlAction::Blur) => return Some(InputEvent::Blurred { question }),
            (Control::Text { .. }, ControlAction::Edit(text)) => Answer::Text(text),
            (Control::Choice { .. }, ControlAction::Select(index)) => {
                Answer::MultipleChoice(self.options.get(index)?.clone())
            }
            (Control::Checkboxes { .. }, ControlAction::Toggle(index)) => {
                let option = self.options.get(index)?;
                let mut ticked = self
                    .current
                    .as_ref()
                    .and_then(Answer::as_selection)
                    .cloned()
                    .unwrap_or_else(BTreeSet::new);
                if !ticked.remove(option) {
                    ticked.insert(option.clone());
                }
                Answer::Checkboxes(ticked)
            }
            (Control::Rating { .. }, ControlAction::Select(index)) => {
                let rating = u8::try_from(index).ok()?.checked_add(*RATING_SCALE.start())?;
                if !RATING_SCALE.contains(&rating) {
                    return None;
                }
                Answer::Rating(rating)
            }
            (Control::Date { .. }, ControlAction::Edit(text)) => {
                Answer::Date(parse_date(&text).map(format_iso).unwrap_or_default())
            }
            (Control::Date { .. }, ControlAction::PickDate(date)) => Answer::Date(format_iso(date)),
            _ => return None,
        };
        Some(InputEvent::Changed { question, value })
    }
}

/// Parse a date typed as ISO (`2024-03-01`) or in placeholder form (`01/03/2024`).
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, ISO_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(input, PLACEHOLDER_DATE_FORMAT))
        .ok()
}

fn format_iso(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Today's local date, used as a hint in empty date inputs.
pub fn date_placeholder() -> String {
    chrono::Local::now()
        .date_naive()
        .format(PLACEHOLDER_DATE_FORMAT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changed(event: Option<InputEvent>) -> Answer {
        match event {
            Some(InputEvent::Changed { value, .. }) => value,
            other => panic!("expected a change, got {other:?}"),
        }
    }

    #[test]
    fn text_emits_raw_string() {
        let q = Question::new(1u64, "Name?", QuestionType::Text);
        let input = render(&q, None, None);
        assert_eq!(input.control(), &Control::Text { value: String::new() });
        assert_eq!(
            changed(input.handle(ControlAction::Edit(" Al ".into()))),
            Answer::Text(" Al ".into())
        );
    }

    #[test]
    fn multiple_choice_replaces_selection() {
        let q = Question::new(1u64, "Pet?", QuestionType::MultipleChoice).with_options(["Cat", "Dog"]);
        let current = Answer::MultipleChoice("Cat".into());
        let input = render(&q, Some(&current), None);

        let Control::Choice { items } = input.control() else {
            panic!("expected a choice control");
        };
        assert!(items[0].checked && !items[1].checked);

        assert_eq!(
            changed(input.handle(ControlAction::Select(1))),
            Answer::MultipleChoice("Dog".into())
        );
        assert_eq!(input.handle(ControlAction::Select(2)), None);
    }

    #[test]
    fn checkboxes_toggle_single_option() {
        let q = Question::new(1u64, "Colors?", QuestionType::Checkboxes)
            .with_options(["Red", "Blue", "Green"]);
        let current = Answer::checkboxes(["Red", "Blue"]);
        let input = render(&q, Some(&current), None);

        assert_eq!(
            changed(input.handle(ControlAction::Toggle(0))),
            Answer::checkboxes(["Blue"])
        );
        assert_eq!(
            changed(input.handle(ControlAction::Toggle(2))),
            Answer::checkboxes(["Red", "Blue", "Green"])
        );
    }

    #[test]
    fn first_toggle_starts_from_empty_set() {
        let q = Question::new(1u64, "Colors?", QuestionType::Checkboxes).with_options(["Red"]);
        let input = render(&q, None, None);
        assert_eq!(
            changed(input.handle(ControlAction::Toggle(0))),
            Answer::checkboxes(["Red"])
        );
    }

    #[test]
    fn rating_offers_one_to_five() {
        let q = Question::new(1u64, "Rate us", QuestionType::Rating);
        let input = render(&q, Some(&Answer::Rating(3)), None);

        let Control::Rating { items } = input.control() else {
            panic!("expected a rating control");
        };
        let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, ["1", "2", "3", "4", "5"]);
        assert!(items[2].checked);

        assert_eq!(changed(input.handle(ControlAction::Select(4))), Answer::Rating(5));
        assert_eq!(input.handle(ControlAction::Select(5)), None);
    }

    #[test]
    fn date_always_emits_iso() {
        let q = Question::new(1u64, "When?", QuestionType::Date);
        let input = render(&q, None, None);

        assert_eq!(
            changed(input.handle(ControlAction::Edit("01/03/2024".into()))),
            Answer::Date("2024-03-01".into())
        );
        assert_eq!(
            changed(input.handle(ControlAction::Edit("2024-03-01".into()))),
            Answer::Date("2024-03-01".into())
        );
        assert_eq!(
            changed(input.handle(ControlAction::Edit("2024-03".into()))),
            Answer::Date(String::new())
        );

        let picked = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
        assert_eq!(
            changed(input.handle(ControlAction::PickDate(picked))),
            Answer::Date("1999-12-31".into())
        );
    }

    #[test]
    fn date_placeholder_is_parseable() {
        assert!(parse_date(&date_placeholder()).is_some());
    }

    #[test]
    fn blur_is_reported_for_every_control() {
        for kind in QuestionType::ALL {
            let q = Question::new(9u64, "Q", kind).with_options(["a"]);
            assert_eq!(
                render(&q, None, None).handle(ControlAction::Blur),
                Some(InputEvent::Blurred {
                    question: QuestionId::new(9)
                })
            );
        }
    }

    #[test]
    fn mismatched_actions_are_ignored() {
        let q = Question::new(1u64, "Name?", QuestionType::Text);
        assert_eq!(render(&q, None, None).handle(ControlAction::Toggle(0)), None);
    }

    #[test]
    fn wrong_shaped_value_renders_unanswered() {
        let q = Question::new(1u64, "Rate us", QuestionType::Rating);
        let input = render(&q, Some(&Answer::Text("5".into())), None);
        let Control::Rating { items } = input.control() else {
            panic!("expected a rating control");
        };
        assert!(items.iter().all(|i| !i.checked));
    }

    #[test]
    fn error_is_passed_through() {
        let q = Question::new(1u64, "Name?", QuestionType::Text);
        let input = render(&q, None, Some(&FieldError::RequiredFieldMissing));
        assert_eq!(input.error(), Some("This field is required."));
    }
}
