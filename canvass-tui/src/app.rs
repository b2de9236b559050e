//! Screen state and key handling, kept apart from drawing so it can be
//! driven without a terminal.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use canvass::input::{ISO_DATE_FORMAT, date_placeholder, parse_date};
use canvass::{
    Control, ControlAction, QuestionId, QuestionInput, QuestionType, Shell, Storage, Submission,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What has focus on the builder screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderFocus {
    QuestionText,
    Kind,
    Option(usize),
    AddOption,
    Required,
    AddQuestion,
    /// An already added question, by position.
    Question(usize),
}

/// A one-line message in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub is_error: bool,
}

impl Status {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Everything the terminal frontend remembers between key presses.
#[derive(Debug)]
pub struct App<S> {
    shell: Shell<S>,
    export_dir: PathBuf,
    builder_focus: BuilderFocus,
    /// Position in the viewer; one past the last question is the submit button.
    viewer_focus: usize,
    /// Highlighted item within a choice, checkbox or rating field.
    highlight: usize,
    /// Raw date text as typed, which may not parse yet.
    date_input: HashMap<QuestionId, String>,
    import_prompt: Option<String>,
    status: Option<Status>,
    submissions: Vec<Submission>,
    quit: bool,
}

impl<S: Storage> App<S> {
    pub fn new(shell: Shell<S>, export_dir: impl Into<PathBuf>) -> Self {
        let mut app = Self {
            shell,
            export_dir: export_dir.into(),
            builder_focus: BuilderFocus::QuestionText,
            viewer_focus: 0,
            highlight: 0,
            date_input: HashMap::new(),
            import_prompt: None,
            status: None,
            submissions: Vec::new(),
            quit: false,
        };
        app.reset_viewer_focus();
        app
    }

    pub fn shell(&self) -> &Shell<S> {
        &self.shell
    }

    pub fn builder_focus(&self) -> BuilderFocus {
        self.builder_focus
    }

    pub fn viewer_focus(&self) -> usize {
        self.viewer_focus
    }

    pub fn highlight(&self) -> usize {
        self.highlight
    }

    pub fn date_input(&self, id: QuestionId) -> Option<&str> {
        self.date_input.get(&id).map(String::as_str)
    }

    pub fn import_prompt(&self) -> Option<&str> {
        self.import_prompt.as_deref()
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn into_submissions(self) -> Vec<Submission> {
        self.submissions
    }

    /// The focusable items of the builder screen, top to bottom.
    pub fn builder_items(&self) -> Vec<BuilderFocus> {
        let draft = self.shell.draft();
        let mut items = vec![BuilderFocus::QuestionText, BuilderFocus::Kind];
        if draft.kind().has_options() {
            items.extend((0..draft.options().len()).map(BuilderFocus::Option));
            items.push(BuilderFocus::AddOption);
        }
        items.push(BuilderFocus::Required);
        items.push(BuilderFocus::AddQuestion);
        items.extend((0..self.shell.survey().len()).map(BuilderFocus::Question));
        items
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.import_prompt.is_some() {
            self.prompt_key(key);
        } else {
            match key.code {
                KeyCode::Esc => self.quit = true,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.quit = true;
                }
                KeyCode::F(2) => self.toggle_view(),
                KeyCode::F(5) => {
                    let dir = self.export_dir.clone();
                    let _ = self.shell.export_to_dir(&dir);
                }
                KeyCode::F(6) => self.import_prompt = Some(String::new()),
                _ if self.shell.is_preview() => self.viewer_key(key),
                _ => self.builder_key(key),
            }
        }

        if let Some(notice) = self.shell.take_notice() {
            self.status = Some(Status {
                text: notice.to_string(),
                is_error: notice.is_error(),
            });
        }
    }

    fn toggle_view(&mut self) {
        self.shell.toggle_view();
        self.date_input.clear();
        self.reset_viewer_focus();
        self.clamp_builder_focus();
    }

    fn prompt_key(&mut self, key: KeyEvent) {
        let Some(path) = self.import_prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.import_prompt = None,
            KeyCode::Enter => {
                let path = std::mem::take(path);
                self.import_prompt = None;
                let path = path.trim();
                if path.is_empty() {
                    return;
                }
                if self.shell.import_from_file(Path::new(path)).is_ok() {
                    self.date_input.clear();
                    self.reset_viewer_focus();
                    self.clamp_builder_focus();
                }
            }
            KeyCode::Backspace => {
                path.pop();
            }
            KeyCode::Char(c) => path.push(c),
            _ => {}
        }
    }

    fn builder_key(&mut self, key: KeyEvent) {
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::BackTab | KeyCode::Up => self.move_builder_focus(false),
            KeyCode::Tab if shift => self.move_builder_focus(false),
            KeyCode::Tab | KeyCode::Down => self.move_builder_focus(true),
            _ => self.builder_field_key(key),
        }
        self.clamp_builder_focus();
    }

    fn builder_field_key(&mut self, key: KeyEvent) {
        match (self.builder_focus, key.code) {
            (BuilderFocus::QuestionText, KeyCode::Char(c)) => {
                let mut text = self.shell.draft().question_text().to_string();
                text.push(c);
                self.shell.draft_mut().set_question_text(text);
            }
            (BuilderFocus::QuestionText, KeyCode::Backspace) => {
                let mut text = self.shell.draft().question_text().to_string();
                text.pop();
                self.shell.draft_mut().set_question_text(text);
            }
            (BuilderFocus::Kind, KeyCode::Left) => self.cycle_kind(false),
            (BuilderFocus::Kind, KeyCode::Right | KeyCode::Char(' ')) => self.cycle_kind(true),
            (BuilderFocus::Option(index), KeyCode::Delete) => {
                self.shell.draft_mut().remove_option_slot(index);
            }
            (BuilderFocus::Option(index), KeyCode::Char(c)) => {
                let mut text = self.option_text(index);
                text.push(c);
                self.shell.draft_mut().update_option(index, text);
            }
            (BuilderFocus::Option(index), KeyCode::Backspace) => {
                let mut text = self.option_text(index);
                text.pop();
                self.shell.draft_mut().update_option(index, text);
            }
            (BuilderFocus::AddOption, KeyCode::Enter | KeyCode::Char(' ')) => {
                self.shell.draft_mut().add_option_slot();
                let last = self.shell.draft().options().len().saturating_sub(1);
                self.builder_focus = BuilderFocus::Option(last);
            }
            (BuilderFocus::Required, KeyCode::Enter | KeyCode::Char(' ')) => {
                let required = !self.shell.draft().is_required();
                self.shell.draft_mut().set_required(required);
            }
            (BuilderFocus::AddQuestion, KeyCode::Enter | KeyCode::Char(' ')) => self.add_question(),
            (BuilderFocus::Question(index), KeyCode::Delete | KeyCode::Char('d')) => {
                let id = self.shell.survey().questions().get(index).map(|q| q.id());
                if let Some(id) = id {
                    self.shell.remove_question(id);
                }
            }
            (_, KeyCode::Enter) => self.move_builder_focus(true),
            _ => {}
        }
    }

    fn add_question(&mut self) {
        match self.shell.add_question() {
            Ok(_) => {
                self.status = Some(Status::info("Question added."));
                self.builder_focus = BuilderFocus::QuestionText;
            }
            Err(issues) => {
                self.shell.draft_mut().blur_question_text();
                let text = issues
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" ");
                self.status = Some(Status::error(text));
            }
        }
    }

    fn option_text(&self, index: usize) -> String {
        self.shell
            .draft()
            .options()
            .get(index)
            .cloned()
            .unwrap_or_default()
    }

    fn cycle_kind(&mut self, forward: bool) {
        let all = QuestionType::ALL;
        let current = self.shell.draft().kind();
        let pos = all.iter().position(|k| *k == current).unwrap_or(0);
        let next = if forward {
            (pos + 1) % all.len()
        } else {
            (pos + all.len() - 1) % all.len()
        };
        self.shell.draft_mut().set_kind(all[next]);
    }

    fn move_builder_focus(&mut self, forward: bool) {
        let items = self.builder_items();
        let pos = items
            .iter()
            .position(|item| *item == self.builder_focus)
            .unwrap_or(0);
        let next = if forward {
            (pos + 1).min(items.len() - 1)
        } else {
            pos.saturating_sub(1)
        };
        if self.builder_focus == BuilderFocus::QuestionText && next != pos {
            self.shell.draft_mut().blur_question_text();
        }
        self.builder_focus = items[next];
    }

    /// Keep focus on something that still exists after the draft or survey changed.
    fn clamp_builder_focus(&mut self) {
        if self.builder_items().contains(&self.builder_focus) {
            return;
        }
        let draft = self.shell.draft();
        self.builder_focus = match self.builder_focus {
            BuilderFocus::Option(_) | BuilderFocus::AddOption => {
                if !draft.kind().has_options() {
                    BuilderFocus::Kind
                } else if let Some(last) = draft.options().len().checked_sub(1) {
                    BuilderFocus::Option(last)
                } else {
                    BuilderFocus::AddOption
                }
            }
            BuilderFocus::Question(_) => match self.shell.survey().len().checked_sub(1) {
                Some(last) => BuilderFocus::Question(last),
                None => BuilderFocus::AddQuestion,
            },
            _ => BuilderFocus::QuestionText,
        };
    }

    fn viewer_key(&mut self, key: KeyEvent) {
        let Some(viewer) = self.shell.viewer() else {
            return;
        };
        if viewer.is_submitted() {
            return;
        }
        let on_submit = self.viewer_focus >= viewer.questions().len();
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        match key.code {
            KeyCode::BackTab => self.move_viewer_focus(false),
            KeyCode::Tab if shift => self.move_viewer_focus(false),
            KeyCode::Tab => self.move_viewer_focus(true),
            KeyCode::F(10) => self.submit(),
            KeyCode::Enter if on_submit => self.submit(),
            KeyCode::Up if on_submit => self.move_viewer_focus(false),
            _ => self.field_key(key),
        }
    }

    fn field_key(&mut self, key: KeyEvent) {
        let Some(input) = self.focused_input() else {
            return;
        };
        let id = input.question();
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        let action = match (input.control(), key.code) {
            (Control::Text { value }, KeyCode::Char(c)) => {
                let mut value = value.clone();
                value.push(c);
                Some(ControlAction::Edit(value))
            }
            (Control::Text { value }, KeyCode::Backspace) => {
                let mut value = value.clone();
                value.pop();
                Some(ControlAction::Edit(value))
            }
            // Ctrl+T: today
            (Control::Date { .. }, KeyCode::Char('t')) if ctrl => {
                parse_date(&date_placeholder()).map(|today| {
                    self.date_input
                        .insert(id, today.format(ISO_DATE_FORMAT).to_string());
                    ControlAction::PickDate(today)
                })
            }
            (Control::Date { .. }, KeyCode::Char(c)) => {
                let typed = self.date_input.entry(id).or_default();
                typed.push(c);
                Some(ControlAction::Edit(typed.clone()))
            }
            (Control::Date { .. }, KeyCode::Backspace) => {
                let typed = self.date_input.entry(id).or_default();
                typed.pop();
                Some(ControlAction::Edit(typed.clone()))
            }
            (Control::Text { .. } | Control::Date { .. }, KeyCode::Enter | KeyCode::Down) => {
                self.move_viewer_focus(true);
                None
            }
            (Control::Text { .. } | Control::Date { .. }, KeyCode::Up) => {
                self.move_viewer_focus(false);
                None
            }
            (
                Control::Choice { items } | Control::Checkboxes { items } | Control::Rating { items },
                KeyCode::Up | KeyCode::Left,
            ) => {
                if !items.is_empty() {
                    self.highlight = (self.highlight + items.len() - 1) % items.len();
                }
                None
            }
            (
                Control::Choice { items } | Control::Checkboxes { items } | Control::Rating { items },
                KeyCode::Down | KeyCode::Right,
            ) => {
                if !items.is_empty() {
                    self.highlight = (self.highlight + 1) % items.len();
                }
                None
            }
            (Control::Choice { .. } | Control::Rating { .. }, KeyCode::Char(' ') | KeyCode::Enter) => {
                Some(ControlAction::Select(self.highlight))
            }
            (Control::Checkboxes { .. }, KeyCode::Char(' ') | KeyCode::Enter) => {
                Some(ControlAction::Toggle(self.highlight))
            }
            // Number keys pick items directly (1-9)
            (Control::Choice { .. } | Control::Rating { .. }, KeyCode::Char(c)) => {
                digit_index(c).map(|index| {
                    self.highlight = index;
                    ControlAction::Select(index)
                })
            }
            (Control::Checkboxes { .. }, KeyCode::Char(c)) => digit_index(c).map(|index| {
                self.highlight = index;
                ControlAction::Toggle(index)
            }),
            _ => None,
        };

        if let Some(action) = action
            && let Some(event) = input.handle(action)
            && let Some(viewer) = self.shell.viewer_mut()
        {
            viewer.handle(event);
        }
    }

    fn focused_input(&self) -> Option<QuestionInput> {
        let viewer = self.shell.viewer()?;
        let id = viewer.questions().get(self.viewer_focus)?.id();
        viewer.input_for(id)
    }

    /// Move between fields, reporting a blur for the field being left.
    fn move_viewer_focus(&mut self, forward: bool) {
        if let Some(input) = self.focused_input()
            && let Some(event) = input.handle(ControlAction::Blur)
            && let Some(viewer) = self.shell.viewer_mut()
        {
            viewer.handle(event);
        }

        let count = self.shell.viewer().map_or(0, |v| v.questions().len());
        self.viewer_focus = if forward {
            (self.viewer_focus + 1).min(count)
        } else {
            self.viewer_focus.saturating_sub(1)
        };
        self.highlight = self.checked_index();
    }

    fn reset_viewer_focus(&mut self) {
        self.viewer_focus = 0;
        self.highlight = self.checked_index();
    }

    /// The first checked item of the focused field, so the highlight starts there.
    fn checked_index(&self) -> usize {
        self.focused_input()
            .and_then(|input| match input.control() {
                Control::Choice { items } | Control::Checkboxes { items } | Control::Rating { items } => {
                    items.iter().position(|item| item.checked)
                }
                _ => None,
            })
            .unwrap_or(0)
    }

    /// Submit when every required question is answered; otherwise the button is inert.
    fn submit(&mut self) {
        let Some(viewer) = self.shell.viewer_mut() else {
            return;
        };
        if !viewer.can_submit() {
            return;
        }
        match viewer.submit() {
            Ok(submission) => {
                self.submissions.push(submission);
                self.status = Some(Status::info("Survey submitted."));
            }
            Err(err) => self.status = Some(Status::error(err.to_string())),
        }
    }
}

fn digit_index(c: char) -> Option<usize> {
    let digit = c.to_digit(10)? as usize;
    digit.checked_sub(1)
}
