use canvass::{Control, Draft, Question, QuestionInput, Storage, SurveyViewer};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::app::{App, BuilderFocus};
use crate::backend::Theme;

pub(crate) fn draw<S: Storage>(frame: &mut Frame, app: &App<S>, title: &str, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title and mode
            Constraint::Min(5),    // Screen
            Constraint::Length(1), // Status
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    let preview = app.shell().is_preview();
    let mode = if preview { "[ Preview ]" } else { "[ Builder ]" };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            title.to_string(),
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(mode, Style::default().fg(theme.highlight)),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(theme.border)),
    );
    frame.render_widget(header, chunks[0]);

    match app.shell().viewer() {
        Some(viewer) => draw_viewer(frame, app, viewer, chunks[1], theme),
        None => draw_builder(frame, app, chunks[1], theme),
    }

    draw_status(frame, app, chunks[2], theme);

    let help_text = if preview {
        "Tab: Next  ↑/↓: Options  Space/Enter: Select  F10: Submit  F2: Builder  F5: Export  F6: Import  Esc: Quit"
    } else {
        "Tab/↑/↓: Move  ←/→: Type  Enter: Activate  Del: Remove  F2: Preview  F5: Export  F6: Import  Esc: Quit"
    };
    let help = Paragraph::new(help_text).style(Style::default().fg(theme.border));
    frame.render_widget(help, chunks[3]);
}

fn draw_status<S: Storage>(frame: &mut Frame, app: &App<S>, area: Rect, theme: &Theme) {
    if let Some(path) = app.import_prompt() {
        let prompt = format!("Import from: {path}");
        let width = prompt.chars().count() as u16;
        frame.render_widget(
            Paragraph::new(prompt).style(Style::default().fg(theme.highlight)),
            area,
        );
        if width < area.width {
            frame.set_cursor_position((area.x + width, area.y));
        }
        return;
    }

    if let Some(status) = app.status() {
        let color = if status.is_error {
            theme.error
        } else {
            theme.success
        };
        frame.render_widget(
            Paragraph::new(status.text.as_str()).style(Style::default().fg(color)),
            area,
        );
    }
}

fn draw_builder<S: Storage>(frame: &mut Frame, app: &App<S>, area: Rect, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    draw_draft(frame, app, columns[0], theme);
    draw_question_list(frame, app, columns[1], theme);
}

fn draw_draft<S: Storage>(frame: &mut Frame, app: &App<S>, area: Rect, theme: &Theme) {
    let draft = app.shell().draft();
    let focus = app.builder_focus();
    let issues = draft.visible_issues();
    let has_options = draft.kind().has_options();

    let mut constraints = vec![Constraint::Length(3), Constraint::Length(3)];
    if has_options {
        constraints.push(Constraint::Length(draft.options().len() as u16 + 3));
    }
    constraints.extend([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(0),
    ]);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);
    let mut rows = rows.iter().copied();
    let mut next_row = || rows.next().unwrap_or_default();

    // Question text
    let text_area = next_row();
    let text_focused = focus == BuilderFocus::QuestionText;
    let text_error = issues.question_text().map(ToString::to_string);
    let block = field_block(" Question Text ", text_focused, text_error.is_some(), theme);
    let inner = block.inner(text_area);
    frame.render_widget(block, text_area);
    frame.render_widget(
        Paragraph::new(draft.question_text()).style(Style::default().fg(theme.text)),
        inner,
    );
    if text_focused {
        place_cursor(frame, inner, draft.question_text());
    }
    draw_error(frame, text_area, text_error.as_deref(), theme);

    // Type picker
    let kind_area = next_row();
    let kind_focused = focus == BuilderFocus::Kind;
    let block = field_block(" Question Type ", kind_focused, false, theme);
    let inner = block.inner(kind_area);
    frame.render_widget(block, kind_area);
    let label = if kind_focused {
        format!("◀ {} ▶", draft.kind().label())
    } else {
        draft.kind().label().to_string()
    };
    frame.render_widget(
        Paragraph::new(label).style(Style::default().fg(theme.text)),
        inner,
    );

    if has_options {
        draw_option_slots(frame, draft, focus, next_row(), theme);
    }

    // Required
    let required_area = next_row();
    let marker = if draft.is_required() { "[✓]" } else { "[ ]" };
    let style = if focus == BuilderFocus::Required {
        Style::default()
            .fg(theme.text)
            .bg(theme.selected_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    frame.render_widget(
        Paragraph::new(format!(" {marker} Required")).style(style),
        required_area,
    );

    draw_button(
        frame,
        "Add Question",
        focus == BuilderFocus::AddQuestion,
        app.shell().builder().can_add(),
        next_row(),
        theme,
    );

    let messages: Vec<Line> = issues
        .iter()
        .map(|issue| Line::styled(format!("⚠ {issue}"), Style::default().fg(theme.error)))
        .collect();
    frame.render_widget(
        Paragraph::new(messages).wrap(Wrap { trim: true }),
        next_row(),
    );
}

fn draw_option_slots(frame: &mut Frame, draft: &Draft, focus: BuilderFocus, area: Rect, theme: &Theme) {
    let issues = draft.visible_issues();
    let blank: Vec<usize> = issues.blank_options().collect();
    let block = field_block(" Options ", false, !blank.is_empty(), theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut items: Vec<ListItem> = draft
        .options()
        .iter()
        .enumerate()
        .map(|(index, option)| {
            let focused = focus == BuilderFocus::Option(index);
            let text = if option.is_empty() && !focused {
                format!("{}. Option {}", index + 1, index + 1)
            } else {
                format!("{}. {option}", index + 1)
            };
            let style = if focused {
                Style::default()
                    .fg(theme.text)
                    .bg(theme.selected_bg)
                    .add_modifier(Modifier::BOLD)
            } else if blank.contains(&index) {
                Style::default().fg(theme.error)
            } else if option.is_empty() {
                Style::default().fg(theme.border)
            } else {
                Style::default().fg(theme.text)
            };
            ListItem::new(text).style(style)
        })
        .collect();

    let add_style = if focus == BuilderFocus::AddOption {
        Style::default()
            .fg(theme.primary)
            .bg(theme.selected_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.primary)
    };
    items.push(ListItem::new("+ Add option").style(add_style));
    frame.render_widget(List::new(items), inner);

    if let BuilderFocus::Option(index) = focus
        && let Some(option) = draft.options().get(index)
    {
        let prefix = format!("{}. ", index + 1);
        let row = Rect {
            y: inner.y + index as u16,
            height: 1,
            ..inner
        };
        place_cursor(frame, row, &format!("{prefix}{option}"));
    }
}

fn draw_question_list<S: Storage>(frame: &mut Frame, app: &App<S>, area: Rect, theme: &Theme) {
    let survey = app.shell().survey();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(format!(" Questions ({}) ", survey.len()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if survey.is_empty() {
        frame.render_widget(
            Paragraph::new("No questions yet.").style(Style::default().fg(theme.border)),
            inner,
        );
        return;
    }

    let items: Vec<ListItem> = survey
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let required = if question.is_required() { " *" } else { "" };
            let text = format!(
                "{}. {}{required}  ({})",
                index + 1,
                question.question_text(),
                question.kind().label()
            );
            let style = if app.builder_focus() == BuilderFocus::Question(index) {
                Style::default()
                    .fg(theme.text)
                    .bg(theme.selected_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            ListItem::new(text).style(style)
        })
        .collect();
    frame.render_widget(List::new(items), inner);
}

fn draw_viewer<S: Storage>(
    frame: &mut Frame,
    app: &App<S>,
    viewer: &SurveyViewer,
    area: Rect,
    theme: &Theme,
) {
    if viewer.is_submitted() {
        let thanks = Paragraph::new("Thank you for submitting the survey!")
            .style(
                Style::default()
                    .fg(theme.success)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.success)),
            );
        frame.render_widget(thanks, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);
    let form_area = chunks[0];

    let inputs = viewer.inputs();
    let heights: Vec<u16> = inputs.iter().map(field_height).collect();

    // Scroll just far enough to keep the focused field in view.
    let focus = app.viewer_focus().min(inputs.len().saturating_sub(1));
    let mut start = 0;
    while start < focus && heights[start..=focus].iter().sum::<u16>() > form_area.height {
        start += 1;
    }

    let mut y = form_area.y;
    let bottom = form_area.y + form_area.height;
    for (index, (input, question)) in inputs.iter().zip(viewer.questions()).enumerate().skip(start) {
        if y >= bottom {
            break;
        }
        let height = heights[index].min(bottom - y);
        let field_area = Rect {
            x: form_area.x,
            y,
            width: form_area.width,
            height,
        };
        let focused = index == app.viewer_focus();
        let typed = app.date_input(question.id());
        draw_input(frame, question, input, typed, focused, app.highlight(), field_area, theme);
        y += height;
    }

    draw_button(
        frame,
        "Submit",
        app.viewer_focus() >= inputs.len(),
        viewer.can_submit(),
        chunks[1],
        theme,
    );
}

fn field_height(input: &QuestionInput) -> u16 {
    match input.control() {
        Control::Choice { items } | Control::Checkboxes { items } => 2 + items.len() as u16,
        _ => 3,
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_input(
    frame: &mut Frame,
    question: &Question,
    input: &QuestionInput,
    typed: Option<&str>,
    focused: bool,
    highlight: usize,
    area: Rect,
    theme: &Theme,
) {
    let required = if question.is_required() { " *" } else { "" };
    let title = format!(" {}{required} ", question.question_text());
    let block = field_block(&title, focused, input.error().is_some(), theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match input.control() {
        Control::Text { value } => {
            frame.render_widget(
                Paragraph::new(value.as_str()).style(Style::default().fg(theme.text)),
                inner,
            );
            if focused {
                place_cursor(frame, inner, value);
            }
        }
        Control::Date { value, placeholder } => {
            let typed = typed.filter(|t| !t.is_empty());
            let (shown, style) = match typed {
                Some(typed) => (typed, Style::default().fg(theme.text)),
                None if !value.is_empty() => (value.as_str(), Style::default().fg(theme.text)),
                None => (placeholder.as_str(), Style::default().fg(theme.border)),
            };
            frame.render_widget(Paragraph::new(shown).style(style), inner);
            if focused {
                place_cursor(frame, inner, typed.unwrap_or(""));
            }
        }
        Control::Choice { items } | Control::Checkboxes { items } => {
            let radio = matches!(input.control(), Control::Choice { .. });
            let list: Vec<ListItem> = items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    let marker = match (radio, item.checked) {
                        (true, true) => "(●)",
                        (true, false) => "( )",
                        (false, true) => "[✓]",
                        (false, false) => "[ ]",
                    };
                    let style = if focused && index == highlight {
                        Style::default()
                            .fg(theme.text)
                            .bg(theme.selected_bg)
                            .add_modifier(Modifier::BOLD)
                    } else if item.checked {
                        Style::default().fg(if radio { theme.highlight } else { theme.success })
                    } else {
                        Style::default().fg(theme.text)
                    };
                    ListItem::new(format!("{marker} {}", item.label)).style(style)
                })
                .collect();
            frame.render_widget(List::new(list), inner);
        }
        Control::Rating { items } => {
            let spans: Vec<Span> = items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    let marker = if item.checked { "●" } else { " " };
                    let style = if focused && index == highlight {
                        Style::default()
                            .fg(theme.text)
                            .bg(theme.selected_bg)
                            .add_modifier(Modifier::BOLD)
                    } else if item.checked {
                        Style::default().fg(theme.highlight)
                    } else {
                        Style::default().fg(theme.text)
                    };
                    Span::styled(format!(" ({marker}) {} ", item.label), style)
                })
                .collect();
            frame.render_widget(Paragraph::new(Line::from(spans)), inner);
        }
    }

    draw_error(frame, area, input.error(), theme);
}

fn field_block<'a>(title: &'a str, focused: bool, error: bool, theme: &Theme) -> Block<'a> {
    let border_color = if error {
        theme.error
    } else if focused {
        theme.primary
    } else {
        theme.border
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title)
        .title_style(Style::default().fg(if focused {
            theme.highlight
        } else {
            theme.text
        }))
}

/// Write an error over the bottom border of a field.
fn draw_error(frame: &mut Frame, area: Rect, error: Option<&str>, theme: &Theme) {
    let Some(error) = error else {
        return;
    };
    if area.height == 0 {
        return;
    }
    let error_text = Paragraph::new(format!("⚠ {error}")).style(Style::default().fg(theme.error));
    let error_area = Rect {
        x: area.x + 1,
        y: area.y + area.height - 1,
        width: area.width.saturating_sub(2),
        height: 1,
    };
    frame.render_widget(error_text, error_area);
}

fn draw_button(
    frame: &mut Frame,
    label: &str,
    focused: bool,
    enabled: bool,
    area: Rect,
    theme: &Theme,
) {
    let style = match (enabled, focused) {
        (false, _) => Style::default().fg(theme.border),
        (true, true) => Style::default()
            .fg(theme.text)
            .bg(theme.primary)
            .add_modifier(Modifier::BOLD),
        (true, false) => Style::default()
            .fg(theme.primary)
            .add_modifier(Modifier::BOLD),
    };
    let text = if focused {
        format!("[ {label} ]")
    } else {
        label.to_string()
    };
    let button = Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if focused && enabled {
                    theme.primary
                } else {
                    theme.border
                })),
        );
    frame.render_widget(button, area);
}

fn place_cursor(frame: &mut Frame, area: Rect, text: &str) {
    let x = area.x + text.chars().count() as u16;
    if x < area.x + area.width {
        frame.set_cursor_position((x, area.y));
    }
}
