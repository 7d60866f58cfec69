use api_types::expense::ExpenseCategory;
use engine::{EditorStatus, Field};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{AppState, FormField, FormView},
    ui::{
        components::{card::Card, centered_box},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let Some(view) = &state.form else {
        return;
    };
    let theme = Theme::default();

    let card_area = centered_box(56.min(area.width), 16.min(area.height), area);
    let card = Card::new(view.editor.mode().title(), &theme).focused(true);
    let inner = card.inner(card_area);
    card.render_frame(frame, card_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Date
            Constraint::Length(3), // Description
            Constraint::Length(3), // Category
            Constraint::Length(3), // Amount
            Constraint::Min(0),    // Status
        ])
        .split(inner);

    let form = &view.editor.form;
    render_text_field(frame, rows[0], view, FormField::Date, &form.date, &theme);
    render_text_field(
        frame,
        rows[1],
        view,
        FormField::Description,
        &form.description,
        &theme,
    );
    render_category(frame, rows[2], view, form.category, &theme);
    render_text_field(frame, rows[3], view, FormField::Amount, &form.amount, &theme);
    render_status(frame, rows[4], view.editor.status(), &theme);
}

fn label(field: FormField) -> (&'static str, Field) {
    match field {
        FormField::Date => ("Date (YYYY-MM-DD)", Field::Date),
        FormField::Description => ("Description", Field::Description),
        FormField::Category => ("Category", Field::Category),
        FormField::Amount => ("Amount (Rp)", Field::Amount),
    }
}

/// Label line, value line, error line.
fn field_lines(
    view: &FormView,
    field: FormField,
    value: Vec<Span<'static>>,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let (title, key) = label(field);
    let focused = view.focus == field;
    let label_style = if focused {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_muted)
    };

    let mut lines = vec![Line::from(Span::styled(title, label_style)), Line::from(value)];
    if let Some(message) = view.editor.errors().get(key) {
        lines.push(Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(theme.error),
        )));
    }
    lines
}

fn render_text_field(
    frame: &mut Frame<'_>,
    area: Rect,
    view: &FormView,
    field: FormField,
    value: &str,
    theme: &Theme,
) {
    let cursor = if view.focus == field { "│" } else { "" };
    let value = vec![Span::styled(
        format!("  {value}{cursor}"),
        Style::default().fg(theme.text),
    )];
    frame.render_widget(Paragraph::new(field_lines(view, field, value, theme)), area);
}

fn render_category(
    frame: &mut Frame<'_>,
    area: Rect,
    view: &FormView,
    selected: Option<ExpenseCategory>,
    theme: &Theme,
) {
    let mut value = vec![Span::raw("  ")];
    for category in [ExpenseCategory::Income, ExpenseCategory::Outcome] {
        let chosen = selected == Some(category);
        let marker = if chosen { "(•)" } else { "( )" };
        let style = if chosen {
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim)
        };
        value.push(Span::styled(
            format!("{marker} {}   ", category.display_name()),
            style,
        ));
    }
    frame.render_widget(
        Paragraph::new(field_lines(view, FormField::Category, value, theme)),
        area,
    );
}

fn render_status(frame: &mut Frame<'_>, area: Rect, status: &EditorStatus, theme: &Theme) {
    let line = match status {
        EditorStatus::Idle => return,
        EditorStatus::Loading => Line::from(Span::styled("Loading…", Style::default().fg(theme.dim))),
        EditorStatus::Saving => Line::from(Span::styled("Saving…", Style::default().fg(theme.dim))),
        EditorStatus::Failed(err) => Line::from(Span::styled(
            format!("Error: {err}"),
            Style::default().fg(theme.error),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}
