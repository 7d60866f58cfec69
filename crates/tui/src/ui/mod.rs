pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::app::{AppState, Screen};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
use theme::Theme;

use components::hints;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        area,
    );

    // info bar, content, bottom bar
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    match state.screen {
        Screen::Login => screens::login::render(frame, layout[1], state),
        Screen::List => screens::expenses::render(frame, layout[1], state),
        Screen::Form => screens::form::render(frame, layout[1], state),
    }
    render_bottom_bar(frame, layout[2], state, &theme);

    components::confirm::render(frame, area, state.confirm.as_ref());
    components::toast::render(frame, area, state.toast.as_ref());
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let user = state
        .user
        .as_ref()
        .and_then(|user| user.email.as_deref())
        .unwrap_or("-");

    let line = Line::from(vec![
        Span::styled("Expenses", Style::default().fg(theme.accent)),
        Span::raw("  "),
        Span::styled("User", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {user}  ")),
        Span::styled("Server", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}", state.backend)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let context = match state.screen {
        Screen::Login => hints::LOGIN,
        Screen::List if state.confirm.is_some() => hints::CONFIRM,
        Screen::List => hints::LIST,
        Screen::Form => hints::FORM,
    };
    let mut parts = hints::hints_to_spans(context, theme);

    parts.push(hints::hint_separator(theme));
    let quit = if state.accepts_text() { "Ctrl+C" } else { "q" };
    parts.push(Span::styled(quit, Style::default().fg(theme.accent)));
    parts.push(Span::raw(" quit"));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
