use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::{AppState, LoginField},
    ui::{components::centered_box, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let card_area = centered_box(44.min(area.width), 8.min(area.height), area);
    frame.render_widget(Clear, card_area);

    let block = Block::default()
        .title(" sign in ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    let inner = block.inner(card_area);
    frame.render_widget(block, card_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Email
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Password
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Status
        ])
        .margin(1)
        .split(inner);

    let login = &state.login;

    let email_focused = login.focus == LoginField::Email;
    render_input(frame, rows[0], "email", &login.email, false, email_focused, &theme);

    let password_focused = login.focus == LoginField::Password;
    render_input(
        frame,
        rows[2],
        "password",
        &login.password,
        true,
        password_focused,
        &theme,
    );

    if login.pending {
        frame.render_widget(
            Paragraph::new(Span::styled("Signing in…", Style::default().fg(theme.dim)))
                .alignment(Alignment::Center),
            rows[4],
        );
    }

    if let Some(message) = &login.message {
        let error_area = Rect {
            x: card_area.x,
            y: card_area.y + card_area.height + 1,
            width: card_area.width,
            height: 1,
        }
        .intersection(area);
        frame.render_widget(
            Paragraph::new(Span::styled(
                message.as_str(),
                Style::default().fg(theme.error),
            ))
            .alignment(Alignment::Center),
            error_area,
        );
    }
}

fn render_input(
    frame: &mut Frame<'_>,
    area: Rect,
    label: &str,
    value: &str,
    is_password: bool,
    focused: bool,
    theme: &Theme,
) {
    let cursor = if focused { "│" } else { "" };

    let display = if is_password {
        format!("{}{}", mask_password(value), cursor)
    } else {
        format!("{value}{cursor}")
    };

    let style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text_muted)
    };

    let line = Line::from(vec![
        Span::styled(format!("{label:>9} "), Style::default().fg(theme.dim)),
        Span::styled(display, style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn mask_password(password: &str) -> String {
    "•".repeat(password.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_is_masked_per_character() {
        assert_eq!(mask_password(""), "");
        assert_eq!(mask_password("sécret"), "••••••");
    }
}
