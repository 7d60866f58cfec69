use engine::DeleteRequest;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::ui::{
    components::{centered_box, hints},
    theme::Theme,
};

/// Modal asking to confirm a delete.
pub fn render(frame: &mut Frame<'_>, area: Rect, request: Option<&DeleteRequest>) {
    let Some(request) = request else {
        return;
    };
    let theme = Theme::default();
    let popup = centered_box(48.min(area.width), 7.min(area.height), area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(Span::styled(
            " Delete this expense? ",
            Style::default().fg(theme.warning),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.warning));

    let lines = vec![
        Line::from(Span::styled(
            request.description().to_string(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "This cannot be undone.",
            Style::default().fg(theme.dim),
        )),
        Line::from(""),
        Line::from(hints::hints_to_spans(hints::CONFIRM, &theme)),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        popup,
    );
}
