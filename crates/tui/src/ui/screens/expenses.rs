use engine::{Balance, LoadState, SortField};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
};

use crate::{
    app::AppState,
    ui::{
        components::{
            card::{Card, StatCard},
            money,
        },
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Summary cards
            Constraint::Length(1), // Filter / status
            Constraint::Min(0),    // Table
            Constraint::Length(1), // Page footer
        ])
        .split(area);

    render_summary(frame, layout[0], state, &theme);
    render_header(frame, layout[1], state, &theme);
    render_table(frame, layout[2], state, &theme);
    render_footer(frame, layout[3], state, &theme);
}

fn render_summary(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    let Some(Balance {
        total_credit,
        total_debit,
        balance,
    }) = state.balance
    else {
        let message = state.balance_error.as_deref().unwrap_or("Loading…");
        for (column, title) in columns.iter().zip(["Credit", "Debit", "Balance"]) {
            StatCard::new(
                title,
                Span::styled("-", Style::default().fg(theme.dim)),
                theme,
            )
            .subtitle(message)
            .render(frame, *column);
        }
        return;
    };

    StatCard::new(
        "Credit",
        Span::styled(total_credit.to_string(), Style::default().fg(theme.positive)),
        theme,
    )
    .render(frame, columns[0]);
    StatCard::new(
        "Debit",
        Span::styled(total_debit.to_string(), Style::default().fg(theme.negative)),
        theme,
    )
    .render(frame, columns[1]);
    let mut card = StatCard::new("Balance", money::signed_amount(balance, theme), theme);
    if let Some(err) = &state.balance_error {
        card = card.subtitle(format!("stale: {err}"));
    }
    card.render(frame, columns[2]);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let query = state.list.query();
    let mut line = vec![
        Span::styled("Filter", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}   ", query.category_filter().label())),
        Span::styled("Sort", Style::default().fg(theme.dim)),
        Span::raw(format!(
            ": {} {}   ",
            query.sort_field().label(),
            query.sort_direction().arrow()
        )),
    ];

    match state.list.state() {
        LoadState::Loading => line.push(Span::styled("Loading…", Style::default().fg(theme.dim))),
        LoadState::Error(err) => line.push(Span::styled(
            format!("Error: {err}"),
            Style::default().fg(theme.error),
        )),
        LoadState::Idle | LoadState::Success => {}
    }
    if state.deleting {
        line.push(Span::styled("  Deleting…", Style::default().fg(theme.warning)));
    }

    frame.render_widget(Paragraph::new(Line::from(line)), area);
}

fn column_title(field: SortField, state: &AppState) -> String {
    let query = state.list.query();
    if query.sort_field() == field {
        format!("{} {}", field.label(), query.sort_direction().arrow())
    } else {
        field.label().to_string()
    }
}

fn render_table(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let card = Card::new("Expenses", theme).focused(true);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    let records = state.list.records();
    if records.is_empty() {
        let message = match state.list.state() {
            LoadState::Loading | LoadState::Idle => "Loading…",
            LoadState::Error(_) => "Could not load expenses. Press r to retry.",
            LoadState::Success => "No expenses found.",
        };
        frame.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(theme.dim)))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let header = Row::new(
        SortField::ALL
            .iter()
            .enumerate()
            .map(|(i, field)| Cell::from(format!("{} {}", i + 1, column_title(*field, state)))),
    )
    .style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD));

    let rows = records.iter().map(|expense| {
        Row::new(vec![
            Cell::from(expense.date.format("%d %b %Y").to_string()),
            Cell::from(expense.description.clone()),
            Cell::from(money::category_badge(expense.category, theme)),
            Cell::from(Line::from(money::category_amount(
                expense.amount,
                expense.category,
                theme,
            ))
            .alignment(Alignment::Right)),
        ])
        .style(Style::default().fg(theme.text))
    });

    let widths = [
        Constraint::Length(14),
        Constraint::Min(16),
        Constraint::Length(12),
        Constraint::Length(18),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    let mut table_state = TableState::default();
    table_state.select(Some(state.selected.min(records.len() - 1)));
    frame.render_stateful_widget(table, inner, &mut table_state);
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let list = &state.list;
    let query = list.query();
    let enabled = Style::default().fg(theme.accent);
    let disabled = Style::default().fg(theme.dim);

    let line = Line::from(vec![
        Span::styled(
            "◀ p  ",
            if query.has_prev() { enabled } else { disabled },
        ),
        Span::raw(page_label(query.page(), list.total_pages())),
        Span::styled(
            format!("  ({} total)", list.total_count()),
            Style::default().fg(theme.dim),
        ),
        Span::styled(
            "  n ▶",
            if list.has_next() { enabled } else { disabled },
        ),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

/// "Page X of Y"; an empty list still shows one page.
fn page_label(page: u64, total_pages: u64) -> String {
    format!("Page {page} of {}", total_pages.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_reads_page_one_of_one() {
        assert_eq!(page_label(1, 0), "Page 1 of 1");
        assert_eq!(page_label(2, 3), "Page 2 of 3");
    }
}
