use api_types::expense::ExpenseCategory;
use engine::Rupiah;
use ratatui::{style::Style, text::Span};

use crate::ui::theme::Theme;

/// Amount of a record, coloured by its category.
#[must_use]
pub fn category_amount(amount: i64, category: ExpenseCategory, theme: &Theme) -> Span<'static> {
    let color = match category {
        ExpenseCategory::Income => theme.positive,
        ExpenseCategory::Outcome => theme.negative,
    };
    Span::styled(Rupiah::new(amount).to_string(), Style::default().fg(color))
}

/// Signed figure such as the balance: green when positive, red when
/// negative.
#[must_use]
pub fn signed_amount(amount: Rupiah, theme: &Theme) -> Span<'static> {
    let color = match amount.value() {
        v if v > 0 => theme.positive,
        v if v < 0 => theme.negative,
        _ => theme.text,
    };
    Span::styled(amount.to_string(), Style::default().fg(color))
}

/// Short badge for the category column.
#[must_use]
pub fn category_badge(category: ExpenseCategory, theme: &Theme) -> Span<'static> {
    let color = match category {
        ExpenseCategory::Income => theme.positive,
        ExpenseCategory::Outcome => theme.negative,
    };
    Span::styled(
        format!("[{}]", category.display_name()),
        Style::default().fg(color),
    )
}
