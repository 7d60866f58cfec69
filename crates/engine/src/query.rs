//! Filter, sort and pagination state of the expense list.

use api_types::expense::ExpenseCategory;

use crate::store::ListRequest;

/// Number of records per page.
pub const PAGE_SIZE: u64 = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Credit,
    Debit,
}

impl CategoryFilter {
    pub fn category(self) -> Option<ExpenseCategory> {
        match self {
            Self::All => None,
            Self::Credit => Some(ExpenseCategory::Income),
            Self::Debit => Some(ExpenseCategory::Outcome),
        }
    }

    /// `true` when a record of `category` passes this filter.
    pub fn matches(self, category: ExpenseCategory) -> bool {
        self.category().is_none_or(|c| c == category)
    }

    /// All → Credit → Debit → All.
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Credit,
            Self::Credit => Self::Debit,
            Self::Debit => Self::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Credit => "Credit",
            Self::Debit => "Debit",
        }
    }
}

/// Sortable columns. The column names are the table's.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Date,
    Description,
    Category,
    Amount,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::Date,
        SortField::Description,
        SortField::Category,
        SortField::Amount,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Description => "description",
            Self::Category => "category",
            Self::Amount => "amount",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Description => "Description",
            Self::Category => "Category",
            Self::Amount => "Amount",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "↑",
            Self::Descending => "↓",
        }
    }
}

/// The parameters of one list fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueryDescriptor {
    pub category_filter: CategoryFilter,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    /// 1-based.
    pub page: u64,
    pub page_size: u64,
}

impl From<&QueryDescriptor> for ListRequest {
    fn from(descriptor: &QueryDescriptor) -> Self {
        Self {
            category: descriptor.category_filter.category(),
            order_by: descriptor.sort_field,
            ascending: descriptor.sort_direction == SortDirection::Ascending,
            offset: descriptor.page.saturating_sub(1) * descriptor.page_size,
            limit: descriptor.page_size,
        }
    }
}

/// `ceil(total_count / PAGE_SIZE)`.
pub fn total_pages(total_count: u64) -> u64 {
    total_count.div_ceil(PAGE_SIZE)
}

/// Mutable filter/sort/page state owned by the list view.
///
/// Every method that returns `true` changed the descriptor; the caller is
/// expected to refetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryState {
    category_filter: CategoryFilter,
    sort_field: SortField,
    sort_direction: SortDirection,
    page: u64,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            category_filter: CategoryFilter::All,
            sort_field: SortField::Date,
            sort_direction: SortDirection::Descending,
            page: 1,
        }
    }
}

impl QueryState {
    pub fn descriptor(&self) -> QueryDescriptor {
        QueryDescriptor {
            category_filter: self.category_filter,
            sort_field: self.sort_field,
            sort_direction: self.sort_direction,
            page: self.page,
            page_size: PAGE_SIZE,
        }
    }

    pub fn category_filter(&self) -> CategoryFilter {
        self.category_filter
    }

    pub fn sort_field(&self) -> SortField {
        self.sort_field
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    /// Same column flips the direction; another column becomes active,
    /// ascending. Always changes the descriptor.
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Ascending;
        }
    }

    /// Changing the filter goes back to page 1, the old page may not exist
    /// in the filtered list.
    pub fn set_filter(&mut self, filter: CategoryFilter) -> bool {
        if self.category_filter == filter {
            return false;
        }
        self.category_filter = filter;
        self.page = 1;
        true
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self, total_pages: u64) -> bool {
        self.page < total_pages
    }

    pub fn prev_page(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.page -= 1;
        true
    }

    pub fn next_page(&mut self, total_pages: u64) -> bool {
        if !self.has_next(total_pages) {
            return false;
        }
        self.page += 1;
        true
    }

    /// Pulls the page back into `[1, total_pages]` after the list shrank.
    pub fn clamp_to(&mut self, total_pages: u64) -> bool {
        let last = total_pages.max(1);
        if self.page <= last {
            return false;
        }
        self.page = last;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_newest_first_on_page_one() {
        let d = QueryState::default().descriptor();
        assert_eq!(d.category_filter, CategoryFilter::All);
        assert_eq!(d.sort_field, SortField::Date);
        assert_eq!(d.sort_direction, SortDirection::Descending);
        assert_eq!(d.page, 1);
        assert_eq!(d.page_size, 10);
    }

    #[test]
    fn toggling_another_column_resets_to_ascending() {
        let mut state = QueryState::default();
        state.toggle_sort(SortField::Description);
        assert_eq!(state.sort_field(), SortField::Description);
        assert_eq!(state.sort_direction(), SortDirection::Ascending);
    }

    #[test]
    fn toggling_active_column_flips_direction() {
        let mut state = QueryState::default();
        state.toggle_sort(SortField::Date);
        assert_eq!(state.sort_direction(), SortDirection::Ascending);
        state.toggle_sort(SortField::Date);
        assert_eq!(state.sort_direction(), SortDirection::Descending);
        assert_eq!(state.sort_field(), SortField::Date);
    }

    #[test]
    fn filter_change_resets_page() {
        let mut state = QueryState::default();
        assert!(state.next_page(5));
        assert!(state.next_page(5));
        assert_eq!(state.page(), 3);

        assert!(state.set_filter(CategoryFilter::Debit));
        assert_eq!(state.page(), 1);
        assert!(!state.set_filter(CategoryFilter::Debit));
    }

    #[test]
    fn paging_stays_within_bounds() {
        let mut state = QueryState::default();
        assert!(!state.has_prev());
        assert!(!state.prev_page());

        assert!(state.has_next(2));
        assert!(state.next_page(2));
        assert!(!state.has_next(2));
        assert!(!state.next_page(2));
        assert_eq!(state.page(), 2);

        assert!(state.prev_page());
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn empty_list_has_no_next_page() {
        let state = QueryState::default();
        assert_eq!(total_pages(0), 0);
        assert!(!state.has_next(total_pages(0)));
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(10), 1);
        assert_eq!(total_pages(11), 2);
        assert_eq!(total_pages(42), 5);
    }

    #[test]
    fn clamp_pulls_page_back() {
        let mut state = QueryState::default();
        state.next_page(3);
        state.next_page(3);
        assert!(state.clamp_to(2));
        assert_eq!(state.page(), 2);
        assert!(!state.clamp_to(2));
        assert!(state.clamp_to(0));
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn descriptor_maps_to_range() {
        let mut state = QueryState::default();
        state.set_filter(CategoryFilter::Credit);
        state.toggle_sort(SortField::Amount);
        state.next_page(3);

        let request = ListRequest::from(&state.descriptor());
        assert_eq!(request.category, Some(ExpenseCategory::Income));
        assert_eq!(request.order_by, SortField::Amount);
        assert!(request.ascending);
        assert_eq!(request.offset, 10);
        assert_eq!(request.limit, 10);
    }

    #[test]
    fn filter_matches_categories() {
        assert!(CategoryFilter::All.matches(ExpenseCategory::Income));
        assert!(CategoryFilter::All.matches(ExpenseCategory::Outcome));
        assert!(CategoryFilter::Credit.matches(ExpenseCategory::Income));
        assert!(!CategoryFilter::Credit.matches(ExpenseCategory::Outcome));
        assert!(!CategoryFilter::Debit.matches(ExpenseCategory::Income));
    }
}
