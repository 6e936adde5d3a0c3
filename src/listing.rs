use serde::Serialize;
use std::cmp::Ordering;

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// A record that can be shown in a list view
pub trait Listable {
    /// Columns in display order
    const COLUMNS: &'static [&'static str];

    /// Columns the free-text search looks at
    const SEARCHABLE: &'static [&'static str];

    fn default_sort() -> SortState {
        SortState::new(Self::COLUMNS[0], Direction::Ascending)
    }

    /// Stringified value of a column, empty for unknown columns
    fn value(&self, column: &str) -> String;
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: String,
    pub direction: Direction,
}

impl SortState {
    pub fn new(column: impl Into<String>, direction: Direction) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    /// Clicking the active column flips the direction, any other column sorts ascending
    pub fn toggle(&mut self, column: &str) {
        if self.column == column {
            self.direction = self.direction.reversed();
        } else {
            self.column = column.to_string();
            self.direction = Direction::Ascending;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub search: String,
    pub sort: SortState,
    /// 1-based
    pub page: usize,
    pub page_size: usize,
}

impl ListQuery {
    pub fn for_type<T: Listable>() -> Self {
        Self {
            search: String::new(),
            sort: T::default_sort(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

/// Case-insensitive comparison with a case-sensitive tie-breaker
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Whether any searchable column contains the query, ignoring case
pub fn matches<T: Listable>(record: &T, query: &str) -> bool {
    let query = query.trim().to_lowercase();

    if query.is_empty() {
        return true;
    }

    T::SEARCHABLE
        .iter()
        .any(|column| record.value(column).to_lowercase().contains(&query))
}

/// Filter, sort and slice records into one page
pub fn apply<'a, T: Listable>(records: &'a [T], query: &ListQuery) -> Page<&'a T> {
    let mut selected: Vec<(String, &T)> = records
        .iter()
        .filter(|record| matches(*record, &query.search))
        .map(|record| (record.value(&query.sort.column), record))
        .collect();

    selected.sort_by(|(a, _), (b, _)| {
        let ordering = locale_compare(a, b);

        match query.sort.direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    });

    let page_size = query.page_size.max(1);
    let total = selected.len();
    let total_pages = total.div_ceil(page_size).max(1);
    let page = query.page.max(1);

    // An offset that overflows is past the end like any other
    let offset = (page - 1).checked_mul(page_size).unwrap_or(usize::MAX);

    let items = selected
        .into_iter()
        .skip(offset)
        .take(page_size)
        .map(|(_, record)| record)
        .collect();

    Page {
        items,
        page,
        total_pages,
        total,
    }
}

/// Records plus the query currently applied to them
#[derive(Debug, Clone)]
pub struct ListView<T> {
    records: Vec<T>,
    query: ListQuery,
}

impl<T: Listable> Default for ListView<T> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl<T: Listable> ListView<T> {
    pub fn new(page_size: usize) -> Self {
        let mut query = ListQuery::for_type::<T>();
        query.page_size = page_size;

        Self {
            records: Vec::new(),
            query,
        }
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn set_records(&mut self, records: Vec<T>) {
        self.records = records;
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn toggle_sort(&mut self, column: &str) {
        self.query.sort.toggle(column);
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.query.sort = sort;
    }

    /// A new search always starts from the first page
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
        self.query.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.query.page = page.max(1);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.query.page_size = page_size.max(1);
        self.query.page = 1;
    }

    pub fn page(&self) -> Page<&T> {
        apply(&self.records, &self.query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::alert::{MonitoredObjects, ThresholdType, TriggeredAlert};
    use chrono::{TimeZone, Utc};

    fn triggered(id: &str, name: &str, hour: u32) -> TriggeredAlert {
        TriggeredAlert {
            id: id.into(),
            alert_name: name.into(),
            time: Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap(),
            threshold_type: ThresholdType::Absolute,
            threshold: "5".into(),
            value: None,
            monitored_objects: MonitoredObjects::General,
            object_id: None,
            message: None,
        }
    }

    fn ids(page: &Page<&TriggeredAlert>) -> Vec<String> {
        page.items.iter().map(|alert| alert.id.clone()).collect()
    }

    #[test]
    fn triggered_alerts_default_to_most_recent_first() {
        let mut view = ListView::default();
        view.set_records(vec![
            triggered("a", "Low stock", 8),
            triggered("b", "Overload", 14),
            triggered("c", "Shortage", 11),
        ]);

        assert_eq!(ids(&view.page()), vec!["b", "c", "a"]);

        view.toggle_sort("time");
        assert_eq!(ids(&view.page()), vec!["a", "c", "b"]);
    }

    #[test]
    fn switching_columns_sorts_ascending() {
        let mut view = ListView::default();
        view.set_records(vec![
            triggered("a", "shortage", 8),
            triggered("b", "Overload", 14),
            triggered("c", "low stock", 11),
        ]);

        view.toggle_sort("alertName");

        assert_eq!(view.query().sort.direction, Direction::Ascending);
        assert_eq!(ids(&view.page()), vec!["c", "b", "a"]);
    }

    #[test]
    fn search_is_case_insensitive_over_searchable_columns() {
        let mut view = ListView::default();
        view.set_records(vec![
            triggered("a", "Low stock", 8),
            triggered("b", "Overload", 14),
        ]);

        view.set_search("STOCK");
        assert_eq!(ids(&view.page()), vec!["a"]);

        // threshold is not searchable
        view.set_search("5");
        assert!(view.page().items.is_empty());
    }

    #[test]
    fn paginates_and_reports_totals() {
        let mut view = ListView::new(2);
        view.set_records((0..5).map(|h| triggered(&h.to_string(), "x", h)).collect());

        let first = view.page();
        assert_eq!(first.total, 5);
        assert_eq!(first.total_pages, 3);
        assert_eq!(ids(&first), vec!["4", "3"]);

        view.set_page(3);
        assert_eq!(ids(&view.page()), vec!["0"]);

        view.set_page(9);
        assert!(view.page().items.is_empty());
    }

    #[test]
    fn huge_page_is_past_the_end() {
        let mut view = ListView::new(20);
        view.set_records(vec![triggered("a", "Low stock", 8)]);
        view.set_page(usize::MAX);

        let page = view.page();
        assert!(page.items.is_empty());
        assert_eq!(page.page, usize::MAX);
        assert_eq!(page.total, 1);
    }

    #[test]
    fn new_search_resets_to_first_page() {
        let mut view: ListView<TriggeredAlert> = ListView::new(2);
        view.set_page(3);
        view.set_search("x");

        assert_eq!(view.query().page, 1);
    }

    #[test]
    fn locale_compare_ignores_case_first() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("B", "a"), Ordering::Greater);
        assert_eq!(locale_compare("same", "same"), Ordering::Equal);
    }
}
