//! Record filtering by category, search term and time window

use chrono::NaiveDate;
use std::str::FromStr;

use crate::dates::{self, CalendarDate};
use crate::models::{Product, Sale};
use crate::pagination::DEFAULT_PAGE_SIZE;

/// Sentinel meaning "no constraint" for a dimension
pub const ALL: &str = "all";

/// Older front-ends stored the sentinel in Portuguese
const ALL_ALIASES: [&str; 2] = [ALL, "todas"];

/// Anything the filters can look at
pub trait Record {
    fn category(&self) -> &str;
    /// Main free-text field (product description)
    fn detail(&self) -> &str;
    fn brand(&self) -> &str;
    /// Normalized date, `None` for records without one
    fn date(&self) -> Option<CalendarDate> {
        None
    }
}

impl Record for Product {
    fn category(&self) -> &str {
        &self.category
    }

    fn detail(&self) -> &str {
        &self.detail
    }

    fn brand(&self) -> &str {
        &self.brand
    }
}

impl Record for Sale {
    fn category(&self) -> &str {
        &self.category
    }

    fn detail(&self) -> &str {
        &self.product
    }

    fn brand(&self) -> &str {
        &self.brand
    }

    fn date(&self) -> Option<CalendarDate> {
        Some(dates::normalize(&self.sale_date))
    }
}

/// Either every value or exactly one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(selected) => selected == value,
        }
    }
}

impl Selection<String> {
    /// Parse a category choice; `all` (any case) means no constraint
    pub fn category(raw: &str) -> Self {
        if is_all(raw) {
            Selection::All
        } else {
            Selection::Only(raw.to_string())
        }
    }

    fn admits_category(&self, category: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(selected) => selected.to_lowercase() == category.to_lowercase(),
        }
    }
}

impl<T> From<Option<T>> for Selection<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Selection::All, Selection::Only)
    }
}

fn is_all(raw: &str) -> bool {
    let raw = raw.trim();
    ALL_ALIASES.iter().any(|alias| raw.eq_ignore_ascii_case(alias))
}

/// Time constraint for the sales view
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TimeWindow {
    /// No time constraint
    #[default]
    Any,
    /// Same calendar day as today
    Daily,
    /// Sunday-to-Saturday week containing today
    Weekly,
    /// Same year and month as today
    Monthly,
    /// Year/month dropdowns, each independently "all" or a value.
    /// The month is 0-based.
    Period { year: Selection<i32>, month: Selection<u32> },
}

impl TimeWindow {
    pub fn admits(&self, date: Option<CalendarDate>, today: NaiveDate) -> bool {
        if *self == TimeWindow::Any {
            return true;
        }
        let Some(date) = date else {
            return false;
        };
        let now = CalendarDate::from_naive(today);

        match self {
            TimeWindow::Any => true,
            TimeWindow::Daily => date == now,
            TimeWindow::Weekly => {
                let Some(day) = date.to_naive() else {
                    return false;
                };
                let (start, end) = dates::week_bounds(today);
                day >= start && day <= end
            }
            TimeWindow::Monthly => date.year == now.year && date.month == now.month,
            TimeWindow::Period { year, month } => {
                !date.is_zero() && year.admits(&date.year) && month.admits(&date.month)
            }
        }
    }
}

impl FromStr for TimeWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "diario" | "diário" => Ok(TimeWindow::Daily),
            "weekly" | "semanal" => Ok(TimeWindow::Weekly),
            "monthly" | "mensal" => Ok(TimeWindow::Monthly),
            "any" | "all" | "todas" => Ok(TimeWindow::Any),
            other => Err(format!("unknown time window '{}'", other)),
        }
    }
}

/// User-selected filters for a list view
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub category: Selection<String>,
    pub search: String,
    pub window: TimeWindow,
    /// 1-based
    pub page: usize,
    pub page_size: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            category: Selection::All,
            search: String::new(),
            window: TimeWindow::Any,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FilterState {
    /// Whether `record` passes every active predicate
    pub fn admits<R: Record + ?Sized>(&self, record: &R, today: NaiveDate) -> bool {
        self.category.admits_category(record.category())
            && matches_search(record, &self.search)
            && self.window.admits(record.date(), today)
    }
}

fn matches_search<R: Record + ?Sized>(record: &R, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let term = term.to_lowercase();
    record.detail().to_lowercase().contains(&term) || record.brand().to_lowercase().contains(&term)
}

/// Records passing `state`, in their original order
pub fn filter_records<'a, R: Record>(records: &'a [R], state: &FilterState, today: NaiveDate) -> Vec<&'a R> {
    records.iter().filter(|record| state.admits(*record, today)).collect()
}
