use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use super::booking::{format_wire_date, BookingStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    BookingDate,
    Status,
    CustomerName,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::BookingDate => "booking_date",
            SortBy::Status => "status",
            SortBy::CustomerName => "customer_name",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Page size. Only the sizes offered by the list view are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u32")]
pub struct PerPage(u32);

impl PerPage {
    pub const OPTIONS: [u32; 4] = [10, 20, 30, 50];

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for PerPage {
    fn default() -> Self {
        Self(10)
    }
}

impl From<PerPage> for u32 {
    fn from(p: PerPage) -> u32 {
        p.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("per-page must be one of 10, 20, 30, 50 (got {0})")]
pub struct InvalidPerPage(pub String);

impl TryFrom<u32> for PerPage {
    type Error = InvalidPerPage;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if Self::OPTIONS.contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidPerPage(value.to_string()))
        }
    }
}

impl fmt::Display for PerPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PerPage {
    type Err = InvalidPerPage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n = s
            .trim()
            .parse::<u32>()
            .map_err(|_| InvalidPerPage(s.to_string()))?;
        Self::try_from(n)
    }
}

/// One user edit to the list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryChange {
    Page(u32),
    PerPage(PerPage),
    Search(String),
    Status(Option<BookingStatus>),
    FromDate(Option<NaiveDate>),
    ToDate(Option<NaiveDate>),
    SortBy(SortBy),
    SortOrder(SortOrder),
}

/// Filter, sort and pagination state of the booking list.
///
/// Mutated only through [`ListQuery::apply`], which keeps the page-reset rule:
/// any change other than `Page` moves back to page 1 so the view never asks
/// for a page past the end of a new result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    page: u32,
    per_page: PerPage,
    search: String,
    status: Option<BookingStatus>,
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
    sort_by: SortBy,
    sort_order: SortOrder,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: PerPage::default(),
            search: String::new(),
            status: None,
            from_date: None,
            to_date: None,
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl ListQuery {
    /// Applies a change and reports whether anything actually changed.
    /// Setting a field to its current value is a no-op and keeps the page.
    pub fn apply(&mut self, change: QueryChange) -> bool {
        let before = self.clone();

        match change {
            QueryChange::Page(page) => {
                self.page = page.max(1);
                return self.page != before.page;
            }
            QueryChange::PerPage(v) => self.per_page = v,
            QueryChange::Search(v) => self.search = v,
            QueryChange::Status(v) => self.status = v,
            QueryChange::FromDate(v) => self.from_date = v,
            QueryChange::ToDate(v) => self.to_date = v,
            QueryChange::SortBy(v) => self.sort_by = v,
            QueryChange::SortOrder(v) => self.sort_order = v,
        }

        if *self == before {
            return false;
        }
        self.page = 1;
        true
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> PerPage {
        self.per_page
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn status(&self) -> Option<BookingStatus> {
        self.status
    }

    pub fn from_date(&self) -> Option<NaiveDate> {
        self.from_date
    }

    pub fn to_date(&self) -> Option<NaiveDate> {
        self.to_date
    }

    pub fn sort_by(&self) -> SortBy {
        self.sort_by
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Query-string pairs for `GET /bookings`. Empty filters are omitted.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ];
        let search = self.search.trim();
        if !search.is_empty() {
            params.push(("search", search.to_string()));
        }
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(d) = self.from_date {
            params.push(("from_date", format_wire_date(d)));
        }
        if let Some(d) = self.to_date {
            params.push(("to_date", format_wire_date(d)));
        }
        params.push(("sort_by", self.sort_by.as_str().to_string()));
        params.push(("sort_order", self.sort_order.as_str().to_string()));
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_page(n: u32) -> ListQuery {
        let mut q = ListQuery::default();
        q.apply(QueryChange::Page(n));
        q
    }

    #[test]
    fn test_defaults() {
        let q = ListQuery::default();
        assert_eq!(q.page(), 1);
        assert_eq!(q.per_page().get(), 10);
        assert_eq!(q.sort_by(), SortBy::BookingDate);
        assert_eq!(q.sort_order(), SortOrder::Desc);
        assert!(q.status().is_none());
    }

    #[test]
    fn test_every_filter_change_resets_page() {
        let changes = vec![
            QueryChange::Search("ali".to_string()),
            QueryChange::Status(Some(BookingStatus::Confirmed)),
            QueryChange::FromDate(NaiveDate::from_ymd_opt(2025, 1, 1)),
            QueryChange::ToDate(NaiveDate::from_ymd_opt(2025, 12, 31)),
            QueryChange::SortBy(SortBy::CustomerName),
            QueryChange::SortOrder(SortOrder::Asc),
            QueryChange::PerPage(PerPage::try_from(50u32).unwrap()),
        ];

        for change in changes {
            let mut q = on_page(4);
            assert!(q.apply(change.clone()), "{change:?} should change the query");
            assert_eq!(q.page(), 1, "{change:?} should reset the page");
        }
    }

    #[test]
    fn test_page_change_keeps_filters() {
        let mut q = ListQuery::default();
        q.apply(QueryChange::Search("bob".to_string()));
        assert!(q.apply(QueryChange::Page(3)));
        assert_eq!(q.page(), 3);
        assert_eq!(q.search(), "bob");
    }

    #[test]
    fn test_unchanged_value_is_noop() {
        let mut q = on_page(3);
        assert!(!q.apply(QueryChange::SortOrder(SortOrder::Desc)));
        assert_eq!(q.page(), 3);
        assert!(!q.apply(QueryChange::Page(3)));
    }

    #[test]
    fn test_per_page_options() {
        assert!(PerPage::try_from(30u32).is_ok());
        assert_eq!(PerPage::try_from(25u32), Err(InvalidPerPage("25".to_string())));
        assert_eq!("20".parse::<PerPage>().map(PerPage::get), Ok(20));
        assert_eq!(" 50 ".parse::<PerPage>().map(PerPage::get), Ok(50));
    }

    #[test]
    fn test_per_page_rejects_non_numeric_text() {
        let err = "abc".parse::<PerPage>().unwrap_err();
        assert_eq!(err, InvalidPerPage("abc".to_string()));
        assert_eq!(
            err.to_string(),
            "per-page must be one of 10, 20, 30, 50 (got abc)"
        );
    }

    #[test]
    fn test_params_omit_empty_filters() {
        let q = ListQuery::default();
        assert_eq!(
            q.params(),
            vec![
                ("page", "1".to_string()),
                ("per_page", "10".to_string()),
                ("sort_by", "booking_date".to_string()),
                ("sort_order", "desc".to_string()),
            ]
        );

        let mut q = ListQuery::default();
        q.apply(QueryChange::Status(Some(BookingStatus::Pending)));
        q.apply(QueryChange::FromDate(NaiveDate::from_ymd_opt(2025, 2, 1)));
        let params = q.params();
        assert!(params.contains(&("status", "pending".to_string())));
        assert!(params.contains(&("from_date", "2025-02-01".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "to_date"));
    }
}
