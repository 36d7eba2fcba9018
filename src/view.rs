//! Derived views over the user collection.
//!
//! Everything here is a pure function of the raw collection and a [`TableQuery`]:
//! search, role and status filters, the registration date window, a stable sort
//! and finally the page slice. Callers re-derive after every mutation instead of
//! caching.

use std::cmp::Ordering;
use std::num::NonZeroUsize;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::data::{Role, SortColumn, SortDirection, Status, User};
use crate::error::TableError;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(25) {
    Some(n) => n,
    None => unreachable!(),
};

/// Page count above which the page list collapses into a window with ellipses.
const MAX_FULL_PAGE_LIST: usize = 7;

/// Search, filter, sort and paging parameters driving [`derive_view`].
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    pub search: String,
    pub role: Option<Role>,
    pub status: Option<Status>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub sort_column: SortColumn,
    pub sort_direction: SortDirection,
    /// 1-based page index.
    pub page: usize,
    page_size: NonZeroUsize,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl TableQuery {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            search: String::new(),
            role: None,
            status: None,
            date_from: None,
            date_to: None,
            sort_column: SortColumn::Id,
            sort_direction: SortDirection::Asc,
            page: 1,
            page_size,
        }
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    /// Sets the page size. Zero is rejected and leaves the size unchanged.
    pub fn set_page_size(&mut self, size: usize) -> Result<(), TableError> {
        self.page_size = NonZeroUsize::new(size).ok_or(TableError::ZeroPageSize)?;
        Ok(())
    }

    /// True when any search or filter parameter narrows the collection.
    pub fn is_filtered(&self) -> bool {
        !self.search.trim().is_empty()
            || self.role.is_some()
            || self.status.is_some()
            || self.date_from.is_some()
            || self.date_to.is_some()
    }
}

/// An entry in the page-number control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Page(usize),
    Ellipsis,
}

/// Filtered, sorted and paginated snapshot of the collection.
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    /// Every record passing the filters, in sort order.
    pub filtered: Vec<&'a User>,
    pub current_page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    /// 1-based ordinal of the first row on the page, clamped to the filtered count.
    pub pagination_start: usize,
    /// 1-based ordinal of the last row on the page, clamped to the filtered count.
    pub pagination_end: usize,
}

impl<'a> TableView<'a> {
    /// Rows on the current page.
    pub fn page(&self) -> &[&'a User] {
        let len = self.filtered.len();
        let start = self
            .current_page
            .saturating_sub(1)
            .saturating_mul(self.page_size)
            .min(len);
        let end = start.saturating_add(self.page_size).min(len);
        &self.filtered[start..end]
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    pub fn visible_pages(&self) -> Vec<PageMarker> {
        visible_pages(self.current_page, self.total_pages)
    }

    pub fn page_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.page().iter().map(|u| u.id)
    }
}

/// Runs the full pipeline for `query` over `users`.
pub fn derive_view<'a>(users: &'a [User], query: &TableQuery) -> TableView<'a> {
    let filtered = filter_and_sort(users, query);
    let page_size = query.page_size.get();
    let current_page = query.page.max(1);
    let total = filtered.len();

    TableView {
        total_pages: total.div_ceil(page_size),
        pagination_start: (current_page - 1)
            .saturating_mul(page_size)
            .saturating_add(1)
            .min(total),
        pagination_end: current_page.saturating_mul(page_size).min(total),
        filtered,
        current_page,
        page_size,
    }
}

/// Filter stages followed by the stable sort, without paging.
pub fn filter_and_sort<'a>(users: &'a [User], query: &TableQuery) -> Vec<&'a User> {
    let needle = query.search.trim().to_lowercase();
    let from = query.date_from.map(start_of_day);
    let to = query.date_to.and_then(end_of_day);

    let mut result: Vec<&User> = users
        .iter()
        .filter(|u| needle.is_empty() || matches_search(u, &needle))
        .filter(|u| query.role.is_none_or(|r| u.role == r))
        .filter(|u| query.status.is_none_or(|s| u.status == s))
        .filter(|u| from.is_none_or(|f| u.registration_date >= f))
        .filter(|u| to.is_none_or(|t| u.registration_date <= t))
        .collect();

    // `sort_by` is stable, so ties keep collection order in both directions.
    result.sort_by(|a, b| {
        let ord = compare_by(a, b, query.sort_column);
        match query.sort_direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    result
}

fn matches_search(user: &User, needle: &str) -> bool {
    user.name.to_lowercase().contains(needle)
        || user.email.to_lowercase().contains(needle)
        || user.id.to_string().contains(needle)
}

fn compare_by(a: &User, b: &User, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Id => a.id.cmp(&b.id),
        SortColumn::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortColumn::Email => a.email.to_lowercase().cmp(&b.email.to_lowercase()),
        SortColumn::RegistrationDate => a
            .registration_date
            .timestamp_millis()
            .cmp(&b.registration_date.timestamp_millis()),
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn end_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_milli_opt(23, 59, 59, 999).map(|dt| dt.and_utc())
}

/// Parses a `YYYY-MM-DD` date field. Blank input clears the bound.
pub fn parse_date(input: &str) -> Result<Option<NaiveDate>, TableError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| TableError::InvalidDate(trimmed.to_string()))
}

/// Page-number control entries for `current` out of `total` pages.
///
/// Up to seven pages are listed in full. Beyond that the first and last page are
/// always present, a window surrounds `current`, and gaps become [`PageMarker::Ellipsis`].
pub fn visible_pages(current: usize, total: usize) -> Vec<PageMarker> {
    use PageMarker::{Ellipsis, Page};

    if total <= MAX_FULL_PAGE_LIST {
        return (1..=total).map(Page).collect();
    }

    let mut pages = Vec::with_capacity(MAX_FULL_PAGE_LIST);
    if current <= 4 {
        pages.extend((1..=5).map(Page));
        pages.push(Ellipsis);
        pages.push(Page(total));
    } else if current >= total - 3 {
        pages.push(Page(1));
        pages.push(Ellipsis);
        pages.extend((total - 4..=total).map(Page));
    } else {
        pages.push(Page(1));
        pages.push(Ellipsis);
        pages.extend((current - 1..=current + 1).map(Page));
        pages.push(Ellipsis);
        pages.push(Page(total));
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Status;
    use chrono::TimeZone;

    fn user(id: u64, name: &str, email: &str) -> User {
        let mut u = User::new(id, name, email, Role::Standard);
        u.registration_date = Utc.with_ymd_and_hms(2020, 1, 1, 12, 0, 0).unwrap();
        u
    }

    fn numbered(count: u64) -> Vec<User> {
        (1..=count)
            .map(|i| user(i, &format!("User {i}"), &format!("user{i}@example.com")))
            .collect()
    }

    fn query_with_page(page: usize, size: usize) -> TableQuery {
        let mut q = TableQuery::default();
        q.set_page_size(size).unwrap();
        q.page = page;
        q
    }

    fn ids(users: &[&User]) -> Vec<u64> {
        users.iter().map(|u| u.id).collect()
    }

    #[test]
    fn test_last_partial_page() {
        let users = numbered(10);
        let view = derive_view(&users, &query_with_page(4, 3));
        assert_eq!(ids(view.page()), vec![10]);
        assert_eq!(view.pagination_start, 10);
        assert_eq!(view.pagination_end, 10);
        assert_eq!(view.total_pages, 4);
    }

    #[test]
    fn test_page_is_slice_of_filtered() {
        let users = numbered(23);
        for page in 1..=5 {
            let view = derive_view(&users, &query_with_page(page, 5));
            let start = (page - 1) * 5;
            let end = (start + 5).min(23);
            assert_eq!(view.page(), &view.filtered[start..end]);
            assert!(view.page().len() <= 5);
        }
    }

    #[test]
    fn test_empty_collection() {
        let view = derive_view(&[], &TableQuery::default());
        assert!(view.page().is_empty());
        assert_eq!(view.total_pages, 0);
        assert_eq!(view.pagination_start, 0);
        assert_eq!(view.pagination_end, 0);
        assert!(view.visible_pages().is_empty());
    }

    #[test]
    fn test_page_beyond_range_is_empty() {
        let users = numbered(4);
        let view = derive_view(&users, &query_with_page(9, 2));
        assert!(view.page().is_empty());
        assert_eq!(view.pagination_end, 4);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let mut q = TableQuery::default();
        assert_eq!(q.set_page_size(0), Err(TableError::ZeroPageSize));
        assert_eq!(q.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_search_matches_name_email_and_id() {
        let users = vec![
            user(1, "Anna Smith", "anna@example.com"),
            user(2, "Boris", "boris@mail.org"),
            user(12, "Clara", "clara@example.com"),
        ];
        let mut q = TableQuery::default();

        q.search = "  SMITH ".into();
        assert_eq!(ids(&filter_and_sort(&users, &q)), vec![1]);

        q.search = "mail.org".into();
        assert_eq!(ids(&filter_and_sort(&users, &q)), vec![2]);

        q.search = "2".into();
        assert_eq!(ids(&filter_and_sort(&users, &q)), vec![2, 12]);

        q.search = "   ".into();
        assert_eq!(filter_and_sort(&users, &q).len(), 3);
    }

    #[test]
    fn test_role_and_status_compose() {
        let mut users = numbered(6);
        users[0].role = Role::Admin;
        users[1].role = Role::Admin;
        users[1].status = Status::Inactive;
        users[2].role = Role::Moderator;

        let mut q = TableQuery::default();
        q.role = Some(Role::Admin);
        assert_eq!(ids(&filter_and_sort(&users, &q)), vec![1, 2]);

        q.status = Some(Status::Inactive);
        assert_eq!(ids(&filter_and_sort(&users, &q)), vec![2]);

        q.search = "user 1".into();
        assert!(filter_and_sort(&users, &q).is_empty());
    }

    #[test]
    fn test_date_range_inclusive_whole_day() {
        let mut users = numbered(3);
        users[0].registration_date = Utc.with_ymd_and_hms(2020, 3, 14, 23, 59, 59).unwrap();
        users[1].registration_date = Utc
            .with_ymd_and_hms(2020, 3, 15, 23, 59, 59)
            .unwrap()
            + chrono::Duration::milliseconds(999);
        users[2].registration_date = Utc.with_ymd_and_hms(2020, 3, 16, 0, 0, 0).unwrap();

        let mut q = TableQuery::default();
        q.date_from = Some(NaiveDate::from_ymd_opt(2020, 3, 15).unwrap());
        q.date_to = Some(NaiveDate::from_ymd_opt(2020, 3, 15).unwrap());
        assert_eq!(ids(&filter_and_sort(&users, &q)), vec![2]);

        q.date_to = None;
        assert_eq!(ids(&filter_and_sort(&users, &q)), vec![2, 3]);

        q.date_from = None;
        q.date_to = Some(NaiveDate::from_ymd_opt(2020, 3, 14).unwrap());
        assert_eq!(ids(&filter_and_sort(&users, &q)), vec![1]);
    }

    #[test]
    fn test_sort_by_name_case_insensitive() {
        let users = vec![
            user(1, "charlie", "c@x.io"),
            user(2, "Alpha", "a@x.io"),
            user(3, "bravo", "b@x.io"),
        ];
        let mut q = TableQuery::default();
        q.sort_column = SortColumn::Name;
        assert_eq!(ids(&filter_and_sort(&users, &q)), vec![2, 3, 1]);

        q.sort_direction = SortDirection::Desc;
        assert_eq!(ids(&filter_and_sort(&users, &q)), vec![1, 3, 2]);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let users = vec![
            user(4, "Same", "d@x.io"),
            user(2, "same", "b@x.io"),
            user(9, "Other", "a@x.io"),
            user(1, "SAME", "c@x.io"),
        ];
        let mut q = TableQuery::default();
        q.sort_column = SortColumn::Name;
        assert_eq!(ids(&filter_and_sort(&users, &q)), vec![9, 4, 2, 1]);

        q.sort_direction = SortDirection::Desc;
        assert_eq!(ids(&filter_and_sort(&users, &q)), vec![4, 2, 1, 9]);
    }

    #[test]
    fn test_sort_by_registration_date() {
        let mut users = numbered(3);
        users[0].registration_date = Utc.with_ymd_and_hms(2020, 5, 1, 0, 0, 0).unwrap();
        users[1].registration_date = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        users[2].registration_date = Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap();

        let mut q = TableQuery::default();
        q.sort_column = SortColumn::RegistrationDate;
        assert_eq!(ids(&filter_and_sort(&users, &q)), vec![2, 3, 1]);
    }

    #[test]
    fn test_visible_pages_short_list() {
        assert_eq!(
            visible_pages(3, 7),
            (1..=7).map(PageMarker::Page).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_visible_pages_near_start() {
        use PageMarker::{Ellipsis, Page};
        assert_eq!(
            visible_pages(4, 20),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(20)]
        );
    }

    #[test]
    fn test_visible_pages_near_end() {
        use PageMarker::{Ellipsis, Page};
        assert_eq!(
            visible_pages(17, 20),
            vec![Page(1), Ellipsis, Page(16), Page(17), Page(18), Page(19), Page(20)]
        );
    }

    #[test]
    fn test_visible_pages_middle() {
        use PageMarker::{Ellipsis, Page};
        assert_eq!(
            visible_pages(10, 20),
            vec![Page(1), Ellipsis, Page(9), Page(10), Page(11), Ellipsis, Page(20)]
        );
    }

    #[test]
    fn test_visible_pages_never_duplicate_or_out_of_range() {
        for total in 0..=30 {
            for current in 1..=total.max(1) {
                let pages: Vec<usize> = visible_pages(current, total)
                    .into_iter()
                    .filter_map(|m| match m {
                        PageMarker::Page(p) => Some(p),
                        PageMarker::Ellipsis => None,
                    })
                    .collect();
                let mut sorted = pages.clone();
                sorted.dedup();
                assert_eq!(pages, sorted, "current={current} total={total}");
                assert!(pages.windows(2).all(|w| w[0] < w[1]));
                assert!(pages.iter().all(|p| (1..=total).contains(p)));
                if total > 0 {
                    assert_eq!(pages.first(), Some(&1));
                    assert_eq!(pages.last(), Some(&total));
                }
            }
        }
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let users = numbered(10);
        let view = derive_view(&users, &query_with_page(usize::MAX, 3));
        assert!(view.page().is_empty());
        assert_eq!(view.total_pages, 4);
        assert_eq!(view.pagination_end, 10);
        assert_eq!(view.pagination_start, 10);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date(""), Ok(None));
        assert_eq!(
            parse_date(" 2020-03-15 "),
            Ok(NaiveDate::from_ymd_opt(2020, 3, 15))
        );
        assert_eq!(
            parse_date("15.03.2020"),
            Err(TableError::InvalidDate("15.03.2020".into()))
        );
    }
}
