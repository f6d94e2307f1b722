//! Derived-view computations over the authoritative event set: sort
//! projections, the top-attractions chart, and pagination arithmetic. All
//! pure; the rendering layer re-runs them from the current `ViewState` after
//! every user action.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::geo;
use crate::geo::GeoPoint;
use crate::model::Event;

/// Events shown per table page.
pub const PAGE_SIZE: usize = 10;

/// Buckets kept in the chart.
pub const CHART_TOP_N: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    Date,
    Distance,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "distance" => Ok(SortKey::Distance),
            other => Err(format!("unknown sort key `{other}`")),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

/// Ephemeral view state: sort key and direction, current 1-based page.
#[derive(Clone, Copy, Debug, Default)]
pub struct ViewState {
    sort_key: Option<SortKey>,
    direction: SortDirection,
    page: usize,
}

impl ViewState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sort_key: None,
            direction: SortDirection::Ascending,
            page: 1,
        }
    }

    /// Selects a sort column. Re-selecting the current one toggles the
    /// direction; switching columns resets to ascending. Either way the view
    /// snaps back to page 1.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_key == Some(key) {
            self.direction = match self.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            };
        } else {
            self.sort_key = Some(key);
            self.direction = SortDirection::Ascending;
        }
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    #[must_use]
    pub fn sort_key(&self) -> Option<SortKey> {
        self.sort_key
    }

    #[must_use]
    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }
}

/// Sorts the slice in place per the current view state. No-op when no sort
/// column is selected.
pub fn apply_sort(events: &mut [Event], state: &ViewState, location: GeoPoint) {
    match state.sort_key() {
        None => {}
        Some(SortKey::Date) => sort_by_date(events, state.direction()),
        Some(SortKey::Distance) => sort_by_distance(events, state.direction(), location),
    }
}

/// Sorts by parsed start date. Missing or unparseable dates take an
/// end-of-time sentinel, so they gather at the end of an ascending sort.
pub fn sort_by_date(events: &mut [Event], direction: SortDirection) {
    events.sort_by(|a, b| {
        let da = a.start_date().unwrap_or(NaiveDate::MAX);
        let db = b.start_date().unwrap_or(NaiveDate::MAX);
        direction.apply(da.cmp(&db))
    });
}

/// Sorts by great-circle distance from `location` to the venue.
///
/// An event with no venue coordinates compares equal to everything, which
/// leaves it roughly in place but makes the comparator non-transitive; the
/// order around such entries is unspecified. Known limitation.
pub fn sort_by_distance(events: &mut [Event], direction: SortDirection, location: GeoPoint) {
    events.sort_by(|a, b| {
        let (Some(va), Some(vb)) = (a.coordinates(), b.coordinates()) else {
            return Ordering::Equal;
        };
        let da = geo::haversine(location, va);
        let db = geo::haversine(location, vb);
        direction.apply(da.partial_cmp(&db).unwrap_or(Ordering::Equal))
    });
}

/// One bar of the chart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartBucket {
    pub name: String,
    pub count: usize,
}

/// Counts events per first-attraction name, "Other" absorbing events without
/// one. Descending by count, ties broken by first-encountered order, top
/// [`CHART_TOP_N`] kept.
#[must_use]
pub fn top_attractions(events: &[Event]) -> Vec<ChartBucket> {
    let mut buckets: Vec<ChartBucket> = Vec::new();
    for event in events {
        let name = event.first_attraction().unwrap_or("Other");
        match buckets.iter_mut().find(|b| b.name == name) {
            Some(bucket) => bucket.count += 1,
            None => buckets.push(ChartBucket {
                name: name.to_string(),
                count: 1,
            }),
        }
    }
    // Stable sort keeps first-encountered order among equal counts.
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets.truncate(CHART_TOP_N);
    buckets
}

/// Number of table pages for `total` events.
#[must_use]
pub fn page_count(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE)
}

/// The slice shown on 1-based `page`. An out-of-range page yields an empty
/// slice, not an error.
#[must_use]
pub fn page_slice<T>(items: &[T], page: usize) -> &[T] {
    let start = page.saturating_sub(1) * PAGE_SIZE;
    if start >= items.len() {
        return &[];
    }
    let end = (start + PAGE_SIZE).min(items.len());
    &items[start..end]
}

/// 1-based inclusive bounds of the events shown on `page`, for the
/// "Showing a-b of N" line. `None` when the page is empty.
#[must_use]
pub fn page_bounds(total: usize, page: usize) -> Option<(usize, usize)> {
    let start = page.saturating_sub(1) * PAGE_SIZE;
    if start >= total {
        return None;
    }
    Some((start + 1, (start + PAGE_SIZE).min(total)))
}
