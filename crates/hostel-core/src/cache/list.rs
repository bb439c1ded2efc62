use chrono::{DateTime, Utc};

use crate::models::Record;
use crate::utils::contains_ignore_case;

#[derive(Debug, Clone)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        let now = Utc::now();
        (now - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}

/// Display order applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListOrder {
    /// Keep the order the server returned.
    #[default]
    AsFetched,
    /// Reverse the fetched order so the latest record comes first.
    NewestFirst,
}

/// Client-side view parameters for one refresh.
#[derive(Debug, Clone, Copy)]
pub struct ListQuery<'a> {
    pub search: &'a str,
    pub page: usize,
    /// `None` shows the whole filtered list on one page.
    pub page_size: Option<usize>,
    pub order: ListOrder,
}

impl<'a> ListQuery<'a> {
    pub fn all() -> Self {
        Self {
            search: "",
            page: 0,
            page_size: None,
            order: ListOrder::AsFetched,
        }
    }

    /// Filter by display name, order, then slice out the requested page.
    /// Returns the page and the filtered (pre-slice) length.
    pub fn apply<T: Record>(&self, all: Vec<T>) -> (Vec<T>, usize) {
        let search = self.search.trim();
        let mut filtered: Vec<T> = if search.is_empty() {
            all
        } else {
            all.into_iter()
                .filter(|r| contains_ignore_case(r.display_name(), search))
                .collect()
        };

        if self.order == ListOrder::NewestFirst {
            filtered.reverse();
        }

        let total = filtered.len();
        let page = match self.page_size {
            Some(size) if size > 0 => {
                let start = self.page.saturating_mul(size).min(total);
                let end = start.saturating_add(size).min(total);
                filtered.drain(start..end).collect()
            }
            _ => filtered,
        };
        (page, total)
    }
}

/// Snapshot of one resource collection as last fetched.
///
/// `records()` is `None` until the first successful fetch, which lets the
/// rendering layer tell "loading" apart from "loaded but empty". The
/// snapshot is only ever replaced wholesale.
#[derive(Debug, Clone)]
pub struct ListCache<T> {
    snapshot: Option<CachedData<Vec<T>>>,
    total_count: usize,
}

impl<T> Default for ListCache<T> {
    fn default() -> Self {
        Self {
            snapshot: None,
            total_count: 0,
        }
    }
}

impl<T: Record> ListCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Option<&[T]> {
        self.snapshot.as_ref().map(|s| s.data.as_slice())
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Number of records matching the current search, across all pages.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Human-readable time since the last successful refresh.
    pub fn age_display(&self) -> Option<String> {
        self.snapshot.as_ref().map(|s| s.age_display())
    }

    /// Replace the snapshot with the view of a freshly fetched collection.
    pub fn replace(&mut self, all: Vec<T>, query: &ListQuery<'_>) {
        let (page, total) = query.apply(all);
        self.snapshot = Some(CachedData::new(page));
        self.total_count = total;
    }
}
