// Query parameters, fetch sequencing, and post-mutation expectations for the list.

use crate::api::{SortKey, Track, TrackQuery};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub sort: SortKey,
    pub filter_genre: String,
    pub filter_artist: String,
    pub search: String,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            sort: SortKey::Title,
            filter_genre: String::new(),
            filter_artist: String::new(),
            search: String::new(),
        }
    }
}

impl ListQuery {
    /// Applies a settled search value. A changed search always restarts at page 1.
    /// Returns whether anything changed.
    pub fn apply_search(&mut self, search: &str) -> bool {
        if self.search == search {
            return false;
        }
        self.search = search.to_string();
        self.page = 1;
        true
    }

    pub fn to_track_query(&self) -> TrackQuery {
        fn filter(value: &str) -> Option<String> {
            (!value.is_empty()).then(|| value.to_string())
        }

        TrackQuery {
            page: self.page.max(1),
            sort: self.sort,
            genre: filter(&self.filter_genre),
            artist: filter(&self.filter_artist),
            search: filter(&self.search),
        }
    }
}

/// Keeps a requested page inside `[1, total_pages]`.
pub fn clamp_page(page: i64, total_pages: u32) -> u32 {
    let last = total_pages.max(1) as i64;
    page.clamp(1, last) as u32
}

/// Tickets for in-flight requests; only the newest ticket's response is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestSequence {
    latest: u64,
}

impl RequestSequence {
    pub fn begin(&mut self) -> u64 {
        self.latest = self.latest.saturating_add(1);
        self.latest
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        ticket == self.latest
    }
}

/// What a refreshed page must show after a confirmed mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Expectation {
    /// None of these ids may still be listed.
    Removed(Vec<String>),
    /// If the track is listed, it must match the confirmed entity.
    Reflects(Track),
}

impl Expectation {
    pub fn is_reflected(&self, tracks: &[Track]) -> bool {
        match self {
            Self::Removed(ids) => !tracks.iter().any(|track| ids.contains(&track.id)),
            Self::Reflects(expected) => tracks
                .iter()
                .find(|track| track.id == expected.id)
                .map_or(true, |track| track.same_content(expected)),
        }
    }
}

/// An expectation plus how many more refreshes may be spent waiting for it.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingExpectation {
    pub expectation: Expectation,
    pub attempts_left: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageVerdict {
    Accept,
    Retry,
    GiveUp,
}

impl PendingExpectation {
    pub fn new(expectation: Expectation, attempts: u32) -> Self {
        Self {
            expectation,
            attempts_left: attempts,
        }
    }

    /// Decides whether a fetched page may replace local state. A `Retry` consumes
    /// one attempt.
    pub fn judge(&mut self, tracks: &[Track]) -> PageVerdict {
        if self.expectation.is_reflected(tracks) {
            return PageVerdict::Accept;
        }
        if self.attempts_left == 0 {
            return PageVerdict::GiveUp;
        }
        self.attempts_left -= 1;
        PageVerdict::Retry
    }
}
