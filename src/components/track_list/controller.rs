// List-state controller: query parameters, the current page of tracks, and the genre
// vocabulary. The track collection is private; other components change it only
// through `apply_patch`.

use crate::api::{SortKey, Track, TrackApi};
use crate::components::debounce::use_debounced;
use crate::components::toast::ToastManager;
use crate::config::{AppConfig, RetryPolicy};
use crate::utils::delay_ms;
use dioxus::prelude::*;
use std::rc::Rc;

use super::query::{Expectation, ListQuery, PageVerdict, PendingExpectation, RequestSequence};

pub type SharedApi = Rc<dyn TrackApi>;

/// A confirmed server-side change, described by identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackPatch {
    Remove(String),
    RemoveMany(Vec<String>),
    Replace(Track),
    Created(Track),
}

impl TrackPatch {
    /// Applies the change to a page of tracks. Creations are left to the refresh,
    /// since the new track's position depends on sort order and paging.
    pub fn apply_to(&self, tracks: &mut Vec<Track>) {
        match self {
            Self::Remove(id) => tracks.retain(|track| &track.id != id),
            Self::RemoveMany(ids) => tracks.retain(|track| !ids.contains(&track.id)),
            Self::Replace(updated) => {
                if let Some(track) = tracks.iter_mut().find(|track| track.id == updated.id) {
                    *track = updated.clone();
                }
            }
            Self::Created(_) => {}
        }
    }

    /// What the next refresh has to show for this change to count as visible.
    pub fn expectation(&self) -> Option<Expectation> {
        match self {
            Self::Remove(id) => Some(Expectation::Removed(vec![id.clone()])),
            Self::RemoveMany(ids) => Some(Expectation::Removed(ids.clone())),
            Self::Replace(track) => Some(Expectation::Reflects(track.clone())),
            Self::Created(_) => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
pub struct TrackListController {
    tracks: Signal<Vec<Track>>,
    loading: Signal<bool>,
    total_pages: Signal<u32>,
    query: Signal<ListQuery>,
    search_input: Signal<String>,
    genres: Signal<Vec<String>>,
    refresh_tick: Signal<u64>,
    genre_tick: Signal<u64>,
    pending: Signal<Option<PendingExpectation>>,
    retry: RetryPolicy,
}

impl TrackListController {
    pub fn tracks(&self) -> Vec<Track> {
        (self.tracks)()
    }

    pub fn loading(&self) -> bool {
        (self.loading)()
    }

    pub fn page(&self) -> u32 {
        self.query.read().page
    }

    pub fn total_pages(&self) -> u32 {
        (self.total_pages)()
    }

    pub fn sort(&self) -> SortKey {
        self.query.read().sort
    }

    pub fn filter_genre(&self) -> String {
        self.query.read().filter_genre.clone()
    }

    pub fn filter_artist(&self) -> String {
        self.query.read().filter_artist.clone()
    }

    /// The live text of the search box (not yet debounced).
    pub fn search_input(&self) -> String {
        (self.search_input)()
    }

    /// The settled search the current page was requested with.
    pub fn search(&self) -> String {
        self.query.read().search.clone()
    }

    pub fn genres(&self) -> Vec<String> {
        (self.genres)()
    }

    /// Not clamped here; callers keep `page` within `[1, total_pages]`.
    pub fn set_page(&self, page: u32) {
        let mut query = self.query;
        if query.peek().page != page {
            query.write().page = page;
        }
    }

    pub fn set_sort(&self, sort: SortKey) {
        let mut query = self.query;
        if query.peek().sort != sort {
            query.write().sort = sort;
        }
    }

    pub fn set_filter_genre(&self, genre: String) {
        let mut query = self.query;
        if query.peek().filter_genre != genre {
            query.write().filter_genre = genre;
        }
    }

    pub fn set_filter_artist(&self, artist: String) {
        let mut query = self.query;
        if query.peek().filter_artist != artist {
            query.write().filter_artist = artist;
        }
    }

    /// Feeds the debounced search; the query changes once typing settles.
    pub fn on_search_input(&self, text: String) {
        let mut search_input = self.search_input;
        search_input.set(text);
    }

    /// Re-requests the current page with unchanged parameters.
    pub fn refresh(&self) {
        let mut refresh_tick = self.refresh_tick;
        refresh_tick.with_mut(|tick| *tick = tick.wrapping_add(1));
    }

    /// Refreshes, and keeps refreshing (bounded by the retry policy) until the page
    /// agrees with `expectation`.
    pub fn refresh_expecting(&self, expectation: Expectation) {
        let mut pending = self.pending;
        pending.set(Some(PendingExpectation::new(
            expectation,
            self.retry.attempts,
        )));
        self.refresh();
    }

    /// Patches the local page from a confirmed mutation, then refreshes.
    pub fn apply_patch(&self, patch: TrackPatch) {
        let mut tracks = self.tracks;
        patch.apply_to(&mut tracks.write());
        match patch.expectation() {
            Some(expectation) => self.refresh_expecting(expectation),
            None => self.refresh(),
        }
    }

    pub fn reload_genres(&self) {
        let mut genre_tick = self.genre_tick;
        genre_tick.with_mut(|tick| *tick = tick.wrapping_add(1));
    }
}

pub fn use_track_list(
    api: SharedApi,
    toasts: ToastManager,
    config: &AppConfig,
) -> TrackListController {
    let mut tracks = use_signal(Vec::<Track>::new);
    let mut loading = use_signal(|| false);
    let mut total_pages = use_signal(|| 1u32);
    let mut query = use_signal(ListQuery::default);
    let search_input = use_signal(String::new);
    let mut genres = use_signal(Vec::<String>::new);
    let mut refresh_tick = use_signal(|| 0u64);
    let genre_tick = use_signal(|| 0u64);
    let mut pending = use_signal(|| None::<PendingExpectation>);
    let mut page_sequence = use_signal(RequestSequence::default);
    let mut genre_sequence = use_signal(RequestSequence::default);
    let retry = config.refresh_retry;

    let search = use_debounced(search_input, config.search_debounce_ms);

    // A settled search replaces the query's search and restarts at page 1 in one write,
    // so exactly one fetch follows.
    use_effect(move || {
        let settled = search();
        if query.peek().search != settled {
            query.write().apply_search(&settled);
        }
    });

    // Fetch the page whenever the query changes or a refresh is requested.
    {
        let api = api.clone();
        use_effect(move || {
            let params = query.read().to_track_query();
            let _ = refresh_tick();
            let ticket = page_sequence.write().begin();
            loading.set(true);

            let api = api.clone();
            spawn(async move {
                let result = api.list_tracks(&params).await;
                if !page_sequence.peek().is_current(ticket) {
                    tracing::debug!("dropping stale page response for {params:?}");
                    return;
                }

                match result {
                    Ok(page) => {
                        let verdict = pending
                            .write()
                            .as_mut()
                            .map(|expectation| expectation.judge(&page.data));
                        match verdict {
                            Some(PageVerdict::Retry) => {
                                tracing::debug!(
                                    "page does not reflect the last change yet, retrying"
                                );
                                delay_ms(retry.backoff_ms).await;
                                if page_sequence.peek().is_current(ticket) {
                                    refresh_tick.with_mut(|tick| *tick = tick.wrapping_add(1));
                                }
                                return;
                            }
                            Some(PageVerdict::GiveUp) => {
                                tracing::warn!(
                                    "page still disagrees with the last change after {} retries; using server state",
                                    retry.attempts
                                );
                                pending.set(None);
                            }
                            Some(PageVerdict::Accept) => pending.set(None),
                            None => {}
                        }
                        total_pages.set(page.meta.total_pages.max(1));
                        tracks.set(page.data);
                    }
                    Err(err) => {
                        tracing::warn!("failed to load tracks for {params:?}: {err}");
                        pending.set(None);
                        toasts.error(err.user_message("Failed to load tracks"));
                    }
                }
                loading.set(false);
            });
        });
    }

    // Genre vocabulary, once per mount and on explicit reload.
    {
        let api = api.clone();
        use_effect(move || {
            let _ = genre_tick();
            let ticket = genre_sequence.write().begin();
            let api = api.clone();
            spawn(async move {
                let result = api.list_genres().await;
                if !genre_sequence.peek().is_current(ticket) {
                    return;
                }
                match result {
                    Ok(list) => genres.set(list),
                    Err(err) => {
                        tracing::warn!("failed to load genres: {err}");
                        toasts.error(err.user_message("Failed to load genres"));
                    }
                }
            });
        });
    }

    TrackListController {
        tracks,
        loading,
        total_pages,
        query,
        search_input,
        genres,
        refresh_tick,
        genre_tick,
        pending,
        retry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{track, FakeTrackApi};
    use crate::api::{ApiError, TrackQuery};
    use crate::components::test_dom::{mount, run_for, Slot};
    use crate::components::toast::{use_toast_manager, ToastKind};

    fn page() -> Vec<Track> {
        vec![
            track("a", "Song A", "X"),
            track("b", "Song B", "Y"),
            track("c", "Song C", "Z"),
        ]
    }

    #[test]
    fn remove_patch_drops_only_that_id() {
        let mut tracks = page();
        TrackPatch::Remove("b".into()).apply_to(&mut tracks);
        let ids: Vec<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn replace_patch_swaps_matching_track() {
        let mut tracks = page();
        let mut updated = track("c", "Song C", "Z");
        updated.audio_file = Some("c.mp3".into());
        TrackPatch::Replace(updated.clone()).apply_to(&mut tracks);
        assert_eq!(tracks[2], updated);
        assert_eq!(tracks.len(), 3);
    }

    #[test]
    fn replace_patch_ignores_tracks_not_on_page() {
        let mut tracks = page();
        TrackPatch::Replace(track("zz", "Elsewhere", "Q")).apply_to(&mut tracks);
        assert_eq!(tracks, page());
    }

    #[test]
    fn created_patch_waits_for_refresh() {
        let mut tracks = page();
        let created = track("n", "New", "Band");
        let patch = TrackPatch::Created(created);
        patch.apply_to(&mut tracks);
        assert_eq!(tracks, page());
        assert_eq!(patch.expectation(), None);
    }

    #[test]
    fn removals_expect_absence() {
        let patch = TrackPatch::RemoveMany(vec!["a".into(), "b".into()]);
        let expectation = patch.expectation().unwrap();
        assert!(!expectation.is_reflected(&page()));
        let mut remaining = page();
        patch.apply_to(&mut remaining);
        assert!(expectation.is_reflected(&remaining));
    }

    type Handles = Slot<(TrackListController, ToastManager)>;

    #[component]
    fn ListHost() -> Element {
        let api = use_context::<SharedApi>();
        let config = AppConfig::default();
        let toasts = use_toast_manager(config.toast_duration_ms);
        let controller = use_track_list(api, toasts, &config);
        use_context::<Handles>().put((controller, toasts));
        rsx! {}
    }

    /// Titles "Song 01".."Song NN", all by "Band".
    fn catalog(count: usize) -> Vec<Track> {
        (1..=count)
            .map(|n| track(&format!("t{n:02}"), &format!("Song {n:02}"), "Band"))
            .collect()
    }

    async fn list_host(
        api: &Rc<FakeTrackApi>,
    ) -> (VirtualDom, TrackListController, ToastManager) {
        let handles = Handles::default();
        let shared: SharedApi = api.clone();
        let dom = mount(
            VirtualDom::new(ListHost)
                .with_root_context(shared)
                .with_root_context(handles.clone()),
        )
        .await;
        let (controller, toasts) = handles.get();
        (dom, controller, toasts)
    }

    fn shown_ids(dom: &VirtualDom, controller: TrackListController) -> Vec<String> {
        dom.in_runtime(|| controller.tracks())
            .into_iter()
            .map(|t| t.id)
            .collect()
    }

    fn first_page() -> TrackQuery {
        ListQuery::default().to_track_query()
    }

    #[tokio::test(start_paused = true)]
    async fn mounting_loads_first_page_and_genres() {
        let api = Rc::new(FakeTrackApi::with_tracks(catalog(25)));
        *api.genres.borrow_mut() = vec!["Rock".into(), "Jazz".into()];
        let (mut dom, controller, _) = list_host(&api).await;
        run_for(&mut dom, 10).await;

        assert_eq!(api.list_calls(), vec![first_page()]);
        dom.in_runtime(|| {
            assert_eq!(controller.tracks().len(), 10);
            assert_eq!(controller.total_pages(), 3);
            assert_eq!(controller.genres(), vec!["Rock", "Jazz"]);
            assert!(!controller.loading());
        });
    }

    #[tokio::test(start_paused = true)]
    async fn request_mirrors_controller_state() {
        let api = Rc::new(FakeTrackApi::with_tracks(catalog(25)));
        let (mut dom, controller, _) = list_host(&api).await;

        dom.in_runtime(|| {
            controller.set_sort(SortKey::Artist);
            controller.set_filter_genre("Rock".into());
            controller.set_filter_artist("Band".into());
            controller.set_page(2);
        });
        run_for(&mut dom, 10).await;

        let calls = api.list_calls();
        assert_eq!(calls.len(), 2);
        let expected = dom.in_runtime(|| TrackQuery {
            page: controller.page(),
            sort: controller.sort(),
            genre: Some(controller.filter_genre()),
            artist: Some(controller.filter_artist()),
            search: None,
        });
        assert_eq!(calls[1], expected);
        assert_eq!(expected.page, 2);
        assert_eq!(expected.sort, SortKey::Artist);
    }

    #[tokio::test(start_paused = true)]
    async fn settled_search_restarts_at_page_one() {
        let api = Rc::new(FakeTrackApi::with_tracks(catalog(25)));
        let (mut dom, controller, _) = list_host(&api).await;
        dom.in_runtime(|| controller.set_page(3));
        run_for(&mut dom, 10).await;

        for text in ["S", "So", "Song 2"] {
            dom.in_runtime(|| controller.on_search_input(text.to_string()));
            run_for(&mut dom, 100).await;
        }
        assert_eq!(api.list_calls().len(), 2);
        run_for(&mut dom, 600).await;

        let calls = api.list_calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(
            calls[2],
            TrackQuery {
                search: Some("Song 2".into()),
                ..first_page()
            }
        );
        dom.in_runtime(|| {
            assert_eq!(controller.page(), 1);
            assert_eq!(controller.search(), "Song 2");
            assert_eq!(controller.tracks().len(), 6);
        });
    }

    #[tokio::test(start_paused = true)]
    async fn refreshing_twice_repeats_the_same_request() {
        let api = Rc::new(FakeTrackApi::with_tracks(catalog(12)));
        let (mut dom, controller, _) = list_host(&api).await;
        let shown = shown_ids(&dom, controller);

        dom.in_runtime(|| {
            controller.refresh();
            controller.refresh();
        });
        run_for(&mut dom, 10).await;
        dom.in_runtime(|| controller.refresh());
        run_for(&mut dom, 10).await;

        let calls = api.list_calls();
        assert!(calls.len() >= 3);
        assert!(calls.iter().all(|call| call == &first_page()));
        assert_eq!(shown_ids(&dom, controller), shown);
        assert!(!dom.in_runtime(|| controller.loading()));
    }

    #[tokio::test(start_paused = true)]
    async fn late_response_for_an_older_page_is_dropped() {
        let api = Rc::new(FakeTrackApi::with_tracks(catalog(25)));
        api.slow_page(2, 300);
        let (mut dom, controller, _) = list_host(&api).await;

        dom.in_runtime(|| controller.set_page(2));
        run_for(&mut dom, 10).await;
        dom.in_runtime(|| controller.set_page(3));
        run_for(&mut dom, 10).await;

        let third_page = vec!["t21", "t22", "t23", "t24", "t25"];
        assert_eq!(shown_ids(&dom, controller), third_page);

        run_for(&mut dom, 500).await;
        assert_eq!(api.list_calls().len(), 3);
        assert_eq!(shown_ids(&dom, controller), third_page);
        dom.in_runtime(|| {
            assert_eq!(controller.page(), 3);
            assert!(!controller.loading());
        });
    }

    #[tokio::test(start_paused = true)]
    async fn unconfirmed_removal_retries_then_accepts_server_state() {
        let api = Rc::new(FakeTrackApi::with_tracks(catalog(12)));
        let (mut dom, controller, _) = list_host(&api).await;
        let fetched = api.list_calls().len();

        let patched = dom.in_runtime(|| {
            controller.apply_patch(TrackPatch::Remove("t01".into()));
            controller.tracks()
        });
        assert!(patched.iter().all(|t| t.id != "t01"));

        run_for(&mut dom, 3000).await;

        let attempts = RetryPolicy::default().attempts as usize;
        assert_eq!(api.list_calls().len() - fetched, 1 + attempts);
        assert!(shown_ids(&dom, controller).contains(&"t01".to_string()));
        assert!(!dom.in_runtime(|| controller.loading()));
    }

    #[tokio::test(start_paused = true)]
    async fn confirmed_removal_needs_a_single_refresh() {
        let api = Rc::new(FakeTrackApi::with_tracks(catalog(12)));
        let (mut dom, controller, _) = list_host(&api).await;
        let fetched = api.list_calls().len();

        api.tracks.borrow_mut().retain(|t| t.id != "t01");
        dom.in_runtime(|| controller.apply_patch(TrackPatch::Remove("t01".into())));
        run_for(&mut dom, 3000).await;

        assert_eq!(api.list_calls().len() - fetched, 1);
        let shown = shown_ids(&dom, controller);
        assert_eq!(shown.len(), 10);
        assert_eq!(shown[0], "t02");
    }

    #[tokio::test(start_paused = true)]
    async fn failed_load_raises_an_error_toast() {
        let api = Rc::new(FakeTrackApi::with_tracks(catalog(3)));
        let (mut dom, controller, toasts) = list_host(&api).await;

        api.fail_everything(ApiError::Network("connection refused".into()));
        dom.in_runtime(|| controller.refresh());
        run_for(&mut dom, 10).await;

        let raised = dom.in_runtime(|| toasts.toasts());
        assert_eq!(raised.len(), 1);
        assert_eq!(raised[0].kind, ToastKind::Error);
        assert_eq!(shown_ids(&dom, controller), vec!["t01", "t02", "t03"]);
        assert!(!dom.in_runtime(|| controller.loading()));
    }
}
