use crate::api::{SortKey, Track};
use crate::components::modals::BulkDeleteDialog;
use crate::components::toast::ToastManager;
use crate::components::track_item::TrackItem;
use crate::components::Icon;
use dioxus::prelude::*;

use super::bulk_delete::delete_many;
use super::controller::{SharedApi, TrackListController, TrackPatch};
use super::query::clamp_page;
use super::selection::Selection;

#[component]
pub fn TrackList(on_edit: EventHandler<Track>) -> Element {
    let controller = use_context::<TrackListController>();
    let toasts = use_context::<ToastManager>();
    let api = use_context::<SharedApi>();

    let mut selection = use_signal(Selection::default);
    let mut bulk_open = use_signal(|| false);
    let mut bulk_running = use_signal(|| false);

    // A shrinking result set can leave the current page past the end.
    use_effect(move || {
        let total = controller.total_pages();
        let page = controller.page();
        if page > total {
            controller.set_page(clamp_page(page as i64, total));
        }
    });

    // Checks only live as long as the page that shows them.
    use_effect(move || {
        let tracks = controller.tracks();
        let stale = selection
            .peek()
            .ids()
            .iter()
            .any(|id| !tracks.iter().any(|track| &track.id == id));
        if stale {
            selection.write().prune_to(&tracks);
        }
    });

    let confirm_bulk_delete = move |_| {
        if bulk_running() {
            return;
        }
        let ids = selection.read().visible_ids(&controller.tracks());
        if ids.is_empty() {
            return;
        }
        bulk_running.set(true);
        let api = api.clone();
        spawn(async move {
            let report = delete_many(api.as_ref(), &ids).await;
            tracing::info!(
                "bulk delete finished: {} deleted, {} failed",
                report.deleted.len(),
                report.failed.len()
            );

            bulk_running.set(false);
            bulk_open.set(false);
            if let Some(message) = report.success_message() {
                toasts.success(message);
            }
            if let Some(message) = report.failure_message() {
                toasts.error(message);
            }
            if report.is_complete() {
                selection.write().exit();
            } else {
                selection.write().retain_only(&report.failed_ids());
            }
            if !report.deleted.is_empty() {
                controller.set_page(1);
                controller.apply_patch(TrackPatch::RemoveMany(report.deleted));
            }
        });
    };

    let tracks = controller.tracks();
    let loading = controller.loading();
    let page = controller.page();
    let total_pages = controller.total_pages();
    let genres = controller.genres();
    let filter_genre = controller.filter_genre();
    let search = controller.search();
    let current_selection = selection();
    let selecting = current_selection.is_active();
    let all_selected = current_selection.all_selected(&tracks);
    let selected_tracks = current_selection.selected_tracks(&tracks);
    let selected_count = selected_tracks.len();
    let visible = tracks.clone();

    rsx! {
        section { class: "track-list", "data-testid": "track-list",
            div { class: "toolbar",
                button {
                    class: if selecting { "btn btn-primary" } else { "btn btn-secondary" },
                    "data-testid": "select-mode-toggle",
                    onclick: move |_| selection.write().toggle_mode(),
                    if selecting {
                        "Cancel Selection"
                    } else {
                        "Select Tracks"
                    }
                }
                if selecting {
                    label { class: "select-all",
                        input {
                            r#type: "checkbox",
                            "data-testid": "select-all",
                            checked: all_selected,
                            onchange: move |_| selection.write().toggle_all(&visible),
                        }
                        "Select all"
                    }
                    button {
                        class: "btn btn-danger",
                        "data-testid": "bulk-delete-button",
                        disabled: selected_count == 0,
                        onclick: move |_| bulk_open.set(true),
                        Icon { name: "trash".to_string(), class: "icon-sm".to_string() }
                        "Delete Selected ({selected_count})"
                    }
                }
                select {
                    class: "input",
                    "data-testid": "sort-select",
                    value: controller.sort().as_str(),
                    oninput: move |evt| {
                        if let Some(sort) = SortKey::parse(&evt.value()) {
                            controller.set_sort(sort);
                        }
                    },
                    for key in SortKey::ALL {
                        option { key: "{key.as_str()}", value: key.as_str(), "{key.label()}" }
                    }
                }
                select {
                    class: "input",
                    "data-testid": "filter-genre",
                    value: "{filter_genre}",
                    oninput: move |evt| controller.set_filter_genre(evt.value()),
                    option { value: "", "All Genres" }
                    for genre in genres {
                        option { key: "{genre}", value: "{genre}", "{genre}" }
                    }
                }
                input {
                    class: "input",
                    "data-testid": "filter-artist",
                    placeholder: "Filter by artist",
                    value: controller.filter_artist(),
                    oninput: move |evt| controller.set_filter_artist(evt.value()),
                }
                div { class: "search-box",
                    Icon { name: "search".to_string(), class: "icon-sm".to_string() }
                    input {
                        class: "input",
                        "data-testid": "search-input",
                        placeholder: "Search tracks",
                        value: controller.search_input(),
                        oninput: move |evt| controller.on_search_input(evt.value()),
                    }
                }
            }

            if !search.is_empty() {
                p { class: "muted", "data-testid": "search-summary", "Results for \"{search}\"" }
            }
            // Cards stay mounted under the loader while a refresh is in flight.
            if loading {
                div { class: "list-status", "data-testid": "loading-tracks",
                    Icon { name: "loader".to_string(), class: "icon-lg".to_string() }
                }
            }
            if tracks.is_empty() {
                if !loading {
                    p { class: "list-status muted", "No tracks available" }
                }
            } else {
                div { class: if loading { "track-grid refreshing" } else { "track-grid" },
                    for track in tracks {
                        TrackItem {
                            key: "{track.id}",
                            selecting,
                            selected: current_selection.contains(&track.id),
                            on_toggle_select: move |id: String| selection.write().toggle(&id),
                            on_edit: move |track: Track| on_edit.call(track),
                            track: track.clone(),
                        }
                    }
                }
            }

            div { class: "pagination", "data-testid": "pagination",
                button {
                    class: "btn btn-secondary",
                    "data-testid": "pagination-prev",
                    disabled: page <= 1,
                    onclick: move |_| controller.set_page(clamp_page(page as i64 - 1, total_pages)),
                    "Previous"
                }
                span { class: "page-indicator", "Page {page} of {total_pages}" }
                button {
                    class: "btn btn-secondary",
                    "data-testid": "pagination-next",
                    disabled: page >= total_pages,
                    onclick: move |_| controller.set_page(clamp_page(page as i64 + 1, total_pages)),
                    "Next"
                }
            }

            if bulk_open() {
                BulkDeleteDialog {
                    tracks: selected_tracks,
                    busy: bulk_running(),
                    on_confirm: confirm_bulk_delete,
                    on_cancel: move |_| bulk_open.set(false),
                }
            }
        }
    }
}
