use crate::api::Track;
use dioxus::prelude::*;

#[component]
pub fn Modal(
    title: String,
    on_close: EventHandler<()>,
    #[props(default = "modal".to_string())] test_id: String,
    children: Element,
) -> Element {
    rsx! {
        div { class: "modal-backdrop", onclick: move |_| on_close.call(()),
            div {
                class: "modal",
                role: "dialog",
                "data-testid": "{test_id}",
                onclick: move |evt| evt.stop_propagation(),
                h2 { class: "modal-title", "{title}" }
                {children}
            }
        }
    }
}

/// Yes/no confirmation for a destructive action on one track.
#[component]
pub fn ConfirmDialog(
    title: String,
    message: String,
    confirm_label: String,
    busy: bool,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    rsx! {
        Modal {
            title,
            test_id: "confirm-dialog".to_string(),
            on_close: move |_| {
                if !busy {
                    on_cancel.call(());
                }
            },
            p { class: "modal-message", "{message}" }
            div { class: "modal-actions",
                button {
                    class: "btn btn-secondary",
                    "data-testid": "cancel-delete",
                    disabled: busy,
                    onclick: move |_| on_cancel.call(()),
                    "Cancel"
                }
                button {
                    class: "btn btn-danger",
                    "data-testid": "confirm-delete",
                    disabled: busy,
                    onclick: move |_| on_confirm.call(()),
                    if busy {
                        "Deleting..."
                    } else {
                        "{confirm_label}"
                    }
                }
            }
        }
    }
}

#[component]
pub fn BulkDeleteDialog(
    tracks: Vec<Track>,
    busy: bool,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    let count = tracks.len();
    rsx! {
        Modal {
            title: "Delete {count} track(s)?",
            test_id: "bulk-delete-dialog".to_string(),
            on_close: move |_| {
                if !busy {
                    on_cancel.call(());
                }
            },
            p { class: "modal-message", "The following tracks will be deleted permanently:" }
            ul { class: "bulk-delete-list",
                for track in tracks {
                    li { key: "{track.id}", "{track.title} by {track.artist}" }
                }
            }
            div { class: "modal-actions",
                button {
                    class: "btn btn-secondary",
                    disabled: busy,
                    onclick: move |_| on_cancel.call(()),
                    "Cancel"
                }
                button {
                    class: "btn btn-danger",
                    "data-testid": "confirm-bulk-delete",
                    disabled: busy || count == 0,
                    onclick: move |_| on_confirm.call(()),
                    if busy {
                        "Deleting..."
                    } else {
                        "Delete"
                    }
                }
            }
        }
    }
}
