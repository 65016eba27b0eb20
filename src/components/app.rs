use crate::api::{Track, TracksClient};
use crate::components::toast::{use_toast_manager, ToastContainer};
use crate::components::track_form::TrackForm;
use crate::components::track_list::{use_track_list, SharedApi, TrackList};
use crate::components::Icon;
use crate::config::AppConfig;
use dioxus::prelude::*;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
enum FormTarget {
    Create,
    Edit(Track),
}

impl FormTarget {
    fn key(&self) -> String {
        match self {
            Self::Create => "create".to_string(),
            Self::Edit(track) => format!("edit-{}", track.id),
        }
    }

    fn track(&self) -> Option<Track> {
        match self {
            Self::Create => None,
            Self::Edit(track) => Some(track.clone()),
        }
    }
}

/// Root of the page. Owns configuration, the API client, the toast manager, and the
/// list controller, and hands them to descendants through context.
#[component]
pub fn AppShell() -> Element {
    let config = use_context_provider(AppConfig::default);
    let api = use_context_provider(|| -> SharedApi {
        tracing::info!("using track service at {}", config.api_base_url);
        Rc::new(TracksClient::new(&config.api_base_url))
    });
    let toasts = use_toast_manager(config.toast_duration_ms);
    use_context_provider(|| toasts);
    use_drop(move || toasts.shutdown());
    let controller = use_track_list(api, toasts, &config);
    use_context_provider(|| controller);

    let mut form = use_signal(|| None::<FormTarget>);

    rsx! {
        div { class: "app-container",
            header { class: "app-header",
                h1 { class: "app-title", "data-testid": "tracks-header",
                    Icon { name: "music".to_string(), class: "icon-md".to_string() }
                    "Music Tracks"
                }
                button {
                    class: "btn btn-primary",
                    "data-testid": "create-track-button",
                    onclick: move |_| form.set(Some(FormTarget::Create)),
                    Icon { name: "plus".to_string(), class: "icon-sm".to_string() }
                    "Create Track"
                }
            }
            main { class: "app-main",
                TrackList { on_edit: move |track: Track| form.set(Some(FormTarget::Edit(track))) }
            }
            if let Some(target) = form() {
                TrackForm {
                    key: "{target.key()}",
                    track: target.track(),
                    on_close: move |_| form.set(None),
                }
            }
            ToastContainer { manager: toasts }
        }
    }
}
