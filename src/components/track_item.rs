// One track card: metadata, inline player, and the per-track actions.

use crate::api::{AudioCandidate, AudioUpload, Track};
use crate::components::actions::{self, run_detached, AudioAction};
use crate::components::audio_player::AudioPlayer;
use crate::components::modals::ConfirmDialog;
use crate::components::toast::ToastManager;
use crate::components::track_list::{SharedApi, TrackListController};
use crate::components::Icon;
use crate::config::AppConfig;
use dioxus::prelude::*;

const DEFAULT_COVER: &str = "https://picsum.photos/300/300";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Confirm {
    Delete,
    DeleteAudio,
}

/// The remote action in flight for this card. Only one runs at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Busy {
    Deleting,
    DeletingAudio,
    Audio(AudioAction),
}

#[component]
pub fn TrackItem(
    track: Track,
    selecting: bool,
    selected: bool,
    on_toggle_select: EventHandler<String>,
    on_edit: EventHandler<Track>,
) -> Element {
    let controller = use_context::<TrackListController>();
    let toasts = use_context::<ToastManager>();
    let api = use_context::<SharedApi>();
    let config = use_context::<AppConfig>();

    let mut confirm = use_signal(|| None::<Confirm>);
    let mut busy = use_signal(|| None::<Busy>);

    // Requests outlive the card, so the flags may already be dropped.
    let settle = move || {
        let (mut busy, mut confirm) = (busy, confirm);
        if let Ok(mut flag) = busy.try_write() {
            *flag = None;
        };
        if let Ok(mut flag) = confirm.try_write() {
            *flag = None;
        };
    };

    let confirm_delete = {
        let api = api.clone();
        let track = track.clone();
        move |_| {
            if busy.peek().is_some() {
                return;
            }
            busy.set(Some(Busy::Deleting));
            let api = api.clone();
            let track = track.clone();
            run_detached(
                controller,
                toasts,
                async move { actions::delete_track(api.as_ref(), &track).await },
                settle,
            );
        }
    };

    let confirm_delete_audio = {
        let api = api.clone();
        let track = track.clone();
        move |_| {
            if busy.peek().is_some() {
                return;
            }
            busy.set(Some(Busy::DeletingAudio));
            let api = api.clone();
            let track = track.clone();
            run_detached(
                controller,
                toasts,
                async move { actions::delete_audio(api.as_ref(), &track).await },
                settle,
            );
        }
    };

    let audio_action = AudioAction::for_track(&track);
    let pick_audio = {
        let api = api.clone();
        let config = config.clone();
        let track = track.clone();
        move |evt: FormEvent| {
            if busy.peek().is_some() {
                return;
            }
            let Some(file) = evt.files().into_iter().next() else {
                return;
            };
            let candidate = AudioCandidate {
                name: file.name(),
                content_type: file.content_type(),
                size: file.size(),
            };
            let media_type = match candidate.check(&config) {
                Ok(media_type) => media_type,
                Err(rejection) => {
                    tracing::info!("rejected {}: {rejection:?}", candidate.name);
                    toasts.error(rejection.to_string());
                    return;
                }
            };

            busy.set(Some(Busy::Audio(audio_action)));
            let api = api.clone();
            let config = config.clone();
            let track = track.clone();
            let work = async move {
                match file.read_bytes().await {
                    Ok(bytes) => {
                        let upload = AudioUpload {
                            file_name: candidate.name,
                            media_type,
                            bytes: bytes.to_vec(),
                        };
                        actions::attach_audio(api.as_ref(), &config, &track, audio_action, upload)
                            .await
                    }
                    Err(err) => {
                        tracing::warn!("could not read {}: {err}", candidate.name);
                        Err(audio_action.fallback().to_string())
                    }
                }
            };
            run_detached(controller, toasts, work, settle);
        }
    };

    let id = track.id.clone();
    let cover = track
        .cover_image
        .clone()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_COVER.to_string());
    let album = track
        .album
        .clone()
        .filter(|album| !album.trim().is_empty())
        .unwrap_or_else(|| "No album".to_string());
    let audio_url = track
        .audio_file
        .as_deref()
        .filter(|_| track.has_audio())
        .map(|file| config.audio_file_url(file));
    let busy_now = busy();
    let card_class = if selected {
        "track-card selected"
    } else {
        "track-card"
    };
    let audio_label = if busy_now == Some(Busy::Audio(audio_action)) {
        audio_action.busy_label()
    } else {
        audio_action.idle_label()
    };
    let edited = track.clone();
    let toggle_id = id.clone();

    rsx! {
        div { class: "{card_class}", "data-testid": "track-item-{id}",
            if selecting {
                input {
                    r#type: "checkbox",
                    class: "track-checkbox",
                    "data-testid": "track-checkbox-{id}",
                    checked: selected,
                    onchange: move |_| on_toggle_select.call(toggle_id.clone()),
                }
            }
            img { class: "track-cover", src: "{cover}", alt: "{track.title} cover" }
            div { class: "track-info",
                h3 { class: "track-title", "data-testid": "track-item-{id}-title", "{track.title}" }
                p { class: "track-artist", "data-testid": "track-item-{id}-artist", "{track.artist}" }
                p { class: "track-album", "{album}" }
                div { class: "track-genres",
                    if track.genres.is_empty() {
                        span { class: "muted", "No genres" }
                    } else {
                        for genre in track.genres.iter() {
                            span { key: "{genre}", class: "genre-tag", "{genre}" }
                        }
                    }
                }
            }
            if let Some(src) = audio_url {
                AudioPlayer { key: "{src}", track_id: id.clone(), src: src.clone() }
            }
            div { class: "track-actions",
                button {
                    class: "btn btn-secondary",
                    "data-testid": "edit-track-{id}",
                    disabled: busy_now.is_some(),
                    onclick: move |_| on_edit.call(edited.clone()),
                    Icon { name: "edit".to_string(), class: "icon-sm".to_string() }
                    "Edit"
                }
                label {
                    class: if busy_now.is_some() { "btn btn-secondary disabled" } else { "btn btn-secondary" },
                    "data-testid": "upload-track-{id}",
                    Icon { name: "upload".to_string(), class: "icon-sm".to_string() }
                    "{audio_label}"
                    input {
                        r#type: "file",
                        class: "visually-hidden",
                        accept: "audio/mpeg,audio/mp3,audio/wav,.mp3,.wav",
                        disabled: busy_now.is_some(),
                        onchange: pick_audio,
                    }
                }
                if track.has_audio() {
                    button {
                        class: "btn btn-secondary",
                        "data-testid": "delete-audio-{id}",
                        disabled: busy_now.is_some(),
                        onclick: move |_| confirm.set(Some(Confirm::DeleteAudio)),
                        "Delete Audio"
                    }
                }
                button {
                    class: "btn btn-danger",
                    "data-testid": "delete-track-{id}",
                    disabled: busy_now.is_some(),
                    onclick: move |_| confirm.set(Some(Confirm::Delete)),
                    Icon { name: "trash".to_string(), class: "icon-sm".to_string() }
                    "Delete"
                }
            }
            match confirm() {
                Some(Confirm::Delete) => rsx! {
                    ConfirmDialog {
                        title: "Delete Track",
                        message: "Are you sure you want to delete \"{track.title}\" by {track.artist}?",
                        confirm_label: "Delete",
                        busy: busy_now == Some(Busy::Deleting),
                        on_confirm: confirm_delete,
                        on_cancel: move |_| confirm.set(None),
                    }
                },
                Some(Confirm::DeleteAudio) => rsx! {
                    ConfirmDialog {
                        title: "Delete Audio",
                        message: "Remove the audio file from \"{track.title}\"?",
                        confirm_label: "Delete Audio",
                        busy: busy_now == Some(Busy::DeletingAudio),
                        on_confirm: confirm_delete_audio,
                        on_cancel: move |_| confirm.set(None),
                    }
                },
                None => rsx! {},
            }
        }
    }
}
