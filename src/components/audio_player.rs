// Inline playback for a track's attached audio file.

use crate::components::Icon;
use crate::utils::dom_id;
use dioxus::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStatus {
    Loading,
    Ready,
    Playing,
    Paused,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    CanPlay,
    Play,
    Pause,
    Ended,
    Failed,
}

impl PlayerStatus {
    pub fn next(self, event: PlayerEvent) -> Self {
        match (self, event) {
            (_, PlayerEvent::Failed) => Self::Error,
            (Self::Error, _) => Self::Error,
            (Self::Loading, PlayerEvent::CanPlay) => Self::Ready,
            (Self::Loading, PlayerEvent::Play) => Self::Playing,
            (Self::Loading, _) => Self::Loading,
            (_, PlayerEvent::Play) => Self::Playing,
            (Self::Playing, PlayerEvent::Pause | PlayerEvent::Ended) => Self::Paused,
            (status, _) => status,
        }
    }

    pub fn can_toggle(self) -> bool {
        matches!(self, Self::Ready | Self::Playing | Self::Paused)
    }

    pub fn is_playing(self) -> bool {
        self == Self::Playing
    }
}

/// Remount with a `key` of the source URL to reset playback state for a new file.
#[component]
pub fn AudioPlayer(track_id: String, src: String) -> Element {
    let mut status = use_signal(|| PlayerStatus::Loading);
    let element_id = format!("track-audio-{}", dom_id(&track_id));

    let mut advance = move |event: PlayerEvent| {
        let current = *status.peek();
        let next = current.next(event);
        if next != current {
            status.set(next);
        }
    };

    let toggle = {
        let element_id = element_id.clone();
        move |_| {
            let current = status();
            if !current.can_toggle() {
                return;
            }
            let method = if current.is_playing() { "pause" } else { "play" };
            let script = format!(
                r#"(() => {{
                    const el = document.getElementById("{element_id}");
                    if (el) {{ const r = el.{method}(); if (r && r.catch) r.catch(() => {{}}); }}
                }})();"#
            );
            let _ = document::eval(&script);
        }
    };

    let current = status();
    let (icon, button_test_id) = if current.is_playing() {
        ("pause", format!("pause-button-{track_id}"))
    } else {
        ("play", format!("play-button-{track_id}"))
    };
    let failed_src = src.clone();

    rsx! {
        div { class: "audio-player", "data-testid": "audio-player-{track_id}",
            audio {
                id: "{element_id}",
                src: "{src}",
                preload: "metadata",
                oncanplay: move |_| advance(PlayerEvent::CanPlay),
                onplay: move |_| advance(PlayerEvent::Play),
                onpause: move |_| advance(PlayerEvent::Pause),
                onended: move |_| advance(PlayerEvent::Ended),
                onerror: move |_| {
                    tracing::warn!("audio source failed to load: {failed_src}");
                    advance(PlayerEvent::Failed);
                },
            }
            button {
                class: "btn btn-icon",
                "data-testid": "{button_test_id}",
                disabled: !current.can_toggle(),
                onclick: toggle,
                Icon { name: icon.to_string(), class: "icon-sm".to_string() }
            }
            match current {
                PlayerStatus::Loading => rsx! { span { class: "audio-status", "Loading audio..." } },
                PlayerStatus::Error => rsx! { span { class: "audio-status audio-error", "Unable to load audio" } },
                _ => rsx! {},
            }
        }
    }
}
