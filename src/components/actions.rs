//! Remote workflows behind the per-track buttons and the track form.
//!
//! Each workflow checks its local preconditions, performs one request, and returns the
//! patch to apply plus the success text. Failures come back as the message to show.
//! `run_detached` delivers a workflow's outcome to the toasts and the list.

use crate::api::{AudioUpload, Track, TrackApi};
use crate::components::toast::ToastManager;
use crate::components::track_form::{FormErrors, TrackDraft};
use crate::components::track_list::{TrackListController, TrackPatch};
use crate::config::AppConfig;
use dioxus::core::spawn_forever;
use std::future::Future;

#[derive(Debug, Clone, PartialEq)]
pub struct Completed {
    pub patch: TrackPatch,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioAction {
    Upload,
    Replace,
}

impl AudioAction {
    /// Upload is offered only for tracks without audio, replace only for tracks with it.
    pub fn for_track(track: &Track) -> Self {
        if track.has_audio() {
            Self::Replace
        } else {
            Self::Upload
        }
    }

    pub fn idle_label(self) -> &'static str {
        match self {
            Self::Upload => "Upload Audio",
            Self::Replace => "Replace Audio",
        }
    }

    pub fn busy_label(self) -> &'static str {
        match self {
            Self::Upload => "Uploading...",
            Self::Replace => "Replacing...",
        }
    }

    fn success_message(self) -> &'static str {
        match self {
            Self::Upload => "Audio uploaded",
            Self::Replace => "Audio replaced",
        }
    }

    pub fn fallback(self) -> &'static str {
        match self {
            Self::Upload => "Upload failed",
            Self::Replace => "Replace failed",
        }
    }
}

/// Runs `work` on the root scope, so the outcome is still reported when the component
/// that started it unmounts mid-request. `settled` runs first and must cope with that
/// component being gone. The patch is applied last.
pub fn run_detached(
    controller: TrackListController,
    toasts: ToastManager,
    work: impl Future<Output = Result<Completed, String>> + 'static,
    settled: impl FnOnce() + 'static,
) {
    spawn_forever(async move {
        let outcome = work.await;
        settled();
        match outcome {
            Ok(done) => {
                toasts.success(done.message);
                controller.apply_patch(done.patch);
            }
            Err(message) => {
                toasts.error(message);
            }
        }
    });
}

pub async fn delete_track(api: &dyn TrackApi, track: &Track) -> Result<Completed, String> {
    match api.delete_track(&track.id).await {
        Ok(()) => Ok(Completed {
            patch: TrackPatch::Remove(track.id.clone()),
            message: format!("Track \"{}\" deleted", track.title),
        }),
        Err(err) => {
            tracing::warn!("delete of track {} failed: {err}", track.id);
            Err(err.user_message("Failed to delete track"))
        }
    }
}

pub async fn delete_audio(api: &dyn TrackApi, track: &Track) -> Result<Completed, String> {
    match api.delete_audio(&track.id).await {
        Ok(updated) => Ok(Completed {
            patch: TrackPatch::Replace(updated),
            message: format!("Audio for \"{}\" deleted", track.title),
        }),
        Err(err) => {
            tracing::warn!("audio delete for track {} failed: {err}", track.id);
            Err(err.user_message("Failed to delete audio"))
        }
    }
}

/// Uploads or replaces the track's audio. The file is checked against the configured
/// type allow-list and size limit before anything is sent.
pub async fn attach_audio(
    api: &dyn TrackApi,
    config: &AppConfig,
    track: &Track,
    action: AudioAction,
    upload: AudioUpload,
) -> Result<Completed, String> {
    if AudioAction::for_track(track) != action {
        return Err(action.fallback().to_string());
    }
    upload
        .candidate()
        .check(config)
        .map_err(|rejection| rejection.to_string())?;

    let result = match action {
        AudioAction::Upload => api.upload_audio(&track.id, upload).await,
        AudioAction::Replace => api.replace_audio(&track.id, upload).await,
    };
    match result {
        Ok(updated) => Ok(Completed {
            patch: TrackPatch::Replace(updated),
            message: action.success_message().to_string(),
        }),
        Err(err) => {
            tracing::warn!("{action:?} audio for track {} failed: {err}", track.id);
            Err(err.user_message(action.fallback()))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitError {
    Invalid(FormErrors),
    Request(String),
}

/// Validates the draft and creates or updates the track. Nothing is sent when
/// validation fails.
pub async fn submit_track(
    api: &dyn TrackApi,
    existing_id: Option<&str>,
    draft: &TrackDraft,
    vocabulary: &[String],
) -> Result<Completed, SubmitError> {
    let input = draft.validate(vocabulary).map_err(SubmitError::Invalid)?;
    tracing::debug!("submitting track {existing_id:?}: {input:?}");

    let result = match existing_id {
        Some(id) => api
            .update_track(id, &input)
            .await
            .map(|track| (TrackPatch::Replace(track), "updated")),
        None => api
            .create_track(&input)
            .await
            .map(|track| (TrackPatch::Created(track), "created")),
    };

    match result {
        Ok((patch, verb)) => Ok(Completed {
            patch,
            message: format!("Track \"{}\" {verb}", input.title),
        }),
        Err(err) => {
            tracing::warn!("saving track {existing_id:?} failed: {err}");
            Err(SubmitError::Request(err.user_message("Failed to save track")))
        }
    }
}
