use crate::api::Track;
use crate::components::actions::{self, SubmitError};
use crate::components::modals::Modal;
use crate::components::toast::ToastManager;
use crate::components::track_list::{SharedApi, TrackListController};
use crate::components::Icon;
use dioxus::prelude::*;

use super::draft::{Field, FormErrors, TrackDraft};

#[component]
fn FormField(
    label: String,
    field: Field,
    test_id: String,
    #[props(default)] placeholder: String,
    draft: Signal<TrackDraft>,
    errors: Signal<FormErrors>,
) -> Element {
    let value = draft.read().value(field).to_string();
    let error = errors.read().get(field).map(str::to_string);

    rsx! {
        div { class: "form-field",
            label { class: "form-label", "{label}" }
            input {
                class: if error.is_some() { "input input-invalid" } else { "input" },
                "data-testid": "{test_id}",
                placeholder: "{placeholder}",
                value: "{value}",
                oninput: move |evt| {
                    draft.write().set(field, evt.value());
                    if errors.peek().get(field).is_some() {
                        errors.write().clear(field);
                    }
                },
            }
            if let Some(message) = error.clone() {
                p { class: "form-error", "data-testid": "error-{test_id}", "{message}" }
            }
        }
    }
}

/// Create form when `track` is `None`, edit form otherwise.
#[component]
pub fn TrackForm(track: Option<Track>, on_close: EventHandler<()>) -> Element {
    let controller = use_context::<TrackListController>();
    let toasts = use_context::<ToastManager>();
    let api = use_context::<SharedApi>();

    let existing_id = track.as_ref().map(|track| track.id.clone());
    let editing = existing_id.is_some();
    let seed = track.clone();
    let mut draft = use_signal(move || TrackDraft::from_track(seed.as_ref()));
    let mut errors = use_signal(FormErrors::default);
    let mut genre_choice = use_signal(String::new);
    let mut submitting = use_signal(|| false);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        if submitting() {
            return;
        }
        submitting.set(true);
        let current = draft();
        let vocabulary = controller.genres();
        let api = api.clone();
        let existing_id = existing_id.clone();
        spawn(async move {
            let outcome =
                actions::submit_track(api.as_ref(), existing_id.as_deref(), &current, &vocabulary)
                    .await;
            submitting.set(false);
            match outcome {
                Ok(done) => {
                    toasts.success(done.message);
                    controller.apply_patch(done.patch);
                    on_close.call(());
                }
                Err(SubmitError::Invalid(found)) => {
                    tracing::debug!("track form has {} invalid field(s)", found.count());
                    errors.set(found);
                }
                Err(SubmitError::Request(message)) => {
                    toasts.error(message);
                }
            }
        });
    };

    let add_genre = move |_| {
        let candidate = genre_choice();
        let vocabulary = controller.genres();
        let added = draft.write().add_genre(&candidate, &vocabulary);
        match added {
            Ok(true) => {
                errors.write().clear(Field::Genres);
                genre_choice.set(String::new());
            }
            Ok(false) => {}
            Err(message) => errors.write().genres = Some(message),
        }
    };

    let vocabulary = controller.genres();
    let available = draft.read().available_genres(&vocabulary);
    let selected_genres = draft.read().genres.clone();
    let genre_error = errors.read().genres.clone();
    let busy = submitting();
    let title = if editing { "Edit Track" } else { "Create Track" };

    rsx! {
        Modal {
            title: title.to_string(),
            test_id: "track-form".to_string(),
            on_close: move |_| {
                if !busy {
                    on_close.call(());
                }
            },
            form { class: "track-form", onsubmit: submit,
                FormField {
                    label: "Title",
                    field: Field::Title,
                    test_id: "input-title",
                    draft,
                    errors,
                }
                FormField {
                    label: "Artist",
                    field: Field::Artist,
                    test_id: "input-artist",
                    draft,
                    errors,
                }
                FormField {
                    label: "Album",
                    field: Field::Album,
                    test_id: "input-album",
                    placeholder: "Optional",
                    draft,
                    errors,
                }
                FormField {
                    label: "Cover Image URL",
                    field: Field::CoverImage,
                    test_id: "input-cover-image",
                    placeholder: "https://",
                    draft,
                    errors,
                }

                div { class: "form-field",
                    label { class: "form-label", "Genres" }
                    div { class: "genre-tags", "data-testid": "genre-selector",
                        for genre in selected_genres {
                            span { key: "{genre}", class: "genre-tag",
                                "{genre}"
                                button {
                                    r#type: "button",
                                    class: "genre-remove",
                                    aria_label: "Remove {genre}",
                                    onclick: {
                                        let genre = genre.clone();
                                        move |_| {
                                            draft.write().remove_genre(&genre);
                                            errors.write().clear(Field::Genres);
                                        }
                                    },
                                    Icon { name: "x".to_string(), class: "icon-xs".to_string() }
                                }
                            }
                        }
                    }
                    if vocabulary.is_empty() {
                        div { class: "genre-empty",
                            span { class: "muted", "No genres available" }
                            button {
                                r#type: "button",
                                class: "btn btn-secondary",
                                onclick: move |_| controller.reload_genres(),
                                Icon { name: "refresh".to_string(), class: "icon-sm".to_string() }
                                "Reload genres"
                            }
                        }
                    } else {
                        div { class: "genre-picker",
                            select {
                                class: "input",
                                value: "{genre_choice}",
                                oninput: move |evt| genre_choice.set(evt.value()),
                                option { value: "", "Select a genre" }
                                for genre in available {
                                    option { key: "{genre}", value: "{genre}", "{genre}" }
                                }
                            }
                            button {
                                r#type: "button",
                                class: "btn btn-secondary",
                                disabled: genre_choice().is_empty(),
                                onclick: add_genre,
                                Icon { name: "plus".to_string(), class: "icon-sm".to_string() }
                                "Add"
                            }
                        }
                    }
                    if let Some(message) = genre_error {
                        p { class: "form-error", "data-testid": "error-genre", "{message}" }
                    }
                }

                div { class: "modal-actions",
                    button {
                        r#type: "button",
                        class: "btn btn-secondary",
                        disabled: busy,
                        onclick: move |_| on_close.call(()),
                        "Cancel"
                    }
                    button {
                        r#type: "submit",
                        class: "btn btn-primary",
                        "data-testid": "submit-button",
                        disabled: busy,
                        if busy {
                            "Saving..."
                        } else {
                            "{title}"
                        }
                    }
                }
            }
        }
    }
}
