// Local draft of a track being created or edited, with field-scoped validation.

use crate::api::{Track, TrackInput};
use crate::utils::{has_http_prefix, non_blank};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Artist,
    Album,
    CoverImage,
    Genres,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub cover_image: Option<String>,
    pub genres: Option<String>,
}

impl FormErrors {
    pub fn count(&self) -> usize {
        [&self.title, &self.artist, &self.cover_image, &self.genres]
            .into_iter()
            .filter(|slot| slot.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Title => self.title.as_deref(),
            Field::Artist => self.artist.as_deref(),
            Field::CoverImage => self.cover_image.as_deref(),
            Field::Genres => self.genres.as_deref(),
            Field::Album => None,
        }
    }

    pub fn clear(&mut self, field: Field) {
        match field {
            Field::Title => self.title = None,
            Field::Artist => self.artist = None,
            Field::CoverImage => self.cover_image = None,
            Field::Genres => self.genres = None,
            Field::Album => {}
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackDraft {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub cover_image: String,
    pub genres: Vec<String>,
}

impl TrackDraft {
    /// Seeds the draft from an existing track, or empty for a new one.
    pub fn from_track(track: Option<&Track>) -> Self {
        match track {
            Some(track) => Self {
                title: track.title.clone(),
                artist: track.artist.clone(),
                album: track.album.clone().unwrap_or_default(),
                cover_image: track.cover_image.clone().unwrap_or_default(),
                genres: track.genres.clone(),
            },
            None => Self::default(),
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Title => self.title = value,
            Field::Artist => self.artist = value,
            Field::Album => self.album = value,
            Field::CoverImage => self.cover_image = value,
            Field::Genres => {}
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Artist => &self.artist,
            Field::Album => &self.album,
            Field::CoverImage => &self.cover_image,
            Field::Genres => "",
        }
    }

    /// Checks every rule at once, one message per field. On success the draft is
    /// converted with blank optionals dropped.
    pub fn validate(&self, vocabulary: &[String]) -> Result<TrackInput, FormErrors> {
        let mut errors = FormErrors::default();

        if self.title.trim().is_empty() {
            errors.title = Some("Title is required".into());
        }
        if self.artist.trim().is_empty() {
            errors.artist = Some("Artist is required".into());
        }
        if let Some(cover) = non_blank(&self.cover_image) {
            if !has_http_prefix(&cover) {
                errors.cover_image = Some("Invalid URL format".into());
            }
        }
        if self.genres.is_empty() {
            errors.genres = Some("At least one genre is required".into());
        } else {
            let unknown: Vec<&str> = self
                .genres
                .iter()
                .filter(|genre| !vocabulary.contains(genre))
                .map(String::as_str)
                .collect();
            if !unknown.is_empty() {
                errors.genres = Some(format!("Invalid genres: {}", unknown.join(", ")));
            }
        }

        if errors.is_empty() {
            Ok(self.to_input())
        } else {
            Err(errors)
        }
    }

    fn to_input(&self) -> TrackInput {
        TrackInput {
            title: self.title.clone(),
            artist: self.artist.clone(),
            album: non_blank(&self.album),
            genres: self.genres.clone(),
            cover_image: non_blank(&self.cover_image),
        }
    }

    /// Adds a genre from the vocabulary. Blank and duplicate candidates are ignored;
    /// `Ok(true)` means the draft changed.
    pub fn add_genre(&mut self, candidate: &str, vocabulary: &[String]) -> Result<bool, String> {
        let candidate = candidate.trim();
        if candidate.is_empty() || self.genres.iter().any(|genre| genre == candidate) {
            return Ok(false);
        }
        if !vocabulary.iter().any(|genre| genre == candidate) {
            return Err(format!("Genre \"{candidate}\" is not available"));
        }
        self.genres.push(candidate.to_string());
        Ok(true)
    }

    pub fn remove_genre(&mut self, genre: &str) {
        self.genres.retain(|selected| selected != genre);
    }

    /// Vocabulary entries not yet on the draft, in vocabulary order.
    pub fn available_genres(&self, vocabulary: &[String]) -> Vec<String> {
        vocabulary
            .iter()
            .filter(|genre| !self.genres.contains(genre))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary() -> Vec<String> {
        vec!["Rock".into(), "Jazz".into(), "Pop".into()]
    }

    fn valid() -> TrackDraft {
        TrackDraft {
            title: "So What".into(),
            artist: "Miles Davis".into(),
            genres: vec!["Jazz".into()],
            ..TrackDraft::default()
        }
    }

    #[test]
    fn empty_draft_has_three_errors() {
        let errors = TrackDraft::default().validate(&vocabulary()).unwrap_err();
        assert_eq!(errors.count(), 3);
        assert_eq!(errors.title.as_deref(), Some("Title is required"));
        assert_eq!(errors.artist.as_deref(), Some("Artist is required"));
        assert_eq!(errors.genres.as_deref(), Some("At least one genre is required"));
        assert_eq!(errors.cover_image, None);
    }

    #[test]
    fn whitespace_title_is_blank() {
        let draft = TrackDraft {
            title: "   ".into(),
            ..valid()
        };
        let errors = draft.validate(&vocabulary()).unwrap_err();
        assert_eq!(errors.count(), 1);
        assert!(errors.title.is_some());
    }

    #[test]
    fn non_http_cover_is_the_only_error() {
        let draft = TrackDraft {
            cover_image: "ftp://covers/1.png".into(),
            ..valid()
        };
        let errors = draft.validate(&vocabulary()).unwrap_err();
        assert_eq!(errors.count(), 1);
        assert_eq!(errors.get(Field::CoverImage), Some("Invalid URL format"));
    }

    #[test]
    fn unknown_genres_are_named() {
        let draft = TrackDraft {
            genres: vec!["Jazz".into(), "Polka".into(), "Ska".into()],
            ..valid()
        };
        let errors = draft.validate(&vocabulary()).unwrap_err();
        assert_eq!(errors.genres.as_deref(), Some("Invalid genres: Polka, Ska"));
    }

    #[test]
    fn empty_vocabulary_rejects_any_genre() {
        let errors = valid().validate(&[]).unwrap_err();
        assert_eq!(errors.genres.as_deref(), Some("Invalid genres: Jazz"));
    }

    #[test]
    fn blank_optionals_become_absent() {
        let draft = TrackDraft {
            album: " ".into(),
            cover_image: String::new(),
            ..valid()
        };
        let input = draft.validate(&vocabulary()).unwrap();
        assert_eq!(input.album, None);
        assert_eq!(input.cover_image, None);

        let draft = TrackDraft {
            album: "Kind of Blue".into(),
            cover_image: "https://img.example/kob.jpg".into(),
            ..valid()
        };
        let input = draft.validate(&vocabulary()).unwrap();
        assert_eq!(input.album.as_deref(), Some("Kind of Blue"));
        assert_eq!(input.cover_image.as_deref(), Some("https://img.example/kob.jpg"));
    }

    #[test]
    fn seeds_from_existing_track() {
        let track = Track {
            id: "t1".into(),
            title: "Song".into(),
            artist: "Band".into(),
            album: Some("LP".into()),
            genres: vec!["Rock".into()],
            cover_image: None,
            audio_file: Some("song.mp3".into()),
        };
        let draft = TrackDraft::from_track(Some(&track));
        assert_eq!(draft.album, "LP");
        assert_eq!(draft.cover_image, "");
        assert_eq!(draft.genres, vec!["Rock"]);
        assert_eq!(TrackDraft::from_track(None), TrackDraft::default());
    }

    #[test]
    fn genre_add_rules() {
        let mut draft = valid();
        assert_eq!(draft.add_genre("Rock", &vocabulary()), Ok(true));
        assert_eq!(draft.add_genre("Rock", &vocabulary()), Ok(false));
        assert_eq!(draft.add_genre("  ", &vocabulary()), Ok(false));
        assert_eq!(
            draft.add_genre("Polka", &vocabulary()),
            Err("Genre \"Polka\" is not available".to_string())
        );
        assert_eq!(draft.genres, vec!["Jazz", "Rock"]);
        assert_eq!(draft.available_genres(&vocabulary()), vec!["Pop"]);

        draft.remove_genre("Jazz");
        draft.remove_genre("Missing");
        assert_eq!(draft.genres, vec!["Rock"]);
    }

    #[test]
    fn clearing_one_field_keeps_others() {
        let mut errors = TrackDraft::default().validate(&vocabulary()).unwrap_err();
        errors.clear(Field::Title);
        errors.clear(Field::Album);
        assert_eq!(errors.count(), 2);
        assert_eq!(errors.get(Field::Title), None);
    }
}
