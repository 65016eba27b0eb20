//! Client-side checks for audio attachments, run before any request is sent.

use crate::config::AppConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AudioRejection {
    #[error("Invalid file type")]
    UnsupportedType(String),
    #[error("File too large")]
    TooLarge { size: u64 },
    #[error("File is empty")]
    Empty,
}

/// Metadata of a picked file, known before its bytes are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioCandidate {
    pub name: String,
    pub content_type: Option<String>,
    pub size: u64,
}

impl AudioCandidate {
    /// The declared media type, or one inferred from the file extension when the
    /// platform reports none.
    pub fn media_type(&self) -> String {
        if let Some(content_type) = self
            .content_type
            .as_ref()
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty())
        {
            return content_type;
        }

        let extension = self
            .name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "mp3" => "audio/mpeg".to_string(),
            "wav" => "audio/wav".to_string(),
            _ => "application/octet-stream".to_string(),
        }
    }

    /// Returns the accepted media type.
    pub fn check(&self, config: &AppConfig) -> Result<String, AudioRejection> {
        let media_type = self.media_type();
        if !config
            .allowed_audio_types
            .iter()
            .any(|allowed| allowed == &media_type)
        {
            return Err(AudioRejection::UnsupportedType(media_type));
        }
        if self.size > config.max_audio_bytes {
            return Err(AudioRejection::TooLarge { size: self.size });
        }
        if self.size == 0 {
            return Err(AudioRejection::Empty);
        }
        Ok(media_type)
    }
}

/// A checked file ready to be sent as the `audioFile` multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioUpload {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl AudioUpload {
    pub fn candidate(&self) -> AudioCandidate {
        AudioCandidate {
            name: self.file_name.clone(),
            content_type: Some(self.media_type.clone()),
            size: self.bytes.len() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, content_type: Option<&str>, size: u64) -> AudioCandidate {
        AudioCandidate {
            name: name.to_string(),
            content_type: content_type.map(str::to_string),
            size,
        }
    }

    #[test]
    fn accepts_allowed_types_within_limit() {
        let config = AppConfig::default();
        assert_eq!(
            candidate("a.mp3", Some("audio/mpeg"), 1024).check(&config),
            Ok("audio/mpeg".to_string())
        );
        assert_eq!(
            candidate("a.wav", Some("audio/wav"), 10 * 1024 * 1024).check(&config),
            Ok("audio/wav".to_string())
        );
    }

    #[test]
    fn rejects_other_media_types() {
        let config = AppConfig::default();
        let rejection = candidate("cover.png", Some("image/png"), 10).check(&config);
        assert_eq!(
            rejection,
            Err(AudioRejection::UnsupportedType("image/png".into()))
        );
        assert_eq!(
            rejection.unwrap_err().to_string(),
            "Invalid file type"
        );
    }

    #[test]
    fn rejects_files_over_ten_mebibytes() {
        let config = AppConfig::default();
        let size = 15 * 1024 * 1024;
        let rejection = candidate("big.mp3", Some("audio/mpeg"), size).check(&config);
        assert_eq!(rejection, Err(AudioRejection::TooLarge { size }));
        assert_eq!(rejection.unwrap_err().to_string(), "File too large");
    }

    #[test]
    fn infers_type_from_extension_when_missing() {
        let config = AppConfig::default();
        assert_eq!(
            candidate("Take.MP3", None, 5).check(&config),
            Ok("audio/mpeg".to_string())
        );
        assert!(matches!(
            candidate("notes.txt", Some(""), 5).check(&config),
            Err(AudioRejection::UnsupportedType(_))
        ));
    }

    #[test]
    fn rejects_empty_files() {
        let config = AppConfig::default();
        assert_eq!(
            candidate("silence.wav", Some("audio/wav"), 0).check(&config),
            Err(AudioRejection::Empty)
        );
    }
}
