use crate::api::error::ApiError;
use crate::api::models::*;
use crate::api::upload::AudioUpload;
use crate::diagnostics::log_perf;
use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// Remote track/genre service. Implementations perform no retries.
#[async_trait(?Send)]
pub trait TrackApi {
    async fn list_tracks(&self, query: &TrackQuery) -> Result<TrackPage, ApiError>;
    async fn create_track(&self, input: &TrackInput) -> Result<Track, ApiError>;
    async fn update_track(&self, id: &str, input: &TrackInput) -> Result<Track, ApiError>;
    async fn delete_track(&self, id: &str) -> Result<(), ApiError>;
    async fn upload_audio(&self, id: &str, upload: AudioUpload) -> Result<Track, ApiError>;
    async fn delete_audio(&self, id: &str) -> Result<Track, ApiError>;
    async fn list_genres(&self) -> Result<Vec<String>, ApiError>;

    /// Same request as an upload; the server substitutes the existing asset.
    async fn replace_audio(&self, id: &str, upload: AudioUpload) -> Result<Track, ApiError> {
        self.upload_audio(id, upload).await
    }
}

pub struct TracksClient {
    base_url: String,
}

impl TracksClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn track_url(&self, id: &str, suffix: &str) -> String {
        let mut url = self.url(&format!("tracks/{}", urlencoding::encode(id)));
        if !suffix.is_empty() {
            url.push('/');
            url.push_str(suffix);
        }
        url
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::from_status(status.as_u16(), &body))
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let response = ensure_success(response).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait(?Send)]
impl TrackApi for TracksClient {
    async fn list_tracks(&self, query: &TrackQuery) -> Result<TrackPage, ApiError> {
        let started_at = Utc::now();
        let pairs = query.query_pairs();
        let response = HTTP_CLIENT
            .get(self.url("tracks"))
            .query(&pairs)
            .send()
            .await?;
        let page: TrackPage = read_json(response).await?;
        log_perf(
            "list_tracks",
            started_at,
            &format!("{pairs:?} -> {} tracks", page.data.len()),
        );
        Ok(page)
    }

    async fn create_track(&self, input: &TrackInput) -> Result<Track, ApiError> {
        let started_at = Utc::now();
        let response = HTTP_CLIENT
            .post(self.url("tracks"))
            .json(input)
            .send()
            .await?;
        let track: Track = read_json(response).await?;
        log_perf("create_track", started_at, &track.id);
        Ok(track)
    }

    async fn update_track(&self, id: &str, input: &TrackInput) -> Result<Track, ApiError> {
        let started_at = Utc::now();
        let response = HTTP_CLIENT
            .put(self.track_url(id, ""))
            .json(input)
            .send()
            .await?;
        let track = read_json(response).await?;
        log_perf("update_track", started_at, id);
        Ok(track)
    }

    async fn delete_track(&self, id: &str) -> Result<(), ApiError> {
        let started_at = Utc::now();
        let response = HTTP_CLIENT.delete(self.track_url(id, "")).send().await?;
        ensure_success(response).await?;
        log_perf("delete_track", started_at, id);
        Ok(())
    }

    async fn upload_audio(&self, id: &str, upload: AudioUpload) -> Result<Track, ApiError> {
        let started_at = Utc::now();
        let size = upload.bytes.len();
        let part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.media_type)?;
        let form = reqwest::multipart::Form::new().part("audioFile", part);
        let response = HTTP_CLIENT
            .post(self.track_url(id, "upload"))
            .multipart(form)
            .send()
            .await?;
        let track = read_json(response).await?;
        log_perf("upload_audio", started_at, &format!("{id} ({size} bytes)"));
        Ok(track)
    }

    async fn delete_audio(&self, id: &str) -> Result<Track, ApiError> {
        let started_at = Utc::now();
        let response = HTTP_CLIENT
            .delete(self.track_url(id, "file"))
            .send()
            .await?;
        let track = read_json(response).await?;
        log_perf("delete_audio", started_at, id);
        Ok(track)
    }

    async fn list_genres(&self) -> Result<Vec<String>, ApiError> {
        let started_at = Utc::now();
        let response = HTTP_CLIENT.get(self.url("genres")).send().await?;
        let genres: Vec<String> = read_json(response).await?;
        log_perf("list_genres", started_at, &format!("{} genres", genres.len()));
        Ok(genres)
    }
}
