// Concurrent per-id deletion with individual outcomes.

use crate::api::TrackApi;
use futures_util::future::join_all;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkDeleteReport {
    pub deleted: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl BulkDeleteReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_ids(&self) -> Vec<String> {
        self.failed.iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn success_message(&self) -> Option<String> {
        (!self.deleted.is_empty()).then(|| format!("{} track(s) deleted", self.deleted.len()))
    }

    pub fn failure_message(&self) -> Option<String> {
        match self.failed.as_slice() {
            [] => None,
            [(_, message)] => Some(format!("Failed to delete 1 track(s): {message}")),
            failed => Some(format!("Failed to delete {} track(s)", failed.len())),
        }
    }
}

/// Issues one delete per id at once and waits for all of them to settle.
pub async fn delete_many(api: &dyn TrackApi, ids: &[String]) -> BulkDeleteReport {
    let outcomes = join_all(ids.iter().map(|id| async move {
        let result = api.delete_track(id).await;
        (id.clone(), result)
    }))
    .await;

    let mut report = BulkDeleteReport::default();
    for (id, result) in outcomes {
        match result {
            Ok(()) => report.deleted.push(id),
            Err(err) => {
                tracing::warn!("bulk delete of {id} failed: {err}");
                report
                    .failed
                    .push((id, err.user_message("Failed to delete track")));
            }
        }
    }
    report
}
