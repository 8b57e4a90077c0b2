//! Counsellor directory — recommended listing with an unfiltered
//! fallback.

use std::sync::Arc;

use crate::api::{ApiClient, Counsellor};
use crate::flows::Outcome;
use crate::store::SessionStore;

/// Ordered data sources, attempted until one succeeds. The unfiltered
/// listing is only reached when the recommended source fails.
const SOURCES: [&str; 2] = ["/counsellors/recommended", "/counsellors"];

/// Message shown when every source has failed.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load counsellors. Please try again.";

/// Controller for the counsellor-browsing step.
pub struct CounsellorsFlow {
    api: Arc<ApiClient>,
    store: Arc<dyn SessionStore>,
}

impl CounsellorsFlow {
    pub fn new(api: Arc<ApiClient>, store: Arc<dyn SessionStore>) -> Self {
        Self { api, store }
    }

    /// Fetch the counsellor list, degrading from recommended to
    /// unfiltered. One request on success; the fallback fires only after
    /// a failure.
    pub async fn fetch(&self) -> Outcome<Vec<Counsellor>> {
        let Some(token) = self.store.token().await else {
            return Outcome::Redirect;
        };

        for (index, path) in SOURCES.iter().enumerate() {
            match self
                .api
                .get_json::<Vec<Counsellor>>(path, Some(&token))
                .await
            {
                Ok(counsellors) => return Outcome::Proceed(counsellors),
                Err(e) if index + 1 < SOURCES.len() => {
                    tracing::warn!("Counsellor source {path} failed, falling back: {e}");
                }
                Err(e) => {
                    tracing::warn!("Counsellor source {path} failed: {e}");
                }
            }
        }
        Outcome::retry(LOAD_FAILED_MESSAGE)
    }

    /// Fetch a single counsellor's profile.
    pub async fn get(&self, id: u64) -> Outcome<Counsellor> {
        let Some(token) = self.store.token().await else {
            return Outcome::Redirect;
        };
        match self
            .api
            .get_json::<Counsellor>(&format!("/counsellors/{id}"), Some(&token))
            .await
        {
            Ok(counsellor) => Outcome::Proceed(counsellor),
            Err(e) => Outcome::Retry(e.to_string()),
        }
    }
}
