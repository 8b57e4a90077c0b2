//! Preference selection — the consultation-topic picker.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::flows::Outcome;
use crate::store::SessionStore;

/// The fixed topic list the user picks from.
pub const CONSULTATION_TOPICS: [&str; 7] = [
    "Stress Management",
    "Mental Health Concerns",
    "Career Guidance",
    "Relationship Issues",
    "Personal Growth",
    "Grief or Loss",
    "Decision-Making Support",
];

/// Maximum number of topics a user may select.
pub const MAX_SELECTIONS: usize = 3;

/// Submitted as the sole preference when the user skips the step.
pub const SKIP_SENTINEL: &str = "General Consultation";

/// Result of toggling a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
    /// Already at the selection limit; the set was not changed.
    LimitReached,
}

/// The user's in-progress topic selection. Order of selection is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceSelection {
    selected: Vec<String>,
}

impl PreferenceSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle a topic: selected topics are removed, unselected ones are
    /// added unless the limit is reached.
    pub fn toggle(&mut self, topic: &str) -> Toggle {
        if let Some(pos) = self.selected.iter().position(|t| t == topic) {
            self.selected.remove(pos);
            Toggle::Removed
        } else if self.selected.len() < MAX_SELECTIONS {
            self.selected.push(topic.to_string());
            Toggle::Added
        } else {
            Toggle::LimitReached
        }
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.selected.iter().any(|t| t == topic)
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Controller for the preference-selection step.
pub struct PreferencesFlow {
    api: Arc<ApiClient>,
    store: Arc<dyn SessionStore>,
}

impl PreferencesFlow {
    pub fn new(api: Arc<ApiClient>, store: Arc<dyn SessionStore>) -> Self {
        Self { api, store }
    }

    /// Submit the selected topics.
    pub async fn submit(&self, selection: &PreferenceSelection) -> Outcome<()> {
        if selection.is_empty() {
            return Outcome::retry(
                "Please select at least one area you'd like to discuss with a counselor.",
            );
        }
        let Some(token) = self.store.token().await else {
            return Outcome::Redirect;
        };

        let body = serde_json::json!({ "preferences": selection.selected() });
        match self
            .api
            .post_json::<serde_json::Value>("/users/preferences", &body, Some(&token))
            .await
        {
            Ok(_) => Outcome::Proceed(()),
            Err(e) => Outcome::Retry(e.to_string()),
        }
    }

    /// Submit the sentinel list and advance regardless of the result, so
    /// skipping never blocks the remaining steps.
    pub async fn skip(&self) -> Outcome<()> {
        let token = self.store.token().await;
        let body = serde_json::json!({ "preferences": [SKIP_SENTINEL] });
        if let Err(e) = self
            .api
            .post_json::<serde_json::Value>("/users/preferences", &body, token.as_deref())
            .await
        {
            tracing::warn!("Preferences skip submission failed: {e}");
        }
        Outcome::Proceed(())
    }
}
