//! Location step — detect a display string, submit it, or skip with a
//! sentinel so the rest of onboarding is never blocked.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::device::{Address, Coordinates, LocationProvider, Permission};
use crate::error::DeviceError;
use crate::flows::Outcome;
use crate::store::SessionStore;

/// Submitted in place of a real location when the user skips the step.
pub const LOCATION_SENTINEL: &str = "Location not provided";

/// What location detection produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectedLocation {
    /// A display string ready to submit.
    Detected(String),
    /// The user declined the permission prompt; offer retry or skip.
    PermissionDenied,
}

/// Controller for the location-capture step.
pub struct LocationFlow {
    api: Arc<ApiClient>,
    store: Arc<dyn SessionStore>,
}

impl LocationFlow {
    pub fn new(api: Arc<ApiClient>, store: Arc<dyn SessionStore>) -> Self {
        Self { api, store }
    }

    /// Permission prompt → position fix → reverse geocode.
    ///
    /// Geocoding failure (or an empty geocoder result) falls back to the
    /// fixed-precision coordinate string; only a failed position fix is a
    /// hard error.
    pub async fn detect(
        &self,
        provider: &dyn LocationProvider,
    ) -> Result<DetectedLocation, DeviceError> {
        if provider.request_permission().await == Permission::Denied {
            return Ok(DetectedLocation::PermissionDenied);
        }

        let position = provider.current_position().await?;
        let address = match provider.reverse_geocode(position).await {
            Ok(address) => address,
            Err(e) => {
                tracing::warn!("Reverse geocoding failed: {e}");
                None
            }
        };

        let display = address
            .as_ref()
            .and_then(format_address)
            .unwrap_or_else(|| format_coordinates(&position));
        Ok(DetectedLocation::Detected(display))
    }

    /// Submit a location string to the server.
    pub async fn submit(&self, location: &str) -> Outcome<()> {
        if location.trim().is_empty() {
            return Outcome::retry(
                "Please allow location access or wait for location detection to complete.",
            );
        }
        let Some(token) = self.store.token().await else {
            return Outcome::Redirect;
        };

        let body = serde_json::json!({ "location": location });
        match self
            .api
            .post_json::<serde_json::Value>("/users/location", &body, Some(&token))
            .await
        {
            Ok(_) => Outcome::Proceed(()),
            Err(e) => Outcome::Retry(e.to_string()),
        }
    }

    /// Submit the sentinel and advance regardless of the result, so a
    /// declined permission never blocks the remaining steps.
    pub async fn skip(&self) -> Outcome<()> {
        let token = self.store.token().await;
        let body = serde_json::json!({ "location": LOCATION_SENTINEL });
        if let Err(e) = self
            .api
            .post_json::<serde_json::Value>("/users/location", &body, token.as_deref())
            .await
        {
            tracing::warn!("Location skip submission failed: {e}");
        }
        Outcome::Proceed(())
    }
}

/// Format a geocoded address as `"City, Region, Country"`.
///
/// The city slot falls back to the subregion. Empty leading and trailing
/// components are trimmed; an interior gap is kept as-is. Returns `None`
/// when every component is empty, so the caller can fall back to
/// coordinates.
pub fn format_address(address: &Address) -> Option<String> {
    let city = address
        .city
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(address.subregion.as_deref())
        .unwrap_or("");
    let parts = [
        city,
        address.region.as_deref().unwrap_or(""),
        address.country.as_deref().unwrap_or(""),
    ];

    let first = parts.iter().position(|p| !p.is_empty())?;
    let last = parts.iter().rposition(|p| !p.is_empty())?;
    Some(parts[first..=last].join(", "))
}

/// Fixed-precision `"lat, lon"` fallback string.
pub fn format_coordinates(position: &Coordinates) -> String {
    format!("{:.4}, {:.4}", position.latitude, position.longitude)
}
