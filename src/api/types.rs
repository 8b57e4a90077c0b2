//! Wire types for the LAMPY REST API.
//!
//! These are projections of server-owned records; unknown fields are
//! ignored and most fields default so older servers stay readable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response to `/auth/register` and `/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// The authenticated user's profile record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub photo_verified: bool,
    #[serde(default)]
    pub age_verified: bool,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub profile_photo_url: String,
    #[serde(default)]
    pub consultation_preferences: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A counsellor as listed by `/counsellors` and `/counsellors/recommended`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Counsellor {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub qualification: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub total_ratings: u32,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default = "default_true")]
    pub available: bool,
}

fn default_true() -> bool {
    true
}

/// Review state of an uploaded verification document or photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
    #[serde(other)]
    Unknown,
}

impl ReviewStatus {
    /// Whether the upload is queued for review. This, not plain HTTP
    /// success, is the advance signal for verification uploads.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Response to the two verification uploads.
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationReceipt {
    #[serde(default)]
    pub message: Option<String>,
    pub status: ReviewStatus,
}

/// Response to `/users/upload-photo`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfilePhotoReceipt {
    #[serde(default)]
    pub upload_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Payload for `/sessions/book`. `session_date` serializes as an
/// ISO-8601 UTC timestamp, which is what the backend parses.
#[derive(Debug, Clone, Serialize)]
pub struct BookingRequest {
    pub counsellor_id: u64,
    pub session_date: DateTime<Utc>,
    pub duration: u32,
    pub notes: String,
}

/// A booked session as returned by the session endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct BookedSession {
    pub id: u64,
    #[serde(default)]
    pub counsellor_id: u64,
    pub session_date: DateTime<Utc>,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub notes: String,
}
