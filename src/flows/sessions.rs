//! Session booking and management.

use std::sync::Arc;

use chrono::{DateTime, Days, Local, NaiveTime, TimeZone, Utc};

use crate::api::{ApiClient, BookedSession, BookingRequest};
use crate::flows::Outcome;
use crate::store::SessionStore;

/// Fixed duration of a booked session, in minutes.
pub const DEFAULT_DURATION_MIN: u32 = 60;

/// Fixed note attached to every booking made from the listing screen.
pub const BOOKING_NOTES: &str = "Initial consultation session";

/// The placeholder scheduling policy: tomorrow at 10:00 local time,
/// expressed as a UTC instant for the wire.
pub fn next_morning_slot(now: DateTime<Local>) -> DateTime<Utc> {
    let date = now.date_naive() + Days::new(1);
    let time = NaiveTime::from_hms_opt(10, 0, 0).expect("valid wall-clock time");
    let naive = date.and_time(time);
    match now.timezone().from_local_datetime(&naive).earliest() {
        Some(local) => local.with_timezone(&Utc),
        // 10:00 fell into a DST gap; take the naive reading as UTC.
        None => naive.and_utc(),
    }
}

/// Controller for booking and managing counselling sessions.
pub struct SessionsFlow {
    api: Arc<ApiClient>,
    store: Arc<dyn SessionStore>,
}

impl SessionsFlow {
    pub fn new(api: Arc<ApiClient>, store: Arc<dyn SessionStore>) -> Self {
        Self { api, store }
    }

    /// Book a session with a counsellor at the placeholder slot.
    pub async fn book(&self, counsellor_id: u64) -> Outcome<BookedSession> {
        let Some(token) = self.store.token().await else {
            return Outcome::Redirect;
        };

        let request = BookingRequest {
            counsellor_id,
            session_date: next_morning_slot(Local::now()),
            duration: DEFAULT_DURATION_MIN,
            notes: BOOKING_NOTES.to_string(),
        };
        match self
            .api
            .post_json::<BookedSession>("/sessions/book", &request, Some(&token))
            .await
        {
            Ok(session) => {
                tracing::info!(session_id = session.id, counsellor_id, "Session booked");
                Outcome::Proceed(session)
            }
            Err(e) => Outcome::Retry(e.to_string()),
        }
    }

    /// List the user's booked sessions.
    pub async fn list(&self) -> Outcome<Vec<BookedSession>> {
        let Some(token) = self.store.token().await else {
            return Outcome::Redirect;
        };
        match self
            .api
            .get_json::<Vec<BookedSession>>("/sessions", Some(&token))
            .await
        {
            Ok(sessions) => Outcome::Proceed(sessions),
            Err(e) => Outcome::Retry(e.to_string()),
        }
    }

    /// Cancel a booked session.
    pub async fn cancel(&self, session_id: u64) -> Outcome<()> {
        let Some(token) = self.store.token().await else {
            return Outcome::Redirect;
        };
        let body = serde_json::json!({});
        match self
            .api
            .put_json::<serde_json::Value>(
                &format!("/sessions/{session_id}/cancel"),
                &body,
                Some(&token),
            )
            .await
        {
            Ok(_) => Outcome::Proceed(()),
            Err(e) => Outcome::Retry(e.to_string()),
        }
    }
}
