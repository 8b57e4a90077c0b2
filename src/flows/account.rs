//! Account flows — registration, login, profile, logout.

use std::sync::Arc;

use regex::Regex;
use serde::Serialize;

use crate::api::{ApiClient, AuthResponse, UserProfile};
use crate::error::ApiError;
use crate::flows::Outcome;
use crate::store::SessionStore;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Basic `local@domain.tld` shape; anything stricter belongs to the server.
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Message shown when the server reports a duplicate account.
pub const DUPLICATE_ACCOUNT_MESSAGE: &str =
    "An account with this email already exists. Please use a different email or try logging in.";

/// Raw form state as the user typed it.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Validated, normalized registration payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterPayload {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
struct LoginPayload {
    email: String,
    password: String,
}

/// Controller for account entry: registration, login, and session exit.
pub struct AccountFlow {
    api: Arc<ApiClient>,
    store: Arc<dyn SessionStore>,
    email_re: Regex,
}

impl AccountFlow {
    pub fn new(api: Arc<ApiClient>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            store,
            email_re: Regex::new(EMAIL_PATTERN).expect("static email pattern"),
        }
    }

    /// Validate and normalize the form without touching the network.
    ///
    /// Checks run in the order the user reads the form: name, email
    /// presence, password presence, password length, email shape.
    pub fn validate(&self, form: &RegistrationForm) -> Result<RegisterPayload, String> {
        let name = form.name.trim();
        if name.is_empty() {
            return Err("Please enter your name".into());
        }
        if form.email.trim().is_empty() {
            return Err("Please enter your email".into());
        }
        if form.password.trim().is_empty() {
            return Err("Please enter a password".into());
        }
        if form.password.len() < MIN_PASSWORD_LEN {
            return Err("Password must be at least 6 characters long".into());
        }
        let email = normalize_email(&form.email);
        if !self.email_re.is_match(&email) {
            return Err("Please enter a valid email address".into());
        }
        Ok(RegisterPayload {
            name: name.to_string(),
            email,
            password: form.password.clone(),
        })
    }

    /// Create an account, persist the returned session, and proceed with
    /// the new profile.
    pub async fn register(&self, form: &RegistrationForm) -> Outcome<UserProfile> {
        let payload = match self.validate(form) {
            Ok(payload) => payload,
            Err(message) => return Outcome::Retry(message),
        };

        match self
            .api
            .post_json::<AuthResponse>("/auth/register", &payload, None)
            .await
        {
            Ok(auth) => {
                self.store.save(&auth.token, &auth.user).await;
                tracing::info!(user_id = auth.user.id, "Account created");
                Outcome::Proceed(auth.user)
            }
            Err(e) => Outcome::Retry(remap_registration_error(&e)),
        }
    }

    /// Log into an existing account and persist the returned session.
    pub async fn login(&self, email: &str, password: &str) -> Outcome<UserProfile> {
        if email.trim().is_empty() {
            return Outcome::retry("Please enter your email");
        }
        if password.trim().is_empty() {
            return Outcome::retry("Please enter your password");
        }

        let payload = LoginPayload {
            email: normalize_email(email),
            password: password.to_string(),
        };
        match self
            .api
            .post_json::<AuthResponse>("/auth/login", &payload, None)
            .await
        {
            Ok(auth) => {
                self.store.save(&auth.token, &auth.user).await;
                Outcome::Proceed(auth.user)
            }
            Err(e) => Outcome::Retry(e.to_string()),
        }
    }

    /// Fetch the authenticated user's profile.
    pub async fn profile(&self) -> Outcome<UserProfile> {
        let Some(token) = self.store.token().await else {
            return Outcome::Redirect;
        };
        match self
            .api
            .get_json::<UserProfile>("/users/profile", Some(&token))
            .await
        {
            Ok(user) => Outcome::Proceed(user),
            Err(e) => Outcome::Retry(e.to_string()),
        }
    }

    /// Drop the local session. Best-effort; never fails.
    pub async fn logout(&self) {
        self.store.clear().await;
        tracing::info!("Session cleared");
    }
}

/// Trim and lower-case an email address. Idempotent.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn remap_registration_error(err: &ApiError) -> String {
    let message = err.to_string();
    if message.contains("already exists") {
        DUPLICATE_ACCOUNT_MESSAGE.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::store::MemorySessionStore;

    /// Flow wired to a refused port: any network attempt surfaces as a
    /// transport error, so validation short-circuits are observable.
    fn offline_flow() -> AccountFlow {
        let config = ClientConfig {
            base_url: "http://127.0.0.1:9/api/v1".into(),
            ..ClientConfig::default()
        };
        AccountFlow::new(
            Arc::new(ApiClient::new(&config)),
            Arc::new(MemorySessionStore::new()),
        )
    }

    fn form(name: &str, email: &str, password: &str) -> RegistrationForm {
        RegistrationForm {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn validate_rejects_in_form_order() {
        let flow = offline_flow();
        let cases = [
            (form("", "a@b.co", "secret1"), "Please enter your name"),
            (form("Asha", "", "secret1"), "Please enter your email"),
            (form("Asha", "a@b.co", ""), "Please enter a password"),
            (
                form("Asha", "a@b.co", "short"),
                "Password must be at least 6 characters long",
            ),
            (
                form("Asha", "not-an-email", "secret1"),
                "Please enter a valid email address",
            ),
            (
                form("Asha", "missing@tld", "secret1"),
                "Please enter a valid email address",
            ),
        ];
        for (input, expected) in cases {
            assert_eq!(flow.validate(&input).unwrap_err(), expected);
        }
    }

    #[test]
    fn validate_normalizes_name_and_email() {
        let flow = offline_flow();
        let payload = flow
            .validate(&form("  Asha Rao  ", "  A@B.COM ", "secret1"))
            .unwrap();
        assert_eq!(payload.name, "Asha Rao");
        assert_eq!(payload.email, "a@b.com");
        assert_eq!(payload.password, "secret1");
    }

    #[test]
    fn email_normalization_is_idempotent() {
        let once = normalize_email("  A@B.COM ");
        assert_eq!(once, "a@b.com");
        assert_eq!(normalize_email(&once), once);
    }

    #[test]
    fn password_length_counts_raw_input() {
        let flow = offline_flow();
        // Exactly six characters passes.
        assert!(flow.validate(&form("A", "a@b.co", "sixsix")).is_ok());
        assert!(flow.validate(&form("A", "a@b.co", "five5")).is_err());
    }

    #[test]
    fn duplicate_account_remap() {
        let err = ApiError::Status {
            status: reqwest::StatusCode::CONFLICT,
            message: "User already exists".into(),
        };
        assert_eq!(remap_registration_error(&err), DUPLICATE_ACCOUNT_MESSAGE);

        let other = ApiError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            message: "Failed to create user".into(),
        };
        assert_eq!(remap_registration_error(&other), "Failed to create user");
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_network() {
        let flow = offline_flow();
        // A transport error would read "Network error: …"; the validation
        // message proves no request was issued.
        let outcome = flow.register(&form("Asha", "a@b.co", "short")).await;
        assert_eq!(
            outcome.message(),
            Some("Password must be at least 6 characters long")
        );
    }

    #[tokio::test]
    async fn login_requires_credentials_before_network() {
        let flow = offline_flow();
        let outcome = flow.login("", "secret1").await;
        assert_eq!(outcome.message(), Some("Please enter your email"));
        let outcome = flow.login("a@b.co", "  ").await;
        assert_eq!(outcome.message(), Some("Please enter your password"));
    }

    #[tokio::test]
    async fn profile_without_token_redirects() {
        let flow = offline_flow();
        assert_eq!(flow.profile().await, Outcome::Redirect);
    }
}
