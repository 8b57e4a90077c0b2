//! HTTP client shim — JSON and multipart requests with bearer auth.
//!
//! Every non-2xx response becomes an [`ApiError::Status`] whose message
//! is the server's `error` field when present, else a generic fallback.
//! Transport failures and undecodable bodies use the same error type so
//! calling flows need one catch path.

use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::device::CapturedPhoto;
use crate::error::ApiError;

/// Content type attached to every uploaded photo part.
pub const JPEG_MIME: &str = "image/jpeg";

/// Fallback message for failed JSON requests with no server error field.
const REQUEST_FAILED: &str = "Request failed";
/// Fallback message for failed uploads with no server error field.
const UPLOAD_FAILED: &str = "Upload failed";

/// Typed HTTP client for the LAMPY REST API.
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON resource.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let mut request = self.client.get(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        decode(response, REQUEST_FAILED).await
    }

    /// POST a JSON payload.
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        decode(response, REQUEST_FAILED).await
    }

    /// PUT a JSON payload (session cancellation is the one caller).
    pub async fn put_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let mut request = self.client.put(self.url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        decode(response, REQUEST_FAILED).await
    }

    /// POST a photo as a multipart form with a single file part named
    /// `field`, carrying a fixed JPEG content type.
    pub async fn post_file<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &str,
        photo: &CapturedPhoto,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let part = Part::bytes(photo.bytes.clone())
            .file_name(photo.file_name.clone())
            .mime_str(JPEG_MIME)
            .expect("static mime type is valid");
        let form = Form::new().part(field.to_string(), part);

        let mut request = self.client.post(self.url(path)).multipart(form);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        decode(response, UPLOAD_FAILED).await
    }
}

/// Turn a response into a typed value or an [`ApiError`].
async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
    fallback: &str,
) -> Result<T, ApiError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    if !status.is_success() {
        return Err(ApiError::Status {
            status,
            message: extract_error_message(&body, fallback),
        });
    }

    serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

/// Pull the server's `error` field out of a failure body.
fn extract_error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(serde_json::Value::as_str)
                .map(String::from)
        })
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(base: &str) -> ApiClient {
        let config = ClientConfig {
            base_url: base.to_string(),
            ..ClientConfig::default()
        };
        ApiClient::new(&config)
    }

    #[test]
    fn url_joins_base_and_path() {
        let client = client_for("http://api.test/api/v1");
        assert_eq!(client.url("/auth/register"), "http://api.test/api/v1/auth/register");
    }

    #[test]
    fn url_tolerates_trailing_slash_in_base() {
        let client = client_for("http://api.test/api/v1/");
        assert_eq!(client.url("/counsellors"), "http://api.test/api/v1/counsellors");
    }

    #[test]
    fn extract_error_message_prefers_server_field() {
        let message = extract_error_message(r#"{"error":"User already exists"}"#, REQUEST_FAILED);
        assert_eq!(message, "User already exists");
    }

    #[test]
    fn extract_error_message_falls_back_on_missing_field() {
        assert_eq!(
            extract_error_message(r#"{"detail":"nope"}"#, REQUEST_FAILED),
            "Request failed"
        );
    }

    #[test]
    fn extract_error_message_falls_back_on_non_json() {
        assert_eq!(
            extract_error_message("<html>502</html>", UPLOAD_FAILED),
            "Upload failed"
        );
    }

    #[test]
    fn status_error_displays_message_only() {
        let err = ApiError::Status {
            status: reqwest::StatusCode::CONFLICT,
            message: "User already exists".into(),
        };
        assert_eq!(err.to_string(), "User already exists");
    }

    #[tokio::test]
    async fn transport_failure_is_one_catch_path() {
        // Discard-port base: the connection is refused before any HTTP.
        let client = client_for("http://127.0.0.1:9/api/v1");
        let result: Result<serde_json::Value, ApiError> =
            client.get_json("/counsellors", Some("tok")).await;
        assert!(matches!(result, Err(ApiError::Transport(_))));
    }

    #[tokio::test]
    async fn upload_transport_failure_keeps_photo_usable() {
        let client = client_for("http://127.0.0.1:9/api/v1");
        let photo = CapturedPhoto::new(vec![0xFF, 0xD8], "profile_photo.jpg");
        let result: Result<serde_json::Value, ApiError> = client
            .post_file("/users/upload-photo", "photo", &photo, Some("tok"))
            .await;
        assert!(result.is_err());
        // The caller still owns the photo bytes after a failed upload.
        assert_eq!(photo.bytes, vec![0xFF, 0xD8]);
    }
}
