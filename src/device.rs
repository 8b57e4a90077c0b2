//! Device capability seams.
//!
//! The flows never talk to platform APIs directly. Location and photo
//! acquisition sit behind async traits so the same controllers run
//! against a phone binding, the console front-end, or a test fake.

use async_trait::async_trait;

use crate::error::DeviceError;

/// Outcome of a permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

impl Permission {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// A geographic position fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A reverse-geocoded address. Every component is optional; providers
/// fill in whatever the geocoder knows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub city: Option<String>,
    pub subregion: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

/// Source of position fixes and reverse geocoding.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Prompt for (or look up) foreground location permission.
    async fn request_permission(&self) -> Permission;

    /// Acquire a current position fix.
    async fn current_position(&self) -> Result<Coordinates, DeviceError>;

    /// Reverse-geocode a fix. `Ok(None)` means the geocoder had no result
    /// for the position, which is not an error.
    async fn reverse_geocode(&self, position: Coordinates)
    -> Result<Option<Address>, DeviceError>;
}

/// A photo acquired from the camera or the gallery, held in memory until
/// it is uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPhoto {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

impl CapturedPhoto {
    pub fn new(bytes: Vec<u8>, file_name: impl Into<String>) -> Self {
        Self {
            bytes,
            file_name: file_name.into(),
        }
    }
}

/// Source of photos: device camera and media library.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    /// Prompt for (or look up) camera permission.
    async fn request_camera_permission(&self) -> Permission;

    /// Prompt for (or look up) media-library permission.
    async fn request_library_permission(&self) -> Permission;

    /// Open the camera. `Ok(None)` means the user cancelled.
    async fn take_photo(&self) -> Result<Option<CapturedPhoto>, DeviceError>;

    /// Open the media library picker. `Ok(None)` means the user cancelled.
    async fn pick_photo(&self) -> Result<Option<CapturedPhoto>, DeviceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_granted_check() {
        assert!(Permission::Granted.is_granted());
        assert!(!Permission::Denied.is_granted());
    }

    #[test]
    fn captured_photo_keeps_bytes_and_name() {
        let photo = CapturedPhoto::new(vec![0xFF, 0xD8, 0xFF], "selfie.jpg");
        assert_eq!(photo.bytes.len(), 3);
        assert_eq!(photo.file_name, "selfie.jpg");
    }
}
