//! Photo upload steps — profile photo, pose verification, ID document.
//!
//! Each flow keeps the selected photo in memory so a failed upload
//! leaves it intact and the screen is immediately re-enterable. The two
//! verification endpoints gate navigation on the server's `pending`
//! review status, not on plain HTTP success.

use std::sync::Arc;

use crate::api::{ApiClient, ProfilePhotoReceipt, VerificationReceipt};
use crate::device::{CapturedPhoto, Permission, PhotoSource};
use crate::flows::Outcome;
use crate::store::SessionStore;

/// Multipart field name for profile and pose photos.
pub const PHOTO_FIELD: &str = "photo";
/// Multipart field name for the ID document.
pub const ID_DOCUMENT_FIELD: &str = "id_document";

const PROFILE_PHOTO_NAME: &str = "profile_photo.jpg";
const POSE_PHOTO_NAME: &str = "verification_photo.jpg";
const ID_DOCUMENT_NAME: &str = "id_document.jpg";

const UPLOAD_FALLBACK: &str = "Upload failed";

/// Result of a photo-selection interaction. None of these are fatal; the
/// screen stays where it is and keeps whatever photo it already had.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoSelection {
    /// A new photo is now held by the flow.
    Selected,
    /// The user backed out of the picker.
    Cancelled,
    /// The user declined the camera/library permission prompt.
    PermissionDenied,
    /// The device failed to produce a photo.
    Failed(String),
}

async fn select(
    source: &dyn PhotoSource,
    use_camera: bool,
    file_name: &str,
) -> (PhotoSelection, Option<CapturedPhoto>) {
    let permission = if use_camera {
        source.request_camera_permission().await
    } else {
        source.request_library_permission().await
    };
    if permission == Permission::Denied {
        return (PhotoSelection::PermissionDenied, None);
    }

    let shot = if use_camera {
        source.take_photo().await
    } else {
        source.pick_photo().await
    };
    match shot {
        Ok(Some(mut photo)) => {
            // The endpoint dictates the transmitted file name.
            photo.file_name = file_name.to_string();
            (PhotoSelection::Selected, Some(photo))
        }
        Ok(None) => (PhotoSelection::Cancelled, None),
        Err(e) => (PhotoSelection::Failed(e.to_string()), None),
    }
}

fn pending_gate(receipt: VerificationReceipt) -> Outcome<VerificationReceipt> {
    if receipt.status.is_pending() {
        Outcome::Proceed(receipt)
    } else {
        Outcome::Retry(
            receipt
                .message
                .clone()
                .unwrap_or_else(|| UPLOAD_FALLBACK.to_string()),
        )
    }
}

/// Controller for the profile-photo step.
pub struct ProfilePhotoFlow {
    api: Arc<ApiClient>,
    store: Arc<dyn SessionStore>,
    photo: Option<CapturedPhoto>,
}

impl ProfilePhotoFlow {
    pub fn new(api: Arc<ApiClient>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            store,
            photo: None,
        }
    }

    pub async fn take_photo(&mut self, source: &dyn PhotoSource) -> PhotoSelection {
        let (selection, photo) = select(source, true, PROFILE_PHOTO_NAME).await;
        if let Some(photo) = photo {
            self.photo = Some(photo);
        }
        selection
    }

    pub async fn pick_from_library(&mut self, source: &dyn PhotoSource) -> PhotoSelection {
        let (selection, photo) = select(source, false, PROFILE_PHOTO_NAME).await;
        if let Some(photo) = photo {
            self.photo = Some(photo);
        }
        selection
    }

    pub fn photo(&self) -> Option<&CapturedPhoto> {
        self.photo.as_ref()
    }

    /// Upload the held photo to `/users/upload-photo`.
    pub async fn upload(&self) -> Outcome<ProfilePhotoReceipt> {
        let Some(photo) = self.photo.as_ref() else {
            return Outcome::retry("Please select or take a photo first.");
        };
        let Some(token) = self.store.token().await else {
            return Outcome::Redirect;
        };

        match self
            .api
            .post_file::<ProfilePhotoReceipt>("/users/upload-photo", PHOTO_FIELD, photo, Some(&token))
            .await
        {
            Ok(receipt) => Outcome::Proceed(receipt),
            Err(e) => Outcome::Retry(e.to_string()),
        }
    }
}

/// Controller for the selfie-pose verification step. Camera only.
pub struct PoseVerificationFlow {
    api: Arc<ApiClient>,
    store: Arc<dyn SessionStore>,
    photo: Option<CapturedPhoto>,
}

impl PoseVerificationFlow {
    pub fn new(api: Arc<ApiClient>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            store,
            photo: None,
        }
    }

    pub async fn take_photo(&mut self, source: &dyn PhotoSource) -> PhotoSelection {
        let (selection, photo) = select(source, true, POSE_PHOTO_NAME).await;
        if let Some(photo) = photo {
            self.photo = Some(photo);
        }
        selection
    }

    pub fn photo(&self) -> Option<&CapturedPhoto> {
        self.photo.as_ref()
    }

    /// Upload the held selfie to `/auth/verify-photo`. Advances only on a
    /// `pending` review status.
    pub async fn upload(&self) -> Outcome<VerificationReceipt> {
        let Some(photo) = self.photo.as_ref() else {
            return Outcome::retry("Please take your verification photo first.");
        };
        let Some(token) = self.store.token().await else {
            return Outcome::Redirect;
        };

        match self
            .api
            .post_file::<VerificationReceipt>("/auth/verify-photo", PHOTO_FIELD, photo, Some(&token))
            .await
        {
            Ok(receipt) => pending_gate(receipt),
            Err(e) => Outcome::Retry(e.to_string()),
        }
    }

    /// Skip verification for now. No network call.
    pub fn skip(&self) -> Outcome<()> {
        Outcome::Proceed(())
    }
}

/// Controller for the ID-document (age verification) step.
pub struct AgeVerificationFlow {
    api: Arc<ApiClient>,
    store: Arc<dyn SessionStore>,
    photo: Option<CapturedPhoto>,
}

impl AgeVerificationFlow {
    pub fn new(api: Arc<ApiClient>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            store,
            photo: None,
        }
    }

    pub async fn take_photo(&mut self, source: &dyn PhotoSource) -> PhotoSelection {
        let (selection, photo) = select(source, true, ID_DOCUMENT_NAME).await;
        if let Some(photo) = photo {
            self.photo = Some(photo);
        }
        selection
    }

    pub async fn pick_from_library(&mut self, source: &dyn PhotoSource) -> PhotoSelection {
        let (selection, photo) = select(source, false, ID_DOCUMENT_NAME).await;
        if let Some(photo) = photo {
            self.photo = Some(photo);
        }
        selection
    }

    pub fn photo(&self) -> Option<&CapturedPhoto> {
        self.photo.as_ref()
    }

    /// Upload the held ID document to `/auth/verify-age`. Advances only
    /// on a `pending` review status.
    pub async fn upload(&self) -> Outcome<VerificationReceipt> {
        let Some(photo) = self.photo.as_ref() else {
            return Outcome::retry("Please upload a valid ID document to continue.");
        };
        let Some(token) = self.store.token().await else {
            return Outcome::Redirect;
        };

        match self
            .api
            .post_file::<VerificationReceipt>(
                "/auth/verify-age",
                ID_DOCUMENT_FIELD,
                photo,
                Some(&token),
            )
            .await
        {
            Ok(receipt) => pending_gate(receipt),
            Err(e) => Outcome::Retry(e.to_string()),
        }
    }
}
