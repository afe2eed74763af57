//! Error types for the image registry and uploader.

use thiserror::Error;

use crate::{ApiError, ImageHandle, TextureId};

/// Errors returned by [`ImageRegistry`](crate::ImageRegistry) operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The graphics API rejected the create-image request. Nothing was
    /// registered.
    #[error("failed to create an image from texture {texture}")]
    ImageCreationFailed {
        texture: TextureId,
        #[source]
        source: ApiError,
    },

    /// The handle was never issued by this registry.
    #[error("image handle {0} is not registered")]
    HandleNotFound(ImageHandle),

    /// The image was found but could not be bound to the current texture.
    #[error("failed to bind image {handle} to the current texture")]
    BindFailed {
        handle: ImageHandle,
        #[source]
        source: ApiError,
    },

    /// Every representable handle has been issued.
    #[error("image handle space exhausted")]
    HandlesExhausted,
}

/// Errors returned by [`AsyncTextureUploader`](crate::AsyncTextureUploader)
/// jobs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A GL call on the upload thread failed.
    #[error("upload context error")]
    Context(#[source] ApiError),

    /// The upload thread exited before answering.
    #[error("upload worker is gone")]
    WorkerGone,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn creation_failure_keeps_api_error_as_source() {
        let err = RegistryError::ImageCreationFailed {
            texture: 7,
            source: ApiError::NoCurrentContext,
        };
        assert_eq!(err.to_string(), "failed to create an image from texture 7");
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), ApiError::NoCurrentContext.to_string());
    }

    #[test]
    fn registry_errors_pass_through_upload_errors() {
        let err = UploadError::from(RegistryError::HandleNotFound(ImageHandle::from_raw(5)));
        assert_eq!(err.to_string(), "image handle #5 is not registered");
    }
}
