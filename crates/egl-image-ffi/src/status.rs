//! Status codes returned across the C boundary.

use egl_image_registry::RegistryError;

pub const EGL_IMAGE_SUCCESS: i32 = 0;
pub const EGL_IMAGE_CREATION_FAILED: i32 = 1;
pub const EGL_IMAGE_HANDLE_NOT_FOUND: i32 = 2;
pub const EGL_IMAGE_BIND_FAILED: i32 = 3;
pub const EGL_IMAGE_HANDLES_EXHAUSTED: i32 = 4;
pub const EGL_IMAGE_INVALID_ARGUMENT: i32 = 5;

/// Map a registry failure to its status code.
pub fn status_of(err: &RegistryError) -> i32 {
    match err {
        RegistryError::ImageCreationFailed { .. } => EGL_IMAGE_CREATION_FAILED,
        RegistryError::HandleNotFound(_) => EGL_IMAGE_HANDLE_NOT_FOUND,
        RegistryError::BindFailed { .. } => EGL_IMAGE_BIND_FAILED,
        RegistryError::HandlesExhausted => EGL_IMAGE_HANDLES_EXHAUSTED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egl_image_registry::{ApiError, ImageHandle};

    #[test]
    fn every_error_has_its_own_code() {
        let codes = [
            status_of(&RegistryError::ImageCreationFailed {
                texture: 1,
                source: ApiError::NoCurrentDisplay,
            }),
            status_of(&RegistryError::HandleNotFound(ImageHandle::from_raw(0))),
            status_of(&RegistryError::BindFailed {
                handle: ImageHandle::from_raw(0),
                source: ApiError::MissingEntryPoint("glEGLImageTargetTexture2DOES"),
            }),
            status_of(&RegistryError::HandlesExhausted),
        ];
        assert_eq!(codes, [1, 2, 3, 4]);
        assert!(!codes.contains(&EGL_IMAGE_SUCCESS));
    }
}
