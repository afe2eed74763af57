//! Common interface for creating and binding shareable images.

use std::ffi::c_void;
use std::ptr::NonNull;
use std::sync::Arc;

use gl::types::GLuint;
use thiserror::Error;

use crate::ImageAttributes;

/// A GL texture name in the calling thread's current context.
pub type TextureId = GLuint;

/// An `EGLImageKHR` created from a texture.
///
/// The value is an opaque driver handle; the image itself stays owned by the
/// EGL implementation. Never null (`EGL_NO_IMAGE_KHR` is mapped to `None` on
/// construction).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct NativeImage(NonNull<c_void>);

// SAFETY: EGL images are explicitly designed to be shared between contexts on
// different threads. The wrapper only carries the handle value and never
// dereferences it.
unsafe impl Send for NativeImage {}
unsafe impl Sync for NativeImage {}

impl NativeImage {
    /// Wrap a raw `EGLImageKHR`. Returns `None` for `EGL_NO_IMAGE_KHR`.
    pub fn from_raw(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    /// Wrap a handle value given as an address.
    pub fn from_addr(addr: usize) -> Option<Self> {
        Self::from_raw(addr as *mut c_void)
    }

    pub fn as_ptr(self) -> *mut c_void {
        self.0.as_ptr()
    }

    pub fn addr(self) -> usize {
        self.0.as_ptr() as usize
    }
}

/// Failure reported by the native graphics subsystem.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("no EGL display is current on this thread")]
    NoCurrentDisplay,

    #[error("no EGL context is current on this thread")]
    NoCurrentContext,

    #[error("{call} failed with EGL error {code:#06x}")]
    Egl { call: &'static str, code: u32 },

    #[error("{call} failed with GL error {code:#06x}")]
    Gl { call: &'static str, code: u32 },

    #[error("entry point {0} is not available")]
    MissingEntryPoint(&'static str),
}

/// Native operations the image registry is built on.
///
/// Every method acts on whatever display/context is current on the calling
/// thread. Callers must make the right context current beforehand; an
/// implementation cannot check that it is the *intended* one.
pub trait ImageApi: Send + Sync {
    /// Create a shareable image backed by level `attributes.level` of the 2D
    /// texture `texture`.
    fn create_image_from_texture(
        &self,
        texture: TextureId,
        attributes: &ImageAttributes,
    ) -> Result<NativeImage, ApiError>;

    /// Make `image` the storage of the texture currently bound to
    /// `GL_TEXTURE_2D`.
    fn target_texture_2d(&self, image: NativeImage) -> Result<(), ApiError>;

    /// Release an image. Only used for images that never got a handle.
    fn destroy_image(&self, image: NativeImage) -> Result<(), ApiError>;
}

impl<T: ImageApi + ?Sized> ImageApi for Box<T> {
    fn create_image_from_texture(
        &self,
        texture: TextureId,
        attributes: &ImageAttributes,
    ) -> Result<NativeImage, ApiError> {
        (**self).create_image_from_texture(texture, attributes)
    }

    fn target_texture_2d(&self, image: NativeImage) -> Result<(), ApiError> {
        (**self).target_texture_2d(image)
    }

    fn destroy_image(&self, image: NativeImage) -> Result<(), ApiError> {
        (**self).destroy_image(image)
    }
}

impl<T: ImageApi + ?Sized> ImageApi for Arc<T> {
    fn create_image_from_texture(
        &self,
        texture: TextureId,
        attributes: &ImageAttributes,
    ) -> Result<NativeImage, ApiError> {
        (**self).create_image_from_texture(texture, attributes)
    }

    fn target_texture_2d(&self, image: NativeImage) -> Result<(), ApiError> {
        (**self).target_texture_2d(image)
    }

    fn destroy_image(&self, image: NativeImage) -> Result<(), ApiError> {
        (**self).destroy_image(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_image_is_rejected() {
        assert!(NativeImage::from_raw(std::ptr::null_mut()).is_none());
        assert!(NativeImage::from_addr(0).is_none());
    }

    #[test]
    fn image_keeps_its_address() {
        let image = NativeImage::from_addr(0x1234).unwrap();
        assert_eq!(image.addr(), 0x1234);
        assert_eq!(image.as_ptr() as usize, 0x1234);
    }

    #[test]
    fn error_codes_are_hex_formatted() {
        let err = ApiError::Egl {
            call: "eglCreateImageKHR",
            code: 0x300C,
        };
        assert_eq!(err.to_string(), "eglCreateImageKHR failed with EGL error 0x300c");
    }
}
