//! C ABI for the image registry.
//!
//! A host runtime (e.g. a JNI shim) creates one registry with
//! [`egl_image_registry_new`], passes the pointer to every call, and frees it
//! with [`egl_image_registry_free`]. All entry points are thread-safe; the
//! ones that reach the graphics API need the right EGL context current on
//! the calling thread.
//!
//! | Entry point | Operation |
//! |---|---|
//! | [`egl_image_create_from_texture`] | `createImageFromTexture` |
//! | [`egl_image_set_target_texture`] | `setImageTargetTexture` |

pub mod status;

use std::sync::Once;

use egl_image_registry::{ImageApi, ImageHandle, ImageRegistry};
use tracing::warn;

pub use status::*;

/// Registry handed across the C boundary as an opaque pointer.
pub struct EglImageRegistry {
    inner: ImageRegistry<Box<dyn ImageApi>>,
}

impl EglImageRegistry {
    /// Wrap any backend. The result is meant for [`Box::into_raw`].
    pub fn from_api(api: Box<dyn ImageApi>) -> Self {
        Self {
            inner: ImageRegistry::new(api),
        }
    }

    pub fn registry(&self) -> &ImageRegistry<Box<dyn ImageApi>> {
        &self.inner
    }
}

/// Create a registry backed by the EGL implementation.
///
/// Returns null if the image extensions are unavailable.
#[cfg(any(target_os = "android", feature = "egl"))]
#[no_mangle]
pub extern "C" fn egl_image_registry_new() -> *mut EglImageRegistry {
    match egl_image_registry::egl::EglImageApi::new() {
        Ok(api) => Box::into_raw(Box::new(EglImageRegistry::from_api(Box::new(api)))),
        Err(err) => {
            tracing::error!("cannot create image registry: {err}");
            std::ptr::null_mut()
        }
    }
}

/// Free a registry created by this library. Null is ignored.
///
/// # Safety
///
/// `registry` must come from [`egl_image_registry_new`] (or
/// `Box::into_raw` of an [`EglImageRegistry`]) and must not be used again.
#[no_mangle]
pub unsafe extern "C" fn egl_image_registry_free(registry: *mut EglImageRegistry) {
    if !registry.is_null() {
        drop(Box::from_raw(registry));
    }
}

/// Create an image from `texture` in the current context and write its
/// handle to `out_handle`.
///
/// # Safety
///
/// `registry` must be a live registry pointer and `out_handle` must be valid
/// for a write, or either may be null.
#[no_mangle]
pub unsafe extern "C" fn egl_image_create_from_texture(
    registry: *const EglImageRegistry,
    texture: i32,
    out_handle: *mut i32,
) -> i32 {
    let Some(registry) = registry.as_ref() else {
        warn!("egl_image_create_from_texture: null registry");
        return EGL_IMAGE_INVALID_ARGUMENT;
    };
    if out_handle.is_null() {
        warn!("egl_image_create_from_texture: null out_handle");
        return EGL_IMAGE_INVALID_ARGUMENT;
    }
    let Ok(texture) = u32::try_from(texture) else {
        warn!("egl_image_create_from_texture: negative texture name {texture}");
        return EGL_IMAGE_INVALID_ARGUMENT;
    };

    match registry.inner.create_image_from_texture(texture) {
        Ok(handle) => {
            *out_handle = handle.as_raw();
            EGL_IMAGE_SUCCESS
        }
        Err(err) => status_of(&err),
    }
}

/// Bind the image behind `handle` as the storage of the texture currently
/// bound to `GL_TEXTURE_2D`.
///
/// # Safety
///
/// `registry` must be a live registry pointer or null.
#[no_mangle]
pub unsafe extern "C" fn egl_image_set_target_texture(
    registry: *const EglImageRegistry,
    handle: i32,
) -> i32 {
    let Some(registry) = registry.as_ref() else {
        warn!("egl_image_set_target_texture: null registry");
        return EGL_IMAGE_INVALID_ARGUMENT;
    };

    match registry
        .inner
        .set_image_target_texture(ImageHandle::from_raw(handle))
    {
        Ok(()) => EGL_IMAGE_SUCCESS,
        Err(err) => status_of(&err),
    }
}

static LOGGING_INIT: Once = Once::new();

/// Install the default `tracing` subscriber. Later calls do nothing.
#[no_mangle]
pub extern "C" fn egl_image_init_logging() {
    LOGGING_INIT.call_once(|| {
        egl_image_registry::logging::init_tracing();
    });
}
