//! GL-texture-to-EGL-image bridging.
//!
//! This crate defines the [`ImageApi`] trait, the narrow interface through
//! which a texture in the calling thread's current GL context is turned into a
//! shareable [`NativeImage`] and later bound as the storage of another
//! texture. On Android (or with the `egl` feature) the trait is implemented
//! on top of `EGL_KHR_image_base` and `GL_OES_EGL_image`.

pub mod api;
pub mod attributes;
pub mod ffi;
pub mod worker;

pub use api::{ApiError, ImageApi, NativeImage, TextureId};
pub use attributes::ImageAttributes;
pub use worker::{ShareContext, WorkerConfig, WorkerContext};

// Platform-specific implementation.

#[cfg(any(target_os = "android", feature = "egl"))]
pub mod egl;
