//! Process-lifetime registry of shareable GL images.
//!
//! [`ImageRegistry`] hands out small integer [`ImageHandle`]s for images
//! created from textures, so that code on the other side of a language
//! boundary can name an image without holding the native reference. Handles
//! are resolved back and bound as the storage of the current texture on any
//! thread.
//!
//! # Overview
//!
//! - [`ImageRegistry`] owns the handle table and the [`ImageApi`] backend.
//! - [`AsyncTextureUploader`] fills textures on a background thread with its
//!   own GL context and registers images from them.
//! - [`logging::init_tracing`] installs a `tracing` subscriber.
//!
//! # Caller contract
//!
//! Every operation that reaches the graphics API acts on the display, context
//! and texture binding that are current on the calling thread. Making the
//! right context current is the caller's job.

pub mod error;
pub mod handle;
pub mod logging;
pub mod registry;
pub mod uploader;

#[cfg(any(target_os = "android", feature = "egl"))]
pub use egl_image_interop::egl;
pub use egl_image_interop::{
    ApiError, ImageApi, ImageAttributes, NativeImage, ShareContext, TextureId, WorkerConfig,
    WorkerContext,
};
pub use error::{RegistryError, UploadError};
pub use handle::ImageHandle;
pub use registry::ImageRegistry;
pub use uploader::{AsyncTextureUploader, PendingUpload};
