//! Off-screen GL context used by background upload threads.

use std::num::NonZeroUsize;

use crate::{ApiError, TextureId};

/// GL work an upload thread performs in its own current context.
///
/// Implementations are created on, and never leave, the thread that owns the
/// context.
pub trait WorkerContext {
    /// Generate a fresh texture name.
    fn gen_texture(&mut self) -> Result<TextureId, ApiError>;

    /// Bind `texture` to `GL_TEXTURE_2D`.
    fn bind_texture(&mut self, texture: TextureId) -> Result<(), ApiError>;

    /// Delete a texture that never made it into an image.
    fn delete_texture(&mut self, texture: TextureId);
}

/// Settings for a background upload context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerConfig {
    /// `EGL_CONTEXT_CLIENT_VERSION` of the worker context.
    pub client_version: i32,
    /// Size of the unused pbuffer surface the context is made current on.
    pub pbuffer_width: i32,
    pub pbuffer_height: i32,
    /// Name of the spawned thread.
    pub thread_name: String,
    /// Context whose share group the worker context joins. Images do not
    /// need one; shared texture names do.
    pub share_context: Option<ShareContext>,
}

/// An `EGLContext` captured on one thread to be shared from another.
///
/// Only the handle value travels; the context stays current wherever it was.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShareContext(NonZeroUsize);

impl ShareContext {
    /// Returns `None` for `EGL_NO_CONTEXT`.
    pub fn from_addr(addr: usize) -> Option<Self> {
        NonZeroUsize::new(addr).map(Self)
    }

    pub fn addr(self) -> usize {
        self.0.get()
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            client_version: 2,
            pbuffer_width: 16,
            pbuffer_height: 16,
            thread_name: "egl-image-uploader".to_string(),
            share_context: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_context_shares_nothing() {
        let config = WorkerConfig::default();
        assert_eq!(config.client_version, 2);
        assert_eq!((config.pbuffer_width, config.pbuffer_height), (16, 16));
        assert_eq!(config.share_context, None);
    }

    #[test]
    fn no_context_is_not_a_share_context() {
        assert_eq!(ShareContext::from_addr(0), None);
        assert_eq!(ShareContext::from_addr(0x40).map(ShareContext::addr), Some(0x40));
    }
}
