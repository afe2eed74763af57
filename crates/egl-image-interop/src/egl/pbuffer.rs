//! Off-screen EGL context made current on a pbuffer surface.
//!
//! Background upload threads need a GL context of their own. The surface is
//! never drawn to; it only exists because `eglMakeCurrent` needs one on
//! implementations without `EGL_KHR_surfaceless_context`.

use anyhow::{bail, Result};
use tracing::{debug, warn};

use super::{egl_error, gl_error, load_gl};
use crate::ffi::*;
use crate::{ApiError, ShareContext, TextureId, WorkerConfig, WorkerContext};

/// An EGL context bound to the thread that created it.
///
/// Not `Send`: the context is current on exactly one thread and is released
/// there on drop.
pub struct PbufferContext {
    display: EGLDisplay,
    surface: EGLSurface,
    context: EGLContext,
}

impl PbufferContext {
    /// Create a context on the default display and make it current on the
    /// calling thread.
    pub fn create(config: &WorkerConfig) -> Result<Self> {
        unsafe {
            let display = eglGetDisplay(EGL_DEFAULT_DISPLAY);
            if display == EGL_NO_DISPLAY {
                let code = egl_error();
                bail!("eglGetDisplay failed: {code:#x}");
            }

            let (mut major, mut minor) = (0, 0);
            if eglInitialize(display, &mut major, &mut minor) == EGL_FALSE {
                let code = egl_error();
                bail!("eglInitialize failed: {code:#x}");
            }
            debug!("EGL {major}.{minor} initialized");

            let config_attribs = [
                EGL_SURFACE_TYPE,
                EGL_PBUFFER_BIT,
                EGL_RENDERABLE_TYPE,
                EGL_OPENGL_ES2_BIT,
                EGL_RED_SIZE,
                8,
                EGL_GREEN_SIZE,
                8,
                EGL_BLUE_SIZE,
                8,
                EGL_ALPHA_SIZE,
                8,
                EGL_NONE,
            ];
            let mut egl_config: EGLConfig = std::ptr::null_mut();
            let mut num_configs = 0;
            if eglChooseConfig(
                display,
                config_attribs.as_ptr(),
                &mut egl_config,
                1,
                &mut num_configs,
            ) == EGL_FALSE
                || num_configs == 0
            {
                let code = egl_error();
                bail!("eglChooseConfig found no pbuffer config: {code:#x}");
            }

            let context_attribs = [EGL_CONTEXT_CLIENT_VERSION, config.client_version, EGL_NONE];
            let share = config
                .share_context
                .map_or(EGL_NO_CONTEXT, |share| share.addr() as EGLContext);
            let context =
                eglCreateContext(display, egl_config, share, context_attribs.as_ptr());
            let code = egl_error();
            debug!("eglCreateContext error: {code:#x}");
            if context == EGL_NO_CONTEXT {
                bail!("eglCreateContext failed: {code:#x}");
            }

            let surface_attribs = [
                EGL_WIDTH,
                config.pbuffer_width,
                EGL_HEIGHT,
                config.pbuffer_height,
                EGL_NONE,
            ];
            let surface = eglCreatePbufferSurface(display, egl_config, surface_attribs.as_ptr());
            let code = egl_error();
            debug!("eglCreatePbufferSurface error: {code:#x}");
            if surface == EGL_NO_SURFACE {
                eglDestroyContext(display, context);
                bail!("eglCreatePbufferSurface failed: {code:#x}");
            }

            if eglMakeCurrent(display, surface, surface, context) == EGL_FALSE {
                let code = egl_error();
                eglDestroySurface(display, surface);
                eglDestroyContext(display, context);
                bail!("eglMakeCurrent failed: {code:#x}");
            }

            load_gl();

            Ok(Self {
                display,
                surface,
                context,
            })
        }
    }
}

/// The context current on the calling thread, for
/// [`WorkerConfig::share_context`].
///
/// Call this on the thread that owns the parent context, before spawning the
/// worker.
pub fn current_share_context() -> Option<ShareContext> {
    let context = unsafe { eglGetCurrentContext() };
    ShareContext::from_addr(context as usize)
}

impl WorkerContext for PbufferContext {
    fn gen_texture(&mut self) -> Result<TextureId, ApiError> {
        let mut texture: TextureId = 0;
        unsafe { gl::GenTextures(1, &mut texture) };
        let code = gl_error();
        debug!("glGenTextures error: {code:#x}");
        if code != gl::NO_ERROR || texture == 0 {
            return Err(ApiError::Gl {
                call: "glGenTextures",
                code,
            });
        }
        Ok(texture)
    }

    fn bind_texture(&mut self, texture: TextureId) -> Result<(), ApiError> {
        unsafe { gl::BindTexture(gl::TEXTURE_2D, texture) };
        let code = gl_error();
        debug!("glBindTexture({texture}) error: {code:#x}");
        if code != gl::NO_ERROR {
            return Err(ApiError::Gl {
                call: "glBindTexture",
                code,
            });
        }
        Ok(())
    }

    fn delete_texture(&mut self, texture: TextureId) {
        unsafe { gl::DeleteTextures(1, &texture) };
    }
}

impl Drop for PbufferContext {
    fn drop(&mut self) {
        unsafe {
            if eglMakeCurrent(self.display, EGL_NO_SURFACE, EGL_NO_SURFACE, EGL_NO_CONTEXT)
                == EGL_FALSE
            {
                let code = egl_error();
                warn!("eglMakeCurrent(release) failed: {code:#x}");
            }
            eglDestroySurface(self.display, self.surface);
            eglDestroyContext(self.display, self.context);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_failures_carry_the_egl_code() {
        // Headless machines may have no usable display; either way a failure
        // must name the EGL error.
        match PbufferContext::create(&WorkerConfig::default()) {
            Ok(context) => drop(context),
            Err(err) => assert!(format!("{err:#}").contains(": 0x"), "{err:#}"),
        }
    }
}
