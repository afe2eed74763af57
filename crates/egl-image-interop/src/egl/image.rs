//! [`EglImageApi`] — texture-backed EGL images on the current context.

use tracing::{debug, warn};

use super::functions::EglImageFunctions;
use super::{egl_error, gl_error, load_gl};
use crate::ffi::{
    eglGetCurrentContext, eglGetCurrentDisplay, EGLClientBuffer, EGL_FALSE,
    EGL_GL_TEXTURE_2D_KHR, EGL_NO_CONTEXT, EGL_NO_DISPLAY, EGL_SUCCESS,
};
use crate::{ApiError, ImageApi, ImageAttributes, NativeImage, TextureId};

/// EGL image backend.
///
/// Holds only the resolved extension entry points, so one instance can be
/// shared by every thread. Each call uses the display and context that are
/// current on the calling thread.
pub struct EglImageApi {
    fns: EglImageFunctions,
}

impl EglImageApi {
    /// Resolve the image extension entry points and load GL.
    ///
    /// Fails if the driver does not expose `EGL_KHR_image_base` or
    /// `GL_OES_EGL_image`.
    pub fn new() -> Result<Self, ApiError> {
        let fns = EglImageFunctions::load()?;
        load_gl();
        Ok(Self { fns })
    }
}

impl ImageApi for EglImageApi {
    fn create_image_from_texture(
        &self,
        texture: TextureId,
        attributes: &ImageAttributes,
    ) -> Result<NativeImage, ApiError> {
        let display = unsafe { eglGetCurrentDisplay() };
        let code = egl_error();
        debug!("eglGetCurrentDisplay error: {code:#x}");
        if display == EGL_NO_DISPLAY {
            return Err(ApiError::NoCurrentDisplay);
        }

        let context = unsafe { eglGetCurrentContext() };
        let code = egl_error();
        debug!("eglGetCurrentContext error: {code:#x}");
        if context == EGL_NO_CONTEXT {
            return Err(ApiError::NoCurrentContext);
        }

        let attrib_list = attributes.to_attrib_list();
        let image = unsafe {
            (self.fns.create_image)(
                display,
                context,
                EGL_GL_TEXTURE_2D_KHR,
                texture as usize as EGLClientBuffer,
                attrib_list.as_ptr(),
            )
        };
        let code = egl_error();
        debug!("eglCreateImageKHR(texture {texture}) error: {code:#x}");

        match NativeImage::from_raw(image) {
            Some(image) if code == EGL_SUCCESS as u32 => Ok(image),
            Some(image) => {
                // Non-null image with a pending error: don't hand it out.
                unsafe { (self.fns.destroy_image)(display, image.as_ptr()) };
                Err(ApiError::Egl {
                    call: "eglCreateImageKHR",
                    code,
                })
            }
            None => Err(ApiError::Egl {
                call: "eglCreateImageKHR",
                code,
            }),
        }
    }

    fn target_texture_2d(&self, image: NativeImage) -> Result<(), ApiError> {
        // Drop stale flags so the check below only sees this call.
        while gl_error() != gl::NO_ERROR {}

        unsafe { (self.fns.image_target_texture_2d)(gl::TEXTURE_2D, image.as_ptr()) };

        let code = gl_error();
        debug!("glEGLImageTargetTexture2DOES error: {code:#x}");
        if code != gl::NO_ERROR {
            return Err(ApiError::Gl {
                call: "glEGLImageTargetTexture2DOES",
                code,
            });
        }
        Ok(())
    }

    fn destroy_image(&self, image: NativeImage) -> Result<(), ApiError> {
        let display = unsafe { eglGetCurrentDisplay() };
        if display == EGL_NO_DISPLAY {
            return Err(ApiError::NoCurrentDisplay);
        }

        let ok = unsafe { (self.fns.destroy_image)(display, image.as_ptr()) };
        if ok == EGL_FALSE {
            let code = egl_error();
            warn!("eglDestroyImageKHR failed: {code:#x}");
            return Err(ApiError::Egl {
                call: "eglDestroyImageKHR",
                code,
            });
        }
        Ok(())
    }
}
