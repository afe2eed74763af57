use std::ffi::{c_void, CStr};

use tracing::error;

use crate::ffi::{
    eglGetProcAddress, PfnEglCreateImageKhr, PfnEglDestroyImageKhr,
    PfnGlEglImageTargetTexture2dOes,
};
use crate::ApiError;

/// Loaded image extension function pointers.
#[derive(Clone, Copy)]
pub(crate) struct EglImageFunctions {
    pub(crate) create_image: PfnEglCreateImageKhr,
    pub(crate) destroy_image: PfnEglDestroyImageKhr,
    pub(crate) image_target_texture_2d: PfnGlEglImageTargetTexture2dOes,
}

impl EglImageFunctions {
    /// Load all extension entry points via `eglGetProcAddress`.
    pub(crate) fn load() -> Result<Self, ApiError> {
        fn load(name: &'static CStr) -> Result<*const c_void, ApiError> {
            let ptr = unsafe { eglGetProcAddress(name.as_ptr()) };
            if ptr.is_null() {
                let name = name.to_str().unwrap_or("<non-utf8>");
                error!("eglGetProcAddress({name}) returned null");
                Err(ApiError::MissingEntryPoint(name))
            } else {
                Ok(ptr)
            }
        }

        unsafe {
            Ok(Self {
                create_image: std::mem::transmute::<*const c_void, PfnEglCreateImageKhr>(load(
                    c"eglCreateImageKHR",
                )?),
                destroy_image: std::mem::transmute::<*const c_void, PfnEglDestroyImageKhr>(
                    load(c"eglDestroyImageKHR")?,
                ),
                image_target_texture_2d: std::mem::transmute::<
                    *const c_void,
                    PfnGlEglImageTargetTexture2dOes,
                >(load(c"glEGLImageTargetTexture2DOES")?),
            })
        }
    }
}
