//! Hardcoded EGL 1.4 / KHR constants and C types.
//!
//! Values are sourced from the Khronos headers (egl.h, eglext.h,
//! gl2ext.h). Only what the image bridge and its worker context use.

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(dead_code)]

use std::ffi::c_void;

// =====================================================================
// Types
// =====================================================================

pub type EGLint = i32;
pub type EGLenum = u32;
pub type EGLBoolean = u32;
pub type EGLDisplay = *mut c_void;
pub type EGLContext = *mut c_void;
pub type EGLSurface = *mut c_void;
pub type EGLConfig = *mut c_void;
pub type EGLClientBuffer = *mut c_void;
pub type EGLImageKHR = *mut c_void;
pub type EGLNativeDisplayType = *mut c_void;
pub type GLeglImageOES = *mut c_void;

// =====================================================================
// Sentinels
// =====================================================================

pub const EGL_FALSE: EGLBoolean = 0;
pub const EGL_TRUE: EGLBoolean = 1;
pub const EGL_DEFAULT_DISPLAY: EGLNativeDisplayType = std::ptr::null_mut();
pub const EGL_NO_DISPLAY: EGLDisplay = std::ptr::null_mut();
pub const EGL_NO_CONTEXT: EGLContext = std::ptr::null_mut();
pub const EGL_NO_SURFACE: EGLSurface = std::ptr::null_mut();
pub const EGL_NO_IMAGE_KHR: EGLImageKHR = std::ptr::null_mut();

// =====================================================================
// Error codes
// =====================================================================

pub const EGL_SUCCESS: EGLint = 0x3000;
pub const EGL_NOT_INITIALIZED: EGLint = 0x3001;
pub const EGL_BAD_ACCESS: EGLint = 0x3002;
pub const EGL_BAD_ALLOC: EGLint = 0x3003;
pub const EGL_BAD_ATTRIBUTE: EGLint = 0x3004;
pub const EGL_BAD_CONFIG: EGLint = 0x3005;
pub const EGL_BAD_CONTEXT: EGLint = 0x3006;
pub const EGL_BAD_DISPLAY: EGLint = 0x3008;
pub const EGL_BAD_MATCH: EGLint = 0x3009;
pub const EGL_BAD_PARAMETER: EGLint = 0x300C;

// =====================================================================
// Attributes
// =====================================================================

pub const EGL_NONE: EGLint = 0x3038;
pub const EGL_RED_SIZE: EGLint = 0x3024;
pub const EGL_GREEN_SIZE: EGLint = 0x3023;
pub const EGL_BLUE_SIZE: EGLint = 0x3022;
pub const EGL_ALPHA_SIZE: EGLint = 0x3021;
pub const EGL_SURFACE_TYPE: EGLint = 0x3033;
pub const EGL_RENDERABLE_TYPE: EGLint = 0x3040;
pub const EGL_WIDTH: EGLint = 0x3057;
pub const EGL_HEIGHT: EGLint = 0x3056;
pub const EGL_PBUFFER_BIT: EGLint = 0x0001;
pub const EGL_OPENGL_ES2_BIT: EGLint = 0x0004;
pub const EGL_CONTEXT_CLIENT_VERSION: EGLint = 0x3098;

// EGL_KHR_gl_texture_2D_image / EGL_KHR_image_base
pub const EGL_GL_TEXTURE_2D_KHR: EGLenum = 0x30B1;
pub const EGL_GL_TEXTURE_LEVEL_KHR: EGLint = 0x30BC;
pub const EGL_IMAGE_PRESERVED_KHR: EGLint = 0x30D2;

// =====================================================================
// Extension entry points (resolved at runtime via eglGetProcAddress)
// =====================================================================

pub type PfnEglCreateImageKhr = unsafe extern "C" fn(
    dpy: EGLDisplay,
    ctx: EGLContext,
    target: EGLenum,
    buffer: EGLClientBuffer,
    attrib_list: *const EGLint,
) -> EGLImageKHR;
pub type PfnEglDestroyImageKhr =
    unsafe extern "C" fn(dpy: EGLDisplay, image: EGLImageKHR) -> EGLBoolean;
pub type PfnGlEglImageTargetTexture2dOes =
    unsafe extern "C" fn(target: gl::types::GLenum, image: GLeglImageOES);

// =====================================================================
// Core EGL (linked)
// =====================================================================

#[cfg(any(target_os = "android", feature = "egl"))]
#[link(name = "EGL")]
extern "C" {
    pub fn eglGetProcAddress(procname: *const std::ffi::c_char) -> *const c_void;
    pub fn eglGetError() -> EGLint;
    pub fn eglGetDisplay(display_id: EGLNativeDisplayType) -> EGLDisplay;
    pub fn eglInitialize(dpy: EGLDisplay, major: *mut EGLint, minor: *mut EGLint) -> EGLBoolean;
    pub fn eglGetCurrentDisplay() -> EGLDisplay;
    pub fn eglGetCurrentContext() -> EGLContext;
    pub fn eglChooseConfig(
        dpy: EGLDisplay,
        attrib_list: *const EGLint,
        configs: *mut EGLConfig,
        config_size: EGLint,
        num_config: *mut EGLint,
    ) -> EGLBoolean;
    pub fn eglCreateContext(
        dpy: EGLDisplay,
        config: EGLConfig,
        share_context: EGLContext,
        attrib_list: *const EGLint,
    ) -> EGLContext;
    pub fn eglCreatePbufferSurface(
        dpy: EGLDisplay,
        config: EGLConfig,
        attrib_list: *const EGLint,
    ) -> EGLSurface;
    pub fn eglMakeCurrent(
        dpy: EGLDisplay,
        draw: EGLSurface,
        read: EGLSurface,
        ctx: EGLContext,
    ) -> EGLBoolean;
    pub fn eglDestroySurface(dpy: EGLDisplay, surface: EGLSurface) -> EGLBoolean;
    pub fn eglDestroyContext(dpy: EGLDisplay, ctx: EGLContext) -> EGLBoolean;
}
