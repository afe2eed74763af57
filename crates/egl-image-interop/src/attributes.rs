//! Image creation attributes.

use crate::ffi::{
    EGLint, EGL_FALSE, EGL_GL_TEXTURE_LEVEL_KHR, EGL_IMAGE_PRESERVED_KHR, EGL_NONE, EGL_TRUE,
};

/// Attributes passed to `eglCreateImageKHR`.
///
/// The default selects mip level 0 and leaves `EGL_IMAGE_PRESERVED_KHR`
/// unspecified, so the implementation default (`EGL_FALSE`) applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImageAttributes {
    /// Mip level of the source texture backing the image.
    pub level: i32,
    /// Explicit `EGL_IMAGE_PRESERVED_KHR` value, if any.
    pub preserved: Option<bool>,
}

impl ImageAttributes {
    /// Render as an `EGL_NONE`-terminated attribute list.
    pub fn to_attrib_list(&self) -> Vec<EGLint> {
        let mut list = vec![EGL_GL_TEXTURE_LEVEL_KHR, self.level];
        if let Some(preserved) = self.preserved {
            let value = if preserved { EGL_TRUE } else { EGL_FALSE };
            list.extend_from_slice(&[EGL_IMAGE_PRESERVED_KHR, value as EGLint]);
        }
        list.push(EGL_NONE);
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_level_zero_without_preserved() {
        let list = ImageAttributes::default().to_attrib_list();
        assert_eq!(list, vec![EGL_GL_TEXTURE_LEVEL_KHR, 0, EGL_NONE]);
    }

    #[test]
    fn preserved_flag_is_emitted_when_set() {
        let attributes = ImageAttributes {
            level: 2,
            preserved: Some(true),
        };
        assert_eq!(
            attributes.to_attrib_list(),
            vec![
                EGL_GL_TEXTURE_LEVEL_KHR,
                2,
                EGL_IMAGE_PRESERVED_KHR,
                1,
                EGL_NONE
            ]
        );
    }
}
