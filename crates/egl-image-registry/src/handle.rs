use std::fmt;

/// Integer name of a registered image.
///
/// Handles are issued in increasing order starting at 0 and are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageHandle(i32);

impl ImageHandle {
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn as_raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<ImageHandle> for i32 {
    fn from(handle: ImageHandle) -> i32 {
        handle.0
    }
}
