#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use egl_image_registry::{
    ApiError, ImageApi, ImageAttributes, NativeImage, TextureId, WorkerConfig, WorkerContext,
};
use parking_lot::Mutex;

/// Image backend that never touches a GPU.
///
/// Every created image gets a fresh address so two creations from the same
/// texture are still distinguishable.
#[derive(Default)]
pub struct FakeApi {
    next_image: AtomicUsize,
    pub fail_creation: AtomicBool,
    pub created: Mutex<Vec<(TextureId, NativeImage)>>,
    pub bound: Mutex<Vec<NativeImage>>,
    pub destroyed: Mutex<Vec<NativeImage>>,
}

impl FakeApi {
    pub fn image_for(&self, texture: TextureId) -> Option<NativeImage> {
        self.created
            .lock()
            .iter()
            .find(|(t, _)| *t == texture)
            .map(|(_, image)| *image)
    }
}

impl ImageApi for FakeApi {
    fn create_image_from_texture(
        &self,
        texture: TextureId,
        _attributes: &ImageAttributes,
    ) -> Result<NativeImage, ApiError> {
        if self.fail_creation.load(Ordering::SeqCst) {
            return Err(ApiError::NoCurrentContext);
        }
        let n = self.next_image.fetch_add(1, Ordering::SeqCst);
        let image = NativeImage::from_addr(0x10_0000 + n * 0x10).unwrap();
        self.created.lock().push((texture, image));
        Ok(image)
    }

    fn target_texture_2d(&self, image: NativeImage) -> Result<(), ApiError> {
        self.bound.lock().push(image);
        Ok(())
    }

    fn destroy_image(&self, image: NativeImage) -> Result<(), ApiError> {
        self.destroyed.lock().push(image);
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GlCall {
    Gen(TextureId),
    Bind(TextureId),
    Delete(TextureId),
}

/// Worker context recording the GL calls made on the upload thread.
pub struct FakeContext {
    next_texture: TextureId,
    pub calls: Arc<Mutex<Vec<GlCall>>>,
    pub fail_bind: bool,
}

impl FakeContext {
    pub fn new(calls: Arc<Mutex<Vec<GlCall>>>) -> Self {
        Self {
            next_texture: 1,
            calls,
            fail_bind: false,
        }
    }
}

impl WorkerContext for FakeContext {
    fn gen_texture(&mut self) -> Result<TextureId, ApiError> {
        let texture = self.next_texture;
        self.next_texture += 1;
        self.calls.lock().push(GlCall::Gen(texture));
        Ok(texture)
    }

    fn bind_texture(&mut self, texture: TextureId) -> Result<(), ApiError> {
        if self.fail_bind {
            return Err(ApiError::Gl {
                call: "glBindTexture",
                code: 0x0502,
            });
        }
        self.calls.lock().push(GlCall::Bind(texture));
        Ok(())
    }

    fn delete_texture(&mut self, texture: TextureId) {
        self.calls.lock().push(GlCall::Delete(texture));
    }
}

pub fn test_config() -> WorkerConfig {
    WorkerConfig {
        thread_name: "test-uploader".to_string(),
        ..WorkerConfig::default()
    }
}
