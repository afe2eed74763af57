//! [`ImageRegistry`] — handle table for shareable images.
//!
//! The table sits behind a single mutex that is only held for the O(1)
//! bookkeeping (id assignment + insert, or lookup + copy). Image creation
//! and binding call into the driver and always happen with the lock
//! released, so registrations from different threads create their images
//! concurrently.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::{
    ImageApi, ImageAttributes, ImageHandle, NativeImage, RegistryError, TextureId,
};

struct ImageTable {
    next_id: i32,
    images: HashMap<ImageHandle, NativeImage>,
}

/// Maps integer handles to native images.
///
/// Entries are append-only: there is no remove operation and handles are
/// never reused. Dropping the registry forgets the table but does not destroy
/// the images; they remain owned by the graphics driver.
pub struct ImageRegistry<A> {
    api: A,
    attributes: ImageAttributes,
    table: Mutex<ImageTable>,
}

impl<A: ImageApi> ImageRegistry<A> {
    /// Create an empty registry using default image attributes (mip level 0).
    pub fn new(api: A) -> Self {
        Self::with_attributes(api, ImageAttributes::default())
    }

    pub fn with_attributes(api: A, attributes: ImageAttributes) -> Self {
        Self {
            api,
            attributes,
            table: Mutex::new(ImageTable {
                next_id: 0,
                images: HashMap::new(),
            }),
        }
    }

    /// Create an image from `texture` in the calling thread's current
    /// context and register it.
    ///
    /// Nothing is registered when the graphics API reports a failure.
    pub fn create_image_from_texture(
        &self,
        texture: TextureId,
    ) -> Result<ImageHandle, RegistryError> {
        let image = self
            .api
            .create_image_from_texture(texture, &self.attributes)
            .map_err(|source| {
                warn!("image creation from texture {texture} failed: {source}");
                RegistryError::ImageCreationFailed { texture, source }
            })?;

        match self.register(image) {
            Ok(handle) => {
                debug!("texture {texture} -> image {handle}");
                Ok(handle)
            }
            Err(err) => {
                if let Err(destroy_err) = self.api.destroy_image(image) {
                    warn!("failed to release unregistered image: {destroy_err}");
                }
                Err(err)
            }
        }
    }

    /// Assign the next handle to an already created image.
    pub fn register(&self, image: NativeImage) -> Result<ImageHandle, RegistryError> {
        let mut table = self.table.lock();
        let id = table.next_id;
        table.next_id = id.checked_add(1).ok_or(RegistryError::HandlesExhausted)?;
        let handle = ImageHandle::from_raw(id);
        table.images.insert(handle, image);
        Ok(handle)
    }

    /// Look up the image behind `handle`.
    pub fn resolve(&self, handle: ImageHandle) -> Result<NativeImage, RegistryError> {
        self.table
            .lock()
            .images
            .get(&handle)
            .copied()
            .ok_or(RegistryError::HandleNotFound(handle))
    }

    /// Resolve `handle` and make its image the storage of the texture
    /// currently bound to `GL_TEXTURE_2D` on the calling thread.
    ///
    /// Unknown handles fail before the graphics API is touched.
    pub fn set_image_target_texture(&self, handle: ImageHandle) -> Result<(), RegistryError> {
        let image = self.resolve(handle).map_err(|err| {
            warn!("bind of unknown image {handle}");
            err
        })?;

        self.api
            .target_texture_2d(image)
            .map_err(|source| RegistryError::BindFailed { handle, source })
    }

    /// Number of registered images.
    pub fn len(&self) -> usize {
        self.table.lock().images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn attributes(&self) -> &ImageAttributes {
        &self.attributes
    }

    #[cfg(test)]
    fn set_next_id(&self, next_id: i32) {
        self.table.lock().next_id = next_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ApiError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Images are `0x1000 + texture`; texture 0 is rejected.
    #[derive(Default)]
    struct FakeApi {
        bound: Mutex<Vec<NativeImage>>,
        destroyed: AtomicUsize,
    }

    impl ImageApi for FakeApi {
        fn create_image_from_texture(
            &self,
            texture: TextureId,
            _attributes: &ImageAttributes,
        ) -> Result<NativeImage, ApiError> {
            if texture == 0 {
                return Err(ApiError::Egl {
                    call: "eglCreateImageKHR",
                    code: 0x300C,
                });
            }
            Ok(NativeImage::from_addr(0x1000 + texture as usize).unwrap())
        }

        fn target_texture_2d(&self, image: NativeImage) -> Result<(), ApiError> {
            self.bound.lock().push(image);
            Ok(())
        }

        fn destroy_image(&self, _image: NativeImage) -> Result<(), ApiError> {
            self.destroyed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn handles_start_at_zero() {
        let registry = ImageRegistry::new(FakeApi::default());
        assert_eq!(registry.create_image_from_texture(1).unwrap().as_raw(), 0);
        assert_eq!(registry.create_image_from_texture(2).unwrap().as_raw(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn resolve_returns_the_created_image() {
        let registry = ImageRegistry::new(FakeApi::default());
        let handle = registry.create_image_from_texture(9).unwrap();
        assert_eq!(registry.resolve(handle).unwrap().addr(), 0x1009);
    }

    #[test]
    fn unknown_handle_is_not_bound() {
        let registry = ImageRegistry::new(FakeApi::default());
        registry.create_image_from_texture(1).unwrap();

        let missing = ImageHandle::from_raw(5);
        assert_eq!(
            registry.set_image_target_texture(missing),
            Err(RegistryError::HandleNotFound(missing))
        );
        assert!(registry.api().bound.lock().is_empty());
    }

    #[test]
    fn bind_targets_the_resolved_image() {
        let registry = ImageRegistry::new(FakeApi::default());
        let handle = registry.create_image_from_texture(3).unwrap();
        registry.set_image_target_texture(handle).unwrap();
        assert_eq!(registry.api().bound.lock().as_slice(), &[registry.resolve(handle).unwrap()]);
    }

    #[test]
    fn failed_creation_registers_nothing() {
        let registry = ImageRegistry::new(FakeApi::default());
        let err = registry.create_image_from_texture(0).unwrap_err();
        assert!(matches!(err, RegistryError::ImageCreationFailed { texture: 0, .. }));
        assert!(registry.is_empty());

        // The failed attempt did not consume a handle.
        assert_eq!(registry.create_image_from_texture(4).unwrap().as_raw(), 0);
    }

    #[test]
    fn exhausted_handle_space_releases_the_image() {
        let registry = ImageRegistry::new(FakeApi::default());
        registry.set_next_id(i32::MAX - 1);

        let last = registry.create_image_from_texture(1).unwrap();
        assert_eq!(last.as_raw(), i32::MAX - 1);

        assert_eq!(
            registry.create_image_from_texture(2),
            Err(RegistryError::HandlesExhausted)
        );
        assert_eq!(registry.api().destroyed.load(Ordering::SeqCst), 1);
        assert_eq!(registry.len(), 1);
    }
}
