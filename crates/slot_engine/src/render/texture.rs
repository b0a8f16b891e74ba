//! Texture pool
//!
//! Textures are created by a [`TextureBackend`] and tracked here by handle.
//! Loading the same bytes twice returns the handle of the first load: the
//! pool keeps a content-hash → handle cache, and an entry leaves the cache
//! when its texture is unloaded.

use super::RenderResult;
use crate::foundation::collections::Handle;
use crate::foundation::pool::{DenseSlotPool, GrowthPolicy, PoolError};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Backend-owned texture id; never interpreted by the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeTexture(pub u64);

/// Result of a successful backend upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureUpload {
    /// Id the backend will accept back in `destroy_texture`
    pub native: NativeTexture,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Creates and destroys textures on behalf of the [`TexturePool`]
pub trait TextureBackend {
    /// Decode `bytes` and create a texture from them
    fn create_texture(&mut self, bytes: &[u8]) -> RenderResult<TextureUpload>;

    /// Release a texture previously returned by `create_texture`
    fn destroy_texture(&mut self, native: NativeTexture);
}

/// Content key for texture deduplication
///
/// A 64-bit digest of the bytes, paired with their length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash {
    digest: u64,
    len: usize,
}

impl ContentHash {
    /// Hash a byte buffer
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = DefaultHasher::new();
        bytes.hash(&mut hasher);
        Self {
            digest: hasher.finish(),
            len: bytes.len(),
        }
    }

    /// Length of the hashed content in bytes
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the hashed content was empty
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// One texture as stored in the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureRecord {
    /// Backend id
    pub native: NativeTexture,
    /// Hash of the bytes the texture was created from
    pub hash: ContentHash,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Handle-addressed textures with content-hash deduplication
pub struct TexturePool {
    textures: DenseSlotPool<TextureRecord>,
    cache: HashMap<ContentHash, Handle>,
    backend: Box<dyn TextureBackend>,
}

impl TexturePool {
    /// Create a texture pool that uploads through `backend`
    pub fn new(backend: Box<dyn TextureBackend>, capacity: usize, policy: GrowthPolicy) -> Self {
        Self {
            textures: DenseSlotPool::with_capacity(capacity, policy),
            cache: HashMap::with_capacity(capacity),
            backend,
        }
    }

    /// Load a texture from a file, reusing an existing texture with identical bytes
    pub fn load_texture(&mut self, path: impl AsRef<Path>) -> RenderResult<Handle> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let handle = self.load_texture_from_bytes(&bytes)?;
        log::debug!("Texture {handle} loaded from {}", path.display());
        Ok(handle)
    }

    /// Load a texture from encoded image bytes, reusing an identical one
    pub fn load_texture_from_bytes(&mut self, bytes: &[u8]) -> RenderResult<Handle> {
        let hash = ContentHash::of(bytes);

        if let Some(&handle) = self.cache.get(&hash) {
            if self.textures.contains(handle) {
                log::trace!("Texture cache hit for {handle}");
                return Ok(handle);
            }
            self.cache.remove(&hash);
        }

        if !self.textures.is_initialized() {
            return Err(PoolError::NotInitialized.into());
        }

        let upload = self.backend.create_texture(bytes)?;
        let record = TextureRecord {
            native: upload.native,
            hash,
            width: upload.width,
            height: upload.height,
        };

        let handle = match self.textures.insert(record) {
            Ok(handle) => handle,
            Err(err) => {
                self.backend.destroy_texture(upload.native);
                return Err(err.into());
            }
        };

        self.cache.insert(hash, handle);
        log::debug!(
            "Created texture {handle} ({}x{}, {} bytes)",
            upload.width,
            upload.height,
            hash.len()
        );
        Ok(handle)
    }

    /// Unload a texture and release its backend resource
    pub fn unload_texture(&mut self, handle: Handle) -> RenderResult<()> {
        let record = self.textures.remove(handle)?;
        if self.cache.get(&record.hash) == Some(&handle) {
            self.cache.remove(&record.hash);
        }
        self.backend.destroy_texture(record.native);
        log::debug!("Unloaded texture {handle}");
        Ok(())
    }

    /// Texture record
    pub fn get(&self, handle: Handle) -> RenderResult<&TextureRecord> {
        Ok(self.textures.get_ref(handle)?)
    }

    /// Backend id of a texture
    pub fn native_handle(&self, handle: Handle) -> RenderResult<NativeTexture> {
        Ok(self.get(handle)?.native)
    }

    /// Pixel dimensions of a texture
    pub fn size(&self, handle: Handle) -> RenderResult<(u32, u32)> {
        let record = self.get(handle)?;
        Ok((record.width, record.height))
    }

    /// Whether `handle` names a loaded texture
    pub fn contains(&self, handle: Handle) -> bool {
        self.textures.contains(handle)
    }

    /// Number of loaded textures
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Whether no texture is loaded
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Release every texture and tear the pool down
    pub fn unload_all(&mut self) {
        let backend = &mut self.backend;
        self.textures.teardown_with(|_, record| backend.destroy_texture(record.native));
        self.cache.clear();
        log::debug!("Unloaded all textures");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::render::RenderError;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Backend that records calls and reports the byte length as the width
    #[derive(Default)]
    pub struct RecordingBackend {
        pub log: Rc<RefCell<BackendLog>>,
    }

    #[derive(Debug, Default)]
    pub struct BackendLog {
        pub created: Vec<NativeTexture>,
        pub destroyed: Vec<NativeTexture>,
    }

    impl TextureBackend for RecordingBackend {
        fn create_texture(&mut self, bytes: &[u8]) -> RenderResult<TextureUpload> {
            if bytes.is_empty() {
                return Err(RenderError::Decode("empty image".to_string()));
            }
            let mut log = self.log.borrow_mut();
            let native = NativeTexture(log.created.len() as u64 + 1);
            log.created.push(native);
            Ok(TextureUpload {
                native,
                width: bytes.len() as u32,
                height: 1,
            })
        }

        fn destroy_texture(&mut self, native: NativeTexture) {
            self.log.borrow_mut().destroyed.push(native);
        }
    }

    fn pool(capacity: usize, policy: GrowthPolicy) -> (TexturePool, Rc<RefCell<BackendLog>>) {
        let backend = RecordingBackend::default();
        let log = Rc::clone(&backend.log);
        (TexturePool::new(Box::new(backend), capacity, policy), log)
    }

    #[test]
    fn test_identical_bytes_share_a_texture() {
        let (mut textures, log) = pool(4, GrowthPolicy::AutoGrow);
        let first = textures.load_texture_from_bytes(b"abc").unwrap();
        let second = textures.load_texture_from_bytes(b"abc").unwrap();
        let other = textures.load_texture_from_bytes(b"abcd").unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(textures.len(), 2);
        assert_eq!(log.borrow().created.len(), 2);
        assert_eq!(textures.size(other).unwrap(), (4, 1));
    }

    #[test]
    fn test_unload_evicts_cache_entry() {
        let (mut textures, log) = pool(4, GrowthPolicy::AutoGrow);
        let first = textures.load_texture_from_bytes(b"abc").unwrap();
        let native = textures.native_handle(first).unwrap();

        textures.unload_texture(first).unwrap();
        assert_eq!(log.borrow().destroyed, vec![native]);
        assert!(textures.get(first).unwrap_err().is_not_found());

        let reloaded = textures.load_texture_from_bytes(b"abc").unwrap();
        assert!(textures.contains(reloaded));
        assert_ne!(textures.native_handle(reloaded).unwrap(), native);
        assert_eq!(log.borrow().created.len(), 2);
    }

    #[test]
    fn test_cache_survives_storage_reordering() {
        let (mut textures, _) = pool(4, GrowthPolicy::AutoGrow);
        let a = textures.load_texture_from_bytes(b"a").unwrap();
        let b = textures.load_texture_from_bytes(b"bb").unwrap();
        let c = textures.load_texture_from_bytes(b"ccc").unwrap();

        textures.unload_texture(a).unwrap();
        assert_eq!(textures.load_texture_from_bytes(b"ccc").unwrap(), c);
        assert_eq!(textures.load_texture_from_bytes(b"bb").unwrap(), b);
    }

    #[test]
    fn test_failed_insert_releases_backend_texture() {
        let (mut textures, log) = pool(1, GrowthPolicy::Fixed);
        textures.load_texture_from_bytes(b"one").unwrap();

        let err = textures.load_texture_from_bytes(b"two").unwrap_err();
        assert!(matches!(err, RenderError::Pool(PoolError::CapacityExceeded { capacity: 1 })));
        let log = log.borrow();
        assert_eq!(log.created.len(), 2);
        assert_eq!(log.destroyed, vec![log.created[1]]);
    }

    #[test]
    fn test_decode_failure_leaves_pool_untouched() {
        let (mut textures, _) = pool(2, GrowthPolicy::AutoGrow);
        assert!(matches!(
            textures.load_texture_from_bytes(b""),
            Err(RenderError::Decode(_))
        ));
        assert!(textures.is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let (mut textures, _) = pool(2, GrowthPolicy::AutoGrow);
        let result = textures.load_texture(std::env::temp_dir().join("slot_engine_missing_texture.png"));
        assert!(matches!(result, Err(RenderError::Io(_))));
    }

    #[test]
    fn test_unload_all_destroys_every_native() {
        let (mut textures, log) = pool(2, GrowthPolicy::AutoGrow);
        let a = textures.load_texture_from_bytes(b"a").unwrap();
        textures.load_texture_from_bytes(b"b").unwrap();
        textures.load_texture_from_bytes(b"c").unwrap();

        textures.unload_all();
        let mut destroyed = log.borrow().destroyed.clone();
        destroyed.sort_by_key(|native| native.0);
        assert_eq!(destroyed, log.borrow().created);
        assert!(!textures.contains(a));
        assert!(matches!(
            textures.load_texture_from_bytes(b"a"),
            Err(RenderError::Pool(PoolError::NotInitialized))
        ));
    }

    #[test]
    fn test_content_hash_depends_on_bytes() {
        assert_eq!(ContentHash::of(b"xyz"), ContentHash::of(b"xyz"));
        assert_ne!(ContentHash::of(b"xyz"), ContentHash::of(b"xyw"));
        assert!(ContentHash::of(b"").is_empty());
    }
}
