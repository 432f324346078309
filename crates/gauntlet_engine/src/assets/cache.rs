//! Content-addressed asset cache and shared handles

use super::{Asset, AssetError};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Shared, reference-counted handle to a cached asset
///
/// Handles stay valid for as long as any clone of them is alive; the cache
/// holds one clone, so repeated `create_asset` calls with the same path
/// observe the same record. A handle whose load failed is a placeholder:
/// `get()` returns `None` and `load_error()` explains why.
pub struct AssetHandle<T: Asset> {
    inner: Arc<AssetRecord<T>>,
}

struct AssetRecord<T> {
    path: PathBuf,
    payload: AssetPayload<T>,
}

enum AssetPayload<T> {
    Loaded(T),
    Missing(String),
}

impl<T: Asset> AssetHandle<T> {
    fn new(path: PathBuf, payload: AssetPayload<T>) -> Self {
        Self {
            inner: Arc::new(AssetRecord { path, payload }),
        }
    }

    /// Content address this handle was created from
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// The loaded descriptor, or `None` for a placeholder handle
    pub fn get(&self) -> Option<&T> {
        match &self.inner.payload {
            AssetPayload::Loaded(asset) => Some(asset),
            AssetPayload::Missing(_) => None,
        }
    }

    /// Why the asset is missing, if it failed to load
    pub fn load_error(&self) -> Option<&str> {
        match &self.inner.payload {
            AssetPayload::Loaded(_) => None,
            AssetPayload::Missing(reason) => Some(reason),
        }
    }

    /// True when this handle carries a placeholder instead of a loaded asset
    pub fn is_placeholder(&self) -> bool {
        self.get().is_none()
    }

    /// True when both handles refer to the same cached record
    pub fn same_record(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Asset> PartialEq for AssetHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.same_record(other)
    }
}

impl<T: Asset> Clone for AssetHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Asset> fmt::Debug for AssetHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetHandle")
            .field("kind", &T::KIND)
            .field("path", &self.inner.path)
            .field("placeholder", &self.is_placeholder())
            .finish()
    }
}

impl<T: Asset> serde::Serialize for AssetHandle<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.inner.path.to_string_lossy())
    }
}

impl<'de, T: Asset> serde::Deserialize<'de> for AssetHandle<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let path = String::deserialize(deserializer)?;
        Ok(cache().create_asset::<T>(path))
    }
}

/// Content-addressed cache keyed by `(asset type, path)`
pub struct AssetCache {
    entries: RwLock<HashMap<(TypeId, PathBuf), Box<dyn Any + Send + Sync>>>,
}

impl AssetCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Fetch or create the shared handle for `path`
    ///
    /// May be called many times with the same path; every call observes the
    /// same record. A load failure is reported once through the log and the
    /// resulting placeholder handle is cached like any other asset.
    pub fn create_asset<T: Asset>(&self, path: impl AsRef<Path>) -> AssetHandle<T> {
        let path = path.as_ref().to_path_buf();
        let key = (TypeId::of::<T>(), path.clone());

        let mut entries = self.entries.write().unwrap();
        if let Some(existing) = entries.get(&key).and_then(|slot| slot.downcast_ref::<AssetHandle<T>>()) {
            return existing.clone();
        }

        let payload = match T::load(&path) {
            Ok(asset) => {
                log::debug!("loaded {} asset {}", T::KIND, path.display());
                AssetPayload::Loaded(asset)
            }
            Err(err) => {
                log::warn!(
                    "{} asset {} unavailable, using placeholder: {}",
                    T::KIND,
                    path.display(),
                    err
                );
                AssetPayload::Missing(err.to_string())
            }
        };

        let handle = AssetHandle::new(path, payload);
        entries.insert(key, Box::new(handle.clone()));
        handle
    }

    /// Like `create_asset`, but surfaces the load failure to the caller
    ///
    /// The placeholder handle is still cached, so later `create_asset` calls
    /// for the same path resolve to it without retrying the load.
    pub fn try_create_asset<T: Asset>(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<AssetHandle<T>, AssetError> {
        let handle = self.create_asset::<T>(path);
        match handle.load_error() {
            None => Ok(handle),
            Some(reason) => Err(AssetError::LoadFailed {
                path: handle.path().to_path_buf(),
                reason: reason.to_string(),
            }),
        }
    }

    /// Register a generated (non-file) asset under a synthetic address
    ///
    /// Mirrors authored content that builds parametric meshes in memory:
    /// the record is shared and serializes by its synthetic address like any
    /// path-addressed asset. Replaces any previous record at that address.
    pub fn insert_generated<T: Asset>(&self, address: impl AsRef<Path>, asset: T) -> AssetHandle<T> {
        let path = address.as_ref().to_path_buf();
        let key = (TypeId::of::<T>(), path.clone());
        let handle = AssetHandle::new(path, AssetPayload::Loaded(asset));
        self.entries.write().unwrap().insert(key, Box::new(handle.clone()));
        handle
    }

    /// Number of cached records (placeholders included)
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// True when nothing has been cached yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AssetCache {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static::lazy_static! {
    static ref GLOBAL_CACHE: AssetCache = AssetCache::new();
}

/// Process-wide asset cache
///
/// The single creation authority for shared resources; serialized asset
/// handles re-resolve through this cache on deserialization.
pub fn cache() -> &'static AssetCache {
    &GLOBAL_CACHE
}

/// Fetch or create a shared handle from the process-wide cache
pub fn create_asset<T: Asset>(path: impl AsRef<Path>) -> AssetHandle<T> {
    cache().create_asset(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::types::Texture2D;

    #[test]
    fn test_same_path_returns_shared_record() {
        let cache = AssetCache::new();

        let first = cache.create_asset::<Texture2D>("textures/missing.png");
        let second = cache.create_asset::<Texture2D>("textures/missing.png");

        assert!(first.same_record(&second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_missing_file_produces_placeholder() {
        let cache = AssetCache::new();

        let handle = cache.create_asset::<Texture2D>("textures/definitely-not-here.png");

        assert!(handle.is_placeholder());
        assert!(handle.load_error().is_some());
        assert!(handle.get().is_none());
    }

    #[test]
    fn test_try_create_asset_surfaces_failure_but_caches_placeholder() {
        let cache = AssetCache::new();

        let result = cache.try_create_asset::<Texture2D>("textures/gone.png");
        assert!(matches!(result, Err(AssetError::LoadFailed { .. })));

        // The placeholder is still resolvable afterwards.
        let handle = cache.create_asset::<Texture2D>("textures/gone.png");
        assert!(handle.is_placeholder());
    }

    #[test]
    fn test_generated_assets_are_addressable() {
        let cache = AssetCache::new();

        let inserted = cache.insert_generated(
            "gen://tiled-plane",
            crate::assets::MeshResource::generated_plane(60.0, 20.0),
        );
        let fetched = cache.create_asset::<crate::assets::MeshResource>("gen://tiled-plane");

        assert!(inserted.same_record(&fetched));
        assert!(!fetched.is_placeholder());
    }
}
