//=========================================================================
// Asset Store
//=========================================================================
//
// Named decoded handles plus the readiness gate.
//
// Architecture:
//   AssetStore
//     ├─ handles: Mutex<HashMap<String, Arc<AssetHandle>>>
//     ├─ required: fixed by register()
//     └─ completed / failed: AtomicUsize
//
// Invariant: is_ready() ⇔ completed >= required. `completed` only moves
// forward, so readiness never reverts, even past an extra completion.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use parking_lot::Mutex;

//=== Internal Dependencies ===============================================

use super::{AssetHandle, FontAsset, ImageAsset, Manifest};
use crate::core::error::ConfigurationError;

//=== AssetStore ==========================================================

/// Thread-safe owner of every decoded asset.
///
/// Mutations take a single lock around the map; readiness is read from
/// atomics so the frame loop can poll it every tick without contention.
#[derive(Debug, Default)]
pub struct AssetStore {
    handles: Mutex<HashMap<String, Arc<AssetHandle>>>,
    registration: Mutex<()>,
    required: AtomicUsize,
    completed: AtomicUsize,
    failed: AtomicUsize,
    registered: AtomicBool,
    loading_started: AtomicBool,
}

impl AssetStore {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self::default()
    }

    //--- Registration -----------------------------------------------------

    /// Fixes the required count from a validated manifest.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::AlreadyRegistered`] on a second call,
    /// [`ConfigurationError::LoadingStarted`] once loading has begun, or
    /// any manifest validation error.
    pub fn register(&self, manifest: &Manifest) -> Result<(), ConfigurationError> {
        let _guard = self.registration.lock();

        if self.loading_started.load(Ordering::Acquire) {
            return Err(ConfigurationError::LoadingStarted);
        }
        if self.registered.load(Ordering::Acquire) {
            return Err(ConfigurationError::AlreadyRegistered);
        }
        manifest.validate()?;

        // `required` must be visible before `registered` is
        self.required.store(manifest.len(), Ordering::Release);
        self.registered.store(true, Ordering::Release);

        info!(target: "assets", "Manifest registered: {} required assets", manifest.len());
        Ok(())
    }

    /// Marks the start of loading; later registrations are rejected.
    pub(crate) fn begin_loading(&self) -> Result<(), ConfigurationError> {
        if !self.registered.load(Ordering::Acquire) {
            return Err(ConfigurationError::NotRegistered);
        }
        if self.loading_started.swap(true, Ordering::AcqRel) {
            return Err(ConfigurationError::LoadingStarted);
        }
        Ok(())
    }

    //--- Mutation ---------------------------------------------------------

    /// Inserts or overwrites a handle. Does not touch the completion count.
    pub fn put(&self, name: impl Into<String>, handle: AssetHandle) {
        let name = name.into();
        debug!(target: "assets", "Storing {:?} handle '{}'", handle.kind(), name);

        if self.handles.lock().insert(name.clone(), Arc::new(handle)).is_some() {
            warn!(target: "assets", "Handle '{}' was already stored and has been replaced", name);
        }
    }

    /// Records one terminal resolution.
    pub fn mark_completed(&self) {
        let completed = self.completed.fetch_add(1, Ordering::AcqRel) + 1;
        let required = self.required.load(Ordering::Acquire);

        if completed > required {
            warn!(
                target: "assets",
                "Completion count {} exceeds required {}",
                completed,
                required
            );
        } else if completed == required {
            info!(target: "assets", "All {} assets resolved", required);
        }
    }

    /// Records a failed resolution for diagnostics only.
    pub(crate) fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::AcqRel);
    }

    //--- Queries ----------------------------------------------------------

    /// Readiness gate. Side-effect free; safe to call every frame.
    ///
    /// A store that was never registered is not ready.
    pub fn is_ready(&self) -> bool {
        self.registered.load(Ordering::Acquire)
            && self.completed.load(Ordering::Acquire) >= self.required.load(Ordering::Acquire)
    }

    /// Looks up a handle. Absence is a valid state callers must handle.
    pub fn get(&self, name: &str) -> Option<Arc<AssetHandle>> {
        self.handles.lock().get(name).cloned()
    }

    /// Looks up a font; `None` if absent or not a font.
    pub fn font(&self, name: &str) -> Option<FontRef> {
        self.get(name).filter(|h| h.as_font().is_some()).map(FontRef)
    }

    /// Looks up an image; `None` if absent or not an image.
    pub fn image(&self, name: &str) -> Option<ImageRef> {
        self.get(name).filter(|h| h.as_image().is_some()).map(ImageRef)
    }

    pub fn required(&self) -> usize {
        self.required.load(Ordering::Acquire)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::Acquire)
    }

    /// Fraction of required entries resolved, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        match self.required() {
            0 => 1.0,
            required => (self.completed().min(required) as f32) / (required as f32),
        }
    }

    /// Number of stored handles.
    pub fn len(&self) -> usize {
        self.handles.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//=== Typed References ====================================================

/// Shared reference to a stored font handle.
#[derive(Debug, Clone)]
pub struct FontRef(Arc<AssetHandle>);

impl std::ops::Deref for FontRef {
    type Target = FontAsset;

    fn deref(&self) -> &FontAsset {
        match self.0.as_ref() {
            AssetHandle::Font(font) => font,
            AssetHandle::Image(_) => unreachable!("FontRef is only built from font handles"),
        }
    }
}

/// Shared reference to a stored image handle.
#[derive(Debug, Clone)]
pub struct ImageRef(Arc<AssetHandle>);

impl std::ops::Deref for ImageRef {
    type Target = ImageAsset;

    fn deref(&self) -> &ImageAsset {
        match self.0.as_ref() {
            AssetHandle::Image(image) => image,
            AssetHandle::Font(_) => unreachable!("ImageRef is only built from image handles"),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
