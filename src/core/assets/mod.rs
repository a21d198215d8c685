//=========================================================================
// Asset System
//=========================================================================
//
// Remote resources gating the frame loop.
//
// Architecture:
//   Manifest ──register()──> AssetStore <──put()/mark_completed()── AssetLoader
//                               │                                     │
//                          is_ready() ◄── FrameLoop ──pump()──────────┘
//
//=========================================================================

//=== Module Declarations =================================================

mod handle;
mod loader;
mod manifest;
mod store;

//=== Public API ==========================================================

pub use handle::{AssetHandle, Decoder, FontAsset, ImageAsset, StandardDecoder};
pub use loader::{AssetLoader, Fetcher, HttpFetcher, LoadOutcome, Progress};
pub use manifest::{AssetKind, Manifest, ManifestEntry};
pub use store::{AssetStore, FontRef, ImageRef};
