//=========================================================================
// Error Types
//=========================================================================
//
// Error taxonomy shared by the asset pipeline, scene registration,
// rendering backend and platform layer.
//
// Containment:
//   AssetError          → logged at the loader boundary, never propagated
//   ConfigurationError  → returned to the caller that misused the API
//   SceneError          → returned at registration time
//   RenderError         → fatal for the frame thread (surfaces the bug)
//   PlatformError       → fatal for the event loop
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::assets::AssetKind;
use crate::core::scene::EntityId;

//=== AssetError ==========================================================

/// Failure of a single manifest entry.
///
/// Never crosses the loader boundary as an `Err`: the loader logs it and
/// turns it into a terminal resolution according to the readiness policy.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Transport failure or non-2xx response.
    #[error("downloading {url} failed (status: {status:?}): {message}")]
    Network {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// Payload fetched but not parseable as the declared kind.
    #[error("decoding {name} as {kind:?} failed: {message}")]
    Decode {
        name: String,
        kind: AssetKind,
        message: String,
    },

    /// Writing the raw payload to the local persistence directory failed.
    #[error("persisting payload to {path:?} failed: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AssetError {
    /// Whether another fetch attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

//=== ConfigurationError ==================================================

/// Misuse of the manifest or the asset store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("a manifest has already been registered")]
    AlreadyRegistered,

    #[error("loading has already started")]
    LoadingStarted,

    #[error("no manifest has been registered")]
    NotRegistered,

    #[error("invalid asset location: {0}")]
    InvalidLocation(String),

    #[error("asset location has no file name: {0}")]
    EmptyKey(String),

    #[error("two manifest entries resolve to the same key: {0}")]
    DuplicateKey(String),
}

//=== SceneError ==========================================================

/// Misuse of the scene's listener chain or widget list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("entity {id:?} has no {capability} capability")]
    MissingCapability {
        id: EntityId,
        capability: &'static str,
    },

    #[error("entity {id:?} is already registered in the {list}")]
    AlreadyRegistered { id: EntityId, list: &'static str },

    #[error("unknown entity {0:?}")]
    UnknownEntity(EntityId),
}

//=== RenderError =========================================================

/// Rendering backend failure.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot create a {width}x{height} drawing surface")]
    SurfaceCreation { width: u32, height: u32 },

    #[error("presenting frame failed: {0}")]
    Present(String),
}

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// Event loop failures are fatal: if the event loop can't be created, the
/// shell cannot run. Presenter failures only disable on-screen output.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(#[source] winit::error::EventLoopError),

    #[error("event loop error: {0}")]
    EventLoopExecution(#[source] winit::error::EventLoopError),

    #[error("window surface creation failed: {0}")]
    SurfaceCreation(#[source] wgpu::CreateSurfaceError),

    #[error("no graphics adapter can present to the window")]
    NoAdapter,

    #[error("graphics device request failed: {0}")]
    DeviceRequest(#[source] wgpu::RequestDeviceError),

    #[error("window surface lacks {0}")]
    UnsupportedSurface(&'static str),
}

//=== ShellError ==========================================================

/// Top-level error returned by the application facade.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("cannot spawn the frame thread: {0}")]
    FrameThread(#[source] std::io::Error),

    /// A widget or listener panicked on the frame thread.
    #[error("frame thread panicked: {0}")]
    FrameThreadPanicked(String),
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_errors_are_retryable() {
        let err = AssetError::Network {
            url: "https://example.com/a.ttf".into(),
            status: Some(503),
            message: "Service Unavailable".into(),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn decode_errors_are_not_retryable() {
        let err = AssetError::Decode {
            name: "a.png".into(),
            kind: AssetKind::Image,
            message: "bad header".into(),
        };
        assert!(!err.is_retryable());
    }

    #[test]
    fn network_error_display_mentions_status() {
        let err = AssetError::Network {
            url: "https://example.com/a.ttf".into(),
            status: Some(404),
            message: "Not Found".into(),
        };
        let text = err.to_string();
        assert!(text.contains("404"));
        assert!(text.contains("https://example.com/a.ttf"));
    }

    #[test]
    fn shell_error_wraps_configuration_error() {
        let err: ShellError = ConfigurationError::AlreadyRegistered.into();
        assert!(matches!(
            err,
            ShellError::Configuration(ConfigurationError::AlreadyRegistered)
        ));
    }
}
