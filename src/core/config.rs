//=========================================================================
// Shell Configuration
//=========================================================================
//
// Compile-time style settings for the shell: window, pacing, readiness
// policy and asset-fetch behavior. Values are supplied through
// `ApplicationBuilder`; no file, flag or environment variable is read.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;
use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::render::Rgba;

//=== ReadinessPolicy =====================================================

/// Decides whether a failed fetch counts toward readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadinessPolicy {
    /// Only successful downloads count. A single permanently failing
    /// entry keeps the shell in the loading state forever.
    Strict,

    /// Every terminal resolution counts, success or failure. The shell
    /// becomes interactive with the failed assets absent.
    #[default]
    Relaxed,
}

//=== ShellConfig =========================================================

/// Settings consumed by the application runtime.
///
/// # Default Values
///
/// - **Window**: "Lumen Shell", 360x180
/// - **TPS**: 60.0
/// - **Channel capacity**: 128 events
/// - **Readiness policy**: [`ReadinessPolicy::Relaxed`]
/// - **Retries**: 0, spaced by 250ms
/// - **Fetch timeout**: none
/// - **Font size**: 50px
/// - **Background**: rgb(0, 100, 0)
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub window_title: String,
    pub window_size: (u32, u32),
    pub tps: f64,
    pub channel_capacity: usize,
    pub readiness_policy: ReadinessPolicy,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub fetch_timeout: Option<Duration>,
    /// Directory receiving each raw payload before it is decoded.
    pub persist_dir: Option<PathBuf>,
    pub font_px: f32,
    pub background: Rgba,
    /// PNG written on every presented frame.
    pub snapshot_path: Option<PathBuf>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            window_title: "Lumen Shell".to_string(),
            window_size: (360, 180),
            tps: 60.0,
            channel_capacity: 128,
            readiness_policy: ReadinessPolicy::default(),
            max_retries: 0,
            retry_delay: Duration::from_millis(250),
            fetch_timeout: None,
            persist_dir: None,
            font_px: 50.0,
            background: Rgba::rgb(0, 100, 0),
            snapshot_path: None,
        }
    }
}

impl ShellConfig {
    /// Checks the invariants the builder setters enforce.
    ///
    /// Returns a description of the first violated invariant.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.tps > 0.0) {
            return Err(format!("TPS must be positive, got {}", self.tps));
        }
        if self.channel_capacity == 0 {
            return Err("Channel capacity must be positive".to_string());
        }
        if self.window_size.0 == 0 || self.window_size.1 == 0 {
            return Err(format!(
                "Window size must be non-zero, got {}x{}",
                self.window_size.0, self.window_size.1
            ));
        }
        if !(self.font_px > 0.0) {
            return Err(format!("Font size must be positive, got {}", self.font_px));
        }
        Ok(())
    }

    /// Duration of one frame-loop tick.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tps)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ShellConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window_size, (360, 180));
        assert_eq!(config.readiness_policy, ReadinessPolicy::Relaxed);
        assert!(config.fetch_timeout.is_none());
    }

    #[test]
    fn zero_tps_is_rejected() {
        let config = ShellConfig {
            tps: 0.0,
            ..ShellConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("TPS must be positive"));
    }

    #[test]
    fn nan_font_size_is_rejected() {
        let config = ShellConfig {
            font_px: f32::NAN,
            ..ShellConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn frame_duration_matches_tps() {
        let config = ShellConfig {
            tps: 50.0,
            ..ShellConfig::default()
        };
        assert_eq!(config.frame_duration(), Duration::from_millis(20));
    }
}
