//=========================================================================
// Lumen Shell Application
//
// Main entry point and owner of every shell subsystem.
//
// Architecture:
// ```text
//   ApplicationBuilder ──build()──> Application ──run()──> [Runtime]
//         │                             │
//         ├─ with_config()/with_tps()   ├─ AssetStore + AssetLoader
//         ├─ with_manifest()            ├─ Scene
//         └─ with_entity()              ├─ FrameLoop
//                                       └─ PixmapSurface
// ```
//
// Runtime:
//   main thread  → Platform (winit event loop)
//   frame thread → FrameLoop::tick at fixed TPS until quit
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::bounded;
use log::{error, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::assets::{
    AssetLoader, AssetStore, Decoder, Fetcher, HttpFetcher, Manifest, StandardDecoder,
};
use crate::core::config::{ReadinessPolicy, ShellConfig};
use crate::core::error::{RenderError, ShellError};
use crate::core::frame_loop::{Frame, FrameLoop, FrameState, InputSource};
use crate::core::input::{DispatchContext, QuitSignal};
use crate::core::platform_bridge::EventCollector;
use crate::core::render::{FrameSlot, PixmapSurface};
use crate::core::scene::{Entity, Scene};
use crate::platform::{Platform, WindowSettings};

//=== ApplicationBuilder ==================================================

/// Builder for configuring and constructing an [`Application`].
///
/// # Default Values
///
/// See [`ShellConfig`]. The manifest and scene start empty.
///
/// # Examples
///
/// ```no_run
/// use lumen_shell::prelude::*;
///
/// let manifest = Manifest::new()
///     .font("https://example.com/fonts/UbuntuMono-Regular.ttf");
///
/// ApplicationBuilder::new()
///     .with_tps(120.0)
///     .with_manifest(manifest)
///     .with_entity(QuitOnEscape)
///     .with_entity(Button::new(Rect::new(130, 70, 100, 40), "ok", "UbuntuMono-Regular.ttf"))
///     .build()?
///     .run()?;
/// # Ok::<(), ShellError>(())
/// ```
pub struct ApplicationBuilder {
    config: ShellConfig,
    manifest: Manifest,
    scene: Scene,
    fetcher: Option<Arc<dyn Fetcher>>,
    decoder: Option<Arc<dyn Decoder>>,
}

impl ApplicationBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ShellConfig::default(),
            manifest: Manifest::new(),
            scene: Scene::new(),
            fetcher: None,
            decoder: None,
        }
    }

    //--- Configuration ----------------------------------------------------

    /// Replaces every setting at once. Checked again by [`build`](Self::build).
    pub fn with_config(mut self, config: ShellConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the target ticks per second for the frame thread.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.config.tps = tps;
        self
    }

    /// Sets the channel capacity for platform → frame thread input.
    ///
    /// Batches arriving while the channel is full are dropped.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.config.channel_capacity = capacity;
        self
    }

    /// Sets the window title and the window/surface size.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window(mut self, title: impl Into<String>, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Window size must be non-zero");
        self.config.window_title = title.into();
        self.config.window_size = (width, height);
        self
    }

    pub fn with_readiness_policy(mut self, policy: ReadinessPolicy) -> Self {
        self.config.readiness_policy = policy;
        self
    }

    /// Extra attempts per asset after a retryable failure.
    pub fn with_retries(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.config.max_retries = max_retries;
        self.config.retry_delay = retry_delay;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.config.fetch_timeout = Some(timeout);
        self
    }

    /// Writes every raw payload under `dir` before decoding it.
    pub fn with_persist_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.persist_dir = Some(dir.into());
        self
    }

    /// Writes each presented frame to `path` as a PNG.
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.snapshot_path = Some(path.into());
        self
    }

    //--- Content ----------------------------------------------------------

    /// Declares the assets required before the shell becomes interactive.
    pub fn with_manifest(mut self, manifest: Manifest) -> Self {
        self.manifest = manifest;
        self
    }

    /// Adds an entity to every scene list its capabilities allow.
    pub fn with_entity(mut self, entity: impl Entity + 'static) -> Self {
        self.scene.add(entity);
        self
    }

    /// Replaces the scene built so far.
    pub fn with_scene(mut self, scene: Scene) -> Self {
        self.scene = scene;
        self
    }

    /// Overrides how payloads are retrieved (default: HTTP).
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Overrides how payloads are decoded (default: fontdue + image).
    pub fn with_decoder(mut self, decoder: Arc<dyn Decoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    //--- Build ------------------------------------------------------------

    /// Registers the manifest, starts every download and creates the
    /// drawing surface.
    ///
    /// # Errors
    ///
    /// [`ShellError::Configuration`] for an invalid manifest,
    /// [`ShellError::Render`] if the surface cannot be created.
    ///
    /// # Panics
    ///
    /// Panics if the configuration violates an invariant the setters
    /// enforce (e.g. a non-positive TPS passed through `with_config`).
    pub fn build(self) -> Result<Application, ShellError> {
        if let Err(message) = self.config.validate() {
            panic!("{}", message);
        }
        let config = self.config;

        info!(
            target: "runtime",
            "Building application (TPS: {}, channel: {}, policy: {:?})",
            config.tps,
            config.channel_capacity,
            config.readiness_policy
        );

        let assets = AssetStore::new();
        assets.register(&self.manifest)?;

        let mut loader = match (self.fetcher, self.decoder) {
            (None, None) => AssetLoader::from_config(&config),
            (fetcher, decoder) => {
                let fetcher: Arc<dyn Fetcher> = match fetcher {
                    Some(fetcher) => fetcher,
                    None => Arc::new(HttpFetcher::new(config.fetch_timeout)),
                };
                let decoder: Arc<dyn Decoder> = match decoder {
                    Some(decoder) => decoder,
                    None => Arc::new(StandardDecoder::new(config.font_px)),
                };
                AssetLoader::new(fetcher, decoder)
                    .with_policy(config.readiness_policy)
                    .with_retries(config.max_retries, config.retry_delay)
                    .with_persist_dir(config.persist_dir.clone())
            }
        };
        loader.start(&self.manifest, &assets)?;

        let (width, height) = config.window_size;
        let frames = FrameSlot::new();
        let surface = PixmapSurface::new(width, height)?
            .with_snapshot_path(config.snapshot_path.clone())
            .with_frame_slot(frames.clone());

        let quit = QuitSignal::new();

        Ok(Application {
            dispatch: DispatchContext::new(quit.clone()),
            quit,
            assets,
            loader,
            scene: self.scene,
            frame_loop: FrameLoop::new(),
            surface,
            frames,
            config,
        })
    }
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Application =========================================================

/// Lumen Shell runtime.
///
/// Owns the asset store, scene and frame loop directly; nothing is
/// reachable through globals.
///
/// # Architecture
///
/// ```text
/// Application
///   ├─► Frame thread (@ TPS)
///   │     └─► FrameLoop::tick → AssetLoader::pump | Scene dispatch + render
///   │
///   └─► Platform (main thread event loop)
///         └─► Window, input polling, presentation
///
/// Communication: bounded crossbeam channel (PlatformEvent), QuitSignal
/// and FrameSlot (frame thread → window)
/// ```
pub struct Application {
    config: ShellConfig,
    assets: AssetStore,
    loader: AssetLoader,
    scene: Scene,
    frame_loop: FrameLoop,
    surface: PixmapSurface,
    frames: FrameSlot,
    dispatch: DispatchContext,
    quit: QuitSignal,
}

impl Application {
    //--- Accessors --------------------------------------------------------

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn surface(&self) -> &PixmapSurface {
        &self.surface
    }

    pub fn state(&self) -> FrameState {
        self.frame_loop.state()
    }

    /// Handle to the shared quit request.
    pub fn quit_signal(&self) -> QuitSignal {
        self.quit.clone()
    }

    //--- Execution --------------------------------------------------------

    /// Runs a single frame-loop tick against `input`.
    ///
    /// Headless drivers call this directly; [`run`](Self::run) calls it at
    /// the configured TPS.
    pub fn tick(&mut self, input: &mut dyn InputSource) -> Result<FrameState, RenderError> {
        let state = self.frame_loop.tick(Frame {
            assets: &self.assets,
            loader: Some(&mut self.loader),
            input,
            scene: &mut self.scene,
            surface: &mut self.surface,
            dispatch: &mut self.dispatch,
            background: self.config.background,
        })?;

        for ack in self.dispatch.take_acknowledgements() {
            info!(target: "runtime", "{} (entity {:?})", ack.label, ack.entity);
        }
        Ok(state)
    }

    /// Starts the runtime and blocks until the application exits.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the bounded platform → frame channel
    /// 2. Spawns the frame thread ticking at the configured TPS
    /// 3. Runs the platform event loop on this thread (blocks here)
    /// 4. Quit requested (Escape, window close, render failure) →
    ///    platform exits → frame thread stops → joined here
    ///
    /// # Errors
    ///
    /// Platform failures, a fatal render error from the frame thread, a
    /// panic on that thread, or failure to spawn it.
    pub fn run(self) -> Result<(), ShellError> {
        let tps = self.config.tps;
        let capacity = self.config.channel_capacity;
        let settings = WindowSettings {
            title: self.config.window_title.clone(),
            size: self.config.window_size,
        };
        let quit = self.quit.clone();
        let frames = self.frames.clone();

        info!(target: "runtime", "Starting runtime (TPS: {})", tps);

        //--- 1. Create communication channel -----------------------------
        let (tx, rx) = bounded(capacity);

        //--- 2. Spawn the frame thread -----------------------------------
        let frame_handle = thread::Builder::new()
            .name("frame-loop".into())
            .spawn(move || self.frame_thread(EventCollector::new(rx)))
            .map_err(ShellError::FrameThread)?;

        //--- 3. Run the platform on this thread --------------------------
        let platform_result = Platform::new(tx, quit.clone(), settings, frames).run();
        if let Err(e) = &platform_result {
            error!(target: "runtime", "Platform error: {}", e);
        }
        quit.request();
        info!(target: "runtime", "Platform event loop exited");

        //--- 4. Wait for the frame thread --------------------------------
        let frame_result = Self::join_frame_thread(frame_handle);

        info!(target: "runtime", "Shutdown complete");
        platform_result?;
        frame_result
    }

    /// A panic on the frame thread is a programming error in a widget or
    /// listener and is reported, never swallowed.
    fn join_frame_thread(handle: JoinHandle<Result<(), RenderError>>) -> Result<(), ShellError> {
        match handle.join() {
            Ok(result) => result.map_err(ShellError::from),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(target: "runtime", "Frame thread panicked: {}", message);
                Err(ShellError::FrameThreadPanicked(message))
            }
        }
    }

    /// Fixed-rate tick loop: tick, then sleep the rest of the frame budget.
    fn frame_thread(mut self, mut collector: EventCollector) -> Result<(), RenderError> {
        let frame_duration = self.config.frame_duration();
        let _stop = StopOnExit(self.quit.clone());

        loop {
            let frame_start = Instant::now();

            if self.quit.is_requested() {
                info!(target: "runtime", "Quit requested, frame thread exiting");
                return Ok(());
            }

            if let Err(e) = self.tick(&mut collector) {
                error!(target: "runtime", "Fatal render error: {}", e);
                self.quit.request();
                return Err(e);
            }

            if collector.is_disconnected() {
                warn!(target: "runtime", "Platform gone, frame thread exiting");
                self.quit.request();
                return Ok(());
            }

            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                thread::sleep(frame_duration - elapsed);
            }
        }
    }
}

//=== Frame Thread Helpers ================================================

/// Requests quit when the frame thread ends, including by unwinding.
struct StopOnExit(QuitSignal);

impl Drop for StopOnExit {
    fn drop(&mut self) {
        if self.0.request() && thread::panicking() {
            error!(target: "runtime", "Frame thread unwinding, quit requested");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ConfigurationError;
    use crate::core::input::{InputEvent, KeyCode, MouseButton, QuitOnEscape};
    use crate::core::platform_bridge::PlatformEvent;
    use crate::core::render::{Rect, RenderSurface, Rgba};
    use crate::core::testing::{minimal_font_bytes, ScriptedInput, StaticFetcher};
    use crate::core::widget::{Button, Widget};
    use crossbeam_channel::unbounded;

    /// Widget whose render panics, standing in for a buggy user widget.
    struct Boom;

    impl Widget for Boom {
        fn rect(&self) -> Rect {
            Rect::new(0, 0, 1, 1)
        }

        fn render(&self, _surface: &mut dyn RenderSurface, _assets: &AssetStore) {
            panic!("boom widget exploded");
        }
    }

    impl Entity for Boom {
        fn widget(&self) -> Option<&dyn Widget> {
            Some(self)
        }
    }

    const FONT_URL: &str = "https://fonts.test/ubuntumono/UbuntuMono-Regular.ttf";
    const FONT: &str = "UbuntuMono-Regular.ttf";

    fn demo_builder(fetcher: StaticFetcher) -> ApplicationBuilder {
        ApplicationBuilder::new()
            .with_manifest(Manifest::new().font(FONT_URL))
            .with_fetcher(Arc::new(fetcher))
            .with_entity(QuitOnEscape)
            .with_entity(
                Button::new(Rect::new(130, 70, 100, 40), "bųțțøñ", FONT).with_border(1),
            )
    }

    fn tick_until_running(app: &mut Application, input: &mut dyn InputSource) -> FrameState {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut state = app.tick(input).unwrap();
        while state == FrameState::Loading && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(2));
            state = app.tick(input).unwrap();
        }
        state
    }

    //=====================================================================
    // ApplicationBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = ApplicationBuilder::new();
        assert_eq!(builder.config.tps, 60.0);
        assert_eq!(builder.config.channel_capacity, 128);
        assert!(builder.manifest.is_empty());
        assert!(builder.scene.is_empty());
    }

    #[test]
    fn builder_with_tps() {
        let builder = ApplicationBuilder::new().with_tps(120.0);
        assert_eq!(builder.config.tps, 120.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_zero() {
        ApplicationBuilder::new().with_tps(0.0);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        ApplicationBuilder::new().with_channel_capacity(0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn build_revalidates_config() {
        let config = ShellConfig {
            tps: -1.0,
            ..ShellConfig::default()
        };
        let _ = ApplicationBuilder::new().with_config(config).build();
    }

    #[test]
    fn build_rejects_invalid_manifest() {
        let result = ApplicationBuilder::new()
            .with_manifest(Manifest::new().font("not a url"))
            .build();
        assert!(matches!(
            result,
            Err(ShellError::Configuration(ConfigurationError::InvalidLocation(_)))
        ));
    }

    #[test]
    fn builder_with_entity_registers_capabilities() {
        let app = demo_builder(StaticFetcher::new()).build().unwrap();
        assert_eq!(app.scene().len(), 2);
        assert_eq!(app.scene().listeners().len(), 2);
        assert_eq!(app.scene().widgets().len(), 1);
    }

    //=====================================================================
    // Headless Runtime Tests
    //=====================================================================

    #[test]
    fn font_download_unlocks_running_and_draws_background() {
        let mut app = demo_builder(StaticFetcher::new().ok(FONT_URL, minimal_font_bytes()))
            .build()
            .unwrap();
        let mut input = ScriptedInput::default();

        assert_eq!(tick_until_running(&mut app, &mut input), FrameState::Running);
        assert!(app.assets().font(FONT).is_some());
        assert_eq!(app.surface().frames_presented(), 1);
        assert_eq!(app.surface().pixel(5, 5), Some(Rgba::rgb(0, 100, 0)));
        assert_eq!(app.surface().pixel(130, 70), Some(Button::BORDER_COLOR));
        assert_eq!(app.surface().pixel(180, 72), Some(Button::FACE_COLOR));
    }

    #[test]
    fn strict_policy_with_missing_font_never_renders() {
        let mut app = demo_builder(StaticFetcher::new().status(FONT_URL, 404))
            .with_readiness_policy(ReadinessPolicy::Strict)
            .build()
            .unwrap();
        let mut input = ScriptedInput::default();

        for _ in 0..20 {
            assert_eq!(app.tick(&mut input).unwrap(), FrameState::Loading);
            thread::sleep(Duration::from_millis(2));
        }
        assert_eq!(app.surface().frames_presented(), 0);
        assert_eq!(app.assets().failed(), 1);
    }

    #[test]
    fn escape_requests_quit_through_shared_signal() {
        let mut app = demo_builder(StaticFetcher::new().status(FONT_URL, 404))
            .build()
            .unwrap();
        let quit = app.quit_signal();
        let mut input = ScriptedInput::new(vec![vec![
            InputEvent::pointer_down(131.0, 71.0, MouseButton::Left),
            InputEvent::key_down(KeyCode::Escape),
        ]]);

        tick_until_running(&mut app, &mut input);

        assert!(quit.is_requested());
    }

    #[test]
    fn presented_frames_reach_the_window_slot() {
        let mut app = demo_builder(StaticFetcher::new().ok(FONT_URL, minimal_font_bytes()))
            .build()
            .unwrap();
        let frames = app.frames.clone();
        let mut input = ScriptedInput::default();

        tick_until_running(&mut app, &mut input);

        let (generation, first) = frames
            .read_newer(0, |f| (f.width, f.height, f.pixels[..4].to_vec()))
            .unwrap();
        assert_eq!(generation, 1);
        assert_eq!(first, (360, 180, vec![0, 100, 0, 255]));
    }

    //=====================================================================
    // Frame Thread Failure Tests
    //=====================================================================

    #[test]
    fn panicking_widget_requests_quit_and_surfaces_error() {
        let app = ApplicationBuilder::new().with_entity(Boom).build().unwrap();
        let quit = app.quit_signal();
        let (tx, rx) = unbounded::<PlatformEvent>();

        let handle = thread::spawn(move || app.frame_thread(EventCollector::new(rx)));
        let result = Application::join_frame_thread(handle);

        assert!(quit.is_requested(), "platform must be told to stop");
        match result {
            Err(ShellError::FrameThreadPanicked(message)) => {
                assert_eq!(message, "boom widget exploded");
            }
            other => panic!("expected FrameThreadPanicked, got {:?}", other),
        }
        drop(tx);
    }

    #[test]
    fn clean_frame_thread_exit_joins_ok() {
        let app = ApplicationBuilder::new().build().unwrap();
        app.quit_signal().request();
        let (_tx, rx) = unbounded::<PlatformEvent>();

        let handle = thread::spawn(move || app.frame_thread(EventCollector::new(rx)));

        assert!(Application::join_frame_thread(handle).is_ok());
    }

    #[test]
    fn panic_message_handles_payload_types() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let borrowed: Box<dyn Any + Send> = Box::new("borrowed");
        let other: Box<dyn Any + Send> = Box::new(7_u8);

        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(borrowed.as_ref()), "borrowed");
        assert_eq!(panic_message(other.as_ref()), "non-string panic payload");
    }
}
