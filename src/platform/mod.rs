//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the frame thread via a bounded
// crossbeam channel.
//
// Architecture:
// ```text
//  Main Thread:                     Frame Thread:
//  ┌──────────────────────────┐    ┌──────────────────────┐
//  │  Winit Event Loop        │    │  FrameLoop::tick     │
//  │   ↓                      │    │   ↓                  │
//  │  InputProcessor          │    │  EventCollector      │
//  │   ├─ Converts Winit      │    │   (InputSource)      │
//  │   ├─ Tracks modifiers    │    │   ↓                  │
//  │   └─ Tracks cursor       │    │  Scene dispatch      │
//  │   ↓                      │    │   ↓                  │
//  │  InputBuffer             │    │  Scene render        │
//  │   ├─ discrete: Vec<>     │    └──────────────────────┘
//  │   └─ continuous: Set<>   │             ↑
//  │   ↓                      │             │
//  │  RedrawRequested (flush) │             │
//  │   ↓                      │             │
//  │  Bounded channel ────────┼─────────────┘
//  │                          │    PlatformEvent
//  │  Presenter (wgpu) <──────┼──── FrameSlot (latest pixmap)
//  └──────────────────────────┘
// ```
//
// Key Design Decisions:
// - **RedrawRequested = frame boundary**: all input buffered since the
//   previous boundary is sent as one message
// - **Never block the main thread**: the frame thread does not poll
//   input while loading, so a full channel drops the batch instead
// - **Shared quit signal**: closing the window requests quit directly;
//   the event loop exits as soon as quit is requested from anywhere,
//   including when the frame thread is gone and the channel disconnects
// - **Presentation on RedrawRequested**: the newest frame published by
//   the frame thread is copied into the window surface
// - **Main thread requirement**: Winit mandates main thread on macOS/iOS,
//   so this runs on the thread that called `Application::run()`
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;
mod presenter;

//=== External Crates =====================================================

use std::sync::Arc;

use crossbeam_channel::{Sender, TrySendError};
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes},
};

//=== Internal Imports ====================================================

use crate::core::error::PlatformError;
use crate::core::input::QuitSignal;
use crate::core::platform_bridge::PlatformEvent;
use crate::core::render::FrameSlot;
use input_buffer::InputBuffer;
use input_processor::InputProcessor;
use presenter::Presenter;

//=== WindowSettings ======================================================

/// Window attributes applied when the window is created.
#[derive(Debug, Clone)]
pub(crate) struct WindowSettings {
    pub(crate) title: String,
    pub(crate) size: (u32, u32),
}

//=== Platform ============================================================

/// Window manager and input event aggregator.
///
/// Runs on the main thread and sends batched events to the frame thread.
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(sender, quit, settings, frames)`
/// 2. **Execution**: `platform.run()` - blocks in the event loop
/// 3. **Event processing**: Winit calls `ApplicationHandler` methods
/// 4. **Shutdown**: window closed or quit requested → loop exits → `run` returns
///
/// # Thread Safety
///
/// Not `Send`; it must remain on the main thread. Communication with the
/// frame thread occurs exclusively via the channel and the quit signal.
pub(crate) struct Platform {
    /// OS window handle (None until `resumed()` called).
    window: Option<Arc<Window>>,

    settings: WindowSettings,

    /// Buffers discrete/continuous input until frame boundary.
    buffer: InputBuffer,

    event_sender: Sender<PlatformEvent>,

    quit: QuitSignal,

    input_processor: InputProcessor,

    /// Frames published by the frame thread.
    frames: FrameSlot,

    /// None until the window exists, or when no adapter can drive it.
    presenter: Option<Presenter>,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(
        event_sender: Sender<PlatformEvent>,
        quit: QuitSignal,
        settings: WindowSettings,
        frames: FrameSlot,
    ) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            settings,
            buffer: InputBuffer::new(),
            event_sender,
            quit,
            input_processor: InputProcessor::new(),
            frames,
            presenter: None,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window closes or quit is requested.
    ///
    /// # Errors
    ///
    /// [`PlatformError`] if the event loop cannot be created or fails.
    ///
    /// # Panics
    ///
    /// Winit panics if called off the main thread on macOS/iOS.
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;

        let result = event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution);

        // Whatever ended the loop, the frame thread must stop too
        self.quit.request();
        result
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends one event without ever blocking the main thread.
    ///
    /// A disconnected channel means the frame thread is gone, so quit is
    /// requested and the loop exits at the next `about_to_wait`.
    fn send(&self, event: PlatformEvent) {
        match self.event_sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(dropped)) => {
                debug!(target: "platform::input", "Channel full, dropping {:?}", dropped);
            }
            Err(TrySendError::Disconnected(_)) => {
                if self.quit.request() {
                    warn!(target: "platform", "Frame thread gone, requesting quit");
                }
            }
        }
    }

    /// Flushes buffered input events to the frame thread.
    ///
    /// Called on every `RedrawRequested`. Empty buffers are not sent.
    fn flush_input_buffer(&mut self) {
        if let Some((discrete, continuous)) = self.buffer.drain() {
            trace!(
                target: "platform::input",
                "Flushing {} discrete + {} continuous events",
                discrete.len(),
                continuous.len()
            );
            self.send(PlatformEvent::Inputs { discrete, continuous });
        }
    }

    /// Reports the close to the frame thread and stops the loop.
    fn close(&mut self, event_loop: &ActiveEventLoop) {
        self.flush_input_buffer();
        self.send(PlatformEvent::WindowClosed);
        if self.quit.request() {
            info!(target: "platform", "Quit requested by window close");
        }
        event_loop.exit();
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_deref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Creates the window on first activation (may repeat on mobile).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let (width, height) = self.settings.size;
        let attrs = WindowAttributes::default()
            .with_title(self.settings.title.clone())
            .with_inner_size(LogicalSize::new(width, height))
            .with_resizable(false);

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                let window = Arc::new(window);
                match Presenter::new(Arc::clone(&window)) {
                    Ok(presenter) => self.presenter = Some(presenter),
                    Err(e) => warn!(
                        target: "platform",
                        "Running without on-screen presentation: {}",
                        e
                    ),
                }
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.close(event_loop);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.close(event_loop);
            }

            WindowEvent::ModifiersChanged(state) => {
                trace!(target: "platform::input", "Modifiers changed: {:?}", state);
                self.input_processor.update_modifiers(state.state());
            }

            WindowEvent::CursorMoved { position, .. } => {
                // Logical pixels, matching the drawing surface
                let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                let logical = position.to_logical::<f64>(scale);
                let event = self
                    .input_processor
                    .process_mouse_move(logical.x as f32, logical.y as f32);
                self.buffer.push_continuous(event);
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let Some(event) = self.input_processor.process_key_event(key_event) {
                    self.buffer.push_discrete(event);
                } else {
                    trace!(target: "platform::input", "Unmapped key ignored");
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.input_processor.process_mouse_button(*button, *state);
                self.buffer.push_discrete(event);
            }

            WindowEvent::Resized(size) => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.resize(size.width, size.height);
                }
            }

            WindowEvent::RedrawRequested => {
                // Frame boundary: flush all buffered input
                self.flush_input_buffer();

                if let Some(presenter) = &mut self.presenter {
                    presenter.present_latest(&self.frames);
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }

    /// Stops the loop once quit was requested elsewhere (e.g. Escape).
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.quit.is_requested() {
            debug!(target: "platform", "Quit observed, leaving event loop");
            event_loop.exit();
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
