//=========================================================================
// Platform Subsystem
//
// Desktop implementation of the host's Driver contract on Winit + glutin.
//
// Architecture:
// ```text
//  Host (owns the loop):             Driver (owns the window):
//  ┌─────────────────────────┐      ┌────────────────────────────┐
//  │  init() once            │─────▶│  EventLoop + Window + GL   │
//  │                         │      │  device pixel ratio fixed  │
//  │  per frame:             │      ├────────────────────────────┤
//  │  update(draw)           │─────▶│  pump_app_events (drain)   │
//  │    │                    │      │   ├─ CursorMoved ─┐        │
//  │    │                    │      │   └─ MouseInput ──┤        │
//  │    │                    │      │                   ▼        │
//  │    │                    │      │              PointerState  │
//  │    ├─ draw() callback   │◀─────│  (host draws here)         │
//  │    │                    │      │  swap_buffers (vsync wait) │
//  │                         │      ├────────────────────────────┤
//  │  touch_count()/touch()  │─────▶│  PointerState query        │
//  └─────────────────────────┘      └────────────────────────────┘
// ```
//
// Key Design Decisions:
// - **Host-driven pump**: the host calls `update()` once per frame, so
//   events are drained with `pump_app_events` (non-blocking) instead of
//   handing the loop to Winit's `run_app`
// - **Window created in `resumed`**: Winit delivers the first resume
//   during the init-time pump; creation failures land in `boot_error`
//   and surface as `init() == false` with nothing retained
// - **Two lifecycle states**: Uninitialized and Ready; `init` is the
//   only forward transition, `shutdown`/`Drop` the only teardown
// - **Main thread requirement**: Winit mandates the main thread on
//   macOS/iOS, so all driver calls happen on the thread that owns the
//   window and context
//
//=========================================================================

//=== Submodules ==========================================================

mod frame;
mod gl;
mod pointer;

//=== External Crates =====================================================

use std::time::Duration;

use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::driver::{Driver, SCREEN_HEIGHT, SCREEN_WIDTH};
use frame::PumpOutcome;
use gl::GlContext;
use pointer::PointerState;

//=== PlatformError =======================================================

/// Initialization errors. Surfaced to the host only as `init() == false`;
/// the detail is logged before the boolean is returned.
#[derive(Debug)]
pub(crate) enum PlatformError {
    /// Windowing subsystem unavailable (event loop creation failed).
    Subsystem(String),

    /// Window creation failed.
    Window(String),

    /// GL context creation or make-current failed.
    Context(String),

    /// Window surface creation or buffer swap failed.
    Surface(String),

    /// Swap interval could not be set.
    Vsync(String),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Subsystem(e) => write!(f, "Windowing subsystem unavailable: {}", e),
            Self::Window(e) => write!(f, "Window creation failed: {}", e),
            Self::Context(e) => write!(f, "OpenGL context failed: {}", e),
            Self::Surface(e) => write!(f, "Window surface failed: {}", e),
            Self::Vsync(e) => write!(f, "Swap interval rejected: {}", e),
        }
    }
}

impl std::error::Error for PlatformError {}

//=== ReadyState ==========================================================

/// Everything that exists only after a successful init.
///
/// Field order matters for teardown: the GL surface/context drop before
/// the window they are bound to.
struct ReadyState {
    gl: GlContext,
    window: Window,
    device_pixel_ratio: f64,
}

//=== DesktopApp ==========================================================

/// Winit-facing half of the driver: receives lifecycle and window events
/// during each pump and keeps the state the accessors read afterwards.
struct DesktopApp {
    ready: Option<ReadyState>,
    boot_error: Option<PlatformError>,
    pointer: PointerState,
}

impl DesktopApp {
    fn new() -> Self {
        Self {
            ready: None,
            boot_error: None,
            pointer: PointerState::new(),
        }
    }

    /// Discards all platform state (failed init cleanup, or teardown).
    fn reset(&mut self) {
        self.ready = None;
        self.boot_error = None;
        self.pointer.reset();
    }
}

impl ApplicationHandler for DesktopApp {
    /// First resume creates the window and GL context; later resumes
    /// (mobile-style suspend cycles) find them already present.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.ready.is_some() {
            debug!(target: "platform", "Window already exists (resume after suspend?)");
            return;
        }

        event_loop.set_control_flow(ControlFlow::Poll);

        let attrs = WindowAttributes::default()
            .with_title("portico")
            .with_inner_size(LogicalSize::new(SCREEN_WIDTH, SCREEN_HEIGHT))
            .with_resizable(false);

        match gl::create(event_loop, attrs) {
            Ok((window, gl)) => {
                // Ratio = physical framebuffer width over the fixed logical
                // width, measured once and frozen for the session.
                let framebuffer_width = window.inner_size().width;
                let device_pixel_ratio = f64::from(framebuffer_width) / f64::from(SCREEN_WIDTH);

                info!(
                    target: "platform",
                    "Window created: {}x{} logical @ {:.2}x pixel ratio",
                    SCREEN_WIDTH,
                    SCREEN_HEIGHT,
                    device_pixel_ratio
                );

                self.ready = Some(ReadyState {
                    gl,
                    window,
                    device_pixel_ratio,
                });
            }
            Err(e) => {
                error!(target: "platform", "Window/context creation failed: {}", e);
                self.boot_error = Some(e);
                event_loop.exit();
            }
        }
    }

    /// Tracks the pointer; everything else is outside the contract.
    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                // Winit reports physical pixels; the contract wants
                // window-local logical coordinates.
                let ratio = self.ready.as_ref().map_or(1.0, |r| r.device_pixel_ratio);
                let logical = position.to_logical::<f64>(ratio);
                self.pointer.set_position(logical.x, logical.y);
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                trace!(target: "platform::input", "Left button {:?}", state);
                self.pointer.set_left_button(state.is_pressed());
            }

            WindowEvent::CloseRequested => {
                // Loop termination is the host's responsibility; the
                // driver only observes the request.
                info!(target: "platform", "Window close requested (host owns the loop)");
            }

            _ => {
                // Ignore: Resized, Focused, RedrawRequested, other
                // buttons — none map to a driver capability.
            }
        }
    }
}

//=== DesktopDriver =======================================================

/// Desktop windowing driver implementing the host's [`Driver`] contract.
///
/// # Lifecycle
///
/// 1. **Construction**: `DesktopDriver::new()` — Uninitialized, no OS
///    resources held
/// 2. **Init**: `init()` — creates the event loop, window, and GL
///    context; `false` leaves the driver Uninitialized with nothing
///    retained
/// 3. **Frames**: `update(draw)` once per host frame
/// 4. **Teardown**: `shutdown()` or `Drop` releases the GL context, the
///    window, then the event loop
///
/// # Thread Safety
///
/// Not Send/Sync. Every call must come from the thread that ran `init()`
/// (the main thread on macOS/iOS), which is the thread the GL context is
/// current on.
pub struct DesktopDriver {
    /// OS event loop (None until a successful `init`).
    event_loop: Option<EventLoop<()>>,

    /// Winit-facing state: window, GL context, pointer tracking.
    app: DesktopApp,
}

impl DesktopDriver {
    //--- Construction -----------------------------------------------------

    /// Creates an uninitialized driver. No OS resources are touched
    /// until [`init`](Driver::init).
    pub fn new() -> Self {
        debug!(target: "platform", "Desktop driver created (uninitialized)");
        Self {
            event_loop: None,
            app: DesktopApp::new(),
        }
    }

    /// Whether a successful `init` has run (and no teardown since).
    pub fn is_initialized(&self) -> bool {
        self.event_loop.is_some() && self.app.ready.is_some()
    }

    //--- Teardown ---------------------------------------------------------

    /// Deterministically releases the GL context, the window, and the
    /// event loop. Idempotent; also runs on `Drop`.
    ///
    /// Note: some platforms refuse to create a second event loop in the
    /// same process, so a full init→shutdown→init cycle is OS-dependent.
    /// The driver itself retains nothing across the cycle.
    pub fn shutdown(&mut self) {
        if self.event_loop.is_none() && self.app.ready.is_none() {
            return;
        }
        if let Some(ready) = &self.app.ready {
            debug!(target: "platform", "Destroying window {:?}", ready.window.id());
        }
        info!(target: "platform", "Releasing GL context, window, and event loop");
        self.app.reset();
        self.event_loop = None;
    }

    //--- Internal Helpers -------------------------------------------------

    fn try_init(&mut self) -> Result<(), PlatformError> {
        let mut event_loop =
            EventLoop::new().map_err(|e| PlatformError::Subsystem(e.to_string()))?;

        // The first pump delivers the resume event; the window and GL
        // context are created inside `resumed`.
        let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut self.app);

        if let Some(e) = self.app.boot_error.take() {
            return Err(e);
        }
        if let PumpStatus::Exit(code) = status {
            return Err(PlatformError::Subsystem(format!(
                "event loop exited during startup (code {})",
                code
            )));
        }
        if self.app.ready.is_none() {
            return Err(PlatformError::Subsystem(
                "no resume event delivered during startup".to_string(),
            ));
        }

        self.event_loop = Some(event_loop);
        Ok(())
    }

    /// Ready-state access shared by the post-init accessors. Invalid
    /// call ordering is a programmer error; fail loudly, identically in
    /// every build profile.
    fn ready(&self) -> &ReadyState {
        match &self.app.ready {
            Some(ready) => ready,
            None => panic!("portico driver used before a successful init()"),
        }
    }
}

impl Default for DesktopDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DesktopDriver {
    fn drop(&mut self) {
        self.shutdown();
    }
}

//=== Driver Implementation ===============================================

impl Driver for DesktopDriver {
    fn init(&mut self) -> bool {
        if self.is_initialized() {
            warn!(target: "platform", "init() called twice; window already exists");
            return true;
        }

        match self.try_init() {
            Ok(()) => {
                info!(target: "platform", "Driver ready");
                true
            }
            Err(e) => {
                error!(target: "platform", "Initialization failed: {}", e);
                // No partial state may survive a failed attempt; the
                // next init starts from scratch.
                self.app.reset();
                self.event_loop = None;
                false
            }
        }
    }

    fn update(&mut self, frame: &mut dyn FnMut()) {
        let Some(event_loop) = self.event_loop.as_mut() else {
            panic!("update() called before a successful init()");
        };

        // The three frame phases share the driver state; run_frame hands
        // it to one phase at a time.
        struct FrameCx<'a> {
            event_loop: &'a mut EventLoop<()>,
            app: &'a mut DesktopApp,
            draw: &'a mut dyn FnMut(),
        }

        let mut cx = FrameCx {
            event_loop,
            app: &mut self.app,
            draw: frame,
        };

        let result = frame::run_frame(
            &mut cx,
            |cx| match cx
                .event_loop
                .pump_app_events(Some(Duration::ZERO), cx.app)
            {
                PumpStatus::Continue => PumpOutcome::Continue,
                PumpStatus::Exit(code) => PumpOutcome::Terminated(code),
            },
            |cx| (cx.draw)(),
            |cx| {
                if let Some(ready) = cx.app.ready.as_ref() {
                    if let Err(e) = ready.gl.swap_buffers() {
                        // Transient during OS-side window teardown.
                        error!(target: "platform", "Buffer swap failed: {}", e);
                    }
                }
            },
        );

        if let Err(e) = result {
            // Event draining failed catastrophically; the frame callback
            // was not invoked.
            panic!("fatal platform failure: {}", e);
        }
    }

    fn screen_width(&self) -> i32 {
        SCREEN_WIDTH
    }

    fn screen_height(&self) -> i32 {
        SCREEN_HEIGHT
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.ready().device_pixel_ratio
    }

    fn opengl_function(&self, name: &str) -> *const std::ffi::c_void {
        self.ready().gl.get_proc_address(name)
    }

    fn touch_count(&self) -> i32 {
        let _ready = self.ready();
        self.app.pointer.touch_count()
    }

    fn touch(
        &self,
        index: i32,
        id: Option<&mut i32>,
        x: Option<&mut i32>,
        y: Option<&mut i32>,
    ) {
        let _ready = self.ready();
        self.app.pointer.read_touch(index, id, x, y);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
//
// Window and event loop creation need a live display server (and the
// main thread), so these tests exercise the lifecycle machinery around
// them: the Uninitialized state, the call-ordering guards, teardown
// idempotence, and the error surface.
//
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //=====================================================================
    // Lifecycle Tests
    //=====================================================================

    #[test]
    fn new_driver_is_uninitialized() {
        let driver = DesktopDriver::new();
        assert!(!driver.is_initialized());
        assert!(driver.app.ready.is_none(), "no window before init");
        assert!(driver.app.boot_error.is_none());
    }

    #[test]
    fn default_matches_new() {
        let driver = DesktopDriver::default();
        assert!(!driver.is_initialized());
    }

    #[test]
    fn screen_constants_do_not_require_init() {
        // Fixed constants, callable in any state.
        let driver = DesktopDriver::new();
        assert_eq!(driver.screen_width(), 640);
        assert_eq!(driver.screen_height(), 480);
    }

    #[test]
    fn shutdown_on_uninitialized_driver_is_noop() {
        let mut driver = DesktopDriver::new();
        driver.shutdown();
        driver.shutdown();
        assert!(!driver.is_initialized());
    }

    #[test]
    fn reset_discards_partial_state() {
        let mut driver = DesktopDriver::new();
        driver.app.boot_error = Some(PlatformError::Window("simulated".to_string()));
        driver.app.pointer.set_left_button(true);

        driver.app.reset();

        assert!(driver.app.boot_error.is_none());
        assert_eq!(driver.app.pointer.touch_count(), 0);
    }

    //=====================================================================
    // Call-Ordering Guards
    //=====================================================================

    #[test]
    #[should_panic(expected = "before a successful init()")]
    fn device_pixel_ratio_before_init_panics() {
        let driver = DesktopDriver::new();
        let _ = driver.device_pixel_ratio();
    }

    #[test]
    #[should_panic(expected = "before a successful init()")]
    fn update_before_init_panics() {
        let mut driver = DesktopDriver::new();
        driver.update(&mut || {});
    }

    #[test]
    #[should_panic(expected = "before a successful init()")]
    fn opengl_function_before_init_panics() {
        let driver = DesktopDriver::new();
        let _ = driver.opengl_function("glClear");
    }

    #[test]
    #[should_panic(expected = "before a successful init()")]
    fn touch_count_before_init_panics() {
        let driver = DesktopDriver::new();
        let _ = driver.touch_count();
    }

    #[test]
    #[should_panic(expected = "before a successful init()")]
    fn touch_before_init_panics() {
        let driver = DesktopDriver::new();
        driver.touch(0, None, None, None);
    }

    //=====================================================================
    // PlatformError Tests
    //=====================================================================

    #[test]
    fn platform_error_is_error_trait() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<PlatformError>();
    }

    #[test]
    fn platform_error_display_formats() {
        let cases = [
            (
                PlatformError::Subsystem("no display".to_string()),
                "Windowing subsystem unavailable: no display",
            ),
            (
                PlatformError::Window("denied".to_string()),
                "Window creation failed: denied",
            ),
            (
                PlatformError::Context("2.1 unsupported".to_string()),
                "OpenGL context failed: 2.1 unsupported",
            ),
            (
                PlatformError::Surface("lost".to_string()),
                "Window surface failed: lost",
            ),
            (
                PlatformError::Vsync("fixed interval".to_string()),
                "Swap interval rejected: fixed interval",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }
}
