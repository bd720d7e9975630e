//=========================================================================
// Driver Contract
//=========================================================================
//
// The fixed capability set a game host requires from its platform driver.
//
// The host owns the loop and calls into the driver; the driver owns the
// window. Dependency inversion: host code holds `&mut dyn Driver` (or a
// `Box<dyn Driver>`) and never names a concrete adapter type, so the same
// host runs against desktop, mobile, or test drivers unchanged.
//
// Call ordering contract:
//   init() once  →  update() once per frame  →  getters as needed
//
//=========================================================================

//=== External Dependencies ===============================================

use std::ffi::c_void;

//=== Logical Screen Geometry =============================================

/// Fixed logical width of the driver's window, in DPI-independent units.
pub const SCREEN_WIDTH: i32 = 640;

/// Fixed logical height of the driver's window, in DPI-independent units.
pub const SCREEN_HEIGHT: i32 = 480;

/// Identity of the single synthetic touch slot. Stable across frames
/// while the press is held.
pub const SYNTHETIC_TOUCH_ID: i32 = 0;

//=== Driver ==============================================================

/// Platform capabilities a game host requires.
///
/// The driver has exactly two lifecycle states, *Uninitialized* and
/// *Ready*; [`init`](Driver::init) is the only forward transition and
/// there is no transition back. Every operation except `init`,
/// [`screen_width`](Driver::screen_width) and
/// [`screen_height`](Driver::screen_height) requires the *Ready* state;
/// violating the ordering is a programmer error and implementations fail
/// loudly (panic with a descriptive message) rather than guessing.
///
/// # Examples
///
/// A minimal host loop:
/// ```no_run
/// use portico::{DesktopDriver, Driver};
///
/// let mut driver = DesktopDriver::new();
/// if !driver.init() {
///     eprintln!("platform unavailable");
///     return;
/// }
///
/// loop {
///     driver.update(&mut || {
///         // draw the frame here, using driver.opengl_function()
///         // to resolve GL entry points
///     });
///
///     if driver.touch_count() == 1 {
///         let (mut x, mut y) = (0, 0);
///         driver.touch(0, None, Some(&mut x), Some(&mut y));
///         // feed (x, y) to touch-oriented game logic
///     }
/// }
/// ```
pub trait Driver {
    /// Initializes the windowing subsystem and creates the window.
    ///
    /// On success: a fixed-size 640×480 logical window exists with an
    /// OpenGL 2.1-compatible context current on the calling thread,
    /// vsync enabled (swap interval 1), and the device pixel ratio
    /// measured. Returns `true`.
    ///
    /// On failure: returns `false` and the driver remains *Uninitialized*
    /// with no retained resources — anything allocated during the failed
    /// attempt is released before returning.
    fn init(&mut self) -> bool;

    /// Runs one frame. Must be called exactly once per host frame after a
    /// successful [`init`](Driver::init).
    ///
    /// Side effects, in order:
    /// 1. drain and dispatch all pending OS input/window events
    ///    (non-blocking),
    /// 2. invoke `frame` synchronously (this is where the host draws),
    /// 3. present the framebuffer (buffer swap).
    ///
    /// Blocks only for the vsync wait during presentation. `frame` is NOT
    /// invoked if event draining fails catastrophically; that condition
    /// is fatal.
    fn update(&mut self, frame: &mut dyn FnMut());

    /// Fixed logical window width ([`SCREEN_WIDTH`]).
    fn screen_width(&self) -> i32;

    /// Fixed logical window height ([`SCREEN_HEIGHT`]).
    fn screen_height(&self) -> i32;

    /// Physical framebuffer pixels per logical unit, measured once at
    /// [`init`](Driver::init) and constant for the session.
    fn device_pixel_ratio(&self) -> f64;

    /// Resolves a named OpenGL entry point against the current context.
    ///
    /// Returns null — not an error — when the symbol does not exist;
    /// callers treat null as "extension unsupported". Only meaningful
    /// after `init` has made a context current.
    fn opengl_function(&self, name: &str) -> *const c_void;

    /// Number of active synthetic touches: 1 while the left mouse button
    /// is held, 0 otherwise. No other values occur.
    fn touch_count(&self) -> i32;

    /// Reads the active synthetic touch.
    ///
    /// Valid only when [`touch_count`](Driver::touch_count) returns 1 and
    /// `index == 0`; callers must guard with `touch_count` first. When
    /// valid, writes [`SYNTHETIC_TOUCH_ID`] through `id` and the cursor
    /// position in window-local logical coordinates, truncated toward
    /// zero, through `x` and `y`. A `None` output parameter means the
    /// caller declines that field; the remaining fields still populate.
    fn touch(
        &self,
        index: i32,
        id: Option<&mut i32>,
        x: Option<&mut i32>,
        y: Option<&mut i32>,
    );
}

//=========================================================================
// Unit Tests
//=========================================================================
