//=========================================================================
// OpenGL Context
//=========================================================================
//
// Window + GL context creation and the per-frame presentation surface.
//
// Flow:
//   DisplayBuilder (window + config) → create_context (GL 2.1 compat)
//     → window surface → make_current → swap interval 1
//
// The host contract pins the context to OpenGL 2.1 compatibility and
// vsync on; both are established here, once, at init. Symbol resolution
// goes through the display's loader, which returns null for unknown
// entry points (the host treats null as "extension unsupported").
//
//=========================================================================

//=== External Dependencies ===============================================

use std::ffi::{c_void, CString};
use std::num::NonZeroU32;

use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentGlContext, PossiblyCurrentContext, Version,
};
use glutin::display::{Display, GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::DisplayBuilder;
use log::*;
use winit::event_loop::ActiveEventLoop;
use winit::raw_window_handle::HasWindowHandle;
use winit::window::{Window, WindowAttributes};

//=== Internal Dependencies ===============================================

use super::PlatformError;

//=== GlContext ===========================================================

/// The driver's GL state: display connection, window surface, and the
/// context made current at creation. Exclusively owned, never recreated.
pub(crate) struct GlContext {
    display: Display,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
}

impl GlContext {
    //--- Presentation -----------------------------------------------------

    /// Presents the current framebuffer. Blocks for the vsync wait.
    pub(crate) fn swap_buffers(&self) -> Result<(), PlatformError> {
        self.surface
            .swap_buffers(&self.context)
            .map_err(|e| PlatformError::Surface(e.to_string()))
    }

    //--- Symbol Resolution ------------------------------------------------

    /// Resolves a GL entry point by name; null when the symbol does not
    /// exist (or the name cannot be a C string).
    pub(crate) fn get_proc_address(&self, name: &str) -> *const c_void {
        match symbol_name(name) {
            Some(name) => self.display.get_proc_address(&name),
            None => std::ptr::null(),
        }
    }
}

//=== Creation ============================================================

/// Creates the window together with its GL context, current on the
/// calling thread, vsync enabled.
///
/// On error, everything built so far is dropped before returning; the
/// caller observes no partial state.
pub(crate) fn create(
    event_loop: &ActiveEventLoop,
    window_attributes: WindowAttributes,
) -> Result<(Window, GlContext), PlatformError> {
    let template = ConfigTemplateBuilder::new();

    let (window, gl_config) = DisplayBuilder::new()
        .with_window_attributes(Some(window_attributes))
        .build(event_loop, template, pick_config)
        .map_err(|e| PlatformError::Window(e.to_string()))?;

    let window = window
        .ok_or_else(|| PlatformError::Window("display builder produced no window".to_string()))?;

    debug!(
        target: "platform::gl",
        "GL config picked ({} samples)",
        gl_config.num_samples()
    );

    let raw_window_handle = window
        .window_handle()
        .map_err(|e| PlatformError::Window(e.to_string()))?
        .as_raw();

    let gl_display = gl_config.display();

    // OpenGL 2.1 compatibility profile, per the host contract.
    let context_attributes = ContextAttributesBuilder::new()
        .with_context_api(ContextApi::OpenGl(Some(Version::new(2, 1))))
        .build(Some(raw_window_handle));

    let not_current =
        unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .map_err(|e| PlatformError::Context(e.to_string()))?;

    let (width, height): (u32, u32) = window.inner_size().into();
    let surface_attributes = SurfaceAttributesBuilder::<WindowSurface>::new().build(
        raw_window_handle,
        NonZeroU32::new(width).unwrap_or(NonZeroU32::MIN),
        NonZeroU32::new(height).unwrap_or(NonZeroU32::MIN),
    );

    let surface =
        unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes) }
            .map_err(|e| PlatformError::Surface(e.to_string()))?;

    let context = not_current
        .make_current(&surface)
        .map_err(|e| PlatformError::Context(e.to_string()))?;

    // Swap interval 1: swap_buffers waits for the next vblank.
    surface
        .set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN))
        .map_err(|e| PlatformError::Vsync(e.to_string()))?;

    Ok((
        window,
        GlContext {
            display: gl_display,
            surface,
            context,
        },
    ))
}

//--- Config Selection -----------------------------------------------------

/// Picks the plainest config on offer: the host draws straight into the
/// default framebuffer, so multisampled configs are skipped when a plain
/// one exists.
///
/// The picker signature cannot report failure; a backend offering zero
/// GL configs aborts here instead of surfacing through `init()`.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|best, candidate| {
            if candidate.num_samples() < best.num_samples() {
                candidate
            } else {
                best
            }
        })
        .expect("windowing backend offered no OpenGL configs")
}

//--- Symbol Names ---------------------------------------------------------

/// Converts a symbol name for the loader; `None` when the name contains
/// an interior NUL and so cannot name any symbol.
fn symbol_name(name: &str) -> Option<CString> {
    CString::new(name).ok()
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_name_accepts_gl_entry_points() {
        let name = symbol_name("glClear").expect("plain ASCII names convert");
        assert_eq!(name.as_bytes(), b"glClear");
    }

    #[test]
    fn symbol_name_rejects_interior_nul() {
        assert!(
            symbol_name("gl\0Clear").is_none(),
            "interior NUL cannot name a symbol; resolves to null instead of faulting"
        );
    }
}
