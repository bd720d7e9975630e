//=========================================================================
// Portico — Library Root
//
// Desktop platform driver for an embedding game runtime.
//
// The host runtime owns the loop and talks to the platform through a
// fixed capability contract (the `Driver` trait): open one window, pump
// events once per frame, resolve GL entry points, and expose the left
// mouse button as a one-slot synthetic touch. This crate supplies that
// contract (`driver`) and its desktop implementation (`DesktopDriver`,
// built on winit + glutin).
//
// Typical usage:
// ```no_run
// use portico::{DesktopDriver, Driver};
//
// let mut driver = DesktopDriver::new();
// assert!(driver.init());
// loop {
//     driver.update(&mut || { /* host draws here */ });
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `driver` is the capability contract the host codes against. It is the
// whole public vocabulary: hosts hold `&mut dyn Driver` and never name
// winit/glutin types.
//
pub mod driver;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the OS-facing implementation (Winit event pump,
// glutin context, pointer tracking) and is kept private; only the
// concrete adapter type is re-exported.
//
mod platform;

pub mod prelude;

//--- Public Exports ------------------------------------------------------

pub use driver::{Driver, SCREEN_HEIGHT, SCREEN_WIDTH, SYNTHETIC_TOUCH_ID};
pub use platform::DesktopDriver;
