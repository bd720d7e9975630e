//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports the driver contract and the desktop
// adapter together.
//
// Usage:
//   use portico::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Capability contract
pub use crate::driver::{Driver, SCREEN_HEIGHT, SCREEN_WIDTH, SYNTHETIC_TOUCH_ID};

// Desktop adapter
pub use crate::platform::DesktopDriver;
