//=========================================================================
// Pointer State
//=========================================================================
//
// Tracks the cursor position and left-button state delivered by the event
// pump, and maps them to the host's single synthetic touch slot.
//
// Architecture:
//   Winit WindowEvents → PointerState → touch_count() / read_touch()
//
// The mapping is a deliberate simplification: exactly one touch slot,
// aliasing mouse-left to finger-down, so touch-oriented host logic runs
// on desktop mice. No multi-touch, no right/middle buttons.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::driver::SYNTHETIC_TOUCH_ID;

//=== PointerState ========================================================

/// Last-known pointer state, updated during the event drain and queried
/// by the touch accessors afterwards.
pub(crate) struct PointerState {
    position: (f64, f64),
    left_down: bool,
}

impl PointerState {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            position: (0.0, 0.0),
            left_down: false,
        }
    }

    //--- Event Intake -----------------------------------------------------

    /// Records the cursor position in window-local logical coordinates.
    pub(crate) fn set_position(&mut self, x: f64, y: f64) {
        self.position = (x, y);
    }

    /// Records the left-button state.
    pub(crate) fn set_left_button(&mut self, pressed: bool) {
        self.left_down = pressed;
    }

    //--- Touch Queries ----------------------------------------------------

    /// 1 while the left button is held, 0 otherwise.
    pub(crate) fn touch_count(&self) -> i32 {
        if self.left_down {
            1
        } else {
            0
        }
    }

    /// Reads the synthetic touch slot, enforcing the validity contract.
    ///
    /// Valid only while a touch is active and `index == 0`; anything
    /// else is a programmer error and panics deterministically (callers
    /// must guard with [`touch_count`](Self::touch_count) first).
    pub(crate) fn read_touch(
        &self,
        index: i32,
        id: Option<&mut i32>,
        x: Option<&mut i32>,
        y: Option<&mut i32>,
    ) {
        if self.touch_count() == 0 {
            panic!("touch() called with no active touch; guard with touch_count() first");
        }
        if index != 0 {
            panic!(
                "touch index {} out of range (single synthetic touch slot)",
                index
            );
        }
        self.write_touch(id, x, y);
    }

    /// Writes the synthetic touch through the requested output fields.
    ///
    /// `None` means the caller declines that field; the others still
    /// populate. Coordinates are truncated toward zero.
    fn write_touch(
        &self,
        id: Option<&mut i32>,
        x: Option<&mut i32>,
        y: Option<&mut i32>,
    ) {
        if let Some(id) = id {
            *id = SYNTHETIC_TOUCH_ID;
        }
        if let Some(x) = x {
            *x = self.position.0 as i32;
        }
        if let Some(y) = y {
            *y = self.position.1 as i32;
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Returns to the freshly-constructed state (used when a failed init
    /// discards partial platform state).
    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_touch_while_button_released() {
        let pointer = PointerState::new();
        assert_eq!(pointer.touch_count(), 0);
    }

    #[test]
    fn one_touch_while_button_held() {
        let mut pointer = PointerState::new();
        pointer.set_left_button(true);
        assert_eq!(pointer.touch_count(), 1);

        pointer.set_left_button(false);
        assert_eq!(pointer.touch_count(), 0, "release returns the slot to empty");
    }

    #[test]
    fn touch_count_never_exceeds_one() {
        let mut pointer = PointerState::new();
        // Repeated presses must not accumulate.
        pointer.set_left_button(true);
        pointer.set_left_button(true);
        assert_eq!(pointer.touch_count(), 1);
    }

    #[test]
    fn touch_id_is_stable_zero() {
        let mut pointer = PointerState::new();
        pointer.set_left_button(true);

        for frame in 0..3 {
            let mut id = -1;
            pointer.read_touch(0, Some(&mut id), None, None);
            assert_eq!(id, 0, "id stays 0 on frame {}", frame);
        }
    }

    #[test]
    fn read_touch_populates_while_button_held() {
        let mut pointer = PointerState::new();
        pointer.set_left_button(true);
        pointer.set_position(31.9, 7.4);

        let (mut id, mut x, mut y) = (-1, -1, -1);
        pointer.read_touch(0, Some(&mut id), Some(&mut x), Some(&mut y));
        assert_eq!((id, x, y), (0, 31, 7));
    }

    #[test]
    #[should_panic(expected = "no active touch")]
    fn read_touch_without_active_touch_panics() {
        let pointer = PointerState::new();
        pointer.read_touch(0, None, None, None);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn read_touch_with_nonzero_index_panics() {
        let mut pointer = PointerState::new();
        pointer.set_left_button(true);
        pointer.read_touch(1, None, None, None);
    }

    #[test]
    fn coordinates_truncate_toward_zero() {
        let mut pointer = PointerState::new();

        pointer.set_position(12.9, 47.1);
        let (mut x, mut y) = (0, 0);
        pointer.write_touch(None, Some(&mut x), Some(&mut y));
        assert_eq!((x, y), (12, 47));

        // Negative coordinates (cursor dragged past the window origin)
        // truncate toward zero, not toward negative infinity.
        pointer.set_position(-3.7, -0.2);
        pointer.write_touch(None, Some(&mut x), Some(&mut y));
        assert_eq!((x, y), (-3, 0));
    }

    #[test]
    fn declined_fields_are_skipped() {
        let mut pointer = PointerState::new();
        pointer.set_position(200.5, 100.5);

        // Decline each field individually; the others must still populate.
        let mut id = -1;
        pointer.write_touch(Some(&mut id), None, None);
        assert_eq!(id, 0);

        let mut x = -1;
        pointer.write_touch(None, Some(&mut x), None);
        assert_eq!(x, 200);

        let mut y = -1;
        pointer.write_touch(None, None, Some(&mut y));
        assert_eq!(y, 100);

        // Declining everything is a no-op, not a fault.
        pointer.write_touch(None, None, None);
    }

    #[test]
    fn reset_clears_position_and_button() {
        let mut pointer = PointerState::new();
        pointer.set_position(55.0, 66.0);
        pointer.set_left_button(true);

        pointer.reset();

        assert_eq!(pointer.touch_count(), 0);
        let (mut x, mut y) = (-1, -1);
        pointer.write_touch(None, Some(&mut x), Some(&mut y));
        assert_eq!((x, y), (0, 0));
    }
}
