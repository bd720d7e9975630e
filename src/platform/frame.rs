//=========================================================================
// Frame Sequencing
//=========================================================================
//
// One frame of the host-driven loop, as a standalone sequence:
//
//   pump (drain OS events) → draw (host callback) → present (swap)
//
// The ordering is part of the driver contract: the host callback must run
// after the event drain and before the swap, exactly once, and must NOT
// run at all if the pump reports the event loop is gone. Keeping the
// sequence generic over its three phases makes that contract testable
// without a live window.
//
//=========================================================================

//=== PumpOutcome =========================================================

/// Result of draining the OS event queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PumpOutcome {
    /// Events drained; the frame may proceed.
    Continue,

    /// The event loop has terminated (exit code attached). Fatal: the
    /// frame must not proceed.
    Terminated(i32),
}

//=== FrameError ==========================================================

/// Catastrophic frame failure. The host callback was not invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FrameError {
    EventLoopTerminated(i32),
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventLoopTerminated(code) => {
                write!(f, "event loop terminated during pump (exit code {})", code)
            }
        }
    }
}

impl std::error::Error for FrameError {}

//=== run_frame ===========================================================

/// Executes one frame in contract order over a shared context.
///
/// Each phase borrows `cx` only for the duration of its call, so the
/// three phases may touch the same driver state without aliasing.
pub(crate) fn run_frame<C>(
    cx: &mut C,
    pump: impl FnOnce(&mut C) -> PumpOutcome,
    draw: impl FnOnce(&mut C),
    present: impl FnOnce(&mut C),
) -> Result<(), FrameError> {
    match pump(cx) {
        PumpOutcome::Continue => {}
        PumpOutcome::Terminated(code) => return Err(FrameError::EventLoopTerminated(code)),
    }

    draw(cx);
    present(cx);
    Ok(())
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_run_in_contract_order() {
        let mut log: Vec<&str> = Vec::new();

        let result = run_frame(
            &mut log,
            |log| {
                log.push("pump");
                PumpOutcome::Continue
            },
            |log| log.push("draw"),
            |log| log.push("present"),
        );

        assert!(result.is_ok());
        assert_eq!(log, vec!["pump", "draw", "present"]);
    }

    #[test]
    fn draw_runs_exactly_once_across_consecutive_frames() {
        let mut draws = 0;

        for _ in 0..3 {
            run_frame(
                &mut draws,
                |_| PumpOutcome::Continue,
                |draws| *draws += 1,
                |_| {},
            )
            .expect("frame should complete");
        }

        assert_eq!(draws, 3, "one draw per frame, no more, no fewer");
    }

    #[test]
    fn terminated_pump_skips_draw_and_present() {
        let mut log: Vec<&str> = Vec::new();

        let result = run_frame(
            &mut log,
            |log| {
                log.push("pump");
                PumpOutcome::Terminated(7)
            },
            |log| log.push("draw"),
            |log| log.push("present"),
        );

        assert_eq!(result, Err(FrameError::EventLoopTerminated(7)));
        assert_eq!(log, vec!["pump"], "neither draw nor present may run");
    }

    #[test]
    fn frame_error_display_names_the_exit_code() {
        let message = FrameError::EventLoopTerminated(3).to_string();
        assert!(message.contains("exit code 3"), "got: {}", message);
    }

    #[test]
    fn frame_error_is_error_trait() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<FrameError>();
    }
}
