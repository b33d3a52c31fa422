//! # Frame loop
//!
//! Each demo owns one [`FrameLoop`]: the recurring per-frame callback that
//! advances its animation. The host (winit's redraw cycle) calls
//! [`FrameLoop::tick`] once per display refresh; the loop answers with a
//! [`FrameTick`] while it is running and with `None` once cancelled.
//!
//! A loop is identified by the [`LoopHandle`] returned from
//! [`FrameLoop::start`]. Starting again cancels the current run first and
//! hands out a fresh handle, so a demo that rebuilds itself can never end up
//! with two loops advancing the same scene.

use web_time::Duration;

/// Longest step a single tick may advance. Larger gaps (a backgrounded tab,
/// a debugger pause) are clamped so animations do not jump.
pub const MAX_STEP: Duration = Duration::from_millis(100);

/// Identity of one run of a [`FrameLoop`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LoopHandle(u64);

/// What a running loop reports for one frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameTick {
    /// Frames since the current run started, starting at zero.
    pub frame: u64,
    /// Seconds since the previous tick, clamped to [`MAX_STEP`].
    pub delta: f32,
    /// Seconds since the current run started.
    pub elapsed: f32,
}

impl FrameTick {
    /// Scales a per-frame increment tuned for 60 Hz to the real delta.
    pub fn per_frame(&self, amount: f32) -> f32 {
        amount * self.delta * 60.0
    }
}

#[derive(Debug, Default)]
pub struct FrameLoop {
    active: Option<LoopHandle>,
    generation: u64,
    frame: u64,
    elapsed: f32,
}

impl FrameLoop {
    /// Starts a new run, cancelling the current one if needed.
    pub fn start(&mut self) -> LoopHandle {
        if let Some(previous) = self.active.take() {
            log::debug!("Frame loop {} cancelled by restart", previous.0);
        }
        self.generation += 1;
        self.frame = 0;
        self.elapsed = 0.0;
        let handle = LoopHandle(self.generation);
        self.active = Some(handle);
        log::debug!("Frame loop {} started", handle.0);
        handle
    }

    /// Stops the loop. Returns `false` if it was not running.
    pub fn cancel(&mut self) -> bool {
        match self.active.take() {
            Some(handle) => {
                log::debug!("Frame loop {} cancelled", handle.0);
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn handle(&self) -> Option<LoopHandle> {
        self.active
    }

    /// Number of runs started over the loop's lifetime.
    pub fn runs_started(&self) -> u64 {
        self.generation
    }

    /// Advances a running loop by `delta`.
    pub fn tick(&mut self, delta: Duration) -> Option<FrameTick> {
        self.active?;
        let delta = delta.min(MAX_STEP).as_secs_f32();
        let tick = FrameTick {
            frame: self.frame,
            delta,
            elapsed: self.elapsed + delta,
        };
        self.frame += 1;
        self.elapsed = tick.elapsed;
        Some(tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    #[test]
    fn idle_loop_does_not_tick() {
        let mut frame_loop = FrameLoop::default();
        assert!(frame_loop.tick(FRAME).is_none());
    }

    #[test]
    fn restart_replaces_the_handle() {
        let mut frame_loop = FrameLoop::default();
        let first = frame_loop.start();
        frame_loop.tick(FRAME);
        let second = frame_loop.start();
        assert_ne!(first, second);
        assert_eq!(frame_loop.handle(), Some(second));
        assert_eq!(frame_loop.tick(FRAME).map(|tick| tick.frame), Some(0));
        assert_eq!(frame_loop.runs_started(), 2);
    }

    #[test]
    fn cancel_stops_ticks() {
        let mut frame_loop = FrameLoop::default();
        frame_loop.start();
        assert!(frame_loop.cancel());
        assert!(!frame_loop.cancel());
        assert!(frame_loop.tick(FRAME).is_none());
    }

    #[test]
    fn long_pauses_are_clamped() {
        let mut frame_loop = FrameLoop::default();
        frame_loop.start();
        let tick = frame_loop.tick(Duration::from_secs(5)).unwrap();
        assert!((tick.delta - 0.1).abs() < 1e-6);
        assert!((tick.per_frame(0.01) - 0.06).abs() < 1e-6);
    }
}
