use std::sync::atomic::{AtomicBool, Ordering};

/// "Run this callback once before the next repaint" contract of the host.
pub trait RepaintScheduler {
    fn request_repaint(&self);
}

impl RepaintScheduler for egui::Context {
    fn request_repaint(&self) {
        egui::Context::request_repaint(self);
    }
}

/// Draw-then-reschedule cycle with an explicit start/stop handle.
///
/// The host fires `tick` once per display refresh; the loop draws and re-arms
/// itself only while active. The armed flag guarantees at most one repaint
/// request is outstanding at any moment, and `stop` is idempotent: a tick
/// arriving after teardown runs no draw call and requests nothing.
pub struct FrameLoop {
    active: AtomicBool,
    armed: AtomicBool,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            armed: AtomicBool::new(false),
        }
    }

    /// Arms the first callback. Starting an already running loop changes nothing.
    pub fn start(&self, scheduler: &impl RepaintScheduler) {
        if self.active.swap(true, Ordering::SeqCst) {
            return;
        }
        self.arm(scheduler);
    }

    /// Withdraws the loop; any already pending callback becomes a no-op tick.
    pub fn stop(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// One host callback: consume the pending arm, draw if still active, then
    /// re-arm. Returns whether the draw closure ran.
    pub fn tick(&self, scheduler: &impl RepaintScheduler, draw: impl FnOnce()) -> bool {
        self.armed.store(false, Ordering::SeqCst);
        if !self.active.load(Ordering::SeqCst) {
            return false;
        }
        draw();
        self.arm(scheduler);
        true
    }

    fn arm(&self, scheduler: &impl RepaintScheduler) {
        if !self.armed.swap(true, Ordering::SeqCst) {
            scheduler.request_repaint();
        }
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct CountingScheduler {
        requests: Cell<usize>,
    }

    impl RepaintScheduler for CountingScheduler {
        fn request_repaint(&self) {
            self.requests.set(self.requests.get() + 1);
        }
    }

    #[test]
    fn start_arms_exactly_one_request() {
        let frame_loop = FrameLoop::new();
        let scheduler = CountingScheduler::default();
        frame_loop.start(&scheduler);
        assert!(frame_loop.is_active());
        assert_eq!(scheduler.requests.get(), 1);
        // Restarting does not queue a second callback.
        frame_loop.start(&scheduler);
        assert_eq!(scheduler.requests.get(), 1);
    }

    #[test]
    fn tick_draws_and_rearms_once() {
        let frame_loop = FrameLoop::new();
        let scheduler = CountingScheduler::default();
        frame_loop.start(&scheduler);

        let draws = Cell::new(0usize);
        for _ in 0..3 {
            let ran = frame_loop.tick(&scheduler, || draws.set(draws.get() + 1));
            assert!(ran);
        }
        assert_eq!(draws.get(), 3);
        // Initial arm plus one re-arm per tick.
        assert_eq!(scheduler.requests.get(), 4);
    }

    #[test]
    fn tick_after_stop_neither_draws_nor_rearms() {
        let frame_loop = FrameLoop::new();
        let scheduler = CountingScheduler::default();
        frame_loop.start(&scheduler);
        frame_loop.stop(); // pending callback is still in flight

        let draws = Cell::new(0usize);
        let ran = frame_loop.tick(&scheduler, || draws.set(draws.get() + 1));
        assert!(!ran);
        // Simulate the host firing one extra refresh after teardown.
        let ran = frame_loop.tick(&scheduler, || draws.set(draws.get() + 1));
        assert!(!ran);
        assert_eq!(draws.get(), 0);
        assert_eq!(scheduler.requests.get(), 1);
    }

    #[test]
    fn stop_is_idempotent() {
        let frame_loop = FrameLoop::new();
        let scheduler = CountingScheduler::default();
        frame_loop.stop();
        frame_loop.stop();
        assert!(!frame_loop.is_active());
        frame_loop.start(&scheduler);
        frame_loop.stop();
        frame_loop.stop();
        assert!(!frame_loop.is_active());
    }

    #[test]
    fn loop_can_be_restarted_after_stop() {
        let frame_loop = FrameLoop::new();
        let scheduler = CountingScheduler::default();
        frame_loop.start(&scheduler);
        frame_loop.tick(&scheduler, || {});
        frame_loop.stop();
        frame_loop.tick(&scheduler, || {});

        frame_loop.start(&scheduler);
        let drew = Cell::new(false);
        assert!(frame_loop.tick(&scheduler, || drew.set(true)));
        assert!(drew.get());
    }
}
