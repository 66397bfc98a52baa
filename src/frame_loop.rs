//! A self-rescheduling frame cycle that can be stopped deterministically.
//!
//! The loop owns the handle of the one pending frame request. Each delivered
//! frame clears that handle, runs the frame, and asks for the next refresh
//! unless [`FrameLoop::stop`] ran in the meantime. Stopping cancels the
//! pending request, and a callback that still arrives afterwards finds no
//! pending handle and does nothing.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameHandle(pub i32);

/// Source of display-refresh callbacks (`requestAnimationFrame` in the browser).
pub trait FrameScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle, String>;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

pub struct FrameLoop<S: FrameScheduler> {
    scheduler: S,
    pending: Option<FrameHandle>,
    running: bool,
    frames: u64,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S) -> Self {
        FrameLoop {
            scheduler,
            pending: None,
            running: false,
            frames: 0,
        }
    }

    pub fn start(&mut self) -> Result<(), String> {
        if self.running {
            return Ok(());
        }
        self.schedule()?;
        self.running = true;
        Ok(())
    }

    /// Runs one frame if one is pending and schedules the next. A failing
    /// frame is still counted and the loop keeps going; its error is
    /// returned so the caller can report it.
    pub fn on_frame<F>(&mut self, frame: F) -> Result<(), String>
    where
        F: FnOnce() -> Result<(), String>,
    {
        if !self.running || self.pending.take().is_none() {
            return Ok(());
        }
        let drawn = frame();
        self.frames += 1;
        let scheduled = self.schedule();
        if scheduled.is_err() {
            self.running = false;
        }
        drawn.and(scheduled)
    }

    pub fn stop(&mut self) {
        self.running = false;
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    fn schedule(&mut self) -> Result<(), String> {
        let handle = self.scheduler.request_frame()?;
        self.pending = Some(handle);
        Ok(())
    }
}

impl<S: FrameScheduler> Drop for FrameLoop<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        requested: Vec<FrameHandle>,
        cancelled: Vec<FrameHandle>,
    }

    // Hands out increasing ids the way requestAnimationFrame does
    #[derive(Default)]
    struct ManualScheduler {
        next_id: i32,
        refuse: bool,
        log: Rc<RefCell<Log>>,
    }

    impl FrameScheduler for ManualScheduler {
        fn request_frame(&mut self) -> Result<FrameHandle, String> {
            if self.refuse {
                return Err("no window".to_owned());
            }
            self.next_id += 1;
            let handle = FrameHandle(self.next_id);
            self.log.borrow_mut().requested.push(handle);
            Ok(handle)
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            self.log.borrow_mut().cancelled.push(handle);
        }
    }

    // Simulates `ticks` display refreshes, each delivering a callback
    fn run(frame_loop: &mut FrameLoop<ManualScheduler>, ticks: usize, drawn: &mut u32) {
        for _ in 0..ticks {
            let _ = frame_loop.on_frame(|| {
                *drawn += 1;
                Ok(())
            });
        }
    }

    #[test]
    fn runs_until_stopped() {
        let mut frame_loop = FrameLoop::new(ManualScheduler::default());
        let mut drawn = 0;

        run(&mut frame_loop, 3, &mut drawn);
        assert_eq!(drawn, 0, "nothing runs before start");

        frame_loop.start().unwrap();
        run(&mut frame_loop, 5, &mut drawn);
        assert_eq!(drawn, 5);
        assert_eq!(frame_loop.frames(), 5);
        assert_eq!(frame_loop.pending(), Some(FrameHandle(6)));

        frame_loop.stop();
        run(&mut frame_loop, 50, &mut drawn);
        assert_eq!(drawn, 5);
        assert_eq!(frame_loop.frames(), 5);
        assert!(!frame_loop.is_running());
        assert_eq!(frame_loop.pending(), None);

        let log = frame_loop.scheduler().log.borrow();
        assert_eq!(log.requested.len(), 6);
        assert_eq!(log.cancelled, vec![FrameHandle(6)]);
    }

    #[test]
    fn start_is_idempotent() {
        let mut frame_loop = FrameLoop::new(ManualScheduler::default());
        frame_loop.start().unwrap();
        frame_loop.start().unwrap();
        assert_eq!(frame_loop.scheduler().log.borrow().requested.len(), 1);
    }

    #[test]
    fn failing_frame_keeps_loop_alive() {
        let mut frame_loop = FrameLoop::new(ManualScheduler::default());
        frame_loop.start().unwrap();

        let result = frame_loop.on_frame(|| Err("context lost".to_owned()));
        assert_eq!(result, Err("context lost".to_owned()));
        assert!(frame_loop.is_running());
        assert!(frame_loop.pending().is_some());

        let mut drawn = 0;
        run(&mut frame_loop, 2, &mut drawn);
        assert_eq!(drawn, 2);
        assert_eq!(frame_loop.frames(), 3);
    }

    #[test]
    fn start_fails_without_scheduler() {
        let mut frame_loop = FrameLoop::new(ManualScheduler {
            refuse: true,
            ..ManualScheduler::default()
        });
        assert!(frame_loop.start().is_err());
        assert!(!frame_loop.is_running());
    }

    #[test]
    fn restart_after_stop() {
        let mut frame_loop = FrameLoop::new(ManualScheduler::default());
        let mut drawn = 0;
        frame_loop.start().unwrap();
        run(&mut frame_loop, 2, &mut drawn);
        frame_loop.stop();
        frame_loop.start().unwrap();
        run(&mut frame_loop, 2, &mut drawn);
        assert_eq!(drawn, 4);
    }

    #[test]
    fn drop_cancels_pending_frame() {
        let log = Rc::new(RefCell::new(Log::default()));
        {
            let mut frame_loop = FrameLoop::new(ManualScheduler {
                log: log.clone(),
                ..ManualScheduler::default()
            });
            frame_loop.start().unwrap();
        }
        assert_eq!(log.borrow().cancelled, vec![FrameHandle(1)]);
    }
}
