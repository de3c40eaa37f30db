//! Platform abstraction layer
//!
//! The animation-frame chain is the only host resource the game holds open.
//! [`FrameDriver`] keeps it to a single outstanding request: pausing stops
//! the chain and resuming starts exactly one new one.

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Host id of a pending frame request (`requestAnimationFrame` return value)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Something that can schedule and cancel one-shot frame callbacks
pub trait FrameHost {
    /// Schedule the next frame callback. `None` if the host refused.
    fn request_frame(&mut self) -> Option<FrameHandle>;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Tracks the single pending frame request
#[derive(Debug, Default)]
pub struct FrameDriver {
    pending: Option<FrameHandle>,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Request a frame unless one is already pending. Returns true if a new
    /// request was made.
    pub fn start<H: FrameHost>(&mut self, host: &mut H) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = host.request_frame();
        if self.pending.is_none() {
            log::error!("Frame request refused by host");
        }
        self.pending.is_some()
    }

    /// Cancel the pending request, if any
    pub fn stop<H: FrameHost>(&mut self, host: &mut H) -> bool {
        match self.pending.take() {
            Some(handle) => {
                host.cancel_frame(handle);
                log::debug!("Frame chain stopped");
                true
            }
            None => false,
        }
    }

    /// Called first thing in the frame callback: the request is consumed
    pub fn frame_fired(&mut self) {
        self.pending = None;
    }

    /// Run the chain while `running`, stop it otherwise
    pub fn sync<H: FrameHost>(&mut self, running: bool, host: &mut H) {
        if running {
            self.start(host);
        } else {
            self.stop(host);
        }
    }
}
