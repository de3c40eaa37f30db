//! Browser frame host backed by `requestAnimationFrame`

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::{FrameHandle, FrameHost};

/// Owns one long-lived frame callback that every request reuses, so a
/// cancelled request leaves nothing behind.
pub struct BrowserFrames {
    window: web_sys::Window,
    callback: Closure<dyn FnMut(f64)>,
}

impl BrowserFrames {
    /// `on_frame` receives the rAF timestamp in milliseconds
    pub fn new(window: web_sys::Window, on_frame: impl FnMut(f64) + 'static) -> Self {
        Self {
            window,
            callback: Closure::<dyn FnMut(f64)>::new(on_frame),
        }
    }
}

impl FrameHost for BrowserFrames {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        match self
            .window
            .request_animation_frame(self.callback.as_ref().unchecked_ref())
        {
            Ok(id) => Some(FrameHandle(id)),
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle.0) {
            log::warn!("cancelAnimationFrame({}) failed: {:?}", handle.0, e);
        }
    }
}
