use gloo::render::{AnimationFrame, request_animation_frame};
use yew::Callback;

/// One-shot animation frame requests, re-armed by the owner after every frame.
///
/// Dropping the driver, or calling [`FrameDriver::stop`], cancels the pending request.
pub(crate) struct FrameDriver {
    on_frame: Callback<f64>,
    pending: Option<AnimationFrame>,
}

impl FrameDriver {
    pub(crate) fn new(on_frame: Callback<f64>) -> Self {
        Self {
            on_frame,
            pending: None,
        }
    }

    /// Requests the next frame, replacing any request still pending.
    pub(crate) fn arm(&mut self) {
        let on_frame = self.on_frame.clone();
        self.pending = Some(request_animation_frame(move |timestamp| {
            on_frame.emit(timestamp)
        }));
    }

    pub(crate) fn stop(&mut self) {
        if self.pending.take().is_some() {
            log::trace!("frame request cancelled");
        }
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}
