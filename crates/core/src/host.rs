//! Frame scheduling and pointer listener registration.
//!
//! The driver never owns a clock or an event loop. It asks a [`FrameHost`]
//! for the next frame callback and for pointer events, and hands both back
//! when it stops.

/// Handle of a pending frame callback.
pub type FrameId = u64;

/// The platform's per-frame callback and pointer listener facility.
pub trait FrameHost {
    /// Schedules one frame callback; the host later calls
    /// `FrameDriver::on_frame` with the frame timestamp.
    fn request_frame(&mut self) -> FrameId;

    /// Cancels a pending frame callback. Unknown ids are ignored.
    fn cancel_frame(&mut self, id: FrameId);

    /// Starts delivering pointer events to the driver.
    fn attach_pointer(&mut self);

    /// Stops delivering pointer events to the driver.
    fn detach_pointer(&mut self);
}
