//! A frame host with a virtual clock, for rendering animations to files.
//!
//! Frame requests queue up; [`OfflineHost::next_frame`] pops one and returns
//! the timestamp it fires at. The clock advances by a fixed interval per
//! fired frame, so runs are reproducible.

use dotscape_core::{FrameHost, FrameId};
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct OfflineHost {
    interval_ms: f64,
    fired: u64,
    next_id: FrameId,
    queue: VecDeque<FrameId>,
    pointer_attached: bool,
}

impl OfflineHost {
    /// A host whose frames fire `interval_ms` apart, starting at 0.
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(0.0),
            fired: 0,
            next_id: 0,
            queue: VecDeque::new(),
            pointer_attached: false,
        }
    }

    /// Fires the oldest pending frame, returning its timestamp in ms.
    pub fn next_frame(&mut self) -> Option<f64> {
        self.queue.pop_front()?;
        let now = self.fired as f64 * self.interval_ms;
        self.fired += 1;
        Some(now)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn pointer_attached(&self) -> bool {
        self.pointer_attached
    }
}

impl FrameHost for OfflineHost {
    fn request_frame(&mut self) -> FrameId {
        self.next_id += 1;
        self.queue.push_back(self.next_id);
        self.next_id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        self.queue.retain(|&queued| queued != id);
    }

    fn attach_pointer(&mut self) {
        self.pointer_attached = true;
    }

    fn detach_pointer(&mut self) {
        self.pointer_attached = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_host_has_no_frames() {
        let mut host = OfflineHost::new(10.0);
        assert_eq!(host.next_frame(), None);
    }

    #[test]
    fn frames_fire_at_fixed_interval() {
        let mut host = OfflineHost::new(25.0);
        host.request_frame();
        assert_eq!(host.next_frame(), Some(0.0));
        host.request_frame();
        assert_eq!(host.next_frame(), Some(25.0));
        host.request_frame();
        assert_eq!(host.next_frame(), Some(50.0));
    }

    #[test]
    fn cancelled_frames_never_fire() {
        let mut host = OfflineHost::new(10.0);
        let a = host.request_frame();
        let b = host.request_frame();
        host.cancel_frame(a);
        assert_eq!(host.pending(), 1);
        host.cancel_frame(b);
        assert_eq!(host.next_frame(), None);
    }

    #[test]
    fn pointer_attachment_tracks_calls() {
        let mut host = OfflineHost::new(10.0);
        host.attach_pointer();
        assert!(host.pointer_attached());
        host.detach_pointer();
        assert!(!host.pointer_attached());
    }
}
