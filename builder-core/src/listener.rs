//! Global pointer-listener lifecycle.
//!
//! Interactive sessions (currently: resize) need pointer-move and pointer-up
//! events even after the pointer leaves the node they started on. The
//! rendering layer registers document-wide listeners on [`PointerCapture::attach`]
//! and removes them on [`PointerCapture::detach`]. A [`ListenerGuard`] ties
//! the registration to a session: dropping the session detaches, whichever
//! way it ends.

use std::cell::Cell;
use std::rc::Rc;

/// Handle of one registered listener pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Registers and removes global pointer listeners.
pub trait PointerCapture {
    /// Register pointer-move and pointer-up listeners.
    fn attach(&self) -> ListenerId;

    /// Remove a registration made by [`PointerCapture::attach`].
    fn detach(&self, id: ListenerId);
}

/// Capture for hosts that deliver pointer events without registration.
#[derive(Debug, Default)]
pub struct NoopCapture;

impl PointerCapture for NoopCapture {
    fn attach(&self) -> ListenerId {
        ListenerId(0)
    }

    fn detach(&self, _id: ListenerId) {}
}

/// Counts live registrations; used to check that sessions never leak.
#[derive(Debug, Default)]
pub struct CountingCapture {
    next: Cell<u64>,
    active: Cell<usize>,
    attached_total: Cell<usize>,
}

impl CountingCapture {
    /// Create a counter with no registrations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registrations currently attached.
    #[must_use]
    pub fn active(&self) -> usize {
        self.active.get()
    }

    /// Registrations ever attached.
    #[must_use]
    pub fn attached_total(&self) -> usize {
        self.attached_total.get()
    }
}

impl PointerCapture for CountingCapture {
    fn attach(&self) -> ListenerId {
        let id = self.next.get();
        self.next.set(id + 1);
        self.active.set(self.active.get() + 1);
        self.attached_total.set(self.attached_total.get() + 1);
        ListenerId(id)
    }

    fn detach(&self, _id: ListenerId) {
        self.active.set(self.active.get().saturating_sub(1));
    }
}

/// Listener registration owned by a session; detaches on drop.
pub struct ListenerGuard {
    capture: Rc<dyn PointerCapture>,
    id: ListenerId,
}

impl ListenerGuard {
    /// Attach listeners through `capture`.
    #[must_use]
    pub fn acquire(capture: Rc<dyn PointerCapture>) -> Self {
        let id = capture.attach();
        tracing::debug!("pointer listeners {} attached", id.0);
        Self { capture, id }
    }

    /// The registration handle.
    #[must_use]
    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.capture.detach(self.id);
        tracing::debug!("pointer listeners {} detached", self.id.0);
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard").field("id", &self.id).finish()
    }
}
