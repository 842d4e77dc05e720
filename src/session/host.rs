//! SurfaceHost - calls out to the platform.
//!
//! The session never touches the window or the scroll container itself. It
//! tells the host what should happen and the host does it.

use crate::types::{FieldId, ScrollTarget};

/// Platform hooks invoked by a [`SecureInputSession`](super::SecureInputSession).
///
/// Every method defaults to a no-op so hosts only implement what they have.
pub trait SurfaceHost {
    /// Block screenshots/screen recording while `secure` is true.
    fn set_secure_window(&mut self, _secure: bool) {}

    /// Keep the platform soft keyboard from opening for `field`.
    fn suppress_native_keyboard(&mut self, _field: FieldId) {}

    /// Scroll `target` above the custom keyboard.
    fn bring_into_view(&mut self, _target: ScrollTarget) {}
}

/// Host that ignores every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHost;

impl SurfaceHost for NoopHost {}

/// One recorded host call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCall {
    SecureWindow(bool),
    SuppressNativeKeyboard(FieldId),
    BringIntoView(ScrollTarget),
}

/// Host that records calls in order, for tests and demos.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    calls: Vec<HostCall>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Drain the recorded calls.
    pub fn take(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    /// Last secure-window state requested, if any.
    pub fn secure_window(&self) -> Option<bool> {
        self.calls.iter().rev().find_map(|call| match call {
            HostCall::SecureWindow(on) => Some(*on),
            _ => None,
        })
    }
}

impl SurfaceHost for RecordingHost {
    fn set_secure_window(&mut self, secure: bool) {
        self.calls.push(HostCall::SecureWindow(secure));
    }

    fn suppress_native_keyboard(&mut self, field: FieldId) {
        self.calls.push(HostCall::SuppressNativeKeyboard(field));
    }

    fn bring_into_view(&mut self, target: ScrollTarget) {
        self.calls.push(HostCall::BringIntoView(target));
    }
}
