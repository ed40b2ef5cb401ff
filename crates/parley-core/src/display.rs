//! Ambient progress display with scoped pausing.
//!
//! Background work (agent replies, prompt application) may publish a status
//! line through [`ProgressDisplay::set_status`]. Before the session asks the
//! operator for input it takes a [`PauseGuard`]; the status is hidden while
//! any guard is alive and shown again when the last one drops, including
//! on early return or error.

use std::sync::Arc;

use parking_lot::Mutex;

/// Draws and erases the status line.
pub trait StatusRenderer: Send + Sync {
    /// Show `status`, replacing whatever is displayed.
    fn show(&self, status: &str);

    /// Erase the status line.
    fn hide(&self);
}

#[derive(Default)]
struct DisplayState {
    pauses: usize,
    status: Option<String>,
}

struct Inner {
    renderer: Option<Box<dyn StatusRenderer>>,
    state: Mutex<DisplayState>,
}

/// Shared handle to the progress display. Cloning is cheap.
#[derive(Clone)]
pub struct ProgressDisplay {
    inner: Arc<Inner>,
}

impl ProgressDisplay {
    /// Create a display that draws through `renderer`.
    pub fn new(renderer: Box<dyn StatusRenderer>) -> Self {
        Self {
            inner: Arc::new(Inner {
                renderer: Some(renderer),
                state: Mutex::new(DisplayState::default()),
            }),
        }
    }

    /// Create a display that tracks state but draws nothing.
    pub fn hidden() -> Self {
        Self {
            inner: Arc::new(Inner {
                renderer: None,
                state: Mutex::new(DisplayState::default()),
            }),
        }
    }

    /// Pause rendering until the returned guard is dropped.
    pub fn pause(&self) -> PauseGuard {
        let mut state = self.inner.state.lock();
        state.pauses += 1;
        if state.pauses == 1
            && state.status.is_some()
            && let Some(renderer) = &self.inner.renderer
        {
            renderer.hide();
        }
        PauseGuard {
            display: self.clone(),
        }
    }

    /// Whether at least one pause guard is alive.
    pub fn is_paused(&self) -> bool {
        self.inner.state.lock().pauses > 0
    }

    /// Publish a status line. Drawn immediately unless paused.
    pub fn set_status(&self, status: impl Into<String>) {
        let status = status.into();
        let mut state = self.inner.state.lock();
        if state.pauses == 0
            && let Some(renderer) = &self.inner.renderer
        {
            renderer.show(&status);
        }
        state.status = Some(status);
    }

    /// Remove the status line.
    pub fn clear_status(&self) {
        let mut state = self.inner.state.lock();
        if state.status.take().is_some()
            && state.pauses == 0
            && let Some(renderer) = &self.inner.renderer
        {
            renderer.hide();
        }
    }

    /// Current status line, if any.
    pub fn status(&self) -> Option<String> {
        self.inner.state.lock().status.clone()
    }

    fn resume(&self) {
        let mut state = self.inner.state.lock();
        state.pauses = state.pauses.saturating_sub(1);
        if state.pauses == 0
            && let (Some(status), Some(renderer)) = (&state.status, &self.inner.renderer)
        {
            renderer.show(status);
        }
    }
}

impl Default for ProgressDisplay {
    fn default() -> Self {
        Self::hidden()
    }
}

/// Keeps the display paused while alive.
#[must_use = "the display resumes as soon as the guard is dropped"]
pub struct PauseGuard {
    display: ProgressDisplay,
}

impl Drop for PauseGuard {
    fn drop(&mut self) {
        self.display.resume();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct RecordingRenderer {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl StatusRenderer for RecordingRenderer {
        fn show(&self, status: &str) {
            self.events.lock().push(format!("show:{status}"));
        }
        fn hide(&self) {
            self.events.lock().push("hide".into());
        }
    }

    fn display() -> (ProgressDisplay, Arc<Mutex<Vec<String>>>) {
        let renderer = RecordingRenderer::default();
        let events = renderer.events.clone();
        (ProgressDisplay::new(Box::new(renderer)), events)
    }

    #[test]
    fn status_is_drawn_when_not_paused() {
        let (display, events) = display();
        display.set_status("thinking");
        assert_eq!(*events.lock(), vec!["show:thinking"]);
        assert_eq!(display.status().as_deref(), Some("thinking"));
    }

    #[test]
    fn pause_hides_and_drop_restores() {
        let (display, events) = display();
        display.set_status("thinking");
        {
            let _guard = display.pause();
            assert!(display.is_paused());
            display.set_status("still thinking");
        }
        assert!(!display.is_paused());
        assert_eq!(
            *events.lock(),
            vec!["show:thinking", "hide", "show:still thinking"]
        );
    }

    #[test]
    fn nested_pauses_resume_once() {
        let (display, events) = display();
        display.set_status("busy");
        let outer = display.pause();
        let inner = display.pause();
        drop(inner);
        assert!(display.is_paused());
        drop(outer);
        assert!(!display.is_paused());
        assert_eq!(*events.lock(), vec!["show:busy", "hide", "show:busy"]);
    }

    #[test]
    fn guard_released_on_early_return() {
        fn fails(display: &ProgressDisplay) -> Result<(), String> {
            let _guard = display.pause();
            Err("boom".into())
        }
        let display = ProgressDisplay::hidden();
        assert!(fails(&display).is_err());
        assert!(!display.is_paused());
    }

    #[test]
    fn clear_status_hides_line() {
        let (display, events) = display();
        display.set_status("busy");
        display.clear_status();
        assert!(display.status().is_none());
        assert_eq!(*events.lock(), vec!["show:busy", "hide"]);
    }
}
