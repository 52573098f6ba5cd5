//! Window chrome: the borderless / translucent / taskbar-hidden treatment every
//! launcher window gets, and the drag hook for undecorated windows.
//!
//! [`ViewportChrome`] records the requested treatment per window as a plain
//! [`ViewportSpec`]. The UI layer turns each spec into an egui viewport every
//! frame and flushes pending drags, so the chrome state itself stays free of
//! toolkit types.

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::OnceCell;

use crate::types::{Point, Size};

/// Opaque identifier for a window created through [`WindowChrome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowHandle(pub u64);

/// Windowing operations the controllers depend on.
pub trait WindowChrome {
    fn create_window(&mut self, title: &str, min_size: Size, initial_size: Size) -> WindowHandle;

    /// Strip the OS caption and frame.
    fn set_borderless(&mut self, handle: WindowHandle);

    /// Uniform window opacity, 0 (invisible) to 255 (opaque).
    fn set_layered_alpha(&mut self, handle: WindowHandle, alpha: u8);

    fn hide_from_taskbar(&mut self, handle: WindowHandle);

    /// Start an OS-driven move of the window under the pointer.
    fn begin_drag(&mut self, handle: WindowHandle);

    fn destroy_window(&mut self, handle: WindowHandle);
}

/// Requested appearance of one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportSpec {
    pub title: String,
    pub min_size: Size,
    pub initial_size: Size,
    pub position: Option<Point>,
    pub borderless: bool,
    pub alpha: u8,
    pub skip_taskbar: bool,
    /// Hidden owner the window is parented to once it leaves the taskbar.
    pub owner: Option<WindowHandle>,
}

// ── Owner window ───────────────────────────────────────────────────────────────

/// The single hidden window that owns every taskbar-hidden window.
///
/// Created on first use and then shared for the rest of the process.
#[derive(Debug)]
pub struct OwnerWindow {
    handle: WindowHandle,
}

static OWNER: OnceCell<OwnerWindow> = OnceCell::new();

impl OwnerWindow {
    /// Handle 0 is never handed out by [`ViewportChrome::create_window`].
    const HANDLE: WindowHandle = WindowHandle(0);

    pub fn acquire() -> &'static OwnerWindow {
        OWNER.get_or_init(|| {
            log::debug!("created taskbar owner window");
            OwnerWindow {
                handle: Self::HANDLE,
            }
        })
    }

    pub fn handle(&self) -> WindowHandle {
        self.handle
    }
}

// ── Viewport-backed chrome ─────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct ViewportChrome {
    windows: BTreeMap<WindowHandle, ViewportSpec>,
    pending_drags: BTreeSet<WindowHandle>,
    last_handle: u64,
}

impl ViewportChrome {
    pub fn spec(&self, handle: WindowHandle) -> Option<&ViewportSpec> {
        self.windows.get(&handle)
    }

    pub fn set_position(&mut self, handle: WindowHandle, position: Point) {
        if let Some(spec) = self.spec_mut(handle, "set_position") {
            spec.position = Some(position);
        }
    }

    /// Consume a drag requested since the last frame.
    pub fn take_drag(&mut self, handle: WindowHandle) -> bool {
        self.pending_drags.remove(&handle)
    }

    #[allow(dead_code)]
    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    fn spec_mut(&mut self, handle: WindowHandle, op: &str) -> Option<&mut ViewportSpec> {
        let spec = self.windows.get_mut(&handle);
        if spec.is_none() {
            log::warn!("{op}: unknown window {handle:?}");
        }
        spec
    }
}

impl WindowChrome for ViewportChrome {
    fn create_window(&mut self, title: &str, min_size: Size, initial_size: Size) -> WindowHandle {
        self.last_handle += 1;
        let handle = WindowHandle(self.last_handle);
        self.windows.insert(
            handle,
            ViewportSpec {
                title: title.to_string(),
                min_size,
                initial_size,
                position: None,
                borderless: false,
                alpha: u8::MAX,
                skip_taskbar: false,
                owner: None,
            },
        );
        handle
    }

    fn set_borderless(&mut self, handle: WindowHandle) {
        if let Some(spec) = self.spec_mut(handle, "set_borderless") {
            spec.borderless = true;
        }
    }

    fn set_layered_alpha(&mut self, handle: WindowHandle, alpha: u8) {
        if let Some(spec) = self.spec_mut(handle, "set_layered_alpha") {
            spec.alpha = alpha;
        }
    }

    fn hide_from_taskbar(&mut self, handle: WindowHandle) {
        let owner = OwnerWindow::acquire().handle();
        if let Some(spec) = self.spec_mut(handle, "hide_from_taskbar") {
            spec.skip_taskbar = true;
            spec.owner = Some(owner);
        }
    }

    fn begin_drag(&mut self, handle: WindowHandle) {
        if self.windows.contains_key(&handle) {
            self.pending_drags.insert(handle);
        }
    }

    fn destroy_window(&mut self, handle: WindowHandle) {
        self.windows.remove(&handle);
        self.pending_drags.remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_records_spec_with_opaque_default() {
        let mut chrome = ViewportChrome::default();
        let handle = chrome.create_window("Photos", Size::new(420, 360), Size::new(500, 400));
        let spec = chrome.spec(handle).unwrap();
        assert_eq!(spec.title, "Photos");
        assert_eq!(spec.min_size, Size::new(420, 360));
        assert_eq!(spec.initial_size, Size::new(500, 400));
        assert_eq!(spec.alpha, 255);
        assert!(!spec.borderless && !spec.skip_taskbar);
    }

    #[test]
    fn handles_are_unique_and_never_the_owner() {
        let mut chrome = ViewportChrome::default();
        let a = chrome.create_window("a", Size::default(), Size::default());
        let b = chrome.create_window("b", Size::default(), Size::default());
        assert_ne!(a, b);
        assert_ne!(a, OwnerWindow::acquire().handle());
        assert_eq!(chrome.window_count(), 2);
    }

    #[test]
    fn chrome_treatment_is_recorded() {
        let mut chrome = ViewportChrome::default();
        let handle = chrome.create_window("x", Size::default(), Size::default());
        chrome.set_borderless(handle);
        chrome.set_layered_alpha(handle, 204);
        chrome.hide_from_taskbar(handle);

        let spec = chrome.spec(handle).unwrap();
        assert!(spec.borderless);
        assert_eq!(spec.alpha, 204);
        assert!(spec.skip_taskbar);
        assert_eq!(spec.owner, Some(OwnerWindow::acquire().handle()));
    }

    #[test]
    fn owner_window_is_created_once() {
        let first = OwnerWindow::acquire() as *const OwnerWindow;
        let second = OwnerWindow::acquire() as *const OwnerWindow;
        assert_eq!(first, second);
    }

    #[test]
    fn drag_is_consumed_once() {
        let mut chrome = ViewportChrome::default();
        let handle = chrome.create_window("x", Size::default(), Size::default());
        chrome.begin_drag(handle);
        assert!(chrome.take_drag(handle));
        assert!(!chrome.take_drag(handle));

        chrome.begin_drag(WindowHandle(999));
        assert!(!chrome.take_drag(WindowHandle(999)));
    }

    #[test]
    fn destroy_forgets_the_window() {
        let mut chrome = ViewportChrome::default();
        let handle = chrome.create_window("x", Size::default(), Size::default());
        chrome.begin_drag(handle);
        chrome.destroy_window(handle);
        assert!(chrome.spec(handle).is_none());
        assert!(!chrome.take_drag(handle));
        // Operations on a destroyed window are ignored.
        chrome.set_layered_alpha(handle, 10);
        assert_eq!(chrome.window_count(), 0);
    }
}
