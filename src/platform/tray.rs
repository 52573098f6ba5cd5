//! Tray contract and its in-panel realisation.
//!
//! [`PanelTray`] has no OS icon: the panel header renders its menu and feeds
//! user choices into the queue that [`Tray::poll`] drains.

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayAction {
    /// The icon itself was clicked: bring the launcher forward.
    Click,
    /// "Show/Hide drawers".
    ToggleVisibility,
    /// "Exit".
    Exit,
}

pub trait Tray {
    fn show_tray_icon(&mut self, tooltip: &str);

    /// Next pending user action, oldest first.
    fn poll(&mut self) -> Option<TrayAction>;
}

#[derive(Debug, Default)]
pub struct PanelTray {
    tooltip: Option<String>,
    pending: VecDeque<TrayAction>,
}

impl PanelTray {
    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    pub fn push(&mut self, action: TrayAction) {
        self.pending.push_back(action);
    }
}

impl Tray for PanelTray {
    fn show_tray_icon(&mut self, tooltip: &str) {
        self.tooltip = Some(tooltip.to_string());
    }

    fn poll(&mut self) -> Option<TrayAction> {
        self.pending.pop_front()
    }
}
