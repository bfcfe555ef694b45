//! Display surface host
//!
//! The main window shows exactly one surface at a time. Surfaces are attached
//! to the host like pages of a stacked layout: attaching one raises it, and
//! detaching the visible one reveals the most recently attached survivor.

/// Surfaces that can occupy the main window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceId {
    /// Emulated screen
    LiveDisplay,
    /// Save-state slot browser, when shown inside the main window
    StateBrowser,
}

/// Owner of the main window's content area
#[derive(Debug)]
pub struct DisplaySurfaceHost {
    /// Attached surfaces, oldest first
    attached: Vec<SurfaceId>,
    visible: Option<SurfaceId>,
}

impl DisplaySurfaceHost {
    /// Create a host with the live display attached and visible
    pub fn new() -> Self {
        Self {
            attached: vec![SurfaceId::LiveDisplay],
            visible: Some(SurfaceId::LiveDisplay),
        }
    }

    /// Make `surface` the sole visible surface
    pub fn attach(&mut self, surface: SurfaceId) {
        if self.visible == Some(surface) {
            return;
        }
        self.attached.retain(|s| *s != surface);
        self.attached.push(surface);
        tracing::debug!("Display: {:?} -> {:?}", self.visible, surface);
        self.visible = Some(surface);
    }

    /// Remove `surface` from the host
    pub fn detach(&mut self, surface: SurfaceId) {
        let before = self.attached.len();
        self.attached.retain(|s| *s != surface);
        if self.attached.len() == before {
            return;
        }
        if self.visible == Some(surface) {
            self.visible = self.attached.last().copied();
            tracing::debug!("Display: {:?} detached, showing {:?}", surface, self.visible);
        }
    }

    pub fn visible(&self) -> Option<SurfaceId> {
        self.visible
    }

    pub fn is_visible(&self, surface: SurfaceId) -> bool {
        self.visible == Some(surface)
    }

    pub fn is_attached(&self, surface: SurfaceId) -> bool {
        self.attached.contains(&surface)
    }
}

impl Default for DisplaySurfaceHost {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_display_visible_at_start() {
        let host = DisplaySurfaceHost::new();
        assert_eq!(host.visible(), Some(SurfaceId::LiveDisplay));
    }

    #[test]
    fn test_attach_is_exclusive() {
        let mut host = DisplaySurfaceHost::new();
        host.attach(SurfaceId::StateBrowser);
        assert!(host.is_visible(SurfaceId::StateBrowser));
        assert!(!host.is_visible(SurfaceId::LiveDisplay));
        assert!(host.is_attached(SurfaceId::LiveDisplay));

        host.attach(SurfaceId::LiveDisplay);
        assert_eq!(host.visible(), Some(SurfaceId::LiveDisplay));
    }

    #[test]
    fn test_attach_is_idempotent() {
        let mut host = DisplaySurfaceHost::new();
        host.attach(SurfaceId::StateBrowser);
        host.attach(SurfaceId::StateBrowser);
        host.detach(SurfaceId::StateBrowser);
        assert_eq!(host.visible(), Some(SurfaceId::LiveDisplay));
    }

    #[test]
    fn test_detach_reveals_previous_surface() {
        let mut host = DisplaySurfaceHost::new();
        host.attach(SurfaceId::StateBrowser);
        host.detach(SurfaceId::StateBrowser);
        assert_eq!(host.visible(), Some(SurfaceId::LiveDisplay));
        assert!(!host.is_attached(SurfaceId::StateBrowser));
    }

    #[test]
    fn test_detach_hidden_surface_keeps_visible() {
        let mut host = DisplaySurfaceHost::new();
        host.attach(SurfaceId::StateBrowser);
        host.detach(SurfaceId::LiveDisplay);
        assert_eq!(host.visible(), Some(SurfaceId::StateBrowser));

        host.detach(SurfaceId::StateBrowser);
        assert_eq!(host.visible(), None);
    }
}
