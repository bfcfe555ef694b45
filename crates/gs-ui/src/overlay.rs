//! Overlay manager
//!
//! Owns the save-state browser and the debugger windows. There is at most one
//! state browser; opening it pauses a running session and closing it resumes
//! the session only if the browser was the one that paused it. Debugger
//! windows may be many and never touch the pause state.

use crate::display::{DisplaySurfaceHost, SurfaceId};
use crate::debugger::DebuggerView;
use crate::state_browser::{LoadSave, StateBrowserView};
use gs_core::Result;
use gs_integration::{DebugBinding, SharedSession};
use std::sync::Arc;

/// How an overlay is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Occupies the main window through the display host
    Attached,
    /// Floating window of its own
    TopLevel,
}

/// The open state browser
pub struct StateBrowserHandle {
    view: StateBrowserView,
    paused_session_on_open: bool,
    presentation: Presentation,
}

impl StateBrowserHandle {
    pub fn mode(&self) -> LoadSave {
        self.view.mode()
    }

    pub fn view(&self) -> &StateBrowserView {
        &self.view
    }

    pub fn paused_session_on_open(&self) -> bool {
        self.paused_session_on_open
    }

    pub fn presentation(&self) -> Presentation {
        self.presentation
    }
}

/// An open debugger window
pub struct DebuggerWindow {
    pub id: u64,
    pub view: DebuggerView,
}

/// Overlay manager
pub struct OverlayManager {
    state_browser: Option<StateBrowserHandle>,
    debug_binding: Option<Arc<DebugBinding>>,
    debuggers: Vec<DebuggerWindow>,
    next_debugger_id: u64,
    gdb_port: u16,
}

impl OverlayManager {
    pub fn new(gdb_port: u16) -> Self {
        Self {
            state_browser: None,
            debug_binding: None,
            debuggers: Vec::new(),
            next_debugger_id: 1,
            gdb_port,
        }
    }

    /// Open the save-state browser, or return the one already open
    pub fn open_state_browser(
        &mut self,
        mode: LoadSave,
        session: &SharedSession,
        host: &mut DisplaySurfaceHost,
        fullscreen: bool,
    ) -> Result<&StateBrowserHandle> {
        self.open_state_browser_with(mode, session, host, fullscreen, |mode| {
            StateBrowserView::new(mode, session)
        })
    }

    /// Like [`open_state_browser`](Self::open_state_browser) with a custom
    /// view constructor. Nothing is committed if `build` fails.
    pub fn open_state_browser_with<F>(
        &mut self,
        mode: LoadSave,
        session: &SharedSession,
        host: &mut DisplaySurfaceHost,
        fullscreen: bool,
        build: F,
    ) -> Result<&StateBrowserHandle>
    where
        F: FnOnce(LoadSave) -> Result<StateBrowserView>,
    {
        let handle = match self.state_browser.take() {
            Some(existing) => existing,
            None => {
                let view = build(mode)?;

                let paused_session_on_open = session.write().set_paused(true);
                let presentation = if fullscreen {
                    host.attach(SurfaceId::StateBrowser);
                    Presentation::Attached
                } else {
                    Presentation::TopLevel
                };
                tracing::debug!(
                    "State browser opened ({:?}, {:?}, paused session: {})",
                    mode,
                    presentation,
                    paused_session_on_open
                );

                StateBrowserHandle {
                    view,
                    paused_session_on_open,
                    presentation,
                }
            }
        };

        Ok(self.state_browser.insert(handle))
    }

    /// Tear down the state browser. Returns whether one was open.
    pub fn state_browser_closed(
        &mut self,
        session: &SharedSession,
        host: &mut DisplaySurfaceHost,
    ) -> bool {
        let Some(handle) = self.state_browser.take() else {
            return false;
        };

        if handle.presentation == Presentation::Attached {
            host.detach(SurfaceId::StateBrowser);
        }
        if handle.paused_session_on_open {
            session.write().set_paused(false);
        }
        tracing::debug!("State browser closed");
        true
    }

    pub fn state_browser(&self) -> Option<&StateBrowserHandle> {
        self.state_browser.as_ref()
    }

    /// Open another debugger window. Returns its id.
    pub fn open_debugger(&mut self, session: &SharedSession) -> u64 {
        let port = self.gdb_port;
        let binding = self
            .debug_binding
            .get_or_insert_with(|| Arc::new(DebugBinding::new(session.clone(), port)))
            .clone();

        let id = self.next_debugger_id;
        self.next_debugger_id += 1;
        self.debuggers.push(DebuggerWindow {
            id,
            view: DebuggerView::new(binding),
        });
        tracing::debug!("Debugger window {} opened", id);
        id
    }

    /// Destroy a debugger window. Returns whether it existed.
    pub fn close_debugger(&mut self, id: u64) -> bool {
        let before = self.debuggers.len();
        self.debuggers.retain(|window| window.id != id);
        before != self.debuggers.len()
    }

    pub fn debug_binding(&self) -> Option<&Arc<DebugBinding>> {
        self.debug_binding.as_ref()
    }

    pub fn debuggers(&self) -> &[DebuggerWindow] {
        &self.debuggers
    }

    pub fn debuggers_mut(&mut self) -> &mut [DebuggerWindow] {
        &mut self.debuggers
    }

    /// Close everything, the state browser through its normal close path
    pub fn hide_all(&mut self, session: &SharedSession, host: &mut DisplaySurfaceHost) {
        self.state_browser_closed(session, host);
        if !self.debuggers.is_empty() {
            tracing::debug!("Closing {} debugger windows", self.debuggers.len());
            self.debuggers.clear();
        }
    }
}
