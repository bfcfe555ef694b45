//! Save-state slot browser

use eframe::egui;
use gs_core::{Result, ShellError};
use gs_integration::{SaveSlot, SharedSession, SlotInfo};

/// Whether the browser loads from or saves to the chosen slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSave {
    Load,
    Save,
}

impl LoadSave {
    pub fn title(&self) -> &'static str {
        match self {
            LoadSave::Load => "Load State",
            LoadSave::Save => "Save State",
        }
    }
}

/// One row of the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRow {
    pub slot: SaveSlot,
    pub info: Option<SlotInfo>,
}

/// Slot list bound to the running session
pub struct StateBrowserView {
    mode: LoadSave,
    session: SharedSession,
}

impl StateBrowserView {
    /// Build the view. Fails when there is no game to save or load.
    pub fn new(mode: LoadSave, session: &SharedSession) -> Result<Self> {
        if !session.read().is_active() {
            return Err(ShellError::NoActiveSession);
        }
        Ok(Self {
            mode,
            session: session.clone(),
        })
    }

    pub fn mode(&self) -> LoadSave {
        self.mode
    }

    /// Rows for slots 1 through 9
    pub fn rows(&self) -> Vec<SlotRow> {
        let session = self.session.read();
        SaveSlot::all()
            .map(|slot| SlotRow {
                slot,
                info: session.slot_info(slot),
            })
            .collect()
    }

    /// Save to or load from `slot`
    pub fn apply(&self, slot: SaveSlot) {
        let mut session = self.session.write();
        match self.mode {
            LoadSave::Load => session.quick_load(slot.number()),
            LoadSave::Save => session.quick_save(slot.number()),
        }
    }

    /// Draw the slot list. Returns the slot the user picked.
    pub fn show(&self, ui: &mut egui::Ui) -> Option<SaveSlot> {
        let mut chosen = None;

        ui.heading(self.mode.title());
        ui.separator();

        egui::Grid::new("state_slots")
            .striped(true)
            .num_columns(2)
            .show(ui, |ui| {
                for row in self.rows() {
                    let description = match row.info {
                        Some(info) => format!("Frame {}", info.frame),
                        None => "Empty".to_string(),
                    };
                    // Empty slots have nothing to load
                    let enabled = self.mode == LoadSave::Save || row.info.is_some();
                    if ui
                        .add_enabled(enabled, egui::Button::new(format!("Slot {}", row.slot)))
                        .clicked()
                    {
                        chosen = Some(row.slot);
                    }
                    ui.label(egui::RichText::new(description).monospace());
                    ui.end_row();
                }
            });

        chosen
    }
}
