//! Debugger UI

use eframe::egui;
use gs_integration::{DebugBinding, SessionState};
use std::sync::Arc;

/// Debugger window contents
pub struct DebuggerView {
    binding: Arc<DebugBinding>,
    /// Frames to run per step
    step_count: u32,
}

impl DebuggerView {
    pub fn new(binding: Arc<DebugBinding>) -> Self {
        Self {
            binding,
            step_count: 1,
        }
    }

    pub fn binding(&self) -> &Arc<DebugBinding> {
        &self.binding
    }

    /// Show the debugger view
    pub fn show(&mut self, ui: &mut egui::Ui) {
        let state = self.binding.session_state();

        egui::Grid::new("debugger_status")
            .num_columns(2)
            .show(ui, |ui| {
                ui.label("Session:");
                let color = match state {
                    SessionState::Stopped => egui::Color32::GRAY,
                    SessionState::Running => egui::Color32::GREEN,
                    SessionState::Paused => egui::Color32::YELLOW,
                };
                ui.colored_label(color, format!("{:?}", state));
                ui.end_row();

                ui.label("Frame:");
                ui.label(egui::RichText::new(self.binding.frame_count().to_string()).monospace());
                ui.end_row();

                ui.label("GDB port:");
                ui.label(egui::RichText::new(self.binding.port().to_string()).monospace());
                ui.end_row();
            });

        let mut listening = self.binding.is_listening();
        if ui.checkbox(&mut listening, "Accept connections").changed() {
            self.binding.set_listening(listening);
        }

        ui.separator();

        // Control buttons
        ui.horizontal(|ui| {
            if ui
                .add_enabled(state == SessionState::Paused, egui::Button::new("▶ Continue"))
                .clicked()
            {
                self.binding.resume();
            }
            if ui
                .add_enabled(state == SessionState::Running, egui::Button::new("⏸ Break"))
                .clicked()
            {
                self.binding.break_into();
            }
            if ui
                .add_enabled(state == SessionState::Paused, egui::Button::new("⏭ Step"))
                .clicked()
            {
                for _ in 0..self.step_count {
                    self.binding.step();
                }
            }
            ui.add(egui::DragValue::new(&mut self.step_count).range(1..=600).suffix(" frames"));
        });
    }
}
