//! Log viewer panel for displaying shell and core logs

use eframe::egui;
use gs_core::{LogEntry, LogLevel, LogSink};

fn level_color(level: LogLevel) -> egui::Color32 {
    match level {
        LogLevel::Trace => egui::Color32::GRAY,
        LogLevel::Debug => egui::Color32::LIGHT_BLUE,
        LogLevel::Info => egui::Color32::WHITE,
        LogLevel::Warn => egui::Color32::YELLOW,
        LogLevel::Error => egui::Color32::RED,
    }
}

/// Log viewer panel state
pub struct LogViewer {
    /// Shared log buffer
    sink: LogSink,
    /// Filter by log level
    min_level: LogLevel,
    /// Filter by text
    filter_text: String,
    /// Auto-scroll to bottom
    auto_scroll: bool,
    /// Show timestamps
    show_timestamps: bool,
    /// Show targets (module names)
    show_targets: bool,
}

impl LogViewer {
    pub fn new(sink: LogSink) -> Self {
        Self {
            sink,
            min_level: LogLevel::Info,
            filter_text: String::new(),
            auto_scroll: true,
            show_timestamps: false,
            show_targets: true,
        }
    }

    pub fn sink(&self) -> &LogSink {
        &self.sink
    }

    /// Entries passing the level and text filters
    pub fn filtered(&self) -> Vec<LogEntry> {
        let filter_lower = self.filter_text.to_lowercase();
        self.sink
            .snapshot(self.min_level)
            .into_iter()
            .filter(|entry| {
                filter_lower.is_empty()
                    || entry.message.to_lowercase().contains(&filter_lower)
                    || entry.target.to_lowercase().contains(&filter_lower)
            })
            .collect()
    }

    /// Show the log viewer panel
    pub fn show(&mut self, ui: &mut egui::Ui) {
        // Toolbar
        ui.horizontal(|ui| {
            ui.label("Level:");
            egui::ComboBox::from_id_salt("log_level")
                .selected_text(self.min_level.label())
                .show_ui(ui, |ui| {
                    for level in LogLevel::all() {
                        ui.selectable_value(&mut self.min_level, level, level.label());
                    }
                });

            ui.separator();

            ui.label("Filter:");
            ui.add(
                egui::TextEdit::singleline(&mut self.filter_text)
                    .desired_width(150.0)
                    .hint_text("Search logs..."),
            );

            ui.separator();

            ui.checkbox(&mut self.auto_scroll, "Auto-scroll");
            ui.checkbox(&mut self.show_timestamps, "Timestamps");
            ui.checkbox(&mut self.show_targets, "Targets");

            ui.separator();

            if ui.button("🗑 Clear").clicked() {
                self.sink.clear();
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("{} entries", self.sink.len()));
            });
        });

        ui.separator();

        let entries = self.filtered();
        let row_height = ui.text_style_height(&egui::TextStyle::Monospace);

        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .stick_to_bottom(self.auto_scroll)
            .show_rows(ui, row_height, entries.len(), |ui, row_range| {
                for entry in &entries[row_range] {
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(format!("[{}]", entry.level.label()))
                                .color(level_color(entry.level))
                                .monospace(),
                        );

                        if self.show_timestamps {
                            let elapsed = entry.timestamp.elapsed();
                            ui.label(
                                egui::RichText::new(format!("{:.3}s", elapsed.as_secs_f64()))
                                    .monospace()
                                    .weak(),
                            );
                        }

                        if self.show_targets && !entry.target.is_empty() {
                            ui.label(
                                egui::RichText::new(format!("[{}]", entry.target))
                                    .monospace()
                                    .color(egui::Color32::LIGHT_GRAY),
                            );
                        }

                        ui.label(egui::RichText::new(&entry.message).monospace());
                    });
                }
            });
    }
}
