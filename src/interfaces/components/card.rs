use crate::interfaces::design_system::DesignSystem;
use eframe::egui;

/// Framed panel for figures: one headline stat, or a label/value table
pub struct Card {
    title: Option<String>,
    accent: Option<egui::Color32>,
}

impl Default for Card {
    fn default() -> Self {
        Self::new()
    }
}

impl Card {
    pub fn new() -> Self {
        Self {
            title: None,
            accent: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Outline the card in `color`, e.g. for the hovered heatmap stock
    pub fn accent(mut self, color: egui::Color32) -> Self {
        self.accent = Some(color);
        self
    }

    /// A single large figure under the title.
    pub fn stat(self, ui: &mut egui::Ui, value: &str) -> egui::Response {
        self.show(ui, |ui| {
            ui.label(
                egui::RichText::new(value)
                    .size(18.0)
                    .strong()
                    .color(DesignSystem::TEXT_PRIMARY),
            );
        })
        .response
    }

    /// Two-column label/value table; `id` must be unique within the panel.
    pub fn rows(self, ui: &mut egui::Ui, id: &str, rows: &[(&str, String)]) -> egui::Response {
        self.show(ui, |ui| {
            egui::Grid::new(id).num_columns(2).spacing([24.0, 4.0]).show(ui, |ui| {
                for (label, value) in rows {
                    ui.label(egui::RichText::new(*label).color(DesignSystem::TEXT_SECONDARY));
                    ui.label(egui::RichText::new(value).strong().color(DesignSystem::TEXT_PRIMARY));
                    ui.end_row();
                }
            });
        })
        .response
    }

    fn show<R>(
        self,
        ui: &mut egui::Ui,
        add_contents: impl FnOnce(&mut egui::Ui) -> R,
    ) -> egui::InnerResponse<R> {
        let mut frame = DesignSystem::card_frame();
        if let Some(color) = self.accent {
            frame = frame.stroke(egui::Stroke::new(1.5, color));
        }

        frame.show(ui, |ui| {
            if let Some(title) = self.title {
                ui.label(
                    egui::RichText::new(title)
                        .size(12.0)
                        .color(DesignSystem::TEXT_SECONDARY)
                        .strong(),
                );
                ui.add_space(DesignSystem::SPACING_SMALL);
            }
            add_contents(ui)
        })
    }
}
