use crate::domain::market::{StockDirectory, TimeInterval};
use crate::interfaces::design_system::DesignSystem;
use eframe::egui;

/// Stock picker. Returns the ticker the user picked, if it changed this frame.
pub fn stock_selector(
    ui: &mut egui::Ui,
    directory: &StockDirectory,
    selected: Option<&str>,
) -> Option<String> {
    let selected_text = match selected {
        Some(ticker) => match directory.name_of(ticker) {
            Some(name) => format!("{} ({})", name, ticker),
            None => ticker.to_string(),
        },
        None => "Select a stock".to_string(),
    };

    let mut picked = None;
    ui.add_enabled_ui(!directory.is_empty(), |ui| {
        egui::ComboBox::from_id_salt("stock_selector")
            .width(260.0)
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                for listing in directory.listings() {
                    let is_selected = selected == Some(listing.ticker.as_str());
                    let text = format!("{} ({})", listing.name, listing.ticker);
                    if ui.selectable_label(is_selected, text).clicked() && !is_selected {
                        picked = Some(listing.ticker.clone());
                    }
                }
            });
    });
    picked
}

/// Interval picker over the preset ranges.
pub fn interval_selector(ui: &mut egui::Ui, current: TimeInterval) -> Option<TimeInterval> {
    let mut picked = None;
    egui::ComboBox::from_id_salt("interval_selector")
        .selected_text(current.label())
        .show_ui(ui, |ui| {
            for interval in TimeInterval::all() {
                if ui
                    .selectable_label(interval == current, interval.label())
                    .clicked()
                    && interval != current
                {
                    picked = Some(interval);
                }
            }
        });
    picked
}

/// Warning strip shown while synthetic data is on screen.
pub fn fallback_banner(ui: &mut egui::Ui) {
    egui::Frame::NONE
        .fill(DesignSystem::WARNING_BG)
        .stroke(egui::Stroke::new(1.0, DesignSystem::WARNING))
        .corner_radius(DesignSystem::ROUNDING_SMALL)
        .inner_margin(egui::Margin::symmetric(12, 8))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(
                egui::RichText::new(
                    "⚠ The stock API is unavailable. Showing simulated prices.",
                )
                .color(DesignSystem::WARNING)
                .strong(),
            );
        });
}
