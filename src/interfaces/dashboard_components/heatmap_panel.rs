use crate::domain::statistics::CorrelationBand;
use crate::interfaces::components::Card;
use crate::interfaces::design_system::DesignSystem;
use crate::interfaces::view_models::dashboard_view_model::DashboardViewModel;
use eframe::egui;

/// Correlation heatmap with legend and a detail card for the hovered stock.
pub fn render_heatmap_panel(vm: &mut DashboardViewModel, ui: &mut egui::Ui) {
    ui.label(
        egui::RichText::new(format!("Correlation heatmap · {}", vm.interval.label()))
            .strong()
            .size(16.0)
            .color(DesignSystem::TEXT_PRIMARY),
    );
    ui.add_space(DesignSystem::SPACING_SMALL);

    let Some(heatmap) = vm.heatmap.as_ref() else {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(egui::RichText::new("Fetching price histories...").color(DesignSystem::TEXT_MUTED));
        });
        return;
    };

    if heatmap.stocks.is_empty() {
        ui.label(
            egui::RichText::new("No stocks with price data in this interval.")
                .italics()
                .color(DesignSystem::TEXT_MUTED),
        );
        return;
    }

    render_legend(ui);
    ui.add_space(DesignSystem::SPACING_MEDIUM);

    let cell = egui::vec2(DesignSystem::HEATMAP_CELL, DesignSystem::HEATMAP_CELL * 0.6);
    let mut hovered = None;

    egui::ScrollArea::both()
        .id_salt("heatmap_scroll")
        .max_height((ui.available_height() - 180.0).max(200.0))
        .show(ui, |ui| {
            egui::Grid::new("correlation_grid")
                .spacing([2.0, 2.0])
                .show(ui, |ui| {
                    ui.label("");
                    for (j, stock) in heatmap.stocks.iter().enumerate() {
                        let header = ui.label(egui::RichText::new(&stock.ticker).strong().size(11.0));
                        if header.hovered() {
                            hovered = Some(j);
                        }
                    }
                    ui.end_row();

                    for (i, stock) in heatmap.stocks.iter().enumerate() {
                        let header = ui.label(egui::RichText::new(&stock.ticker).strong().size(11.0));
                        if header.hovered() {
                            hovered = Some(i);
                        }

                        for (j, other) in heatmap.stocks.iter().enumerate() {
                            let value = heatmap.matrix.get(i, j).unwrap_or(0.0);
                            let band = CorrelationBand::classify(value);
                            let (rect, response) = ui.allocate_exact_size(cell, egui::Sense::hover());

                            let mut fill = DesignSystem::band_color(band);
                            if response.hovered() {
                                fill = fill.gamma_multiply(1.3);
                                hovered = Some(i);
                            }
                            ui.painter().rect_filled(rect, DesignSystem::ROUNDING_SMALL, fill);
                            ui.painter().text(
                                rect.center(),
                                egui::Align2::CENTER_CENTER,
                                format!("{:.2}", value),
                                egui::FontId::proportional(12.0),
                                DesignSystem::TEXT_ON_CELL,
                            );
                            response.on_hover_text(format!(
                                "{} / {}: {:.4}",
                                stock.ticker, other.ticker, value
                            ));
                        }
                        ui.end_row();
                    }
                });
        });

    if hovered.is_some() {
        vm.hovered_stock = hovered;
    }

    ui.add_space(DesignSystem::SPACING_MEDIUM);
    match vm.hovered_detail() {
        Some(detail) => {
            Card::new()
                .title(format!("{} ({})", detail.name, detail.ticker))
                .accent(DesignSystem::ACCENT_PRIMARY)
                .rows(
                    ui,
                    "stock_detail",
                    &[
                        ("Average price", detail.average),
                        ("Std. deviation", detail.std_dev),
                        ("Data points", detail.data_points.to_string()),
                        ("Volatility", detail.volatility),
                    ],
                );
        }
        None => {
            ui.label(
                egui::RichText::new("Hover a ticker or cell for stock details.")
                    .color(DesignSystem::TEXT_MUTED),
            );
        }
    }
}

fn render_legend(ui: &mut egui::Ui) {
    ui.horizontal_wrapped(|ui| {
        ui.label(egui::RichText::new("Correlation:").color(DesignSystem::TEXT_SECONDARY));
        for band in CorrelationBand::all() {
            let (rect, _) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
            ui.painter()
                .rect_filled(rect, 2.0, DesignSystem::band_color(band));
            ui.label(
                egui::RichText::new(DesignSystem::band_label(band))
                    .size(11.0)
                    .color(DesignSystem::TEXT_SECONDARY),
            );
        }
    });
}
