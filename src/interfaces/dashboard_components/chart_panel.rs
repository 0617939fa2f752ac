use crate::domain::market::PricePoint;
use crate::interfaces::components::Card;
use crate::interfaces::design_system::DesignSystem;
use crate::interfaces::view_models::dashboard_view_model::{
    DashboardViewModel, diff_from_average, nearest_point,
};
use chrono::{TimeZone, Utc};
use eframe::egui;
use egui_plot::{Legend, Line, LineStyle, Plot, PlotPoints, Points};

/// Price chart for the selected stock with its average drawn across.
pub fn render_chart_panel(vm: &DashboardViewModel, ui: &mut egui::Ui) {
    let Some(ticker) = vm.selected_ticker.as_deref() else {
        ui.centered_and_justified(|ui| {
            ui.label(egui::RichText::new("Loading stocks...").color(DesignSystem::TEXT_MUTED));
        });
        return;
    };

    let title = match vm.directory.name_of(ticker) {
        Some(name) => format!("{} ({}) · {}", name, ticker, vm.interval.label()),
        None => format!("{} · {}", ticker, vm.interval.label()),
    };
    ui.label(
        egui::RichText::new(title)
            .strong()
            .size(16.0)
            .color(DesignSystem::TEXT_PRIMARY),
    );
    ui.add_space(DesignSystem::SPACING_SMALL);

    let Some(chart) = vm.chart.as_ref() else {
        ui.spinner();
        return;
    };

    if chart.points.is_empty() {
        ui.label(
            egui::RichText::new(format!("No price data for {} in this interval.", ticker))
                .italics()
                .color(DesignSystem::TEXT_MUTED),
        );
        return;
    }

    if let Some(stats) = chart.statistics {
        ui.horizontal(|ui| {
            render_stat(ui, "Average", &format!("${:.2}", stats.average));
            render_stat(ui, "Std. deviation", &format!("${:.2}", stats.std_dev));
            render_stat(ui, "Data points", &chart.points.len().to_string());
        });
        ui.add_space(DesignSystem::SPACING_SMALL);
    }

    let prices: Vec<[f64; 2]> = chart
        .points
        .iter()
        .map(|p| [p.timestamp.timestamp() as f64, p.price])
        .collect();
    let first_x = prices.first().map(|p| p[0]).unwrap_or_default();
    let last_x = prices.last().map(|p| p[0]).unwrap_or_default();

    let height = (ui.available_height() - 60.0).max(300.0);
    let response = Plot::new(format!("price_chart_{}", ticker))
        .height(height)
        .show_grid([true, true])
        .legend(Legend::default())
        .x_axis_formatter(|mark, _range| {
            Utc.timestamp_opt(mark.value as i64, 0)
                .single()
                .map(|dt| dt.format("%H:%M").to_string())
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(ticker.to_string(), PlotPoints::from(prices))
                    .color(DesignSystem::ACCENT_PRIMARY)
                    .width(2.0),
            );

            if let Some(stats) = chart.statistics {
                plot_ui.line(
                    Line::new(
                        "Average",
                        PlotPoints::from(vec![[first_x, stats.average], [last_x, stats.average]]),
                    )
                    .color(DesignSystem::ACCENT_AVERAGE)
                    .style(LineStyle::dashed_dense()),
                );
            }

            let hovered: Option<PricePoint> = plot_ui
                .pointer_coordinate()
                .and_then(|pointer| nearest_point(&chart.points, pointer.x).copied());
            if let Some(point) = hovered {
                plot_ui.points(
                    Points::new(
                        "",
                        PlotPoints::from(vec![[point.timestamp.timestamp() as f64, point.price]]),
                    )
                    .radius(5.0)
                    .color(DesignSystem::TEXT_PRIMARY),
                );
            }
            hovered
        });

    match response.inner {
        Some(point) => {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(format!(
                        "{}  ${:.2}",
                        point.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
                        point.price
                    ))
                    .monospace()
                    .color(DesignSystem::TEXT_PRIMARY),
                );
                if let Some(diff) = diff_from_average(&point, chart.statistics) {
                    let color = if diff.is_above() {
                        DesignSystem::PRICE_UP
                    } else {
                        DesignSystem::PRICE_DOWN
                    };
                    ui.label(
                        egui::RichText::new(format!("{} vs avg", diff.label()))
                            .monospace()
                            .color(color),
                    );
                }
            });
        }
        None => {
            ui.label(
                egui::RichText::new("Hover the chart to inspect a price.")
                    .color(DesignSystem::TEXT_MUTED),
            );
        }
    }
}

fn render_stat(ui: &mut egui::Ui, label: &str, value: &str) {
    Card::new().title(label).stat(ui, value);
}
