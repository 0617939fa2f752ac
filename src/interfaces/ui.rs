use crate::application::client::{SystemClient, SystemEvent};
use crate::application::system::DashboardCommand;
use crate::interfaces::components::selectors::{fallback_banner, interval_selector, stock_selector};
use crate::interfaces::dashboard_components::chart_panel::render_chart_panel;
use crate::interfaces::dashboard_components::heatmap_panel::render_heatmap_panel;
use crate::interfaces::design_system::DesignSystem;
use crate::interfaces::view_models::dashboard_view_model::{DashboardTab, DashboardViewModel};
use chrono::Utc;
use eframe::egui;
use std::time::Duration;
use tracing::error;

/// Events drained per frame, so a burst of logs cannot stall rendering
const MAX_EVENTS_PER_FRAME: usize = 200;

pub struct StockboardApp {
    client: SystemClient,
    vm: DashboardViewModel,
    show_logs: bool,
}

impl StockboardApp {
    pub fn new(client: SystemClient) -> Self {
        let vm = DashboardViewModel::new(client.default_interval());
        let app = Self {
            client,
            vm,
            show_logs: false,
        };
        app.dispatch(app.vm.initial_commands());
        app
    }

    fn dispatch(&self, commands: impl IntoIterator<Item = DashboardCommand>) {
        for command in commands {
            if let Err(e) = self.client.send(command) {
                error!("{}", e);
            }
        }
    }

    fn drain_events(&mut self) {
        for _ in 0..MAX_EVENTS_PER_FRAME {
            match self.client.poll_next() {
                Some(SystemEvent::Dashboard(event)) => {
                    let commands = self.vm.apply(event);
                    self.dispatch(commands);
                }
                Some(SystemEvent::Log(line)) => self.vm.push_log(line),
                None => break,
            }
        }
    }
}

impl eframe::App for StockboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(DesignSystem::theme());
        self.drain_events();

        // --- Top bar: title and selectors ---
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("Stock Price Dashboard");
                ui.separator();

                if let Some(ticker) =
                    stock_selector(ui, &self.vm.directory, self.vm.selected_ticker.as_deref())
                {
                    let command = self.vm.select_stock(&ticker);
                    self.dispatch(command);
                }
                if let Some(interval) = interval_selector(ui, self.vm.interval) {
                    let commands = self.vm.select_interval(interval);
                    self.dispatch(commands);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(format!("UTC {}", Utc::now().format("%H:%M:%S")))
                            .color(DesignSystem::TEXT_SECONDARY)
                            .small(),
                    );
                    ui.toggle_value(&mut self.show_logs, "Logs");
                });
            });
            ui.add_space(6.0);
        });

        // --- Bottom: collapsible log panel ---
        if self.show_logs {
            egui::TopBottomPanel::bottom("log_panel")
                .resizable(true)
                .default_height(160.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            for line in &self.vm.logs {
                                ui.label(
                                    egui::RichText::new(line)
                                        .monospace()
                                        .size(11.0)
                                        .color(DesignSystem::TEXT_SECONDARY),
                                );
                            }
                        });
                });
        }

        // --- Main: banner, tabs, active view ---
        egui::CentralPanel::default()
            .frame(DesignSystem::main_frame())
            .show(ctx, |ui| {
                if self.vm.using_fallback() {
                    fallback_banner(ui);
                    ui.add_space(DesignSystem::SPACING_SMALL);
                }

                ui.horizontal(|ui| {
                    let mut tab = self.vm.tab;
                    ui.selectable_value(&mut tab, DashboardTab::Chart, "Price chart");
                    ui.selectable_value(&mut tab, DashboardTab::Heatmap, "Correlation heatmap");
                    if tab != self.vm.tab {
                        let command = self.vm.select_tab(tab);
                        self.dispatch(command);
                    }
                });
                ui.separator();

                match self.vm.tab {
                    DashboardTab::Chart => render_chart_panel(&self.vm, ui),
                    DashboardTab::Heatmap => render_heatmap_panel(&mut self.vm, ui),
                }
            });

        // Results arrive from the runtime without any input event
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}
