pub mod chart_panel;
pub mod heatmap_panel;
