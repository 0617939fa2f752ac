// Price access with mock fallback
pub mod market_data;

// Chart and heatmap views
pub mod dashboard;

// Wiring and the UI bridge
pub mod client;
pub mod system;
