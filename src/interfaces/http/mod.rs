//! HTTP surface of the headless server: the stock API proxy, the dashboard
//! views as JSON, plus health and Prometheus metrics.

pub mod error;
pub mod routes;

pub use error::ApiError;
pub use routes::DATA_SOURCE_HEADER;

use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::application::dashboard::DashboardService;
use crate::application::market_data::FallbackStockService;
use crate::application::system::Application;
use crate::infrastructure::observability::Metrics;

/// Shared state for all handlers
pub struct ApiState {
    pub market: Arc<FallbackStockService>,
    pub dashboard: Arc<DashboardService>,
    pub metrics: Metrics,
}

impl ApiState {
    pub fn from_application(app: &Application) -> Self {
        Self {
            market: app.market.clone(),
            dashboard: app.dashboard.clone(),
            metrics: app.metrics.clone(),
        }
    }

    fn default_minutes(&self) -> u32 {
        self.dashboard.config().default_interval.minutes()
    }
}

/// Assemble the full router.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .merge(routes::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
