use anyhow::Result;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::application::dashboard::{ChartView, DashboardService, HeatmapView};
use crate::application::market_data::{FallbackStockService, Sourced};
use crate::config::{Config, Mode};
use crate::domain::market::{StockDirectory, TimeInterval};
use crate::domain::ports::StockPriceService;
use crate::infrastructure::core::CircuitBreaker;
use crate::infrastructure::evaluation::EvaluationApiClient;
use crate::infrastructure::mock::MockStockService;
use crate::infrastructure::observability::{Metrics, MetricsReporter};

/// Requests from the UI thread to the runtime
#[derive(Debug, Clone)]
pub enum DashboardCommand {
    LoadStocks,
    LoadChart {
        ticker: String,
        interval: TimeInterval,
    },
    LoadHeatmap {
        interval: TimeInterval,
    },
}

/// Results pushed back to the UI thread
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    Stocks(Sourced<StockDirectory>),
    Chart(ChartView),
    Heatmap(HeatmapView),
}

pub struct SystemHandle {
    pub command_tx: mpsc::Sender<DashboardCommand>,
    pub event_rx: crossbeam_channel::Receiver<DashboardEvent>,
    pub default_interval: TimeInterval,
}

pub struct Application {
    pub config: Config,
    pub metrics: Metrics,
    pub market: Arc<FallbackStockService>,
    pub dashboard: Arc<DashboardService>,
    /// Present in live mode only
    pub circuit_breaker: Option<Arc<CircuitBreaker>>,
}

impl Application {
    pub fn build(config: Config) -> Result<Self> {
        info!("Building Stockboard Application (Mode: {:?})...", config.mode);

        let metrics = Metrics::new()?;
        let mock = Arc::new(MockStockService::new(config.mock.clone()));

        let (primary, circuit_breaker): (Option<Arc<dyn StockPriceService>>, _) = match config.mode
        {
            Mode::Live => {
                info!("Upstream stock API: {}", config.upstream.base_url);
                let client = EvaluationApiClient::new(&config.upstream, Some(metrics.clone()));
                let breaker = client.circuit_breaker();
                let client: Arc<dyn StockPriceService> = Arc::new(client);
                (Some(client), Some(breaker))
            }
            Mode::Mock => {
                info!("Mock mode: serving synthetic prices only");
                (None, None)
            }
        };

        let market = Arc::new(FallbackStockService::new(
            primary,
            mock,
            Some(metrics.clone()),
        ));
        let dashboard = Arc::new(DashboardService::new(
            market.clone(),
            config.dashboard.clone(),
            Some(metrics.clone()),
        ));

        Ok(Self {
            config,
            metrics,
            market,
            dashboard,
            circuit_breaker,
        })
    }

    /// Starts the JSON metrics reporter when observability is enabled.
    pub fn spawn_reporter(&self) -> Option<JoinHandle<()>> {
        if !self.config.observability.enabled {
            info!("Observability disabled, metrics reporter not started");
            return None;
        }
        let reporter = MetricsReporter::new(
            self.metrics.clone(),
            self.circuit_breaker.clone(),
            self.config.observability.report_interval,
        );
        Some(tokio::spawn(reporter.run()))
    }

    /// Spawns the command loop serving the desktop UI.
    ///
    /// Must be called from within a tokio runtime. Each command runs on its
    /// own task, so a slow heatmap does not hold up a chart.
    pub fn start(self) -> SystemHandle {
        let (command_tx, mut command_rx) = mpsc::channel::<DashboardCommand>(32);
        let (event_tx, event_rx) = crossbeam_channel::unbounded::<DashboardEvent>();
        let dashboard = self.dashboard.clone();
        let directory: Arc<RwLock<Option<StockDirectory>>> = Arc::new(RwLock::new(None));

        tokio::spawn(async move {
            while let Some(command) = command_rx.recv().await {
                debug!("Dashboard command: {:?}", command);
                let dashboard = dashboard.clone();
                let directory = directory.clone();
                let event_tx = event_tx.clone();

                tokio::spawn(async move {
                    let event = match command {
                        DashboardCommand::LoadStocks => {
                            let stocks = dashboard.stocks().await;
                            *directory.write().await = Some(stocks.value.clone());
                            DashboardEvent::Stocks(stocks)
                        }
                        DashboardCommand::LoadChart { ticker, interval } => {
                            DashboardEvent::Chart(dashboard.chart(&ticker, interval.minutes()).await)
                        }
                        DashboardCommand::LoadHeatmap { interval } => {
                            let cached = directory.read().await.clone();
                            let listings = match cached {
                                Some(listings) => listings,
                                None => dashboard.stocks().await.value,
                            };
                            DashboardEvent::Heatmap(
                                dashboard.heatmap(&listings, interval.minutes()).await,
                            )
                        }
                    };
                    if event_tx.send(event).is_err() {
                        warn!("Dashboard event dropped, UI is gone");
                    }
                });
            }
            info!("Dashboard command channel closed, command loop exiting");
        });

        SystemHandle {
            command_tx,
            event_rx,
            default_interval: self.config.dashboard.default_interval,
        }
    }
}
