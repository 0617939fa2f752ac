use crate::application::dashboard::{ChartView, HeatmapView, StockSnapshot};
use crate::application::market_data::DataSource;
use crate::application::system::{DashboardCommand, DashboardEvent};
use crate::domain::market::{PricePoint, StockDirectory, TimeInterval};
use crate::domain::statistics::SeriesStatistics;
use std::collections::VecDeque;

const MAX_LOG_LINES: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardTab {
    #[default]
    Chart,
    Heatmap,
}

/// Figures shown on the heatmap detail card for one stock
#[derive(Debug, Clone, PartialEq)]
pub struct StockDetail {
    pub ticker: String,
    pub name: String,
    pub average: String,
    pub std_dev: String,
    pub data_points: usize,
    pub volatility: String,
}

impl From<&StockSnapshot> for StockDetail {
    fn from(s: &StockSnapshot) -> Self {
        Self {
            ticker: s.ticker.clone(),
            name: s.name.clone(),
            average: format!("${:.2}", s.statistics.average),
            std_dev: format!("${:.2}", s.statistics.std_dev),
            data_points: s.data_points,
            volatility: format!("{:.2}%", s.volatility_pct),
        }
    }
}

/// UI state of the dashboard, independent of rendering.
///
/// Every method that changes what should be on screen returns the commands
/// needed to fetch it; the caller forwards them to the runtime.
#[derive(Debug, Default)]
pub struct DashboardViewModel {
    pub directory: StockDirectory,
    pub directory_source: Option<DataSource>,
    pub selected_ticker: Option<String>,
    pub interval: TimeInterval,
    pub tab: DashboardTab,
    pub chart: Option<ChartView>,
    pub heatmap: Option<HeatmapView>,
    pub hovered_stock: Option<usize>,
    pub loading_chart: bool,
    pub loading_heatmap: bool,
    pub logs: VecDeque<String>,
}

impl DashboardViewModel {
    pub fn new(interval: TimeInterval) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }

    pub fn initial_commands(&self) -> Vec<DashboardCommand> {
        vec![DashboardCommand::LoadStocks]
    }

    pub fn apply(&mut self, event: DashboardEvent) -> Vec<DashboardCommand> {
        match event {
            DashboardEvent::Stocks(stocks) => {
                self.directory = stocks.value;
                self.directory_source = Some(stocks.source);

                let still_listed = self
                    .selected_ticker
                    .as_deref()
                    .is_some_and(|t| self.directory.name_of(t).is_some());
                if still_listed {
                    return Vec::new();
                }
                match self.directory.first().map(|l| l.ticker.clone()) {
                    Some(first) => self.select_stock(&first).into_iter().collect(),
                    None => Vec::new(),
                }
            }
            DashboardEvent::Chart(chart) => {
                // Drop answers to selections the user has moved away from
                let current = self.selected_ticker.as_deref() == Some(chart.ticker.as_str())
                    && chart.minutes == self.interval.minutes();
                if current {
                    self.chart = Some(chart);
                    self.loading_chart = false;
                }
                Vec::new()
            }
            DashboardEvent::Heatmap(heatmap) => {
                if heatmap.minutes == self.interval.minutes() {
                    self.hovered_stock = None;
                    self.heatmap = Some(heatmap);
                    self.loading_heatmap = false;
                }
                Vec::new()
            }
        }
    }

    pub fn select_stock(&mut self, ticker: &str) -> Option<DashboardCommand> {
        if self.selected_ticker.as_deref() == Some(ticker) {
            return None;
        }
        self.selected_ticker = Some(ticker.to_string());
        self.chart = None;
        self.loading_chart = true;
        Some(DashboardCommand::LoadChart {
            ticker: ticker.to_string(),
            interval: self.interval,
        })
    }

    pub fn select_interval(&mut self, interval: TimeInterval) -> Vec<DashboardCommand> {
        if self.interval == interval {
            return Vec::new();
        }
        self.interval = interval;
        let mut commands = Vec::new();

        if let Some(ticker) = &self.selected_ticker {
            self.chart = None;
            self.loading_chart = true;
            commands.push(DashboardCommand::LoadChart {
                ticker: ticker.clone(),
                interval,
            });
        }
        if self.tab == DashboardTab::Heatmap || self.heatmap.is_some() {
            self.heatmap = None;
            self.loading_heatmap = true;
            commands.push(DashboardCommand::LoadHeatmap { interval });
        }
        commands
    }

    pub fn select_tab(&mut self, tab: DashboardTab) -> Option<DashboardCommand> {
        self.tab = tab;
        if tab == DashboardTab::Heatmap && self.heatmap.is_none() && !self.loading_heatmap {
            self.loading_heatmap = true;
            return Some(DashboardCommand::LoadHeatmap {
                interval: self.interval,
            });
        }
        None
    }

    pub fn push_log(&mut self, line: String) {
        let line = line.trim_end().to_string();
        if line.is_empty() {
            return;
        }
        if self.logs.len() == MAX_LOG_LINES {
            self.logs.pop_front();
        }
        self.logs.push_back(line);
    }

    /// True when anything on screen came from synthetic data.
    pub fn using_fallback(&self) -> bool {
        self.directory_source.is_some_and(|s| s.is_fallback())
            || self.chart.as_ref().is_some_and(|c| c.source.is_fallback())
            || self.heatmap.as_ref().is_some_and(|h| h.degraded)
    }

    pub fn hovered_detail(&self) -> Option<StockDetail> {
        let heatmap = self.heatmap.as_ref()?;
        heatmap
            .stocks
            .get(self.hovered_stock?)
            .map(StockDetail::from)
    }
}

/// The point of `points` closest in time to `x`, in seconds since the epoch.
pub fn nearest_point(points: &[PricePoint], x: f64) -> Option<&PricePoint> {
    points.iter().min_by(|a, b| {
        let da = (a.timestamp.timestamp() as f64 - x).abs();
        let db = (b.timestamp.timestamp() as f64 - x).abs();
        da.total_cmp(&db)
    })
}

/// Signed gap between a hovered price and the series average.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AverageDiff(pub f64);

impl AverageDiff {
    /// Strictly above the average; a price on the average reads as below.
    pub fn is_above(&self) -> bool {
        self.0 > 0.0
    }

    /// Two decimals with an explicit sign, e.g. `+1.25` or `-0.40`.
    pub fn label(&self) -> String {
        format!("{:+.2}", self.0)
    }
}

/// `None` when the chart has no statistics to compare against.
pub fn diff_from_average(
    point: &PricePoint,
    statistics: Option<SeriesStatistics>,
) -> Option<AverageDiff> {
    statistics.map(|stats| AverageDiff(point.price - stats.average))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::market_data::Sourced;
    use crate::domain::market::StockListing;
    use crate::domain::statistics::{CorrelationMatrix, SeriesStatistics};
    use chrono::{TimeZone, Utc};

    fn stocks(source: DataSource) -> DashboardEvent {
        let directory = StockDirectory::new(vec![
            StockListing::new("Apple Inc.", "AAPL"),
            StockListing::new("Nvidia Corporation", "NVDA"),
        ]);
        DashboardEvent::Stocks(Sourced {
            value: directory,
            source,
        })
    }

    fn chart(ticker: &str, minutes: u32, source: DataSource) -> DashboardEvent {
        DashboardEvent::Chart(ChartView {
            ticker: ticker.to_string(),
            minutes,
            points: vec![],
            statistics: None,
            source,
        })
    }

    fn heatmap(minutes: u32, degraded: bool) -> HeatmapView {
        HeatmapView {
            minutes,
            stocks: vec![StockSnapshot {
                ticker: "AAPL".to_string(),
                name: "Apple Inc.".to_string(),
                statistics: SeriesStatistics {
                    average: 123.456,
                    std_dev: 7.891,
                },
                data_points: 10,
                volatility_pct: 6.3918,
                source: DataSource::Upstream,
            }],
            matrix: CorrelationMatrix::default(),
            degraded,
        }
    }

    #[test]
    fn test_first_listing_is_selected_on_load() {
        let mut vm = DashboardViewModel::new(TimeInterval::ThirtyMin);
        let commands = vm.apply(stocks(DataSource::Upstream));

        assert_eq!(vm.selected_ticker.as_deref(), Some("AAPL"));
        assert!(vm.loading_chart);
        assert!(matches!(
            commands.as_slice(),
            [DashboardCommand::LoadChart { ticker, interval: TimeInterval::ThirtyMin }] if ticker == "AAPL"
        ));

        // Reloading the directory keeps the selection
        assert!(vm.apply(stocks(DataSource::Upstream)).is_empty());
    }

    #[test]
    fn test_stale_chart_is_ignored() {
        let mut vm = DashboardViewModel::new(TimeInterval::ThirtyMin);
        vm.apply(stocks(DataSource::Upstream));
        vm.select_stock("NVDA");

        vm.apply(chart("AAPL", 30, DataSource::Upstream));
        assert!(vm.chart.is_none());

        vm.apply(chart("NVDA", 15, DataSource::Upstream));
        assert!(vm.chart.is_none());

        vm.apply(chart("NVDA", 30, DataSource::Upstream));
        assert_eq!(vm.chart.as_ref().unwrap().ticker, "NVDA");
        assert!(!vm.loading_chart);
    }

    #[test]
    fn test_interval_change_reloads_visible_views() {
        let mut vm = DashboardViewModel::new(TimeInterval::ThirtyMin);
        vm.apply(stocks(DataSource::Upstream));
        assert!(vm.select_tab(DashboardTab::Heatmap).is_some());
        // A second switch while loading does not queue another request
        assert!(vm.select_tab(DashboardTab::Heatmap).is_none());

        let commands = vm.select_interval(TimeInterval::OneHour);
        assert_eq!(commands.len(), 2);
        assert!(vm.select_interval(TimeInterval::OneHour).is_empty());
    }

    #[test]
    fn test_fallback_banner_sources() {
        let mut vm = DashboardViewModel::new(TimeInterval::ThirtyMin);
        assert!(!vm.using_fallback());

        vm.apply(stocks(DataSource::Upstream));
        vm.apply(chart("AAPL", 30, DataSource::Fallback));
        assert!(vm.using_fallback());

        let mut vm = DashboardViewModel::new(TimeInterval::ThirtyMin);
        vm.apply(DashboardEvent::Heatmap(heatmap(30, true)));
        assert!(vm.using_fallback());
    }

    #[test]
    fn test_hovered_detail_formats_two_decimals() {
        let mut vm = DashboardViewModel::new(TimeInterval::ThirtyMin);
        vm.apply(DashboardEvent::Heatmap(heatmap(30, false)));
        assert!(vm.hovered_detail().is_none());

        vm.hovered_stock = Some(0);
        let detail = vm.hovered_detail().unwrap();
        assert_eq!(detail.average, "$123.46");
        assert_eq!(detail.std_dev, "$7.89");
        assert_eq!(detail.volatility, "6.39%");
        assert_eq!(detail.data_points, 10);
    }

    #[test]
    fn test_log_buffer_is_bounded() {
        let mut vm = DashboardViewModel::default();
        for i in 0..(MAX_LOG_LINES + 5) {
            vm.push_log(format!("line {i}\n"));
        }
        vm.push_log("   ".to_string());
        assert_eq!(vm.logs.len(), MAX_LOG_LINES);
        assert_eq!(vm.logs.front().unwrap(), "line 5");
    }

    #[test]
    fn test_nearest_point() {
        let t = |m: u32| Utc.with_ymd_and_hms(2025, 5, 8, 10, m, 0).unwrap();
        let points = vec![
            PricePoint::new(1.0, t(0)),
            PricePoint::new(2.0, t(5)),
            PricePoint::new(3.0, t(10)),
        ];
        let x = t(6).timestamp() as f64;
        assert_eq!(nearest_point(&points, x).unwrap().price, 2.0);
        assert!(nearest_point(&[], x).is_none());
    }

    #[test]
    fn test_diff_from_average() {
        let t = Utc.with_ymd_and_hms(2025, 5, 8, 10, 0, 0).unwrap();
        let stats = Some(SeriesStatistics {
            average: 100.0,
            std_dev: 2.0,
        });

        let above = diff_from_average(&PricePoint::new(101.256, t), stats).unwrap();
        assert!(above.is_above());
        assert_eq!(above.label(), "+1.26");

        let below = diff_from_average(&PricePoint::new(99.6, t), stats).unwrap();
        assert!(!below.is_above());
        assert_eq!(below.label(), "-0.40");

        let level = diff_from_average(&PricePoint::new(100.0, t), stats).unwrap();
        assert!(!level.is_above());
        assert_eq!(level.label(), "+0.00");

        assert!(diff_from_average(&PricePoint::new(100.0, t), None).is_none());
    }
}
