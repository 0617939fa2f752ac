use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single price sample for a stock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: f64,
    #[serde(rename = "lastUpdatedAt")]
    pub timestamp: DateTime<Utc>,
}

impl PricePoint {
    pub fn new(price: f64, timestamp: DateTime<Utc>) -> Self {
        Self { price, timestamp }
    }

    /// Milliseconds since the epoch, the key used to pair samples across series.
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }
}

/// Price history of one ticker.
///
/// Points keep the order they were received in; use [`PriceSeries::sorted`]
/// when chronological order matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub ticker: String,
    pub name: String,
    pub prices: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(ticker: impl Into<String>, name: impl Into<String>, prices: Vec<PricePoint>) -> Self {
        Self {
            ticker: ticker.into(),
            name: name.into(),
            prices,
        }
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.prices.iter().map(|p| p.price)
    }

    /// Points ordered by timestamp, oldest first.
    pub fn sorted(&self) -> Vec<PricePoint> {
        let mut points = self.prices.clone();
        points.sort_by_key(|p| p.timestamp);
        points
    }
}

impl AsRef<[PricePoint]> for PriceSeries {
    fn as_ref(&self) -> &[PricePoint] {
        &self.prices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_wire_format_uses_last_updated_at() {
        let json = r#"{"price":231.95,"lastUpdatedAt":"2025-05-08T04:26:27.465134399Z"}"#;
        let point: PricePoint = serde_json::from_str(json).unwrap();
        assert!((point.price - 231.95).abs() < 1e-9);
        assert_eq!(point.timestamp.timestamp(), 1746678387);

        let out = serde_json::to_value(point).unwrap();
        assert!(out.get("lastUpdatedAt").is_some());
        assert!(out.get("timestamp").is_none());
    }

    #[test]
    fn test_sorted_orders_by_timestamp() {
        let t = |m: u32| Utc.with_ymd_and_hms(2025, 5, 8, 10, m, 0).unwrap();
        let series = PriceSeries::new(
            "AAPL",
            "Apple Inc.",
            vec![
                PricePoint::new(3.0, t(20)),
                PricePoint::new(1.0, t(0)),
                PricePoint::new(2.0, t(10)),
            ],
        );

        let prices: Vec<f64> = series.sorted().iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![1.0, 2.0, 3.0]);
        // Original order untouched
        assert_eq!(series.prices[0].price, 3.0);
    }
}
