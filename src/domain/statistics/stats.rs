//! Descriptive statistics over price series.
//!
//! Undefined results never surface as NaN or errors: a degenerate input
//! (too few points, zero variance) yields `0.0`.

use crate::domain::market::{PricePoint, PriceSeries};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Average and sample standard deviation of one series.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStatistics {
    pub average: f64,
    pub std_dev: f64,
}

impl SeriesStatistics {
    /// Standard deviation as a percentage of the average.
    pub fn volatility_pct(&self) -> f64 {
        if self.average == 0.0 {
            0.0
        } else {
            self.std_dev / self.average * 100.0
        }
    }
}

/// Arithmetic mean of the prices.
///
/// Callers must pass a non-empty slice; an empty one yields `0.0`.
pub fn mean(prices: &[PricePoint]) -> f64 {
    let values: Vec<f64> = prices.iter().map(|p| p.price).collect();
    mean_of(&values)
}

/// Sample standard deviation (Bessel's correction).
///
/// A single point divides by 1 instead of 0, so it reports `0.0`.
pub fn sample_std_dev(prices: &[PricePoint]) -> f64 {
    let values: Vec<f64> = prices.iter().map(|p| p.price).collect();
    let avg = mean_of(&values);
    sample_variance(&values, avg).sqrt()
}

pub fn compute_statistics(series: &PriceSeries) -> SeriesStatistics {
    let values: Vec<f64> = series.values().collect();
    let average = mean_of(&values);
    SeriesStatistics {
        average,
        std_dev: sample_variance(&values, average).sqrt(),
    }
}

/// Pearson correlation over the timestamps both series share.
///
/// Returns `0.0` when fewer than two timestamps overlap or when either
/// paired subset has zero variance.
pub fn pearson_correlation(a: &[PricePoint], b: &[PricePoint]) -> f64 {
    let (pairs_a, pairs_b) = paired_prices(a, b);
    if pairs_a.len() < 2 {
        return 0.0;
    }

    let mean_a = mean_of(&pairs_a);
    let mean_b = mean_of(&pairs_b);

    let var_a = sample_variance(&pairs_a, mean_a);
    let var_b = sample_variance(&pairs_b, mean_b);
    if var_a == 0.0 || var_b == 0.0 {
        return 0.0;
    }

    let mut covariance = 0.0;
    for (x, y) in pairs_a.iter().zip(&pairs_b) {
        covariance += (x - mean_a) * (y - mean_b);
    }
    covariance /= (pairs_a.len() - 1) as f64;

    // var_a * var_b underflows for tiny deviations; the product of the
    // square roots does not
    let r = covariance / (var_a.sqrt() * var_b.sqrt());
    if r.is_finite() {
        r.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Prices of `a` and `b` at their common timestamps, oldest first.
///
/// Keyed by millisecond timestamp; a repeated timestamp keeps the last price.
fn paired_prices(a: &[PricePoint], b: &[PricePoint]) -> (Vec<f64>, Vec<f64>) {
    let map_a: BTreeMap<i64, f64> = a.iter().map(|p| (p.timestamp_ms(), p.price)).collect();
    let map_b: BTreeMap<i64, f64> = b.iter().map(|p| (p.timestamp_ms(), p.price)).collect();

    map_a
        .iter()
        .filter_map(|(ts, price_a)| map_b.get(ts).map(|price_b| (*price_a, *price_b)))
        .unzip()
}

fn mean_of(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_variance(values: &[f64], mean: f64) -> f64 {
    // Exactly flat input: skip the subtraction so rounding in `mean` can't
    // leave a residue of ~1e-30.
    if values.windows(2).all(|w| w[0] == w[1]) {
        return 0.0;
    }

    let squared: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    let denominator = if values.len() > 1 {
        (values.len() - 1) as f64
    } else {
        1.0
    };
    squared / denominator
}
