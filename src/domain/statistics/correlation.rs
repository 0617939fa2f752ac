use super::stats::pearson_correlation;
use crate::domain::market::{PricePoint, PriceSeries};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Square matrix of pairwise correlations, row-major.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationMatrix {
    rows: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.rows.get(i).and_then(|row| row.get(j)).copied()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }
}

/// Builds the n×n correlation matrix for `series`.
///
/// The diagonal is fixed at 1. Every other cell is computed on its own, with
/// no mirroring of the upper triangle; rows are evaluated in parallel.
pub fn correlation_matrix<S>(series: &[S]) -> CorrelationMatrix
where
    S: AsRef<[PricePoint]> + Sync,
{
    let rows = (0..series.len())
        .into_par_iter()
        .map(|i| {
            (0..series.len())
                .map(|j| {
                    if i == j {
                        1.0
                    } else {
                        pearson_correlation(series[i].as_ref(), series[j].as_ref())
                    }
                })
                .collect()
        })
        .collect();

    CorrelationMatrix { rows }
}

pub fn compute_correlation_matrix(series: &[PriceSeries]) -> CorrelationMatrix {
    correlation_matrix(series)
}

/// Heatmap colour buckets, strongest negative to strongest positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationBand {
    StrongNegative,
    Negative,
    ModerateNegative,
    WeakNegative,
    Neutral,
    WeakPositive,
    ModeratePositive,
    Positive,
    StrongPositive,
}

impl CorrelationBand {
    pub fn classify(correlation: f64) -> Self {
        if correlation > 0.8 {
            Self::StrongPositive
        } else if correlation > 0.6 {
            Self::Positive
        } else if correlation > 0.4 {
            Self::ModeratePositive
        } else if correlation > 0.2 {
            Self::WeakPositive
        } else if correlation > -0.2 {
            Self::Neutral
        } else if correlation > -0.4 {
            Self::WeakNegative
        } else if correlation > -0.6 {
            Self::ModerateNegative
        } else if correlation > -0.8 {
            Self::Negative
        } else {
            Self::StrongNegative
        }
    }

    /// Legend order, left to right
    pub fn all() -> [CorrelationBand; 9] {
        [
            Self::StrongNegative,
            Self::Negative,
            Self::ModerateNegative,
            Self::WeakNegative,
            Self::Neutral,
            Self::WeakPositive,
            Self::ModeratePositive,
            Self::Positive,
            Self::StrongPositive,
        ]
    }

    /// Signed intensity from -4 (strong negative) to 4 (strong positive).
    pub fn intensity(&self) -> i8 {
        match self {
            Self::StrongNegative => -4,
            Self::Negative => -3,
            Self::ModerateNegative => -2,
            Self::WeakNegative => -1,
            Self::Neutral => 0,
            Self::WeakPositive => 1,
            Self::ModeratePositive => 2,
            Self::Positive => 3,
            Self::StrongPositive => 4,
        }
    }
}
