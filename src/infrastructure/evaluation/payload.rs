//! Wire formats of the evaluation stock API.

use crate::domain::market::{PricePoint, StockDirectory};
use serde::{Deserialize, Serialize};

/// `GET /stocks`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StocksResponse {
    pub stocks: StockDirectory,
}

/// `GET /stocks/{ticker}` without a window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestPriceResponse {
    pub stock: PricePoint,
}

/// `GET /stocks/{ticker}?minutes=m`
///
/// The API normally answers with an array but has been seen returning the
/// single-price shape for the windowed call too.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PriceHistoryResponse {
    Series(Vec<PricePoint>),
    Latest(LatestPriceResponse),
}

impl PriceHistoryResponse {
    pub fn into_points(self) -> Vec<PricePoint> {
        match self {
            PriceHistoryResponse::Series(points) => points,
            PriceHistoryResponse::Latest(latest) => vec![latest.stock],
        }
    }
}
