//! Client for the evaluation stock-price API.

pub mod client;
pub mod payload;

pub use client::EvaluationApiClient;
