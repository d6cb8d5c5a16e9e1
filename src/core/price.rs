//! Price snapshot abstractions and the latest-wins price book

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// A single raw price reading for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub symbol: String,
    pub observed_at: DateTime<Utc>,
    pub price: f64,
}

impl PriceObservation {
    pub fn new(symbol: impl Into<String>, observed_at: DateTime<Utc>, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            observed_at,
            price,
        }
    }

    fn is_usable(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }
}

/// The price selected for a symbol, with the time it was observed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub price: f64,
    pub observed_at: DateTime<Utc>,
}

/// A selectable token, as shown by the token pickers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenOption {
    pub symbol: String,
    pub icon: String,
}

/// Deduplicated mapping from symbol to its most recent positive price.
///
/// Built once from a snapshot and never updated; a new snapshot produces a
/// new book. Symbols iterate in alphabetical order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceBook {
    entries: BTreeMap<String, PricePoint>,
}

impl PriceBook {
    /// Selects, per symbol, the positive price with the latest timestamp.
    ///
    /// When two usable observations share a timestamp the one listed first
    /// is kept.
    pub fn build(observations: &[PriceObservation]) -> Self {
        let mut latest: HashMap<&str, PricePoint> = HashMap::new();

        for obs in observations.iter().filter(|o| o.is_usable()) {
            let candidate = PricePoint {
                price: obs.price,
                observed_at: obs.observed_at,
            };
            latest
                .entry(obs.symbol.as_str())
                .and_modify(|current| {
                    if candidate.observed_at > current.observed_at {
                        *current = candidate;
                    }
                })
                .or_insert(candidate);
        }

        Self {
            entries: latest
                .into_iter()
                .map(|(symbol, point)| (symbol.to_string(), point))
                .collect(),
        }
    }

    pub fn price(&self, symbol: &str) -> Option<f64> {
        self.entries.get(symbol).map(|p| p.price)
    }

    pub fn point(&self, symbol: &str) -> Option<&PricePoint> {
        self.entries.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PricePoint)> {
        self.entries.iter().map(|(s, p)| (s.as_str(), p))
    }

    /// Known symbols, alphabetically.
    pub fn symbols(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Symbols containing `needle`, ignoring case.
    pub fn search(&self, needle: &str) -> Vec<&str> {
        let needle = needle.to_lowercase();
        self.symbols()
            .into_iter()
            .filter(|s| s.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn token_options(&self, icon_base: &str) -> Vec<TokenOption> {
        self.symbols()
            .into_iter()
            .map(|symbol| TokenOption {
                symbol: symbol.to_string(),
                icon: icon_url(icon_base, symbol),
            })
            .collect()
    }
}

/// Icon location for a symbol. The icon is not checked for existence.
pub fn icon_url(base: &str, symbol: &str) -> String {
    format!("{}/{}.svg", base.trim_end_matches('/'), symbol)
}

/// The snapshot could not be fetched or decoded.
#[derive(Debug, Error)]
#[error("Failed to load token prices")]
pub struct IngestionFailure {
    pub reason: String,
}

#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<Vec<PriceObservation>>;
}
