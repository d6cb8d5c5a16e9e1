//! Conversion estimates between two priced symbols

use super::price::PriceBook;
use std::fmt::Display;
use thiserror::Error;

pub const DEFAULT_PRECISION: u32 = 4;
pub const MAX_PRECISION: u32 = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionQuery {
    pub from_symbol: String,
    pub to_symbol: String,
    pub amount: f64,
}

impl ConversionQuery {
    pub fn new(from_symbol: impl Into<String>, to_symbol: impl Into<String>, amount: f64) -> Self {
        Self {
            from_symbol: from_symbol.into(),
            to_symbol: to_symbol.into(),
            amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionResult {
    pub output_amount: f64,
    pub rate: f64,
    pub precision: u32,
}

impl Display for ConversionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.*}", self.precision as usize, self.output_amount)
    }
}

/// Reasons an estimate cannot be produced, in validation order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimationError {
    #[error("Both tokens must be selected")]
    MissingSelection,

    #[error("Source and target tokens are the same")]
    IdenticalSymbols,

    #[error("Amount must be a positive number")]
    InvalidAmount,

    #[error("No price available for {symbol}")]
    UnknownSymbol { symbol: String },
}

impl EstimationError {
    /// Message shown to the user when re-prompting.
    pub fn prompt(&self) -> String {
        match self {
            EstimationError::MissingSelection => "Please select both tokens.".to_string(),
            EstimationError::IdenticalSymbols => "Please choose two different tokens.".to_string(),
            EstimationError::InvalidAmount => "Please enter a valid amount.".to_string(),
            EstimationError::UnknownSymbol { symbol } => format!("No price available for {symbol}."),
        }
    }
}

/// Parses user-entered amount text.
pub fn parse_amount(text: &str) -> Result<f64, EstimationError> {
    let amount: f64 = text
        .trim()
        .parse()
        .map_err(|_| EstimationError::InvalidAmount)?;
    validate_amount(amount)
}

fn validate_amount(amount: f64) -> Result<f64, EstimationError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(EstimationError::InvalidAmount)
    }
}

/// Rounds half away from zero to `precision` fractional digits.
///
/// Values too large to scale have no fractional digits left and are
/// returned unchanged.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionEstimator {
    precision: u32,
}

impl ConversionEstimator {
    /// Precision above `MAX_PRECISION` is clamped.
    pub fn new(precision: u32) -> Self {
        Self {
            precision: precision.min(MAX_PRECISION),
        }
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn estimate(
        &self,
        book: &PriceBook,
        query: &ConversionQuery,
    ) -> Result<ConversionResult, EstimationError> {
        if query.from_symbol.is_empty() || query.to_symbol.is_empty() {
            return Err(EstimationError::MissingSelection);
        }
        if query.from_symbol == query.to_symbol {
            return Err(EstimationError::IdenticalSymbols);
        }
        let amount = validate_amount(query.amount)?;

        let price_of = |symbol: &str| {
            book.price(symbol)
                .ok_or_else(|| EstimationError::UnknownSymbol {
                    symbol: symbol.to_string(),
                })
        };
        let from_price = price_of(&query.from_symbol)?;
        let to_price = price_of(&query.to_symbol)?;

        let rate = from_price / to_price;
        let output = amount * rate;
        if !output.is_finite() {
            return Err(EstimationError::InvalidAmount);
        }
        Ok(ConversionResult {
            output_amount: round_to(output, self.precision),
            rate,
            precision: self.precision,
        })
    }

    /// Estimates from raw user input, with the amount still as text.
    ///
    /// Unparseable amounts are treated as NaN so that selection errors are
    /// still reported first.
    pub fn estimate_input(
        &self,
        book: &PriceBook,
        from: &str,
        to: &str,
        amount: &str,
    ) -> Result<(ConversionQuery, ConversionResult), EstimationError> {
        let amount = parse_amount(amount).unwrap_or(f64::NAN);
        let query = ConversionQuery::new(from.trim(), to.trim(), amount);
        let result = self.estimate(book, &query)?;
        Ok((query, result))
    }
}

impl Default for ConversionEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_PRECISION)
    }
}

/// Estimates with the default display precision.
pub fn estimate(
    book: &PriceBook,
    query: &ConversionQuery,
) -> Result<ConversionResult, EstimationError> {
    ConversionEstimator::default().estimate(book, query)
}
