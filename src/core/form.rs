//! Swap form state machine

use super::estimate::{ConversionEstimator, ConversionQuery, ConversionResult};
use super::price::PriceBook;

#[derive(Debug, Clone, PartialEq)]
pub enum FormState {
    Idle,
    Validating,
    Submitting {
        query: ConversionQuery,
        result: ConversionResult,
    },
    Success {
        message: String,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    SelectFrom(String),
    SelectTo(String),
    EnterAmount(String),
    SwapTokens,
    Submit,
    /// The simulated swap request completed.
    Acknowledge,
}

#[derive(Debug, Clone)]
pub struct SwapForm {
    from: String,
    to: String,
    amount: String,
    state: FormState,
    estimator: ConversionEstimator,
}

impl SwapForm {
    pub fn new(estimator: ConversionEstimator) -> Self {
        Self {
            from: String::new(),
            to: String::new(),
            amount: String::new(),
            state: FormState::Idle,
            estimator,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn from_symbol(&self) -> &str {
        &self.from
    }

    pub fn to_symbol(&self) -> &str {
        &self.to
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, FormState::Submitting { .. })
    }

    /// Applies one event and returns the resulting state.
    ///
    /// Edits are ignored while a submission is in flight, and
    /// `Acknowledge` is ignored unless one is.
    pub fn handle(&mut self, event: FormEvent, book: &PriceBook) -> &FormState {
        match event {
            FormEvent::SelectFrom(_)
            | FormEvent::SelectTo(_)
            | FormEvent::EnterAmount(_)
            | FormEvent::SwapTokens
            | FormEvent::Submit
                if self.is_submitting() => {}
            FormEvent::SelectFrom(symbol) => self.from = symbol,
            FormEvent::SelectTo(symbol) => self.to = symbol,
            FormEvent::EnterAmount(text) => self.amount = text,
            FormEvent::SwapTokens => std::mem::swap(&mut self.from, &mut self.to),
            FormEvent::Submit => {
                self.state = FormState::Validating;
                self.state = match self.validate(book) {
                    Ok((query, result)) => FormState::Submitting { query, result },
                    Err(message) => FormState::Error { message },
                };
            }
            FormEvent::Acknowledge => {
                if let FormState::Submitting { query, result } = &self.state {
                    let message = format!(
                        "Swapped {} {} to ~{} {}",
                        self.amount.trim(),
                        query.from_symbol,
                        result,
                        query.to_symbol
                    );
                    self.state = FormState::Success { message };
                }
            }
        }
        &self.state
    }

    /// Live estimate for the current fields, if they form a valid query.
    pub fn estimated_output(&self, book: &PriceBook) -> Option<ConversionResult> {
        self.validate(book).ok().map(|(_, result)| result)
    }

    fn validate(&self, book: &PriceBook) -> Result<(ConversionQuery, ConversionResult), String> {
        self.estimator
            .estimate_input(book, &self.from, &self.to, &self.amount)
            .map_err(|e| e.prompt())
    }
}

impl Default for SwapForm {
    fn default() -> Self {
        Self::new(ConversionEstimator::default())
    }
}
