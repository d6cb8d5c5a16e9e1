use super::ui;
use crate::core::{ConversionEstimator, FormEvent, FormState, PriceBook, SwapForm};
use anyhow::{Result, bail};
use std::time::Duration;
use tracing::debug;

/// Fills in the form, submits it, and waits out the simulated swap.
pub async fn submit(
    book: &PriceBook,
    estimator: ConversionEstimator,
    from: &str,
    to: &str,
    amount: &str,
    delay: Duration,
) -> SwapForm {
    let mut form = SwapForm::new(estimator);
    form.handle(FormEvent::SelectFrom(from.to_string()), book);
    form.handle(FormEvent::SelectTo(to.to_string()), book);
    form.handle(FormEvent::EnterAmount(amount.to_string()), book);

    if let Some(output) = form.estimated_output(book) {
        println!(
            "Estimated Output: {} {}",
            ui::style_text(&output.to_string(), ui::StyleType::Value),
            form.to_symbol()
        );
    }

    form.handle(FormEvent::Submit, book);
    if form.is_submitting() {
        let spinner = ui::new_spinner("Swapping...");
        debug!(?delay, "Simulating swap submission");
        tokio::time::sleep(delay).await;
        spinner.finish_and_clear();
        form.handle(FormEvent::Acknowledge, book);
    }
    form
}

pub async fn run(
    book: &PriceBook,
    estimator: ConversionEstimator,
    from: &str,
    to: &str,
    amount: &str,
    delay: Duration,
) -> Result<()> {
    let form = submit(book, estimator, from, to, amount, delay).await;
    match form.state() {
        FormState::Success { message } => {
            println!("{}", ui::style_text(message, ui::StyleType::Success));
            Ok(())
        }
        FormState::Error { message } => {
            eprintln!("{}", ui::style_text(message, ui::StyleType::Error));
            bail!("{message}")
        }
        other => bail!("Swap did not complete: {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PriceObservation;
    use chrono::{TimeZone, Utc};

    fn book() -> PriceBook {
        let t = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        PriceBook::build(&[
            PriceObservation::new("BTC", t, 55000.0),
            PriceObservation::new("ETH", t, 2000.0),
        ])
    }

    #[tokio::test]
    async fn test_submit_succeeds() {
        let form = submit(
            &book(),
            ConversionEstimator::default(),
            "ETH",
            "BTC",
            "11",
            Duration::ZERO,
        )
        .await;

        assert_eq!(
            form.state(),
            &FormState::Success {
                message: "Swapped 11 ETH to ~0.4000 BTC".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_submit_reports_validation_error() {
        let form = submit(
            &book(),
            ConversionEstimator::default(),
            "ETH",
            "ETH",
            "1",
            Duration::ZERO,
        )
        .await;

        assert_eq!(
            form.state(),
            &FormState::Error {
                message: "Please choose two different tokens.".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_run_fails_on_invalid_amount() {
        let err = run(
            &book(),
            ConversionEstimator::default(),
            "ETH",
            "BTC",
            "-5",
            Duration::ZERO,
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid amount.");
    }

    #[tokio::test]
    async fn test_submit_waits_for_delay() {
        let start = std::time::Instant::now();
        let form = submit(
            &book(),
            ConversionEstimator::default(),
            "BTC",
            "ETH",
            "1",
            Duration::from_millis(50),
        )
        .await;

        assert!(start.elapsed() >= Duration::from_millis(50));
        assert!(matches!(form.state(), FormState::Success { .. }));
    }
}
