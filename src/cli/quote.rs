use super::ui;
use crate::core::{ConversionEstimator, ConversionQuery, ConversionResult, PriceBook};
use comfy_table::Cell;

pub fn render(book: &PriceBook, query: &ConversionQuery, result: &ConversionResult) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Token"), ui::header_cell("Price")]);
    for symbol in [&query.from_symbol, &query.to_symbol] {
        let price = book.price(symbol).map_or("N/A".to_string(), ui::format_price);
        table.add_row(vec![Cell::new(symbol), ui::number_cell(price)]);
    }

    format!(
        "{}\n\n{}\n\nRate: 1 {} = {} {}\nEstimated Output: {} {}",
        ui::style_text("Swap Estimate", ui::StyleType::Title),
        table,
        query.from_symbol,
        result.rate,
        query.to_symbol,
        ui::style_text(&result.to_string(), ui::StyleType::Value),
        query.to_symbol
    )
}

pub fn run(
    book: &PriceBook,
    estimator: &ConversionEstimator,
    from: &str,
    to: &str,
    amount: &str,
) -> anyhow::Result<()> {
    match estimator.estimate_input(book, from, to, amount) {
        Ok((query, result)) => {
            println!("{}", render(book, &query, &result));
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", ui::style_text(&e.prompt(), ui::StyleType::Error));
            Err(e.into())
        }
    }
}
