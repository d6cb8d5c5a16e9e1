use super::ui;
use crate::core::PriceBook;
use comfy_table::Cell;

/// Renders the book as a table, optionally filtered by a symbol substring.
pub fn render(book: &PriceBook, filter: Option<&str>, icon_base: &str) -> String {
    let matches = book.search(filter.unwrap_or_default());
    let options: Vec<_> = book
        .token_options(icon_base)
        .into_iter()
        .filter(|option| matches.contains(&option.symbol.as_str()))
        .collect();

    if options.is_empty() {
        return ui::style_text("No matching tokens", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Token"),
        ui::header_cell("Price"),
        ui::header_cell("As of"),
        ui::header_cell("Icon"),
    ]);

    for option in &options {
        if let Some(point) = book.point(&option.symbol) {
            table.add_row(vec![
                Cell::new(&option.symbol),
                ui::number_cell(ui::format_price(point.price)),
                Cell::new(point.observed_at.format("%Y-%m-%d %H:%M:%S UTC")),
                Cell::new(&option.icon),
            ]);
        }
    }

    format!(
        "{}\n\n{}\n\n{} tokens",
        ui::style_text("Token Prices", ui::StyleType::Title),
        table,
        options.len()
    )
}

pub fn run(book: &PriceBook, filter: Option<&str>, icon_base: &str) {
    println!("{}", render(book, filter, icon_base));
}
