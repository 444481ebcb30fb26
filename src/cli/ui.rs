use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right-aligned plain value cell.
pub fn value_cell(text: impl Into<String>) -> Cell {
    Cell::new(text.into()).set_alignment(CellAlignment::Right)
}

/// Greyed-out "N/A" for values that could not be computed.
pub fn na_cell() -> Cell {
    Cell::new("N/A")
        .fg(Color::DarkGrey)
        .set_alignment(CellAlignment::Right)
}

/// Formats an `Option<T>` into a `Cell`. `None` is displayed as "N/A".
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or_else(na_cell, |v| {
        Cell::new(format_fn(v)).set_alignment(CellAlignment::Right)
    })
}

/// Green for gains, red for losses.
fn signed_color(value: f64) -> Color {
    if value >= 0.0 { Color::Green } else { Color::Red }
}

/// Creates a cell for displaying percentage change with color coding.
pub fn change_cell(change: f64) -> Cell {
    Cell::new(format_pct(change))
        .fg(signed_color(change))
        .set_alignment(CellAlignment::Right)
}

/// Color-coded signed dollar amount.
pub fn profit_cell(value: f64) -> Cell {
    Cell::new(format_signed_usd(value))
        .fg(signed_color(value))
        .add_attribute(Attribute::Bold)
        .set_alignment(CellAlignment::Right)
}

/// Spinner shown while a dashboard cycle is fetching.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}

/// Inserts `,` every three digits of an unsigned integer string.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats with grouped thousands and a fixed number of decimals.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };
    let sign = if value < 0.0 && formatted.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{sign}{}.{frac}", group_thousands(int_part)),
        None => format!("{sign}{}", group_thousands(int_part)),
    }
}

/// `$1,234.56`, with a leading `-` for negatives.
pub fn format_usd(value: f64) -> String {
    let grouped = format_grouped(value, 2);
    match grouped.strip_prefix('-') {
        Some(abs) => format!("-${abs}"),
        None if grouped == "N/A" => grouped,
        None => format!("${grouped}"),
    }
}

/// Like [`format_usd`] but always signed.
pub fn format_signed_usd(value: f64) -> String {
    let usd = format_usd(value);
    if value >= 0.0 && value.is_finite() {
        format!("+{usd}")
    } else {
        usd
    }
}

/// Grouped number, up to four decimals with trailing zeros removed.
pub fn format_number(value: f64) -> String {
    let grouped = format_grouped(value, 4);
    if grouped.contains('.') {
        grouped
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        grouped
    }
}

/// `+1.23%` / `-4.56%`.
pub fn format_pct(value: f64) -> String {
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{sign}{value:.2}%")
}

/// `0.05x`.
pub fn format_multiple(value: f64) -> String {
    format!("{value:.2}x")
}

/// One bar character per value, scaled between the series' low and high.
pub fn sparkline(values: &[f64]) -> String {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (low, high) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let span = high - low;
    let top = SPARK_LEVELS.len() - 1;

    values
        .iter()
        .map(|v| {
            if !v.is_finite() {
                ' '
            } else if span <= 0.0 {
                SPARK_LEVELS[top / 2]
            } else {
                let level = (((v - low) / span) * top as f64).round() as usize;
                SPARK_LEVELS[level.min(top)]
            }
        })
        .collect()
}
