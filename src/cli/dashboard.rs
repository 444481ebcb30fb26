use super::ui;
use crate::core::dashboard::{DashboardContext, DashboardSources, load_dashboard};
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use comfy_table::Cell;

impl DashboardContext {
    pub fn display_as_tables(&self) -> String {
        let treasury = &self.treasury;
        let market = &self.market;
        let metrics = &self.metrics;
        let crypto = &treasury.crypto_symbol;
        let stock = &treasury.stock_symbol;

        let mut top = ui::new_styled_table();
        top.set_header(vec![
            ui::header_cell("Metric"),
            ui::header_cell("Value"),
            ui::header_cell("Detail"),
        ]);
        top.add_row(vec![
            Cell::new(format!("{stock} Stock Price")),
            ui::value_cell(ui::format_usd(market.equity.price)),
            ui::change_cell(market.equity.change_pct),
        ]);
        top.add_row(vec![
            Cell::new(format!("Total {crypto} Holdings")),
            ui::value_cell(format!("{} {crypto}", ui::format_number(treasury.holdings))),
            ui::format_optional_cell(metrics.supply_share_pct, |p| {
                format!("{p:.3}% of supply")
            }),
        ]);
        top.add_row(vec![
            Cell::new("Est. Holdings Value"),
            ui::value_cell(ui::format_usd(metrics.holdings_value)),
            ui::value_cell("Market value"),
        ]);
        top.add_row(vec![
            Cell::new(format!("{crypto} Price")),
            ui::value_cell(ui::format_usd(market.primary.price)),
            ui::change_cell(market.primary.change_pct),
        ]);
        top.add_row(vec![
            Cell::new("Avg. Cost Basis"),
            ui::value_cell(ui::format_usd(treasury.avg_cost)),
            ui::value_cell(format!("per {crypto}")),
        ]);
        top.add_row(vec![
            Cell::new(format!("Est. Change in Value of {crypto} Holdings")),
            ui::profit_cell(metrics.unrealized_pl),
            match metrics.unrealized_pl_pct {
                Some(pct) => ui::change_cell(pct),
                None => ui::na_cell(),
            },
        ]);
        top.add_row(vec![
            Cell::new("Today's Volume"),
            ui::value_cell(if market.equity.volume > 0 {
                ui::format_number(market.equity.volume as f64)
            } else {
                "—".to_string()
            }),
            Cell::new(""),
        ]);
        top.add_row(vec![
            Cell::new("mNAV"),
            ui::format_optional_cell(metrics.mnav, ui::format_multiple),
            ui::value_cell("Market NAV multiple"),
        ]);
        top.add_row(vec![
            Cell::new("NAV"),
            ui::format_optional_cell(metrics.navps, ui::format_usd),
            ui::value_cell("Per share value"),
        ]);

        let mut valuation = ui::new_styled_table();
        valuation.set_header(vec![ui::header_cell("Valuation"), ui::header_cell("Value")]);
        valuation.add_row(vec![
            Cell::new("Net Asset Value"),
            ui::value_cell(ui::format_usd(metrics.nav)),
        ]);
        valuation.add_row(vec![
            Cell::new(format!("BTC Holdings ({} BTC)", ui::format_number(treasury.btc_holdings))),
            ui::value_cell(ui::format_usd(metrics.reference_value)),
        ]);
        valuation.add_row(vec![
            Cell::new("Cash Reserves"),
            ui::value_cell(ui::format_usd(treasury.cash_reserves)),
        ]);
        valuation.add_row(vec![
            Cell::new("Market Cap"),
            ui::value_cell(ui::format_usd(metrics.market_cap)),
        ]);
        valuation.add_row(vec![
            Cell::new("Enterprise Value"),
            ui::value_cell(ui::format_usd(metrics.enterprise_value)),
        ]);
        valuation.add_row(vec![
            Cell::new("Fully Diluted NAV per Share"),
            ui::format_optional_cell(metrics.fully_diluted_navps, ui::format_usd),
        ]);
        valuation.add_row(vec![
            Cell::new("Airdrop Value"),
            ui::value_cell(ui::format_usd(treasury.airdrop_revenue)),
        ]);
        valuation.add_row(vec![
            Cell::new("Converted Airdrops"),
            ui::value_cell(format!(
                "{} {crypto}",
                ui::format_number(treasury.converted_airdrops)
            )),
        ]);

        let mut weekly = ui::new_styled_table();
        weekly.set_header(vec![
            ui::header_cell("30-Day Price"),
            ui::header_cell(&self.chart_label()),
            ui::header_cell("Weekly Change"),
        ]);
        weekly.add_row(vec![
            Cell::new(format!("{crypto} (USD)")),
            Cell::new(ui::sparkline(&self.history.primary)),
            ui::change_cell(metrics.weekly_change_primary),
        ]);
        weekly.add_row(vec![
            Cell::new(format!("{stock} (USD)")),
            Cell::new(ui::sparkline(&self.history.equity)),
            ui::change_cell(metrics.weekly_change_equity),
        ]);

        let mut output = format!(
            "Treasury Dashboard: {}\n{}\n\n",
            ui::style_text(&format!("{stock} / {crypto}"), ui::StyleType::Title),
            ui::style_text(
                &format!("Updated {}", self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
                ui::StyleType::Subtle
            ),
        );
        output.push_str(&top.to_string());
        output.push_str("\n\n");
        output.push_str(&weekly.to_string());
        output.push_str("\n\n");
        output.push_str(&valuation.to_string());
        output.push_str(&format!(
            "\n\n{}: {}",
            ui::style_text("NAV", ui::StyleType::TotalLabel),
            ui::style_text(&ui::format_usd(metrics.nav), ui::StyleType::TotalValue)
        ));
        output
    }

    /// Date range covered by the daily series, e.g. `Oct 20 – Nov 18`.
    fn chart_label(&self) -> String {
        let days = self.history.primary.len().max(self.history.equity.len());
        let end = self.generated_at.date_naive();
        match chart_start(end, days) {
            Some(start) => format!("{} – {}", start.format("%b %-d"), end.format("%b %-d")),
            None => ui::style_text("no history", ui::StyleType::Error),
        }
    }
}

/// First day of a `days`-long daily series ending on `end`.
fn chart_start(end: NaiveDate, days: usize) -> Option<NaiveDate> {
    let back = i64::try_from(days.checked_sub(1)?).ok()?;
    end.checked_sub_signed(Duration::days(back))
}

pub async fn run(sources: &DashboardSources, json: bool) -> Result<()> {
    let pb = (!json).then(|| ui::new_spinner("Fetching treasury and market data..."));
    let context = load_dashboard(sources).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    if json {
        let rendered = serde_json::to_string_pretty(&context)
            .context("Failed to serialize dashboard as JSON")?;
        println!("{rendered}");
    } else {
        println!("{}", context.display_as_tables());
    }
    Ok(())
}
