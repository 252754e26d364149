//! Console tables and file export for analysis and backtest results.

use std::io::Write;

use anyhow::Result;
use strum::IntoEnumIterator;
use tabled::{Table, Tabled, settings::Style};

use crate::analysis::{
    BacktestResult, CurrentWave, Prediction, Recommendation, WaveKind, WaveRecord,
};
use crate::domain::PriceSeries;
use crate::utils::{fibonacci_levels, pct_change};

#[derive(Tabled)]
struct WaveRow {
    #[tabled(rename = "#")]
    count: usize,
    #[tabled(rename = "start date")]
    start_date: String,
    #[tabled(rename = "end date")]
    end_date: String,
    #[tabled(rename = "start price")]
    start_price: String,
    #[tabled(rename = "end price")]
    end_price: String,
    #[tabled(rename = "change")]
    change: String,
}

#[derive(Tabled)]
struct TradeRow {
    #[tabled(rename = "date")]
    date: String,
    #[tabled(rename = "action")]
    action: String,
    #[tabled(rename = "price")]
    price: String,
    #[tabled(rename = "shares")]
    shares: String,
    #[tabled(rename = "value")]
    value: String,
}

/// Renders one per-kind wave table: each record's span, endpoint prices, and
/// the percent change over the span.
fn wave_table(series: &PriceSeries, records: &[WaveRecord]) -> String {
    let rows: Vec<WaveRow> = records
        .iter()
        .map(|record| {
            let first = record.indices[0];
            let last = *record.indices.last().unwrap_or(&first);
            let start_price = record.pattern.points[0].price;
            let end_price = record.pattern.points.last().map_or(start_price, |p| p.price);
            WaveRow {
                count: record.wave_count,
                start_date: series.date(first).to_string(),
                end_date: series.date(last).to_string(),
                start_price: format!("{start_price:.2}"),
                end_price: format!("{end_price:.2}"),
                change: format!("{:.2}%", pct_change(start_price, end_price) * 100.0),
            }
        })
        .collect();
    Table::new(rows).with(Style::sharp()).to_string()
}

fn trade_table(result: &BacktestResult) -> String {
    let rows: Vec<TradeRow> = result
        .trades
        .iter()
        .map(|trade| TradeRow {
            date: trade.date.to_string(),
            action: trade.side.to_string(),
            price: format!("{:.2}", trade.price),
            shares: format!("{:.4}", trade.shares),
            value: format!("{:.2}", trade.value),
        })
        .collect();
    Table::new(rows).with(Style::sharp()).to_string()
}

pub fn print_analysis(
    series: &PriceSeries,
    catalog: &crate::analysis::WaveCatalog,
    current_wave: Option<&CurrentWave>,
    prediction: &Prediction,
    recommendation: &Recommendation,
) {
    println!("\nDetected wave structures:");
    let mut pattern_count = 0;
    for kind in WaveKind::iter() {
        let records = catalog.records(kind);
        if records.is_empty() {
            continue;
        }
        pattern_count += records.len();
        println!("\n{kind} waves: {}", records.len());
        println!("{}", wave_table(series, records));
    }
    if pattern_count == 0 {
        println!("No wave structures found. Try adjusting the zigzag threshold.");
    }

    println!("\nCurrent market position:");
    match current_wave {
        Some(wave) => {
            println!("  current wave: {}", wave.kind);
            println!("  wave points: {}", wave.points.len());
            if let Some(target) = wave.next_target {
                println!("  potential targets: {:.2} - {:.2}", target.near, target.far);
            }
            if let (Some(first), Some(last)) = (wave.points.first(), wave.points.last()) {
                println!("  fibonacci levels over the wave span:");
                for level in fibonacci_levels(first.price, last.price) {
                    println!("    {:>5}: {:.2}", level.ratio, level.price);
                }
            }
        }
        None => println!("  no clear wave structure in the recent data"),
    }

    println!("\nPrediction:");
    println!(
        "  {} (confidence: {:.2})",
        prediction.outlook, prediction.confidence
    );
    if let Some(target) = prediction.target {
        println!("  targets: {:.2} - {:.2}", target.near, target.far);
    }

    println!("\nTrade recommendation:");
    println!("  {}", recommendation.action);
    println!("  reason: {}", recommendation.rationale);
    for (i, target) in recommendation.targets.iter().enumerate() {
        println!(
            "  target {}: {:.2} ({:+.2}%)",
            i + 1,
            target.price,
            target.change_pct
        );
    }
    if let Some(stop) = recommendation.stop_loss {
        println!("  stop loss: {stop:.2}");
    }
    for (i, ratio) in recommendation.risk_reward.iter().enumerate() {
        println!("  risk/reward (target {}): {ratio:.2}", i + 1);
    }
}

pub fn print_backtest(result: &BacktestResult) {
    println!("\nBacktest results:");
    println!("  initial investment: {:.2}", result.initial_investment);
    println!("  final equity:       {:.2}", result.final_equity);
    println!("  total return:       {:.2}%", result.total_return);
    println!("  max drawdown:       {:.2}%", result.max_drawdown);
    println!("  trades:             {}", result.num_trades);
    println!("  win rate:           {:.2}%", result.win_rate);
    println!("  avg trade return:   {:.2}%", result.avg_trade_return);

    if !result.trades.is_empty() {
        println!("\nTrade history:");
        println!("{}", trade_table(result));
    }
}

pub fn export_json<W: Write>(result: &BacktestResult, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, result)?;
    Ok(())
}

/// Writes the headline metrics as metric/value rows.
pub fn export_summary_csv<W: Write>(result: &BacktestResult, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["metric", "value"])?;
    csv_writer.write_record(["initial_investment", &result.initial_investment.to_string()])?;
    csv_writer.write_record(["final_equity", &result.final_equity.to_string()])?;
    csv_writer.write_record(["total_return", &result.total_return.to_string()])?;
    csv_writer.write_record(["max_drawdown", &result.max_drawdown.to_string()])?;
    csv_writer.write_record(["num_trades", &result.num_trades.to_string()])?;
    csv_writer.write_record(["win_rate", &result.win_rate.to_string()])?;
    csv_writer.write_record(["avg_trade_return", &result.avg_trade_return.to_string()])?;
    csv_writer.flush()?;
    Ok(())
}

pub fn export_trades_csv<W: Write>(result: &BacktestResult, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["date", "action", "price", "shares", "value"])?;
    for trade in &result.trades {
        csv_writer.write_record([
            trade.date.to_string(),
            trade.side.to_string(),
            trade.price.to_string(),
            trade.shares.to_string(),
            trade.value.to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}
