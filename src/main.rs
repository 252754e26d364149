use std::fs::File;

use anyhow::Result;
use clap::Parser;

use wave_scout::config::ANALYSIS;
use wave_scout::{
    BacktestSimulator, Cli, Mode, OutputFormat, PriceField, PriceSeries, WaveAnalyzer, data,
    recommend, report,
};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Cli::parse();
    log::debug!("parsed arguments: {args:?}");

    match args.mode {
        Mode::Analyze => run_analysis(&args),
        Mode::Backtest => run_backtest(&args),
    }
}

fn run_analysis(args: &Cli) -> Result<()> {
    let series = load_series(args)?;

    let analyzer = WaveAnalyzer::new(&series, PriceField::Close)?;
    let catalog = analyzer.analyze(args.threshold, args.window);
    let current_wave = analyzer.find_current_wave(ANALYSIS.current_wave.look_back);
    let prediction = analyzer.predict_next_move();
    let recommendation = recommend(
        current_wave.as_ref(),
        &prediction,
        analyzer.last_price(),
        args.risk,
    );

    report::print_analysis(
        &series,
        &catalog,
        current_wave.as_ref(),
        &prediction,
        &recommendation,
    );
    Ok(())
}

fn run_backtest(args: &Cli) -> Result<()> {
    let series = data::load_csv(&args.data)?;
    log_loaded(&series);

    let result = BacktestSimulator::new(&series, PriceField::Close).run(
        args.start,
        args.end,
        args.invest,
    )?;
    report::print_backtest(&result);

    let stem = args
        .data
        .file_stem()
        .map_or_else(|| "backtest".to_string(), |s| s.to_string_lossy().into_owned());
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");

    match args.output {
        OutputFormat::Table => {}
        OutputFormat::Json => {
            let path = format!("backtest_{stem}_{timestamp}.json");
            report::export_json(&result, File::create(&path)?)?;
            println!("\nResults exported to {path}");
        }
        OutputFormat::Csv => {
            let summary_path = format!("backtest_{stem}_summary_{timestamp}.csv");
            let trades_path = format!("backtest_{stem}_trades_{timestamp}.csv");
            report::export_summary_csv(&result, File::create(&summary_path)?)?;
            report::export_trades_csv(&result, File::create(&trades_path)?)?;
            println!("\nResults exported to {summary_path} and {trades_path}");
        }
    }
    Ok(())
}

/// Loads the CSV and clamps it to the requested date range.
fn load_series(args: &Cli) -> Result<PriceSeries> {
    let full = data::load_csv(&args.data)?;
    log_loaded(&full);

    if args.start.is_none() && args.end.is_none() {
        return Ok(full);
    }
    let start_idx = args.start.map_or(0, |date| full.nearest_index(date));
    let end_idx = args.end.map_or(full.len() - 1, |date| full.nearest_index(date));
    full.window(start_idx, end_idx)
}

fn log_loaded(series: &PriceSeries) {
    println!(
        "Loaded {} observations from {} to {}",
        series.len(),
        series.first_date(),
        series.last_date()
    );
}
