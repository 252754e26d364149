//! Walk-forward simulation of the prediction signal.
//!
//! The simulator replays the series day by day: at each step it re-analyzes
//! only the prices seen so far, so no decision ever looks at future data.
//! The strategy itself is deliberately naive, long-only with full position
//! sizing, because the point is to measure the signal, not to tune an
//! execution layer.

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

use crate::analysis::analyzer::{Outlook, WaveAnalyzer};
use crate::config::ANALYSIS;
use crate::domain::{PriceField, PriceSeries};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// One fill. `value` is the cash moved: cost on a buy, proceeds on a sell.
#[derive(Debug, Clone, Serialize)]
pub struct Trade {
    pub date: NaiveDate,
    pub side: TradeSide,
    pub price: f64,
    pub shares: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// Return, drawdown, and win-rate figures are percentages.
#[derive(Debug, Clone, Serialize)]
pub struct BacktestResult {
    pub initial_investment: f64,
    pub final_equity: f64,
    pub total_return: f64,
    pub max_drawdown: f64,
    /// Completed buy/sell round trips, not individual fills.
    pub num_trades: usize,
    pub win_rate: f64,
    pub avg_trade_return: f64,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
}

pub struct BacktestSimulator<'a> {
    series: &'a PriceSeries,
    field: PriceField,
    warmup_days: usize,
}

impl<'a> BacktestSimulator<'a> {
    pub fn new(series: &'a PriceSeries, field: PriceField) -> Self {
        Self {
            series,
            field,
            warmup_days: ANALYSIS.backtest.warmup_days,
        }
    }

    pub fn warmup_days(mut self, days: usize) -> Self {
        self.warmup_days = days;
        self
    }

    /// Runs the forward walk over the (optionally clamped) date range.
    ///
    /// The first `warmup_days` observations only feed the analyzer; trading
    /// starts at the next one. A continuation signal buys with all cash when
    /// flat, a correction signal sells the whole position, anything else
    /// holds. Equity is marked to the day's price after the decision.
    pub fn run(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        invest_amount: f64,
    ) -> Result<BacktestResult> {
        let start_idx = start.map_or(0, |date| self.series.nearest_index(date));
        let end_idx = end.map_or(self.series.len() - 1, |date| self.series.nearest_index(date));
        let window = self.series.window(start_idx, end_idx)?;

        let mut cash = invest_amount;
        let mut shares = 0.0_f64;
        let mut trades: Vec<Trade> = Vec::new();
        let mut equity_curve: Vec<EquityPoint> = Vec::new();

        for i in self.warmup_days..window.len() {
            let analyzer = WaveAnalyzer::truncated(&window, self.field, i + 1)?;
            let prediction = analyzer.predict_next_move();

            let current_price = analyzer.prices()[i];
            let current_date = window.date(i);
            let actionable = prediction.confidence > ANALYSIS.prediction.actionable_confidence;

            match prediction.outlook {
                Outlook::TrendContinuation if actionable && shares == 0.0 && cash > 0.0 => {
                    shares = cash / current_price;
                    cash = 0.0;
                    log::debug!("{current_date}: buy {shares:.4} shares at {current_price:.2}");
                    trades.push(Trade {
                        date: current_date,
                        side: TradeSide::Buy,
                        price: current_price,
                        shares,
                        value: shares * current_price,
                    });
                }
                Outlook::Correction if actionable && shares > 0.0 => {
                    cash = shares * current_price;
                    log::debug!("{current_date}: sell {shares:.4} shares at {current_price:.2}");
                    trades.push(Trade {
                        date: current_date,
                        side: TradeSide::Sell,
                        price: current_price,
                        shares,
                        value: cash,
                    });
                    shares = 0.0;
                }
                _ => {}
            }

            equity_curve.push(EquityPoint {
                date: current_date,
                equity: cash + shares * current_price,
            });
        }

        Ok(summarize(invest_amount, trades, equity_curve))
    }
}

/// Reduces the raw fills and equity curve to the headline metrics.
fn summarize(
    invest_amount: f64,
    trades: Vec<Trade>,
    equity_curve: Vec<EquityPoint>,
) -> BacktestResult {
    let final_equity = equity_curve.last().map_or(invest_amount, |point| point.equity);
    let total_return = (final_equity - invest_amount) / invest_amount * 100.0;

    // Drawdown is measured from the running peak, seeded at the initial
    // investment so a losing start counts from day one
    let mut peak = invest_amount;
    let mut max_drawdown = 0.0_f64;
    for point in &equity_curve {
        if point.equity > peak {
            peak = point.equity;
        }
        let drawdown = (peak - point.equity) / peak * 100.0;
        max_drawdown = max_drawdown.max(drawdown);
    }

    // Per-trade returns over completed buy/sell pairs
    let mut trade_returns: Vec<f64> = Vec::new();
    for pair in trades.chunks_exact(2) {
        if pair[0].side == TradeSide::Buy && pair[1].side == TradeSide::Sell {
            trade_returns.push((pair[1].value - pair[0].value) / pair[0].value * 100.0);
        }
    }

    let avg_trade_return = if trade_returns.is_empty() {
        0.0
    } else {
        trade_returns.iter().sum::<f64>() / trade_returns.len() as f64
    };
    let win_rate = if trade_returns.is_empty() {
        0.0
    } else {
        trade_returns.iter().filter(|&&r| r > 0.0).count() as f64 / trade_returns.len() as f64
            * 100.0
    };

    BacktestResult {
        initial_investment: invest_amount,
        final_equity,
        total_return,
        max_drawdown,
        num_trades: trades.len() / 2,
        win_rate,
        avg_trade_return,
        trades,
        equity_curve,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceObservation;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let observations = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceObservation {
                date: start + chrono::Days::new(i as u64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 0.0,
            })
            .collect();
        PriceSeries::new(observations).unwrap()
    }

    fn day(offset: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(offset)
    }

    #[test]
    fn test_flat_series_never_trades() {
        let s = series(&[100.0; 10]);
        let result = BacktestSimulator::new(&s, PriceField::Close)
            .warmup_days(3)
            .run(None, None, 10_000.0)
            .unwrap();

        assert!(result.trades.is_empty());
        assert_eq!(result.num_trades, 0);
        assert_eq!(result.final_equity, 10_000.0);
        assert_eq!(result.total_return, 0.0);
        assert_eq!(result.max_drawdown, 0.0);
        // one equity point per post-warmup day
        assert_eq!(result.equity_curve.len(), 7);
    }

    #[test]
    fn test_continuation_signal_buys_and_marks_to_market() {
        // Falling corrective structure throughout, so the simulator buys on
        // the first eligible day and rides the last leg down
        let s = series(&[120.0, 110.0, 116.0, 104.0, 109.0, 100.0, 90.0]);
        let result = BacktestSimulator::new(&s, PriceField::Close)
            .warmup_days(5)
            .run(None, None, 10_000.0)
            .unwrap();

        assert_eq!(result.trades.len(), 1);
        assert_eq!(result.trades[0].side, TradeSide::Buy);
        assert_eq!(result.trades[0].price, 100.0);
        assert!((result.trades[0].shares - 100.0).abs() < 1e-9);

        // open position is marked, not realized: no completed round trip
        assert_eq!(result.num_trades, 0);
        assert!((result.final_equity - 9_000.0).abs() < 1e-9);
        assert!((result.total_return - -10.0).abs() < 1e-9);
        assert!((result.max_drawdown - 10.0).abs() < 1e-9);
        assert_eq!(result.win_rate, 0.0);
    }

    #[test]
    fn test_full_round_trip_through_an_impulse() {
        // Days 0..=3 read as a correction (buy at 125), the full six pivots
        // validate as an impulse (sell at 130)
        let s = series(&[100.0, 110.0, 105.0, 125.0, 118.0, 130.0]);
        let result = BacktestSimulator::new(&s, PriceField::Close)
            .warmup_days(3)
            .run(None, None, 10_000.0)
            .unwrap();

        assert_eq!(result.trades.len(), 2);
        assert_eq!(result.trades[0].side, TradeSide::Buy);
        assert_eq!(result.trades[0].price, 125.0);
        assert_eq!(result.trades[1].side, TradeSide::Sell);
        assert_eq!(result.trades[1].price, 130.0);

        assert_eq!(result.num_trades, 1);
        assert!((result.final_equity - 10_400.0).abs() < 1e-9);
        assert!((result.total_return - 4.0).abs() < 1e-9);
        assert!((result.avg_trade_return - 4.0).abs() < 1e-9);
        assert_eq!(result.win_rate, 100.0);
        // dip to 9440 (80 shares at 118) off the 10000 peak
        assert!((result.max_drawdown - 5.6).abs() < 1e-9);
    }

    #[test]
    fn test_trade_log_alternates_buy_and_sell_over_many_cycles() {
        // Impulse, a long flat shelf that re-arms the look-back window as a
        // falling corrective, then a second impulse: two full round trips
        let mut closes = vec![100.0, 110.0, 105.0, 125.0, 118.0, 130.0];
        closes.extend(std::iter::repeat(130.0).take(29));
        closes.extend([143.0, 136.0, 158.0, 150.0, 163.0]);

        let s = series(&closes);
        let result = BacktestSimulator::new(&s, PriceField::Close)
            .warmup_days(3)
            .run(None, None, 10_000.0)
            .unwrap();

        assert_eq!(result.trades.len(), 4);
        assert_eq!(result.trades[0].side, TradeSide::Buy);
        for pair in result.trades.windows(2) {
            assert_ne!(pair[0].side, pair[1].side);
        }

        assert_eq!(result.num_trades, 2);
        assert!((result.trades[2].price - 130.0).abs() < 1e-9);
        assert!((result.trades[3].price - 163.0).abs() < 1e-9);
        assert!((result.final_equity - 13_040.0).abs() < 1e-9);
        assert_eq!(result.win_rate, 100.0);
    }

    #[test]
    fn test_date_range_clamps_the_walk() {
        let s = series(&[100.0; 10]);
        let result = BacktestSimulator::new(&s, PriceField::Close)
            .warmup_days(2)
            .run(Some(day(2)), Some(day(7)), 5_000.0)
            .unwrap();

        // window covers days 2..=7, walk starts after 2 warmup days
        assert_eq!(result.equity_curve.len(), 4);
        assert_eq!(result.equity_curve[0].date, day(4));
        assert_eq!(result.equity_curve.last().unwrap().date, day(7));
        assert_eq!(result.initial_investment, 5_000.0);
    }

    #[test]
    fn test_summarize_ignores_unpaired_trailing_buy() {
        let trades = vec![
            Trade { date: day(0), side: TradeSide::Buy, price: 100.0, shares: 10.0, value: 1_000.0 },
            Trade { date: day(1), side: TradeSide::Sell, price: 90.0, shares: 10.0, value: 900.0 },
            Trade { date: day(2), side: TradeSide::Buy, price: 80.0, shares: 11.25, value: 900.0 },
        ];
        let curve = vec![EquityPoint { date: day(2), equity: 900.0 }];
        let result = summarize(1_000.0, trades, curve);

        // one completed pair at -10%
        assert_eq!(result.num_trades, 1);
        assert!((result.avg_trade_return - -10.0).abs() < 1e-9);
        assert_eq!(result.win_rate, 0.0);
        assert!((result.max_drawdown - 10.0).abs() < 1e-9);
    }
}
