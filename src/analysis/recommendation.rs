//! Turns a wave reading plus a prediction into an actionable trade call.

use serde::Serialize;

use crate::analysis::analyzer::{CurrentWave, Outlook, Prediction};
use crate::config::ANALYSIS;

/// The full action vocabulary. The engine currently emits `Buy`, `Sell`,
/// `Caution` and `Neutral`; `TakeProfit` and `CloseShort` are part of the
/// reporting vocabulary for strategies layered on top.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TradeAction {
    Buy,
    Sell,
    TakeProfit,
    CloseShort,
    Caution,
    Neutral,
}

/// A projected price with its percent distance from the entry price.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PriceTarget {
    pub price: f64,
    pub change_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub action: TradeAction,
    pub rationale: String,
    pub entry: Option<f64>,
    pub targets: Vec<PriceTarget>,
    pub stop_loss: Option<f64>,
    pub risk_reward: Vec<f64>,
}

impl Recommendation {
    fn wait() -> Self {
        Self {
            action: TradeAction::Neutral,
            rationale: "insufficient wave structure or low confidence".to_string(),
            entry: None,
            targets: Vec::new(),
            stop_loss: None,
            risk_reward: Vec::new(),
        }
    }

    fn caution(current_price: f64) -> Self {
        Self {
            action: TradeAction::Caution,
            rationale: "wave structure present but no clear setup".to_string(),
            entry: Some(current_price),
            targets: Vec::new(),
            stop_loss: None,
            risk_reward: Vec::new(),
        }
    }
}

/// Derives a buy/sell/neutral call from the current wave and its prediction.
///
/// The trade direction follows the sign of the first target relative to the
/// current price, not the outlook label: an upward correction is still a buy.
/// The stop sits `risk_tolerance` away from entry on the losing side, and
/// each target gets a signed reward-to-risk ratio against that stop, so a
/// target on the losing side of the entry shows up negative.
pub fn recommend(
    current_wave: Option<&CurrentWave>,
    prediction: &Prediction,
    current_price: f64,
    risk_tolerance: f64,
) -> Recommendation {
    let Some(wave) = current_wave else {
        return Recommendation::wait();
    };
    if prediction.confidence < ANALYSIS.prediction.actionable_confidence {
        return Recommendation::wait();
    }
    let Some(range) = wave.next_target else {
        return Recommendation::caution(current_price);
    };

    let near_change = (range.near - current_price) / current_price;
    let far_change = (range.far - current_price) / current_price;
    let targets = vec![
        PriceTarget { price: range.near, change_pct: near_change * 100.0 },
        PriceTarget { price: range.far, change_pct: far_change * 100.0 },
    ];
    // Each outlook reads the near target with its own sign test: a
    // continuation is a buy only on a strictly positive move, while a
    // correction is a sell only on a strictly negative one, so a target
    // sitting exactly at the entry price resolves to buy.
    let (action, rationale) = match prediction.outlook {
        Outlook::TrendContinuation if near_change > 0.0 => (
            TradeAction::Buy,
            format!("uptrend continuation after {} wave", wave.kind),
        ),
        Outlook::TrendContinuation => (
            TradeAction::Sell,
            format!("downtrend continuation after {} wave", wave.kind),
        ),
        Outlook::Correction if near_change < 0.0 => (
            TradeAction::Sell,
            format!("correction expected after {} wave", wave.kind),
        ),
        Outlook::Correction => (
            TradeAction::Buy,
            format!("upward correction expected after {} wave", wave.kind),
        ),
        Outlook::Undetermined => return Recommendation::caution(current_price),
    };

    let stop_loss = match action {
        TradeAction::Buy => current_price * (1.0 - risk_tolerance),
        _ => current_price * (1.0 + risk_tolerance),
    };
    let risk = (stop_loss - current_price).abs();
    let risk_reward = targets
        .iter()
        .map(|target| {
            // Signed per side; a target on the wrong side of the entry
            // yields a negative ratio rather than a flipped positive one.
            let reward = match action {
                TradeAction::Buy => target.price - current_price,
                _ => current_price - target.price,
            };
            if risk > 0.0 { reward / risk } else { 0.0 }
        })
        .collect();

    Recommendation {
        action,
        rationale,
        entry: Some(current_price),
        targets,
        stop_loss: Some(stop_loss),
        risk_reward,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::patterns::{TargetRange, WaveKind};

    fn wave_with_target(kind: WaveKind, near: f64, far: f64) -> CurrentWave {
        CurrentWave {
            kind,
            points: Vec::new(),
            next_target: Some(TargetRange { near, far }),
        }
    }

    fn prediction(outlook: Outlook, confidence: f64) -> Prediction {
        Prediction { outlook, confidence, target: None }
    }

    #[test]
    fn test_no_wave_means_wait() {
        let rec = recommend(None, &prediction(Outlook::Correction, 0.7), 100.0, 0.02);
        assert_eq!(rec.action, TradeAction::Neutral);
        assert!(rec.entry.is_none());
        assert!(rec.stop_loss.is_none());
    }

    #[test]
    fn test_low_confidence_means_wait() {
        let wave = wave_with_target(WaveKind::Impulse, 90.0, 80.0);
        let rec = recommend(Some(&wave), &prediction(Outlook::Correction, 0.4), 100.0, 0.02);
        assert_eq!(rec.action, TradeAction::Neutral);
        assert!(rec.entry.is_none());
    }

    #[test]
    fn test_missing_target_advises_caution() {
        let wave = CurrentWave {
            kind: WaveKind::Impulse,
            points: Vec::new(),
            next_target: None,
        };
        let rec = recommend(Some(&wave), &prediction(Outlook::Correction, 0.7), 100.0, 0.02);
        assert_eq!(rec.action, TradeAction::Caution);
        assert_eq!(rec.entry, Some(100.0));
    }

    #[test]
    fn test_downward_correction_sells_with_stop_above() {
        // Impulse ended at 130 with targets below
        let wave = wave_with_target(WaveKind::Impulse, 118.54, 111.46);
        let rec = recommend(Some(&wave), &prediction(Outlook::Correction, 0.7), 130.0, 0.02);

        assert_eq!(rec.action, TradeAction::Sell);
        assert_eq!(rec.entry, Some(130.0));
        assert!((rec.stop_loss.unwrap() - 132.6).abs() < 1e-9); // 130 * 1.02
        // risk 2.6, rewards 11.46 and 18.54
        assert!((rec.risk_reward[0] - 11.46 / 2.6).abs() < 1e-9);
        assert!((rec.risk_reward[1] - 18.54 / 2.6).abs() < 1e-9);
        assert!((rec.targets[0].change_pct - (118.54 / 130.0 - 1.0) * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_uptrend_continuation_buys_with_stop_below() {
        let wave = wave_with_target(WaveKind::Corrective, 120.0, 132.36);
        let rec = recommend(
            Some(&wave),
            &prediction(Outlook::TrendContinuation, 0.6),
            100.0,
            0.02,
        );

        assert_eq!(rec.action, TradeAction::Buy);
        assert!((rec.stop_loss.unwrap() - 98.0).abs() < 1e-9);
        // risk 2, rewards 20 and 32.36
        assert!((rec.risk_reward[0] - 10.0).abs() < 1e-9);
        assert!((rec.risk_reward[1] - 16.18).abs() < 1e-9);
        assert!(rec.rationale.contains("corrective"));
    }

    #[test]
    fn test_downtrend_continuation_sells() {
        let wave = wave_with_target(WaveKind::Corrective, 90.0, 83.82);
        let rec = recommend(
            Some(&wave),
            &prediction(Outlook::TrendContinuation, 0.6),
            100.0,
            0.02,
        );
        assert_eq!(rec.action, TradeAction::Sell);
        assert!((rec.stop_loss.unwrap() - 102.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_risk_tolerance_zeroes_risk_reward() {
        let wave = wave_with_target(WaveKind::Impulse, 90.0, 80.0);
        let rec = recommend(Some(&wave), &prediction(Outlook::Correction, 0.7), 100.0, 0.0);
        assert_eq!(rec.risk_reward, vec![0.0, 0.0]);
    }

    #[test]
    fn test_correction_target_at_entry_price_buys() {
        let wave = wave_with_target(WaveKind::Impulse, 100.0, 90.0);
        let rec = recommend(Some(&wave), &prediction(Outlook::Correction, 0.7), 100.0, 0.02);

        assert_eq!(rec.action, TradeAction::Buy);
        assert!((rec.stop_loss.unwrap() - 98.0).abs() < 1e-9);
    }

    #[test]
    fn test_target_on_losing_side_carries_negative_ratio() {
        // Near target below entry makes this a sell, but the far target
        // sits above entry and must not be counted as a gain.
        let wave = wave_with_target(WaveKind::Impulse, 90.0, 110.0);
        let rec = recommend(Some(&wave), &prediction(Outlook::Correction, 0.7), 100.0, 0.02);

        assert_eq!(rec.action, TradeAction::Sell);
        assert!((rec.risk_reward[0] - 5.0).abs() < 1e-9);
        assert!((rec.risk_reward[1] + 5.0).abs() < 1e-9);
    }
}
