#[cfg(debug_assertions)]
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;

#[cfg(debug_assertions)]
use crate::config::debug::PRINT_DASHBOARD_TIMINGS;
use crate::config::DashboardConfig;
use crate::data::SymbolCandles;
use crate::domain::candle::closes;
use crate::domain::{Candle, Direction, ZoneSnapshot};
use crate::indicators::{
    BiasState, BreakoutLevels, Envelope, MacdSeries, MarketBias, atr, balance_score,
    breakout_levels, ema_first_seeded, envelope, macd, market_bias, rsi,
};
use crate::signals::{
    CrossEvents, EfmLines, LateReboundSignals, ReboundContext, ReboundSignals, detect_crosses,
    detect_late_rebounds, detect_rebounds, efm_lines,
};

/// Every series and event list the chart draws, aligned to the input candles.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Dashboard {
    pub times: Vec<i64>,
    pub close: Vec<f64>,
    pub overlay_ema: Vec<f64>,
    pub rsi: Vec<f64>,
    pub macd: MacdSeries,
    pub atr: Vec<f64>,
    pub envelope: Envelope,
    pub breakout: BreakoutLevels,
    pub balance: Vec<f64>,
    pub market_bias: MarketBias,
    pub efm: EfmLines,
    pub crosses: CrossEvents,
    pub rebounds: ReboundSignals,
    pub late_rebounds: LateReboundSignals,
}

/// Last-bar readout for status panels.
#[derive(Debug, Clone, Serialize)]
pub struct LatestValues {
    pub index: usize,
    pub time: i64,
    pub close: f64,
    pub overlay_ema: f64,
    pub rsi: f64,
    pub macd_hist: f64,
    pub atr: f64,
    pub balance: f64,
    pub bias_avg: f64,
    pub bias_state: BiasState,
    pub envelope_upper: f64,
    pub envelope_lower: f64,
    pub breakout_upper: f64,
    pub breakout_lower: f64,
    pub cross: Option<Direction>,
    pub rebound: Option<Direction>,
    pub late_rebound: Option<Direction>,
    pub zone: Option<ZoneSnapshot>,
}

impl Dashboard {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Zone still standing after the primary pass, if any.
    pub fn zone(&self) -> Option<&ZoneSnapshot> {
        self.rebounds.last_zone.as_ref()
    }

    pub fn latest(&self) -> Option<LatestValues> {
        let t = self.len().checked_sub(1)?;
        Some(LatestValues {
            index: t,
            time: self.times[t],
            close: self.close[t],
            overlay_ema: self.overlay_ema[t],
            rsi: self.rsi[t],
            macd_hist: self.macd.hist[t],
            atr: self.atr[t],
            balance: self.balance[t],
            bias_avg: self.market_bias.avg[t],
            bias_state: self.market_bias.state_at(t),
            envelope_upper: self.envelope.upper[t],
            envelope_lower: self.envelope.lower[t],
            breakout_upper: self.breakout.upper[t],
            breakout_lower: self.breakout.lower[t],
            cross: self.crosses.direction_at(t),
            rebound: self.rebounds.direction_at(t),
            late_rebound: self.late_rebounds.direction_at(t),
            zone: self.rebounds.last_zone,
        })
    }
}

/// Runs every indicator and both detector passes over `candles`.
pub fn compute_dashboard(candles: &[Candle], config: &DashboardConfig) -> Dashboard {
    #[cfg(debug_assertions)]
    let start = Instant::now();

    let close = closes(candles);
    let atr = atr(candles, config.atr_len);
    let envelope = envelope(candles, &config.nwe);
    let breakout = breakout_levels(candles, &config.breakout);
    let balance = balance_score(candles, &envelope, &breakout, &config.balance);
    let market_bias = market_bias(candles, &config.market_bias);
    let efm = efm_lines(candles, &config.efm);
    let crosses = detect_crosses(&efm.fast, &efm.slow);

    let ctx = ReboundContext {
        candles,
        bias: &market_bias,
        atr: &atr,
    };
    let rebounds = detect_rebounds(&ctx, &crosses, &config.rebound);
    let late_rebounds = detect_late_rebounds(
        &ctx,
        rebounds.last_zone.as_ref(),
        &config.rebound,
        &config.late_rebound,
    );

    let dashboard = Dashboard {
        times: candles.iter().map(|c| c.time).collect(),
        overlay_ema: ema_first_seeded(&close, config.overlay_ema),
        rsi: rsi(candles, config.rsi_len),
        macd: macd(candles, &config.macd),
        close,
        atr,
        envelope,
        breakout,
        balance,
        market_bias,
        efm,
        crosses,
        rebounds,
        late_rebounds,
    };

    #[cfg(debug_assertions)]
    if PRINT_DASHBOARD_TIMINGS {
        log::info!(
            "Dashboard over {} bars in {:.2?}",
            candles.len(),
            start.elapsed()
        );
    }

    dashboard
}

/// One dashboard per symbol, computed in parallel. Output order follows input order.
pub fn compute_many(
    series: &[SymbolCandles],
    config: &DashboardConfig,
) -> Vec<(String, Dashboard)> {
    series
        .par_iter()
        .map(|s| (s.symbol.clone(), compute_dashboard(&s.candles, config)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::INDICATORS;
    use crate::domain::Interval;

    fn wave(n: usize, phase: f64) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let x = i as f64 * 0.09 + phase;
                let o = 100.0 + x.sin() * 6.0 + (x * 0.3).cos() * 2.0;
                let c = 100.0 + (x + 0.09).sin() * 6.0 + ((x + 0.09) * 0.3).cos() * 2.0;
                Candle::new(i as i64 * 60, o, o.max(c) + 0.4, o.min(c) - 0.4, c)
            })
            .collect()
    }

    #[test]
    fn every_series_matches_input_length() {
        let candles = wave(300, 0.0);
        let dash = compute_dashboard(&candles, &INDICATORS);
        let n = candles.len();
        for series in [
            &dash.close,
            &dash.overlay_ema,
            &dash.rsi,
            &dash.macd.macd,
            &dash.macd.signal,
            &dash.macd.hist,
            &dash.atr,
            &dash.envelope.center,
            &dash.envelope.upper,
            &dash.breakout.upper,
            &dash.balance,
            &dash.market_bias.avg,
            &dash.efm.fast,
            &dash.efm.slow,
        ] {
            assert_eq!(series.len(), n);
        }
        assert!(dash.rebounds.long.iter().chain(&dash.rebounds.short).all(|&t| t < n));
    }

    #[test]
    fn empty_input_gives_empty_dashboard() {
        let dash = compute_dashboard(&[], &INDICATORS);
        assert!(dash.is_empty());
        assert!(dash.latest().is_none());
        assert!(dash.zone().is_none());
    }

    #[test]
    fn latest_reads_last_bar() {
        let candles = wave(120, 0.5);
        let dash = compute_dashboard(&candles, &INDICATORS);
        let latest = dash.latest().unwrap();
        assert_eq!(latest.index, 119);
        assert_eq!(latest.time, candles[119].time);
        assert_eq!(latest.close, candles[119].close);
        assert!(latest.atr.is_finite());
        assert!(latest.rsi.is_finite());
    }

    #[test]
    fn late_rebounds_follow_the_final_zone() {
        let candles = wave(400, 1.0);
        let dash = compute_dashboard(&candles, &INDICATORS);
        match dash.zone() {
            Some(zone) => {
                let min_t = zone.mark_index + INDICATORS.late_rebound.min_bars;
                let (same, other) = match zone.direction {
                    Direction::Long => (&dash.late_rebounds.long, &dash.late_rebounds.short),
                    Direction::Short => (&dash.late_rebounds.short, &dash.late_rebounds.long),
                };
                assert!(other.is_empty());
                assert!(same.iter().all(|&t| t >= min_t));
            }
            None => assert_eq!(dash.late_rebounds, LateReboundSignals::default()),
        }
    }

    #[test]
    fn parallel_matches_sequential() {
        let series: Vec<SymbolCandles> = (0..4)
            .map(|k| SymbolCandles {
                symbol: format!("SYM{}_USDT", k),
                interval: Interval::Min5,
                candles: wave(200, k as f64),
            })
            .collect();
        let many = compute_many(&series, &INDICATORS);

        assert_eq!(many.len(), series.len());
        for ((symbol, dash), s) in many.iter().zip(&series) {
            assert_eq!(symbol, &s.symbol);
            let single = compute_dashboard(&s.candles, &INDICATORS);
            assert_eq!(dash.crosses, single.crosses);
            assert_eq!(dash.rebounds, single.rebounds);
        }
    }
}
