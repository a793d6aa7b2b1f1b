use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::config::alerts::DEFAULT_SYMBOL;
use crate::data::history::CandleHistory;
use crate::domain::{Candle, Interval};

/// Candles for one symbol/interval, as served by the kline endpoint.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SymbolCandles {
    pub symbol: String,
    #[serde(default)]
    pub interval: Interval,
    pub candles: Vec<Candle>,
}

/// Accepted on-disk layouts: the kline payload or a bare array of candles.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum CandleFile {
    Payload(SymbolCandles),
    Bare(Vec<Candle>),
}

/// Parses candle JSON. Bare arrays get `DEFAULT_SYMBOL` and the default interval
/// unless the caller overrides them afterwards.
///
/// Candles come back time-ordered with one bar per open time; any non-finite price
/// is an error.
pub fn parse_candles(json: &str) -> Result<SymbolCandles> {
    let file: CandleFile = serde_json::from_str(json).context("Failed to parse candle JSON")?;
    let mut series = match file {
        CandleFile::Payload(series) => series,
        CandleFile::Bare(candles) => SymbolCandles {
            symbol: DEFAULT_SYMBOL.to_string(),
            interval: Interval::default(),
            candles,
        },
    };

    if let Some(bad) = series.candles.iter().find(|c| {
        ![c.open, c.high, c.low, c.close]
            .iter()
            .all(|x| x.is_finite())
    }) {
        bail!("Candle at time {} has a non-finite price", bad.time);
    }

    series.candles = CandleHistory::from_candles(series.candles).into_candles();
    Ok(series)
}

pub fn load_candles(path: &Path) -> Result<SymbolCandles> {
    let text = std::fs::read_to_string(path)
        .context(format!("Failed to read candle file: {}", path.display()))?;
    let series =
        parse_candles(&text).context(format!("Invalid candle file: {}", path.display()))?;
    log::info!(
        "Loaded {} candles for {} {} from {}",
        series.candles.len(),
        series.symbol,
        series.interval,
        path.display()
    );
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_kline_payload() {
        let json = r#"{
            "symbol": "BTC_USDT",
            "interval": "Hour4",
            "candles": [
                {"time": 120, "open": 2.0, "high": 3.0, "low": 1.5, "close": 2.5, "volume": 10.0},
                {"time": 60, "open": 1.0, "high": 2.0, "low": 0.5, "close": 2.0}
            ]
        }"#;
        let series = parse_candles(json).unwrap();
        assert_eq!(series.symbol, "BTC_USDT");
        assert_eq!(series.interval, Interval::Hour4);
        assert_eq!(series.candles.len(), 2);
        assert_eq!(series.candles[0].time, 60);
        assert_eq!(series.candles[0].volume, None);
        assert_eq!(series.candles[1].volume, Some(10.0));
    }

    #[test]
    fn reads_bare_array() {
        let json = r#"[{"time": 60, "open": 1.0, "high": 2.0, "low": 0.5, "close": 2.0}]"#;
        let series = parse_candles(json).unwrap();
        assert_eq!(series.symbol, DEFAULT_SYMBOL);
        assert_eq!(series.interval, Interval::Min1);
        assert_eq!(series.candles.len(), 1);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_candles(r#"{"candles": 3}"#).is_err());
        assert!(parse_candles("not json").is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_candles(Path::new("/nonexistent/candles.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read candle file"));
    }
}
