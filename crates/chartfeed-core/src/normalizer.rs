//! Symbol and interval translation between the canonical vocabulary and each
//! provider's conventions.
//!
//! None of these functions fail. Unknown symbols get the forex suffix and
//! unknown timeframe codes resolve to the hourly interval; a bad mapping only
//! surfaces when the provider itself rejects it.

use tracing::debug;

use crate::{ProviderId, Symbol, Timeframe};

/// Suffix Yahoo uses for spot currency pairs.
pub const YAHOO_FOREX_SUFFIX: &str = "=X";

/// Canonical code to Yahoo ticker.
const YAHOO_TICKERS: &[(&str, &str)] = &[
    // Forex
    ("EURUSD", "EURUSD=X"),
    ("GBPUSD", "GBPUSD=X"),
    ("USDJPY", "USDJPY=X"),
    ("USDCHF", "USDCHF=X"),
    ("AUDUSD", "AUDUSD=X"),
    ("USDCAD", "USDCAD=X"),
    ("NZDUSD", "NZDUSD=X"),
    ("EURGBP", "EURGBP=X"),
    ("EURJPY", "EURJPY=X"),
    ("GBPJPY", "GBPJPY=X"),
    ("AUDJPY", "AUDJPY=X"),
    ("EURCHF", "EURCHF=X"),
    // Metals trade as front-month futures
    ("XAUUSD", "GC=F"),
    ("XAGUSD", "SI=F"),
    ("XPTUSD", "PL=F"),
    ("XPDUSD", "PA=F"),
    // Crypto
    ("BTCUSD", "BTC-USD"),
    ("ETHUSD", "ETH-USD"),
    ("SOLUSD", "SOL-USD"),
    ("XRPUSD", "XRP-USD"),
    ("LTCUSD", "LTC-USD"),
    // Indices
    ("US30", "^DJI"),
    ("NAS100", "^NDX"),
    ("SPX500", "^GSPC"),
    ("GER40", "^GDAXI"),
    ("UK100", "^FTSE"),
];

pub fn normalize_symbol(symbol: &Symbol, provider: ProviderId) -> String {
    match provider {
        ProviderId::Tradingview => symbol.as_str().to_owned(),
        ProviderId::Yahoo => yahoo_ticker(symbol),
    }
}

pub fn normalize_interval(code: &str, provider: ProviderId) -> &'static str {
    let timeframe = Timeframe::resolve(code);
    match provider {
        ProviderId::Tradingview => tradingview_interval(timeframe),
        ProviderId::Yahoo => yahoo_interval(timeframe),
    }
}

/// Yahoo ticker for a canonical code, falling back to the forex suffix.
pub fn yahoo_ticker(symbol: &Symbol) -> String {
    let code = symbol.as_str();
    match YAHOO_TICKERS.iter().find(|(canonical, _)| *canonical == code) {
        Some((_, ticker)) => (*ticker).to_owned(),
        None => {
            debug!(symbol = code, "no yahoo mapping; assuming forex pair");
            format!("{code}{YAHOO_FOREX_SUFFIX}")
        }
    }
}

/// Scanner ticker in `EXCHANGE:SYMBOL` form.
pub fn tradingview_ticker(exchange: &str, symbol: &Symbol) -> String {
    format!("{}:{}", exchange, symbol.as_str())
}

/// Scanner resolution code for a timeframe.
pub const fn tradingview_interval(timeframe: Timeframe) -> &'static str {
    match timeframe {
        Timeframe::OneMinute => "1",
        Timeframe::FiveMinutes => "5",
        Timeframe::FifteenMinutes => "15",
        Timeframe::OneHour => "60",
        Timeframe::FourHours => "240",
        Timeframe::OneDay => "1D",
    }
}

/// Yahoo chart interval for a timeframe.
///
/// Yahoo publishes no 4-hour bars, so that timeframe uses hourly candles.
pub const fn yahoo_interval(timeframe: Timeframe) -> &'static str {
    match timeframe {
        Timeframe::OneMinute => "1m",
        Timeframe::FiveMinutes => "5m",
        Timeframe::FifteenMinutes => "15m",
        Timeframe::OneHour | Timeframe::FourHours => "60m",
        Timeframe::OneDay => "1d",
    }
}

/// Yahoo `range` parameter for a lookback window in days.
pub fn yahoo_period(lookback_days: u32) -> String {
    format!("{lookback_days}d")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(code: &str) -> Symbol {
        Symbol::parse(code).expect("valid symbol")
    }

    #[test]
    fn maps_known_symbols_to_yahoo_families() {
        assert_eq!(normalize_symbol(&symbol("EURUSD"), ProviderId::Yahoo), "EURUSD=X");
        assert_eq!(normalize_symbol(&symbol("XAUUSD"), ProviderId::Yahoo), "GC=F");
        assert_eq!(normalize_symbol(&symbol("BTCUSD"), ProviderId::Yahoo), "BTC-USD");
        assert_eq!(normalize_symbol(&symbol("US30"), ProviderId::Yahoo), "^DJI");
    }

    #[test]
    fn unknown_symbols_fall_back_to_forex_suffix() {
        assert_eq!(yahoo_ticker(&symbol("USDTRY")), "USDTRY=X");
        assert_eq!(yahoo_ticker(&symbol("NOTREAL")), "NOTREAL=X");
    }

    #[test]
    fn tradingview_keeps_the_canonical_symbol() {
        assert_eq!(normalize_symbol(&symbol("XAUUSD"), ProviderId::Tradingview), "XAUUSD");
        assert_eq!(tradingview_ticker("OANDA", &symbol("XAUUSD")), "OANDA:XAUUSD");
    }

    #[test]
    fn every_canonical_timeframe_has_a_mapping_in_both_vocabularies() {
        let expected = [
            ("1m", "1", "1m"),
            ("5m", "5", "5m"),
            ("15m", "15", "15m"),
            ("1h", "60", "60m"),
            ("4h", "240", "60m"),
            ("1d", "1D", "1d"),
        ];
        for (code, tradingview, yahoo) in expected {
            assert_eq!(normalize_interval(code, ProviderId::Tradingview), tradingview);
            assert_eq!(normalize_interval(code, ProviderId::Yahoo), yahoo);
        }
    }

    #[test]
    fn unrecognized_timeframes_resolve_to_hourly() {
        for code in ["", "2h", "1w", "garbage", "60"] {
            assert_eq!(normalize_interval(code, ProviderId::Tradingview), "60");
            assert_eq!(normalize_interval(code, ProviderId::Yahoo), "60m");
        }
    }

    #[test]
    fn period_is_days_suffixed() {
        assert_eq!(yahoo_period(7), "7d");
        assert_eq!(yahoo_period(30), "30d");
    }
}
