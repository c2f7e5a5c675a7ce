use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Upstream providers the facade talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Live technical-indicator scanner.
    Tradingview,
    /// Historical OHLCV chart data.
    Yahoo,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tradingview => "tradingview",
            Self::Yahoo => "yahoo",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
