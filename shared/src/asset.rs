//! Crypto settlement asset normalization
//!
//! The payment gateway reports the settled asset as a free-form ticker,
//! sometimes suffixed with the chain it travelled on (`USDC.ERC20`,
//! `USDT.TRC20`). Pricing needs the market-data provider's canonical asset
//! id, so the mapping is a fixed table. An unknown ticker is a hard stop
//! for the caller: mispricing a crypto settlement is worse than failing
//! loudly, so there is no default.

/// Resolve a gateway ticker to the market-data provider's canonical asset id.
///
/// Matching is case-insensitive; chain-suffixed stablecoin tickers collapse
/// to the same canonical asset. Returns `None` for unsupported tickers.
pub fn canonical_asset_id(ticker: &str) -> Option<&'static str> {
    let normalized = ticker.trim().to_ascii_uppercase();
    let id = match normalized.as_str() {
        "BTC" => "bitcoin",
        "ETH" => "ethereum",
        "LTC" => "litecoin",
        "BCH" => "bitcoin-cash",
        "DOGE" => "dogecoin",
        "XRP" => "ripple",
        "TRX" => "tron",
        "SOL" => "solana",
        "ADA" => "cardano",
        "BNB" | "BNB.BEP20" => "binancecoin",
        "MATIC" | "MATIC.POLYGON" => "matic-network",
        "DAI" | "DAI.ERC20" => "dai",
        "USDC" | "USDC.ERC20" | "USDC.BEP20" | "USDC.POLYGON" => "usd-coin",
        "USDT" | "USDT.ERC20" | "USDT.TRC20" | "USDT.BEP20" => "tether",
        _ => return None,
    };
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_tickers() {
        assert_eq!(canonical_asset_id("BTC"), Some("bitcoin"));
        assert_eq!(canonical_asset_id("ETH"), Some("ethereum"));
        assert_eq!(canonical_asset_id("USDT"), Some("tether"));
    }

    #[test]
    fn test_chain_suffixed_tickers_collapse() {
        assert_eq!(canonical_asset_id("USDC.ERC20"), Some("usd-coin"));
        assert_eq!(canonical_asset_id("USDC"), Some("usd-coin"));
        assert_eq!(canonical_asset_id("USDT.TRC20"), Some("tether"));
        assert_eq!(canonical_asset_id("USDT.ERC20"), Some("tether"));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(canonical_asset_id("btc"), Some("bitcoin"));
        assert_eq!(canonical_asset_id("usdc.erc20"), Some("usd-coin"));
    }

    #[test]
    fn test_unknown_ticker_is_none() {
        assert_eq!(canonical_asset_id("FAKE"), None);
        assert_eq!(canonical_asset_id(""), None);
        assert_eq!(canonical_asset_id("USDC.UNKNOWNCHAIN"), None);
    }
}
