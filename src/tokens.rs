//! Token directory - static registry of supported stablecoins
//!
//! Maps a token symbol to its settlement currency, on-chain mint,
//! decimal precision and classification. Loaded once at startup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::CurrencyCode;

/// Token classification
///
/// Only plain 1:1 pegged tokens are expected to hold parity with the
/// primary token of their currency; the other classes carry yield,
/// collateral or transfer-restriction premia.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenClass {
    PlainPeg,
    YieldBearing,
    Synthetic,
    Institutional,
}

impl Default for TokenClass {
    fn default() -> Self {
        TokenClass::PlainPeg
    }
}

/// Static token descriptor
#[derive(Debug, Clone, Serialize)]
pub struct TokenInfo {
    pub symbol: &'static str,
    pub currency: CurrencyCode,
    pub mint_address: &'static str,
    pub decimals: u32,
    pub name: &'static str,
    pub issuer: &'static str,
    pub class: TokenClass,
}

impl TokenInfo {
    /// True for standard 1:1 pegged stablecoins
    pub fn is_plain_peg(&self) -> bool {
        self.class == TokenClass::PlainPeg
    }
}

const fn token(
    symbol: &'static str,
    currency: CurrencyCode,
    mint_address: &'static str,
    decimals: u32,
    name: &'static str,
    issuer: &'static str,
    class: TokenClass,
) -> TokenInfo {
    TokenInfo {
        symbol,
        currency,
        mint_address,
        decimals,
        name,
        issuer,
        class,
    }
}

use CurrencyCode::*;
use TokenClass::*;

/// The full registry, grouped by settlement currency
const REGISTRY: &[TokenInfo] = &[
    // USD
    token("USDC", USD, "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", 6, "USD Coin", "Circle", PlainPeg),
    token("USDT", USD, "Es9vMF1kYDAS4aW63wFcd2BaRfGDiS4ixQe8H6PPJCmn", 6, "Tether USD", "Tether", PlainPeg),
    token("AUSD", USD, "AUSD1jCcCyPLybk1YnvPWsHQSrZ46dxwoMniN4N2UEB9", 6, "AUSD", "AUSD", PlainPeg),
    token("BUIDL", USD, "GyWgeqpy5GueU2YbkE8xqUeVEokCMMCEeUrfbtMw6phr", 6, "BlackRock USD Institutional Digital Liquidity Fund", "BlackRock", Institutional),
    token("CASH", USD, "CASHx9KJUStyftLFWGvEVf59SGeG9sh5FfcnZMVPCASH", 6, "CASH", "Cash", PlainPeg),
    token("FDUSD", USD, "9zNQRsGLjNKwCUU5Gq5LR8beUCPzQMVMqKAi3SSZh54u", 6, "First Digital USD", "First Digital", PlainPeg),
    token("GGUSD", USD, "GGUSDyBUPFg5RrgWwqEqhXoha85iYGs6cL57SyK4G2Y7", 6, "GGUSD", "GGUSD", PlainPeg),
    token("USDG", USD, "2u1tszSeqZ3qBWF3uNGPFc8TzMk2tdiwknnRMWGWjGWH", 6, "Global Dollar", "Paxos", PlainPeg),
    token("USDY", USD, "A1KLoBrKBde8Ty9qtNQUtq3C2ortoC3u7twggz7sEto6", 6, "Ondo US Dollar Yield", "Ondo", YieldBearing),
    token("USDP", USD, "HVbpJAQGNpkgBaYBZQBR1t7yFdvaYVp2vCQQfKKEN4tM", 6, "Pax Dollar", "Paxos", PlainPeg),
    token("PYUSD", USD, "2b1kV6DkPAnxd5ixfnxCpjxmKwqjjaYmCZfHsFu24GXo", 6, "PayPal USD", "PayPal", PlainPeg),
    token("legacyUSD", USD, "BenJy1n3WTx9mTjEvy63e8Q1j4RqUc6E4VBMz3ir4Wo6", 6, "Legacy USD Star", "Legacy", YieldBearing),
    token("USDS", USD, "USDSwr9ApdHk5bvJKMjzff41FfuX8bSxdKcR81vTwcA", 6, "USDS", "Sky", PlainPeg),
    token("sUSD", USD, "susdabGDNbhrnCa6ncrYo81u4s9GM8ecK2UwMyZiq4X", 6, "Solayer USD", "Solayer", YieldBearing),
    token("syrupUSDC", USD, "AvZZF1YaZDziPY2RCK4oJrRVrbN3mTD9NL24hPeaZeUj", 6, "Syrup USDC", "Maple", YieldBearing),
    token("USDe", USD, "DEkqHyPN7GMRJ5cArtQFAWefqbZb33Hyf6s5iCwjEonT", 9, "USDe", "Ethena", Synthetic),
    token("USDu", USD, "9ckR7pPPvyPadACDTzLwK2ZAEeUJ3qGSnzPs8bVaHrSy", 6, "USDu", "Ethena", PlainPeg),
    token("USX", USD, "6FrrzDk5mQARGc1TDYoyVnSyRdds1t4PbtohCD6p3tgG", 6, "USX", "dForce", PlainPeg),
    token("USD1", USD, "USD1ttGY1N17NEEHLmELoaybftRBUSErhqYiQzvEmuB", 6, "World Liberty Financial USD", "World Liberty Financial", PlainPeg),
    // EUR
    token("EURC", EUR, "HzwqbKZw8HxMN6bF2yFZNrht3c2iXXzpKcFu7uBEDKtr", 6, "Euro Coin", "Circle", PlainPeg),
    token("EURCV", EUR, "DghpMkatCiUsofbTmid3M3kAbDTPqDwKiYHnudXeGG52", 2, "EUR CoinVertible", "SG Forge", PlainPeg),
    token("EUROe", EUR, "2VhjJ9WxaGC3EZFwJG9BDUs9KxKCAjQY4vgd1qxgYWVg", 6, "EUROe Stablecoin", "Membrane", PlainPeg),
    token("VEUR", EUR, "C4Kkr9NZU3VbyedcgutU6LKmi6MKz81sx6gRmk5pX519", 9, "VNX Euro", "VNX", PlainPeg),
    // JPY
    token("GYEN", JPY, "Crn4x1Y2HUKko7ox2EZMT6N2t2ZyH7eKtwkBGVnhEq1g", 6, "GMO JPY", "GMO Trust", PlainPeg),
    // GBP
    token("VGBP", GBP, "5H4voZhzySsVvwVYDAKku8MZGuYBC7cXaBKDPW4YHWW1", 9, "VNX British Pound", "VNX", PlainPeg),
    // CHF
    token("VCHF", CHF, "AhhdRu5YZdjVkKR3wbnUDaymVQL2ucjMQ63sZ3LFHsch", 9, "VNX Swiss Franc", "VNX", PlainPeg),
    // BRL
    token("BRZ", BRL, "FtgGSFADXBtroxq8VCausXRr2of47QBf5AS1NtZCu4GD", 4, "BRZ", "Transfero", PlainPeg),
    // TRY
    token("TRYB", TRY, "A94X2fRy3wydNShU4dRaDyap2UuoeWJGWyATtyp61WZf", 6, "BiLira", "BiLira", PlainPeg),
    // MXN
    token("MXNe", MXN, "6zYgzrT7X2wi9a9NeMtUvUWLLmf2a8vBsbYkocYdB9wa", 9, "Real MXN", "Membrane", PlainPeg),
    // NGN
    token("NGNC", NGN, "52GzcLDMfBveMRnWXKX7U3Pa5Lf7QLkWWvsJRDjWDBSk", 2, "NGN Coin", "NGNC", PlainPeg),
    // IDR
    token("IDRX", IDR, "idrxTdNftk6tYedPv2M7tCFHBVCpk5rkiNRd8yUArhr", 2, "IDRX", "IDRX", PlainPeg),
    // ZAR
    token("ZARP", ZAR, "dngKhBQM3BGvsDHKhrLnjvRKfY5Q7gEnYGToj9Lk8rk", 6, "ZARP Stablecoin", "ZARP", PlainPeg),
];

/// Read-only symbol lookup over the static registry
#[derive(Debug, Clone)]
pub struct TokenDirectory {
    by_symbol: HashMap<&'static str, &'static TokenInfo>,
}

impl TokenDirectory {
    pub fn new() -> Self {
        let by_symbol = REGISTRY.iter().map(|t| (t.symbol, t)).collect();
        Self { by_symbol }
    }

    /// Look up a token by symbol
    pub fn get(&self, symbol: &str) -> Option<&'static TokenInfo> {
        self.by_symbol.get(symbol).copied()
    }

    /// All registered tokens in registry order
    pub fn all(&self) -> impl Iterator<Item = &'static TokenInfo> {
        REGISTRY.iter()
    }

    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }
}

impl Default for TokenDirectory {
    fn default() -> Self {
        Self::new()
    }
}
