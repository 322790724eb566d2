//! End-to-end tests for the rate engine, scanner and depth analyzer
//! against mocked DEX-quote and oracle providers.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use mockall::mock;

    use fxscan::arbitrage::{dedupe, Scanner};
    use fxscan::config::{ScannerConfig, SpreadThresholds};
    use fxscan::depth::analyze_depth;
    use fxscan::dex::{QuoteProvider, QuoteRequest, QuoteResponse};
    use fxscan::engine::{ComparisonParams, RateEngine};
    use fxscan::error::EngineError;
    use fxscan::oracle::OracleProvider;
    use fxscan::routing::{FeedId, EUR_USD, USD_JPY};
    use fxscan::tokens::TokenDirectory;
    use fxscan::types::{CurrencyCode, OraclePrice, SpreadDirection};

    mock! {
        Quotes {}

        #[async_trait]
        impl QuoteProvider for Quotes {
            async fn get_quote(&self, request: &QuoteRequest) -> Result<QuoteResponse>;
        }
    }

    mock! {
        Oracle {}

        #[async_trait]
        impl OracleProvider for Oracle {
            async fn latest_price(&self, feed: FeedId) -> Result<OraclePrice>;
            async fn latest_prices(&self, feeds: &[FeedId]) -> Result<HashMap<FeedId, OraclePrice>>;
        }
    }

    fn reading(price: f64) -> OraclePrice {
        OraclePrice {
            price,
            confidence: 0.0005,
            expo: -8,
            publish_time: 1_700_000_000,
        }
    }

    fn quote(in_amount: &str, out_amount: &str) -> QuoteResponse {
        QuoteResponse {
            in_amount: in_amount.to_string(),
            out_amount: out_amount.to_string(),
            request_id: "req-1".to_string(),
            transaction: None,
        }
    }

    fn engine(quotes: MockQuotes, oracle: MockOracle) -> RateEngine {
        RateEngine::new(
            TokenDirectory::new(),
            Arc::new(quotes),
            Arc::new(oracle),
            SpreadThresholds::default(),
        )
    }

    fn params(input: &str, output: &str, amount: f64) -> ComparisonParams {
        ComparisonParams {
            input_token: input.to_string(),
            output_token: output.to_string(),
            amount,
            taker: None,
        }
    }

    // ========================================================================
    // Rate engine
    // ========================================================================

    #[tokio::test]
    async fn test_usdc_to_eurc_uses_eur_usd_feed() {
        let mut quotes = MockQuotes::new();
        quotes
            .expect_get_quote()
            .withf(|req| req.amount == "1000000000")
            .returning(|_| Ok(quote("1000000000", "921500000")));

        let mut oracle = MockOracle::new();
        oracle
            .expect_latest_prices()
            .withf(|feeds| feeds == [EUR_USD].as_slice())
            .returning(|_| Ok(HashMap::from([(EUR_USD, reading(1.0845))])));

        let engine = engine(quotes, oracle);
        let result = engine
            .get_comparison(&params("USDC", "EURC", 1000.0))
            .await
            .unwrap();

        assert!((result.dex_rate - 0.9215).abs() < 1e-9);
        // USD -> EUR is the inverse of the EUR/USD feed
        assert!((result.oracle_rate - 1.0 / 1.0845).abs() < 1e-9);
        assert!((result.output_amount - 921.5).abs() < 1e-9);
        assert!(result.order.is_none());
    }

    #[tokio::test]
    async fn test_same_currency_skips_oracle() {
        let mut quotes = MockQuotes::new();
        quotes
            .expect_get_quote()
            .returning(|_| Ok(quote("1000000000", "999800000")));

        // No expectations: any oracle call panics the test
        let oracle = MockOracle::new();

        let engine = engine(quotes, oracle);
        let result = engine
            .get_comparison(&params("USDC", "USDT", 1000.0))
            .await
            .unwrap();

        assert_eq!(result.oracle_rate, 1.0);
        assert_eq!(result.oracle_confidence, 0.0);
        assert!((result.dex_rate - 0.9998).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_usdc_to_gyen_uses_usd_jpy_feed() {
        let mut quotes = MockQuotes::new();
        quotes
            .expect_get_quote()
            .returning(|_| Ok(quote("1000000000", "155230000000")));

        let mut oracle = MockOracle::new();
        oracle
            .expect_latest_prices()
            .withf(|feeds| feeds == [USD_JPY].as_slice())
            .returning(|_| Ok(HashMap::from([(USD_JPY, reading(155.23))])));

        let engine = engine(quotes, oracle);
        let result = engine
            .get_comparison(&params("USDC", "GYEN", 1000.0))
            .await
            .unwrap();

        assert!((result.dex_rate - 155.23).abs() < 1e-9);
        assert!((result.oracle_rate - 155.23).abs() < 1e-9);
        assert_eq!(result.spread_direction, SpreadDirection::Par);
    }

    #[tokio::test]
    async fn test_cross_currency_premium_example() {
        // EURC -> GYEN at a DEX rate of 169.00 against EUR/USD 1.0845 and
        // USD/JPY 155.23 (oracle cross ~168.35) is a small premium
        let mut quotes = MockQuotes::new();
        quotes
            .expect_get_quote()
            .returning(|_| Ok(quote("1000000000", "169000000000")));

        let mut oracle = MockOracle::new();
        oracle.expect_latest_prices().returning(|_| {
            Ok(HashMap::from([
                (EUR_USD, reading(1.0845)),
                (USD_JPY, reading(155.23)),
            ]))
        });

        let engine = engine(quotes, oracle);
        let result = engine
            .get_comparison(&params("EURC", "GYEN", 1000.0))
            .await
            .unwrap();

        assert!((result.oracle_rate - 1.0845 * 155.23).abs() < 1e-9);
        assert_eq!(result.spread_direction, SpreadDirection::Premium);
        assert!((result.spread_percent - 0.388).abs() < 0.01);
        assert!(result.spread_percent.abs() < 0.5);
    }

    #[tokio::test]
    async fn test_unknown_token_fails() {
        let engine = engine(MockQuotes::new(), MockOracle::new());
        let err = engine
            .get_comparison(&params("DOGE", "USDC", 1000.0))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownToken(s) if s == "DOGE"));
    }

    #[tokio::test]
    async fn test_quote_failure_fails_comparison_atomically() {
        let mut quotes = MockQuotes::new();
        quotes
            .expect_get_quote()
            .returning(|_| Err(anyhow!("no route for swap")));

        let mut oracle = MockOracle::new();
        oracle
            .expect_latest_prices()
            .returning(|_| Ok(HashMap::from([(EUR_USD, reading(1.0845))])));

        let engine = engine(quotes, oracle);
        let result = engine.get_comparison(&params("USDC", "EURC", 1000.0)).await;
        assert!(matches!(result, Err(EngineError::Provider(_))));
    }

    #[tokio::test]
    async fn test_taker_returns_order_payload() {
        let mut quotes = MockQuotes::new();
        quotes
            .expect_get_quote()
            .withf(|req| req.taker.as_deref() == Some("TakerAddr111"))
            .returning(|_| {
                Ok(QuoteResponse {
                    in_amount: "1000000000".to_string(),
                    out_amount: "999800000".to_string(),
                    request_id: "req-77".to_string(),
                    transaction: Some("AQID".to_string()),
                })
            });

        let engine = engine(quotes, MockOracle::new());
        let result = engine
            .get_comparison(&ComparisonParams {
                input_token: "USDC".to_string(),
                output_token: "USDT".to_string(),
                amount: 1000.0,
                taker: Some("TakerAddr111".to_string()),
            })
            .await
            .unwrap();

        let order = result.order.unwrap();
        assert_eq!(order.request_id, "req-77");
        assert_eq!(order.transaction, "AQID");
        assert_eq!(order.in_amount, "1000000000");
    }

    #[tokio::test]
    async fn test_amount_conversion_floors() {
        let mut quotes = MockQuotes::new();
        quotes
            .expect_get_quote()
            // 0.0000019 USDC is 1.9 raw units; must floor to 1, not round to 2
            .withf(|req| req.amount == "1")
            .returning(|_| Ok(quote("1", "1")));

        let engine = engine(quotes, MockOracle::new());
        let result = engine
            .get_comparison(&params("USDC", "USDT", 0.0000019))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_get_oracle_rate_cross() {
        let mut oracle = MockOracle::new();
        oracle.expect_latest_prices().returning(|_| {
            Ok(HashMap::from([
                (EUR_USD, reading(1.0845)),
                (USD_JPY, reading(155.23)),
            ]))
        });

        let engine = engine(MockQuotes::new(), oracle);
        let rate = engine
            .get_oracle_rate(CurrencyCode::EUR, CurrencyCode::JPY)
            .await
            .unwrap();
        assert!((rate - 168.347).abs() < 0.01);

        let identity = engine
            .get_oracle_rate(CurrencyCode::USD, CurrencyCode::USD)
            .await
            .unwrap();
        assert_eq!(identity, 1.0);
    }

    // ========================================================================
    // Scanner
    // ========================================================================

    fn scanner_config() -> ScannerConfig {
        ScannerConfig {
            reference_amount: 1000.0,
            interval_secs: 60,
            batch_size: 6,
            stagger_ms: 0,
            max_plausible_spread_pct: 50.0,
        }
    }

    /// Echo quote at an exact 1.0 rate, adjusting raw amounts for the
    /// two tokens' decimal precision
    fn par_quote(req: &QuoteRequest) -> QuoteResponse {
        let directory = TokenDirectory::new();
        let decimals_of = |mint: &str| {
            directory
                .all()
                .find(|t| t.mint_address == mint)
                .map(|t| t.decimals as i32)
                .unwrap_or(6)
        };
        let in_dec = decimals_of(&req.input_mint);
        let out_dec = decimals_of(&req.output_mint);
        let raw_in: f64 = req.amount.parse().unwrap();
        let raw_out = raw_in * 10f64.powi(out_dec - in_dec);
        quote(&req.amount, &format!("{raw_out:.0}"))
    }

    #[tokio::test]
    async fn test_scan_degrades_failed_pairs_without_aborting() {
        let directory = TokenDirectory::new();
        let pyusd_mint = directory.get("PYUSD").unwrap().mint_address;

        let mut quotes = MockQuotes::new();
        quotes.expect_get_quote().returning(move |req| {
            if req.input_mint == pyusd_mint {
                Err(anyhow!("no liquidity"))
            } else {
                Ok(par_quote(req))
            }
        });

        // All generated pairs are same-currency: the oracle is never hit
        let engine = Arc::new(engine(quotes, MockOracle::new()));
        let scanner = Scanner::new(engine, scanner_config());

        let opportunities = scanner.scan().await;
        assert_eq!(opportunities.len(), scanner.pairs().len());

        let degraded: Vec<_> = opportunities.iter().filter(|o| !o.has_liquidity).collect();
        assert_eq!(degraded.len(), 1);
        let bad = degraded[0];
        assert_eq!(bad.input_token, "PYUSD");
        assert_eq!(bad.dex_rate, 0.0);
        assert_eq!(bad.spread_direction, SpreadDirection::Par);
        assert!(!bad.favorable);
        assert!(bad.is_peg_arb);

        for opp in opportunities.iter().filter(|o| o.has_liquidity) {
            assert!(opp.is_peg_arb);
            assert_eq!(opp.oracle_rate, 1.0);
        }
    }

    #[tokio::test]
    async fn test_scan_then_dedupe_keeps_one_record_per_pair() {
        let mut quotes = MockQuotes::new();
        quotes
            .expect_get_quote()
            .returning(|req| Ok(par_quote(req)));

        let engine = Arc::new(engine(quotes, MockOracle::new()));
        let scanner = Scanner::new(engine, scanner_config());

        let opportunities = scanner.scan().await;
        let total = opportunities.len();
        let deduped = dedupe(opportunities, 50.0);
        assert_eq!(deduped.len(), total / 2);
    }

    // ========================================================================
    // Depth analyzer
    // ========================================================================

    /// Quote mock mapping the raw USDC input amount to a fixed rate
    fn depth_quotes(rates: &'static [(&'static str, f64)]) -> MockQuotes {
        let mut quotes = MockQuotes::new();
        quotes.expect_get_quote().returning(move |req| {
            let (_, rate) = rates
                .iter()
                .find(|(amount, _)| *amount == req.amount)
                .ok_or_else(|| anyhow!("no liquidity at {}", req.amount))?;
            let raw_in: f64 = req.amount.parse().unwrap();
            let raw_out = (raw_in * rate).round();
            Ok(quote(&req.amount, &format!("{raw_out:.0}")))
        });
        quotes
    }

    #[tokio::test]
    async fn test_depth_price_impact_curve() {
        let quotes = depth_quotes(&[
            ("100000000", 1.085),
            ("1000000000", 1.083),
            ("10000000000", 1.070),
        ]);
        let engine = engine(quotes, MockOracle::new());

        let analysis = analyze_depth(&engine, "USDC", "USDT", &[100.0, 1000.0, 10000.0])
            .await
            .unwrap();

        assert!((analysis.best_rate - 1.085).abs() < 1e-6);
        assert_eq!(analysis.levels.len(), 3);
        assert_eq!(analysis.levels[0].price_impact, 0.0);
        assert!((analysis.levels[1].price_impact - 0.184).abs() < 0.001);
        assert!((analysis.levels[2].price_impact - 1.382).abs() < 0.001);
        for level in &analysis.levels {
            assert!(level.price_impact >= 0.0);
        }
    }

    #[tokio::test]
    async fn test_depth_drops_failed_levels() {
        // The mid size has no liquidity; the analysis keeps the others
        let quotes = depth_quotes(&[("100000000", 1.085), ("10000000000", 1.070)]);
        let engine = engine(quotes, MockOracle::new());

        let analysis = analyze_depth(&engine, "USDC", "USDT", &[100.0, 1000.0, 10000.0])
            .await
            .unwrap();

        assert_eq!(analysis.levels.len(), 2);
        assert!((analysis.levels[0].input_amount - 100.0).abs() < 1e-9);
        assert!((analysis.levels[1].input_amount - 10000.0).abs() < 1e-9);
        assert_eq!(analysis.levels[0].price_impact, 0.0);
    }

    #[tokio::test]
    async fn test_depth_returns_none_when_all_levels_fail() {
        let quotes = depth_quotes(&[]);
        let engine = engine(quotes, MockOracle::new());

        let analysis = analyze_depth(&engine, "USDC", "USDT", &[100.0, 1000.0]).await;
        assert!(analysis.is_none());
    }
}
