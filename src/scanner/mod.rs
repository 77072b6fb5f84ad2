// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Transaction Scanner
//!
//! Fetches raw transaction history from an etherscan-style explorer API
//! and turns it into one chronologically ordered sequence of
//! [`PaymentTransaction`] records.
//!
//! ## Strategy
//!
//! One call fetches one page of each of the explorer's two streams —
//! native transfers (`txlist`) and token transfers (`tokentx`) — then
//! filters by currency policy, normalizes both shapes into the unified
//! record, and merges by timestamp. Pagination is caller-driven: the
//! scanner never walks the full history in one call.
//!
//! The scanner keeps no state between calls; every page is a fresh
//! query keyed by `(address, page, currency filter, unknown-currency
//! policy)`.

pub mod normalize;

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::chain::client::ChainError;
use crate::chain::currency;
use crate::chain::types::{ChainConfig, PaymentTransaction};

/// Explorer request timeout.
const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// The one upstream "error" status that actually means an empty page.
const NO_TRANSACTIONS_FOUND: &str = "No transactions found";

/// Parameters of one history scan.
#[derive(Debug, Clone)]
pub struct ScanQuery {
    /// Restrict the merged output to these currency symbols.
    pub currencies: Option<Vec<String>>,
    /// Admit token records whose contract is not in the known-currency
    /// table, labelled with a synthesized currency string.
    pub allow_unknown_currencies: bool,
    /// Explorer page to fetch (1-based).
    pub page: u64,
}

impl Default for ScanQuery {
    fn default() -> Self {
        Self {
            currencies: None,
            allow_unknown_currencies: false,
            page: 1,
        }
    }
}

/// Raw native transfer from the explorer's `txlist` action.
///
/// All numeric fields arrive string-encoded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalTransaction {
    pub block_number: String,
    pub time_stamp: String,
    pub hash: String,
    pub block_hash: String,
    pub from: String,
    pub to: String,
    pub value: String,
    pub gas: String,
    pub gas_price: String,
    pub gas_used: String,
    pub confirmations: String,
}

/// Raw token transfer from the explorer's `tokentx` action.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc20Transaction {
    pub block_number: String,
    pub time_stamp: String,
    pub hash: String,
    pub block_hash: String,
    pub from: String,
    pub contract_address: String,
    pub to: String,
    pub value: String,
    pub token_name: String,
    pub token_symbol: String,
    pub gas: String,
    pub gas_price: String,
    pub gas_used: String,
    pub confirmations: String,
}

/// Explorer response envelope.
///
/// `result` is left undecoded until the status check: error responses
/// carry a message string where the record array would be.
#[derive(Debug, Deserialize)]
struct ExplorerResponse {
    status: String,
    message: String,
    #[serde(default)]
    result: serde_json::Value,
}

/// Scanner over one chain's explorer API.
#[derive(Debug)]
pub struct TransactionScanner {
    config: ChainConfig,
    base: String,
    http: reqwest::Client,
}

impl TransactionScanner {
    /// Build a scanner for a chain with a configured explorer API.
    pub fn new(config: ChainConfig) -> Result<Self, ChainError> {
        let base = config
            .explorer_api_url
            .clone()
            .ok_or_else(|| ChainError::NoScannerConfigured {
                chain: config.name.clone(),
            })?;

        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| ChainError::UpstreamError {
                message: format!("failed to build explorer HTTP client: {e}"),
            })?;

        Ok(Self { config, base, http })
    }

    /// One page of normalized history for `address`.
    ///
    /// Native and token pages are fetched concurrently; neither depends
    /// on the other and the merge reorders by timestamp regardless of
    /// arrival order.
    pub async fn get_transactions(
        &self,
        address: &str,
        query: &ScanQuery,
    ) -> Result<Vec<PaymentTransaction>, ChainError> {
        let page = query.page.max(1);

        let (native, token) = tokio::join!(
            self.fetch_page::<NormalTransaction>("txlist", address, page),
            self.fetch_page::<Erc20Transaction>("tokentx", address, page),
        );
        let (native, token) = (native?, token?);
        tracing::debug!(
            chain = %self.config.name,
            address,
            page,
            native = native.len(),
            token = token.len(),
            "fetched explorer pages"
        );

        let mut transactions = Vec::with_capacity(native.len() + token.len());

        for raw in &native {
            // Zero-value native entries are contract-interaction noise,
            // not transfers.
            if raw.value == "0" {
                continue;
            }
            transactions.push(normalize::native(&self.config, address, raw)?);
        }

        for raw in &token {
            let known =
                currency::resolve_for_record(&self.config, &raw.contract_address).is_some();
            if !known && !query.allow_unknown_currencies {
                continue;
            }
            transactions.push(normalize::token(&self.config, address, raw)?);
        }

        if let Some(currencies) = &query.currencies {
            transactions.retain(|tx| currencies.iter().any(|c| *c == tx.currency));
        }

        // Both upstream pages are ascending already; a stable sort keeps
        // that order within equal timestamps.
        transactions.sort_by_key(|tx| tx.time_stamp);
        Ok(transactions)
    }

    async fn fetch_page<T: DeserializeOwned>(
        &self,
        action: &str,
        address: &str,
        page: u64,
    ) -> Result<Vec<T>, ChainError> {
        let mut request = self
            .http
            .get(&self.base)
            .query(&[
                ("module", "account"),
                ("action", action),
                ("address", address),
                ("sort", "asc"),
            ])
            .query(&[("page", page)]);
        if let Some(key) = &self.config.explorer_api_key {
            request = request.query(&[("apikey", key.as_str())]);
        }

        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ChainError::UpstreamError {
                message: format!("{action} request failed: {e}"),
            })?;

        let envelope: ExplorerResponse =
            response.json().await.map_err(|e| ChainError::MalformedRecord {
                message: format!("{action} response is not a valid envelope: {e}"),
            })?;

        if envelope.status == "0" {
            if envelope.message == NO_TRANSACTIONS_FOUND {
                return Ok(Vec::new());
            }
            return Err(ChainError::UpstreamError {
                message: envelope.message,
            });
        }

        serde_json::from_value(envelope.result).map_err(|e| ChainError::MalformedRecord {
            message: format!("{action} result: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::types::{BackendKind, CurrencyInfo, Direction, TokenStandard};
    use serde_json::json;
    use std::collections::HashMap;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ADDRESS: &str = "0x46352775fc66f526d8d41040da7308ce94e77149";
    const PEER: &str = "0x6c19ee30a50fd8f64ddcbb4bdd313a13a23f4f00";
    const BUSD_CONTRACT: &str = "0xed24fc36d5ee211ea25a80239fb8c4cfd80f12ee";

    fn config(explorer_base: &str) -> ChainConfig {
        ChainConfig {
            name: "BSC-TESTNET".into(),
            chain_id: 97,
            backend: BackendKind::Evm,
            rpc_url: "http://localhost:8545".into(),
            native_currency: "BNB".into(),
            native_decimals: 18,
            required_confirmations: 10,
            known_currencies: HashMap::from([(
                "BUSD".into(),
                CurrencyInfo {
                    contract_address: BUSD_CONTRACT.into(),
                    standard: TokenStandard::Erc20,
                },
            )]),
            explorer_api_url: Some(format!("{explorer_base}/api")),
            explorer_api_key: Some("test-key".into()),
        }
    }

    fn native_record(time_stamp: &str, value: &str) -> serde_json::Value {
        json!({
            "blockNumber": "1000",
            "timeStamp": time_stamp,
            "hash": "0xnative",
            "nonce": "7",
            "blockHash": "0xblock1",
            "transactionIndex": "0",
            "from": PEER,
            "to": ADDRESS,
            "value": value,
            "gas": "21000",
            "gasPrice": "5000000000",
            "isError": "0",
            "txreceipt_status": "1",
            "input": "0x",
            "contractAddress": "",
            "cumulativeGasUsed": "21000",
            "gasUsed": "21000",
            "confirmations": "12"
        })
    }

    fn token_record(time_stamp: &str, contract: &str) -> serde_json::Value {
        json!({
            "blockNumber": "1001",
            "timeStamp": time_stamp,
            "hash": "0xtoken",
            "nonce": "8",
            "blockHash": "0xblock2",
            "from": PEER,
            "contractAddress": contract,
            "to": ADDRESS,
            "value": "5000000",
            "tokenName": "Binance USD",
            "tokenSymbol": "BSC-USD",
            "tokenDecimal": "18",
            "transactionIndex": "1",
            "gas": "60000",
            "gasPrice": "5000000000",
            "gasUsed": "51000",
            "cumulativeGasUsed": "72000",
            "input": "0xdeadbeef",
            "confirmations": "11"
        })
    }

    fn ok_body(result: serde_json::Value) -> serde_json::Value {
        json!({ "status": "1", "message": "OK", "result": result })
    }

    fn empty_body() -> serde_json::Value {
        json!({ "status": "0", "message": "No transactions found", "result": [] })
    }

    async fn mount(server: &MockServer, action: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/api"))
            .and(query_param("module", "account"))
            .and(query_param("action", action))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn merges_native_and_token_records_in_timestamp_order() {
        let server = MockServer::start().await;
        mount(
            &server,
            "txlist",
            ok_body(json!([native_record("1650000000", "1000000000000000000")])),
        )
        .await;
        mount(
            &server,
            "tokentx",
            ok_body(json!([token_record("1650000100", BUSD_CONTRACT)])),
        )
        .await;

        let scanner = TransactionScanner::new(config(&server.uri())).unwrap();
        let txs = scanner
            .get_transactions(ADDRESS, &ScanQuery::default())
            .await
            .unwrap();

        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].currency, "BNB");
        assert_eq!(txs[0].value, "1000000000000000000");
        assert_eq!(txs[1].currency, "BUSD");
        assert_eq!(txs[1].value, "5000000");
        assert!(txs[0].time_stamp <= txs[1].time_stamp);
        assert_eq!(txs[0].direction, Direction::In);
        assert_eq!(txs[1].direction, Direction::In);
    }

    #[tokio::test]
    async fn no_transactions_found_is_an_empty_page() {
        let server = MockServer::start().await;
        mount(&server, "txlist", empty_body()).await;
        mount(&server, "tokentx", empty_body()).await;

        let scanner = TransactionScanner::new(config(&server.uri())).unwrap();
        let txs = scanner
            .get_transactions(ADDRESS, &ScanQuery::default())
            .await
            .unwrap();
        assert!(txs.is_empty());
    }

    #[tokio::test]
    async fn upstream_failures_surface_their_message_verbatim() {
        let server = MockServer::start().await;
        mount(
            &server,
            "txlist",
            json!({ "status": "0", "message": "Max rate limit reached", "result": "rate limited" }),
        )
        .await;
        mount(&server, "tokentx", empty_body()).await;

        let scanner = TransactionScanner::new(config(&server.uri())).unwrap();
        let err = scanner
            .get_transactions(ADDRESS, &ScanQuery::default())
            .await
            .unwrap_err();

        match err {
            ChainError::UpstreamError { message } => assert_eq!(message, "Max rate limit reached"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn zero_value_native_transfers_are_dropped() {
        let server = MockServer::start().await;
        mount(
            &server,
            "txlist",
            ok_body(json!([
                native_record("1650000000", "0"),
                native_record("1650000050", "25")
            ])),
        )
        .await;
        mount(&server, "tokentx", empty_body()).await;

        let scanner = TransactionScanner::new(config(&server.uri())).unwrap();
        let txs = scanner
            .get_transactions(ADDRESS, &ScanQuery::default())
            .await
            .unwrap();

        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].value, "25");
    }

    #[tokio::test]
    async fn unknown_token_contracts_are_dropped_by_default() {
        let server = MockServer::start().await;
        let stray = "0x000000000000000000000000000000000000beef";
        mount(&server, "txlist", empty_body()).await;
        mount(
            &server,
            "tokentx",
            ok_body(json!([token_record("1650000100", stray)])),
        )
        .await;

        let scanner = TransactionScanner::new(config(&server.uri())).unwrap();
        let txs = scanner
            .get_transactions(ADDRESS, &ScanQuery::default())
            .await
            .unwrap();
        assert!(txs.is_empty());
    }

    #[tokio::test]
    async fn unknown_token_contracts_are_admitted_with_synthesized_currency() {
        let server = MockServer::start().await;
        let stray = "0x000000000000000000000000000000000000beef";
        mount(&server, "txlist", empty_body()).await;
        mount(
            &server,
            "tokentx",
            ok_body(json!([token_record("1650000100", stray)])),
        )
        .await;

        let scanner = TransactionScanner::new(config(&server.uri())).unwrap();
        let query = ScanQuery {
            allow_unknown_currencies: true,
            ..ScanQuery::default()
        };
        let txs = scanner.get_transactions(ADDRESS, &query).await.unwrap();

        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].currency, format!("BSC-USD - Binance USD : {stray}"));
    }

    #[tokio::test]
    async fn currency_filter_restricts_the_merged_output() {
        let server = MockServer::start().await;
        mount(
            &server,
            "txlist",
            ok_body(json!([native_record("1650000000", "1000000000000000000")])),
        )
        .await;
        mount(
            &server,
            "tokentx",
            ok_body(json!([token_record("1650000100", BUSD_CONTRACT)])),
        )
        .await;

        let scanner = TransactionScanner::new(config(&server.uri())).unwrap();
        let query = ScanQuery {
            currencies: Some(vec!["BUSD".into()]),
            ..ScanQuery::default()
        };
        let txs = scanner.get_transactions(ADDRESS, &query).await.unwrap();

        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].currency, "BUSD");
    }

    #[tokio::test]
    async fn malformed_numeric_fields_fail_the_batch() {
        let server = MockServer::start().await;
        let record = native_record("not-a-number", "1000");
        mount(&server, "txlist", ok_body(json!([record]))).await;
        mount(&server, "tokentx", empty_body()).await;

        let scanner = TransactionScanner::new(config(&server.uri())).unwrap();
        let err = scanner
            .get_transactions(ADDRESS, &ScanQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::MalformedRecord { .. }));
    }

    #[tokio::test]
    async fn page_sort_and_api_key_are_forwarded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api"))
            .and(query_param("action", "txlist"))
            .and(query_param("page", "3"))
            .and(query_param("sort", "asc"))
            .and(query_param("apikey", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(empty_body()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api"))
            .and(query_param("action", "tokentx"))
            .and(query_param("page", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(empty_body()))
            .expect(1)
            .mount(&server)
            .await;

        let scanner = TransactionScanner::new(config(&server.uri())).unwrap();
        let query = ScanQuery {
            page: 3,
            ..ScanQuery::default()
        };
        let txs = scanner.get_transactions(ADDRESS, &query).await.unwrap();
        assert!(txs.is_empty());
    }

    #[test]
    fn scanner_requires_an_explorer_url() {
        let mut cfg = config("http://localhost");
        cfg.explorer_api_url = None;
        assert!(matches!(
            TransactionScanner::new(cfg).unwrap_err(),
            ChainError::NoScannerConfigured { .. }
        ));
    }
}
