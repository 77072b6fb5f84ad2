// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The chain client façade.
//!
//! [`ChainClient`] owns one chain's configuration and a backend connected
//! to its node provider, and exposes the full wallet contract: balances,
//! account creation and import, value transfers, confirmation checks and
//! the normalized transaction history. Native-vs-token dispatch happens
//! here via the currency resolver; everything below it deals with one
//! concrete path.

use std::time::Duration;

use alloy::{
    eips::eip2718::Encodable2718,
    network::{EthereumWallet, TransactionBuilder},
    primitives::{keccak256, U256},
    providers::{
        fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
        Identity, Provider, ProviderBuilder, RootProvider,
    },
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    transports::RpcError,
};

use crate::scanner::{ScanQuery, TransactionScanner};

use super::currency::{self, Resolved};
use super::erc20;
use super::types::{
    Account, BackendKind, ChainConfig, PaymentTransaction, TokenStandard, TransactionReceipt,
};
use super::units;

/// HTTP provider type with the default fill stack.
type HttpProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider<alloy::network::Ethereum>,
>;

/// Fixed gas limit for value transfers; covers native sends and plain
/// ERC-20 `transfer` calls.
const TRANSFER_GAS_LIMIT: u64 = 100_000;

/// How long to wait for a broadcast transaction's receipt before handing
/// the bare hash back to the caller.
const RECEIPT_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors surfaced by the chain client and the transaction scanner.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("could not connect to provider for chain `{chain}`: {message}")]
    ConnectionError { chain: String, message: String },

    #[error("chain client is not initialized; call init() first")]
    NotInitialized,

    #[error("chain `{chain}` is not in the registry")]
    UnknownChain { chain: String },

    #[error("currency `{currency}` is not configured on chain `{chain}`")]
    UnknownCurrency { chain: String, currency: String },

    #[error("no balance or transfer path implemented for standard `{standard}`")]
    UnsupportedStandard { standard: String },

    #[error("invalid private key: {message}")]
    InvalidKey { message: String },

    #[error("invalid address: {message}")]
    InvalidAddress { message: String },

    #[error("invalid amount: {message}")]
    InvalidAmount { message: String },

    #[error("explorer returned a malformed record: {message}")]
    MalformedRecord { message: String },

    #[error("explorer request failed: {message}")]
    UpstreamError { message: String },

    #[error("no transaction scanner is configured for chain `{chain}`")]
    NoScannerConfigured { chain: String },

    #[error(
        "broadcast outcome of transaction {tx_hash} is unknown; query the hash before resubmitting"
    )]
    IndeterminateOutcome { tx_hash: String },

    #[error("rpc error: {message}")]
    Rpc { message: String },
}

/// Client for a single configured chain.
#[derive(Debug)]
pub struct ChainClient {
    config: ChainConfig,
    backend: Option<ChainBackend>,
}

/// Closed set of connected backend variants.
#[derive(Debug)]
enum ChainBackend {
    Evm(EvmBackend),
}

impl ChainClient {
    /// Create an unconnected client. No network I/O happens here;
    /// [`ChainClient::init`] must run before any operation.
    pub fn new(config: ChainConfig) -> Self {
        Self {
            config,
            backend: None,
        }
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Connect the backend for this chain and probe the node with a
    /// current-block-height call.
    pub async fn init(&mut self) -> Result<(), ChainError> {
        let backend = match self.config.backend {
            BackendKind::Evm => ChainBackend::Evm(EvmBackend::connect(&self.config).await?),
        };
        self.backend = Some(backend);
        Ok(())
    }

    fn backend(&self) -> Result<&ChainBackend, ChainError> {
        self.backend.as_ref().ok_or(ChainError::NotInitialized)
    }

    /// Generate a fresh keypair. No network call.
    pub fn create_account(&self) -> Result<Account, ChainError> {
        match self.backend()? {
            ChainBackend::Evm(_) => Ok(EvmBackend::create_account()),
        }
    }

    /// Derive the account for an existing private key. No network call.
    pub fn import_account(&self, private_key: &str) -> Result<Account, ChainError> {
        match self.backend()? {
            ChainBackend::Evm(_) => EvmBackend::import_account(private_key),
        }
    }

    /// Balance of `address` in `currency` (the chain's native currency
    /// when `None`), scaled to a human-readable decimal string.
    pub async fn get_balance(
        &self,
        address: &str,
        currency: Option<&str>,
    ) -> Result<String, ChainError> {
        let backend = self.backend()?;
        let currency = currency.unwrap_or(&self.config.native_currency);

        let base_units = match currency::resolve_for_query(&self.config, currency)? {
            Resolved::Native => match backend {
                ChainBackend::Evm(evm) => evm.native_balance(address).await?,
            },
            Resolved::Token(info) => match info.standard {
                TokenStandard::Erc20 => match backend {
                    ChainBackend::Evm(evm) => {
                        evm.erc20_balance(&info.contract_address, address).await?
                    }
                },
            },
        };

        Ok(units::from_base_units(
            base_units,
            self.config.native_decimals,
        ))
    }

    /// Sign and broadcast a value transfer.
    ///
    /// Native transfers move `value` directly; token transfers wrap it in
    /// an ABI-encoded `transfer` call against the resolved contract. The
    /// amount is parsed in the chain's display unit. Never retried
    /// internally: an ambiguous broadcast surfaces as
    /// [`ChainError::IndeterminateOutcome`].
    pub async fn send_transaction(
        &self,
        private_key: &str,
        to: &str,
        value: &str,
        currency: Option<&str>,
    ) -> Result<TransactionReceipt, ChainError> {
        let backend = self.backend()?;
        let currency = currency.unwrap_or(&self.config.native_currency);
        let base_units = units::to_base_units(value, self.config.native_decimals)?;

        match currency::resolve_for_query(&self.config, currency)? {
            Resolved::Native => match backend {
                ChainBackend::Evm(evm) => {
                    evm.send_native(&self.config, private_key, to, base_units).await
                }
            },
            Resolved::Token(info) => match info.standard {
                TokenStandard::Erc20 => match backend {
                    ChainBackend::Evm(evm) => {
                        evm.send_erc20(&self.config, private_key, &info.contract_address, to, base_units)
                            .await
                    }
                },
            },
        }
    }

    /// Current head height of the chain.
    pub async fn current_block_height(&self) -> Result<u64, ChainError> {
        match self.backend()? {
            ChainBackend::Evm(evm) => evm.head().await,
        }
    }

    /// Whether `tx_hash` has accumulated strictly more than the chain's
    /// required confirmation count. Unmined transactions are simply not
    /// confirmed, never an error.
    pub async fn is_transaction_confirmed(&self, tx_hash: &str) -> Result<bool, ChainError> {
        let confirmations = match self.backend()? {
            ChainBackend::Evm(evm) => evm.confirmations(tx_hash).await?,
        };
        Ok(meets_required_confirmations(
            confirmations,
            self.config.required_confirmations,
        ))
    }

    /// Normalized transaction history for `address`, one explorer page of
    /// native and token transfers merged in timestamp order.
    pub async fn get_transactions(
        &self,
        address: &str,
        query: &ScanQuery,
    ) -> Result<Vec<PaymentTransaction>, ChainError> {
        let scanner = match self.backend()? {
            ChainBackend::Evm(evm) => evm.scanner.as_ref(),
        };
        match scanner {
            Some(scanner) => scanner.get_transactions(address, query).await,
            None => Err(ChainError::NoScannerConfigured {
                chain: self.config.name.clone(),
            }),
        }
    }
}

/// Blocks mined on top of the inclusion block; 0 while unmined.
fn confirmation_count(head: u64, inclusion_block: Option<u64>) -> u64 {
    match inclusion_block {
        Some(block) => head.saturating_sub(block),
        None => 0,
    }
}

/// The confirmation rule: strictly more confirmations than required.
fn meets_required_confirmations(confirmations: u64, required: u64) -> bool {
    confirmations > required
}

/// EVM backend over an alloy HTTP provider.
#[derive(Debug)]
struct EvmBackend {
    provider: HttpProvider,
    scanner: Option<TransactionScanner>,
}

impl EvmBackend {
    async fn connect(config: &ChainConfig) -> Result<Self, ChainError> {
        let url: url::Url = config.rpc_url.parse().map_err(|e: url::ParseError| {
            ChainError::ConnectionError {
                chain: config.name.clone(),
                message: format!("invalid rpc url `{}`: {e}", config.rpc_url),
            }
        })?;

        let provider = ProviderBuilder::new().connect_http(url);

        let head = provider
            .get_block_number()
            .await
            .map_err(|e| ChainError::ConnectionError {
                chain: config.name.clone(),
                message: e.to_string(),
            })?;
        tracing::info!(chain = %config.name, head, "connected to chain provider");

        let scanner = if config.has_scanner() {
            Some(TransactionScanner::new(config.clone())?)
        } else {
            None
        };

        Ok(Self { provider, scanner })
    }

    fn create_account() -> Account {
        let signer = PrivateKeySigner::random();
        Account {
            address: signer.address().to_string(),
            private_key: Some(format!("0x{}", alloy::hex::encode(signer.to_bytes()))),
        }
    }

    fn import_account(private_key: &str) -> Result<Account, ChainError> {
        let signer = parse_signer(private_key)?;
        Ok(Account {
            address: signer.address().to_string(),
            private_key: Some(private_key.to_string()),
        })
    }

    async fn native_balance(&self, address: &str) -> Result<U256, ChainError> {
        let addr = erc20::parse_address(address)?;
        self.provider
            .get_balance(addr)
            .await
            .map_err(|e| ChainError::Rpc {
                message: e.to_string(),
            })
    }

    async fn erc20_balance(
        &self,
        contract_address: &str,
        address: &str,
    ) -> Result<U256, ChainError> {
        erc20::balance_of(&self.provider, contract_address, address).await
    }

    async fn head(&self) -> Result<u64, ChainError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| ChainError::Rpc {
                message: e.to_string(),
            })
    }

    async fn confirmations(&self, tx_hash: &str) -> Result<u64, ChainError> {
        let hash = tx_hash.parse().map_err(|e| ChainError::InvalidAddress {
            message: format!("transaction hash `{tx_hash}`: {e}"),
        })?;

        let receipt = self
            .provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| ChainError::Rpc {
                message: e.to_string(),
            })?;

        let head = self.head().await?;

        Ok(confirmation_count(
            head,
            receipt.and_then(|r| r.block_number),
        ))
    }

    async fn send_native(
        &self,
        config: &ChainConfig,
        private_key: &str,
        to: &str,
        value: U256,
    ) -> Result<TransactionReceipt, ChainError> {
        let to_addr = erc20::parse_address(to)?;
        let tx = TransactionRequest::default()
            .with_to(to_addr)
            .with_value(value);
        self.sign_and_broadcast(config, private_key, tx).await
    }

    async fn send_erc20(
        &self,
        config: &ChainConfig,
        private_key: &str,
        contract_address: &str,
        to: &str,
        value: U256,
    ) -> Result<TransactionReceipt, ChainError> {
        let contract_addr = erc20::parse_address(contract_address)?;
        let to_addr = erc20::parse_address(to)?;

        // The native value stays zero; the transfer amount travels in the
        // encoded call data.
        let data = erc20::encode_transfer(to_addr, value);
        let tx = TransactionRequest::default()
            .with_to(contract_addr)
            .with_value(U256::ZERO)
            .with_input(data);
        self.sign_and_broadcast(config, private_key, tx).await
    }

    /// Fill, sign locally, and broadcast the raw envelope.
    ///
    /// The hash is computed from the signed bytes before broadcast so an
    /// ambiguous transport failure can still name the transaction the
    /// node may have accepted.
    async fn sign_and_broadcast(
        &self,
        config: &ChainConfig,
        private_key: &str,
        tx: TransactionRequest,
    ) -> Result<TransactionReceipt, ChainError> {
        let signer = parse_signer(private_key)?;
        let from = signer.address();

        let nonce = self
            .provider
            .get_transaction_count(from)
            .await
            .map_err(|e| ChainError::Rpc {
                message: format!("nonce query failed: {e}"),
            })?;
        let gas_price = self
            .provider
            .get_gas_price()
            .await
            .map_err(|e| ChainError::Rpc {
                message: format!("gas price query failed: {e}"),
            })?;

        let tx = tx
            .with_from(from)
            .with_nonce(nonce)
            .with_gas_limit(TRANSFER_GAS_LIMIT)
            .with_gas_price(gas_price)
            .with_chain_id(config.chain_id);

        let wallet = EthereumWallet::from(signer);
        let envelope = tx.build(&wallet).await.map_err(|e| ChainError::Rpc {
            message: format!("failed to build transaction: {e}"),
        })?;

        let encoded = envelope.encoded_2718();
        let tx_hash = format!("{:#x}", keccak256(&encoded));

        let pending = match self.provider.send_raw_transaction(&encoded).await {
            Ok(pending) => pending,
            // A definitive node rejection (bad nonce, underpriced,
            // insufficient funds) never reached the mempool.
            Err(RpcError::ErrorResp(payload)) => {
                return Err(ChainError::Rpc {
                    message: payload.to_string(),
                })
            }
            Err(e) => {
                tracing::warn!(%tx_hash, error = %e, "broadcast outcome unknown");
                return Err(ChainError::IndeterminateOutcome { tx_hash });
            }
        };

        match pending
            .with_timeout(Some(RECEIPT_TIMEOUT))
            .get_receipt()
            .await
        {
            Ok(receipt) => Ok(TransactionReceipt {
                tx_hash,
                block_number: receipt.block_number,
                gas_used: Some(receipt.gas_used as u64),
                success: Some(receipt.status()),
            }),
            Err(e) => {
                // Accepted by the node but not seen mined within the
                // wait window; the hash is enough to track it.
                tracing::warn!(%tx_hash, error = %e, "receipt wait did not complete");
                Ok(TransactionReceipt {
                    tx_hash,
                    block_number: None,
                    gas_used: None,
                    success: None,
                })
            }
        }
    }
}

fn parse_signer(private_key: &str) -> Result<PrivateKeySigner, ChainError> {
    let hex_key = private_key.strip_prefix("0x").unwrap_or(private_key);
    let key_bytes = alloy::hex::decode(hex_key).map_err(|e| ChainError::InvalidKey {
        message: e.to_string(),
    })?;
    PrivateKeySigner::from_slice(&key_bytes).map_err(|e| ChainError::InvalidKey {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::registry::ChainRegistry;

    // Well-known development keypair (Anvil/Hardhat account #0).
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn config() -> ChainConfig {
        ChainRegistry::builtin().lookup("BSC").unwrap().clone()
    }

    #[test]
    fn confirmation_count_tracks_head_distance() {
        assert_eq!(confirmation_count(110, Some(100)), 10);
        assert_eq!(confirmation_count(100, Some(100)), 0);
        assert_eq!(confirmation_count(99, Some(100)), 0);
        assert_eq!(confirmation_count(110, None), 0);
    }

    #[test]
    fn confirmation_threshold_is_strict() {
        let required = 10;
        assert!(!meets_required_confirmations(required, required));
        assert!(meets_required_confirmations(required + 1, required));
        assert!(!meets_required_confirmations(0, required));
    }

    #[test]
    fn created_accounts_carry_address_and_key() {
        let account = EvmBackend::create_account();
        assert_eq!(account.address.len(), 42);
        assert!(account.address.starts_with("0x"));

        let key = account.private_key.unwrap();
        assert!(key.starts_with("0x"));
        assert_eq!(key.len(), 66);

        // The key must derive back to the same address.
        let reimported = EvmBackend::import_account(&key).unwrap();
        assert_eq!(reimported.address, account.address);
    }

    #[test]
    fn import_derives_the_expected_address() {
        let account = EvmBackend::import_account(DEV_KEY).unwrap();
        assert_eq!(account.address, DEV_ADDRESS);

        // 0x prefix is optional.
        let unprefixed = EvmBackend::import_account(DEV_KEY.trim_start_matches("0x")).unwrap();
        assert_eq!(unprefixed.address, DEV_ADDRESS);
    }

    #[test]
    fn malformed_keys_are_rejected() {
        assert!(matches!(
            EvmBackend::import_account("0xnothex").unwrap_err(),
            ChainError::InvalidKey { .. }
        ));
        assert!(matches!(
            EvmBackend::import_account("0x1234").unwrap_err(),
            ChainError::InvalidKey { .. }
        ));
    }

    #[tokio::test]
    async fn operations_before_init_fail_not_initialized() {
        let client = ChainClient::new(config());

        assert!(matches!(
            client.create_account().unwrap_err(),
            ChainError::NotInitialized
        ));
        assert!(matches!(
            client.get_balance(DEV_ADDRESS, None).await.unwrap_err(),
            ChainError::NotInitialized
        ));
        assert!(matches!(
            client
                .get_transactions(DEV_ADDRESS, &ScanQuery::default())
                .await
                .unwrap_err(),
            ChainError::NotInitialized
        ));
    }

    /// A client wired to an unreachable provider; any RPC attempt fails,
    /// so these tests prove resolution short-circuits first.
    fn offline_client() -> ChainClient {
        let provider = ProviderBuilder::new()
            .connect_http("http://127.0.0.1:1".parse().expect("static url"));
        ChainClient {
            config: config(),
            backend: Some(ChainBackend::Evm(EvmBackend {
                provider,
                scanner: None,
            })),
        }
    }

    #[tokio::test]
    async fn unknown_currency_balance_fails_without_network_io() {
        let err = offline_client()
            .get_balance(DEV_ADDRESS, Some("DOGE"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::UnknownCurrency { .. }));
    }

    #[tokio::test]
    async fn unknown_currency_send_fails_without_network_io() {
        let err = offline_client()
            .send_transaction(DEV_KEY, DEV_ADDRESS, "1", Some("DOGE"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::UnknownCurrency { .. }));
    }

    #[tokio::test]
    async fn history_without_explorer_fails_no_scanner_configured() {
        let err = offline_client()
            .get_transactions(DEV_ADDRESS, &ScanQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::NoScannerConfigured { .. }));
    }

    #[tokio::test]
    async fn init_rejects_unparsable_rpc_urls() {
        let mut cfg = config();
        cfg.rpc_url = "not a url".into();

        let mut client = ChainClient::new(cfg);
        assert!(matches!(
            client.init().await.unwrap_err(),
            ChainError::ConnectionError { .. }
        ));
    }
}
