//! JSON-RPC account store over HTTP
//!
//! Hand-rolled JSON-RPC transport: one POST per call, base64 account
//! data, batched `getMultipleAccounts` chunks fanned out concurrently.
//! Every request carries the client-level timeout so a stalled node
//! cannot hang a resolution indefinitely.

use async_trait::async_trait;
use base64::Engine;
use chrono::Utc;
use futures::future::join_all;
use serde_json::{json, Value};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::time::Duration;

use super::{AccountStore, RawAccount, MULTIPLE_ACCOUNTS_BATCH_SIZE};
use crate::errors::{ResolveError, ResolveResult};

/// Default per-request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Commitment level used for every query
const COMMITMENT: &str = "confirmed";

/// Account store backed by a Solana JSON-RPC endpoint
pub struct HttpAccountStore {
    url: String,
    client: reqwest::Client,
}

impl HttpAccountStore {
    /// Create a store for `url` with the default request timeout
    pub fn new(url: impl Into<String>) -> ResolveResult<Self> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    /// Create a store with an explicit per-request timeout
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> ResolveResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ResolveError::Rpc(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    async fn call(&self, method: &str, params: Value) -> ResolveResult<Value> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| ResolveError::Rpc(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ResolveError::Rpc(format!(
                "HTTP status: {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ResolveError::Rpc(format!("failed to parse response: {}", e)))?;

        if let Some(err) = body.get("error") {
            return Err(ResolveError::Rpc(format!("RPC error: {}", err)));
        }

        body.get("result")
            .cloned()
            .ok_or_else(|| ResolveError::Rpc("missing result in response".to_string()))
    }

    async fn fetch_chunk(&self, chunk: &[Pubkey]) -> ResolveResult<Vec<Option<RawAccount>>> {
        let keys: Vec<String> = chunk.iter().map(|p| p.to_string()).collect();
        let params = json!([
            keys,
            { "encoding": "base64", "commitment": COMMITMENT }
        ]);

        let result = self.call("getMultipleAccounts", params).await?;
        let values = result
            .get("value")
            .and_then(|v| v.as_array())
            .ok_or_else(|| ResolveError::Rpc("missing value array".to_string()))?;

        if values.len() != chunk.len() {
            return Err(ResolveError::Rpc(format!(
                "expected {} accounts in response, got {}",
                chunk.len(),
                values.len()
            )));
        }

        chunk
            .iter()
            .zip(values)
            .map(|(address, value)| {
                if value.is_null() {
                    Ok(None)
                } else {
                    parse_raw_account(address, value).map(Some)
                }
            })
            .collect()
    }
}

#[async_trait]
impl AccountStore for HttpAccountStore {
    async fn get_account(&self, address: &Pubkey) -> ResolveResult<Option<RawAccount>> {
        let params = json!([
            address.to_string(),
            { "encoding": "base64", "commitment": COMMITMENT }
        ]);

        let result = self.call("getAccountInfo", params).await?;
        match result.get("value") {
            None | Some(Value::Null) => Ok(None),
            Some(value) => parse_raw_account(address, value).map(Some),
        }
    }

    async fn get_multiple_accounts(
        &self,
        addresses: &[Pubkey],
    ) -> ResolveResult<Vec<Option<RawAccount>>> {
        if addresses.is_empty() {
            return Ok(Vec::new());
        }

        // Chunked to the node's batch limit; chunks run concurrently and
        // join back in input order.
        let futures: Vec<_> = addresses
            .chunks(MULTIPLE_ACCOUNTS_BATCH_SIZE)
            .map(|chunk| self.fetch_chunk(chunk))
            .collect();

        let mut all = Vec::with_capacity(addresses.len());
        for chunk in join_all(futures).await {
            all.extend(chunk?);
        }
        Ok(all)
    }

    async fn get_program_accounts_by_size(
        &self,
        program_id: &Pubkey,
        data_size: usize,
    ) -> ResolveResult<Vec<RawAccount>> {
        let params = json!([
            program_id.to_string(),
            {
                "encoding": "base64",
                "commitment": COMMITMENT,
                "filters": [{ "dataSize": data_size }]
            }
        ]);

        let result = self.call("getProgramAccounts", params).await?;
        let entries = result
            .as_array()
            .ok_or_else(|| ResolveError::Rpc("expected account list".to_string()))?;

        entries.iter().map(parse_keyed_account).collect()
    }

    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        token_program_id: &Pubkey,
    ) -> ResolveResult<Vec<RawAccount>> {
        let params = json!([
            owner.to_string(),
            { "programId": token_program_id.to_string() },
            { "encoding": "base64", "commitment": COMMITMENT }
        ]);

        let result = self.call("getTokenAccountsByOwner", params).await?;
        let entries = result
            .get("value")
            .and_then(|v| v.as_array())
            .ok_or_else(|| ResolveError::Rpc("missing value array".to_string()))?;

        entries.iter().map(parse_keyed_account).collect()
    }
}

/// Parse a `{pubkey, account}` pair from a program or token account scan
fn parse_keyed_account(entry: &Value) -> ResolveResult<RawAccount> {
    let address = entry
        .get("pubkey")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ResolveError::Rpc("missing pubkey field".to_string()))?;
    let address = Pubkey::from_str(address)
        .map_err(|e| ResolveError::Rpc(format!("invalid pubkey '{}': {}", address, e)))?;
    let account = entry
        .get("account")
        .ok_or_else(|| ResolveError::Rpc("missing account field".to_string()))?;
    parse_raw_account(&address, account)
}

/// Parse one JSON account value into a raw snapshot
fn parse_raw_account(address: &Pubkey, value: &Value) -> ResolveResult<RawAccount> {
    let data = value
        .get("data")
        .ok_or_else(|| ResolveError::Rpc("missing data field".to_string()))?;

    let data_bytes = if let Some(arr) = data.as_array() {
        // [data_base64, encoding]
        let encoded = arr
            .first()
            .and_then(|v| v.as_str())
            .ok_or_else(|| ResolveError::Rpc("invalid data".to_string()))?;
        let encoding = arr.get(1).and_then(|v| v.as_str()).unwrap_or("base64");

        if encoding == "base64" {
            base64::engine::general_purpose::STANDARD
                .decode(encoded)
                .map_err(|e| ResolveError::Rpc(format!("failed to decode base64: {}", e)))?
        } else {
            return Err(ResolveError::Rpc(format!(
                "unsupported encoding: {}",
                encoding
            )));
        }
    } else if let Some(s) = data.as_str() {
        base64::engine::general_purpose::STANDARD
            .decode(s)
            .map_err(|e| ResolveError::Rpc(format!("failed to decode base64: {}", e)))?
    } else {
        return Err(ResolveError::Rpc("invalid data format".to_string()));
    };

    let lamports = value
        .get("lamports")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| ResolveError::Rpc("missing lamports".to_string()))?;

    let owner_str = value
        .get("owner")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ResolveError::Rpc("missing owner".to_string()))?;
    let owner = Pubkey::from_str(owner_str)
        .map_err(|e| ResolveError::Rpc(format!("invalid owner pubkey: {}", e)))?;

    Ok(RawAccount {
        address: *address,
        owner,
        lamports,
        data: data_bytes,
        fetched_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_raw_account_base64_pair() {
        let address = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let payload = base64::engine::general_purpose::STANDARD.encode([1u8, 2, 3]);
        let value = json!({
            "data": [payload, "base64"],
            "lamports": 2_039_280u64,
            "owner": owner.to_string(),
            "executable": false,
            "rentEpoch": 361u64,
        });

        let account = parse_raw_account(&address, &value).unwrap();
        assert_eq!(account.address, address);
        assert_eq!(account.owner, owner);
        assert_eq!(account.lamports, 2_039_280);
        assert_eq!(account.data, vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_raw_account_rejects_unknown_encoding() {
        let address = Pubkey::new_unique();
        let value = json!({
            "data": ["00", "base58"],
            "lamports": 0u64,
            "owner": Pubkey::new_unique().to_string(),
        });
        assert!(matches!(
            parse_raw_account(&address, &value),
            Err(ResolveError::Rpc(_))
        ));
    }

    #[test]
    fn test_parse_keyed_account() {
        let address = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let entry = json!({
            "pubkey": address.to_string(),
            "account": {
                "data": ["", "base64"],
                "lamports": 1u64,
                "owner": owner.to_string(),
            }
        });
        let account = parse_keyed_account(&entry).unwrap();
        assert_eq!(account.address, address);
        assert!(account.data.is_empty());
    }
}
