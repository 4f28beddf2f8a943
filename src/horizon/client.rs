// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP client for Horizon's REST API.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::types::{AccountInfo, Balance, EmbeddedRecords, TransactionInfo, TransactionPage};
use super::{HorizonError, LedgerClient};

/// Upstream request timeout. Keeps request workers bounded when Horizon
/// stalls; the surrounding HTTP request is abandoned on client disconnect.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Horizon REST client.
pub struct HorizonClient {
    http: reqwest::Client,
    base_url: String,
    friendbot_url: String,
}

impl HorizonClient {
    /// Create a client for the given Horizon endpoint.
    pub fn new(
        base_url: impl Into<String>,
        friendbot_url: impl Into<String>,
    ) -> Result<Self, HorizonError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| HorizonError::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            friendbot_url: friendbot_url.into(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, HorizonError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| HorizonError::Http(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(HorizonError::NotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HorizonError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| HorizonError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl LedgerClient for HorizonClient {
    async fn get_account(&self, public_key: &str) -> Result<AccountInfo, HorizonError> {
        let url = format!("{}/accounts/{}", self.base_url, public_key);
        self.get_json(&url).await
    }

    async fn get_account_balances(&self, public_key: &str) -> Result<Vec<Balance>, HorizonError> {
        let account = self.get_account(public_key).await?;
        Ok(account.balances)
    }

    async fn get_transaction(&self, hash: &str) -> Result<TransactionInfo, HorizonError> {
        let url = format!("{}/transactions/{}", self.base_url, hash);
        self.get_json(&url).await
    }

    async fn get_account_transactions(
        &self,
        public_key: &str,
        limit: u32,
        cursor: Option<&str>,
        order: &str,
    ) -> Result<TransactionPage, HorizonError> {
        let mut url = format!(
            "{}/accounts/{}/transactions?limit={}&order={}",
            self.base_url, public_key, limit, order
        );
        if let Some(cursor) = cursor {
            url.push_str(&format!("&cursor={cursor}"));
        }

        let page: EmbeddedRecords<TransactionInfo> = self.get_json(&url).await?;
        let records = page.embedded.records;

        let has_next = records.len() == limit as usize;
        let next_cursor = if has_next {
            records.last().map(|tx| tx.paging_token.clone())
        } else {
            None
        };

        Ok(TransactionPage {
            records,
            has_next,
            next_cursor,
        })
    }

    async fn fund_account(&self, public_key: &str) -> Result<(), HorizonError> {
        let url = format!("{}?addr={}", self.friendbot_url, public_key);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| HorizonError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HorizonError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped_from_base_url() {
        let client = HorizonClient::new(
            "https://horizon-testnet.stellar.org/",
            "https://horizon-testnet.stellar.org/friendbot",
        )
        .unwrap();
        assert_eq!(client.base_url, "https://horizon-testnet.stellar.org");
    }
}
