use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Fill;

use super::session::BrokerSession;

const DEMO_BASE: &str = "https://demo.tradovateapi.com/v1";
const LIVE_BASE: &str = "https://live.tradovateapi.com/v1";

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("session expired, re-authentication required")]
    SessionExpired,

    #[error("unexpected response: {0}")]
    Unexpected(String),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: i64,
    /// Contract code, e.g. "NQZ5".
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessTokenResponse {
    access_token: Option<String>,
    expiration_time: Option<DateTime<Utc>>,
    user_id: Option<i64>,
    error_text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TradovateClient {
    http: Client,
    base_url: String,
}

impl TradovateClient {
    /// `environment` is "live" or "demo"; anything unrecognized falls back
    /// to demo.
    pub fn new(http: Client, environment: &str) -> Self {
        let base_url = match environment {
            "live" => LIVE_BASE,
            _ => DEMO_BASE,
        };
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Exchange credentials for a session token. The API reports bad
    /// credentials through an `errorText` body rather than a status code.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<BrokerSession, BrokerError> {
        let url = format!("{}/auth/accesstokenrequest", self.base_url);
        let body = serde_json::json!({
            "name": username,
            "password": password,
            "appId": "tradebook",
            "appVersion": "1.0",
            "deviceId": "tradebook-server",
        });

        let resp = self.http.post(&url).json(&body).send().await?;
        let status = resp.status();
        let parsed: AccessTokenResponse = resp
            .json()
            .await
            .map_err(|e| BrokerError::Unexpected(format!("bad auth payload: {e}")))?;

        if let Some(error_text) = parsed.error_text {
            return Err(BrokerError::Auth(error_text));
        }
        if !status.is_success() {
            return Err(BrokerError::Auth(format!("auth failed with status {status}")));
        }

        match (parsed.access_token, parsed.expiration_time, parsed.user_id) {
            (Some(access_token), Some(expiry), Some(user_id)) => Ok(BrokerSession {
                access_token,
                expiry,
                user_id,
            }),
            _ => Err(BrokerError::Unexpected(
                "auth response missing token fields".into(),
            )),
        }
    }

    pub async fn list_accounts(
        &self,
        session: &BrokerSession,
    ) -> Result<Vec<Account>, BrokerError> {
        self.get_json(session, "/account/list", &[]).await
    }

    /// Fills for one account. The upstream endpoint only returns the
    /// current session day's executions.
    pub async fn list_fills(
        &self,
        session: &BrokerSession,
        account_id: i64,
    ) -> Result<Vec<Fill>, BrokerError> {
        self.get_json(
            session,
            "/fill/list",
            &[("accountId", account_id.to_string())],
        )
        .await
    }

    pub async fn get_contract(
        &self,
        session: &BrokerSession,
        contract_id: i64,
    ) -> Result<Contract, BrokerError> {
        self.get_json(session, "/contract/item", &[("id", contract_id.to_string())])
            .await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        session: &BrokerSession,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, BrokerError> {
        if !session.is_valid() {
            return Err(BrokerError::SessionExpired);
        }

        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&session.access_token)
            .query(query)
            .send()
            .await?
            .error_for_status()?;

        let value: T = resp.json().await?;
        Ok(value)
    }
}
