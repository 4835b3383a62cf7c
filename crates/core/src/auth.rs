use crate::config::Settings;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::watch;

// Hosted identity provider (Firebase Auth REST surface). The provider is
// an opaque collaborator: no token refresh loop, no local persistence.
const DEFAULT_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_EXPIRES_SECS: i64 = 3600;

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub email: String,
    pub local_id: String,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    session_tx: watch::Sender<Option<Session>>,
}

impl AuthClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.require_auth_api_key()?.to_string();
        let base_url = settings
            .auth_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("AUTH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build auth http client")?;

        let (session_tx, _) = watch::channel(None);

        Ok(Self {
            http,
            base_url,
            api_key,
            session_tx,
        })
    }

    /// Observe sign-in state; the receiver sees every session change.
    pub fn session(&self) -> watch::Receiver<Option<Session>> {
        self.session_tx.subscribe()
    }

    pub fn current_session(&self) -> Option<Session> {
        self.session_tx.borrow().clone()
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> anyhow::Result<Session> {
        self.credential_call("accounts:signUp", email, password)
            .await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> anyhow::Result<Session> {
        self.credential_call("accounts:signInWithPassword", email, password)
            .await
    }

    /// Sign-out is local: the hosted provider keeps no server session.
    pub fn sign_out(&self) {
        let _ = self.session_tx.send(None);
    }

    async fn credential_call(
        &self,
        op: &str,
        email: &str,
        password: &str,
    ) -> anyhow::Result<Session> {
        let url = format!("{}/{op}", self.base_url.trim_end_matches('/'));
        let req = CredentialRequest {
            email,
            password,
            return_secure_token: true,
        };

        let res = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&req)
            .send()
            .await
            .with_context(|| format!("auth {op} request failed"))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read auth response")?;
        if !status.is_success() {
            anyhow::bail!("auth {op} HTTP {status}: {text}");
        }

        let parsed = serde_json::from_str::<CredentialResponse>(&text)
            .with_context(|| format!("failed to parse auth response: {text}"))?;
        let session = parsed.into_session(Utc::now())?;

        let _ = self.session_tx.send(Some(session.clone()));
        Ok(session)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialResponse {
    #[serde(default)]
    id_token: String,

    #[serde(default)]
    email: String,

    #[serde(default)]
    refresh_token: String,

    // Seconds until expiry, as a decimal string.
    #[serde(default)]
    expires_in: String,

    #[serde(default)]
    local_id: String,
}

impl CredentialResponse {
    fn into_session(self, now: DateTime<Utc>) -> anyhow::Result<Session> {
        anyhow::ensure!(!self.id_token.is_empty(), "auth response missing idToken");

        let expires_secs = self
            .expires_in
            .trim()
            .parse::<i64>()
            .unwrap_or(DEFAULT_EXPIRES_SECS);

        Ok(Session {
            email: self.email,
            local_id: self.local_id,
            id_token: self.id_token,
            refresh_token: self.refresh_token,
            expires_at: now + chrono::Duration::seconds(expires_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn parses_provider_credential_response() {
        let now = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap();
        let v = json!({
            "kind": "identitytoolkit#VerifyPasswordResponse",
            "idToken": "token-abc",
            "email": "user@example.com",
            "refreshToken": "refresh-xyz",
            "expiresIn": "3600",
            "localId": "uid-1",
            "registered": true
        });

        let parsed: CredentialResponse = serde_json::from_value(v).unwrap();
        let session = parsed.into_session(now).unwrap();
        assert_eq!(session.email, "user@example.com");
        assert_eq!(session.id_token, "token-abc");
        assert_eq!(
            session.expires_at,
            now + chrono::Duration::seconds(3600)
        );
        assert!(!session.is_expired(now));
        assert!(session.is_expired(now + chrono::Duration::seconds(3601)));
    }

    #[test]
    fn missing_id_token_is_an_error() {
        let parsed: CredentialResponse = serde_json::from_value(json!({
            "email": "user@example.com"
        }))
        .unwrap();
        assert!(parsed.into_session(Utc::now()).is_err());
    }

    #[test]
    fn unparseable_expiry_gets_the_default() {
        let parsed: CredentialResponse = serde_json::from_value(json!({
            "idToken": "t",
            "expiresIn": "soon"
        }))
        .unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap();
        let session = parsed.into_session(now).unwrap();
        assert_eq!(
            session.expires_at,
            now + chrono::Duration::seconds(DEFAULT_EXPIRES_SECS)
        );
    }
}
