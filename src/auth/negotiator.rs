//! Login handshake.
//!
//! Four steps, each carrying `callbackType=postmessage`:
//!
//! 1. Fetch the sign-in page and read the handshake `guid` from its script state.
//! 2. Exchange the `guid` for a first `temp_id`.
//! 3. Submit the account name; the reply carries a fresh `temp_id`.
//! 4. Submit the password.
//!
//! When step 4 reports that the account hit its concurrent-session limit
//! (`403` + `get_max_tokens`), the oldest listed session is revoked and the
//! handshake continues from the URI the server hands back.

use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::api::client::AparatClient;
use crate::api::endpoints::{AUTH_TEMP_ID, CALLBACK_TYPE, SIGNIN_PAGE, SIGNIN_STEP1, SIGNIN_STEP2};
use crate::api::transport::{HttpRequest, HttpResponse, Transport};
use crate::api::types::{ApiErrors, Document, TempIdAttributes};
use crate::error::{Error, Result};

/// `type_info` of the session-limit error.
const MAX_TOKENS: &str = "get_max_tokens";

/// Transient handshake state. `temp_id` is replaced at every step.
#[derive(Debug, Clone)]
pub struct AuthChallenge {
    pub guid: String,
    pub temp_id: String,
}

/// `data.attributes.temp_id` of a handshake reply.
pub(crate) fn temp_id_of(response: &HttpResponse) -> Option<String> {
    serde_json::from_str::<Document<TempIdAttributes>>(&response.body)
        .ok()
        .and_then(|doc| doc.data.attributes.temp_id)
}

impl<T: Transport> AparatClient<T> {
    /// POST a JSON body to a handshake endpoint.
    pub(crate) fn handshake_post(&self, path: &str, body: Value) -> HttpRequest {
        HttpRequest::post(self.url(path))
            .query(CALLBACK_TYPE.0, CALLBACK_TYPE.1)
            .json(body)
    }

    async fn fetch_guid(&self) -> Result<String> {
        let request = HttpRequest::get(self.url(SIGNIN_PAGE)).query(CALLBACK_TYPE.0, CALLBACK_TYPE.1);
        let response = self.send(request).await?;

        self.extractor.require(&response.body, "guid")
    }

    async fn request_temp_id(&self, guid: &str) -> Result<String> {
        let response = self
            .send(self.handshake_post(AUTH_TEMP_ID, json!({ "guid": guid })))
            .await?;

        temp_id_of(&response).ok_or_else(|| Error::ProtocolExtraction("temp_id".to_string()))
    }

    /// Steps 1 and 2: a fresh `guid` and its first `temp_id`.
    pub(crate) async fn begin_handshake(&self) -> Result<AuthChallenge> {
        let guid = self.fetch_guid().await?;
        let temp_id = self.request_temp_id(&guid).await?;
        tracing::debug!("Handshake started");

        Ok(AuthChallenge { guid, temp_id })
    }

    /// Log in with an account name (username, email or phone) and password.
    ///
    /// On success the client is logged in as `username` and the session
    /// cookies stay in the transport. On failure the login state is unchanged.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let mut challenge = self.begin_handshake().await?;
        self.submit_account(&mut challenge, username).await?;
        self.submit_password(&challenge, username, password).await?;

        self.session.mark_logged_in(username);
        tracing::info!("Logged in as {}", username);
        Ok(())
    }

    async fn submit_account(&self, challenge: &mut AuthChallenge, account: &str) -> Result<()> {
        let body = json!({
            "account": account,
            "temp_id": challenge.temp_id,
            "guid": challenge.guid,
        });
        let response = self.send(self.handshake_post(SIGNIN_STEP1, body)).await?;

        match response.status {
            StatusCode::OK => {
                challenge.temp_id = temp_id_of(&response)
                    .ok_or_else(|| Error::ProtocolExtraction("temp_id".to_string()))?;
                Ok(())
            }
            StatusCode::NOT_ACCEPTABLE => Err(Error::UsernameNotFound),
            status => {
                tracing::debug!("Account step rejected: HTTP {}", status);
                Err(Error::LoginFailed)
            }
        }
    }

    async fn submit_password(&self, challenge: &AuthChallenge, account: &str, password: &str) -> Result<()> {
        let body = json!({
            "temp_id": challenge.temp_id,
            "account": account,
            "codepass_type": "pass",
            "code": password,
            "guid": challenge.guid,
        });
        let response = self.send(self.handshake_post(SIGNIN_STEP2, body)).await?;

        match response.status {
            StatusCode::OK => Ok(()),
            StatusCode::FORBIDDEN => {
                let entry = serde_json::from_str::<ApiErrors>(&response.body)
                    .ok()
                    .and_then(|e| e.errors.into_iter().next());

                match entry {
                    Some(entry) if entry.type_info.as_deref() == Some(MAX_TOKENS) => {
                        self.release_session_slot(&challenge.guid, entry.uri.as_deref())
                            .await
                    }
                    _ => Err(Error::LoginFailed),
                }
            }
            StatusCode::UNAUTHORIZED => Err(Error::IncorrectPassword),
            status => {
                tracing::debug!("Password step rejected: HTTP {}", status);
                Err(Error::LoginFailed)
            }
        }
    }

    /// Revoke the first listed active session and resume the handshake.
    async fn release_session_slot(&self, guid: &str, options_uri: Option<&str>) -> Result<()> {
        tracing::warn!("Concurrent session limit reached, revoking the oldest session");

        let options_uri = options_uri
            .ok_or_else(|| Error::TokenRevocation("error payload has no uri".to_string()))?;
        let options = self.revocation_step(options_uri, Some(guid)).await?;

        let revoke_link = first_revoke_link(&options)
            .ok_or_else(|| Error::TokenRevocation("no active session to revoke".to_string()))?;
        let revoked = self.revocation_step(&revoke_link, None).await?;

        let continuation = revoked
            .pointer("/data/attributes/uri")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::TokenRevocation("revocation reply has no uri".to_string()))?
            .to_string();
        self.revocation_step(&continuation, Some(guid)).await?;

        tracing::info!("Revoked an old session to make room");
        Ok(())
    }

    /// One GET of the revocation sub-flow. Every failure is a `TokenRevocation`.
    async fn revocation_step(&self, link: &str, guid: Option<&str>) -> Result<Value> {
        let mut request = HttpRequest::get(self.resolve(link));
        if let Some(guid) = guid {
            request = request
                .query(CALLBACK_TYPE.0, CALLBACK_TYPE.1)
                .query("guid", guid);
        }

        let response = self
            .send(request)
            .await
            .map_err(|e| Error::TokenRevocation(e.to_string()))?;

        if !response.is_success() {
            return Err(Error::TokenRevocation(format!(
                "{} returned HTTP {}",
                link, response.status
            )));
        }

        Ok(response.json().unwrap_or(Value::Null))
    }
}

/// `revoke_link` of the first session listed under `data.attributes.data`.
fn first_revoke_link(options: &Value) -> Option<String> {
    let sessions = options.pointer("/data/attributes/data")?;

    let first = match sessions {
        Value::Object(map) => map.values().next(),
        Value::Array(list) => list.first(),
        _ => None,
    }?;

    first.get("revoke_link")?.as_str().map(str::to_string)
}
