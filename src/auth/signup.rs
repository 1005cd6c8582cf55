//! Account signup through the emailed verification link.

use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::api::client::AparatClient;
use crate::api::endpoints::{SIGNUP_STEP1, SIGNUP_STEP2};
use crate::api::transport::{HttpRequest, HttpResponse, Transport};
use crate::auth::extractor::{extract_signup_code, find_signup_link};
use crate::auth::negotiator::temp_id_of;
use crate::error::{Error, Result};

fn signup_failed(response: &HttpResponse) -> Error {
    Error::SignupFailed {
        status: response.status.as_u16(),
        body: response.body.clone(),
    }
}

impl<T: Transport> AparatClient<T> {
    /// Ask the platform to email a verification link to `account`.
    pub async fn signup_step1(&mut self, account: &str) -> Result<()> {
        let challenge = self.begin_handshake().await?;
        let body = json!({
            "account": account,
            "temp_id": challenge.temp_id,
            "guid": challenge.guid,
        });
        let response = self.send(self.handshake_post(SIGNUP_STEP1, body)).await?;

        if response.status != StatusCode::OK {
            return Err(Error::Validation(response.payload()));
        }

        tracing::info!("Verification link requested for {}", account);
        Ok(())
    }

    /// Finish signup with the verification link, or the email text containing it.
    ///
    /// The account is only considered created, and the client logged in,
    /// when both the verification and the password submission succeed.
    pub async fn signup_step2(&mut self, link_or_email: &str, account: &str, password: &str) -> Result<()> {
        let link = find_signup_link(link_or_email, &self.options.signup_link_prefix)?
            .ok_or_else(|| Error::Validation(Value::String("No matching link found.".to_string())))?;

        let page = self.send(HttpRequest::get(link)).await?;
        let guid = self.extractor.require(&page.body, "guid")?;
        let additional_get = self.extractor.require(&page.body, "additionalGet")?;
        let code = extract_signup_code(&page.body)?;

        let url = format!("{}{}", self.url(SIGNUP_STEP2), additional_get);

        let verify = HttpRequest::post(url.clone()).json(json!({
            "type": "email",
            "code": code,
            "account": account,
            "guid": guid,
        }));
        let response = self.send(verify).await?;
        if !response.is_success() {
            return Err(signup_failed(&response));
        }
        let temp_id = temp_id_of(&response).ok_or_else(|| signup_failed(&response))?;

        let complete = HttpRequest::post(url).json(json!({
            "type": "email",
            "code": code,
            "account": account,
            "pass": password,
            "temp_id": temp_id,
            "guid": guid,
        }));
        let response = self.send(complete).await?;
        if !response.is_success() {
            return Err(signup_failed(&response));
        }

        self.session.mark_logged_in(account);
        tracing::info!("Signed up and logged in as {}", account);
        Ok(())
    }
}
