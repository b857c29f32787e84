use reqwest::Client as HttpClient;
use url::Url;

use crate::api::error::ApiError;
use crate::api::models::{decode_contacts, Contact, OutgoingMessage};
use crate::session::ChatBackend;

pub const USERS_PATH: &str = "users/";
pub const SEND_MESSAGE_PATH: &str = "send_message/";

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: HttpClient,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_http(HttpClient::new(), base_url)
    }

    pub fn with_http(http: HttpClient, base_url: &str) -> Result<Self, ApiError> {
        Ok(Self { http, base: Self::base_api(base_url)? })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    // A trailing slash keeps any path prefix (e.g. behind a reverse proxy) when joining.
    fn base_api(base_url: &str) -> Result<Url, ApiError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        Ok(Url::parse(&format!("{}/", trimmed))?)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path)?)
    }

    /// Reach the server root and report the status code.
    /// Any response counts as reachable; only transport failures are errors.
    pub async fn ping(&self) -> Result<u16, ApiError> {
        let resp = self.http.get(self.base.clone()).send().await?;
        Ok(resp.status().as_u16())
    }

    /// Fetch every user known to the backend, in backend order.
    pub async fn users(&self) -> Result<Vec<Contact>, ApiError> {
        let resp = self.http.get(self.endpoint(USERS_PATH)?).send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status { endpoint: "users", status: resp.status() });
        }
        let bytes = resp.bytes().await?;
        Ok(decode_contacts(&bytes)?)
    }

    /// Post one chat message. The response body is ignored.
    pub async fn send_message(&self, message: &OutgoingMessage) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(self.endpoint(SEND_MESSAGE_PATH)?)
            .json(message)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status { endpoint: "send_message", status: resp.status() });
        }
        Ok(())
    }
}

impl ChatBackend for ApiClient {
    async fn fetch_contacts(&self) -> Result<Vec<Contact>, ApiError> {
        self.users().await
    }

    async fn send_message(&self, message: &OutgoingMessage) -> Result<(), ApiError> {
        ApiClient::send_message(self, message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_onto_base() {
        let client = ApiClient::new("http://127.0.0.1:8000").unwrap();
        assert_eq!(client.endpoint(USERS_PATH).unwrap().as_str(), "http://127.0.0.1:8000/users/");
        assert_eq!(
            client.endpoint(SEND_MESSAGE_PATH).unwrap().as_str(),
            "http://127.0.0.1:8000/send_message/"
        );
    }

    #[test]
    fn path_prefix_is_preserved() {
        let client = ApiClient::new("https://chat.example.com/backend/").unwrap();
        assert_eq!(
            client.endpoint(USERS_PATH).unwrap().as_str(),
            "https://chat.example.com/backend/users/"
        );
    }

    #[test]
    fn with_http_normalizes_base() {
        let http = HttpClient::builder().build().unwrap();
        let client = ApiClient::with_http(http, " http://10.0.0.2:8000/chat ").unwrap();
        assert_eq!(client.base_url().as_str(), "http://10.0.0.2:8000/chat/");
    }

    #[test]
    fn rejects_unparsable_base() {
        assert!(matches!(ApiClient::new("not a url"), Err(ApiError::InvalidUrl(_))));
    }
}
