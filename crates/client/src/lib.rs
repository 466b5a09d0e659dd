//! REST client for the storefront backend.
//!
//! Plain JSON requests against fixed paths under a configured base URL with a
//! single request timeout. No retries, no token refresh.

use std::time::Duration;

use common::{Category, Product};
use configs::ApiConfig;
use reqwest::{Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use service::Draft;
use thiserror::Error;
use tracing::{debug, instrument, warn};

pub mod endpoints;
pub mod requests;

use requests::{
    AuthSession, ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, VerifyOtpRequest,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),
    #[error("http {status} from {path}: {body}")]
    Status { status: u16, path: String, body: String },
    #[error("parse error: {0}")]
    Parse(String),
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(cfg: &ApiConfig) -> Result<Self, ClientError> {
        let client = Self::with_timeout(&cfg.base_url, cfg.timeout())?;
        Ok(match &cfg.token {
            Some(token) => client.with_token(token.as_str()),
            None => client,
        })
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string(), token: None })
    }

    /// Attach a bearer token to subsequent requests.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let rb = self.http.request(method, self.url(path));
        match &self.token {
            Some(t) => rb.bearer_auth(t),
            None => rb,
        }
    }

    async fn send<T: DeserializeOwned>(&self, path: &str, rb: RequestBuilder) -> Result<T, ClientError> {
        let resp = rb.send().await.map_err(|e| {
            warn!(%path, error = %e, "request failed");
            ClientError::Network(e.to_string())
        })?;
        let status = resp.status();
        debug!(%path, status = status.as_u16(), "response");
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status { status: status.as_u16(), path: path.to_string(), body });
        }
        let bytes = resp.bytes().await.map_err(|e| ClientError::Network(e.to_string()))?;
        // empty bodies (e.g. logout) deserialize as null
        let bytes = if bytes.is_empty() { &b"null"[..] } else { &bytes[..] };
        serde_json::from_slice(bytes).map_err(|e| ClientError::Parse(e.to_string()))
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ClientError> {
        self.send(path, self.request(Method::POST, path).json(body)).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(path, self.request(Method::GET, path)).await
    }

    #[instrument(skip(self, req), fields(email = %req.email, role = req.role.as_str()))]
    pub async fn register(&self, req: &RegisterRequest) -> Result<serde_json::Value, ClientError> {
        self.post(endpoints::REGISTER, req).await
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: &LoginRequest) -> Result<AuthSession, ClientError> {
        self.post(endpoints::LOGIN, req).await
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn verify_otp(&self, req: &VerifyOtpRequest) -> Result<AuthSession, ClientError> {
        self.post(endpoints::VERIFY_OTP, req).await
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        let _: serde_json::Value = self.post(endpoints::LOGOUT, &serde_json::json!({})).await?;
        Ok(())
    }

    pub async fn forgot_password(&self, req: &ForgotPasswordRequest) -> Result<serde_json::Value, ClientError> {
        self.post(endpoints::FORGOT_PASSWORD, req).await
    }

    pub async fn reset_password(&self, req: &ResetPasswordRequest) -> Result<serde_json::Value, ClientError> {
        self.post(endpoints::RESET_PASSWORD, req).await
    }

    pub async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        self.get(endpoints::CATEGORIES).await
    }

    pub async fn products(&self) -> Result<Vec<Product>, ClientError> {
        self.get(endpoints::PRODUCTS).await
    }

    pub async fn product(&self, id: &str) -> Result<Product, ClientError> {
        self.get(&endpoints::product(id)).await
    }

    pub async fn orders(&self) -> Result<serde_json::Value, ClientError> {
        self.get(endpoints::ORDERS).await
    }

    /// Send the onboarding draft as the vendor setup payload.
    #[instrument(skip(self, draft), fields(fields = draft.len()))]
    pub async fn submit_vendor_setup(&self, draft: &Draft) -> Result<serde_json::Value, ClientError> {
        self.post(endpoints::VENDOR_SETUP, draft.as_map()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_base_and_templates() -> Result<(), ClientError> {
        let client = ApiClient::with_timeout("https://shop.example.com/api/", Duration::from_secs(30))?;
        assert_eq!(client.base_url(), "https://shop.example.com/api");
        assert_eq!(client.url(endpoints::LOGIN), "https://shop.example.com/api/auth/login");
        assert_eq!(client.url(&endpoints::product("p-7")), "https://shop.example.com/api/products/p-7");
        Ok(())
    }

    #[test]
    fn builds_from_config_defaults() -> Result<(), ClientError> {
        let client = ApiClient::new(&ApiConfig::default())?;
        assert_eq!(client.url(endpoints::ORDERS), "http://127.0.0.1:8080/api/orders");
        Ok(())
    }

    #[test]
    fn request_payloads_use_wire_names() {
        let reset = ResetPasswordRequest { email: "a@b.c".into(), otp: "1234".into(), new_password: "pw".into() };
        let v = serde_json::to_value(&reset).unwrap();
        assert_eq!(v["newPassword"], "pw");

        let reg = RegisterRequest {
            name: "Ada".into(),
            email: "a@b.c".into(),
            phone: "1".into(),
            password: "pw".into(),
            role: common::Role::Vendor,
        };
        assert_eq!(serde_json::to_value(&reg).unwrap()["role"], "vendor");
    }
}
