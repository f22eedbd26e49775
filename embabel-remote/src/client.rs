//! Client shim: calls a remote action server's REST protocol and turns the
//! result into a local `embabel_core::Action` + `ActionBody`-shaped closure
//! (the action itself is built by the caller from `ActionDto`; this module
//! is only the HTTP boundary).

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::dto::{ActionDto, ExecuteActionRequest, RegisterRemoteRequest, TypeDescriptorDto};

#[derive(Debug, Error)]
pub enum RemoteClientError {
    #[error("request to remote action server failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("remote action server returned {status}: {body}")]
    Server { status: reqwest::StatusCode, body: String },
}

/// Thin REST client over one remote action server's `baseUrl`.
pub struct RemoteActionClient {
    base_url: String,
    http: reqwest::Client,
}

impl RemoteActionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn with_http_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }

    pub async fn list_actions(&self) -> Result<Vec<ActionDto>, RemoteClientError> {
        let url = format!("{}/api/v1/actions", self.base_url);
        let response = self.http.get(&url).send().await?;
        Self::json_or_error(response).await
    }

    pub async fn list_types(&self) -> Result<Vec<TypeDescriptorDto>, RemoteClientError> {
        let url = format!("{}/api/v1/types", self.base_url);
        let response = self.http.get(&url).send().await?;
        Self::json_or_error(response).await
    }

    /// Invoke a remote action by name with the given parameters, returning
    /// the raw JSON value the server produced for the declared output type.
    pub async fn execute_action(
        &self,
        action_name: &str,
        parameters: BTreeMap<String, Value>,
    ) -> Result<Value, RemoteClientError> {
        let url = format!("{}/api/v1/actions/execute", self.base_url);
        let body = ExecuteActionRequest {
            action_name: action_name.to_string(),
            parameters,
        };
        let response = self.http.post(&url).json(&body).send().await?;
        Self::json_or_error(response).await
    }

    /// Register this client's `base_url` with a platform registry at
    /// `registry_base_url`.
    pub async fn register_with(
        &self,
        registry_base_url: &str,
        name: &str,
        description: &str,
    ) -> Result<(), RemoteClientError> {
        let url = format!("{registry_base_url}/api/v1/remote/register");
        let body = RegisterRemoteRequest {
            base_url: self.base_url.clone(),
            name: name.to_string(),
            description: description.to_string(),
        };
        let response = self.http.post(&url).json(&body).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(RemoteClientError::Server { status, body })
        }
    }

    async fn json_or_error<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T, RemoteClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(RemoteClientError::Server { status, body })
        }
    }
}
