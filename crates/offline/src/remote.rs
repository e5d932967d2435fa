//! Remote authority client.

use std::{future::Future, time::Duration};

use api_types::{command::Command, snapshot::RemoteSnapshot};
use reqwest::{Url, header};

use crate::error::RemoteError;

/// The canonical copy of the trip data.
pub trait RemoteAuthority {
    /// One-shot read of the canonical state. Any failure, including a
    /// document whose `status` is not `"success"`, is an error the caller
    /// answers by staying on local state.
    fn fetch_snapshot(&self) -> impl Future<Output = Result<RemoteSnapshot, RemoteError>>;

    /// Sends one command. `Ok` means the request reached the remote; what
    /// the remote answered is not inspected.
    fn push_mutation(&self, command: &Command) -> impl Future<Output = Result<(), RemoteError>>;
}

/// HTTP transport for a script endpoint: `GET` returns the snapshot, `POST`
/// with a JSON command body applies it.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    url: Url,
    http: reqwest::Client,
}

impl HttpRemote {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let url = Url::parse(url).map_err(|err| RemoteError::InvalidUrl(format!("{url}: {err}")))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { url, http })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl RemoteAuthority for HttpRemote {
    async fn fetch_snapshot(&self) -> Result<RemoteSnapshot, RemoteError> {
        let res = self.http.get(self.url.clone()).send().await?;

        let status = res.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status));
        }

        let snapshot = res.json::<RemoteSnapshot>().await?;
        if !snapshot.is_success() {
            return Err(RemoteError::Rejected(snapshot.status));
        }
        Ok(snapshot)
    }

    async fn push_mutation(&self, command: &Command) -> Result<(), RemoteError> {
        // Script endpoints accept simple requests only, hence text/plain.
        let body = serde_json::to_string(command)
            .map_err(|err| RemoteError::Rejected(format!("unserializable command: {err}")))?;
        let res = self
            .http
            .post(self.url.clone())
            .header(header::CONTENT_TYPE, "text/plain;charset=utf-8")
            .body(body)
            .send()
            .await?;

        tracing::debug!(action = command.action(), status = %res.status(), "command sent");
        Ok(())
    }
}
