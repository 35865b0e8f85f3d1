//! The single configured HTTP client every request flows through.
//!
//! [`ApiClient`] owns the [`reqwest::Client`], the backend base URL and
//! the session store. Each response is handed to the registered
//! [`ResponseInspector`]s before the caller sees it; [`UnauthorizedReset`]
//! is the inspector that drops the stored identity on a 401.

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use reqwest::{RequestBuilder, Response, StatusCode};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::session::SessionStore;

/* --------------------------------------------------------------------------
Inspector chain
-------------------------------------------------------------------------- */

/// Hook run on every response, in registration order.
pub trait ResponseInspector: Send + Sync {
    fn inspect(&self, response: &Response);
}

/// Where the client sends the user once their session is gone.
pub trait Navigator: Send + Sync {
    /// Return to the root route (the signed-out landing point).
    fn go_home(&self);
}

/// Clears the identity keys and navigates home whenever a response is 401.
pub struct UnauthorizedReset {
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl UnauthorizedReset {
    pub fn new(session: Arc<dyn SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }
}

impl ResponseInspector for UnauthorizedReset {
    fn inspect(&self, response: &Response) {
        if response.status() != StatusCode::UNAUTHORIZED {
            return;
        }

        tracing::warn!(url = %response.url(), "Received 401, clearing session");
        if let Err(e) = self.session.clear_identity() {
            tracing::error!(error = %e, "Failed to clear session after 401");
        }
        self.navigator.go_home();
    }
}

/* --------------------------------------------------------------------------
ApiClient
-------------------------------------------------------------------------- */

/// HTTP client bound to one backend.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
    inspectors: Vec<Arc<dyn ResponseInspector>>,
}

/// A request builder plus whether a bearer credential was attached.
pub struct PreparedRequest {
    pub builder: RequestBuilder,
    pub authorized: bool,
}

impl ApiClient {
    /// Build a client with the configured request timeout.
    pub fn new(config: &ClientConfig, session: Arc<dyn SessionStore>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(http, config.api_url.clone(), session))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        session: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            inspectors: Vec::new(),
        }
    }

    /// Append an inspector to the chain.
    pub fn with_inspector(mut self, inspector: Arc<dyn ResponseInspector>) -> Self {
        self.inspectors.push(inspector);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    /// Absolute URL for a backend path such as `/resize-images`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET` a backend path with the stored bearer credential.
    pub fn get(&self, path: &str) -> PreparedRequest {
        self.authorize(self.http.get(self.url(path)))
    }

    /// `POST` a backend path with the stored bearer credential.
    pub fn post(&self, path: &str) -> PreparedRequest {
        self.authorize(self.http.post(self.url(path)))
    }

    /// `GET` an absolute URL with no credential attached.
    pub fn get_absolute(&self, url: &str) -> RequestBuilder {
        self.http.get(url)
    }

    /// `GET` a backend path with no credential attached.
    pub fn get_public(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path))
    }

    fn authorize(&self, builder: RequestBuilder) -> PreparedRequest {
        match self.session.auth_token() {
            Some(token) => PreparedRequest {
                builder: builder.header(AUTHORIZATION, format!("Bearer {token}")),
                authorized: true,
            },
            None => {
                tracing::warn!("No credential stored, sending request unauthenticated");
                PreparedRequest {
                    builder,
                    authorized: false,
                }
            }
        }
    }

    /// Send a request and run the inspector chain on the response.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        let response = builder.send().await?;
        tracing::debug!(
            url = %response.url(),
            status = response.status().as_u16(),
            "Response received",
        );
        for inspector in &self.inspectors {
            inspector.inspect(&response);
        }
        Ok(response)
    }
}
