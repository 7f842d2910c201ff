use crate::config::ApiSettings;
use crate::models::{
    ApiErrorBody, Dog, DogSearchQuery, Location, LocationSearchQuery, LocationSearchResponse,
    LoginRequest, MatchResponse, SearchResponse,
};
use crate::services::api::{restore_order, CatalogApi};
use crate::services::request_log::{RequestLog, RequestLogEntry};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::watch;
use validator::Validate;

pub const LOGIN_PATH: &str = "/auth/login";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const BREEDS_PATH: &str = "/dogs/breeds";
pub const SEARCH_PATH: &str = "/dogs/search";
pub const DOGS_PATH: &str = "/dogs";
pub const MATCH_PATH: &str = "/dogs/match";
pub const LOCATIONS_PATH: &str = "/locations";
pub const LOCATION_SEARCH_PATH: &str = "/locations/search";

/// Errors that can occur when talking to the catalog service
#[derive(Debug, Error)]
pub enum CatalogError {
    /// 401/403: the session is missing or has expired
    #[error("Unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// Client-side contract violation; no request was sent
    #[error("Precondition failed: {0}")]
    Precondition(String),
}

impl CatalogError {
    pub fn is_auth(&self) -> bool {
        matches!(self, CatalogError::Unauthorized { .. })
    }

    pub fn is_precondition(&self) -> bool {
        matches!(self, CatalogError::Precondition(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CatalogError::Request(_) | CatalogError::Api { .. } | CatalogError::InvalidResponse(_)
        )
    }
}

/// Session state as seen by the client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Anonymous,
    Active,
    /// The service rejected the session credential
    Expired,
}

/// Catalog service API client
///
/// Shapes requests, normalizes errors and records every exchange in the
/// request log. The session cookie is held by reqwest's cookie store.
pub struct CatalogClient {
    base_url: String,
    client: Client,
    session: watch::Sender<SessionStatus>,
    request_log: Arc<RequestLog>,
}

impl CatalogClient {
    /// Create a new catalog client
    pub fn new(
        base_url: String,
        timeout: Duration,
        request_log: Arc<RequestLog>,
    ) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()?;

        let (session, _) = watch::channel(SessionStatus::Anonymous);

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            session,
            request_log,
        })
    }

    pub fn from_settings(
        settings: &ApiSettings,
        request_log: Arc<RequestLog>,
    ) -> Result<Self, CatalogError> {
        Self::new(
            settings.base_url.clone(),
            Duration::from_secs(settings.timeout_secs),
            request_log,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Subscribe to session transitions
    pub fn session(&self) -> watch::Receiver<SessionStatus> {
        self.session.subscribe()
    }

    pub fn session_status(&self) -> SessionStatus {
        *self.session.borrow()
    }

    pub fn request_log(&self) -> &Arc<RequestLog> {
        &self.request_log
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
    }

    /// Send a request, log it, and turn non-2xx statuses into errors
    async fn execute(
        &self,
        builder: RequestBuilder,
        method: Method,
        path: &str,
    ) -> Result<Response, CatalogError> {
        let mut entry = RequestLogEntry::new(method.as_str(), path);
        let started = Instant::now();
        let sent = builder.send().await;
        entry.elapsed_ms = started.elapsed().as_millis() as u64;

        let response = match sent {
            Ok(response) => response,
            Err(e) => {
                entry.error = Some(e.to_string());
                self.request_log.record(entry);
                return Err(CatalogError::Request(e));
            }
        };

        let status = response.status();
        entry.status = Some(status.as_u16());

        if status.is_success() {
            self.request_log.record(entry);
            return Ok(response);
        }

        let message = error_message(response).await;
        entry.error = Some(message.clone());
        self.request_log.record(entry);

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let next = if path == LOGIN_PATH {
                SessionStatus::Anonymous
            } else {
                SessionStatus::Expired
            };
            if self.session.send_replace(next) != next {
                tracing::info!("Session status changed to {:?} after {} on {}", next, status, path);
            }
            return Err(CatalogError::Unauthorized {
                status: status.as_u16(),
                message,
            });
        }

        tracing::error!("{} {} failed: {} - {}", method, path, status, message);
        Err(CatalogError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: Option<String>) -> Result<T, CatalogError> {
        let target = match query {
            Some(q) if !q.is_empty() => format!("{}?{}", path, q),
            _ => path.to_string(),
        };
        tracing::debug!("GET {}", target);

        let builder = self.request(Method::GET, &target);
        let response = self.execute(builder, Method::GET, path).await?;
        read_json(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, CatalogError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path).json(body);
        let response = self.execute(builder, Method::POST, path).await?;
        read_json(response).await
    }
}

impl CatalogApi for CatalogClient {
    async fn login(&self, name: &str, email: &str) -> Result<(), CatalogError> {
        let request = LoginRequest {
            name: name.to_string(),
            email: email.to_string(),
        };
        request
            .validate()
            .map_err(|e| CatalogError::Precondition(format!("Invalid login: {}", e)))?;

        let builder = self.request(Method::POST, LOGIN_PATH).json(&request);
        self.execute(builder, Method::POST, LOGIN_PATH).await?;

        self.session.send_replace(SessionStatus::Active);
        tracing::info!("Logged in as {}", request.name);
        Ok(())
    }

    async fn logout(&self) -> Result<(), CatalogError> {
        let builder = self.request(Method::POST, LOGOUT_PATH);
        self.execute(builder, Method::POST, LOGOUT_PATH).await?;

        self.session.send_replace(SessionStatus::Anonymous);
        tracing::info!("Logged out");
        Ok(())
    }

    async fn list_breeds(&self) -> Result<Vec<String>, CatalogError> {
        self.get_json(BREEDS_PATH, None).await
    }

    async fn search_dogs(&self, query: &DogSearchQuery) -> Result<SearchResponse, CatalogError> {
        let response: SearchResponse = self
            .get_json(SEARCH_PATH, Some(query.to_query_string()))
            .await?;

        tracing::debug!(
            "Search returned {} ids (total: {})",
            response.result_ids.len(),
            response.total
        );
        Ok(response)
    }

    async fn get_dogs(&self, ids: &[String]) -> Result<Vec<Dog>, CatalogError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let dogs: Vec<Dog> = self.post_json(DOGS_PATH, ids).await?;
        Ok(restore_order(ids, dogs))
    }

    async fn get_match(&self, ids: &[String]) -> Result<String, CatalogError> {
        if ids.is_empty() {
            return Err(CatalogError::Precondition(
                "match requires at least one favorite".to_string(),
            ));
        }

        let response: MatchResponse = self.post_json(MATCH_PATH, ids).await?;
        Ok(response.matched)
    }

    async fn get_locations(&self, zip_codes: &[String]) -> Result<Vec<Location>, CatalogError> {
        if zip_codes.is_empty() {
            return Ok(Vec::new());
        }

        // The service answers with null entries for unknown zip codes
        let locations: Vec<Option<Location>> = self.post_json(LOCATIONS_PATH, zip_codes).await?;
        Ok(locations.into_iter().flatten().collect())
    }

    async fn search_locations(
        &self,
        query: &LocationSearchQuery,
    ) -> Result<LocationSearchResponse, CatalogError> {
        self.post_json(LOCATION_SEARCH_PATH, query).await
    }
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"))
}

/// Decode a JSON payload; 204 and non-JSON responses carry none
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, CatalogError> {
    if response.status() == StatusCode::NO_CONTENT || !is_json(&response) {
        return Err(CatalogError::InvalidResponse(format!(
            "expected a JSON body, got status {} without one",
            response.status()
        )));
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| CatalogError::InvalidResponse(format!("Failed to parse response: {}", e)))
}

/// Best-effort message for a failed response: JSON body, then status text
async fn error_message(response: Response) -> String {
    let status = response.status();
    let fallback = status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_u16().to_string());

    if !is_json(&response) {
        return fallback;
    }

    match response.json::<ApiErrorBody>().await {
        Ok(body) => body.into_message().unwrap_or(fallback),
        Err(_) => fallback,
    }
}
