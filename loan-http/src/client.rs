use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use loan_core::{
    ApiError, ApplicationStatus, CreateLoanRequest, CreateRule, EligibleLender, LoanApplication,
    LoanRequestResponse, LoginRequest, LoginResponse, MarketplaceClient, MyApplication,
    RegisterRequest, RuleResponse, SessionContext,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error body the backend sends with non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// [`MarketplaceClient`] over the backend's JSON REST API.
pub struct HttpMarketplaceClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionContext>,
}

impl HttpMarketplaceClient {
    /// # Errors
    /// [`ApiError::Configuration`] when `base_url` is not an absolute URL or
    /// the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        session: Arc<SessionContext>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Configuration(e.to_string()))?;
        Self::with_client(http, base_url, session)
    }

    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        session: Arc<SessionContext>,
    ) -> Result<Self, ApiError> {
        Url::parse(base_url)
            .map_err(|e| ApiError::Configuration(format!("invalid base url '{base_url}': {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Starts a request, adding the bearer token when the session has one.
    fn request(
        &self,
        method: Method,
        path: &str,
    ) -> RequestBuilder {
        debug!(%method, path, "backend request");
        let builder = self.http.request(method, format!("{}{path}", self.base_url));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(
        &self,
        builder: RequestBuilder,
    ) -> Result<Response, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // the body is optional; an unreadable one just means no message
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty());
        warn!(status = status.as_u16(), message = ?message, "backend returned an error");

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Sends and ignores whatever body comes back.
    async fn send_empty(
        &self,
        builder: RequestBuilder,
    ) -> Result<(), ApiError> {
        self.send(builder).await.map(|_| ())
    }
}

#[async_trait]
impl MarketplaceClient for HttpMarketplaceClient {
    async fn login(
        &self,
        request: &LoginRequest,
    ) -> Result<LoginResponse, ApiError> {
        self.send_json(self.request(Method::POST, "/auth/login").json(request))
            .await
    }

    async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<(), ApiError> {
        self.send_empty(self.request(Method::POST, "/auth/register").json(request))
            .await
    }

    async fn create_loan_request(
        &self,
        request: &CreateLoanRequest,
    ) -> Result<LoanRequestResponse, ApiError> {
        self.send_json(self.request(Method::POST, "/borrower_request").json(request))
            .await
    }

    async fn my_loan_requests(&self) -> Result<Vec<LoanRequestResponse>, ApiError> {
        self.send_json(self.request(Method::GET, "/borrower_request"))
            .await
    }

    async fn create_rule(
        &self,
        rule: &CreateRule,
    ) -> Result<RuleResponse, ApiError> {
        self.send_json(self.request(Method::POST, "/lender_rules/create").json(rule))
            .await
    }

    async fn update_rule(
        &self,
        id: i64,
        rule: &CreateRule,
    ) -> Result<RuleResponse, ApiError> {
        let path = format!("/lender_rules/update/{id}");
        self.send_json(self.request(Method::PUT, &path).json(rule))
            .await
    }

    async fn my_rules(&self) -> Result<Vec<RuleResponse>, ApiError> {
        self.send_json(self.request(Method::GET, "/lender_rules/my-rules"))
            .await
    }

    async fn delete_rule(
        &self,
        id: i64,
    ) -> Result<(), ApiError> {
        let path = format!("/lender_rules/delete/{id}");
        self.send_empty(self.request(Method::DELETE, &path)).await
    }

    async fn eligible_lenders(
        &self,
        request_id: i64,
        salary: f64,
    ) -> Result<Vec<EligibleLender>, ApiError> {
        let path = format!("/loans/{request_id}/eligible-lenders?salary={salary}");
        self.send_json(self.request(Method::GET, &path)).await
    }

    async fn apply_for_loan(
        &self,
        request_id: i64,
        rule_id: i64,
    ) -> Result<(), ApiError> {
        let path = format!("/loans/apply/request/{request_id}/rule/{rule_id}");
        self.send_empty(
            self.request(Method::POST, &path)
                .json(&serde_json::json!({})),
        )
        .await
    }

    async fn update_loan_status(
        &self,
        loan_id: i64,
        status: ApplicationStatus,
    ) -> Result<(), ApiError> {
        let path = format!("/loans/update-status/{loan_id}?status={}", status.as_str());
        self.send_empty(
            self.request(Method::PUT, &path)
                .json(&serde_json::json!({})),
        )
        .await
    }

    async fn lender_applications(&self) -> Result<Vec<LoanApplication>, ApiError> {
        self.send_json(self.request(Method::GET, "/loans/borrower-applications"))
            .await
    }

    async fn borrower_applications(&self) -> Result<Vec<MyApplication>, ApiError> {
        self.send_json(self.request(Method::GET, "/loans/borrower/my-applications"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn session() -> Arc<SessionContext> {
        Arc::new(SessionContext::in_memory())
    }

    #[test]
    fn trailing_slash_is_dropped_from_base_url() {
        let client = HttpMarketplaceClient::new("http://localhost:8080/", session()).unwrap();

        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn relative_base_url_is_a_configuration_error() {
        let result = HttpMarketplaceClient::new("localhost", session());

        assert!(matches!(result, Err(ApiError::Configuration(_))));
    }
}
