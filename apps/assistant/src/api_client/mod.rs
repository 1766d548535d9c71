/// Upstream job API client: the single point of entry for all calls to the job backend.
///
/// No other module talks to the upstream API directly. Responses are JSON; any
/// non-2xx status becomes `ApiError::Request` and is NOT retried.
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request failed: {status} {status_text}")]
    Request { status: u16, status_text: String },

    #[error("Invalid URL: {0}")]
    Url(String),

    #[error("Invalid job id: {0:?}")]
    InvalidJobId(String),
}

/// Query parameters for `GET /jobs`. Zero or empty values are omitted from the URL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobQuery {
    #[serde(default)]
    pub skip: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
}

impl JobQuery {
    /// Returns the `(key, value)` pairs that should appear in the query string.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(skip) = self.skip.filter(|v| *v > 0) {
            pairs.push(("skip", skip.to_string()));
        }
        if let Some(limit) = self.limit.filter(|v| *v > 0) {
            pairs.push(("limit", limit.to_string()));
        }
        for (key, value) in [
            ("search", &self.search),
            ("location", &self.location),
            ("job_type", &self.job_type),
        ] {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                pairs.push((key, v.to_string()));
            }
        }
        pairs
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// Thin JSON client over the upstream job API.
#[derive(Clone)]
pub struct ApiService {
    client: Client,
    base_url: String,
}

impl ApiService {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the absolute URL for an endpoint, appending non-empty query pairs.
    fn url(&self, endpoint: &str, query: &[(&'static str, String)]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, endpoint))
            .map_err(|e| ApiError::Url(format!("{}{}: {e}", self.base_url, endpoint)))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// `/jobs/{id}` with the id pushed as one percent-encoded path segment, so `/`, `?`
    /// and `#` in an id can never reach another upstream path or the query string.
    fn job_url(&self, job_id: &str) -> Result<Url, ApiError> {
        if matches!(job_id, "" | "." | "..") {
            return Err(ApiError::InvalidJobId(job_id.to_string()));
        }
        let mut url = self.url("/jobs", &[])?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Url(format!("{} cannot be a base URL", self.base_url)))?
            .push(job_id);
        Ok(url)
    }

    /// Sends a request and decodes the JSON body. Non-2xx → `ApiError::Request`.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Request {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        debug!("Upstream request succeeded: {}", response.url());
        Ok(response.json::<T>().await?)
    }

    fn request(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&'static str, String)],
    ) -> Result<RequestBuilder, ApiError> {
        Ok(self.client.request(method, self.url(endpoint, query)?))
    }

    /// GET /health
    pub async fn health_check(&self) -> Result<Value, ApiError> {
        self.send(self.request(Method::GET, "/health", &[])?).await
    }

    /// GET /jobs[?skip&limit&search&location&job_type]
    pub async fn get_jobs<T: DeserializeOwned>(&self, query: &JobQuery) -> Result<T, ApiError> {
        self.send(self.request(Method::GET, "/jobs", &query.pairs())?)
            .await
    }

    /// GET /jobs/{id}
    pub async fn get_job_by_id<T: DeserializeOwned>(&self, job_id: &str) -> Result<T, ApiError> {
        let url = self.job_url(job_id)?;
        self.send(self.client.request(Method::GET, url)).await
    }

    /// POST /auth/login
    pub async fn login(&self, credentials: &LoginRequest) -> Result<Value, ApiError> {
        self.send(self.request(Method::POST, "/auth/login", &[])?.json(credentials))
            .await
    }

    /// POST /auth/register
    pub async fn register(&self, user: &RegisterRequest) -> Result<Value, ApiError> {
        self.send(self.request(Method::POST, "/auth/register", &[])?.json(user))
            .await
    }

    /// GET /users/profile (bearer auth)
    pub async fn get_user_profile(&self, token: &str) -> Result<Value, ApiError> {
        self.send(
            self.request(Method::GET, "/users/profile", &[])?
                .bearer_auth(token),
        )
        .await
    }

    /// PUT /users/profile (bearer auth)
    pub async fn update_user_profile(&self, profile: &Value, token: &str) -> Result<Value, ApiError> {
        self.send(
            self.request(Method::PUT, "/users/profile", &[])?
                .bearer_auth(token)
                .json(profile),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> ApiService {
        ApiService::new("http://localhost:8000/").unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        assert_eq!(service().base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_jobs_url_without_params_has_no_query() {
        let url = service().url("/jobs", &JobQuery::default().pairs()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/jobs");
    }

    #[test]
    fn test_jobs_query_omits_zero_and_empty_values() {
        let query = JobQuery {
            skip: Some(0),
            limit: Some(20),
            search: Some(String::new()),
            location: Some("Dallas, TX".to_string()),
            job_type: None,
        };
        let url = service().url("/jobs", &query.pairs()).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/jobs?limit=20&location=Dallas%2C+TX"
        );
    }

    #[test]
    fn test_jobs_query_keeps_param_order() {
        let query = JobQuery {
            skip: Some(10),
            limit: Some(5),
            search: Some("rust".to_string()),
            location: None,
            job_type: Some("Full-time".to_string()),
        };
        let keys: Vec<&str> = query.pairs().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["skip", "limit", "search", "job_type"]);
    }

    fn job_path(id: &str) -> Vec<String> {
        let url = service().job_url(id).unwrap();
        assert_eq!(url.query(), None, "{url}");
        url.path_segments().unwrap().map(str::to_string).collect()
    }

    #[test]
    fn test_job_url_keeps_id_in_one_segment() {
        assert_eq!(job_path("42"), vec!["jobs", "42"]);
        assert_eq!(job_path("../users/profile"), vec!["jobs", "..%2Fusers%2Fprofile"]);
        assert_eq!(job_path("a/b"), vec!["jobs", "a%2Fb"]);
        assert_eq!(job_path("1?limit=9999"), vec!["jobs", "1%3Flimit=9999"]);
        assert_eq!(job_path("1#frag"), vec!["jobs", "1%23frag"]);
    }

    #[test]
    fn test_job_url_rejects_dot_segments() {
        for id in ["", ".", ".."] {
            assert!(matches!(
                service().job_url(id),
                Err(ApiError::InvalidJobId(_))
            ));
        }
    }

    #[test]
    fn test_request_error_display_embeds_status() {
        let err = ApiError::Request {
            status: 500,
            status_text: "Internal Server Error".to_string(),
        };
        assert_eq!(err.to_string(), "API request failed: 500 Internal Server Error");
    }
}
