// Hand-crafted async HTTP client for the GitHub REST API (2022-11-28).
//
// Auth: `Authorization: Bearer <token>` (optional -- anonymous works
// with a much lower rate limit). All list endpoints paginate with
// `per_page`/`page` query parameters; the client resolves pagination
// internally and returns complete results in one logical call.

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::types::{ErrorResponse, PullRequest, Repository};

const PER_PAGE: usize = 100;
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("hubstat/", env!("CARGO_PKG_VERSION"));

/// Async client for the GitHub REST API, scoped to repository statistics.
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: Url,
}

impl GitHubClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client against `base_url` (normally `https://api.github.com`).
    ///
    /// Injects `Accept`, `X-GitHub-Api-Version`, and `User-Agent` as
    /// default headers, plus a sensitive `Authorization` header when a
    /// token is given.
    pub fn new(base_url: &str, token: Option<&secrecy::SecretString>) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));

        if let Some(token) = token {
            let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| Error::Authentication {
                    message: format!("invalid token header value: {e}"),
                })?;
            auth.set_sensitive(true);
            headers.insert(reqwest::header::AUTHORIZATION, auth);
        }

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Self::with_client(http, base_url)
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, Error> {
        let mut base_url = Url::parse(base_url)?;

        // A trailing slash keeps Url::join from eating the last path segment.
        let path = base_url.path().trim_end_matches('/').to_owned();
        base_url.set_path(&format!("{path}/"));

        Ok(Self { http, base_url })
    }

    // ── Repository operations ────────────────────────────────────────

    /// Every repository owned by `user`, across all pages.
    pub async fn list_user_repos(&self, user: &str) -> Result<Vec<Repository>, Error> {
        self.get_all_pages(&format!("users/{user}/repos")).await
    }

    /// A single repository lookup.
    pub async fn get_repo(&self, owner: &str, name: &str) -> Result<Repository, Error> {
        let url = self.url(&format!("repos/{owner}/{name}"))?;
        debug!(%url, "GET repository");

        let resp = self.http.get(url).send().await?;
        handle_response(resp).await
    }

    /// Number of open pull requests for a repository, summed across
    /// all pages of the listing.
    pub async fn open_pull_request_count(&self, owner: &str, name: &str) -> Result<u64, Error> {
        let pulls: Vec<PullRequest> = self
            .get_all_pages(&format!("repos/{owner}/{name}/pulls"))
            .await?;
        Ok(u64::try_from(pulls.len()).unwrap_or(u64::MAX))
    }

    // ── Internals ────────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    /// Fetch every page of a list endpoint. A page shorter than
    /// `PER_PAGE` marks the end of the listing.
    async fn get_all_pages<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, Error> {
        let url = self.url(path)?;
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            debug!(%url, page, "GET page");
            let resp = self
                .http
                .get(url.clone())
                .query(&[("per_page", PER_PAGE.to_string()), ("page", page.to_string())])
                .send()
                .await?;

            let batch: Vec<T> = handle_response(resp).await?;
            let last = batch.len() < PER_PAGE;
            items.extend(batch);

            if last {
                return Ok(items);
            }
            page += 1;
        }
    }
}

/// Map a response to the decoded body or the appropriate `Error`.
async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();

    if status.is_success() {
        let body = resp.text().await?;
        return serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        });
    }

    let rate_limit_reset = rate_limit_reset(&resp);
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or_else(|| status.to_string());

    match status {
        StatusCode::UNAUTHORIZED => Err(Error::Authentication { message }),
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => match rate_limit_reset {
            Some(reset) => Err(Error::RateLimited { reset }),
            None => Err(Error::Api {
                status: status.as_u16(),
                message,
            }),
        },
        _ => Err(Error::Api {
            status: status.as_u16(),
            message,
        }),
    }
}

/// Reset time from the rate-limit headers, but only when the limit is
/// actually exhausted -- GitHub sends the headers on every response.
fn rate_limit_reset(resp: &reqwest::Response) -> Option<u64> {
    let remaining = resp
        .headers()
        .get("x-ratelimit-remaining")?
        .to_str()
        .ok()?;
    if remaining != "0" {
        return None;
    }
    resp.headers()
        .get("x-ratelimit-reset")?
        .to_str()
        .ok()?
        .parse()
        .ok()
}
