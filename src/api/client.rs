use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::{Build, Dashboard, Hook, Log, Platform, Step};

/// Pagination options shared by every list endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageOpts {
    pub page: i64,
    pub per_page: i64,
}

impl PageOpts {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if self.page > 0 {
            query.push(("page", self.page.to_string()));
        }
        if self.per_page > 0 {
            query.push(("per_page", self.per_page.to_string()));
        }
        query
    }
}

/// Filters for the build list endpoint.
#[derive(Debug, Clone, Default)]
pub struct BuildListOpts {
    pub page: PageOpts,
    pub event: Option<String>,
    pub status: Option<String>,
    pub branch: Option<String>,
    /// Only builds created before this unix timestamp.
    pub before: Option<i64>,
    /// Only builds created after this unix timestamp.
    pub after: Option<i64>,
}

impl BuildListOpts {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = self.page.query();
        if let Some(event) = &self.event {
            query.push(("event", event.clone()));
        }
        if let Some(status) = &self.status {
            query.push(("status", status.clone()));
        }
        if let Some(branch) = &self.branch {
            query.push(("branch", branch.clone()));
        }
        if let Some(before) = self.before {
            query.push(("before", before.to_string()));
        }
        if let Some(after) = self.after {
            query.push(("after", after.to_string()));
        }
        query
    }
}

/// HTTP client for the CI server API.
///
/// One typed method per endpoint; every call is a single request with no
/// retries. Errors carry the server's `message` field when one is present.
#[derive(Clone)]
pub struct CiClient {
    client: Client,
    base_url: String,
    token: String,
}

impl CiClient {
    pub fn new(address: &str, token: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        // Normalize the base URL (remove trailing slash)
        let base_url = address.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            token: token.to_string(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/api/v1/{}", self.base_url, path);
        debug!(%method, %url, "api request");
        self.client.request(method, url).bearer_auth(&self.token)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .context("Failed to send request to the CI server")?;

        let status = response.status();
        if !status.is_success() {
            return Err(extract_api_error(response).await);
        }

        response
            .json::<T>()
            .await
            .context("Failed to parse CI server response")
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T> {
        self.send(self.request(Method::GET, path).query(query)).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let mut request = self.request(Method::POST, path);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request).await
    }

    async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.request(Method::DELETE, path)).await
    }

    // builds

    pub async fn get_builds(&self, org: &str, repo: &str, opts: &BuildListOpts) -> Result<Vec<Build>> {
        self.get(&format!("repos/{org}/{repo}/builds"), &opts.query())
            .await
    }

    pub async fn get_build(&self, org: &str, repo: &str, number: i64) -> Result<Build> {
        self.get(&format!("repos/{org}/{repo}/builds/{number}"), &[])
            .await
    }

    pub async fn restart_build(&self, org: &str, repo: &str, number: i64) -> Result<Build> {
        self.post::<(), _>(&format!("repos/{org}/{repo}/builds/{number}"), None)
            .await
    }

    pub async fn cancel_build(&self, org: &str, repo: &str, number: i64) -> Result<Build> {
        self.delete(&format!("repos/{org}/{repo}/builds/{number}/cancel"))
            .await
    }

    pub async fn approve_build(&self, org: &str, repo: &str, number: i64) -> Result<Build> {
        self.post::<(), _>(&format!("repos/{org}/{repo}/builds/{number}/approve"), None)
            .await
    }

    // hooks

    pub async fn get_hooks(&self, org: &str, repo: &str, page: &PageOpts) -> Result<Vec<Hook>> {
        self.get(&format!("hooks/{org}/{repo}"), &page.query()).await
    }

    pub async fn get_hook(&self, org: &str, repo: &str, number: i64) -> Result<Hook> {
        self.get(&format!("hooks/{org}/{repo}/{number}"), &[]).await
    }

    // steps

    pub async fn get_steps(
        &self,
        org: &str,
        repo: &str,
        build: i64,
        page: &PageOpts,
    ) -> Result<Vec<Step>> {
        self.get(&format!("repos/{org}/{repo}/builds/{build}/steps"), &page.query())
            .await
    }

    pub async fn get_step(&self, org: &str, repo: &str, build: i64, step: i64) -> Result<Step> {
        self.get(&format!("repos/{org}/{repo}/builds/{build}/steps/{step}"), &[])
            .await
    }

    // logs

    pub async fn get_build_logs(&self, org: &str, repo: &str, build: i64) -> Result<Vec<Log>> {
        self.get(&format!("repos/{org}/{repo}/builds/{build}/logs"), &[])
            .await
    }

    pub async fn get_step_log(&self, org: &str, repo: &str, build: i64, step: i64) -> Result<Log> {
        self.get(
            &format!("repos/{org}/{repo}/builds/{build}/steps/{step}/logs"),
            &[],
        )
        .await
    }

    // dashboards

    pub async fn add_dashboard(&self, dashboard: &Dashboard) -> Result<Dashboard> {
        self.post("dashboards", Some(dashboard)).await
    }

    pub async fn get_dashboards(&self) -> Result<Vec<Dashboard>> {
        self.get("user/dashboards", &[]).await
    }

    pub async fn get_dashboard(&self, id: &str) -> Result<Dashboard> {
        self.get(&format!("dashboards/{id}"), &[]).await
    }

    pub async fn update_dashboard(&self, dashboard: &Dashboard) -> Result<Dashboard> {
        self.put(&format!("dashboards/{}", dashboard.id), dashboard)
            .await
    }

    // platform settings

    pub async fn get_settings(&self) -> Result<Platform> {
        self.get("admin/settings", &[]).await
    }

    pub async fn update_settings(&self, settings: &Platform) -> Result<Platform> {
        self.put("admin/settings", settings).await
    }
}

async fn extract_api_error(response: reqwest::Response) -> anyhow::Error {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED {
        return anyhow::anyhow!(
            "Authentication failed (401). Check your API token and server address."
        );
    }

    let body = match response.text().await {
        Ok(t) => t,
        Err(e) => {
            return anyhow::anyhow!("CI server API error ({}): failed to read body: {}", status, e);
        }
    };

    // Try to extract clean message from JSON error response
    let error_msg = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|json| {
            json.get("message")
                .and_then(|m| m.as_str())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| format!("CI server API error ({})", status));

    anyhow::anyhow!("{}", error_msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_opts_query_skips_unset() {
        let opts = PageOpts { page: 0, per_page: 0 };
        assert!(opts.query().is_empty());

        let opts = PageOpts { page: 2, per_page: 10 };
        assert_eq!(
            opts.query(),
            vec![("page", "2".to_string()), ("per_page", "10".to_string())]
        );
    }

    #[test]
    fn test_build_list_opts_query() {
        let opts = BuildListOpts {
            page: PageOpts { page: 1, per_page: 0 },
            event: Some("push".to_string()),
            status: None,
            branch: Some("main".to_string()),
            before: None,
            after: Some(1563474078),
        };

        let query = opts.query();
        assert!(query.contains(&("page", "1".to_string())));
        assert!(query.contains(&("event", "push".to_string())));
        assert!(query.contains(&("branch", "main".to_string())));
        assert!(query.contains(&("after", "1563474078".to_string())));
        assert!(!query.iter().any(|(k, _)| *k == "status"));
    }

    #[test]
    fn test_base_url_normalized() {
        let client = CiClient::new("https://ci.example.com/", "token").unwrap();
        assert_eq!(client.base_url, "https://ci.example.com");
    }
}
