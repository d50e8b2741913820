use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use url::Url;

use super::{MarkdownMode, RepoFile, RepoInfo, SourceControl, SourceControlError};

const DEFAULT_API_URL: &str = "https://api.github.com";
const LICENSES_PREVIEW: &str = "application/vnd.github.drax-preview+json";

#[derive(Debug, Deserialize)]
struct RepositoryBody {
    id: i64,
    full_name: String,
    #[serde(default)]
    permissions: Option<PermissionsBody>,
}

#[derive(Debug, Deserialize)]
struct PermissionsBody {
    #[serde(default)]
    admin: bool,
}

#[derive(Debug, Deserialize)]
struct ContentBody {
    path: String,
    download_url: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LicenseBody {
    key: String,
}

/// GitHub REST API client
#[derive(Debug, Clone)]
pub struct GitHubClient {
    api_url: Url,
    client: Client,
    markdown: MarkdownMode,
}

impl GitHubClient {
    pub fn new(api_url: Option<&Url>, markdown: MarkdownMode) -> Result<Self, SourceControlError> {
        let api_url = match api_url {
            Some(url) => url.clone(),
            None => Url::parse(DEFAULT_API_URL)?,
        };

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static("poggit"));
        default_headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        let client = Client::builder().default_headers(default_headers).build()?;

        Ok(Self {
            api_url,
            client,
            markdown,
        })
    }

    fn get(&self, path: &str, token: &str) -> Result<RequestBuilder, SourceControlError> {
        let url = self.api_url.join(path)?;
        Ok(self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("token {}", token)))
    }

    async fn check(response: Response) -> Result<Response, SourceControlError> {
        if response.status().is_success() {
            return Ok(response);
        }
        Err(SourceControlError::HttpStatus(
            response.status(),
            response.text().await?,
        ))
    }
}

#[async_trait::async_trait]
impl SourceControl for GitHubClient {
    async fn repository(&self, repo_id: i64, token: &str) -> Result<RepoInfo, SourceControlError> {
        let response = self
            .get(&format!("repositories/{}", repo_id), token)?
            .send()
            .await?;
        let body: RepositoryBody = Self::check(response).await?.json().await?;

        Ok(RepoInfo {
            id: body.id,
            full_name: body.full_name,
            admin: body.permissions.map(|p| p.admin).unwrap_or(false),
        })
    }

    async fn file_at(
        &self,
        repo_full_name: &str,
        path: &str,
        sha: &str,
        token: &str,
    ) -> Result<RepoFile, SourceControlError> {
        let response = self
            .get(&format!("repos/{}/contents/{}", repo_full_name, path), token)?
            .query(&[("ref", sha)])
            .send()
            .await?;
        let body: ContentBody = Self::check(response).await?.json().await?;

        // directories come back without content
        let encoded = body
            .content
            .ok_or_else(|| SourceControlError::NotFound(path.to_string()))?;
        let compact: String = encoded.split_whitespace().collect();
        let content = base64::engine::general_purpose::STANDARD.decode(compact)?;

        Ok(RepoFile {
            path: body.path,
            download_url: body.download_url,
            content,
        })
    }

    async fn license_keys(&self, token: &str) -> Result<Vec<String>, SourceControlError> {
        let response = self
            .get("licenses", token)?
            .header(ACCEPT, LICENSES_PREVIEW)
            .send()
            .await?;
        let body: Vec<LicenseBody> = Self::check(response).await?.json().await?;
        Ok(body.into_iter().map(|l| l.key).collect())
    }

    async fn render_markdown(
        &self,
        text: &str,
        context: &str,
        token: &str,
    ) -> Result<String, SourceControlError> {
        if self.markdown == MarkdownMode::Local {
            return Ok(super::render_gfm(text));
        }

        let url = self.api_url.join("markdown")?;
        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, format!("token {}", token))
            .json(&serde_json::json!({
                "text": text,
                "mode": "gfm",
                "context": context,
            }))
            .send()
            .await?;
        Ok(Self::check(response).await?.text().await?)
    }
}
