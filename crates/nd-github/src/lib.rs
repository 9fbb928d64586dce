//! GitHub contents-API sink.
//!
//! Persists rendered Markdown (and re-hosted images) as files in a GitHub
//! repository via the REST contents endpoint. Each `put` is one commit:
//! the sink looks up the existing blob SHA first and issues a create or an
//! update accordingly, so revision history accumulates on the target
//! branch.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde_json::{Value, json};
use tracing::{debug, info};
use ureq::Agent;

use nd_storage::{ErrorStatus, Sink, SinkError, SinkErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "GitHub";

/// GitHub REST API root.
const API_BASE: &str = "https://api.github.com";

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Characters escaped inside a URL path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Sink backed by the GitHub contents API.
pub struct GithubSink {
    agent: Agent,
    base_url: String,
    /// Repository in `owner/name` form.
    repo: String,
    branch: String,
    token: String,
}

impl GithubSink {
    /// Create a sink for `owner/name` on the given branch.
    #[must_use]
    pub fn new(repo: impl Into<String>, branch: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_base_url(API_BASE, repo, branch, token)
    }

    /// Create a sink against a custom API root (used by tests).
    #[must_use]
    pub fn with_base_url(
        base_url: &str,
        repo: impl Into<String>,
        branch: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            repo: repo.into(),
            branch: branch.into(),
            token: token.into(),
        }
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/contents/{}",
            self.base_url,
            self.repo,
            encode_path(path)
        )
    }

    /// Look up the blob SHA of an existing file, `None` when absent.
    fn get_sha(&self, path: &str) -> Result<Option<String>, SinkError> {
        let url = format!("{}?ref={}", self.contents_url(path), self.branch);
        let response = self
            .agent
            .get(&url)
            .header("Authorization", &format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "notedown")
            .call()
            .map_err(|e| transport_error(e, path))?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        match status {
            200 => {
                let value: Value = body.read_json().map_err(|e| transport_error(e, path))?;
                Ok(value
                    .get("sha")
                    .and_then(Value::as_str)
                    .map(str::to_owned))
            }
            404 => Ok(None),
            _ => Err(status_error(status, &read_body(&mut body), path)),
        }
    }

    fn upload(&self, path: &str, data: &[u8], message: &str) -> Result<(), SinkError> {
        let sha = self.get_sha(path)?;
        let mut payload = json!({
            "message": message,
            "content": BASE64.encode(data),
            "branch": self.branch,
        });
        if let Some(sha) = &sha {
            debug!("updating existing file {path} (sha {sha})");
            payload["sha"] = json!(sha);
        } else {
            debug!("creating new file {path}");
        }

        let response = self
            .agent
            .put(&self.contents_url(path))
            .header("Authorization", &format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "notedown")
            .send_json(&payload)
            .map_err(|e| transport_error(e, path))?;

        let status = response.status().as_u16();
        let mut body = response.into_body();
        if status >= 400 {
            return Err(status_error(status, &read_body(&mut body), path));
        }

        info!("committed {path} to {}@{}", self.repo, self.branch);
        Ok(())
    }
}

impl Sink for GithubSink {
    fn put(&self, path: &str, content: &str, message: &str) -> Result<(), SinkError> {
        self.upload(path, content.as_bytes(), message)
    }

    fn put_binary(&self, path: &str, data: &[u8], message: &str) -> Result<(), SinkError> {
        self.upload(path, data, message)
    }

    fn exists(&self, path: &str) -> bool {
        matches!(self.get_sha(path), Ok(Some(_)))
    }

    fn name(&self) -> &'static str {
        BACKEND
    }
}

/// Encode a relative path for use in a URL, segment by segment.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

fn transport_error(err: ureq::Error, path: &str) -> SinkError {
    SinkError::new(SinkErrorKind::Unavailable)
        .with_status(ErrorStatus::Temporary)
        .with_backend(BACKEND)
        .with_path(path)
        .with_source(err)
}

fn read_body(body: &mut ureq::Body) -> String {
    body.read_to_string()
        .unwrap_or_else(|_| "(unable to read error body)".to_owned())
}

fn status_error(status: u16, text: &str, path: &str) -> SinkError {
    let (kind, retry) = match status {
        401 | 403 => (SinkErrorKind::PermissionDenied, ErrorStatus::Permanent),
        404 => (SinkErrorKind::NotFound, ErrorStatus::Permanent),
        409 => (SinkErrorKind::Conflict, ErrorStatus::Temporary),
        429 => (SinkErrorKind::RateLimited, ErrorStatus::Persistent),
        500..=599 => (SinkErrorKind::Unavailable, ErrorStatus::Persistent),
        _ => (SinkErrorKind::Other, ErrorStatus::Permanent),
    };
    SinkError::new(kind)
        .with_status(retry)
        .with_backend(BACKEND)
        .with_path(path)
        .with_source(std::io::Error::other(format!("HTTP {status}: {text}")))
}
