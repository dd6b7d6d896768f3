//! Blocking HTTP client for the solver API.

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use ising_core::{ErrorInfo, IsingError};

use crate::config::{SapiConfig, ENV_TOKEN};
use crate::wire::{ProblemStatus, ProblemSubmission, QpAnswer, SolverInfo};

/// Thin wrapper over the solver API's REST resources.
#[derive(Debug, Clone)]
pub struct SapiClient {
    http: Client,
    endpoint: String,
}

impl SapiClient {
    /// Builds a client carrying the token on every request.
    pub fn new(config: &SapiConfig) -> Result<Self, IsingError> {
        let mut headers = HeaderMap::new();
        let mut token = HeaderValue::from_str(&config.token).map_err(|err| {
            IsingError::Config(
                ErrorInfo::new("invalid-token", err.to_string())
                    .with_context("variable", ENV_TOKEN),
            )
        })?;
        token.set_sensitive(true);
        headers.insert("X-Auth-Token", token);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .user_agent(concat!("ising-qpu/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| transport_error("client-build", &err))?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Absolute URL of an API resource.
    pub fn url(&self, path: &str) -> String {
        join_url(&self.endpoint, path)
    }

    /// Lists every solver visible to the token.
    pub fn list_solvers(&self) -> Result<Vec<SolverInfo>, IsingError> {
        self.get_json("solvers/remote/")
    }

    /// Fetches one solver by id.
    pub fn get_solver(&self, id: &str) -> Result<SolverInfo, IsingError> {
        self.get_json(&format!("solvers/remote/{id}/"))
    }

    /// Submits a single problem and returns its initial status.
    pub fn submit(&self, problem: &ProblemSubmission) -> Result<ProblemStatus, IsingError> {
        let url = self.url("problems/");
        debug!(%url, solver = %problem.solver, "submitting problem");
        let response = self
            .http
            .post(&url)
            .json(&[problem])
            .send()
            .map_err(|err| transport_error("submit", &err))?;
        let mut statuses: Vec<ProblemStatus> = read_json(check_status(response, &url)?, &url)?;
        if statuses.is_empty() {
            return Err(IsingError::Remote(
                ErrorInfo::new("empty-submit-response", "service returned no problem status")
                    .with_context("url", url),
            ));
        }
        Ok(statuses.swap_remove(0))
    }

    /// Current status of a problem, including the answer once completed.
    pub fn problem_status(&self, id: &str) -> Result<ProblemStatus, IsingError> {
        self.get_json(&format!("problems/{id}/"))
    }

    /// Answer of a completed problem.
    pub fn answer(&self, id: &str) -> Result<QpAnswer, IsingError> {
        #[derive(serde::Deserialize)]
        struct AnswerEnvelope {
            answer: QpAnswer,
        }
        let envelope: AnswerEnvelope = self.get_json(&format!("problems/{id}/answer/"))?;
        Ok(envelope.answer)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, IsingError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|err| transport_error("request", &err))?;
        read_json(check_status(response, &url)?, &url)
    }
}

/// Joins a base endpoint and a relative resource path with exactly one `/`.
pub fn join_url(endpoint: &str, path: &str) -> String {
    format!(
        "{}/{}",
        endpoint.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn check_status(response: Response, url: &str) -> Result<Response, IsingError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    let mut info = ErrorInfo::new("http-status", format!("solver API returned {status}"))
        .with_context("url", url)
        .with_context("status", status.as_u16().to_string());
    if !body.is_empty() {
        info = info.with_context("body", body);
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        info = info.with_hint(format!("check the token in {ENV_TOKEN}"));
    }
    Err(IsingError::Remote(info))
}

fn read_json<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, IsingError> {
    response.json::<T>().map_err(|err| {
        IsingError::Serde(
            ErrorInfo::new("response-decode", err.to_string()).with_context("url", url),
        )
    })
}

fn transport_error(code: &str, err: &reqwest::Error) -> IsingError {
    let mut info = ErrorInfo::new(code, err.to_string());
    if let Some(url) = err.url() {
        info = info.with_context("url", url.as_str());
    }
    if err.is_timeout() {
        info = info.with_hint("the request timed out; retry or raise the request timeout");
    }
    IsingError::Remote(info)
}
