use std::time::Duration;

use ising_core::{ErrorInfo, IsingError};

/// Environment variable holding the API token.
pub const ENV_TOKEN: &str = "DWAVE_API_TOKEN";
/// Environment variable overriding the API endpoint.
pub const ENV_ENDPOINT: &str = "DWAVE_API_ENDPOINT";
/// Environment variable selecting a solver by id.
pub const ENV_SOLVER: &str = "DWAVE_API_SOLVER";

/// Default solver API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://cloud.dwavesys.com/sapi/";

/// Connection settings for the solver API.
#[derive(Clone)]
pub struct SapiConfig {
    /// Base URL, always ending in `/`.
    pub endpoint: String,
    /// API token sent as `X-Auth-Token`.
    pub token: String,
    /// Solver id; the first online QPU solver is used when unset.
    pub solver: Option<String>,
    /// Timeout applied to each HTTP request.
    pub request_timeout: Duration,
    /// Delay between status polls of a submitted problem.
    pub poll_interval: Duration,
    /// Upper bound on total polling time; unbounded when unset.
    pub max_wait: Option<Duration>,
}

impl std::fmt::Debug for SapiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SapiConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &"<redacted>")
            .field("solver", &self.solver)
            .field("request_timeout", &self.request_timeout)
            .field("poll_interval", &self.poll_interval)
            .field("max_wait", &self.max_wait)
            .finish()
    }
}

impl SapiConfig {
    /// Settings for `token` against the default endpoint.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: token.into(),
            solver: None,
            request_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_secs(1),
            max_wait: None,
        }
    }

    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, IsingError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, IsingError> {
        let token = lookup(ENV_TOKEN)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                IsingError::Config(
                    ErrorInfo::new("missing-token", "no solver API token configured")
                        .with_context("variable", ENV_TOKEN)
                        .with_hint(format!("export {ENV_TOKEN}=<token>")),
                )
            })?;
        let mut config = Self::new(token.trim());
        if let Some(endpoint) = lookup(ENV_ENDPOINT).filter(|value| !value.trim().is_empty()) {
            config = config.with_endpoint(endpoint.trim());
        }
        config.solver = lookup(ENV_SOLVER).filter(|value| !value.trim().is_empty());
        Ok(config)
    }

    /// Replaces the endpoint, normalising the trailing slash.
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        let mut endpoint = endpoint.to_string();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        self.endpoint = endpoint;
        self
    }

    /// Selects a solver by id.
    pub fn with_solver(mut self, solver: impl Into<String>) -> Self {
        self.solver = Some(solver.into());
        self
    }

    /// Sets the polling cadence and optional wait bound.
    pub fn with_polling(mut self, interval: Duration, max_wait: Option<Duration>) -> Self {
        self.poll_interval = interval;
        self.max_wait = max_wait;
        self
    }
}
