//! Caller-facing service and the local/remote routing decision.
//!
//! The deployment decides where compilation happens; the service is built
//! from that decision explicitly instead of sniffing the environment at
//! call time. Behind the facade sits a backend seam so tests can inject
//! their own implementation.

use crate::engine::{CompileOutput, EngineConfig, TexEngine};
use crate::error::CompileError;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// Environment variable naming the remote compile endpoint.
///
/// Read only by [`CompilationMode::from_env`]; nothing else in this crate
/// touches ambient process state.
pub const ENDPOINT_VAR: &str = "GALLEY_COMPILE_URL";

/// Where compilation happens for this deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompilationMode {
    /// Run the compiler on this machine.
    Local,
    /// POST the markup to a remote compile endpoint and receive the PDF.
    Remote { endpoint: String },
}

impl CompilationMode {
    /// Reads [`ENDPOINT_VAR`]: set and non-empty means remote, anything
    /// else means local.
    pub fn from_env() -> Self {
        match std::env::var(ENDPOINT_VAR) {
            Ok(endpoint) if !endpoint.trim().is_empty() => CompilationMode::Remote { endpoint },
            _ => CompilationMode::Local,
        }
    }
}

/// One way of turning markup into PDF bytes.
#[async_trait]
pub trait CompileBackend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn compile(&self, markup: &str) -> Result<Vec<u8>, CompileError>;
}

/// Runs the orchestrator on this machine and reads the artifact into
/// memory. Performs no network activity.
pub struct LocalBackend {
    engine: TexEngine,
}

impl LocalBackend {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            engine: TexEngine::new(config),
        }
    }
}

#[async_trait]
impl CompileBackend for LocalBackend {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn compile(&self, markup: &str) -> Result<Vec<u8>, CompileError> {
        let CompileOutput { workspace, .. } = self.engine.compile_with_fallback(markup).await?;
        let bytes = workspace.read_artifact()?;
        // The bytes are safe in memory; removal is best-effort and off the
        // hot path.
        let _ = tokio::task::spawn_blocking(move || workspace.close());
        Ok(bytes)
    }
}

#[derive(Debug, Serialize)]
struct RemoteCompileRequest<'a> {
    markup: &'a str,
}

/// Delegates compilation to a remote endpoint. Spawns no local process,
/// and never falls back to the local compiler.
pub struct RemoteBackend {
    endpoint: String,
    client: reqwest::Client,
}

impl RemoteBackend {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CompileBackend for RemoteBackend {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn compile(&self, markup: &str) -> Result<Vec<u8>, CompileError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&RemoteCompileRequest { markup })
            .send()
            .await
            .map_err(|err| CompileError::Remote {
                status: err.status().map(|status| status.as_u16()),
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CompileError::Remote {
                status: Some(status.as_u16()),
                message,
            });
        }

        let bytes = response.bytes().await.map_err(|err| CompileError::Remote {
            status: Some(status.as_u16()),
            message: err.to_string(),
        })?;
        Ok(bytes.to_vec())
    }
}

/// Caller-facing facade: markup in, PDF bytes out.
///
/// Cheaply cloneable; concurrent compiles share nothing but the temp
/// directory namespace.
#[derive(Clone)]
pub struct PdfService {
    backend: Arc<dyn CompileBackend>,
}

impl PdfService {
    /// Builds the service for an explicit deployment mode. Local mode
    /// discovers the compiler on `PATH`.
    pub fn new(mode: CompilationMode) -> Self {
        match mode {
            CompilationMode::Local => Self::local(EngineConfig::discover()),
            CompilationMode::Remote { endpoint } => Self::remote(endpoint),
        }
    }

    /// Local compilation with an explicit engine configuration.
    pub fn local(config: EngineConfig) -> Self {
        Self {
            backend: Arc::new(LocalBackend::new(config)),
        }
    }

    /// Remote compilation against the given endpoint.
    pub fn remote(endpoint: impl Into<String>) -> Self {
        Self {
            backend: Arc::new(RemoteBackend::new(endpoint.into())),
        }
    }

    /// Injects a custom backend. Intended for tests.
    pub fn with_backend(backend: Arc<dyn CompileBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Compiles markup to PDF bytes via whichever path this service was
    /// built for. Remote failures surface as-is; there is no cross-path
    /// fallback.
    pub async fn compile_markup(&self, markup: &str) -> Result<Vec<u8>, CompileError> {
        self.backend.compile(markup).await
    }
}
