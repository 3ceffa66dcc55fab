// ABOUTME: Deployment request: target kind, source directory, logical name and caller env vars.
// ABOUTME: Env vars keep caller order and reject duplicate keys.

use crate::types::AppName;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// What gets deployed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeploymentKind {
    Function,
    WebApp,
    ContainerApp,
}

impl DeploymentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeploymentKind::Function => "function",
            DeploymentKind::WebApp => "webapp",
            DeploymentKind::ContainerApp => "containerapp",
        }
    }
}

impl fmt::Display for DeploymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeploymentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "function" | "functionapp" => Ok(DeploymentKind::Function),
            "webapp" | "web-app" => Ok(DeploymentKind::WebApp),
            "containerapp" | "container-app" => Ok(DeploymentKind::ContainerApp),
            other => Err(format!("unknown deployment kind: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvVarError {
    #[error("environment variable name cannot be empty")]
    EmptyKey,

    #[error("duplicate environment variable: {0}")]
    DuplicateKey(String),

    #[error("expected KEY=VALUE, got {0}")]
    MissingSeparator(String),
}

/// Caller environment variables in caller order. Keys are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVars(Vec<(String, String)>);

impl EnvVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from pairs, rejecting empty or repeated keys.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, EnvVarError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut vars = Self::new();
        for (key, value) in pairs {
            vars.push(key, value)?;
        }
        Ok(vars)
    }

    /// Parse `KEY=VALUE` assignments. The value may itself contain `=`.
    pub fn parse_assignments<I, S>(assignments: I) -> Result<Self, EnvVarError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vars = Self::new();
        for assignment in assignments {
            let assignment = assignment.as_ref();
            let (key, value) = assignment
                .split_once('=')
                .ok_or_else(|| EnvVarError::MissingSeparator(assignment.to_string()))?;
            vars.push(key, value)?;
        }
        Ok(vars)
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<(), EnvVarError> {
        let key = key.into();
        if key.is_empty() {
            return Err(EnvVarError::EmptyKey);
        }
        if self.get(&key).is_some() {
            return Err(EnvVarError::DuplicateKey(key));
        }
        self.0.push((key, value.into()));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One deployment attempt. Immutable once built.
#[derive(Debug, Clone)]
pub struct DeploymentRequest {
    kind: DeploymentKind,
    source_directory: PathBuf,
    name: AppName,
    env: EnvVars,
}

impl DeploymentRequest {
    pub fn new(
        kind: DeploymentKind,
        source_directory: impl Into<PathBuf>,
        name: AppName,
        env: EnvVars,
    ) -> Self {
        Self {
            kind,
            source_directory: source_directory.into(),
            name,
            env,
        }
    }

    pub fn kind(&self) -> DeploymentKind {
        self.kind
    }

    pub fn source_directory(&self) -> &Path {
        &self.source_directory
    }

    pub fn name(&self) -> &AppName {
        &self.name
    }

    pub fn env(&self) -> &EnvVars {
        &self.env
    }
}
