// ABOUTME: Container image reference pushed to a registry.
// ABOUTME: Always fully qualified: login-server/repository:tag.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseImageRefError {
    #[error("image reference cannot be empty")]
    Empty,

    #[error("image reference must include a registry: {0}")]
    MissingRegistry(String),

    #[error("invalid character in image reference: {0}")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    registry: String,
    repository: String,
    tag: String,
}

impl ImageRef {
    pub fn new(registry: &str, repository: &str, tag: &str) -> Self {
        Self {
            registry: registry.to_string(),
            repository: repository.to_string(),
            tag: tag.to_string(),
        }
    }

    /// Parse `registry/repository[:tag]`. The tag defaults to `latest`.
    pub fn parse(input: &str) -> Result<Self, ParseImageRefError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseImageRefError::Empty);
        }

        if let Some(c) = input
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && !matches!(c, '/' | ':' | '.' | '-' | '_'))
        {
            return Err(ParseImageRefError::InvalidChar(c));
        }

        let (registry, rest) = input
            .split_once('/')
            .ok_or_else(|| ParseImageRefError::MissingRegistry(input.to_string()))?;

        // A colon after the last slash separates the tag; one before it is a registry port.
        let (repository, tag) = match rest.rsplit_once(':') {
            Some((repo, tag)) if !tag.contains('/') => (repo, tag),
            _ => (rest, "latest"),
        };

        Ok(Self::new(registry, repository, tag))
    }

    pub fn registry(&self) -> &str {
        &self.registry
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.registry, self.repository, self.tag)
    }
}
