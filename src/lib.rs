// ABOUTME: Library root for azdeploy: deployment orchestration for .NET projects on Azure.
// ABOUTME: The CLI binary is in main.rs.

pub mod azure;
pub mod build;
pub mod config;
pub mod deploy;
pub mod error;
pub mod image;
pub mod output;
pub mod package;
pub mod process;
pub mod readiness;
pub mod types;
