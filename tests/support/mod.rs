// ABOUTME: Test support utilities.
// ABOUTME: Provides a fake management API and fake build/container toolchains.

use std::sync::Once;

// Each test binary only uses some of these modules, so allow dead_code.
#[allow(dead_code)]
pub mod fake_azure;
#[allow(dead_code)]
pub mod toolchain;

#[allow(unused_imports)]
pub use fake_azure::FakeAzure;
#[allow(unused_imports)]
pub use toolchain::FakeToolchain;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("azdeploy=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Configuration pointing every endpoint at `azure` and every tool at `tools`,
/// with intervals short enough for tests.
#[allow(dead_code)]
pub fn test_config(azure: &FakeAzure, tools: &FakeToolchain) -> azdeploy::config::Config {
    use azdeploy::config::{
        Config, CredentialsConfig, EndpointsConfig, EnvValue, ReadinessConfig, ToolchainConfig,
    };
    use std::time::Duration;

    Config {
        subscription_id: EnvValue::from("sub-0001"),
        credentials: CredentialsConfig {
            tenant_id: EnvValue::from(fake_azure::TENANT),
            client_id: EnvValue::from("client"),
            client_secret: EnvValue::from("secret"),
            access_token: None,
        },
        endpoints: EndpointsConfig {
            management: azure.uri(),
            authority: azure.uri(),
            site_scheme: "http".into(),
            poll_interval: Duration::from_millis(10),
            operation_timeout: Duration::from_secs(5),
        },
        readiness: ReadinessConfig {
            timeout: Duration::from_secs(3),
            interval: Duration::from_millis(50),
            probe_timeout: Duration::from_secs(1),
            path: "/".into(),
        },
        toolchain: ToolchainConfig {
            dotnet: Some(tools.dotnet.clone()),
            docker: tools.docker.clone(),
            configuration: "Release".into(),
        },
        ..Config::template()
    }
}
