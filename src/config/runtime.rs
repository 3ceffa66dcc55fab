// ABOUTME: Runtime stack settings applied to created compute resources.
// ABOUTME: Feeds the system app settings and the site's linuxFxVersion.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default = "default_worker_runtime")]
    pub functions_worker_runtime: String,

    #[serde(default = "default_extension_version")]
    pub functions_extension_version: String,

    #[serde(default = "default_function_stack")]
    pub function_linux_fx_version: String,

    #[serde(default = "default_web_app_stack")]
    pub web_app_linux_fx_version: String,

    /// Port the container listens on; ingress targets it.
    #[serde(default = "default_container_port")]
    pub container_port: u16,
}

fn default_worker_runtime() -> String {
    "dotnet-isolated".to_string()
}

fn default_extension_version() -> String {
    "~4".to_string()
}

fn default_function_stack() -> String {
    "DOTNET-ISOLATED|8.0".to_string()
}

fn default_web_app_stack() -> String {
    "DOTNETCORE|8.0".to_string()
}

fn default_container_port() -> u16 {
    8080
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            functions_worker_runtime: default_worker_runtime(),
            functions_extension_version: default_extension_version(),
            function_linux_fx_version: default_function_stack(),
            web_app_linux_fx_version: default_web_app_stack(),
            container_port: default_container_port(),
        }
    }
}
