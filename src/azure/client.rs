// ABOUTME: Resource-management API client implementing the provider capability traits.
// ABOUTME: Handles bearer auth, error normalization and long-running operation polling.

use super::traits::sealed::Sealed;
use super::traits::{ContainerAppOps, RegistryOps, ResourceGroupOps, StorageOps, WebSiteOps};
use super::{
    AppServicePlan, ArmError, ContainerApp, ContainerAppSpec, Credentials, ManagedEnvironment,
    PlanSku, Registry, ResourceGroupHandle, Site, SiteSpec, StorageAccount, TokenSource,
};
use crate::config::{Config, EndpointsConfig};
use crate::error::{Error, Result as AppResult};
use crate::image::RegistryCredentials;
use crate::types::{ImageRef, ResourceGroupName};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, LOCATION};
use reqwest::{Method, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::{Duration, Instant};

const GROUPS_API: &str = "2021-04-01";
const STORAGE_API: &str = "2023-01-01";
const WEB_API: &str = "2022-09-01";
const REGISTRY_API: &str = "2023-07-01";
const CONTAINER_APPS_API: &str = "2023-05-01";

const ASYNC_OPERATION: &str = "azure-asyncoperation";
const REGISTRY_SECRET: &str = "registry-password";

/// Client for one subscription and location.
#[derive(Debug)]
pub struct ArmClient {
    http: reqwest::Client,
    tokens: TokenSource,
    management: String,
    subscription_id: String,
    location: String,
    site_scheme: String,
    poll_interval: Duration,
    operation_timeout: Duration,
}

impl ArmClient {
    pub fn new(
        subscription_id: &str,
        location: &str,
        credentials: Credentials,
        endpoints: &EndpointsConfig,
    ) -> Result<Self, ArmError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("azdeploy/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let management = endpoints.management.trim_end_matches('/').to_string();
        let tokens = TokenSource::new(
            http.clone(),
            &endpoints.authority,
            &management,
            credentials,
        );

        Ok(Self {
            http,
            tokens,
            management,
            subscription_id: subscription_id.to_string(),
            location: location.to_string(),
            site_scheme: endpoints.site_scheme.clone(),
            poll_interval: endpoints.poll_interval,
            operation_timeout: endpoints.operation_timeout,
        })
    }

    /// Build a client from configuration, resolving environment references.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let credentials = config.credentials.resolve()?;
        let subscription_id = config.subscription_id()?;
        Self::new(
            &subscription_id,
            &config.location,
            credentials,
            &config.endpoints,
        )
        .map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    // =========================================================================
    // URLs
    // =========================================================================

    fn groups_url(&self) -> String {
        format!(
            "{}/subscriptions/{}/resourcegroups",
            self.management, self.subscription_id
        )
    }

    fn group_url(&self, group: &ResourceGroupName) -> String {
        format!("{}/{}", self.groups_url(), group)
    }

    fn resource_url(&self, group: &ResourceGroupName, provider_path: &str) -> String {
        format!("{}/providers/{}", self.group_url(group), provider_path)
    }

    fn public_url(&self, host: &str) -> String {
        format!("{}://{}", self.site_scheme, host)
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    async fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Response, ArmError> {
        let token = self.tokens.token().await?;
        tracing::debug!(method = %method, url = %url, "management request");

        let mut request = self.http.request(method, url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    async fn call(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        operation: &str,
    ) -> Result<Response, ArmError> {
        let response = self.send(method, url, body).await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(rejection(response, operation).await)
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, operation: &str) -> Result<T, ArmError> {
        let response = self.call(Method::GET, url, None, operation).await?;
        decode(response, operation).await
    }

    async fn post_json<T: DeserializeOwned>(&self, url: &str, operation: &str) -> Result<T, ArmError> {
        let response = self.call(Method::POST, url, None, operation).await?;
        decode(response, operation).await
    }

    /// PUT a resource, wait for provisioning to finish, then read it back.
    async fn put_resource<T: DeserializeOwned>(
        &self,
        url: &str,
        body: Value,
        operation: &str,
    ) -> Result<T, ArmError> {
        let response = self.call(Method::PUT, url, Some(&body), operation).await?;
        let pending = PendingOperation::from_headers(response.status(), response.headers());
        drop(response);

        self.wait_for(pending, operation).await?;
        self.get_json(url, operation).await
    }

    async fn wait_for(&self, pending: PendingOperation, operation: &str) -> Result<(), ArmError> {
        let started = Instant::now();
        match pending {
            PendingOperation::Done => Ok(()),
            PendingOperation::AsyncOperation(url) => loop {
                let OperationStatus { status, error } = self.get_json(&url, operation).await?;
                match status.as_str() {
                    "Succeeded" => return Ok(()),
                    "Failed" | "Canceled" => {
                        return Err(ArmError::OperationFailed {
                            operation: operation.to_string(),
                            status: status.clone(),
                            message: error.map(|e| e.message).unwrap_or_default(),
                        });
                    }
                    other => tracing::debug!(operation, status = other, "operation in progress"),
                }
                self.pause(started, operation).await?;
            },
            PendingOperation::Location(url) => loop {
                let response = self.call(Method::GET, &url, None, operation).await?;
                if response.status() != StatusCode::ACCEPTED {
                    return Ok(());
                }
                tracing::debug!(operation, "operation in progress");
                self.pause(started, operation).await?;
            },
        }
    }

    async fn pause(&self, started: Instant, operation: &str) -> Result<(), ArmError> {
        let elapsed = started.elapsed();
        if elapsed >= self.operation_timeout {
            return Err(ArmError::OperationTimedOut {
                operation: operation.to_string(),
                elapsed,
            });
        }
        tokio::time::sleep(self.poll_interval).await;
        Ok(())
    }
}

impl Sealed for ArmClient {}

// =============================================================================
// Wire shapes
// =============================================================================

#[derive(Debug)]
enum PendingOperation {
    Done,
    AsyncOperation(String),
    Location(String),
}

impl PendingOperation {
    fn from_headers(status: StatusCode, headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        if let Some(url) = header(ASYNC_OPERATION) {
            PendingOperation::AsyncOperation(url)
        } else if status == StatusCode::ACCEPTED
            && let Some(url) = header(LOCATION.as_str())
        {
            PendingOperation::Location(url)
        } else {
            PendingOperation::Done
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct OperationStatus {
    status: String,
    #[serde(default)]
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
    #[serde(default)]
    next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroupResource {
    name: String,
    location: String,
}

#[derive(Debug, Deserialize)]
struct IdResource {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct StorageKeys {
    keys: Vec<StorageKey>,
}

#[derive(Debug, Deserialize)]
struct StorageKey {
    value: String,
}

#[derive(Debug, Deserialize)]
struct SiteResource {
    name: String,
    properties: SiteProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SiteProperties {
    default_host_name: String,
    #[serde(default)]
    host_name_ssl_states: Vec<HostNameState>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HostNameState {
    name: String,
    #[serde(default)]
    host_type: String,
}

#[derive(Debug, Deserialize)]
struct RegistryResource {
    name: String,
    properties: RegistryProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistryProperties {
    login_server: String,
}

#[derive(Debug, Deserialize)]
struct RegistryCredentialsResponse {
    username: String,
    passwords: Vec<RegistryPassword>,
}

#[derive(Debug, Deserialize)]
struct RegistryPassword {
    value: String,
}

#[derive(Debug, Deserialize)]
struct ContainerAppResource {
    name: String,
    properties: ContainerAppProperties,
}

#[derive(Debug, Deserialize)]
struct ContainerAppProperties {
    configuration: ContainerAppConfiguration,
    #[serde(default)]
    template: Option<ContainerTemplate>,
}

#[derive(Debug, Deserialize)]
struct ContainerTemplate {
    #[serde(default)]
    containers: Vec<ContainerDefinition>,
}

#[derive(Debug, Deserialize)]
struct ContainerDefinition {
    image: String,
}

#[derive(Debug, Deserialize)]
struct ContainerAppConfiguration {
    ingress: Ingress,
}

#[derive(Debug, Deserialize)]
struct Ingress {
    fqdn: String,
}

async fn rejection(response: Response, operation: &str) -> ArmError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorResponse>(&body)
        .map(|r| r.error)
        .unwrap_or_else(|_| ErrorDetail {
            code: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message: body,
        });

    if is_auth_failure(status) {
        return ArmError::Authentication {
            message: format!("{operation}: {} {}", detail.code, detail.message),
        };
    }

    ArmError::Rejected {
        operation: operation.to_string(),
        status: status.as_u16(),
        code: detail.code,
        message: detail.message,
    }
}

async fn decode<T: DeserializeOwned>(response: Response, operation: &str) -> Result<T, ArmError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ArmError::Decode {
        operation: operation.to_string(),
        message: e.to_string(),
    })
}

fn is_auth_failure(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

fn with_api(url: &str, api_version: &str) -> String {
    format!("{url}?api-version={api_version}")
}

/// The app must report the image that was pushed. Responses without a
/// template are accepted.
fn check_running_image(app: &ContainerAppResource, pushed: &ImageRef) -> Result<(), ArmError> {
    const OPERATION: &str = "create container app";
    let Some(container) = app
        .properties
        .template
        .as_ref()
        .and_then(|t| t.containers.first())
    else {
        return Ok(());
    };

    let running = ImageRef::parse(&container.image).map_err(|e| ArmError::Decode {
        operation: OPERATION.to_string(),
        message: e.to_string(),
    })?;
    if &running != pushed {
        return Err(ArmError::OperationFailed {
            operation: OPERATION.to_string(),
            status: "ImageMismatch".to_string(),
            message: format!("app runs {running}, expected {pushed}"),
        });
    }
    Ok(())
}

fn storage_connection_string(account: &str, key: &str) -> String {
    format!(
        "DefaultEndpointsProtocol=https;AccountName={account};AccountKey={key};EndpointSuffix=core.windows.net"
    )
}

/// The SCM host is listed with host type `Repository`; older responses
/// omit it, in which case it follows the `<site>.scm.<domain>` convention.
fn scm_host(properties: &SiteProperties) -> String {
    if let Some(state) = properties
        .host_name_ssl_states
        .iter()
        .find(|s| s.host_type.eq_ignore_ascii_case("Repository"))
    {
        return state.name.clone();
    }
    match properties.default_host_name.split_once('.') {
        Some((site, domain)) => format!("{site}.scm.{domain}"),
        None => properties.default_host_name.clone(),
    }
}

// =============================================================================
// ResourceGroupOps
// =============================================================================

#[async_trait]
impl ResourceGroupOps for ArmClient {
    async fn create_group(
        &self,
        name: &ResourceGroupName,
    ) -> Result<ResourceGroupHandle, ArmError> {
        let url = with_api(&self.group_url(name), GROUPS_API);
        let body = json!({ "location": self.location });

        let response = self
            .call(Method::PUT, &url, Some(&body), "create resource group")
            .await?;
        let group: GroupResource = decode(response, "create resource group").await?;

        tracing::info!(group = %group.name, location = %group.location, "created resource group");
        Ok(ResourceGroupHandle {
            name: name.clone(),
            location: group.location,
        })
    }

    async fn delete_group(&self, name: &ResourceGroupName) -> Result<(), ArmError> {
        const OPERATION: &str = "delete resource group";
        let url = with_api(&self.group_url(name), GROUPS_API);

        let response = self.send(Method::DELETE, &url, None).await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(group = %name, "resource group already absent");
            return Ok(());
        }
        if !status.is_success() {
            return Err(rejection(response, OPERATION).await);
        }

        let pending = PendingOperation::from_headers(status, response.headers());
        drop(response);
        self.wait_for(pending, OPERATION).await?;

        tracing::info!(group = %name, "deleted resource group");
        Ok(())
    }

    async fn group_exists(&self, name: &ResourceGroupName) -> Result<bool, ArmError> {
        let url = with_api(&self.group_url(name), GROUPS_API);
        let response = self.send(Method::HEAD, &url, None).await?;
        let status = response.status();
        if status.is_success() {
            Ok(true)
        } else if status == StatusCode::NOT_FOUND {
            Ok(false)
        } else {
            Err(rejection(response, "check resource group").await)
        }
    }

    async fn list_groups(&self) -> Result<Vec<ResourceGroupHandle>, ArmError> {
        const OPERATION: &str = "list resource groups";
        let mut groups = Vec::new();
        let mut next = Some(with_api(&self.groups_url(), GROUPS_API));

        while let Some(url) = next {
            let page: Page<GroupResource> = self.get_json(&url, OPERATION).await?;
            for group in page.value {
                match ResourceGroupName::new(&group.name) {
                    Ok(name) => groups.push(ResourceGroupHandle {
                        name,
                        location: group.location,
                    }),
                    Err(e) => tracing::warn!(group = %group.name, error = %e, "skipping group"),
                }
            }
            next = page.next_link;
        }

        Ok(groups)
    }
}

// =============================================================================
// StorageOps
// =============================================================================

#[async_trait]
impl StorageOps for ArmClient {
    async fn create_storage_account(
        &self,
        group: &ResourceGroupName,
        name: &str,
    ) -> Result<StorageAccount, ArmError> {
        let resource = self.resource_url(group, &format!("Microsoft.Storage/storageAccounts/{name}"));
        let body = json!({
            "location": self.location,
            "kind": "StorageV2",
            "sku": { "name": "Standard_LRS" },
        });

        let account: IdResource = self
            .put_resource(&with_api(&resource, STORAGE_API), body, "create storage account")
            .await?;

        let keys: StorageKeys = self
            .post_json(
                &with_api(&format!("{resource}/listKeys"), STORAGE_API),
                "list storage keys",
            )
            .await?;
        let key = keys.keys.into_iter().next().ok_or_else(|| ArmError::Decode {
            operation: "list storage keys".into(),
            message: "no keys returned".into(),
        })?;

        tracing::info!(account = %account.name, "created storage account");
        Ok(StorageAccount {
            connection_string: storage_connection_string(&account.name, &key.value),
            name: account.name,
        })
    }
}

// =============================================================================
// WebSiteOps
// =============================================================================

#[async_trait]
impl WebSiteOps for ArmClient {
    async fn create_plan(
        &self,
        group: &ResourceGroupName,
        name: &str,
        sku: PlanSku,
    ) -> Result<AppServicePlan, ArmError> {
        let url = self.resource_url(group, &format!("Microsoft.Web/serverfarms/{name}"));
        let body = json!({
            "location": self.location,
            "kind": "linux",
            "sku": { "name": sku.name(), "tier": sku.tier() },
            "properties": { "reserved": true },
        });

        let plan: IdResource = self
            .put_resource(&with_api(&url, WEB_API), body, "create app service plan")
            .await?;

        tracing::info!(plan = %plan.name, sku = sku.name(), "created app service plan");
        Ok(AppServicePlan {
            id: plan.id,
            name: plan.name,
        })
    }

    async fn create_site(
        &self,
        group: &ResourceGroupName,
        name: &str,
        spec: &SiteSpec,
    ) -> Result<Site, ArmError> {
        let url = self.resource_url(group, &format!("Microsoft.Web/sites/{name}"));
        let body = json!({
            "location": self.location,
            "kind": spec.kind.as_str(),
            "properties": {
                "serverFarmId": spec.plan_id,
                "reserved": true,
                "siteConfig": {
                    "linuxFxVersion": spec.linux_fx_version,
                    "appSettings": spec.app_settings,
                },
            },
        });

        let site: SiteResource = self
            .put_resource(&with_api(&url, WEB_API), body, "create site")
            .await?;

        tracing::info!(site = %site.name, host = %site.properties.default_host_name, "created site");
        Ok(Site {
            url: self.public_url(&site.properties.default_host_name),
            scm_url: self.public_url(&scm_host(&site.properties)),
            name: site.name,
        })
    }

    async fn deploy_zip(&self, site: &Site, archive: Vec<u8>) -> Result<(), ArmError> {
        let url = format!("{}/api/zipdeploy?isAsync=false", site.scm_url);
        let token = self.tokens.token().await?;
        tracing::info!(site = %site.name, bytes = archive.len(), "uploading package");

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/zip")
            .body(archive)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(site = %site.name, status = %status, "package deployed");
            return Ok(());
        }

        if is_auth_failure(status) {
            return Err(ArmError::Authentication {
                message: format!("zip deploy to {} returned {status}", site.name),
            });
        }

        Err(ArmError::Upload {
            site: site.name.clone(),
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        })
    }
}

// =============================================================================
// RegistryOps
// =============================================================================

#[async_trait]
impl RegistryOps for ArmClient {
    async fn create_registry(
        &self,
        group: &ResourceGroupName,
        name: &str,
    ) -> Result<Registry, ArmError> {
        let url = self.resource_url(
            group,
            &format!("Microsoft.ContainerRegistry/registries/{name}"),
        );
        let body = json!({
            "location": self.location,
            "sku": { "name": "Basic" },
            "properties": { "adminUserEnabled": true },
        });

        let registry: RegistryResource = self
            .put_resource(&with_api(&url, REGISTRY_API), body, "create registry")
            .await?;

        tracing::info!(registry = %registry.name, server = %registry.properties.login_server, "created registry");
        Ok(Registry {
            name: registry.name,
            login_server: registry.properties.login_server,
        })
    }

    async fn registry_credentials(
        &self,
        group: &ResourceGroupName,
        registry: &Registry,
    ) -> Result<RegistryCredentials, ArmError> {
        let url = self.resource_url(
            group,
            &format!(
                "Microsoft.ContainerRegistry/registries/{}/listCredentials",
                registry.name
            ),
        );

        let creds: RegistryCredentialsResponse = self
            .post_json(&with_api(&url, REGISTRY_API), "list registry credentials")
            .await?;
        let password = creds.passwords.into_iter().next().ok_or_else(|| ArmError::Decode {
            operation: "list registry credentials".into(),
            message: "no passwords returned".into(),
        })?;

        Ok(RegistryCredentials::new(
            &registry.login_server,
            &creds.username,
            &password.value,
        ))
    }
}

// =============================================================================
// ContainerAppOps
// =============================================================================

#[async_trait]
impl ContainerAppOps for ArmClient {
    async fn create_managed_environment(
        &self,
        group: &ResourceGroupName,
        name: &str,
    ) -> Result<ManagedEnvironment, ArmError> {
        let url = self.resource_url(group, &format!("Microsoft.App/managedEnvironments/{name}"));
        let body = json!({ "location": self.location, "properties": {} });

        let env: IdResource = self
            .put_resource(
                &with_api(&url, CONTAINER_APPS_API),
                body,
                "create managed environment",
            )
            .await?;

        tracing::info!(environment = %env.name, "created managed environment");
        Ok(ManagedEnvironment {
            id: env.id,
            name: env.name,
        })
    }

    async fn create_container_app(
        &self,
        group: &ResourceGroupName,
        name: &str,
        spec: &ContainerAppSpec,
    ) -> Result<ContainerApp, ArmError> {
        let url = self.resource_url(group, &format!("Microsoft.App/containerApps/{name}"));
        let body = json!({
            "location": self.location,
            "properties": {
                "managedEnvironmentId": spec.environment_id,
                "configuration": {
                    "ingress": {
                        "external": true,
                        "targetPort": spec.target_port,
                    },
                    "secrets": [
                        { "name": REGISTRY_SECRET, "value": spec.registry.password() },
                    ],
                    "registries": [{
                        "server": spec.registry.login_server,
                        "username": spec.registry.username,
                        "passwordSecretRef": REGISTRY_SECRET,
                    }],
                },
                "template": {
                    "containers": [{
                        "name": name,
                        "image": spec.image.to_string(),
                        "env": spec.env,
                    }],
                },
            },
        });

        let app: ContainerAppResource = self
            .put_resource(
                &with_api(&url, CONTAINER_APPS_API),
                body,
                "create container app",
            )
            .await?;

        check_running_image(&app, &spec.image)?;

        let fqdn = app.properties.configuration.ingress.fqdn;
        tracing::info!(app = %app.name, fqdn = %fqdn, "created container app");
        Ok(ContainerApp {
            url: self.public_url(&fqdn),
            name: app.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site_properties(default_host: &str, states: &[(&str, &str)]) -> SiteProperties {
        SiteProperties {
            default_host_name: default_host.to_string(),
            host_name_ssl_states: states
                .iter()
                .map(|(name, kind)| HostNameState {
                    name: name.to_string(),
                    host_type: kind.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn scm_host_prefers_repository_entry() {
        let props = site_properties(
            "demo.azurewebsites.net",
            &[
                ("demo.azurewebsites.net", "Standard"),
                ("demo.scm.azurewebsites.net", "Repository"),
            ],
        );
        assert_eq!(scm_host(&props), "demo.scm.azurewebsites.net");
    }

    #[test]
    fn scm_host_falls_back_to_convention() {
        let props = site_properties("demo.azurewebsites.net", &[]);
        assert_eq!(scm_host(&props), "demo.scm.azurewebsites.net");
    }

    fn container_app(image: Option<&str>) -> ContainerAppResource {
        ContainerAppResource {
            name: "shop".into(),
            properties: ContainerAppProperties {
                configuration: ContainerAppConfiguration {
                    ingress: Ingress {
                        fqdn: "shop.example.io".into(),
                    },
                },
                template: image.map(|image| ContainerTemplate {
                    containers: vec![ContainerDefinition {
                        image: image.into(),
                    }],
                }),
            },
        }
    }

    #[test]
    fn running_image_must_match_pushed() {
        let pushed = ImageRef::new("crshop.azurecr.io", "shop", "20240501120000");

        check_running_image(&container_app(Some("crshop.azurecr.io/shop:20240501120000")), &pushed)
            .unwrap();
        check_running_image(&container_app(None), &pushed).unwrap();

        let err = check_running_image(&container_app(Some("crshop.azurecr.io/shop:old")), &pushed)
            .unwrap_err();
        assert!(matches!(err, ArmError::OperationFailed { ref status, .. } if status == "ImageMismatch"));

        let err = check_running_image(&container_app(Some("nginx")), &pushed).unwrap_err();
        assert!(matches!(err, ArmError::Decode { .. }));
    }

    #[test]
    fn connection_string_format() {
        assert_eq!(
            storage_connection_string("stdemo", "a2V5"),
            "DefaultEndpointsProtocol=https;AccountName=stdemo;AccountKey=a2V5;EndpointSuffix=core.windows.net"
        );
    }

    #[test]
    fn pending_operation_prefers_async_header() {
        let mut headers = HeaderMap::new();
        headers.insert(ASYNC_OPERATION, "https://ops/1".parse().unwrap());
        headers.insert(LOCATION, "https://ops/2".parse().unwrap());

        match PendingOperation::from_headers(StatusCode::CREATED, &headers) {
            PendingOperation::AsyncOperation(url) => assert_eq!(url, "https://ops/1"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn location_only_counts_for_accepted() {
        let mut headers = HeaderMap::new();
        headers.insert(LOCATION, "https://ops/2".parse().unwrap());

        assert!(matches!(
            PendingOperation::from_headers(StatusCode::OK, &headers),
            PendingOperation::Done
        ));
        assert!(matches!(
            PendingOperation::from_headers(StatusCode::ACCEPTED, &headers),
            PendingOperation::Location(_)
        ));
    }
}
