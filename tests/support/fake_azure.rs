// ABOUTME: Stateful in-process stand-in for the management API, token endpoint and sites.
// ABOUTME: One wiremock server answers every host, so site URLs point back at it.

use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::io::Read;
use std::sync::Arc;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const TENANT: &str = "tenant-0001";
pub const TOKEN: &str = "fake-management-token";
pub const REGISTRY_PASSWORD: &str = "registry-secret-value";
pub const STORAGE_KEY: &str = "c3RvcmFnZS1rZXk=";

/// A package received by the zip deploy endpoint.
#[derive(Debug, Clone)]
pub struct Upload {
    pub site: String,
    pub entries: Vec<String>,
}

#[derive(Debug, Default)]
struct State {
    groups: BTreeMap<String, String>,
    resources: BTreeMap<String, Value>,
    put_bodies: BTreeMap<String, Value>,
    settings: BTreeMap<String, Vec<(String, String)>>,
    content: BTreeMap<String, String>,
    current_app: Option<String>,
    pending_polls: BTreeMap<String, u32>,
    deleted_groups: Vec<String>,
    uploads: Vec<Upload>,
    token_requests: usize,
    unhealthy: bool,
    reject_tokens: bool,
    fail_zip_deploy: Option<u16>,
    reject_group_create: Option<u16>,
}

/// Handle to the running fake. Dropping it stops the server.
pub struct FakeAzure {
    server: MockServer,
    state: Arc<Mutex<State>>,
}

impl FakeAzure {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let state = Arc::new(Mutex::new(State::default()));
        let responder = Responder {
            base: server.uri(),
            host: server.address().to_string(),
            state: Arc::clone(&state),
        };
        Mock::given(any())
            .respond_with(responder)
            .mount(&server)
            .await;
        Self { server, state }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// `host:port` every site and container app is reachable on.
    pub fn host(&self) -> String {
        self.server.address().to_string()
    }

    pub fn group_exists(&self, name: &str) -> bool {
        self.state.lock().groups.contains_key(name)
    }

    pub fn group_names(&self) -> Vec<String> {
        self.state.lock().groups.keys().cloned().collect()
    }

    pub fn insert_group(&self, name: &str, location: &str) {
        self.state
            .lock()
            .groups
            .insert(name.to_string(), location.to_string());
    }

    pub fn deleted_groups(&self) -> Vec<String> {
        self.state.lock().deleted_groups.clone()
    }

    /// Number of resources inside groups, across all groups.
    pub fn resource_count(&self) -> usize {
        self.state.lock().resources.len()
    }

    /// App settings (or container env) of a site or container app, in the order sent.
    pub fn app_settings(&self, app: &str) -> Vec<(String, String)> {
        self.state
            .lock()
            .settings
            .get(app)
            .cloned()
            .unwrap_or_default()
    }

    /// Body of the PUT that created `provider_path` (e.g. `Microsoft.Web/sites/demo`).
    pub fn put_body(&self, group: &str, provider_path: &str) -> Option<Value> {
        self.state
            .lock()
            .put_bodies
            .get(&resource_key(group, provider_path))
            .cloned()
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.state.lock().uploads.clone()
    }

    pub fn token_requests(&self) -> usize {
        self.state.lock().token_requests
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.state.lock().unhealthy = !healthy;
    }

    pub fn reject_tokens(&self) {
        self.state.lock().reject_tokens = true;
    }

    pub fn fail_zip_deploy(&self, status: u16) {
        self.state.lock().fail_zip_deploy = Some(status);
    }

    pub fn reject_group_create(&self, status: u16) {
        self.state.lock().reject_group_create = Some(status);
    }
}

fn resource_key(group: &str, provider_path: &str) -> String {
    format!("{group}/{provider_path}").to_ascii_lowercase()
}

fn arm_error(status: u16, code: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "error": { "code": code, "message": message }
    }))
}

struct Responder {
    base: String,
    host: String,
    state: Arc<Mutex<State>>,
}

impl Respond for Responder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let method = request.method.as_str().to_string();
        let path = request.url.path().to_string();
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

        match (method.as_str(), segments.as_slice()) {
            ("POST", [tenant, "oauth2", "v2.0", "token"]) => self.token(tenant, request),
            ("GET", [""]) => self.site_root(),
            ("GET", ["variable", name]) => self.site_variable(name),
            _ if !authorized(request) => arm_error(
                401,
                "InvalidAuthenticationToken",
                "The access token is invalid.",
            ),
            ("POST", ["api", "zipdeploy"]) => self.zip_deploy(request),
            ("GET", ["operations", id]) | ("GET", ["asyncops", id]) => {
                self.operation(id, segments[0] == "asyncops")
            }
            ("GET", ["subscriptions", _, "resourcegroups"]) => self.list_groups(request),
            (method, ["subscriptions", _, "resourcegroups", group]) => {
                self.group(method, group, request)
            }
            (method, ["subscriptions", _, "resourcegroups", group, "providers", rest @ ..]) => {
                self.resource(method, group, rest, request)
            }
            _ => arm_error(404, "NotFound", &format!("no route for {method} {path}")),
        }
    }
}

fn authorized(request: &Request) -> bool {
    request
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

impl Responder {
    fn token(&self, tenant: &str, request: &Request) -> ResponseTemplate {
        let mut state = self.state.lock();
        state.token_requests += 1;

        let body = String::from_utf8_lossy(&request.body);
        if state.reject_tokens || tenant != TENANT || !body.contains("client_credentials") {
            return ResponseTemplate::new(401).set_body_json(json!({
                "error": "invalid_client",
                "error_description": "AADSTS7000215: Invalid client secret provided.",
            }));
        }

        ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": TOKEN,
        }))
    }

    fn site_root(&self) -> ResponseTemplate {
        let state = self.state.lock();
        if state.unhealthy {
            return ResponseTemplate::new(503).set_body_string("Service Unavailable");
        }
        match state
            .current_app
            .as_ref()
            .and_then(|app| state.content.get(app))
        {
            Some(body) => ResponseTemplate::new(200).set_body_string(body.clone()),
            None => ResponseTemplate::new(404).set_body_string("no application deployed"),
        }
    }

    fn site_variable(&self, name: &str) -> ResponseTemplate {
        let state = self.state.lock();
        let value = state
            .current_app
            .as_ref()
            .and_then(|app| state.settings.get(app))
            .and_then(|settings| settings.iter().rev().find(|(k, _)| k == name))
            .map(|(_, v)| v.clone());
        match value {
            Some(value) => ResponseTemplate::new(200).set_body_string(value),
            None => ResponseTemplate::new(404).set_body_string(format!("{name} is not set")),
        }
    }

    fn zip_deploy(&self, request: &Request) -> ResponseTemplate {
        let mut state = self.state.lock();
        if let Some(status) = state.fail_zip_deploy {
            return ResponseTemplate::new(status).set_body_string("Deployment failed: site rejected package");
        }

        let is_zip = request
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "application/zip");
        if !is_zip {
            return ResponseTemplate::new(415).set_body_string("expected application/zip");
        }

        let Ok(mut archive) = zip::ZipArchive::new(std::io::Cursor::new(request.body.clone())) else {
            return ResponseTemplate::new(400).set_body_string("body is not a zip archive");
        };
        let entries: Vec<String> = archive.file_names().map(str::to_string).collect();
        let body = match archive.by_name("wwwroot/index.html") {
            Ok(mut file) => {
                let mut index = String::new();
                match file.read_to_string(&mut index) {
                    Ok(_) => index,
                    Err(_) => "Running".to_string(),
                }
            }
            Err(_) => "Running".to_string(),
        };

        let Some(site) = state.current_app.clone() else {
            return ResponseTemplate::new(404).set_body_string("no site");
        };
        state.content.insert(site.clone(), body);
        state.uploads.push(Upload { site, entries });
        ResponseTemplate::new(200)
    }

    fn operation(&self, id: &str, async_operation: bool) -> ResponseTemplate {
        let mut state = self.state.lock();
        let remaining = state.pending_polls.entry(id.to_string()).or_insert(0);
        let in_progress = *remaining > 0;
        if in_progress {
            *remaining -= 1;
        }

        match (async_operation, in_progress) {
            (true, true) => ResponseTemplate::new(200).set_body_json(json!({ "status": "InProgress" })),
            (true, false) => ResponseTemplate::new(200).set_body_json(json!({ "status": "Succeeded" })),
            (false, true) => ResponseTemplate::new(202)
                .insert_header("Location", format!("{}/operations/{id}", self.base)),
            (false, false) => ResponseTemplate::new(200),
        }
    }

    fn list_groups(&self, request: &Request) -> ResponseTemplate {
        const PAGE: usize = 2;
        let skip: usize = request
            .url
            .query_pairs()
            .find(|(k, _)| k == "$skiptoken")
            .and_then(|(_, v)| v.parse().ok())
            .unwrap_or(0);

        let state = self.state.lock();
        let value: Vec<Value> = state
            .groups
            .iter()
            .skip(skip)
            .take(PAGE)
            .map(|(name, location)| json!({ "name": name, "location": location }))
            .collect();

        let mut page = json!({ "value": value });
        if skip + PAGE < state.groups.len() {
            let mut next = request.url.clone();
            next.set_query(Some(&format!(
                "api-version=2021-04-01&$skiptoken={}",
                skip + PAGE
            )));
            page["nextLink"] = json!(next.to_string());
        }
        ResponseTemplate::new(200).set_body_json(page)
    }

    fn group(&self, method: &str, group: &str, request: &Request) -> ResponseTemplate {
        let mut state = self.state.lock();
        match method {
            "PUT" => {
                if let Some(status) = state.reject_group_create {
                    return arm_error(
                        status,
                        "RequestDisallowedByPolicy",
                        "Resource group creation was disallowed by policy.",
                    );
                }
                let body: Value = serde_json::from_slice(&request.body).unwrap_or_default();
                let location = body["location"].as_str().unwrap_or("westeurope").to_string();
                let existed = state
                    .groups
                    .insert(group.to_string(), location.clone())
                    .is_some();
                ResponseTemplate::new(if existed { 200 } else { 201 }).set_body_json(json!({
                    "id": format!("/subscriptions/sub/resourceGroups/{group}"),
                    "name": group,
                    "location": location,
                }))
            }
            "HEAD" => {
                ResponseTemplate::new(if state.groups.contains_key(group) { 204 } else { 404 })
            }
            "GET" => match state.groups.get(group) {
                Some(location) => ResponseTemplate::new(200)
                    .set_body_json(json!({ "name": group, "location": location })),
                None => arm_error(404, "ResourceGroupNotFound", "Resource group could not be found."),
            },
            "DELETE" => {
                if state.groups.remove(group).is_none() {
                    return arm_error(404, "ResourceGroupNotFound", "Resource group could not be found.");
                }
                let prefix = format!("{}/", group.to_ascii_lowercase());
                state.resources.retain(|key, _| !key.starts_with(&prefix));
                state.deleted_groups.push(group.to_string());

                let operation = format!("delete-{group}");
                state.pending_polls.insert(operation.clone(), 1);
                ResponseTemplate::new(202)
                    .insert_header("Location", format!("{}/operations/{operation}", self.base))
            }
            _ => ResponseTemplate::new(405),
        }
    }

    fn resource(&self, method: &str, group: &str, rest: &[&str], request: &Request) -> ResponseTemplate {
        let mut state = self.state.lock();
        if !state.groups.contains_key(group) {
            return arm_error(404, "ResourceGroupNotFound", "Resource group could not be found.");
        }

        let (provider_path, action) = match rest {
            [namespace, kind, name] => (format!("{namespace}/{kind}/{name}"), None),
            [namespace, kind, name, action] => {
                (format!("{namespace}/{kind}/{name}"), Some(action.to_ascii_lowercase()))
            }
            _ => return arm_error(400, "InvalidResourceId", "malformed resource id"),
        };
        let key = resource_key(group, &provider_path);
        let name = rest[2].to_string();

        match (method, action.as_deref()) {
            ("PUT", None) => {
                let body: Value = serde_json::from_slice(&request.body).unwrap_or_default();
                let id = format!("/subscriptions/sub/resourceGroups/{group}/providers/{provider_path}");
                let kind = format!("{}/{}", rest[0], rest[1]).to_ascii_lowercase();
                let (resource, async_operation) =
                    self.provision(&mut state, &kind, &id, &name, &body);

                state.put_bodies.insert(key.clone(), body);
                state.resources.insert(key, resource.clone());

                if async_operation {
                    let operation = format!("put-{name}");
                    state.pending_polls.insert(operation.clone(), 1);
                    ResponseTemplate::new(201)
                        .insert_header(
                            "Azure-AsyncOperation",
                            format!("{}/asyncops/{operation}", self.base),
                        )
                        .set_body_json(resource)
                } else {
                    ResponseTemplate::new(200).set_body_json(resource)
                }
            }
            ("GET", None) => match state.resources.get(&key) {
                Some(resource) => ResponseTemplate::new(200).set_body_json(resource.clone()),
                None => arm_error(404, "ResourceNotFound", "The resource was not found."),
            },
            ("POST", Some("listkeys")) if state.resources.contains_key(&key) => {
                ResponseTemplate::new(200).set_body_json(json!({
                    "keys": [{ "keyName": "key1", "value": STORAGE_KEY, "permissions": "FULL" }]
                }))
            }
            ("POST", Some("listcredentials")) if state.resources.contains_key(&key) => {
                ResponseTemplate::new(200).set_body_json(json!({
                    "username": name,
                    "passwords": [{ "name": "password", "value": REGISTRY_PASSWORD }]
                }))
            }
            _ => arm_error(404, "ResourceNotFound", "The resource was not found."),
        }
    }

    /// Resource representation for a PUT, and whether creation is reported
    /// through an async operation.
    fn provision(
        &self,
        state: &mut State,
        kind: &str,
        id: &str,
        name: &str,
        body: &Value,
    ) -> (Value, bool) {
        match kind {
            "microsoft.storage/storageaccounts" => {
                (json!({ "id": id, "name": name, "properties": {} }), true)
            }
            "microsoft.web/sites" => {
                let settings = body["properties"]["siteConfig"]["appSettings"]
                    .as_array()
                    .map(|list| pairs(list))
                    .unwrap_or_default();
                state.settings.insert(name.to_string(), settings);
                state.current_app = Some(name.to_string());
                let site_kind = body["kind"].clone();
                (
                    json!({
                        "id": id,
                        "name": name,
                        "kind": site_kind,
                        "properties": {
                            "defaultHostName": self.host,
                            "hostNameSslStates": [
                                { "name": self.host, "hostType": "Standard" },
                                { "name": self.host, "hostType": "Repository" },
                            ],
                        },
                    }),
                    false,
                )
            }
            "microsoft.containerregistry/registries" => (
                json!({
                    "id": id,
                    "name": name,
                    "properties": { "loginServer": format!("{name}.azurecr.io") },
                }),
                true,
            ),
            "microsoft.app/containerapps" => {
                let container = &body["properties"]["template"]["containers"][0];
                let env = container["env"]
                    .as_array()
                    .map(|list| pairs(list))
                    .unwrap_or_default();
                let image = container["image"].as_str().unwrap_or_default().to_string();
                state.settings.insert(name.to_string(), env);
                state
                    .content
                    .insert(name.to_string(), format!("container {image} running"));
                state.current_app = Some(name.to_string());
                (
                    json!({
                        "id": id,
                        "name": name,
                        "properties": {
                            "configuration": { "ingress": { "fqdn": self.host } },
                            "template": { "containers": [{ "name": name, "image": image }] },
                        },
                    }),
                    true,
                )
            }
            _ => (json!({ "id": id, "name": name, "properties": {} }), false),
        }
    }
}

fn pairs(list: &[Value]) -> Vec<(String, String)> {
    list.iter()
        .map(|item| {
            (
                item["name"].as_str().unwrap_or_default().to_string(),
                item["value"].as_str().unwrap_or_default().to_string(),
            )
        })
        .collect()
}
