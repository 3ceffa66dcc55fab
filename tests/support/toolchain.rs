// ABOUTME: Fake dotnet and docker executables plus sample source trees.
// ABOUTME: The scripts log their arguments so tests can assert on how they were called.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Project name whose publish fails with a compiler error.
pub const BROKEN_PROJECT: &str = "Broken";
/// Project name whose publish takes several seconds.
pub const SLOW_PROJECT: &str = "Slow";

/// Shell-script stand-ins for the build toolchain and container engine.
pub struct FakeToolchain {
    dir: TempDir,
    pub dotnet: PathBuf,
    pub docker: PathBuf,
}

impl FakeToolchain {
    pub fn new() -> Self {
        Self::with_failing_docker_stage(None)
    }

    /// Docker fails with `denied` on the given subcommand (`version`,
    /// `login`, `build` or `push`).
    pub fn with_failing_docker_stage(stage: Option<&str>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let dotnet = dir.path().join("dotnet");
        let docker = dir.path().join("docker");

        write_script(&dotnet, &dotnet_script(dir.path()));
        write_script(&docker, &docker_script(dir.path(), stage.unwrap_or("none")));

        Self {
            dir,
            dotnet,
            docker,
        }
    }

    /// Every dotnet invocation, one line of arguments each.
    pub fn dotnet_calls(&self) -> Vec<String> {
        read_lines(&self.dir.path().join("dotnet.log"))
    }

    /// Every docker invocation, one line of arguments each.
    pub fn docker_calls(&self) -> Vec<String> {
        read_lines(&self.dir.path().join("docker.log"))
    }

    /// What docker login read from stdin.
    pub fn docker_login_stdin(&self) -> Option<String> {
        fs::read_to_string(self.dir.path().join("docker-login.stdin")).ok()
    }

    /// True if two publishes ever ran at the same time.
    pub fn publishes_overlapped(&self) -> bool {
        self.dir.path().join("overlap").exists()
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

fn write_script(path: &Path, body: &str) {
    fs::write(path, body).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn dotnet_script(state: &Path) -> String {
    let state = state.display();
    format!(
        r#"#!/bin/sh
echo "$@" >> "{state}/dotnet.log"
case "$1" in
  --version)
    echo "8.0.100"
    exit 0
    ;;
  publish)
    project="$2"
    out=""
    while [ $# -gt 0 ]; do
      if [ "$1" = "--output" ]; then out="$2"; fi
      shift
    done
    name=$(basename "$project" .csproj)
    if ! mkdir "{state}/publishing" 2>/dev/null; then touch "{state}/overlap"; fi
    sleep 0.2
    rmdir "{state}/publishing" 2>/dev/null
    if [ "$name" = "{BROKEN_PROJECT}" ]; then
      echo "$project: error CS1002: ; expected"
      echo "Build FAILED." >&2
      exit 1
    fi
    if [ "$name" = "{SLOW_PROJECT}" ]; then sleep 10; fi
    mkdir -p "$out"
    echo "assembly" > "$out/$name.dll"
    src=$(dirname "$project")
    if [ -d "$src/wwwroot" ]; then cp -R "$src/wwwroot" "$out/"; fi
    exit 0
    ;;
esac
echo "unsupported command: $1" >&2
exit 2
"#
    )
}

fn docker_script(state: &Path, failing: &str) -> String {
    let state = state.display();
    format!(
        r#"#!/bin/sh
echo "$@" >> "{state}/docker.log"
if [ "$1" = "{failing}" ]; then
  echo "denied: requested access to the resource is denied" >&2
  exit 1
fi
case "$1" in
  version) echo "24.0.7" ;;
  login) cat > "{state}/docker-login.stdin"; echo "Login Succeeded" ;;
  build) echo "Successfully tagged $3" ;;
  push) echo "$2: digest: sha256:0000 size: 1234" ;;
  *) echo "unsupported command: $1" >&2; exit 2 ;;
esac
exit 0
"#
    )
}

/// A single-project web app whose root page serves `body`.
pub fn web_project(root: &Path, name: &str, body: &str) -> PathBuf {
    let dir = root.join(name.to_ascii_lowercase());
    fs::create_dir_all(dir.join("wwwroot")).unwrap();
    fs::write(
        dir.join(format!("{name}.csproj")),
        r#"<Project Sdk="Microsoft.NET.Sdk.Web"></Project>"#,
    )
    .unwrap();
    fs::write(dir.join("Program.cs"), "var app = WebApplication.Create();").unwrap();
    fs::write(dir.join("wwwroot").join("index.html"), body).unwrap();
    dir
}

/// A project with no static content, as a function app would be.
pub fn function_project(root: &Path, name: &str) -> PathBuf {
    let dir = root.join(name.to_ascii_lowercase());
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join(format!("{name}.csproj")),
        r#"<Project Sdk="Microsoft.NET.Sdk"></Project>"#,
    )
    .unwrap();
    fs::write(dir.join("host.json"), r#"{"version": "2.0"}"#).unwrap();
    dir
}

/// A container build context.
pub fn container_project(root: &Path, name: &str) -> PathBuf {
    let dir = web_project(root, name, "container");
    fs::write(
        dir.join("Dockerfile"),
        "FROM mcr.microsoft.com/dotnet/aspnet:8.0\nCOPY . /app\n",
    )
    .unwrap();
    dir
}
