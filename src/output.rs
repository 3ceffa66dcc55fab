// ABOUTME: CLI reporting of deployment, teardown and resource group events.
// ABOUTME: Each event renders as a human line, a quiet result line, or one JSON object.

use crate::azure::ResourceGroupHandle;
use crate::deploy::DeploymentInfo;
use serde::Serialize;
use std::time::Instant;

/// How events are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Progress and results for a terminal.
    Normal,
    /// Final results only, for CI.
    Quiet,
    /// One JSON object per line.
    Json,
}

impl OutputMode {
    /// JSON wins over quiet when both are requested.
    pub fn from_flags(quiet: bool, json: bool) -> Self {
        if json {
            OutputMode::Json
        } else if quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub name: String,
    pub location: String,
}

impl From<&ResourceGroupHandle> for GroupSummary {
    fn from(group: &ResourceGroupHandle) -> Self {
        Self {
            name: group.name.to_string(),
            location: group.location.clone(),
        }
    }
}

/// Something a command reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    ConfigWritten {
        path: String,
    },
    Deploying {
        name: String,
        kind: String,
        source: String,
    },
    EndpointReady {
        name: String,
        url: String,
    },
    Deployed {
        name: String,
        kind: String,
        url: String,
        resource_group: String,
        released: bool,
        duration_secs: f64,
    },
    TornDown {
        name: String,
        resource_group: String,
        duration_secs: f64,
    },
    GroupCreated(GroupSummary),
    GroupDeleted {
        name: String,
    },
    GroupExists {
        name: String,
        exists: bool,
    },
    Groups {
        groups: Vec<GroupSummary>,
    },
    Error {
        message: String,
    },
}

impl Event {
    pub fn deployed(info: &DeploymentInfo, released: bool, duration_secs: f64) -> Self {
        Event::Deployed {
            name: info.name.to_string(),
            kind: info.kind.as_str().to_string(),
            url: info.url.clone(),
            resource_group: info.resource_group.name.to_string(),
            released,
            duration_secs,
        }
    }

    /// Intermediate steps are shown only in normal mode.
    fn is_progress(&self) -> bool {
        matches!(self, Event::Deploying { .. } | Event::EndpointReady { .. })
    }

    fn human(&self) -> String {
        match self {
            Event::ConfigWritten { path } => format!("Created {path}"),
            Event::Deploying { name, kind, source } => {
                format!("Deploying {kind} {name} from {source}")
            }
            Event::EndpointReady { url, .. } => format!("Ready at {url}"),
            Event::Deployed {
                name,
                url,
                released,
                duration_secs,
                ..
            } => {
                let verb = if *released { "Deployed and released" } else { "Deployed" };
                format!("{verb} {name} at {url} ({duration_secs:.1}s)")
            }
            Event::TornDown {
                name,
                duration_secs,
                ..
            } => format!("Tore down {name} ({duration_secs:.1}s)"),
            Event::GroupCreated(group) => format!("Created {} in {}", group.name, group.location),
            Event::GroupDeleted { name } => format!("Deleted {name}"),
            Event::GroupExists { exists, .. } => exists.to_string(),
            Event::Groups { groups } => groups
                .iter()
                .map(|g| format!("{}\t{}", g.name, g.location))
                .collect::<Vec<_>>()
                .join("\n"),
            Event::Error { message } => format!("Error: {message}"),
        }
    }

    /// Quiet mode keeps only what a script would parse.
    fn quiet(&self) -> String {
        match self {
            Event::Deployed { url, .. } => url.clone(),
            Event::TornDown { name, .. } => name.clone(),
            other => other.human(),
        }
    }

    fn render(&self, mode: OutputMode) -> Option<String> {
        match mode {
            OutputMode::Normal => Some(self.human()),
            OutputMode::Quiet if self.is_progress() => None,
            OutputMode::Quiet => Some(self.quiet()),
            OutputMode::Json if self.is_progress() => None,
            OutputMode::Json => serde_json::to_string(self).ok(),
        }
    }
}

/// Writes events for one command invocation.
pub struct Output {
    mode: OutputMode,
    started: Instant,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            started: Instant::now(),
        }
    }

    /// Seconds since this command started.
    pub fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    pub fn emit(&self, event: &Event) {
        if let Some(line) = event.render(self.mode) {
            if matches!(event, Event::Error { .. }) {
                eprintln!("{line}");
            } else {
                println!("{line}");
            }
        }
    }

    pub fn error(&self, message: &str) {
        self.emit(&Event::Error {
            message: message.to_string(),
        });
    }
}
