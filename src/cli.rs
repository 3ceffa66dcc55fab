// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use azdeploy::deploy::DeploymentKind;
use azdeploy::output::OutputMode;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "azdeploy")]
#[command(about = "Deploy .NET projects to Azure Functions, Web Apps and Container Apps")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (default: discovered in the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        OutputMode::from_flags(self.quiet, self.json)
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum KindArg {
    Function,
    Webapp,
    Containerapp,
}

impl From<KindArg> for DeploymentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Function => DeploymentKind::Function,
            KindArg::Webapp => DeploymentKind::WebApp,
            KindArg::Containerapp => DeploymentKind::ContainerApp,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new azdeploy.yml configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Build, deploy and wait for a project to answer
    Deploy {
        /// Deployment target
        #[arg(value_enum)]
        kind: KindArg,

        /// Directory containing the project
        source: PathBuf,

        /// Logical name; the resource group is named after it
        #[arg(short, long)]
        name: String,

        /// App setting passed to the deployment
        #[arg(short, long = "env", value_name = "KEY=VALUE")]
        env: Vec<String>,

        /// Tear the deployment down again once it is ready
        #[arg(long)]
        ephemeral: bool,
    },

    /// Delete a deployment's resource group
    Teardown {
        /// Logical name used at deploy time
        name: String,
    },

    /// Manage resource groups directly
    Group {
        #[command(subcommand)]
        command: GroupCommands,
    },
}

#[derive(Subcommand)]
pub enum GroupCommands {
    /// Create a resource group
    Create { name: String },

    /// Delete a resource group and everything in it
    Delete { name: String },

    /// Print whether a resource group exists
    Exists { name: String },

    /// List resource groups in the subscription
    List,
}
