//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Overrides;

#[derive(Parser, Debug)]
#[command(name = "devfleet")]
#[command(author, version, about = "Launch and tear down GPU-bound code-server containers", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: SubCommand,

    /// Path to a YAML fleet config (default: ./devfleet.yaml if present)
    #[arg(short, long, global = true, env = "DEVFLEET_CONFIG")]
    pub config: Option<PathBuf>,

    /// Render ids to manage, comma separated (overrides the config)
    #[arg(long, global = true, value_delimiter = ',', value_name = "ID,...")]
    pub ids: Option<Vec<u32>>,

    /// Port of the first container (overrides the config)
    #[arg(long, global = true)]
    pub base_port: Option<u16>,

    /// Container runtime executable
    #[arg(long, global = true, env = "DEVFLEET_DOCKER", default_value = "docker")]
    pub docker: String,

    /// Run against an in-memory runtime instead of the docker daemon
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum SubCommand {
    /// Create and start one code-server container per render id
    Launch {
        /// Image to run (overrides the config)
        #[arg(long)]
        image: Option<String>,

        /// CSV file for names, passwords and URLs (overrides the config)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Address to put in access URLs instead of looking it up
        #[arg(long)]
        public_ip: Option<String>,

        /// Exit 0 even if some containers failed
        #[arg(long)]
        no_fail: bool,
    },

    /// Stop and remove every managed container
    Clean {
        /// Exit 0 even if some containers failed
        #[arg(long)]
        no_fail: bool,
    },

    /// Show derived names, ports and devices without touching the runtime
    Plan,
}

impl Args {
    /// Config overrides given on the command line
    pub fn overrides(&self) -> Overrides {
        let (image, output) = match &self.command {
            SubCommand::Launch { image, output, .. } => (image.clone(), output.clone()),
            _ => (None, None),
        };
        Overrides {
            render_ids: self.ids.clone(),
            base_port: self.base_port,
            image,
            output,
        }
    }
}
