//! devfleet CLI - launch and clean code-server containers

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use devfleet::cli::{Args, SubCommand};
use devfleet::fleet::report::exit_code;
use devfleet::host::public_ip;
use devfleet::runtime::{ensure_available, ContainerRuntime, DockerCli, InMemoryRuntime};
use devfleet::{clean, format_plan, format_report, launch, launch_and_save, plan, OutputFormat};

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(exit_code::FATAL);
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> anyhow::Result<i32> {
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    let config = devfleet::config::load(args.config.as_deref(), &cwd)
        .context("failed to load fleet config")?
        .apply(args.overrides());
    config.validate().context("invalid fleet config")?;

    let format = if args.json { OutputFormat::Json } else { OutputFormat::Human };

    match args.command {
        SubCommand::Plan => {
            let plans = plan(&config)?;
            println!("{}", format_plan(&plans, &format));
            Ok(exit_code::SUCCESS)
        }

        SubCommand::Launch {
            public_ip: ref ip_override,
            no_fail,
            ..
        } => {
            let ip = match ip_override {
                Some(ip) => ip.clone(),
                None if args.dry_run => config.ip_lookup.fallback.clone(),
                None => public_ip(&config.ip_lookup),
            };

            let report = if args.dry_run {
                info!("dry run: using in-memory runtime, no CSV written");
                let mut runtime = InMemoryRuntime::new();
                launch(&config, &mut runtime, &ip)?
            } else {
                let mut runtime = docker_runtime(&args.docker)?;
                launch_and_save(&config, &mut runtime, &ip).with_context(|| {
                    format!("failed to write {}", config.output.display())
                })?
            };

            if report.has_failures() {
                warn!(failed = report.failed(), "some containers failed to launch");
            }
            println!("{}", format_report(&report, &format));
            Ok(report.exit_code(no_fail))
        }

        SubCommand::Clean { no_fail } => {
            let report = if args.dry_run {
                // Pretend every managed container exists so the pass shows
                // what a real cleanup would touch.
                let plans = plan(&config)?;
                let names: Vec<&str> = plans.iter().map(|p| p.name.as_str()).collect();
                let mut runtime = InMemoryRuntime::with_containers(&names);
                clean(&config, &mut runtime)?
            } else {
                let mut runtime = docker_runtime(&args.docker)?;
                clean(&config, &mut runtime)?
            };

            info!("cleanup complete");
            println!("{}", format_report(&report, &format));
            Ok(report.exit_code(no_fail))
        }
    }
}

fn docker_runtime(binary: &str) -> anyhow::Result<impl ContainerRuntime> {
    ensure_available(binary).context("container runtime check failed")?;
    Ok(DockerCli::with_binary(binary))
}
