// src/main.rs
use clap::Parser;
use kube_bootstrap::{
    bootstrap_from_env,
    utils::logging::{FileLogger, Logger, MultiLogger, StderrLogger},
    BootstrapConfig, Registry, ResolvedTarget,
};
use serde::Serialize;
use std::{error::Error, io, process::ExitCode};

#[derive(Parser, Debug)]
#[command(author, version, about = "Resolve kubeconfig contexts into connection targets", long_about = None)]
pub struct Args {
    /// Kubeconfig path (defaults to $KUBECONFIG, then ~/.kube/config)
    #[arg(short, long)]
    pub kubeconfig: Option<String>,
    /// Bootstrap settings file (JSON)
    #[arg(short, long)]
    pub config: Option<String>,
    /// Show a single context instead of the whole registry
    #[arg(long)]
    pub context: Option<String>,
    #[arg(short, long)]
    pub debug: bool,
    #[arg(long)]
    pub log_file: Option<String>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct TargetSummary<'a> {
    context: &'a str,
    default: bool,
    server: &'a str,
    cluster: &'a str,
    user: &'a str,
    namespace: &'a str,
    credential: &'static str,
    has_ca: bool,
    insecure: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
}

#[derive(Serialize)]
struct SkippedSummary<'a> {
    context: &'a str,
    reason: String,
}

#[derive(Serialize)]
struct RegistrySummary<'a> {
    default: Option<&'a str>,
    targets: Vec<TargetSummary<'a>>,
    skipped: Vec<SkippedSummary<'a>>,
}

fn summarize<'a>(target: &'a ResolvedTarget, registry: &Registry) -> TargetSummary<'a> {
    TargetSummary {
        context: &target.context,
        default: registry.default_name() == Some(target.context.as_str()),
        server: &target.destination.addr,
        cluster: &target.cluster,
        user: &target.user,
        namespace: &target.namespace,
        credential: target.credential.mechanism(),
        has_ca: target.destination.ca_cert_pem.is_some(),
        insecure: target.destination.insecure_skip_tls_verify,
        project_id: target.project_id.as_deref(),
        location: target.location.as_deref(),
    }
}

fn load_settings(args: &Args) -> io::Result<BootstrapConfig> {
    let mut config = match &args.config {
        Some(path) => BootstrapConfig::load_from_file(path)?,
        None => BootstrapConfig::default(),
    };
    // Flags win over the settings file.
    if args.kubeconfig.is_some() {
        config.kubeconfig = args.kubeconfig.clone();
    }
    if args.log_file.is_some() {
        config.log_file = args.log_file.clone();
    }
    config.debug |= args.debug;
    config.validate()?;
    Ok(config)
}

fn make_logger(config: &BootstrapConfig) -> io::Result<Box<dyn Logger>> {
    let stderr = Box::new(StderrLogger::new(config.debug));
    let logger: Box<dyn Logger> = match &config.log_file {
        Some(path) => Box::new(
            MultiLogger::new()
                .with(stderr)
                .with(Box::new(FileLogger::new(path, config.debug)?)),
        ),
        None => stderr,
    };
    Ok(logger)
}

fn print_table(summary: &RegistrySummary) {
    println!(
        "{:<3}{:<40} {:<35} {:<15} {:<20}",
        "", "CONTEXT", "SERVER", "NAMESPACE", "CREDENTIAL"
    );
    for t in &summary.targets {
        let marker = if t.default { "*" } else { "" };
        println!(
            "{:<3}{:<40} {:<35} {:<15} {:<20}",
            marker, t.context, t.server, t.namespace, t.credential
        );
    }
    if let Some(def) = summary.targets.iter().find(|t| t.default) {
        if let (Some(project), Some(location)) = (def.project_id, def.location) {
            println!("\nDefault project: {}, location: {}", project, location);
        }
    }
    for s in &summary.skipped {
        println!("skipped {}: {}", s.context, s.reason);
    }
}

fn run(args: Args) -> Result<ExitCode, Box<dyn Error>> {
    let config = load_settings(&args)?;
    let logger = make_logger(&config)?;

    let Some(registry) = bootstrap_from_env(&config, logger)? else {
        eprintln!("No kubeconfig found");
        return Ok(ExitCode::FAILURE);
    };

    let targets: Vec<TargetSummary> = match &args.context {
        Some(name) => match registry.get(name) {
            Some(target) => vec![summarize(target, &registry)],
            None => {
                eprintln!("Context {} not found in registry", name);
                return Ok(ExitCode::FAILURE);
            }
        },
        None => registry.targets().map(|t| summarize(t, &registry)).collect(),
    };

    let summary = RegistrySummary {
        default: registry.default_name(),
        targets,
        skipped: registry
            .skipped()
            .iter()
            .map(|s| SkippedSummary {
                context: &s.context,
                reason: s.error.to_string(),
            })
            .collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_table(&summary);
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
