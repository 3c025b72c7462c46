use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use hostmig_core::MigrateConfig;

mod commands;
mod logging;

#[derive(Parser)]
#[command(
    name = "hostmig",
    about = "Migrate tenant ingress hostnames to ProviderHost resources",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Path to a hostmig.toml config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Record store path (default: provider_hosts.dat)
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    /// Ingress backup log path (default: ingresses_backup.json)
    #[arg(long, global = true)]
    backup_file: Option<PathBuf>,
    /// kubectl binary to invoke
    #[arg(long, global = true)]
    kubectl: Option<PathBuf>,
    /// kubeconfig context to use
    #[arg(long, global = true)]
    context: Option<String>,
    /// kubeconfig file to use
    #[arg(long, global = true)]
    kubeconfig: Option<PathBuf>,
    /// Also write logs to this file (appended)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    /// Emit console logs as JSON
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Record every tenant ingress route into the record store.
    ///
    /// Overwrites the record store and the ingress backup log.
    Backup,
    /// Apply one ProviderHost per stored record.
    Create {
        /// Namespace to create ProviderHost resources in (default: lease)
        #[arg(short, long)]
        namespace: Option<String>,
        /// Validate against the API server without persisting
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete the original ingresses, once per tenant namespace.
    Purge {
        /// Validate against the API server without persisting
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the records in the store without touching the cluster.
    Show {
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Print the effective configuration as TOML.
    Config,
}

impl GlobalArgs {
    /// Config file values, overridden by any flag given on the command line.
    fn resolve(&self) -> anyhow::Result<MigrateConfig> {
        let mut config = match &self.config {
            Some(path) => MigrateConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => MigrateConfig::default(),
        };
        if let Some(store) = &self.store {
            config.store_path = store.clone();
        }
        if let Some(backup) = &self.backup_file {
            config.backup_path = backup.clone();
        }
        if let Some(kubectl) = &self.kubectl {
            config.kubectl.binary = kubectl.clone();
        }
        if let Some(context) = &self.context {
            config.kubectl.context = Some(context.clone());
        }
        if let Some(kubeconfig) = &self.kubeconfig {
            config.kubectl.kubeconfig = Some(kubeconfig.clone());
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(cli.global.log_file.as_deref(), cli.global.log_json)?;

    let mut config = cli.global.resolve()?;

    match cli.command {
        Commands::Backup => commands::backup::backup(&config),
        Commands::Create { namespace, dry_run } => {
            if let Some(namespace) = namespace {
                config.target_namespace = namespace;
            }
            commands::create::create(&config, dry_run)
        }
        Commands::Purge { dry_run } => commands::purge::purge(&config, dry_run),
        Commands::Show { format } => commands::show::show(&config, &format),
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}
