use anyhow::{bail, Context, Result};
use ccloud_client::config::Config;
use ccloud_client::confluent::api_keys::{ApiKeyListOptions, CreateApiKeyReq, UpdateApiKeyReq};
use ccloud_client::confluent::client::ConfluentClient;
use ccloud_client::confluent::clusters::{
    ConfigUpdateEntry, KafkaClusterAvailability, KafkaClusterConfigReq,
    KafkaClusterConfigUpdateReq, KafkaClusterCreateReq, KafkaClusterKind,
    KafkaClusterListOptions, KafkaClusterUpdateReq,
};
use ccloud_client::confluent::common::{CloudProvider, ObjectReference, PaginationOptions};
use ccloud_client::confluent::environments::EnvironmentReq;
use ccloud_client::confluent::error::{describe_error, ClientError};
use ccloud_client::confluent::service_accounts::{
    CreateServiceAccountReq, UpdateServiceAccountReq,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Command line client for Confluent Cloud
#[derive(Parser, Debug)]
#[command(name = "ccloud", version, about, long_about = None)]
struct Args {
    /// Cloud API key (defaults to CONFLUENT_CLOUD_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Cloud API secret (defaults to CONFLUENT_CLOUD_API_SECRET)
    #[arg(long, global = true)]
    api_secret: Option<String>,

    /// Control-plane endpoint (defaults to CONFLUENT_CLOUD_ENDPOINT)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Request timeout in seconds (none by default)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Local configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    #[command(flatten)]
    Resource(ResourceCommand),
}

/// Commands that talk to the Confluent Cloud API
#[derive(Subcommand, Debug)]
enum ResourceCommand {
    /// Kafka clusters and broker configs
    #[command(subcommand)]
    Clusters(ClusterCommand),
    /// API keys
    #[command(subcommand)]
    ApiKeys(ApiKeyCommand),
    /// Environments
    #[command(subcommand)]
    Environments(EnvironmentCommand),
    /// Service accounts
    #[command(subcommand)]
    ServiceAccounts(ServiceAccountCommand),
}

#[derive(clap::Args, Debug)]
struct PageArgs {
    #[arg(long)]
    page_size: Option<u32>,
    #[arg(long)]
    page_token: Option<String>,
}

impl From<PageArgs> for PaginationOptions {
    fn from(args: PageArgs) -> Self {
        Self {
            page_size: args.page_size,
            page_token: args.page_token,
        }
    }
}

#[derive(Subcommand, Debug)]
enum ClusterCommand {
    List {
        #[arg(short, long)]
        environment: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    Get {
        id: String,
        #[arg(short, long)]
        environment: Option<String>,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "SINGLE_ZONE")]
        availability: KafkaClusterAvailability,
        #[arg(long)]
        cloud: CloudProvider,
        #[arg(long)]
        region: String,
        #[arg(long, default_value = "Basic")]
        kind: KafkaClusterKind,
        /// Capacity units, Dedicated clusters only
        #[arg(long)]
        cku: Option<u32>,
        #[arg(short, long)]
        environment: Option<String>,
        #[arg(long)]
        network: Option<String>,
    },
    Update {
        id: String,
        #[arg(short, long)]
        environment: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        kind: Option<KafkaClusterKind>,
        #[arg(long, requires = "kind")]
        cku: Option<u32>,
    },
    Delete {
        id: String,
        #[arg(short, long)]
        environment: Option<String>,
    },
    /// Set one broker config through the cluster REST endpoint
    SetConfig {
        id: String,
        #[arg(long)]
        rest_endpoint: String,
        name: String,
        value: String,
    },
    /// Apply several broker config changes at once
    AlterConfigs {
        id: String,
        #[arg(long)]
        rest_endpoint: String,
        /// NAME=VALUE, repeatable
        #[arg(long = "set", value_parser = parse_key_val)]
        set: Vec<(String, String)>,
        /// Config name to reset, repeatable
        #[arg(long = "delete")]
        delete: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ApiKeyCommand {
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Owning user or service account id
        #[arg(long)]
        owner: String,
        /// Resource the key grants access to (cluster id)
        #[arg(long)]
        resource: Option<String>,
        #[arg(long, requires = "resource")]
        resource_environment: Option<String>,
    },
    List {
        #[arg(long)]
        owner: Option<String>,
        #[arg(long)]
        resource: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    Get {
        id: String,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum EnvironmentCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    Get {
        id: String,
    },
    Create {
        #[arg(long)]
        name: String,
    },
    Update {
        id: String,
        #[arg(long)]
        name: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum ServiceAccountCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    Get {
        id: String,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Update {
        id: String,
        #[arg(long)]
        description: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Remember a default environment for cluster commands
    UseEnvironment { id: String },
    /// Print the effective configuration
    Show,
}

fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid NAME=VALUE: no '=' found in '{}'", s))?;
    if name.is_empty() {
        return Err(format!("invalid NAME=VALUE: empty name in '{}'", s));
    }
    Ok((name.to_string(), value.to_string()))
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: cannot open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("ccloud started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("ccloud").join("ccloud.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".ccloud").join("ccloud.log");
    }
    PathBuf::from("ccloud.log")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn require_environment(config: &Config, environment: Option<String>) -> Result<String> {
    match config.effective_environment(environment) {
        Some(environment) => Ok(environment),
        None => bail!("No environment given. Use --environment or 'ccloud config use-environment <id>'"),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:?}", err);
            match err.downcast_ref::<ClientError>() {
                Some(client_err) => {
                    eprintln!("Error: {}", client_err);
                    let hint = describe_error(client_err);
                    if hint != client_err.to_string() {
                        eprintln!("{}", hint);
                    }
                }
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = Config::load();

    let command = match args.command {
        Command::Config(command) => return run_config(&mut config, command),
        Command::Resource(command) => command,
    };

    let credentials = config.effective_credentials(args.api_key, args.api_secret)?;
    let client_config = config.client_config(args.endpoint, args.timeout.map(Duration::from_secs));
    tracing::info!("Using endpoint: {}", client_config.endpoint);

    let client = ConfluentClient::new(credentials, client_config)
        .context("Failed to initialize Confluent Cloud client")?;

    match command {
        ResourceCommand::Clusters(command) => run_clusters(&client, &config, command).await,
        ResourceCommand::ApiKeys(command) => run_api_keys(&client, command).await,
        ResourceCommand::Environments(command) => run_environments(&client, command).await,
        ResourceCommand::ServiceAccounts(command) => {
            run_service_accounts(&client, command).await
        }
    }
}

fn run_config(config: &mut Config, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::UseEnvironment { id } => {
            config.set_environment(&id)?;
            println!("Default environment set to {}", id);
        }
        ConfigCommand::Show => {
            let mut shown = config.clone();
            if shown.api_secret.is_some() {
                shown.api_secret = Some("***".to_string());
            }
            print_json(&shown)?;
        }
    }
    Ok(())
}

async fn run_clusters(client: &ConfluentClient, config: &Config, command: ClusterCommand) -> Result<()> {
    match command {
        ClusterCommand::List { environment, page } => {
            let opts = KafkaClusterListOptions {
                pagination: page.into(),
                environment: Some(require_environment(config, environment)?),
            };
            print_json(&client.list_kafka_clusters(Some(&opts)).await?)
        }
        ClusterCommand::Get { id, environment } => {
            let opts = KafkaClusterListOptions::for_environment(require_environment(config, environment)?);
            print_json(&client.get_kafka_cluster(&id, Some(&opts)).await?)
        }
        ClusterCommand::Create {
            name,
            availability,
            cloud,
            region,
            kind,
            cku,
            environment,
            network,
        } => {
            let environment = require_environment(config, environment)?;
            let create = KafkaClusterCreateReq {
                display_name: name,
                availability,
                cloud,
                region,
                config: KafkaClusterConfigReq { kind, cku },
                network: network.map(|id| ObjectReference::new(id).in_environment(&environment)),
                environment: ObjectReference::new(environment),
            };
            print_json(&client.create_kafka_cluster(&create).await?)
        }
        ClusterCommand::Update {
            id,
            environment,
            name,
            kind,
            cku,
        } => {
            if name.is_none() && kind.is_none() {
                bail!("Nothing to update. Pass --name and/or --kind");
            }
            let update = KafkaClusterUpdateReq {
                display_name: name,
                config: kind.map(|kind| KafkaClusterConfigReq { kind, cku }),
                environment: ObjectReference::new(require_environment(config, environment)?),
            };
            print_json(&client.update_kafka_cluster(&id, &update).await?)
        }
        ClusterCommand::Delete { id, environment } => {
            let opts = KafkaClusterListOptions::for_environment(require_environment(config, environment)?);
            client.delete_kafka_cluster(&id, Some(&opts)).await?;
            println!("Deleted kafka cluster {}", id);
            Ok(())
        }
        ClusterCommand::SetConfig {
            id,
            rest_endpoint,
            name,
            value,
        } => {
            client
                .update_kafka_cluster_config(&rest_endpoint, &id, &name, &value)
                .await?;
            println!("Updated {} on {}", name, id);
            Ok(())
        }
        ClusterCommand::AlterConfigs {
            id,
            rest_endpoint,
            set,
            delete,
        } => {
            let data: Vec<ConfigUpdateEntry> = set
                .into_iter()
                .map(|(name, value)| ConfigUpdateEntry::set(name, value))
                .chain(delete.into_iter().map(ConfigUpdateEntry::delete))
                .collect();
            if data.is_empty() {
                bail!("Nothing to alter. Pass --set NAME=VALUE and/or --delete NAME");
            }
            let count = data.len();
            client
                .update_kafka_cluster_configs(&rest_endpoint, &id, &KafkaClusterConfigUpdateReq { data })
                .await?;
            println!("Applied {} config change(s) on {}", count, id);
            Ok(())
        }
    }
}

async fn run_api_keys(client: &ConfluentClient, command: ApiKeyCommand) -> Result<()> {
    match command {
        ApiKeyCommand::Create {
            name,
            description,
            owner,
            resource,
            resource_environment,
        } => {
            let resource = resource.map(|id| {
                let reference = ObjectReference::new(id);
                match resource_environment {
                    Some(env) => reference.in_environment(env),
                    None => reference,
                }
            });
            let create = CreateApiKeyReq {
                display_name: name,
                description,
                owner: ObjectReference::new(owner),
                resource,
            };
            print_json(&client.create_api_key(&create).await?)
        }
        ApiKeyCommand::List { owner, resource, page } => {
            let opts = ApiKeyListOptions {
                pagination: page.into(),
                owner,
                resource,
            };
            print_json(&client.list_api_keys(Some(&opts)).await?)
        }
        ApiKeyCommand::Get { id } => print_json(&client.get_api_key(&id).await?),
        ApiKeyCommand::Update { id, name, description } => {
            let update = UpdateApiKeyReq {
                display_name: name,
                description,
            };
            print_json(&client.update_api_key(&id, &update).await?)
        }
        ApiKeyCommand::Delete { id } => {
            client.delete_api_key(&id).await?;
            println!("Deleted API key {}", id);
            Ok(())
        }
    }
}

async fn run_environments(client: &ConfluentClient, command: EnvironmentCommand) -> Result<()> {
    match command {
        EnvironmentCommand::List { page } => {
            print_json(&client.list_environments(Some(&page.into())).await?)
        }
        EnvironmentCommand::Get { id } => print_json(&client.get_environment(&id).await?),
        EnvironmentCommand::Create { name } => {
            let create = EnvironmentReq { display_name: name };
            print_json(&client.create_environment(&create).await?)
        }
        EnvironmentCommand::Update { id, name } => {
            let update = EnvironmentReq { display_name: name };
            print_json(&client.update_environment(&id, &update).await?)
        }
        EnvironmentCommand::Delete { id } => {
            client.delete_environment(&id).await?;
            println!("Deleted environment {}", id);
            Ok(())
        }
    }
}

async fn run_service_accounts(client: &ConfluentClient, command: ServiceAccountCommand) -> Result<()> {
    match command {
        ServiceAccountCommand::List { page } => {
            print_json(&client.list_service_accounts(Some(&page.into())).await?)
        }
        ServiceAccountCommand::Get { id } => print_json(&client.get_service_account(&id).await?),
        ServiceAccountCommand::Create { name, description } => {
            let create = CreateServiceAccountReq {
                display_name: name,
                description,
            };
            print_json(&client.create_service_account(&create).await?)
        }
        ServiceAccountCommand::Update { id, description } => {
            let update = UpdateServiceAccountReq { description };
            print_json(&client.update_service_account(&id, &update).await?)
        }
        ServiceAccountCommand::Delete { id } => {
            client.delete_service_account(&id).await?;
            println!("Deleted service account {}", id);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("retention.ms=604800000"),
            Ok(("retention.ms".to_string(), "604800000".to_string()))
        );
        assert_eq!(
            parse_key_val("cleanup.policy=compact,delete"),
            Ok(("cleanup.policy".to_string(), "compact,delete".to_string()))
        );
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=x").is_err());
    }

    #[test]
    fn test_parse_cluster_create() {
        let args = Args::try_parse_from([
            "ccloud", "clusters", "create", "--name", "prod", "--cloud", "aws", "--region",
            "us-east-1", "-e", "env-123",
        ])
        .unwrap();

        match args.command {
            Command::Resource(ResourceCommand::Clusters(ClusterCommand::Create {
                name,
                availability,
                cloud,
                kind,
                cku,
                environment,
                ..
            })) => {
                assert_eq!(name, "prod");
                assert_eq!(availability, KafkaClusterAvailability::SingleZone);
                assert_eq!(cloud, CloudProvider::Aws);
                assert_eq!(kind, KafkaClusterKind::Basic);
                assert_eq!(cku, None);
                assert_eq!(environment.as_deref(), Some("env-123"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_alter_configs() {
        let args = Args::try_parse_from([
            "ccloud",
            "clusters",
            "alter-configs",
            "lkc-1",
            "--rest-endpoint",
            "https://pkc-1.us-east-1.aws.confluent.cloud:443",
            "--set",
            "retention.ms=604800000",
            "--delete",
            "auto.create.topics.enable",
        ])
        .unwrap();

        match args.command {
            Command::Resource(ResourceCommand::Clusters(ClusterCommand::AlterConfigs {
                set,
                delete,
                ..
            })) => {
                assert_eq!(set, vec![("retention.ms".to_string(), "604800000".to_string())]);
                assert_eq!(delete, vec!["auto.create.topics.enable".to_string()]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_config_and_resource_commands_parse() {
        let args = Args::try_parse_from(["ccloud", "config", "use-environment", "env-1"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Config(ConfigCommand::UseEnvironment { ref id }) if id == "env-1"
        ));

        let args = Args::try_parse_from(["ccloud", "environments", "get", "env-1"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Resource(ResourceCommand::Environments(EnvironmentCommand::Get { .. }))
        ));
    }

    #[test]
    fn test_cku_requires_kind() {
        let result = Args::try_parse_from(["ccloud", "clusters", "update", "lkc-1", "--cku", "2"]);
        assert!(result.is_err());
    }
}
