use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use soz_ledger::config::{config_from_env, load_config, ClientConfig};
use soz_ledger::observability::logging;
use soz_ledger::session::{FileSessionStore, SessionStore};
use soz_ledger::{
    CreateEntity, CreatePromise, CreateWebhook, DashboardSession, DashboardSnapshot,
    LedgerClient, LedgerError, PromiseCategory, PromiseDetail, PromiseStatus, SubmitEvidence,
    UpdateWebhook, WebhookEventType,
};

#[derive(Parser)]
#[command(name = "ledger-cli")]
#[command(about = "Command-line client for the Soz Ledger", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Ledger base URL
    #[arg(short, long, global = true)]
    url: Option<String>,

    /// API key
    #[arg(short, long, global = true)]
    key: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Saved session file
    #[arg(long, global = true, default_value = ".soz-ledger-session.json")]
    session: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save connection settings and the entity to act as
    Login {
        #[arg(long)]
        entity: String,
    },
    /// Forget the saved session
    Logout,
    /// Entity overview: record, score, history and promises
    Dashboard {
        #[arg(long)]
        entity: Option<String>,
        #[arg(long, value_parser = parse_wire::<PromiseStatus>)]
        status: Option<PromiseStatus>,
    },
    /// Entities
    #[command(subcommand)]
    Entity(EntityCommand),
    /// Promises
    #[command(subcommand)]
    Promise(PromiseCommand),
    /// Evidence
    #[command(subcommand)]
    Evidence(EvidenceCommand),
    /// Trust scores
    #[command(subcommand)]
    Score(ScoreCommand),
    /// Webhooks
    #[command(subcommand)]
    Webhook(WebhookCommand),
}

#[derive(Subcommand)]
enum EntityCommand {
    Get { id: String },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long = "type", default_value = "agent")]
        entity_type: String,
        #[arg(long)]
        public_key: Option<String>,
        /// JSON object
        #[arg(long)]
        metadata: Option<String>,
    },
    Score { id: String },
    Promises {
        id: String,
        #[arg(long, value_parser = parse_wire::<PromiseStatus>)]
        status: Option<PromiseStatus>,
    },
}

#[derive(Subcommand)]
enum PromiseCommand {
    Get { id: String },
    Create {
        #[arg(long)]
        promisor: String,
        #[arg(long)]
        promisee: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        category: Option<String>,
        /// ISO-8601 timestamp
        #[arg(long)]
        deadline: Option<String>,
    },
    Fulfill { id: String },
    Break { id: String },
    Dispute { id: String },
    /// Promise with its evidence
    Detail { id: String },
}

#[derive(Subcommand)]
enum EvidenceCommand {
    Submit {
        promise_id: String,
        #[arg(long = "type", default_value = "manual")]
        evidence_type: String,
        #[arg(long)]
        submitted_by: String,
        /// JSON object
        #[arg(long)]
        payload: Option<String>,
    },
    List { promise_id: String },
}

#[derive(Subcommand)]
enum ScoreCommand {
    Get { entity_id: String },
    History { entity_id: String },
}

#[derive(Subcommand)]
enum WebhookCommand {
    Create {
        #[arg(long)]
        url: String,
        #[command(flatten)]
        events: EventList,
    },
    List,
    Get { id: String },
    Update {
        id: String,
        #[arg(long)]
        url: Option<String>,
        #[command(flatten)]
        events: EventList,
        #[arg(long)]
        active: Option<bool>,
    },
    Delete { id: String },
    Logs { id: String },
}

#[derive(Args)]
struct EventList {
    /// Comma-separated event types, e.g. promise.created,score.updated
    #[arg(long, value_delimiter = ',')]
    events: Vec<String>,
}

impl EventList {
    fn parse(&self) -> Vec<WebhookEventType> {
        self.events
            .iter()
            .filter_map(|e| e.trim().parse().ok())
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Config(#[from] soz_ledger::config::ConfigError),
    #[error(transparent)]
    Session(#[from] soz_ledger::session::SessionError),
    #[error("{0}")]
    Usage(String),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging("warn");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Ledger(e)) => {
            eprintln!("Error: {}", e.message());
            eprintln!("  status: {}", e.status());
            if let Some(code) = e.code() {
                eprintln!("  code:   {code}");
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let store = FileSessionStore::new(&cli.session);
    let session = store.load()?;
    let config = resolve_config(&cli, session.as_ref())?;
    let client = LedgerClient::from_config(config.clone());

    match cli.command {
        Commands::Login { entity } => {
            let record = client.entities().get(&entity).await?;
            store.save(&DashboardSession::new(config.base_url, config.api_key, entity))?;
            print_json(&record)
        }
        Commands::Logout => {
            store.clear()?;
            println!("Session cleared");
            Ok(())
        }
        Commands::Dashboard { entity, status } => {
            let entity_id = entity
                .or_else(|| session.map(|s| s.entity_id))
                .ok_or_else(|| CliError::Usage("no entity given and no saved session".into()))?;
            let snapshot = DashboardSnapshot::load_filtered(&client, &entity_id, status).await?;
            print_json(&snapshot)
        }
        Commands::Entity(command) => entity(&client, command).await,
        Commands::Promise(command) => promise(&client, command).await,
        Commands::Evidence(command) => evidence(&client, command).await,
        Commands::Score(command) => score(&client, command).await,
        Commands::Webhook(command) => webhook(&client, command).await,
    }
}

/// Flags, then the saved session, then the config file, then defaults.
fn resolve_config(cli: &Cli, session: Option<&DashboardSession>) -> Result<ClientConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?.client,
        None => config_from_env(|key| std::env::var(key).ok())?.client,
    };

    if let Some(session) = session {
        config.base_url = session.base_url.clone();
        config.api_key = session.api_key.clone();
    }
    if let Some(url) = &cli.url {
        config.base_url = url.clone();
    }
    if let Some(key) = &cli.key {
        config.api_key = key.clone();
    }
    if let Some(ms) = cli.timeout_ms {
        config = config.with_timeout(Duration::from_millis(ms));
    }
    Ok(config)
}

async fn entity(client: &LedgerClient, command: EntityCommand) -> Result<(), CliError> {
    match command {
        EntityCommand::Get { id } => print_json(&client.entities().get(&id).await?),
        EntityCommand::Create {
            name,
            entity_type,
            public_key,
            metadata,
        } => {
            let mut payload = CreateEntity::new(name, wire(&entity_type)?);
            payload.public_key = public_key;
            payload.metadata = metadata.as_deref().map(json_object).transpose()?;
            print_json(&client.entities().create(&payload).await?)
        }
        EntityCommand::Score { id } => print_json(&client.entities().score(&id).await?),
        EntityCommand::Promises { id, status } => {
            print_json(&client.entities().promises(&id, status).await?)
        }
    }
}

async fn promise(client: &LedgerClient, command: PromiseCommand) -> Result<(), CliError> {
    let promises = client.promises();
    match command {
        PromiseCommand::Get { id } => print_json(&promises.get(&id).await?),
        PromiseCommand::Create {
            promisor,
            promisee,
            description,
            category,
            deadline,
        } => {
            let mut payload = CreatePromise::new(promisor, promisee, description);
            payload.category = category.as_deref().map(wire::<PromiseCategory>).transpose()?;
            payload.deadline = deadline;
            print_json(&promises.create(&payload).await?)
        }
        PromiseCommand::Fulfill { id } => print_json(&promises.fulfill(&id).await?),
        PromiseCommand::Break { id } => print_json(&promises.break_promise(&id).await?),
        PromiseCommand::Dispute { id } => print_json(&promises.dispute(&id).await?),
        PromiseCommand::Detail { id } => print_json(&PromiseDetail::load(client, &id).await?),
    }
}

async fn evidence(client: &LedgerClient, command: EvidenceCommand) -> Result<(), CliError> {
    match command {
        EvidenceCommand::Submit {
            promise_id,
            evidence_type,
            submitted_by,
            payload,
        } => {
            let mut body = SubmitEvidence::new(wire(&evidence_type)?, submitted_by);
            body.payload = payload.as_deref().map(json_object).transpose()?;
            print_json(&client.evidence().submit(&promise_id, &body).await?)
        }
        EvidenceCommand::List { promise_id } => {
            print_json(&client.evidence().list(&promise_id).await?)
        }
    }
}

async fn score(client: &LedgerClient, command: ScoreCommand) -> Result<(), CliError> {
    match command {
        ScoreCommand::Get { entity_id } => print_json(&client.scores().get(&entity_id).await?),
        ScoreCommand::History { entity_id } => {
            print_json(&client.scores().history(&entity_id).await?)
        }
    }
}

async fn webhook(client: &LedgerClient, command: WebhookCommand) -> Result<(), CliError> {
    let webhooks = client.webhooks();
    match command {
        WebhookCommand::Create { url, events } => {
            print_json(&webhooks.create(&CreateWebhook::new(url, events.parse())).await?)
        }
        WebhookCommand::List => print_json(&webhooks.list().await?),
        WebhookCommand::Get { id } => print_json(&webhooks.get(&id).await?),
        WebhookCommand::Update {
            id,
            url,
            events,
            active,
        } => {
            let event_types = events.parse();
            let update = UpdateWebhook {
                url,
                event_types: (!event_types.is_empty()).then_some(event_types),
                is_active: active,
            };
            print_json(&webhooks.update(&id, &update).await?)
        }
        WebhookCommand::Delete { id } => {
            webhooks.delete(&id).await?;
            println!("Deleted {id}");
            Ok(())
        }
        WebhookCommand::Logs { id } => print_json(&webhooks.logs(&id).await?),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::Usage(format!("cannot render output: {e}")))?;
    println!("{text}");
    Ok(())
}

/// Parse a wire-format enum value such as `agent` or `delivery`.
fn wire<T: DeserializeOwned>(value: &str) -> Result<T, CliError> {
    serde_json::from_value(Value::String(value.to_string()))
        .map_err(|e| CliError::Usage(format!("invalid value '{value}': {e}")))
}

fn parse_wire<T: DeserializeOwned>(value: &str) -> Result<T, String> {
    wire(value).map_err(|e| e.to_string())
}

fn json_object(raw: &str) -> Result<Map<String, Value>, CliError> {
    serde_json::from_str(raw).map_err(|e| CliError::Usage(format!("expected a JSON object: {e}")))
}
