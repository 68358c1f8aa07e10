use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use wallet_core::config::ClientConfig;
use wallet_core::errors::{CoreError, HttpFailure};
use wallet_core::models::kind::ResourceKind;
use wallet_core::models::resource::{errors_to_value, ErrorMap, Resource, ResourceId};
use wallet_core::services::GuardOutcome;
use wallet_core::Wallet;

#[derive(Debug, Parser)]
#[command(name = "wallet", version, about = "Manage accounts, categories and transactions")]
struct Cli {
    /// Config file (default: <config_dir>/wallet/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the API origin from the config file
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and remember the session
    Login {
        #[arg(long)]
        login: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show whether a valid session is stored
    Status,
    /// List a collection
    List {
        kind: Kind,
        /// Parent transaction id (details only)
        #[arg(long)]
        parent: Option<ResourceId>,
    },
    /// Fetch one record
    Show {
        kind: Kind,
        id: ResourceId,
        #[arg(long)]
        parent: Option<ResourceId>,
    },
    /// Create a record from a JSON object
    Create {
        kind: Kind,
        #[arg(long)]
        data: String,
        #[arg(long)]
        parent: Option<ResourceId>,
    },
    /// Update fields of a record from a JSON object
    Edit {
        kind: Kind,
        id: ResourceId,
        #[arg(long)]
        data: String,
        #[arg(long)]
        parent: Option<ResourceId>,
    },
    /// Delete a record
    Remove {
        kind: Kind,
        id: ResourceId,
        #[arg(long)]
        parent: Option<ResourceId>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Accounts,
    Categories,
    Transactions,
    Details,
}

impl From<Kind> for ResourceKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Accounts => ResourceKind::Accounts,
            Kind::Categories => ResourceKind::Categories,
            Kind::Transactions => ResourceKind::Transactions,
            Kind::Details => ResourceKind::Details,
        }
    }
}

/// Logs go to stderr, filtered by `WALLET_LOG` (e.g. `WALLET_LOG=wallet_core=debug`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("WALLET_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn load_config(cli: &Cli) -> Result<ClientConfig, CoreError> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load_from(path)?,
        None => ClientConfig::load()?,
    };
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    // One-shot process: nothing to animate.
    config.redirect_delay_ms = 0;
    config.validate()?;
    tracing::debug!(base_url = %config.base_url, session = %config.session_path().display(), "config loaded");
    Ok(config)
}

/// Placeholder record addressing an existing resource by id.
fn reference(kind: ResourceKind, id: ResourceId, parent: Option<ResourceId>) -> Resource {
    let resource = Resource::new().with("id", id);
    match (kind.parent_key(), parent) {
        (Some(key), Some(parent)) => resource.with(key, parent),
        _ => resource,
    }
}

fn parent_record(parent: Option<ResourceId>) -> Option<Resource> {
    parent.map(|id| Resource::new().with("id", id))
}

fn parse_data(data: &str) -> Result<Value, CoreError> {
    let value: Value = serde_json::from_str(data)?;
    if !value.is_object() {
        return Err(CoreError::Config("--data must be a JSON object".into()));
    }
    Ok(value)
}

fn print_json(value: &impl serde::Serialize) -> Result<(), CoreError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CoreError::Serialization(e.to_string()))?;
    println!("{text}");
    Ok(())
}

/// The error a non-completed guard outcome exits with. Server rejections
/// keep their HTTP status; the form errors travel in the body.
fn outcome_error(outcome: GuardOutcome, errors: &ErrorMap) -> Option<CoreError> {
    match outcome {
        GuardOutcome::Completed => None,
        GuardOutcome::LoginRequired | GuardOutcome::Unauthorized => Some(CoreError::InvalidToken(
            "not logged in; run `wallet login` first".into(),
        )),
        GuardOutcome::Rejected => Some(CoreError::Http(
            HttpFailure::new(400, errors_to_value(errors)).with_status_text("Bad Request"),
        )),
        GuardOutcome::Failed(status) => Some(CoreError::Http(HttpFailure::new(
            status,
            errors_to_value(errors),
        ))),
    }
}

/// Turn a guard outcome into a process result. Prints the collection
/// slice, or just record `id` when given, on success and the errors
/// otherwise.
fn report(
    wallet: &Wallet,
    kind: ResourceKind,
    id: Option<ResourceId>,
    outcome: GuardOutcome,
) -> Result<(), CoreError> {
    let state = wallet.state();
    let collection = state.collection(kind);
    if let Some(error) = outcome_error(outcome, &collection.errors) {
        if !collection.errors.is_empty() {
            print_json(&collection.errors)?;
        }
        return Err(error);
    }
    match id {
        Some(id) => match collection.find(id) {
            Some(record) => print_json(record),
            None => Err(CoreError::MissingId(format!("{} {id}", kind.resource_key()))),
        },
        None => print_json(&collection.items),
    }
}

async fn run(cli: Cli) -> Result<(), CoreError> {
    let config = load_config(&cli)?;
    let wallet = Wallet::new(&config)?;

    match cli.command {
        Command::Login { login, password } => {
            wallet.session().login(&login, &password).await?;
            println!("Logged in as {login}");
            Ok(())
        }
        Command::Logout => {
            wallet.session().logout();
            println!("Logged out");
            Ok(())
        }
        Command::Status => {
            let session = wallet.state().session;
            print_json(&serde_json::json!({
                "authenticated": session.is_authenticated(),
                "user": session.user.clone(),
                "expire": session.access_token.as_ref().map(|t| t.expire),
            }))
        }
        Command::List { kind, parent } => {
            let kind = ResourceKind::from(kind);
            let parent = parent_record(parent);
            wallet.navigate(&kind.list_route(parent.as_ref().and_then(Resource::id))?);
            let outcome = wallet.resources(kind).fetch_all(parent.as_ref()).await?;
            report(&wallet, kind, None, outcome)
        }
        Command::Show { kind, id, parent } => {
            let kind = ResourceKind::from(kind);
            let outcome = wallet
                .resources(kind)
                .fetch_one(&reference(kind, id, parent))
                .await?;
            report(&wallet, kind, Some(id), outcome)
        }
        Command::Create { kind, data, parent } => {
            let kind = ResourceKind::from(kind);
            let payload = parse_data(&data)?;
            let parent = parent_record(parent);
            let outcome = wallet
                .resources(kind)
                .create(parent.as_ref(), payload)
                .await?;
            report(&wallet, kind, None, outcome)
        }
        Command::Edit {
            kind,
            id,
            data,
            parent,
        } => {
            let kind = ResourceKind::from(kind);
            let payload = parse_data(&data)?;
            let target = reference(kind, id, parent);
            // Load the record first so the merged result is printed.
            wallet.resources(kind).fetch_one(&target).await?;
            let outcome = wallet.resources(kind).edit(&target, payload).await?;
            report(&wallet, kind, Some(id), outcome)
        }
        Command::Remove { kind, id, parent } => {
            let kind = ResourceKind::from(kind);
            let outcome = wallet
                .resources(kind)
                .remove(&reference(kind, id, parent))
                .await?;
            report(&wallet, kind, None, outcome)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
