//! Agency OS CLI - chat with your operations desk

use std::path::PathBuf;
use std::sync::Arc;

use agencyos_core::Error;
use agencyos_core::commands::Interpreter;
use agencyos_core::config::Config;
use agencyos_core::entities::{
    ClientPatch, ClientStatus, NewClient, NewTask, Priority, Role, TaskStatus,
};
use agencyos_core::gateway::{JsonFileGateway, sheet_gateway_from_config};
use agencyos_core::random::{RandomSource, SeededRandom};
use agencyos_core::store::{EntityStore, SharedStore, StoreOptions};
use agencyos_core::validation::EntryValidator;
use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, error, warn};

#[derive(Parser)]
#[command(name = "agencyos")]
#[command(author, version, about = "Command-driven operations desk for small agencies", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat with the desk
    Chat,

    /// Send one command and print the reply
    Ask {
        /// Free-text command, e.g. "task: call the accountant"
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Manage tasks
    Tasks {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Manage clients
    Clients {
        #[command(subcommand)]
        action: ClientAction,
    },

    /// List projects
    Projects {
        #[command(subcommand)]
        action: ListAction,
    },

    /// List the content calendar
    Content {
        #[command(subcommand)]
        action: ListAction,
    },

    /// List brand assets
    Assets {
        #[command(subcommand)]
        action: ListAction,
    },

    /// List weekly metrics
    Metrics {
        #[command(subcommand)]
        action: ListAction,
    },

    /// Clear all data and load the demo set
    Reset,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Run health check
    Doctor,
}

#[derive(Subcommand)]
enum ListAction {
    /// List all records
    List,
}

#[derive(Subcommand)]
enum TaskAction {
    /// List tasks
    List {
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Add a task
    Add {
        name: String,
        /// architect, merchant, manager or strategist
        #[arg(short, long)]
        owner: Option<String>,
        /// low, medium or high
        #[arg(short, long)]
        priority: Option<String>,
        /// Project ID or name
        #[arg(long)]
        project: Option<String>,
    },
}

#[derive(Subcommand)]
enum ClientAction {
    /// List clients
    List,
    /// Add a client
    Add {
        /// Contact name
        name: String,
        #[arg(short, long)]
        company: String,
        /// Deal value
        #[arg(short, long, default_value_t = 0)]
        deal: u64,
        #[arg(short, long)]
        email: Option<String>,
        /// lead, negotiation, active or churned
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Change a client's status
    Status { id: String, status: String },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
    /// Show config file path
    Path,
}

/// The wired store and interpreter for one process
struct Desk {
    store: SharedStore,
    interpreter: Interpreter,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let directive = if cli.verbose {
        "agencyos=debug"
    } else {
        "agencyos=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let out = Output {
        format: cli.format,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Config { action } => cmd_config(action, out.quiet),
        Commands::Doctor => cmd_doctor(out.quiet).await,
        command => {
            let config = load_config()?;
            let desk = open_desk(&config).await?;
            match command {
                Commands::Chat => cmd_chat(&desk, out).await,
                Commands::Ask { text } => cmd_ask(&desk, &text.join(" "), out).await,
                Commands::Tasks { action } => cmd_tasks(&desk, action, out).await,
                Commands::Clients { action } => cmd_clients(&desk, action, out).await,
                Commands::Projects { .. } => {
                    let store = desk.store.lock().await;
                    out.list(store.projects(), |p| {
                        let deadline = p
                            .deadline
                            .map(|d| format!(", due {}", d))
                            .unwrap_or_default();
                        format!("  {} - {} [{}]{}", short_id(&p.id), p.name, p.status, deadline)
                    })
                }
                Commands::Content { .. } => {
                    let store = desk.store.lock().await;
                    out.list(store.content(), |c| {
                        format!(
                            "  {} - {} {:<9} [{}] {}",
                            short_id(&c.id),
                            c.post_date,
                            c.platform.as_str(),
                            c.status,
                            c.hook
                        )
                    })
                }
                Commands::Assets { .. } => {
                    let store = desk.store.lock().await;
                    out.list(store.assets(), |a| {
                        format!(
                            "  {} - {} ({}) {}",
                            short_id(&a.id),
                            a.name,
                            a.kind.as_str(),
                            a.link
                        )
                    })
                }
                Commands::Metrics { .. } => {
                    let store = desk.store.lock().await;
                    out.list(store.metrics(), |m| {
                        format!(
                            "  {} - ${} revenue, +{} users, top: {}",
                            m.week_ending, m.revenue, m.new_users, m.top_item
                        )
                    })
                }
                Commands::Reset => cmd_reset(&desk, out).await,
                Commands::Config { .. } | Commands::Doctor => Ok(()),
            }
        }
    }
}

fn load_config() -> anyhow::Result<Config> {
    Config::load()
        .map_err(|e| Error::ConfigError(format!("{:#}", e)))
        .context("Run `agencyos config reset` to restore defaults")
}

async fn open_desk(config: &Config) -> anyhow::Result<Desk> {
    let path = config.storage.resolved_snapshot_path()?;
    debug!(path = %path.display(), "Opening snapshot");

    let random: Arc<dyn RandomSource> = Arc::new(SeededRandom::from_entropy());
    let store = EntityStore::open(
        Arc::new(JsonFileGateway::new(path)),
        random.clone(),
        StoreOptions::from_config(config),
    )
    .await
    .into_shared();

    let interpreter = Interpreter::builder()
        .store(store.clone())
        .sheet(sheet_gateway_from_config(config))
        .random(random)
        .config(config.clone())
        .build()
        .inspect_err(|e| error!(code = e.code(), fatal = e.is_fatal(), "Interpreter wiring failed"))?;

    Ok(Desk { store, interpreter })
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

#[derive(Clone, Copy)]
struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    fn json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    fn list<T: Serialize>(&self, items: &[T], line: impl Fn(&T) -> String) -> anyhow::Result<()> {
        if self.json() {
            println!("{}", serde_json::to_string_pretty(items)?);
            return Ok(());
        }
        if items.is_empty() {
            if !self.quiet {
                println!("Nothing here yet.");
            }
            return Ok(());
        }
        for item in items {
            println!("{}", line(item));
        }
        Ok(())
    }

    fn record<T: Serialize>(&self, item: &T, message: String) -> anyhow::Result<()> {
        if self.json() {
            println!("{}", serde_json::to_string_pretty(item)?);
        } else if !self.quiet {
            println!("{}", message);
        }
        Ok(())
    }
}

fn warn_if_unsaved(store: &mut EntityStore) {
    if store.take_save_failure() {
        warn!("Snapshot could not be saved");
        eprintln!("Warning: changes could not be saved. Run `agencyos doctor`.");
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

async fn cmd_ask(desk: &Desk, text: &str, out: Output) -> anyhow::Result<()> {
    let reply = desk.interpreter.interpret(text).await;
    if out.json() {
        let body = serde_json::json!({ "input": text, "reply": reply });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!("{}", reply);
    }
    Ok(())
}

fn history_path() -> Option<PathBuf> {
    Config::config_dir().ok().map(|dir| dir.join("history.txt"))
}

async fn cmd_chat(desk: &Desk, out: Output) -> anyhow::Result<()> {
    use rustyline::DefaultEditor;
    use rustyline::error::ReadlineError;

    let mut rl = DefaultEditor::new().map_err(|e| anyhow!("Failed to start line editor: {}", e))?;
    let history = history_path();
    if let Some(path) = &history {
        if rl.load_history(path).is_err() {
            debug!(path = %path.display(), "No chat history yet");
        }
    }

    if !out.quiet {
        println!("Agency OS chat. Type `help` for examples, `exit` to quit.\n");
    }

    loop {
        let line = match rl.readline("agencyos> ") {
            Ok(line) => line,
            Err(ReadlineError::Eof) => break,
            Err(ReadlineError::Interrupted) => continue,
            Err(e) => return Err(anyhow!("Readline error: {}", e)),
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            break;
        }
        if let Err(e) = rl.add_history_entry(line) {
            debug!(error = %e, "Failed to record history entry");
        }

        let reply = desk.interpreter.interpret(line).await;
        println!("{}\n", reply);
    }

    if let Some(path) = &history {
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        if let Err(e) = rl.save_history(path) {
            warn!(error = %e, "Failed to save chat history");
        }
    }
    Ok(())
}

async fn cmd_tasks(desk: &Desk, action: TaskAction, out: Output) -> anyhow::Result<()> {
    match action {
        TaskAction::List { status } => {
            let filter = match status.as_deref() {
                Some(s) => Some(
                    TaskStatus::parse(s)
                        .ok_or_else(|| anyhow!("Unknown task status: {}", s))?,
                ),
                None => None,
            };
            let store = desk.store.lock().await;
            let tasks: Vec<_> = store
                .tasks()
                .iter()
                .filter(|t| filter.is_none_or(|s| t.status == s))
                .cloned()
                .collect();
            out.list(&tasks, |t| {
                let due = t
                    .due_date
                    .map(|d| format!(", due {}", d.format("%Y-%m-%d")))
                    .unwrap_or_default();
                format!(
                    "  {} - {} [{}] ({}, {}{})",
                    short_id(&t.id),
                    t.name,
                    t.status,
                    t.owner,
                    t.priority,
                    due
                )
            })
        }
        TaskAction::Add {
            name,
            owner,
            priority,
            project,
        } => {
            let mut new = NewTask::new(name);
            if let Some(owner) = owner {
                new = new.owned_by(
                    Role::parse(&owner).ok_or_else(|| anyhow!("Unknown role: {}", owner))?,
                );
            }
            if let Some(priority) = priority {
                new = new.with_priority(
                    Priority::parse(&priority)
                        .ok_or_else(|| anyhow!("Unknown priority: {}", priority))?,
                );
            }
            EntryValidator::validate_task(&new)?;

            let mut store = desk.store.lock().await;
            if let Some(project) = project {
                let found = store
                    .projects()
                    .iter()
                    .find(|p| p.id == project || p.id.starts_with(&project) || p.name == project)
                    .map(|p| p.id.clone())
                    .ok_or_else(|| {
                        anyhow!(
                            "Project '{}' not found. Run `agencyos projects list` to see all projects.",
                            project
                        )
                    })?;
                new = new.in_project(Some(found));
            }

            let task = store.add_task(new).await;
            warn_if_unsaved(&mut store);
            out.record(
                &task,
                format!(
                    "Task created.\n  ID: {}\n  Name: {}\n  Owner: {}",
                    task.id, task.name, task.owner
                ),
            )
        }
    }
}

async fn cmd_clients(desk: &Desk, action: ClientAction, out: Output) -> anyhow::Result<()> {
    match action {
        ClientAction::List => {
            let store = desk.store.lock().await;
            out.list(store.clients(), |c| {
                format!(
                    "  {} - {} ({}) [{}] ${}",
                    short_id(&c.id),
                    c.company,
                    c.name,
                    c.status,
                    c.deal_value
                )
            })
        }
        ClientAction::Add {
            name,
            company,
            deal,
            email,
            status,
        } => {
            let mut new = NewClient::new(name, company, deal);
            if let Some(email) = email {
                new = new.with_email(email);
            }
            if let Some(status) = status {
                new = new.with_status(parse_client_status(&status)?);
            }
            EntryValidator::validate_client(&new)?;

            let mut store = desk.store.lock().await;
            let client = store.add_client(new).await;
            warn_if_unsaved(&mut store);
            out.record(
                &client,
                format!(
                    "Client created.\n  ID: {}\n  Company: {}\n  Status: {}",
                    client.id, client.company, client.status
                ),
            )
        }
        ClientAction::Status { id, status } => {
            let status = parse_client_status(&status)?;
            let mut store = desk.store.lock().await;
            let client_id = store
                .clients()
                .iter()
                .find(|c| c.id == id || c.id.starts_with(&id))
                .map(|c| c.id.clone())
                .ok_or_else(|| {
                    anyhow!(
                        "Client '{}' not found. Run `agencyos clients list` to see all clients.",
                        id
                    )
                })?;

            let projects_before = store.projects().len();
            store
                .update_client(&client_id, ClientPatch::status(status))
                .await;
            warn_if_unsaved(&mut store);

            let Some(client) = store.snapshot().client(&client_id).cloned() else {
                return Err(anyhow!("Client '{}' disappeared during update", id));
            };
            let mut message = format!("{} is now {}.", client.company, client.status);
            if store.projects().len() > projects_before {
                message.push_str(&format!(
                    "\nOnboarding project created: {} Onboarding",
                    client.company
                ));
            }
            out.record(&client, message)
        }
    }
}

fn parse_client_status(s: &str) -> anyhow::Result<ClientStatus> {
    ClientStatus::parse(s).ok_or_else(|| {
        anyhow!(
            "Unknown client status: {}. Use lead, negotiation, active or churned.",
            s
        )
    })
}

async fn cmd_reset(desk: &Desk, out: Output) -> anyhow::Result<()> {
    let mut store = desk.store.lock().await;
    store.reset().await;
    warn_if_unsaved(&mut store);
    if !out.quiet {
        println!(
            "Data reset. Loaded {} tasks, {} clients and {} projects.",
            store.tasks().len(),
            store.clients().len(),
            store.projects().len()
        );
    }
    Ok(())
}

fn cmd_config(action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for (key, value) in config.list()? {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

async fn cmd_doctor(quiet: bool) -> anyhow::Result<()> {
    if !quiet {
        println!("Agency OS Health Check");
        println!("======================");
        println!();
    }

    let mut all_ok = true;

    let config = match Config::load() {
        Ok(config) => {
            if !quiet {
                println!("[OK] Configuration: Valid");
            }
            config
        }
        Err(e) => {
            if !quiet {
                println!("[!!] Configuration: Error - {:#}", e);
                println!();
                println!("Some checks failed. See above for details.");
            }
            return Ok(());
        }
    };

    if !quiet {
        match Config::config_path() {
            Ok(path) if path.exists() => println!("[OK] Config file: {}", path.display()),
            Ok(path) => println!("[--] Config file: {} (using defaults)", path.display()),
            Err(e) => println!("[!!] Config file: Error - {}", e),
        }

        match config.export.resolved_webhook_url() {
            Some(_) => println!("[OK] Sheet export: Webhook configured"),
            None => {
                println!("[--] Sheet export: Disabled");
                println!("     Set AGENCYOS_SHEET_WEBHOOK to export drafts");
            }
        }
    }

    match config.storage.resolved_snapshot_path() {
        Ok(path) => match open_desk(&config).await {
            Ok(desk) => {
                let mut store = desk.store.lock().await;
                if store.take_save_failure() {
                    all_ok = false;
                    if !quiet {
                        println!("[!!] Snapshot: {} is not writable", path.display());
                    }
                } else if !quiet {
                    println!("[OK] Snapshot: {}", path.display());
                }
                if !quiet {
                    println!(
                        "     Tasks: {}, Clients: {}, Projects: {}, Content: {}",
                        store.tasks().len(),
                        store.clients().len(),
                        store.projects().len(),
                        store.content().len()
                    );
                }
            }
            Err(e) => {
                all_ok = false;
                if !quiet {
                    println!("[!!] Store: Failed to open - {:#}", e);
                }
            }
        },
        Err(e) => {
            all_ok = false;
            if !quiet {
                println!("[!!] Snapshot: Error - {}", e);
            }
        }
    }

    if !quiet {
        println!();
        if all_ok {
            println!("All checks passed!");
        } else {
            println!("Some checks failed. See above for details.");
        }
    }

    Ok(())
}
