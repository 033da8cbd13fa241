use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use taskline_core::{Change, TaskManager, TaskUpdate, parse_due_date};
use tracing_subscriber::EnvFilter;

mod config;
mod display;
mod shell;
mod state;

use config::load_config;
use display::task_line;
use shell::save;

#[derive(Parser, Debug)]
#[command(name = "taskline", version, about = "Personal task tracker")]
struct Cli {
    /// Task store file (overrides config.toml [store].path)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a task and save
    Add {
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Due date, e.g. 2024-05-01 or 2024-05-01T09:00:00
        #[arg(long)]
        due: String,

        /// Status label (default: Pending)
        #[arg(long)]
        status: Option<String>,
    },

    /// List tasks, optionally only those with an exact status
    List {
        #[arg(long)]
        status: Option<String>,
    },

    /// Change fields of the first task with this id and save
    Update {
        task_id: u64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        due: Option<String>,

        #[arg(long)]
        status: Option<String>,
    },

    /// Delete every task with this id and save
    Delete { task_id: u64 },

    /// Interactive menu (add/list/update/delete/exit)
    Shell,

    /// Config file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.taskline/config.toml with defaults if it does not exist
    Init,

    /// Print the effective config and store path
    Show,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let cfg = load_config()?;

    let store_flag = cli.store;
    let open = |cfg: &config::Config| -> Result<TaskManager> {
        let store = cfg.resolve_store_path(store_flag.clone())?;
        tracing::debug!(store = %store.display(), "opening task store");
        TaskManager::open(&store).with_context(|| format!("loading {}", store.display()))
    };

    match cli.command {
        Command::Add {
            title,
            description,
            due,
            status,
        } => {
            let due_date = parse_due_date(&due)?;
            let mut manager = open(&cfg)?;
            let line = task_line(manager.add(title, description, due_date, status.as_deref()));
            save(&manager)?;
            println!("Added {}", line);
        }

        Command::List { status } => {
            let manager = open(&cfg)?;
            let mut any = false;
            for t in manager.list(status.as_deref()) {
                println!("{}", task_line(t));
                any = true;
            }
            if !any {
                println!("No tasks.");
            }
        }

        Command::Update {
            task_id,
            title,
            description,
            due,
            status,
        } => {
            let patch = TaskUpdate {
                title,
                description,
                due_date: due.as_deref().map(parse_due_date).transpose()?,
                status,
            };
            if patch.is_empty() {
                bail!("nothing to update (pass --title, --description, --due or --status)");
            }

            let mut manager = open(&cfg)?;
            match manager.update(task_id, patch) {
                Change::Applied => {
                    save(&manager)?;
                    if let Some(t) = manager.get(task_id) {
                        println!("Updated {}", task_line(t));
                    }
                }
                Change::NoMatch => println!("No task with ID {}.", task_id),
            }
        }

        Command::Delete { task_id } => {
            let mut manager = open(&cfg)?;
            let removed = manager.delete(task_id);
            save(&manager)?;
            println!("Deleted {} task(s) with ID {}.", removed, task_id);
        }

        Command::Shell => {
            let mut manager = open(&cfg)?;
            let opts = shell::ShellOptions {
                save_after_delete: cfg.shell.save_after_delete,
            };
            let stdin = io::stdin();
            shell::run(&mut manager, opts, &mut stdin.lock(), &mut io::stdout())?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let store = cfg.resolve_store_path(store_flag.clone())?;
                println!("config: {}", config::config_path()?.display());
                println!("store: {}", store.display());
                println!("shell.save_after_delete: {}", cfg.shell.save_after_delete);
            }
        },
    }

    Ok(())
}

fn init_tracing() {
    let filter = if std::env::var("TASKLINE_DEBUG").is_ok() {
        EnvFilter::new("taskline=debug,taskline_core=debug")
    } else {
        match EnvFilter::try_from_default_env() {
            Ok(f) => f,
            Err(_) => return,
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
