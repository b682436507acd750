//! Organizer CLI - links, calendar, goals, steps, kanban board and ideas canvas.

use clap::Parser;
use organizer::action_log;
use organizer::backup::BackupManager;
use organizer::cli::{
    BackupCommands, BoardCommands, CanvasCommands, Cli, Commands, ConfigCommands, EventCommands,
    GoalCommands, LinkCommands, StepCommands,
};
use organizer::commands::{self, EventFields, Output};
use organizer::config::{
    ConfigOverrides, OrganizerConfig, OutputFormat, ResolvedConfig, load_config, resolve_config,
};
use organizer::storage::Storage;
use std::process;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the tracing filter (e.g. `debug`, `organizer=info`).
const LOG_ENV: &str = "ORG_LOG";

/// Set to `json` for one JSON object per log line.
const LOG_FORMAT_ENV: &str = "ORG_LOG_FORMAT";

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut overrides = ConfigOverrides::new();
    if cli.human_readable {
        overrides = overrides.with_output_format(OutputFormat::Human);
    }
    if cli.no_auto_backup {
        overrides = overrides.with_auto_backup(false);
    }

    let storage = match Storage::open(cli.data_dir.as_deref()) {
        Ok(storage) => storage,
        Err(e) => exit_with_error(&e, cli.human_readable),
    };

    let config = match load_config(&storage.root, &overrides) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable config");
            fallback_config(&overrides)
        }
    };
    let human = config.output_format() == OutputFormat::Human;

    if let Err(e) = storage.ensure_layout() {
        exit_with_error(&e, human);
    }

    let mut backups = storage
        .backups()
        .with_retention(config.backup_retention());
    if let Commands::Backup {
        command: BackupCommands::Restore { name },
    } = &cli.command
    {
        backups = backups.pinning(name.as_str());
    }
    if config.auto_backup() {
        backups.startup();
    }

    // Serialize command for logging
    let (cmd_name, args_json) = serialize_command(&cli.command);

    let start = Instant::now();
    let result = run_command(cli.command, &storage, &backups, &overrides, human);
    let duration = start.elapsed().as_millis() as u64;

    if config.action_log() {
        let (success, error) = match &result {
            Ok(_) => (true, None),
            Err(e) => (false, Some(e.to_string())),
        };
        action_log::log_action(&storage.root, &cmd_name, args_json, success, error, duration);
    }

    if let Err(e) = result {
        exit_with_error(&e, human);
    }
}

/// Route tracing output to stderr so stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn fallback_config(overrides: &ConfigOverrides) -> ResolvedConfig {
    resolve_config(
        &OrganizerConfig::default(),
        &OrganizerConfig::default(),
        overrides,
    )
}

fn exit_with_error(e: &organizer::Error, human: bool) -> ! {
    if human {
        eprintln!("Error: {}", e);
    } else {
        eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
    }
    process::exit(1);
}

fn run_command(
    command: Commands,
    storage: &Storage,
    backups: &BackupManager,
    overrides: &ConfigOverrides,
    human: bool,
) -> Result<(), organizer::Error> {
    match command {
        Commands::Link { command } => match command {
            LinkCommands::Add {
                title,
                url,
                description,
                id,
            } => {
                let result = commands::link_add(storage, &title, &url, description, id)?;
                output(&result, human);
            }
            LinkCommands::List => {
                let result = commands::link_list(storage)?;
                output(&result, human);
            }
            LinkCommands::Update {
                id,
                title,
                url,
                description,
            } => {
                let result = commands::link_update(storage, &id, title, url, description)?;
                output(&result, human);
            }
            LinkCommands::Delete { id } => {
                let result = commands::link_delete(storage, &id)?;
                output(&result, human);
            }
        },
        Commands::Event { command } => match command {
            EventCommands::Add {
                title,
                date,
                time,
                description,
                color,
                id,
            } => {
                let fields = EventFields {
                    title: Some(title),
                    date: Some(date),
                    time: Some(time),
                    description,
                    color,
                };
                let result = commands::event_add(storage, fields, id)?;
                output(&result, human);
            }
            EventCommands::List { date } => {
                let result = commands::event_list(storage, date.as_deref())?;
                output(&result, human);
            }
            EventCommands::Update {
                id,
                title,
                date,
                time,
                description,
                color,
            } => {
                let fields = EventFields {
                    title,
                    date,
                    time,
                    description,
                    color,
                };
                let result = commands::event_update(storage, &id, fields)?;
                output(&result, human);
            }
            EventCommands::Delete { id } => {
                let result = commands::event_delete(storage, &id)?;
                output(&result, human);
            }
        },
        Commands::Goal { command } => match command {
            GoalCommands::Add {
                title,
                deadline,
                progress,
                id,
            } => {
                let result = commands::goal_add(storage, &title, deadline, progress, id)?;
                output(&result, human);
            }
            GoalCommands::List => {
                let result = commands::goal_list(storage)?;
                output(&result, human);
            }
            GoalCommands::Update {
                id,
                title,
                deadline,
                progress,
                done,
            } => {
                let result = commands::goal_update(storage, &id, title, deadline, progress, done)?;
                output(&result, human);
            }
            GoalCommands::Delete { id } => {
                let result = commands::goal_delete(storage, &id)?;
                output(&result, human);
            }
        },
        Commands::Step { command } => match command {
            StepCommands::Add { description, id } => {
                let result = commands::step_add(storage, &description, id)?;
                output(&result, human);
            }
            StepCommands::List => {
                let result = commands::step_list(storage)?;
                output(&result, human);
            }
            StepCommands::Update { id, description } => {
                let result = commands::step_update(storage, &id, &description)?;
                output(&result, human);
            }
            StepCommands::Delete { id } => {
                let result = commands::step_delete(storage, &id)?;
                output(&result, human);
            }
            StepCommands::Move { id, direction } => {
                let result = commands::step_move(storage, &id, &direction)?;
                output(&result, human);
            }
            StepCommands::Toggle { id } => {
                let result = commands::step_toggle(storage, &id)?;
                output(&result, human);
            }
        },
        Commands::Board { command } => match command {
            BoardCommands::Show => {
                let result = commands::board_show(storage)?;
                output(&result, human);
            }
            BoardCommands::Add {
                title,
                description,
                status,
                id,
            } => {
                let result = commands::board_add(storage, &title, description, &status, id)?;
                output(&result, human);
            }
            BoardCommands::Move { id, from, to } => {
                let result = commands::board_move(storage, &id, &from, &to)?;
                output(&result, human);
            }
            BoardCommands::Update {
                id,
                status,
                title,
                description,
            } => {
                let result = commands::board_update(storage, &id, &status, title, description)?;
                output(&result, human);
            }
            BoardCommands::Delete { id, status } => {
                let result = commands::board_delete(storage, &id, &status)?;
                output(&result, human);
            }
        },
        Commands::Canvas { command } => match command {
            CanvasCommands::Show => {
                let result = commands::canvas_show(storage)?;
                output(&result, human);
            }
            CanvasCommands::Save { file } => {
                let result = commands::canvas_save(storage, file.as_deref())?;
                output(&result, human);
            }
            CanvasCommands::UploadImage { path, node_id } => {
                let result = commands::canvas_upload_image(storage, &path, &node_id)?;
                output(&result, human);
            }
            CanvasCommands::DeleteImage { filename } => {
                let result = commands::canvas_delete_image(storage, &filename)?;
                output(&result, human);
            }
            CanvasCommands::PruneImages { node_ids } => {
                let result = commands::canvas_prune_images(storage, node_ids)?;
                output(&result, human);
            }
        },
        Commands::Backup { command } => match command {
            BackupCommands::Create => {
                let result = commands::backup_create(backups)?;
                output(&result, human);
            }
            BackupCommands::List => {
                let result = commands::backup_list(backups)?;
                output(&result, human);
            }
            BackupCommands::Restore { name } => {
                let result = commands::backup_restore(backups, &name)?;
                output(&result, human);
            }
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let result = commands::config_show(&storage.root, overrides)?;
                output(&result, human);
            }
            ConfigCommands::Set { key, value } => {
                let result = commands::config_set(&storage.root, &key, &value)?;
                output(&result, human);
            }
        },
    }

    Ok(())
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}

/// Command name and arguments as recorded in the action log.
fn serialize_command(command: &Commands) -> (String, serde_json::Value) {
    match command {
        Commands::Link { command } => match command {
            LinkCommands::Add {
                title,
                url,
                description,
                id,
            } => (
                "link add".to_string(),
                serde_json::json!({ "title": title, "url": url, "description": description, "id": id }),
            ),
            LinkCommands::List => ("link list".to_string(), serde_json::json!({})),
            LinkCommands::Update {
                id,
                title,
                url,
                description,
            } => (
                "link update".to_string(),
                serde_json::json!({ "id": id, "title": title, "url": url, "description": description }),
            ),
            LinkCommands::Delete { id } => {
                ("link delete".to_string(), serde_json::json!({ "id": id }))
            }
        },
        Commands::Event { command } => match command {
            EventCommands::Add {
                title,
                date,
                time,
                description,
                color,
                id,
            } => (
                "event add".to_string(),
                serde_json::json!({
                    "title": title,
                    "date": date,
                    "time": time,
                    "description": description,
                    "color": color,
                    "id": id,
                }),
            ),
            EventCommands::List { date } => {
                ("event list".to_string(), serde_json::json!({ "date": date }))
            }
            EventCommands::Update {
                id,
                title,
                date,
                time,
                description,
                color,
            } => (
                "event update".to_string(),
                serde_json::json!({
                    "id": id,
                    "title": title,
                    "date": date,
                    "time": time,
                    "description": description,
                    "color": color,
                }),
            ),
            EventCommands::Delete { id } => {
                ("event delete".to_string(), serde_json::json!({ "id": id }))
            }
        },
        Commands::Goal { command } => match command {
            GoalCommands::Add {
                title,
                deadline,
                progress,
                id,
            } => (
                "goal add".to_string(),
                serde_json::json!({ "title": title, "deadline": deadline, "progress": progress, "id": id }),
            ),
            GoalCommands::List => ("goal list".to_string(), serde_json::json!({})),
            GoalCommands::Update {
                id,
                title,
                deadline,
                progress,
                done,
            } => (
                "goal update".to_string(),
                serde_json::json!({
                    "id": id,
                    "title": title,
                    "deadline": deadline,
                    "progress": progress,
                    "done": done,
                }),
            ),
            GoalCommands::Delete { id } => {
                ("goal delete".to_string(), serde_json::json!({ "id": id }))
            }
        },
        Commands::Step { command } => match command {
            StepCommands::Add { description, id } => (
                "step add".to_string(),
                serde_json::json!({ "description": description, "id": id }),
            ),
            StepCommands::List => ("step list".to_string(), serde_json::json!({})),
            StepCommands::Update { id, description } => (
                "step update".to_string(),
                serde_json::json!({ "id": id, "description": description }),
            ),
            StepCommands::Delete { id } => {
                ("step delete".to_string(), serde_json::json!({ "id": id }))
            }
            StepCommands::Move { id, direction } => (
                "step move".to_string(),
                serde_json::json!({ "id": id, "direction": direction }),
            ),
            StepCommands::Toggle { id } => {
                ("step toggle".to_string(), serde_json::json!({ "id": id }))
            }
        },
        Commands::Board { command } => match command {
            BoardCommands::Show => ("board show".to_string(), serde_json::json!({})),
            BoardCommands::Add {
                title,
                description,
                status,
                id,
            } => (
                "board add".to_string(),
                serde_json::json!({ "title": title, "description": description, "status": status, "id": id }),
            ),
            BoardCommands::Move { id, from, to } => (
                "board move".to_string(),
                serde_json::json!({ "id": id, "from": from, "to": to }),
            ),
            BoardCommands::Update {
                id,
                status,
                title,
                description,
            } => (
                "board update".to_string(),
                serde_json::json!({ "id": id, "status": status, "title": title, "description": description }),
            ),
            BoardCommands::Delete { id, status } => (
                "board delete".to_string(),
                serde_json::json!({ "id": id, "status": status }),
            ),
        },
        Commands::Canvas { command } => match command {
            CanvasCommands::Show => ("canvas show".to_string(), serde_json::json!({})),
            CanvasCommands::Save { file } => (
                "canvas save".to_string(),
                serde_json::json!({ "file": file.as_ref().map(|p| p.display().to_string()) }),
            ),
            CanvasCommands::UploadImage { path, node_id } => (
                "canvas upload-image".to_string(),
                serde_json::json!({ "path": path.display().to_string(), "node_id": node_id }),
            ),
            CanvasCommands::DeleteImage { filename } => (
                "canvas delete-image".to_string(),
                serde_json::json!({ "filename": filename }),
            ),
            CanvasCommands::PruneImages { node_ids } => (
                "canvas prune-images".to_string(),
                serde_json::json!({ "node_ids": node_ids }),
            ),
        },
        Commands::Backup { command } => match command {
            BackupCommands::Create => ("backup create".to_string(), serde_json::json!({})),
            BackupCommands::List => ("backup list".to_string(), serde_json::json!({})),
            BackupCommands::Restore { name } => (
                "backup restore".to_string(),
                serde_json::json!({ "name": name }),
            ),
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show => ("config show".to_string(), serde_json::json!({})),
            ConfigCommands::Set { key, value } => (
                "config set".to_string(),
                serde_json::json!({ "key": key, "value": value }),
            ),
        },
    }
}
