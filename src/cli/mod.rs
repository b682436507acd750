//! CLI argument definitions for the organizer.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

const STATUSES: [&str; 3] = ["objective", "doing", "done"];

/// Organizer - links, calendar, goals, steps, a kanban board and an ideas canvas,
/// kept as JSON documents on local disk.
#[derive(Parser, Debug)]
#[command(name = "org")]
#[command(
    author,
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("ORG_GIT_COMMIT"), ", built ", env!("ORG_BUILD_TIMESTAMP"), ")"),
    about = "A personal organizer backed by JSON documents",
    long_about = None
)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Data root holding init/, img/ and backups/.
    /// Can also be set via ORG_DATA_DIR environment variable.
    #[arg(short = 'D', long = "data-dir", global = true, env = "ORG_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Skip the automatic snapshot taken at startup
    #[arg(long, global = true)]
    pub no_auto_backup: bool,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Saved links
    Link {
        #[command(subcommand)]
        command: LinkCommands,
    },

    /// Calendar events
    Event {
        #[command(subcommand)]
        command: EventCommands,
    },

    /// Goals with a progress percentage
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },

    /// Ordered checklist steps
    Step {
        #[command(subcommand)]
        command: StepCommands,
    },

    /// Kanban board (objective / doing / done)
    Board {
        #[command(subcommand)]
        command: BoardCommands,
    },

    /// Ideas canvas and its images
    Canvas {
        #[command(subcommand)]
        command: CanvasCommands,
    },

    /// Snapshot backups of all documents
    Backup {
        #[command(subcommand)]
        command: BackupCommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Link subcommands
#[derive(Subcommand, Debug)]
pub enum LinkCommands {
    /// Save a new link
    Add {
        /// Link title
        title: String,
        /// Target URL
        url: String,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Use this id instead of generating one
        #[arg(long)]
        id: Option<String>,
    },

    /// List all links
    List,

    /// Update fields of a link
    Update {
        /// Link ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a link
    Delete {
        /// Link ID
        id: String,
    },
}

/// Event subcommands
#[derive(Subcommand, Debug)]
pub enum EventCommands {
    /// Add a calendar event
    Add {
        /// Event title
        title: String,
        /// Day (YYYY-MM-DD)
        date: String,
        /// Time of day (HH:MM)
        time: String,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Display color (e.g. #3b82f6)
        #[arg(long)]
        color: Option<String>,
        /// Use this id instead of generating one
        #[arg(long)]
        id: Option<String>,
    },

    /// List events ordered by date and time
    List {
        /// Only events on this day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Update fields of an event
    Update {
        /// Event ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        /// Day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Time of day (HH:MM)
        #[arg(long)]
        time: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },

    /// Delete an event
    Delete {
        /// Event ID
        id: String,
    },
}

/// Goal subcommands
#[derive(Subcommand, Debug)]
pub enum GoalCommands {
    /// Add a goal
    Add {
        /// Goal title
        title: String,
        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,
        /// Initial progress (0-100)
        #[arg(short, long)]
        progress: Option<f64>,
        /// Use this id instead of generating one
        #[arg(long)]
        id: Option<String>,
    },

    /// List all goals
    List,

    /// Update fields of a goal
    Update {
        /// Goal ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        /// Deadline (YYYY-MM-DD, empty to clear)
        #[arg(long)]
        deadline: Option<String>,
        /// Progress (0-100)
        #[arg(short, long)]
        progress: Option<f64>,
        /// Mark done (true/false)
        #[arg(long)]
        done: Option<bool>,
    },

    /// Delete a goal
    Delete {
        /// Goal ID
        id: String,
    },
}

/// Step subcommands
#[derive(Subcommand, Debug)]
pub enum StepCommands {
    /// Append a step to the end of the list
    Add {
        /// What to do
        description: String,
        /// Use this id instead of generating one
        #[arg(long)]
        id: Option<String>,
    },

    /// List steps in order
    List,

    /// Change the description of a step
    Update {
        /// Step ID
        id: String,
        /// New description
        description: String,
    },

    /// Delete a step and renumber the rest
    Delete {
        /// Step ID
        id: String,
    },

    /// Swap a step with its neighbour
    Move {
        /// Step ID
        id: String,
        /// Direction
        #[arg(value_parser = ["up", "down"])]
        direction: String,
    },

    /// Flip the done flag of a step
    Toggle {
        /// Step ID
        id: String,
    },
}

/// Board subcommands
#[derive(Subcommand, Debug)]
pub enum BoardCommands {
    /// Show all three columns
    Show,

    /// Add a task to a column
    Add {
        /// Task title
        title: String,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Column to add the task to
        #[arg(short, long, default_value = "objective", value_parser = STATUSES)]
        status: String,
        /// Use this id instead of generating one
        #[arg(long)]
        id: Option<String>,
    },

    /// Move a task between columns
    Move {
        /// Task ID
        id: String,
        /// Column the task is in
        #[arg(value_parser = STATUSES)]
        from: String,
        /// Destination column
        #[arg(value_parser = STATUSES)]
        to: String,
    },

    /// Update a task within its column
    Update {
        /// Task ID
        id: String,
        /// Column the task is in
        #[arg(value_parser = STATUSES)]
        status: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a task from a column
    Delete {
        /// Task ID
        id: String,
        /// Column the task is in
        #[arg(value_parser = STATUSES)]
        status: String,
    },
}

/// Canvas subcommands
#[derive(Subcommand, Debug)]
pub enum CanvasCommands {
    /// Show the stored canvas
    Show,

    /// Replace the canvas with a {"nodes": [...], "edges": [...]} document
    Save {
        /// Read the document from this file ("-" or omitted for stdin)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Store an image for a node
    UploadImage {
        /// Image file to copy
        path: PathBuf,
        /// Node the image belongs to
        node_id: String,
    },

    /// Delete one stored image
    DeleteImage {
        /// Stored image file name
        filename: String,
    },

    /// Delete images no live node refers to
    PruneImages {
        /// Live node ids (defaults to the nodes of the stored canvas)
        node_ids: Vec<String>,
    },
}

/// Backup subcommands
#[derive(Subcommand, Debug)]
pub enum BackupCommands {
    /// Snapshot every document now
    Create,

    /// List snapshots, most recent first
    List,

    /// Replace documents with the ones in a snapshot
    Restore {
        /// Snapshot name (e.g. backup_2024-01-01_09-30-00)
        name: String,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show resolved configuration values and where they came from
    Show,

    /// Set a configuration value in the data root's config.kdl
    Set {
        /// Configuration key (backup-retention, auto-backup, output-format, action-log)
        key: String,
        /// Configuration value
        value: String,
    },
}
