use crate::commands;
use crate::config::EditorConfig;
use crate::workflow::node::{NodeKind, Position};
use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Edit approval workflow documents from the command line
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Editor settings (JSON); defaults are used when omitted
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a fresh workflow with a start and an end node
    New {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print node/edge counts, reachability and validation problems
    Inspect {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Remove a node and reconnect its neighbours
    Remove {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        node_id: String,
    },
    /// Insert a node of KIND on an existing edge
    Insert {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        edge_id: String,
        kind: String,
        name: String,
    },
    /// Move a node to a new canvas position
    Move {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        node_id: String,
        x: f64,
        y: f64,
    },
    /// Print the save request for the workflow
    Export {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long = "app-id")]
        app_id: String,
        /// Workflow name (defaults to an untitled timestamped name)
        #[arg(long)]
        name: Option<String>,
        /// Trigger mode recorded in the request (default FORM_DATA)
        #[arg(long = "trigger-mode", value_name = "MODE")]
        trigger_mode: Option<String>,
        /// Initiator may cancel a running approval
        #[arg(long)]
        cancelable: bool,
        /// Initiator may urge pending approvers
        #[arg(long)]
        urgeable: bool,
        /// Node admins may leave messages
        #[arg(long = "node-admin-msg")]
        node_admin_msg: bool,
        /// Initiator may see status and messages
        #[arg(long = "see-status-and-msg")]
        see_status_and_msg: bool,
        /// Node whose business data receives --overrides
        #[arg(long)]
        node: Option<String>,
        /// JSON object merged into the node's business data
        #[arg(long, requires = "node")]
        overrides: Option<String>,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EditorConfig::default(),
    };

    match cli.command {
        Command::New { file } => {
            let store = crate::store::FlowEditorStore::new(config);
            commands::save_workflow(&file, store.elements())?;
            println!("{}", file.display());
        }
        Command::Inspect { file } => {
            let graph = commands::load_workflow(&file)?;
            let summary = commands::summarize(&graph)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Remove { file, node_id } => {
            let mut store = commands::open_session(&file, config)?;
            store.remove_node_by_id(&node_id)?;
            commands::save_workflow(&file, store.elements())?;
        }
        Command::Insert {
            file,
            edge_id,
            kind,
            name,
        } => {
            let kind = NodeKind::parse(&kind).ok_or_else(|| anyhow!("unknown node kind: {}", kind))?;
            let mut store = commands::open_session(&file, config)?;
            let id = store.insert_node_on_edge(&edge_id, kind, &name)?;
            commands::save_workflow(&file, store.elements())?;
            println!("{}", id);
        }
        Command::Move { file, node_id, x, y } => {
            let mut store = commands::open_session(&file, config)?;
            store.move_node(&node_id, Position::new(x, y))?;
            commands::save_workflow(&file, store.elements())?;
        }
        Command::Export {
            file,
            app_id,
            name,
            trigger_mode,
            cancelable,
            urgeable,
            node_admin_msg,
            see_status_and_msg,
            node,
            overrides,
        } => {
            let overrides = match overrides {
                Some(raw) => match serde_json::from_str::<Value>(&raw)
                    .context("--overrides is not valid JSON")?
                {
                    Value::Object(fields) => fields,
                    _ => bail!("--overrides must be a JSON object"),
                },
                None => Map::new(),
            };
            let options = commands::ExportOptions {
                app_id,
                name,
                trigger_mode,
                cancelable,
                urgeable,
                node_admin_msg,
                see_status_and_msg,
                node,
                overrides,
            };
            let save = commands::export_workflow(&file, config, options)?;
            println!("{}", serde_json::to_string_pretty(&save)?);
        }
    }

    Ok(())
}
