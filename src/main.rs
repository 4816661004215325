// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Schemadraft and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Schemadraft CLI entrypoint.
//!
//! Diagrams live as `<id>.diagram.json` files in `--dir` (default: the current directory).
//! `edit` reads one command per line from stdin: a JSON edit document, `undo`, `redo`, `show`
//! or `quit`.

use std::error::Error;
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use schemadraft::config::EditorConfig;
use schemadraft::discovery::StaticSchema;
use schemadraft::format::{edit_document_schema, model_to_json};
use schemadraft::model::{DiagramId, Model, Namespace};
use schemadraft::session::{DiagramSession, Workspace};
use schemadraft::store::{DiagramFolder, PersistStatus};

#[derive(Parser, Debug)]
#[command(author, version, about = "Edit data-model diagrams with undo/redo")]
struct Cli {
    /// Directory holding diagram files and schemadraft.toml
    #[arg(long, global = true, default_value = ".")]
    dir: PathBuf,
    /// fsync every write (overrides the config file)
    #[arg(long, global = true)]
    durable_writes: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List stored diagrams
    List,
    /// Create a diagram, optionally seeded with the collections of one database
    Create {
        name: String,
        #[arg(long)]
        database: Option<String>,
        /// Collection namespace (database.collection) known to exist; repeatable
        #[arg(long = "collection", requires = "database")]
        collections: Vec<String>,
    },
    /// Print a diagram's model as JSON
    Show { id: String },
    /// Apply one JSON edit document read from a file, or stdin for `-`
    Apply { id: String, input: String },
    /// Rename a diagram
    Rename { id: String, name: String },
    /// Delete a diagram
    Delete { id: String },
    /// Edit interactively, one command per line on stdin
    Edit { id: String },
    /// Print the JSON schema of edit documents
    Schema,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let mut config = EditorConfig::load(&cli.dir)?;
    if cli.durable_writes {
        config.persistence.durable_writes = true;
    }
    let folder = DiagramFolder::new(&cli.dir).with_durability(config.persistence.durability());

    let discovery = match &cli.command {
        Command::Create {
            database: Some(database),
            collections,
            ..
        } => {
            let namespaces = collections
                .iter()
                .map(|value| Namespace::new(value.as_str()))
                .collect::<Result<Vec<_>, _>>()?;
            check_collections_in_database(&namespaces, database)?;
            StaticSchema::from_namespaces(namespaces).with_database(database.as_str())
        }
        _ => StaticSchema::new(),
    };

    let workspace = Workspace::new(Arc::new(folder), Arc::new(discovery), config)?;
    let mut stdout = io::stdout().lock();

    match cli.command {
        Command::List => {
            for summary in workspace.list_diagrams()? {
                writeln!(stdout, "{}\t{}", summary.diagram_id, summary.name)?;
            }
        }
        Command::Create { name, database, .. } => {
            let session = workspace.create_diagram(&name, database.as_deref())?;
            writeln!(stdout, "{}", session.diagram_id())?;
            session.close();
        }
        Command::Show { id } => {
            let session = workspace.open_diagram(&DiagramId::new(id)?)?;
            print_model(&mut stdout, &session.current_model())?;
            session.close();
        }
        Command::Apply { id, input } => {
            let text = if input == "-" {
                let mut text = String::new();
                io::stdin().read_to_string(&mut text)?;
                text
            } else {
                fs::read_to_string(&input)?
            };
            let mut session = workspace.open_diagram(&DiagramId::new(id)?)?;
            session.apply_document(&text)?;
            finish(session)?;
        }
        Command::Rename { id, name } => {
            let meta = workspace.rename_diagram(&DiagramId::new(id)?, &name)?;
            writeln!(stdout, "{}\t{}", meta.diagram_id, meta.name)?;
        }
        Command::Delete { id } => {
            workspace.delete_diagram(&DiagramId::new(id)?)?;
        }
        Command::Edit { id } => {
            let session = workspace.open_diagram(&DiagramId::new(id)?)?;
            run_edit_loop(session, &mut stdout)?;
        }
        Command::Schema => {
            writeln!(
                stdout,
                "{}",
                serde_json::to_string_pretty(&edit_document_schema())?
            )?;
        }
    }

    Ok(())
}

fn run_edit_loop(mut session: DiagramSession, out: &mut impl Write) -> Result<(), Box<dyn Error>> {
    for line in io::stdin().lock().lines() {
        let line = line?;
        let command = line.trim();
        match command {
            "" => continue,
            "quit" | "exit" => break,
            "show" => {
                print_model(out, &session.current_model())?;
                continue;
            }
            "undo" => {
                if let Err(boundary) = session.undo() {
                    writeln!(out, "{boundary}")?;
                    continue;
                }
            }
            "redo" => {
                if let Err(boundary) = session.redo() {
                    writeln!(out, "{boundary}")?;
                    continue;
                }
            }
            document => {
                if let Err(err) = session.apply_document(document) {
                    writeln!(out, "error: {err}")?;
                    continue;
                }
            }
        }
        writeln!(
            out,
            "{} collections, {} relationships (undo: {}, redo: {})",
            session.current_model().collections().len(),
            session.current_model().relationships().len(),
            yes_no(session.can_undo()),
            yes_no(session.can_redo()),
        )?;
    }

    finish(session)
}

fn finish(session: DiagramSession) -> Result<(), Box<dyn Error>> {
    let status = session.flush();
    session.close();
    match status {
        PersistStatus::Failed { message, .. } => Err(message.into()),
        PersistStatus::Idle | PersistStatus::Pending => Ok(()),
    }
}

fn check_collections_in_database(
    namespaces: &[Namespace],
    database: &str,
) -> Result<(), Box<dyn Error>> {
    match namespaces.iter().find(|ns| ns.database() != database) {
        Some(stray) => Err(format!(
            "--collection {stray} is not in database {database:?}; use {database}.<collection>"
        )
        .into()),
        None => Ok(()),
    }
}

fn print_model(out: &mut impl Write, model: &Model) -> Result<(), Box<dyn Error>> {
    writeln!(out, "{}", serde_json::to_string_pretty(&model_to_json(model))?)?;
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
