// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Nereid UML CLI entrypoint.
//!
//! Reads one JSON message per line from stdin, applies it to the model kept in the model
//! directory, and answers each with one JSON line on stdout (`{"ok":true,"message":..}` or
//! `{"ok":false,"error":..}`). Logs go to stderr.

use std::error::Error;
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use async_trait::async_trait;
use clap::Parser;
use log::{debug, error, info, LevelFilter};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use nereid_uml::config::load_config;
use nereid_uml::model::{DiagramType, Document};
use nereid_uml::service::{InboundMessage, ModelingService, RenderError, Renderer};
use nereid_uml::store::{DocumentFolder, WriteDurability};

/// Apply assistant-generated UML modifications to a stored diagram model
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding `model.json` (defaults to the current directory)
    model_dir: Option<PathBuf>,

    /// Diagram type used when the directory has no model yet
    #[arg(long)]
    diagram_type: Option<DiagramType>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Opt into slower, best-effort durable persistence (fsync where supported)
    #[arg(long)]
    durable_writes: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Stands in for a graphical editor: reports each painted model in the log.
#[derive(Debug, Default)]
struct SummaryRenderer {
    pending: Option<(usize, usize)>,
}

#[async_trait]
impl Renderer for SummaryRenderer {
    async fn set_model(&mut self, model: &Document) -> Result<(), RenderError> {
        self.pending = Some((model.elements().len(), model.relationships().len()));
        Ok(())
    }

    async fn next_paint(&mut self) -> Result<(), RenderError> {
        if let Some((elements, relationships)) = self.pending.take() {
            debug!(elements = elements, relationships = relationships; "Model painted");
        }
        Ok(())
    }
}

type Service = ModelingService<DocumentFolder, SummaryRenderer>;

fn main() {
    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting nereid-uml");
    debug!(args:?; "Parsed arguments");

    if let Err(err) = run(args) {
        error!("nereid-uml: {err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(diagram_type) = args.diagram_type {
        config.default_diagram_type = diagram_type;
    }
    if args.durable_writes {
        config.store.durability = WriteDurability::Durable;
    }

    let dir = args.model_dir.unwrap_or_else(|| PathBuf::from("."));
    let folder = DocumentFolder::new(dir).with_durability(config.store.durability);
    let model = folder.load_or_init(config.default_diagram_type)?;

    let mut service = Service::new(model, folder, config);
    service.update_editor_reference(SummaryRenderer::default());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve_stdio(&mut service))?;
    Ok(())
}

async fn serve_stdio(service: &mut Service) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let outcome = match InboundMessage::from_json(line) {
            Ok(message) => service.handle(message).await,
            Err(err) => Err(err),
        };
        let reply = match outcome {
            Ok(message) => json!({ "ok": true, "message": message }),
            Err(err) => json!({ "ok": false, "error": err.to_string() }),
        };

        let mut bytes = serde_json::to_vec(&reply)?;
        bytes.push(b'\n');
        stdout.write_all(&bytes).await?;
        stdout.flush().await?;
    }

    info!("Input closed, shutting down");
    Ok(())
}
