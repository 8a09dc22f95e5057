//! Command-line tools for Potato levels
//!
//! Run with: potato_map_editor <command>
//! Set `RUST_LOG=debug` for verbose output.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use potato_map_core::{Layer, TextureId};
use potato_map_editor::preferences::EditorPreferences;
use potato_map_editor::{ClickOutcome, EditorSession, EditorTool, LevelSummary};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "potato_map_editor")]
#[command(about = "Create, convert and edit Potato levels", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write an empty level (`.json` file or archive directory)
    New {
        /// Output path
        output: PathBuf,
    },

    /// Convert a level between the JSON document and the table archive
    Convert {
        /// Input level
        input: PathBuf,
        /// Output level; the format follows the path
        output: PathBuf,
    },

    /// Print a JSON summary of a level
    Info {
        /// Input level; defaults to the most recent file when auto-open is enabled
        input: Option<PathBuf>,
    },

    /// Flood fill a region with a wall texture
    Fill {
        /// Input level
        input: PathBuf,
        /// Start column
        #[arg(long)]
        x: i32,
        /// Start row
        #[arg(long)]
        y: i32,
        /// Replacement texture id
        #[arg(long)]
        texture: TextureId,
        /// Layer to fill
        #[arg(long, value_enum, default_value_t = LayerArg::Wall)]
        layer: LayerArg,
        /// Output level; defaults to overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List recently used levels
    Recent,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayerArg {
    Wall,
    Floor,
}

impl From<LayerArg> for Layer {
    fn from(arg: LayerArg) -> Self {
        match arg {
            LayerArg::Wall => Layer::Wall,
            LayerArg::Floor => Layer::Floor,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut preferences = EditorPreferences::load();

    match cli.command {
        Command::New { output } => {
            let session = EditorSession::from_preferences(&preferences);
            let format = session
                .save_path(&output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            info!("Created empty level as {}", format.name());
            remember(&mut preferences, &output);
        }

        Command::Convert { input, output } => {
            let session = open(&input)?;
            let format = session
                .save_path(&output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            info!("Converted {} to {}", input.display(), format.name());
            remember(&mut preferences, &output);
        }

        Command::Info { input } => {
            let input = match input {
                Some(input) => input,
                None => last_file(&preferences)?,
            };
            let session = open(&input)?;
            let summary = LevelSummary::of(session.level());
            println!("{}", serde_json::to_string_pretty(&summary)?);
            remember(&mut preferences, &input);
        }

        Command::Fill {
            input,
            x,
            y,
            texture,
            layer,
            output,
        } => {
            let mut session = open(&input)?;
            session.set_layer(layer.into());
            session.select_texture(texture)?;
            session.toggle_tool(EditorTool::Fill);

            match session.click_cell(x, y)? {
                ClickOutcome::Applied => {}
                ClickOutcome::Ignored => bail!("({}, {}) is outside the grid", x, y),
                outcome => warn!("Fill changed nothing ({:?})", outcome),
            }

            let output = output.unwrap_or(input);
            session
                .save_path(&output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            remember(&mut preferences, &output);
        }

        Command::Recent => {
            for recent in &preferences.recent_files {
                println!("{}\t{}", recent.name, recent.path);
            }
        }
    }

    Ok(())
}

fn open(path: &Path) -> Result<EditorSession> {
    let mut session = EditorSession::new();
    session
        .load_path(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    Ok(session)
}

fn last_file(preferences: &EditorPreferences) -> Result<PathBuf> {
    if !preferences.auto_open_last_file {
        bail!("no input given and auto-open of the last file is disabled");
    }
    let recent = preferences
        .last_file()
        .context("no input given and there are no recent files")?;
    let path = PathBuf::from(&recent.path);
    if !path.exists() {
        bail!("last file not found: {} ({})", recent.name, recent.path);
    }
    info!("Auto-opened last file: {}", recent.name);
    Ok(path)
}

/// Add `path` to the recent files; failing to persist is not fatal
fn remember(preferences: &mut EditorPreferences, path: &Path) {
    preferences.add_recent_file(path);
    if let Err(e) = preferences.save() {
        warn!("Failed to save preferences: {}", e);
    }
}
