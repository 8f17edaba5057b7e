use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use easel::config::Config;
use easel::draw::Frame;
use easel::events::{LoggingSubscriber, NotificationBus, Statistics};
use easel::script;
use easel::session::Session;
use easel::store::{self, SnapshotStore};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Parser, Debug)]
#[command(name = "easel")]
#[command(version, about = "Vector sketching with replayable undo and named drawings")]
struct Cli {
    /// Read configuration from this file instead of ~/.config/easel/config.toml
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Keep drawings in this directory, overriding [storage] settings
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List saved drawings, most recently modified first
    List,
    /// Print a drawing's header and shape rows
    Show {
        /// Drawing name
        name: String,
    },
    /// Delete a saved drawing
    Delete {
        /// Drawing name
        name: String,
    },
    /// Execute a drawing script (one command per line)
    Run {
        /// Script file, or `-` for stdin
        script: PathBuf,
    },
    /// Render a saved drawing to a PNG file
    #[cfg(feature = "png")]
    Export {
        /// Drawing name
        name: String,
        /// Output PNG path
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let (config, config_dir) = load_config(cli.config.as_deref())?;
    let mut store = store::open_store(&config.storage, &config_dir, cli.data_dir.as_deref())?;

    match cli.command {
        Commands::List => {
            let names = store.list()?;
            if names.is_empty() {
                println!("No saved drawings");
            }
            for name in names {
                println!("{name}");
            }
        }
        Commands::Show { name } => {
            let Some(snapshot) = store.load(&name)? else {
                bail!("Drawing '{}' not found", name);
            };
            println!("Name:     {}", snapshot.name);
            println!(
                "Canvas:   {}x{}",
                snapshot.canvas_width, snapshot.canvas_height
            );
            println!("Created:  {}", snapshot.created_at.to_rfc3339());
            println!("Modified: {}", snapshot.modified_at.to_rfc3339());
            println!("Shapes:   {}", snapshot.shape_count());
            for record in &snapshot.shapes {
                println!(
                    "  #{:<3} {:<9} ({}, {}) -> ({}, {})  {}  {}",
                    record.order,
                    record.kind,
                    record.x1,
                    record.y1,
                    record.x2,
                    record.y2,
                    record.color,
                    if record.filled { "filled" } else { "outline" }
                );
            }
        }
        Commands::Delete { name } => {
            if store.delete(&name)? {
                println!("Deleted '{name}'");
            } else {
                bail!("Drawing '{}' not found", name);
            }
        }
        Commands::Run { script: path } => {
            let text = read_script(&path)?;
            let commands = script::parse_script(&text)
                .with_context(|| format!("Invalid script {}", path.display()))?;

            let bus = Rc::new(NotificationBus::new());
            let stats = Rc::new(RefCell::new(Statistics::new()));
            bus.subscribe(Rc::new(RefCell::new(LoggingSubscriber::new())));
            bus.subscribe(stats.clone());

            let mut session = Session::from_config(Frame::new(), store, bus, &config.drawing);
            let mut stdout = std::io::stdout().lock();
            let report = script::run_script(&mut session, &commands, Some(&stats), &mut stdout)?;
            log::info!(
                "Executed {} commands ({} errors)",
                report.executed,
                report.errors
            );
            if report.errors > 0 {
                bail!("{} command(s) failed", report.errors);
            }
        }
        #[cfg(feature = "png")]
        Commands::Export { name, output } => {
            let Some(snapshot) = store.load(&name)? else {
                bail!("Drawing '{}' not found", name);
            };
            export_png(&snapshot, &output)?;
            println!("Exported '{}' to {}", name, output.display());
        }
    }

    Ok(())
}

/// Loads the config and returns it with the directory it belongs to.
fn load_config(explicit: Option<&Path>) -> Result<(Config, PathBuf)> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => Config::get_config_path()?,
    };
    let config = Config::load_from(&path)?;
    let dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok((config, dir))
}

fn read_script(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        return std::io::read_to_string(std::io::stdin()).context("Failed to read script from stdin");
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read script {}", path.display()))
}

#[cfg(feature = "png")]
fn export_png(snapshot: &easel::Snapshot, output: &Path) -> Result<()> {
    use easel::draw::CairoSurface;
    use easel::history::History;

    let width = i32::try_from(snapshot.canvas_width).context("canvas width out of range")?;
    let height = i32::try_from(snapshot.canvas_height).context("canvas height out of range")?;
    let surface = CairoSurface::new(width, height)?;

    let mut history = History::new(surface, Rc::new(NotificationBus::new()));
    for op in easel::from_snapshot(snapshot) {
        history.add(op);
    }
    history.surface().write_png(output)
}
