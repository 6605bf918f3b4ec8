use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;

use image_resizer::cli::{CliArgs, CliCommand};
use image_resizer::commands::{COMMANDS, WIDTH_PROMPT};
use image_resizer::config::ResizerConfig;
use image_resizer::config_paths;
use image_resizer::host::files::{prompt_terminal, DirectoryHost};
use image_resizer::preferences::{set_width, ConfigWidthStore, Notice, WidthStore};
use image_resizer::runtime::Runtime;
use image_resizer::transform::transform;
use image_resizer::SyncModel;

/// How often the watch loop drains file events and fires timers
const WATCH_TICK: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    let args = CliArgs::parse();
    image_resizer::tracing::init();

    let config_path = args.config.or_else(config_paths::config_file);
    let config = config_path
        .as_deref()
        .map(ResizerConfig::load_from)
        .unwrap_or_default();
    let mut store = match config_path {
        Some(path) => ConfigWidthStore::at(path),
        None => ConfigWidthStore::new(),
    };

    match args.command {
        CliCommand::Transform {
            path,
            width,
            in_place,
            json,
        } => run_transform(path.as_deref(), width.unwrap_or_else(|| store.width()), in_place, json),
        CliCommand::SetWidth { value } => {
            let input = match value {
                Some(value) => value,
                None => match prompt_terminal(WIDTH_PROMPT, &store.width().to_string()) {
                    Some(answer) => answer,
                    None => return Ok(()),
                },
            };
            match set_width(&mut store, &input) {
                notice @ Notice::WidthSet(_) => {
                    println!("{}", notice);
                    Ok(())
                }
                notice => bail!("{}", notice),
            }
        }
        CliCommand::GetWidth => {
            println!("{}", store.width());
            Ok(())
        }
        CliCommand::Watch { dir } => run_watch(dir, &config, store),
        CliCommand::Commands => {
            for def in COMMANDS {
                println!("{}", def.label);
            }
            Ok(())
        }
    }
}

fn run_transform(path: Option<&Path>, width: u32, in_place: bool, json: bool) -> Result<()> {
    if width == 0 {
        bail!("Invalid width.");
    }

    let input = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let outcome = transform(&input, width);

    if in_place {
        if let (Some(path), true) = (path, outcome.changed()) {
            std::fs::write(path, &outcome.text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Rewrote {}", path.display());
        }
    } else if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", outcome.text);
    }
    Ok(())
}

fn run_watch(dir: PathBuf, config: &ResizerConfig, store: ConfigWidthStore) -> Result<()> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }

    let host = DirectoryHost::watching(dir.clone())
        .with_context(|| format!("Failed to watch {}", dir.display()))?;
    let model = SyncModel::from_config(config, Box::new(store));
    let mut runtime = Runtime::new(model, host);

    runtime.start();
    eprintln!(
        "Watching {} ({} files)",
        dir.display(),
        runtime.model().surfaces.len()
    );

    let started = Instant::now();
    loop {
        let msgs = runtime.host_mut().poll_events();
        for msg in msgs {
            runtime.dispatch(msg);
        }
        runtime.advance_to(started.elapsed());
        std::thread::sleep(WATCH_TICK);
    }
}
