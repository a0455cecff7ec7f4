//! BlockMod Network Editor (Kommandozeile).
//!
//! Liest ein Block-Netzwerk, prueft Namen und Topologie, gleicht alle
//! Connector-Pfade an die Block-Geometrie an und schreibt das Ergebnis.

use anyhow::{Context, Result};
use blockmod_editor::core::Network;
use blockmod_editor::shared::NetworkOptions;
use blockmod_editor::xml::{read_network_file, write_network_file};
use clap::Parser;
use std::path::PathBuf;

/// Prueft und normalisiert BlockMod-Netzwerkdateien.
#[derive(Parser, Debug)]
#[command(name = "blockmod-editor", version)]
#[command(about = "Prueft und normalisiert BlockMod-Netzwerkdateien")]
struct Args {
    /// Eingabedatei (BlockMod-XML)
    input: PathBuf,

    /// Ausgabedatei; ohne Angabe wird nur eine Zusammenfassung ausgegeben
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Segmente aller Connectors zusammenfassen
    #[arg(short, long)]
    merge: bool,

    /// Nur pruefen, nichts anpassen oder schreiben
    #[arg(long)]
    check_only: bool,

    /// Optionen-Datei (Standard: `blockmod_editor.toml` neben der Binary)
    #[arg(long)]
    options: Option<PathBuf>,

    /// Wirksame Optionen in die Optionen-Datei schreiben
    #[arg(long)]
    save_options: bool,
}

fn main() -> Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    log::info!("BlockMod Editor v{} startet...", env!("CARGO_PKG_VERSION"));

    let options_path = args.options.clone().unwrap_or_else(NetworkOptions::config_path);
    let options = NetworkOptions::load_from_file(&options_path);
    if args.save_options {
        options.save_to_file(&options_path)?;
    }

    let mut network = read_network_file(&args.input)?;
    network
        .check_names()
        .with_context(|| format!("Ungueltiges Netzwerk in '{}'", args.input.display()))?;
    log::info!(
        "{}: {} Blocks, {} Connectors",
        args.input.display(),
        network.block_count(),
        network.connector_count()
    );

    if args.check_only {
        println!("{}: OK", args.input.display());
        return Ok(());
    }

    normalize(&mut network, args.merge || options.merge_on_write)?;

    match args.output {
        Some(path) => write_network_file(&network, &path)?,
        None => println!(
            "{}: {} Blocks, {} Connectors, {} Segmente",
            args.input.display(),
            network.block_count(),
            network.connector_count(),
            segment_count(&network)
        ),
    }
    Ok(())
}

/// Gleicht alle Connectors an und fasst optional ihre Segmente zusammen.
fn normalize(network: &mut Network, merge: bool) -> Result<()> {
    let change = network.adjust_connectors();
    log::info!("{} Connector(s) angepasst", change.adjusted.len());
    if !change.is_clean() {
        log::warn!(
            "{} Connector(s) konnten nicht angepasst werden",
            change.failures.len()
        );
    }

    if merge {
        let ids: Vec<_> = network.connectors().map(|(id, _)| id).collect();
        let mut merged = 0;
        for id in ids {
            if network.merge_connector_segments(id)?.changed {
                merged += 1;
            }
        }
        log::info!("{} Connector(s) zusammengefasst", merged);
    }
    Ok(())
}

fn segment_count(network: &Network) -> usize {
    network
        .connectors()
        .map(|(_, con)| con.segments.len())
        .sum()
}
