//! XML Import/Export für BlockMod-Netzwerke.
//!
//! Blocks (mit Sockets und Eigenschaften) und Connectors (mit Segmenten)
//! werden in Einfuege-Reihenfolge geschrieben und wieder gelesen.

pub mod parser;
pub mod writer;

pub use parser::parse_network;
pub use writer::write_network;

use crate::core::Network;
use anyhow::{Context, Result};
use std::path::Path;

/// Liest ein Netzwerk aus einer XML-Datei.
pub fn read_network_file(path: &Path) -> Result<Network> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Datei '{}' konnte nicht gelesen werden", path.display()))?;
    parse_network(&content).with_context(|| format!("Fehler in '{}'", path.display()))
}

/// Schreibt ein Netzwerk als XML-Datei.
pub fn write_network_file(network: &Network, path: &Path) -> Result<()> {
    let content = write_network(network)?;
    std::fs::write(path, content)
        .with_context(|| format!("Datei '{}' konnte nicht geschrieben werden", path.display()))?;
    log::info!("Netzwerk gespeichert: {}", path.display());
    Ok(())
}
