//! Zentrale Konfiguration für den BlockMod-Editor.
//!
//! `NetworkOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.
//! Das Raster (`GRID_SPACING`) bleibt eine Konstante im Core.

use crate::core::{Connector, CONNECTOR_COLOR, CONNECTOR_LINE_WIDTH, GRID_SPACING};
use anyhow::Context;
use glam::DVec2;
use serde::{Deserialize, Serialize};

// ── Verbinden ───────────────────────────────────────────────────────

/// Name interaktiv erstellter Connectors.
pub const NEW_CONNECTOR_NAME: &str = "New Connector";
/// Groesse des unsichtbaren Hilfsblocks (Breite, Hoehe).
pub const HELPER_BLOCK_SIZE: [f64; 2] = [20.0, 20.0];
/// Fang-Radius (Manhattan) fuer Eingaenge beim Verbinden.
pub const SOCKET_HIT_RADIUS: f64 = GRID_SPACING / 2.0;

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Editor-Optionen.
/// Wird als `blockmod_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkOptions {
    // ── Connectors ──────────────────────────────────────────────
    /// Linienstaerke neuer Connectors
    pub connector_line_width: f64,
    /// Farbe neuer Connectors (RGBA)
    pub connector_color: [f32; 4],
    /// Name interaktiv erstellter Connectors
    pub new_connector_name: String,

    // ── Verbinden ───────────────────────────────────────────────
    /// Groesse des Hilfsblocks (Breite, Hoehe)
    pub helper_block_size: [f64; 2],
    /// Fang-Radius fuer Eingaenge (Szenen-Einheiten, Manhattan-Abstand)
    pub socket_hit_radius: f64,

    // ── Blocks ──────────────────────────────────────────────────
    /// Block-Positionen beim Verschieben auf das Raster runden
    #[serde(default = "default_snap_blocks")]
    pub snap_blocks_to_grid: bool,
    /// Segmente nach jedem Ziehen zusammenfassen
    #[serde(default = "default_merge_after_drag")]
    pub merge_after_drag: bool,

    // ── Kommandozeile ───────────────────────────────────────────
    /// Segmente aller Connectors vor dem Schreiben zusammenfassen (wie `--merge`)
    #[serde(default)]
    pub merge_on_write: bool,
}

impl Default for NetworkOptions {
    fn default() -> Self {
        Self {
            connector_line_width: CONNECTOR_LINE_WIDTH,
            connector_color: CONNECTOR_COLOR,
            new_connector_name: NEW_CONNECTOR_NAME.to_string(),

            helper_block_size: HELPER_BLOCK_SIZE,
            socket_hit_radius: SOCKET_HIT_RADIUS,

            snap_blocks_to_grid: true,
            merge_after_drag: true,

            merge_on_write: false,
        }
    }
}

/// Serde-Default für `snap_blocks_to_grid` (Abwärtskompatibilität bestehender TOML-Dateien).
fn default_snap_blocks() -> bool {
    true
}

/// Serde-Default für `merge_after_drag` (Abwärtskompatibilität).
fn default_merge_after_drag() -> bool {
    true
}

impl NetworkOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| {
            format!("Optionen konnten nicht nach '{}' geschrieben werden", path.display())
        })?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("blockmod-editor"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("blockmod_editor.toml")
    }

    /// Groesse des Hilfsblocks als Vektor.
    pub fn helper_size(&self) -> DVec2 {
        DVec2::from_array(self.helper_block_size)
    }

    /// Erstellt einen Connector mit dem konfigurierten Namen und Linienstil.
    pub fn new_connector(&self, source: impl Into<String>, target: impl Into<String>) -> Connector {
        let mut con = Connector::new(self.new_connector_name.as_str(), source, target);
        con.line_width = self.connector_line_width;
        con.color = self.connector_color;
        con
    }
}
