use crate::core::{BlockId, ConnectorId, Network};
use crate::shared::NetworkOptions;
use glam::DVec2;

/// Laufendes Ziehen eines mittleren Connector-Segments
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentDrag {
    /// Betroffener Connector
    pub connector: ConnectorId,
    /// Aktueller Index des gezogenen Segments (aendert sich beim Einfuegen)
    pub segment: usize,
    /// Letzte, auf das Raster gekuerzte Maus-Position
    pub last_pos: DVec2,
    /// True, sobald mindestens ein Schritt ausgefuehrt wurde
    pub moved: bool,
}

/// Laufendes interaktives Verbinden ueber den Hilfsblock
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConnection {
    /// Hilfsblock am freien Ende
    pub helper_block: BlockId,
    /// Vorlaeufiger Connector vom Ausgang zum Hilfsblock
    pub connector: ConnectorId,
    /// Quelle als `block.socket`
    pub source: String,
}

/// Hauptzustand des Editors
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    /// Bearbeitetes Netzwerk
    pub network: Network,
    /// Laufzeit-Optionen
    pub options: NetworkOptions,
    /// Selektierter Connector
    pub selected_connector: Option<ConnectorId>,
    /// Laufendes Segment-Ziehen
    pub segment_drag: Option<SegmentDrag>,
    /// Laufendes Verbinden
    pub connection: Option<PendingConnection>,
}

impl EditorState {
    /// Erstellt einen State fuer ein vorhandenes Netzwerk
    pub fn new(network: Network, options: NetworkOptions) -> Self {
        Self {
            network,
            options,
            selected_connector: None,
            segment_drag: None,
            connection: None,
        }
    }

    /// True, solange ein Hilfsblock im Netzwerk steckt
    pub fn is_connecting(&self) -> bool {
        self.connection.is_some()
    }
}
