//! Fehlertypen des Netzwerk-Modells.

use super::{BlockId, ConnectorId};

/// Ergebnis-Typ fuer Modell-Operationen.
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Fehler bei Validierung, Namensaufloesung und Geometrie-Abgleich.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NetworkError {
    /// Socket-Referenz ohne '.'
    #[error("Ungueltige Socket-Referenz '{0}', erwartet 'block.socket'")]
    MalformedSocketRef(String),

    /// Kein Block mit diesem Namen
    #[error("Unbekannter Block '{0}'")]
    UnknownBlock(String),

    /// Block existiert, Socket nicht
    #[error("Unbekannter Socket '{socket}' in Block '{block}'")]
    UnknownSocket { block: String, socket: String },

    /// Leerer Block-Name
    #[error("Block-Name darf nicht leer sein")]
    EmptyBlockName,

    /// Block-Name enthaelt das Trennzeichen oder den reservierten Hilfsnamen
    #[error("Ungueltiger Block-Name '{0}'")]
    InvalidBlockName(String),

    /// Block-Name mehrfach vergeben
    #[error("Doppelter Block-Name '{0}'")]
    DuplicateBlockName(String),

    /// Socket-Name innerhalb eines Blocks mehrfach vergeben
    #[error("Doppelter Socket-Name '{socket}' in Block '{block}'")]
    DuplicateSocketName { block: String, socket: String },

    /// Quelle ist kein Ausgang
    #[error("Ungueltige Quelle '{0}' (muss ein Ausgang sein)")]
    SourceNotOutlet(String),

    /// Ziel ist kein Eingang
    #[error("Ungueltiges Ziel '{0}' (muss ein Eingang sein)")]
    TargetNotInlet(String),

    /// Eingang hat bereits eine Verbindung
    #[error("Eingang '{0}' ist bereits verbunden")]
    InletAlreadyConnected(String),

    /// Block-Handle existiert nicht (mehr)
    #[error("Unbekannte Block-ID {0:?}")]
    UnknownBlockId(BlockId),

    /// Connector-Handle existiert nicht (mehr)
    #[error("Unbekannte Connector-ID {0:?}")]
    UnknownConnectorId(ConnectorId),

    /// Segment-Index ausserhalb der Segmentliste
    #[error("Segment-Index {index} ausserhalb von 0..{len}")]
    SegmentOutOfRange { index: usize, len: usize },

    /// Start-/End-Verlaengerungslinie kann nicht verschoben werden
    #[error("Verlaengerungslinien sind nicht verschiebbar")]
    SegmentNotDraggable,

    /// Geometrie-Abgleich eines Connectors nicht moeglich
    #[error("Connector '{connector}' kann nicht angepasst werden: {source}")]
    GeometryInconsistency {
        connector: String,
        #[source]
        source: Box<NetworkError>,
    },
}

impl NetworkError {
    /// True fuer strukturelle Fehler (ungueltiges Modell), false fuer Geometrie-Fehler.
    pub fn is_structural(&self) -> bool {
        !matches!(self, NetworkError::GeometryInconsistency { .. })
    }
}
