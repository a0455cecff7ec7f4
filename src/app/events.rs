//! EditorCommand- und EditorEvent-Enums fuer den Command/Event-Datenfluss.
//!
//! Commands kommen von der (externen) Darstellung herein, Events gehen
//! als expliziter Rueckgabewert wieder hinaus.

use crate::core::{BlockId, ConnectorId, SegmentRef};
use glam::DVec2;

/// Commands sind mutierende Schritte, die zentral ausgeführt werden.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    /// Block an Szenen-Position verschieben (ggf. mit Raster-Fang)
    MoveBlock { block: BlockId, position: DVec2 },
    /// Block-Groesse aendern
    ResizeBlock {
        block: BlockId,
        width: f64,
        height: f64,
    },
    /// Block samt Connectors entfernen
    RemoveBlock { block: BlockId },
    /// Connector entfernen
    RemoveConnector { connector: ConnectorId },
    /// Connector selektieren
    SelectConnector { connector: ConnectorId },
    /// Selektion aufheben
    ClearSelection,
    /// Segment-Ziehen beginnen (Maus gedrueckt)
    BeginSegmentDrag {
        connector: ConnectorId,
        segment: SegmentRef,
        scene_pos: DVec2,
    },
    /// Gezogenes Segment an neue Maus-Position
    DragSegmentTo { scene_pos: DVec2 },
    /// Segment-Ziehen beenden (Maus losgelassen)
    EndSegmentDrag,
    /// Interaktives Verbinden an einem Ausgang beginnen
    StartConnection { outlet: String, scene_pos: DVec2 },
    /// Freies Verbindungsende verschieben
    UpdateConnection { scene_pos: DVec2 },
    /// Verbindung am Eingang unter dem Cursor abschliessen
    FinishConnection,
    /// Verbinden abbrechen (Escape, Fokusverlust, ...)
    CancelConnection,
}

/// Benachrichtigungen fuer die Darstellung nach jeder Operation.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// Segmente dieser Connectors haben sich geaendert (neu zeichnen)
    GeometryChanged { connectors: Vec<ConnectorId> },
    /// Neuer Connector im Netzwerk
    ConnectorAdded(ConnectorId),
    /// Connector entfernt
    ConnectorRemoved(ConnectorId),
    /// Connector selektiert
    ConnectorSelected(ConnectorId),
    /// Nichts mehr selektiert
    SelectionCleared,
}

impl EditorEvent {
    /// Geometrie-Event, sofern die Liste nicht leer ist.
    pub fn geometry_changed(connectors: Vec<ConnectorId>) -> Option<Self> {
        (!connectors.is_empty()).then_some(EditorEvent::GeometryChanged { connectors })
    }
}
