//! Editor-Controller für zentrale Command-Verarbeitung.

use super::use_cases::{blocks, connect, segment_drag, selection};
use super::{EditorCommand, EditorEvent, EditorState};
use crate::core::{BlockId, ConnectorId, Network, Result, SegmentRef, SocketHandle};
use crate::shared::NetworkOptions;
use glam::DVec2;

/// Orchestriert Editor-Commands und Use-Cases auf dem EditorState.
///
/// Jede Operation liefert die Events fuer die Darstellung als Rueckgabewert.
#[derive(Debug, Clone, Default)]
pub struct NetworkEditor {
    state: EditorState,
}

impl NetworkEditor {
    /// Erstellt einen Editor fuer ein vorhandenes Netzwerk.
    pub fn new(network: Network, options: NetworkOptions) -> Self {
        Self {
            state: EditorState::new(network, options),
        }
    }

    /// Read-only Zugriff auf den State.
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Das bearbeitete Netzwerk.
    pub fn network(&self) -> &Network {
        &self.state.network
    }

    /// Gibt das Netzwerk zurueck; ein laufendes Verbinden wird vorher abgebrochen.
    pub fn into_network(mut self) -> Network {
        connect::cancel_connection(&mut self.state);
        self.state.network
    }

    /// Führt einen Command aus und liefert die entstandenen Events.
    pub fn handle_command(&mut self, command: EditorCommand) -> anyhow::Result<Vec<EditorEvent>> {
        log::debug!("Command: {:?}", command);
        let state = &mut self.state;

        let events = match command {
            // === Blocks ===
            EditorCommand::MoveBlock { block, position } => {
                blocks::move_block(state, block, position)?
            }
            EditorCommand::ResizeBlock {
                block,
                width,
                height,
            } => blocks::resize_block(state, block, width, height)?,
            EditorCommand::RemoveBlock { block } => blocks::remove_block(state, block)?,

            // === Connectors & Selektion ===
            EditorCommand::RemoveConnector { connector } => {
                selection::remove_connector(state, connector)?
            }
            EditorCommand::SelectConnector { connector } => {
                selection::select_connector(state, connector)?
            }
            EditorCommand::ClearSelection => selection::clear_selection(state),

            // === Segment-Ziehen ===
            EditorCommand::BeginSegmentDrag {
                connector,
                segment,
                scene_pos,
            } => segment_drag::begin_segment_drag(state, connector, segment, scene_pos)?,
            EditorCommand::DragSegmentTo { scene_pos } => {
                segment_drag::drag_segment_to(state, scene_pos)?
            }
            EditorCommand::EndSegmentDrag => segment_drag::end_segment_drag(state)?,

            // === Verbinden ===
            EditorCommand::StartConnection { outlet, scene_pos } => {
                connect::start_connection(state, &outlet, scene_pos)?
            }
            EditorCommand::UpdateConnection { scene_pos } => {
                connect::update_connection(state, scene_pos)?
            }
            EditorCommand::FinishConnection => connect::finish_connection(state)?,
            EditorCommand::CancelConnection => connect::cancel_connection(state),
        };

        Ok(events)
    }

    /// Verschiebt einen Block (Raster-Fang gemaess Optionen).
    pub fn move_block(&mut self, block: BlockId, position: DVec2) -> Result<Vec<EditorEvent>> {
        blocks::move_block(&mut self.state, block, position)
    }

    /// Beginnt das Ziehen eines Segments.
    pub fn begin_segment_drag(
        &mut self,
        connector: ConnectorId,
        segment: SegmentRef,
        scene_pos: DVec2,
    ) -> Result<Vec<EditorEvent>> {
        segment_drag::begin_segment_drag(&mut self.state, connector, segment, scene_pos)
    }

    /// Zieht das aktuelle Segment.
    pub fn drag_segment_to(&mut self, scene_pos: DVec2) -> Result<Vec<EditorEvent>> {
        segment_drag::drag_segment_to(&mut self.state, scene_pos)
    }

    /// Beendet das Ziehen (mit Zusammenfassen).
    pub fn end_segment_drag(&mut self) -> Result<Vec<EditorEvent>> {
        segment_drag::end_segment_drag(&mut self.state)
    }

    /// Beginnt eine Verbindung an einem Ausgang.
    pub fn start_connection(&mut self, outlet: &str, scene_pos: DVec2) -> Result<Vec<EditorEvent>> {
        connect::start_connection(&mut self.state, outlet, scene_pos)
    }

    /// Bewegt das freie Verbindungsende.
    pub fn update_connection(&mut self, scene_pos: DVec2) -> Result<Vec<EditorEvent>> {
        connect::update_connection(&mut self.state, scene_pos)
    }

    /// Freier Eingang unter dem Verbindungsende.
    pub fn hovered_inlet(&self) -> Option<SocketHandle> {
        connect::hovered_inlet(&self.state)
    }

    /// Schliesst die Verbindung ab.
    pub fn finish_connection(&mut self) -> Result<Vec<EditorEvent>> {
        connect::finish_connection(&mut self.state)
    }

    /// Bricht die Verbindung ab.
    pub fn cancel_connection(&mut self) -> Vec<EditorEvent> {
        connect::cancel_connection(&mut self.state)
    }
}
