//! Use-Case: Interaktives Verbinden ueber einen unsichtbaren Hilfsblock.
//!
//! Der Hilfsblock haengt am freien Ende des vorlaeufigen Connectors. Jeder
//! Abbruchpfad muss ihn wieder entfernen (`cancel_connection`).

use crate::app::{EditorEvent, EditorState, PendingConnection};
use crate::core::{
    Block, Connector, NetworkError, Result, SocketHandle, SocketRef, HELPER_BLOCK_NAME,
};
use glam::DVec2;

/// Startet eine Verbindung am Ausgang `outlet` (`block.socket`).
pub fn start_connection(
    state: &mut EditorState,
    outlet: &str,
    scene_pos: DVec2,
) -> Result<Vec<EditorEvent>> {
    let mut events = cancel_connection(state);

    let handle = state.network.lookup_block_and_socket(outlet)?;
    if state
        .network
        .socket(handle)
        .is_some_and(|(_, socket)| socket.inlet)
    {
        return Err(NetworkError::SourceNotOutlet(outlet.to_string()));
    }

    let helper = Block::connection_helper(scene_pos, state.options.helper_size());
    let helper_block = state.network.add_block(helper)?;
    let target = SocketRef::new(HELPER_BLOCK_NAME, HELPER_BLOCK_NAME).flat_name();
    let transient = Connector::new(HELPER_BLOCK_NAME, outlet, target);

    let connector = match state.network.add_connector(transient) {
        Ok(id) => id,
        Err(e) => {
            if let Err(cleanup) = state.network.remove_block(helper_block) {
                log::warn!("Hilfsblock konnte nicht entfernt werden: {}", cleanup);
            }
            return Err(e);
        }
    };

    state.connection = Some(PendingConnection {
        helper_block,
        connector,
        source: outlet.to_string(),
    });
    state.selected_connector = None;
    events.push(EditorEvent::SelectionCleared);
    events.push(EditorEvent::ConnectorAdded(connector));
    log::debug!("Verbinden gestartet an '{}'", outlet);
    Ok(events)
}

/// Bewegt das freie Ende (den Hilfsblock) an `scene_pos`.
pub fn update_connection(state: &mut EditorState, scene_pos: DVec2) -> Result<Vec<EditorEvent>> {
    let Some(pending) = state.connection.as_ref() else {
        return Ok(Vec::new());
    };
    let change = state.network.move_block(pending.helper_block, scene_pos)?;
    Ok(EditorEvent::geometry_changed(change.adjusted)
        .into_iter()
        .collect())
}

/// Freier Eingang unter dem freien Ende, falls vorhanden.
///
/// Pro Block zaehlt nur der erste Eingang im Fang-Radius; ist dieser schon
/// verbunden, wird der naechste Block geprueft.
pub fn hovered_inlet(state: &EditorState) -> Option<SocketHandle> {
    let pending = state.connection.as_ref()?;
    let cursor = state.network.block(pending.helper_block)?.position;
    let radius = state.options.socket_hit_radius;

    state
        .network
        .blocks()
        .filter(|(_, block)| !block.is_connection_helper())
        .filter_map(|(id, block)| {
            block
                .inlet_socket_accepting_connection(cursor, radius)
                .map(|socket| SocketHandle { block: id, socket })
        })
        .find(|handle| !state.network.is_connected_socket(*handle))
}

/// Schliesst die Verbindung ab.
///
/// Der Hilfsblock wird immer entfernt. Liegt ein freier Eingang unter dem
/// Cursor, entsteht ein neuer Connector (Name und Stil aus den Optionen).
pub fn finish_connection(state: &mut EditorState) -> Result<Vec<EditorEvent>> {
    let target = hovered_inlet(state).and_then(|handle| {
        state
            .network
            .socket(handle)
            .map(|(block, socket)| SocketRef::new(block.name.as_str(), socket.name.as_str()))
    });
    let Some(pending) = state.connection.clone() else {
        return Ok(Vec::new());
    };
    let mut events = cancel_connection(state);

    match target {
        Some(target) => {
            let con = state.options.new_connector(pending.source, target.flat_name());
            let id = state.network.add_connector(con)?;
            log::info!("Connector {:?} zu '{}' erstellt", id, target);
            events.push(EditorEvent::ConnectorAdded(id));
        }
        None => {
            if state.selected_connector.is_none() {
                events.push(EditorEvent::SelectionCleared);
            }
        }
    }
    Ok(events)
}

/// Bricht das Verbinden ab und entfernt Hilfsblock und vorlaeufigen Connector.
pub fn cancel_connection(state: &mut EditorState) -> Vec<EditorEvent> {
    let Some(pending) = state.connection.take() else {
        return Vec::new();
    };
    match state.network.remove_block(pending.helper_block) {
        Ok((_, removed)) => removed
            .into_iter()
            .map(|(id, _)| EditorEvent::ConnectorRemoved(id))
            .collect(),
        Err(e) => {
            log::warn!("Hilfsblock nicht mehr vorhanden: {}", e);
            Vec::new()
        }
    }
}
