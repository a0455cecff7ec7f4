//! Use-Case: Blocks verschieben, skalieren und entfernen.

use crate::app::{EditorEvent, EditorState};
use crate::core::{snap_to_grid, BlockId, GeometryChange, Result};
use glam::DVec2;

/// Verschiebt einen Block; mit aktivem Raster-Fang wird die Position gerundet.
pub fn move_block(state: &mut EditorState, block: BlockId, position: DVec2) -> Result<Vec<EditorEvent>> {
    let position = if state.options.snap_blocks_to_grid {
        snap_to_grid(position)
    } else {
        position
    };
    let change = state.network.move_block(block, position)?;
    Ok(geometry_events(change))
}

/// Aendert die Groesse eines Blocks und passt seine Connectors an.
pub fn resize_block(
    state: &mut EditorState,
    block: BlockId,
    width: f64,
    height: f64,
) -> Result<Vec<EditorEvent>> {
    let change = state.network.resize_block(block, width, height)?;
    Ok(geometry_events(change))
}

/// Entfernt einen Block samt aller beruehrten Connectors.
pub fn remove_block(state: &mut EditorState, block: BlockId) -> Result<Vec<EditorEvent>> {
    let (removed_block, removed_connectors) = state.network.remove_block(block)?;
    log::info!(
        "Block '{}' mit {} Connector(s) entfernt",
        removed_block.name,
        removed_connectors.len()
    );

    let mut events = Vec::new();
    let mut selection_lost = false;
    for (id, _) in &removed_connectors {
        events.push(EditorEvent::ConnectorRemoved(*id));
        if state.selected_connector == Some(*id) {
            selection_lost = true;
        }
        if state.segment_drag.as_ref().is_some_and(|d| d.connector == *id) {
            state.segment_drag = None;
        }
    }
    if selection_lost {
        state.selected_connector = None;
        events.push(EditorEvent::SelectionCleared);
    }
    Ok(events)
}

fn geometry_events(change: GeometryChange) -> Vec<EditorEvent> {
    if !change.is_clean() {
        log::debug!("{} Connector(s) nicht angepasst", change.failures.len());
    }
    EditorEvent::geometry_changed(change.adjusted)
        .into_iter()
        .collect()
}
