//! Use-Case: Mittlere Connector-Segmente ziehen.
//!
//! Ablauf wie bei der Maus: `begin` beim Druecken, beliebig viele `drag_to`
//! beim Bewegen, `end` beim Loslassen (fasst die Segmente zusammen).

use crate::app::use_cases::selection;
use crate::app::{EditorEvent, EditorState, SegmentDrag};
use crate::core::{near_zero, truncate_to_grid, ConnectorId, NetworkError, Result, SegmentRef};
use glam::DVec2;

/// Beginnt das Ziehen eines Segments und selektiert den Connector.
pub fn begin_segment_drag(
    state: &mut EditorState,
    connector: ConnectorId,
    segment: SegmentRef,
    scene_pos: DVec2,
) -> Result<Vec<EditorEvent>> {
    let con = state
        .network
        .connector(connector)
        .ok_or(NetworkError::UnknownConnectorId(connector))?;
    let index = segment
        .middle_index()
        .ok_or(NetworkError::SegmentNotDraggable)?;
    if index >= con.segments.len() {
        return Err(NetworkError::SegmentOutOfRange {
            index,
            len: con.segments.len(),
        });
    }

    state.segment_drag = Some(SegmentDrag {
        connector,
        segment: index,
        last_pos: truncate_to_grid(scene_pos),
        moved: false,
    });
    selection::select_connector(state, connector)
}

/// Zieht das Segment an die (auf das Raster gekuerzte) Position.
///
/// Ohne laufende Sitzung oder ohne Rasterschritt passiert nichts.
pub fn drag_segment_to(state: &mut EditorState, scene_pos: DVec2) -> Result<Vec<EditorEvent>> {
    let Some(drag) = state.segment_drag.as_mut() else {
        return Ok(Vec::new());
    };

    let pos = truncate_to_grid(scene_pos);
    let delta = pos - drag.last_pos;
    if near_zero(delta.x) && near_zero(delta.y) {
        return Ok(Vec::new());
    }

    drag.segment = state.network.move_connector_segment(
        drag.connector,
        SegmentRef::Middle(drag.segment),
        delta,
    )?;
    drag.last_pos = pos;
    drag.moved = true;

    Ok(vec![EditorEvent::GeometryChanged {
        connectors: vec![drag.connector],
    }])
}

/// Beendet das Ziehen; nach einer Bewegung werden die Segmente zusammengefasst.
pub fn end_segment_drag(state: &mut EditorState) -> Result<Vec<EditorEvent>> {
    let Some(drag) = state.segment_drag.take() else {
        return Ok(Vec::new());
    };

    let mut events = Vec::new();
    if drag.moved && state.options.merge_after_drag {
        let merge = state.network.merge_connector_segments(drag.connector)?;
        if merge.changed {
            events.push(EditorEvent::GeometryChanged {
                connectors: vec![drag.connector],
            });
        }
    }
    events.extend(selection::select_connector(state, drag.connector)?);
    Ok(events)
}
