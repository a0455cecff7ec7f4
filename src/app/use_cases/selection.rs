//! Use-Case: Connector-Selektion.

use crate::app::{EditorEvent, EditorState};
use crate::core::{ConnectorId, NetworkError, Result};

/// Selektiert einen Connector.
pub fn select_connector(state: &mut EditorState, connector: ConnectorId) -> Result<Vec<EditorEvent>> {
    if state.network.connector(connector).is_none() {
        return Err(NetworkError::UnknownConnectorId(connector));
    }
    state.selected_connector = Some(connector);
    Ok(vec![EditorEvent::ConnectorSelected(connector)])
}

/// Hebt die Selektion auf.
pub fn clear_selection(state: &mut EditorState) -> Vec<EditorEvent> {
    state.selected_connector = None;
    vec![EditorEvent::SelectionCleared]
}

/// Entfernt einen Connector; war er selektiert, wird die Selektion aufgehoben.
pub fn remove_connector(state: &mut EditorState, connector: ConnectorId) -> Result<Vec<EditorEvent>> {
    state.network.remove_connector(connector)?;
    let mut events = vec![EditorEvent::ConnectorRemoved(connector)];
    if state.selected_connector == Some(connector) {
        events.extend(clear_selection(state));
    }
    if state
        .segment_drag
        .as_ref()
        .is_some_and(|drag| drag.connector == connector)
    {
        state.segment_drag = None;
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Block, Connector, Network, Orientation, Socket};
    use crate::shared::NetworkOptions;
    use glam::DVec2;

    fn state_with_connector() -> (EditorState, ConnectorId) {
        let mut network = Network::new();
        let mut a = Block::new("A", DVec2::ZERO, DVec2::new(40.0, 40.0));
        a.sockets.push(Socket::new(
            "out",
            DVec2::new(40.0, 16.0),
            Orientation::Horizontal,
            false,
        ));
        let mut b = Block::new("B", DVec2::new(120.0, 0.0), DVec2::new(40.0, 40.0));
        b.sockets.push(Socket::new(
            "in",
            DVec2::new(0.0, 16.0),
            Orientation::Horizontal,
            true,
        ));
        network.add_block(a).expect("A gueltig");
        network.add_block(b).expect("B gueltig");
        let c = network
            .add_connector(Connector::new("c", "A.out", "B.in"))
            .expect("Verbindung gueltig");
        (EditorState::new(network, NetworkOptions::default()), c)
    }

    #[test]
    fn select_and_remove_connector() {
        let (mut state, c) = state_with_connector();

        let events = select_connector(&mut state, c).expect("vorhanden");
        assert_eq!(events, vec![EditorEvent::ConnectorSelected(c)]);
        assert_eq!(state.selected_connector, Some(c));

        let events = remove_connector(&mut state, c).expect("vorhanden");
        assert_eq!(
            events,
            vec![EditorEvent::ConnectorRemoved(c), EditorEvent::SelectionCleared]
        );
        assert_eq!(state.selected_connector, None);
        assert_eq!(
            select_connector(&mut state, c),
            Err(NetworkError::UnknownConnectorId(c))
        );
    }
}
