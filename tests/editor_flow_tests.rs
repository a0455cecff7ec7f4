use blockmod_editor::core::{Block, Connector, Orientation, Segment, Socket};
use blockmod_editor::shared::NEW_CONNECTOR_NAME;
use blockmod_editor::{
    write_network, BlockId, ConnectorId, EditorCommand, EditorEvent, Network, NetworkEditor,
    NetworkOptions, SegmentRef,
};
use glam::DVec2;

/// A bei (0,0) mit Ausgang rechts, B bei (300,80) mit Eingang links.
fn network() -> (Network, BlockId, BlockId) {
    let mut network = Network::new();
    let mut a = Block::new("A", DVec2::ZERO, DVec2::new(100.0, 48.0));
    a.sockets.push(Socket::new(
        "out",
        DVec2::new(100.0, 24.0),
        Orientation::Horizontal,
        false,
    ));
    let mut b = Block::new("B", DVec2::new(300.0, 80.0), DVec2::new(100.0, 48.0));
    b.sockets.push(Socket::new(
        "in",
        DVec2::new(0.0, 24.0),
        Orientation::Horizontal,
        true,
    ));
    let a = network.add_block(a).expect("A gueltig");
    let b = network.add_block(b).expect("B gueltig");
    (network, a, b)
}

fn connected_editor() -> (NetworkEditor, BlockId, ConnectorId) {
    let (mut network, _, b) = network();
    let con = network
        .add_connector(Connector::new("c", "A.out", "B.in"))
        .expect("Verbindung gueltig");
    (NetworkEditor::new(network, NetworkOptions::default()), b, con)
}

#[test]
fn test_interactive_connection_creates_connector() {
    let (network, _, _) = network();
    let mut editor = NetworkEditor::new(network, NetworkOptions::default());

    let events = editor
        .handle_command(EditorCommand::StartConnection {
            outlet: "A.out".into(),
            scene_pos: DVec2::new(150.0, 30.0),
        })
        .expect("Start gueltig");
    let transient = match events.as_slice() {
        [EditorEvent::SelectionCleared, EditorEvent::ConnectorAdded(id)] => *id,
        other => panic!("Unerwartete Events: {other:?}"),
    };
    assert!(editor.state().is_connecting());

    // Hilfsblock erscheint nicht in der Datei
    let xml = write_network(editor.network()).expect("Export");
    assert!(!xml.contains("<Connectors>"));

    editor
        .handle_command(EditorCommand::UpdateConnection {
            scene_pos: DVec2::new(301.0, 105.0),
        })
        .expect("Update gueltig");
    assert!(editor.hovered_inlet().is_some());

    let events = editor
        .handle_command(EditorCommand::FinishConnection)
        .expect("Abschluss gueltig");
    assert_eq!(events.first(), Some(&EditorEvent::ConnectorRemoved(transient)));
    let created = match events.last() {
        Some(EditorEvent::ConnectorAdded(id)) => *id,
        other => panic!("Kein neuer Connector: {other:?}"),
    };

    let network = editor.into_network();
    assert_eq!(network.block_count(), 2);
    assert_eq!(network.connector_count(), 1);
    let con = network.connector(created).expect("Connector vorhanden");
    assert_eq!(con.name, NEW_CONNECTOR_NAME);
    assert_eq!(con.target, "B.in");
    assert!(network.connector_geometry(created).expect("Geometrie").is_closed());
}

#[test]
fn test_connection_released_over_empty_space_creates_nothing() {
    let (network, _, _) = network();
    let mut editor = NetworkEditor::new(network, NetworkOptions::default());

    editor
        .start_connection("A.out", DVec2::new(150.0, 30.0))
        .expect("Start gueltig");
    editor
        .update_connection(DVec2::new(200.0, 200.0))
        .expect("Update gueltig");
    assert!(editor.hovered_inlet().is_none());

    let events = editor.finish_connection().expect("Abschluss gueltig");
    assert!(events.contains(&EditorEvent::SelectionCleared));
    assert!(!editor.state().is_connecting());
    assert_eq!(editor.network().block_count(), 2);
    assert_eq!(editor.network().connector_count(), 0);
}

#[test]
fn test_connecting_an_inlet_is_rejected() {
    let (network, _, _) = network();
    let mut editor = NetworkEditor::new(network, NetworkOptions::default());

    let result = editor.handle_command(EditorCommand::StartConnection {
        outlet: "B.in".into(),
        scene_pos: DVec2::ZERO,
    });
    assert!(result.is_err());
    assert!(!editor.state().is_connecting());
    assert_eq!(editor.network().block_count(), 2);
}

#[test]
fn test_segment_drag_flow_moves_and_selects() {
    let (mut editor, _, con) = connected_editor();
    assert_eq!(
        editor.network().connector(con).expect("Connector").segments,
        vec![Segment::vertical(80.0), Segment::horizontal(168.0)]
    );

    let events = editor
        .handle_command(EditorCommand::BeginSegmentDrag {
            connector: con,
            segment: SegmentRef::Middle(0),
            scene_pos: DVec2::new(150.0, 50.0),
        })
        .expect("Beginn gueltig");
    assert_eq!(events, vec![EditorEvent::ConnectorSelected(con)]);

    let events = editor
        .handle_command(EditorCommand::DragSegmentTo {
            scene_pos: DVec2::new(230.0, 50.0),
        })
        .expect("Ziehen gueltig");
    assert_eq!(
        events,
        vec![EditorEvent::GeometryChanged {
            connectors: vec![con]
        }]
    );

    editor
        .handle_command(EditorCommand::EndSegmentDrag)
        .expect("Ende gueltig");
    assert_eq!(
        editor.network().connector(con).expect("Connector").segments,
        vec![
            Segment::horizontal(80.0),
            Segment::vertical(80.0),
            Segment::horizontal(88.0),
        ]
    );
    assert_eq!(editor.state().selected_connector, Some(con));
    assert!(editor.network().connector_geometry(con).expect("Geometrie").is_closed());
}

#[test]
fn test_extension_line_cannot_be_dragged() {
    let (mut editor, _, con) = connected_editor();
    let result = editor.handle_command(EditorCommand::BeginSegmentDrag {
        connector: con,
        segment: SegmentRef::StartLine,
        scene_pos: DVec2::ZERO,
    });
    assert!(result.is_err());
    assert!(editor.state().segment_drag.is_none());
}

#[test]
fn test_move_block_snaps_and_reports_geometry() {
    let (mut editor, b, con) = connected_editor();

    let events = editor
        .handle_command(EditorCommand::MoveBlock {
            block: b,
            position: DVec2::new(303.0, 85.0),
        })
        .expect("Verschieben gueltig");

    assert_eq!(
        events,
        vec![EditorEvent::GeometryChanged {
            connectors: vec![con]
        }]
    );
    let block = editor.network().block(b).expect("Block vorhanden");
    assert_eq!(block.position, DVec2::new(304.0, 88.0));
    assert!(editor.network().connector_geometry(con).expect("Geometrie").is_closed());
}

#[test]
fn test_remove_selected_block_clears_selection() {
    let (mut editor, b, con) = connected_editor();
    editor
        .handle_command(EditorCommand::SelectConnector { connector: con })
        .expect("Selektion gueltig");

    let events = editor
        .handle_command(EditorCommand::RemoveBlock { block: b })
        .expect("Entfernen gueltig");

    assert_eq!(
        events,
        vec![
            EditorEvent::ConnectorRemoved(con),
            EditorEvent::SelectionCleared
        ]
    );
    assert_eq!(editor.state().selected_connector, None);
    assert_eq!(editor.network().connector_count(), 0);
}
