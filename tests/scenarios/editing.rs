use flowboard::{
    Board, Change, Connection, Dimensions, Node, NodeData, NodeKind, Position, fresh_node_id,
};

fn select(id: &str, selected: bool) -> Change<Node> {
    Change::Select {
        id: id.to_string(),
        selected,
    }
}

#[test]
fn click_select_batch_drives_active_node() {
    let mut board = Board::in_memory();

    // Clicking "1" while "3" is selected arrives as one batch.
    board.on_nodes_change(&[select("3", true)]);
    board.on_nodes_change(&[select("1", true), select("3", false)]);

    assert_eq!(board.active_node_id(), Some("1"));
    assert!(board.nodes()[0].selected);
    assert!(!board.nodes()[1].selected);
}

#[test]
fn empty_canvas_click_clears_active_node() {
    let mut board = Board::in_memory();
    board.on_nodes_change(&[select("1", true)]);
    assert_eq!(board.active_node_id(), Some("1"));

    board.on_nodes_change(&[select("1", false)]);

    assert_eq!(board.active_node_id(), None);
    assert!(board.active_node().is_none());
}

#[test]
fn box_select_batch_activates_first_selected() {
    let mut board = Board::in_memory();
    board.on_nodes_change(&[select("3", true), select("1", true)]);

    assert_eq!(board.active_node_id(), Some("3"));
    assert!(board.nodes()[0].selected);
    assert!(board.nodes()[1].selected);
}

#[test]
fn drag_flow_moves_node_and_clears_drag_flag() {
    let mut board = Board::in_memory();

    board.on_nodes_change(&[Change::Position {
        id: "1".to_string(),
        position: Some(Position::new(260.0, 40.0)),
        dragging: Some(true),
    }]);
    assert!(board.nodes()[0].dragging);

    board.on_nodes_change(&[Change::Position {
        id: "1".to_string(),
        position: Some(Position::new(320.0, 80.0)),
        dragging: Some(true),
    }]);
    board.on_nodes_change(&[Change::Position {
        id: "1".to_string(),
        position: None,
        dragging: Some(false),
    }]);

    assert_eq!(board.nodes()[0].position, Position::new(320.0, 80.0));
    assert!(!board.nodes()[0].dragging);
}

#[test]
fn connect_twice_yields_single_edge() {
    let mut board = Board::in_memory();
    board.on_connect(Connection::new("1", "3"));
    board.on_connect(Connection::new("1", "3"));

    assert_eq!(board.edges().len(), 1);
    assert_eq!(board.edges()[0].id, "edge-1-3");
}

#[test]
fn delete_key_removes_selected_node_and_its_edges() {
    let mut board = Board::in_memory();
    board.on_connect(Connection::new("1", "3"));
    board.on_nodes_change(&[select("1", true)]);

    // The engine reports the node removal and its connected edges together.
    board.on_nodes_change(&[Change::Remove {
        id: "1".to_string(),
    }]);
    board.on_edges_change(&[Change::Remove {
        id: "edge-1-3".to_string(),
    }]);

    assert_eq!(board.nodes().len(), 1);
    assert!(board.edges().is_empty());
    assert_eq!(board.active_node_id(), Some("1"));
    assert!(board.active_node().is_none());
}

#[test]
fn palette_drop_adds_widget_nodes_with_seeded_data() {
    let mut board = Board::in_memory();
    board.add_node(Node::note(fresh_node_id(), Position::new(60.0, 120.0)));
    board.add_node(Node::color(fresh_node_id(), Position::new(60.0, 220.0)));

    assert_eq!(board.nodes().len(), 4);

    let note = &board.nodes()[2];
    assert_eq!(note.kind, Some(NodeKind::Note));
    assert_eq!(
        note.data.get("value").and_then(|v| v.as_str()),
        Some("say something...")
    );

    let color = &board.nodes()[3];
    assert_eq!(color.kind, Some(NodeKind::Color));
    assert_eq!(
        color.data.get("value").and_then(|v| v.as_str()),
        Some("#91a8ee")
    );
}

#[test]
fn typing_into_note_replaces_its_payload() {
    let mut board = Board::in_memory();
    let id = fresh_node_id();
    board.add_node(Node::note(id.clone(), Position::new(0.0, 0.0)));

    let mut data = NodeData::new();
    data.insert("value".to_string(), "hello canvas".into());
    board.update_node_data(&id, data);

    let node = board.nodes().iter().find(|node| node.id == id).unwrap();
    assert_eq!(
        node.data.get("value").and_then(|v| v.as_str()),
        Some("hello canvas")
    );
}

#[test]
fn measured_dimensions_stick_to_nodes() {
    let mut board = Board::in_memory();
    board.on_nodes_change(&[Change::Dimensions {
        id: "3".to_string(),
        dimensions: Some(Dimensions {
            width: 148.0,
            height: 38.0,
        }),
    }]);

    assert_eq!(board.nodes()[1].width, Some(148.0));
    assert_eq!(board.nodes()[1].height, Some(38.0));
}

#[test]
fn reselect_after_removal_activates_surviving_node() {
    let mut board = Board::in_memory();
    board.on_nodes_change(&[select("1", true)]);
    board.on_nodes_change(&[Change::Remove {
        id: "1".to_string(),
    }]);
    board.on_nodes_change(&[select("3", true)]);

    assert_eq!(board.active_node_id(), Some("3"));
    assert_eq!(board.active_node().unwrap().id, "3");
}
