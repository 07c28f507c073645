use super::*;

fn sample_action(action_type: &str) -> Action {
    Action {
        action_type: action_type.into(),
        board_id: "board-1".into(),
        event_id: "evt-1".into(),
        coords: [Position::new(1.0, 2.0), Position::new(30.5, 40.25)],
        mouse_position: Position::new(7.0, 8.0),
        join_order: 0,
    }
}

// =============================================================================
// ActionKind
// =============================================================================

#[test]
fn kind_of_known_types() {
    assert_eq!(ActionKind::of("updateSingleDrawingPosition"), ActionKind::UpdateSingleDrawingPosition);
    assert_eq!(ActionKind::of("rtMousePosition"), ActionKind::RtMousePosition);
    assert_eq!(ActionKind::of("collabChange"), ActionKind::CollabChange);
}

#[test]
fn kind_match_is_case_sensitive() {
    assert_eq!(ActionKind::of("collabchange"), ActionKind::Other);
    assert_eq!(ActionKind::of("RtMousePosition"), ActionKind::Other);
    assert_eq!(ActionKind::of(""), ActionKind::Other);
}

#[test]
fn position_updates_skip_sender() {
    assert_eq!(ActionKind::UpdateSingleDrawingPosition.fanout(), Fanout::ExceptSender);
    assert_eq!(ActionKind::RtMousePosition.fanout(), Fanout::ExceptSender);
}

#[test]
fn collab_and_unknown_reach_everyone() {
    assert_eq!(ActionKind::CollabChange.fanout(), Fanout::All);
    assert_eq!(ActionKind::Other.fanout(), Fanout::All);
}

// =============================================================================
// decode
// =============================================================================

#[test]
fn decode_full_payload() {
    let raw = br#"{
        "type": "rtMousePosition",
        "boardId": "b1",
        "eventId": "e1",
        "coords": [{"x": 1, "y": 2}, {"x": 3, "y": 4}],
        "mousePosition": {"x": 5.5, "y": 6.5}
    }"#;

    let Decoded::Action(action) = decode(raw) else {
        panic!("expected a decoded action");
    };
    assert_eq!(action.kind(), ActionKind::RtMousePosition);
    assert_eq!(action.board_id, "b1");
    assert_eq!(action.event_id, "e1");
    assert_eq!(action.coords[1], Position::new(3.0, 4.0));
    assert_eq!(action.mouse_position, Position::new(5.5, 6.5));
}

#[test]
fn decode_drops_client_join_order() {
    let raw = br#"{"type": "collabChange", "boardId": "b1", "joinOrder": 99}"#;
    let action = decode(raw).into_action();
    assert_eq!(action.join_order, 0);
}

#[test]
fn decode_ignores_join_order_of_any_type() {
    for raw in [
        br#"{"type": "rtMousePosition", "boardId": "b1", "joinOrder": 1.5}"#.as_slice(),
        br#"{"type": "rtMousePosition", "boardId": "b1", "joinOrder": "x"}"#.as_slice(),
        br#"{"type": "rtMousePosition", "boardId": "b1", "joinOrder": null}"#.as_slice(),
    ] {
        let decoded = decode(raw);
        assert!(!decoded.is_malformed());
        let action = decoded.into_action();
        assert_eq!(action.kind(), ActionKind::RtMousePosition);
        assert_eq!(action.board_id, "b1");
        assert_eq!(action.join_order, 0);
    }
}

#[test]
fn decode_coords_zero_fills_null_point() {
    let decoded = decode(br#"{"type": "updateSingleDrawingPosition", "coords": [{"x": 1, "y": 2}, null]}"#);
    assert!(!decoded.is_malformed());
    assert_eq!(decoded.into_action().coords, [Position::new(1.0, 2.0), Position::default()]);
}

#[test]
fn decode_coords_zero_fills_short_array() {
    let decoded = decode(br#"{"type": "updateSingleDrawingPosition", "coords": [{"x": 1, "y": 2}]}"#);
    assert!(!decoded.is_malformed());
    assert_eq!(decoded.into_action().coords, [Position::new(1.0, 2.0), Position::default()]);
}

#[test]
fn decode_coords_tolerates_null_and_extra_points() {
    assert_eq!(decode(br#"{"coords": null}"#).into_action().coords, [Position::default(); 2]);
    let action = decode(br#"{"coords": [{"x": 1}, {"y": 2}, {"x": 9, "y": 9}]}"#).into_action();
    assert_eq!(action.coords, [Position::new(1.0, 0.0), Position::new(0.0, 2.0)]);
}

#[test]
fn decode_missing_fields_default_to_zero() {
    let action = decode(br#"{"type": "somethingElse"}"#).into_action();
    assert_eq!(action.action_type, "somethingElse");
    assert!(action.board_id.is_empty());
    assert_eq!(action.coords, [Position::default(); 2]);
    assert_eq!(action.mouse_position, Position::default());
}

#[test]
fn decode_partial_position_defaults_missing_axis() {
    let action = decode(br#"{"mousePosition": {"x": 12}}"#).into_action();
    assert_eq!(action.mouse_position, Position::new(12.0, 0.0));
}

#[test]
fn decode_garbage_is_malformed() {
    let decoded = decode(b"set abc 0 0");
    assert!(decoded.is_malformed());
    assert_eq!(decoded.into_action(), Action::default());
}

#[test]
fn decode_wrong_shape_is_malformed() {
    assert!(decode(br#"{"type": 42}"#).is_malformed());
    assert!(decode(br#"{"coords": {"x": 1, "y": 1}}"#).is_malformed());
    assert!(decode(br#""just a string""#).is_malformed());
}

// =============================================================================
// encode
// =============================================================================

#[test]
fn encode_uses_wire_field_names() {
    let mut action = sample_action("collabChange");
    action.join_order = 3;
    let json: serde_json::Value = serde_json::from_str(&encode(&action).unwrap()).unwrap();

    assert_eq!(json["type"], "collabChange");
    assert_eq!(json["boardId"], "board-1");
    assert_eq!(json["eventId"], "evt-1");
    assert_eq!(json["joinOrder"], 3);
    assert_eq!(json["mousePosition"]["x"], 7.0);
    assert_eq!(json["coords"][1]["y"], 40.25);
    assert!(json.get("action_type").is_none());
}

#[test]
fn zero_action_encodes_every_field() {
    let json: serde_json::Value = serde_json::from_str(&encode(&Action::default()).unwrap()).unwrap();
    assert_eq!(json["type"], "");
    assert_eq!(json["joinOrder"], 0);
    assert_eq!(json["coords"].as_array().map(Vec::len), Some(2));
}
