use super::*;
use crate::action::Position;

fn action(event_id: &str, x: f64) -> Action {
    Action {
        action_type: "updateSingleDrawingPosition".into(),
        board_id: "board".into(),
        event_id: event_id.into(),
        coords: [Position::new(x, x), Position::new(x + 1.0, x + 1.0)],
        mouse_position: Position::default(),
        join_order: 0,
    }
}

#[test]
fn new_cache_is_empty() {
    let cache = ActionCache::new();
    assert!(cache.is_empty());
    assert!(cache.snapshot().is_empty());
}

#[test]
fn add_then_read_returns_record() {
    let cache = ActionCache::new();
    cache.add(action("e1", 5.0));

    let found = cache.read("e1").unwrap();
    assert_eq!(found, action("e1", 5.0));
}

#[test]
fn read_missing_is_not_found() {
    let cache = ActionCache::new();
    assert_eq!(cache.read("nope"), Err(CacheError::NotFound("nope".into())));
}

#[test]
fn not_found_message_names_event() {
    let err = CacheError::NotFound("e42".into());
    assert_eq!(err.to_string(), "action not in cache: e42");
}

#[test]
fn remove_then_read_is_not_found() {
    let cache = ActionCache::new();
    cache.add(action("e1", 1.0));
    cache.remove("e1");

    assert!(matches!(cache.read("e1"), Err(CacheError::NotFound(_))));
    assert!(cache.is_empty());
}

#[test]
fn remove_missing_is_noop() {
    let cache = ActionCache::new();
    cache.add(action("keep", 1.0));
    cache.remove("absent");
    assert_eq!(cache.len(), 1);
}

#[test]
fn add_with_reused_event_id_overwrites() {
    let cache = ActionCache::new();
    cache.add(action("e1", 1.0));
    cache.add(action("e1", 2.0));

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.read("e1").unwrap().coords[0], Position::new(2.0, 2.0));
}

#[test]
fn snapshot_is_detached_copy() {
    let cache = ActionCache::new();
    cache.add(action("a", 1.0));
    let snap = cache.snapshot();
    cache.add(action("b", 2.0));

    assert_eq!(snap.len(), 1);
    assert!(snap.contains_key("a"));
    assert_eq!(cache.len(), 2);
}

#[test]
fn clones_share_storage() {
    let cache = ActionCache::new();
    let other = cache.clone();
    other.add(action("shared", 3.0));
    assert!(cache.read("shared").is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_access_on_one_key_is_last_write_wins() {
    let cache = ActionCache::new();
    let mut handles = Vec::new();

    for task in 0..16u32 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..200u32 {
                let x = f64::from(task * 1000 + i);
                cache.add(action("hot", x));
                if let Ok(seen) = cache.read("hot") {
                    // A reader never observes a torn record.
                    assert_eq!(seen.event_id, "hot");
                    assert!((seen.coords[1].x - seen.coords[0].x - 1.0).abs() < f64::EPSILON);
                }
                if i % 50 == 0 {
                    cache.remove("hot");
                }
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    assert!(cache.len() <= 1);
    if let Ok(last) = cache.read("hot") {
        assert!((last.coords[1].y - last.coords[0].y - 1.0).abs() < f64::EPSILON);
    }
}
