//! Integration tests: a `ControlSurface` loaded from layout JSON, fed a
//! multi-touch stream.

use pretty_assertions::assert_eq;
use std::rc::Rc;
use vc_controls::*;
use vc_core::*;
use vc_render::DisplayList;

const LAYOUT: &str = r#"[
  { "type": "dpad", "id": "pad", "x": 0.05, "y": 0.5, "width": 0.3, "height": 0.3 },
  { "type": "button", "id": "fire", "x": 0.8, "y": 0.6, "width": 0.2, "height": 0.2,
    "keycode": "KEYBOARD_SPACE", "shape": "CIRCLE" },
  { "type": "button", "id": "look", "x": 0.8, "y": 0.6, "width": 0.1, "height": 0.1,
    "keycode": "MOUSE_RIGHT", "isPassThrough": true },
  { "type": "text", "id": "label", "x": 0.4, "y": 0.0, "width": 0.2, "height": 0.1,
    "displayText": "HP" },
  { "type": "radialmenu", "id": "wheel", "x": 0.45, "y": 0.4, "width": 0.1, "height": 0.1 },
  { "type": "joystick", "id": "stick", "x": 0.0, "y": 0.0, "width": 0.3, "height": 0.3 }
]"#;

struct Rig {
    surface: ControlSurface,
    bridge: Rc<RecordingBridge>,
    clock: Rc<ManualScheduler>,
}

/// 1000×1000 screen, density 1: fractions map to pixels ×1000.
fn rig() -> Rig {
    let _ = env_logger::builder().is_test(true).try_init();
    let bridge = Rc::new(RecordingBridge::new());
    let clock = Rc::new(ManualScheduler::new());
    let ctx = ControlContext::new(bridge.clone(), clock.clone());
    let mut surface = ControlSurface::new(ctx, Viewport::new(1000.0, 1000.0, 1.0));
    let controls: Vec<ControlData> = serde_json::from_str(LAYOUT).unwrap();
    for c in controls {
        surface.add_control(c);
    }
    Rig {
        surface,
        bridge,
        clock,
    }
}

fn id(s: &str) -> ControlId {
    ControlId::intern(s)
}

#[test]
fn layout_loads_supported_kinds() {
    let r = rig();
    let ids: Vec<String> = r
        .surface
        .controls()
        .map(|c| c.common().id.to_string())
        .collect();
    assert_eq!(ids, vec!["pad", "fire", "look", "label", "wheel"]);
}

#[test]
fn topmost_control_wins_and_pass_through_is_reported() {
    let mut r = rig();
    // "look" sits on top of "fire" in the same corner.
    let outcome = r.surface.handle_touch(TouchEvent::down(1, 850.0, 650.0));
    assert_eq!(outcome, TouchOutcome::PassThrough);
    assert!(r.surface.consumed_pointers().is_empty());

    // Outside "look" but inside the "fire" circle.
    let outcome = r.surface.handle_touch(TouchEvent::down(2, 900.0, 750.0));
    assert_eq!(outcome, TouchOutcome::Consumed);
    assert_eq!(r.surface.consumed_pointers().into_vec(), vec![2]);

    r.surface.handle_touch(TouchEvent::up(1));
    r.surface.handle_touch(TouchEvent::up(2));
    assert_eq!(
        r.bridge.take(),
        vec![
            InputRecord::MouseButton {
                keycode: KeyCode::MOUSE_RIGHT,
                down: true,
                x: 850.0,
                y: 650.0
            },
            InputRecord::Key {
                keycode: KeyCode::KEYBOARD_SPACE,
                down: true
            },
            InputRecord::MouseButton {
                keycode: KeyCode::MOUSE_RIGHT,
                down: false,
                x: 850.0,
                y: 650.0
            },
            InputRecord::Key {
                keycode: KeyCode::KEYBOARD_SPACE,
                down: false
            },
        ]
    );
    assert!(!r.surface.is_in_use());
}

#[test]
fn text_and_empty_space_are_unhandled() {
    let mut r = rig();
    assert_eq!(
        r.surface.handle_touch(TouchEvent::down(1, 500.0, 50.0)),
        TouchOutcome::Unhandled
    );
    assert_eq!(
        r.surface.handle_touch(TouchEvent::down(2, 10.0, 10.0)),
        TouchOutcome::Unhandled
    );
    assert_eq!(r.surface.handle_touch(TouchEvent::up(1)), TouchOutcome::Unhandled);
    assert!(r.bridge.is_empty());
}

#[test]
fn moves_route_to_owners_in_local_space() {
    let mut r = rig();
    // D-pad frame: (50, 500) 300×300, cells of 100.
    r.surface.handle_touch(TouchEvent::down(1, 200.0, 520.0));
    r.surface.handle_touch(TouchEvent::down(2, 900.0, 750.0));
    r.bridge.take();

    let mut pointers = smallvec::SmallVec::new();
    pointers.push(PointerPos { id: 1, x: 320.0, y: 520.0 });
    pointers.push(PointerPos { id: 2, x: 910.0, y: 760.0 });
    pointers.push(PointerPos { id: 9, x: 0.0, y: 0.0 });
    let outcome = r.surface.handle_touch(TouchEvent::Move { pointers });
    assert_eq!(outcome, TouchOutcome::Consumed);
    let edges: Vec<_> = r
        .bridge
        .take()
        .iter()
        .filter_map(InputRecord::key_edge)
        .collect();
    assert_eq!(edges, vec![(KeyCode::KEYBOARD_D, true)]);
}

#[test]
fn cancel_releases_every_owner() {
    let mut r = rig();
    r.surface.handle_touch(TouchEvent::down(1, 60.0, 510.0));
    r.surface.handle_touch(TouchEvent::down(2, 900.0, 750.0));
    assert!(r.surface.is_in_use());
    assert_eq!(r.surface.handle_touch(TouchEvent::Cancel), TouchOutcome::Consumed);
    assert!(!r.surface.is_in_use());

    let records = r.bridge.take();
    let downs = records.iter().filter_map(InputRecord::key_edge).filter(|e| e.1).count();
    let ups = records.iter().filter_map(InputRecord::key_edge).filter(|e| !e.1).count();
    assert_eq!((downs, ups), (3, 3));
    // Late ups for cancelled pointers go nowhere.
    assert_eq!(r.surface.handle_touch(TouchEvent::up(1)), TouchOutcome::Unhandled);
}

#[test]
fn hidden_surface_ignores_touches() {
    let mut r = rig();
    r.surface.handle_touch(TouchEvent::down(1, 900.0, 750.0));
    r.surface.set_visible(false);
    assert!(!r.surface.is_in_use());
    assert_eq!(
        r.surface.handle_touch(TouchEvent::down(2, 900.0, 750.0)),
        TouchOutcome::Unhandled
    );
    let mut list = DisplayList::new();
    r.surface.render(&mut list);
    assert!(list.ops.is_empty());

    r.surface.set_visible(true);
    assert_eq!(
        r.surface.handle_touch(TouchEvent::down(2, 900.0, 750.0)),
        TouchOutcome::Consumed
    );
}

#[test]
fn radial_tap_through_the_surface() {
    let mut r = rig();
    // Menu frame: (450, 400) 100×100; expanded radius 125.
    r.surface.handle_touch(TouchEvent::down(5, 500.0, 450.0));
    r.clock.advance(150);
    r.surface.handle_touch(TouchEvent::move_to(5, 600.0, 450.0));
    r.surface.handle_touch(TouchEvent::up(5));
    r.clock.advance(60);
    assert_eq!(
        r.bridge.take(),
        vec![
            InputRecord::Key {
                keycode: KeyCode::KEYBOARD_3,
                down: true
            },
            InputRecord::Key {
                keycode: KeyCode::KEYBOARD_3,
                down: false
            },
        ]
    );
}

#[test]
fn reset_toggles_and_rebinding() {
    let mut r = rig();
    let mut fire = r.surface.control(id("fire")).map(|c| c.control_data()).unwrap();
    if let ControlKind::Button(b) = &mut fire.kind {
        b.is_toggle = true;
    }
    assert!(r.surface.bind_control(fire));

    r.surface.handle_touch(TouchEvent::down(1, 900.0, 750.0));
    r.surface.handle_touch(TouchEvent::up(1));
    assert_eq!(r.bridge.len(), 1);
    r.surface.reset_all_toggles();
    r.surface.reset_all_toggles();
    assert_eq!(
        r.bridge.take().last(),
        Some(&InputRecord::Key {
            keycode: KeyCode::KEYBOARD_SPACE,
            down: false
        })
    );
}

#[test]
fn render_translates_each_control() {
    let r = rig();
    let mut list = DisplayList::new();
    r.surface.render(&mut list);
    assert!(list.is_balanced());
    let translations = list
        .ops
        .iter()
        .filter(|op| matches!(op, vc_render::DrawOp::Translate { .. }))
        .count();
    assert_eq!(translations, 5);
    assert!(list.texts().any(|t| t == "HP"));
}

#[test]
fn clear_drops_everything() {
    let mut r = rig();
    r.surface.handle_touch(TouchEvent::down(1, 900.0, 750.0));
    r.surface.clear_controls();
    assert!(r.surface.is_empty());
    assert!(!r.surface.is_in_use());
    assert_eq!(r.bridge.len(), 2);
}
