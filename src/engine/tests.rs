use web_time::Duration;

use super::*;
use crate::animation::SchedulerEvent;
use crate::drag::DragOutcome;
use crate::options::AnimationOptions;
use crate::registry::{MemoryRegistry, RegistryEvent, TrackInfo};
use crate::scene::Shape;

const SEQ: &str = "ACDEFGHIKLMNPQRSTVWYACDEFGHIKLMNPQRSTVWYACDEFGHIKL";

fn ids(names: &[&str]) -> Vec<TrackId> {
    names.iter().map(|n| TrackId::from(*n)).collect()
}

fn registry(tracks: &[&str]) -> MemoryRegistry {
    let mut registry = MemoryRegistry::new();
    for id in tracks {
        registry.register_simple(id, "#369");
    }
    registry
}

/// Viewport of 300px so a 50-residue sequence allows zoom 1.
fn renderer_with(registry: MemoryRegistry) -> SequenceRenderer {
    let mut options = Options::default();
    options.zoom.viewport_width = 300.0;
    SequenceRenderer::new(options, Box::new(registry))
}

fn ready(tracks: &[&str], t0: Instant) -> SequenceRenderer {
    let mut r = renderer_with(registry(tracks));
    for id in tracks {
        assert!(r.add_track(&(*id).into()));
    }
    r.set_sequence(SEQ, t0).unwrap();
    r
}

fn settle_animations(r: &mut SequenceRenderer, mut now: Instant) -> Instant {
    for _ in 0..100 {
        now += Duration::from_millis(20);
        let _ = r.tick(now).unwrap();
        if !r.is_animating() {
            break;
        }
    }
    now
}

#[test]
fn test_requests_before_sequence_are_replayed() {
    let t0 = Instant::now();
    let mut r = renderer_with(registry(&["a", "b"]));
    assert!(!r.is_ready());
    assert!(r.add_track(&"a".into()));
    r.select(3, 7).unwrap();
    assert_eq!(r.set_zoom(2.0, t0).unwrap(), 1.0);
    assert!(!r.has_track(&"a".into()));
    assert_eq!(r.selection(), None);

    r.set_sequence(SEQ, t0).unwrap();
    assert!(r.is_ready());
    assert!(r.has_track(&"a".into()));
    assert!(!r.has_track(&"b".into()));
    assert_eq!(r.selection(), Some((3, 7)));
    assert_eq!(r.target_zoom(), 2.0);
    let events = r.drain_events();
    assert!(events.contains(&RendererEvent::SequenceReady { length: 50 }));
}

#[test]
fn test_left_visible_residue_starts_at_zero() {
    let r = ready(&[], Instant::now());
    assert_eq!(r.zoom(), 1.0);
    assert_eq!(r.translation(), 0.0);
    assert_eq!(r.left_visible_residue(), 0);
    assert_eq!(r.right_visible_residue(), 49);
}

#[test]
fn test_removed_track_is_skipped_by_refresh() {
    let t0 = Instant::now();
    let mut r = ready(&["a", "b"], t0);
    let before = r.refresh(false, t0).unwrap().unwrap();
    assert_eq!(before.total_height, 8.0);

    assert!(r.remove_track(&"b".into()));
    let after = r.refresh(false, t0).unwrap().unwrap();
    assert!(after.placement(&"b".into()).is_none());
    assert_eq!(before.total_height - after.total_height, 4.0);
    assert_eq!(r.track_order(), ids(&["a", "b"]).as_slice());
    assert!(r
        .drain_events()
        .contains(&RendererEvent::TrackRemoved("b".into())));
}

#[test]
fn test_refresh_is_idempotent() {
    let t0 = Instant::now();
    let mut r = ready(&["a", "b", "c"], t0);
    let first = r.refresh(false, t0).unwrap();
    let second = r.refresh(false, t0).unwrap();
    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn test_zoom_settles_around_focal_residue() {
    let t0 = Instant::now();
    let mut r = ready(&["a"], t0);
    let res = r.surface().resolution();
    let before = r.zoom_controller().view(res).residue_screen_x(10.0);

    assert_eq!(r.set_zoom_at(2.0, Some(10.0), t0).unwrap(), 2.0);
    let scene = r.groups.scene;
    let Some(Shape::Group { transform, .. }) = r.surface().get(scene).map(|p| &p.shape) else {
        panic!("scene group missing");
    };
    assert_ne!(*transform, DAffine2::IDENTITY);
    assert_eq!(r.zoom(), 1.0);

    let _ = r.tick(t0 + Duration::from_millis(100)).unwrap();
    assert_eq!(r.zoom(), 2.0);
    let after = r.zoom_controller().view(res).residue_screen_x(10.0);
    assert!((before - after).abs() < 1.0);
    assert_eq!(r.surface().offset().x, r.translation());

    let events = r.drain_events();
    assert!(events.contains(&RendererEvent::ZoomTransitionBegan { focal_residue: 10.0 }));
    assert!(events.contains(&RendererEvent::ZoomChanged { zoom: 2.0 }));
}

#[test]
fn test_zoom_is_clamped() {
    let t0 = Instant::now();
    let mut r = ready(&[], t0);
    assert_eq!(r.set_zoom(100.0, t0).unwrap(), 10.0);
    let min = r.zoom_controller().min_zoom();
    assert!((min - 0.9).abs() < 1e-9);
    assert_eq!(r.set_zoom(0.01, t0).unwrap(), min);
}

#[test]
fn test_drag_over_group_member_is_rejected() {
    let t0 = Instant::now();
    let mut reg = registry(&["x", "g"]);
    reg.register_group("g");
    reg.register_track(
        "g1",
        TrackInfo {
            group: Some("g".into()),
            ..TrackInfo::default()
        },
    );
    let mut r = renderer_with(reg);
    r.set_sequence(SEQ, t0).unwrap();
    let _ = r.set_track_order(&ids(&["x", "g"]), t0).unwrap();
    let t1 = settle_animations(&mut r, t0);
    assert_eq!(r.track_order(), ids(&["x", "g", "g1"]).as_slice());

    // Rows: x at 20..24, g at 24..28, g1 at 28..32.
    assert!(r.begin_drag(&"x".into(), DVec2::new(50.0, 22.0)).unwrap());
    r.drag_to(DVec2::new(50.0, 30.0), t1).unwrap();
    assert!(r.drag().session().unwrap().hover().is_none());
    assert_eq!(r.next_deadline(), None);
    assert_eq!(r.end_drag(t1).unwrap(), DragOutcome::Cancelled);
}

#[test]
fn test_committed_drag_reorders_and_reflows() {
    let t0 = Instant::now();
    let mut r = ready(&["a", "b", "c"], t0);
    assert!(r.begin_drag(&"c".into(), DVec2::new(50.0, 30.0)).unwrap());
    assert!(!r.begin_drag(&"a".into(), DVec2::new(50.0, 22.0)).unwrap());
    r.drag_to(DVec2::new(50.0, 21.0), t0).unwrap();
    let _ = r.tick(t0 + Duration::from_millis(300)).unwrap();
    let _ = r.tick(t0 + Duration::from_millis(420)).unwrap();

    let outcome = r.end_drag(t0 + Duration::from_millis(450)).unwrap();
    assert!(matches!(outcome, DragOutcome::Committed { .. }));
    assert_eq!(r.track_order(), ids(&["c", "a", "b"]).as_slice());
    let events = r.drain_events();
    assert!(events.contains(&RendererEvent::TrackOrderChanged(ids(&["c", "a", "b"]))));

    settle_animations(&mut r, t0 + Duration::from_millis(450));
    let snapshot = r.layout().last_snapshot().unwrap();
    assert_eq!(snapshot.placement(&"c".into()).unwrap().y, 20.0);
    assert_eq!(snapshot.placement(&"a".into()).unwrap().y, 24.0);
}

#[test]
fn test_track_order_expands_groups_and_hides_dropped() {
    let t0 = Instant::now();
    let mut reg = registry(&["a", "b", "c"]);
    for id in ["g1", "g2"] {
        reg.register_track(
            id,
            TrackInfo {
                group: Some("g".into()),
                ..TrackInfo::default()
            },
        );
    }
    let mut r = renderer_with(reg);
    for id in ["a", "b", "c"] {
        let _ = r.add_track(&id.into());
    }
    r.set_sequence(SEQ, t0).unwrap();

    let resolved = r
        .set_track_order(&ids(&["b", "g", "zz", "a"]), t0)
        .unwrap();
    assert_eq!(resolved, ids(&["b", "g1", "g2", "a"]));
    assert!(r.has_track(&"g1".into()));
    assert!(!r.is_track_visible(&"c".into()));
    assert!(r.is_track_visible(&"g2".into()));
}

#[test]
fn test_visibility_event_animates_and_notifies() {
    let t0 = Instant::now();
    let mut r = ready(&["a", "b"], t0);
    let _ = r.drain_events();
    r.handle_registry_event(
        RegistryEvent::VisibilityChange {
            track: "a".into(),
            visible: false,
        },
        t0,
    )
    .unwrap();
    assert!(r.is_animating());
    settle_animations(&mut r, t0);

    let events = r.drain_events();
    assert!(events.contains(&RendererEvent::VisibilityChanged {
        track: "a".into(),
        visible: false
    }));
    assert!(events.contains(&RendererEvent::AnimationBegan));
    assert!(events.contains(&RendererEvent::AnimationEnded));
    let b = r.layout().navigation().row(&"b".into()).unwrap();
    assert_eq!(b.y(), 20.0);
    assert!(!r.layout().navigation().row(&"a".into()).unwrap().visible());
}

#[test]
fn test_selection_is_clamped_and_replaced() {
    let t0 = Instant::now();
    let mut r = ready(&[], t0);
    r.select(40, 500).unwrap();
    assert_eq!(r.selection(), Some((40, 50)));
    let count = r.surface().len();
    r.select(5, 3).unwrap();
    assert_eq!(r.selection(), Some((3, 5)));
    assert_eq!(r.surface().len(), count);
    r.clear_selection();
    assert_eq!(r.selection(), None);
    assert_eq!(r.surface().len(), count - 1);
}

#[test]
fn test_new_sequence_rebuilds_tracks() {
    let t0 = Instant::now();
    let mut r = ready(&["a", "b"], t0);
    let _ = r.hide_track(&"b".into());
    let _ = r
        .add_primitive(&"a".into(), Shape::Rect {
            x: 0.0.into(),
            y: 0.0.into(),
            width: 3.0.into(),
            height: 1.0.into(),
        })
        .unwrap();
    r.set_sequence("MKV", t0).unwrap();
    assert_eq!(r.sequence().len(), 3);
    assert!(r.layout().track_set(&"a".into()).unwrap().is_empty());
    assert!(!r.is_track_visible(&"b".into()));
    assert!(r.to_svg().contains("<svg"));
}

#[test]
fn test_scroll_command_zooms_at_cursor() {
    let t0 = Instant::now();
    let mut r = ready(&[], t0);
    r.execute(
        RendererCommand::Zoom {
            delta: 1.0,
            anchor_x: 25.0,
        },
        t0,
    )
    .unwrap();
    assert!((r.target_zoom() - 1.1).abs() < 1e-9);
    let _ = r.tick(t0 + Duration::from_millis(100)).unwrap();
    let res = r.surface().resolution();
    let x = r.zoom_controller().view(res).residue_screen_x(25.0);
    assert!((x - 25.0).abs() < 1e-9);
}

fn shared_renderer(scheduler: &SharedScheduler, t0: Instant) -> SequenceRenderer {
    let mut options = Options::default();
    options.zoom.viewport_width = 300.0;
    let mut r = SequenceRenderer::with_scheduler(
        options,
        Box::new(registry(&["a", "b"])),
        scheduler.clone(),
    );
    for id in ["a", "b"] {
        assert!(r.add_track(&id.into()));
    }
    r.set_sequence(SEQ, t0).unwrap();
    let _ = r
        .add_primitive(&"a".into(), Shape::Rect {
            x: 0.0.into(),
            y: 0.0.into(),
            width: 50.0.into(),
            height: 4.0.into(),
        })
        .unwrap();
    let _ = r.refresh(false, t0).unwrap();
    r
}

fn track_a_y(r: &SequenceRenderer) -> Option<f64> {
    r.layout()
        .track_set(&"a".into())
        .and_then(|set| set.current_y(r.surface()))
}

#[test]
fn test_renderers_sharing_a_scheduler_both_animate() {
    let t0 = Instant::now();
    let shared = AnimationScheduler::new(&AnimationOptions::default()).shared();
    let mut first = shared_renderer(&shared, t0);
    let mut second = shared_renderer(&shared, t0);
    assert_eq!(track_a_y(&first), Some(20.0));

    let _ = first.set_track_order(&ids(&["b", "a"]), t0).unwrap();
    let _ = second.set_track_order(&ids(&["b", "a"]), t0).unwrap();

    let mut now = t0;
    for _ in 0..3 {
        now += Duration::from_millis(20);
        let _ = first.tick(now).unwrap();
        let _ = second.tick(now).unwrap();
    }
    let mid = track_a_y(&first);
    assert!(mid > Some(20.0) && mid < Some(24.0));
    assert_eq!(track_a_y(&second), mid);

    for _ in 0..100 {
        now += Duration::from_millis(20);
        let _ = first.tick(now).unwrap();
        let _ = second.tick(now).unwrap();
        if !first.is_animating() {
            break;
        }
    }
    assert!(!second.is_animating());
    assert_eq!(track_a_y(&first), Some(24.0));
    assert_eq!(track_a_y(&second), Some(24.0));

    // Each renderer reports the burst on its own ticks.
    let _ = first.tick(now).unwrap();
    for r in [&mut first, &mut second] {
        let events = r.drain_events();
        assert!(events.contains(&RendererEvent::AnimationBegan));
        assert!(events.contains(&RendererEvent::AnimationEnded));
    }
}

#[test]
fn test_new_sequence_keeps_other_renderers_animating() {
    let t0 = Instant::now();
    let shared = AnimationScheduler::new(&AnimationOptions::default()).shared();
    let mut first = shared_renderer(&shared, t0);
    let mut second = shared_renderer(&shared, t0);
    let _ = first.set_track_order(&ids(&["b", "a"]), t0).unwrap();
    let _ = second.set_track_order(&ids(&["b", "a"]), t0).unwrap();

    let mut now = t0 + Duration::from_millis(20);
    let _ = first.tick(now).unwrap();
    let _ = second.tick(now).unwrap();
    let _ = shared.borrow_mut().drain_events();

    second.set_sequence(SEQ, now).unwrap();
    assert!(first.is_animating());
    assert!(shared.borrow().task_count() > 0);
    assert!(!shared
        .borrow_mut()
        .drain_events()
        .contains(&SchedulerEvent::Ended));
    assert!(!second
        .drain_events()
        .contains(&RendererEvent::AnimationEnded));

    for _ in 0..100 {
        now += Duration::from_millis(20);
        let _ = first.tick(now).unwrap();
        let _ = second.tick(now).unwrap();
        if !first.is_animating() {
            break;
        }
    }
    assert_eq!(track_a_y(&first), Some(24.0));
    assert_eq!(second.track_order(), ids(&["b", "a"]).as_slice());
    let row = second.layout().navigation().row_transform(&"a".into()).unwrap();
    assert_eq!(row.translation.y, 24.0);
}
