//! End-to-end row scenarios through the public controller API.
//!
//! Each test builds a row over a 300-wide content with an 80-wide trailing
//! panel and no leading panel, then drives drags, ticks and layout reports
//! the way a host collection would.

use std::cell::Cell;
use std::rc::Rc;

use swipe_actions::{
    AnimationKind, DragInput, Edge, FullSwipeRole, GesturePhase, LayoutDirection, MenuStyle,
    PanelSpec, RowConfig, RowController, Size, SwipeConfig, SwipeCoordinator, SwipeEnvironment,
    SwipeState, VisibleButton,
};

const CONTENT: Size = Size::new(300.0, 44.0);
const TRAILING: Size = Size::new(80.0, 44.0);

fn row(config: RowConfig, coordinator: &SwipeCoordinator) -> RowController {
    let row = RowController::attach(config.trailing(PanelSpec::new("delete")), coordinator);
    row.appear();
    row.report_content_layout(CONTENT);
    row.report_panel_layout(Edge::Trailing, TRAILING);
    row
}

fn counting_action(row: RowController) -> (RowController, Rc<Cell<u32>>) {
    let fired = Rc::new(Cell::new(0));
    let counter = Rc::clone(&fired);
    (row.with_action(move || counter.set(counter.get() + 1)), fired)
}

fn swipe(row: &RowController, samples: &[f64]) {
    for &t in samples {
        row.drag(DragInput::moved(t));
        row.tick();
    }
    if let Some(&last) = samples.last() {
        row.drag(DragInput::ended(last));
        row.tick();
    }
}

#[test]
fn release_at_minus_220_deletes_row() {
    let coordinator = SwipeCoordinator::new();
    let (row, fired) = counting_action(row(
        RowConfig::full_swipe(MenuStyle::Slided, FullSwipeRole::Destructive),
        &coordinator,
    ));

    swipe(&row, &[-50.0, -150.0, -220.0]);

    assert_eq!(fired.get(), 1);
    assert!(row.is_deleted());
    let layout = row.layout();
    assert_eq!(layout.content_offset, -300.0);
    assert!(layout.collapsed);
    assert_eq!(layout.content_height, 0.0);
    assert_eq!(layout.panel_height, 0.0);
    assert_eq!(layout.opacity, 0.0);

    let commit = row.last_commit().expect("commit recorded");
    assert!(commit.became_deleted);
    assert!(commit.fired_action);
}

#[test]
fn release_at_minus_40_opens_trailing_panel() {
    let coordinator = SwipeCoordinator::new();
    let (row, fired) = counting_action(row(
        RowConfig::full_swipe(MenuStyle::Slided, FullSwipeRole::Destructive),
        &coordinator,
    ));

    swipe(&row, &[-20.0, -40.0]);

    assert_eq!(fired.get(), 0);
    let state = row.render_state();
    assert_eq!(state.offset, -80.0);
    assert_eq!(state.visible, VisibleButton::Right(row.identity()));
    assert_eq!(state.phase, GesturePhase::Idle);
    assert_eq!(coordinator.get(), SwipeState::Opened(row.identity()));
    assert_eq!(row.layout().trailing_offset, 0.0);
}

#[test]
fn below_minimum_distance_never_starts() {
    let coordinator = SwipeCoordinator::new();
    let row = row(RowConfig::reveal(MenuStyle::Slided), &coordinator);
    row.drag(DragInput::moved(-10.0));
    assert_eq!(row.render_state().phase, GesturePhase::Idle);
    assert_eq!(row.render_state().offset, 0.0);
    row.drag(DragInput::ended(-10.0));
    assert_eq!(row.last_commit(), None);
}

#[test]
fn leading_drag_without_leading_panel_stays_closed() {
    let coordinator = SwipeCoordinator::new();
    let row = row(RowConfig::reveal(MenuStyle::Slided), &coordinator);
    swipe(&row, &[40.0, 120.0]);
    assert_eq!(row.render_state().offset, 0.0);
    assert!(!row.is_open());
    assert_eq!(coordinator.get(), SwipeState::Untouched);
}

#[test]
fn without_full_swipe_offset_stops_at_panel() {
    let coordinator = SwipeCoordinator::new();
    let (row, fired) = counting_action(row(RowConfig::reveal(MenuStyle::Slided), &coordinator));
    row.drag(DragInput::moved(-250.0));
    assert_eq!(row.render_state().offset, -80.0);
    row.drag(DragInput::ended(-250.0));
    assert_eq!(fired.get(), 0);
    assert_eq!(row.render_state().offset, -80.0);
}

#[test]
fn deleted_row_cannot_reopen() {
    let coordinator = SwipeCoordinator::new();
    let row = row(
        RowConfig::full_swipe(MenuStyle::Swiped, FullSwipeRole::Destructive),
        &coordinator,
    );
    swipe(&row, &[-250.0]);
    assert!(row.is_deleted());

    swipe(&row, &[-40.0]);
    row.reset();
    row.appear();
    assert!(row.is_deleted());
    assert_eq!(row.layout().opacity, 0.0);
    assert_eq!(row.render_state().phase, GesturePhase::Idle);
}

#[test]
fn cancel_role_snaps_closed_and_fires() {
    let coordinator = SwipeCoordinator::new();
    let (row, fired) = counting_action(row(
        RowConfig::full_swipe(MenuStyle::Slided, FullSwipeRole::Cancel),
        &coordinator,
    ));
    swipe(&row, &[-240.0]);
    assert_eq!(fired.get(), 1);
    assert!(!row.is_deleted());
    assert_eq!(row.render_state().offset, 0.0);
    assert!(!row.is_open());
    // The claim was broadcast, but the edge is gone: no restore on remount.
    assert_eq!(coordinator.open_row(), None);
}

#[test]
fn default_role_stays_slid_out() {
    let coordinator = SwipeCoordinator::new();
    let (row, fired) = counting_action(row(
        RowConfig::full_swipe(MenuStyle::Swiped, FullSwipeRole::Default),
        &coordinator,
    ));
    swipe(&row, &[-240.0]);
    assert_eq!(fired.get(), 1);
    assert!(!row.is_deleted());
    assert_eq!(row.render_state().offset, -300.0);
    assert_eq!(row.layout().trailing_offset, -220.0);
}

#[test]
fn reset_twice_equals_reset_once() {
    let coordinator = SwipeCoordinator::new();
    let row = row(RowConfig::reveal(MenuStyle::Slided), &coordinator);
    swipe(&row, &[-60.0]);
    assert!(row.is_open());

    row.reset();
    let once = row.render_state();
    let _ = row.take_animation();
    row.reset();
    assert_eq!(row.render_state(), once);
    assert_eq!(row.take_animation(), None);
    assert_eq!(once.offset, 0.0);
    assert_eq!(once.visible, VisibleButton::None);
}

#[test]
fn right_to_left_mirrors_drag() {
    let coordinator = SwipeCoordinator::new();
    let row = row(RowConfig::reveal(MenuStyle::Slided), &coordinator).with_environment(
        SwipeEnvironment::default().with_layout_direction(LayoutDirection::RightToLeft),
    );
    swipe(&row, &[20.0, 50.0]);
    assert_eq!(row.render_state().offset, -80.0);
    assert!(row.is_open());
}

#[test]
fn custom_thresholds_apply() {
    let coordinator = SwipeCoordinator::new();
    let config = RowConfig::full_swipe(MenuStyle::Slided, FullSwipeRole::Destructive)
        .with_swipe_config(
            SwipeConfig::default()
                .with_reveal_threshold(50.0)
                .with_full_swipe_ratio(0.5),
        );
    let (row, fired) = counting_action(row(config, &coordinator));

    swipe(&row, &[-40.0]);
    assert!(!row.is_open(), "40 is under the raised reveal threshold");

    swipe(&row, &[-160.0]);
    assert_eq!(fired.get(), 1);
    assert!(row.is_deleted());
}

#[test]
fn panel_resize_moves_open_row() {
    let coordinator = SwipeCoordinator::new();
    let row = row(RowConfig::reveal(MenuStyle::Slided), &coordinator);
    swipe(&row, &[-60.0]);
    assert_eq!(row.render_state().offset, -80.0);

    row.report_panel_layout(Edge::Trailing, Size::new(120.0, 44.0));
    assert_eq!(row.render_state().offset, -120.0);
    assert_eq!(row.take_animation(), Some(AnimationKind::Settle));
}

#[test]
fn replacing_panel_content_closes_row() {
    let coordinator = SwipeCoordinator::new();
    let row = row(RowConfig::reveal(MenuStyle::Slided), &coordinator);
    swipe(&row, &[-60.0]);

    row.set_panel_content(Edge::Trailing, Some(PanelSpec::new("archive")));
    assert_eq!(row.render_state().offset, 0.0);
    assert_eq!(row.render_state().min_trailing_offset, 0.0);

    row.report_panel_layout(Edge::Trailing, Size::new(90.0, 44.0));
    swipe(&row, &[-60.0]);
    assert_eq!(row.render_state().offset, -90.0);
}
