//! Property-based invariants for offset resolution and commit.
//!
//! 1. **Bounds** - every drag sample leaves the offset inside the bounds of
//!    the current measurements.
//! 2. **Full swipe** - the action fires iff full swipe is allowed and the
//!    release translation is past `-content_width * ratio`.
//! 3. **Resting** - after a release that does not full-swipe, the row rests
//!    at 0 or exactly at a panel width.
//! 4. **Exclusivity** - across any sequence of opens, at most one row is
//!    open.

use proptest::prelude::*;

use swipe_actions::{
    CommitPolicy, DragInput, Edge, FullSwipeRole, LayoutDirection, MenuStyle, OffsetInput,
    PanelSpec, RowConfig, RowController, RowEvent, RowIdentity, RowMachine, Size, SwipeConfig,
    SwipeCoordinator, SwipeEnvironment, resolve_offset,
};

fn measured_machine(
    content: f64,
    leading: f64,
    trailing: f64,
    allows_full_swipe: bool,
    role: FullSwipeRole,
) -> RowMachine {
    let mut machine = RowMachine::new(
        RowIdentity::fresh(),
        SwipeConfig::default(),
        allows_full_swipe,
        role,
        Some(1),
        Some(2),
    );
    machine.handle(RowEvent::ContentLayout(Size::new(content, 44.0)));
    machine.handle(RowEvent::PanelLayout {
        edge: Edge::Leading,
        width: leading,
    });
    machine.handle(RowEvent::PanelLayout {
        edge: Edge::Trailing,
        width: trailing,
    });
    machine
}

fn role_strategy() -> impl Strategy<Value = FullSwipeRole> {
    prop_oneof![
        Just(FullSwipeRole::Destructive),
        Just(FullSwipeRole::Cancel),
        Just(FullSwipeRole::Default),
    ]
}

proptest! {
    #[test]
    fn resolved_offset_within_bounds(
        raw in -1_000.0f64..1_000.0,
        old in -400.0f64..400.0,
        leading in 0.0f64..200.0,
        trailing in 0.0f64..200.0,
        content in 0.0f64..600.0,
        rtl in any::<bool>(),
        allows in any::<bool>(),
    ) {
        let input = OffsetInput {
            raw_translation: raw,
            old_offset: old,
            layout_direction: if rtl { LayoutDirection::RightToLeft } else { LayoutDirection::LeftToRight },
            max_leading_offset: leading,
            min_trailing_offset: -trailing,
            content_width: content,
            allows_full_swipe: allows,
        };
        let offset = resolve_offset(&input);
        prop_assert!(input.bounds().contains(offset), "{offset} outside {:?}", input.bounds());
    }

    #[test]
    fn drag_stream_respects_bounds(
        samples in prop::collection::vec(-800.0f64..800.0, 1..40),
        leading in 0.0f64..150.0,
        trailing in 0.0f64..150.0,
        content in 100.0f64..500.0,
        allows in any::<bool>(),
    ) {
        let mut machine = measured_machine(content, leading, trailing, allows, FullSwipeRole::Default);
        for t in samples {
            machine.handle(RowEvent::Drag(DragInput::moved(t)));
            let bounds = machine.bounds();
            prop_assert!(bounds.contains(machine.offset()));
            prop_assert!(machine.offset() <= leading);
            if !allows {
                prop_assert!(machine.offset() >= -trailing);
            }
        }
    }

    #[test]
    fn full_swipe_fires_iff_past_threshold(
        release in -600.0f64..100.0,
        content in 50.0f64..500.0,
        allows in any::<bool>(),
        role in role_strategy(),
    ) {
        let mut machine = measured_machine(content, 0.0, 80.0, allows, role);
        machine.handle(RowEvent::Drag(DragInput::moved(release)));
        machine.handle(RowEvent::Drag(DragInput::ended(release)));

        let started = release.abs() >= SwipeConfig::default().minimum_drag_distance;
        let expected = started && allows && release < -(content * 0.7);
        let fired = machine.last_commit().is_some_and(|c| c.fired_action);
        prop_assert_eq!(fired, expected);
        prop_assert_eq!(
            CommitPolicy::default().is_full_swipe(allows, release, content),
            allows && release < -(content * 0.7)
        );
        prop_assert_eq!(machine.is_deleted(), fired && role == FullSwipeRole::Destructive);
    }

    #[test]
    fn non_full_release_rests_at_panel_or_zero(
        samples in prop::collection::vec(-200.0f64..200.0, 1..20),
        leading in 0.0f64..120.0,
        trailing in 0.0f64..120.0,
    ) {
        let mut machine = measured_machine(400.0, leading, trailing, false, FullSwipeRole::Default);
        let last = *samples.last().unwrap_or(&0.0);
        for t in samples {
            machine.handle(RowEvent::Drag(DragInput::moved(t)));
        }
        machine.handle(RowEvent::Drag(DragInput::ended(last)));
        let offset = machine.offset();
        prop_assert!(offset == 0.0 || offset == leading || offset == -trailing, "rested at {offset}");
        prop_assert_eq!(machine.visible().is_none(), offset == 0.0);
    }

    #[test]
    fn at_most_one_row_open(
        opens in prop::collection::vec((0usize..4, any::<bool>()), 1..20),
    ) {
        let coordinator = SwipeCoordinator::new();
        let rows: Vec<RowController> = (0..4)
            .map(|_| {
                let row = RowController::attach(
                    RowConfig::reveal(MenuStyle::Slided).trailing(PanelSpec::new("delete")),
                    &coordinator,
                )
                .with_environment(SwipeEnvironment::default());
                row.appear();
                row.report_content_layout(Size::new(300.0, 44.0));
                row.report_panel_layout(Edge::Trailing, Size::new(80.0, 44.0));
                row
            })
            .collect();

        for (index, commit) in opens {
            let row = &rows[index];
            row.drag(DragInput::moved(-60.0));
            if commit {
                row.drag(DragInput::ended(-60.0));
            } else {
                row.drag(DragInput::Cancelled);
            }
            row.tick();
            let open = rows.iter().filter(|r| r.is_open()).count();
            prop_assert!(open <= 1, "{open} rows open");
        }
    }
}
