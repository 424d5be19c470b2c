#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use swipe_actions::{
    DragInput, DragSample, Edge, FullSwipeRole, LayoutDirection, MenuStyle, PanelSpec, RowConfig,
    RowController, Size, SwipeCoordinator, SwipeEnvironment,
};

#[derive(Debug, Arbitrary)]
enum Op {
    Move { row: u8, translation: i16 },
    End { row: u8, translation: i16 },
    Interrupt { row: u8 },
    Cancel { row: u8 },
    Tick,
    Appear { row: u8 },
    PanelWidth { row: u8, leading: bool, width: u16 },
    ContentWidth { row: u8, width: u16 },
    SwapPanel { row: u8, content: u8 },
    Rtl { row: u8, rtl: bool },
    Reset { row: u8 },
    CloseAll,
}

#[derive(Debug, Arbitrary)]
struct Input {
    roles: [u8; 3],
    ops: Vec<Op>,
}

fn role(byte: u8) -> Option<FullSwipeRole> {
    match byte % 4 {
        0 => None,
        1 => Some(FullSwipeRole::Destructive),
        2 => Some(FullSwipeRole::Cancel),
        _ => Some(FullSwipeRole::Default),
    }
}

fuzz_target!(|input: Input| {
    let coordinator = SwipeCoordinator::new();
    let rows: Vec<RowController> = input
        .roles
        .iter()
        .map(|&byte| {
            let config = match role(byte) {
                Some(role) => RowConfig::full_swipe(MenuStyle::Swiped, role),
                None => RowConfig::reveal(MenuStyle::Slided),
            };
            RowController::attach(
                config
                    .leading(PanelSpec::new("pin"))
                    .trailing(PanelSpec::new("delete")),
                &coordinator,
            )
        })
        .collect();
    let pick = |row: u8| &rows[row as usize % rows.len()];

    for op in input.ops.into_iter().take(512) {
        match op {
            Op::Move { row, translation } => pick(row).drag(DragInput::moved(translation.into())),
            Op::End { row, translation } => pick(row).drag(DragInput::ended(translation.into())),
            Op::Interrupt { row } => pick(row).drag(DragInput::Sample(DragSample::inactive())),
            Op::Cancel { row } => pick(row).drag(DragInput::Cancelled),
            Op::Tick => rows.iter().for_each(RowController::tick),
            Op::Appear { row } => pick(row).appear(),
            Op::PanelWidth { row, leading, width } => {
                let edge = if leading { Edge::Leading } else { Edge::Trailing };
                pick(row).report_panel_layout(edge, Size::new(width.into(), 44.0));
            }
            Op::ContentWidth { row, width } => {
                pick(row).report_content_layout(Size::new(width.into(), 44.0));
            }
            Op::SwapPanel { row, content } => {
                pick(row).set_panel_content(Edge::Trailing, Some(PanelSpec::new(&content)));
            }
            Op::Rtl { row, rtl } => {
                let direction = if rtl {
                    LayoutDirection::RightToLeft
                } else {
                    LayoutDirection::LeftToRight
                };
                pick(row).set_environment(
                    SwipeEnvironment::default().with_layout_direction(direction),
                );
            }
            Op::Reset { row } => pick(row).reset(),
            Op::CloseAll => coordinator.close_all(),
        }

        // Post-conditions that must always hold:
        let mut open = 0;
        for row in &rows {
            let state = row.render_state();
            assert!(state.offset.is_finite(), "offset not finite");
            assert!(state.offset <= state.max_leading_offset, "offset past leading panel");
            if !state.deleted {
                let floor = state.content_width.max(-state.min_trailing_offset);
                assert!(state.offset >= -floor, "offset past full swipe");
                if !state.visible.is_none() && !state.phase.is_tracking() {
                    open += 1;
                }
            }
            let layout = row.layout();
            assert!(layout.opacity == 0.0 || layout.opacity == 1.0);
        }
        assert!(open <= 1, "{open} rows resting open");
    }
});
