use bevy::prelude::*;
use bits_helpers::input::{PointerPhase, PointerTracker};

use crate::slots::{SlotIndex, SlotLayout};

/// Semantic drag events derived from raw pointer input.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapEvent {
    Selected { index: SlotIndex, position: IVec2 },
    DragInProgress { position: IVec2 },
    Dropped { position: IVec2 },
}

impl SwapEvent {
    pub const fn position(&self) -> IVec2 {
        match *self {
            Self::Selected { position, .. }
            | Self::DragInProgress { position }
            | Self::Dropped { position } => position,
        }
    }
}

/// Most recent [`SwapEvent`], so anything looking at the stream late still
/// sees where it stands.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LatestSwapEvent(Option<SwapEvent>);

impl LatestSwapEvent {
    pub const fn get(&self) -> Option<SwapEvent> {
        self.0
    }

    pub fn set(&mut self, event: SwapEvent) {
        self.0 = Some(event);
    }
}

/// Turns one pointer sample into a drag event.
///
/// A press only starts a drag over a slot; moves and releases are always
/// reported and left for the coordinator to judge.
pub fn track(phase: PointerPhase, position: IVec2, layout: &SlotLayout) -> Option<SwapEvent> {
    match phase {
        PointerPhase::Down => layout
            .slot_at(position)
            .map(|index| SwapEvent::Selected { index, position }),
        PointerPhase::Move => Some(SwapEvent::DragInProgress { position }),
        PointerPhase::Up => Some(SwapEvent::Dropped { position }),
    }
}

/// The pointer a drag follows and its last position while it is down.
#[derive(Resource, Debug, Default)]
pub struct PointerTrail {
    tracker: PointerTracker,
    last: Option<IVec2>,
}

pub fn track_pointer(
    windows: Query<&Window>,
    buttons: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    layout: Res<SlotLayout>,
    mut trail: ResMut<PointerTrail>,
    mut events: EventWriter<SwapEvent>,
    mut latest: ResMut<LatestSwapEvent>,
) {
    let pointers = trail.tracker.update(&buttons, &touch_input, &windows);

    for pointer in pointers {
        // A mouse released outside the window still has to end the drag.
        let Some(position) = pointer
            .position
            .map(|position| position.round().as_ivec2())
            .or(trail.last)
        else {
            continue;
        };

        if pointer.phase == PointerPhase::Move && trail.last == Some(position) {
            continue;
        }
        trail.last = (pointer.phase != PointerPhase::Up).then_some(position);

        if let Some(event) = track(pointer.phase, position, &layout) {
            events.send(event);
            latest.set(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::input::touch::{TouchInput, TouchPhase, touch_screen_input_system};
    use bits_helpers::RibbitMessageHandler;

    use super::*;
    use crate::config::SwapConfig;
    use crate::coordinator::{DragState, SwapOutcome, SwapStats, coordinate_swaps};
    use crate::ribbit::DragToSwap;
    use crate::slots::SlotImages;

    fn layout() -> SlotLayout {
        SlotLayout::from(&SwapConfig::default())
    }

    #[test]
    fn press_inside_a_slot_selects_it() {
        let layout = layout();
        for (index, region) in layout.regions() {
            let position = region.center();
            assert_eq!(
                track(PointerPhase::Down, position, &layout),
                Some(SwapEvent::Selected { index, position }),
                "press on {index}"
            );
        }
    }

    #[test]
    fn press_outside_every_slot_is_ignored() {
        let layout = layout();
        for position in [IVec2::new(5, 5), IVec2::new(180, 165), IVec2::new(350, 300)] {
            assert_eq!(
                track(PointerPhase::Down, position, &layout),
                None,
                "press at {position}"
            );
        }
    }

    #[test]
    fn moves_and_releases_are_always_reported() {
        let layout = layout();
        let outside = IVec2::new(5, 5);
        assert_eq!(
            track(PointerPhase::Move, outside, &layout),
            Some(SwapEvent::DragInProgress { position: outside }),
            "move over nothing"
        );
        assert_eq!(
            track(PointerPhase::Up, outside, &layout),
            Some(SwapEvent::Dropped { position: outside }),
            "release over nothing"
        );
    }

    #[test]
    fn latest_event_replays_the_most_recent_one() {
        let mut latest = LatestSwapEvent::default();
        assert_eq!(latest.get(), None, "nothing yet");

        latest.set(SwapEvent::DragInProgress {
            position: IVec2::new(1, 2),
        });
        latest.set(SwapEvent::Dropped {
            position: IVec2::new(3, 4),
        });
        assert_eq!(
            latest.get().map(|event| event.position()),
            Some(IVec2::new(3, 4)),
            "last write wins"
        );
    }

    fn pointer_app() -> App {
        let mut app = App::new();
        app.init_resource::<ButtonInput<MouseButton>>()
            .init_resource::<Touches>()
            .init_resource::<LatestSwapEvent>()
            .init_resource::<PointerTrail>()
            .insert_resource(layout())
            .add_event::<SwapEvent>()
            .add_systems(Update, track_pointer);
        app.world_mut().spawn(Window::default());
        app
    }

    fn swap_app() -> App {
        let mut app = pointer_app();
        app.insert_resource(SlotImages::from(&SwapConfig::default()))
            .init_resource::<SwapConfig>()
            .init_resource::<DragState>()
            .init_resource::<SwapStats>()
            .add_event::<SwapOutcome>()
            .add_event::<TouchInput>()
            .add_systems(PreUpdate, touch_screen_input_system)
            .add_systems(Update, coordinate_swaps.after(track_pointer));
        app
    }

    fn centre_of(index: usize) -> IVec2 {
        let slot = SlotIndex::new(index).expect("index in range");
        layout().region(slot).center()
    }

    fn touch(app: &mut App, phase: TouchPhase, id: u64, position: IVec2) {
        let mut windows = app.world_mut().query_filtered::<Entity, With<Window>>();
        let window = windows.single(app.world());
        app.world_mut().send_event(TouchInput {
            phase,
            position: position.as_vec2(),
            window,
            force: None,
            id,
        });
    }

    fn outcomes(app: &App) -> Vec<SwapOutcome> {
        app.world()
            .resource::<Events<SwapOutcome>>()
            .iter_current_update_events()
            .copied()
            .collect()
    }

    fn move_cursor(app: &mut App, cursor: Option<Vec2>) {
        let mut windows = app.world_mut().query::<&mut Window>();
        for mut window in windows.iter_mut(app.world_mut()) {
            window.set_cursor_position(cursor);
        }
    }

    fn buttons(app: &mut App) -> Mut<'_, ButtonInput<MouseButton>> {
        app.world_mut().resource_mut::<ButtonInput<MouseButton>>()
    }

    fn latest(app: &App) -> Option<SwapEvent> {
        app.world().resource::<LatestSwapEvent>().get()
    }

    #[test]
    fn mouse_drag_released_outside_the_window_drops_at_the_last_position() {
        let mut app = pointer_app();
        let slot_zero = layout()
            .regions()
            .next()
            .map(|(_, region)| region.center())
            .expect("four slots");

        move_cursor(&mut app, Some(slot_zero.as_vec2()));
        buttons(&mut app).press(MouseButton::Left);
        app.update();
        assert!(
            matches!(latest(&app), Some(SwapEvent::Selected { index, .. }) if index.get() == 0),
            "press selects slot 0: {:?}",
            latest(&app)
        );

        buttons(&mut app).clear();
        move_cursor(&mut app, Some(Vec2::new(100.0, 250.4)));
        app.update();
        assert_eq!(
            latest(&app),
            Some(SwapEvent::DragInProgress {
                position: IVec2::new(100, 250),
            }),
            "move is rounded to whole pixels"
        );

        move_cursor(&mut app, None);
        buttons(&mut app).release(MouseButton::Left);
        app.update();
        assert_eq!(
            latest(&app),
            Some(SwapEvent::Dropped {
                position: IVec2::new(100, 250),
            }),
            "release outside the window reuses the last position"
        );
    }

    #[test]
    fn holding_still_does_not_repeat_moves() {
        let mut app = pointer_app();
        move_cursor(&mut app, Some(Vec2::new(100.0, 100.0)));
        buttons(&mut app).press(MouseButton::Left);
        app.update();
        buttons(&mut app).clear();
        app.update();
        app.update();

        let events = app.world().resource::<Events<SwapEvent>>();
        let moves = events
            .iter_current_update_events()
            .filter(|event| matches!(event, SwapEvent::DragInProgress { .. }))
            .count();
        assert_eq!(moves, 0, "pointer did not move since the press");
    }

    #[test]
    fn click_within_one_frame_leaves_no_drag_behind() {
        let mut app = swap_app();
        let slot_zero = centre_of(0);

        move_cursor(&mut app, Some(slot_zero.as_vec2()));
        {
            let mut buttons = buttons(&mut app);
            buttons.press(MouseButton::Left);
            buttons.release(MouseButton::Left);
        }
        app.update();

        let events = app
            .world()
            .resource::<Events<SwapEvent>>()
            .iter_current_update_events()
            .copied()
            .collect::<Vec<_>>();
        let source = SlotIndex::new(0).expect("index in range");
        assert_eq!(
            events,
            vec![
                SwapEvent::Selected {
                    index: source,
                    position: slot_zero,
                },
                SwapEvent::Dropped {
                    position: slot_zero,
                },
            ],
            "press and release both reach the coordinator"
        );
        assert!(
            !app.world().resource::<DragState>().is_dragging(),
            "drag ended"
        );
        assert_eq!(
            outcomes(&app),
            vec![SwapOutcome::Cancelled { source }],
            "dropped on itself"
        );

        buttons(&mut app).clear();
        move_cursor(&mut app, Some(centre_of(2).as_vec2()));
        app.update();
        assert!(
            !app.world().resource::<DragState>().is_dragging(),
            "moving afterwards drags nothing"
        );
    }

    #[test]
    fn second_finger_cannot_finish_a_touch_drag() {
        let mut app = swap_app();
        let initial = app.world().resource::<SlotImages>().clone();

        touch(&mut app, TouchPhase::Started, 1, centre_of(0));
        app.update();

        touch(&mut app, TouchPhase::Started, 2, centre_of(2));
        app.update();
        touch(&mut app, TouchPhase::Ended, 2, centre_of(2));
        app.update();

        assert_eq!(
            app.world().resource::<DragState>().source(),
            SlotIndex::new(0),
            "still dragging from the first finger's slot"
        );
        assert_eq!(
            *app.world().resource::<SlotImages>(),
            initial,
            "second finger swapped nothing"
        );

        touch(&mut app, TouchPhase::Moved, 1, centre_of(3));
        app.update();
        touch(&mut app, TouchPhase::Ended, 1, centre_of(3));
        app.update();

        assert_eq!(
            outcomes(&app),
            vec![SwapOutcome::Swapped {
                source: SlotIndex::new(0).expect("index in range"),
                target: SlotIndex::new(3).expect("index in range"),
            }],
            "first finger drops onto slot 3"
        );
        assert!(
            !app.world().resource::<DragState>().is_dragging(),
            "drag ended"
        );
    }

    #[test]
    fn finger_held_across_a_restart_is_forgotten() {
        let mut app = swap_app();
        touch(&mut app, TouchPhase::Started, 1, centre_of(0));
        app.update();
        touch(&mut app, TouchPhase::Moved, 1, centre_of(1));
        app.update();

        DragToSwap::restart(app.world_mut());
        touch(&mut app, TouchPhase::Ended, 1, centre_of(3));
        app.update();
        assert_eq!(latest(&app), None, "old finger reports nothing");

        touch(&mut app, TouchPhase::Started, 2, centre_of(2));
        app.update();
        assert_eq!(
            latest(&app),
            Some(SwapEvent::Selected {
                index: SlotIndex::new(2).expect("index in range"),
                position: centre_of(2),
            }),
            "a new finger starts a fresh drag"
        );
    }
}
