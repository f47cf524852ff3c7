use bevy::prelude::*;
use bevy::input::touch::Touch;

/// Lifecycle of the single pointer a bit listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// The device a gesture was started with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerId {
    Mouse,
    Touch(u64),
}

/// A pointer sample in window coordinates (origin top-left, y down).
///
/// `position` is only ever `None` for [`PointerPhase::Up`], when the mouse was
/// released outside of the window or a touch vanished without an end event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub pointer: PointerId,
    pub position: Option<Vec2>,
}

impl PointerEvent {
    const fn new(phase: PointerPhase, pointer: PointerId, position: Option<Vec2>) -> Self {
        Self {
            phase,
            pointer,
            position,
        }
    }
}

fn cursor_position(windows: &Query<&Window>) -> Option<Vec2> {
    windows.get_single().ok()?.cursor_position()
}

fn lifted_touch(touch_input: &Touches, id: u64) -> Option<&Touch> {
    touch_input
        .iter_just_released()
        .chain(touch_input.iter_just_canceled())
        .find(|touch| touch.id() == id)
}

/// Follows one pointer from press to release.
///
/// The left mouse button or the lowest-id new touch claims the tracker; every
/// other finger is ignored until the claiming pointer is lifted. A press and a
/// release landing in the same frame come out as `Down` followed by `Up`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PointerTracker {
    active: Option<PointerId>,
}

impl PointerTracker {
    /// Folds this frame's mouse and touch input into at most three events:
    /// the end of the followed pointer, then a fresh press and its release.
    ///
    /// A held pointer reports [`PointerPhase::Move`] every frame; callers dedupe.
    pub fn update(
        &mut self,
        button_input: &ButtonInput<MouseButton>,
        touch_input: &Touches,
        windows: &Query<&Window>,
    ) -> Vec<PointerEvent> {
        let mut events = Vec::new();

        if let Some(pointer) = self.active {
            if let Some(event) = Self::follow(pointer, button_input, touch_input, windows) {
                if event.phase == PointerPhase::Up {
                    self.active = None;
                }
                events.push(event);
            }
        }

        if self.active.is_none() {
            self.press(button_input, touch_input, windows, &mut events);
        }

        events
    }

    fn follow(
        pointer: PointerId,
        button_input: &ButtonInput<MouseButton>,
        touch_input: &Touches,
        windows: &Query<&Window>,
    ) -> Option<PointerEvent> {
        match pointer {
            PointerId::Mouse => {
                let position = cursor_position(windows);
                if button_input.just_released(MouseButton::Left)
                    || !button_input.pressed(MouseButton::Left)
                {
                    Some(PointerEvent::new(PointerPhase::Up, pointer, position))
                } else {
                    position.map(|position| {
                        PointerEvent::new(PointerPhase::Move, pointer, Some(position))
                    })
                }
            }
            PointerId::Touch(id) => Some(touch_input.get_pressed(id).map_or_else(
                || {
                    let position = lifted_touch(touch_input, id).map(Touch::position);
                    PointerEvent::new(PointerPhase::Up, pointer, position)
                },
                |touch| PointerEvent::new(PointerPhase::Move, pointer, Some(touch.position())),
            )),
        }
    }

    fn press(
        &mut self,
        button_input: &ButtonInput<MouseButton>,
        touch_input: &Touches,
        windows: &Query<&Window>,
        events: &mut Vec<PointerEvent>,
    ) {
        if button_input.just_pressed(MouseButton::Left) {
            if let Some(position) = cursor_position(windows) {
                let pointer = PointerId::Mouse;
                events.push(PointerEvent::new(PointerPhase::Down, pointer, Some(position)));
                if button_input.pressed(MouseButton::Left) {
                    self.active = Some(pointer);
                } else {
                    events.push(PointerEvent::new(PointerPhase::Up, pointer, Some(position)));
                }
                return;
            }
        }

        let Some(touch) = touch_input.iter_just_pressed().min_by_key(|touch| touch.id()) else {
            return;
        };
        let pointer = PointerId::Touch(touch.id());
        events.push(PointerEvent::new(
            PointerPhase::Down,
            pointer,
            Some(touch.start_position()),
        ));
        if let Some(touch) = touch_input.get_pressed(touch.id()) {
            debug!("Following touch {}", touch.id());
            self.active = Some(pointer);
        } else {
            let position = lifted_touch(touch_input, touch.id()).map(Touch::position);
            events.push(PointerEvent::new(PointerPhase::Up, pointer, position));
        }
    }
}
