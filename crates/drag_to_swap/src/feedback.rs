use core::time::Duration;

use bevy::prelude::*;

use crate::config::SwapConfig;
use crate::coordinator::DragState;
use crate::slots::{SLOT_COUNT, SlotIndex, SlotView};

/// Small copy of the dragged image that sits under the pointer.
#[derive(Component)]
pub struct DragThumbnail;

/// Black layer over a slot, faded in while the slot takes part in a swap.
#[derive(Component, Debug, Clone, Copy)]
pub struct DarkenOverlay(pub SlotIndex);

/// Alpha animation of a [`DarkenOverlay`]. Nothing waits for it; inserting a
/// new one on the same overlay replaces the running fade.
#[derive(Component, Debug, Clone)]
pub struct OverlayFade {
    from: f32,
    to: f32,
    timer: Timer,
}

impl OverlayFade {
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            timer: Timer::new(duration, TimerMode::Once),
        }
    }

    pub const fn target(&self) -> f32 {
        self.to
    }

    pub fn alpha(&self) -> f32 {
        (self.to - self.from).mul_add(self.timer.fraction(), self.from)
    }

    pub fn tick(&mut self, delta: Duration) -> f32 {
        self.timer.tick(delta);
        self.alpha()
    }

    pub fn finished(&self) -> bool {
        self.timer.finished()
    }
}

pub fn thumbnail_bundle(config: &SwapConfig) -> impl Bundle {
    (
        DragThumbnail,
        ImageNode::default(),
        Node {
            position_type: PositionType::Absolute,
            width: Val::Px(config.thumbnail_size),
            height: Val::Px(config.thumbnail_size),
            ..default()
        },
        Visibility::Hidden,
        GlobalZIndex(1),
    )
}

pub fn overlay_bundle(index: SlotIndex) -> impl Bundle {
    (
        DarkenOverlay(index),
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        BackgroundColor(Color::BLACK.with_alpha(0.0)),
    )
}

fn centre_on(node: &mut Node, pointer: IVec2, size: f32) {
    let half = size / 2.0;
    node.left = Val::Px(pointer.x as f32 - half);
    node.top = Val::Px(pointer.y as f32 - half);
}

/// Shows the thumbnail for the slot being dragged and keeps it under the
/// pointer, without any easing.
pub fn update_thumbnail(
    drag: Res<DragState>,
    config: Res<SwapConfig>,
    mut captured: Local<Option<SlotIndex>>,
    slots: Query<(&SlotView, &ImageNode), Without<DragThumbnail>>,
    mut thumbnails: Query<(&mut ImageNode, &mut Node, &mut Visibility), With<DragThumbnail>>,
) {
    let Ok((mut image, mut node, mut visibility)) = thumbnails.get_single_mut() else {
        return;
    };

    let Some(source) = drag.source() else {
        *visibility = Visibility::Hidden;
        *captured = None;
        return;
    };

    if *captured != Some(source) {
        if let Some((_, slot_image)) = slots.iter().find(|(view, _)| view.0 == source) {
            image.image = slot_image.image.clone();
        }
        *captured = Some(source);
        *visibility = Visibility::Visible;
    }

    centre_on(&mut node, drag.pointer(), config.thumbnail_size);
}

/// Starts a fade on every overlay whose highlight flipped since the last run.
pub fn darken_highlighted(
    mut commands: Commands,
    drag: Res<DragState>,
    config: Res<SwapConfig>,
    mut applied: Local<[bool; SLOT_COUNT]>,
    overlays: Query<(Entity, &DarkenOverlay, &BackgroundColor)>,
) {
    let highlighted = drag.highlighted();
    if highlighted == *applied {
        return;
    }

    for (entity, overlay, color) in &overlays {
        let index = overlay.0.get();
        let (Some(&was), Some(&is)) = (applied.get(index), highlighted.get(index)) else {
            continue;
        };
        if was == is {
            continue;
        }

        let target = if is { config.overlay_alpha } else { 0.0 };
        commands.entity(entity).insert(OverlayFade::new(
            color.0.alpha(),
            target,
            config.fade_duration,
        ));
    }

    *applied = highlighted;
}

pub fn animate_overlay_fades(
    mut commands: Commands,
    time: Res<Time>,
    mut fades: Query<(Entity, &mut OverlayFade, &mut BackgroundColor)>,
) {
    for (entity, mut fade, mut color) in &mut fades {
        let alpha = fade.tick(time.delta());
        color.0.set_alpha(alpha);
        if fade.finished() {
            commands.entity(entity).remove::<OverlayFade>();
        }
    }
}
