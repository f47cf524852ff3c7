use core::time::Duration;

use bevy::prelude::*;

use crate::config::SwapConfig;
use crate::slots::{ImageRef, SlotImages, SlotView};

/// The image a slot view currently displays, or `None` before the first load.
#[derive(Component, Debug, Default, Clone, PartialEq, Eq)]
pub struct DisplayedImage(Option<ImageRef>);

impl DisplayedImage {
    pub fn shows(&self, image: &ImageRef) -> bool {
        self.0.as_ref() == Some(image)
    }
}

/// Fades a freshly requested image in over the slot.
#[derive(Component, Debug, Clone)]
pub struct CrossFade {
    timer: Timer,
}

impl CrossFade {
    pub fn new(duration: Duration) -> Self {
        Self {
            timer: Timer::new(duration, TimerMode::Once),
        }
    }

    pub fn tick(&mut self, delta: Duration) -> f32 {
        self.timer.tick(delta);
        self.timer.fraction()
    }

    pub fn finished(&self) -> bool {
        self.timer.finished()
    }
}

/// Requests the image of every slot view that no longer matches the data.
///
/// Loading is left to the asset server; the swap logic never waits for it.
pub fn load_slot_images(
    mut commands: Commands,
    images: Res<SlotImages>,
    config: Res<SwapConfig>,
    asset_server: Res<AssetServer>,
    mut views: Query<(Entity, &SlotView, &mut ImageNode, &mut DisplayedImage)>,
) {
    for (entity, view, mut image_node, mut displayed) in &mut views {
        let wanted = images.get(view.0);
        if displayed.shows(wanted) {
            continue;
        }

        debug!("Loading {wanted} into {}", view.0);
        image_node.image = asset_server.load(wanted.as_str().to_owned());
        image_node.color.set_alpha(0.0);
        displayed.0 = Some(wanted.clone());
        commands
            .entity(entity)
            .insert(CrossFade::new(config.crossfade_duration));
    }
}

pub fn animate_crossfades(
    mut commands: Commands,
    time: Res<Time>,
    mut fades: Query<(Entity, &mut CrossFade, &mut ImageNode)>,
) {
    for (entity, mut fade, mut image_node) in &mut fades {
        let alpha = fade.tick(time.delta());
        image_node.color.set_alpha(alpha);
        if fade.finished() {
            commands.entity(entity).remove::<CrossFade>();
        }
    }
}
