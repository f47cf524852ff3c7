use bevy::prelude::*;
use config::SwapConfig;
use coordinator::{DragState, SwapOutcome, SwapStats, coordinate_swaps};
use feedback::{
    animate_overlay_fades, darken_highlighted, overlay_bundle, thumbnail_bundle, update_thumbnail,
};
use gesture::{LatestSwapEvent, PointerTrail, SwapEvent, track_pointer};
use loading::{DisplayedImage, animate_crossfades, load_slot_images};
use ribbit::DragToSwap;
use slots::{SlotImages, SlotLayout, SlotView};

pub mod config;
pub mod coordinator;
pub mod feedback;
pub mod gesture;
pub mod loading;
mod ribbit;
pub mod slots;

const SLOT_BACKGROUND: Color = Color::srgb(0.8, 0.8, 0.8);

pub fn run() {
    bits_helpers::get_default_app::<DragToSwap>(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
        .add_plugins(SwapPlugin::new(SwapConfig::default()))
        .run();
}

/// Four images in a list that can be reordered by dragging one onto another.
pub struct SwapPlugin {
    config: SwapConfig,
}

impl SwapPlugin {
    pub const fn new(config: SwapConfig) -> Self {
        Self { config }
    }
}

impl Plugin for SwapPlugin {
    fn build(&self, app: &mut App) {
        let config = self.config.clone().validated();

        app.insert_resource(SlotLayout::from(&config))
            .insert_resource(SlotImages::from(&config))
            .insert_resource(config)
            .init_resource::<DragState>()
            .init_resource::<LatestSwapEvent>()
            .init_resource::<PointerTrail>()
            .init_resource::<SwapStats>()
            .add_event::<SwapEvent>()
            .add_event::<SwapOutcome>()
            .add_systems(Startup, setup)
            .add_systems(
                Update,
                (
                    track_pointer,
                    coordinate_swaps,
                    (update_thumbnail, darken_highlighted)
                        .run_if(resource_changed::<DragState>),
                    animate_overlay_fades,
                    load_slot_images.run_if(resource_changed::<SlotImages>),
                    animate_crossfades,
                )
                    .chain(),
            );
    }
}

fn setup(mut commands: Commands, layout: Res<SlotLayout>, config: Res<SwapConfig>) {
    commands.spawn(Camera2d);

    for (index, region) in layout.regions() {
        commands
            .spawn((
                SlotView(index),
                DisplayedImage::default(),
                ImageNode::default(),
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(region.min.x as f32),
                    top: Val::Px(region.min.y as f32),
                    width: Val::Px(region.width() as f32),
                    height: Val::Px(region.height() as f32),
                    ..default()
                },
                BackgroundColor(SLOT_BACKGROUND),
            ))
            .with_child(overlay_bundle(index));
    }

    commands.spawn(thumbnail_bundle(&config));
    info!("Drag one image onto another to swap them");
}
