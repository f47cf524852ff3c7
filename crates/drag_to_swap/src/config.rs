use core::time::Duration;

use bevy::prelude::*;
use bits_helpers::{WINDOW_HEIGHT, WINDOW_WIDTH};
use thiserror::Error;

use crate::slots::{ImageRef, SLOT_COUNT, SlotIndex, SlotLayout};

const IMAGES: [&str; SLOT_COUNT] = [
    "images/lake.png",
    "images/forest.png",
    "images/desert.png",
    "images/city.png",
];

const LIST_ORIGIN: IVec2 = IVec2::new(20, 20);
const SLOT_SIZE: IVec2 = IVec2::new(320, 140);
const SLOT_SPACING: i32 = 10;

const THUMBNAIL_SIZE: f32 = 50.0;
// 0x70 out of 0xFF, the darkening used on slots taking part in a swap
const OVERLAY_ALPHA: f32 = 112.0 / 255.0;
const FADE_DURATION: Duration = Duration::from_millis(250);
const CROSSFADE_DURATION: Duration = Duration::from_millis(400);

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} has no image")]
    EmptyImageRef(SlotIndex),

    #[error("Slot size must be positive, got {0}")]
    NonPositiveSlotSize(IVec2),

    #[error("{0} and {1} overlap")]
    OverlappingSlots(SlotIndex, SlotIndex),

    #[error("{index} at {region:?} does not fit in the window")]
    SlotOutOfWindow { index: SlotIndex, region: IRect },

    #[error("Overlay alpha must be within (0, 1], got {0}")]
    InvalidOverlayAlpha(f32),
}

/// Tunables of the swap screen.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SwapConfig {
    /// Images shown in slots 0..4 when the bit starts or restarts
    pub images: [ImageRef; SLOT_COUNT],
    /// Top-left corner of the first slot, in window pixels
    pub list_origin: IVec2,
    pub slot_size: IVec2,
    /// Vertical gap between two slots
    pub slot_spacing: i32,
    /// Edge of the square thumbnail following the pointer
    pub thumbnail_size: f32,
    /// Alpha of the black overlay on highlighted slots
    pub overlay_alpha: f32,
    pub fade_duration: Duration,
    pub crossfade_duration: Duration,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            images: IMAGES.map(ImageRef::from),
            list_origin: LIST_ORIGIN,
            slot_size: SLOT_SIZE,
            slot_spacing: SLOT_SPACING,
            thumbnail_size: THUMBNAIL_SIZE,
            overlay_alpha: OVERLAY_ALPHA,
            fade_duration: FADE_DURATION,
            crossfade_duration: CROSSFADE_DURATION,
        }
    }
}

impl SwapConfig {
    /// Region of `index` in the vertical list.
    pub fn slot_region(&self, index: SlotIndex) -> IRect {
        let step = self.slot_size.y + self.slot_spacing;
        let min = self.list_origin + IVec2::new(0, step * index.get() as i32);
        IRect::from_corners(min, min + self.slot_size)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some((index, _)) = SlotIndex::ALL
            .into_iter()
            .zip(&self.images)
            .find(|(_, image)| image.is_blank())
        {
            return Err(ConfigError::EmptyImageRef(index));
        }

        if self.slot_size.x <= 0 || self.slot_size.y <= 0 {
            return Err(ConfigError::NonPositiveSlotSize(self.slot_size));
        }

        if !(self.overlay_alpha > 0.0 && self.overlay_alpha <= 1.0) {
            return Err(ConfigError::InvalidOverlayAlpha(self.overlay_alpha));
        }

        let layout = SlotLayout::from(self);
        let window = IRect::new(0, 0, WINDOW_WIDTH as i32, WINDOW_HEIGHT as i32);
        for (index, region) in layout.regions() {
            if window.union(region) != window {
                return Err(ConfigError::SlotOutOfWindow { index, region });
            }
        }

        for (a, first) in layout.regions() {
            for (b, second) in layout.regions().skip(a.get() + 1) {
                if !first.intersect(second).is_empty() {
                    return Err(ConfigError::OverlappingSlots(a, b));
                }
            }
        }

        Ok(())
    }

    /// Returns `self` when valid, otherwise logs why and falls back to the
    /// defaults.
    pub fn validated(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(err) => {
                error!("Invalid swap configuration, using defaults: {err}");
                Self::default()
            }
        }
    }
}
