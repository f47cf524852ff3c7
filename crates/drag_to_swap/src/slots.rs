use core::fmt;

use bevy::prelude::*;

use crate::config::SwapConfig;

pub const SLOT_COUNT: usize = 4;

/// Index of one of the four image slots, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotIndex(usize);

impl SlotIndex {
    pub const ALL: [Self; SLOT_COUNT] = [Self(0), Self(1), Self(2), Self(3)];

    pub const fn new(index: usize) -> Option<Self> {
        if index < SLOT_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot {}", self.0)
    }
}

/// Identifies the picture shown in a slot: an asset path relative to `assets/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for ImageRef {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which image sits in which slot. Swapping two entries is the only mutation
/// the drag gesture ever performs.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct SlotImages([ImageRef; SLOT_COUNT]);

impl SlotImages {
    pub const fn new(images: [ImageRef; SLOT_COUNT]) -> Self {
        Self(images)
    }

    #[expect(clippy::indexing_slicing, reason = "SlotIndex is always in range")]
    pub fn get(&self, index: SlotIndex) -> &ImageRef {
        &self.0[index.0]
    }

    pub fn swap(&mut self, a: SlotIndex, b: SlotIndex) {
        self.0.swap(a.0, b.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, &ImageRef)> {
        SlotIndex::ALL.into_iter().zip(self.0.iter())
    }
}

impl From<&SwapConfig> for SlotImages {
    fn from(config: &SwapConfig) -> Self {
        Self::new(config.images.clone())
    }
}

/// Screen space hit regions of the slots, in window pixels (origin top-left,
/// y down).
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct SlotLayout {
    regions: [IRect; SLOT_COUNT],
}

impl SlotLayout {
    pub const fn new(regions: [IRect; SLOT_COUNT]) -> Self {
        Self { regions }
    }

    #[expect(clippy::indexing_slicing, reason = "SlotIndex is always in range")]
    pub const fn region(&self, index: SlotIndex) -> IRect {
        self.regions[index.0]
    }

    pub fn regions(&self) -> impl Iterator<Item = (SlotIndex, IRect)> + '_ {
        SlotIndex::ALL.into_iter().zip(self.regions.iter().copied())
    }

    /// First slot, in top to bottom order, whose region contains `point`.
    ///
    /// Regions are half-open like Android hit rects, so two slots sharing an
    /// edge never both claim it; if regions do overlap the lower index wins.
    pub fn slot_at(&self, point: IVec2) -> Option<SlotIndex> {
        self.regions()
            .find(|(_, region)| contains(*region, point))
            .map(|(index, _)| index)
    }
}

impl From<&SwapConfig> for SlotLayout {
    fn from(config: &SwapConfig) -> Self {
        Self::new(SlotIndex::ALL.map(|index| config.slot_region(index)))
    }
}

fn contains(region: IRect, point: IVec2) -> bool {
    point.x >= region.min.x
        && point.x < region.max.x
        && point.y >= region.min.y
        && point.y < region.max.y
}

/// UI node showing the image of a slot.
#[derive(Component, Debug, Clone, Copy)]
pub struct SlotView(pub SlotIndex);
