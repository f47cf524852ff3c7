use bevy::prelude::*;

use crate::gesture::SwapEvent;
use crate::slots::{SLOT_COUNT, SlotImages, SlotIndex, SlotLayout};

/// How a drag ended.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    Swapped { source: SlotIndex, target: SlotIndex },
    Cancelled { source: SlotIndex },
}

/// The drag in flight, if any, and which slots are darkened for it.
///
/// Highlights are only ever set while a source exists, and every way out of
/// a drag goes through [`DragState::reset`].
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct DragState {
    source: Option<SlotIndex>,
    pointer: IVec2,
    highlighted: [bool; SLOT_COUNT],
}

impl DragState {
    pub const fn source(&self) -> Option<SlotIndex> {
        self.source
    }

    pub const fn is_dragging(&self) -> bool {
        self.source.is_some()
    }

    pub const fn pointer(&self) -> IVec2 {
        self.pointer
    }

    pub const fn highlighted(&self) -> [bool; SLOT_COUNT] {
        self.highlighted
    }

    #[expect(clippy::indexing_slicing, reason = "SlotIndex is always in range")]
    fn highlight(&mut self, index: SlotIndex) {
        self.highlighted[index.get()] = true;
    }

    pub fn started_swap(&mut self, index: SlotIndex, position: IVec2) {
        if let Some(previous) = self.source {
            warn!("Drag from {previous} replaced by a new drag from {index}");
        }
        self.reset();
        self.source = Some(index);
        self.pointer = position;
        self.highlight(index);
    }

    /// Follows the pointer and previews the swap with whatever slot is under
    /// it. Over empty space the last preview stays as it was.
    pub fn drag_in_progress(&mut self, position: IVec2, layout: &SlotLayout) {
        let Some(source) = self.source else {
            return;
        };
        self.pointer = position;

        if let Some(target) = layout.slot_at(position) {
            self.highlighted = [false; SLOT_COUNT];
            self.highlight(source);
            self.highlight(target);
        }
    }

    /// Commits or cancels the drag depending on what is under `position`.
    ///
    /// Returns `None` when no drag was in progress.
    pub fn dropped(
        &mut self,
        position: IVec2,
        layout: &SlotLayout,
        images: &mut SlotImages,
    ) -> Option<SwapOutcome> {
        let source = self.source?;
        self.pointer = position;

        let outcome = match layout.slot_at(position) {
            Some(target) if target != source => self.swap_images(source, target, images),
            _ => self.cancel_swap(source),
        };
        Some(outcome)
    }

    fn swap_images(
        &mut self,
        source: SlotIndex,
        target: SlotIndex,
        images: &mut SlotImages,
    ) -> SwapOutcome {
        images.swap(source, target);
        self.reset();
        SwapOutcome::Swapped { source, target }
    }

    fn cancel_swap(&mut self, source: SlotIndex) -> SwapOutcome {
        self.reset();
        SwapOutcome::Cancelled { source }
    }

    pub fn reset(&mut self) {
        self.source = None;
        self.highlighted = [false; SLOT_COUNT];
    }
}

/// Running totals, reported to the host when the bit ends.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SwapStats {
    pub swapped: u32,
    pub cancelled: u32,
}

pub fn coordinate_swaps(
    mut events: EventReader<SwapEvent>,
    layout: Res<SlotLayout>,
    mut drag: ResMut<DragState>,
    mut images: ResMut<SlotImages>,
    mut stats: ResMut<SwapStats>,
    mut outcomes: EventWriter<SwapOutcome>,
) {
    for event in events.read() {
        match *event {
            SwapEvent::Selected { index, position } => {
                debug!("Drag started from {index} at {position}");
                drag.started_swap(index, position);
            }
            SwapEvent::DragInProgress { position } => {
                if drag.is_dragging() {
                    drag.drag_in_progress(position, &layout);
                }
            }
            SwapEvent::Dropped { position } => {
                // Only a committed swap should wake up the image loading.
                let Some(outcome) =
                    drag.dropped(position, &layout, images.bypass_change_detection())
                else {
                    continue;
                };

                match outcome {
                    SwapOutcome::Swapped { source, target } => {
                        info!("Swapped {source} with {target}");
                        images.set_changed();
                        stats.swapped += 1;
                    }
                    SwapOutcome::Cancelled { source } => {
                        debug!("Swap from {source} cancelled at {position}");
                        stats.cancelled += 1;
                    }
                }
                outcomes.send(outcome);
            }
        }
    }
}
