use bevy::log::info;
use bevy::prelude::*;
use bits_helpers::RibbitMessageHandler;
use ribbit_bits::{BitDuration, BitResult};

use crate::config::SwapConfig;
use crate::coordinator::{DragState, SwapStats};
use crate::gesture::{LatestSwapEvent, PointerTrail};
use crate::slots::SlotImages;

#[derive(Default, Clone, Copy)]
pub struct DragToSwap;

impl RibbitMessageHandler for DragToSwap {
    fn restart(world: &mut World) {
        info!("Restarting DragToSwap");

        let images = SlotImages::from(world.resource::<SwapConfig>());
        world.insert_resource(images);
        world.insert_resource(DragState::default());
        world.insert_resource(LatestSwapEvent::default());
        // A finger still down from before the restart must not drop into the new round.
        world.insert_resource(PointerTrail::default());
        world.insert_resource(SwapStats::default());
    }

    fn end(world: &mut World) -> BitResult {
        let stats = *world.resource::<SwapStats>();
        info!(
            "Ending DragToSwap after {} swaps and {} cancelled drags",
            stats.swapped, stats.cancelled
        );

        world.resource_mut::<DragState>().reset();

        // There is nothing to win, trying it out is what counts.
        if stats.swapped > 0 {
            BitResult::Success
        } else {
            BitResult::Failure
        }
    }

    fn duration(_world: &mut World) -> BitDuration {
        BitDuration::max_duration()
    }
}
