mod bit;
pub use bit::*;

pub mod input;

mod ribbit_communication;
pub use ribbit_communication::*;

pub mod window_resizing;
