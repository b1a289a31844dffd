//! Bus abstractions
//!
//! The engines never touch hardware directly. They are generic over the
//! traits in this module, implemented for real boards by [`SpiBridge`] and
//! for tests by the `fpgaflasher-sim` crate.

mod bridge;
mod traits;

pub use bridge::{PinIndicator, SpiBridge};
pub use traits::*;
