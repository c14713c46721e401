//! Browser-side behavior of the renewable energy dashboard.
//!
//! The icon synchronizer and carousel model are plain Rust so they can be
//! exercised natively; the DOM bindings in `web` only exist on `wasm32`.

pub mod carousel;
pub mod icon;
pub mod synchronizer;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use carousel::{Carousel, Slide, SlideDeck};
pub use icon::IconElement;
pub use synchronizer::{IconSynchronizer, PageEvent, SyncOutcome};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
