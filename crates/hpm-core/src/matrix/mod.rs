//! Matrix view-state module.
//!
//! # Module Structure
//!
//! - `item`: `MatrixItem`, its derived `ItemPhase`, and `ItemPatch`
//! - `reducer`: identity-keyed `merge`
//! - `state`: the session state container
//! - `caption`: rotating status captions

mod caption;
mod item;
mod reducer;
mod state;

pub use caption::{STATUS_CAPTIONS, status_caption};
pub use item::{ItemPatch, ItemPhase, MatrixItem};
pub use reducer::{merge, merge_in_place};
pub use state::MatrixState;
