// State management module.
// Presentation-facing state for the shop list.

pub mod shops;

pub use shops::{LOAD_FAILED_MESSAGE, LoadingState, ShopListState};
