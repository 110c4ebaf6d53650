//! Request classification.
//!
//! - [`BotClassifier`]: is this request from a crawler we analyze?
//! - [`WasteClassifier`]: which waste patterns does the requested URL match?

mod bot;
mod waste;

pub use bot::BotClassifier;
pub use waste::{WasteClassifier, WastePattern, WasteTag};
