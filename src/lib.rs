//! Analysis and rewriting helpers over the `lir` node model.
//!
//! The core is the use/def index ([`uses`]), the depth-first walker
//! ([`walk`]), identifier reset ([`names`]) and result type refresh
//! ([`types`]). The remaining modules are small target and constant
//! utilities built on top of the same model.

// === Core ===
pub mod names;
pub mod types;
pub mod uses;
pub mod walk;

// === Constants and targets ===
pub mod comment;
pub mod constant;
pub mod data_layout;
pub mod layout;
pub mod simplify;

pub use data_layout::{DataLayout, DataLayoutError};
pub use layout::{DefaultLayout, Layout, SizeError};
pub use names::reset_names;
pub use types::reset_types;
pub use uses::{InstSlot, TermSlot, Use, func_uses, inst_uses, term_uses};
pub use walk::{Node, WalkAction, walk, walk_nodes};
