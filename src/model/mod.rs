//! Document model.
//!
//! Input records owned by the surrounding application (`ProposalConfig`,
//! `Section`) and the typed document tree produced by the assembler and
//! consumed by the renderers.

mod block;
mod config;
mod document;
mod section;
mod table;

pub use block::*;
pub use config::*;
pub use document::*;
pub use section::*;
pub use table::*;
