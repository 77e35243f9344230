//! # Situation Core
//!
//! Builds the "what is going on around here" block that accompanies an
//! in-world dialogue prompt. This crate reads the simulation through
//! `sim_world::SimulationHost` and never mutates it.
//!
//! ## Pipeline
//!
//! - **affinity**: which narrative tasks pertain to a region, cached per session
//! - **extractor**: collects site features, threats, conditions and tasks
//! - **filter**: category, type and instance visibility, relevance to the
//!   conversation participants, catalogs for a settings UI
//! - **compression**: replaces verbose generated prose with compact templates
//! - **formatter**: renders the bounded text block
//! - **delivery**: hands the block to the dialogue collaborator
//! - **session**: the per-simulation context object tying it together
//!
//! ## Failure Model
//!
//! Pipeline operations are infallible by signature. Missing data yields empty
//! output; a broken template or rule degrades compression, never the block.

pub mod affinity;
pub mod compression;
pub mod config;
pub mod delivery;
pub mod error;
pub mod extractor;
pub mod filter;
pub mod formatter;
pub mod session;
pub mod snapshot;

pub use affinity::*;
pub use compression::*;
pub use config::*;
pub use delivery::*;
pub use error::*;
pub use extractor::*;
pub use filter::*;
pub use formatter::*;
pub use session::*;
pub use snapshot::*;
