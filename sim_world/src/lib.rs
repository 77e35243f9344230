//! # Sim World
//!
//! The stable internal model of the host life-simulation. Everything the
//! situation pipeline reads about regions, narrative tasks, environment
//! conditions, alerts, actors and generation rules is expressed here.
//!
//! Host-specific shapes never leak past this crate: [`adapter`] translates a
//! host document into a [`WorldState`], and the pipeline only talks to the
//! [`SimulationHost`] trait.

pub mod adapter;
pub mod entities;
pub mod error;
pub mod mechanics;
pub mod rules;
pub mod world_state;

pub use entities::*;
pub use error::*;
pub use mechanics::*;
pub use rules::*;
pub use world_state::*;
