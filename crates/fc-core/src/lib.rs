//! `fc-core`: foundational types for the facility admission workspace.
//!
//! This crate is a dependency of every other `fc-*` crate.  It has no `fc-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`ids`]      | `ActorId`                                              |
//! | [`class`]    | `Class`: the two mutually-exclusive actor classes     |
//! | [`config`]   | `FacilityConfig`, `TieBreak`                           |
//! | [`rng`]      | `ActorRng` (per-actor deterministic RNG)               |
//! | [`error`]    | `FcError`, `FcResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required to load configuration from JSON files.            |

pub mod class;
pub mod config;
pub mod error;
pub mod ids;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use class::Class;
pub use config::{FacilityConfig, TieBreak};
pub use error::{FcError, FcResult};
pub use ids::ActorId;
pub use rng::ActorRng;
