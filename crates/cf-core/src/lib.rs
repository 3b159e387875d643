//! `cf-core` — foundational types for the `crowdflow` workspace.
//!
//! This crate is a dependency of every other `cf-*` crate.  It has no `cf-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`ids`]      | `AgentId`                                                 |
//! | [`cell`]     | `Cell` grid coordinate, Euclidean distance, 8-neighbours  |
//! | [`frame`]    | `Frame` — one tick's `(AgentId, Cell)` snapshot           |
//! | [`time`]     | `Tick`                                                    |
//! | [`rng`]      | `SimRng` (seeded simulation RNG)                          |
//! | [`config`]   | `SimConfig`, `SpawnRect`                                  |
//! | [`error`]    | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//! |         | Required by `cf-trace` and by JSON launch-parameter files. |

pub mod cell;
pub mod config;
pub mod error;
pub mod frame;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cell::Cell;
pub use config::{SimConfig, SpawnRect};
pub use error::{CoreError, CoreResult};
pub use frame::Frame;
pub use ids::AgentId;
pub use rng::SimRng;
pub use time::Tick;
