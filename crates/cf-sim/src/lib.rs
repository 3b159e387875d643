//! `cf-sim` — the step scheduler.
//!
//! # Tick
//!
//! ```text
//! while state == Running:
//!   ① Snapshot — copy the tile map and block every active agent's cell.
//!   ② Plan     — in slot order, plan agent → goal on the snapshot; the next
//!                cell is the path's second cell (or the current cell when
//!                the path is trivial or planning failed).
//!   ③ Reserve  — block the chosen cell before the next agent plans, so no
//!                two agents pick the same cell and lower slots win.
//!   ④ Record   — emit the new positions as a Frame (arrivals included).
//!   ⑤ Remove   — drop agents within the removal radius of the goal.
//!                Empty active set → Completed.
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use cf_core::{SimConfig, SpawnRect};
//! use cf_planner::AStarPlanner;
//! use cf_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(SimConfig::default(), tile_map, goal, AStarPlanner::default())
//!     .spawn(vec![SpawnRect::new(1, 1, 5, 5)], 20)
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;
pub mod spawn;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{Sim, SimState, TickReport};
pub use spawn::spawn_agents;
