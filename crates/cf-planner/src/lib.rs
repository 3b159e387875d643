//! `cf-planner` — grid path planning.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`planner`] | `Planner` trait, `Path`, `AStarPlanner`, `CornerCutting`    |
//! | [`error`]   | `PlanError`, `PlanResult<T>`                                |

pub mod error;
pub mod planner;


pub use error::{PlanError, PlanResult};
pub use planner::{AStarPlanner, CornerCutting, Path, Planner};
