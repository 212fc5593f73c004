//! League logic: scheduling, result reconciliation, standings.

mod reconcile;
mod schedule;
mod standings;

pub use reconcile::{reconcile, Reconciliation, POINTS_PER_WIN};
pub use schedule::generate_schedule;
pub use standings::{stat_leaders, tournament_standings, StandingRow, StatLeaders};
