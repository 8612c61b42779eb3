//! Database persistence layer for game statistics.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::DbError;
pub use models::PlayerStats;
pub use repository::StatsRepository;

pub(crate) use models::NewPlayerStats;
