//! marktplatz-db – Persistenz der Mitgliedskonten
//!
//! Dieses Crate stellt das Repository-Pattern fuer Mitgliedskonten bereit.
//! Der Auth-Kern kennt nur den Trait [`MitgliedRepository`]; die
//! SQLite-Implementierung ist das Standard-Backend. Die UNIQUE-Constraint auf
//! `member_id` ist die eigentliche Garantie fuer eindeutige Kennungen.

pub mod error;
pub mod models;
pub mod repository;
pub mod sqlite;

pub use error::DbError;
pub use repository::{DatabaseConfig, DbResult, MitgliedRepository};
pub use sqlite::SqliteDb;
