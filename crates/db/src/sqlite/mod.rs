//! SQLite-Backend-Implementierungen fuer alle Repository-Traits

pub mod mitglieder;
pub mod pool;

pub use pool::SqliteDb;
