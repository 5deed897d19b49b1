//! marktplatz-core – Gemeinsame Domain-Typen
//!
//! Dieses Crate stellt die Typen bereit, die sowohl von der Persistenz
//! (`marktplatz-db`) als auch vom Auth-Kern (`marktplatz-auth`) genutzt werden.

pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use types::{LoginTyp, Rolle};
