//! Laufzeitparameter des Auth-Kerns

use std::time::Duration;

/// Lebensdauern und Code-Laenge fuer Verifizierung und Sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthKonfig {
    /// Gueltigkeit eines Zertifizierungscodes
    pub code_ttl: Duration,
    /// Gueltigkeit der Verifizierungsmarke nach erfolgreicher Bestaetigung
    pub verifiziert_ttl: Duration,
    /// Lebensdauer von Token und Cache-Session
    pub sitzung_ttl: Duration,
    /// Anzahl Ziffern eines Zertifizierungscodes
    pub code_laenge: usize,
}

impl Default for AuthKonfig {
    fn default() -> Self {
        Self {
            code_ttl: Duration::from_secs(3 * 60),
            verifiziert_ttl: Duration::from_secs(60 * 60),
            sitzung_ttl: Duration::from_secs(60 * 60),
            code_laenge: 6,
        }
    }
}
