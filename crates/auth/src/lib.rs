//! marktplatz-auth – Identitaets- und Session-Kern
//!
//! Dieses Crate implementiert:
//! - TTL-Cache fuer Zertifizierungscodes, Verifizierungsmarken und Sessions
//! - Ausstellung und Pruefung signierter Tokens (HS256)
//! - Zweistufige E-Mail-Verifizierung vor der Registrierung
//! - Mitgliederverzeichnis ueber dem DB-Repository
//! - AuthService (Registrierung, Anmeldung, Abmeldung, Aufrufer-Pruefung)
//! - Anmeldung ueber externe Login-Anbieter (kakao, naver)

pub mod cache;
pub mod error;
pub mod konfig;
pub mod mailer;
pub mod oauth;
pub mod password;
pub mod service;
pub mod token;
pub mod verification;
pub mod verzeichnis;

#[cfg(test)]
pub(crate) mod testhilfen;

// Bequeme Re-Exporte
pub use cache::{CacheError, SpeicherCache, TtlCache};
pub use error::{AuthError, AuthResult};
pub use konfig::AuthKonfig;
pub use mailer::{LogMailer, Mailer};
pub use oauth::{Anbieter, AnbieterProfil, FoederationsBruecke};
pub use password::{passwort_hashen, passwort_verifizieren};
pub use service::{AuthService, Registrierung};
pub use token::{Claims, TokenAussteller};
pub use verification::VerifizierungsService;
pub use verzeichnis::MitgliederVerzeichnis;
