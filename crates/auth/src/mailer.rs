//! Versand von Zertifizierungsmails
//!
//! Die eigentliche Zustellung liegt ausserhalb des Auth-Kerns. Der Standard
//! [`LogMailer`] protokolliert die Mail nur und meldet Erfolg.

/// Abstraktion fuer den Mailversand
///
/// `false` bedeutet, dass die Mail nicht zugestellt werden konnte.
#[allow(async_fn_in_trait)]
pub trait Mailer: Send + Sync {
    async fn zertifizierungsmail_senden(&self, adresse: &str, code: &str) -> bool;
}

/// Mailer fuer lokale Entwicklung: schreibt die Mail ins Log
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn zertifizierungsmail_senden(&self, adresse: &str, code: &str) -> bool {
        tracing::info!(
            adresse = %adresse,
            code = %code,
            "Zertifizierungsmail (Stub, kein Versand)"
        );
        true
    }
}
