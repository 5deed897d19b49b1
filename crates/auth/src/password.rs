//! Passwort-Hashing mit Argon2id
//!
//! Lokale Konten speichern einen PHC-String (`$argon2id$...`). Foederierte
//! Konten erhalten stattdessen [`FOEDERIERT_HASH`]; dieser Wert ist kein
//! gueltiger PHC-String und kann daher nie gegen ein Passwort verifiziert
//! werden.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params, Version,
};

use crate::error::AuthError;

/// Platzhalter-Hash fuer Konten ohne Passwort-Anmeldung
pub const FOEDERIERT_HASH: &str = "!foederiert";

/// Minimale und maximale Passwortlaenge
const PASSWORT_MIN: usize = 8;
const PASSWORT_MAX: usize = 13;

/// Argon2id-Parameter fuer sicheres Passwort-Hashing
///
/// Werte gemaess OWASP-Empfehlungen (Stand 2024):
/// - Speicher: 19 MiB
/// - Iterationen: 2
/// - Parallelismus: 1
fn argon2_instanz() -> Result<Argon2<'static>, AuthError> {
    let params = Params::new(
        19 * 1024, // m_cost: 19 MiB
        2,         // t_cost: 2 Iterationen
        1,         // p_cost: 1 Thread
        None,      // output_len: Standard (32 Bytes)
    )
    .map_err(|e| AuthError::PasswortHashing(format!("Argon2-Parameter ungueltig: {e}")))?;

    Ok(Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params))
}

/// Hasht ein Passwort mit Argon2id und einem zufaelligen Salt
///
/// Gibt den PHC-String zurueck (inkl. Algorithmus, Parameter und Salt).
pub fn passwort_hashen(passwort: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    argon2_instanz()?
        .hash_password(passwort.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswortHashing(e.to_string()))
}

/// Verifiziert ein Passwort gegen einen gespeicherten Hash
///
/// Gibt `true` zurueck wenn das Passwort korrekt ist. Fuer foederierte Konten
/// ist das Ergebnis immer `false`.
pub fn passwort_verifizieren(passwort: &str, hash: &str) -> Result<bool, AuthError> {
    if hash == FOEDERIERT_HASH {
        return Ok(false);
    }

    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AuthError::PasswortHashing(format!("Ungueltiges Hash-Format: {e}")))?;

    match argon2_instanz()?.verify_password(passwort.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::PasswortHashing(e.to_string())),
    }
}

/// Prueft die Passwort-Richtlinie fuer lokale Registrierungen
///
/// 8 bis 13 ASCII-Buchstaben oder -Ziffern, mindestens ein Buchstabe und
/// mindestens eine Ziffer.
pub fn passwort_richtlinie_pruefen(passwort: &str) -> Result<(), AuthError> {
    let laenge_ok = (PASSWORT_MIN..=PASSWORT_MAX).contains(&passwort.len());
    let zeichen_ok = passwort.chars().all(|c| c.is_ascii_alphanumeric());
    let hat_buchstabe = passwort.chars().any(|c| c.is_ascii_alphabetic());
    let hat_ziffer = passwort.chars().any(|c| c.is_ascii_digit());

    if laenge_ok && zeichen_ok && hat_buchstabe && hat_ziffer {
        Ok(())
    } else {
        Err(AuthError::ungueltige_eingabe(format!(
            "Passwort muss {PASSWORT_MIN}-{PASSWORT_MAX} Buchstaben/Ziffern mit mindestens \
             einem Buchstaben und einer Ziffer enthalten"
        )))
    }
}
