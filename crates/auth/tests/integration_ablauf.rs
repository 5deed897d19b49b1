//! End-to-End-Ablaeufe des Auth-Kerns gegen In-Memory SQLite und SpeicherCache

use std::sync::{Arc, Mutex};
use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;

use marktplatz_auth::{
    AuthError, AuthKonfig, AuthService, FoederationsBruecke, Mailer, MitgliederVerzeichnis,
    Registrierung, SpeicherCache, TokenAussteller, TtlCache, VerifizierungsService,
};
use marktplatz_core::{LoginTyp, Rolle};
use marktplatz_db::SqliteDb;

// Mailer, der den zuletzt versendeten Code festhaelt
#[derive(Default)]
struct MerkMailer {
    codes: Mutex<Vec<String>>,
}

impl MerkMailer {
    fn letzter_code(&self) -> String {
        self.codes.lock().unwrap().last().cloned().expect("kein Code versendet")
    }
}

impl Mailer for MerkMailer {
    async fn zertifizierungsmail_senden(&self, _adresse: &str, code: &str) -> bool {
        self.codes.lock().unwrap().push(code.to_string());
        true
    }
}

struct Umgebung {
    cache: Arc<SpeicherCache>,
    mailer: Arc<MerkMailer>,
    verifizierung: VerifizierungsService<SqliteDb, SpeicherCache, MerkMailer>,
    auth: Arc<AuthService<SqliteDb, SpeicherCache>>,
    bruecke: FoederationsBruecke<SqliteDb, SpeicherCache>,
}

async fn umgebung() -> Umgebung {
    let db = Arc::new(
        SqliteDb::in_memory()
            .await
            .expect("In-Memory DB konnte nicht erstellt werden"),
    );
    let cache = SpeicherCache::neu();
    let mailer = Arc::new(MerkMailer::default());
    let konfig = AuthKonfig::default();
    let verzeichnis = MitgliederVerzeichnis::neu(db);
    let aussteller = Arc::new(
        TokenAussteller::neu(
            SecretString::from("integration-geheimnis".to_string()),
            konfig.sitzung_ttl,
        )
        .unwrap(),
    );

    let verifizierung = VerifizierungsService::neu(
        verzeichnis.clone(),
        Arc::clone(&cache),
        Arc::clone(&mailer),
        konfig,
    );
    let auth = Arc::new(AuthService::neu(
        verzeichnis.clone(),
        Arc::clone(&cache),
        aussteller,
    ));
    let bruecke = FoederationsBruecke::neu(verzeichnis, Arc::clone(&auth));

    Umgebung {
        cache,
        mailer,
        verifizierung,
        auth,
        bruecke,
    }
}

fn registrierung(member_id: &str, passwort: &str) -> Registrierung {
    Registrierung {
        member_id: member_id.to_string(),
        member_name: member_id.to_string(),
        email: format!("{member_id}@x.com"),
        password: passwort.to_string(),
        phone_number: Some("01012345678".into()),
        address: None,
        role: Rolle::Customer,
    }
}

fn anderer_code(code: &str) -> String {
    if code == "000000" {
        "111111".into()
    } else {
        "000000".into()
    }
}

/// Kompletter Registrierungsablauf inklusive Anmeldung
async fn registrieren(u: &Umgebung, member_id: &str, passwort: &str) {
    u.verifizierung
        .zertifizierung_anfordern(member_id, &format!("{member_id}@x.com"))
        .await
        .unwrap();
    let code = u.mailer.letzter_code();
    u.verifizierung.bestaetigen(member_id, &code).await.unwrap();
    u.auth
        .registrieren(registrierung(member_id, passwort))
        .await
        .unwrap();
}

#[tokio::test]
async fn alice_verifiziert_und_registriert_sich() {
    let u = umgebung().await;

    u.verifizierung
        .zertifizierung_anfordern("alice", "alice@x.com")
        .await
        .unwrap();
    let code = u.mailer.letzter_code();
    assert_eq!(u.cache.get("alice").await.unwrap(), Some(code.clone()));

    // Falscher Code: Fehler, Ticket bleibt
    let falsch = anderer_code(&code);
    assert!(matches!(
        u.verifizierung.bestaetigen("alice", &falsch).await,
        Err(AuthError::CodeUngleich)
    ));
    assert_eq!(u.cache.get("alice").await.unwrap(), Some(code.clone()));

    // Richtiger Code: Marke gesetzt, Ticket weg
    u.verifizierung.bestaetigen("alice", &code).await.unwrap();
    assert!(u.verifizierung.ist_verifiziert("alice").await.unwrap());
    assert_eq!(u.cache.get("alice").await.unwrap(), None);

    let mitglied = u
        .auth
        .registrieren(registrierung("alice", "rightpw123"))
        .await
        .unwrap();
    assert_eq!(mitglied.member_id, "alice");
    assert_eq!(mitglied.login_type, LoginTyp::App);
}

#[tokio::test]
async fn bob_falsches_passwort_ohne_cache_eintrag() {
    let u = umgebung().await;
    registrieren(&u, "bob", "rightpw123").await;

    let ergebnis = u.auth.anmelden("bob", "wrongpw123").await;
    assert!(matches!(ergebnis, Err(AuthError::PasswortFalsch)));
    assert_eq!(u.cache.get("bob").await.unwrap(), None);

    let token = u.auth.anmelden("bob", "rightpw123").await.unwrap();
    assert_eq!(u.cache.get("bob").await.unwrap(), Some(token));
}

#[tokio::test]
async fn carol_abmeldung_laesst_token_gueltig() {
    let u = umgebung().await;
    registrieren(&u, "carol", "rightpw123").await;
    let token = u.auth.anmelden("carol", "rightpw123").await.unwrap();

    u.auth.abmelden("carol", &token).await.unwrap();

    assert_eq!(u.cache.get("carol").await.unwrap(), None);
    u.auth.aufrufer_pruefen("carol", &token).unwrap();
}

#[tokio::test]
async fn zweite_registrierung_immer_abgelehnt() {
    let u = umgebung().await;
    registrieren(&u, "dave", "rightpw123").await;

    // Ohne neue Verifizierung
    assert!(matches!(
        u.auth.registrieren(registrierung("dave", "rightpw123")).await,
        Err(AuthError::MitgliedExistiertBereits(_))
    ));
    // Auch ein neues Ticket wird verweigert
    assert!(matches!(
        u.verifizierung.zertifizierung_anfordern("dave", "dave@x.com").await,
        Err(AuthError::MitgliedExistiertBereits(_))
    ));
    // Mit haendisch gesetzter Marke ebenfalls
    u.cache
        .set("dave:verified", "true", Duration::from_secs(60))
        .await
        .unwrap();
    assert!(matches!(
        u.auth.registrieren(registrierung("dave", "rightpw123")).await,
        Err(AuthError::MitgliedExistiertBereits(_))
    ));
}

#[tokio::test]
async fn registrierung_ohne_bestaetigung_gesperrt() {
    let u = umgebung().await;
    u.verifizierung
        .zertifizierung_anfordern("erin", "erin@x.com")
        .await
        .unwrap();

    // Ticket ausstehend, aber noch nicht eingeloest
    assert!(!u.verifizierung.ist_verifiziert("erin").await.unwrap());
    assert!(matches!(
        u.auth.registrieren(registrierung("erin", "rightpw123")).await,
        Err(AuthError::VerifizierungErforderlich(_))
    ));
}

#[tokio::test]
async fn ticket_nur_einmal_einloesbar() {
    let u = umgebung().await;
    u.verifizierung
        .zertifizierung_anfordern("frank", "frank@x.com")
        .await
        .unwrap();
    let code = u.mailer.letzter_code();

    assert!(u.verifizierung.zertifizierung_pruefen("frank", &code).await.unwrap());
    assert!(matches!(
        u.verifizierung.zertifizierung_pruefen("frank", &code).await,
        Err(AuthError::VerifizierungsdatenNichtGefunden(_))
    ));
}

#[tokio::test]
async fn foederierte_anmeldung_ist_idempotent() {
    let u = umgebung().await;
    let profil = json!({
        "id": 4242,
        "kakao_account": { "email": "k@kakao.com", "profile": { "nickname": "Kim" } }
    });

    let (erstes, token1) = u.bruecke.anmelden("kakao", &profil).await.unwrap();
    let (zweites, token2) = u.bruecke.anmelden("kakao", &profil).await.unwrap();

    assert_eq!(erstes.member_id, "kakao_4242");
    assert_eq!(erstes.id, zweites.id);
    assert_eq!(zweites.login_type, LoginTyp::Kakao);
    u.auth.aufrufer_pruefen("kakao_4242", &token1).unwrap();
    u.auth.aufrufer_pruefen("kakao_4242", &token2).unwrap();

    // Foederierte Konten haben kein nutzbares Passwort
    assert!(matches!(
        u.auth.anmelden("kakao_4242", "").await,
        Err(AuthError::PasswortFalsch)
    ));
}

#[tokio::test]
async fn aktuelles_mitglied_nach_anmeldung() {
    let u = umgebung().await;
    registrieren(&u, "gina", "rightpw123").await;
    let token = u.auth.anmelden("gina", "rightpw123").await.unwrap();

    let mitglied = u.auth.aktuelles_mitglied(&token).await.unwrap();
    assert_eq!(mitglied.member_id, "gina");
    assert_eq!(mitglied.phone_number.as_deref(), Some("01012345678"));
}
