//! Gemeinsame Domain-Typen fuer Marktplatz
//!
//! Rollen und Herkunftsarten sind geschlossene Mengen. Die String-Darstellung
//! (`CUSTOMER`, `KAKAO`, ...) ist die Form, in der die Werte in der Datenbank
//! und in Token-Claims stehen.

use serde::{Deserialize, Serialize};

/// Rolle eines Mitglieds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rolle {
    /// Kaeufer – Standardrolle, auch fuer alle foederierten Konten
    Customer,
    /// Verkaeufer
    Seller,
}

impl Rolle {
    pub fn als_str(&self) -> &'static str {
        match self {
            Self::Customer => "CUSTOMER",
            Self::Seller => "SELLER",
        }
    }
}

impl std::fmt::Display for Rolle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.als_str())
    }
}

impl std::str::FromStr for Rolle {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CUSTOMER" => Ok(Self::Customer),
            "SELLER" => Ok(Self::Seller),
            other => Err(format!("Unbekannte Rolle: {other}")),
        }
    }
}

/// Herkunft eines Kontos: lokal registriert oder ueber einen Login-Anbieter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoginTyp {
    /// Lokale Registrierung mit E-Mail-Verifizierung
    App,
    Kakao,
    Naver,
}

impl LoginTyp {
    pub fn als_str(&self) -> &'static str {
        match self {
            Self::App => "APP",
            Self::Kakao => "KAKAO",
            Self::Naver => "NAVER",
        }
    }

    /// Gibt `true` zurueck wenn das Konto von einem externen Anbieter stammt
    pub fn ist_foederiert(&self) -> bool {
        !matches!(self, Self::App)
    }
}

impl std::fmt::Display for LoginTyp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.als_str())
    }
}

impl std::str::FromStr for LoginTyp {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "APP" => Ok(Self::App),
            "KAKAO" => Ok(Self::Kakao),
            "NAVER" => Ok(Self::Naver),
            other => Err(format!("Unbekannter Login-Typ: {other}")),
        }
    }
}
