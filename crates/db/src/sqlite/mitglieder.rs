//! SQLite-Implementierung des MitgliedRepository

use chrono::Utc;
use sqlx::Row as _;

use crate::error::DbError;
use crate::models::{MitgliedRecord, NeuesMitglied};
use crate::repository::{DbResult, MitgliedRepository};
use crate::sqlite::pool::SqliteDb;

const SPALTEN: &str = "id, member_id, member_name, email, password_hash, phone_number, \
                       address, role, login_type, created_at";

impl MitgliedRepository for SqliteDb {
    async fn exists(&self, member_id: &str) -> DbResult<bool> {
        let anzahl: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE member_id = ?")
            .bind(member_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(anzahl > 0)
    }

    async fn create(&self, data: NeuesMitglied<'_>) -> DbResult<MitgliedRecord> {
        let now = Utc::now();

        let ergebnis = sqlx::query(
            "INSERT INTO members (member_id, member_name, email, password_hash, phone_number,
                                  address, role, login_type, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(data.member_id)
        .bind(data.member_name)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.phone_number)
        .bind(data.address)
        .bind(data.role.als_str())
        .bind(data.login_type.als_str())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                DbError::Eindeutigkeit(format!("Mitglied '{}' bereits vorhanden", data.member_id))
            }
            other => DbError::Sqlx(other),
        })?;

        Ok(MitgliedRecord {
            id: ergebnis.last_insert_rowid(),
            member_id: data.member_id.to_string(),
            member_name: data.member_name.to_string(),
            email: data.email.to_string(),
            password_hash: data.password_hash.to_string(),
            phone_number: data.phone_number.map(str::to_string),
            address: data.address.map(str::to_string),
            role: data.role,
            login_type: data.login_type,
            created_at: now,
        })
    }

    async fn get_by_member_id(&self, member_id: &str) -> DbResult<Option<MitgliedRecord>> {
        let sql = format!("SELECT {SPALTEN} FROM members WHERE member_id = ?");
        let row = sqlx::query(&sql)
            .bind(member_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_mitglied(&r)).transpose()
    }
}

fn row_to_mitglied(row: &sqlx::sqlite::SqliteRow) -> DbResult<MitgliedRecord> {
    let created_at_str: String = row.try_get("created_at")?;
    let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| DbError::intern(format!("Ungueltige created_at '{created_at_str}': {e}")))?
        .with_timezone(&Utc);

    let role_str: String = row.try_get("role")?;
    let role = role_str.parse().map_err(DbError::UngueltigeDaten)?;

    let login_type_str: String = row.try_get("login_type")?;
    let login_type = login_type_str.parse().map_err(DbError::UngueltigeDaten)?;

    Ok(MitgliedRecord {
        id: row.try_get("id")?,
        member_id: row.try_get("member_id")?,
        member_name: row.try_get("member_name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        phone_number: row.try_get("phone_number")?,
        address: row.try_get("address")?,
        role,
        login_type,
        created_at,
    })
}
