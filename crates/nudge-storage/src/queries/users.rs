// SPDX-FileCopyrightText: 2026 Nudge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity resolver: map an external credential to an internal user record.

use nudge_core::NudgeError;
use rusqlite::params;

use crate::database::Database;
use crate::models::User;

/// Create a new user.
///
/// Users are normally managed by an external editor; this primitive is the
/// store operation such an editor writes through.
pub async fn create_user(db: &Database, user: &User) -> Result<(), NudgeError> {
    let user = user.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (id, chat_id, phone, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![user.id, user.chat_id, user.phone, user.created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Resolve a user by exactly one external credential.
///
/// Supplying neither or both selectors is a caller usage error and fails
/// before any store access. Lookup is exact-match on the opaque credential
/// string; no normalization is applied. A missing user is `Ok(None)`, not an
/// error.
pub async fn resolve_user(
    db: &Database,
    chat_id: Option<&str>,
    phone: Option<&str>,
) -> Result<Option<User>, NudgeError> {
    let (sql, credential) = match (chat_id, phone) {
        (Some(chat_id), None) => (
            "SELECT id, chat_id, phone, created_at FROM users WHERE chat_id = ?1",
            chat_id.to_string(),
        ),
        (None, Some(phone)) => (
            "SELECT id, chat_id, phone, created_at FROM users WHERE phone = ?1",
            phone.to_string(),
        ),
        (None, None) => {
            return Err(NudgeError::InvalidArgument(
                "either chat_id or phone must be provided".to_string(),
            ));
        }
        (Some(_), Some(_)) => {
            return Err(NudgeError::InvalidArgument(
                "provide exactly one of chat_id or phone, not both".to_string(),
            ));
        }
    };

    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(sql)?;
            let result = stmt.query_row(params![credential], |row| {
                Ok(User {
                    id: row.get(0)?,
                    chat_id: row.get(1)?,
                    phone: row.get(2)?,
                    created_at: row.get(3)?,
                })
            });
            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}
