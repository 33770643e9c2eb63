use crate::models::account_models::{Account, AccountChanges, AccountCredentials, NewAccountRecord};
use crate::models::Role;
use chrono::Utc;
use rusqlite::{params, Connection, Error as RusqliteError, OptionalExtension, Row};
use uuid::Uuid;

/// Name of the credential table; also how the collection browser labels it.
pub const ADMIN_USERS: &str = "admin_users";

const ACCOUNT_COLUMNS: &str =
    "id, username, name, email, role, is_active, created_at, updated_at, last_login";

fn account_from_row(row: &Row) -> Result<Account, RusqliteError> {
    Ok(Account {
        id: row.get(0)?,
        username: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        role: row.get(4)?,
        is_active: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
        last_login: row.get(8)?,
    })
}

pub fn create_account(conn: &Connection, record: &NewAccountRecord) -> Result<Account, RusqliteError> {
    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO admin_users (id, username, name, email, password_hash, role, is_active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7)",
        params![
            id,
            record.username,
            record.name,
            record.email,
            record.password_hash,
            record.role,
            Utc::now()
        ],
    )?;
    read_account_by_id(conn, &id)?.ok_or(RusqliteError::QueryReturnedNoRows)
}

pub fn read_all_accounts(conn: &Connection) -> Result<Vec<Account>, RusqliteError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM admin_users ORDER BY created_at",
        ACCOUNT_COLUMNS
    ))?;
    let accounts = stmt
        .query_map([], account_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(accounts)
}

pub fn read_account_by_id(conn: &Connection, id: &str) -> Result<Option<Account>, RusqliteError> {
    conn.query_row(
        &format!("SELECT {} FROM admin_users WHERE id = ?1", ACCOUNT_COLUMNS),
        [id],
        account_from_row,
    )
    .optional()
}

pub fn read_account_by_username(conn: &Connection, username: &str) -> Result<Option<Account>, RusqliteError> {
    conn.query_row(
        &format!("SELECT {} FROM admin_users WHERE username = ?1", ACCOUNT_COLUMNS),
        [username],
        account_from_row,
    )
    .optional()
}

pub fn read_credentials_by_username(
    conn: &Connection,
    username: &str,
) -> Result<Option<AccountCredentials>, RusqliteError> {
    conn.query_row(
        &format!(
            "SELECT {}, password_hash FROM admin_users WHERE username = ?1",
            ACCOUNT_COLUMNS
        ),
        [username],
        |row| {
            Ok(AccountCredentials {
                account: account_from_row(row)?,
                password_hash: row.get(9)?,
            })
        },
    )
    .optional()
}

pub fn read_password_hash(conn: &Connection, id: &str) -> Result<Option<String>, RusqliteError> {
    conn.query_row(
        "SELECT password_hash FROM admin_users WHERE id = ?1",
        [id],
        |row| row.get(0),
    )
    .optional()
}

pub fn username_exists(conn: &Connection, username: &str) -> Result<bool, RusqliteError> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM admin_users WHERE username = ?1)",
        [username],
        |row| row.get(0),
    )
}

/// True when another account (not `excluding_id`) already uses `email`.
pub fn email_in_use(conn: &Connection, email: &str, excluding_id: Option<&str>) -> Result<bool, RusqliteError> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM admin_users WHERE lower(email) = lower(?1) AND id != COALESCE(?2, ''))",
        params![email, excluding_id],
        |row| row.get(0),
    )
}

/// Applies the non-empty fields of `changes`. Returns the number of rows touched.
pub fn update_account(conn: &Connection, id: &str, changes: &AccountChanges) -> Result<usize, RusqliteError> {
    conn.execute(
        "UPDATE admin_users SET
            name = COALESCE(?1, name),
            email = COALESCE(?2, email),
            role = COALESCE(?3, role),
            is_active = COALESCE(?4, is_active),
            updated_at = ?5
         WHERE id = ?6",
        params![
            changes.name,
            changes.email,
            changes.role,
            changes.is_active,
            Utc::now(),
            id
        ],
    )
}

pub fn update_password_hash(conn: &Connection, id: &str, password_hash: &str) -> Result<usize, RusqliteError> {
    conn.execute(
        "UPDATE admin_users SET password_hash = ?1, updated_at = ?2 WHERE id = ?3",
        params![password_hash, Utc::now(), id],
    )
}

pub fn update_last_login(conn: &Connection, id: &str) -> Result<usize, RusqliteError> {
    conn.execute(
        "UPDATE admin_users SET last_login = ?1 WHERE id = ?2",
        params![Utc::now(), id],
    )
}

/// Deletes the account unless it is the only super admin. The count and the
/// delete run as one statement, so concurrent deletions cannot both pass.
pub fn delete_account_keeping_super_admin(conn: &Connection, id: &str) -> Result<usize, RusqliteError> {
    conn.execute(
        "DELETE FROM admin_users
         WHERE id = ?1
           AND (role != ?2 OR (SELECT COUNT(*) FROM admin_users WHERE role = ?2) > 1)",
        params![id, Role::SuperAdmin],
    )
}

pub fn count_accounts_with_role(conn: &Connection, role: Role) -> Result<i64, RusqliteError> {
    conn.query_row(
        "SELECT COUNT(*) FROM admin_users WHERE role = ?1",
        [role],
        |row| row.get(0),
    )
}

pub fn count_accounts(conn: &Connection) -> Result<i64, RusqliteError> {
    conn.query_row("SELECT COUNT(*) FROM admin_users", [], |row| row.get(0))
}
