use crate::error::ApiError;
use crate::helper::session_helpers::SessionIssuer;
use crate::middleware::AuthenticatedAccount;
use crate::models::account_models::{
    Account, AccountChanges, AccountUpdateRequest, NewAccountRecord, NewAccountRequest, PasswordChangeRequest,
};
use crate::models::db_operations::accounts_db_operations as accounts_db;
use crate::DbPool;
use actix_web::web;
use bcrypt::BcryptError;
use rusqlite::Connection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Username already exists")]
    UsernameTaken,
    #[error("Email already exists")]
    EmailTaken,
    #[error("User not found")]
    NotFound,
    #[error("Not enough permissions")]
    Forbidden,
    #[error("You can only change your own password")]
    NotOwnPassword,
    #[error("Current password is incorrect")]
    IncorrectPassword,
    #[error("Cannot delete your own account")]
    SelfDeletion,
    #[error("Cannot delete the only super admin")]
    LastSuperAdmin,
    #[error("Rusqlite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("Bcrypt error: {0}")]
    Hash(#[from] BcryptError),
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::UsernameTaken | AccountError::EmailTaken => ApiError::Conflict(err.to_string()),
            AccountError::NotFound => ApiError::NotFound(err.to_string()),
            AccountError::Forbidden | AccountError::NotOwnPassword => ApiError::Forbidden(err.to_string()),
            AccountError::IncorrectPassword | AccountError::SelfDeletion | AccountError::LastSuperAdmin => {
                ApiError::BadRequest(err.to_string())
            }
            AccountError::Rusqlite(_) | AccountError::Pool(_) | AccountError::Hash(_) => {
                ApiError::internal("Account operation failed", err)
            }
        }
    }
}

/// Runs `f` with a pooled connection on the blocking thread pool.
pub async fn with_connection<T, F>(pool: web::Data<DbPool>, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, AccountError> + Send + 'static,
{
    web::block(move || -> Result<T, AccountError> {
        let conn = pool.get()?;
        f(&conn)
    })
    .await
    .map_err(|e| ApiError::internal("Account operation failed", e))?
    .map_err(ApiError::from)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn current_account(conn: &Connection, caller: &AuthenticatedAccount) -> Result<Account, AccountError> {
    accounts_db::read_account_by_id(conn, &caller.id)?.ok_or(AccountError::NotFound)
}

pub fn list_accounts(conn: &Connection) -> Result<Vec<Account>, AccountError> {
    Ok(accounts_db::read_all_accounts(conn)?)
}

pub fn create_account(
    conn: &Connection,
    issuer: &SessionIssuer,
    request: &NewAccountRequest,
) -> Result<Account, AccountError> {
    let username = request.username.trim();
    let email = normalize_email(&request.email);

    if accounts_db::username_exists(conn, username)? {
        return Err(AccountError::UsernameTaken);
    }
    if accounts_db::email_in_use(conn, &email, None)? {
        return Err(AccountError::EmailTaken);
    }

    let password_hash = issuer.hash_password(&request.password)?;
    let account = accounts_db::create_account(
        conn,
        &NewAccountRecord {
            username,
            name: request.name.trim(),
            email: &email,
            password_hash: &password_hash,
            role: request.role,
        },
    )?;
    Ok(account)
}

/// Super admins may change anything; other accounts may only edit their own
/// name and email. Other fields they send are ignored.
pub fn update_account(
    conn: &Connection,
    caller: &AuthenticatedAccount,
    target_id: &str,
    request: AccountUpdateRequest,
) -> Result<Account, AccountError> {
    if !caller.is_super_admin() && caller.id != target_id {
        return Err(AccountError::Forbidden);
    }
    if accounts_db::read_account_by_id(conn, target_id)?.is_none() {
        return Err(AccountError::NotFound);
    }

    let mut changes = AccountChanges {
        name: request.name.map(|n| n.trim().to_string()),
        email: request.email.as_deref().map(normalize_email),
        role: request.role,
        is_active: request.is_active,
    };
    if !caller.is_super_admin() {
        changes.role = None;
        changes.is_active = None;
    }

    if let Some(email) = &changes.email {
        if accounts_db::email_in_use(conn, email, Some(target_id))? {
            return Err(AccountError::EmailTaken);
        }
    }

    accounts_db::update_account(conn, target_id, &changes)?;
    accounts_db::read_account_by_id(conn, target_id)?.ok_or(AccountError::NotFound)
}

pub fn change_password(
    conn: &Connection,
    issuer: &SessionIssuer,
    caller: &AuthenticatedAccount,
    target_id: &str,
    request: &PasswordChangeRequest,
) -> Result<(), AccountError> {
    if caller.id != target_id {
        return Err(AccountError::NotOwnPassword);
    }

    let current_hash = accounts_db::read_password_hash(conn, target_id)?.ok_or(AccountError::NotFound)?;
    if !issuer.verify_password(&request.current_password, &current_hash) {
        return Err(AccountError::IncorrectPassword);
    }

    let new_hash = issuer.hash_password(&request.new_password)?;
    accounts_db::update_password_hash(conn, target_id, &new_hash)?;
    Ok(())
}

/// Returns the removed account.
pub fn delete_account(
    conn: &Connection,
    caller: &AuthenticatedAccount,
    target_id: &str,
) -> Result<Account, AccountError> {
    if caller.id == target_id {
        return Err(AccountError::SelfDeletion);
    }

    let target = accounts_db::read_account_by_id(conn, target_id)?.ok_or(AccountError::NotFound)?;
    if accounts_db::delete_account_keeping_super_admin(conn, target_id)? == 0 {
        // Either the last super admin, or removed by someone else meanwhile.
        return Err(match accounts_db::read_account_by_id(conn, target_id)? {
            Some(_) => AccountError::LastSuperAdmin,
            None => AccountError::NotFound,
        });
    }
    Ok(target)
}
