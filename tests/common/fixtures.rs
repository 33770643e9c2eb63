//! Shared stores, accounts and tokens for the HTTP tests
#![allow(dead_code)]

use actix_web::web;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use redb::Database;
use shield_backend::helper::session_helpers::SessionIssuer;
use shield_backend::models::account_models::{Account, NewAccountRecord};
use shield_backend::models::db_operations::accounts_db_operations as accounts_db;
use shield_backend::models::Role;
use shield_backend::setup::db_setup;
use shield_backend::DbPool;
use tempfile::TempDir;

pub const TEST_PASSWORD: &str = "secret-pass";

/// Fresh stores in a temporary directory, removed on drop.
pub struct TestContext {
    _dir: TempDir,
    pub db: web::Data<Database>,
    pub pool: web::Data<DbPool>,
    pub issuer: web::Data<SessionIssuer>,
}

impl TestContext {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();

        let db = Database::create(dir.path().join("content.redb")).unwrap();
        db_setup::setup_content_db(&db).unwrap();

        let manager = SqliteConnectionManager::file(dir.path().join("accounts.db"));
        let pool = Pool::builder().max_size(4).build(manager).unwrap();
        {
            let mut conn = pool.get().unwrap();
            db_setup::setup_accounts_db(&mut conn).unwrap();
        }

        TestContext {
            _dir: dir,
            db: web::Data::new(db),
            pool: web::Data::new(pool),
            issuer: web::Data::new(SessionIssuer::new(&[9u8; 64], 60, 4).unwrap()),
        }
    }

    pub fn create_account(&self, username: &str, role: Role) -> Account {
        let conn = self.pool.get().unwrap();
        let password_hash = self.issuer.hash_password(TEST_PASSWORD).unwrap();
        let email = format!("{}@example.org", username);
        accounts_db::create_account(
            &conn,
            &NewAccountRecord {
                username,
                name: username,
                email: &email,
                password_hash: &password_hash,
                role,
            },
        )
        .unwrap()
    }

    pub fn token_for(&self, account: &Account) -> String {
        self.issuer.issue_token(&account.id, &account.username, account.role).unwrap()
    }

    /// Creates an account and returns it with a bearer header value.
    pub fn login_as(&self, username: &str, role: Role) -> (Account, String) {
        let account = self.create_account(username, role);
        let bearer = format!("Bearer {}", self.token_for(&account));
        (account, bearer)
    }
}

/// Builds the full API service around a [`TestContext`].
macro_rules! init_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($ctx.db.clone())
                .app_data($ctx.pool.clone())
                .app_data($ctx.issuer.clone())
                .configure(shield_backend::routes::config_api),
        )
        .await
    };
}
