use clap::{Parser, Subcommand};
use rand::RngCore;
use redb::Database;
use rusqlite::Connection;
use shield_backend::config::Config;
use shield_backend::helper::account_helpers;
use shield_backend::helper::session_helpers::SessionIssuer;
use shield_backend::models::account_models::NewAccountRequest;
use shield_backend::models::db_operations::accounts_db_operations as accounts_db;
use shield_backend::models::Role;
use shield_backend::setup::{db_setup, seed};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use validator::Validate;

#[derive(Parser, Debug)]
#[command(name = "setup_cli", author, version, about = "Bootstrap utilities for the Shield Foundation backend.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the .env configuration file. Not needed for `secret generate`.
    #[arg(long, value_name = "FILE", global = true)]
    env_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    Secret {
        #[command(subcommand)]
        action: SecretAction,
    },
}

#[derive(Subcommand, Debug)]
enum DbAction {
    /// Create the stores. Pass `accounts` or `content` to set up only one.
    Setup { db_type: Option<String> },
    /// Load demo content into empty collections.
    Seed,
}

#[derive(Subcommand, Debug)]
enum AdminAction {
    Create {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = "super_admin")]
        role: String,
    },
    List,
    ChangePassword {
        #[arg(long)]
        username: String,
        #[arg(long)]
        new_password: String,
    },
}

#[derive(Subcommand, Debug)]
enum SecretAction {
    /// Print a fresh JWT_SECRET_KEY value.
    Generate,
}

fn main() {
    let cli = Cli::parse();

    if let Commands::Secret { action: SecretAction::Generate } = &cli.command {
        generate_secret();
        return;
    }

    let Some(env_file) = cli.env_file.as_deref() else {
        eprintln!("❌ Error: --env-file is required for this command.");
        process::exit(2);
    };
    let config = load_config(env_file);

    match &cli.command {
        Commands::Db { action } => match action {
            DbAction::Setup { db_type } => match db_type.as_deref() {
                Some("accounts") => setup_accounts_database(&config),
                Some("content") => setup_content_database(&config),
                Some(other) => eprintln!("❌ Error: Unknown database type '{}'. Use 'accounts' or 'content'.", other),
                None => {
                    setup_accounts_database(&config);
                    setup_content_database(&config);
                }
            },
            DbAction::Seed => seed_content(&config),
        },
        Commands::Admin { action } => match action {
            AdminAction::Create {
                username,
                password,
                email,
                name,
                role,
            } => create_admin(&config, username, password, email, name.as_deref(), role),
            AdminAction::List => list_admins(&config),
            AdminAction::ChangePassword { username, new_password } => {
                change_admin_password(&config, username, new_password)
            }
        },
        Commands::Secret { .. } => {}
    }
}

fn load_config(env_file: &Path) -> Config {
    match Config::from_env(env_file) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            process::exit(1);
        }
    }
}

fn generate_secret() {
    let mut bytes = [0u8; 64];
    rand::thread_rng().fill_bytes(&mut bytes);
    println!("JWT_SECRET_KEY={}", hex::encode(bytes));
}

fn ensure_parent_dir(path: &Path) -> bool {
    match path.parent().map(fs::create_dir_all) {
        Some(Err(e)) => {
            eprintln!("❌ Error: Could not create directory for '{}': {}", path.display(), e);
            false
        }
        _ => true,
    }
}

fn setup_accounts_database(config: &Config) {
    let db_path = config.accounts_db_path();
    println!("\nSetting up accounts database at '{}'...", db_path.display());
    if !ensure_parent_dir(&db_path) {
        return;
    }

    let mut conn = match Connection::open(&db_path) {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("❌ Error opening accounts database: {}", e);
            return;
        }
    };
    match db_setup::setup_accounts_db(&mut conn) {
        Ok(_) => println!("✅ Accounts database ready."),
        Err(e) => eprintln!("❌ Error setting up accounts database: {}", e),
    }
}

fn open_content_db(config: &Config) -> Option<Database> {
    let db_path = config.content_db_path();
    if !ensure_parent_dir(&db_path) {
        return None;
    }
    match Database::create(&db_path) {
        Ok(db) => Some(db),
        Err(e) => {
            eprintln!("❌ Error opening content database at '{}': {}", db_path.display(), e);
            None
        }
    }
}

fn setup_content_database(config: &Config) {
    println!("\nSetting up content database at '{}'...", config.content_db_path().display());
    let Some(db) = open_content_db(config) else {
        return;
    };
    match db_setup::setup_content_db(&db) {
        Ok(_) => println!("✅ Content database ready."),
        Err(e) => eprintln!("❌ Error setting up content database: {}", e),
    }
}

fn seed_content(config: &Config) {
    let Some(db) = open_content_db(config) else {
        return;
    };
    match seed::seed_demo_content(&db) {
        Ok(report) => {
            for (collection, count) in report {
                if count == 0 {
                    println!("ℹ️ '{}' already has content. Skipped.", collection);
                } else {
                    println!("- Seeded {} document(s) into '{}'", count, collection);
                }
            }
            println!("✅ Seeding finished.");
        }
        Err(e) => eprintln!("❌ Error seeding content: {}", e),
    }
}

fn open_accounts_db(config: &Config) -> Option<Connection> {
    let db_path = config.accounts_db_path();
    if !db_path.exists() {
        eprintln!(
            "❌ Error: Accounts database not found at '{}'. Please run `setup_cli db setup` first.",
            db_path.display()
        );
        return None;
    }
    match Connection::open(&db_path) {
        Ok(conn) => Some(conn),
        Err(e) => {
            eprintln!("❌ Error opening accounts database: {}", e);
            None
        }
    }
}

fn session_issuer(config: &Config) -> Option<SessionIssuer> {
    match SessionIssuer::from_config(config) {
        Ok(issuer) => Some(issuer),
        Err(e) => {
            eprintln!("❌ Error preparing password hashing: {}", e);
            None
        }
    }
}

fn create_admin(config: &Config, username: &str, password: &str, email: &str, name: Option<&str>, role: &str) {
    let role: Role = match role.parse() {
        Ok(role) => role,
        Err(e) => {
            eprintln!("❌ Error: {}. Use super_admin, admin, editor or viewer.", e);
            return;
        }
    };
    let request = NewAccountRequest {
        username: username.to_string(),
        name: name.unwrap_or(username).to_string(),
        email: email.to_string(),
        password: password.to_string(),
        role,
    };
    if let Err(e) = request.validate() {
        eprintln!("❌ Error: {}", shield_backend::error::describe_validation_errors(&e));
        return;
    }

    let (Some(conn), Some(issuer)) = (open_accounts_db(config), session_issuer(config)) else {
        return;
    };
    match account_helpers::create_account(&conn, &issuer, &request) {
        Ok(account) => println!("✅ Account '{}' created with role '{}'.", account.username, account.role),
        Err(e) => eprintln!("❌ Error creating account: {}", e),
    }
}

fn list_admins(config: &Config) {
    let Some(conn) = open_accounts_db(config) else {
        return;
    };
    match accounts_db::read_all_accounts(&conn) {
        Ok(accounts) => {
            println!("Listing accounts:");
            for account in accounts {
                let state = if account.is_active { "" } else { " (inactive)" };
                println!("- {} <{}> [{}]{}", account.username, account.email, account.role, state);
            }
        }
        Err(e) => eprintln!("❌ Error fetching accounts: {}", e),
    }
}

fn change_admin_password(config: &Config, username: &str, new_password: &str) {
    if new_password.len() < 6 {
        eprintln!("❌ Error: The new password must be at least 6 characters.");
        return;
    }
    let (Some(conn), Some(issuer)) = (open_accounts_db(config), session_issuer(config)) else {
        return;
    };

    let account = match accounts_db::read_account_by_username(&conn, username) {
        Ok(Some(account)) => account,
        Ok(None) => {
            eprintln!("❌ Error: No account named '{}' found.", username);
            return;
        }
        Err(e) => {
            eprintln!("❌ Error looking up account: {}", e);
            return;
        }
    };
    let password_hash = match issuer.hash_password(new_password) {
        Ok(hash) => hash,
        Err(e) => {
            eprintln!("❌ Error hashing password: {}", e);
            return;
        }
    };
    match accounts_db::update_password_hash(&conn, &account.id, &password_hash) {
        Ok(_) => println!("✅ Password for '{}' changed successfully.", username),
        Err(e) => eprintln!("❌ Error updating password: {}", e),
    }
}
