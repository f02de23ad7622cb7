//! Account storage for the gacha engine
//!
//! This library provides a trait-based abstraction for account persistence
//! plus the credential and session layer around it.
//!
//! - [`AccountsRepository`] / [`AdminRepository`] - storage traits
//! - [`SqliteDb`] - rusqlite backend, also usable as a [`gacha::AccountStore`]
//! - [`auth`] - password digests and username rules
//! - [`session`] - request-scoped player and admin identities
//!
//! # Example
//!
//! ```no_run
//! use gacha::{Gacha, GachaConfig, PullCount, RngSource};
//! use gacha_store::{session, AccountsRepository, SqliteDb};
//!
//! let db = SqliteDb::open("gacha.db").unwrap();
//! db.init().unwrap();
//! db.create_account("alice", "hunter2", 500).unwrap();
//!
//! let player = session::login(&db, "alice", "hunter2").unwrap();
//! let gacha = Gacha::new(GachaConfig::default(), &db).unwrap();
//! let results = session::pull(&gacha, &player, PullCount::Single, &mut RngSource::from_entropy());
//! ```

pub mod auth;
pub mod repository;
pub mod session;
pub mod sqlite;
pub mod types;

// Re-export types
pub use types::*;

// Re-export repository traits
pub use repository::{AccountsRepository, AdminRepository, RepoError, RepoResult};

pub use session::{AdminSession, PlayerSession};

// Re-export implementations
pub use sqlite::{SqliteDb, DEFAULT_DB_PATH};
