//! Account command CLI definitions

use clap::Subcommand;

use super::core::OutputFormat;

#[derive(Subcommand)]
pub enum AccountCommand {
    /// Create an account with the starting balance
    Create {
        /// Username (surrounding whitespace is ignored)
        username: String,

        /// Password for the new account
        #[arg(long, env = "GACHA_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// List all accounts
    List {
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Show balance, pity and collection size
    Show {
        /// Account username
        username: String,
    },

    /// Delete an account and everything it owns (admin only)
    Delete {
        /// Account username
        username: String,

        /// Admin password
        #[arg(long, env = "GACHA_ADMIN_PASSWORD", hide_env_values = true)]
        admin_password: String,
    },

    /// Show database statistics
    Stats,
}
