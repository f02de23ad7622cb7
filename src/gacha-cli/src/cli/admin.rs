//! Admin command CLI definitions

use clap::Subcommand;

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Add currency to an account
    Credit {
        /// Account username
        username: String,

        /// Amount to add (must be positive)
        amount: u64,
    },

    /// Change the shared admin password
    SetPassword {
        /// New admin password (at least 4 characters)
        new_password: String,
    },
}
