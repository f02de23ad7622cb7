//! Command handlers for gacha CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod account;
pub mod admin;
pub mod catalog;
pub mod collection;
pub mod configure;
pub mod history;
pub mod pull;
pub mod simulate;

use gacha::PullResult;

/// One pull as a display line, e.g. `★★★★★ Aiko`
pub fn format_pull(result: &PullResult) -> String {
    let mut line = format!("{:<5} {}", result.item.stars(), result.item.name);
    if result.guaranteed {
        line.push_str(" (pity)");
    }
    line
}

#[cfg(test)]
pub(crate) fn test_context(dir: &std::path::Path) -> crate::dispatch::Context {
    crate::dispatch::Context::with_config(
        crate::config::Config::default(),
        Some(dir.join("gacha.db")),
        None,
    )
}
