//! Console logging setup
//!
//! Every line is `[timestamp] message`, with the message colored by level.
//! Success messages are info records on the [`SUCCESS_TARGET`] target and
//! are printed in green.

use anyhow::Result;
use colored::*;
use is_terminal::IsTerminal;
use log::Level;
use std::io::Write;

/// Log target used by [`success!`](crate::success)
pub const SUCCESS_TARGET: &str = "success";

/// Log an info message that marks a completed step
#[macro_export]
macro_rules! success {
    ($($arg:tt)+) => {
        log::info!(target: $crate::logging::SUCCESS_TARGET, $($arg)+)
    };
}

/// Install the global logger
///
/// `RUST_LOG` overrides the level chosen from `verbose`.
pub fn init(verbose: bool, no_color: bool) -> Result<()> {
    if no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let default_filter = if verbose {
        "info,panelapp_cli=debug"
    } else {
        "info"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
            writeln!(
                buf,
                "{} {}",
                format!("[{}]", timestamp).blue(),
                colorize(record.level(), record.target(), &record.args().to_string())
            )
        })
        .try_init()?;

    Ok(())
}

fn colorize(level: Level, target: &str, message: &str) -> ColoredString {
    match level {
        Level::Error => message.red(),
        Level::Warn => message.yellow(),
        Level::Info if target == SUCCESS_TARGET => message.green(),
        Level::Info => message.blue(),
        Level::Debug | Level::Trace => message.dimmed(),
    }
}
