//! # mediadex-admin
//!
//! Administrative command surface for mediadex.
//!
//! Maps status/report/search/pattern/cleanup commands 1:1 onto the
//! federated index operations, gates destructive operations behind an
//! explicit confirmation, and checks callers against the admin allowlist.
//! The `mediadex-admin` binary wraps the console in an interactive stdin
//! loop for operators.

pub mod commands;
pub mod console;

pub use commands::{AdminCommand, AdminList, AutoDeleteCommand, HELP_TEXT};
pub use console::{AdminConsole, AutoDeleteControls};
