//! # tcn-cli — Operator CLI for the Talent Credentials Network
//!
//! Provides the `tcn` command-line interface. Every credential command opens
//! the ledger snapshot named by `--ledger`, runs one registry operation as
//! the organization named by `--org`, and prints the result as JSON. Writes
//! are persisted to the snapshot immediately.
//!
//! ## Subcommands
//!
//! - `tcn init` — Write the sample credentials.
//! - `tcn create academic|professional` — Issue a credential.
//! - `tcn get`, `tcn list` — Read credentials.
//! - `tcn approve`, `tcn revoke` — Change verification status.
//! - `tcn skills`, `tcn name` — Update holder data.
//! - `tcn delete` — Remove a credential.
//! - `tcn gen-args` — Generate bulk academic creation arguments.
//!
//! ```bash
//! tcn --ledger ledger.json create academic c1 t1 Ann Lee "Go" "BSc CS" "X Univ"
//! tcn --ledger ledger.json approve c1 --verified-by "X Univ"
//! tcn --ledger ledger.json list --talent t1
//! ```

pub mod credential;
pub mod gen_args;

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

/// Pretty-print `value` as JSON followed by a newline.
pub fn print_json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render JSON output")?;
    writeln!(out, "{rendered}").context("failed to write output")?;
    Ok(())
}
