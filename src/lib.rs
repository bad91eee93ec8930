//! Command-line, environment, and config-file resolution for the pgbackrest
//! backup utility. Hand it the argument vector, get back a fully validated,
//! typed, immutable [`Config`].
//!
//! ```ignore
//! let config = pgbackrest_config::parse(&argv, true)?;
//! if config.option_bool(OptionId::Delta) == Some(true) { ... }
//! ```
//!
//! # Why a rule table
//!
//! The option vocabulary here is too structured for an argument-parsing
//! framework: options carry per-command defaults and allow-lists, validity
//! depends on the `(command, role)` pair, some options exist only on the
//! command line while others belong to a stanza, and whole families of
//! options are addressed by sparse numeric keys (`pg1-path`, `pg7-path`,
//! `repo3-bucket`). All of that lives in one static rule table; every phase
//! of the engine (argv walking, environment import, config-file merging,
//! validation) is driven from it.
//! Adding an option means adding a table row, and the command line, the
//! environment mapping, the config sections, and the validation all pick it
//! up automatically.
//!
//! # Layer precedence
//!
//! ```text
//! Rule-table defaults   per-(command, option) Default records
//!        ↑ overridden by
//! Config files          [stanza:command] > [stanza] > [global:command] > [global]
//!        ↑ overridden by
//! Environment           PGBACKREST_UPPER_NAME
//!        ↑ overridden by
//! Command line          --name, --name=value, --no-name, --reset-name
//! ```
//!
//! Every layer is sparse: a source only claims the slots it names, and a slot
//! claimed once is never overwritten by a weaker source. Provenance is kept
//! per value ([`Source`]) because it changes behaviour: a value that fails
//! its dependency check is a hard error when it came from the command line
//! but silently ignored when it came from a config file, which may legally
//! hold options for other commands.
//!
//! # Key-indexed option groups
//!
//! Options in the `pg` and `repo` groups take a 1-based key embedded in the
//! name: `--pg7-path` is key 7 of `pg-path`. Keys may be sparse; the engine
//! builds a dense index map per group (`indexMap = [1, 3]` for keys 1 and 3)
//! and the un-indexed accessors read the group's default index, selectable
//! with `--pg`/`--repo`. Diagnostics always render the user's spelling, never
//! the internal index.
//!
//! # Files
//!
//! Config files are INI. The main file and the `*.conf` entries of the
//! include directory are concatenated before merging; `--config`,
//! `--config-path`, and `--config-include-path` rearrange what loads and
//! which pieces must exist. Missing optional files are silent; missing
//! explicitly-requested files abort.
//!
//! # Errors and warnings
//!
//! Everything fatal is a [`ConfigError`] naming the offending option in its
//! user-visible form. Recognised-but-misused entries from weaker sources
//! (an unknown key in a config file, a negate spelling in the environment)
//! are logged as warnings through `tracing` and dropped, except on the
//! `local` and `remote` worker roles, which stay quiet.

pub mod error;

mod argv;
mod config;
mod env;
mod file;
mod group;
mod ini;
mod merge;
mod parse;
mod parsed;
mod resolve;
mod rules;
mod storage;
mod tables;
mod value;

#[cfg(test)]
mod fixtures;

pub use config::{Config, ConfigGroup, ConfigOptionValue};
pub use error::ConfigError;
pub use parse::{parse, parse_with};
pub use parsed::Source;
pub use storage::{LocalStorage, Storage};
pub use tables::{CommandId, CommandRole, GroupId, OptionId};
pub use value::Value;
