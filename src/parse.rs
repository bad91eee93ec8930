//! The entry point: runs the phases in order over one argument vector.
//!
//! 1. Command line (fatal errors only).
//! 2. Environment (fills slots argv left unset).
//! 3. Config file load and section merge (fills slots still unset).
//! 4. Option validity and group index resolution.
//! 5. Materialisation into the typed [`Config`].
//!
//! `help` and `version` short-circuit after phase 1: nothing else needs to be
//! valid to print a help page.

use crate::argv;
use crate::config::Config;
use crate::env;
use crate::error::ConfigError;
use crate::file;
use crate::group;
use crate::merge;
use crate::resolve;
use crate::rules;
use crate::storage::{LocalStorage, Storage};
use crate::tables::{
    CommandId, CommandRole, OptionId, CONFIG_FILE_DEFAULT, CONFIG_INCLUDE_PATH_DEFAULT,
    CONFIG_ORIG_DEFAULT,
};

/// Parse the full configuration from the argument vector, the process
/// environment, and the config files on local storage.
///
/// With `reset_log_level` set, warnings about misused environment and
/// config-file entries are emitted for user-facing roles; workers (`local`,
/// `remote`) stay quiet either way.
pub fn parse(argv: &[String], reset_log_level: bool) -> Result<Config, ConfigError> {
    let env_vars: Vec<(String, String)> = std::env::vars().collect();
    parse_with(argv, &env_vars, &LocalStorage, reset_log_level)
}

/// Like [`parse`] but with injected environment pairs and storage, so the
/// whole pipeline can run against synthetic inputs.
pub fn parse_with(
    argv: &[String],
    env_vars: &[(String, String)],
    storage: &dyn Storage,
    reset_log_level: bool,
) -> Result<Config, ConfigError> {
    let line = argv::parse_command_line(argv)?;
    let warn =
        reset_log_level && !matches!(line.role, CommandRole::Local | CommandRole::Remote);

    let mut config = Config::new(line.exe, line.command, line.role, line.help, line.params);

    let Some(command) = line.command else {
        return Ok(config);
    };
    if command == CommandId::Help || command == CommandId::Version {
        return Ok(config);
    }

    let mut options = line.options;

    env::apply(
        env_vars.iter().cloned(),
        &mut options,
        command,
        line.role,
        warn,
    )?;

    let config_default =
        rules::option_default(command, OptionId::Config).unwrap_or(CONFIG_FILE_DEFAULT);
    let include_default = rules::option_default(command, OptionId::ConfigIncludePath)
        .unwrap_or(CONFIG_INCLUDE_PATH_DEFAULT);

    if let Some(text) = file::load(
        &options,
        storage,
        config_default,
        include_default,
        CONFIG_ORIG_DEFAULT,
    )? {
        merge::apply(&text, &mut options, command, line.role, warn)?;
    }

    group::resolve(&mut config, &options, command, line.role)?;
    resolve::materialise(&mut config, &options, command)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::MemoryStorage;
    use crate::parsed::Source;
    use crate::tables::{GroupId, OPTION_TOTAL};

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    fn parse_clean(list: &[&str]) -> Result<Config, ConfigError> {
        parse_with(&args(list), &[], &MemoryStorage::new(), true)
    }

    #[test]
    fn stanza_from_argv() {
        let config = parse_clean(&["pgbackrest", "--stanza=demo", "backup"]).unwrap();
        assert_eq!(config.command(), Some(CommandId::Backup));
        assert_eq!(config.command_role(), CommandRole::Default);
        assert_eq!(config.option_idx_str(OptionId::Stanza, 0), Some("demo"));
        assert_eq!(config.option_source(OptionId::Stanza), Source::Param);
    }

    #[test]
    fn sparse_pg_keys_map_to_dense_indexes() {
        let config = parse_clean(&[
            "pgbackrest",
            "--stanza=demo",
            "--pg1-path=/db",
            "--pg3-path=/alt",
            "backup",
        ])
        .unwrap();

        let group = config.group(GroupId::Pg);
        assert_eq!(group.index_total, 2);
        assert_eq!(config.group_idx_to_key(GroupId::Pg, 0), 1);
        assert_eq!(config.group_idx_to_key(GroupId::Pg, 1), 3);
        assert_eq!(config.option_idx_str(OptionId::PgPath, 0), Some("/db"));
        assert_eq!(config.option_idx_str(OptionId::PgPath, 1), Some("/alt"));
    }

    #[test]
    fn no_config_with_stanza_from_env() {
        let storage =
            MemoryStorage::new().file(CONFIG_FILE_DEFAULT, "[global]\nbuffer-size=64kb\n");
        let config = parse_with(
            &args(&["pgbackrest", "--no-config", "backup"]),
            &env(&[("PGBACKREST_STANZA", "demo")]),
            &storage,
            true,
        )
        .unwrap();

        assert_eq!(config.option_str(OptionId::Stanza), Some("demo"));
        assert_eq!(config.option_source(OptionId::Stanza), Source::Config);
        // The config file was skipped, so buffer-size keeps its default.
        assert_eq!(config.option_int(OptionId::BufferSize), Some(1_048_576));
    }

    #[test]
    fn stanza_required_even_when_config_has_stanza_sections() {
        let storage =
            MemoryStorage::new().file(CONFIG_FILE_DEFAULT, "[demo]\npg1-path=/other\n");
        let err = parse_with(
            &args(&["pgbackrest", "--pg1-path=/db", "backup"]),
            &[],
            &storage,
            true,
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "backup command requires option: stanza");
    }

    #[test]
    fn size_out_of_range() {
        let err = parse_clean(&[
            "pgbackrest",
            "--stanza=demo",
            "--buffer-size=7kb",
            "backup",
        ])
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "'7kb' is out of range for 'buffer-size' option"
        );
    }

    #[test]
    fn secure_option_on_command_line() {
        let err = parse_clean(&[
            "pgbackrest",
            "--stanza=demo",
            "--repo-cipher-pass=secret",
            "backup",
        ])
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("option 'repo-cipher-pass' is not allowed on the command-line"));
        assert!(msg.contains("configuration file or an environment variable"));
    }

    #[test]
    fn duplicate_aliases_in_config_section() {
        let storage = MemoryStorage::new().file(
            CONFIG_FILE_DEFAULT,
            "[global]\npg1-path=/a\ndb-path=/a\n",
        );
        let err = parse_with(
            &args(&["pgbackrest", "--stanza=demo", "backup"]),
            &[],
            &storage,
            true,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration file contains duplicate options ('db-path', 'pg1-path') \
             in section '[global]'"
        );
    }

    // --- precedence and equivalence ---

    #[test]
    fn argv_beats_env_and_config() {
        let storage =
            MemoryStorage::new().file(CONFIG_FILE_DEFAULT, "[global]\nprocess-max=2\n");
        let config = parse_with(
            &args(&["pgbackrest", "--stanza=demo", "--process-max=8", "backup"]),
            &env(&[("PGBACKREST_PROCESS_MAX", "4")]),
            &storage,
            true,
        )
        .unwrap();

        assert_eq!(config.option_int(OptionId::ProcessMax), Some(8));
        assert_eq!(config.option_source(OptionId::ProcessMax), Source::Param);
    }

    #[test]
    fn env_beats_config() {
        let storage =
            MemoryStorage::new().file(CONFIG_FILE_DEFAULT, "[global]\nprocess-max=2\n");
        let config = parse_with(
            &args(&["pgbackrest", "--stanza=demo", "backup"]),
            &env(&[("PGBACKREST_PROCESS_MAX", "4")]),
            &storage,
            true,
        )
        .unwrap();
        assert_eq!(config.option_int(OptionId::ProcessMax), Some(4));
    }

    #[test]
    fn env_boolean_materialises_like_argv_flag() {
        let via_argv =
            parse_clean(&["pgbackrest", "--stanza=demo", "--delta", "backup"]).unwrap();
        let via_env = parse_with(
            &args(&["pgbackrest", "--stanza=demo", "backup"]),
            &env(&[("PGBACKREST_DELTA", "y")]),
            &MemoryStorage::new(),
            true,
        )
        .unwrap();

        assert_eq!(
            via_argv.option_bool(OptionId::Delta),
            via_env.option_bool(OptionId::Delta)
        );
        assert_eq!(via_argv.option_source(OptionId::Delta), Source::Param);
        assert_eq!(via_env.option_source(OptionId::Delta), Source::Config);
    }

    #[test]
    fn stanza_command_section_wins_over_global() {
        let storage = MemoryStorage::new().file(
            CONFIG_FILE_DEFAULT,
            "[global]\nprocess-max=2\n\n[demo:backup]\nprocess-max=6\n",
        );
        let config = parse_with(
            &args(&["pgbackrest", "--stanza=demo", "backup"]),
            &[],
            &storage,
            true,
        )
        .unwrap();
        assert_eq!(config.option_int(OptionId::ProcessMax), Some(6));
    }

    #[test]
    fn include_dir_supplies_options() {
        let storage = MemoryStorage::new()
            .file(CONFIG_FILE_DEFAULT, "[global]\nprocess-max=2\n")
            .file(
                "/etc/pgbackrest/conf.d/10-tuning.conf",
                "[global]\nbuffer-size=64kb\n",
            );
        let config = parse_with(
            &args(&["pgbackrest", "--stanza=demo", "backup"]),
            &[],
            &storage,
            true,
        )
        .unwrap();
        assert_eq!(config.option_int(OptionId::ProcessMax), Some(2));
        assert_eq!(config.option_int(OptionId::BufferSize), Some(65536));
    }

    // --- short circuits ---

    #[test]
    fn version_skips_option_resolution() {
        let config = parse_with(
            &args(&["pgbackrest", "version"]),
            &env(&[("PGBACKREST_DELTA", "broken")]),
            &MemoryStorage::new(),
            true,
        )
        .unwrap();
        assert_eq!(config.command(), Some(CommandId::Version));
        assert!(!config.option_valid(OptionId::Delta));
    }

    #[test]
    fn bare_invocation_is_help() {
        let config = parse_clean(&["pgbackrest"]).unwrap();
        assert!(config.help());
        assert_eq!(config.command(), None);
    }

    #[test]
    fn help_for_command_materialises_without_required() {
        let config = parse_clean(&["pgbackrest", "help", "backup"]).unwrap();
        assert!(config.help());
        assert_eq!(config.command(), Some(CommandId::Backup));
        // Options resolve (defaults apply) but required ones are not enforced.
        assert_eq!(config.option_int(OptionId::BufferSize), Some(1_048_576));
        assert!(!config.option_test(OptionId::Stanza));
    }

    // --- universal invariants ---

    #[test]
    fn index_lengths_match_group_totals() {
        let config = parse_clean(&[
            "pgbackrest",
            "--stanza=demo",
            "--pg1-path=/db",
            "--pg4-path=/alt",
            "--repo2-path=/r",
            "backup",
        ])
        .unwrap();

        for id in OptionId::ALL {
            if !config.option_valid(id) {
                continue;
            }
            let expected = match crate::rules::option_rule(id).group {
                Some(group) => config.group_idx_total(group),
                None => 1,
            };
            let mut len = 0;
            while config.option_idx(id, len).is_some() {
                len += 1;
            }
            assert_eq!(len, expected, "index length for {:?}", id);
        }
        assert_eq!(OPTION_TOTAL, OptionId::ALL.len());
    }

    #[test]
    fn index_maps_strictly_ascend() {
        let config = parse_clean(&[
            "pgbackrest",
            "--stanza=demo",
            "--pg2-path=/b",
            "--pg1-path=/a",
            "--pg8-path=/c",
            "backup",
        ])
        .unwrap();

        for group in GroupId::ALL {
            let state = config.group(group);
            for pair in state.index_map[..state.index_total].windows(2) {
                assert!(pair[0] < pair[1]);
            }
        }
    }

    #[test]
    fn negated_config_option_keeps_param_source() {
        let storage =
            MemoryStorage::new().file(CONFIG_FILE_DEFAULT, "[global]\nprocess-max=2\n");
        let config = parse_with(
            &args(&["pgbackrest", "--stanza=demo", "--no-config", "backup"]),
            &[],
            &storage,
            true,
        )
        .unwrap();

        let slot = config.option(OptionId::Config).unwrap();
        assert!(slot.value.is_none());
        assert!(slot.negate);
        assert_eq!(slot.source, Source::Param);
        // And the file really was skipped.
        assert_eq!(config.option_int(OptionId::ProcessMax), Some(1));
    }
}
