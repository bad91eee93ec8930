//! Config file loading.
//!
//! Which files load, and whether a missing file is fatal, depends on how the
//! `config`, `config-path`, and `config-include-path` options were set:
//!
//! - Nothing set: the default config file and the default include directory
//!   load if present. If the default config file is absent the legacy
//!   location (`/etc/pgbackrest.conf`) is tried as well.
//! - `config-path` set: the config and include defaults are rebased onto that
//!   path (keeping their basenames); the files stay optional.
//! - `config` set: the named file must exist. Unless `config-path` or
//!   `config-include-path` is also set, the include directory is skipped.
//! - `config-include-path` set: the named directory must exist.
//! - `--no-config`: the main file is skipped entirely; an include directory
//!   still loads when one of the path options asks for it.
//!
//! Include files are the `*.conf` entries of the include directory, sorted
//! ascending and appended to the main file with a newline separator. Every
//! part must parse as INI on its own.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConfigError;
use crate::ini::Ini;
use crate::parsed::ParseOptionList;
use crate::storage::Storage;
use crate::tables::OptionId;

static CONF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r".+\.conf$").unwrap());

/// Load the config file(s) into a single INI document string, or `None` when
/// no source produced content. Defaults are passed in to make testing easier.
pub fn load(
    options: &ParseOptionList,
    storage: &dyn Storage,
    config_default: &str,
    include_default: &str,
    orig_default: &str,
) -> Result<Option<String>, ConfigError> {
    let config_slot = options.get(OptionId::Config, 0);
    let config_found = config_slot.is_some_and(|slot| slot.found);
    let config_negate = config_slot.is_some_and(|slot| slot.negate);
    let config_path = options
        .get(OptionId::ConfigPath, 0)
        .filter(|slot| slot.found)
        .and_then(|slot| slot.values.first());
    let include_slot = options
        .get(OptionId::ConfigIncludePath, 0)
        .filter(|slot| slot.found);

    let mut config_required = config_found;
    let config_path_required = config_path.is_some();
    let mut config_include_required = include_slot.is_some();

    // Keep the pre-rebase default for the legacy-location check below.
    let config_default_current = config_default.to_string();

    // config-path rebases both defaults, keeping the basenames.
    let (config_default, include_default) = match config_path {
        Some(base) => {
            let file_name = config_default.rsplit('/').next().unwrap_or(config_default);
            let dir_name = include_default.rsplit('/').next().unwrap_or(include_default);
            (format!("{base}/{file_name}"), format!("{base}/{dir_name}"))
        }
        None => (config_default.to_string(), include_default.to_string()),
    };

    let mut load_config = true;
    let mut load_include = true;

    if config_negate {
        load_config = false;
        config_required = false;
    }

    // An explicit --config without a path override pins the configuration to
    // that one file.
    if config_found && !(config_path_required || config_include_required) {
        load_include = false;
        config_include_required = false;
    }

    let mut result: Option<String> = None;

    if load_config {
        let file_name = if config_required {
            config_slot
                .and_then(|slot| slot.values.first())
                .cloned()
                .unwrap_or(config_default.clone())
        } else {
            config_default.clone()
        };

        result = read_text(storage, &file_name, config_required)?;

        if result.is_none() && file_name == config_default_current {
            result = read_text(storage, orig_default, false)?;
        }
    }

    if load_include {
        // The main file must be well-formed before parts are appended.
        if let Some(text) = &result {
            Ini::parse(text)?;
        }

        let include_path = if config_include_required {
            include_slot
                .and_then(|slot| slot.values.first())
                .cloned()
                .unwrap_or(include_default.clone())
        } else {
            include_default.clone()
        };

        let names = match storage.list(&include_path, &CONF_RE) {
            Ok(Some(names)) => names,
            Ok(None) if config_include_required => {
                return Err(ConfigError::PathMissing { path: include_path });
            }
            Ok(None) => Vec::new(),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: include_path.into(),
                    source,
                });
            }
        };

        let mut names = names;
        names.sort();

        for name in names {
            let part = read_text(storage, &format!("{include_path}/{name}"), false)?;
            load_part(&mut result, part)?;
        }
    }

    Ok(result)
}

/// Append one include part to the accumulated document, separated by a
/// newline when the accumulator already has content. Empty parts are skipped;
/// the rest must parse as INI on their own.
fn load_part(config: &mut Option<String>, part: Option<String>) -> Result<(), ConfigError> {
    let Some(part) = part else {
        return Ok(());
    };
    if part.is_empty() {
        return Ok(());
    }

    Ini::parse(&part)?;

    let config = config.get_or_insert_with(String::new);
    if !config.is_empty() {
        config.push('\n');
    }
    config.push_str(&part);

    Ok(())
}

fn read_text(
    storage: &dyn Storage,
    path: &str,
    required: bool,
) -> Result<Option<String>, ConfigError> {
    match storage.read(path) {
        Ok(Some(bytes)) => String::from_utf8(bytes).map(Some).map_err(|_| {
            ConfigError::format(format!("config file '{path}' is not valid UTF-8"))
        }),
        Ok(None) if required => Err(ConfigError::FileMissing {
            path: path.to_string(),
        }),
        Ok(None) => Ok(None),
        Err(source) => Err(ConfigError::Io {
            path: path.into(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::MemoryStorage;
    use crate::parsed::Source;

    const CONFIG_DEFAULT: &str = "/etc/pgbackrest/pgbackrest.conf";
    const INCLUDE_DEFAULT: &str = "/etc/pgbackrest/conf.d";
    const ORIG_DEFAULT: &str = "/etc/pgbackrest.conf";

    fn load_with(
        options: &ParseOptionList,
        storage: &MemoryStorage,
    ) -> Result<Option<String>, ConfigError> {
        load(options, storage, CONFIG_DEFAULT, INCLUDE_DEFAULT, ORIG_DEFAULT)
    }

    fn set(options: &mut ParseOptionList, id: OptionId, value: &str) {
        let slot = options.value_mut(id, 0);
        slot.found = true;
        slot.source = Source::Param;
        slot.values.push(value.to_string());
    }

    fn negate(options: &mut ParseOptionList, id: OptionId) {
        let slot = options.value_mut(id, 0);
        slot.found = true;
        slot.negate = true;
        slot.source = Source::Param;
    }

    #[test]
    fn defaults_load_main_file_when_present() {
        let storage = MemoryStorage::new().file(CONFIG_DEFAULT, "[global]\na=1\n");
        let options = ParseOptionList::new();
        let text = load_with(&options, &storage).unwrap().unwrap();
        assert_eq!(text, "[global]\na=1\n");
    }

    #[test]
    fn defaults_missing_everywhere_is_none() {
        let storage = MemoryStorage::new();
        let options = ParseOptionList::new();
        assert!(load_with(&options, &storage).unwrap().is_none());
    }

    #[test]
    fn legacy_location_tried_when_default_missing() {
        let storage = MemoryStorage::new().file(ORIG_DEFAULT, "[global]\nlegacy=y\n");
        let options = ParseOptionList::new();
        let text = load_with(&options, &storage).unwrap().unwrap();
        assert!(text.contains("legacy=y"));
    }

    #[test]
    fn explicit_config_must_exist() {
        let storage = MemoryStorage::new();
        let mut options = ParseOptionList::new();
        set(&mut options, OptionId::Config, "/custom.conf");

        let err = load_with(&options, &storage).unwrap_err();
        assert!(matches!(err, ConfigError::FileMissing { ref path } if path == "/custom.conf"));
    }

    #[test]
    fn explicit_config_skips_include_dir() {
        let storage = MemoryStorage::new()
            .file("/custom.conf", "[global]\na=1\n")
            .file("/etc/pgbackrest/conf.d/extra.conf", "[global]\nb=2\n");
        let mut options = ParseOptionList::new();
        set(&mut options, OptionId::Config, "/custom.conf");

        let text = load_with(&options, &storage).unwrap().unwrap();
        assert!(!text.contains("b=2"));
    }

    #[test]
    fn no_config_skips_main_file() {
        let storage = MemoryStorage::new().file(CONFIG_DEFAULT, "[global]\na=1\n");
        let mut options = ParseOptionList::new();
        negate(&mut options, OptionId::Config);

        // The default include directory does not exist either, so nothing
        // loads at all.
        assert!(load_with(&options, &storage).unwrap().is_none());
    }

    #[test]
    fn include_parts_sorted_and_joined() {
        let storage = MemoryStorage::new()
            .file(CONFIG_DEFAULT, "[global]\nmain=1")
            .file("/etc/pgbackrest/conf.d/20-b.conf", "[global]\nb=2")
            .file("/etc/pgbackrest/conf.d/10-a.conf", "[global]\na=1")
            .file("/etc/pgbackrest/conf.d/readme.txt", "not ini");
        let options = ParseOptionList::new();

        let text = load_with(&options, &storage).unwrap().unwrap();
        assert_eq!(
            text,
            "[global]\nmain=1\n[global]\na=1\n[global]\nb=2"
        );
    }

    #[test]
    fn include_without_main_has_no_leading_newline() {
        let storage =
            MemoryStorage::new().file("/etc/pgbackrest/conf.d/a.conf", "[global]\na=1\n");
        let options = ParseOptionList::new();

        let text = load_with(&options, &storage).unwrap().unwrap();
        assert!(text.starts_with("[global]"));
    }

    #[test]
    fn empty_include_part_skipped() {
        let storage = MemoryStorage::new()
            .file("/etc/pgbackrest/conf.d/a.conf", "")
            .file("/etc/pgbackrest/conf.d/b.conf", "[global]\nb=2\n");
        let options = ParseOptionList::new();

        let text = load_with(&options, &storage).unwrap().unwrap();
        assert_eq!(text, "[global]\nb=2\n");
    }

    #[test]
    fn explicit_include_path_must_exist() {
        let storage = MemoryStorage::new();
        let mut options = ParseOptionList::new();
        set(&mut options, OptionId::ConfigIncludePath, "/conf.d");

        let err = load_with(&options, &storage).unwrap_err();
        assert!(matches!(err, ConfigError::PathMissing { ref path } if path == "/conf.d"));
    }

    #[test]
    fn explicit_include_path_loads_default_config_too() {
        let storage = MemoryStorage::new()
            .file(CONFIG_DEFAULT, "[global]\nmain=1")
            .file("/conf.d/a.conf", "[global]\na=1");
        let mut options = ParseOptionList::new();
        set(&mut options, OptionId::ConfigIncludePath, "/conf.d");

        let text = load_with(&options, &storage).unwrap().unwrap();
        assert!(text.contains("main=1"));
        assert!(text.contains("a=1"));
    }

    #[test]
    fn config_path_rebases_defaults() {
        let storage = MemoryStorage::new()
            .file("/base/pgbackrest.conf", "[global]\nmain=1")
            .file("/base/conf.d/a.conf", "[global]\na=1");
        let mut options = ParseOptionList::new();
        set(&mut options, OptionId::ConfigPath, "/base");

        let text = load_with(&options, &storage).unwrap().unwrap();
        assert!(text.contains("main=1"));
        assert!(text.contains("a=1"));
    }

    #[test]
    fn config_path_missing_files_are_silent() {
        let storage = MemoryStorage::new().file(ORIG_DEFAULT, "[global]\nlegacy=y\n");
        let mut options = ParseOptionList::new();
        set(&mut options, OptionId::ConfigPath, "/base");

        // The rebased default no longer equals the shipped default, so the
        // legacy location is not consulted.
        assert!(load_with(&options, &storage).unwrap().is_none());
    }

    #[test]
    fn config_with_config_path_still_loads_rebased_include() {
        let storage = MemoryStorage::new()
            .file("/custom.conf", "[global]\nmain=1")
            .file("/base/conf.d/a.conf", "[global]\na=1");
        let mut options = ParseOptionList::new();
        set(&mut options, OptionId::Config, "/custom.conf");
        set(&mut options, OptionId::ConfigPath, "/base");

        let text = load_with(&options, &storage).unwrap().unwrap();
        assert!(text.contains("main=1"));
        assert!(text.contains("a=1"));
    }

    #[test]
    fn no_config_with_include_path_loads_only_includes() {
        let storage = MemoryStorage::new()
            .file(CONFIG_DEFAULT, "[global]\nmain=1")
            .file("/conf.d/a.conf", "[global]\na=1");
        let mut options = ParseOptionList::new();
        negate(&mut options, OptionId::Config);
        set(&mut options, OptionId::ConfigIncludePath, "/conf.d");

        let text = load_with(&options, &storage).unwrap().unwrap();
        assert!(!text.contains("main=1"));
        assert!(text.contains("a=1"));
    }

    #[test]
    fn malformed_include_part_is_fatal() {
        let storage =
            MemoryStorage::new().file("/etc/pgbackrest/conf.d/a.conf", "not an ini line\n");
        let options = ParseOptionList::new();

        let err = load_with(&options, &storage).unwrap_err();
        assert!(matches!(err, ConfigError::Format { .. }));
    }

    #[test]
    fn malformed_main_file_is_fatal_when_includes_load() {
        let storage = MemoryStorage::new()
            .file(CONFIG_DEFAULT, "key-outside-section=1\n")
            .dir(INCLUDE_DEFAULT);
        let options = ParseOptionList::new();

        let err = load_with(&options, &storage).unwrap_err();
        assert!(matches!(err, ConfigError::Format { .. }));
    }
}
