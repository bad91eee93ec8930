use crate::error::ConfigError;
use crate::parsed::{ParseOptionList, Source};
use crate::rules;
use crate::tables::{CommandId, CommandRole, OptionType, ENV_PREFIX};

/// Import options from environment variables matching `PGBACKREST_*`.
///
/// The suffix is lowercased and `_` becomes `-` to form the option name.
/// Misused entries (unknown, negate/reset spellings, not valid for the
/// command) warn and are skipped; an empty value is fatal. A slot already
/// filled from the command line is left alone.
///
/// Takes an iterator so tests can pass synthetic data instead of
/// `std::env::vars()`.
pub fn apply(
    vars: impl IntoIterator<Item = (String, String)>,
    options: &mut ParseOptionList,
    command: CommandId,
    role: CommandRole,
    warn: bool,
) -> Result<(), ConfigError> {
    for (key, value) in vars {
        let Some(suffix) = key.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let name = suffix.to_lowercase().replace('_', "-");

        let Some(found) = rules::option_find(&name) else {
            if warn {
                tracing::warn!("environment contains invalid option '{name}'");
            }
            continue;
        };

        if found.negate {
            if warn {
                tracing::warn!("environment contains invalid negate option '{name}'");
            }
            continue;
        }

        if found.reset {
            if warn {
                tracing::warn!("environment contains invalid reset option '{name}'");
            }
            continue;
        }

        if !rules::option_valid(command, role, found.id) {
            if warn {
                tracing::warn!(
                    "environment contains option '{name}' invalid for command '{}'",
                    command.name()
                );
            }
            continue;
        }

        if value.is_empty() {
            return Err(ConfigError::option_invalid_value(format!(
                "environment variable '{name}' must have a value"
            )));
        }

        let slot = options.value_mut(found.id, found.key_idx);
        if slot.found {
            continue;
        }

        slot.found = true;
        slot.source = Source::Config;

        if rules::option_rule(found.id).option_type == OptionType::Boolean {
            if value == "n" {
                slot.negate = true;
            } else if value != "y" {
                return Err(ConfigError::option_invalid_value(format!(
                    "environment boolean option '{name}' must be 'y' or 'n'"
                )));
            }
        } else if rules::option_rule(found.id).multi {
            slot.values = value.split(':').map(str::to_string).collect();
        } else {
            slot.values.push(value);
        }
    }

    Ok(())
}
