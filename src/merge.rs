//! Config-file phase.
//!
//! Walks the loaded INI document in section-search order for the active
//! command and stanza `S`:
//!
//! 1. `[S:<command>]`
//! 2. `[S]`
//! 3. `[global:<command>]`
//! 4. `[global]`
//!
//! Earlier sections win, and a slot already filled from the command line or
//! the environment is never overwritten. Recognised-but-misused keys warn and
//! are skipped; the same option spelled two ways inside one section is fatal.

use std::collections::HashMap;

use crate::error::ConfigError;
use crate::ini::{Ini, IniValue};
use crate::parsed::{ParseOptionList, Source};
use crate::rules;
use crate::tables::{CommandId, CommandRole, OptionId, OptionType, Section};

const SECTION_GLOBAL: &str = "global";

pub fn apply(
    text: &str,
    options: &mut ParseOptionList,
    command: CommandId,
    role: CommandRole,
    warn: bool,
) -> Result<(), ConfigError> {
    let ini = Ini::parse(text)?;

    let stanza = options
        .get(OptionId::Stanza, 0)
        .filter(|slot| slot.found)
        .and_then(|slot| slot.values.first())
        .cloned();

    let mut sections = Vec::new();
    if let Some(stanza) = &stanza {
        sections.push(format!("{stanza}:{}", command.name()));
        sections.push(stanza.clone());
    }
    sections.push(format!("{SECTION_GLOBAL}:{}", command.name()));
    sections.push(SECTION_GLOBAL.to_string());

    for (section_idx, section) in sections.iter().enumerate() {
        // Tracks which logical options this section has already supplied so a
        // second spelling of the same option is caught.
        let mut found_names: HashMap<(OptionId, usize), String> = HashMap::new();

        for key in ini.section_key_list(section) {
            let Some(found) = rules::option_find(key) else {
                if warn {
                    tracing::warn!("configuration file contains invalid option '{key}'");
                }
                continue;
            };

            if found.negate {
                if warn {
                    tracing::warn!("configuration file contains negate option '{key}'");
                }
                continue;
            }

            if found.reset {
                if warn {
                    tracing::warn!("configuration file contains reset option '{key}'");
                }
                continue;
            }

            let rule = rules::option_rule(found.id);

            if rule.section == Section::CommandLine {
                if warn {
                    tracing::warn!(
                        "configuration file contains command-line only option '{key}'"
                    );
                }
                continue;
            }

            if let Some(first) = found_names.get(&(found.id, found.key_idx)) {
                return Err(ConfigError::option_invalid(format!(
                    "configuration file contains duplicate options ('{key}', '{first}') \
                     in section '[{section}]'"
                )));
            }
            found_names.insert((found.id, found.key_idx), key.to_string());

            if !rules::option_valid(command, role, found.id) {
                // Only worth a warning when the section was scoped to this
                // command; a plain section may hold options for other
                // commands.
                if warn && section_idx % 2 == 0 {
                    tracing::warn!(
                        "configuration file contains option '{key}' invalid for section \
                         '{section}'"
                    );
                }
                continue;
            }

            if rule.section == Section::Stanza && section.starts_with(SECTION_GLOBAL) {
                if warn {
                    tracing::warn!(
                        "configuration file contains stanza-only option '{key}' in global \
                         section '{section}'"
                    );
                }
                continue;
            }

            let slot = options.value_mut(found.id, found.key_idx);
            if slot.found {
                continue;
            }

            slot.found = true;
            slot.source = Source::Config;

            match ini.get(section, key) {
                Some(IniValue::List(values)) => {
                    if !rule.multi {
                        return Err(ConfigError::option_invalid(format!(
                            "option '{}' cannot be set multiple times",
                            rules::key_idx_name(found.id, found.key_idx)
                        )));
                    }
                    slot.values = values.clone();
                }
                Some(IniValue::Scalar(value)) => {
                    if value.is_empty() {
                        return Err(ConfigError::option_invalid_value(format!(
                            "section '{section}', key '{key}' must have a value"
                        )));
                    }

                    if rule.option_type == OptionType::Boolean {
                        if value == "n" {
                            slot.negate = true;
                        } else if value != "y" {
                            return Err(ConfigError::option_invalid_value(format!(
                                "boolean option '{key}' must be 'y' or 'n'"
                            )));
                        }
                    } else {
                        slot.values.push(value.clone());
                    }
                }
                None => {}
            }
        }
    }

    Ok(())
}
