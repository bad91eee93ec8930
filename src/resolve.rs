//! Materialisation: the final phase that turns merged raw values into the
//! typed configuration.
//!
//! Options are processed in [`RESOLVE_ORDER`](crate::tables::RESOLVE_ORDER)
//! so a depend target is always materialised before its dependents. For each
//! `(option, index)` slot:
//!
//! 1. Resolve the depend, if any. An unresolved depend silently skips the
//!    slot, unless the value came from the command line, which is fatal.
//! 2. Parse a set value by type, enforcing range and allow-list rules.
//! 3. Otherwise apply the default, or fail if the option is required.
//!
//! A negated non-boolean stores no value but keeps its source, so consumers
//! can tell "explicitly switched off" from "never mentioned".

use std::collections::BTreeMap;

use crate::config::{Config, ConfigOptionValue};
use crate::error::ConfigError;
use crate::parsed::{ParseOptionValue, ParseOptionList, Source};
use crate::rules;
use crate::tables::{CommandId, GroupId, OptionId, OptionType, Section, RESOLVE_ORDER};
use crate::value::{convert_to_byte, time_to_ms, Value};

pub fn materialise(
    config: &mut Config,
    options: &ParseOptionList,
    command: CommandId,
) -> Result<(), ConfigError> {
    for id in RESOLVE_ORDER {
        if !config.option_valid(id) {
            continue;
        }

        let rule = rules::option_rule(id);
        let index_total = match rule.group {
            Some(group) => config.group(group).index_total,
            None => 1,
        };

        let mut index = Vec::with_capacity(index_total);

        for list_idx in 0..index_total {
            let key_idx = match rule.group {
                Some(group) => config
                    .group(group)
                    .index_map
                    .get(list_idx)
                    .copied()
                    .unwrap_or(0),
                None => 0,
            };

            let unset = ParseOptionValue::default();
            let parsed = options.get(id, key_idx).unwrap_or(&unset);

            let option_set = parsed.found
                && (rule.option_type == OptionType::Boolean || !parsed.negate)
                && !parsed.reset;

            let mut slot = ConfigOptionValue {
                value: None,
                source: Source::Default,
                negate: parsed.negate,
                reset: parsed.reset,
            };

            if !depend_resolved(config, command, id, key_idx, list_idx, parsed, option_set)? {
                index.push(slot);
                continue;
            }

            if option_set {
                slot.source = parsed.source;
                slot.value = Some(parse_set_value(parsed, rule.option_type, command, id, key_idx)?);
            } else if parsed.negate {
                slot.source = parsed.source;
            } else if let Some(default) = rules::option_default(command, id) {
                slot.value = Some(parse_default(rule.option_type, default, rule.name)?);
            } else if rules::option_required(command, id) && !config.help() {
                let hint = if rule.section == Section::Stanza {
                    "\nHINT: does this stanza exist?"
                } else {
                    ""
                };
                return Err(ConfigError::OptionRequired {
                    command: command.name().to_string(),
                    option: rules::key_idx_name(id, key_idx),
                    hint: hint.to_string(),
                });
            }

            index.push(slot);
        }

        config.options[id as usize].index = index;
    }

    group_default(config)
}

/// Check the option's depend, if any. Returns whether the slot may
/// materialise; a failed depend is only fatal for command-line values.
fn depend_resolved(
    config: &Config,
    command: CommandId,
    id: OptionId,
    key_idx: usize,
    list_idx: usize,
    parsed: &ParseOptionValue,
    option_set: bool,
) -> Result<bool, ConfigError> {
    let Some((dep_id, dep_values)) = rules::option_depend(command, id) else {
        return Ok(true);
    };

    let dep_type = rules::option_rule(dep_id).option_type;

    // Booleans compare as "1"/"0" against the depend list.
    let dep_value = config
        .option_idx(dep_id, list_idx)
        .and_then(|slot| slot.value.as_ref())
        .map(|value| match value {
            Value::Bool(true) => "1".to_string(),
            Value::Bool(false) => "0".to_string(),
            Value::Str(text) => text.clone(),
            Value::Int(number) => number.to_string(),
            Value::List(_) | Value::Hash(_) => String::new(),
        });

    let Some(dep_value) = dep_value else {
        if option_set && parsed.source == Source::Param {
            return Err(ConfigError::option_invalid(format!(
                "option '{}' not valid without option '{}'",
                rules::key_idx_name(id, key_idx),
                rules::key_idx_name(dep_id, key_idx)
            )));
        }
        return Ok(false);
    };

    if dep_values.is_empty() || dep_values.contains(&dep_value.as_str()) {
        return Ok(true);
    }

    // Unresolved entries from the config file may simply belong to another
    // command, so only a command-line value is an error.
    if option_set && parsed.source == Source::Param {
        let mut dep_name = rules::key_idx_name(dep_id, key_idx);
        let mut value_list = Vec::new();

        for dep_value in dep_values {
            if dep_type == OptionType::Boolean {
                if *dep_value == "0" {
                    dep_name = format!("no-{}", rules::key_idx_name(dep_id, key_idx));
                }
            } else {
                value_list.push(format!("'{dep_value}'"));
            }
        }

        let error_value = match value_list.len() {
            0 => String::new(),
            1 => format!(" = {}", value_list[0]),
            _ => format!(" in ({})", value_list.join(", ")),
        };

        return Err(ConfigError::option_invalid(format!(
            "option '{}' not valid without option '{dep_name}'{error_value}",
            rules::key_idx_name(id, key_idx)
        )));
    }

    Ok(false)
}

fn parse_set_value(
    parsed: &ParseOptionValue,
    option_type: OptionType,
    command: CommandId,
    id: OptionId,
    key_idx: usize,
) -> Result<Value, ConfigError> {
    let display = rules::key_idx_name(id, key_idx);
    let first = || parsed.values.first().cloned().unwrap_or_default();

    match option_type {
        OptionType::Boolean => Ok(Value::Bool(!parsed.negate)),
        OptionType::List => Ok(Value::List(parsed.values.clone())),
        OptionType::Hash => {
            let mut pairs = BTreeMap::new();
            for raw in &parsed.values {
                let Some((key, value)) = raw.split_once('=') else {
                    return Err(ConfigError::option_invalid(format!(
                        "key/value '{raw}' not valid for '{display}' option"
                    )));
                };
                // Duplicate keys: last one wins.
                pairs.insert(key.to_string(), value.to_string());
            }
            Ok(Value::Hash(pairs))
        }
        OptionType::Integer => {
            let raw = first();
            let number: i64 = raw
                .parse()
                .map_err(|_| not_valid(&raw, &display))?;
            check_range(number, &raw, &display, command, id)?;
            check_allow(&raw, &raw, &display, command, id)?;
            Ok(Value::Int(number))
        }
        OptionType::Size => {
            let raw = first();
            let bytes = convert_to_byte(&raw)
                .and_then(|bytes| i64::try_from(bytes).ok())
                .ok_or_else(|| not_valid(&raw, &display))?;
            check_range(bytes, &raw, &display, command, id)?;
            check_allow(&bytes.to_string(), &raw, &display, command, id)?;
            Ok(Value::Int(bytes))
        }
        OptionType::Time => {
            let raw = first();
            let ms = time_to_ms(&raw).ok_or_else(|| not_valid(&raw, &display))?;
            check_range(ms, &raw, &display, command, id)?;
            check_allow(&raw, &raw, &display, command, id)?;
            Ok(Value::Int(ms))
        }
        OptionType::String => {
            let raw = first();
            if raw.is_empty() {
                return Err(too_short(&raw, &display));
            }
            check_allow(&raw, &raw, &display, command, id)?;
            Ok(Value::Str(raw))
        }
        OptionType::Path => {
            let mut raw = first();
            if raw.is_empty() {
                return Err(too_short(&raw, &display));
            }
            if !raw.starts_with('/') {
                return Err(ConfigError::option_invalid_value(format!(
                    "'{raw}' must begin with / for '{display}' option"
                )));
            }
            if raw.contains("//") {
                return Err(ConfigError::option_invalid_value(format!(
                    "'{raw}' cannot contain // for '{display}' option"
                )));
            }
            if raw.len() > 1 && raw.ends_with('/') {
                raw.pop();
            }
            check_allow(&raw, &raw, &display, command, id)?;
            Ok(Value::Str(raw))
        }
    }
}

fn not_valid(raw: &str, display: &str) -> ConfigError {
    ConfigError::option_invalid_value(format!("'{raw}' is not valid for '{display}' option"))
}

fn too_short(raw: &str, display: &str) -> ConfigError {
    ConfigError::option_invalid_value(format!(
        "'{raw}' must be >= 1 character for '{display}' option"
    ))
}

fn check_range(
    number: i64,
    raw: &str,
    display: &str,
    command: CommandId,
    id: OptionId,
) -> Result<(), ConfigError> {
    if let Some((min, max)) = rules::option_allow_range(command, id)
        && (number < min || number > max)
    {
        return Err(ConfigError::option_invalid_value(format!(
            "'{raw}' is out of range for '{display}' option"
        )));
    }
    Ok(())
}

fn check_allow(
    candidate: &str,
    shown: &str,
    display: &str,
    command: CommandId,
    id: OptionId,
) -> Result<(), ConfigError> {
    if let Some(list) = rules::option_allow_list(command, id)
        && !list.contains(&candidate)
    {
        return Err(ConfigError::option_invalid_value(format!(
            "'{shown}' is not allowed for '{display}' option"
        )));
    }
    Ok(())
}

fn parse_default(
    option_type: OptionType,
    default: &str,
    name: &str,
) -> Result<Value, ConfigError> {
    match option_type {
        OptionType::Boolean => Ok(Value::Bool(default == "1")),
        OptionType::String | OptionType::Path => Ok(Value::Str(default.to_string())),
        OptionType::Integer | OptionType::Size | OptionType::Time => default
            .parse()
            .map(Value::Int)
            .map_err(|_| ConfigError::format(format!("invalid default '{default}' for '{name}' option"))),
        OptionType::List | OptionType::Hash => Err(ConfigError::format(format!(
            "invalid default for '{name}' option"
        ))),
    }
}

/// Set each group's default index. The first index is used unless the group's
/// selector option (`pg`, `repo`) names a key, which must be one of the keys
/// in use.
fn group_default(config: &mut Config) -> Result<(), ConfigError> {
    for group in GroupId::ALL {
        let selector = match group {
            GroupId::Pg => OptionId::Pg,
            GroupId::Repo => OptionId::Repo,
        };

        config.groups[group as usize].index_default_exists =
            group == GroupId::Pg || config.option_valid(OptionId::Repo);

        if !config.option_test(selector) {
            continue;
        }
        let Some(key) = config.option_int(selector) else {
            continue;
        };
        let key_idx = (key as usize).saturating_sub(1);

        let state = &config.groups[group as usize];
        let bound = state.index_total.min(state.index_map.len());
        match state.index_map[..bound].iter().position(|used| *used == key_idx) {
            Some(idx) => {
                let state = &mut config.groups[group as usize];
                state.index_default = idx;
                state.index_default_exists = true;
            }
            None => {
                return Err(ConfigError::option_invalid_value(format!(
                    "key '{key}' is not valid for '{}' option",
                    rules::option_rule(selector).name
                )));
            }
        }
    }
    Ok(())
}
