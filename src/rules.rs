//! Runtime access to the static rule table.
//!
//! Option names are resolved dynamically rather than through a pre-generated
//! alias list: `no-` and `reset-` prefixes are stripped first, then the
//! remainder is matched as an ungrouped name, an indexed grouped name
//! (`pg7-path`), a bare grouped name (accepted as a deprecated alias for key
//! 1), or an entry in the deprecation table.
//!
//! Optional-data search follows the stream convention described in
//! [`tables`](crate::tables): the last matching record wins and a match
//! inside the requested command's scope beats an unscoped one.

use crate::tables::{
    CommandId, CommandRole, CommandRule, GroupId, OptionData, OptionId, OptionRule, Section,
    COMMAND_RULES, DEPRECATIONS, GROUP_RULES, KEY_MAX, OPTION_RULES,
};

pub fn command_rule(id: CommandId) -> &'static CommandRule {
    &COMMAND_RULES[id as usize]
}

pub fn option_rule(id: OptionId) -> &'static OptionRule {
    &OPTION_RULES[id as usize]
}

/// Is the role valid for the command?
pub fn command_role_valid(command: CommandId, role: CommandRole) -> bool {
    command_rule(command).roles & (1 << role as u8) != 0
}

/// Is the option valid for the command under the role?
pub fn option_valid(command: CommandId, role: CommandRole, option: OptionId) -> bool {
    option_rule(option).commands[role as usize] & (1 << command as u32) != 0
}

/// The user-visible name for `(option, key index)`. For grouped options the
/// group prefix is replaced by `prefix + (key index + 1)`, e.g.
/// `(pg-path, 6)` renders as `pg7-path`.
pub fn key_idx_name(id: OptionId, key_idx: usize) -> String {
    let rule = option_rule(id);
    match rule.group {
        Some(group) => {
            let prefix = GROUP_RULES[group as usize].name;
            format!("{prefix}{}{}", key_idx + 1, &rule.name[prefix.len()..])
        }
        None => rule.name.to_string(),
    }
}

/// A resolved option name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionMatch {
    pub id: OptionId,
    pub key_idx: usize,
    pub negate: bool,
    pub reset: bool,
    pub deprecated: bool,
}

/// Resolve a user-written option name to `(option, key index)` plus the
/// negate/reset/deprecated flags. Returns `None` for names that do not exist
/// or combine a prefix with an option that does not support it.
pub fn option_find(name: &str) -> Option<OptionMatch> {
    let (negate, reset, base) = if let Some(rest) = name.strip_prefix("reset-") {
        (false, true, rest)
    } else if let Some(rest) = name.strip_prefix("no-") {
        (true, false, rest)
    } else {
        (false, false, name)
    };

    let (id, key_idx, deprecated) = base_find(base)?;
    let rule = option_rule(id);

    if negate && !rule.negate {
        return None;
    }

    // Reset restores the configured default, so it has no meaning for options
    // that can only come from the command line.
    if reset && rule.section == Section::CommandLine {
        return None;
    }

    Some(OptionMatch {
        id,
        key_idx,
        negate,
        reset,
        deprecated,
    })
}

fn base_find(name: &str) -> Option<(OptionId, usize, bool)> {
    // Exact ungrouped name.
    for (idx, rule) in OPTION_RULES.iter().enumerate() {
        if rule.group.is_none() && rule.name == name {
            return Some((OptionId::ALL[idx], 0, false));
        }
    }

    // Indexed grouped name: group prefix, decimal key, option suffix.
    for group in GroupId::ALL {
        let prefix = GROUP_RULES[group as usize].name;
        let Some(rest) = name.strip_prefix(prefix) else {
            continue;
        };
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits_end == 0 {
            continue;
        }
        let Ok(key) = rest[..digits_end].parse::<usize>() else {
            continue;
        };
        if key == 0 || key >= KEY_MAX {
            continue;
        }
        let suffix = &rest[digits_end..];
        for (idx, rule) in OPTION_RULES.iter().enumerate() {
            if rule.group == Some(group)
                && rule.name.len() == prefix.len() + suffix.len()
                && rule.name.ends_with(suffix)
            {
                return Some((OptionId::ALL[idx], key - 1, false));
            }
        }
    }

    // Bare grouped name: accepted as a deprecated spelling of key 1.
    for (idx, rule) in OPTION_RULES.iter().enumerate() {
        if rule.group.is_some() && rule.name == name {
            return Some((OptionId::ALL[idx], 0, true));
        }
    }

    // Deprecated aliases.
    for (alias, id, key_idx) in &DEPRECATIONS {
        if *alias == name {
            return Some((*id, *key_idx, true));
        }
    }

    None
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum DataKind {
    AllowList,
    AllowRange,
    Default,
    Depend,
    Required,
}

fn data_kind(record: &OptionData) -> Option<DataKind> {
    match record {
        OptionData::Command(_) => None,
        OptionData::AllowList(_) => Some(DataKind::AllowList),
        OptionData::AllowRange(..) => Some(DataKind::AllowRange),
        OptionData::Default(_) => Some(DataKind::Default),
        OptionData::Depend(..) => Some(DataKind::Depend),
        OptionData::Required(_) => Some(DataKind::Required),
    }
}

/// Find an optional-data record for `(command, option)`. The last matching
/// record wins; a record scoped to `command` beats an unscoped one, and the
/// search stops once the requested command's scope has been read.
fn data_find(command: CommandId, option: OptionId, kind: DataKind) -> Option<&'static OptionData> {
    let mut scope: Option<CommandId> = None;
    let mut result = None;

    for record in option_rule(option).data {
        if let OptionData::Command(scoped) = record {
            if scope == Some(command) {
                break;
            }
            scope = Some(*scoped);
        } else if data_kind(record) == Some(kind) && (scope.is_none() || scope == Some(command)) {
            result = Some(record);
            if scope == Some(command) {
                break;
            }
        }
    }

    result
}

pub fn option_default(command: CommandId, option: OptionId) -> Option<&'static str> {
    match data_find(command, option, DataKind::Default) {
        Some(OptionData::Default(value)) => Some(value),
        _ => None,
    }
}

pub fn option_allow_list(command: CommandId, option: OptionId) -> Option<&'static [&'static str]> {
    match data_find(command, option, DataKind::AllowList) {
        Some(OptionData::AllowList(list)) => Some(list),
        _ => None,
    }
}

pub fn option_allow_range(command: CommandId, option: OptionId) -> Option<(i64, i64)> {
    match data_find(command, option, DataKind::AllowRange) {
        Some(OptionData::AllowRange(min, max)) => Some((*min, *max)),
        _ => None,
    }
}

pub fn option_depend(
    command: CommandId,
    option: OptionId,
) -> Option<(OptionId, &'static [&'static str])> {
    match data_find(command, option, DataKind::Depend) {
        Some(OptionData::Depend(target, values)) => Some((*target, values)),
        _ => None,
    }
}

/// Is the option required for the command? A command-scoped `Required` record
/// overrides the option's base flag.
pub fn option_required(command: CommandId, option: OptionId) -> bool {
    match data_find(command, option, DataKind::Required) {
        Some(OptionData::Required(required)) => *required,
        _ => option_rule(option).required,
    }
}
