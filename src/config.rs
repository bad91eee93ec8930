//! The resolved configuration.
//!
//! `Config` is the immutable product of [`parse`](crate::parse::parse):
//! command, role, parameters, and one typed slot per `(option, index)`.
//! Grouped options are addressed by a dense index translated through the
//! group's index map; the un-indexed accessors read the group's default
//! index.

use std::collections::BTreeMap;

use crate::parsed::Source;
use crate::rules;
use crate::tables::{CommandId, CommandRole, GroupId, OptionId, GROUP_RULES, GROUP_TOTAL, OPTION_TOTAL};
use crate::value::Value;

/// One materialised `(option, index)` slot.
#[derive(Debug, Clone, Default)]
pub struct ConfigOptionValue {
    pub value: Option<Value>,
    pub source: Source,
    pub negate: bool,
    pub reset: bool,
}

#[derive(Debug, Default)]
pub(crate) struct ConfigOption {
    pub(crate) valid: bool,
    pub(crate) index: Vec<ConfigOptionValue>,
}

/// Per-group index state.
#[derive(Debug)]
pub struct ConfigGroup {
    pub name: &'static str,
    pub valid: bool,
    /// Number of indexes in use.
    pub index_total: usize,
    /// Dense index to 0-based key index.
    pub index_map: Vec<usize>,
    /// Dense index read by the un-indexed accessors.
    pub index_default: usize,
    pub index_default_exists: bool,
}

/// The fully resolved configuration, owned by the caller.
#[derive(Debug)]
pub struct Config {
    pub(crate) command: Option<CommandId>,
    pub(crate) role: CommandRole,
    pub(crate) help: bool,
    pub(crate) exe: String,
    pub(crate) params: Option<Vec<String>>,
    pub(crate) options: Vec<ConfigOption>,
    pub(crate) groups: Vec<ConfigGroup>,
}

impl Config {
    pub(crate) fn new(
        exe: String,
        command: Option<CommandId>,
        role: CommandRole,
        help: bool,
        params: Option<Vec<String>>,
    ) -> Config {
        Config {
            command,
            role,
            help,
            exe,
            params,
            options: (0..OPTION_TOTAL).map(|_| ConfigOption::default()).collect(),
            groups: (0..GROUP_TOTAL)
                .map(|group| ConfigGroup {
                    name: GROUP_RULES[group].name,
                    valid: false,
                    index_total: 0,
                    index_map: vec![0],
                    index_default: 0,
                    index_default_exists: false,
                })
                .collect(),
        }
    }

    pub fn command(&self) -> Option<CommandId> {
        self.command
    }

    pub fn command_role(&self) -> CommandRole {
        self.role
    }

    pub fn help(&self) -> bool {
        self.help
    }

    pub fn exe(&self) -> &str {
        &self.exe
    }

    pub fn param_list(&self) -> Option<&[String]> {
        self.params.as_deref()
    }

    /// Is the option valid for the parsed command and role?
    pub fn option_valid(&self, id: OptionId) -> bool {
        self.options[id as usize].valid
    }

    /// The option's canonical rule-table name (`pg-path`, not `pg7-path`).
    pub fn option_name(&self, id: OptionId) -> &'static str {
        rules::option_rule(id).name
    }

    /// The group the option belongs to, if any.
    pub fn option_group(&self, id: OptionId) -> Option<GroupId> {
        rules::option_rule(id).group
    }

    pub fn group(&self, id: GroupId) -> &ConfigGroup {
        &self.groups[id as usize]
    }

    pub fn group_valid(&self, id: GroupId) -> bool {
        self.group(id).valid
    }

    pub fn group_idx_total(&self, id: GroupId) -> usize {
        self.group(id).index_total
    }

    /// The user-visible (1-based) key for a dense group index.
    pub fn group_idx_to_key(&self, id: GroupId, idx: usize) -> usize {
        self.group(id).index_map.get(idx).copied().unwrap_or(0) + 1
    }

    /// The dense index the un-indexed accessors read for this option.
    fn default_idx(&self, id: OptionId) -> usize {
        match rules::option_rule(id).group {
            Some(group) => self.group(group).index_default,
            None => 0,
        }
    }

    pub fn option_idx(&self, id: OptionId, idx: usize) -> Option<&ConfigOptionValue> {
        self.options[id as usize].index.get(idx)
    }

    pub fn option(&self, id: OptionId) -> Option<&ConfigOptionValue> {
        self.option_idx(id, self.default_idx(id))
    }

    /// Is the option valid and does it have a value?
    pub fn option_test(&self, id: OptionId) -> bool {
        self.option_idx_test(id, self.default_idx(id))
    }

    pub fn option_idx_test(&self, id: OptionId, idx: usize) -> bool {
        self.option_valid(id)
            && self
                .option_idx(id, idx)
                .is_some_and(|slot| slot.value.is_some())
    }

    pub fn option_str(&self, id: OptionId) -> Option<&str> {
        self.option_idx_str(id, self.default_idx(id))
    }

    pub fn option_idx_str(&self, id: OptionId, idx: usize) -> Option<&str> {
        self.option_idx(id, idx)?.value.as_ref()?.as_str()
    }

    pub fn option_int(&self, id: OptionId) -> Option<i64> {
        self.option_idx_int(id, self.default_idx(id))
    }

    pub fn option_idx_int(&self, id: OptionId, idx: usize) -> Option<i64> {
        self.option_idx(id, idx)?.value.as_ref()?.as_int()
    }

    pub fn option_bool(&self, id: OptionId) -> Option<bool> {
        self.option_idx_bool(id, self.default_idx(id))
    }

    pub fn option_idx_bool(&self, id: OptionId, idx: usize) -> Option<bool> {
        self.option_idx(id, idx)?.value.as_ref()?.as_bool()
    }

    pub fn option_list(&self, id: OptionId) -> Option<&[String]> {
        self.option_idx(id, self.default_idx(id))?
            .value
            .as_ref()?
            .as_list()
    }

    pub fn option_hash(&self, id: OptionId) -> Option<&BTreeMap<String, String>> {
        self.option_idx(id, self.default_idx(id))?
            .value
            .as_ref()?
            .as_hash()
    }

    pub fn option_source(&self, id: OptionId) -> Source {
        self.option_idx_source(id, self.default_idx(id))
    }

    pub fn option_idx_source(&self, id: OptionId, idx: usize) -> Source {
        self.option_idx(id, idx)
            .map(|slot| slot.source)
            .unwrap_or_default()
    }

    pub fn option_negate(&self, id: OptionId) -> bool {
        self.option_idx(id, self.default_idx(id))
            .is_some_and(|slot| slot.negate)
    }

    pub fn option_reset(&self, id: OptionId) -> bool {
        self.option_idx(id, self.default_idx(id))
            .is_some_and(|slot| slot.reset)
    }

    /// The user-visible name for a dense option index (`pg7-path`).
    pub fn option_display_name(&self, id: OptionId, idx: usize) -> String {
        match rules::option_rule(id).group {
            Some(group) => {
                let key_idx = self.group(group).index_map.get(idx).copied().unwrap_or(0);
                rules::key_idx_name(id, key_idx)
            }
            None => rules::option_rule(id).name.to_string(),
        }
    }
}
