//! Option validity and group index resolution.
//!
//! After the sources are merged this phase marks which options are valid for
//! the parsed command and role, rejects command-line options that are not,
//! and computes each group's index map: the ascending list of key indexes in
//! actual use. Environment and config-file entries for invalid options were
//! already dropped by the earlier phases, so any surviving entry came from
//! the command line and is fatal.

use crate::config::Config;
use crate::error::ConfigError;
use crate::parsed::ParseOptionList;
use crate::rules;
use crate::tables::{CommandId, CommandRole, GroupId, OptionId, GROUP_TOTAL, KEY_MAX};

pub fn resolve(
    config: &mut Config,
    options: &ParseOptionList,
    command: CommandId,
    role: CommandRole,
) -> Result<(), ConfigError> {
    let mut used = [[false; KEY_MAX]; GROUP_TOTAL];

    for id in OptionId::ALL {
        let rule = rules::option_rule(id);

        if !rules::option_valid(command, role, id) {
            if options.touched(id) {
                return Err(ConfigError::option_invalid(format!(
                    "option '{}' not valid for command '{}'",
                    rule.name,
                    command.name()
                )));
            }
            continue;
        }

        config.options[id as usize].valid = true;

        let Some(group) = rule.group else {
            continue;
        };
        let state = &mut config.groups[group as usize];
        state.valid = true;

        for key_idx in 0..options.key_len(id) {
            if let Some(slot) = options.get(id, key_idx)
                && slot.found
                && !slot.reset
                && !used[group as usize][key_idx]
            {
                used[group as usize][key_idx] = true;
                state.index_total += 1;
            }
        }
    }

    for group in GroupId::ALL {
        let state = &mut config.groups[group as usize];
        if !state.valid {
            continue;
        }

        // With no keys in use, one index still exists so options with
        // defaults can materialise.
        if state.index_total == 0 {
            state.index_total = 1;
            state.index_map = vec![0];
            continue;
        }

        // Key 1 stays at slot 0 of the pg map for compatibility with
        // configurations that predate multi-pg support, so the scan for used
        // keys starts at key 2.
        let (mut map, start) = if group == GroupId::Pg {
            (vec![0], 1)
        } else {
            (Vec::new(), 0)
        };

        for (key_idx, in_use) in used[group as usize].iter().enumerate().skip(start) {
            if *in_use {
                map.push(key_idx);
            }
        }
        state.index_map = map;
    }

    Ok(())
}
