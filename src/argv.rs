//! Command-line phase.
//!
//! Walks the argument vector with long-option semantics: `--name`,
//! `--name=value`, `--name value`, `--no-name`, `--reset-name`, and `--` to
//! end option parsing. The first positional is the command, optionally
//! suffixed `:role`; later positionals are command parameters.

use crate::error::ConfigError;
use crate::parsed::{ParseOptionList, Source};
use crate::rules;
use crate::tables::{CommandId, CommandRole, OptionType};

/// Result of the command-line phase.
#[derive(Debug)]
pub struct CommandLine {
    pub exe: String,
    pub command: Option<CommandId>,
    pub role: CommandRole,
    pub help: bool,
    pub params: Option<Vec<String>>,
    pub options: ParseOptionList,
}

pub fn parse_command_line(argv: &[String]) -> Result<CommandLine, ConfigError> {
    let exe = argv.first().cloned().unwrap_or_default();

    let mut command: Option<CommandId> = None;
    let mut role = CommandRole::Default;
    let mut help = false;
    let mut command_set = false;
    let mut params: Option<Vec<String>> = None;
    let mut options = ParseOptionList::new();
    let mut arg_found = false;
    let mut options_done = false;

    let mut idx = 1;
    while idx < argv.len() {
        let token = &argv[idx];

        if !options_done && token == "--" {
            options_done = true;
            idx += 1;
            continue;
        }

        arg_found = true;

        if !options_done && token.len() > 2 && token.starts_with("--") {
            idx = parse_option(argv, idx, token, &mut options)?;
        } else if !options_done && token.len() > 1 && token.starts_with('-') {
            return Err(ConfigError::option_invalid(format!(
                "invalid option '{token}'"
            )));
        } else if !command_set {
            let (found, found_role) = resolve_command(token)?;
            command = Some(found);
            role = found_role;

            if found == CommandId::Help {
                help = true;
            } else {
                command_set = true;
            }
        } else {
            params.get_or_insert_with(Vec::new).push(token.clone());
        }

        idx += 1;
    }

    if !command_set && !help {
        if arg_found {
            return Err(ConfigError::CommandRequired);
        }
        help = true;
    }

    if let Some(found) = command
        && params.is_some()
        && !help
        && !rules::command_rule(found).parameters_allowed
    {
        return Err(ConfigError::ParamInvalid);
    }

    Ok(CommandLine {
        exe,
        command,
        role,
        help,
        params,
        options,
    })
}

/// Parse one `--` token (and possibly the following argument token). Returns
/// the index of the last token consumed.
fn parse_option(
    argv: &[String],
    mut idx: usize,
    token: &str,
    options: &mut ParseOptionList,
) -> Result<usize, ConfigError> {
    let body = &token[2..];
    let (name, inline) = match body.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    };

    let Some(found) = rules::option_find(name) else {
        return Err(ConfigError::option_invalid(format!(
            "invalid option '{token}'"
        )));
    };
    let rule = rules::option_rule(found.id);

    if rule.secure {
        return Err(ConfigError::option_invalid(format!(
            "option '{name}' is not allowed on the command-line\n\
             HINT: this option could expose secrets in the process list.\n\
             HINT: specify the option in a configuration file or an environment variable instead."
        )));
    }

    if found.deprecated {
        tracing::warn!(
            "option '{name}' is deprecated, use '{}' instead",
            rules::key_idx_name(found.id, found.key_idx)
        );
    }

    let takes_value = !found.negate && !found.reset && rule.option_type != OptionType::Boolean;

    let value = if takes_value {
        match inline {
            Some(value) => Some(value.to_string()),
            None => {
                idx += 1;
                let Some(next) = argv.get(idx) else {
                    return Err(ConfigError::option_invalid(format!(
                        "option '{token}' requires argument"
                    )));
                };
                Some(next.clone())
            }
        }
    } else {
        // A value attached to a flag that takes none is not a recognisable
        // option form.
        if inline.is_some() {
            return Err(ConfigError::option_invalid(format!(
                "invalid option '{token}'"
            )));
        }
        None
    };

    let slot = options.value_mut(found.id, found.key_idx);

    if !slot.found {
        slot.found = true;
        slot.negate = found.negate;
        slot.reset = found.reset;
        slot.source = Source::Param;
        if let Some(value) = value {
            slot.values.push(value);
        }
        return Ok(idx);
    }

    let display = rules::key_idx_name(found.id, found.key_idx);

    if slot.negate && found.negate {
        return Err(ConfigError::option_invalid(format!(
            "option '{display}' is negated multiple times"
        )));
    }

    if slot.reset && found.reset {
        return Err(ConfigError::option_invalid(format!(
            "option '{display}' is reset multiple times"
        )));
    }

    if (slot.reset && found.negate) || (slot.negate && found.reset) {
        return Err(ConfigError::option_invalid(format!(
            "option '{display}' cannot be negated and reset"
        )));
    }

    if slot.negate != found.negate {
        return Err(ConfigError::option_invalid(format!(
            "option '{display}' cannot be set and negated"
        )));
    }

    if slot.reset != found.reset {
        return Err(ConfigError::option_invalid(format!(
            "option '{display}' cannot be set and reset"
        )));
    }

    match value {
        Some(value) if rule.multi => {
            slot.values.push(value);
            Ok(idx)
        }
        _ => Err(ConfigError::option_invalid(format!(
            "option '{display}' cannot be set multiple times"
        ))),
    }
}

fn resolve_command(token: &str) -> Result<(CommandId, CommandRole), ConfigError> {
    let resolved = match CommandId::from_name(token) {
        Some(command) => Some((command, CommandRole::Default)),
        None => {
            let parts: Vec<&str> = token.split(':').collect();
            if parts.len() == 2
                && let Some(command) = CommandId::from_name(parts[0])
            {
                let Some(role) = CommandRole::from_name(parts[1]) else {
                    return Err(ConfigError::command_invalid(format!(
                        "invalid command role '{}'",
                        parts[1]
                    )));
                };
                Some((command, role))
            } else {
                None
            }
        }
    };

    let Some((command, role)) = resolved else {
        return Err(ConfigError::command_invalid(format!(
            "invalid command '{token}'"
        )));
    };

    if !rules::command_role_valid(command, role) {
        return Err(ConfigError::command_invalid(format!(
            "invalid command/role combination '{token}'"
        )));
    }

    Ok((command, role))
}
