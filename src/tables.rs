//! The static rule table.
//!
//! Everything the engine knows about commands, options, and option groups
//! lives here as `const` data: which commands exist and which roles they may
//! run under, which options exist, their types, which config-file sections
//! they may appear in, and the per-command overrides (defaults, allow lists,
//! allow ranges, depends, required) packed into each option's record stream.
//!
//! The record stream follows a scoping convention: a [`OptionData::Command`]
//! record scopes every following record to that command until the next
//! `Command` record. Lookup returns the last matching record, preferring a
//! command-scoped match over an unscoped one; the search itself lives in the
//! rules module.
//!
//! [`RESOLVE_ORDER`] lists every option in an order where each depend target
//! precedes its dependents, so a single materialisation pass can always read
//! an already-resolved value. The table tests at the bottom refuse a table
//! where that ordering (or any other invariant) is broken.

/// Maximum key index for grouped options. User-visible keys are `1..KEY_MAX`.
pub const KEY_MAX: usize = 256;

/// Prefix for environment variables.
pub const ENV_PREFIX: &str = "PGBACKREST_";

/// Baked-in config file locations.
pub const CONFIG_FILE_DEFAULT: &str = "/etc/pgbackrest/pgbackrest.conf";
pub const CONFIG_INCLUDE_PATH_DEFAULT: &str = "/etc/pgbackrest/conf.d";
pub const CONFIG_ORIG_DEFAULT: &str = "/etc/pgbackrest.conf";

pub const COMMAND_TOTAL: usize = 14;
pub const ROLE_TOTAL: usize = 4;
pub const GROUP_TOTAL: usize = 2;
pub const OPTION_TOTAL: usize = 43;

/// Commands, one per subcommand the utility accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    ArchiveGet,
    ArchivePush,
    Backup,
    Check,
    Expire,
    Help,
    Info,
    Restore,
    StanzaCreate,
    StanzaDelete,
    StanzaUpgrade,
    Start,
    Stop,
    Version,
}

impl CommandId {
    pub const ALL: [CommandId; COMMAND_TOTAL] = [
        CommandId::ArchiveGet,
        CommandId::ArchivePush,
        CommandId::Backup,
        CommandId::Check,
        CommandId::Expire,
        CommandId::Help,
        CommandId::Info,
        CommandId::Restore,
        CommandId::StanzaCreate,
        CommandId::StanzaDelete,
        CommandId::StanzaUpgrade,
        CommandId::Start,
        CommandId::Stop,
        CommandId::Version,
    ];

    pub fn name(self) -> &'static str {
        COMMAND_RULES[self as usize].name
    }

    pub fn from_name(name: &str) -> Option<CommandId> {
        CommandId::ALL
            .into_iter()
            .find(|command| command.name() == name)
    }
}

/// Process role a command runs under. `Default` is the user-facing process;
/// the others are spawned workers that inherit a narrowed option set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CommandRole {
    #[default]
    Default,
    Async,
    Local,
    Remote,
}

impl CommandRole {
    pub fn name(self) -> &'static str {
        match self {
            CommandRole::Default => "default",
            CommandRole::Async => "async",
            CommandRole::Local => "local",
            CommandRole::Remote => "remote",
        }
    }

    pub fn from_name(name: &str) -> Option<CommandRole> {
        match name {
            "default" => Some(CommandRole::Default),
            "async" => Some(CommandRole::Async),
            "local" => Some(CommandRole::Local),
            "remote" => Some(CommandRole::Remote),
            _ => None,
        }
    }
}

/// Option groups. Options in a group share the group prefix and are addressed
/// by a key index (`pg7-path`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupId {
    Pg,
    Repo,
}

impl GroupId {
    pub const ALL: [GroupId; GROUP_TOTAL] = [GroupId::Pg, GroupId::Repo];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionId {
    ArchiveAsync,
    ArchiveTimeout,
    BufferSize,
    Compress,
    CompressLevel,
    Config,
    ConfigIncludePath,
    ConfigPath,
    DbInclude,
    DbTimeout,
    Delta,
    Force,
    LogLevelConsole,
    LogLevelFile,
    LogTimestamp,
    Online,
    Output,
    Pg,
    PgHost,
    PgHostPort,
    PgPath,
    PgPort,
    ProcessMax,
    ProtocolTimeout,
    RecoveryOption,
    Repo,
    RepoCipherPass,
    RepoCipherType,
    RepoHost,
    RepoHostPort,
    RepoPath,
    RepoRetentionFull,
    RepoS3Bucket,
    RepoS3Endpoint,
    RepoS3Key,
    RepoS3KeySecret,
    RepoS3Region,
    RepoType,
    Set,
    SpoolPath,
    Stanza,
    Target,
    Type,
}

impl OptionId {
    pub const ALL: [OptionId; OPTION_TOTAL] = [
        OptionId::ArchiveAsync,
        OptionId::ArchiveTimeout,
        OptionId::BufferSize,
        OptionId::Compress,
        OptionId::CompressLevel,
        OptionId::Config,
        OptionId::ConfigIncludePath,
        OptionId::ConfigPath,
        OptionId::DbInclude,
        OptionId::DbTimeout,
        OptionId::Delta,
        OptionId::Force,
        OptionId::LogLevelConsole,
        OptionId::LogLevelFile,
        OptionId::LogTimestamp,
        OptionId::Online,
        OptionId::Output,
        OptionId::Pg,
        OptionId::PgHost,
        OptionId::PgHostPort,
        OptionId::PgPath,
        OptionId::PgPort,
        OptionId::ProcessMax,
        OptionId::ProtocolTimeout,
        OptionId::RecoveryOption,
        OptionId::Repo,
        OptionId::RepoCipherPass,
        OptionId::RepoCipherType,
        OptionId::RepoHost,
        OptionId::RepoHostPort,
        OptionId::RepoPath,
        OptionId::RepoRetentionFull,
        OptionId::RepoS3Bucket,
        OptionId::RepoS3Endpoint,
        OptionId::RepoS3Key,
        OptionId::RepoS3KeySecret,
        OptionId::RepoS3Region,
        OptionId::RepoType,
        OptionId::Set,
        OptionId::SpoolPath,
        OptionId::Stanza,
        OptionId::Target,
        OptionId::Type,
    ];
}

/// How an option's raw string values materialise into a typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    Boolean,
    Integer,
    Size,
    Time,
    String,
    Path,
    List,
    Hash,
}

/// Where an option may be set from.
///
/// `CommandLine` options are rejected from config files (the environment may
/// still supply them). `Stanza` options are additionally rejected from the
/// `global` config sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    CommandLine,
    Global,
    Stanza,
}

/// A record in an option's optional-data stream.
#[derive(Debug, Clone, Copy)]
pub enum OptionData {
    /// Scopes all following records to a command.
    Command(CommandId),
    AllowList(&'static [&'static str]),
    AllowRange(i64, i64),
    Default(&'static str),
    /// The option is only resolvable when the named option has a value,
    /// optionally restricted to the listed values.
    Depend(OptionId, &'static [&'static str]),
    Required(bool),
}

pub struct CommandRule {
    pub name: &'static str,
    /// Bitset over [`CommandRole`] discriminants.
    pub roles: u8,
    pub parameters_allowed: bool,
}

pub struct GroupRule {
    pub name: &'static str,
}

pub struct OptionRule {
    pub name: &'static str,
    pub option_type: OptionType,
    pub section: Section,
    pub required: bool,
    pub secure: bool,
    pub multi: bool,
    /// A `no-` alias exists for this option.
    pub negate: bool,
    pub group: Option<GroupId>,
    /// Per-role bitmask over commands the option is valid for.
    pub commands: [u32; ROLE_TOTAL],
    pub data: &'static [OptionData],
}

const fn role_bit(role: CommandRole) -> u8 {
    1 << role as u8
}

const fn roles(list: &[CommandRole]) -> u8 {
    let mut mask = 0;
    let mut idx = 0;
    while idx < list.len() {
        mask |= role_bit(list[idx]);
        idx += 1;
    }
    mask
}

const fn cmds(list: &[CommandId]) -> u32 {
    let mut mask = 0;
    let mut idx = 0;
    while idx < list.len() {
        mask |= 1 << list[idx] as u32;
        idx += 1;
    }
    mask
}

/// The same command mask for every role.
const fn all_roles(mask: u32) -> [u32; ROLE_TOTAL] {
    [mask, mask, mask, mask]
}

const fn default_role(mask: u32) -> [u32; ROLE_TOTAL] {
    [mask, 0, 0, 0]
}

use CommandId::*;
use CommandRole::*;

pub static COMMAND_RULES: [CommandRule; COMMAND_TOTAL] = [
    CommandRule {
        name: "archive-get",
        roles: roles(&[Default, Async, Local]),
        parameters_allowed: true,
    },
    CommandRule {
        name: "archive-push",
        roles: roles(&[Default, Async, Local]),
        parameters_allowed: true,
    },
    CommandRule {
        name: "backup",
        roles: roles(&[Default, Local, Remote]),
        parameters_allowed: false,
    },
    CommandRule {
        name: "check",
        roles: roles(&[Default, Remote]),
        parameters_allowed: false,
    },
    CommandRule {
        name: "expire",
        roles: roles(&[Default]),
        parameters_allowed: false,
    },
    CommandRule {
        name: "help",
        roles: roles(&[Default]),
        parameters_allowed: true,
    },
    CommandRule {
        name: "info",
        roles: roles(&[Default]),
        parameters_allowed: false,
    },
    CommandRule {
        name: "restore",
        roles: roles(&[Default, Local, Remote]),
        parameters_allowed: false,
    },
    CommandRule {
        name: "stanza-create",
        roles: roles(&[Default, Remote]),
        parameters_allowed: false,
    },
    CommandRule {
        name: "stanza-delete",
        roles: roles(&[Default, Remote]),
        parameters_allowed: false,
    },
    CommandRule {
        name: "stanza-upgrade",
        roles: roles(&[Default, Remote]),
        parameters_allowed: false,
    },
    CommandRule {
        name: "start",
        roles: roles(&[Default]),
        parameters_allowed: false,
    },
    CommandRule {
        name: "stop",
        roles: roles(&[Default]),
        parameters_allowed: false,
    },
    CommandRule {
        name: "version",
        roles: roles(&[Default]),
        parameters_allowed: false,
    },
];

pub static GROUP_RULES: [GroupRule; GROUP_TOTAL] = [GroupRule { name: "pg" }, GroupRule { name: "repo" }];

// Command masks shared by several options.
const CMD_ALL: u32 = cmds(&[
    ArchiveGet,
    ArchivePush,
    Backup,
    Check,
    Expire,
    Info,
    Restore,
    StanzaCreate,
    StanzaDelete,
    StanzaUpgrade,
    Start,
    Stop,
]);
const CMD_ARCHIVE: u32 = cmds(&[ArchiveGet, ArchivePush]);
const CMD_PG: u32 = cmds(&[
    ArchiveGet,
    ArchivePush,
    Backup,
    Check,
    Restore,
    StanzaCreate,
    StanzaDelete,
    StanzaUpgrade,
]);
const CMD_REPO: u32 = cmds(&[
    ArchiveGet,
    ArchivePush,
    Backup,
    Check,
    Expire,
    Info,
    Restore,
    StanzaCreate,
    StanzaDelete,
    StanzaUpgrade,
]);

const LOG_LEVELS: &[&str] = &["off", "error", "warn", "info", "detail", "debug", "trace"];

pub static OPTION_RULES: [OptionRule; OPTION_TOTAL] = [
    OptionRule {
        name: "archive-async",
        option_type: OptionType::Boolean,
        section: Section::Global,
        required: false,
        secure: false,
        multi: false,
        negate: true,
        group: None,
        commands: all_roles(CMD_ARCHIVE),
        data: &[OptionData::Default("0")],
    },
    OptionRule {
        name: "archive-timeout",
        option_type: OptionType::Time,
        section: Section::Global,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: None,
        commands: all_roles(cmds(&[ArchivePush, Backup, Check])),
        data: &[
            OptionData::Default("60000"),
            OptionData::AllowRange(100, 86_400_000),
        ],
    },
    OptionRule {
        name: "buffer-size",
        option_type: OptionType::Size,
        section: Section::Global,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: None,
        commands: all_roles(CMD_ALL),
        data: &[
            OptionData::Default("1048576"),
            OptionData::AllowRange(16384, 1_073_741_824),
        ],
    },
    OptionRule {
        name: "compress",
        option_type: OptionType::Boolean,
        section: Section::Global,
        required: false,
        secure: false,
        multi: false,
        negate: true,
        group: None,
        commands: all_roles(cmds(&[ArchivePush, Backup])),
        data: &[OptionData::Default("1")],
    },
    OptionRule {
        name: "compress-level",
        option_type: OptionType::Integer,
        section: Section::Global,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: None,
        commands: all_roles(cmds(&[ArchivePush, Backup])),
        data: &[
            OptionData::Default("6"),
            OptionData::AllowRange(0, 9),
            OptionData::Depend(OptionId::Compress, &["1"]),
        ],
    },
    OptionRule {
        name: "config",
        option_type: OptionType::String,
        section: Section::CommandLine,
        required: false,
        secure: false,
        multi: false,
        negate: true,
        group: None,
        commands: all_roles(CMD_ALL),
        data: &[OptionData::Default(CONFIG_FILE_DEFAULT)],
    },
    OptionRule {
        name: "config-include-path",
        option_type: OptionType::String,
        section: Section::CommandLine,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: None,
        commands: all_roles(CMD_ALL),
        data: &[OptionData::Default(CONFIG_INCLUDE_PATH_DEFAULT)],
    },
    OptionRule {
        name: "config-path",
        option_type: OptionType::String,
        section: Section::CommandLine,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: None,
        commands: all_roles(CMD_ALL),
        data: &[],
    },
    OptionRule {
        name: "db-include",
        option_type: OptionType::List,
        section: Section::Stanza,
        required: false,
        secure: false,
        multi: true,
        negate: false,
        group: None,
        commands: all_roles(cmds(&[Restore])),
        data: &[],
    },
    OptionRule {
        name: "db-timeout",
        option_type: OptionType::Time,
        section: Section::Global,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: None,
        commands: all_roles(CMD_ALL),
        data: &[
            OptionData::Default("1800000"),
            OptionData::AllowRange(100, 604_800_000),
        ],
    },
    OptionRule {
        name: "delta",
        option_type: OptionType::Boolean,
        section: Section::Global,
        required: false,
        secure: false,
        multi: false,
        negate: true,
        group: None,
        commands: all_roles(cmds(&[Backup, Restore])),
        data: &[OptionData::Default("0")],
    },
    OptionRule {
        name: "force",
        option_type: OptionType::Boolean,
        section: Section::CommandLine,
        required: false,
        secure: false,
        multi: false,
        negate: true,
        group: None,
        commands: default_role(cmds(&[Backup, Restore, StanzaCreate, StanzaDelete, Stop])),
        data: &[OptionData::Default("0")],
    },
    OptionRule {
        name: "log-level-console",
        option_type: OptionType::String,
        section: Section::Global,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: None,
        commands: all_roles(CMD_ALL),
        data: &[
            OptionData::Default("warn"),
            OptionData::AllowList(LOG_LEVELS),
        ],
    },
    OptionRule {
        name: "log-level-file",
        option_type: OptionType::String,
        section: Section::Global,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: None,
        commands: all_roles(CMD_ALL),
        data: &[
            OptionData::Default("info"),
            OptionData::AllowList(LOG_LEVELS),
        ],
    },
    OptionRule {
        name: "log-timestamp",
        option_type: OptionType::Boolean,
        section: Section::Global,
        required: false,
        secure: false,
        multi: false,
        negate: true,
        group: None,
        commands: all_roles(CMD_ALL),
        data: &[OptionData::Default("1")],
    },
    OptionRule {
        name: "online",
        option_type: OptionType::Boolean,
        section: Section::Global,
        required: false,
        secure: false,
        multi: false,
        negate: true,
        group: None,
        commands: all_roles(cmds(&[Backup, Check, StanzaCreate, StanzaUpgrade])),
        data: &[OptionData::Default("1")],
    },
    OptionRule {
        name: "output",
        option_type: OptionType::String,
        section: Section::CommandLine,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: None,
        commands: default_role(cmds(&[Info])),
        data: &[
            OptionData::Default("text"),
            OptionData::AllowList(&["text", "json"]),
        ],
    },
    OptionRule {
        name: "pg",
        option_type: OptionType::Integer,
        section: Section::CommandLine,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: None,
        commands: all_roles(CMD_PG),
        data: &[OptionData::AllowRange(1, 256)],
    },
    OptionRule {
        name: "pg-host",
        option_type: OptionType::String,
        section: Section::Stanza,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: Some(GroupId::Pg),
        commands: all_roles(CMD_PG),
        data: &[],
    },
    OptionRule {
        name: "pg-host-port",
        option_type: OptionType::Integer,
        section: Section::Stanza,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: Some(GroupId::Pg),
        commands: all_roles(CMD_PG),
        data: &[
            OptionData::AllowRange(1, 65535),
            OptionData::Depend(OptionId::PgHost, &[]),
        ],
    },
    OptionRule {
        name: "pg-path",
        option_type: OptionType::Path,
        section: Section::Stanza,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: Some(GroupId::Pg),
        commands: all_roles(CMD_PG),
        data: &[
            OptionData::Command(Check),
            OptionData::Required(true),
            OptionData::Command(StanzaCreate),
            OptionData::Required(true),
            OptionData::Command(StanzaUpgrade),
            OptionData::Required(true),
        ],
    },
    OptionRule {
        name: "pg-port",
        option_type: OptionType::Integer,
        section: Section::Stanza,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: Some(GroupId::Pg),
        commands: all_roles(CMD_PG),
        data: &[
            OptionData::Default("5432"),
            OptionData::AllowRange(1, 65535),
        ],
    },
    OptionRule {
        name: "process-max",
        option_type: OptionType::Integer,
        section: Section::Global,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: None,
        commands: all_roles(CMD_ALL),
        data: &[
            OptionData::Default("1"),
            OptionData::AllowRange(1, 999),
        ],
    },
    OptionRule {
        name: "protocol-timeout",
        option_type: OptionType::Time,
        section: Section::Global,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: None,
        commands: all_roles(CMD_ALL),
        data: &[
            OptionData::Default("1830000"),
            OptionData::AllowRange(100, 604_800_000),
        ],
    },
    OptionRule {
        name: "recovery-option",
        option_type: OptionType::Hash,
        section: Section::Stanza,
        required: false,
        secure: false,
        multi: true,
        negate: false,
        group: None,
        commands: all_roles(cmds(&[Restore])),
        data: &[],
    },
    OptionRule {
        name: "repo",
        option_type: OptionType::Integer,
        section: Section::CommandLine,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: None,
        commands: all_roles(CMD_REPO),
        data: &[OptionData::AllowRange(1, 256)],
    },
    OptionRule {
        name: "repo-cipher-pass",
        option_type: OptionType::String,
        section: Section::Global,
        required: true,
        secure: true,
        multi: false,
        negate: false,
        group: Some(GroupId::Repo),
        commands: all_roles(CMD_REPO),
        data: &[OptionData::Depend(
            OptionId::RepoCipherType,
            &["aes-256-cbc"],
        )],
    },
    OptionRule {
        name: "repo-cipher-type",
        option_type: OptionType::String,
        section: Section::Global,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: Some(GroupId::Repo),
        commands: all_roles(CMD_REPO),
        data: &[
            OptionData::Default("none"),
            OptionData::AllowList(&["none", "aes-256-cbc"]),
        ],
    },
    OptionRule {
        name: "repo-host",
        option_type: OptionType::String,
        section: Section::Global,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: Some(GroupId::Repo),
        commands: all_roles(CMD_REPO),
        data: &[],
    },
    OptionRule {
        name: "repo-host-port",
        option_type: OptionType::Integer,
        section: Section::Global,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: Some(GroupId::Repo),
        commands: all_roles(CMD_REPO),
        data: &[
            OptionData::AllowRange(1, 65535),
            OptionData::Depend(OptionId::RepoHost, &[]),
        ],
    },
    OptionRule {
        name: "repo-path",
        option_type: OptionType::Path,
        section: Section::Global,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: Some(GroupId::Repo),
        commands: all_roles(CMD_REPO),
        data: &[OptionData::Default("/var/lib/pgbackrest")],
    },
    OptionRule {
        name: "repo-retention-full",
        option_type: OptionType::Integer,
        section: Section::Global,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: Some(GroupId::Repo),
        commands: all_roles(cmds(&[Backup, Expire])),
        data: &[OptionData::AllowRange(1, 9_999_999)],
    },
    OptionRule {
        name: "repo-s3-bucket",
        option_type: OptionType::String,
        section: Section::Global,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: Some(GroupId::Repo),
        commands: all_roles(CMD_REPO),
        data: &[OptionData::Depend(OptionId::RepoType, &["s3"])],
    },
    OptionRule {
        name: "repo-s3-endpoint",
        option_type: OptionType::String,
        section: Section::Global,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: Some(GroupId::Repo),
        commands: all_roles(CMD_REPO),
        data: &[OptionData::Depend(OptionId::RepoType, &["s3"])],
    },
    OptionRule {
        name: "repo-s3-key",
        option_type: OptionType::String,
        section: Section::Global,
        required: false,
        secure: true,
        multi: false,
        negate: false,
        group: Some(GroupId::Repo),
        commands: all_roles(CMD_REPO),
        data: &[OptionData::Depend(OptionId::RepoType, &["s3"])],
    },
    OptionRule {
        name: "repo-s3-key-secret",
        option_type: OptionType::String,
        section: Section::Global,
        required: false,
        secure: true,
        multi: false,
        negate: false,
        group: Some(GroupId::Repo),
        commands: all_roles(CMD_REPO),
        data: &[OptionData::Depend(OptionId::RepoType, &["s3"])],
    },
    OptionRule {
        name: "repo-s3-region",
        option_type: OptionType::String,
        section: Section::Global,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: Some(GroupId::Repo),
        commands: all_roles(CMD_REPO),
        data: &[OptionData::Depend(OptionId::RepoType, &["s3"])],
    },
    OptionRule {
        name: "repo-type",
        option_type: OptionType::String,
        section: Section::Global,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: Some(GroupId::Repo),
        commands: all_roles(CMD_REPO),
        data: &[
            OptionData::Default("posix"),
            OptionData::AllowList(&["cifs", "posix", "s3"]),
        ],
    },
    OptionRule {
        name: "set",
        option_type: OptionType::String,
        section: Section::CommandLine,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: None,
        commands: default_role(cmds(&[Info, Restore])),
        data: &[
            OptionData::Command(Restore),
            OptionData::Default("latest"),
        ],
    },
    OptionRule {
        name: "spool-path",
        option_type: OptionType::Path,
        section: Section::Global,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: None,
        commands: all_roles(CMD_ARCHIVE),
        data: &[
            OptionData::Default("/var/spool/pgbackrest"),
            OptionData::Depend(OptionId::ArchiveAsync, &["1"]),
        ],
    },
    OptionRule {
        name: "stanza",
        option_type: OptionType::String,
        section: Section::CommandLine,
        required: true,
        secure: false,
        multi: false,
        negate: false,
        group: None,
        commands: all_roles(CMD_ALL),
        data: &[
            OptionData::Command(Info),
            OptionData::Required(false),
            OptionData::Command(Start),
            OptionData::Required(false),
            OptionData::Command(Stop),
            OptionData::Required(false),
        ],
    },
    OptionRule {
        name: "target",
        option_type: OptionType::String,
        section: Section::CommandLine,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: None,
        commands: default_role(cmds(&[Restore])),
        data: &[OptionData::Depend(
            OptionId::Type,
            &["name", "time", "xid"],
        )],
    },
    OptionRule {
        name: "type",
        option_type: OptionType::String,
        section: Section::CommandLine,
        required: false,
        secure: false,
        multi: false,
        negate: false,
        group: None,
        commands: default_role(cmds(&[Backup, Restore])),
        data: &[
            OptionData::Command(Backup),
            OptionData::AllowList(&["full", "diff", "incr"]),
            OptionData::Default("incr"),
            OptionData::Command(Restore),
            OptionData::AllowList(&[
                "default",
                "immediate",
                "name",
                "standby",
                "time",
                "xid",
            ]),
            OptionData::Default("default"),
        ],
    },
];

/// Deprecated option names kept for old configurations: alias, canonical
/// option, 0-based key index.
pub static DEPRECATIONS: [(&str, OptionId, usize); 4] = [
    ("backup-host", OptionId::RepoHost, 0),
    ("db-host", OptionId::PgHost, 0),
    ("db-path", OptionId::PgPath, 0),
    ("db-port", OptionId::PgPort, 0),
];

/// Materialisation order: a topological order of the depend graph so that a
/// depend target is always resolved before its dependents.
pub static RESOLVE_ORDER: [OptionId; OPTION_TOTAL] = [
    OptionId::ArchiveAsync,
    OptionId::ArchiveTimeout,
    OptionId::BufferSize,
    OptionId::Compress,
    OptionId::CompressLevel,
    OptionId::Config,
    OptionId::ConfigIncludePath,
    OptionId::ConfigPath,
    OptionId::DbInclude,
    OptionId::DbTimeout,
    OptionId::Delta,
    OptionId::Force,
    OptionId::LogLevelConsole,
    OptionId::LogLevelFile,
    OptionId::LogTimestamp,
    OptionId::Online,
    OptionId::Output,
    OptionId::Pg,
    OptionId::PgHost,
    OptionId::PgHostPort,
    OptionId::PgPath,
    OptionId::PgPort,
    OptionId::ProcessMax,
    OptionId::ProtocolTimeout,
    OptionId::RecoveryOption,
    OptionId::Repo,
    OptionId::RepoCipherType,
    OptionId::RepoCipherPass,
    OptionId::RepoHost,
    OptionId::RepoHostPort,
    OptionId::RepoPath,
    OptionId::RepoRetentionFull,
    OptionId::RepoType,
    OptionId::RepoS3Bucket,
    OptionId::RepoS3Endpoint,
    OptionId::RepoS3Key,
    OptionId::RepoS3KeySecret,
    OptionId::RepoS3Region,
    OptionId::Set,
    OptionId::SpoolPath,
    OptionId::Stanza,
    OptionId::Type,
    OptionId::Target,
];
