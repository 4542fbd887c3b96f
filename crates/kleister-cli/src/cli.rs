//! Argument parsing, startup and command dispatch.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use kleister_client::Kleister;
use kleister_client::api::flag_pair;
use kleister_client::models::Perm;
use kleister_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use uuid::Uuid;

use crate::client::{AppContext, CliError, CliResult};
use crate::commands::{builds, catalog, clients, keys, mods, packs, profile, teams, users, versions};
use crate::config::{self, DEFAULT_TIMEOUT_SECS, Settings, process_env};
use crate::output::{Output, OutputFormat};

/// Parses process arguments, executes the requested command and returns
/// the process exit code.
pub async fn run() -> i32 {
    run_with_args(std::env::args_os()).await
}

/// [`run`] with explicit arguments, the first being the program name.
pub async fn run_with_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let env_file = match config::load_env_file() {
        Ok(path) => path,
        Err(err) => {
            eprintln!("Error: {}", err.display_message());
            return err.exit_code();
        }
    };

    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let exit_code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            return exit_code;
        }
    };

    let level = if cli.global.debug { "debug" } else { DEFAULT_LOG_LEVEL };
    let logging = LoggingConfig {
        level,
        format: LogFormat::infer(),
        build_sha: env!("CARGO_PKG_VERSION"),
    };
    if let Err(err) = init_logging(&logging) {
        tracing::debug!(error = %err, "keeping the installed subscriber");
    }
    if let Some(path) = env_file {
        tracing::debug!(path = %path.display(), "loaded environment file");
    }

    let request_id = Uuid::new_v4().to_string();
    match dispatch(cli, &request_id).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("Error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli, request_id: &str) -> CliResult<()> {
    let Cli { global, command } = cli;
    let output = Output::from_flags(global.output, global.json, global.xml, global.format)?;
    let settings = Settings::resolve(
        global.server.as_deref(),
        global.token.as_deref(),
        global.timeout,
        process_env,
    )?;
    let api = Kleister::connect(settings.transport(request_id))?;
    tracing::debug!(
        command = command_label(&command),
        server = %settings.server,
        request_id,
        "dispatching command"
    );

    let ctx = AppContext { api, output };
    match command {
        Command::Pack(command) => packs::handle(&ctx, command).await,
        Command::Build(command) => builds::handle(&ctx, command).await,
        Command::Mod(command) => mods::handle(&ctx, command).await,
        Command::Version(command) => versions::handle(&ctx, command).await,
        Command::Minecraft(command) => catalog::handle_minecraft(&ctx, command).await,
        Command::Forge(command) => catalog::handle_forge(&ctx, command).await,
        Command::User(command) => users::handle(&ctx, command).await,
        Command::Team(command) => teams::handle(&ctx, command).await,
        Command::Client(command) => clients::handle(&ctx, command).await,
        Command::Profile(command) => profile::handle(&ctx, command).await,
        Command::Key(command) => keys::handle(&ctx, command).await,
    }
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Pack(_) => "pack",
        Command::Build(_) => "build",
        Command::Mod(_) => "mod",
        Command::Version(_) => "version",
        Command::Minecraft(_) => "minecraft",
        Command::Forge(_) => "forge",
        Command::User(_) => "user",
        Command::Team(_) => "team",
        Command::Client(_) => "client",
        Command::Profile(_) => "profile",
        Command::Key(_) => "key",
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "kleister",
    version,
    about = "Manage mod packs for the Kleister launcher ecosystem"
)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) global: GlobalArgs,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Args, Debug)]
pub(crate) struct GlobalArgs {
    #[arg(
        long,
        global = true,
        env = "KLEISTER_SERVER",
        value_name = "URL",
        help = "API server URL; falls back to SOLDER_SERVER, then http://localhost:8080"
    )]
    pub(crate) server: Option<String>,
    #[arg(
        long,
        global = true,
        env = "KLEISTER_TOKEN",
        hide_env_values = true,
        value_name = "TOKEN",
        help = "Bearer token; falls back to SOLDER_TOKEN"
    )]
    pub(crate) token: Option<String>,
    #[arg(
        long,
        global = true,
        env = "KLEISTER_TIMEOUT",
        value_name = "SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        help = "Deadline for each HTTP request in seconds"
    )]
    pub(crate) timeout: u64,
    #[arg(long, global = true, help = "Log HTTP exchanges to stderr")]
    pub(crate) debug: bool,
    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Output encoding"
    )]
    pub(crate) output: OutputFormat,
    #[arg(long, global = true, help = "Shorthand for --output json")]
    pub(crate) json: bool,
    #[arg(long, global = true, help = "Shorthand for --output xml")]
    pub(crate) xml: bool,
    #[arg(
        long,
        global = true,
        value_name = "TEMPLATE",
        help = "Text template, e.g. \"{{ id }} {{ slug | upper }}\""
    )]
    pub(crate) format: Option<String>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Pack related sub-commands
    #[command(subcommand)]
    Pack(PackCommand),
    /// Build related sub-commands
    #[command(subcommand)]
    Build(BuildCommand),
    /// Mod related sub-commands
    #[command(subcommand)]
    Mod(ModCommand),
    /// Version related sub-commands
    #[command(subcommand)]
    Version(VersionCommand),
    /// Minecraft catalog sub-commands
    #[command(subcommand)]
    Minecraft(CatalogCommand),
    /// Forge catalog sub-commands
    #[command(subcommand)]
    Forge(CatalogCommand),
    /// User related sub-commands
    #[command(subcommand)]
    User(UserCommand),
    /// Team related sub-commands
    #[command(subcommand)]
    Team(TeamCommand),
    /// Client related sub-commands
    #[command(subcommand)]
    Client(ClientCommand),
    /// Profile related sub-commands
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// API key related sub-commands
    #[command(subcommand)]
    Key(KeyCommand),
}

#[derive(Args, Debug)]
pub(crate) struct IdArgs {
    #[arg(short, long, help = "Id or slug")]
    pub(crate) id: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct Visibility {
    #[arg(long, help = "Mark as published")]
    pub(crate) published: bool,
    #[arg(long, help = "Mark as hidden")]
    pub(crate) hidden: bool,
    #[arg(long, help = "Restrict to assigned clients")]
    pub(crate) private: bool,
    #[arg(long, help = "Make available to every client")]
    pub(crate) public: bool,
}

impl Visibility {
    pub(crate) fn published(&self) -> CliResult<Option<bool>> {
        Ok(flag_pair(self.published, self.hidden, "published", "hidden")?)
    }

    pub(crate) fn private(&self) -> CliResult<Option<bool>> {
        Ok(flag_pair(self.private, self.public, "private", "public")?)
    }
}

// Links between entities. `List` takes the owner, the other variants also
// name the member; permissioned links carry a grade.

/// Owner and member of a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Link {
    pub(crate) owner: String,
    pub(crate) member: String,
    pub(crate) perm: Option<String>,
}

impl Link {
    pub(crate) fn perm_or_default(&self) -> CliResult<Perm> {
        self.perm
            .as_deref()
            .map_or(Ok(Perm::User), |perm| Ok(perm.parse::<Perm>()?))
    }

    pub(crate) fn required_perm(&self) -> CliResult<Perm> {
        let perm = self
            .perm
            .as_deref()
            .ok_or_else(|| CliError::validation("missing --perm, expected one of user, admin, owner"))?;
        Ok(perm.parse::<Perm>()?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LinkOp {
    List { owner: String },
    Append(Link),
    Perm(Link),
    Remove(Link),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PlainLinkOp {
    List { owner: String },
    Append(Link),
    Remove(Link),
}

macro_rules! permissioned_link_command {
    ($command:ident, $args:ident, $long:literal, $value:literal) => {
        #[derive(Args, Debug)]
        pub(crate) struct $args {
            #[arg(short, long, help = "Owner id or slug")]
            pub(crate) id: String,
            #[arg(long = $long, value_name = $value, help = "Id or slug to link")]
            pub(crate) member: String,
            #[arg(long, value_name = "PERM", help = "Permission grade: user, admin or owner")]
            pub(crate) perm: Option<String>,
        }

        #[derive(Subcommand, Debug)]
        pub(crate) enum $command {
            /// List assignments with their grade
            #[command(visible_alias = "ls")]
            List(IdArgs),
            /// Assign, granting `user` unless --perm is given
            Append($args),
            /// Change the grade of an assignment
            Perm($args),
            /// Remove an assignment
            #[command(visible_alias = "rm")]
            Remove($args),
        }

        impl From<$args> for Link {
            fn from(args: $args) -> Self {
                Self {
                    owner: args.id,
                    member: args.member,
                    perm: args.perm,
                }
            }
        }

        impl From<$command> for LinkOp {
            fn from(command: $command) -> Self {
                match command {
                    $command::List(args) => Self::List { owner: args.id },
                    $command::Append(args) => Self::Append(args.into()),
                    $command::Perm(args) => Self::Perm(args.into()),
                    $command::Remove(args) => Self::Remove(args.into()),
                }
            }
        }
    };
}

macro_rules! plain_link_command {
    ($command:ident, $args:ident, $long:literal, $value:literal) => {
        #[derive(Args, Debug)]
        pub(crate) struct $args {
            #[arg(short, long, help = "Owner id or slug")]
            pub(crate) id: String,
            #[arg(long = $long, value_name = $value, help = "Id or slug to link")]
            pub(crate) member: String,
        }

        #[derive(Subcommand, Debug)]
        pub(crate) enum $command {
            /// List assignments
            #[command(visible_alias = "ls")]
            List(IdArgs),
            /// Assign
            Append($args),
            /// Remove an assignment
            #[command(visible_alias = "rm")]
            Remove($args),
        }

        impl From<$command> for PlainLinkOp {
            fn from(command: $command) -> Self {
                let link = |args: $args| Link {
                    owner: args.id,
                    member: args.member,
                    perm: None,
                };
                match command {
                    $command::List(args) => Self::List { owner: args.id },
                    $command::Append(args) => Self::Append(link(args)),
                    $command::Remove(args) => Self::Remove(link(args)),
                }
            }
        }
    };
}

permissioned_link_command!(UserLinkCommand, UserLinkArgs, "user", "USER");
permissioned_link_command!(TeamLinkCommand, TeamLinkArgs, "team", "TEAM");
permissioned_link_command!(PackLinkCommand, PackLinkArgs, "pack", "PACK");
permissioned_link_command!(ModLinkCommand, ModLinkArgs, "mod", "MOD");
plain_link_command!(ClientPlainLinkCommand, ClientPlainLinkArgs, "client", "CLIENT");
plain_link_command!(PackPlainLinkCommand, PackPlainLinkArgs, "pack", "PACK");

// Packs

#[derive(Subcommand, Debug)]
pub(crate) enum PackCommand {
    /// List all packs
    #[command(visible_alias = "ls")]
    List,
    /// Display a pack
    Show(IdArgs),
    /// Create a pack
    Create(PackCreateArgs),
    /// Update a pack
    Update(PackUpdateArgs),
    /// Delete a pack
    #[command(visible_alias = "rm")]
    Delete(IdArgs),
    /// Clients assigned to a pack
    #[command(subcommand)]
    Client(ClientPlainLinkCommand),
    /// Users assigned to a pack
    #[command(subcommand)]
    User(UserLinkCommand),
    /// Teams assigned to a pack
    #[command(subcommand)]
    Team(TeamLinkCommand),
}

#[derive(Args, Debug, Default)]
pub(crate) struct PackArtwork {
    #[arg(long, value_name = "URL", help = "Fetch the icon from a URL")]
    pub(crate) icon_url: Option<String>,
    #[arg(long, value_name = "PATH", help = "Read the icon from a file")]
    pub(crate) icon_path: Option<PathBuf>,
    #[arg(long, value_name = "URL", help = "Fetch the logo from a URL")]
    pub(crate) logo_url: Option<String>,
    #[arg(long, value_name = "PATH", help = "Read the logo from a file")]
    pub(crate) logo_path: Option<PathBuf>,
    #[arg(long, value_name = "URL", help = "Fetch the background from a URL")]
    pub(crate) bg_url: Option<String>,
    #[arg(long, value_name = "PATH", help = "Read the background from a file")]
    pub(crate) bg_path: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct PackCreateArgs {
    #[arg(long, help = "Slug, derived from the name when omitted")]
    pub(crate) slug: Option<String>,
    #[arg(long, help = "Display name")]
    pub(crate) name: String,
    #[arg(long, help = "Website URL")]
    pub(crate) website: Option<String>,
    #[command(flatten)]
    pub(crate) artwork: PackArtwork,
    #[command(flatten)]
    pub(crate) visibility: Visibility,
}

#[derive(Args, Debug)]
pub(crate) struct PackUpdateArgs {
    #[arg(short, long, help = "Pack id or slug")]
    pub(crate) id: String,
    #[arg(long)]
    pub(crate) slug: Option<String>,
    #[arg(long)]
    pub(crate) name: Option<String>,
    #[arg(long)]
    pub(crate) website: Option<String>,
    #[arg(long, value_name = "BUILD", help = "Recommended build id or slug, empty to clear")]
    pub(crate) recommended: Option<String>,
    #[arg(long, value_name = "BUILD", help = "Latest build id or slug, empty to clear")]
    pub(crate) latest: Option<String>,
    #[command(flatten)]
    pub(crate) artwork: PackArtwork,
    #[command(flatten)]
    pub(crate) visibility: Visibility,
}

// Builds

#[derive(Subcommand, Debug)]
pub(crate) enum BuildCommand {
    /// List the builds of a pack
    #[command(visible_alias = "ls")]
    List(PackRefArgs),
    /// Display a build
    Show(BuildIdArgs),
    /// Create a build
    Create(BuildCreateArgs),
    /// Update a build
    Update(BuildUpdateArgs),
    /// Delete a build
    #[command(visible_alias = "rm")]
    Delete(BuildIdArgs),
    /// Versions assigned to a build
    #[command(subcommand)]
    Version(BuildVersionCommand),
}

#[derive(Args, Debug)]
pub(crate) struct PackRefArgs {
    #[arg(long, help = "Pack id or slug")]
    pub(crate) pack: String,
}

#[derive(Args, Debug)]
pub(crate) struct BuildIdArgs {
    #[arg(long, help = "Pack id or slug")]
    pub(crate) pack: String,
    #[arg(short, long, help = "Build id or slug")]
    pub(crate) id: String,
}

#[derive(Args, Debug)]
pub(crate) struct BuildCreateArgs {
    #[arg(long, help = "Pack id or slug")]
    pub(crate) pack: String,
    #[arg(long)]
    pub(crate) slug: Option<String>,
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long, help = "Minecraft version id or slug")]
    pub(crate) minecraft: Option<String>,
    #[arg(long, help = "Forge version id or slug")]
    pub(crate) forge: Option<String>,
    #[arg(long, help = "Minimal Java version")]
    pub(crate) min_java: Option<String>,
    #[arg(long, help = "Minimal memory")]
    pub(crate) min_memory: Option<String>,
    #[command(flatten)]
    pub(crate) visibility: Visibility,
}

#[derive(Args, Debug)]
pub(crate) struct BuildUpdateArgs {
    #[arg(long, help = "Pack id or slug")]
    pub(crate) pack: String,
    #[arg(short, long, help = "Build id or slug")]
    pub(crate) id: String,
    #[arg(long)]
    pub(crate) slug: Option<String>,
    #[arg(long)]
    pub(crate) name: Option<String>,
    #[arg(long, help = "Minecraft version id or slug, empty to clear")]
    pub(crate) minecraft: Option<String>,
    #[arg(long, help = "Forge version id or slug, empty to clear")]
    pub(crate) forge: Option<String>,
    #[arg(long)]
    pub(crate) min_java: Option<String>,
    #[arg(long)]
    pub(crate) min_memory: Option<String>,
    #[command(flatten)]
    pub(crate) visibility: Visibility,
}

#[derive(Subcommand, Debug)]
pub(crate) enum BuildVersionCommand {
    /// List versions assigned to a build
    #[command(visible_alias = "ls")]
    List(BuildIdArgs),
    /// Assign a version
    Append(BuildVersionArgs),
    /// Remove a version
    #[command(visible_alias = "rm")]
    Remove(BuildVersionArgs),
}

#[derive(Args, Debug)]
pub(crate) struct BuildVersionArgs {
    #[arg(long, help = "Pack id or slug")]
    pub(crate) pack: String,
    #[arg(short, long, help = "Build id or slug")]
    pub(crate) id: String,
    #[arg(long = "mod", value_name = "MOD", help = "Mod id or slug")]
    pub(crate) module: String,
    #[arg(long, help = "Version id or slug")]
    pub(crate) version: String,
}

// Mods

#[derive(Subcommand, Debug)]
pub(crate) enum ModCommand {
    /// List all mods
    #[command(visible_alias = "ls")]
    List,
    /// Display a mod
    Show(IdArgs),
    /// Create a mod
    Create(ModCreateArgs),
    /// Update a mod
    Update(ModUpdateArgs),
    /// Delete a mod
    #[command(visible_alias = "rm")]
    Delete(IdArgs),
    /// Users assigned to a mod
    #[command(subcommand)]
    User(UserLinkCommand),
    /// Teams assigned to a mod
    #[command(subcommand)]
    Team(TeamLinkCommand),
}

#[derive(Args, Debug)]
pub(crate) struct ModCreateArgs {
    #[arg(long)]
    pub(crate) slug: Option<String>,
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) description: Option<String>,
    #[arg(long)]
    pub(crate) author: Option<String>,
    #[arg(long)]
    pub(crate) website: Option<String>,
    #[arg(long, help = "Donation URL")]
    pub(crate) donate: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ModUpdateArgs {
    #[arg(short, long, help = "Mod id or slug")]
    pub(crate) id: String,
    #[arg(long)]
    pub(crate) slug: Option<String>,
    #[arg(long)]
    pub(crate) name: Option<String>,
    #[arg(long)]
    pub(crate) description: Option<String>,
    #[arg(long)]
    pub(crate) author: Option<String>,
    #[arg(long)]
    pub(crate) website: Option<String>,
    #[arg(long)]
    pub(crate) donate: Option<String>,
}

// Versions

#[derive(Subcommand, Debug)]
pub(crate) enum VersionCommand {
    /// List the versions of a mod
    #[command(visible_alias = "ls")]
    List(ModRefArgs),
    /// Display a version
    Show(VersionIdArgs),
    /// Create a version
    Create(VersionCreateArgs),
    /// Update a version
    Update(VersionUpdateArgs),
    /// Delete a version
    #[command(visible_alias = "rm")]
    Delete(VersionIdArgs),
    /// Builds a version is assigned to
    #[command(subcommand)]
    Build(VersionBuildCommand),
}

#[derive(Args, Debug)]
pub(crate) struct ModRefArgs {
    #[arg(long = "mod", value_name = "MOD", help = "Mod id or slug")]
    pub(crate) module: String,
}

#[derive(Args, Debug)]
pub(crate) struct VersionIdArgs {
    #[arg(long = "mod", value_name = "MOD", help = "Mod id or slug")]
    pub(crate) module: String,
    #[arg(short, long, help = "Version id or slug")]
    pub(crate) id: String,
}

#[derive(Args, Debug)]
pub(crate) struct VersionCreateArgs {
    #[arg(long = "mod", value_name = "MOD", help = "Mod id or slug")]
    pub(crate) module: String,
    #[arg(long)]
    pub(crate) slug: Option<String>,
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long, value_name = "URL", help = "Fetch the archive from a URL")]
    pub(crate) file_url: Option<String>,
    #[arg(long, value_name = "PATH", help = "Read the archive from a file")]
    pub(crate) file_path: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct VersionUpdateArgs {
    #[arg(long = "mod", value_name = "MOD", help = "Mod id or slug")]
    pub(crate) module: String,
    #[arg(short, long, help = "Version id or slug")]
    pub(crate) id: String,
    #[arg(long)]
    pub(crate) slug: Option<String>,
    #[arg(long)]
    pub(crate) name: Option<String>,
    #[arg(long, value_name = "URL")]
    pub(crate) file_url: Option<String>,
    #[arg(long, value_name = "PATH")]
    pub(crate) file_path: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum VersionBuildCommand {
    /// List builds a version is assigned to
    #[command(visible_alias = "ls")]
    List(VersionIdArgs),
    /// Assign to a build
    Append(VersionBuildArgs),
    /// Remove from a build
    #[command(visible_alias = "rm")]
    Remove(VersionBuildArgs),
}

#[derive(Args, Debug)]
pub(crate) struct VersionBuildArgs {
    #[arg(long = "mod", value_name = "MOD", help = "Mod id or slug")]
    pub(crate) module: String,
    #[arg(short, long, help = "Version id or slug")]
    pub(crate) id: String,
    #[arg(long, help = "Pack id or slug")]
    pub(crate) pack: String,
    #[arg(long, help = "Build id or slug")]
    pub(crate) build: String,
}

// Catalogs

#[derive(Subcommand, Debug)]
pub(crate) enum CatalogCommand {
    /// List available versions
    #[command(visible_alias = "ls")]
    List(CatalogListArgs),
    /// Ask the server to re-scrape the upstream index
    #[command(visible_alias = "update")]
    Refresh,
    /// Builds pinned to a version
    #[command(subcommand)]
    Build(CatalogBuildCommand),
}

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogListArgs {
    #[arg(long, help = "Filter expression, e.g. \"version contains '1.12'\"")]
    pub(crate) filter: Option<String>,
    #[arg(long, value_name = "FIELD", help = "Sort field")]
    pub(crate) sort: Option<String>,
    #[arg(long, help = "Only print the first row")]
    pub(crate) first: bool,
    #[arg(long, help = "Only print the last row")]
    pub(crate) last: bool,
}

#[derive(Subcommand, Debug)]
pub(crate) enum CatalogBuildCommand {
    /// List builds pinned to a version
    #[command(visible_alias = "ls")]
    List(IdArgs),
    /// Pin a build to a version
    Append(CatalogBuildArgs),
    /// Unpin a build
    #[command(visible_alias = "rm")]
    Remove(CatalogBuildArgs),
}

#[derive(Args, Debug)]
pub(crate) struct CatalogBuildArgs {
    #[arg(short, long, help = "Version id or slug")]
    pub(crate) id: String,
    #[arg(long, help = "Pack id or slug")]
    pub(crate) pack: String,
    #[arg(long, help = "Build id or slug")]
    pub(crate) build: String,
}

// Users

#[derive(Subcommand, Debug)]
pub(crate) enum UserCommand {
    /// List all users
    #[command(visible_alias = "ls")]
    List,
    /// Display a user
    Show(IdArgs),
    /// Create a user
    Create(UserCreateArgs),
    /// Update a user
    Update(UserUpdateArgs),
    /// Delete a user
    #[command(visible_alias = "rm")]
    Delete(IdArgs),
    /// Teams a user belongs to
    #[command(subcommand)]
    Team(TeamLinkCommand),
    /// Mods a user is assigned to
    #[command(subcommand)]
    Mod(ModLinkCommand),
    /// Packs a user is assigned to
    #[command(subcommand)]
    Pack(PackLinkCommand),
}

#[derive(Args, Debug, Default)]
pub(crate) struct AccountFlags {
    #[arg(long, help = "Allow the account to sign in")]
    pub(crate) active: bool,
    #[arg(long, help = "Block the account")]
    pub(crate) blocked: bool,
    #[arg(long, help = "Grant administrator rights")]
    pub(crate) admin: bool,
    #[arg(long, help = "Revoke administrator rights")]
    pub(crate) user: bool,
}

impl AccountFlags {
    pub(crate) fn active(&self) -> CliResult<Option<bool>> {
        Ok(flag_pair(self.active, self.blocked, "active", "blocked")?)
    }

    pub(crate) fn admin(&self) -> CliResult<Option<bool>> {
        Ok(flag_pair(self.admin, self.user, "admin", "user")?)
    }
}

#[derive(Args, Debug)]
pub(crate) struct UserCreateArgs {
    #[arg(long)]
    pub(crate) slug: Option<String>,
    #[arg(long)]
    pub(crate) username: String,
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long)]
    pub(crate) password: String,
    #[command(flatten)]
    pub(crate) account: AccountFlags,
}

#[derive(Args, Debug)]
pub(crate) struct UserUpdateArgs {
    #[arg(short, long, help = "User id or slug")]
    pub(crate) id: String,
    #[arg(long)]
    pub(crate) slug: Option<String>,
    #[arg(long)]
    pub(crate) username: Option<String>,
    #[arg(long)]
    pub(crate) email: Option<String>,
    #[arg(long)]
    pub(crate) password: Option<String>,
    #[command(flatten)]
    pub(crate) account: AccountFlags,
}

// Teams

#[derive(Subcommand, Debug)]
pub(crate) enum TeamCommand {
    /// List all teams
    #[command(visible_alias = "ls")]
    List,
    /// Display a team
    Show(IdArgs),
    /// Create a team
    Create(TeamCreateArgs),
    /// Update a team
    Update(TeamUpdateArgs),
    /// Delete a team
    #[command(visible_alias = "rm")]
    Delete(IdArgs),
    /// Members of a team
    #[command(subcommand)]
    User(UserLinkCommand),
    /// Mods a team is assigned to
    #[command(subcommand)]
    Mod(ModLinkCommand),
    /// Packs a team is assigned to
    #[command(subcommand)]
    Pack(PackLinkCommand),
}

#[derive(Args, Debug)]
pub(crate) struct TeamCreateArgs {
    #[arg(long)]
    pub(crate) slug: Option<String>,
    #[arg(long)]
    pub(crate) name: String,
}

#[derive(Args, Debug)]
pub(crate) struct TeamUpdateArgs {
    #[arg(short, long, help = "Team id or slug")]
    pub(crate) id: String,
    #[arg(long)]
    pub(crate) slug: Option<String>,
    #[arg(long)]
    pub(crate) name: Option<String>,
}

// Clients

#[derive(Subcommand, Debug)]
pub(crate) enum ClientCommand {
    /// List all clients
    #[command(visible_alias = "ls")]
    List,
    /// Display a client
    Show(IdArgs),
    /// Create a client
    Create(ClientCreateArgs),
    /// Update a client
    Update(ClientUpdateArgs),
    /// Delete a client
    #[command(visible_alias = "rm")]
    Delete(IdArgs),
    /// Packs a client may access
    #[command(subcommand)]
    Pack(PackPlainLinkCommand),
}

#[derive(Args, Debug)]
pub(crate) struct ClientCreateArgs {
    #[arg(long)]
    pub(crate) slug: Option<String>,
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long, help = "Launcher UUID")]
    pub(crate) uuid: String,
}

#[derive(Args, Debug)]
pub(crate) struct ClientUpdateArgs {
    #[arg(short, long, help = "Client id or slug")]
    pub(crate) id: String,
    #[arg(long)]
    pub(crate) slug: Option<String>,
    #[arg(long)]
    pub(crate) name: Option<String>,
    #[arg(long, help = "Launcher UUID")]
    pub(crate) uuid: Option<String>,
}

// Profile

#[derive(Subcommand, Debug)]
pub(crate) enum ProfileCommand {
    /// Display the signed-in account
    Show,
    /// Update the signed-in account
    Update(ProfileUpdateArgs),
    /// Print a session token, signing in first when needed
    Token(TokenArgs),
}

#[derive(Args, Debug)]
pub(crate) struct ProfileUpdateArgs {
    #[arg(long)]
    pub(crate) slug: Option<String>,
    #[arg(long)]
    pub(crate) username: Option<String>,
    #[arg(long)]
    pub(crate) email: Option<String>,
    #[arg(long)]
    pub(crate) password: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct TokenArgs {
    #[arg(long, help = "Username used to sign in")]
    pub(crate) username: Option<String>,
    #[arg(long, help = "Password used to sign in")]
    pub(crate) password: Option<String>,
}

// Keys

#[derive(Subcommand, Debug)]
pub(crate) enum KeyCommand {
    /// List all API keys
    #[command(visible_alias = "ls")]
    List,
    /// Display an API key
    Show(IdArgs),
    /// Create an API key
    Create(KeyCreateArgs),
    /// Update an API key
    Update(KeyUpdateArgs),
    /// Delete an API key
    #[command(visible_alias = "rm")]
    Delete(IdArgs),
}

#[derive(Args, Debug)]
pub(crate) struct KeyCreateArgs {
    #[arg(long)]
    pub(crate) name: String,
    #[arg(
        long = "key",
        visible_alias = "value",
        value_name = "SECRET",
        help = "Secret, generated by the server when omitted"
    )]
    pub(crate) value: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct KeyUpdateArgs {
    #[arg(short, long, help = "Key id or slug")]
    pub(crate) id: String,
    #[arg(long)]
    pub(crate) name: Option<String>,
    #[arg(long = "key", visible_alias = "value", value_name = "SECRET")]
    pub(crate) value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("kleister").chain(args.iter().copied()))
            .expect("arguments parse")
    }

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn permissioned_link_commands_map_to_ops() {
        let cli = parse(&["pack", "user", "append", "--id", "tekkit", "--user", "alice", "--perm", "owner"]);
        let Command::Pack(PackCommand::User(command)) = cli.command else {
            panic!("expected pack user command");
        };
        assert_eq!(
            LinkOp::from(command),
            LinkOp::Append(Link {
                owner: "tekkit".into(),
                member: "alice".into(),
                perm: Some("owner".into()),
            })
        );

        let cli = parse(&["team", "mod", "ls", "-i", "admins"]);
        let Command::Team(TeamCommand::Mod(command)) = cli.command else {
            panic!("expected team mod command");
        };
        assert_eq!(LinkOp::from(command), LinkOp::List { owner: "admins".into() });
    }

    #[test]
    fn plain_link_commands_have_no_perm() {
        let cli = parse(&["client", "pack", "rm", "--id", "launcher", "--pack", "tekkit"]);
        let Command::Client(ClientCommand::Pack(command)) = cli.command else {
            panic!("expected client pack command");
        };
        let PlainLinkOp::Remove(link) = PlainLinkOp::from(command) else {
            panic!("expected remove");
        };
        assert_eq!(link.perm, None);
        assert!(Cli::try_parse_from(["kleister", "pack", "client", "append", "-i", "a", "--client", "b", "--perm", "owner"]).is_err());
    }

    #[test]
    fn perm_defaults_and_requirements() {
        let link = Link {
            owner: "tekkit".into(),
            member: "alice".into(),
            perm: None,
        };
        assert_eq!(link.perm_or_default().expect("default"), Perm::User);
        assert_eq!(link.required_perm().expect_err("required").exit_code(), 1);

        let link = Link {
            perm: Some("root".into()),
            ..link
        };
        assert_eq!(link.perm_or_default().expect_err("invalid").exit_code(), 1);
    }

    #[test]
    fn exclusive_flag_pairs_are_validation_errors() {
        let visibility = Visibility {
            published: true,
            hidden: true,
            ..Visibility::default()
        };
        assert_eq!(visibility.published().expect_err("conflict").exit_code(), 1);
        assert_eq!(visibility.private().expect("unset"), None);

        let account = AccountFlags {
            admin: true,
            user: true,
            ..AccountFlags::default()
        };
        assert_eq!(account.admin().expect_err("conflict").exit_code(), 1);
    }

    #[test]
    fn global_flags_are_accepted_after_subcommands() {
        let cli = parse(&["pack", "show", "--id", "tekkit", "--output", "json", "--timeout", "5"]);
        assert_eq!(cli.global.output, OutputFormat::Json);
        assert_eq!(cli.global.timeout, 5);
    }

    #[test]
    fn minecraft_update_is_an_alias_for_refresh() {
        let cli = parse(&["minecraft", "update"]);
        assert!(matches!(cli.command, Command::Minecraft(CatalogCommand::Refresh)));
    }

    #[test]
    fn key_secret_is_passed_with_key() {
        let cli = parse(&["key", "create", "--name", "ci", "--key", "s3cret"]);
        assert!(matches!(
            cli.command,
            Command::Key(KeyCommand::Create(KeyCreateArgs { ref value, .. })) if value.as_deref() == Some("s3cret")
        ));
        let cli = parse(&["key", "update", "-i", "ci", "--value", "rotated"]);
        assert!(matches!(
            cli.command,
            Command::Key(KeyCommand::Update(KeyUpdateArgs { ref value, .. })) if value.as_deref() == Some("rotated")
        ));
    }
}
