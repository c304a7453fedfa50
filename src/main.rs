use anyhow::Result;
use clap::Parser;
use modupdater::commands::{self, DEFAULT_OUTPUT, UpdateOptions};
use modupdater::versions::VERSION_LIMIT;
use std::path::PathBuf;

/// modupdater - Fabric mod pack updater
///
/// Reads a ZIP archive of Fabric mods, finds a release of each mod for the
/// chosen game version on Modrinth, and writes the new jars into a fresh ZIP.
///
/// If the MODRINTH_TOKEN environment variable is set, it will be sent with
/// every registry request.
///
/// Examples:
///   modupdater versions                           # List recent game releases
///   modupdater update mods.zip --game-version 1.21
#[derive(Parser, Debug)]
#[command(author, version = env!("MODUPDATER_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Registry API URL (defaults to https://api.modrinth.com/v2)
    #[arg(
        long = "api-url",
        env = "MODUPDATER_API_URL",
        value_name = "URL",
        global = true
    )]
    pub api_url: Option<String>,

    /// Game version manifest URL
    #[arg(
        long = "manifest-url",
        env = "MODUPDATER_MANIFEST_URL",
        value_name = "URL",
        global = true
    )]
    pub manifest_url: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List game versions that can be targeted
    Versions(VersionsArgs),

    /// Update every mod in an archive for a game version
    Update(UpdateArgs),
}

#[derive(clap::Args, Debug)]
pub struct VersionsArgs {
    /// Include snapshots and other pre-releases
    #[arg(long)]
    pub snapshots: bool,

    /// Number of versions to show
    #[arg(long, default_value_t = VERSION_LIMIT)]
    pub limit: usize,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// ZIP archive containing the mod jars
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Target game version (defaults to the latest listed version)
    #[arg(long = "game-version", short = 'g', value_name = "VERSION")]
    pub game_version: Option<String>,

    /// Consider pre-releases when picking the default game version
    #[arg(long)]
    pub snapshots: bool,

    /// Where to write the updated archive
    #[arg(long, short = 'o', value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = modupdater::runtime::RealRuntime;

    match cli.command {
        Commands::Versions(args) => {
            commands::versions(
                runtime,
                args.snapshots,
                args.limit,
                cli.api_url,
                cli.manifest_url,
            )
            .await?
        }
        Commands::Update(args) => {
            let options = UpdateOptions {
                archive: args.archive,
                game_version: args.game_version,
                include_snapshots: args.snapshots,
                output: args.output,
            };
            commands::update(runtime, options, cli.api_url, cli.manifest_url).await?
        }
    }
    Ok(())
}
