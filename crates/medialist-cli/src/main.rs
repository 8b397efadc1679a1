use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use commands::{actor, classify, config, item, list};
use medialist_models::{ActorId, MediaType, MedialistId, Permission};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "medialist")]
#[command(about = "Medialist - curate lists of movies and shows from any catalog")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Write logs to a daily-rotated file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Actor id the command runs as
    #[arg(long = "as", global = true, default_value_t = 1, value_name = "ACTOR_ID")]
    acting: ActorId,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify the catalog behind a list URL
    #[command(long_about = "Classify an IMDb, Trakt or TMDB URL: which catalog it belongs to, whether it is a user list, chart or search, and the list id, username, query parameters and timeframe embedded in it.")]
    Classify {
        url: String,
    },
    /// Manage actors
    Actor {
        #[command(subcommand)]
        cmd: ActorCommands,
    },
    /// Create, browse and delete medialists
    List {
        #[command(subcommand)]
        cmd: ListCommands,
    },
    /// Add items to a medialist
    Item {
        #[command(subcommand)]
        cmd: ItemCommands,
    },
    /// Configure settings and credentials
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ActorCommands {
    /// Create an actor
    Add {
        #[arg(long)]
        name: String,

        /// Permission to grant (repeatable): admin, manage_users, manage_medialist, view_medialist, create_medialist
        #[arg(long)]
        permission: Vec<Permission>,
    },
    /// List actors
    Ls,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortArg {
    Created,
    Modified,
}

#[derive(Subcommand)]
enum ListCommands {
    /// Create a medialist
    #[command(long_about = "Create a medialist owned by the acting actor. A source URL is classified and rejected when it does not point at a known catalog. The source limit is kept only between 2 and the configured maximum.")]
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        overview: Option<String>,

        #[arg(long)]
        backdrop_url: Option<String>,

        #[arg(long)]
        poster_url: Option<String>,

        /// IMDb, Trakt or TMDB list, chart or search URL
        #[arg(long)]
        source_url: Option<String>,

        /// Maximum number of items to take from the source
        #[arg(long)]
        source_limit: Option<u32>,

        /// Items are managed by the source; manual adds are refused
        #[arg(long, action = ArgAction::SetTrue)]
        auto_update: bool,
    },
    /// Search medialists
    Ls {
        /// Case-insensitive substring of the name
        #[arg(long)]
        filter: Option<String>,

        /// Only lists created by this actor
        #[arg(long)]
        owner: Option<ActorId>,

        #[arg(long, value_enum, default_value = "created")]
        sort: SortArg,

        /// Page size
        #[arg(long)]
        take: Option<usize>,

        #[arg(long)]
        skip: Option<usize>,
    },
    /// Show a medialist and its items
    Show {
        id: MedialistId,
    },
    /// Delete a medialist and its items
    Rm {
        id: MedialistId,
    },
    /// Count all medialists
    Count,
}

#[derive(Subcommand)]
enum ItemCommands {
    /// Add an item by any mix of ids or a name
    #[command(long_about = "Add an item to a medialist. The item is matched against stored media by TMDB, TVDB and IMDb id, then looked up on TMDB. Without a match it is kept by name.")]
    Add {
        list_id: MedialistId,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        year: Option<u32>,

        /// movie or tv
        #[arg(long = "type")]
        media_type: Option<MediaType>,

        #[arg(long)]
        tmdb: Option<u32>,

        #[arg(long)]
        tvdb: Option<u32>,

        #[arg(long)]
        imdb: Option<String>,

        #[arg(long)]
        season: Option<u32>,

        #[arg(long)]
        episode: Option<u32>,

        /// Record the item on behalf of this actor
        #[arg(long)]
        user: Option<ActorId>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Write the default configuration file
    Init {
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
    /// Store the TMDB API key
    Tmdb {
        /// API key (if not provided, will prompt)
        #[arg(long)]
        api_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Classify { url } => classify::run_classify(&url, &output),
        Commands::Actor { cmd } => actor::run_actor(cmd, cli.acting, &output).await,
        Commands::List { cmd } => list::run_list(cmd, cli.acting, &output).await,
        Commands::Item { cmd } => item::run_item(cmd, cli.acting, &output).await,
        Commands::Config { cmd } => config::run_config(cmd, &output).await,
    }
}
