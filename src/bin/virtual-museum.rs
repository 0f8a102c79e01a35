use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use virtual_museum::{
    AppConfig, ArtworkSearchQuery, Compositor, CreateMuseumRequest, FsImageLoader,
    HttpImageLoader, Lobby, MuseumClient, MuseumService, RoomSpec, RoutingImageLoader,
    ScreenController, Visibility, export_composite,
};

#[derive(Parser, Debug)]
#[command(name = "virtual-museum", version, about = "Compose and publish virtual museum rooms")]
struct Cli {
    /// Museum Service base URL (overrides the config file).
    #[arg(long, global = true, env = "MUSEUM_API_BASE_URL")]
    base_url: Option<String>,

    /// Config JSON; built-in defaults when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a room document and write museum.png.
    Compose(ComposeArgs),
    /// List lobby doors for a user.
    Lobby(LobbyArgs),
    /// Museum records.
    Museum(MuseumArgs),
    /// Search the artwork catalog.
    Search(SearchArgs),
    /// Check the Museum Service.
    Health,
}

#[derive(Args, Debug)]
struct ComposeArgs {
    /// Room JSON: title, background id, slot name -> artwork id.
    #[arg(long)]
    room: PathBuf,

    /// Root for relative image paths (defaults to the room file's directory).
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Output directory (defaults to the config's export_dir).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Substitute a placeholder for a missing background instead of failing.
    #[arg(long, default_value_t = false)]
    preview: bool,
}

#[derive(Args, Debug)]
struct LobbyArgs {
    #[arg(long)]
    user: u64,

    /// Name on the caller's own door.
    #[arg(long, default_value = "My Museum")]
    name: String,

    /// The caller's saved museum, if any.
    #[arg(long)]
    museum: Option<u64>,

    #[arg(long)]
    limit: Option<u32>,

    /// 1-based page of ten doors.
    #[arg(long, default_value_t = 1)]
    page: usize,
}

#[derive(Args, Debug)]
struct MuseumArgs {
    #[command(subcommand)]
    cmd: MuseumCommand,
}

#[derive(Subcommand, Debug)]
enum MuseumCommand {
    Get {
        id: u64,
    },
    Create {
        #[arg(long)]
        user: u64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        visibility: Option<Visibility>,
        #[arg(long)]
        image_url: Option<String>,
    },
    Rename {
        id: u64,
        title: String,
    },
}

#[derive(Args, Debug)]
struct SearchArgs {
    #[arg(long)]
    highlight: Option<bool>,
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    medium: Option<String>,
    #[arg(long)]
    limit: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut cfg = match &cli.config {
        Some(path) => AppConfig::from_path(path)?,
        None => AppConfig::default(),
    };
    if let Some(url) = &cli.base_url {
        cfg.set_base_url(url);
    }
    cfg.validate()?;

    match cli.cmd {
        Command::Compose(args) => cmd_compose(&cfg, args).await,
        Command::Lobby(args) => cmd_lobby(&cfg, args).await,
        Command::Museum(args) => cmd_museum(&cfg.client()?, args.cmd).await,
        Command::Search(args) => cmd_search(&cfg.client()?, args).await,
        Command::Health => print_json(&cfg.client()?.health().await?),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{text}");
    Ok(())
}

async fn cmd_compose(cfg: &AppConfig, args: ComposeArgs) -> anyhow::Result<()> {
    let room = RoomSpec::from_path(&args.room)?;
    let assets = args.assets.unwrap_or_else(|| {
        args.room
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf()
    });
    let out = args.out.unwrap_or_else(|| cfg.export_dir.clone());

    let loader = RoutingImageLoader::new(
        FsImageLoader::new(assets),
        HttpImageLoader::new(cfg.request_timeout())?,
    );
    let compositor = Arc::new(Compositor::new(Arc::new(loader)));
    let mut screen = ScreenController::from_config(cfg, compositor)?;
    screen.apply_room(&room)?;

    let path = if args.preview {
        let outcome = screen.preview().await?;
        let image = outcome
            .published()
            .context("preview was superseded before it finished")?;
        for skipped in &image.skipped {
            eprintln!("skipped {} ({}): {}", skipped.slot, skipped.source, skipped.reason);
        }
        export_composite(image, &out).await?
    } else {
        screen.export(&out).await?
    };

    eprintln!("wrote {}", path.display());
    Ok(())
}

async fn cmd_lobby(cfg: &AppConfig, args: LobbyArgs) -> anyhow::Result<()> {
    let client = cfg.client()?;
    let others = client.fetch_public_museums(args.user, args.limit).await?;
    let lobby = Lobby::build(args.user, &args.name, args.museum, &others, cfg.door_seed);
    eprintln!("page {} of {}", args.page, lobby.page_count());
    print_json(&lobby.page(args.page))
}

async fn cmd_museum(client: &MuseumClient, cmd: MuseumCommand) -> anyhow::Result<()> {
    match cmd {
        MuseumCommand::Get { id } => print_json(&client.fetch_museum(id).await?),
        MuseumCommand::Create {
            user,
            name,
            description,
            visibility,
            image_url,
        } => {
            let req = CreateMuseumRequest {
                user_id: user,
                name,
                description,
                visibility,
                image_url,
            };
            print_json(&client.create_museum(&req).await?)
        }
        MuseumCommand::Rename { id, title } => {
            print_json(&client.update_museum_title(id, &title).await?)
        }
    }
}

async fn cmd_search(client: &MuseumClient, args: SearchArgs) -> anyhow::Result<()> {
    let query = ArtworkSearchQuery {
        is_highlight: args.highlight,
        object_date: args.date,
        city: args.city,
        medium: args.medium,
        limit: args.limit,
    };
    print_json(&client.search_artworks(&query).await?)
}
