//! Command definitions and dispatch
//!
//! Each invocation runs exactly one command: validate input, resolve the
//! token, talk to the API, print the result.

use std::collections::HashMap;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use cw_api::ChatworkClient;
use cw_core::{
    Config, CredentialSources, Error, ReadOptions, WriteOptions, compose_body, load_env_file,
    parse_time_bound, read_messages,
};

use crate::input::{TextSource, resolve_text};
use crate::render::{self, OutputFormat, SendOutput};

#[derive(Debug, Parser)]
#[command(
    name = "cw-bridge",
    version,
    about = "Read and post ChatWork messages from the command line"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API token (overrides CHATWORK_API_TOKEN, CHATWORK_TOKEN and the env file).
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Dotenv-style file consulted for the token (default: .env).
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// TOML config file (default: ./cw-bridge.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// API root URL (overrides config and CHATWORK_API_BASE_URL).
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the account that owns the token.
    Me,
    /// List rooms.
    Rooms,
    /// Read a room's message history.
    Read(ReadArgs),
    /// Post a message to a room.
    Send(SendArgs),
}

#[derive(Debug, Args)]
pub struct ReadArgs {
    /// Room id.
    pub room_id: Option<String>,

    /// Number of most recent matches to return; clamped to 1-100.
    #[arg(long, allow_negative_numbers = true, default_value_t = cw_core::DEFAULT_LIMIT as i64)]
    pub limit: i64,

    /// Lower bound: epoch seconds, date or timestamp (inclusive).
    #[arg(long)]
    pub since: Option<String>,

    /// Upper bound: epoch seconds, date or timestamp (inclusive).
    #[arg(long)]
    pub until: Option<String>,

    /// Keep only messages whose raw body contains this text.
    #[arg(long)]
    pub contains: Option<String>,

    /// Ask the API for the latest messages even if already read.
    #[arg(long)]
    pub force: bool,

    /// Remove ChatWork markup tags from the body.
    #[arg(long)]
    pub strip_tags: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct SendArgs {
    /// Room id.
    pub room_id: Option<String>,

    /// Message text.
    #[arg(short, long, conflicts_with_all = ["file", "stdin"])]
    pub message: Option<String>,

    /// Read the message text from a file.
    #[arg(long, conflicts_with = "stdin")]
    pub file: Option<PathBuf>,

    /// Read the message text from standard input.
    #[arg(long)]
    pub stdin: bool,

    /// Comma-separated account ids to address.
    #[arg(long)]
    pub to: Option<String>,

    /// Account id of the message being replied to.
    #[arg(long)]
    pub reply_account: Option<String>,

    /// Id of the message being replied to.
    #[arg(long)]
    pub reply_message: Option<String>,

    /// Keep the posted message unread for yourself.
    #[arg(long)]
    pub self_unread: bool,

    /// Print the composed body without sending it.
    #[arg(long)]
    pub dry_run: bool,
}

impl ReadArgs {
    fn limit(&self) -> usize {
        self.limit.clamp(1, cw_core::MAX_LIMIT as i64) as usize
    }
}

impl SendArgs {
    fn text_source(&self) -> Option<TextSource<'_>> {
        if let Some(message) = &self.message {
            Some(TextSource::Literal(message))
        } else if let Some(path) = &self.file {
            Some(TextSource::File(path))
        } else if self.stdin {
            Some(TextSource::Stdin)
        } else {
            None
        }
    }

    fn write_options(&self) -> WriteOptions {
        WriteOptions {
            to: self.to.clone(),
            reply_account: self.reply_account.clone(),
            reply_message: self.reply_message.clone(),
            dry_run: self.dry_run,
        }
    }
}

/// Per-invocation state shared by the commands
struct Context {
    config: Config,
    /// Explicit and environment sources; the env file is read on first use.
    sources: CredentialSources,
}

impl Context {
    fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = Config::load(cli.config.as_deref())?;
        if let Some(url) = &cli.base_url {
            config.api.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(path) = &cli.env_file {
            config.env_file = path.clone();
        }
        debug!("API base URL: {}", config.api.base_url);

        let sources = CredentialSources::from_env(cli.token.clone(), HashMap::new());

        Ok(Self { config, sources })
    }

    /// Resolve the token and build a client. Commands that never reach the
    /// API (dry-run send) do not touch the env file.
    fn client(&self) -> anyhow::Result<ChatworkClient> {
        let mut sources = self.sources.clone();
        sources.file = load_env_file(&self.config.env_file)?;
        let token = sources.resolve().ok_or(Error::MissingToken)?;
        Ok(ChatworkClient::new(&token, &self.config.api)?)
    }
}

/// Run the selected command and print its output.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = Context::load(&cli)?;

    let output = match &cli.command {
        Commands::Me => {
            let account = ctx.client()?.me().await?;
            render::to_json(&account)?
        }
        Commands::Rooms => {
            let rooms = ctx.client()?.rooms().await?;
            info!("Fetched {} rooms", rooms.len());
            render::to_json(&rooms)?
        }
        Commands::Read(args) => read(&ctx, args).await?,
        Commands::Send(args) => send(&ctx, args).await?,
    };

    println!("{}", output);
    Ok(())
}

async fn read(ctx: &Context, args: &ReadArgs) -> anyhow::Result<String> {
    let room_id = require_room(args.room_id.as_deref())?;
    let options = ReadOptions {
        limit: args.limit(),
        since: parse_time_bound("--since", args.since.as_deref())?,
        until: parse_time_bound("--until", args.until.as_deref())?,
        contains: args.contains.clone(),
        force: args.force,
        strip_tags: args.strip_tags,
    };

    let client = ctx.client()?;
    let messages = read_messages(&client, room_id, &options).await?;
    render::messages(&messages, args.format)
}

async fn send(ctx: &Context, args: &SendArgs) -> anyhow::Result<String> {
    let room_id = require_room(args.room_id.as_deref())?;
    let text = resolve_text(args.text_source())
        .await?
        .ok_or(Error::EmptyBody)?;

    let options = args.write_options();
    let body = compose_body(room_id, &text, &options)?;

    if options.dry_run {
        info!("Dry run: not sending to room {}", room_id);
        return render::to_json(&SendOutput {
            room_id,
            body: &body,
            dry_run: true,
            result: None,
        });
    }

    let posted = ctx
        .client()?
        .post_message(room_id, &body, args.self_unread)
        .await?;

    render::to_json(&SendOutput {
        room_id,
        body: &body,
        dry_run: false,
        result: Some(posted),
    })
}

fn require_room(room_id: Option<&str>) -> Result<&str, Error> {
    room_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(Error::MissingRoomId)
}

/// Exit status: 2 for unusable input, 1 for everything else.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<Error>() {
        Some(e) if e.is_validation() => 2,
        _ => 1,
    }
}
