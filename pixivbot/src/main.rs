// ABOUTME: Main entry point for the pixivbot relay command-line tool
// ABOUTME: Fetches illustrations, resolves their URLs, and transcodes files within size limits

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use image::ImageFormat;
use indicatif::{ProgressBar, ProgressStyle};
use pixiv_sdk::{Illust, PixivClient, PixivError, parse_illust_id};
use pixivbot::RelayError;
use pixivbot::config::Config;
use pixivbot::relay::{ImageRelay, OutboundFile};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "pixivbot")]
#[command(about = "Relay pixiv illustrations within messaging size limits", long_about = None)]
struct Cli {
    /// Fetch images through this host instead of the pixiv CDN
    #[arg(long, global = true, value_name = "HOST")]
    proxy: Option<String>,

    /// Read configuration from this file instead of the standard locations
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download illustrations and bring them within the upload limits
    Fetch {
        /// Illustration ids or artwork URLs
        #[arg(required = true, value_name = "ID_OR_URL")]
        illusts: Vec<String>,

        /// Relay the original file instead of the small variant
        #[arg(long)]
        original: bool,

        /// Directory to write the relayed files into
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Print the URL an illustration would be relayed from
    Resolve {
        /// Illustration id or artwork URL
        #[arg(value_name = "ID_OR_URL")]
        illust: String,

        /// Resolve the original file instead of the small variant
        #[arg(long)]
        original: bool,
    },
    /// Run a local file through the transcoding pipeline
    Transcode {
        file: PathBuf,

        /// Declared content type (guessed from the extension when omitted)
        #[arg(long)]
        content_type: Option<String>,

        /// Where to write the result
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug)]
struct Relayed {
    id: String,
    path: PathBuf,
    size: usize,
    quality: Option<u8>,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("Error: {:#}", err);
        if let Some(help) = help_text(&err) {
            eprintln!();
            eprintln!("{}", help);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Fetch {
            illusts,
            original,
            output_dir,
        } => {
            let config = load_config(cli.config.as_deref(), cli.proxy, original)?;
            fetch(config, illusts, output_dir).await
        }
        Commands::Resolve { illust, original } => {
            let config = load_config(cli.config.as_deref(), cli.proxy, original)?;
            let id = parse_illust_id(&illust)?;
            let relay = build_relay(config).await?;
            let illust = PixivClient::new()?
                .illust(id)
                .await
                .with_context(|| format!("Failed to fetch illustration {}", id))?;
            println!("{}", relay.resolve_url(&illust)?);
            Ok(())
        }
        Commands::Transcode {
            file,
            content_type,
            output,
        } => {
            let config = load_config(cli.config.as_deref(), cli.proxy, false)?;
            tokio::task::spawn_blocking(move || {
                let relay = config.build_relay()?;
                transcode_file(&relay, &file, content_type, output)
            })
            .await?
        }
    }
}

/// File, then environment, then command-line flags.
fn load_config(path: Option<&Path>, proxy: Option<String>, original: bool) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load()?,
    }
    .with_env_overrides();

    if let Some(proxy) = proxy {
        config.proxy_host = Some(proxy);
    }
    if original {
        config.original = Some(true);
    }
    config.validate()?;
    Ok(config)
}

/// The blocking HTTP client cannot be constructed on an async worker thread.
async fn build_relay(config: Config) -> Result<ImageRelay> {
    tokio::task::spawn_blocking(move || config.build_relay()).await?
}

async fn fetch(config: Config, inputs: Vec<String>, output_dir: PathBuf) -> Result<()> {
    let ids = inputs
        .iter()
        .map(|input| parse_illust_id(input))
        .collect::<Result<Vec<_>, _>>()?;

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let client = Arc::new(PixivClient::new()?);
    let relay = Arc::new(build_relay(config).await?);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Relaying {} illustration(s)", ids.len()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let jobs: Vec<_> = ids
        .into_iter()
        .map(|id| {
            let client = Arc::clone(&client);
            let relay = Arc::clone(&relay);
            let output_dir = output_dir.clone();
            tokio::spawn(async move {
                let illust = client
                    .illust(id)
                    .await
                    .with_context(|| format!("Failed to fetch illustration {}", id))?;
                tokio::task::spawn_blocking(move || relay_to_disk(&relay, &illust, &output_dir))
                    .await?
                    .with_context(|| format!("Failed to relay illustration {}", id))
            })
        })
        .collect();

    let total = jobs.len();
    let mut failures = 0;
    for job in jobs {
        match job.await? {
            Ok(relayed) => spinner.println(describe(&relayed)),
            Err(err) => {
                failures += 1;
                spinner.println(format!("✗ {:#}", err));
            }
        }
    }
    spinner.finish_and_clear();

    if failures > 0 {
        return Err(anyhow!("{} of {} illustrations failed", failures, total));
    }
    Ok(())
}

fn relay_to_disk(relay: &ImageRelay, illust: &Illust, output_dir: &Path) -> Result<Relayed> {
    let url = relay.resolve_url(illust)?;
    let outcome = relay.fetch_and_transcode(&url)?;

    let quality = outcome.quality();
    let size = outcome.bytes().len();
    let path = output_dir.join(format!(
        "{}.{}",
        illust.illust_id,
        extension_for(outcome.bytes())
    ));
    write_outbound(OutboundFile::from(outcome), &path)?;

    Ok(Relayed {
        id: illust.illust_id.clone(),
        path,
        size,
        quality,
    })
}

fn transcode_file(
    relay: &ImageRelay,
    file: &Path,
    content_type: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let content_type = content_type
        .or_else(|| {
            ImageFormat::from_path(file)
                .ok()
                .map(|format| format.to_mime_type().to_string())
        })
        .unwrap_or_default();

    let outcome = relay.transcoder().transcode(bytes, &content_type)?;
    let output = output.unwrap_or_else(|| {
        let stem = file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        file.with_file_name(format!("{}-relay.{}", stem, extension_for(outcome.bytes())))
    });

    let relayed = Relayed {
        id: file.display().to_string(),
        path: output.clone(),
        size: outcome.bytes().len(),
        quality: outcome.quality(),
    };
    write_outbound(OutboundFile::from(outcome), &output)?;
    println!("{}", describe(&relayed));
    Ok(())
}

fn write_outbound(file: OutboundFile, path: &Path) -> Result<()> {
    let mut reader = file
        .into_reader()
        .ok_or_else(|| anyhow!("Nothing to write for {}", path.display()))?;
    let mut out = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    std::io::copy(&mut reader, &mut out)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn extension_for(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .ok()
        .and_then(|format| format.extensions_str().first().copied())
        .unwrap_or("bin")
}

fn describe(relayed: &Relayed) -> String {
    let how = match relayed.quality {
        Some(quality) => format!("re-encoded at quality {}", quality),
        None => "passed through".to_string(),
    };
    format!(
        "✓ {} → {} ({} bytes, {})",
        relayed.id,
        relayed.path.display(),
        relayed.size,
        how
    )
}

fn help_text(err: &anyhow::Error) -> Option<&'static str> {
    err.chain().find_map(|cause| {
        cause
            .downcast_ref::<RelayError>()
            .and_then(RelayError::help_text)
            .or_else(|| {
                cause
                    .downcast_ref::<PixivError>()
                    .and_then(PixivError::help_text)
            })
    })
}
