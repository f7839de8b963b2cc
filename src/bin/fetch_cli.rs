//! Terminal download client for a running tube-relay server
//!
//! Resolves video metadata, picks a format, streams the download to disk
//! while driving the progress state machine from real transfer events, and
//! records the result in the local bounded history.

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{anyhow, bail, Context, Result};
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;

use tube_relay::core::progress::{phase_label, SyntheticProgress, TransferProgress, SYNTHETIC_TICK};
use tube_relay::utils::format::{format_duration, format_views};
use tube_relay::{FormatDescriptor, HistoryEntry, HistoryStore, VideoMetadata};

#[derive(Debug, Clone)]
struct CliArgs {
    url: String,
    itag: Option<String>,
    server: String,
    output: PathBuf,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        Self::from_iter(std::env::args().skip(1))
    }

    fn from_iter<I>(iter: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut url = None;
        let mut itag = None;
        let mut server = "http://127.0.0.1:3000".to_string();
        let mut output = PathBuf::from("downloads");

        let mut args = iter.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--itag" => {
                    itag = Some(args.next().ok_or_else(|| anyhow!("--itag requires a value"))?);
                }
                "--server" => {
                    server = args
                        .next()
                        .ok_or_else(|| anyhow!("--server requires a value"))?;
                }
                "--output" => {
                    output = PathBuf::from(
                        args.next()
                            .ok_or_else(|| anyhow!("--output requires a value"))?,
                    );
                }
                _ if arg.starts_with("--") => bail!("unknown argument: {arg}"),
                _ if url.is_none() => url = Some(arg),
                _ => bail!("unexpected extra argument: {arg}"),
            }
        }

        let url = url.ok_or_else(|| {
            anyhow!("Usage: fetch_cli <youtube-url> [--itag <id>] [--server <base-url>] [--output <dir>]")
        })?;

        Ok(Self {
            url,
            itag,
            server: server.trim_end_matches('/').to_string(),
            output,
        })
    }
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = CliArgs::parse()?;
    let client = reqwest::Client::new();

    let metadata = fetch_metadata(&client, &args).await?;
    print_metadata(&metadata);

    if metadata.formats.is_empty() {
        bail!("server reported no playable formats for this video");
    }

    let chosen = match &args.itag {
        Some(itag) => metadata
            .formats
            .iter()
            .find(|format| &format.itag == itag)
            .with_context(|| format!("itag {itag} is not offered for this video"))?,
        None => &metadata.formats[0],
    };

    println!(
        "\nDownloading itag {} - {} ({}, {})",
        chosen.itag, chosen.quality, chosen.format, chosen.size
    );

    let file_name = format!("{}_{}.{}", metadata.id, chosen.itag, chosen.format);
    let target = args.output.join(&file_name);
    download_to(&client, &args, chosen, &target).await?;
    println!("\nSaved {}", target.display());

    record_history(&metadata, chosen, &file_name)?;
    Ok(())
}

async fn fetch_metadata(client: &reqwest::Client, args: &CliArgs) -> Result<VideoMetadata> {
    let response = client
        .get(format!("{}/api/video-info", args.server))
        .query(&[("url", args.url.as_str())])
        .send()
        .await
        .context("requesting video info")?;

    if !response.status().is_success() {
        bail!("{}", server_error_message(response).await);
    }
    response
        .json::<VideoMetadata>()
        .await
        .context("decoding video info")
}

async fn download_to(
    client: &reqwest::Client,
    args: &CliArgs,
    format: &FormatDescriptor,
    target: &Path,
) -> Result<()> {
    let mut progress = TransferProgress::new();
    progress.connect();
    render_progress(0.0);

    let response = client
        .get(format!("{}/api/download", args.server))
        .query(&[("url", args.url.as_str()), ("itag", format.itag.as_str())])
        .send()
        .await
        .context("requesting download")?;

    if !response.status().is_success() {
        bail!("{}", server_error_message(response).await);
    }

    progress.begin(response.content_length());

    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }
    let mut file = tokio::fs::File::create(target)
        .await
        .with_context(|| format!("creating {}", target.display()))?;

    // Without a Content-Length there is no real percentage; display falls
    // back to the synthetic random walk while bytes keep flowing.
    let mut synthetic = SyntheticProgress::new();
    let mut last_render = Instant::now();

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(err) => {
                progress.fail(err.to_string());
                bail!("download failed mid-stream: {err}");
            }
        };

        file.write_all(&chunk).await.context("writing output file")?;
        progress.advance(chunk.len() as u64);

        if last_render.elapsed() >= SYNTHETIC_TICK {
            last_render = Instant::now();
            let percent = progress
                .state()
                .percent()
                .unwrap_or_else(|| synthetic.step());
            render_progress(percent);
        }
    }

    file.flush().await.context("flushing output file")?;
    progress.complete();
    render_progress(100.0);
    Ok(())
}

fn print_metadata(metadata: &VideoMetadata) {
    println!("{}", metadata.title);
    if let Some(channel) = &metadata.channel {
        println!("Channel: {}", channel);
    }
    match metadata.duration {
        Some(seconds) => println!("Duration: {}", format_duration(seconds)),
        None => println!("Duration: Unknown"),
    }
    match metadata.views {
        Some(views) => println!("{}", format_views(views)),
        None => println!("Unknown views"),
    }

    println!("\nAvailable formats:");
    for format in &metadata.formats {
        println!(
            "  {:>5}  {:<12} {:<5} {}",
            format.itag, format.quality, format.format, format.size
        );
    }
}

fn render_progress(percent: f64) {
    print!("\r[{:>3.0}%] {:<28}", percent, phase_label(percent));
    let _ = std::io::stdout().flush();
}

async fn server_error_message(response: reqwest::Response) -> String {
    let status = response.status();
    response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|value| value["error"].as_str().map(str::to_string))
        .unwrap_or_else(|| format!("server responded with {status}"))
}

fn record_history(metadata: &VideoMetadata, format: &FormatDescriptor, file_name: &str) -> Result<()> {
    let store = HistoryStore::open_default().context("opening history store")?;
    let mut history = store.load().unwrap_or_default();

    history.record(HistoryEntry {
        video_id: metadata.id.clone(),
        title: metadata.title.clone(),
        quality: format.quality.clone(),
        file_name: file_name.to_string(),
        timestamp: chrono::Utc::now(),
    });
    store.save(&history).context("saving history")?;

    println!("\nRecent downloads:");
    for entry in history.entries() {
        println!(
            "  {}  {} ({})",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.title,
            entry.quality
        );
    }
    Ok(())
}
