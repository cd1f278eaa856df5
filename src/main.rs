// src/main.rs
//
// Command-line front end: selects the given paths, submits them for
// compression, renders progress and downloads the archive.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use imagepress::application::commands::{
    compress, download_archive, get_session_view, restart_session, retry_compression,
    select_paths, set_quality,
};
use imagepress::application::dto::SessionView;
use imagepress::application::state::AppState;
use imagepress::events::{NotificationRaised, ProgressUpdated};
use imagepress::{ClientConfig, NotificationKind, SubmitOutcome};

const USAGE: &str = "Usage: imagepress [--server URL] [--quality N] [--out DIR] <paths>...";

#[derive(Debug, Default)]
struct CliArgs {
    server: Option<String>,
    quality: Option<i64>,
    out_dir: Option<PathBuf>,
    paths: Vec<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<CliArgs> {
    let mut parsed = CliArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--server" => {
                parsed.server = Some(args.next().ok_or_else(|| anyhow!("--server needs a URL"))?);
            }
            "--quality" => {
                let raw = args.next().ok_or_else(|| anyhow!("--quality needs a number"))?;
                parsed.quality = Some(
                    raw.parse()
                        .with_context(|| format!("--quality must be a number, got {:?}", raw))?,
                );
            }
            "--out" => {
                parsed.out_dir = Some(PathBuf::from(
                    args.next().ok_or_else(|| anyhow!("--out needs a directory"))?,
                ));
            }
            "-h" | "--help" => bail!(USAGE),
            flag if flag.starts_with("--") => bail!("unknown option {}\n{}", flag, USAGE),
            path => parsed.paths.push(PathBuf::from(path)),
        }
    }

    if parsed.paths.is_empty() {
        bail!(USAGE);
    }
    Ok(parsed)
}

enum NextStep {
    Retry,
    StartOver,
    Quit,
}

async fn prompt_after_failure() -> anyhow::Result<NextStep> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        stdout.write_all(b"[r]etry / [s]tart over / [q]uit: ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            return Ok(NextStep::Quit);
        };
        match line.trim().to_ascii_lowercase().as_str() {
            "r" | "retry" => return Ok(NextStep::Retry),
            "s" | "start over" => return Ok(NextStep::StartOver),
            "q" | "quit" => return Ok(NextStep::Quit),
            _ => continue,
        }
    }
}

fn render_selection(view: &SessionView) {
    println!("Selected {} files ({})", view.total_files, view.total_size);
    for file in &view.files {
        println!("  {:<24} {}", file.display_name, file.size_label);
    }
    println!("Quality: {}", view.quality);
    if let Some(message) = &view.error_message {
        println!("Note: {}", message);
    }
}

fn subscribe_renderers(state: &AppState) {
    state.event_bus.subscribe::<ProgressUpdated, _>(|event| {
        println!("[{:>3}%]", event.percentage);
    });
    state.event_bus.subscribe::<NotificationRaised, _>(|event| match event.kind {
        NotificationKind::Info => println!("* {}", event.message),
        NotificationKind::Error => eprintln!("! {}", event.message),
    });
}

async fn select(state: &AppState, args: &CliArgs) -> anyhow::Result<()> {
    select_paths(state, &args.paths)
        .await
        .map_err(|e| anyhow!(e.display_text()))?;
    if let Some(quality) = args.quality {
        set_quality(state, quality);
    }
    render_selection(&get_session_view(state));
    Ok(())
}

/// Run a submit or retry on its own task so a panic inside it reaches the
/// error boundary instead of tearing down the prompt loop
async fn run_submission(state: &Arc<AppState>, is_retry: bool) -> anyhow::Result<SubmitOutcome> {
    let task_state = Arc::clone(state);
    let task = tokio::spawn(async move {
        if is_retry {
            retry_compression(&task_state).await
        } else {
            compress(&task_state).await
        }
    });

    match state.error_boundary.contain(task).await {
        Some(outcome) => outcome.map_err(|e| anyhow!(e.display_text())),
        None => bail!("compression stopped unexpectedly"),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args(std::env::args().skip(1))?;

    let mut config = ClientConfig::from_env().context("Failed to load configuration")?;
    if let Some(server) = &args.server {
        config = config.with_base_url(server.clone());
    }
    let out_dir = args.out_dir.clone().unwrap_or_else(|| PathBuf::from("."));

    let state = Arc::new(AppState::from_config(config).context("Failed to start the client")?);
    state.error_boundary.clone().install_panic_hook();
    subscribe_renderers(&state);

    select(&state, &args).await?;
    let mut outcome = run_submission(&state, false).await?;

    loop {
        match outcome {
            SubmitOutcome::Succeeded(result) => {
                println!(
                    "Compressed {} images at {}%",
                    result.file_count,
                    result.quality.value()
                );
                let path = download_archive(&state, &out_dir)
                    .await
                    .map_err(|e| anyhow!(e.display_text()))?;
                println!("Archive: {}", path.display());
                return Ok(());
            }
            SubmitOutcome::Failed(error) => {
                eprintln!("Error: {}", error.message);
                outcome = match prompt_after_failure().await? {
                    NextStep::Retry => run_submission(&state, true).await?,
                    NextStep::StartOver => {
                        restart_session(&state);
                        select(&state, &args).await?;
                        run_submission(&state, false).await?
                    }
                    NextStep::Quit => return Ok(()),
                };
            }
            SubmitOutcome::AlreadyInFlight | SubmitOutcome::Discarded => {
                log::warn!("Submission did not complete");
                return Ok(());
            }
        }
    }
}
