use anyhow::{Context, Result};
use clap::Parser;
use newsfeed::app::{App, FeedState};
use newsfeed::config::Config;
use newsfeed::feed::{build_client, FeedEvent};
use newsfeed::ui;
use std::path::PathBuf;
use tokio::sync::mpsc;

#[derive(Parser, Debug)]
#[command(name = "newsfeed", about = "Latest headlines from the Guardian content API")]
struct Args {
    /// Config file (default: ~/.config/newsfeed/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Fetch this URL instead of the configured endpoint
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Print articles as JSON instead of a list
    #[arg(long)]
    json: bool,

    /// Open article N (as numbered in the list) in the browser
    #[arg(long, value_name = "N")]
    open: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so --json output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match args.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    let request_url = match args.url {
        Some(url) => url,
        None => config
            .request_url()
            .context("Failed to build request URL")?
            .to_string(),
    };

    let client = build_client(&config).context("Failed to create HTTP client")?;
    let mut app = App::new(client, request_url);

    let (event_tx, mut event_rx) = mpsc::channel::<FeedEvent>(4);
    app.refresh(&event_tx);
    drop(event_tx);

    loop {
        tokio::select! {
            event = event_rx.recv() => match event {
                Some(event) => {
                    if app.handle_event(event) {
                        break;
                    }
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                app.cancel();
                eprintln!("Interrupted.");
                std::process::exit(130);
            }
        }
    }

    if let FeedState::Failed(error) = &app.state {
        eprintln!("Error: {}", error);
        std::process::exit(1);
    }

    if let Some(position) = args.open {
        let article = app.article(position).with_context(|| {
            format!(
                "No article number {} (the feed has {})",
                position,
                app.articles().len()
            )
        })?;
        ui::open_article(article)?;
        println!("Opening {}", article.url());
        return Ok(());
    }

    if args.json {
        let json = serde_json::to_string_pretty(app.articles())
            .context("Failed to serialize articles")?;
        println!("{}", json);
    } else {
        for line in ui::render_state(&app.state, ui::terminal_width()) {
            println!("{}", line);
        }
    }

    Ok(())
}
