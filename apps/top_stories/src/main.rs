use std::{io, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    load_settings, ControllerEvent, HttpStoryService, Settings, StoriesController, StoryService,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::{wrappers::LinesStream, StreamExt};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod view;

use commands::{Command, HELP};

#[derive(Parser, Debug)]
#[command(about = "Browse paginated top stories from a stories API")]
struct Args {
    /// Stories endpoint; overrides top_stories.toml and the environment.
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    page_size: Option<u32>,
    #[arg(long)]
    debounce_ms: Option<u64>,
    /// Start with this title search instead of the unfiltered list.
    #[arg(long)]
    search: Option<String>,
    /// Load one page, print it and exit.
    #[arg(long)]
    once: bool,
}

impl Args {
    fn apply(&self, settings: &mut Settings) {
        if let Some(v) = &self.api_url {
            settings.api_url = v.clone();
        }
        if let Some(v) = self.page_size {
            settings.page_size = v;
        }
        if let Some(v) = self.debounce_ms {
            settings.debounce_ms = v;
        }
    }
}

enum Input {
    Line(Option<io::Result<String>>),
    Controller(ControllerEvent),
}

type Controller = StoriesController<HttpStoryService>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings().context("failed to load settings")?;
    args.apply(&mut settings);
    let service = HttpStoryService::from_settings(&settings)
        .with_context(|| format!("failed to set up stories client for {}", settings.api_url))?;
    let mut controller = StoriesController::from_settings(Arc::new(service), &settings);

    match args.search.as_deref() {
        Some(query) if !query.is_empty() => controller.init_with_search(query),
        _ => controller.init(),
    }

    if args.once {
        controller.settle().await;
        return draw(&controller);
    }

    run_interactive(&mut controller).await
}

async fn run_interactive(controller: &mut Controller) -> Result<()> {
    let mut lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());
    draw(controller)?;
    println!("{HELP}");

    loop {
        let input = tokio::select! {
            line = lines.next() => Input::Line(line),
            Some(event) = controller.next_event() => Input::Controller(event),
        };

        match input {
            Input::Line(None) => break,
            Input::Line(Some(line)) => {
                let line = line.context("failed to read input")?;
                let command = Command::parse(&line);
                debug!(command = command.name(), "dispatching command");
                if !dispatch(controller, command) {
                    break;
                }
            }
            Input::Controller(event) => debug!(?event, "controller event"),
        }
        draw(controller)?;
    }

    Ok(())
}

/// Applies one command; `false` means the user asked to leave.
fn dispatch<S: StoryService + 'static>(
    controller: &mut StoriesController<S>,
    command: Command,
) -> bool {
    match command {
        Command::Next => controller.next_page(),
        Command::Previous => controller.previous_page(),
        Command::GoTo(page) => controller.go_to_page(page),
        Command::Search(query) => controller.on_search(query),
        Command::Refresh => controller.fetch_stories(),
        Command::Redraw => {}
        Command::Help | Command::Unknown(_) => println!("{HELP}"),
        Command::Quit => return false,
    }
    true
}

fn draw(controller: &Controller) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    view::render(controller.state(), &mut out).context("failed to write to stdout")?;
    Ok(())
}
