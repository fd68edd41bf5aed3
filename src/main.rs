use anyhow::{Context, Result};
use chanfeed::app::App;
use chanfeed::avatars::Avatars;
use chanfeed::config::Config;
use chanfeed::export;
use chanfeed::feeds::channel::ChannelFetcher;
use chanfeed::feeds::PageFetcher;
use chanfeed::logging;
use chanfeed::months::{MonthSequence, YearMonth};
use chanfeed::pager::{Completion, ExhaustionPolicy, Pager};
use chanfeed::routes::Route;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "chanfeed", version, about = "Browse an archived channel feed in the terminal")]
struct Cli {
    /// Config file (default: <config dir>/chanfeed/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root the archive is served from
    #[arg(long)]
    base_url: Option<String>,

    /// Name shown on every message
    #[arg(long)]
    author: Option<String>,

    /// What an empty or failed page means
    #[arg(long, value_enum)]
    policy: Option<ExhaustionPolicy>,

    /// Open this month (YYYY-MM) instead of the newest one
    #[arg(long)]
    month: Option<YearMonth>,

    /// View to open
    #[arg(long, default_value = "/")]
    route: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List the months of the archive, newest first
    Months,
    /// Fetch pages and print the messages
    Dump {
        /// Start at this month instead of the newest one
        #[arg(long)]
        month: Option<YearMonth>,

        /// Only messages whose text or tags contain this
        #[arg(long, default_value = "")]
        search: String,

        /// Number of non-empty pages to load
        #[arg(long, default_value_t = 1)]
        pages: usize,

        /// Print HTML fragments instead of text
        #[arg(long)]
        html: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_env(|key| std::env::var(key).ok());
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(author) = cli.author {
        config.author = author;
    }
    if let Some(policy) = cli.policy {
        config.policy = policy;
    }

    let today = Local::now().date_naive();

    match cli.command {
        Some(Command::Months) => {
            logging::init_stderr();
            print_months(&config, today)
        }
        Some(Command::Dump {
            month,
            search,
            pages,
            html,
        }) => {
            config.validate()?;
            logging::init_stderr();
            dump(&config, today, month, &search, pages, html).await
        }
        None => {
            config.validate()?;
            run_tui(config, today, Route::resolve(&cli.route), cli.month).await
        }
    }
}

fn print_months(config: &Config, today: NaiveDate) -> Result<()> {
    let months = MonthSequence::generate(today, config.archive_start);
    let mut stdout = io::stdout().lock();
    for month in months.iter() {
        writeln!(stdout, "{}", month)?;
    }
    Ok(())
}

async fn dump(
    config: &Config,
    today: NaiveDate,
    month: Option<YearMonth>,
    search: &str,
    pages: usize,
    html: bool,
) -> Result<()> {
    let fetcher = ChannelFetcher::new(config.base_url.clone(), config.request_timeout());
    let mut pager = Pager::new(
        MonthSequence::generate(today, config.archive_start),
        config.policy,
    );

    let mut ticket = match month {
        Some(month) => Some(pager.select_month(month)),
        None => pager.request_more(),
    };
    let mut loaded = 0;
    while let Some(issued) = ticket.take() {
        let result = fetcher.fetch(issued.month).await;
        match pager.complete(issued, result) {
            Completion::Refetch(next) => ticket = Some(next),
            Completion::Appended { .. } => {
                loaded += 1;
                if loaded < pages {
                    ticket = pager.request_more();
                }
            }
            Completion::Exhausted | Completion::Stale => {}
        }
    }
    if let Some(error) = pager.last_error() {
        tracing::warn!(%error, "last page failed");
    }

    let avatars = Avatars::new(config.avatars.clone());
    let mut stdout = io::stdout().lock();
    for (row, message) in pager.store().filtered_view(search).enumerate() {
        let rendered = if html {
            let avatar = avatars.path_for_row(row);
            export::message_html(message, &config.author, avatar.as_deref(), &config.base_url)
        } else {
            export::message_text(message, &config.author, &avatars.glyph_for_row(row))
        };
        writeln!(stdout, "{}", rendered)?;
    }
    Ok(())
}

async fn run_tui(
    config: Config,
    today: NaiveDate,
    route: Route,
    month: Option<YearMonth>,
) -> Result<()> {
    logging::init_file(&config.log_path())?;
    tracing::info!(base_url = %config.base_url, policy = config.policy.label(), "starting");

    let fetcher: Arc<dyn PageFetcher> = Arc::new(ChannelFetcher::new(
        config.base_url.clone(),
        config.request_timeout(),
    ));
    let app = App::new(&config, fetcher, today, route);

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal, month).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
