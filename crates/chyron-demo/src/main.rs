#![forbid(unsafe_code)]

//! Terminal band for the chyron engine: one ticker row per terminal row.
//!
//! A cell terminal cannot show sub-row scroll offsets, so the band advances
//! one whole row at a time, whenever the front row retires. Everything else
//! comes straight from [`TickerFrame`]: row order, status injection, replay.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::style::{Color, ResetColor, SetForegroundColor};
use crossterm::{ExecutableCommand, QueueableCommand, cursor, style, terminal};
use tracing_subscriber::EnvFilter;

use chyron_core::{Icon, ItemKind, PLACEHOLDER_TEXT, Ticker, TickerConfig};
use chyron_feed::{NewsWeatherSource, OpenMeteoStatus, RssHeadlines};

const FRAME_BUDGET: Duration = Duration::from_millis(33);

const VERBOSE_FILTER: &str = "chyron.ticker=debug,chyron.intake=debug,chyron.producer=debug,\
                              chyron.feed=debug,chyron.demo=debug";

#[derive(Parser, Debug)]
#[command(
    name = "chyron-demo",
    version,
    about = "Scrolling headline band with weather status rows"
)]
struct Cli {
    /// RSS feed polled for headlines
    #[arg(long = "feed-url", value_name = "URL", default_value = chyron_feed::DEFAULT_FEED_URL)]
    feed_url: String,

    /// Latitude for the weather status line
    #[arg(long, value_name = "DEG", default_value_t = chyron_feed::DEFAULT_LATITUDE)]
    latitude: f64,

    /// Longitude for the weather status line
    #[arg(long, value_name = "DEG", default_value_t = chyron_feed::DEFAULT_LONGITUDE)]
    longitude: f64,

    /// Label the status line opens with
    #[arg(long, value_name = "NAME", default_value = chyron_feed::DEFAULT_PLACE)]
    place: String,

    /// Seconds between feed fetches
    #[arg(long = "interval-secs", value_name = "SECONDS", default_value_t = 60)]
    interval_secs: u64,

    /// Scroll speed in rows per second
    #[arg(long, value_name = "ROWS_PER_SEC", default_value_t = 1.5)]
    speed: f32,

    /// Height of the band in terminal rows
    #[arg(long = "viewport-rows", value_name = "ROWS", default_value_t = 8)]
    viewport_rows: u16,

    /// Scroll a canned batch once instead of fetching anything
    #[arg(long)]
    offline: bool,

    /// Log engine internals at debug level to stderr
    #[arg(long)]
    verbose: bool,
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{error}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    init_logging(args.verbose);

    let (cols, _) = terminal::size().unwrap_or((120, 24));
    let config = TickerConfig::new()
        .viewport(f32::from(cols), f32::from(args.viewport_rows))
        .row_height(1.0)
        .scroll_speed(args.speed)
        .fetch_interval(Duration::from_secs(args.interval_secs))
        .max_text_chars(usize::from(cols.saturating_sub(3)).max(8));

    let (mut ticker, producer) = if args.offline {
        chyron_core::start(config, offline_source())?
    } else {
        let rss = RssHeadlines::new(args.feed_url.clone())?;
        let weather = OpenMeteoStatus::new(args.latitude, args.longitude, args.place.clone())?;
        chyron_core::start(config, NewsWeatherSource::new(rss, weather))?
    };
    tracing::debug!(
        target: "chyron.demo",
        offline = args.offline,
        url = %args.feed_url,
        "band started"
    );

    let mut tui = Tui::setup()?;
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let mut emergency = Tui { stdout: io::stdout() };
        emergency.teardown();
        original_hook(panic_info);
    }));

    let result = run_loop(&mut tui, &mut ticker, usize::from(args.viewport_rows));
    tui.teardown();
    producer.stop();
    result.map_err(Into::into)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Fixed batch for `--offline`, newest first the way a feed would list it.
/// Serving it once leaves the band on cyclic replay, which is the point.
fn offline_source() -> chyron_core::StaticSource {
    chyron_core::StaticSource::new(
        [
            "Markets close higher after a choppy session",
            "Rail strike talks resume ahead of the weekend",
            "City council approves riverside housing plan",
            "Storm damage closes two coastal roads",
            "Hospital trust reports shorter waiting times",
            "Rates held steady for a third month",
        ],
        "Warsaw: 12.3°C, Wind 4.5 km/h, Partly Cloudy",
        Icon::Cloud,
    )
    .serve_once()
}

fn run_loop(tui: &mut Tui, ticker: &mut Ticker, viewport_rows: usize) -> io::Result<()> {
    let mut last = Instant::now();
    loop {
        // Spend what is left of the frame budget waiting for input; on
        // timeout, advance the clock by the real elapsed time and redraw.
        let budget = FRAME_BUDGET.saturating_sub(last.elapsed());
        if event::poll(budget)? {
            if let Event::Key(KeyEvent { code, modifiers, .. }) = event::read()? {
                let quit = matches!(code, KeyCode::Char('q') | KeyCode::Esc)
                    || (code == KeyCode::Char('c') && modifiers == KeyModifiers::CONTROL);
                if quit {
                    return Ok(());
                }
            }
            continue;
        }

        let now = Instant::now();
        ticker.tick(now.duration_since(last));
        last = now;
        tui.draw(ticker, viewport_rows)?;
    }
}

struct Tui {
    stdout: io::Stdout,
}

impl Tui {
    fn setup() -> io::Result<Self> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        stdout.execute(terminal::EnterAlternateScreen)?;
        stdout.execute(cursor::Hide)?;
        Ok(Self { stdout })
    }

    fn teardown(&mut self) {
        let _ = self.stdout.execute(cursor::Show);
        let _ = self.stdout.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = self.stdout.flush();
    }

    fn draw(&mut self, ticker: &Ticker, viewport_rows: usize) -> io::Result<()> {
        let frame = ticker.frame();

        self.stdout.queue(cursor::MoveTo(0, 0))?;
        self.stdout
            .queue(terminal::Clear(terminal::ClearType::All))?;

        for row in frame.rows.iter().take(viewport_rows) {
            let color = match row.kind {
                ItemKind::Status => Color::Cyan,
                ItemKind::Headline if row.text == PLACEHOLDER_TEXT => Color::DarkGrey,
                ItemKind::Headline => Color::White,
            };
            self.stdout.queue(SetForegroundColor(color))?;
            self.stdout
                .queue(style::Print(format!("{} {}", icon_glyph(row.icon), row.text)))?;
            self.stdout.queue(ResetColor)?;
            self.stdout.queue(cursor::MoveToNextLine(1))?;
        }

        let stats = ticker.stats();
        self.stdout.queue(cursor::MoveToNextLine(1))?;
        self.stdout.queue(SetForegroundColor(Color::DarkGrey))?;
        self.stdout.queue(style::Print(format!(
            "drained {}  replayed {}  evicted {}  statuses {}   q/Esc to quit",
            stats.drained, stats.replayed, stats.evicted, stats.status_injected
        )))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()
    }
}

fn icon_glyph(icon: Icon) -> &'static str {
    match icon {
        Icon::Headline => "•",
        Icon::Sun => "☀",
        Icon::Cloud => "☁",
        Icon::Rain => "☂",
        Icon::Snow => "❄",
        Icon::Thunder => "⚡",
    }
}
