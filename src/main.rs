mod app;
mod braille;
mod ui;
mod view;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use quake_globe::data::{self, LineString};
use quake_globe::{EarthquakeRecord, SurfaceConfig};
use ratatui::DefaultTerminal;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// 2000-01-01T00:00:00Z, start of the synthetic catalog
const SYNTHETIC_START: f64 = 946_684_800.0;
const SYNTHETIC_SPAN: f64 = 20.0 * 365.25 * 24.0 * 60.0 * 60.0;
const SYNTHETIC_COUNT: usize = 20_000;

#[derive(Parser, Debug)]
#[command(name = "quake-globe")]
#[command(
    about = "Play back an earthquake catalog on a globe that morphs into a flat map",
    long_about = None
)]
struct Args {
    /// JSON configuration file (every key optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// USGS GeoJSON earthquake catalog; a synthetic catalog is used without one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// GeoJSON coastlines; falls back to data/ne_110m_coastline.geojson, then a coarse outline
    #[arg(long)]
    coastlines: Option<PathBuf>,

    /// Write logs here (filtered by RUST_LOG); the terminal belongs to the UI
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let config = match &args.config {
        Some(path) => SurfaceConfig::load(path)?,
        None => SurfaceConfig::default(),
    };
    let records = load_records(args.catalog.as_deref())?;
    let coastlines = load_coastlines(args.coastlines.as_deref());

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    // Run the app
    let result = run(&mut terminal, &config, records, &coastlines);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file =
        File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_records(path: Option<&Path>) -> Result<Vec<EarthquakeRecord>> {
    match path {
        Some(path) => data::load_catalog(path),
        None => {
            tracing::info!(count = SYNTHETIC_COUNT, "no catalog given, using synthetic events");
            Ok(data::synthetic_catalog(SYNTHETIC_COUNT, SYNTHETIC_START, SYNTHETIC_SPAN, 42))
        }
    }
}

/// Coastlines are decoration: a missing or broken file falls back to the outline.
fn load_coastlines(path: Option<&Path>) -> Vec<LineString> {
    let default = Path::new("data/ne_110m_coastline.geojson");
    let path = match path {
        Some(path) => path,
        None if default.exists() => default,
        None => return data::simple_world_outline(),
    };

    match data::load_coastlines(path) {
        Ok(lines) if !lines.is_empty() => lines,
        Ok(_) => data::simple_world_outline(),
        Err(err) => {
            tracing::warn!(error = format!("{err:#}"), "coastlines unavailable, using outline");
            data::simple_world_outline()
        }
    }
}

/// Handle mouse events for rotating and zooming
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.zoom_in(),
        MouseEventKind::ScrollDown => app.zoom_out(),
        // Click and drag to rotate
        MouseEventKind::Down(MouseButton::Left) => {
            app.last_mouse = Some((mouse.column, mouse.row));
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.handle_drag(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.end_drag();
        }
        _ => {}
    }
}

fn run(
    terminal: &mut DefaultTerminal,
    config: &SurfaceConfig,
    records: Vec<EarthquakeRecord>,
    coastlines: &[LineString],
) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(
        config,
        records,
        coastlines,
        size.width as usize,
        size.height as usize,
    )?;
    let mut last_frame = Instant::now();

    // Main loop
    loop {
        let now = Instant::now();
        app.update(now.duration_since(last_frame).as_secs_f64());
        last_frame = now;

        // Draw
        terminal.draw(|frame| ui::render(frame, &mut app))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                            KeyCode::Char('g') | KeyCode::Char('G') => app.toggle_mode(),
                            KeyCode::Char('w') | KeyCode::Char('W') => app.toggle_wireframe(),
                            KeyCode::Char('c') | KeyCode::Char('C') => app.toggle_coastlines(),
                            KeyCode::Char(' ') => app.playback.toggle_pause(),

                            // Rotate with hjkl or arrow keys
                            KeyCode::Left | KeyCode::Char('h') => app.rotate(-1, 0),
                            KeyCode::Right | KeyCode::Char('l') => app.rotate(1, 0),
                            KeyCode::Up | KeyCode::Char('k') => app.rotate(0, -1),
                            KeyCode::Down | KeyCode::Char('j') => app.rotate(0, 1),

                            // Zoom
                            KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                            KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                            // Playback speed
                            KeyCode::Char(']') => app.faster(),
                            KeyCode::Char('[') => app.slower(),

                            KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),

                            _ => {}
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    handle_mouse(&mut app, mouse);
                }
                Event::Resize(width, height) => {
                    app.resize(width as usize, height as usize);
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    tracing::info!(
        spawned = app.spawned_total,
        rejected = app.rejected_total,
        expired = app.expired_total,
        "session finished"
    );
    Ok(())
}
