// gaugedash-cli/src/main.rs
use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Layout},
};
use std::{
    io,
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;

use gaugedash_core::{
    ConfigFile, EventBus, PanelEvent, PanelOptions, WidgetContainer, options_topic,
};
use gaugedash_widgets::{GaugeWidget, ThresholdsWidget};

/// Edit the thresholds of a gauge panel in the terminal.
///
/// The final panel options are printed as TOML on exit.
#[derive(Debug, Parser)]
#[command(name = "gaugedash", version)]
struct Args {
    /// Config file (default: ./gaugedash.toml, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Panel to edit
    #[arg(short, long, default_value = "default")]
    panel: String,

    /// Write logs here; filter with GAUGEDASH_LOG (default: info)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
    // The terminal belongs to the UI, so logs only go to a file
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_env("GAUGEDASH_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

/// A file named with `--config` must load; the implicit lookup falls back
/// to the built-in default with a warning
fn load_config(path: Option<&Path>) -> anyhow::Result<ConfigFile> {
    if let Some(path) = path {
        return ConfigFile::load_from(path)
            .with_context(|| format!("loading config {}", path.display()));
    }

    Ok(ConfigFile::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using default");
        eprintln!("Warning: Failed to load config: {}. Using default.", e);
        ConfigFile::default()
    }))
}

/// Run the dashboard until `q`, returning the last options the editor reported
fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    panel: &str,
    options: PanelOptions,
) -> anyhow::Result<PanelOptions> {
    let event_bus = EventBus::new();
    let (_subscription, changes) = event_bus.subscribe(options_topic(panel));

    let mut widgets = vec![
        WidgetContainer::new(
            "thresholds",
            Box::new(ThresholdsWidget::new(event_bus.clone(), panel, options.clone())),
        ),
        WidgetContainer::new(
            "gauge",
            Box::new(GaugeWidget::new(event_bus.clone(), panel, options.clone())),
        ),
    ];
    for widget in widgets.iter_mut() {
        widget.mount();
    }

    let mut latest = options;
    let mut focused_widget = 0;
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| {
            let areas = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(f.area());
            let buf = f.buffer_mut();

            for (i, (widget, area)) in widgets.iter_mut().zip(areas.iter()).enumerate() {
                widget.render_focused(*area, buf, i == focused_widget);
            }
        })?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)?
            && let CEvent::Key(key) = event::read()?
            // Only handle key press events, not key release
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') => break,
                KeyCode::Tab => focused_widget = (focused_widget + 1) % widgets.len(),
                _ => {
                    if let Some(focused) = widgets.get_mut(focused_widget) {
                        focused.handle_event(gaugedash_core::Event::Key(key));
                    }
                }
            }
        }

        for event in changes.try_iter() {
            let PanelEvent::OptionsChanged { options, .. } = event.payload;
            latest = options;
        }

        if last_tick.elapsed() >= tick_rate {
            for widget in widgets.iter_mut() {
                widget.update();
            }
            last_tick = Instant::now();
        }
    }

    for widget in widgets.iter_mut() {
        widget.unmount();
    }

    Ok(latest)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_deref())?;

    let config = load_config(args.config.as_deref())?;
    let options = config.get_panel(&args.panel)?.options.clone();
    tracing::info!(panel = %args.panel, rows = options.thresholds.len(), "editing panel");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run(&mut terminal, &args.panel, options);

    // Restore the terminal before reporting anything
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    let options = result?;
    print!("{}", options.to_toml().context("serializing panel options")?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["gaugedash"]).unwrap();
        assert_eq!(args.panel, "default");
        assert!(args.config.is_none());
        assert!(args.log_file.is_none());
    }

    #[test]
    fn test_args_flags() {
        let args = Args::try_parse_from([
            "gaugedash",
            "--config",
            "panels.toml",
            "-p",
            "cpu",
            "--log-file",
            "gaugedash.log",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("panels.toml")));
        assert_eq!(args.panel, "cpu");
        assert_eq!(args.log_file, Some(PathBuf::from("gaugedash.log")));
    }

    #[test]
    fn test_explicit_config_must_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("missing.toml"));

        std::fs::write(&path, "[[panel]]\nname = \"cpu\"\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert!(config.get_panel("cpu").is_ok());
        assert!(config.get_panel("default").is_err());
    }

    #[test]
    fn test_explicit_config_with_bad_thresholds_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        let content = r#"
[[panel]]
name = "cpu"

[[panel.options.thresholds]]
index = 0
label = "Min"
value = 0.0
canRemove = false
"#;
        std::fs::write(&path, content).unwrap();

        assert!(load_config(Some(&path)).is_err());
    }
}
