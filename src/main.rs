//! wharf - a dual-panel file manager for a remote file server
//!
//! Listings and fallback operations go over REST; when the live operator
//! link is up and authenticated, file operations run through it instead.

use std::io::{self, stdout};
use std::panic;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
};

mod async_io;
mod config;
mod errors;
mod input;
mod menu;
mod ops;
mod remote;
mod state;
mod term;
mod transport;
mod ui;

use config::Config;
use state::Side;
use state::app::{App, TITLE};
use state::mode::Mode;
use ui::{
    AlertDialog, ConfirmDialog, MenuWidget, PanelWidget, ProgressDialog, PromptDialog, StatusBar,
    Theme, TransferDialog, dialog::input_cursor_position,
};

/// Set up panic hook to restore terminal on panic
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

/// Initialize the terminal for TUI mode
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore terminal to normal mode
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Route log output to a file when WHARF_LOG is set; the terminal
/// belongs to the UI.
fn init_logging() {
    let Ok(filter) = std::env::var("WHARF_LOG") else {
        return;
    };
    let Some(path) = config::log_file() else {
        return;
    };
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    let Ok(file) = std::fs::File::options().create(true).append(true).open(&path) else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
}

/// Main event loop
fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    let theme = Theme::default();

    loop {
        terminal.draw(|frame| {
            let size = frame.area();

            let main_chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Min(5),    // Panels
                    Constraint::Length(1), // Status bar
                ])
                .split(size);

            let panel_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(main_chunks[0]);

            let left_widget = PanelWidget::new(app.active_panel == Side::Left, &theme);
            frame.render_stateful_widget(left_widget, panel_chunks[0], &mut app.left_panel);

            let right_widget = PanelWidget::new(app.active_panel == Side::Right, &theme);
            frame.render_stateful_widget(right_widget, panel_chunks[1], &mut app.right_panel);

            let status_panel = match app.active_panel {
                Side::Left => &app.left_panel,
                Side::Right => &app.right_panel,
            };
            let status_bar = StatusBar::new(status_panel, app.link_state, &theme);
            frame.render_widget(status_bar, main_chunks[1]);

            // Modal overlays
            match &app.mode {
                Mode::Transfer {
                    kind,
                    names,
                    dest_input,
                    focus,
                    ..
                } => {
                    let dialog =
                        TransferDialog::new(*kind, names, &dest_input.text, *focus, &theme);
                    frame.render_widget(dialog, size);
                    if *focus == 0 {
                        let (cx, cy) = input_cursor_position(size, dest_input);
                        frame.set_cursor_position((cx, cy));
                    }
                }
                Mode::RunCommand { input } => {
                    let dialog =
                        PromptDialog::new(TITLE, "Run command in terminal", &input.text, &theme);
                    frame.render_widget(dialog, size);
                    let (cx, cy) = input_cursor_position(size, input);
                    frame.set_cursor_position((cx, cy));
                }
                Mode::OverwriteConfirm { name, focus, .. } => {
                    let message = format!("\"{}\" already exists. Overwrite?", name);
                    let dialog = ConfirmDialog::new(TITLE, &message, ["Yes", "No"], *focus, &theme);
                    frame.render_widget(dialog, size);
                }
                Mode::ConfirmDelete { message, focus } => {
                    let dialog =
                        ConfirmDialog::new(TITLE, message, ["Delete", "Cancel"], *focus, &theme);
                    frame.render_widget(dialog, size);
                }
                Mode::Alert { title, message } => {
                    let dialog = AlertDialog::new(title, message, &theme);
                    frame.render_widget(dialog, size);
                }
                Mode::Menu { items, selected } => {
                    let menu = MenuWidget::new(items, *selected, &theme);
                    frame.render_widget(menu, size);
                }
                Mode::Progress { title, frame: tick } => {
                    let dialog = ProgressDialog::new(title, *tick, &theme);
                    frame.render_widget(dialog, size);
                }
                _ => {}
            }
        })?;

        // The terminal panel takes over the real screen
        if let Mode::Terminal {
            command,
            auto_close,
        } = &app.mode
        {
            let command = command.clone();
            let auto_close = *auto_close;
            app.mode = Mode::Normal;

            restore_terminal()?;
            let ctx = app.term_context();
            let shell = app.config.terminal.shell.clone();
            let result = match &command {
                Some(cmd) => term::run_command(&shell, cmd, auto_close, &ctx),
                None => term::run_interactive(&shell, &ctx),
            };
            *terminal = setup_terminal()?;
            terminal.clear()?;

            if let Err(e) = result {
                app.alert(e.to_string());
            }
            app.refresh_panels();
            continue;
        }

        // Shorter poll while an operation runs keeps the spinner moving
        let poll_timeout = if matches!(app.mode, Mode::Progress { .. }) {
            Duration::from_millis(50)
        } else {
            Duration::from_millis(100)
        };

        if event::poll(poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            input::handle_key(app, key);
        }

        app.poll();
        app.tick_spinner();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn main() -> io::Result<()> {
    init_logging();

    let config = Config::load();
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    setup_panic_hook();
    let mut terminal = setup_terminal()?;

    let mut app = match App::new(config) {
        Ok(app) => app,
        Err(e) => {
            restore_terminal()?;
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = run(&mut terminal, &mut app);

    restore_terminal()?;
    result
}
