//! Event handling for the TUI.

use std::io::{self, Stdout};
use std::path::Path;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Runtime as TokioRuntime;

use paperboard_gateway::GatewayConfig;

use super::app::{App, Tab};
use super::ui;

/// Result type for TUI operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Initialize the terminal for TUI mode.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the TUI event loop.
pub fn run(config: GatewayConfig, state_dir: &Path) -> Result<()> {
    // Gateway calls are async; the loop itself stays synchronous and
    // drives them with block_on through this runtime.
    let runtime = TokioRuntime::new()?;

    let mut terminal = setup_terminal()?;

    let mut app = App::new(config, state_dir, runtime.handle().clone());

    let result = run_loop(&mut terminal, &mut app);

    // Release the live subscription before tearing the terminal down.
    app.stop_watcher();

    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop.
fn run_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(100);

    loop {
        // Draw UI
        terminal.draw(|f| ui::draw(f, app))?;

        // Poll for events with timeout
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Ctrl+C quits from anywhere
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
                {
                    app.should_quit = true;
                }

                // A raised alert blocks everything else; any key clears it
                if app.alert.is_some() {
                    app.dismiss_alert();
                    continue;
                }

                if app.machine.is_authenticated() {
                    handle_authenticated_key(app, key.code);
                } else {
                    handle_login_key(app, key.code);
                }
            }
        }

        // Drain change notifications from the watcher
        app.poll_changes();

        // Check if should quit
        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Key handling for the login screen.
fn handle_login_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Enter => app.sign_in(),
        KeyCode::Tab | KeyCode::Up | KeyCode::Down => app.toggle_login_focus(),
        KeyCode::Char(c) => app.input_char(c),
        KeyCode::Backspace => app.input_backspace(),
        KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}

/// Key handling for the authenticated tab set.
fn handle_authenticated_key(app: &mut App, code: KeyCode) {
    // Tab always cycles tabs
    if code == KeyCode::Tab {
        app.next_tab();
        return;
    }

    match app.tab {
        Tab::Feed => match code {
            KeyCode::Up | KeyCode::Char('k') => app.select_up(),
            KeyCode::Down | KeyCode::Char('j') => app.select_down(),
            KeyCode::Char('r') => app.refresh(),
            KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
            KeyCode::Char('a') => app.tab = Tab::Add,
            KeyCode::Esc | KeyCode::Char('q') => app.should_quit = true,
            _ => {}
        },
        Tab::Add => match code {
            KeyCode::Enter => app.submit_add(),
            KeyCode::Left | KeyCode::Right => app.cycle_importance(),
            KeyCode::Char(c) => app.input_char(c),
            KeyCode::Backspace => app.input_backspace(),
            KeyCode::Esc => app.tab = Tab::Feed,
            _ => {}
        },
        Tab::Account => match code {
            KeyCode::Enter | KeyCode::Char('s') => app.sign_out(),
            KeyCode::Esc | KeyCode::Char('q') => app.should_quit = true,
            _ => {}
        },
    }
}
