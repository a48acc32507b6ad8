use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;

use super::{parse_args, shellexpand};
use crate::config::Config;
use crate::session::Session;
use crate::ui::app::{App, InputMode, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(args: &[String], config: Config) -> Result<()> {
    let opts = parse_args(args)?;
    let config = match opts.reference {
        Some(path) => config.with_reference(path),
        None => config,
    };

    let mut session = Session::new(config);
    if !opts.positional.is_empty() {
        session.open(opts.positional.iter().map(|f| PathBuf::from(shellexpand(f))));
    }
    session.set_range(opts.from, opts.to);
    session.grouped = opts.grouped;

    let mut app = App::new();
    app.refresh(&session);
    if session.paths().is_empty() {
        app.set_status("No files loaded. Use :open <file.csv> to load a bank export");
    } else {
        app.set_status(format!(
            "Loaded {} transactions from {} file(s)",
            session.store().len(),
            session.paths().len()
        ));
    }
    tracing::info!(files = session.paths().len(), "starting TUI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &mut session);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!("TUI exited with error: {e:?}");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    session: &mut Session,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // Tab bar, status bar, command bar, table border and header
            let content_height = f.area().height.saturating_sub(6) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app),
                InputMode::Command => handle_command_input(key, app, session)?,
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('j') | KeyCode::Down => move_down(app),
        KeyCode::Char('k') | KeyCode::Up => move_up(app),
        KeyCode::Char('1') => switch_screen(app, Screen::Weekly),
        KeyCode::Char('2') => switch_screen(app, Screen::Categories),
        KeyCode::Char('3') => switch_screen(app, Screen::Trends),
        KeyCode::Char('4') => switch_screen(app, Screen::Benchmark),
        KeyCode::Char('5') => switch_screen(app, Screen::Budgets),
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let next = (idx + 1) % screens.len();
            switch_screen(app, screens[next]);
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 { screens.len() - 1 } else { idx - 1 };
            switch_screen(app, screens[prev]);
        }
        KeyCode::Enter if app.screen == Screen::Categories => {
            // Jump to the selected category's weekly series
            app.trend_index = app.category_index;
            app.trend_scroll = app.category_scroll;
            switch_screen(app, Screen::Trends);
        }
        KeyCode::Esc => app.status_message.clear(),
        KeyCode::Char('g') => {
            let (index, scroll, _) = app.cursor_mut();
            scroll_to_top(index, scroll);
        }
        KeyCode::Char('G') => {
            let page = app.visible_rows;
            let (index, scroll, len) = app.cursor_mut();
            scroll_to_bottom(index, scroll, len, page);
        }
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                move_down(app);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                move_up(app);
            }
        }
        _ => {}
    }
}

fn handle_command_input(key: KeyEvent, app: &mut App, session: &mut Session) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            // Persistence failures are reported, not fatal
            if let Err(e) = commands::handle_command(&input, app, session) {
                tracing::error!("command ':{input}' failed: {e:#}");
                app.set_status(format!("Error: {e:#}"));
            }
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn switch_screen(app: &mut App, screen: Screen) {
    app.screen = screen;
    app.set_status(format!("{screen}"));
}

fn move_down(app: &mut App) {
    let page = app.visible_rows;
    let (index, scroll, len) = app.cursor_mut();
    scroll_down(index, scroll, len, page);
}

fn move_up(app: &mut App) {
    let (index, scroll, _) = app.cursor_mut();
    scroll_up(index, scroll);
}
