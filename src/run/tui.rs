use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{info, warn};

use super::{today, Session, ViewQuery};
use crate::ledger::{Applied, LedgerAction};
use crate::ui::app::{App, InputMode, PendingAction, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(session: &mut Session) -> Result<()> {
    let query = ViewQuery {
        range: session.config.default_range(),
        ..ViewQuery::default()
    };
    let mut app = App::new(query, session.config.recent_limit, today());
    app.refresh(&session.ledger);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    info!("tui started");

    let result = run_app(&mut terminal, &mut app, session);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
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
            // tab + status + command bars, table borders and header
            app.visible_rows = (f.area().height.saturating_sub(6) as usize).max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, session),
                InputMode::Command => handle_command_input(key, app, session),
                InputMode::Search => handle_search_input(key, app, session),
                InputMode::Confirm => handle_confirm_input(key, app, session),
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: KeyEvent, app: &mut App, session: &mut Session) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('c') if ctrl => app.running = false,
        KeyCode::Char('d') if ctrl => {
            for _ in 0..app.visible_rows / 2 {
                move_down(app);
            }
        }
        KeyCode::Char('u') if ctrl => {
            for _ in 0..app.visible_rows / 2 {
                scroll_up(&mut app.transaction_index, &mut app.transaction_scroll);
            }
        }
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
            app.screen = Screen::Transactions;
            app.query.search.clear();
            app.reset_cursor();
            app.refresh(&session.ledger);
        }
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('1') => app.screen = Screen::Dashboard,
        KeyCode::Char('2') => app.screen = Screen::Transactions,
        KeyCode::Tab | KeyCode::BackTab => app.screen = app.screen.next(),
        KeyCode::Char('j') | KeyCode::Down => move_down(app),
        KeyCode::Char('k') | KeyCode::Up => {
            scroll_up(&mut app.transaction_index, &mut app.transaction_scroll);
        }
        KeyCode::Char('g') => scroll_to_top(&mut app.transaction_index, &mut app.transaction_scroll),
        KeyCode::Char('G') => scroll_to_bottom(
            &mut app.transaction_index,
            &mut app.transaction_scroll,
            app.transactions.len(),
            app.visible_rows,
        ),
        KeyCode::Char(']') => {
            app.query.range = app.query.range.next();
            let msg = format!("Range: {}", app.query.range);
            refilter(app, session, msg);
        }
        KeyCode::Char('[') => {
            app.query.range = app.query.range.prev();
            let msg = format!("Range: {}", app.query.range);
            refilter(app, session, msg);
        }
        KeyCode::Char('s') => {
            app.query.sort = app.query.sort.next();
            let msg = format!("Sorted by {} {}", app.query.sort.as_str(), app.query.order.as_str());
            refilter(app, session, msg);
        }
        KeyCode::Char('o') => {
            app.query.order = app.query.order.flip();
            let msg = format!("Sorted by {} {}", app.query.sort.as_str(), app.query.order.as_str());
            refilter(app, session, msg);
        }
        KeyCode::Char('D') if app.screen == Screen::Transactions => app.request_delete_selected(),
        KeyCode::Esc => {
            if !app.query.search.is_empty() {
                app.query.search.clear();
                refilter(app, session, "Search cleared".into());
            } else {
                app.status_message.clear();
            }
        }
        _ => {}
    }
}

fn handle_command_input(key: KeyEvent, app: &mut App, session: &mut Session) {
    match key.code {
        KeyCode::Enter => {
            let input = std::mem::take(&mut app.command_input);
            app.input_mode = InputMode::Normal;
            commands::handle_command(&input, app, session);
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            if app.command_input.pop().is_none() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            match trimmed.rfind(' ') {
                Some(pos) => app.command_input.truncate(pos + 1),
                None => app.command_input.clear(),
            }
        }
        KeyCode::Char(c) => app.command_input.push(c),
        _ => {}
    }
}

/// Every keystroke re-runs the search so the table follows the input.
fn handle_search_input(key: KeyEvent, app: &mut App, session: &mut Session) {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            return;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.query.search.clear();
        }
        KeyCode::Backspace => {
            app.query.search.pop();
        }
        KeyCode::Char(c) => app.query.search.push(c),
        _ => return,
    }
    app.reset_cursor();
    app.refresh(&session.ledger);
}

fn handle_confirm_input(key: KeyEvent, app: &mut App, session: &mut Session) {
    app.input_mode = InputMode::Normal;
    let pending = app.pending_action.take();
    app.confirm_message.clear();

    if !matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
        app.set_status("Cancelled");
        return;
    }
    let Some(PendingAction::DeleteTransaction { id, text }) = pending else {
        return;
    };

    match session.apply(LedgerAction::Delete(id)) {
        Ok(Applied::Deleted(Some(_))) => app.set_status(format!("Deleted #{id} {text}")),
        Ok(_) => app.set_status(format!("#{id} was already gone")),
        Err(e) => {
            warn!(error = %format!("{e:#}"), "delete failed");
            app.set_status(format!("Error: {e:#}"));
        }
    }
    app.refresh(&session.ledger);
}

// ── Helpers ──────────────────────────────────────────────────

fn move_down(app: &mut App) {
    scroll_down(
        &mut app.transaction_index,
        &mut app.transaction_scroll,
        app.transactions.len(),
        app.visible_rows,
    );
}

fn refilter(app: &mut App, session: &Session, status: String) {
    app.reset_cursor();
    app.refresh(&session.ledger);
    app.set_status(status);
}
