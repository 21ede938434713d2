use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use super::app::{App, InputMode, Screen};
use super::commands;
use super::theme;

pub(crate) fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command bar
        ])
        .split(f.area());

    render_tab_bar(f, chunks[0], app);
    match app.screen {
        Screen::Dashboard => super::screens::dashboard::render(f, chunks[1], app),
        Screen::Transactions => super::screens::transactions::render(f, chunks[1], app),
    }
    render_status_bar(f, chunks[2], app);
    render_command_bar(f, chunks[3], app);

    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Screen::all()
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let style = if *s == app.screen {
                Style::default().fg(theme::BLUE).add_modifier(Modifier::BOLD)
            } else {
                theme::dim_style()
            };
            Line::from(vec![
                Span::styled(format!("{}:", i + 1), theme::dim_style()),
                Span::styled(s.to_string(), style),
            ])
        })
        .collect();

    let tabs = Tabs::new(titles)
        .divider(Span::styled(" | ", Style::default().fg(theme::OVERLAY)))
        .style(Style::default().bg(theme::BASE));

    f.render_widget(tabs, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mode_label = format!(" {} ", app.input_mode);
    let mode_style = theme::mode_badge(match app.input_mode {
        InputMode::Normal => theme::BLUE,
        InputMode::Command => theme::GREEN,
        InputMode::Search => theme::YELLOW,
        InputMode::Confirm => theme::RED,
    });

    let info = format!(
        " {} | range: {} | sort: {} {} | {} txns",
        app.screen,
        app.query.range,
        app.query.sort.as_str(),
        app.query.order.as_str(),
        app.total_count
    );

    let right = match app.screen {
        Screen::Dashboard => " [/] range | Tab screen | ? help ",
        Screen::Transactions => " D delete | o order | /search | ? help ",
    };

    let used = mode_label.len() + info.chars().count() + right.len();
    let pad = (area.width as usize).saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(&mode_label, mode_style),
        Span::styled(&info, theme::status_bar_style()),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(right, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let (content, cursor_offset) = match app.input_mode {
        InputMode::Command => (
            Line::from(vec![
                Span::styled(":", Style::default().fg(theme::BLUE)),
                Span::styled(&app.command_input, theme::command_bar_style()),
            ]),
            Some(1 + app.command_input.chars().count() as u16),
        ),
        InputMode::Search => (
            Line::from(vec![
                Span::styled("/", Style::default().fg(theme::YELLOW)),
                Span::styled(&app.query.search, theme::command_bar_style()),
                Span::styled(
                    format!("  ({} matches)", app.transactions.len()),
                    theme::dim_style(),
                ),
            ]),
            Some(1 + app.query.search.chars().count() as u16),
        ),
        InputMode::Confirm => (
            Line::from(vec![
                Span::styled(&app.confirm_message, Style::default().fg(theme::YELLOW)),
                Span::styled(" [y/N] ", Style::default().fg(theme::RED)),
            ]),
            None,
        ),
        InputMode::Normal if app.status_message.is_empty() => (
            Line::from(Span::styled(
                " Press : for commands, / to search, ? for help",
                theme::dim_style(),
            )),
            None,
        ),
        InputMode::Normal => (
            Line::from(Span::styled(
                &app.status_message,
                theme::command_bar_style(),
            )),
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(theme::MANTLE));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

const KEY_HELP: &[&str] = &[
    "  j/k or Up/Down   Move cursor           1-2        Switch screens",
    "  Tab              Next screen           g/G        Top/Bottom",
    "  [ / ]            Prev/Next range       Ctrl-d/u   Page Down/Up",
    "  s                Cycle sort key        o          Flip sort order",
    "  D                Delete selected       Ctrl-q     Quit",
    "  :                Command mode          /          Search (live)",
    "  Esc              Cancel / clear search",
];

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let mut help_text = vec![
        Line::from(Span::styled(
            " Tally Help ",
            Style::default().fg(theme::BLUE).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(" Keys", theme::section_style())),
    ];
    help_text.extend(
        KEY_HELP
            .iter()
            .map(|line| Line::from(Span::styled(*line, theme::normal_style()))),
    );
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(" Commands", theme::section_style())));

    // One line per command, under its longest alias.
    let mut by_desc: Vec<(&str, &str)> = Vec::new();
    for (&name, cmd) in commands::COMMANDS.iter() {
        match by_desc.iter_mut().find(|(_, d)| *d == cmd.description) {
            Some(entry) if entry.0.len() < name.len() => entry.0 = name,
            Some(_) => {}
            None => by_desc.push((name, cmd.description)),
        }
    }
    by_desc.sort_by_key(|(name, _)| *name);
    for (name, desc) in &by_desc {
        help_text.push(Line::from(Span::styled(
            format!("  :{name:<14} {desc}"),
            theme::normal_style(),
        )));
    }

    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Press any key to close ",
        theme::dim_style(),
    )));

    let popup_height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_width = 76.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::BLUE))
            .style(Style::default().bg(theme::BASE)),
    );
    f.render_widget(help, popup_area);
}
