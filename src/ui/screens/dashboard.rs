use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_date, format_signed, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Summary cards
            Constraint::Min(8),    // Chart + recent
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);
    render_spending_chart(f, lower[0], app);
    render_recent(f, lower[1], app);
}

fn titled_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(title, theme::title_style()))
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let s = &app.summary;
    render_card(
        f,
        cards[0],
        "Balance",
        format_amount(s.balance),
        theme::amount_color(s.balance),
        format!("{} txns", s.count),
    );
    render_card(
        f,
        cards[1],
        "Income",
        format_amount(s.income),
        theme::GREEN,
        format!("{} txns", s.income_count),
    );
    render_card(
        f,
        cards[2],
        "Expenses",
        format_amount(s.expense),
        theme::RED,
        format!("{} txns", s.expense_count),
    );
}

fn render_card(f: &mut Frame, area: Rect, title: &str, value: String, color: Color, sub: String) {
    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(sub, theme::dim_style())),
    ])
    .centered()
    .block(titled_block(format!(" {title} ")));

    f.render_widget(text, area);
}

fn render_spending_chart(f: &mut Frame, area: Rect, app: &App) {
    let block = titled_block(format!(" Spending by Category ({}) ", app.query.range));

    if app.summary.by_category.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No expenses in this range. Add one with :add",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    // Bars are whole dollars; labels carry the exact figure.
    let bars: Vec<Bar> = app
        .summary
        .by_category
        .iter()
        .take(12)
        .map(|(name, amt)| {
            Bar::default()
                .value(amt.round().to_u64().unwrap_or(0))
                .text_value(format_amount(*amt))
                .label(Line::from(truncate(name, 10)))
                .style(Style::default().fg(theme::BLUE))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(10)
        .bar_gap(1)
        .value_style(Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD));

    f.render_widget(chart, area);
}

fn render_recent(f: &mut Frame, area: Rect, app: &App) {
    let block = titled_block(format!(" Recent ({}) ", app.recent.len()));
    if app.recent.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "Nothing yet",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    // Inner width minus date (10), amount (12) and gaps.
    let text_width = (area.width as usize).saturating_sub(2 + 10 + 12 + 2).max(4);
    let items: Vec<ListItem> = app
        .recent
        .iter()
        .map(|txn| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<10} ", format_date(txn.date)), theme::dim_style()),
                Span::styled(
                    format!("{:<text_width$}", truncate(&txn.text, text_width)),
                    theme::normal_style(),
                ),
                Span::styled(
                    format!(" {:>12}", format_signed(txn.amount)),
                    Style::default().fg(theme::amount_color(txn.amount)),
                ),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}
