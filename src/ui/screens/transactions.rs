use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::aggregate::{SortKey, SortOrder};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_date, format_signed, truncate};

const HEADERS: [(&str, Option<SortKey>); 6] = [
    ("ID", None),
    ("Date", Some(SortKey::Date)),
    ("Description", Some(SortKey::Name)),
    ("Category", None),
    ("Method", None),
    ("Amount", Some(SortKey::Amount)),
];

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let mut title = format!(
        " Transactions ({}/{}) range: {} ",
        app.transactions.len(),
        app.total_count,
        app.query.range
    );
    if !app.query.search.is_empty() {
        title.push_str(&format!("search: '{}' ", app.query.search));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(title, theme::title_style()));

    if app.transactions.is_empty() {
        let hint = if app.query.search.is_empty() {
            "Add one with :add, import with :import, or widen with :range all"
        } else {
            "Press Esc to clear the search"
        };
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No transactions to show", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(hint, theme::dim_style())),
        ];
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let arrow = match app.query.order {
        SortOrder::Asc => " ▲",
        SortOrder::Desc => " ▼",
    };
    let header = Row::new(HEADERS.iter().map(|(name, key)| {
        let label = if *key == Some(app.query.sort) {
            format!("{name}{arrow}")
        } else {
            (*name).to_string()
        };
        Cell::from(label).style(theme::header_style())
    }))
    .height(1);

    let rows: Vec<Row> = app
        .transactions
        .iter()
        .enumerate()
        .skip(app.transaction_scroll)
        .take(app.visible_rows)
        .map(|(i, txn)| {
            let style = if i == app.transaction_index {
                theme::cursor_style()
            } else if i % 2 == 1 {
                theme::stripe_style()
            } else {
                theme::normal_style()
            };

            let mut text = truncate(&txn.text, 40);
            if !txn.tags.is_empty() {
                text.push_str(&format!("  #{}", txn.tags.join(" #")));
            }

            Row::new(vec![
                Cell::from(txn.id.to_string()),
                Cell::from(format_date(txn.date)),
                Cell::from(text),
                Cell::from(truncate(txn.category_or_default(), 16)),
                Cell::from(truncate(txn.payment_method.as_deref().unwrap_or(""), 12)),
                Cell::from(Span::styled(
                    format!("{:>14}", format_signed(txn.amount)),
                    Style::default().fg(theme::amount_color(txn.amount)),
                )),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Min(20),
        Constraint::Length(18),
        Constraint::Length(14),
        Constraint::Length(16),
    ];

    f.render_widget(Table::new(rows, widths).header(header).block(block), area);
}
