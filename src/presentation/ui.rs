use crate::application::{App, Screen};
use crate::domain::{FetchState, User};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    match (app.screen, app.detail.as_ref()) {
        (Screen::Detail, Some(pane)) => render_detail(f, &pane.state, pane.user_id, chunks[1]),
        _ => render_users(f, app, chunks[1]),
    }
    render_status_bar(f, app, chunks[2]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let mut title = "tusers - User Directory".to_string();
    if !app.source.is_empty() {
        title.push_str(&format!(" | {}", app.source));
    }
    if let FetchState::Ok(users) = &app.users_state {
        title.push_str(&format!(" | {} users", users.len()));
    }
    let header = Paragraph::new(title).style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_users(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Users");
    match &app.users_state {
        FetchState::Idle => render_message(f, block, area, vec![Line::from("Press r to load users")]),
        FetchState::Pending => render_message(f, block, area, vec![Line::from("Loading users...")]),
        FetchState::Failed(message) => render_failure(f, block, area, message),
        FetchState::Ok(users) if users.is_empty() => {
            render_message(f, block, area, vec![Line::from("No users found")])
        }
        FetchState::Ok(users) => render_user_table(f, block, area, users, app.selected),
    }
}

fn render_user_table(f: &mut Frame, block: Block, area: Rect, users: &[User], selected: usize) {
    let header = Row::new(["ID", "Name", "Username", "Contact"])
        .style(Style::default().fg(Color::Yellow))
        .height(1);

    let rows = users.iter().map(|user| {
        Row::new(vec![
            Cell::from(user.id.to_string()),
            Cell::from(user.name.clone()),
            Cell::from(user.username.clone().unwrap_or_else(|| "-".to_string())),
            Cell::from(user.display_contact().to_string()),
        ])
    });

    let widths = [
        Constraint::Length(4),
        Constraint::Percentage(35),
        Constraint::Percentage(20),
        Constraint::Min(10),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1)
        .row_highlight_style(Style::default().bg(Color::Blue).fg(Color::White));

    let mut state = TableState::default().with_selected(Some(selected));
    f.render_stateful_widget(table, area, &mut state);
}

fn render_detail(f: &mut Frame, state: &FetchState<User>, user_id: u64, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("User {}", user_id));
    match state {
        FetchState::Idle | FetchState::Pending => {
            render_message(f, block, area, vec![Line::from("Loading user...")])
        }
        FetchState::Failed(message) => render_failure(f, block, area, message),
        FetchState::Ok(user) => {
            let label = Style::default().fg(Color::Yellow);
            let field = |name: &str, value: Option<&str>| {
                Line::from(vec![
                    Span::styled(format!("{:<10}", name), label),
                    Span::raw(value.unwrap_or("-").to_string()),
                ])
            };
            let id = user.id.to_string();
            let lines = vec![
                field("ID", Some(id.as_str())),
                field("Name", Some(user.name.as_str())),
                field("Username", user.username.as_deref()),
                field("Email", user.email.as_deref()),
                field("Phone", user.phone.as_deref()),
            ];
            f.render_widget(Paragraph::new(lines).block(block), area);
        }
    }
}

fn render_failure(f: &mut Frame, block: Block, area: Rect, message: &str) {
    let lines = vec![
        Line::styled(message.to_string(), Style::default().fg(Color::Red)),
        Line::from(""),
        Line::styled(
            "Press r to retry",
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];
    render_message(f, block, area, lines);
}

fn render_message(f: &mut Frame, block: Block, area: Rect, lines: Vec<Line>) {
    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let (text, style) = match app.screen {
        Screen::List => {
            let hint = match &app.users_state {
                FetchState::Idle => "r: load | q: quit",
                FetchState::Pending => "Fetching... | q: quit",
                FetchState::Failed(_) => "r: retry | q: quit",
                FetchState::Ok(_) => "↑↓/jk: move | Enter: details | r: refresh | q: quit",
            };
            let style = if app.users_state.error_message().is_some() {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            (hint, style)
        }
        Screen::Detail => ("Esc: back | r: refresh | q: quit", Style::default().fg(Color::Green)),
    };

    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(style);
    f.render_widget(status, area);
}
