//! TUI rendering using ratatui.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs},
    Frame,
};

use paperboard_models::Importance;

use super::app::{App, LoginField, Tab};
use crate::commands::format_timestamp;

/// Badge color for an importance level.
///
/// Matches the original board's palette: red, blue, green, and the
/// yellow fallback bucket.
pub fn importance_color(importance: Importance) -> Color {
    match importance {
        Importance::Critical => Color::Red,
        Importance::Mild => Color::Blue,
        Importance::Informational => Color::Green,
        Importance::Unspecified => Color::Yellow,
    }
}

/// Draw the TUI.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(5),    // Body
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);

    if app.machine.is_authenticated() {
        draw_tabs_body(frame, app, chunks[1]);
    } else {
        draw_login(frame, app, chunks[1]);
    }

    draw_status(frame, app, chunks[2]);
    draw_footer(frame, app, chunks[3]);

    if let Some(message) = &app.alert {
        draw_alert(frame, message);
    }
}

/// Draw the header bar.
fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let who = app
        .machine
        .session()
        .map(|s| s.email.as_str())
        .unwrap_or("signed out");

    let header = Paragraph::new(format!(" Paperboard - {} ", who)).style(
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    frame.render_widget(header, area);
}

/// Draw the login form.
fn draw_login(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Email
            Constraint::Length(3), // Password
            Constraint::Length(1), // Inline error
            Constraint::Min(0),
        ])
        .split(area);

    let focused = Style::default().fg(Color::Cyan);
    let unfocused = Style::default();

    let email = Paragraph::new(app.login.email.as_str())
        .style(match app.login.focus {
            LoginField::Email => focused,
            LoginField::Password => unfocused,
        })
        .block(Block::default().borders(Borders::ALL).title(" Email "));
    frame.render_widget(email, chunks[0]);

    // Password is masked, never echoed
    let masked = "*".repeat(app.login.password.chars().count());
    let password = Paragraph::new(masked)
        .style(match app.login.focus {
            LoginField::Password => focused,
            LoginField::Email => unfocused,
        })
        .block(Block::default().borders(Borders::ALL).title(" Password "));
    frame.render_widget(password, chunks[1]);

    // The last sign-in error shows inline, like the original form
    if !app.machine.last_error().is_empty() {
        let error = Paragraph::new(format!(" {} ", app.machine.last_error()))
            .style(Style::default().fg(Color::Red));
        frame.render_widget(error, chunks[2]);
    }
}

/// Draw the tab bar and the active tab's content.
fn draw_tabs_body(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(4)])
        .split(area);

    let titles = [Tab::Feed, Tab::Add, Tab::Account]
        .iter()
        .map(|t| Line::from(t.title()))
        .collect::<Vec<_>>();
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, chunks[0]);

    match app.tab {
        Tab::Feed => draw_feed(frame, app, chunks[1]),
        Tab::Add => draw_add(frame, app, chunks[1]),
        Tab::Account => draw_account(frame, app, chunks[1]),
    }
}

/// Draw the feed list.
fn draw_feed(frame: &mut Frame, app: &App, area: Rect) {
    if app.feed.is_empty() {
        let empty = Paragraph::new("No news yet. Press Tab to add some.")
            .block(Block::default().borders(Borders::ALL).title(" Feed "));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .feed
        .items()
        .iter()
        .map(|item| {
            let badge = Span::styled(
                format!(" {} ", item.importance.label()),
                Style::default()
                    .bg(importance_color(item.importance))
                    .fg(Color::White),
            );
            let text = Span::raw(format!(" {} ", item.text));
            let time = Span::styled(
                format_timestamp(item.created_at_millis),
                Style::default().fg(Color::DarkGray),
            );
            ListItem::new(Line::from(vec![badge, text, time]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Feed "))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Draw the add form.
fn draw_add(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let input = Paragraph::new(app.add.text.as_str())
        .block(Block::default().borders(Borders::ALL).title(" News "));
    frame.render_widget(input, chunks[0]);

    let importance = Paragraph::new(Line::from(vec![
        Span::raw(" Importance: "),
        Span::styled(
            format!(" {} ", app.add.importance.label()),
            Style::default()
                .bg(importance_color(app.add.importance))
                .fg(Color::White),
        ),
        Span::raw("  (Left/Right to change)"),
    ]));
    frame.render_widget(importance, chunks[1]);
}

/// Draw the account screen.
fn draw_account(frame: &mut Frame, app: &App, area: Rect) {
    let email = app
        .machine
        .session()
        .map(|s| s.email.clone())
        .unwrap_or_default();

    let account = Paragraph::new(format!("Signed in as {}\n\nPress Enter to sign out.", email))
        .block(Block::default().borders(Borders::ALL).title(" Account "));
    frame.render_widget(account, area);
}

/// Draw the status bar.
fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let status_text = if app.feed.is_refreshing() {
        " Refreshing... ".to_string()
    } else if let Some(error) = app.feed.last_error() {
        format!(" {} ", error)
    } else if app.machine.is_authenticated() {
        format!(" {} items ", app.feed.len())
    } else {
        " Sign in to read the board ".to_string()
    };

    let status =
        Paragraph::new(status_text).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(status, area);
}

/// Draw the footer with keybindings.
fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let keys = if !app.machine.is_authenticated() {
        "Tab: switch field | Enter: sign in | Esc: quit"
    } else {
        match app.tab {
            Tab::Feed => "Up/Down: select | r: refresh | d: delete | Tab: next tab | q: quit",
            Tab::Add => "Enter: submit | Left/Right: importance | Esc: back | Tab: next tab",
            Tab::Account => "Enter: sign out | Tab: next tab | q: quit",
        }
    };

    let footer = Paragraph::new(format!(" {} ", keys))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(footer, area);
}

/// Draw a blocking alert popup over everything else.
fn draw_alert(frame: &mut Frame, message: &str) {
    let area = centered_rect(60, 20, frame.area());

    let alert = Paragraph::new(format!("{}\n\nPress any key to dismiss.", message))
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Error "),
        );

    frame.render_widget(Clear, area);
    frame.render_widget(alert, area);
}

/// Centered sub-rectangle taking the given percentages of the area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_importance_colors_match_levels() {
        assert_eq!(importance_color(Importance::from_wire(0)), Color::Red);
        assert_eq!(importance_color(Importance::from_wire(1)), Color::Blue);
        assert_eq!(importance_color(Importance::from_wire(2)), Color::Green);
        assert_eq!(importance_color(Importance::from_wire(42)), Color::Yellow);
    }

    #[test]
    fn test_centered_rect_is_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = centered_rect(60, 20, area);

        assert!(rect.x >= area.x && rect.right() <= area.right());
        assert!(rect.y >= area.y && rect.bottom() <= area.bottom());
        assert!(rect.width > 0 && rect.height > 0);
    }
}
