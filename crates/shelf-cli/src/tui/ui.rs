//! UI rendering

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use shelf_core::catalog::NO_RESULTS_MESSAGE;
use shelf_core::{CardVisibility, DetailOverlay, LoadState, Record};
use unicode_width::UnicodeWidthStr;

use super::app::{App, InputMode};

/// Lines per card, including the blank separator
const CARD_HEIGHT: usize = 5;

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    draw_cards_pane(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);

    if let Some(overlay) = app.catalog.overlay() {
        draw_detail_overlay(frame, overlay);
    }

    // Draw help overlay if visible
    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Search bar, sort selector and result count
fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(20),
            Constraint::Length(26),
            Constraint::Length(26),
        ])
        .split(area);

    let searching = app.input_mode == InputMode::Search;
    let search_style = if searching {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let search_text = if app.search_input.is_empty() && !searching {
        Line::from(Span::styled(
            "Press / to search",
            Style::default().add_modifier(Modifier::DIM),
        ))
    } else {
        Line::from(app.search_input.as_str())
    };
    let search = Paragraph::new(search_text).block(
        Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_style(search_style),
    );
    frame.render_widget(search, chunks[0]);

    if searching {
        let offset = cursor_offset(&app.search_input, app.search_cursor)
            .min(chunks[0].width.saturating_sub(2));
        frame.set_cursor_position((chunks[0].x + 1 + offset, chunks[0].y + 1));
    }

    let sort = Paragraph::new(app.catalog.sort().label())
        .block(Block::default().title(" Sort (s/S) ").borders(Borders::ALL));
    frame.render_widget(sort, chunks[1]);

    let count = Paragraph::new(app.catalog.result_label())
        .block(Block::default().title(" Results ").borders(Borders::ALL));
    frame.render_widget(count, chunks[2]);
}

/// Display columns taken by the first `cursor` chars of `input`
fn cursor_offset(input: &str, cursor: usize) -> u16 {
    let before: String = input.chars().take(cursor).collect();
    u16::try_from(before.width()).unwrap_or(u16::MAX)
}

/// Draw the card list, or whatever replaces it
fn draw_cards_pane(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().title(" Books ").borders(Borders::ALL);

    match app.catalog.load_state() {
        LoadState::Idle | LoadState::Loading => {
            draw_message(frame, area, block, "Loading library…", Style::default());
        }
        LoadState::Failed(message) => {
            draw_message(frame, area, block, message, Style::default().fg(Color::Red));
        }
        LoadState::Ready if app.catalog.shows_placeholder() => {
            draw_message(
                frame,
                area,
                block,
                NO_RESULTS_MESSAGE,
                Style::default().add_modifier(Modifier::DIM),
            );
        }
        LoadState::Ready => {
            let width = area.width.saturating_sub(4) as usize;
            let items: Vec<ListItem> = app
                .catalog
                .cards()
                .iter()
                .enumerate()
                .map(|(i, record)| match app.catalog.card_visibility(i, app.now) {
                    CardVisibility::Visible => card_item(record, width),
                    CardVisibility::Hidden => ListItem::new(vec![Line::from(""); CARD_HEIGHT]),
                })
                .collect();

            let list = List::new(items).block(block).highlight_style(
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::REVERSED),
            );

            let mut state = ListState::default();
            if app.catalog.card_visibility(app.selected, app.now) == CardVisibility::Visible {
                state.select(Some(app.selected));
            }

            frame.render_stateful_widget(list, area, &mut state);
        }
    }
}

fn draw_message(frame: &mut Frame, area: Rect, block: Block, message: &str, style: Style) {
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), style)),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(block);
    frame.render_widget(paragraph, area);
}

/// One card: title and year, first author, subjects, call to action
fn card_item(record: &Record, width: usize) -> ListItem<'static> {
    let year = format!("  {}", record.year);
    let title_width = width.saturating_sub(year.chars().count());

    let tags: Vec<Span> = record
        .tags
        .iter()
        .flat_map(|tag| {
            [
                Span::styled(format!("[{}]", tag), Style::default().fg(Color::Cyan)),
                Span::raw(" "),
            ]
        })
        .collect();

    ListItem::new(vec![
        Line::from(vec![
            Span::styled(
                truncate(&record.title, title_width),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(year, Style::default().fg(Color::Yellow)),
        ]),
        Line::from(Span::styled(
            truncate(&record.snippet, width),
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        Line::from(tags),
        Line::from(Span::styled(
            "Enter to read →",
            Style::default().add_modifier(Modifier::DIM),
        )),
        Line::from(""),
    ])
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

/// Draw the status bar at the bottom
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let content = if let Some(msg) = &app.status_message {
        msg.clone()
    } else if app.input_mode == InputMode::Search {
        "Enter:done  Esc:clear  ←/→:move cursor".to_string()
    } else if app.catalog.escape_armed() {
        "Esc/x:close  j/k:scroll  w:WorldCat  g:Google Books  q:quit".to_string()
    } else {
        "/:search  s/S:sort  Enter:open  ?:help  q:quit".to_string()
    };

    let paragraph = Paragraph::new(content).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Centered popup covering most of the screen
fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    )
}

/// Draw the detail overlay for one book
fn draw_detail_overlay(frame: &mut Frame, overlay: &DetailOverlay) {
    let area = popup_area(frame.area(), 80, 80);
    frame.render_widget(Clear, area);

    let detail = overlay.detail();
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(Span::styled(detail.title.clone(), bold)),
        Line::from(Span::styled(
            format!("by {}", detail.authors),
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
    ];

    for (label, value) in detail.rows() {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<11}", label), bold),
            Span::raw(value),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("About this book", bold)));
    lines.push(Line::from(detail.description.clone()));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("w ", Style::default().fg(Color::Yellow)),
        Span::raw("Find in WorldCat  "),
        Span::styled(
            detail.catalog_url.clone(),
            Style::default().add_modifier(Modifier::UNDERLINED),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled("g ", Style::default().fg(Color::Yellow)),
        Span::raw("Google Books      "),
        Span::styled(
            detail.web_search_url.clone(),
            Style::default().add_modifier(Modifier::UNDERLINED),
        ),
    ]));

    // Faded while opening or closing
    let style = if overlay.is_active() {
        Style::default()
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };

    let block = Block::default()
        .title(" Details ")
        .title_bottom(" Esc/x close ")
        .borders(Borders::ALL)
        .border_style(style.add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(style)
        .wrap(Wrap { trim: false })
        .scroll((overlay.scroll, 0));

    frame.render_widget(paragraph, area);
}

/// Draw help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    // Calculate centered popup area
    let popup_width = 50.min(area.width.saturating_sub(4));
    let popup_height = 20.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("Browsing:"),
        Line::from("  j/k, ↑/↓    Move between books"),
        Line::from("  gg / G      First / last book"),
        Line::from("  /           Search"),
        Line::from("  s / S       Next / previous sort"),
        Line::from("  Enter       Open book details"),
        Line::from(""),
        Line::from("Details:"),
        Line::from("  Esc, x      Close"),
        Line::from("  j/k         Scroll"),
        Line::from("  w           Find in WorldCat"),
        Line::from("  g           Search Google Books"),
        Line::from(""),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use shelf_core::models::{Dataset, RawBook};
    use shelf_core::{Catalog, TransitionTiming};
    use std::time::Duration;

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app() -> App {
        let catalog = Catalog::new(TransitionTiming::instant(), Duration::from_millis(400));
        App::with_catalog(catalog)
    }

    fn loaded_app() -> App {
        let mut app = app();
        let books = vec![RawBook {
            title: "Design Patterns".to_string(),
            year: "1994".to_string(),
            subjects: vec!["Software".to_string()],
            author: "Gamma, Erich;Helm, Richard".to_string(),
            isbn: "9780201633610".to_string(),
            publisher: "Addison-Wesley".to_string(),
            edition: 1,
            description: "Elements of reusable object-oriented software.".to_string(),
        }];
        let now = app.now;
        app.catalog
            .finish_load(Ok(Dataset { books }.into_records()), now);
        app
    }

    #[test]
    fn test_cursor_offset_uses_display_width() {
        assert_eq!(cursor_offset("abc", 2), 2);
        assert_eq!(cursor_offset("é", 1), 1);
        assert_eq!(cursor_offset("日本語", 2), 4);
        assert_eq!(cursor_offset("日本語", 10), 6);
    }

    #[test]
    fn test_search_cursor_after_wide_chars() {
        let mut app = loaded_app();
        app.enter_search_mode();
        app.insert_char('日');
        app.insert_char('本');

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| draw(frame, &app)).unwrap();
        let position = terminal.get_cursor_position().unwrap();
        assert_eq!((position.x, position.y), (5, 1));
    }

    #[test]
    fn test_loading_indicator() {
        let mut app = app();
        app.catalog.begin_load();
        assert!(render(&app).contains("Loading library…"));
    }

    #[test]
    fn test_load_error_banner() {
        let mut app = app();
        app.catalog.begin_load();
        let now = app.now;
        app.catalog
            .finish_load(Err(shelf_core::LoadError::Status { status: 404 }), now);

        let screen = render(&app);
        assert!(screen.contains("Error loading library: HTTP 404"));
        assert!(!screen.contains("Loading library"));
    }

    #[test]
    fn test_cards_and_count() {
        let screen = render(&loaded_app());
        assert!(screen.contains("Design Patterns"));
        assert!(screen.contains("1994"));
        assert!(screen.contains("Gamma, Erich"));
        assert!(screen.contains("[Software]"));
        assert!(screen.contains("1 book in collection"));
        assert!(screen.contains("Default (newest)"));
    }

    #[test]
    fn test_no_results_placeholder() {
        let mut app = loaded_app();
        app.insert_char('z');
        app.tick(app.now + Duration::from_millis(400));

        let screen = render(&app);
        assert!(screen.contains(NO_RESULTS_MESSAGE));
        assert!(screen.contains("0 books found"));
    }

    #[test]
    fn test_detail_overlay() {
        let mut app = loaded_app();
        app.open_selected();

        let screen = render(&app);
        assert!(screen.contains("About this book"));
        assert!(screen.contains("978-0-201-63361-0"));
        assert!(screen.contains("Gamma, Erich · Helm, Richard"));
        assert!(screen.contains("1st"));
    }
}
