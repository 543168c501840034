use std::sync::OnceLock;

use chrono::NaiveDate;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use regex::Regex;

use crate::api::{CatalogError, Episode, Image, Show};
use crate::state::{View, ViewState};
use crate::{App, Focus};

static TAG_RE: OnceLock<Regex> = OnceLock::new();

/// The display fields of one visible item. `image: None` is the placeholder
/// case, rendered as "no image".
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub title: String,
    pub meta: String,
    pub image: Option<String>,
    pub summary: String,
    pub url: String,
}

/// Pure projection of the view state onto display cards, one per visible
/// item. Reads the state only; calling it twice gives identical output.
pub fn cards(state: &ViewState) -> Vec<Card> {
    match &state.view {
        View::Shows { visible } => visible.iter().map(show_card).collect(),
        View::Episodes { visible, .. } => visible.iter().map(episode_card).collect(),
    }
}

pub fn count_line(state: &ViewState) -> String {
    let (n, noun) = match &state.view {
        View::Shows { visible } => (visible.len(), "show"),
        View::Episodes { visible, .. } => (visible.len(), "episode"),
    };
    format!("{} {}{} displayed", n, noun, if n == 1 { "" } else { "s" })
}

pub fn episode_code(season: u32, number: u32) -> String {
    format!("S{:02}E{:02}", season, number)
}

pub fn strip_tags(html: &str) -> String {
    let re = TAG_RE.get_or_init(|| Regex::new(r"<[^>]+>").unwrap());
    re.replace_all(html, "").trim().to_string()
}

fn show_card(show: &Show) -> Card {
    let mut meta = Vec::new();
    if !show.genres.is_empty() {
        meta.push(show.genres.join(", "));
    }
    if let Some(avg) = show.rating.average {
        meta.push(format!("{avg:.1}/10"));
    }
    if let Some(runtime) = show.runtime {
        meta.push(format!("{runtime} min"));
    }
    meta.push(show.status.clone());
    if let Some(premiered) = &show.premiered {
        meta.push(format!("premiered {}", format_date(premiered)));
    }
    Card {
        title: show.name.clone(),
        meta: meta.join(" | "),
        image: image_url(&show.image),
        summary: show.summary.as_deref().map(strip_tags).unwrap_or_default(),
        url: show.url.clone(),
    }
}

fn episode_card(episode: &Episode) -> Card {
    Card {
        title: format!("{} - {}", episode.name, episode_code(episode.season, episode.number)),
        meta: episode
            .airdate
            .as_deref()
            .map(|d| format!("aired {}", format_date(d)))
            .unwrap_or_default(),
        image: image_url(&episode.image),
        summary: strip_tags(&episode.summary),
        url: episode.url.clone(),
    }
}

fn image_url(image: &Option<Image>) -> Option<String> {
    image
        .as_ref()
        .and_then(|i| i.medium.clone().or_else(|| i.original.clone()))
}

fn format_date(iso: &str) -> String {
    NaiveDate::parse_from_str(iso, "%Y-%m-%d")
        .map(|d| d.format("%-d %b %Y").to_string())
        .unwrap_or_else(|_| iso.to_string())
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3), // Search box
                Constraint::Length(1), // Count line
                Constraint::Min(1),    // Main content
                Constraint::Length(1), // Status bar
            ]
            .as_ref(),
        )
        .split(f.area());

    let search_text = format!("Search: {}", app.state.search);
    let search_block =
        Paragraph::new(search_text).block(Block::default().borders(Borders::ALL).title("Filter"));
    f.render_widget(search_block, chunks[0]);

    let count = Paragraph::new(count_line(&app.state)).style(Style::default().fg(Color::DarkGray));
    f.render_widget(count, chunks[1]);

    if app.state.in_episode_view() {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(34), Constraint::Min(1)].as_ref())
            .split(chunks[2]);
        draw_jump_list(f, app, halves[0]);
        draw_cards(f, app, halves[1]);
    } else {
        draw_cards(f, app, chunks[2]);
    }

    let status = Paragraph::new(app.status_message.as_str()).style(Style::default().fg(Color::Gray));
    f.render_widget(status, chunks[3]);
}

fn draw_cards(f: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = cards(&app.state)
        .into_iter()
        .map(|card| {
            let mut lines = vec![Line::from(Span::styled(
                card.title,
                Style::default().add_modifier(Modifier::BOLD),
            ))];
            if !card.meta.is_empty() {
                lines.push(Line::from(Span::styled(
                    card.meta,
                    Style::default().fg(Color::DarkGray),
                )));
            }
            if !card.summary.is_empty() {
                lines.push(Line::from(card.summary));
            }
            let image = card.image.unwrap_or_else(|| "no image".to_string());
            lines.push(Line::from(Span::styled(
                format!("{} | {}", image, card.url),
                Style::default().fg(Color::Blue),
            )));
            lines.push(Line::from(""));
            ListItem::new(Text::from(lines))
        })
        .collect();

    let title = match app.state.active_show() {
        Some(show) => show.name.clone(),
        None => "Shows".to_string(),
    };
    let highlight = if matches!(app.focus, Focus::Cards) {
        Style::default().add_modifier(Modifier::BOLD).fg(Color::Yellow)
    } else {
        Style::default()
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(highlight)
        .highlight_symbol(">> ");

    f.render_stateful_widget(list, area, &mut app.card_list_state);
}

fn draw_jump_list(f: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app
        .jump_entries
        .iter()
        .map(|(_, label)| ListItem::new(label.as_str()))
        .collect();

    let highlight = if matches!(app.focus, Focus::Jump) {
        Style::default().add_modifier(Modifier::BOLD).fg(Color::Green)
    } else {
        Style::default()
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Jump to"))
        .highlight_style(highlight)
        .highlight_symbol(">> ");

    f.render_stateful_widget(list, area, &mut app.jump_list_state);
}

/// Full-screen replacement shown when the initial catalog load fails; the
/// only ways out are retry or quit.
pub fn draw_load_error(f: &mut Frame, err: &CatalogError) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)].as_ref())
        .split(f.area());

    let text = Text::from(vec![
        Line::from(Span::styled(
            "Could not load the show catalog",
            Style::default().add_modifier(Modifier::BOLD).fg(Color::Red),
        )),
        Line::from(""),
        Line::from("Check your internet connection and try again."),
        Line::from(Span::styled(format!("{err}"), Style::default().fg(Color::DarkGray))),
    ]);
    let body = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Error"));
    f.render_widget(body, chunks[0]);

    let hint = Paragraph::new("Press r to retry, q to quit").style(Style::default().fg(Color::Gray));
    f.render_widget(hint, chunks[1]);
}
