mod api;
mod cache;
mod filter;
mod state;
mod ui;

use anyhow::Result;
use api::{CatalogClient, Show};
use cache::CatalogCache;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    widgets::ListState,
    Terminal,
};
use state::{View, ViewState};
use std::io::{self, Stdout};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, PartialEq)]
pub enum Focus {
    Cards,
    Jump,
}

pub struct App {
    cache: CatalogCache<CatalogClient>,
    pub state: ViewState,
    pub focus: Focus,
    pub card_list_state: ListState,
    pub jump_list_state: ListState,
    // Sentinel entry first, then one entry per episode of the active show.
    pub jump_entries: Vec<(Option<u64>, String)>,
    pub status_message: String,
}

impl App {
    fn new(cache: CatalogCache<CatalogClient>, shows: &[Show]) -> Self {
        let mut card_list_state = ListState::default();
        card_list_state.select(Some(0));
        Self {
            cache,
            state: ViewState::new(shows),
            focus: Focus::Cards,
            card_list_state,
            jump_list_state: ListState::default(),
            jump_entries: Vec::new(),
            status_message: format!(
                "Found {} shows. Type to filter, Enter to open, Esc to quit.",
                shows.len()
            ),
        }
    }

    fn rebuild_jump_entries(&mut self) {
        self.jump_entries.clear();
        if let View::Episodes { show, .. } = &self.state.view {
            self.jump_entries.push((None, String::from("All episodes")));
            for ep in self.cache.cached_episodes(show.id) {
                self.jump_entries.push((
                    Some(ep.id),
                    format!("{} - {}", ui::episode_code(ep.season, ep.number), ep.name),
                ));
            }
        }
    }

    fn active_list_len(&self) -> usize {
        match self.focus {
            Focus::Jump => self.jump_entries.len(),
            Focus::Cards => self.state.visible_len(),
        }
    }

    fn active_list_state(&mut self) -> &mut ListState {
        match self.focus {
            Focus::Jump => &mut self.jump_list_state,
            Focus::Cards => &mut self.card_list_state,
        }
    }

    fn select_prev(&mut self) {
        let len = self.active_list_len();
        if len == 0 {
            return;
        }
        let list = self.active_list_state();
        let i = match list.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        list.select(Some(i));
    }

    fn select_next(&mut self) {
        let len = self.active_list_len();
        if len == 0 {
            return;
        }
        let list = self.active_list_state();
        let i = match list.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        list.select(Some(i));
    }

    fn edit_search(&mut self, new_term: String) {
        state::apply_search(&mut self.state, &self.cache, &new_term);
        let selection = if self.state.visible_len() == 0 { None } else { Some(0) };
        self.card_list_state.select(selection);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err);
    }

    Ok(())
}

async fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    let client = CatalogClient::new()?;
    let mut cache = CatalogCache::new(client);

    // Initial load. On failure the whole view is an error screen whose only
    // transitions are retry and quit.
    let shows = loop {
        match cache.shows().await {
            Ok(shows) => break shows.to_vec(),
            Err(err) => {
                warn!(%err, "initial catalog load failed");
                if !offer_retry(terminal, &err)? {
                    return Ok(());
                }
            }
        }
    };

    let mut app = App::new(cache, &shows);

    loop {
        terminal.draw(|f| ui::draw(f, &mut app))?;

        if let Event::Key(key) = event::read()? {
            if app.state.in_episode_view() {
                match key.code {
                    KeyCode::Char(c) => {
                        let mut term = app.state.search.clone();
                        term.push(c);
                        app.edit_search(term);
                    }
                    KeyCode::Backspace => {
                        let mut term = app.state.search.clone();
                        term.pop();
                        app.edit_search(term);
                    }
                    KeyCode::Tab => {
                        app.focus = match app.focus {
                            Focus::Cards => Focus::Jump,
                            Focus::Jump => Focus::Cards,
                        };
                    }
                    KeyCode::Up => app.select_prev(),
                    KeyCode::Down => app.select_next(),
                    KeyCode::Enter => match app.focus {
                        Focus::Jump => {
                            let entry = app
                                .jump_list_state
                                .selected()
                                .and_then(|i| app.jump_entries.get(i).cloned());
                            if let Some((selection, label)) = entry {
                                state::pick_episode(&mut app.state, &app.cache, selection);
                                app.card_list_state.select(Some(0));
                                app.status_message = match selection {
                                    Some(_) => format!("Jumped to {label}."),
                                    None => "Showing all episodes.".to_string(),
                                };
                            }
                        }
                        Focus::Cards => {
                            let url = match &app.state.view {
                                View::Episodes { visible, .. } => app
                                    .card_list_state
                                    .selected()
                                    .and_then(|i| visible.get(i))
                                    .map(|ep| ep.url.clone()),
                                View::Shows { .. } => None,
                            };
                            if let Some(url) = url {
                                app.status_message = format!("View this episode at {url}");
                            }
                        }
                    },
                    KeyCode::Esc => {
                        state::back_to_shows(&mut app.state, &app.cache);
                        app.jump_entries.clear();
                        app.focus = Focus::Cards;
                        app.card_list_state.select(Some(0));
                        app.jump_list_state.select(None);
                        app.status_message = "Back to shows.".to_string();
                    }
                    _ => {}
                }
            } else {
                match key.code {
                    KeyCode::Char(c) => {
                        let mut term = app.state.search.clone();
                        term.push(c);
                        app.edit_search(term);
                    }
                    KeyCode::Backspace => {
                        let mut term = app.state.search.clone();
                        term.pop();
                        app.edit_search(term);
                    }
                    KeyCode::Up => app.select_prev(),
                    KeyCode::Down => app.select_next(),
                    KeyCode::Enter => {
                        let picked = match &app.state.view {
                            View::Shows { visible } => app
                                .card_list_state
                                .selected()
                                .and_then(|i| visible.get(i).cloned()),
                            View::Episodes { .. } => None,
                        };
                        if let Some(show) = picked {
                            let name = show.name.clone();
                            app.status_message = format!("Loading episodes of {name}...");
                            terminal.draw(|f| ui::draw(f, &mut app))?;

                            match state::pick_show(&mut app.state, &mut app.cache, show).await {
                                Ok(()) => {
                                    app.rebuild_jump_entries();
                                    app.focus = Focus::Cards;
                                    app.card_list_state.select(Some(0));
                                    app.jump_list_state.select(Some(0));
                                    app.status_message = format!(
                                        "{}: {}. Tab to jump, Esc for shows.",
                                        name,
                                        ui::count_line(&app.state)
                                    );
                                }
                                Err(err) => {
                                    warn!(%err, show = %name, "episode fetch failed");
                                    app.status_message =
                                        format!("Could not load {name}: {err}");
                                }
                            }
                        }
                    }
                    KeyCode::Esc => {
                        if app.state.search.is_empty() {
                            return Ok(());
                        }
                        state::clear_filters(&mut app.state, &app.cache);
                        app.card_list_state.select(Some(0));
                        app.status_message = "Filters cleared.".to_string();
                    }
                    _ => {}
                }
            }
        }
    }
}

/// Blocks on the initial-load error screen until the user picks retry (`r`)
/// or quit (`q`/Esc).
fn offer_retry(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    err: &api::CatalogError,
) -> Result<bool> {
    loop {
        terminal.draw(|f| ui::draw_load_error(f, err))?;
        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('r') | KeyCode::Char('R') => return Ok(true),
                KeyCode::Char('q') | KeyCode::Esc => return Ok(false),
                _ => {}
            }
        }
    }
}
