use std::collections::{HashMap, HashSet};
use std::io::Stdout;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use inkpost_engine::{
    ActiveMarkerSink, Conversion, ObserverOptions, ScrollSpy, VisibilityEntry, VisibilityObserver,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::fragment::{DisplayLine, display_lines};

/// Reports which heading lines fall inside the observed band of the
/// content pane.
#[derive(Debug, Default)]
pub struct LineObserver {
    anchors: HashMap<String, usize>,
    observed: Vec<String>,
    options: ObserverOptions,
}

impl LineObserver {
    pub fn new(lines: &[DisplayLine]) -> Self {
        let anchors = lines
            .iter()
            .enumerate()
            .filter_map(|(i, l)| l.heading.as_ref().map(|h| (h.id.clone(), i)))
            .collect();
        Self {
            anchors,
            ..Self::default()
        }
    }

    /// Visibility of every observed heading for a viewport starting at line
    /// `top` and `height` lines tall.
    pub fn visibility(&self, top: usize, height: usize) -> Vec<(String, bool)> {
        let band = self.options.root_margin.observed_band(top, height);
        self.observed
            .iter()
            .map(|id| {
                let visible = self.anchors.get(id).is_some_and(|l| band.contains(l));
                (id.clone(), visible)
            })
            .collect()
    }
}

impl VisibilityObserver for LineObserver {
    fn observe(&mut self, target: &str, options: &ObserverOptions) {
        self.options = *options;
        self.observed.push(target.to_string());
    }

    fn disconnect(&mut self) {
        self.observed.clear();
    }
}

#[derive(Debug, Default)]
pub struct TocMarkers {
    active: HashSet<String>,
}

impl TocMarkers {
    pub fn is_active(&self, id: &str) -> bool {
        self.active.contains(id)
    }
}

impl ActiveMarkerSink for TocMarkers {
    fn set_active(&mut self, id: &str, active: bool) {
        if active {
            self.active.insert(id.to_string());
        } else {
            self.active.remove(id);
        }
    }
}

pub struct App {
    title: String,
    conversion: Conversion,
    lines: Vec<DisplayLine>,
    scroll: usize,
    viewport_height: usize,
    toc_width: u16,
    toc_state: ListState,
    spy: ScrollSpy<LineObserver, TocMarkers>,
}

impl App {
    pub fn new(
        title: String,
        conversion: Conversion,
        toc_width: u16,
        options: &ObserverOptions,
    ) -> Self {
        let lines = display_lines(&conversion.html);
        let spy = ScrollSpy::attach(
            &conversion.toc,
            LineObserver::new(&lines),
            TocMarkers::default(),
            options,
        );
        let mut app = Self {
            title,
            conversion,
            lines,
            scroll: 0,
            viewport_height: 20,
            toc_width,
            toc_state: ListState::default(),
            spy,
        };
        app.sync_spy();
        app
    }

    fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    pub fn scroll_by(&mut self, delta: isize) {
        self.scroll = self.scroll.saturating_add_signed(delta).min(self.max_scroll());
        self.sync_spy();
    }

    pub fn scroll_to(&mut self, line: usize) {
        self.scroll = line.min(self.max_scroll());
        self.sync_spy();
    }

    fn heading_line(&self, id: &str) -> Option<usize> {
        self.spy.observer().anchors.get(id).copied()
    }

    /// Scrolls to the next (`forward`) or previous TOC heading relative to
    /// the active one.
    pub fn jump_heading(&mut self, forward: bool) {
        let ids: Vec<&str> = self.conversion.toc.ids().collect();
        if ids.is_empty() {
            return;
        }
        let current = self
            .spy
            .active_id()
            .and_then(|id| ids.iter().position(|i| *i == id));
        let next = match (current, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1).min(ids.len() - 1),
            (Some(i), false) => i.saturating_sub(1),
        };
        if let Some(line) = self.heading_line(ids[next]) {
            self.scroll_to(line);
        }
    }

    fn sync_spy(&mut self) {
        let visibility = self
            .spy
            .observer()
            .visibility(self.scroll, self.viewport_height);
        let entries: Vec<VisibilityEntry<'_>> = visibility
            .iter()
            .map(|(target, is_intersecting)| VisibilityEntry {
                target,
                is_intersecting: *is_intersecting,
            })
            .collect();
        self.spy.on_visibility(&entries);

        let active = self.spy.active_id().and_then(|id| {
            self.conversion
                .toc
                .entries()
                .iter()
                .position(|e| e.id == id)
        });
        self.toc_state.select(active);
    }

    fn set_viewport_height(&mut self, height: usize) {
        if height != self.viewport_height {
            self.viewport_height = height;
            self.sync_spy();
        }
    }

    pub fn active_heading(&self) -> Option<&str> {
        self.spy.active_id()
    }

    pub fn close(&mut self) {
        self.spy.teardown();
    }
}

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            let page = app.viewport_height.max(1) as isize;
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.scroll_by(1),
                KeyCode::Up | KeyCode::Char('k') => app.scroll_by(-1),
                KeyCode::PageDown | KeyCode::Char(' ') => app.scroll_by(page),
                KeyCode::PageUp => app.scroll_by(-page),
                KeyCode::Home | KeyCode::Char('g') => app.scroll_to(0),
                KeyCode::End | KeyCode::Char('G') => app.scroll_to(usize::MAX),
                KeyCode::Char('n') | KeyCode::Tab => app.jump_heading(true),
                KeyCode::Char('p') | KeyCode::BackTab => app.jump_heading(false),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(app.toc_width), Constraint::Min(0)])
        .split(rows[0]);

    // Borders take a line top and bottom.
    app.set_viewport_height(columns[1].height.saturating_sub(2) as usize);

    let toc_items: Vec<ListItem> = app
        .conversion
        .toc
        .entries()
        .iter()
        .map(|e| {
            let indent = "  ".repeat(e.indent as usize);
            let style = if app.spy.sink().is_active(&e.id) {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(format!("{indent}{}", e.text), style)))
        })
        .collect();
    let toc = List::new(toc_items)
        .block(Block::default().borders(Borders::ALL).title("Contents"))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));
    f.render_stateful_widget(toc, columns[0], &mut app.toc_state);

    let content_lines: Vec<Line> = app
        .lines
        .iter()
        .skip(app.scroll)
        .take(app.viewport_height)
        .map(|l| match &l.heading {
            Some(_) => Line::from(Span::styled(
                l.text.clone(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            None => Line::from(l.text.clone()),
        })
        .collect();
    let content = Paragraph::new(content_lines)
        .block(Block::default().borders(Borders::ALL).title(app.title.as_str()));
    f.render_widget(content, columns[1]);

    let help = Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("↑/k ↓/j: Scroll | "),
        Span::raw("PgUp/PgDn: Page | "),
        Span::raw("n/p: Next/Previous heading"),
    ]);
    f.render_widget(Paragraph::new(help), rows[1]);
}
