use crate::core::error::Result;
use crate::notes::form::{FormOutcome, UpsertForm};
use crate::notes::record::UpsertStatus;
use crate::notes::service::{Clock, NoteService, SystemClock};
use crate::search::matcher::{segments, Span as MatchSpan};
use crate::search::render::NoteView;
use crate::storage::notes::{NoteStorage, NoteStore};
use crossterm::cursor;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use std::io;
use tracing::debug;

/// Title highlight colour, same as the markup highlight
const HIGHLIGHT_BG: Color = Color::Rgb(0xF7, 0xA9, 0xA9);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Content,
}

/// Screen states for the TUI flow
#[derive(Debug, Clone, PartialEq)]
enum Screen {
    Browse,
    Form { form: UpsertForm, field: Field },
    ConfirmDelete { id: i64 },
}

/// Interactive note browser with live search
pub struct NotesTui<S: NoteStorage = NoteStore, C: Clock = SystemClock> {
    service: NoteService<S, C>,
    title_limit: usize,
    screen: Screen,
    query: String,
    selected: usize,
    status_message: Option<String>,
}

fn highlight_style() -> Style {
    Style::default().fg(Color::Black).bg(HIGHLIGHT_BG)
}

/// Turn `text` into lines with the given spans highlighted
fn highlighted_lines(text: &str, spans: &[MatchSpan], base: Style) -> Vec<Line<'static>> {
    let mut lines: Vec<Vec<Span<'static>>> = vec![Vec::new()];
    for (segment, highlighted) in segments(text, spans) {
        let style = if highlighted { highlight_style() } else { base };
        for (i, part) in segment.split('\n').enumerate() {
            if i > 0 {
                lines.push(Vec::new());
            }
            if let (false, Some(line)) = (part.is_empty(), lines.last_mut()) {
                line.push(Span::styled(part.to_string(), style));
            }
        }
    }
    lines.into_iter().map(Line::from).collect()
}

impl<S: NoteStorage, C: Clock> NotesTui<S, C> {
    pub fn new(service: NoteService<S, C>, title_limit: usize) -> Self {
        Self {
            service,
            title_limit,
            screen: Screen::Browse,
            query: String::new(),
            selected: 0,
            status_message: None,
        }
    }

    /// Views for the current query; `None` when notes are unavailable
    fn views(&self) -> Option<Vec<NoteView>> {
        let hits = self.service.search(&self.query).ok()?;
        Some(
            hits.iter()
                .map(|hit| NoteView::new(hit, &self.query, self.title_limit))
                .collect(),
        )
    }

    fn selected_id(&self) -> Option<i64> {
        self.views()?.get(self.selected).map(|v| v.id)
    }

    fn clamp_selection(&mut self) {
        let count = self.views().map(|v| v.len()).unwrap_or(0);
        if self.selected >= count {
            self.selected = count.saturating_sub(1);
        }
    }

    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

        // Always restore terminal, even if we early-return with an error.
        struct TerminalRestore;
        impl Drop for TerminalRestore {
            fn drop(&mut self) {
                let _ = disable_raw_mode();
                let mut stdout = io::stdout();
                let _ = execute!(stdout, LeaveAlternateScreen, cursor::Show);
            }
        }
        let _restore = TerminalRestore;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = ratatui::Terminal::new(backend)?;

        loop {
            terminal.draw(|f| self.render_ui(f))?;

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && self.handle_key(key) {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Apply one key press. Returns true when the UI should exit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            return true;
        }

        match self.screen.clone() {
            Screen::Browse => return self.handle_browse_key(key.code, ctrl),
            Screen::Form { form, field } => self.handle_form_key(form, field, key.code, ctrl),
            Screen::ConfirmDelete { id } => self.handle_confirm_key(id, key.code),
        }
        false
    }

    fn handle_browse_key(&mut self, code: KeyCode, ctrl: bool) -> bool {
        match code {
            KeyCode::Esc if self.query.is_empty() => return true,
            KeyCode::Esc => {
                self.query.clear();
                self.selected = 0;
            }
            KeyCode::Char('n') if ctrl => {
                self.status_message = None;
                self.screen = Screen::Form {
                    form: UpsertForm::create(),
                    field: Field::Title,
                };
            }
            KeyCode::Char('d') if ctrl => {
                if let Some(id) = self.selected_id() {
                    self.screen = Screen::ConfirmDelete { id };
                }
            }
            KeyCode::Char('r') if ctrl => {
                self.status_message = if self.service.refresh() {
                    Some("Notes reloaded".to_string())
                } else {
                    Some("Could not retrieve notes from the database.".to_string())
                };
                self.clamp_selection();
            }
            KeyCode::Char('u') if ctrl => {
                self.query.clear();
                self.selected = 0;
            }
            KeyCode::Char(c) if !ctrl => {
                self.query.push(c);
                self.selected = 0;
            }
            KeyCode::Backspace => {
                self.query.pop();
                self.selected = 0;
            }
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                self.selected += 1;
                self.clamp_selection();
            }
            KeyCode::Enter => {
                let note = self
                    .selected_id()
                    .and_then(|id| self.service.note(id))
                    .map(|n| UpsertForm::edit(n.id(), n.title(), n.content()));
                if let Some(form) = note {
                    self.status_message = None;
                    self.screen = Screen::Form {
                        form,
                        field: Field::Content,
                    };
                }
            }
            _ => {}
        }
        false
    }

    fn handle_form_key(&mut self, mut form: UpsertForm, mut field: Field, code: KeyCode, ctrl: bool) {
        match code {
            KeyCode::Esc => {
                self.screen = Screen::Browse;
                return;
            }
            KeyCode::Char('s') if ctrl => {
                let outcome = form.submit(&mut self.service);
                debug!("Form submitted: {:?}", outcome);
                match outcome {
                    FormOutcome::Saved => {
                        self.status_message = Some(format!("Saved note '{}'", form.title.trim()));
                        self.screen = Screen::Browse;
                        self.clamp_selection();
                    }
                    FormOutcome::NothingToSave => {
                        self.status_message = Some("Nothing to save!".to_string());
                        self.screen = Screen::Form { form, field };
                    }
                    FormOutcome::ConfirmDelete { id } => {
                        self.screen = Screen::ConfirmDelete { id };
                    }
                    FormOutcome::Failed => {
                        self.status_message = Some("Could not save note".to_string());
                        self.screen = Screen::Form { form, field };
                    }
                }
                return;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                field = match field {
                    Field::Title => Field::Content,
                    Field::Content => Field::Title,
                };
            }
            KeyCode::Enter => match field {
                Field::Title => field = Field::Content,
                Field::Content => form.content.push('\n'),
            },
            KeyCode::Backspace => {
                match field {
                    Field::Title => form.title.pop(),
                    Field::Content => form.content.pop(),
                };
            }
            KeyCode::Char(c) if !ctrl => match field {
                Field::Title => form.title.push(c),
                Field::Content => form.content.push(c),
            },
            _ => {}
        }
        self.screen = Screen::Form { form, field };
    }

    fn handle_confirm_key(&mut self, id: i64, code: KeyCode) {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.status_message = match self.service.delete_note(id) {
                    UpsertStatus::Failed => Some("Could not delete note".to_string()),
                    UpsertStatus::Success | UpsertStatus::NoContent => Some("Note deleted".to_string()),
                };
                self.screen = Screen::Browse;
                self.clamp_selection();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.screen = Screen::Browse;
            }
            _ => {}
        }
    }

    fn render_ui(&self, f: &mut Frame) {
        match &self.screen {
            Screen::Browse => self.render_browse(f),
            Screen::Form { form, field } => self.render_form(f, form, *field),
            Screen::ConfirmDelete { id } => self.render_confirm(f, *id),
        }
    }

    fn render_header(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let mut spans = vec![Span::styled(
            "jotter",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )];
        match self.service.index().len() {
            Some(count) => spans.push(Span::raw(format!(" ({} notes)", count))),
            None => spans.push(Span::styled(
                "  Could not retrieve notes from the database.",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
        }
        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_footer(&self, f: &mut Frame, area: ratatui::layout::Rect, keys: &[(&str, &str, Color)]) {
        let mut spans = Vec::new();
        for (key, action, color) in keys {
            spans.push(Span::styled(
                key.to_string(),
                Style::default().fg(*color).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(format!(": {}  ", action)));
        }
        let mut lines = vec![Line::from(spans)];
        if let Some(msg) = &self.status_message {
            lines.push(Line::from(Span::styled(
                msg.clone(),
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            )));
        }

        let footer = Paragraph::new(lines)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(footer, area);
    }

    fn render_browse(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Length(3), // Search bar
                Constraint::Min(0),    // Notes
                Constraint::Length(3), // Footer
            ])
            .split(f.size());

        self.render_header(f, chunks[0]);

        let search_text = if self.query.is_empty() {
            Span::styled("Type to search titles and content...", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(self.query.clone(), Style::default().fg(Color::White))
        };
        let search = Paragraph::new(Line::from(search_text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(Span::styled("Search", Style::default().fg(Color::White).add_modifier(Modifier::BOLD))),
        );
        f.render_widget(search, chunks[1]);

        match self.views() {
            None => {
                let unavailable = Paragraph::new(vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        "Could not retrieve notes from the database.",
                        Style::default().fg(Color::Red),
                    )),
                    Line::from(Span::styled("Press Ctrl+R to retry.", Style::default().fg(Color::DarkGray))),
                ])
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Notes"));
                f.render_widget(unavailable, chunks[2]);
            }
            Some(views) if views.is_empty() => {
                let message = if self.query.trim().is_empty() {
                    "No notes yet. Press Ctrl+N to write one."
                } else {
                    "No notes match this search."
                };
                let empty = Paragraph::new(vec![Line::from(""), Line::from(message)])
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL).title("Notes"));
                f.render_widget(empty, chunks[2]);
            }
            Some(views) => {
                let note_chunks = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                    .split(chunks[2]);

                let items: Vec<ListItem> = views
                    .iter()
                    .map(|view| {
                        let mut lines = highlighted_lines(
                            &view.title,
                            &view.title_spans,
                            Style::default().add_modifier(Modifier::BOLD),
                        );
                        lines.push(Line::from(Span::styled(
                            view.modified.clone(),
                            Style::default().fg(Color::DarkGray),
                        )));
                        ListItem::new(lines)
                    })
                    .collect();

                let list = List::new(items)
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .title(vec![
                                Span::styled("Notes", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
                                Span::raw(format!(" ({} shown)", views.len())),
                            ]),
                    )
                    .highlight_symbol("> ")
                    .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

                let selected = self.selected.min(views.len() - 1);
                let mut list_state = ListState::default();
                list_state.select(Some(selected));
                f.render_stateful_widget(list, note_chunks[0], &mut list_state);

                if let Some(view) = views.get(selected) {
                    let preview = Paragraph::new(highlighted_lines(
                        &view.content,
                        &view.content_spans,
                        Style::default().fg(Color::White),
                    ))
                    .wrap(Wrap { trim: false })
                    .block(Block::default().borders(Borders::ALL).title(view.title.clone()));
                    f.render_widget(preview, note_chunks[1]);
                }
            }
        }

        self.render_footer(
            f,
            chunks[3],
            &[
                ("↑↓", "Navigate", Color::Cyan),
                ("Enter", "Edit", Color::Green),
                ("Ctrl+N", "New", Color::Green),
                ("Ctrl+D", "Delete", Color::Red),
                ("Ctrl+U", "Clear", Color::Cyan),
                ("Esc", "Quit", Color::Yellow),
            ],
        );
    }

    fn render_form(&self, f: &mut Frame, form: &UpsertForm, field: Field) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(f.size());

        f.render_widget(
            Paragraph::new(Span::styled(
                form.window_title(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            chunks[0],
        );

        let border = |focused: bool| {
            if focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            }
        };

        let title = Paragraph::new(form.title.clone()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border(field == Field::Title))
                .title("Title"),
        );
        f.render_widget(title, chunks[1]);

        let content = Paragraph::new(form.content.clone())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border(field == Field::Content))
                    .title("Content"),
            );
        f.render_widget(content, chunks[2]);

        self.render_footer(
            f,
            chunks[3],
            &[
                ("Ctrl+S", form.save_label(), Color::Green),
                ("Tab", "Switch field", Color::Cyan),
                ("Esc", form.dismiss_label(), Color::Yellow),
            ],
        );
    }

    fn render_confirm(&self, f: &mut Frame, id: i64) {
        let name = self
            .service
            .note(id)
            .map(|n| n.display_title(self.title_limit))
            .unwrap_or_else(|| format!("note {}", id));
        let prompt = Paragraph::new(vec![
            Line::from(""),
            Line::from(format!("Delete '{}'?", name)),
            Line::from(""),
            Line::from(vec![
                Span::styled("y", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::raw(": Delete  "),
                Span::styled("n", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::raw(": Keep"),
            ]),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Delete note"));
        f.render_widget(prompt, f.size());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::service::tests::{MemoryStorage, StepClock};
    use std::cell::Cell;

    fn tui() -> NotesTui<MemoryStorage, StepClock> {
        let mut service = NoteService::with_clock(MemoryStorage::default(), StepClock(Cell::new(0)));
        service.create_note("Budget", "groceries");
        service.create_note("Password reset", "reset the password");
        NotesTui::new(service, 30)
    }

    fn press(tui: &mut NotesTui<MemoryStorage, StepClock>, code: KeyCode) -> bool {
        tui.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(tui: &mut NotesTui<MemoryStorage, StepClock>, c: char) -> bool {
        tui.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_text(tui: &mut NotesTui<MemoryStorage, StepClock>, text: &str) {
        for c in text.chars() {
            press(tui, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_typing_filters_live() {
        let mut tui = tui();
        assert_eq!(tui.views().unwrap().len(), 2);
        type_text(&mut tui, "bud");
        let views = tui.views().unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].title, "Budget");

        press(&mut tui, KeyCode::Esc);
        assert!(tui.query.is_empty());
        assert!(press(&mut tui, KeyCode::Esc));
    }

    #[test]
    fn test_new_note_through_form() {
        let mut tui = tui();
        ctrl(&mut tui, 'n');
        type_text(&mut tui, "Trip");
        press(&mut tui, KeyCode::Enter);
        type_text(&mut tui, "pack bags");
        ctrl(&mut tui, 's');

        assert_eq!(tui.screen, Screen::Browse);
        let views = tui.views().unwrap();
        assert_eq!(views.len(), 3);
        assert_eq!(views[0].title, "Trip");
    }

    #[test]
    fn test_empty_new_note_stays_in_form() {
        let mut tui = tui();
        ctrl(&mut tui, 'n');
        ctrl(&mut tui, 's');
        assert!(matches!(tui.screen, Screen::Form { .. }));
        assert_eq!(tui.status_message.as_deref(), Some("Nothing to save!"));
    }

    #[test]
    fn test_clearing_content_asks_to_delete() {
        let mut tui = tui();
        // newest first: "Password reset" is selected
        press(&mut tui, KeyCode::Enter);
        for _ in 0.."reset the password".len() {
            press(&mut tui, KeyCode::Backspace);
        }
        ctrl(&mut tui, 's');
        assert_eq!(tui.screen, Screen::ConfirmDelete { id: 2 });

        press(&mut tui, KeyCode::Char('y'));
        assert_eq!(tui.screen, Screen::Browse);
        assert_eq!(tui.views().unwrap().len(), 1);
    }

    #[test]
    fn test_highlighted_lines_split_on_newlines() {
        let text = "one\ntwo one";
        let spans = crate::search::matcher::find_all_matches(text, "one");
        let lines = highlighted_lines(text, &spans, Style::default());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].content, "one");
        assert_eq!(lines[0].spans[0].style, highlight_style());
        assert_eq!(lines[1].spans.len(), 2);
    }
}
