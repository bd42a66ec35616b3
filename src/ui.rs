use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gpa_ledger::{classify, format_gpa, GpaLedger, LedgerError, SemesterId};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::collections::HashMap;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Modules,
    Grades,
}

impl Focus {
    pub fn toggle(&self) -> Self {
        match self {
            Focus::Modules => Focus::Grades,
            Focus::Grades => Focus::Modules,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Info(String),
    Warning(String),
    Error(String),
}

impl Notice {
    fn text(&self) -> &str {
        match self {
            Notice::Info(s) | Notice::Warning(s) | Notice::Error(s) => s,
        }
    }

    fn color(&self) -> Color {
        match self {
            Notice::Info(_) => Color::Green,
            Notice::Warning(_) => Color::Yellow,
            Notice::Error(_) => Color::Red,
        }
    }
}

pub struct App {
    pub ledger: GpaLedger,
    pub semesters: Vec<SemesterId>,
    pub current: usize,
    pub focus: Focus,
    pub module_states: Vec<TableState>,
    pub grade_state: TableState,
    pub semester_results: HashMap<SemesterId, String>,
    pub overall_result: Option<String>,
    pub notice: Option<Notice>,
}

impl App {
    pub fn new(ledger: GpaLedger) -> Self {
        let semesters: Vec<SemesterId> = ledger.semester_ids().collect();

        let module_states = semesters
            .iter()
            .map(|id| {
                let mut state = TableState::default();
                let has_modules = ledger
                    .semester(*id)
                    .map(|record| !record.catalog().is_empty())
                    .unwrap_or(false);
                if has_modules {
                    state.select(Some(0));
                }
                state
            })
            .collect();

        let mut grade_state = TableState::default();
        if !ledger.grade_scale().is_empty() {
            grade_state.select(Some(0));
        }

        Self {
            ledger,
            semesters,
            current: 0,
            focus: Focus::Modules,
            module_states,
            grade_state,
            semester_results: HashMap::new(),
            overall_result: None,
            notice: None,
        }
    }

    pub fn current_semester(&self) -> Option<SemesterId> {
        self.semesters.get(self.current).copied()
    }

    pub fn next_semester(&mut self) {
        if !self.semesters.is_empty() {
            self.current = (self.current + 1) % self.semesters.len();
        }
    }

    pub fn previous_semester(&mut self) {
        if !self.semesters.is_empty() {
            self.current = (self.current + self.semesters.len() - 1) % self.semesters.len();
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.toggle();
    }

    fn module_count(&self) -> usize {
        self.current_semester()
            .and_then(|id| self.ledger.semester(id).ok())
            .map(|record| record.catalog().len())
            .unwrap_or(0)
    }

    fn focused_list(&mut self) -> (usize, Option<&mut TableState>) {
        match self.focus {
            Focus::Modules => {
                let len = self.module_count();
                (len, self.module_states.get_mut(self.current))
            }
            Focus::Grades => (self.ledger.grade_scale().len(), Some(&mut self.grade_state)),
        }
    }

    pub fn next(&mut self) {
        if let (len, Some(state)) = self.focused_list() {
            if len == 0 {
                return;
            }
            let i = match state.selected() {
                Some(i) if i + 1 < len => i + 1,
                _ => 0,
            };
            state.select(Some(i));
        }
    }

    pub fn previous(&mut self) {
        if let (len, Some(state)) = self.focused_list() {
            if len == 0 {
                return;
            }
            let i = match state.selected() {
                Some(0) | None => len - 1,
                Some(i) => i - 1,
            };
            state.select(Some(i));
        }
    }

    pub fn selected_module(&self) -> Option<String> {
        let id = self.current_semester()?;
        let i = self.module_states.get(self.current)?.selected()?;
        let record = self.ledger.semester(id).ok()?;
        record.catalog().modules().nth(i).map(str::to_string)
    }

    pub fn selected_grade(&self) -> Option<String> {
        let i = self.grade_state.selected()?;
        self.ledger.grade_scale().grades().nth(i).map(str::to_string)
    }

    /// Add the highlighted module/grade pair to the current semester.
    pub fn add_selected(&mut self) {
        let Some(semester) = self.current_semester() else {
            return;
        };
        let module = self.selected_module().unwrap_or_default();
        let grade = self.selected_grade().unwrap_or_default();

        self.notice = Some(match self.ledger.add_entry(semester, &module, &grade) {
            Ok(entry) => Notice::Info(format!("Added {} - {}", entry.module, entry.grade)),
            Err(e @ LedgerError::DuplicateModule { .. }) => Notice::Warning(format!("Duplicate Module: {}", e)),
            Err(e) => Notice::Error(e.to_string()),
        });
    }

    pub fn calculate_semester(&mut self) {
        let Some(semester) = self.current_semester() else {
            return;
        };
        match self.ledger.semester_gpa(semester) {
            Ok(gpa) => {
                self.semester_results
                    .insert(semester, format!("{} GPA: {}", semester, format_gpa(gpa)));
            }
            Err(e) => self.notice = Some(Notice::Error(e.to_string())),
        }
    }

    pub fn calculate_overall(&mut self) {
        let gpa = self.ledger.overall_gpa();
        self.overall_result = Some(format!(
            "Overall GPA: {}  |  Classification: {}",
            format_gpa(gpa),
            classify(gpa)
        ));
    }

    pub fn reset_current(&mut self) {
        let Some(semester) = self.current_semester() else {
            return;
        };
        match self.ledger.reset_semester(semester) {
            Ok(removed) => {
                self.semester_results.remove(&semester);
                self.notice = Some(Notice::Info(format!("Cleared {} entries from {}", removed, semester)));
            }
            Err(e) => self.notice = Some(Notice::Error(e.to_string())),
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab => app.next_semester(),
                KeyCode::BackTab => app.previous_semester(),
                KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l') => {
                    app.toggle_focus()
                }
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Enter | KeyCode::Char('a') => app.add_selected(),
                KeyCode::Char('c') => app.calculate_semester(),
                KeyCode::Char('o') => app.calculate_overall(),
                KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => app.reset_current(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Semester tabs
            Constraint::Min(0),    // Pick lists + entries
            Constraint::Length(4), // Results
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45), // Modules
            Constraint::Percentage(20), // Grades
            Constraint::Percentage(35), // Accepted entries
        ])
        .split(chunks[1]);

    render_modules(f, content[0], app);
    render_grades(f, content[1], app);
    render_entries(f, content[2], app);
    render_results(f, chunks[2], app);
    render_status_bar(f, chunks[3], app);
}

fn focus_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    }
}

fn header_row(titles: [&'static str; 2]) -> Row<'static> {
    let cells = titles.into_iter().map(|h| {
        Cell::from(h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });
    Row::new(cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1)
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, id) in app.semesters.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if i == app.current {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(id.to_string(), style));
    }

    let accepted = app.ledger.all_entries().count();
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Entries: {}", accepted),
        Style::default().fg(Color::White),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_modules(f: &mut Frame, area: Rect, app: &mut App) {
    let rows: Vec<Row> = app
        .current_semester()
        .and_then(|id| app.ledger.semester(id).ok())
        .map(|record| {
            record
                .catalog()
                .iter()
                .map(|(module, credits)| {
                    let taken = record.has_module(module);
                    let style = if taken {
                        Style::default().fg(Color::DarkGray)
                    } else {
                        Style::default()
                    };
                    Row::new(vec![
                        Cell::from(truncate(module, 40)),
                        Cell::from(format!("{}", credits)),
                    ])
                    .style(style)
                })
                .collect()
        })
        .unwrap_or_default();

    let table = Table::new(rows, [Constraint::Min(20), Constraint::Length(8)])
        .header(header_row(["Module", "Credits"]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(app.focus == Focus::Modules))
                .title(" Modules "),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    if let Some(state) = app.module_states.get_mut(app.current) {
        f.render_stateful_widget(table, area, state);
    } else {
        f.render_widget(table, area);
    }
}

fn render_grades(f: &mut Frame, area: Rect, app: &mut App) {
    let rows: Vec<Row> = app
        .ledger
        .grade_scale()
        .iter()
        .map(|(grade, points)| {
            Row::new(vec![Cell::from(grade.to_string()), Cell::from(format!("{:.2}", points))])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(6), Constraint::Length(6)])
        .header(header_row(["Grade", "Points"]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(app.focus == Focus::Grades))
                .title(" Grades "),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.grade_state);
}

fn render_entries(f: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = app
        .current_semester()
        .and_then(|id| app.ledger.semester(id).ok())
        .map(|record| {
            record
                .entries()
                .iter()
                .map(|e| Line::from(format!(" {} - {}", truncate(&e.module, 30), e.grade)))
                .collect()
        })
        .unwrap_or_default();

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Added "),
    );

    f.render_widget(panel, area);
}

fn render_results(f: &mut Frame, area: Rect, app: &App) {
    let semester_line = app
        .current_semester()
        .and_then(|id| app.semester_results.get(&id))
        .cloned()
        .unwrap_or_else(|| "Press c to calculate this semester".to_string());

    let overall_line = app
        .overall_result
        .clone()
        .unwrap_or_else(|| "Press o for overall GPA".to_string());

    let content = vec![
        Line::from(Span::styled(
            format!(" {}", semester_line),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(Span::styled(
            format!(" {}", overall_line),
            Style::default().fg(Color::LightYellow).add_modifier(Modifier::BOLD),
        )),
    ];

    let panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" GPA "),
    );

    f.render_widget(panel, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![];

    if let Some(notice) = &app.notice {
        status_spans.push(Span::styled(
            format!(" {} ", notice.text()),
            Style::default().fg(notice.color()),
        ));
        status_spans.push(Span::raw(" | "));
    }

    status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Add | "));
    status_spans.push(Span::styled("←/→", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" List | "));
    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Semester | "));
    status_spans.push(Span::styled("c", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Semester GPA | "));
    status_spans.push(Span::styled("o", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Overall | "));
    status_spans.push(Span::styled("Ctrl-r", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Reset | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
