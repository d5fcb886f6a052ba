use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;
use town_square::{
    current_timestamp, explain, validate_business_name, validate_deal_text, validate_rating,
    validate_review_text, Business, BusinessQuery, Category, Database, ReportSummary, Review,
    SortOrder, ValidationError, VerificationChallenge,
};

const PAGE_JUMP: usize = 20;
const DETAIL_REVIEWS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Directory,
    Favorites,
    Recommendations,
    Reports,
    Help,
}

impl Page {
    const ALL: [Page; 5] = [
        Page::Directory,
        Page::Favorites,
        Page::Recommendations,
        Page::Reports,
        Page::Help,
    ];

    pub fn next(&self) -> Self {
        match self {
            Page::Directory => Page::Favorites,
            Page::Favorites => Page::Recommendations,
            Page::Recommendations => Page::Reports,
            Page::Reports => Page::Help,
            Page::Help => Page::Directory,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Directory => Page::Help,
            Page::Favorites => Page::Directory,
            Page::Recommendations => Page::Favorites,
            Page::Reports => Page::Recommendations,
            Page::Help => Page::Reports,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Directory => "Directory",
            Page::Favorites => "Favorites",
            Page::Recommendations => "Recommendations",
            Page::Reports => "Reports",
            Page::Help => "Help",
        }
    }

    fn lists_businesses(&self) -> bool {
        matches!(self, Page::Directory | Page::Favorites | Page::Recommendations)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Info(String),
    Error(String),
}

// ============================================================================
// FORMS
// ============================================================================

/// Review entry for one business; one verification step
#[derive(Debug, Clone)]
pub struct ReviewForm {
    pub business_id: i64,
    pub business_name: String,
    pub rating: String,
    pub text: String,
    pub answer: String,
    pub challenge: VerificationChallenge,
    pub focus: usize,
}

impl ReviewForm {
    const FIELDS: usize = 3;

    fn new(business: &Business) -> Self {
        ReviewForm {
            business_id: business.id,
            business_name: business.name.clone(),
            rating: String::new(),
            text: String::new(),
            answer: String::new(),
            challenge: VerificationChallenge::generate(),
            focus: 0,
        }
    }

    fn input_mut(&mut self) -> &mut String {
        match self.focus {
            0 => &mut self.rating,
            1 => &mut self.text,
            _ => &mut self.answer,
        }
    }

    /// Validated (rating, text). A wrong answer replaces the challenge.
    fn validate(&mut self) -> std::result::Result<(u8, String), String> {
        let rating = validate_rating(&self.rating).map_err(|e| e.to_string())?;
        let text = validate_review_text(&self.text)
            .map_err(|e| e.to_string())?
            .to_string();

        if !self.challenge.check(&self.answer) {
            self.challenge = VerificationChallenge::generate();
            self.answer.clear();
            return Err(
                "The human-check answer was not correct. Please try the new question.".to_string(),
            );
        }

        Ok((rating, text))
    }
}

/// New-business entry; two independent verification steps
#[derive(Debug, Clone)]
pub struct BusinessForm {
    pub name: String,
    pub category: Option<Category>,
    pub deal: String,
    pub answers: [String; 2],
    pub challenges: [VerificationChallenge; 2],
    pub focus: usize,
}

impl BusinessForm {
    const FIELDS: usize = 5;
    const CATEGORY_FIELD: usize = 1;

    fn new() -> Self {
        BusinessForm {
            name: String::new(),
            category: None,
            deal: String::new(),
            answers: [String::new(), String::new()],
            challenges: [VerificationChallenge::generate(), VerificationChallenge::generate()],
            focus: 0,
        }
    }

    fn input_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            0 => Some(&mut self.name),
            2 => Some(&mut self.deal),
            3 => Some(&mut self.answers[0]),
            4 => Some(&mut self.answers[1]),
            _ => None,
        }
    }

    fn cycle_category(&mut self, forward: bool) {
        let index = self
            .category
            .and_then(|c| Category::ALL.iter().position(|x| *x == c));
        let len = Category::ALL.len();
        let next = match (index, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        self.category = Some(Category::ALL[next]);
    }

    fn regenerate_challenges(&mut self) {
        self.challenges = [VerificationChallenge::generate(), VerificationChallenge::generate()];
        self.answers = [String::new(), String::new()];
    }

    /// Validated (name, category, deal). Either failed step replaces both challenges.
    fn validate(&mut self) -> std::result::Result<(String, Category, String), String> {
        let name = validate_business_name(&self.name)
            .map_err(|e| e.to_string())?
            .to_string();
        let category = self
            .category
            .ok_or(ValidationError::UnknownCategory)
            .map_err(|e| e.to_string())?;
        let deal = validate_deal_text(&self.deal)
            .map_err(|e| e.to_string())?
            .to_string();

        let failed = self
            .challenges
            .iter()
            .zip(&self.answers)
            .position(|(challenge, answer)| !challenge.check(answer));
        if let Some(step) = failed {
            self.regenerate_challenges();
            return Err(format!(
                "Step {} verification was not correct. Both steps must be solved to add a business.",
                step + 1
            ));
        }

        Ok((name, category, deal))
    }
}

#[derive(Debug, Clone)]
pub enum Mode {
    Browse,
    Review(ReviewForm),
    AddBusiness(BusinessForm),
}

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    db: Database,
    pub page: Page,
    /// Rows of whichever list page is showing
    pub rows: Vec<Business>,
    pub state: TableState,
    pub category_filter: Option<Category>,
    pub sort: SortOrder,
    pub preferred: Option<Category>,
    pub summary: Option<ReportSummary>,
    pub show_detail: bool,
    pub detail_reviews: Vec<Review>,
    pub mode: Mode,
    pub status: Option<Status>,
}

impl App {
    pub fn new(db: Database) -> Result<Self> {
        let mut app = Self {
            db,
            page: Page::Directory,
            rows: Vec::new(),
            state: TableState::default(),
            category_filter: None,
            sort: SortOrder::Name,
            preferred: None,
            summary: None,
            show_detail: false,
            detail_reviews: Vec::new(),
            mode: Mode::Browse,
            status: None,
        };
        app.refresh()?;
        Ok(app)
    }

    /// Reload the data behind the current page
    pub fn refresh(&mut self) -> town_square::Result<()> {
        match self.page {
            Page::Directory | Page::Favorites => {
                let query = BusinessQuery::default()
                    .category(self.category_filter)
                    .sort(self.sort)
                    .favorites_only(self.page == Page::Favorites);
                self.rows = self.db.list_businesses(&query)?;
            }
            Page::Recommendations => self.rows = self.db.recommend(self.preferred)?,
            Page::Reports => self.summary = Some(self.db.get_summary()?),
            Page::Help => {}
        }

        if self.page.lists_businesses() {
            let selected = match (self.state.selected(), self.rows.len()) {
                (_, 0) => None,
                (Some(i), len) => Some(i.min(len - 1)),
                (None, _) => Some(0),
            };
            self.state.select(selected);
        }
        self.load_detail()
    }

    fn load_detail(&mut self) -> town_square::Result<()> {
        self.detail_reviews = match (self.show_detail, self.selected_business()) {
            (true, Some(business)) => {
                let mut reviews = self.db.reviews_for(business.id)?;
                reviews.truncate(DETAIL_REVIEWS);
                reviews
            }
            _ => Vec::new(),
        };
        Ok(())
    }

    /// Refresh, turning a storage failure into a status message
    fn reload(&mut self) {
        if let Err(err) = self.refresh() {
            self.set_error(format!("Could not load the directory: {}", err));
        }
    }

    fn set_info(&mut self, message: impl Into<String>) {
        self.status = Some(Status::Info(message.into()));
    }

    fn set_error(&mut self, message: impl Into<String>) {
        self.status = Some(Status::Error(message.into()));
    }

    pub fn selected_business(&self) -> Option<&Business> {
        if !self.page.lists_businesses() {
            return None;
        }
        self.state.selected().and_then(|i| self.rows.get(i))
    }

    pub fn go_to(&mut self, page: Page) {
        self.page = page;
        self.state.select(None);
        self.show_detail = false;
        self.reload();
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
        self.reload();
    }

    pub fn cycle_category(&mut self) {
        match self.page {
            Page::Directory | Page::Favorites => {
                self.category_filter = Category::cycle_filter(self.category_filter)
            }
            Page::Recommendations => self.preferred = Category::cycle_filter(self.preferred),
            _ => return,
        }
        self.state.select(None);
        self.reload();
    }

    pub fn toggle_sort(&mut self) {
        if !matches!(self.page, Page::Directory | Page::Favorites) {
            return;
        }
        self.sort = match self.sort {
            SortOrder::Name => SortOrder::RatingDesc,
            SortOrder::RatingDesc => SortOrder::Name,
        };
        self.reload();
    }

    pub fn toggle_favorite(&mut self) {
        let Some(business) = self.selected_business().cloned() else {
            self.set_info("Select a business from the list first.");
            return;
        };

        match self.db.toggle_favorite(business.id, !business.is_favorite) {
            Ok(_) if business.is_favorite => {
                self.set_info(format!("Removed {} from favorites.", business.name))
            }
            Ok(_) => self.set_info(format!("★ {} added to favorites.", business.name)),
            Err(err) => {
                self.set_error(format!("Could not save your favorite: {}", err));
                return;
            }
        }
        self.reload();
    }

    pub fn open_review_form(&mut self) {
        match self.selected_business() {
            Some(business) => self.mode = Mode::Review(ReviewForm::new(business)),
            None => self.set_info("Select a business before writing a review."),
        }
    }

    pub fn open_business_form(&mut self) {
        self.mode = Mode::AddBusiness(BusinessForm::new());
    }

    pub fn submit_review(&mut self) {
        let outcome = match &mut self.mode {
            Mode::Review(form) => form
                .validate()
                .map(|(rating, text)| (form.business_id, form.business_name.clone(), rating, text)),
            _ => return,
        };

        let (business_id, name, rating, text) = match outcome {
            Ok(values) => values,
            Err(message) => return self.set_error(message),
        };

        match self.db.add_review(business_id, rating, &text, &current_timestamp()) {
            Ok(_) => {
                self.mode = Mode::Browse;
                self.set_info(format!("Thank you! Your review of {} has been saved.", name));
                self.reload();
            }
            Err(err) => self.set_error(format!("Could not save your review: {}", err)),
        }
    }

    pub fn submit_business(&mut self) {
        let outcome = match &mut self.mode {
            Mode::AddBusiness(form) => form.validate(),
            _ => return,
        };

        let (name, category, deal) = match outcome {
            Ok(values) => values,
            Err(message) => return self.set_error(message),
        };

        match self.db.add_business(&name, category, &deal) {
            Ok(business) => {
                self.mode = Mode::Browse;
                self.set_info(format!("{} has been added to Town Square.", business.name));

                // Show the new row: Directory page, with a filter that includes it
                if self.page != Page::Directory {
                    self.page = Page::Directory;
                    self.show_detail = false;
                }
                if self.category_filter.is_some_and(|c| c != business.category) {
                    self.category_filter = None;
                }
                self.reload();

                if let Some(index) = self.rows.iter().position(|b| b.id == business.id) {
                    self.state.select(Some(index));
                    if let Err(err) = self.load_detail() {
                        self.set_error(format!("Could not load reviews: {}", err));
                    }
                }
            }
            Err(err) => self.set_error(format!("Could not save this business: {}", err)),
        }
    }

    pub fn next(&mut self) {
        let len = self.rows.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.rows.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.rows.len();
        if len == 0 {
            return;
        }
        let i = self.state.selected().map_or(0, |i| (i + PAGE_JUMP).min(len - 1));
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let i = self.state.selected().map_or(0, |i| i.saturating_sub(PAGE_JUMP));
        self.state.select(Some(i));
    }

    /// Apply one key press. Returns `true` when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.mode {
            Mode::Browse => return self.handle_browse_key(key),
            Mode::Review(_) | Mode::AddBusiness(_) => self.handle_form_key(key),
        }
        false
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> bool {
        let lists = self.page.lists_businesses();
        let moved = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => {
                self.go_to(self.page.next());
                false
            }
            KeyCode::BackTab => {
                self.go_to(self.page.previous());
                false
            }
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                self.go_to(Page::ALL[index]);
                false
            }
            KeyCode::Enter if lists => {
                self.toggle_detail();
                false
            }
            KeyCode::Char('c') => {
                self.cycle_category();
                false
            }
            KeyCode::Char('s') => {
                self.toggle_sort();
                false
            }
            KeyCode::Char('f') if lists => {
                self.toggle_favorite();
                false
            }
            KeyCode::Char('r') if lists => {
                self.open_review_form();
                false
            }
            KeyCode::Char('a') => {
                self.open_business_form();
                false
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.next();
                true
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.previous();
                true
            }
            KeyCode::PageDown => {
                self.page_down();
                true
            }
            KeyCode::PageUp => {
                self.page_up();
                true
            }
            KeyCode::Home if !self.rows.is_empty() => {
                self.state.select(Some(0));
                true
            }
            KeyCode::End if !self.rows.is_empty() => {
                self.state.select(Some(self.rows.len() - 1));
                true
            }
            _ => false,
        };

        if moved && self.show_detail {
            if let Err(err) = self.load_detail() {
                self.set_error(format!("Could not load reviews: {}", err));
            }
        }
        false
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Browse;
                self.status = None;
                return;
            }
            KeyCode::Enter => {
                match self.mode {
                    Mode::Review(_) => self.submit_review(),
                    Mode::AddBusiness(_) => self.submit_business(),
                    Mode::Browse => {}
                }
                return;
            }
            _ => {}
        }

        match &mut self.mode {
            Mode::Review(form) => match key.code {
                KeyCode::Tab | KeyCode::Down => form.focus = (form.focus + 1) % ReviewForm::FIELDS,
                KeyCode::BackTab | KeyCode::Up => {
                    form.focus = (form.focus + ReviewForm::FIELDS - 1) % ReviewForm::FIELDS
                }
                code => edit_text(form.input_mut(), code, key.modifiers),
            },
            Mode::AddBusiness(form) => match key.code {
                KeyCode::Tab | KeyCode::Down => form.focus = (form.focus + 1) % BusinessForm::FIELDS,
                KeyCode::BackTab | KeyCode::Up => {
                    form.focus = (form.focus + BusinessForm::FIELDS - 1) % BusinessForm::FIELDS
                }
                KeyCode::Left if form.focus == BusinessForm::CATEGORY_FIELD => {
                    form.cycle_category(false)
                }
                KeyCode::Right | KeyCode::Char(' ') if form.focus == BusinessForm::CATEGORY_FIELD => {
                    form.cycle_category(true)
                }
                code => {
                    if let Some(input) = form.input_mut() {
                        edit_text(input, code, key.modifiers);
                    }
                }
            },
            Mode::Browse => {}
        }
    }
}

fn edit_text(input: &mut String, code: KeyCode, modifiers: KeyModifiers) {
    match code {
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => input.push(c),
        KeyCode::Backspace => {
            input.pop();
        }
        _ => {}
    }
}

// ============================================================================
// TERMINAL LOOP
// ============================================================================

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

// ============================================================================
// RENDERING
// ============================================================================

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.page {
        Page::Directory | Page::Favorites | Page::Recommendations if app.show_detail => {
            let content_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(chunks[1]);

            render_business_table(f, content_chunks[0], app);
            render_detail_panel(f, content_chunks[1], app);
        }
        Page::Directory | Page::Favorites | Page::Recommendations => {
            render_business_table(f, chunks[1], app)
        }
        Page::Reports => render_reports(f, chunks[1], app),
        Page::Help => render_help(f, chunks[1]),
    }

    render_status_bar(f, chunks[2], app);

    match &app.mode {
        Mode::Review(form) => render_review_form(f, form),
        Mode::AddBusiness(form) => render_business_form(f, form),
        Mode::Browse => {}
    }
}

fn label_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

fn header_style() -> Style {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![Span::styled(
        "🏘  Town Square  ",
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )];

    for (i, page) in Page::ALL.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(format!("{} {}", i + 1, page.title()), style));
    }

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_business_table(f: &mut Frame, area: Rect, app: &mut App) {
    if app.rows.is_empty() {
        let message = if app.page == Page::Favorites {
            "You have not marked any businesses as favorites.\n\n\
             Tip: go to the Directory, select a business you love, and press 'f'."
        } else {
            "No businesses match this view. Press 'c' to change the category or 'a' to add one."
        };
        let empty = Paragraph::new(message)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(table_title(app)));
        f.render_widget(empty, area);
        return;
    }

    let recommending = app.page == Page::Recommendations;
    let columns: &[&str] = if recommending {
        &["#", "★", "Business", "Category", "Why", "Deal"]
    } else {
        &["★", "Business", "Category", "Rating", "Deal"]
    };
    let header = Row::new(columns.iter().map(|h| Cell::from(*h).style(header_style())))
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.rows.iter().enumerate().map(|(i, business)| {
        let star = Cell::from(if business.is_favorite { "★" } else { "" })
            .style(Style::default().fg(Color::Yellow));
        let rating_color = if business.has_reviews() { Color::Green } else { Color::DarkGray };

        let mut cells = Vec::with_capacity(6);
        if recommending {
            cells.push(Cell::from(format!("{}", i + 1)));
        }
        cells.push(star);
        cells.push(Cell::from(truncate(&business.name, 28)));
        cells.push(Cell::from(business.category.as_str()));
        if recommending {
            cells.push(Cell::from(explain(business)).style(Style::default().fg(rating_color)));
        } else {
            cells.push(
                Cell::from(business.rating_display()).style(Style::default().fg(rating_color)),
            );
        }
        cells.push(Cell::from(truncate(&business.deal_text, 40)));

        Row::new(cells).height(1)
    });

    let widths: Vec<Constraint> = if recommending {
        vec![
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Length(30),
            Constraint::Length(10),
            Constraint::Length(34),
            Constraint::Min(10),
        ]
    } else {
        vec![
            Constraint::Length(2),
            Constraint::Length(30),
            Constraint::Length(10),
            Constraint::Length(16),
            Constraint::Min(10),
        ]
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(table_title(app)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn table_title(app: &App) -> String {
    match app.page {
        Page::Recommendations => format!(
            " Smart Recommendations - preferred: {} ",
            Category::filter_label(app.preferred)
        ),
        page => format!(
            " {} - category: {} - sorted by {} ",
            page.title(),
            Category::filter_label(app.category_filter),
            match app.sort {
                SortOrder::Name => "name",
                SortOrder::RatingDesc => "rating",
            }
        ),
    }
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Business Details ");

    let Some(business) = app.selected_business() else {
        f.render_widget(Paragraph::new("Select a business to see details").block(block), area);
        return;
    };

    let rating_text = if business.has_reviews() {
        format!(
            "{:.1} from {} review(s)",
            business.average_rating, business.review_count
        )
    } else {
        "Not rated yet".to_string()
    };

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", business.name),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Category: ", label_style()),
            Span::raw(business.category.as_str()),
        ]),
        Line::from(vec![Span::styled("  Rating: ", label_style()), Span::raw(rating_text)]),
        Line::from(vec![
            Span::styled("  Favorite: ", label_style()),
            Span::raw(if business.is_favorite { "★ yes" } else { "no" }),
        ]),
        Line::from(""),
        Line::from(Span::styled("  DEAL", header_style().add_modifier(Modifier::UNDERLINED))),
        Line::from(format!("  {}", business.deal_text)),
        Line::from(""),
        Line::from(Span::styled(
            "  RECENT REVIEWS",
            header_style().add_modifier(Modifier::UNDERLINED),
        )),
    ];

    if app.detail_reviews.is_empty() {
        content.push(Line::from(Span::styled(
            "  Be the first to review - press 'r'",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }
    for review in &app.detail_reviews {
        content.push(Line::from(vec![
            Span::styled(format!("  {} ", review.stars()), Style::default().fg(Color::Yellow)),
            Span::styled(review.created_at.clone(), Style::default().fg(Color::DarkGray)),
        ]));
        content.push(Line::from(format!("    {}", truncate(&review.text, 120))));
    }

    let panel = Paragraph::new(content).wrap(Wrap { trim: false }).block(block);
    f.render_widget(panel, area);
}

fn render_reports(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let Some(summary) = &app.summary else {
        f.render_widget(
            Paragraph::new("Report unavailable").block(Block::default().borders(Borders::ALL)),
            area,
        );
        return;
    };

    let numbers = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Total businesses: ", label_style()),
            Span::raw(summary.total_businesses.to_string()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Average rating (businesses with reviews): ", label_style()),
            Span::raw(format!("{:.2}", summary.average_rating)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Favorited businesses: ", label_style()),
            Span::raw(summary.favorite_count.to_string()),
        ]),
    ];
    f.render_widget(
        Paragraph::new(numbers).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Key Numbers "),
        ),
        chunks[0],
    );

    let header = Row::new(
        ["#", "Business", "Category", "Average Rating"]
            .iter()
            .map(|h| Cell::from(*h).style(header_style())),
    )
    .style(Style::default().bg(Color::DarkGray));

    let rows = summary.top_businesses.iter().enumerate().map(|(i, business)| {
        Row::new(vec![
            Cell::from(format!("{}", i + 1)),
            Cell::from(truncate(&business.name, 28)),
            Cell::from(business.category.as_str()),
            Cell::from(format!(
                "{:.2} ({})",
                business.average_rating, business.review_count
            )),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Length(30),
            Constraint::Length(10),
            Constraint::Min(14),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Top 3 Highest-Rated Businesses "),
    );

    f.render_widget(table, chunks[1]);
}

fn render_help(f: &mut Frame, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));
    let content = vec![
        Line::from(""),
        Line::from(Span::styled("  How to use Town Square", header_style())),
        Line::from(""),
        Line::from("  Directory        Browse every local business and its current deal."),
        Line::from("  Favorites        Only the businesses you starred."),
        Line::from("  Recommendations  Favorites first, then highest rated, most reviewed, A-Z."),
        Line::from("  Reports          Totals, the average rating, and the top three."),
        Line::from(""),
        Line::from(vec![Span::raw("  "), key("Tab / 1-5"), Span::raw("  switch page")]),
        Line::from(vec![Span::raw("  "), key("↑/↓ j/k"), Span::raw("    move the selection")]),
        Line::from(vec![Span::raw("  "), key("Enter"), Span::raw("      show business details")]),
        Line::from(vec![Span::raw("  "), key("c"), Span::raw("          cycle the category")]),
        Line::from(vec![Span::raw("  "), key("s"), Span::raw("          sort by name or rating")]),
        Line::from(vec![Span::raw("  "), key("f"), Span::raw("          mark or unmark a favorite")]),
        Line::from(vec![Span::raw("  "), key("r"), Span::raw("          review the selected business")]),
        Line::from(vec![Span::raw("  "), key("a"), Span::raw("          add a new business")]),
        Line::from(vec![Span::raw("  "), key("q"), Span::raw("          quit")]),
        Line::from(""),
        Line::from("  Reviews need a rating from 1 to 5, 10-500 characters of text, and one"),
        Line::from("  solved math question. New businesses need two solved questions."),
    ];

    f.render_widget(
        Paragraph::new(content).block(Block::default().borders(Borders::ALL).title(" Help ")),
        area,
    );
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = Vec::new();

    if app.page.lists_businesses() {
        let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
        status_spans.push(Span::styled(
            format!(" Row: {}/{} ", selected, app.rows.len()),
            Style::default().fg(Color::Cyan),
        ));
        status_spans.push(Span::raw("| "));
    }

    match &app.status {
        Some(Status::Info(message)) => {
            status_spans.push(Span::styled(message.clone(), Style::default().fg(Color::Green)))
        }
        Some(Status::Error(message)) => {
            status_spans.push(Span::styled(message.clone(), Style::default().fg(Color::Red)))
        }
        None => {
            status_spans.push(Span::styled("5", Style::default().fg(Color::Yellow)));
            status_spans.push(Span::raw(" Help | "));
            status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
            status_spans.push(Span::raw(" Quit"));
        }
    }

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let marker = if focused { "▶ " } else { "  " };
    let value_style = if focused {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let cursor = if focused { "▏" } else { "" };

    Line::from(vec![
        Span::styled(format!("{}{}", marker, label), label_style()),
        Span::styled(format!("{}{}", value, cursor), value_style),
    ])
}

fn render_review_form(f: &mut Frame, form: &ReviewForm) {
    let area = centered_rect(70, 50, f.size());
    let content = vec![
        Line::from(""),
        field_line("Rating (1-5): ", &form.rating, form.focus == 0),
        Line::from(""),
        field_line("Review: ", &form.text, form.focus == 1),
        Line::from(""),
        field_line(
            &format!("Human check - {} ", form.challenge.prompt()),
            &form.answer,
            form.focus == 2,
        ),
        Line::from(""),
        Line::from(Span::styled(
            "  Tab next field | Enter submit | Esc cancel",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ];

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(content).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(format!(" Review {} ", form.business_name)),
        ),
        area,
    );
}

fn render_business_form(f: &mut Frame, form: &BusinessForm) {
    let area = centered_rect(70, 60, f.size());
    let category = form
        .category
        .map(|c| format!("◀ {} ▶", c))
        .unwrap_or_else(|| "◀ choose ▶".to_string());

    let content = vec![
        Line::from(""),
        field_line("Name: ", &form.name, form.focus == 0),
        field_line("Category: ", &category, form.focus == BusinessForm::CATEGORY_FIELD),
        field_line("Deal: ", &form.deal, form.focus == 2),
        Line::from(""),
        field_line(
            &format!("Step 1: {} ", form.challenges[0].prompt()),
            &form.answers[0],
            form.focus == 3,
        ),
        field_line(
            &format!("Step 2: {} ", form.challenges[1].prompt()),
            &form.answers[1],
            form.focus == 4,
        ),
        Line::from(""),
        Line::from(Span::styled(
            "  Tab next field | ←/→ category | Enter save | Esc cancel",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ];

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(content).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Add a Business "),
        ),
        area,
    );
}

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

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
