use crate::avatars::Avatars;
use crate::config::Config;
use crate::feeds::channel::photo_url;
use crate::feeds::{Message, PageFetcher, PageMessage, Photo};
use crate::months::{MonthSequence, YearMonth};
use crate::pager::{Completion, FetchTicket, Pager, PagerState};
use crate::routes::Route;
use crate::ui;
use crate::virtualizer::{HeightModel, Virtualizer};
use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::Backend;
use ratatui::Terminal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Ask for the next page once the selection is this close to the end.
const PREFETCH_ROWS: usize = 3;
const PAGE_JUMP: usize = 5;
const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Search,
    MonthPicker,
    Lightbox,
}

pub struct App {
    pub(crate) author: String,
    pub(crate) base_url: String,
    pub(crate) route: Route,
    pub(crate) pager: Pager,
    pub(crate) avatars: Avatars,
    pub(crate) virtualizer: Virtualizer,
    pub(crate) mode: Mode,
    pub(crate) search: String,
    pub(crate) selected: usize,
    pub(crate) scroll: u64,
    pub(crate) viewport_rows: u16,
    pub(crate) picker_index: usize,
    pub(crate) photo_index: usize,
    pub(crate) notice: Option<String>,
    should_quit: bool,
    fetcher: Arc<dyn PageFetcher>,
    tx: mpsc::UnboundedSender<PageMessage>,
    rx: mpsc::UnboundedReceiver<PageMessage>,
}

impl App {
    pub fn new(config: &Config, fetcher: Arc<dyn PageFetcher>, today: NaiveDate, route: Route) -> Self {
        let months = MonthSequence::generate(today, config.archive_start);
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            author: config.author.clone(),
            base_url: config.base_url.clone(),
            route,
            pager: Pager::new(months, config.policy),
            avatars: Avatars::new(config.avatars.clone()),
            virtualizer: Virtualizer::new(HeightModel::rows(80)),
            mode: Mode::Browse,
            search: String::new(),
            selected: 0,
            scroll: 0,
            viewport_rows: 0,
            picker_index: 0,
            photo_index: 0,
            notice: None,
            should_quit: false,
            fetcher,
            tx,
            rx,
        }
    }

    /// Kick off the first fetch, either for `month` or the newest month.
    pub fn start(&mut self, month: Option<YearMonth>) {
        if self.route != Route::Feed {
            return;
        }
        match month {
            Some(month) => self.select_month(month),
            None => self.request_more(),
        }
    }

    pub async fn run<B: Backend>(mut self, terminal: &mut Terminal<B>, month: Option<YearMonth>) -> Result<()> {
        self.start(month);

        loop {
            self.drain_pages();
            terminal.draw(|frame| ui::draw(frame, &mut self))?;
            if self.should_quit {
                return Ok(());
            }

            if event::poll(TICK)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
            self.maybe_request_more();
        }
    }

    pub fn request_more(&mut self) {
        if let Some(ticket) = self.pager.request_more() {
            self.spawn_fetch(ticket);
        }
    }

    pub fn select_month(&mut self, month: YearMonth) {
        let ticket = self.pager.select_month(month);
        self.selected = 0;
        self.scroll = 0;
        self.mode = Mode::Browse;
        self.spawn_fetch(ticket);
    }

    fn spawn_fetch(&self, ticket: FetchTicket) {
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = fetcher.fetch(ticket.month).await;
            let _ = tx.send(PageMessage { ticket, result });
        });
    }

    pub fn handle_page(&mut self, message: PageMessage) {
        let shown = self.pager.current_month();
        match self.pager.complete(message.ticket, message.result) {
            Completion::Refetch(ticket) => {
                if self.pager.current_month() != shown {
                    self.selected = 0;
                    self.scroll = 0;
                }
                self.spawn_fetch(ticket);
            }
            Completion::Appended { .. } | Completion::Exhausted | Completion::Stale => {}
        }
        self.clamp_selection();
    }

    /// Apply every page that has arrived. Returns whether any did.
    pub fn drain_pages(&mut self) -> bool {
        let mut any = false;
        while let Ok(message) = self.rx.try_recv() {
            self.handle_page(message);
            any = true;
        }
        any
    }

    /// Wait for the next page to arrive and apply it.
    pub async fn wait_page(&mut self) -> bool {
        match self.rx.recv().await {
            Some(message) => {
                self.handle_page(message);
                true
            }
            None => false,
        }
    }

    /// The "need more" signal: selection near the end, or not enough rows
    /// to fill the screen.
    pub fn maybe_request_more(&mut self) {
        if self.route != Route::Feed || self.pager.state() != PagerState::Idle {
            return;
        }
        let len = self.visible_len();
        let near_end = len == 0 || self.selected + PREFETCH_ROWS >= len;
        let underfilled = self.virtualizer.total_height() < u64::from(self.viewport_rows);
        if near_end || underfilled {
            self.request_more();
        }
    }

    pub fn visible(&self) -> Vec<&Message> {
        self.pager.store().filtered_view(&self.search).collect()
    }

    pub fn visible_len(&self) -> usize {
        self.pager.store().filtered_view(&self.search).count()
    }

    pub fn selected_message(&self) -> Option<&Message> {
        self.pager.store().filtered_view(&self.search).nth(self.selected)
    }

    /// The photo shown in the lightbox with its resolved URL.
    pub fn current_photo(&self) -> Option<(&Photo, Option<String>)> {
        let message = self.selected_message()?;
        let photo = message.photos.get(self.photo_index)?;
        Some((photo, photo_url(&self.base_url, message, photo)))
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        self.notice = None;

        match self.mode {
            Mode::Browse => self.handle_browse_key(key),
            Mode::Search => self.handle_search_key(key),
            Mode::MonthPicker => self.handle_picker_key(key),
            Mode::Lightbox => self.handle_lightbox_key(key),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::PageDown => self.move_selection(PAGE_JUMP as isize),
            KeyCode::PageUp => self.move_selection(-(PAGE_JUMP as isize)),
            KeyCode::Char('g') | KeyCode::Home => self.selected = 0,
            KeyCode::Char('G') | KeyCode::End => {
                self.selected = self.visible_len().saturating_sub(1);
            }
            KeyCode::Char('/') => self.mode = Mode::Search,
            KeyCode::Char('c') => self.set_search(String::new()),
            KeyCode::Char('m') => self.open_picker(),
            KeyCode::Char('r') => {
                if let Some(month) = self.pager.current_month() {
                    self.select_month(month);
                }
            }
            KeyCode::Char('p') => self.jump_to_quote(),
            KeyCode::Enter => self.open_lightbox(),
            KeyCode::Char('o') => {
                self.photo_index = 0;
                self.open_photo();
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.set_search(String::new());
                self.mode = Mode::Browse;
            }
            KeyCode::Enter => self.mode = Mode::Browse,
            KeyCode::Backspace => {
                let mut term = self.search.clone();
                term.pop();
                self.set_search(term);
            }
            KeyCode::Char(c) => {
                let mut term = self.search.clone();
                term.push(c);
                self.set_search(term);
            }
            _ => {}
        }
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        let count = self.pager.months().len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('m') => self.mode = Mode::Browse,
            KeyCode::Char('j') | KeyCode::Down => {
                if self.picker_index + 1 < count {
                    self.picker_index += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.picker_index = self.picker_index.saturating_sub(1);
            }
            KeyCode::Enter => match self.pager.months().get(self.picker_index) {
                Some(month) => self.select_month(month),
                None => self.mode = Mode::Browse,
            },
            _ => {}
        }
    }

    fn handle_lightbox_key(&mut self, key: KeyEvent) {
        let count = self.selected_message().map_or(0, |m| m.photos.len());
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => self.mode = Mode::Browse,
            KeyCode::Right | KeyCode::Char('l') if count > 0 => {
                self.photo_index = (self.photo_index + 1) % count;
            }
            KeyCode::Left | KeyCode::Char('h') if count > 0 => {
                self.photo_index = (self.photo_index + count - 1) % count;
            }
            KeyCode::Char('o') => self.open_photo(),
            _ => {}
        }
    }

    /// New search term. The filtered view is recomputed from the store on
    /// every read, so only the cursor needs resetting here.
    fn set_search(&mut self, term: String) {
        if term != self.search {
            self.search = term;
            self.selected = 0;
            self.scroll = 0;
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        let target = self.selected.saturating_add_signed(delta);
        self.selected = target.min(len - 1);
    }

    fn open_picker(&mut self) {
        self.picker_index = self
            .pager
            .current_month()
            .and_then(|month| self.pager.months().position(month))
            .unwrap_or(0);
        self.mode = Mode::MonthPicker;
    }

    fn open_lightbox(&mut self) {
        match self.selected_message() {
            Some(message) if !message.photos.is_empty() => {
                self.photo_index = 0;
                self.mode = Mode::Lightbox;
            }
            Some(_) => self.notice = Some("No photos in this message".to_string()),
            None => {}
        }
    }

    fn open_photo(&mut self) {
        match self.current_photo() {
            Some((_, Some(url))) => {
                if let Err(e) = open::that(&url) {
                    tracing::warn!(%url, error = %e, "failed to open photo");
                    self.notice = Some(format!("Could not open {}: {}", url, e));
                }
            }
            Some((photo, None)) => {
                self.notice = Some(format!("No dated location for {}", photo.path));
            }
            None => self.notice = Some("No photo selected".to_string()),
        }
    }

    fn jump_to_quote(&mut self) {
        let Some(quoted_id) = self
            .selected_message()
            .and_then(|m| m.quoted_message.as_ref())
            .map(|q| q.id.clone())
        else {
            return;
        };
        match self
            .pager
            .store()
            .filtered_view(&self.search)
            .position(|m| m.id == quoted_id)
        {
            Some(index) => self.selected = index,
            None => self.notice = Some("Quoted message is not loaded".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::FetchError;
    use crate::pager::ExhaustionPolicy;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Answers from a fixed table; unknown months are empty pages.
    #[derive(Default)]
    struct ScriptedFetcher {
        pages: Mutex<HashMap<YearMonth, Result<Vec<Message>, String>>>,
        calls: AtomicUsize,
    }

    impl ScriptedFetcher {
        fn page(self, month: &str, messages: Vec<Message>) -> Self {
            self.pages.lock().unwrap().insert(ym(month), Ok(messages));
            self
        }

        fn failure(self, month: &str) -> Self {
            self.pages
                .lock()
                .unwrap()
                .insert(ym(month), Err("HTTP 503".to_string()));
            self
        }
    }

    #[async_trait]
    impl PageFetcher for ScriptedFetcher {
        async fn fetch(&self, month: YearMonth) -> Result<Vec<Message>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.pages.lock().unwrap().get(&month) {
                Some(Ok(messages)) => Ok(messages.clone()),
                Some(Err(reason)) => Err(FetchError::Network {
                    url: month.to_string(),
                    reason: reason.clone(),
                }),
                None => Ok(Vec::new()),
            }
        }
    }

    fn ym(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    fn msg(id: &str, text: &str) -> Message {
        Message::new(id, text, "2024-08-01T10:00:00")
    }

    fn app_with(fetcher: Arc<ScriptedFetcher>, policy: ExhaustionPolicy) -> App {
        let config = Config {
            base_url: "https://example.org".to_string(),
            archive_start: ym("2024-06"),
            policy,
            ..Config::default()
        };
        let today = NaiveDate::from_ymd_opt(2024, 8, 20).unwrap();
        App::new(&config, fetcher, today, Route::Feed)
    }

    async fn wait(app: &mut App) {
        let arrived = tokio::time::timeout(Duration::from_secs(5), app.wait_page())
            .await
            .expect("page within timeout");
        assert!(arrived);
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[tokio::test]
    async fn test_rapid_requests_issue_one_fetch() {
        let fetcher = Arc::new(ScriptedFetcher::default().page("2024-08", vec![msg("a", "hi")]));
        let mut app = app_with(Arc::clone(&fetcher), ExhaustionPolicy::PerPage);

        app.request_more();
        app.request_more();
        wait(&mut app).await;

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(app.pager().store().len(), 1);
        assert_eq!(app.pager().state(), PagerState::Idle);
    }

    #[tokio::test]
    async fn test_empty_page_exhausts_and_stops_fetching() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let mut app = app_with(Arc::clone(&fetcher), ExhaustionPolicy::PerPage);

        app.start(None);
        wait(&mut app).await;
        assert_eq!(app.pager().state(), PagerState::Exhausted);
        assert!(!app.pager().has_more());

        app.request_more();
        app.maybe_request_more();
        tokio::task::yield_now().await;
        assert!(!app.drain_pages());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_select_month_after_exhaustion() {
        let fetcher = Arc::new(ScriptedFetcher::default().page("2024-07", vec![msg("j", "july")]));
        let mut app = app_with(Arc::clone(&fetcher), ExhaustionPolicy::PerPage);

        app.start(None);
        wait(&mut app).await;
        assert_eq!(app.pager().state(), PagerState::Exhausted);

        app.select_month(ym("2024-07"));
        assert!(app.pager().store().is_empty());
        assert_eq!(app.pager().state(), PagerState::Loading);
        wait(&mut app).await;

        assert_eq!(app.pager().state(), PagerState::Idle);
        assert_eq!(app.pager().current_month(), Some(ym("2024-07")));
        assert_eq!(app.pager().store().get(0).unwrap().id, "j");
    }

    #[tokio::test]
    async fn test_advance_month_policy_skips_failed_month() {
        let fetcher = Arc::new(
            ScriptedFetcher::default()
                .failure("2024-08")
                .page("2024-07", vec![msg("j", "july")]),
        );
        let mut app = app_with(Arc::clone(&fetcher), ExhaustionPolicy::AdvanceMonth);

        app.start(None);
        wait(&mut app).await;
        assert_eq!(app.pager().current_month(), Some(ym("2024-07")));
        assert!(app.pager().last_error().unwrap().contains("HTTP 503"));
        wait(&mut app).await;

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
        assert_eq!(app.pager().store().len(), 1);
        assert_eq!(app.pager().state(), PagerState::Idle);
        assert!(app.pager().last_error().is_none());
    }

    #[tokio::test]
    async fn test_gap_month_keeps_list_and_selection() {
        let fetcher = Arc::new(
            ScriptedFetcher::default()
                .page("2024-08", vec![msg("a", "one"), msg("b", "two")])
                .page("2024-06", vec![msg("c", "three")]),
        );
        let mut app = app_with(Arc::clone(&fetcher), ExhaustionPolicy::AdvanceMonth);

        app.start(None);
        wait(&mut app).await;
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected(), 1);

        app.request_more();
        wait(&mut app).await;
        assert_eq!(app.pager().store().len(), 2);
        assert_eq!(app.selected(), 1);
        wait(&mut app).await;

        let ids: Vec<&str> = app.pager().store().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(app.selected(), 1);
        assert_eq!(app.pager().current_month(), Some(ym("2024-08")));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_stale_page_is_discarded() {
        let fetcher = Arc::new(
            ScriptedFetcher::default()
                .page("2024-08", vec![msg("aug", "august")])
                .page("2024-06", vec![msg("jun", "june")]),
        );
        let mut app = app_with(Arc::clone(&fetcher), ExhaustionPolicy::PerPage);

        app.request_more();
        app.select_month(ym("2024-06"));
        wait(&mut app).await;
        wait(&mut app).await;

        let ids: Vec<&str> = app.pager().store().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["jun"]);
        assert_eq!(app.pager().current_month(), Some(ym("2024-06")));
    }

    #[tokio::test]
    async fn test_need_more_signal_near_end() {
        let fetcher = Arc::new(
            ScriptedFetcher::default()
                .page("2024-08", vec![msg("a", "one")])
                .page("2024-07", vec![msg("b", "two")]),
        );
        let mut app = app_with(Arc::clone(&fetcher), ExhaustionPolicy::PerPage);

        app.maybe_request_more();
        wait(&mut app).await;
        app.maybe_request_more();
        wait(&mut app).await;

        let ids: Vec<&str> = app.pager().store().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_search_filters_and_resets_selection() {
        let fetcher = Arc::new(ScriptedFetcher::default().page(
            "2024-08",
            vec![
                msg("a", "Rust is fun"),
                msg("b", "tea time"),
                msg("c", "more rust").with_tags(vec!["lang".into()]),
            ],
        ));
        let mut app = app_with(fetcher, ExhaustionPolicy::PerPage);
        app.start(None);
        wait(&mut app).await;

        app.handle_key(key(KeyCode::Char('G')));
        assert_eq!(app.selected(), 2);

        app.handle_key(key(KeyCode::Char('/')));
        assert_eq!(app.mode(), Mode::Search);
        type_str(&mut app, "RUST");
        assert_eq!(app.search(), "RUST");
        assert_eq!(app.selected(), 0);
        assert_eq!(app.visible_len(), 2);

        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.search(), "RUS");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.mode(), Mode::Browse);
        assert_eq!(app.pager().store().len(), 3);

        app.handle_key(key(KeyCode::Char('c')));
        assert_eq!(app.visible_len(), 3);
    }

    #[tokio::test]
    async fn test_jump_to_quoted_message() {
        let original = msg("1", "original");
        let reply = msg("2", "reply").with_quote(msg("1", "original"));
        let fetcher = Arc::new(ScriptedFetcher::default().page("2024-08", vec![original, reply]));
        let mut app = app_with(fetcher, ExhaustionPolicy::PerPage);
        app.start(None);
        wait(&mut app).await;

        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected(), 1);
        app.handle_key(key(KeyCode::Char('p')));
        assert_eq!(app.selected(), 0);

        // No quote on the original: nothing happens.
        app.handle_key(key(KeyCode::Char('p')));
        assert_eq!(app.selected(), 0);
    }

    #[tokio::test]
    async fn test_month_picker_selects_month() {
        let fetcher = Arc::new(
            ScriptedFetcher::default()
                .page("2024-08", vec![msg("a", "aug")])
                .page("2024-07", vec![msg("b", "jul")]),
        );
        let mut app = app_with(Arc::clone(&fetcher), ExhaustionPolicy::PerPage);
        app.start(None);
        wait(&mut app).await;

        app.handle_key(key(KeyCode::Char('m')));
        assert_eq!(app.mode(), Mode::MonthPicker);
        assert_eq!(app.picker_index, 0);
        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.mode(), Mode::Browse);
        assert_eq!(app.pager().current_month(), Some(ym("2024-07")));
        wait(&mut app).await;

        let ids: Vec<&str> = app.pager().store().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[tokio::test]
    async fn test_lightbox_cycles_photos() {
        let photos: Vec<Photo> = ["x.jpg", "y.jpg"]
            .iter()
            .enumerate()
            .map(|(i, path)| Photo {
                id: i.to_string(),
                path: path.to_string(),
                width: 10,
                height: 10,
            })
            .collect();
        let fetcher = Arc::new(ScriptedFetcher::default().page(
            "2024-08",
            vec![msg("a", "no photos"), msg("b", "").with_photos(photos)],
        ));
        let mut app = app_with(fetcher, ExhaustionPolicy::PerPage);
        app.start(None);
        wait(&mut app).await;

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.mode(), Mode::Browse);
        assert!(app.notice.is_some());

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.mode(), Mode::Lightbox);
        let (photo, url) = app.current_photo().unwrap();
        assert_eq!(photo.path, "x.jpg");
        assert_eq!(
            url.as_deref(),
            Some("https://example.org/assets/channel/2024-08/2024-08-01/x.jpg")
        );

        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.current_photo().unwrap().0.path, "y.jpg");
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.current_photo().unwrap().0.path, "x.jpg");
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.current_photo().unwrap().0.path, "y.jpg");
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.mode(), Mode::Browse);
    }

    #[tokio::test]
    async fn test_not_found_route_never_fetches() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let config = Config {
            base_url: "https://example.org".to_string(),
            ..Config::default()
        };
        let today = NaiveDate::from_ymd_opt(2024, 8, 20).unwrap();
        let mut app = App::new(&config, Arc::clone(&fetcher) as Arc<dyn PageFetcher>, today, Route::resolve("/nope"));

        app.start(None);
        app.maybe_request_more();
        tokio::task::yield_now().await;
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(app.pager().state(), PagerState::Idle);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app_with(Arc::new(ScriptedFetcher::default()), ExhaustionPolicy::PerPage);
        assert!(!app.should_quit());
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }
}
