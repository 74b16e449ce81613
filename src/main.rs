mod ui;

use chrono::Local;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::{info, warn};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use spotdiff::{
    app_dirs::AppDirs,
    celebration::Celebration,
    config::{Config, ConfigStore, FileConfigStore},
    editor::Editor,
    error::SpotError,
    game::{Feedback, Game, Phase},
    game_config::{Field, GameConfig},
    loader::ConfigLoader,
    results::{ResultRecord, ResultsLog},
    runtime::{CrosstermEventSource, FixedTicker, Runner, SpotEvent, SpotEventSource, Ticker},
    samples::{BundledSamples, ConfigSource, FileSource},
    session::SessionConfig,
    store::{CustomConfigStore, FileStore, KeyValueStore},
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin, Write},
    path::PathBuf,
    time::Duration,
};
use ui::layout::{canvas_at, canvas_in, editor_layout, game_layout, pointer, rendered_box};
use webbrowser::Browser;

const TICK_RATE_MS: u64 = 100;

/// spot the difference between two images, in your terminal
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    version,
    about,
    long_about = "Spot the difference: click the areas that differ between two images, or author your own game with the built-in editor."
)]
pub struct Cli {
    /// bundled sample game to start right away
    #[clap(short = 's', long)]
    sample: Option<String>,

    /// start a game from a JSON config file
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// open the game editor
    #[clap(short = 'e', long)]
    edit: bool,

    /// print the bundled sample games and exit
    #[clap(long)]
    list_samples: bool,

    /// ignore clicks that follow the previous one within this many milliseconds
    #[clap(long)]
    debounce_ms: Option<u64>,

    /// skip the confetti when every difference is found
    #[clap(long)]
    no_celebrate: bool,
}

impl Cli {
    /// Command line flags win over saved preferences for this run
    fn preferences(&self, mut prefs: Config) -> Config {
        if let Some(ms) = self.debounce_ms {
            prefs.click_debounce_ms = ms;
        }
        if self.no_celebrate {
            prefs.celebrate = false;
        }
        prefs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
}

impl Message {
    fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// The editor plus which input has keyboard focus
#[derive(Debug)]
pub struct EditorState {
    pub editor: Editor,
    pub focus: Field,
    pub selected: usize,
}

impl EditorState {
    fn new(editor: Editor) -> Self {
        Self {
            editor,
            focus: Field::Title,
            selected: 0,
        }
    }
}

const FOCUS_ORDER: [Field; 4] = [Field::Title, Field::ImageA, Field::ImageB, Field::Regions];

fn next_focus(current: Field, forward: bool) -> Field {
    let pos = FOCUS_ORDER.iter().position(|f| *f == current).unwrap_or(0);
    let len = FOCUS_ORDER.len();
    let next = if forward {
        (pos + 1) % len
    } else {
        (pos + len - 1) % len
    };
    FOCUS_ORDER[next]
}

/// What the event loop should do after an event was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Redraw,
    Quit,
}

pub struct App {
    pub prefs: Config,
    pub game: Game,
    pub editor: Option<EditorState>,
    pub custom_store: CustomConfigStore<Box<dyn KeyValueStore>>,
    pub custom: Option<GameConfig>,
    pub samples: Vec<String>,
    pub loader: Option<ConfigLoader>,
    pub message: Option<Message>,
    pub celebration: Celebration,
    pub results: Option<ResultsLog>,
    pub best_time: Option<u64>,
    pub area: Rect,
    drag_canvas: Option<usize>,
}

impl App {
    pub fn new(prefs: Config, store: Box<dyn KeyValueStore>, results: Option<ResultsLog>) -> Self {
        let custom_store = CustomConfigStore::new(store);
        let custom = custom_store.load();
        Self {
            game: Game::new(SessionConfig::from(&prefs)),
            prefs,
            editor: None,
            custom_store,
            custom,
            samples: BundledSamples.names(),
            loader: None,
            message: None,
            celebration: Celebration::new(),
            results,
            best_time: None,
            area: Rect::new(0, 0, 80, 24),
            drag_canvas: None,
        }
    }

    /// Act on `--edit`, `--config`, `--sample` or the preferred default sample
    fn open_from_cli(&mut self, cli: &Cli) {
        if cli.edit {
            self.open_editor();
        } else if let Some(path) = &cli.config {
            self.load_from(FileSource::new(), path.to_string_lossy());
        } else if let Some(name) = cli.sample.clone().or_else(|| self.prefs.default_sample.clone())
        {
            self.load_from(BundledSamples, name);
        }
    }

    fn load_from<S>(&mut self, source: S, reference: impl Into<String>)
    where
        S: ConfigSource + Send + 'static,
    {
        if !self.game.begin_loading() {
            return;
        }
        self.message = None;
        self.loader = Some(ConfigLoader::spawn(source, reference));
    }

    fn start_game(&mut self, config: GameConfig) {
        self.celebration.stop();
        self.message = None;
        match self.game.start_session(config) {
            Ok(()) => self.refresh_best_time(),
            Err(e) => self.message = Some(Message::new(MessageKind::Error, e.to_string())),
        }
    }

    fn refresh_best_time(&mut self) {
        self.best_time = match (&self.results, self.game.config()) {
            (Some(log), Some(cfg)) => log.best_time(&cfg.title).unwrap_or_else(|e| {
                warn!("results: could not read best time: {e}");
                None
            }),
            _ => None,
        };
    }

    fn open_editor(&mut self) {
        let editor = match &self.custom {
            Some(cfg) => Editor::from_config(cfg),
            None => Editor::new(),
        };
        self.editor = Some(EditorState::new(editor));
        self.drag_canvas = None;
    }

    fn save_editor(&mut self) {
        let Some(state) = self.editor.as_mut() else {
            return;
        };
        match state.editor.commit(&self.custom_store) {
            Ok(cfg) => {
                self.editor = None;
                self.drag_canvas = None;
                self.custom = Some(cfg.clone());
                self.start_game(cfg);
            }
            Err(SpotError::InvalidConfig(errors)) => {
                self.message = Some(Message::new(
                    MessageKind::Warning,
                    format!("Please fix: {errors}"),
                ));
            }
            Err(e) => {
                warn!("editor: could not save: {e}");
                self.message = Some(Message::new(
                    MessageKind::Error,
                    format!("Could not save configuration: {e}"),
                ));
            }
        }
    }

    fn handle_event(&mut self, event: SpotEvent) -> Step {
        match event {
            SpotEvent::Tick => {
                if self.on_tick() {
                    Step::Redraw
                } else {
                    Step::Continue
                }
            }
            SpotEvent::Resize => Step::Redraw,
            SpotEvent::Key(key) => self.on_key(key),
            SpotEvent::Mouse(mouse) => self.on_mouse(mouse),
        }
    }

    /// Poll background work and advance the timers. Returns true when the screen needs a redraw.
    fn on_tick(&mut self) -> bool {
        let mut dirty = false;
        if let Some(result) = self.loader.as_mut().and_then(ConfigLoader::poll) {
            self.loader = None;
            self.game.finish_loading(result);
            if self.game.phase() == Phase::Playing {
                self.refresh_best_time();
            }
            dirty = true;
        }
        dirty |= self.game.tick();
        dirty |= self.apply_feedback();
        if self.celebration.is_active {
            self.celebration.update();
            dirty = true;
        }
        dirty
    }

    fn apply_feedback(&mut self) -> bool {
        let events = self.game.take_feedback();
        let dirty = !events.is_empty();
        for event in events {
            let message = match event {
                Feedback::RegionFound(_) => {
                    Message::new(MessageKind::Info, "💡 Difference found!")
                }
                Feedback::Miss => Message::new(
                    MessageKind::Error,
                    "❌ No difference there. Keep looking!",
                ),
                Feedback::AllFound { elapsed_seconds } => {
                    if self.prefs.celebrate {
                        self.celebration.start(self.area.width, self.area.height);
                    }
                    self.record_result(elapsed_seconds);
                    Message::new(
                        MessageKind::Success,
                        format!("🎉 All differences found in {elapsed_seconds} seconds!"),
                    )
                }
                Feedback::LoadFailed(reason) => Message::new(
                    MessageKind::Error,
                    format!("Could not load game: {reason}"),
                ),
            };
            self.message = Some(message);
        }
        dirty
    }

    fn record_result(&mut self, elapsed_seconds: u64) {
        let (Some(log), Some(cfg)) = (&self.results, self.game.config()) else {
            return;
        };
        let record = ResultRecord::now(&cfg.title, cfg.regions.len(), elapsed_seconds);
        if let Err(e) = log.append(&record) {
            warn!("results: could not append: {e}");
        }
        self.refresh_best_time();
    }

    fn on_key(&mut self, key: KeyEvent) -> Step {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Step::Quit;
        }
        if self.editor.is_some() {
            return self.on_editor_key(key);
        }
        match self.game.phase() {
            Phase::Idle | Phase::Loading => self.on_start_key(key),
            Phase::Playing | Phase::Complete => self.on_game_key(key),
        }
    }

    fn on_start_key(&mut self, key: KeyEvent) -> Step {
        match key.code {
            KeyCode::Esc => return Step::Quit,
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                let Some(name) = self.samples.get(index).cloned() else {
                    return Step::Continue;
                };
                self.load_from(BundledSamples, name);
            }
            KeyCode::Char('c') => match self.custom.clone() {
                Some(cfg) if self.game.phase() == Phase::Idle => self.start_game(cfg),
                _ => return Step::Continue,
            },
            KeyCode::Char('e') => self.open_editor(),
            _ => return Step::Continue,
        }
        Step::Redraw
    }

    fn on_game_key(&mut self, key: KeyEvent) -> Step {
        match key.code {
            KeyCode::Esc => return Step::Quit,
            KeyCode::Char('n') => {
                self.game.reset();
                self.celebration.stop();
                self.message = None;
                self.best_time = None;
            }
            KeyCode::Char('e') => self.open_editor(),
            _ => return Step::Continue,
        }
        Step::Redraw
    }

    fn on_editor_key(&mut self, key: KeyEvent) -> Step {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                self.editor = None;
                self.drag_canvas = None;
                self.message = None;
                return Step::Redraw;
            }
            KeyCode::Char('s') if ctrl => {
                self.save_editor();
                return Step::Redraw;
            }
            _ => {}
        }

        let Some(state) = self.editor.as_mut() else {
            return Step::Continue;
        };
        let on_list = state.focus == Field::Regions;
        match key.code {
            KeyCode::Char('e') if ctrl => state.editor.toggle_editing(),
            KeyCode::Char('o') if ctrl => open_images(&state.editor),
            KeyCode::Tab => state.focus = next_focus(state.focus, true),
            KeyCode::BackTab => state.focus = next_focus(state.focus, false),
            KeyCode::Up if on_list => state.selected = state.selected.saturating_sub(1),
            KeyCode::Down if on_list => {
                let last = state.editor.regions().len().saturating_sub(1);
                state.selected = (state.selected + 1).min(last);
            }
            KeyCode::Delete | KeyCode::Backspace if on_list => {
                state.editor.delete_region(state.selected);
                let last = state.editor.regions().len().saturating_sub(1);
                state.selected = state.selected.min(last);
            }
            KeyCode::Backspace => {
                let mut value = state.editor.field(state.focus).to_string();
                value.pop();
                state.editor.set_field(state.focus, value);
            }
            KeyCode::Char(c) if !ctrl && !on_list => {
                let mut value = state.editor.field(state.focus).to_string();
                value.push(c);
                state.editor.set_field(state.focus, value);
            }
            _ => return Step::Continue,
        }
        Step::Redraw
    }

    fn on_mouse(&mut self, mouse: MouseEvent) -> Step {
        if self.editor.is_some() {
            return self.on_editor_mouse(mouse);
        }
        if !matches!(self.game.phase(), Phase::Playing)
            || mouse.kind != MouseEventKind::Down(MouseButton::Left)
        {
            return Step::Continue;
        }
        let canvases = game_layout(self.area).panels.map(canvas_in);
        let Some(idx) = canvas_at(&canvases, mouse.column, mouse.row) else {
            return Step::Continue;
        };
        self.game
            .register_click(pointer(mouse.column, mouse.row), &rendered_box(canvases[idx]));
        self.apply_feedback();
        Step::Redraw
    }

    fn on_editor_mouse(&mut self, mouse: MouseEvent) -> Step {
        let Some(state) = self.editor.as_mut() else {
            return Step::Continue;
        };
        let canvases = editor_layout(self.area, state.editor.regions().len())
            .panels
            .map(canvas_in);
        let at = pointer(mouse.column, mouse.row);

        match (mouse.kind, self.drag_canvas) {
            (MouseEventKind::Down(MouseButton::Left), _) => {
                let Some(idx) = canvas_at(&canvases, mouse.column, mouse.row) else {
                    return Step::Continue;
                };
                if state.editor.begin_drag(at, &rendered_box(canvases[idx])) {
                    self.drag_canvas = Some(idx);
                }
            }
            (MouseEventKind::Drag(MouseButton::Left), Some(idx)) => {
                state.editor.update_drag(at, &rendered_box(canvases[idx]));
                // leaving the image finishes the drag, like a release would
                if canvas_at(&canvases, mouse.column, mouse.row) != Some(idx) {
                    state.editor.end_drag();
                    self.drag_canvas = None;
                }
            }
            (MouseEventKind::Up(MouseButton::Left), Some(idx)) => {
                state.editor.update_drag(at, &rendered_box(canvases[idx]));
                state.editor.end_drag();
                self.drag_canvas = None;
            }
            _ => return Step::Continue,
        }
        Step::Redraw
    }
}

fn open_images(editor: &Editor) {
    if !Browser::is_available() {
        return;
    }
    for url in [editor.field(Field::ImageA), editor.field(Field::ImageB)] {
        if url.is_empty() {
            continue;
        }
        if let Err(e) = webbrowser::open(url) {
            warn!("could not open {url}: {e}");
        }
    }
}

/// Log to a file in the state directory; the terminal belongs to the UI
fn init_logging() {
    let path = AppDirs::log_path();
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(log_file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.list_samples {
        for name in BundledSamples.names() {
            println!("{name}");
        }
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging();
    info!("=== spotdiff {} started ===", env!("CARGO_PKG_VERSION"));

    let prefs = cli.preferences(FileConfigStore::new().load());
    let mut app = App::new(prefs, Box::new(FileStore::new()), Some(ResultsLog::new()));
    app.open_from_cli(&cli);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B, E, T>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>>
where
    B: Backend,
    E: SpotEventSource,
    T: Ticker,
{
    let mut step = Step::Redraw;
    loop {
        if step == Step::Redraw {
            let size = terminal.size()?;
            app.area = Rect::new(0, 0, size.width, size.height);
            terminal.draw(|f| ui::draw(app, f))?;
        }

        step = app.handle_event(runner.step());
        if step == Step::Quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use ratatui::backend::TestBackend;
    use spotdiff::{
        region::Region,
        runtime::TestEventSource,
        store::{MemoryStore, CUSTOM_CONFIG_KEY},
    };
    use std::sync::mpsc;
    use std::time::Instant;
    use tempfile::tempdir;

    fn key(code: KeyCode) -> SpotEvent {
        SpotEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> SpotEvent {
        SpotEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> SpotEvent {
        SpotEvent::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn test_app() -> App {
        let prefs = Config {
            click_debounce_ms: 0,
            ..Config::default()
        };
        let mut app = App::new(prefs, Box::new(MemoryStore::new()), None);
        app.area = Rect::new(0, 0, 120, 40);
        app
    }

    fn whole_canvas_config() -> GameConfig {
        GameConfig::new("Whole", "a.png", "b.png", vec![Region::new(0, 0, 600, 400)])
    }

    fn wait_for_load(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.game.phase() == Phase::Loading && Instant::now() < deadline {
            app.handle_event(SpotEvent::Tick);
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["spotdiff"]);
        assert_eq!(cli.sample, None);
        assert_eq!(cli.config, None);
        assert!(!cli.edit);
        assert!(!cli.list_samples);
        assert_eq!(cli.debounce_ms, None);
        assert!(!cli.no_celebrate);
    }

    #[test]
    fn cli_flags_override_preferences() {
        let cli = Cli::parse_from(["spotdiff", "--debounce-ms", "50", "--no-celebrate"]);
        let prefs = cli.preferences(Config::default());
        assert_eq!(prefs.click_debounce_ms, 50);
        assert!(!prefs.celebrate);

        let cli = Cli::parse_from(["spotdiff", "-s", "park"]);
        assert_eq!(cli.sample.as_deref(), Some("park"));
        assert_eq!(cli.preferences(Config::default()), Config::default());
    }

    #[test]
    fn focus_cycles_both_ways() {
        assert_eq!(next_focus(Field::Title, true), Field::ImageA);
        assert_eq!(next_focus(Field::Regions, true), Field::Title);
        assert_eq!(next_focus(Field::Title, false), Field::Regions);
    }

    #[test]
    fn sample_key_loads_in_background() {
        let mut app = test_app();
        assert_eq!(app.handle_event(key(KeyCode::Char('1'))), Step::Redraw);
        assert_eq!(app.game.phase(), Phase::Loading);
        wait_for_load(&mut app);
        assert_eq!(app.game.phase(), Phase::Playing);
        assert!(app.loader.is_none());
        assert_eq!(app.game.config().map(|c| c.title.is_empty()), Some(false));
    }

    #[test]
    fn unknown_config_file_returns_to_start_with_error() {
        let dir = tempdir().unwrap();
        let cli = Cli {
            config: Some(dir.path().join("missing.json")),
            ..Cli::default()
        };
        let mut app = test_app();
        app.open_from_cli(&cli);
        wait_for_load(&mut app);
        assert_eq!(app.game.phase(), Phase::Idle);
        assert_matches!(app.message, Some(Message { kind: MessageKind::Error, .. }));
    }

    #[test]
    fn clicks_on_canvas_find_differences() {
        let mut app = test_app();
        app.start_game(whole_canvas_config());
        let canvas = canvas_in(game_layout(app.area).panels[1]);

        let step = app.handle_event(mouse(
            MouseEventKind::Down(MouseButton::Left),
            canvas.x + 1,
            canvas.y + 1,
        ));
        assert_eq!(step, Step::Redraw);
        assert_eq!(app.game.phase(), Phase::Complete);
        assert_matches!(
            app.message,
            Some(Message {
                kind: MessageKind::Success,
                ..
            })
        );
        assert!(app.celebration.is_active);
    }

    #[test]
    fn clicks_outside_images_are_ignored() {
        let mut app = test_app();
        app.start_game(whole_canvas_config());
        let step = app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 0, 0));
        assert_eq!(step, Step::Continue);
        assert_eq!(app.game.found_count(), 0);
    }

    #[test]
    fn no_celebrate_preference_is_respected() {
        let mut app = test_app();
        app.prefs.celebrate = false;
        app.start_game(whole_canvas_config());
        let canvas = canvas_in(game_layout(app.area).panels[0]);
        app.handle_event(mouse(
            MouseEventKind::Down(MouseButton::Left),
            canvas.x,
            canvas.y,
        ));
        assert_eq!(app.game.phase(), Phase::Complete);
        assert!(!app.celebration.is_active);
    }

    #[test]
    fn completed_game_is_logged_with_best_time() {
        let dir = tempdir().unwrap();
        let mut app = test_app();
        app.results = Some(ResultsLog::with_path(dir.path().join("results.csv")));
        app.start_game(whole_canvas_config());
        let canvas = canvas_in(game_layout(app.area).panels[0]);
        app.handle_event(mouse(
            MouseEventKind::Down(MouseButton::Left),
            canvas.x,
            canvas.y,
        ));
        assert_eq!(app.best_time, Some(0));
    }

    #[test]
    fn new_game_key_returns_to_start() {
        let mut app = test_app();
        app.start_game(whole_canvas_config());
        app.handle_event(key(KeyCode::Char('n')));
        assert_eq!(app.game.phase(), Phase::Idle);
        assert!(!app.game.cadence_active());
    }

    #[test]
    fn authoring_then_saving_starts_the_custom_game() {
        let mut app = test_app();
        app.handle_event(key(KeyCode::Char('e')));
        assert!(app.editor.is_some());

        for c in "Mine".chars() {
            app.handle_event(key(KeyCode::Char(c)));
        }
        app.handle_event(key(KeyCode::Tab));
        app.handle_event(key(KeyCode::Char('a')));
        app.handle_event(key(KeyCode::Tab));
        app.handle_event(key(KeyCode::Char('b')));
        app.handle_event(ctrl('e'));

        let canvas = canvas_in(editor_layout(app.area, 0).panels[0]);
        app.handle_event(mouse(
            MouseEventKind::Down(MouseButton::Left),
            canvas.x,
            canvas.y,
        ));
        app.handle_event(mouse(
            MouseEventKind::Drag(MouseButton::Left),
            canvas.x + canvas.width / 2,
            canvas.y + canvas.height / 2,
        ));
        app.handle_event(mouse(
            MouseEventKind::Up(MouseButton::Left),
            canvas.x + canvas.width / 2,
            canvas.y + canvas.height / 2,
        ));
        assert_eq!(
            app.editor.as_ref().map(|s| s.editor.regions().len()),
            Some(1)
        );

        app.handle_event(ctrl('s'));
        assert!(app.editor.is_none());
        assert_eq!(app.game.phase(), Phase::Playing);
        assert_eq!(app.custom.as_ref().map(|c| c.title.as_str()), Some("Mine"));
        assert!(app.custom_store.load().is_some());
    }

    #[test]
    fn no_regions_drawn_before_images_are_set() {
        let mut app = test_app();
        app.handle_event(key(KeyCode::Char('e')));
        for c in "Mine".chars() {
            app.handle_event(key(KeyCode::Char(c)));
        }
        app.handle_event(ctrl('e'));

        let canvas = canvas_in(editor_layout(app.area, 0).panels[0]);
        let down = app.handle_event(mouse(
            MouseEventKind::Down(MouseButton::Left),
            canvas.x,
            canvas.y,
        ));
        assert_eq!(down, Step::Continue);
        app.handle_event(mouse(
            MouseEventKind::Drag(MouseButton::Left),
            canvas.x + canvas.width / 2,
            canvas.y + canvas.height / 2,
        ));
        app.handle_event(mouse(
            MouseEventKind::Up(MouseButton::Left),
            canvas.x + canvas.width / 2,
            canvas.y + canvas.height / 2,
        ));

        let state = app.editor.as_ref().unwrap();
        assert!(!state.editor.has_images());
        assert!(state.editor.regions().is_empty());
    }

    #[test]
    fn saving_incomplete_config_keeps_editor_open() {
        let mut app = test_app();
        app.handle_event(key(KeyCode::Char('e')));
        app.handle_event(ctrl('s'));
        let state = app.editor.as_ref().unwrap();
        assert_eq!(state.editor.errors().get(Field::Title), Some("Required"));
        assert_matches!(
            app.message,
            Some(Message {
                kind: MessageKind::Warning,
                ..
            })
        );
        assert_eq!(app.game.phase(), Phase::Idle);
    }

    #[test]
    fn saved_custom_game_is_offered_on_start() {
        let store = MemoryStore::new();
        store
            .save(CUSTOM_CONFIG_KEY, &whole_canvas_config().to_json().unwrap())
            .unwrap();
        let mut app = App::new(Config::default(), Box::new(store), None);
        assert!(app.custom.is_some());
        app.handle_event(key(KeyCode::Char('c')));
        assert_eq!(app.game.phase(), Phase::Playing);
    }

    #[test]
    fn region_list_deletes_selected() {
        let mut app = test_app();
        app.custom = Some(GameConfig::new(
            "t",
            "a",
            "b",
            vec![Region::new(0, 0, 30, 30), Region::new(100, 100, 30, 30)],
        ));
        app.handle_event(key(KeyCode::Char('e')));
        app.handle_event(key(KeyCode::BackTab));
        app.handle_event(key(KeyCode::Down));
        app.handle_event(key(KeyCode::Delete));
        let state = app.editor.as_ref().unwrap();
        assert_eq!(state.editor.regions().len(), 1);
        assert_eq!(state.editor.regions()[0].region, Region::new(0, 0, 30, 30));
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn run_loop_draws_and_quits() {
        let (tx, rx) = mpsc::channel();
        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(1)),
        );
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut app = test_app();

        tx.send(SpotEvent::Resize).unwrap();
        tx.send(key(KeyCode::Esc)).unwrap();
        start_tui(&mut terminal, &mut app, &runner).unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("Welcome to SpotDiff!"));
        assert_eq!(app.area, Rect::new(0, 0, 100, 30));
    }

    #[test]
    fn every_screen_renders() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut app = test_app();
        terminal.draw(|f| ui::draw(&app, f)).unwrap();

        app.start_game(whole_canvas_config());
        terminal.draw(|f| ui::draw(&app, f)).unwrap();
        let content: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("Differences Found: 0 / 1"));

        app.open_editor();
        terminal.draw(|f| ui::draw(&app, f)).unwrap();
        let content: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("Game Configuration"));
    }

    #[test]
    fn tick_rate_is_sub_second() {
        const _: () = assert!(TICK_RATE_MS > 0 && TICK_RATE_MS <= 1000);
    }
}
