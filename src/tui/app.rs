use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use regex::Regex;

use crate::io::enabled_source::EnablementFetch;
use crate::io::prefs::{MemoryPreferenceStore, PreferenceStore, Preferences};
use crate::io::session::SessionContext;
use crate::model::menu::MenuRegistry;
use crate::ops::enablement::EnabledModules;

use super::input;
use super::render;
use super::router::Router;
use super::sidebar::{NavRow, NavigationRequest, Phase, Sidebar};
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// A drag gesture is in progress
    Drag,
    /// Typing a label filter
    Filter,
}

/// Options for launching the TUI
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config_dir: Option<PathBuf>,
    pub menu: Option<PathBuf>,
    pub path: Option<String>,
    /// Keep preferences in memory only
    pub ephemeral: bool,
}

/// Client-only inputs still being gathered before the sidebar turns interactive
struct Mount {
    prefs: Option<Preferences>,
    enabled: EnabledModules,
    fetch: Option<EnablementFetch>,
    /// Loaded state is on screen; the next step upgrades
    applied: bool,
}

/// Main application state
pub struct App {
    pub sidebar: Sidebar,
    pub router: Router,
    pub mode: Mode,
    pub should_quit: bool,
    /// Help overlay visible
    pub show_help: bool,
    pub theme: Theme,
    pub sidebar_width: u16,
    /// Cursor index into the sidebar rows
    pub cursor: usize,
    /// Scroll offset (first visible row)
    pub scroll_offset: usize,
    pub status_message: Option<String>,
    /// Filter mode: current pattern being typed
    pub filter_input: String,
    /// Last applied filter pattern
    pub last_filter: Option<String>,
    mount: Option<Mount>,
}

impl App {
    pub fn new(
        sidebar: Sidebar,
        router: Router,
        theme: Theme,
        fallback: EnabledModules,
        fetch: Option<EnablementFetch>,
    ) -> Self {
        App {
            sidebar,
            router,
            mode: Mode::Navigate,
            should_quit: false,
            show_help: false,
            theme,
            sidebar_width: 34,
            cursor: 0,
            scroll_offset: 0,
            status_message: None,
            filter_input: String::new(),
            last_filter: None,
            mount: Some(Mount {
                prefs: None,
                enabled: fallback,
                fetch,
                applied: false,
            }),
        }
    }

    /// App over an in-memory store with the fallback set as the only input.
    pub fn with_registry(registry: MenuRegistry, fallback: EnabledModules, path: &str) -> Self {
        let store: Box<dyn PreferenceStore> = Box::new(MemoryPreferenceStore::new());
        let sidebar = Sidebar::new(registry, store, fallback.clone(), path);
        App::new(sidebar, Router::new(path), Theme::default(), fallback, None)
    }

    /// Advance the mount by one step. Preferences are read once and the
    /// enabled-modules result is awaited; once both are in, the loaded state
    /// is applied while still static. The following call, after that frame
    /// has been painted, upgrades the sidebar to interactive.
    /// Returns true whenever the sidebar changed.
    pub fn poll_mount(&mut self) -> bool {
        let mount = match &mut self.mount {
            Some(m) => m,
            None => return false,
        };

        if mount.applied {
            self.mount = None;
            return self.sidebar.upgrade();
        }

        if mount.prefs.is_none() {
            mount.prefs = Some(self.sidebar.load_preferences());
        }

        if let Some(fetch) = &mut mount.fetch
            && let Some(result) = fetch.poll()
        {
            mount.enabled.resolve(result);
            mount.fetch = None;
        }

        if mount.fetch.is_some() {
            return false;
        }

        let prefs = mount.prefs.take().unwrap_or_default();
        let enabled = mount.enabled.clone();
        mount.applied = true;
        let applied = self.sidebar.apply_client_state(prefs, enabled);
        self.clamp_cursor();
        applied
    }

    pub fn is_mounting(&self) -> bool {
        self.mount.is_some()
    }

    pub fn rows(&self) -> Vec<NavRow> {
        self.sidebar.rows()
    }

    pub fn cursor_row(&self) -> Option<NavRow> {
        self.rows().into_iter().nth(self.cursor)
    }

    pub fn clamp_cursor(&mut self) {
        let count = self.rows().len();
        self.cursor = if count == 0 {
            0
        } else {
            self.cursor.min(count - 1)
        };
    }

    /// Hand a navigation request to the router and push the new location to
    /// the sidebar.
    pub fn navigate(&mut self, request: NavigationRequest) {
        if let Some(path) = self.router.navigate(request) {
            let path = path.to_string();
            log::debug!("navigate -> {}", path);
            self.sidebar.set_path(&path);
        }
    }

    pub fn go_back(&mut self) {
        if let Some(path) = self.router.back() {
            let path = path.to_string();
            self.sidebar.set_path(&path);
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.sidebar.phase() == Phase::Interactive
    }

    /// Get the active filter regex for highlighting.
    /// In Filter mode: compiles from current input. Otherwise from last_filter.
    pub fn active_filter_re(&self) -> Option<Regex> {
        let pattern = match self.mode {
            Mode::Filter if !self.filter_input.is_empty() => self.filter_input.as_str(),
            Mode::Filter => return None,
            _ => self.last_filter.as_deref()?,
        };
        Regex::new(&format!("(?i){}", pattern))
            .or_else(|_| Regex::new(&format!("(?i){}", regex::escape(pattern))))
            .ok()
    }
}

/// Build the app from on-disk configuration
fn build_app(opts: &RunOptions) -> Result<App, Box<dyn std::error::Error>> {
    let ctx = SessionContext::open(opts.config_dir.as_deref(), opts.menu.as_deref())?;
    let fallback = ctx.fallback();
    let fetch = ctx.spawn_fetch();
    let path = opts
        .path
        .clone()
        .unwrap_or_else(|| ctx.config.session.start_path.clone());

    let store: Box<dyn PreferenceStore> = if opts.ephemeral {
        Box::new(MemoryPreferenceStore::new())
    } else {
        Box::new(ctx.store.clone())
    };
    let theme = Theme::from_config(&ctx.config.ui);
    let sidebar = Sidebar::new(ctx.registry, store, fallback.clone(), &path);

    let mut app = App::new(sidebar, Router::new(&path), theme, fallback, fetch);
    if let Some(width) = ctx.config.ui.sidebar_width {
        app.sidebar_width = width.max(16);
    }
    Ok(app)
}

/// Run the TUI application
pub fn run(opts: RunOptions) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = build_app(&opts)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Run event loop
    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // The first frame is always drawn before any client state is read
        terminal.draw(|frame| render::render(frame, app))?;

        if app.is_mounting() && app.poll_mount() {
            continue;
        }

        let timeout = if app.is_mounting() {
            Duration::from_millis(50)
        } else {
            Duration::from_millis(250)
        };
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
