//! In-memory browser model used as the command executor
//!
//! Tracks tabs, bookmarks, window state and page interactions so every
//! intent has an observable effect. Handlers are short critical sections on
//! one mutex, so concurrent dispatches interleave per call.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::executor::{CommandExecutor, ExecutionError, ExecutionOutcome, ExecutionResult};
use crate::intent::{BookmarkAction, ScrollDirection, SearchEngine, TabDirection, WindowAction};
use crate::url::extract_domain;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub id: u32,
    pub url: String,
    pub title: String,
    pub scroll_y: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowState {
    #[default]
    Normal,
    Minimized,
    Maximized,
}

/// A click or fill performed on the active page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageInteraction {
    Click { tab: u32, selector: String },
    Fill { tab: u32, selector: String, value: String },
}

#[derive(Debug, Clone, Default)]
pub struct BrowserState {
    pub tabs: Vec<Tab>,
    pub active: Option<usize>,
    pub bookmarks: Vec<Bookmark>,
    pub window: WindowState,
    pub interactions: Vec<PageInteraction>,
    next_id: u32,
}

impl BrowserState {
    pub fn active_tab(&self) -> Option<&Tab> {
        self.tabs.get(self.active?)
    }

    fn active_tab_mut(&mut self) -> Result<&mut Tab, ExecutionError> {
        let index = self.active.ok_or_else(no_active_tab)?;
        self.tabs.get_mut(index).ok_or_else(no_active_tab)
    }

    fn open(&mut self, url: &str) -> u32 {
        self.next_id += 1;
        self.tabs.push(Tab {
            id: self.next_id,
            url: url.to_string(),
            title: extract_domain(url),
            scroll_y: 0,
        });
        self.active = Some(self.tabs.len() - 1);
        self.next_id
    }
}

fn no_active_tab() -> ExecutionError {
    ExecutionError::failed("No active tab")
}

/// Results page URL for a query on the given engine
pub fn search_url(query: &str, engine: SearchEngine) -> String {
    let query = urlencoding::encode(query);
    match engine {
        SearchEngine::YouTube => format!("https://www.youtube.com/results?search_query={}", query),
        SearchEngine::Google => format!("https://www.google.com/search?q={}", query),
    }
}

#[derive(Debug, Default)]
pub struct SimulatedBrowser {
    state: Mutex<BrowserState>,
    /// Handler calls still to fail, for exercising retries
    pending_failures: AtomicU32,
    calls: AtomicU32,
}

impl SimulatedBrowser {
    /// Browser with no tabs open
    pub fn new() -> Self {
        Self::default()
    }

    /// Browser with a single tab open on `url`
    pub fn with_home(url: &str) -> Self {
        let browser = Self::new();
        browser.lock().open(url);
        browser
    }

    /// Make the next `count` handler calls fail
    pub fn fail_next(&self, count: u32) {
        self.pending_failures.store(count, Ordering::SeqCst);
    }

    /// Number of handler calls so far, failed ones included
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Copy of the current browser state
    pub fn snapshot(&self) -> BrowserState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, BrowserState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Count the call and consume one injected failure if any are pending
    fn begin(&self, handler: &str) -> Result<MutexGuard<'_, BrowserState>, ExecutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let injected = self
            .pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            debug!(handler, "injected failure");
            return Err(ExecutionError::failed("Simulated failure"));
        }
        Ok(self.lock())
    }
}

#[async_trait]
impl CommandExecutor for SimulatedBrowser {
    async fn open_tab(&self, url: &str) -> ExecutionResult {
        let mut state = self.begin("open_tab")?;
        let id = state.open(url);
        debug!(id, url, "tab opened");
        Ok(ExecutionOutcome::new(format!("Opened new tab: {}", url)))
    }

    async fn close_tab(&self) -> ExecutionResult {
        let mut state = self.begin("close_tab")?;
        let index = state
            .active
            .ok_or_else(|| ExecutionError::failed("No tab to close"))?;
        state.tabs.remove(index);
        state.active = match state.tabs.len() {
            0 => None,
            len => Some(index.min(len - 1)),
        };
        Ok(ExecutionOutcome::new("Tab closed"))
    }

    async fn switch_tab(&self, direction: TabDirection) -> ExecutionResult {
        let mut state = self.begin("switch_tab")?;
        let current = state.active.ok_or_else(no_active_tab)?;
        let count = state.tabs.len();
        let next = match direction {
            TabDirection::Next => (current + 1) % count,
            TabDirection::Previous => (current + count - 1) % count,
        };
        state.active = Some(next);
        Ok(ExecutionOutcome::new(format!("Switched to {} tab", direction)))
    }

    async fn reload_tab(&self) -> ExecutionResult {
        let mut state = self.begin("reload_tab")?;
        state.active_tab_mut()?.scroll_y = 0;
        Ok(ExecutionOutcome::new("Tab reloaded"))
    }

    async fn navigate(&self, url: &str) -> ExecutionResult {
        let mut state = self.begin("navigate")?;
        let tab = state.active_tab_mut()?;
        tab.url = url.to_string();
        tab.title = extract_domain(url);
        tab.scroll_y = 0;
        Ok(ExecutionOutcome::new(format!("Navigated to {}", url)))
    }

    async fn search(&self, query: &str, engine: SearchEngine) -> ExecutionResult {
        let mut state = self.begin("search")?;
        state.open(&search_url(query, engine));
        Ok(ExecutionOutcome::new(format!(
            "Searching for \"{}\" on {}",
            query, engine
        )))
    }

    async fn scroll(&self, direction: ScrollDirection, amount: u32) -> ExecutionResult {
        let mut state = self.begin("scroll")?;
        let tab = state.active_tab_mut()?;
        tab.scroll_y = match direction {
            ScrollDirection::Down => tab.scroll_y.saturating_add(amount),
            ScrollDirection::Up => tab.scroll_y.saturating_sub(amount),
        };
        Ok(ExecutionOutcome::new(format!("Scrolled {}", direction)))
    }

    async fn click(&self, selector: &str) -> ExecutionResult {
        let mut state = self.begin("click")?;
        let tab = state.active_tab_mut()?.id;
        state.interactions.push(PageInteraction::Click {
            tab,
            selector: selector.to_string(),
        });
        Ok(ExecutionOutcome::new(format!("Clicked element: {}", selector)))
    }

    async fn fill(&self, selector: &str, value: &str) -> ExecutionResult {
        let mut state = self.begin("fill")?;
        let tab = state.active_tab_mut()?.id;
        state.interactions.push(PageInteraction::Fill {
            tab,
            selector: selector.to_string(),
            value: value.to_string(),
        });
        Ok(ExecutionOutcome::new(format!("Filled input: {}", selector)))
    }

    async fn bookmark(&self, action: BookmarkAction) -> ExecutionResult {
        let mut state = self.begin("bookmark")?;
        let tab = state.active_tab().cloned().ok_or_else(no_active_tab)?;
        match action {
            BookmarkAction::Add => {
                state.bookmarks.push(Bookmark {
                    title: tab.title,
                    url: tab.url,
                });
                Ok(ExecutionOutcome::new("Bookmark added"))
            }
            BookmarkAction::Remove => {
                let position = state
                    .bookmarks
                    .iter()
                    .position(|b| b.url == tab.url)
                    .ok_or_else(|| ExecutionError::failed("Bookmark not found"))?;
                state.bookmarks.remove(position);
                Ok(ExecutionOutcome::new("Bookmark removed"))
            }
        }
    }

    async fn window(&self, action: WindowAction) -> ExecutionResult {
        let mut state = self.begin("window")?;
        let (window, message) = match action {
            WindowAction::Minimize => (WindowState::Minimized, "Window minimized"),
            WindowAction::Maximize => (WindowState::Maximized, "Window maximized"),
        };
        state.window = window;
        Ok(ExecutionOutcome::new(message))
    }
}
