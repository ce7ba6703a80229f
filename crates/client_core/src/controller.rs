//! View state and the controller that owns it.
//!
//! The controller is driven from a single event loop: user actions call the
//! synchronous methods, and the loop awaits [`StoriesController::next_event`]
//! to fold fetch results and debounce expiries back into [`ViewState`].

use std::{sync::Arc, time::Duration};

use shared::{
    domain::{Story, StoryPage},
    pagination::{is_valid_page, total_pages},
    protocol::{StoryQuery, DEFAULT_PAGE, DEFAULT_PAGE_SIZE},
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    config::Settings,
    debounce::{Debouncer, DEFAULT_DEBOUNCE_WINDOW},
    error::FetchError,
    service::StoryService,
};

pub const APP_TITLE: &str = "TopStories";
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub title: String,
    pub stories: Vec<Story>,
    pub current_page: u32,
    pub page_size: u32,
    pub total_stories: i64,
    pub total_pages: u32,
    pub search_query: String,
    pub is_loading: bool,
    /// Empty when there is no error to show.
    pub error_message: String,
}

impl ViewState {
    pub fn new(page_size: u32) -> Self {
        Self {
            title: APP_TITLE.to_string(),
            stories: Vec::new(),
            current_page: DEFAULT_PAGE,
            page_size,
            total_stories: 0,
            total_pages: 0,
            search_query: String::new(),
            is_loading: false,
            error_message: String::new(),
        }
    }

    pub fn has_error(&self) -> bool {
        !self.error_message.is_empty()
    }

    pub fn query(&self) -> StoryQuery {
        StoryQuery::new(self.current_page, self.page_size, self.search_query.clone())
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    StoriesLoaded {
        page: u32,
        count: usize,
        total_pages: u32,
    },
    FetchFailed {
        page: u32,
        status: Option<u16>,
    },
    SearchSettled {
        query: String,
    },
    /// A response that was overtaken by a newer request.
    StaleResponseDropped {
        generation: u64,
    },
}

struct Completion {
    generation: u64,
    query: StoryQuery,
    result: Result<StoryPage, FetchError>,
}

enum Step {
    Completed(Completion),
    SearchSettled(String),
}

pub struct StoriesController<S> {
    service: Arc<S>,
    state: ViewState,
    search: Debouncer<String>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    latest_generation: u64,
    in_flight: usize,
}

impl<S: StoryService + 'static> StoriesController<S> {
    pub fn new(service: Arc<S>, page_size: u32) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            service,
            state: ViewState::new(page_size),
            search: Debouncer::new(DEFAULT_DEBOUNCE_WINDOW),
            completions_tx,
            completions_rx,
            latest_generation: 0,
            in_flight: 0,
        }
    }

    pub fn from_settings(service: Arc<S>, settings: &Settings) -> Self {
        Self::new(service, settings.page_size).with_debounce_window(settings.debounce_window())
    }

    pub fn with_debounce_window(mut self, window: Duration) -> Self {
        self.search = Debouncer::new(window);
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn stories(&self) -> &[Story] {
        &self.state.stories
    }

    /// True while a request is outstanding or a search is waiting out its
    /// debounce window.
    pub fn has_pending_work(&self) -> bool {
        self.in_flight > 0 || self.search.is_pending()
    }

    /// First load: page 1 with the current (empty) search.
    pub fn init(&mut self) {
        self.state.is_loading = true;
        self.fetch_stories();
    }

    /// First load driven by a search: shows as loading straight away, then
    /// fetches once the debounce window passes.
    pub fn init_with_search(&mut self, query: impl Into<String>) {
        self.state.is_loading = true;
        self.on_search(query);
    }

    /// Issues a request for the current page and search. Earlier requests are
    /// left running; their responses are dropped when they arrive. A request
    /// that panics is reported as a failed fetch.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime, as do the navigation
    /// methods that fetch.
    pub fn fetch_stories(&mut self) {
        self.state.is_loading = true;
        self.latest_generation += 1;
        self.in_flight += 1;

        let generation = self.latest_generation;
        let query = self.state.query();
        let service = Arc::clone(&self.service);
        let tx = self.completions_tx.clone();

        debug!(
            generation,
            page = query.page,
            search = %query.search_title,
            "fetching stories"
        );

        tokio::spawn(async move {
            let request = {
                let query = query.clone();
                tokio::spawn(async move { service.fetch_top_stories(&query).await })
            };
            let result = request.await.unwrap_or_else(|err| Err(FetchError::Task(err)));
            let _ = tx.send(Completion {
                generation,
                query,
                result,
            });
        });
    }

    /// Records the search and restarts the debounce window; the fetch happens
    /// once input goes quiet.
    pub fn on_search(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.state.current_page = DEFAULT_PAGE;
        self.state.search_query = query.clone();
        self.search.push(query);
    }

    pub fn previous_page(&mut self) {
        if self.state.current_page > 1 {
            self.state.current_page -= 1;
            self.fetch_stories();
        }
    }

    pub fn next_page(&mut self) {
        if self.state.current_page < self.state.total_pages {
            self.state.current_page += 1;
            self.fetch_stories();
        }
    }

    pub fn go_to_page(&mut self, page: u32) {
        if is_valid_page(page, self.state.total_pages) {
            self.state.current_page = page;
            self.fetch_stories();
        }
    }

    /// Waits for the next completed request or settled search and applies it.
    /// Returns `None` straight away when nothing is pending.
    pub async fn next_event(&mut self) -> Option<ControllerEvent> {
        if !self.has_pending_work() {
            return None;
        }

        let step = tokio::select! {
            biased;
            Some(completion) = self.completions_rx.recv(), if self.in_flight > 0 => {
                Step::Completed(completion)
            }
            query = self.search.settled(), if self.search.is_pending() => {
                Step::SearchSettled(query)
            }
            else => return None,
        };

        let event = match step {
            Step::Completed(completion) => self.apply(completion),
            Step::SearchSettled(query) => {
                debug!(query = %query, "search input settled");
                self.fetch_stories();
                ControllerEvent::SearchSettled { query }
            }
        };
        Some(event)
    }

    /// Drives events until no request or search is outstanding.
    pub async fn settle(&mut self) -> Vec<ControllerEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event().await {
            events.push(event);
        }
        events
    }

    fn apply(&mut self, completion: Completion) -> ControllerEvent {
        self.in_flight = self.in_flight.saturating_sub(1);
        let Completion {
            generation,
            query,
            result,
        } = completion;

        if generation < self.latest_generation {
            debug!(
                generation,
                latest = self.latest_generation,
                page = query.page,
                "dropping superseded stories response"
            );
            return ControllerEvent::StaleResponseDropped { generation };
        }

        match result {
            Ok(page) => {
                self.state.stories = page.stories;
                self.state.total_stories = page.total_count;
                self.state.total_pages = total_pages(page.total_count, self.state.page_size);
                self.state.error_message.clear();
                self.state.is_loading = false;
                info!(
                    page = query.page,
                    count = self.state.stories.len(),
                    total_pages = self.state.total_pages,
                    "stories loaded"
                );
                ControllerEvent::StoriesLoaded {
                    page: query.page,
                    count: self.state.stories.len(),
                    total_pages: self.state.total_pages,
                }
            }
            Err(err) => {
                warn!(page = query.page, error = %err, "failed to fetch stories");
                self.state.error_message = FETCH_ERROR_MESSAGE.to_string();
                self.state.is_loading = false;
                ControllerEvent::FetchFailed {
                    page: query.page,
                    status: err.status().map(|status| status.as_u16()),
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
