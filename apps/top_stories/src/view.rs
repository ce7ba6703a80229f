//! Plain-text rendering of the controller's view state.

use std::io::{self, Write};

use client_core::ViewState;
use shared::pagination::page_window;

const PAGE_LINKS: u32 = 7;

pub fn render(state: &ViewState, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", state.title)?;
    writeln!(out, "{}", "=".repeat(state.title.len()))?;

    if !state.search_query.is_empty() {
        writeln!(out, "search: \"{}\"", state.search_query)?;
    }
    if state.is_loading {
        writeln!(out, "Loading...")?;
    }
    if state.has_error() {
        writeln!(out, "! {}", state.error_message)?;
    }

    if state.stories.is_empty() {
        if !state.is_loading && !state.has_error() {
            writeln!(out, "No stories found.")?;
        }
    } else {
        let offset = u64::from(state.current_page.saturating_sub(1)) * u64::from(state.page_size);
        for (index, story) in state.stories.iter().enumerate() {
            writeln!(out, "{:>4}. {}", offset + index as u64 + 1, story.title)?;
            if !story.url.is_empty() {
                writeln!(out, "      {}", story.url)?;
            }
        }
    }

    if state.total_pages > 0 {
        writeln!(out)?;
        writeln!(out, "{}", pagination_line(state))?;
    }
    out.flush()
}

fn pagination_line(state: &ViewState) -> String {
    let mut parts = Vec::new();
    if state.current_page > 1 {
        parts.push("<".to_string());
    }
    for page in page_window(state.current_page, state.total_pages, PAGE_LINKS) {
        if page == state.current_page {
            parts.push(format!("[{page}]"));
        } else {
            parts.push(page.to_string());
        }
    }
    if state.current_page < state.total_pages {
        parts.push(">".to_string());
    }
    format!(
        "Page {} of {}   {}",
        state.current_page,
        state.total_pages,
        parts.join(" ")
    )
}

#[cfg(test)]
mod tests {
    use shared::domain::{Story, StoryId};

    use super::*;

    fn rendered(state: &ViewState) -> String {
        let mut out = Vec::new();
        render(state, &mut out).expect("render");
        String::from_utf8(out).expect("utf8")
    }

    fn state_with_stories() -> ViewState {
        let mut state = ViewState::default();
        state.stories = vec![
            Story {
                id: StoryId(1),
                title: "Test Story 1".into(),
                url: "http://www.teststory1.com".into(),
            },
            Story {
                id: StoryId(2),
                title: "Test Story 2".into(),
                url: String::new(),
            },
        ];
        state.current_page = 2;
        state.total_pages = 3;
        state
    }

    #[test]
    fn numbers_stories_across_pages() {
        let text = rendered(&state_with_stories());
        assert!(text.contains("  21. Test Story 1"));
        assert!(text.contains("      http://www.teststory1.com"));
        assert!(text.contains("  22. Test Story 2"));
    }

    #[test]
    fn marks_current_page_in_footer() {
        let text = rendered(&state_with_stories());
        assert!(text.contains("Page 2 of 3   < 1 [2] 3 >"));
    }

    #[test]
    fn shows_loading_and_error_lines() {
        let mut state = state_with_stories();
        state.is_loading = true;
        state.error_message = "Error fetching data".into();
        let text = rendered(&state);
        assert!(text.contains("Loading..."));
        assert!(text.contains("! Error fetching data"));
    }

    #[test]
    fn empty_result_says_so_and_hides_footer() {
        let mut state = ViewState::default();
        state.search_query = "nothing matches".into();
        let text = rendered(&state);
        assert!(text.contains("search: \"nothing matches\""));
        assert!(text.contains("No stories found."));
        assert!(!text.contains("Page "));
    }
}
