//! Line-oriented user commands.

pub const HELP: &str = "\
commands:
  n, next            next page
  p, prev            previous page
  g <n>, page <n>    jump to page n
  /<text>            search titles (empty clears the search)
  search <text>      same as /<text>
  r, refresh         reload the current page
  h, help            show this help
  q, quit            exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    GoTo(u32),
    Search(String),
    Refresh,
    Redraw,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return Self::Redraw;
        }
        if let Some(query) = input.strip_prefix('/') {
            return Self::Search(query.trim().to_string());
        }

        let (verb, rest) = match input.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (input, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "n" | "next" if rest.is_empty() => Self::Next,
            "p" | "prev" | "previous" if rest.is_empty() => Self::Previous,
            "g" | "page" | "goto" => match rest.parse::<u32>() {
                Ok(page) => Self::GoTo(page),
                Err(_) => Self::Unknown(input.to_string()),
            },
            "search" | "s" => Self::Search(rest.to_string()),
            "r" | "refresh" if rest.is_empty() => Self::Refresh,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(input.to_string()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Next => "next_page",
            Self::Previous => "previous_page",
            Self::GoTo(_) => "go_to_page",
            Self::Search(_) => "search",
            Self::Refresh => "refresh",
            Self::Redraw => "redraw",
            Self::Help => "help",
            Self::Quit => "quit",
            Self::Unknown(_) => "unknown",
        }
    }
}
