//! Command family registry
//!
//! Families are tried top to bottom and the first one that produces an
//! intent wins. Several families share trigger words, so the order below is
//! part of the behavior:
//!
//! - "open" triggers both `openTab` and `navigate`. `openTab` comes first, so
//!   "open X" always opens a new tab; `navigate` is reached only through
//!   "go to", "navigate to" and "visit".
//! - `search` tries its YouTube rule before the generic one, so "search
//!   youtube for cats" searches YouTube rather than Google.
//! - `reloadTab` fires on "reload"/"refresh" anywhere in the utterance.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::intent::{
    BookmarkAction, Command, DEFAULT_SCROLL_AMOUNT, Intent, ScrollDirection, SearchEngine,
    TabDirection, WindowAction,
};
use crate::selector::element_to_selector;
use crate::url::normalize_url;

/// One command family and its matching rule
pub struct CommandFamily {
    pub command: Command,
    /// Trigger words, for help output
    pub keywords: &'static [&'static str],
    /// Sample utterances, for help output
    pub examples: &'static [&'static str],
    rule: fn(&str) -> Option<Intent>,
}

impl CommandFamily {
    /// Apply this family's rules to an already normalized transcript
    pub fn try_match(&self, normalized: &str) -> Option<Intent> {
        (self.rule)(normalized)
    }
}

/// All families in evaluation order
pub static REGISTRY: [CommandFamily; 11] = [
    CommandFamily {
        command: Command::OpenTab,
        keywords: &["open", "new tab", "create tab", "launch"],
        examples: &["open youtube", "new tab for github", "launch docs.rs"],
        rule: match_open_tab,
    },
    CommandFamily {
        command: Command::CloseTab,
        keywords: &["close tab", "close this tab", "close current tab"],
        examples: &["close this tab"],
        rule: match_close_tab,
    },
    CommandFamily {
        command: Command::SwitchTab,
        keywords: &["switch tab", "next tab", "previous tab", "change tab"],
        examples: &["next tab", "switch to previous tab"],
        rule: match_switch_tab,
    },
    CommandFamily {
        command: Command::ReloadTab,
        keywords: &["reload", "refresh", "reload tab", "refresh page"],
        examples: &["reload", "refresh this page"],
        rule: match_reload_tab,
    },
    CommandFamily {
        command: Command::Navigate,
        keywords: &["go to", "navigate to", "visit", "open"],
        examples: &["go to github", "visit example.com"],
        rule: match_navigate,
    },
    CommandFamily {
        command: Command::Search,
        keywords: &["search", "search for", "google", "youtube"],
        examples: &["search for rust lifetimes", "search youtube for cats"],
        rule: match_search,
    },
    CommandFamily {
        command: Command::Scroll,
        keywords: &["scroll", "scroll down", "scroll up"],
        examples: &["scroll down", "scroll up"],
        rule: match_scroll,
    },
    CommandFamily {
        command: Command::Click,
        keywords: &["click", "press", "select"],
        examples: &["click the sign in button", "press the pricing link"],
        rule: match_click,
    },
    CommandFamily {
        command: Command::Fill,
        keywords: &["fill", "type", "enter", "input"],
        examples: &["fill in the email field with me@example.com"],
        rule: match_fill,
    },
    CommandFamily {
        command: Command::Bookmark,
        keywords: &["bookmark", "save bookmark", "add bookmark"],
        examples: &["add bookmark", "remove this bookmark"],
        rule: match_bookmark,
    },
    CommandFamily {
        command: Command::Window,
        keywords: &["minimize", "maximize", "minimize window", "maximize window"],
        examples: &["minimize window", "maximize"],
        rule: match_window,
    },
];

static PATTERNS: LazyLock<Patterns> = LazyLock::new(Patterns::new);

struct Patterns {
    open_tab: Regex,
    close_tab: Regex,
    next_tab: Regex,
    previous_tab: Regex,
    reload_tab: Regex,
    navigate: Regex,
    search_youtube: Regex,
    search_google: Regex,
    scroll_down: Regex,
    scroll_up: Regex,
    click: Regex,
    fill: Regex,
    bookmark_add: Regex,
    bookmark_remove: Regex,
    minimize: Regex,
    maximize: Regex,
}

impl Patterns {
    fn new() -> Self {
        let re = |pattern: &str| Regex::new(pattern).expect("static regex must compile");
        Self {
            open_tab: re(
                r"(?i)(?:open|new tab|create tab|launch)\s+(?:a\s+)?(?:new\s+)?(?:tab\s+)?(?:for\s+)?(.+)",
            ),
            close_tab: re(r"(?i)close\s+(?:this\s+)?(?:current\s+)?tab"),
            next_tab: re(r"(?i)(?:switch\s+to\s+)?(?:next|right)\s+tab"),
            previous_tab: re(r"(?i)(?:switch\s+to\s+)?(?:previous|prev|left)\s+tab"),
            reload_tab: re(r"(?i)(?:reload|refresh)(?:\s+(?:this\s+)?(?:tab|page))?"),
            navigate: re(r"(?i)(?:go\s+to|navigate\s+to|visit|open)\s+(.+)"),
            search_youtube: re(r"(?i)(?:youtube|search\s+youtube\s+for)\s+(.+)"),
            search_google: re(r"(?i)(?:search\s+(?:for\s+)?|google\s+)(.+)"),
            scroll_down: re(r"(?i)scroll\s+(?:down|bottom)"),
            scroll_up: re(r"(?i)scroll\s+(?:up|top)"),
            click: re(r"(?i)(?:click|press|select)\s+(?:on\s+)?(?:the\s+)?(.+)"),
            // Lazy field group so the value takes everything after "with"/"as"
            fill: re(
                r"(?i)(?:fill|type|enter|input)\s+(?:in\s+)?(?:the\s+)?(.+?)\s+(?:with|as)\s+(.+)",
            ),
            bookmark_add: re(r"(?i)(?:add|save|create)\s+(?:a\s+)?bookmark"),
            bookmark_remove: re(r"(?i)(?:remove|delete)\s+(?:this\s+)?bookmark"),
            minimize: re(r"(?i)minimize(?:\s+(?:the\s+)?(?:window|browser))?"),
            maximize: re(r"(?i)maximize(?:\s+(?:the\s+)?(?:window|browser))?"),
        }
    }
}

/// Trimmed capture group, `None` when absent or blank
fn group(caps: &Captures<'_>, index: usize) -> Option<String> {
    let text = caps.get(index)?.as_str().trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// First capture group of `re` in `text`, trimmed and non-blank
fn capture(re: &Regex, text: &str) -> Option<String> {
    group(&re.captures(text)?, 1)
}

fn match_open_tab(text: &str) -> Option<Intent> {
    let target = capture(&PATTERNS.open_tab, text)?;
    Some(Intent::OpenTab {
        url: normalize_url(&target),
    })
}

fn match_close_tab(text: &str) -> Option<Intent> {
    PATTERNS.close_tab.is_match(text).then_some(Intent::CloseTab)
}

fn match_switch_tab(text: &str) -> Option<Intent> {
    let direction = if PATTERNS.next_tab.is_match(text) {
        TabDirection::Next
    } else if PATTERNS.previous_tab.is_match(text) {
        TabDirection::Previous
    } else {
        return None;
    };
    Some(Intent::SwitchTab { direction })
}

fn match_reload_tab(text: &str) -> Option<Intent> {
    PATTERNS.reload_tab.is_match(text).then_some(Intent::ReloadTab)
}

fn match_navigate(text: &str) -> Option<Intent> {
    let target = capture(&PATTERNS.navigate, text)?;
    Some(Intent::Navigate {
        url: normalize_url(&target),
    })
}

fn match_search(text: &str) -> Option<Intent> {
    if let Some(query) = capture(&PATTERNS.search_youtube, text) {
        return Some(Intent::Search {
            query,
            engine: SearchEngine::YouTube,
        });
    }
    let query = capture(&PATTERNS.search_google, text)?;
    Some(Intent::Search {
        query,
        engine: SearchEngine::Google,
    })
}

fn match_scroll(text: &str) -> Option<Intent> {
    let direction = if PATTERNS.scroll_down.is_match(text) {
        ScrollDirection::Down
    } else if PATTERNS.scroll_up.is_match(text) {
        ScrollDirection::Up
    } else {
        return None;
    };
    Some(Intent::Scroll {
        direction,
        amount: DEFAULT_SCROLL_AMOUNT,
    })
}

fn match_click(text: &str) -> Option<Intent> {
    let element = capture(&PATTERNS.click, text)?;
    Some(Intent::Click {
        selector: element_to_selector(&element),
    })
}

fn match_fill(text: &str) -> Option<Intent> {
    let caps = PATTERNS.fill.captures(text)?;
    let field = group(&caps, 1)?;
    let value = group(&caps, 2)?;
    Some(Intent::Fill {
        selector: element_to_selector(&field),
        value,
    })
}

fn match_bookmark(text: &str) -> Option<Intent> {
    let action = if PATTERNS.bookmark_add.is_match(text) {
        BookmarkAction::Add
    } else if PATTERNS.bookmark_remove.is_match(text) {
        BookmarkAction::Remove
    } else {
        return None;
    };
    Some(Intent::Bookmark { action })
}

fn match_window(text: &str) -> Option<Intent> {
    let action = if PATTERNS.minimize.is_match(text) {
        WindowAction::Minimize
    } else if PATTERNS.maximize.is_match(text) {
        WindowAction::Maximize
    } else {
        return None;
    };
    Some(Intent::Window { action })
}

/// Look up a family by command
pub fn family(command: Command) -> &'static CommandFamily {
    // Command variants are declared in registry order
    &REGISTRY[command as usize]
}

/// Human readable listing of every family, in evaluation order
pub fn help_text() -> String {
    let mut out = String::from("Voice commands (checked in this order):\n");
    for family in &REGISTRY {
        out.push_str(&format!(
            "  {:<10} triggers: {}\n",
            family.command.name(),
            family.keywords.join(", ")
        ));
        for example in family.examples {
            out.push_str(&format!("  {:<10}   e.g. \"{}\"\n", "", example));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_order() {
        let order: Vec<Command> = REGISTRY.iter().map(|f| f.command).collect();
        assert_eq!(order, Command::ALL.to_vec());
    }

    #[test]
    fn test_open_and_navigate_overlap() {
        // Both families accept "open X"; only the order decides
        let text = "open example.com";
        assert!(family(Command::OpenTab).try_match(text).is_some());
        assert_eq!(
            family(Command::Navigate).try_match(text),
            Some(Intent::Navigate {
                url: "https://example.com".to_string()
            })
        );
    }

    #[test]
    fn test_switch_sub_order() {
        // Both sub-patterns fire; "next" is checked first
        assert_eq!(
            match_switch_tab("next tab or previous tab"),
            Some(Intent::SwitchTab {
                direction: TabDirection::Next
            })
        );
    }

    #[test]
    fn test_fill_lazy_field() {
        assert_eq!(
            match_fill("type the name as john with a smile"),
            Some(Intent::Fill {
                selector: "name".to_string(),
                value: "john with a smile".to_string(),
            })
        );
    }

    #[test]
    fn test_blank_capture_is_no_match() {
        let re = Regex::new(r"say(.*)").unwrap();
        assert_eq!(capture(&re, "say   "), None);
        assert_eq!(capture(&re, "say hi "), Some("hi".to_string()));
    }

    #[test]
    fn test_window_bare_word() {
        assert_eq!(
            match_window("maximize"),
            Some(Intent::Window {
                action: WindowAction::Maximize
            })
        );
        assert_eq!(
            match_window("minimize the browser"),
            Some(Intent::Window {
                action: WindowAction::Minimize
            })
        );
    }

    #[test]
    fn test_help_lists_every_family() {
        let help = help_text();
        for command in Command::ALL {
            assert!(help.contains(command.name()), "missing {}", command);
        }
    }
}
