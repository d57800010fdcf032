//! Intent model - what a recognized utterance asks the browser to do
//!
//! `Command` is the closed set of eleven command families. `Intent` carries
//! the typed parameters for one of them. `WireIntent` is the untyped
//! `{command, params}` shape exchanged with an executor host.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::executor::ExecutionError;

/// Scroll distance for every scroll intent; speech never carries an amount
pub const DEFAULT_SCROLL_AMOUNT: u32 = 500;

/// The eleven command families, in registry order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    OpenTab,
    CloseTab,
    SwitchTab,
    ReloadTab,
    Navigate,
    Search,
    Scroll,
    Click,
    Fill,
    Bookmark,
    Window,
}

impl Command {
    pub const ALL: [Command; 11] = [
        Command::OpenTab,
        Command::CloseTab,
        Command::SwitchTab,
        Command::ReloadTab,
        Command::Navigate,
        Command::Search,
        Command::Scroll,
        Command::Click,
        Command::Fill,
        Command::Bookmark,
        Command::Window,
    ];

    /// Wire name used by executor hosts
    pub fn name(self) -> &'static str {
        match self {
            Command::OpenTab => "openTab",
            Command::CloseTab => "closeTab",
            Command::SwitchTab => "switchTab",
            Command::ReloadTab => "reloadTab",
            Command::Navigate => "navigate",
            Command::Search => "search",
            Command::Scroll => "scroll",
            Command::Click => "click",
            Command::Fill => "fill",
            Command::Bookmark => "bookmark",
            Command::Window => "window",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = ExecutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| ExecutionError::UnknownCommand(s.to_string()))
    }
}

macro_rules! param_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

param_enum!(
    /// Tab switching direction
    TabDirection { Next => "next", Previous => "previous" }
);
param_enum!(
    /// Search provider
    SearchEngine { Google => "google", YouTube => "youtube" }
);
param_enum!(
    /// Page scroll direction
    ScrollDirection { Up => "up", Down => "down" }
);
param_enum!(BookmarkAction { Add => "add", Remove => "remove" });
param_enum!(WindowAction { Minimize => "minimize", Maximize => "maximize" });

/// A recognized browser action with its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    OpenTab { url: String },
    CloseTab,
    SwitchTab { direction: TabDirection },
    ReloadTab,
    Navigate { url: String },
    Search { query: String, engine: SearchEngine },
    Scroll { direction: ScrollDirection, amount: u32 },
    Click { selector: String },
    Fill { selector: String, value: String },
    Bookmark { action: BookmarkAction },
    Window { action: WindowAction },
}

impl Intent {
    pub fn command(&self) -> Command {
        match self {
            Intent::OpenTab { .. } => Command::OpenTab,
            Intent::CloseTab => Command::CloseTab,
            Intent::SwitchTab { .. } => Command::SwitchTab,
            Intent::ReloadTab => Command::ReloadTab,
            Intent::Navigate { .. } => Command::Navigate,
            Intent::Search { .. } => Command::Search,
            Intent::Scroll { .. } => Command::Scroll,
            Intent::Click { .. } => Command::Click,
            Intent::Fill { .. } => Command::Fill,
            Intent::Bookmark { .. } => Command::Bookmark,
            Intent::Window { .. } => Command::Window,
        }
    }

    /// Parameters as a name -> string mapping, keyed by wire param name
    pub fn params(&self) -> BTreeMap<String, String> {
        let pairs: Vec<(&str, String)> = match self {
            Intent::OpenTab { url } | Intent::Navigate { url } => vec![("url", url.clone())],
            Intent::CloseTab | Intent::ReloadTab => vec![],
            Intent::SwitchTab { direction } => vec![("direction", direction.to_string())],
            Intent::Search { query, engine } => {
                vec![("query", query.clone()), ("engine", engine.to_string())]
            }
            Intent::Scroll { direction, amount } => {
                vec![("direction", direction.to_string()), ("amount", amount.to_string())]
            }
            Intent::Click { selector } => vec![("selector", selector.clone())],
            Intent::Fill { selector, value } => {
                vec![("selector", selector.clone()), ("value", value.clone())]
            }
            Intent::Bookmark { action } => vec![("action", action.to_string())],
            Intent::Window { action } => vec![("action", action.to_string())],
        };
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    pub fn to_wire(&self) -> WireIntent {
        let mut params: BTreeMap<String, Value> = self
            .params()
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        if let Intent::Scroll { amount, .. } = self {
            params.insert("amount".to_string(), Value::from(*amount));
        }
        WireIntent {
            command: self.command().name().to_string(),
            params,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command())?;
        let params = self.params();
        if !params.is_empty() {
            let rendered: Vec<String> = params
                .iter()
                .map(|(k, v)| format!("{}={:?}", k, v))
                .collect();
            write!(f, " {}", rendered.join(" "))?;
        }
        Ok(())
    }
}

impl Serialize for Intent {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

/// Untyped intent as exchanged with an executor host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireIntent {
    pub command: String,
    #[serde(default)]
    pub params: BTreeMap<String, Value>,
}

impl WireIntent {
    fn text(&self, command: Command, key: &'static str) -> Result<String, ExecutionError> {
        match self.params.get(key) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(other) => Err(ExecutionError::InvalidParam {
                param: key,
                value: other.to_string(),
            }),
            None => Err(ExecutionError::MissingParam {
                command: command.name(),
                param: key,
            }),
        }
    }

    fn choice<T>(
        &self,
        command: Command,
        key: &'static str,
        parse: fn(&str) -> Option<T>,
    ) -> Result<T, ExecutionError> {
        let raw = self.text(command, key)?;
        parse(&raw).ok_or(ExecutionError::InvalidParam { param: key, value: raw })
    }
}

impl TryFrom<WireIntent> for Intent {
    type Error = ExecutionError;

    fn try_from(wire: WireIntent) -> Result<Self, Self::Error> {
        let command: Command = wire.command.parse()?;
        let intent = match command {
            Command::OpenTab => Intent::OpenTab {
                url: wire.text(command, "url")?,
            },
            Command::CloseTab => Intent::CloseTab,
            Command::SwitchTab => Intent::SwitchTab {
                direction: wire.choice(command, "direction", TabDirection::parse)?,
            },
            Command::ReloadTab => Intent::ReloadTab,
            Command::Navigate => Intent::Navigate {
                url: wire.text(command, "url")?,
            },
            Command::Search => Intent::Search {
                query: wire.text(command, "query")?,
                engine: wire.choice(command, "engine", SearchEngine::parse)?,
            },
            Command::Scroll => Intent::Scroll {
                direction: wire.choice(command, "direction", ScrollDirection::parse)?,
                amount: match wire.params.get("amount") {
                    None => DEFAULT_SCROLL_AMOUNT,
                    Some(_) => wire.choice(command, "amount", |s| s.parse::<u32>().ok())?,
                },
            },
            Command::Click => Intent::Click {
                selector: wire.text(command, "selector")?,
            },
            Command::Fill => Intent::Fill {
                selector: wire.text(command, "selector")?,
                value: wire.text(command, "value")?,
            },
            Command::Bookmark => Intent::Bookmark {
                action: wire.choice(command, "action", BookmarkAction::parse)?,
            },
            Command::Window => Intent::Window {
                action: wire.choice(command, "action", WindowAction::parse)?,
            },
        };
        Ok(intent)
    }
}
