#![forbid(unsafe_code)]

//! Step scripts for the demo driver.
//!
//! One step per line (or per command-line argument). Blank lines and lines
//! starting with `#` are skipped.
//!
//! ```text
//! activate          # menu: show the dot badge
//! increase          # menu: bump the numeric badge
//! goto third        # navigate (also `goto:third`)
//! next | previous   # move selection by one
//! state             # print the current snapshot
//! detach | attach   # release / re-acquire the store subscription
//! ```

use navbadge_widgets::Destination;

use crate::error::{DemoError, Result};
use crate::screen::MenuAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Menu(MenuAction),
    Goto(Destination),
    Next,
    Previous,
    State,
    Detach,
    Attach,
}

impl Step {
    /// Parse one line. `Ok(None)` for blank lines and comments.
    pub fn parse(text: &str, line: usize) -> Result<Option<Self>> {
        let text = text.split('#').next().unwrap_or_default().trim();
        if text.is_empty() {
            return Ok(None);
        }
        let lowered = text.to_ascii_lowercase();
        let mut words = lowered
            .split(|c: char| c.is_whitespace() || c == ':')
            .filter(|word| !word.is_empty());
        let command = words.next().unwrap_or_default();
        let argument = words.next();
        if words.next().is_some() {
            return Err(DemoError::UnknownStep {
                step: text.to_string(),
                line,
            });
        }

        let step = match (command, argument) {
            ("goto", Some(name)) => Self::Goto(Destination::from_title(name).ok_or_else(
                || DemoError::UnknownDestination {
                    name: name.to_string(),
                    line,
                },
            )?),
            ("next", None) => Self::Next,
            ("previous" | "prev", None) => Self::Previous,
            ("state", None) => Self::State,
            ("detach", None) => Self::Detach,
            ("attach", None) => Self::Attach,
            (id, None) => match MenuAction::from_id(id) {
                Some(action) => Self::Menu(action),
                None => {
                    return Err(DemoError::UnknownStep {
                        step: text.to_string(),
                        line,
                    });
                }
            },
            _ => {
                return Err(DemoError::UnknownStep {
                    step: text.to_string(),
                    line,
                });
            }
        };
        Ok(Some(step))
    }

    /// Short label for output.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Menu(action) => action.id().to_string(),
            Self::Goto(destination) => format!("goto {}", destination.title().to_ascii_lowercase()),
            Self::Next => "next".to_string(),
            Self::Previous => "previous".to_string(),
            Self::State => "state".to_string(),
            Self::Detach => "detach".to_string(),
            Self::Attach => "attach".to_string(),
        }
    }
}

/// Parse every line of `source`, numbering lines from 1.
pub fn parse_script(source: &str) -> Result<Vec<Step>> {
    parse_lines(source.lines())
}

/// Parse one step per item, numbering items from 1.
pub fn parse_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for (i, text) in lines.into_iter().enumerate() {
        if let Some(step) = Step::parse(text, i + 1)? {
            steps.push(step);
        }
    }
    Ok(steps)
}
