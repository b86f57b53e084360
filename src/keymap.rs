//! Form-wide shortcuts
//!
//! One table drives both key dispatch and the status bar help, so the two
//! cannot drift apart. Reset and copy follow the platform convention (Cmd on
//! macOS, Ctrl elsewhere); submit is Ctrl+S everywhere because Cmd+S is
//! usually taken by the terminal emulator.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[cfg(target_os = "macos")]
pub const SHORTCUT_MODIFIER: KeyModifiers = KeyModifiers::SUPER;

#[cfg(not(target_os = "macos"))]
pub const SHORTCUT_MODIFIER: KeyModifiers = KeyModifiers::CONTROL;

#[cfg(target_os = "macos")]
const MODIFIER_LABEL: &str = "Cmd";

#[cfg(not(target_os = "macos"))]
const MODIFIER_LABEL: &str = "Ctrl";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Submit,
    Reset,
    CopyResults,
}

impl Shortcut {
    pub const ALL: [Shortcut; 3] = [Shortcut::Submit, Shortcut::Reset, Shortcut::CopyResults];

    fn key(&self) -> char {
        match self {
            Shortcut::Submit => 's',
            Shortcut::Reset => 'r',
            Shortcut::CopyResults => 'y',
        }
    }

    fn modifier(&self) -> KeyModifiers {
        match self {
            Shortcut::Submit => KeyModifiers::CONTROL,
            Shortcut::Reset | Shortcut::CopyResults => SHORTCUT_MODIFIER,
        }
    }

    /// What the shortcut does, for help text
    pub fn action(&self) -> &'static str {
        match self {
            Shortcut::Submit => "submit",
            Shortcut::Reset => "reset",
            Shortcut::CopyResults => "copy",
        }
    }

    /// Key combination as shown to the user, e.g. "Ctrl+S"
    pub fn label(&self) -> String {
        let modifier = if self.modifier() == KeyModifiers::CONTROL {
            "Ctrl"
        } else {
            MODIFIER_LABEL
        };
        format!("{modifier}+{}", self.key().to_ascii_uppercase())
    }

    /// The shortcut bound to `key`, if any
    pub fn from_key(key: &KeyEvent) -> Option<Shortcut> {
        let KeyCode::Char(c) = key.code else {
            return None;
        };
        let c = c.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|s| s.key() == c && key.modifiers.contains(s.modifier()))
    }

    /// Help line fragment, e.g. "Ctrl+S: submit | Ctrl+R: reset | Ctrl+Y: copy"
    pub fn help() -> String {
        Self::ALL
            .iter()
            .map(|s| format!("{}: {}", s.label(), s.action()))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}
