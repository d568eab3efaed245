//! Key dispatch: maps `(mode, key)` to a session command.
//!
//! Dispatch is total. Every key event in every mode yields exactly one
//! [`SessionCommand`]; anything unbound is [`SessionCommand::NoOp`]. The same
//! holds for the one-line command prompt ([`Keymap::dispatch_prompt`]).

use crate::state::{Mode, PromptKind};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use locus_core::config::KeyConfig;
use std::fmt;
use std::str::FromStr;

/// Edit applied to the query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryEdit {
    Insert(char),
    Backspace,
    Clear,
}

/// Everything a key press can ask the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    EnterSearch,
    ConfirmSearch,
    CancelSearch,
    EditQuery(QueryEdit),
    MoveSelection(isize),
    SelectFirst,
    SelectLast,
    ActivateSelection,
    CopySelection,
    PrintSelection,
    HideSelectionDir,
    UndoHide,
    StartPrompt(PromptKind),
    EditPrompt(QueryEdit),
    SubmitPrompt,
    CancelPrompt,
    Quit,
    NoOp,
}

/// One footer hint: the first key bound to an action, and what it does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyHint {
    pub key: String,
    pub label: &'static str,
}

/// One key chord, e.g. `ctrl-c` or `G`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// A binding that would otherwise type a character into the query.
    pub fn is_text(&self) -> bool {
        matches!(self.code, KeyCode::Char(_)) && (self.modifiers - KeyModifiers::SHIFT).is_empty()
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        if self.code != key.code {
            return false;
        }
        // Terminals disagree on whether `G` carries SHIFT; the char already
        // says it.
        match key.code {
            KeyCode::Char(_) => {
                (self.modifiers - KeyModifiers::SHIFT) == (key.modifiers - KeyModifiers::SHIFT)
            }
            _ => self.modifiers == key.modifiers,
        }
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("ctrl-")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("alt-")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) && !matches!(self.code, KeyCode::Char(_)) {
            f.write_str("shift-")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::F(n) => write!(f, "f{n}"),
            KeyCode::Enter => f.write_str("enter"),
            KeyCode::Esc => f.write_str("esc"),
            KeyCode::Backspace => f.write_str("backspace"),
            KeyCode::Tab => f.write_str("tab"),
            KeyCode::Up => f.write_str("up"),
            KeyCode::Down => f.write_str("down"),
            KeyCode::Left => f.write_str("left"),
            KeyCode::Right => f.write_str("right"),
            KeyCode::Home => f.write_str("home"),
            KeyCode::End => f.write_str("end"),
            KeyCode::PageUp => f.write_str("pageup"),
            KeyCode::PageDown => f.write_str("pagedown"),
            KeyCode::Delete => f.write_str("delete"),
            KeyCode::Insert => f.write_str("insert"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Error for a key string that doesn't name a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKeyError(pub String);

impl fmt::Display for ParseKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized key '{}'", self.0)
    }
}

impl std::error::Error for ParseKeyError {}

impl FromStr for KeyBinding {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseKeyError(s.to_string());
        if s.is_empty() {
            return Err(err());
        }

        // A literal `-` is a key; otherwise `-` separates modifiers.
        let (mods, key) = match s.rsplit_once('-') {
            Some((mods, "")) if mods.len() > 1 && mods.ends_with('-') => {
                (Some(&mods[..mods.len() - 1]), "-")
            }
            Some((mods, key)) if !mods.is_empty() => (Some(mods), key),
            _ => (None, s),
        };

        let mut modifiers = KeyModifiers::NONE;
        for m in mods.into_iter().flat_map(|m| m.split('-')) {
            modifiers |= match m.to_ascii_lowercase().as_str() {
                "ctrl" | "c" => KeyModifiers::CONTROL,
                "alt" | "a" | "meta" | "m" => KeyModifiers::ALT,
                "shift" | "s" => KeyModifiers::SHIFT,
                _ => return Err(err()),
            };
        }

        let mut chars = key.chars();
        let code = match (chars.next(), chars.next()) {
            (Some(c), None) => KeyCode::Char(c),
            _ => match key.to_ascii_lowercase().as_str() {
                "enter" | "return" | "cr" => KeyCode::Enter,
                "esc" | "escape" => KeyCode::Esc,
                "backspace" | "bs" => KeyCode::Backspace,
                "tab" => KeyCode::Tab,
                "space" => KeyCode::Char(' '),
                "up" => KeyCode::Up,
                "down" => KeyCode::Down,
                "left" => KeyCode::Left,
                "right" => KeyCode::Right,
                "home" => KeyCode::Home,
                "end" => KeyCode::End,
                "pageup" | "pgup" => KeyCode::PageUp,
                "pagedown" | "pgdn" => KeyCode::PageDown,
                "delete" | "del" => KeyCode::Delete,
                "insert" | "ins" => KeyCode::Insert,
                f if f.starts_with('f') => f[1..]
                    .parse::<u8>()
                    .ok()
                    .filter(|n| (1..=24).contains(n))
                    .map(KeyCode::F)
                    .ok_or_else(err)?,
                _ => return Err(err()),
            },
        };

        Ok(Self { code, modifiers })
    }
}

fn parse_all(name: &str, keys: &[String]) -> Result<Vec<KeyBinding>, locus_core::Error> {
    keys.iter()
        .map(|k| {
            k.parse()
                .map_err(|e: ParseKeyError| locus_core::Error::Config(format!("keys.{name}: {e}")))
        })
        .collect()
}

fn any(bindings: &[KeyBinding], key: &KeyEvent) -> bool {
    bindings.iter().any(|b| b.matches(key))
}

/// In Search mode, plain characters are typed, never commands.
fn any_non_text(bindings: &[KeyBinding], key: &KeyEvent) -> bool {
    bindings.iter().any(|b| !b.is_text() && b.matches(key))
}

/// Resolved key bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    pub enter_search: Vec<KeyBinding>,
    pub confirm: Vec<KeyBinding>,
    pub cancel: Vec<KeyBinding>,
    pub up: Vec<KeyBinding>,
    pub down: Vec<KeyBinding>,
    pub top: Vec<KeyBinding>,
    pub bottom: Vec<KeyBinding>,
    pub activate: Vec<KeyBinding>,
    pub copy: Vec<KeyBinding>,
    pub print: Vec<KeyBinding>,
    pub hide_dir: Vec<KeyBinding>,
    pub undo_hide: Vec<KeyBinding>,
    pub clear_query: Vec<KeyBinding>,
    pub open_with: Vec<KeyBinding>,
    pub pipe_filter: Vec<KeyBinding>,
    pub scope_dir: Vec<KeyBinding>,
    pub hide_path: Vec<KeyBinding>,
    pub quit: Vec<KeyBinding>,
}

impl Keymap {
    pub fn from_config(keys: &KeyConfig) -> locus_core::Result<Self> {
        Ok(Self {
            enter_search: parse_all("enter_search", &keys.enter_search)?,
            confirm: parse_all("confirm", &keys.confirm)?,
            cancel: parse_all("cancel", &keys.cancel)?,
            up: parse_all("up", &keys.up)?,
            down: parse_all("down", &keys.down)?,
            top: parse_all("top", &keys.top)?,
            bottom: parse_all("bottom", &keys.bottom)?,
            activate: parse_all("activate", &keys.activate)?,
            copy: parse_all("copy", &keys.copy)?,
            print: parse_all("print", &keys.print)?,
            hide_dir: parse_all("hide_dir", &keys.hide_dir)?,
            undo_hide: parse_all("undo_hide", &keys.undo_hide)?,
            clear_query: parse_all("clear_query", &keys.clear_query)?,
            open_with: parse_all("open_with", &keys.open_with)?,
            pipe_filter: parse_all("pipe_filter", &keys.pipe_filter)?,
            scope_dir: parse_all("scope_dir", &keys.scope_dir)?,
            hide_path: parse_all("hide_path", &keys.hide_path)?,
            quit: parse_all("quit", &keys.quit)?,
        })
    }

    /// Map a key event to a command for `mode`.
    pub fn dispatch(&self, mode: Mode, key: &KeyEvent) -> SessionCommand {
        if key.kind == KeyEventKind::Release {
            return SessionCommand::NoOp;
        }

        match mode {
            Mode::Normal => self.dispatch_normal(key),
            Mode::Search => self.dispatch_search(key),
        }
    }

    fn dispatch_normal(&self, key: &KeyEvent) -> SessionCommand {
        let table: [(&[KeyBinding], SessionCommand); 15] = [
            (self.quit.as_slice(), SessionCommand::Quit),
            (self.enter_search.as_slice(), SessionCommand::EnterSearch),
            (self.activate.as_slice(), SessionCommand::ActivateSelection),
            (self.down.as_slice(), SessionCommand::MoveSelection(1)),
            (self.up.as_slice(), SessionCommand::MoveSelection(-1)),
            (self.top.as_slice(), SessionCommand::SelectFirst),
            (self.bottom.as_slice(), SessionCommand::SelectLast),
            (self.copy.as_slice(), SessionCommand::CopySelection),
            (self.print.as_slice(), SessionCommand::PrintSelection),
            (self.hide_dir.as_slice(), SessionCommand::HideSelectionDir),
            (self.undo_hide.as_slice(), SessionCommand::UndoHide),
            (
                self.open_with.as_slice(),
                SessionCommand::StartPrompt(PromptKind::OpenWith),
            ),
            (
                self.pipe_filter.as_slice(),
                SessionCommand::StartPrompt(PromptKind::PipeFilter),
            ),
            (
                self.scope_dir.as_slice(),
                SessionCommand::StartPrompt(PromptKind::ScopeDir),
            ),
            (
                self.hide_path.as_slice(),
                SessionCommand::StartPrompt(PromptKind::HidePath),
            ),
        ];

        table
            .into_iter()
            .find(|(bindings, _)| any(bindings, key))
            .map(|(_, command)| command)
            .unwrap_or(SessionCommand::NoOp)
    }

    fn dispatch_search(&self, key: &KeyEvent) -> SessionCommand {
        let table: [(&[KeyBinding], SessionCommand); 6] = [
            (self.quit.as_slice(), SessionCommand::Quit),
            (self.confirm.as_slice(), SessionCommand::ConfirmSearch),
            (self.cancel.as_slice(), SessionCommand::CancelSearch),
            (self.clear_query.as_slice(), SessionCommand::EditQuery(QueryEdit::Clear)),
            (self.down.as_slice(), SessionCommand::MoveSelection(1)),
            (self.up.as_slice(), SessionCommand::MoveSelection(-1)),
        ];

        if let Some((_, command)) = table
            .into_iter()
            .find(|(bindings, _)| any_non_text(bindings, key))
        {
            return command;
        }

        text_edit(key).map_or(SessionCommand::NoOp, SessionCommand::EditQuery)
    }

    /// Map a key event while a command prompt is open. Confirm runs the
    /// prompt, cancel closes it, everything typeable edits it.
    pub fn dispatch_prompt(&self, key: &KeyEvent) -> SessionCommand {
        if key.kind == KeyEventKind::Release {
            return SessionCommand::NoOp;
        }

        let table: [(&[KeyBinding], SessionCommand); 4] = [
            (self.quit.as_slice(), SessionCommand::Quit),
            (self.confirm.as_slice(), SessionCommand::SubmitPrompt),
            (self.cancel.as_slice(), SessionCommand::CancelPrompt),
            (
                self.clear_query.as_slice(),
                SessionCommand::EditPrompt(QueryEdit::Clear),
            ),
        ];

        if let Some((_, command)) = table
            .into_iter()
            .find(|(bindings, _)| any_non_text(bindings, key))
        {
            return command;
        }

        text_edit(key).map_or(SessionCommand::NoOp, SessionCommand::EditPrompt)
    }

    /// Footer hints for the current input context, most important first.
    /// The quit hint is always last.
    pub fn hints(&self, mode: Mode, prompting: bool) -> Vec<KeyHint> {
        let entries: Vec<(&[KeyBinding], &'static str)> = match (prompting, mode) {
            (true, _) => vec![
                (self.confirm.as_slice(), "run"),
                (self.cancel.as_slice(), "cancel"),
                (self.clear_query.as_slice(), "clear"),
            ],
            (false, Mode::Normal) => vec![
                (self.enter_search.as_slice(), "search"),
                (self.down.as_slice(), "down"),
                (self.up.as_slice(), "up"),
                (self.activate.as_slice(), "open"),
                (self.copy.as_slice(), "copy"),
                (self.print.as_slice(), "print"),
                (self.pipe_filter.as_slice(), "filter"),
                (self.open_with.as_slice(), "open with"),
                (self.hide_dir.as_slice(), "hide dir"),
                (self.undo_hide.as_slice(), "undo"),
                (self.scope_dir.as_slice(), "only under"),
                (self.hide_path.as_slice(), "hide path"),
                (self.top.as_slice(), "top"),
                (self.bottom.as_slice(), "bottom"),
            ],
            (false, Mode::Search) => vec![
                (self.confirm.as_slice(), "confirm"),
                (self.cancel.as_slice(), "cancel"),
                (self.clear_query.as_slice(), "clear"),
            ],
        };

        // Plain-character quit keys are typed while editing text.
        let quit_key = if prompting || mode == Mode::Search {
            self.quit.iter().find(|b| !b.is_text())
        } else {
            self.quit.first()
        };

        entries
            .into_iter()
            .filter_map(|(bindings, label)| {
                bindings.first().map(|b| KeyHint {
                    key: b.to_string(),
                    label,
                })
            })
            .chain(quit_key.map(|b| KeyHint {
                key: b.to_string(),
                label: "quit",
            }))
            .collect()
    }
}

fn text_edit(key: &KeyEvent) -> Option<QueryEdit> {
    match key.code {
        KeyCode::Char(c) if (key.modifiers - KeyModifiers::SHIFT).is_empty() && !c.is_control() => {
            Some(QueryEdit::Insert(c))
        }
        KeyCode::Backspace if key.modifiers.is_empty() => Some(QueryEdit::Backspace),
        _ => None,
    }
}

impl Default for Keymap {
    fn default() -> Self {
        match Self::from_config(&KeyConfig::default()) {
            Ok(keymap) => keymap,
            Err(e) => unreachable!("built-in key bindings must parse: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn chord(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    /// Every key code/modifier combination worth generating.
    fn all_keys() -> Vec<KeyEvent> {
        let mut codes: Vec<KeyCode> = (0x20u8..0x7f).map(|b| KeyCode::Char(b as char)).collect();
        codes.extend(['é', 'ß', '中', '\u{7}'].map(KeyCode::Char));
        codes.extend((1..=12).map(KeyCode::F));
        codes.extend([
            KeyCode::Backspace,
            KeyCode::Enter,
            KeyCode::Left,
            KeyCode::Right,
            KeyCode::Up,
            KeyCode::Down,
            KeyCode::Home,
            KeyCode::End,
            KeyCode::PageUp,
            KeyCode::PageDown,
            KeyCode::Tab,
            KeyCode::BackTab,
            KeyCode::Delete,
            KeyCode::Insert,
            KeyCode::Null,
            KeyCode::Esc,
            KeyCode::CapsLock,
            KeyCode::Menu,
        ]);

        let mods = [
            KeyModifiers::NONE,
            KeyModifiers::SHIFT,
            KeyModifiers::CONTROL,
            KeyModifiers::ALT,
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        ];

        codes
            .iter()
            .flat_map(|code| mods.iter().map(move |m| chord(*code, *m)))
            .collect()
    }

    #[test]
    fn parses_key_strings() {
        let cases = [
            ("j", KeyCode::Char('j'), KeyModifiers::NONE),
            ("G", KeyCode::Char('G'), KeyModifiers::NONE),
            ("/", KeyCode::Char('/'), KeyModifiers::NONE),
            ("-", KeyCode::Char('-'), KeyModifiers::NONE),
            ("ctrl--", KeyCode::Char('-'), KeyModifiers::CONTROL),
            ("enter", KeyCode::Enter, KeyModifiers::NONE),
            ("Esc", KeyCode::Esc, KeyModifiers::NONE),
            ("ctrl-c", KeyCode::Char('c'), KeyModifiers::CONTROL),
            ("ctrl-alt-x", KeyCode::Char('x'), KeyModifiers::CONTROL | KeyModifiers::ALT),
            ("space", KeyCode::Char(' '), KeyModifiers::NONE),
            ("f5", KeyCode::F(5), KeyModifiers::NONE),
            ("pagedown", KeyCode::PageDown, KeyModifiers::NONE),
        ];
        for (raw, code, modifiers) in cases {
            assert_eq!(
                raw.parse::<KeyBinding>().unwrap(),
                KeyBinding::new(code, modifiers),
                "{raw}"
            );
        }
    }

    #[test]
    fn rejects_unknown_key_strings() {
        for raw in ["", "hyper-x", "f0", "f99", "enterr", "ctrl-"] {
            assert!(raw.parse::<KeyBinding>().is_err(), "{raw}");
        }
    }

    #[test]
    fn bad_config_binding_is_config_error() {
        let mut config = KeyConfig::default();
        config.quit = vec!["ctrl-nope".to_string()];
        match Keymap::from_config(&config) {
            Err(locus_core::Error::Config(msg)) => assert!(msg.contains("keys.quit")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn dispatch_is_total_over_all_keys() {
        let keymap = Keymap::default();
        for mode in Mode::ALL {
            for event in all_keys() {
                // Must not panic; every pair has an answer.
                let _ = keymap.dispatch(mode, &event);
            }
        }
        for event in all_keys() {
            let _ = keymap.dispatch_prompt(&event);
        }
    }

    #[test]
    fn prompt_types_everything_but_its_control_keys() {
        let keymap = Keymap::default();
        for c in ['q', 'f', 'o', '|', ' ', 'G'] {
            assert_eq!(
                keymap.dispatch_prompt(&key(KeyCode::Char(c))),
                SessionCommand::EditPrompt(QueryEdit::Insert(c))
            );
        }
        assert_eq!(
            keymap.dispatch_prompt(&key(KeyCode::Enter)),
            SessionCommand::SubmitPrompt
        );
        assert_eq!(
            keymap.dispatch_prompt(&key(KeyCode::Esc)),
            SessionCommand::CancelPrompt
        );
        assert_eq!(
            keymap.dispatch_prompt(&key(KeyCode::Backspace)),
            SessionCommand::EditPrompt(QueryEdit::Backspace)
        );
        assert_eq!(
            keymap.dispatch_prompt(&chord(KeyCode::Char('u'), KeyModifiers::CONTROL)),
            SessionCommand::EditPrompt(QueryEdit::Clear)
        );
        assert_eq!(
            keymap.dispatch_prompt(&key(KeyCode::Down)),
            SessionCommand::NoOp
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        for raw in ["j", "G", "enter", "esc", "ctrl-c", "alt-x", "f5", "space", "pagedown", "-"] {
            let binding: KeyBinding = raw.parse().unwrap();
            assert_eq!(binding.to_string(), raw);
            assert_eq!(binding.to_string().parse::<KeyBinding>().unwrap(), binding);
        }
    }

    #[test]
    fn hints_follow_configured_keys_and_end_with_quit() {
        let mut config = KeyConfig::default();
        config.quit = vec!["x".to_string(), "ctrl-q".to_string()];
        config.enter_search = vec!["s".to_string()];
        let keymap = Keymap::from_config(&config).unwrap();

        let normal = keymap.hints(Mode::Normal, false);
        assert_eq!(normal[0], KeyHint { key: "s".to_string(), label: "search" });
        assert_eq!(
            normal.last(),
            Some(&KeyHint { key: "x".to_string(), label: "quit" })
        );

        // Typed contexts advertise a quit key that isn't a plain character.
        let search = keymap.hints(Mode::Search, false);
        assert_eq!(search.last().map(|h| h.key.as_str()), Some("ctrl-q"));
        let prompt = keymap.hints(Mode::Normal, true);
        assert_eq!(prompt[0].label, "run");
        assert_eq!(prompt.last().map(|h| h.key.as_str()), Some("ctrl-q"));
    }

    #[test]
    fn every_configured_binding_maps_to_its_command() {
        let keymap = Keymap::default();
        let normal = [
            (&keymap.enter_search, SessionCommand::EnterSearch),
            (&keymap.down, SessionCommand::MoveSelection(1)),
            (&keymap.up, SessionCommand::MoveSelection(-1)),
            (&keymap.top, SessionCommand::SelectFirst),
            (&keymap.bottom, SessionCommand::SelectLast),
            (&keymap.activate, SessionCommand::ActivateSelection),
            (&keymap.copy, SessionCommand::CopySelection),
            (&keymap.print, SessionCommand::PrintSelection),
            (&keymap.hide_dir, SessionCommand::HideSelectionDir),
            (&keymap.undo_hide, SessionCommand::UndoHide),
            (
                &keymap.open_with,
                SessionCommand::StartPrompt(PromptKind::OpenWith),
            ),
            (
                &keymap.pipe_filter,
                SessionCommand::StartPrompt(PromptKind::PipeFilter),
            ),
            (
                &keymap.scope_dir,
                SessionCommand::StartPrompt(PromptKind::ScopeDir),
            ),
            (
                &keymap.hide_path,
                SessionCommand::StartPrompt(PromptKind::HidePath),
            ),
            (&keymap.quit, SessionCommand::Quit),
        ];
        for (bindings, expected) in normal {
            for b in bindings {
                let event = chord(b.code, b.modifiers);
                assert_eq!(keymap.dispatch(Mode::Normal, &event), expected, "{b:?}");
            }
        }

        let search = [
            (&keymap.confirm, SessionCommand::ConfirmSearch),
            (&keymap.cancel, SessionCommand::CancelSearch),
            (&keymap.clear_query, SessionCommand::EditQuery(QueryEdit::Clear)),
        ];
        for (bindings, expected) in search {
            for b in bindings {
                let event = chord(b.code, b.modifiers);
                assert_eq!(keymap.dispatch(Mode::Search, &event), expected, "{b:?}");
            }
        }
    }

    #[test]
    fn search_mode_types_bound_letters() {
        let keymap = Keymap::default();
        for c in ['j', 'k', 'q', '/', 'G', 'p'] {
            assert_eq!(
                keymap.dispatch(Mode::Search, &key(KeyCode::Char(c))),
                SessionCommand::EditQuery(QueryEdit::Insert(c))
            );
        }
        assert_eq!(
            keymap.dispatch(Mode::Search, &key(KeyCode::Backspace)),
            SessionCommand::EditQuery(QueryEdit::Backspace)
        );
    }

    #[test]
    fn search_mode_arrows_move_and_ctrl_c_quits() {
        let keymap = Keymap::default();
        assert_eq!(
            keymap.dispatch(Mode::Search, &key(KeyCode::Down)),
            SessionCommand::MoveSelection(1)
        );
        assert_eq!(
            keymap.dispatch(Mode::Search, &key(KeyCode::Up)),
            SessionCommand::MoveSelection(-1)
        );
        assert_eq!(
            keymap.dispatch(
                Mode::Search,
                &chord(KeyCode::Char('c'), KeyModifiers::CONTROL)
            ),
            SessionCommand::Quit
        );
    }

    #[test]
    fn shifted_letter_matches_binding() {
        let keymap = Keymap::default();
        assert_eq!(
            keymap.dispatch(
                Mode::Normal,
                &chord(KeyCode::Char('G'), KeyModifiers::SHIFT)
            ),
            SessionCommand::SelectLast
        );
    }

    #[test]
    fn unbound_and_release_events_are_noops() {
        let keymap = Keymap::default();
        assert_eq!(
            keymap.dispatch(Mode::Normal, &key(KeyCode::F(9))),
            SessionCommand::NoOp
        );
        assert_eq!(
            keymap.dispatch(Mode::Normal, &key(KeyCode::Char('z'))),
            SessionCommand::NoOp
        );
        assert_eq!(
            keymap.dispatch(
                Mode::Search,
                &chord(KeyCode::Char('z'), KeyModifiers::ALT)
            ),
            SessionCommand::NoOp
        );

        let mut release = key(KeyCode::Char('q'));
        release.kind = KeyEventKind::Release;
        assert_eq!(keymap.dispatch(Mode::Normal, &release), SessionCommand::NoOp);
    }
}
