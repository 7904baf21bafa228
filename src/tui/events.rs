// SPDX-FileCopyrightText: 2026 The dtree Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEventKind};

use crate::command::Command;

/// Bounded wait for one keypress. Returns `None` when the tick elapses with
/// no input, on non-key events (resize, focus), and on unbound keys; the
/// caller just loops and redraws.
pub fn next_command(tick: Duration) -> io::Result<Option<Command>> {
    if !event::poll(tick)? {
        return Ok(None);
    }
    match event::read()? {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(map_key(key.code)),
        _ => Ok(None),
    }
}

/// vi-style bindings, plus the arrow keys as aliases.
pub fn map_key(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Char('j') | KeyCode::Down => Some(Command::MoveDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Command::MoveUp),
        KeyCode::Char(' ') => Some(Command::ToggleExpand),
        KeyCode::Enter => Some(Command::Commit),
        KeyCode::Char('q') => Some(Command::Quit),
        _ => None,
    }
}
