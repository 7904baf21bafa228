// SPDX-FileCopyrightText: 2026 The dtree Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use ratatui::backend::Backend;
use ratatui::Terminal;
use tracing::{info, warn};

use crate::command::Command;
use crate::config::Settings;
use crate::tui::events;
use crate::tui::tree::{self, DirNode, Direction};
use crate::tui::view;

/// Well-known hand-off file the shell wrapper reads and removes.
pub const COMMIT_FILE_NAME: &str = ".newdir.dtree";

/// How a browsing session ended.
#[derive(Debug, PartialEq)]
pub enum SessionOutcome {
    /// The user chose a directory; deliver this path to the shell wrapper.
    Commit(PathBuf),
    Quit,
}

/// One browsing session: the tree snapshot, the cursor, and the scroll
/// offset. All session state lives here rather than in globals, so
/// independent sessions (and tests) never interfere.
pub struct App {
    pub root: DirNode,
    /// Identity of the single node with `is_selected == true`.
    pub selected_path: PathBuf,
    pub scroll_top: usize,
    settings: Settings,
}

impl App {
    /// Bootstraps the tree `load_depth` levels below `start_dir`. The root
    /// starts out expanded and selected. An incomplete initial scan is
    /// logged and survived; the user browses whatever was loaded.
    pub fn new(settings: Settings, start_dir: PathBuf) -> Self {
        let mut root = DirNode::new(start_dir);
        if let Err(e) = root.load(settings.load_depth) {
            warn!("initial scan incomplete: {}", e);
        }
        root.is_expanded = true;
        root.is_selected = true;
        let selected_path = root.full_path.clone();
        Self {
            root,
            selected_path,
            scroll_top: 0,
            settings,
        }
    }

    /// The cooperative input loop: draw, wait (bounded) for a keypress,
    /// apply it, repeat until the session reaches a terminal state.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<SessionOutcome> {
        let tick = Duration::from_millis(self.settings.tick_rate_ms);
        loop {
            terminal.draw(|frame| view::draw(frame, self))?;
            let Some(command) = events::next_command(tick)? else {
                continue;
            };
            if let Some(outcome) = self.apply(command) {
                return Ok(outcome);
            }
        }
    }

    /// One state transition of the session machine. Returns `Some` when the
    /// session is over.
    pub fn apply(&mut self, command: Command) -> Option<SessionOutcome> {
        match command {
            Command::MoveUp => self.move_selection(Direction::Up),
            Command::MoveDown => self.move_selection(Direction::Down),
            Command::ToggleExpand => self.toggle_selected(),
            Command::Commit => {
                info!("committing {}", self.selected_path.display());
                return Some(SessionOutcome::Commit(self.selected_path.clone()));
            }
            Command::Quit => return Some(SessionOutcome::Quit),
        }
        None
    }

    /// Moves the cursor within the flattened view. The old flag is cleared
    /// only once the new target is known, so exactly one node stays selected
    /// even when the move is a boundary no-op.
    fn move_selection(&mut self, direction: Direction) {
        let Some(next) = tree::move_selection(&self.root, &self.selected_path, direction) else {
            return;
        };
        self.root
            .for_node_at(&self.selected_path.clone(), &mut |n| n.is_selected = false);
        self.root.for_node_at(&next, &mut |n| n.is_selected = true);
        self.selected_path = next;
    }

    fn toggle_selected(&mut self) {
        let load_depth = self.settings.load_depth;
        let path = self.selected_path.clone();
        self.root.for_node_at(&path, &mut |node| {
            if let Err(e) = node.toggle_expansion(load_depth) {
                warn!("{}", e);
            }
        });
    }

    pub fn indent_width(&self) -> u16 {
        self.settings.indent_width
    }
}

/// Hands the chosen directory to the wrapping shell: the absolute path,
/// plain text with no trailing newline, written to [`COMMIT_FILE_NAME`] in
/// `working_dir`. The wrapper `cd`s into it and removes the file.
pub fn deliver_choice(working_dir: &Path, target: &Path) -> io::Result<()> {
    let mut file = File::create(working_dir.join(COMMIT_FILE_NAME))?;
    write!(file, "{}", target.display())
}
