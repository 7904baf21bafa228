// SPDX-FileCopyrightText: 2026 The dtree Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

/// The full user-facing event surface of a browsing session. Every keypress
/// either maps to one of these or is ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    MoveUp,
    MoveDown,
    ToggleExpand,
    /// Finalize navigation: hand the selected path to the shell wrapper and
    /// end the session.
    Commit,
    /// End the session without delivering a path.
    Quit,
}
