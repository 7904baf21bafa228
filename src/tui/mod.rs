// SPDX-FileCopyrightText: 2026 The dtree Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod events;
pub mod tree;
pub mod view;
