// SPDX-FileCopyrightText: 2026 The dtree Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while scanning the filesystem into the tree model.
///
/// Both variants are recoverable: the tree keeps whatever was loaded before
/// the failure, the caller logs and the session continues.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("could not scan {}: {}", path.display(), source)]
    ScanFailed { path: PathBuf, source: io::Error },

    #[error("{} entries below {} could not be scanned", failures, path.display())]
    PartialLoad { path: PathBuf, failures: usize },
}
