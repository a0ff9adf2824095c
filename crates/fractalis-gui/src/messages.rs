use std::path::PathBuf;

use fractalis_core::config::ExplorerConfig;

/// Results of file dialogs, which run off the UI thread.
pub enum DialogResult {
    /// A config was picked and parsed.
    ConfigLoaded { path: PathBuf, config: Box<ExplorerConfig> },
    /// A config could not be read.
    ConfigFailed { path: PathBuf, message: String },
    /// Where to write the current screen.
    ScreenshotPath { path: PathBuf },
    /// Where to write the current config.
    ConfigSavePath { path: PathBuf },
}
