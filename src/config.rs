// Configuration file handling and per-run report configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::cli::args::ReportArgs;
use crate::host::HostFormat;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub report: ReportSection,

    #[serde(default)]
    pub run: RunSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportSection {
    /// Also save the report to this file
    #[serde(default)]
    pub path: Option<String>,

    /// Command suggested for re-running failures (empty disables)
    #[serde(default)]
    pub rerun_cmd: Option<String>,

    /// Language label for fenced tracebacks
    #[serde(default)]
    pub fence_lang: Option<String>,

    /// Render unexpected passes in the failures section
    #[serde(default)]
    pub show_xpass: bool,

    /// Default verbosity when neither -v nor -q is given
    #[serde(default)]
    pub verbosity: i8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSection {
    /// Host event format
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

pub fn default_format() -> String {
    String::from("pytest")
}

/// Config file candidates in lookup order: `.mdreportrc` in the current
/// directory then home, then `.mdreportrc.toml` in the same order.
/// Home entries are left out when no home directory is known.
fn search_paths(cwd: &Path, home: Option<&Path>) -> Vec<PathBuf> {
    [".mdreportrc", ".mdreportrc.toml"]
        .into_iter()
        .flat_map(|name| [Some(cwd.join(name)), home.map(|h| h.join(name))])
        .flatten()
        .collect()
}

impl Config {
    /// Load configuration from default locations
    pub fn load() -> Option<Self> {
        let cwd = std::env::current_dir().ok()?;
        let home = dirs::home_dir();

        for path in &search_paths(&cwd, home.as_deref()) {
            if path.exists() {
                debug!("Loading configuration from {}", path.display());
                return Self::load_from_file(path);
            }
        }

        None
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        let config = Self::parse(&content);
        if config.is_none() {
            warn!("Ignoring invalid configuration file {}", path.display());
        }
        config
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Option<Self> {
        toml::from_str(content).ok()
    }

    /// Generate default configuration as TOML
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|_| String::new())
    }
}

/// Report settings, resolved once at the start of a run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportConfig {
    pub report_path: Option<PathBuf>,
    pub rerun_cmd: String,
    /// Negative is quiet, zero normal, positive verbose
    pub verbosity: i8,
    pub quiet: bool,
    pub fence_lang: Option<String>,
    pub show_xpass: bool,
}

impl ReportConfig {
    pub fn new(verbosity: i8) -> Self {
        Self {
            verbosity,
            quiet: verbosity < 0,
            ..Self::default()
        }
    }

    pub fn with_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = Some(path.into());
        self
    }

    pub fn with_rerun_cmd(mut self, cmd: impl Into<String>) -> Self {
        self.rerun_cmd = cmd.into();
        self
    }

    pub fn with_fence_lang(mut self, lang: Option<String>) -> Self {
        self.fence_lang = lang;
        self
    }

    pub fn with_show_xpass(mut self, show: bool) -> Self {
        self.show_xpass = show;
        self
    }

    /// Merge command-line arguments, the config file and host defaults.
    /// Precedence: command line, then config file, then host format.
    pub fn resolve(args: &ReportArgs, format: HostFormat, file: Option<&Config>) -> Self {
        let section = file.map(|c| c.report.clone()).unwrap_or_default();

        let verbosity = if args.verbose == 0 && args.quiet == 0 {
            section.verbosity
        } else {
            let verbosity = i16::from(args.verbose) - i16::from(args.quiet);
            verbosity.clamp(i16::from(i8::MIN), i16::from(i8::MAX)) as i8
        };

        let report_path = args
            .markdown_report
            .clone()
            .or_else(|| section.path.map(PathBuf::from));

        let rerun_cmd = args
            .markdown_rerun_cmd
            .clone()
            .or(section.rerun_cmd)
            .unwrap_or_else(|| format.default_rerun_cmd().to_string());

        let fence_lang = args
            .fence_lang
            .clone()
            .or(section.fence_lang)
            .or_else(|| format.default_fence_lang().map(String::from))
            .filter(|lang| !lang.is_empty());

        Self {
            report_path,
            rerun_cmd,
            verbosity,
            quiet: verbosity < 0,
            fence_lang,
            show_xpass: args.show_xpass || section.show_xpass,
        }
    }
}
