use std::io::IsTerminal;
use std::str::FromStr;

use serde::Deserialize;

/// When to colour prompts and diagnostics.
///
/// - `Auto`: colour only when the stream is a terminal (default).
/// - `Always` / `Never`: unconditional.
///
/// Job banners (`[1]+ Done ...` and friends) are never coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl Default for ColorMode {
    fn default() -> Self {
        ColorMode::Auto
    }
}

impl ColorMode {
    /// Resolve the mode against stdout.
    pub fn enabled(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            other => Err(format!(
                "invalid color mode: {other} (expected \"auto\", \"always\" or \"never\")"
            )),
        }
    }
}
