//! Output verbosity mode.

use std::str::FromStr;

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Show everything, including each released resource.
    Verbose,
    /// Show sequence progress, step by step.
    #[default]
    Normal,
    /// Show final status only.
    Quiet,
    /// Show nothing except errors.
    Silent,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "verbose" => Ok(Self::Verbose),
            "normal" => Ok(Self::Normal),
            "quiet" => Ok(Self::Quiet),
            "silent" => Ok(Self::Silent),
            _ => Err(format!("unknown output mode: {}", s)),
        }
    }
}

impl OutputMode {
    /// Check if this mode shows individual resource releases.
    pub fn shows_releases(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Check if this mode shows each step as it starts.
    pub fn shows_steps(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal)
    }

    /// Check if this mode shows status messages.
    pub fn shows_status(&self) -> bool {
        !matches!(self, Self::Silent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_mode_from_str() {
        assert_eq!("verbose".parse::<OutputMode>(), Ok(OutputMode::Verbose));
        assert_eq!("QUIET".parse::<OutputMode>(), Ok(OutputMode::Quiet));
        assert!("invalid".parse::<OutputMode>().is_err());
    }

    #[test]
    fn output_mode_shows_releases() {
        assert!(OutputMode::Verbose.shows_releases());
        assert!(!OutputMode::Normal.shows_releases());
        assert!(!OutputMode::Quiet.shows_releases());
        assert!(!OutputMode::Silent.shows_releases());
    }

    #[test]
    fn output_mode_shows_steps() {
        assert!(OutputMode::Verbose.shows_steps());
        assert!(OutputMode::Normal.shows_steps());
        assert!(!OutputMode::Quiet.shows_steps());
        assert!(!OutputMode::Silent.shows_steps());
    }

    #[test]
    fn output_mode_shows_status() {
        assert!(OutputMode::Quiet.shows_status());
        assert!(!OutputMode::Silent.shows_status());
    }

    #[test]
    fn output_mode_default() {
        assert_eq!(OutputMode::default(), OutputMode::Normal);
    }
}
