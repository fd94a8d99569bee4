//! Visual theme and styling.

use console::Style;

/// Terminal theme for console reports.
#[derive(Debug, Clone)]
pub struct StagehandTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (orange).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for sequence headers (magenta bold).
    pub header: Style,
    /// Style for step indices (dim).
    pub step_number: Style,
    /// Style for handles (dim italic).
    pub handle: Style,
}

impl Default for StagehandTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl StagehandTheme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            header: Style::new().bold().magenta(),
            step_number: Style::new().dim(),
            handle: Style::new().dim().italic(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            header: Style::new(),
            step_number: Style::new(),
            handle: Style::new(),
        }
    }

    /// Format a success message.
    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    /// Format a warning message.
    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    /// Format an error message.
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Format a step line: `  3. Create surface`.
    pub fn format_step(&self, index: usize, description: &str) -> String {
        format!(
            "  {} {}",
            self.step_number.apply_to(format!("{:>2}.", index)),
            description
        )
    }

    /// Format a released resource line.
    pub fn format_release(&self, kind: &str, handle: &str) -> String {
        format!(
            "  {} {} {}",
            self.dim.apply_to("↩"),
            kind,
            self.handle.apply_to(handle)
        )
    }

    /// Format a sequence header.
    pub fn format_header(&self, title: &str) -> String {
        format!("{}", self.header.apply_to(format!("▶ {}", title)))
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}
