//! Output configuration and formatting

mod formatter;

pub use formatter::Formatter;

/// How command output should be rendered.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Emit strict JSON on stdout
    pub json: bool,
    /// Suppress non-error output
    pub quiet: bool,
    /// Disable ANSI styling
    pub no_color: bool,
}
