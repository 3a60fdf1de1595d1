//! Output formatter trait

use agora_application::DebateOutcome;

/// Trait for formatting finished debates
pub trait OutputFormatter {
    /// Format the complete debate
    fn format(&self, outcome: &DebateOutcome) -> String;

    /// Format as JSON
    fn format_json(&self, outcome: &DebateOutcome) -> String;

    /// Format score trend and verdict only
    fn format_summary(&self, outcome: &DebateOutcome) -> String;
}
