//! Marker line classification.
//!
//! A marker line is either a start marker, `:::name option`, or an end marker,
//! a line ending in a bare colon run such as `:::`. The colon count is the
//! marker's level; runs shorter than three colons are never markers.

/// Shortest colon run that forms a marker.
pub(crate) const MIN_LEVEL: usize = 3;

/// Classified marker line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Marker<'a> {
    /// `:::name option`
    Start {
        level: usize,
        name: &'a str,
        option: Option<&'a str>,
    },
    /// Trailing colon run: `:::`
    End { level: usize },
}

/// Classify a single line.
///
/// The end check runs first, so a line ending in three or more colons is an
/// end marker even if it also looks like a start marker.
pub(crate) fn classify(line: &str) -> Option<Marker<'_>> {
    let trimmed = line.trim();

    if let Some(level) = end_level(trimmed) {
        return Some(Marker::End { level });
    }

    start_marker(trimmed)
}

/// Length of the trailing colon run, if it forms an end marker.
fn end_level(trimmed: &str) -> Option<usize> {
    let level = trimmed.len() - trimmed.trim_end_matches(':').len();
    (level >= MIN_LEVEL).then_some(level)
}

fn start_marker(trimmed: &str) -> Option<Marker<'_>> {
    let after_colons = trimmed.trim_start_matches(':');
    let level = trimmed.len() - after_colons.len();
    if level < MIN_LEVEL {
        return None;
    }

    let name_end = after_colons
        .find(char::is_whitespace)
        .unwrap_or(after_colons.len());
    let name = &after_colons[..name_end];
    if name.is_empty() {
        return None;
    }

    let option = after_colons[name_end..].trim_start();

    Some(Marker::Start {
        level,
        name,
        option: (!option.is_empty()).then_some(option),
    })
}
