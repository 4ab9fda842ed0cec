//! Directive kinds and the HTML fragments they expand to.

use crate::error::DirectiveError;

/// Class prefix used for `:::message` containers by default.
pub const DEFAULT_CLASS_PREFIX: &str = "message";

/// Markup generation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupConfig {
    /// Prefix of the `:::message` container class, as in `message-alert`.
    ///
    /// Default: `"message"`
    pub class_prefix: String,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            class_prefix: DEFAULT_CLASS_PREFIX.to_owned(),
        }
    }

    /// Set the message container class prefix.
    #[must_use]
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }
}

/// Severity of a `:::message` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Warning,
    Alert,
}

impl MessageLevel {
    /// Class suffix for this level.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Alert => "alert",
        }
    }
}

/// Resolved directive type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveKind {
    /// `:::message` or `:::message alert`
    Message(MessageLevel),
    /// `:::details summary text`
    Details { summary: String },
    /// Any other name. Left as plain text.
    Unrecognized(String),
}

impl DirectiveKind {
    /// Resolve a directive name and option.
    ///
    /// Names are matched case-sensitively. `message` accepts only `alert` as
    /// an option. `details` uses the whole option as its summary.
    ///
    /// # Errors
    ///
    /// Returns [`DirectiveError::InvalidOption`] for a `message` option other
    /// than `alert`. The error carries no line; callers attach one.
    pub fn resolve(name: &str, option: Option<&str>) -> Result<Self, DirectiveError> {
        match name {
            "message" => match option {
                None => Ok(Self::Message(MessageLevel::Warning)),
                Some("alert") => Ok(Self::Message(MessageLevel::Alert)),
                Some(other) => Err(DirectiveError::InvalidOption {
                    name: name.to_owned(),
                    option: other.to_owned(),
                    line: None,
                }),
            },
            "details" => Ok(Self::Details {
                summary: option.unwrap_or_default().to_owned(),
            }),
            other => Ok(Self::Unrecognized(other.to_owned())),
        }
    }
}

/// Opening and closing fragments for one directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupPair {
    pub open: String,
    pub close: String,
}

/// Turns directive kinds into HTML fragments.
#[derive(Debug, Clone, Default)]
pub struct MarkupEmitter {
    config: MarkupConfig,
}

impl MarkupEmitter {
    #[must_use]
    pub fn new(config: MarkupConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &MarkupConfig {
        &self.config
    }

    /// Fragments for `kind`, or `None` for unrecognized directives.
    ///
    /// The details summary is inserted as-is and may itself contain markup.
    #[must_use]
    pub fn markup(&self, kind: &DirectiveKind) -> Option<MarkupPair> {
        match kind {
            DirectiveKind::Message(level) => Some(MarkupPair {
                open: format!(
                    "<div class=\"{}-{}\">",
                    self.config.class_prefix,
                    level.as_str()
                ),
                close: "</div>".to_owned(),
            }),
            DirectiveKind::Details { summary } => Some(MarkupPair {
                open: format!("<details><summary>{summary}</summary>"),
                close: "</details>".to_owned(),
            }),
            DirectiveKind::Unrecognized(_) => None,
        }
    }

    /// Resolve and emit in one step.
    pub fn emit(
        &self,
        name: &str,
        option: Option<&str>,
    ) -> Result<Option<MarkupPair>, DirectiveError> {
        Ok(self.markup(&DirectiveKind::resolve(name, option)?))
    }
}
