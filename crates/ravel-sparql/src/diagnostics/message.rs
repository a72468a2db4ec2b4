use rowan::TextRange;

/// What went wrong in a piece of query text.
///
/// Kinds are ordered by how much they disturb everything that follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // The token stream itself is damaged
    UnrecognizedInput,
    UnbalancedBrace,
    UnclosedBrace,

    // The query is readable but cannot be sent as is
    UnboundParameter,
    UndeclaredPrefix,

    // Harmless but probably not what the author meant
    DuplicatePrefix,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::UnrecognizedInput | Self::UnbalancedBrace | Self::UnclosedBrace => {
                Severity::Error
            }
            Self::UnboundParameter | Self::UndeclaredPrefix | Self::DuplicatePrefix => {
                Severity::Warning
            }
        }
    }

    pub fn default_hint(&self) -> Option<&'static str> {
        match self {
            Self::UnboundParameter => Some("bind a value before executing the query"),
            Self::UndeclaredPrefix => {
                Some("register the namespace so the prefix can be declared automatically")
            }
            _ => None,
        }
    }

    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnrecognizedInput => "unrecognized input",
            Self::UnbalancedBrace => "unmatched closing `}`",
            Self::UnclosedBrace => "missing closing `}`",
            Self::UnboundParameter => "parameter has no bound value",
            Self::UndeclaredPrefix => "prefix is used but never declared",
            Self::DuplicatePrefix => "prefix is declared more than once",
        }
    }

    /// Template with a `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::UnboundParameter => "parameter `@{}` has no bound value".to_string(),
            Self::UndeclaredPrefix => "prefix `{}:` is used but never declared".to_string(),
            Self::DuplicatePrefix => "prefix `{}:` is declared more than once".to_string(),
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    pub fn message(&self, detail: Option<&str>) -> String {
        match detail {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    /// The range underlined in rendered output.
    pub(crate) range: TextRange,
    pub(crate) message: String,
    pub(crate) hints: Vec<String>,
}

impl DiagnosticMessage {
    pub(crate) fn new(kind: DiagnosticKind, range: TextRange, message: impl Into<String>) -> Self {
        let hints = kind.default_hint().map(str::to_owned).into_iter().collect();
        Self {
            kind,
            range,
            message: message.into(),
            hints,
        }
    }

    pub(crate) fn with_default_message(kind: DiagnosticKind, range: TextRange) -> Self {
        Self::new(kind, range, kind.fallback_message())
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.severity(),
            u32::from(self.range.start()),
            u32::from(self.range.end()),
            self.message
        )?;
        for hint in &self.hints {
            write!(f, " (hint: {})", hint)?;
        }
        Ok(())
    }
}
