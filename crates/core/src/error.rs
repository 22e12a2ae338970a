use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Sheet is too short to contain a test block.
    #[error("malformed sheet: {rows} row(s), at least {required} required")]
    MalformedInput { rows: usize, required: usize },
    /// File or directory could not be opened or decoded.
    #[error("cannot read {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },
    /// Output file could not be created or written.
    #[error("cannot write {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },
    /// TOML parse / validation error.
    #[error("config error: {0}")]
    Config(String),
}

impl ExtractError {
    pub fn read(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Read { path: path.into(), message: message.to_string() }
    }

    pub fn write(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Write { path: path.into(), message: message.to_string() }
    }

    /// Stable machine-readable name, used in JSON run reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedInput { .. } => "malformed_input",
            Self::Read { .. } => "read",
            Self::Write { .. } => "write",
            Self::Config(_) => "config",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_file() {
        let err = ExtractError::read("cards/qc-17.xls", "unexpected end of stream");
        assert_eq!(err.to_string(), "cannot read cards/qc-17.xls: unexpected end of stream");
        assert_eq!(err.kind(), "read");
    }

    #[test]
    fn malformed_message_reports_counts() {
        let err = ExtractError::MalformedInput { rows: 3, required: 5 };
        assert_eq!(err.to_string(), "malformed sheet: 3 row(s), at least 5 required");
    }
}
