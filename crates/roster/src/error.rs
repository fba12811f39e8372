use std::fmt;

#[derive(Debug)]
pub enum RosterError {
    /// Header row does not name the identifier column.
    MissingIdColumn { column: String },
    /// Source has no header row, or the header row is empty.
    EmptySchema,
    /// Header row names the same column twice.
    DuplicateColumn { column: String },
    /// A record has an empty identifier. `line` is 1-based and counts the header;
    /// `None` for records built in memory.
    MissingId { line: Option<u64> },
    /// A record has more fields than the header names.
    RowTooLong { line: u64, fields: usize, columns: usize },
    /// Duplicate identifier under the reject policy.
    DuplicateId { id: String, line: u64 },
    /// CSV read/write error.
    Csv(String),
    /// IO error (file read, write, etc.).
    Io(String),
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty id column, bad approve entry, etc.).
    ConfigValidation(String),
    /// Malformed `attribute=value` expression.
    InvalidPredicate(String),
}

impl RosterError {
    /// Errors that mean the source is not a well-formed roster.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::MissingIdColumn { .. }
                | Self::EmptySchema
                | Self::DuplicateColumn { .. }
                | Self::MissingId { .. }
                | Self::RowTooLong { .. }
                | Self::DuplicateId { .. }
        )
    }
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingIdColumn { column } => {
                write!(f, "format error: header has no '{column}' column")
            }
            Self::EmptySchema => write!(f, "format error: source has no columns"),
            Self::DuplicateColumn { column } => {
                write!(f, "format error: header names '{column}' more than once")
            }
            Self::MissingId { line: Some(line) } => {
                write!(f, "format error: line {line}: record has an empty identifier")
            }
            Self::MissingId { line: None } => write!(f, "record has an empty identifier"),
            Self::RowTooLong { line, fields, columns } => write!(
                f,
                "format error: line {line}: record has {fields} fields, header has {columns}"
            ),
            Self::DuplicateId { id, line } => {
                write!(f, "format error: line {line}: duplicate identifier '{id}'")
            }
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::InvalidPredicate(expr) => {
                write!(f, "invalid predicate {expr:?}: expected attribute=value")
            }
        }
    }
}

impl std::error::Error for RosterError {}

impl From<std::io::Error> for RosterError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<csv::Error> for RosterError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_errors_are_grouped() {
        assert!(RosterError::EmptySchema.is_format_error());
        assert!(RosterError::MissingId { line: Some(3) }.is_format_error());
        assert!(!RosterError::Io("denied".into()).is_format_error());
        assert!(!RosterError::ConfigParse("bad".into()).is_format_error());
    }

    #[test]
    fn display_names_column() {
        let err = RosterError::MissingIdColumn { column: "bioguide_id".into() };
        assert!(err.to_string().contains("'bioguide_id'"));
    }
}
