//! CLI Exit Code Registry
//!
//! Single source of truth for `rollcall` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                        |
//! |------|------------------------------------------------|
//! | 0    | Success                                        |
//! | 1    | General error (unspecified)                    |
//! | 2    | Usage error (bad args, missing input path)     |
//! | 3    | Roster format error (no id column, bad rows)   |
//! | 4    | IO error (read/write failure)                  |
//! | 5    | Config error (parse or validation)             |
//! | 6    | `check` found sanity issues                    |
//! | 7    | `find` matched nothing                         |

use rollcall_roster::RosterError;

/// Command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error. Prefer a specific code.
pub const EXIT_ERROR: u8 = 1;

/// Bad arguments, missing required inputs.
pub const EXIT_USAGE: u8 = 2;

/// Roster source is malformed.
pub const EXIT_FORMAT: u8 = 3;

/// File could not be read or written.
pub const EXIT_IO: u8 = 4;

/// Config file could not be parsed or failed validation.
pub const EXIT_CONFIG: u8 = 5;

/// `rollcall check` reported at least one issue.
pub const EXIT_SANITY_ISSUES: u8 = 6;

/// `rollcall find` matched no record.
pub const EXIT_NO_MATCH: u8 = 7;

/// Map a library error to its exit code.
pub fn roster_exit_code(err: &RosterError) -> u8 {
    match err {
        e if e.is_format_error() => EXIT_FORMAT,
        RosterError::Csv(_) => EXIT_FORMAT,
        RosterError::Io(_) => EXIT_IO,
        RosterError::ConfigParse(_) | RosterError::ConfigValidation(_) => EXIT_CONFIG,
        RosterError::InvalidPredicate(_) => EXIT_USAGE,
        _ => EXIT_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let codes = [
            EXIT_SUCCESS,
            EXIT_ERROR,
            EXIT_USAGE,
            EXIT_FORMAT,
            EXIT_IO,
            EXIT_CONFIG,
            EXIT_SANITY_ISSUES,
            EXIT_NO_MATCH,
        ];
        let unique: std::collections::HashSet<u8> = codes.iter().copied().collect();
        assert_eq!(unique.len(), codes.len());
    }

    #[test]
    fn roster_errors_map() {
        assert_eq!(roster_exit_code(&RosterError::EmptySchema), EXIT_FORMAT);
        assert_eq!(roster_exit_code(&RosterError::Io("x".into())), EXIT_IO);
        assert_eq!(roster_exit_code(&RosterError::ConfigParse("x".into())), EXIT_CONFIG);
        assert_eq!(roster_exit_code(&RosterError::InvalidPredicate("x".into())), EXIT_USAGE);
    }
}
