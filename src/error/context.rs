//! Error context types for better error messages.

/// I/O operation types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOperation {
    Read,
    Write,
    Create,
    Flush,
    Persist,
}

impl std::fmt::Display for IoOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
            Self::Create => write!(f, "create"),
            Self::Flush => write!(f, "flush"),
            Self::Persist => write!(f, "replace"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_operation_display() {
        assert_eq!(IoOperation::Read.to_string(), "read");
        assert_eq!(IoOperation::Write.to_string(), "write");
        assert_eq!(IoOperation::Persist.to_string(), "replace");
    }
}
