use crate::grammar::Tag;

/// Parse-time failures. Each one aborts parsing of the file it occurred in.
#[derive(Debug, thiserror::Error)]
pub enum DocError {
    /// A recognized tag has nothing at a required token position.
    #[error("missing content for @{tag} at line {line} in file '{file}'")]
    MissingTagContent { tag: Tag, file: String, line: usize },

    /// A closed block carries none of module/namespace/class/method/var.
    #[error("missing identifier for block starting at line {line} in file '{file}'")]
    MissingIdentifier { file: String, line: usize },

    /// A non-module block carries neither memberOf nor methodOf.
    #[error("missing memberOf for non-module block starting at line {line} in file '{file}'")]
    MissingParent { file: String, line: usize },

    /// Input ended while a block was still open.
    #[error("unterminated block starting at line {line} in file '{file}'")]
    UnterminatedBlock { file: String, line: usize },

    /// Two blocks resolve to the same path under the reject policy.
    #[error(
        "duplicate path '{path}' for block at line {line} in file '{file}' \
         (first defined at line {previous_line} in file '{previous_file}')"
    )]
    DuplicatePath {
        path: String,
        file: String,
        line: usize,
        previous_file: String,
        previous_line: usize,
    },

    #[error("failed to read line {line} of '{file}'")]
    Io {
        file: String,
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, DocError>;
