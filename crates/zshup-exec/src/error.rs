use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("{program} not found")]
    NotFound { program: String },

    #[error("`{command}` failed ({})", describe_code(*code))]
    CommandFailed { command: String, code: Option<i32> },

    #[error("IO error ({kind}): {message}")]
    IoError {
        kind: std::io::ErrorKind,
        message: String,
    },
}

fn describe_code(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        ToolError::IoError {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
