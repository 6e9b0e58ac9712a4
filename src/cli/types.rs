use async_trait::async_trait;
use thiserror::Error;

/// Failures of a CLI invocation.
///
/// Covers command lookup, bad arguments, and talking to a running host
/// over the query socket.
#[derive(Error, Debug)]
pub enum CliError {
    /// Unknown category or command name.
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Wrong number of arguments, or an argument of the wrong form such as
    /// a non-numeric tab id.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The configuration could not be rendered.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// No host answered on the query socket.
    ///
    /// Usually the browser has not started the host, or the host uses a
    /// different socket path.
    #[error("Failed to reach bridge at '{socket}': {details}")]
    ConnectionError {
        /// Socket path that was tried
        socket: String,
        /// Underlying failure
        details: String,
    },

    /// The host answered with an error or a malformed response.
    #[error("Bridge error: {0}")]
    ServiceError(String),

    /// Reading from or writing to the socket failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Text to print on success, or the failure.
pub type CommandResult = Result<String, CliError>;

/// One positional argument of a command.
#[derive(Debug, Clone)]
pub struct CommandArg {
    /// Placeholder name, e.g. "tab-id".
    pub name: String,

    /// What the argument means.
    pub description: String,

    /// Whether the command fails without it.
    pub required: bool,

    /// Expected kind of value.
    pub value_type: ArgType,
}

/// Kind of value an argument takes, shown in usage lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    /// Free text.
    String,

    /// An integer.
    Number,
}

impl ArgType {
    /// Placeholder shown in usage lines
    pub fn hint(self) -> &'static str {
        match self {
            ArgType::String => "string",
            ArgType::Number => "number",
        }
    }
}

/// Everything the registry knows about a command.
///
/// Drives help output and argument count checks.
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    /// Name within the category, e.g. "status".
    pub name: String,

    /// One-line summary.
    pub description: String,

    /// Positional arguments, required ones first.
    pub args: Vec<CommandArg>,

    /// Full invocations shown under the command in help.
    pub examples: Vec<String>,

    /// Category the command is registered under.
    pub category: String,
}

impl CommandMetadata {
    /// Argument placeholders, `<required>` and `[optional]`
    pub fn usage(&self) -> String {
        self.args
            .iter()
            .map(|arg| {
                let (open, close) = if arg.required { ('<', '>') } else { ('[', ']') };
                format!(" {open}{}:{}{close}", arg.name, arg.value_type.hint())
            })
            .collect()
    }

    /// Check that `given` arguments fit this command.
    ///
    /// # Errors
    /// `CliError::InvalidArguments` if required arguments are missing or
    /// there are more arguments than the command declares
    pub fn check_arg_count(&self, given: usize) -> Result<(), CliError> {
        let required = self.args.iter().filter(|arg| arg.required).count();
        let accepted = self.args.len();

        if given < required {
            return Err(CliError::InvalidArguments(format!(
                "'{}' needs at least {required} argument(s), got {given}",
                self.name
            )));
        }
        if given > accepted {
            return Err(CliError::InvalidArguments(format!(
                "'{}' takes at most {accepted} argument(s), got {given}",
                self.name
            )));
        }

        Ok(())
    }
}

/// A CLI command.
///
/// Commands receive their dependencies through their constructors.
#[async_trait]
pub trait Command: Send + Sync {
    /// Runs the command.
    ///
    /// The registry has already checked the argument count against
    /// [`Command::metadata`]; the command validates argument values.
    ///
    /// # Errors
    ///
    /// Returns `CliError` for invalid argument values, an unreachable host,
    /// or an error response from the host
    async fn execute(&self, args: &[String]) -> CommandResult;

    /// Describes the command for help and validation.
    fn metadata(&self) -> CommandMetadata;
}
