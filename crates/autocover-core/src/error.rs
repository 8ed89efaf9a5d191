use thiserror::Error;

/// Root error type for all AutoCover operations.
#[derive(Error, Debug)]
pub enum AutocoverError {
    #[error("Unsupported language: {language}")]
    UnsupportedLanguage { language: String },

    #[error("Sandbox error: {message}")]
    Sandbox {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Failed to spawn '{program}': {message}")]
    Process { program: String, message: String },

    #[error("Result parse error: {message}")]
    Parse { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl AutocoverError {
    pub fn unsupported_language(language: impl Into<String>) -> Self {
        Self::UnsupportedLanguage {
            language: language.into(),
        }
    }

    pub fn sandbox(message: impl Into<String>) -> Self {
        Self::Sandbox {
            message: message.into(),
            source: None,
        }
    }

    pub fn sandbox_io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Sandbox {
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn process(program: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Process {
            program: program.into(),
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AutocoverError>;
