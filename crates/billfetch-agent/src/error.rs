use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("CDP error: {0}")]
    Cdp(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Unusable model reply: {0}")]
    Protocol(String),

    #[error("Download directory already exists: {}", .0.display())]
    DownloadDirExists(std::path::PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

impl From<async_openai::error::OpenAIError> for Error {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        Error::Llm(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
