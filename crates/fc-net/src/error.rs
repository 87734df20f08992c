use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown command code {0}")]
    UnknownCommand(i32),

    #[error("unknown class code {0}")]
    UnknownClass(i32),

    #[error("unknown reply code {0}")]
    UnknownReply(i32),

    #[error("admission task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type NetResult<T> = Result<T, NetError>;
