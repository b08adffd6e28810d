use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no response from the model")]
    NoResponse,

    #[error("failed to get followup response")]
    NoFollowup,

    #[error("tool turn {call_id} does not answer a pending call")]
    OrphanToolTurn { call_id: String },

    #[error(transparent)]
    Store(#[from] store::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
