/// Failure of a single gateway admin call, as seen by relay consumers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrarError {
    /// The request never produced a response (connect, DNS, I/O).
    #[error("{detail}")]
    Transport { detail: String },

    /// The gateway answered with a status the step does not accept.
    #[error("{detail}")]
    UnexpectedStatus { status: u16, detail: String },

    /// The outbound request could not be built.
    #[error("{detail}")]
    InvalidRequest { detail: String },
}

impl RegistrarError {
    /// HTTP status returned by the gateway, when there was one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::Transport { .. } | Self::InvalidRequest { .. } => None,
        }
    }
}
