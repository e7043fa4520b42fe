use std::fmt;
use std::str::FromStr;

/// Data-phase strategy for a file transfer.
///
/// Both ends of a connection must run the same mode; it is fixed by daemon
/// configuration, never negotiated on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    /// Holder streams chunks back-to-back until end of file.
    Push,
    /// Holder waits for a request token before every chunk.
    Pull,
}

impl FromStr for TransferMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "push" => Ok(TransferMode::Push),
            "pull" => Ok(TransferMode::Pull),
            other => Err(format!("unknown transfer mode: {other:?} (push|pull)")),
        }
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferMode::Push => write!(f, "push"),
            TransferMode::Pull => write!(f, "pull"),
        }
    }
}
