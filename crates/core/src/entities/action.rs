use std::path::PathBuf;

use serde_derive::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
/// An action that is serialized in the client and sent to the daemon
pub enum Action {
    // Client -> Daemon
    /// Show files currently offered from the shared directory
    Ls,
    /// Fetch a file from a peer that registered it with the tracker
    Get {
        file_name: String,
        save_path: PathBuf,
        wait: bool, // Block the reply until the download finished
    },
    /// Show distributed files
    Status,
    /// Rebuild the shared index and announce it to the tracker again
    Rescan,
}
