mod file_index;
mod transfer_guard;

pub use file_index::FileIndex;
pub use transfer_guard::{TransferGuard, TransferMap};
