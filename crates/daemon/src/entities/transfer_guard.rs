use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// Shared map: file name → peers currently receiving it.
pub type TransferMap = Arc<Mutex<HashMap<String, Vec<SocketAddr>>>>;

#[derive(Debug)]
/// Marks a (file, peer) pair as transferring for as long as the guard
/// lives. The serving thread drops it when the connection ends, however
/// the session went.
pub struct TransferGuard {
    transferring: TransferMap,
    file_name: String,
    peer: SocketAddr,
}

impl TransferGuard {
    pub fn new(transferring: TransferMap, file_name: String, peer: SocketAddr) -> Self {
        {
            let mut transfer_map = transferring.lock().unwrap();
            transfer_map
                .entry(file_name.clone())
                .or_default()
                .push(peer);
        }
        TransferGuard {
            transferring,
            file_name,
            peer,
        }
    }
}

impl Drop for TransferGuard {
    fn drop(&mut self) {
        let mut transfer_map = self.transferring.lock().unwrap();
        if let Some(peer_vec) = transfer_map.get_mut(&self.file_name) {
            if let Some(pos) = peer_vec.iter().position(|peer| *peer == self.peer) {
                peer_vec.remove(pos);
            }
            if peer_vec.is_empty() {
                transfer_map.remove(&self.file_name);
            }
        }
    }
}
