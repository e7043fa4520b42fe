use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Default)]
/// In-memory directory of which peer holds which file.
///
/// Best effort only: entries are never evicted, peers are never
/// deregistered, and nothing survives a restart.
pub struct Registry {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    /// Every address that ever registered.
    peers: HashSet<String>,
    /// File name → peer addresses in registration order, duplicates kept.
    files: HashMap<String, Vec<String>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Records `peer` as a holder of every name in `files`. Never fails;
    /// an empty list still makes the peer known.
    ///
    /// Each file is appended under its own lock acquisition, so a reader
    /// running concurrently can observe the peer on only a prefix of the
    /// names. Registering the same name twice appends a second entry.
    pub fn register(&self, peer: &str, files: &[String]) {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.peers.insert(peer.to_string());
        }
        for file in files {
            let mut inner = self.inner.lock().unwrap();
            inner.peers.insert(peer.to_string());
            match inner.files.get_mut(file) {
                Some(addr_vec) => {
                    addr_vec.push(peer.to_string());
                }
                None => {
                    inner.files.insert(file.clone(), vec![peer.to_string()]);
                }
            }
        }
    }

    /// Peers known to hold `file`, in registration order. `None` when the
    /// name was never registered or its list is empty.
    pub fn lookup(&self, file: &str) -> Option<Vec<String>> {
        let inner = self.inner.lock().unwrap();
        inner.files.get(file).filter(|peers| !peers.is_empty()).cloned()
    }

    pub fn peer_count(&self) -> usize {
        self.inner.lock().unwrap().peers.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn register_then_lookup() {
        let registry = Registry::new();
        registry.register("127.0.0.1:9001", &names(&["a.txt", "b.txt"]));

        assert_eq!(
            registry.lookup("a.txt"),
            Some(vec![String::from("127.0.0.1:9001")])
        );
        assert_eq!(
            registry.lookup("b.txt"),
            Some(vec![String::from("127.0.0.1:9001")])
        );
        assert_eq!(registry.lookup("c.txt"), None);
    }

    #[test]
    fn reregistration_appends_a_duplicate() {
        let registry = Registry::new();
        registry.register("127.0.0.1:9001", &names(&["a.txt"]));
        registry.register("127.0.0.1:9001", &names(&["a.txt"]));

        let peers = registry.lookup("a.txt").unwrap();
        assert_eq!(peers.len(), 2);
        assert_eq!(peers[0], peers[1]);
        assert_eq!(registry.peer_count(), 1);
    }

    #[test]
    fn registration_order_is_kept() {
        let registry = Registry::new();
        registry.register("127.0.0.1:9001", &names(&["a.txt"]));
        registry.register("127.0.0.1:9002", &names(&["a.txt"]));

        assert_eq!(
            registry.lookup("a.txt"),
            Some(vec![
                String::from("127.0.0.1:9001"),
                String::from("127.0.0.1:9002"),
            ])
        );
    }

    #[test]
    fn empty_file_list_still_registers_the_peer() {
        let registry = Registry::new();
        registry.register("127.0.0.1:9001", &[]);

        assert_eq!(registry.peer_count(), 1);
        assert_eq!(registry.lookup("a.txt"), None);
    }

    #[test]
    fn concurrent_registrations_lose_nothing() {
        let registry = Arc::new(Registry::new());

        let mut handles = Vec::new();
        for peer_id in 0..8 {
            let registry = registry.clone();
            handles.push(thread::spawn(move || {
                let peer = format!("127.0.0.1:{}", 9000 + peer_id);
                for file_id in 0..50 {
                    registry.register(&peer, &[format!("file-{file_id}.bin")]);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        for file_id in 0..50 {
            let peers = registry.lookup(&format!("file-{file_id}.bin")).unwrap();
            assert_eq!(peers.len(), 8);
            for peer_id in 0..8 {
                let peer = format!("127.0.0.1:{}", 9000 + peer_id);
                assert!(peers.contains(&peer));
            }
        }
        assert_eq!(registry.peer_count(), 8);
    }
}
