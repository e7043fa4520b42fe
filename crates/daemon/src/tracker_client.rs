//! Client half of the tracker's line protocol.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::TcpStream;

use crate::LOGGER;

/// Announces `addr` as the holder of `names`. One connection, one command.
///
/// The tracker appends on re-registration instead of replacing, so every
/// rescan leaves an extra entry per file behind; harmless for lookups,
/// which only ever take the first candidate.
pub fn register(tracker: &str, addr: &str, names: &[String]) -> io::Result<()> {
    let mut stream = TcpStream::connect(tracker)?;
    stream.write_all(format!("REGISTER {} {}\n", addr, names.join(",")).as_bytes())?;

    let mut reply = String::new();
    stream.read_to_string(&mut reply)?;
    if reply != "REGISTERED" {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unexpected tracker reply {reply:?}"),
        ));
    }

    LOGGER.debug(format!("registered {} file name(s) at {tracker}", names.len()));
    Ok(())
}

/// Peers the tracker knows to hold `name`, in registration order. `None`
/// when the tracker answers `NOT FOUND`.
pub fn find_peers(tracker: &str, name: &str) -> io::Result<Option<Vec<String>>> {
    let stream = TcpStream::connect(tracker)?;
    let mut reader = BufReader::new(stream);
    reader
        .get_mut()
        .write_all(format!("FIND {name}\n").as_bytes())?;

    let mut reply = String::new();
    reader.read_line(&mut reply)?;
    let reply = reply.trim_end_matches('\n');

    if reply.is_empty() || reply == "NOT FOUND" {
        return Ok(None);
    }
    Ok(Some(reply.split(',').map(str::to_string).collect()))
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::sync::Arc;
    use std::thread;

    use p2p_tracker::Registry;

    use super::*;

    fn spawn_tracker() -> (String, Arc<Registry>) {
        let registry = Arc::new(Registry::new());
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let handler_registry = registry.clone();
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let registry = handler_registry.clone();
                thread::spawn(move || {
                    let _ = p2p_tracker::handle_connection(stream, registry);
                });
            }
        });

        (addr, registry)
    }

    #[test]
    fn register_round_trip() {
        let (tracker, registry) = spawn_tracker();

        register(
            &tracker,
            "127.0.0.1:9001",
            &[String::from("a.txt"), String::from("b.txt")],
        )
        .unwrap();

        assert_eq!(
            registry.lookup("a.txt"),
            Some(vec![String::from("127.0.0.1:9001")])
        );
    }

    #[test]
    fn find_peers_round_trip() {
        let (tracker, registry) = spawn_tracker();
        registry.register("127.0.0.1:9001", &[String::from("a.txt")]);
        registry.register("127.0.0.1:9002", &[String::from("a.txt")]);

        assert_eq!(
            find_peers(&tracker, "a.txt").unwrap(),
            Some(vec![
                String::from("127.0.0.1:9001"),
                String::from("127.0.0.1:9002"),
            ])
        );
        assert_eq!(find_peers(&tracker, "c.txt").unwrap(), None);
    }

    #[test]
    fn register_with_no_names_still_registers_the_peer() {
        let (tracker, registry) = spawn_tracker();

        register(&tracker, "127.0.0.1:9001", &[]).unwrap();
        assert_eq!(registry.peer_count(), 1);
    }

    #[test]
    fn connecting_to_a_dead_tracker_fails() {
        // Bind and drop to get an address nothing listens on.
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().to_string()
        };

        assert!(find_peers(&addr, "a.txt").is_err());
        assert!(register(&addr, "127.0.0.1:9001", &[]).is_err());
    }
}
