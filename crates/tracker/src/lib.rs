use std::io::{self, BufRead, BufReader, Write};
use std::net::TcpStream;
use std::sync::Arc;

use p2p_core::utils::Logger;

pub mod registry;

pub use registry::Registry;

pub static LOGGER: Logger = Logger::verbose("Tracker");

/// Handles one tracker connection: a single line command, a single reply.
///
/// `REGISTER <addr> <comma,separated,names>` is acknowledged with the
/// literal `REGISTERED` (no newline). `FIND <name>` answers `NOT FOUND\n`
/// or the comma-joined peer list plus `\n`. Anything else, including lines
/// with fewer than two tokens or without a terminating newline, closes the
/// connection without a reply.
pub fn handle_connection(stream: TcpStream, registry: Arc<Registry>) -> io::Result<()> {
    let peer = stream.peer_addr()?;
    let mut reader = BufReader::new(stream);

    let mut line = String::new();
    reader.read_line(&mut line)?;
    if !line.ends_with('\n') {
        LOGGER.debug(format!("{peer}: connection closed before newline"));
        return Ok(());
    }

    let line = line.trim();
    let parts: Vec<&str> = line.split(' ').collect();
    if parts.len() < 2 {
        LOGGER.debug(format!("{peer}: short command {line:?}"));
        return Ok(());
    }

    let mut stream = reader.into_inner();
    match parts[0] {
        "REGISTER" => {
            let addr = parts[1];
            // Everything after the address is glued back together and split
            // on commas; an empty remainder registers one empty name, as-is.
            let names: Vec<String> = parts[2..].concat().split(',').map(str::to_string).collect();

            registry.register(addr, &names);
            LOGGER.info(format!("registered {addr} with {} file(s)", names.len()));
            LOGGER.debug(format!("tracking {} peer(s)", registry.peer_count()));

            stream.write_all(b"REGISTERED")?;
        }
        "FIND" => {
            let name = parts[1];
            match registry.lookup(name) {
                Some(peers) => {
                    LOGGER.info(format!("{peer} found {} holder(s) of {name:?}", peers.len()));
                    stream.write_all(format!("{}\n", peers.join(",")).as_bytes())?;
                }
                None => {
                    LOGGER.info(format!("{peer} asked for unknown file {name:?}"));
                    stream.write_all(b"NOT FOUND\n")?;
                }
            }
        }
        other => {
            LOGGER.debug(format!("{peer}: unknown command {other:?}"));
        }
    }

    Ok(())
}
