use std::io;
use std::net::TcpListener;
use std::sync::Arc;

use clap::{Arg, Command};
use p2p_config::{LOCAL_NETWORK, PORT_TRACKER};
use p2p_tracker::{handle_connection, Registry, LOGGER};
use threadpool::ThreadPool;

/// One worker per handler; a connection carries exactly one command, so a
/// small pool is plenty.
const WORKERS: usize = 8;

fn main() -> io::Result<()> {
    let matches = Command::new("p2p-tracker")
        .about("File discovery registry for p2p daemons")
        .arg(
            Arg::new("ADDR")
                .help("Address to listen on")
                .short('a')
                .long("addr")
                .value_name("ADDR"),
        )
        .get_matches();

    let addr = matches
        .get_one::<String>("ADDR")
        .cloned()
        .unwrap_or_else(|| format!("{}:{}", LOCAL_NETWORK, PORT_TRACKER));

    let listener = TcpListener::bind(&addr)?;
    LOGGER.info(format!("Listening on {addr}"));

    let registry = Arc::new(Registry::new());
    let pool = ThreadPool::new(WORKERS);

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let registry = registry.clone();
                pool.execute(move || {
                    if let Err(e) = handle_connection(stream, registry) {
                        LOGGER.error(e);
                    }
                });
            }
            Err(e) => {
                LOGGER.error(e);
            }
        }
    }

    Ok(())
}
