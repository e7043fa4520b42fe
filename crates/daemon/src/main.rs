use std::collections::HashMap;
use std::io::{self, Read};
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;

use clap::{Arg, Command};
use p2p_config::{CHUNK_SIZE, LOCALHOST, PORT_CLIENT_DAEMON, PORT_FILE_SHARE, PORT_TRACKER};
use p2p_core::entities::{Action, TransferMode};
use p2p_core::utils::create_buffer;
use p2p_daemon::entities::FileIndex;
use p2p_daemon::*;

fn create_command() -> Command {
    Command::new("p2p-daemon")
        .about("File sharing daemon")
        .arg(
            Arg::new("ADDR")
                .help("Address peers use for file transfers")
                .short('a')
                .long("addr")
                .value_name("ADDR"),
        )
        .arg(
            Arg::new("TRACKER")
                .help("Tracker address")
                .short('t')
                .long("tracker")
                .value_name("ADDR"),
        )
        .arg(
            Arg::new("SHARED_DIR")
                .help("Directory with files to share")
                .short('d')
                .long("shared-dir")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("SAVE_DIR")
                .help("Directory downloads are saved into")
                .short('o')
                .long("save-dir")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("MODE")
                .help("Transfer mode: pull (default) or push")
                .short('m')
                .long("mode")
                .value_name("MODE"),
        )
}

fn main() -> io::Result<()> {
    let matches = create_command().get_matches();

    let mode = match matches.get_one::<String>("MODE") {
        Some(mode) => mode
            .parse::<TransferMode>()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?,
        None => TransferMode::Pull,
    };
    let config = DaemonConfig {
        share_addr: matches
            .get_one::<String>("ADDR")
            .cloned()
            .unwrap_or_else(|| format!("{}:{}", LOCALHOST, PORT_FILE_SHARE)),
        tracker_addr: matches
            .get_one::<String>("TRACKER")
            .cloned()
            .unwrap_or_else(|| format!("{}:{}", LOCALHOST, PORT_TRACKER)),
        shared_dir: matches
            .get_one::<String>("SHARED_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("shared")),
        save_dir: matches
            .get_one::<String>("SAVE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
        mode,
    };

    LOGGER.info("Running...");
    LOGGER.debug(format!("config: {config:?}"));

    let index = Arc::new(Mutex::new(FileIndex::new(config.shared_dir.clone())));
    let state = DaemonState {
        config: Arc::new(config),
        index,
        transferring: Arc::new(Mutex::new(HashMap::new())),
        downloading: Arc::new(Mutex::new(Vec::new())),
    };

    // Build the index and announce it before serving anything.
    rescan(&state)?;

    let share_listener = TcpListener::bind(&state.config.share_addr)?;
    LOGGER.info(format!("Sharing files on {}", state.config.share_addr));
    {
        let index = state.index.clone();
        let transferring = state.transferring.clone();
        let mode = state.config.mode;
        thread::spawn(move || {
            share_responder(share_listener, index, transferring, mode);
        });
    }

    // Listener for client-daemon connections
    let listener = TcpListener::bind((LOCALHOST, PORT_CLIENT_DAEMON))?;

    let mut buf = create_buffer(CHUNK_SIZE);
    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => match stream.read(&mut buf) {
                Ok(size) => {
                    // The daemon must not crash on a malformed action.
                    let action: Action = match serde_json::from_slice(&buf[..size]) {
                        Ok(action) => action,
                        Err(_) => {
                            LOGGER.debug("Client made a mistake!");
                            continue;
                        }
                    };

                    let state = state.clone();
                    thread::spawn(move || {
                        if let Err(e) = action_processor(&action, stream, &state) {
                            LOGGER.error(e);
                        }
                    });
                }
                Err(e) => {
                    LOGGER.error(e);
                }
            },
            Err(e) => {
                LOGGER.error(e);
            }
        }
    }

    Ok(())
}
