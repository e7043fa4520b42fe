use std::io::{self, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;

use p2p_core::entities::{Action, Response, TransferMode};
use p2p_core::utils::Logger;

use crate::entities::{FileIndex, TransferMap};

pub mod entities;
pub mod tracker_client;
pub mod transfer;

pub static LOGGER: Logger = Logger::verbose("Daemon");

#[derive(Debug)]
/// Everything the daemon knows about itself, parsed once at startup and
/// shared read-only between handler threads.
pub struct DaemonConfig {
    /// Address peers dial for file transfers; also what the tracker learns.
    pub share_addr: String,
    /// Tracker endpoint.
    pub tracker_addr: String,
    /// Directory scanned for shareable files.
    pub shared_dir: PathBuf,
    /// Default directory for downloads.
    pub save_dir: PathBuf,
    /// Data-phase strategy, for serving and fetching alike.
    pub mode: TransferMode,
}

#[derive(Clone)]
/// Shared daemon state handed to every handler thread.
pub struct DaemonState {
    pub config: Arc<DaemonConfig>,
    pub index: Arc<Mutex<FileIndex>>,
    /// Files being served right now: name → receiving peers.
    pub transferring: TransferMap,
    /// Downloads in flight.
    pub downloading: Arc<Mutex<Vec<String>>>,
}

/// Accept loop on the share port; one thread per requester connection.
pub fn share_responder(
    listener: TcpListener,
    index: Arc<Mutex<FileIndex>>,
    transferring: TransferMap,
    mode: TransferMode,
) {
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let index = index.clone();
                let transferring = transferring.clone();
                thread::spawn(move || {
                    if let Err(e) = transfer::serve_request(stream, &index, transferring, mode) {
                        LOGGER.error(e);
                    }
                });
            }
            Err(e) => {
                LOGGER.error(e);
            }
        }
    }
}

/// Rebuilds the index and announces the fresh listing to the tracker.
/// The tracker appends rather than replaces, an accepted duplication.
pub fn rescan(state: &DaemonState) -> io::Result<usize> {
    let names = {
        let mut index = state.index.lock().unwrap();
        index.rebuild()?;
        index.names()
    };
    tracker_client::register(&state.config.tracker_addr, &state.config.share_addr, &names)?;
    LOGGER.info(format!("sharing {} file(s)", names.len()));
    Ok(names.len())
}

/// Full requester flow: tracker lookup, then a download from the first
/// candidate. No failover to the rest of the list.
pub fn fetch_file(name: &str, save_dir: &Path, state: &DaemonState) -> io::Result<PathBuf> {
    let peers = tracker_client::find_peers(&state.config.tracker_addr, name)?.ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("no peer holds {name:?}"),
        )
    })?;
    let peer = &peers[0];

    state.downloading.lock().unwrap().push(name.to_string());
    let result = transfer::download_from(peer, name, save_dir, state.config.mode);

    let mut downloading = state.downloading.lock().unwrap();
    if let Some(pos) = downloading.iter().position(|n| n == name) {
        downloading.remove(pos);
    }

    result
}

/// Handles one client IPC action and writes the serialized reply.
pub fn action_processor(action: &Action, mut stream: TcpStream, state: &DaemonState) -> io::Result<()> {
    match action {
        Action::Ls => {
            let shared_map = state.index.lock().unwrap().snapshot();
            reply(&mut stream, &Response::Ls { shared_map })?;
        }

        Action::Get {
            file_name,
            save_path,
            wait,
        } => {
            LOGGER.info(format!("get {file_name:?}"));
            let save_dir = if save_path.as_os_str().is_empty() {
                state.config.save_dir.clone()
            } else {
                save_path.clone()
            };

            if *wait {
                let response = match fetch_file(file_name, &save_dir, state) {
                    Ok(_) => Response::Ok,
                    Err(e) => Response::Err(e.to_string()),
                };
                reply(&mut stream, &response)?;
            } else {
                let file_name = file_name.clone();
                let state = state.clone();
                thread::spawn(move || {
                    if let Err(e) = fetch_file(&file_name, &save_dir, &state) {
                        LOGGER.error(e);
                    }
                });
                reply(&mut stream, &Response::Ok)?;
            }
        }

        Action::Status => {
            let transferring_map = state.transferring.lock().unwrap().clone();
            let shared_map = state.index.lock().unwrap().snapshot();
            let downloading_map = state.downloading.lock().unwrap().clone();
            reply(
                &mut stream,
                &Response::Status {
                    transferring_map,
                    shared_map,
                    downloading_map,
                },
            )?;
        }

        Action::Rescan => {
            let response = match rescan(state) {
                Ok(_) => Response::Ok,
                Err(e) => Response::Err(e.to_string()),
            };
            reply(&mut stream, &response)?;
        }
    }

    Ok(())
}

fn reply(stream: &mut TcpStream, response: &Response) -> io::Result<()> {
    let serialized = serde_json::to_string(response)?;
    stream.write_all(serialized.as_bytes())
}
