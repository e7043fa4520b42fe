use std::io;
use std::io::prelude::*;
use std::net::TcpStream;
use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command};
use p2p_config::{CHUNK_SIZE, LOCALHOST, PORT_CLIENT_DAEMON};
use p2p_core::entities::{Action, Response};
use p2p_core::utils::{create_buffer, Logger};
use serde_json::{from_slice, to_string};

pub static LOGGER: Logger = Logger::compact("cli");

pub fn connect() -> io::Result<TcpStream> {
    LOGGER.debug(format!("connect {}:{}", LOCALHOST, PORT_CLIENT_DAEMON));
    let stream = TcpStream::connect((LOCALHOST, PORT_CLIENT_DAEMON))?;
    LOGGER.debug(format!("connected, local={}", stream.local_addr()?));
    Ok(stream)
}

/// Builds the CLI interface definition for the `p2p-cli` client.
///
/// The tool talks to a running daemon over its localhost socket, one
/// command per invocation:
///
/// - **ls**   List the files the daemon offers from its shared directory.
///   Example: ```bash p2p-cli ls ```
///
/// - **get** `-f <NAME>` [`-o <OUT_DIR>`] [`-w`]   Locate a holder through
///   the tracker and download the file as `received_<NAME>`.
///   - `-f, --file <NAME>`: Name of the file to download (required).
///   - `-o, --out <OUT_DIR>`: Optional save directory.
///   - `-w, --wait`: Wait (block) until the download finishes.
///
///   Examples:
///   ```bash
///   # Download without waiting, into the daemon's save directory
///   p2p-cli get -f myfile.txt
///
///   # Download into a specific directory and wait until finished
///   p2p-cli get -f myfile.txt -o ./downloads -w
///   ```
///
/// - **status**   Show what is being served to peers, what is shared and
///   what is downloading.   Example: ```bash p2p-cli status ```
///
/// - **rescan**   Rebuild the shared index and announce it to the tracker
///   again.   Example: ```bash p2p-cli rescan ```
///
/// This function only **defines** the CLI structure; to parse user input,
/// call `.get_matches()` on the returned `Command` in `main()`.
pub fn create_command() -> Command {
    Command::new("p2p-cli")
        .about("Interaction with daemon")
        .subcommand_required(true) // should be at least 1 action
        .arg_required_else_help(true)
        .subcommand(Command::new("ls").about("List files offered for sharing"))
        .subcommand(
            Command::new("get")
                .about("Download a file from a peer")
                .arg(
                    Arg::new("FILE_NAME")
                        .help("Name of file to download")
                        .required(true)
                        .short('f')
                        .long("file")
                        .value_name("NAME"),
                )
                .arg(
                    Arg::new("SAVE_PATH")
                        .help("Optional save directory")
                        .value_name("OUT_DIR")
                        .short('o')
                        .long("out"),
                )
                .arg(
                    Arg::new("WAIT")
                        .help("Wait (block) until download finishes")
                        .short('w')
                        .long("wait")
                        .action(ArgAction::SetTrue), // bool-flag
                ),
        )
        .subcommand(Command::new("status").about("Show current status"))
        .subcommand(Command::new("rescan").about("Rescan the shared directory"))
}

pub fn process_actions(stream: &mut TcpStream, matches: &ArgMatches) -> io::Result<()> {
    let action = match matches.subcommand() {
        Some(("ls", _)) => Action::Ls,

        Some(("get", sub)) => {
            let file_name = String::from(sub.get_one::<String>("FILE_NAME").unwrap());
            let save_path = sub
                .get_one::<String>("SAVE_PATH")
                .map(PathBuf::from)
                .unwrap_or_default();
            let wait = sub.get_flag("WAIT");

            Action::Get {
                file_name,
                save_path,
                wait,
            }
        }

        Some(("status", _)) => Action::Status,

        Some(("rescan", _)) => Action::Rescan,

        _ => {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "Wrong action!"));
        }
    };

    LOGGER.debug(format!("send {action:?}"));
    let serialized = to_string(&action)?;
    stream.write_all(serialized.as_bytes())?;
    LOGGER.debug("request written, waiting for reply...");

    Ok(())
}

pub fn process_daemon_response(stream: &mut TcpStream) -> io::Result<()> {
    let mut buf = create_buffer(CHUNK_SIZE);
    let size = stream.read(&mut buf)?;
    let answer: Response = from_slice(&buf[..size])?;
    LOGGER.debug(format!("got reply {} bytes", size));

    match answer {
        Response::Ok => {
            LOGGER.info("Done");
        }

        Response::Err(e) => {
            LOGGER.error(e);
        }

        Response::Ls { shared_map } => {
            LOGGER.debug(format!("Ls -> {} files", shared_map.len()));
            LOGGER.info("Files offered for sharing:");

            for file in shared_map.keys() {
                println!("\t{}", file);
            }
        }

        Response::Status {
            transferring_map: t_map,
            shared_map: s_map,
            downloading_map: d_map,
        } => {
            LOGGER.debug(format!(
                "Status -> shared={} transferring={} downloading={}",
                s_map.len(),
                t_map.len(),
                d_map.len()
            ));
            LOGGER.info("Sharing:");

            for file in s_map.keys() {
                println!("\t{}", file);
                if let Some(peers) = t_map.get(file) {
                    for peer in peers.iter() {
                        println!("\t\t-> {}", peer);
                    }
                }
            }

            LOGGER.info("Downloading:");

            for file in d_map {
                println!("\t{}", file);
            }
        }
    }

    Ok(())
}
