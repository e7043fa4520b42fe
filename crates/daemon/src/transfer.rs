//! Chunked file transfer over a direct peer connection.
//!
//! The requester opens with the raw bytes of the file name, the holder
//! answers with the tagged header from `p2p_core::wire`, then the data
//! phase runs through one of two transport strategies. Push streams
//! chunks back-to-back and relies on end-of-stream; pull gates every
//! chunk on a 4-byte request token and prefixes the data with a
//! fixed-width copy of the file name.

use std::fs::File;
use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use p2p_config::{CHUNK_SIZE, CHUNK_TOKEN, NAME_FIELD_SIZE, RECEIVED_PREFIX, REQUEST_BUFFER_SIZE};
use p2p_core::entities::{TransferMode, TransferSession};
use p2p_core::utils::create_buffer;
use p2p_core::wire::{self, FileInfo};

use crate::entities::{FileIndex, TransferGuard, TransferMap};
use crate::LOGGER;

/// Both halves of a duplex connection, object-safe so a transport can be
/// exercised against an in-memory stream.
pub trait Wire: Read + Write {}
impl<T: Read + Write> Wire for T {}

/// Data-phase strategy; one implementation per transfer mode, selected by
/// daemon configuration at session start.
pub trait ChunkTransport {
    /// Holder half: moves `session.total_size` bytes from `src` to the wire.
    fn serve(
        &self,
        src: &mut dyn Read,
        session: &mut TransferSession,
        wire: &mut dyn Wire,
    ) -> io::Result<()>;

    /// Requester half: drains the wire into `sink`, tracking progress in
    /// `session`.
    fn fetch(
        &self,
        wire: &mut dyn Wire,
        session: &mut TransferSession,
        sink: &mut dyn Write,
    ) -> io::Result<()>;
}

/// Streams chunks with no pacing. The only end marker is the holder
/// closing its end, so a truncated transfer reads like a short but
/// successful one. Kept as a compatibility mode.
pub struct PushTransport;

/// Waits for a request token before every chunk, giving the requester
/// natural backpressure. The default mode.
pub struct PullTransport;

pub fn transport_for(mode: TransferMode) -> &'static dyn ChunkTransport {
    match mode {
        TransferMode::Push => &PushTransport,
        TransferMode::Pull => &PullTransport,
    }
}

impl ChunkTransport for PushTransport {
    fn serve(
        &self,
        src: &mut dyn Read,
        session: &mut TransferSession,
        wire: &mut dyn Wire,
    ) -> io::Result<()> {
        loop {
            let read = src.read(&mut session.buf)?;
            if read == 0 {
                break;
            }
            wire.write_all(&session.buf[..read])?;
            session.transferred += read as u64;
        }
        Ok(())
    }

    fn fetch(
        &self,
        wire: &mut dyn Wire,
        session: &mut TransferSession,
        sink: &mut dyn Write,
    ) -> io::Result<()> {
        // Reads until end-of-stream, with no check against the declared
        // size; a holder dying mid-transfer leaves a short file behind.
        loop {
            let read = wire.read(&mut session.buf)?;
            if read == 0 {
                break;
            }
            sink.write_all(&session.buf[..read])?;
            session.transferred += read as u64;
        }
        Ok(())
    }
}

impl ChunkTransport for PullTransport {
    fn serve(
        &self,
        src: &mut dyn Read,
        session: &mut TransferSession,
        wire: &mut dyn Wire,
    ) -> io::Result<()> {
        wire::write_name_field(wire, &session.file_name, NAME_FIELD_SIZE)?;

        let mut token = [0u8; CHUNK_TOKEN.len()];
        while session.remaining() > 0 {
            // The token's content is not inspected, only its arrival.
            wire.read_exact(&mut token)?;

            let want = session.remaining().min(session.buf.len() as u64) as usize;
            src.read_exact(&mut session.buf[..want])?;
            wire.write_all(&session.buf[..want])?;
            session.transferred += want as u64;
        }
        Ok(())
    }

    fn fetch(
        &self,
        wire: &mut dyn Wire,
        session: &mut TransferSession,
        sink: &mut dyn Write,
    ) -> io::Result<()> {
        let name = wire::read_name_field(wire, NAME_FIELD_SIZE)?;
        LOGGER.debug(format!("holder names the transfer {name:?}"));

        while session.remaining() > 0 {
            wire.write_all(CHUNK_TOKEN)?;

            let want = session.remaining().min(session.buf.len() as u64) as usize;
            wire.read_exact(&mut session.buf[..want])?;
            sink.write_all(&session.buf[..want])?;
            session.transferred += want as u64;
        }
        Ok(())
    }
}

/// Serves one file-request connection on the share port.
///
/// Reads the requested name, resolves it against the index and either
/// answers with an error header or streams the file through the
/// configured transport. The transfer shows up in `transferring` for the
/// duration of the session.
pub fn serve_request(
    mut stream: TcpStream,
    index: &Arc<Mutex<FileIndex>>,
    transferring: TransferMap,
    mode: TransferMode,
) -> io::Result<()> {
    let peer = stream.peer_addr()?;

    let mut request = create_buffer(REQUEST_BUFFER_SIZE);
    let read = stream.read(&mut request)?;
    let name = String::from_utf8_lossy(&request[..read]).trim().to_string();

    let path = { index.lock().unwrap().resolve(&name) };
    let Some(path) = path else {
        LOGGER.info(format!("{peer} asked for unknown file {name:?}"));
        return wire::write_file_info(
            &mut stream,
            &FileInfo::Error(String::from("File not found")),
        );
    };

    let mut file = File::open(&path)?;
    let size = file.metadata()?.len();
    wire::write_file_info(&mut stream, &FileInfo::Size(size))?;

    let _guard = TransferGuard::new(transferring, name.clone(), peer);
    let mut session = TransferSession::new(name, size, CHUNK_SIZE);
    transport_for(mode).serve(&mut file, &mut session, &mut stream)?;

    LOGGER.info(format!(
        "served {:?} to {peer} ({} bytes)",
        session.file_name, session.transferred
    ));
    Ok(())
}

/// Downloads `name` from `peer` into `save_dir` as `received_<name>`,
/// overwriting any previous download of the same name. Returns the sink
/// path.
pub fn download_from(
    peer: &str,
    name: &str,
    save_dir: &Path,
    mode: TransferMode,
) -> io::Result<PathBuf> {
    let mut stream = TcpStream::connect(peer)?;
    stream.write_all(name.as_bytes())?;

    let size = match wire::read_file_info(&mut stream)? {
        FileInfo::Size(size) => size,
        FileInfo::Error(msg) => {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{peer}: {msg}"),
            ));
        }
    };

    let sink_path = save_dir.join(format!("{RECEIVED_PREFIX}{name}"));
    let mut sink = File::create(&sink_path)?;

    LOGGER.info(format!("downloading {name:?} from {peer} ({size} bytes)"));
    let mut session = TransferSession::new(name, size, CHUNK_SIZE);
    transport_for(mode).fetch(&mut stream, &mut session, &mut sink)?;
    LOGGER.info(format!(
        "saved {} ({} bytes)",
        sink_path.display(),
        session.transferred
    ));

    Ok(sink_path)
}
