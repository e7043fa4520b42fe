pub use std::net::Ipv4Addr;

pub const LOCALHOST: &str = "localhost";
pub const LOCAL_NETWORK: Ipv4Addr = Ipv4Addr::new(0, 0, 0, 0);

pub const PORT_TRACKER: u16 = 7645;
pub const PORT_CLIENT_DAEMON: u16 = 7646;
pub const PORT_FILE_SHARE: u16 = 7648;

pub const CHUNK_SIZE: usize = 4096;
/// Upper bound on a raw file-name request on the share port.
pub const REQUEST_BUFFER_SIZE: usize = 1024;
/// Width of the null-padded name field sent ahead of a pull transfer.
pub const NAME_FIELD_SIZE: usize = 256;
/// Token a pull-mode requester sends before every chunk.
pub const CHUNK_TOKEN: &[u8; 4] = b"NEXT";

/// Downloads land next to each other as `received_<name>`.
pub const RECEIVED_PREFIX: &str = "received_";
