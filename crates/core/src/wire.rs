//! Framing for the binary transfer channel.
//!
//! A transfer connection opens with the requester writing the raw file
//! name. The holder answers with a tagged header: one status byte and a
//! little-endian u64. On `STATUS_OK` the u64 is the file length and chunk
//! data follows; on `STATUS_ERR` the u64 is the length of a UTF-8 message
//! that follows, and the connection closes after it. The tag is what lets
//! the requester tell a size header from an error without guessing.

use std::io::{self, Read, Write};

pub const STATUS_OK: u8 = 0x00;
pub const STATUS_ERR: u8 = 0x01;

#[derive(Debug, PartialEq)]
/// Holder's answer to a file request, first frame on the wire.
pub enum FileInfo {
    /// File exists; size in bytes, data phase follows.
    Size(u64),
    /// Request failed; human-readable reason.
    Error(String),
}

pub fn write_file_info<W: Write>(stream: &mut W, info: &FileInfo) -> io::Result<()> {
    match info {
        FileInfo::Size(size) => {
            stream.write_all(&[STATUS_OK])?;
            stream.write_all(&size.to_le_bytes())?;
        }
        FileInfo::Error(msg) => {
            stream.write_all(&[STATUS_ERR])?;
            stream.write_all(&(msg.len() as u64).to_le_bytes())?;
            stream.write_all(msg.as_bytes())?;
        }
    }
    Ok(())
}

pub fn read_file_info<R: Read>(stream: &mut R) -> io::Result<FileInfo> {
    let mut status = [0u8; 1];
    stream.read_exact(&mut status)?;
    let mut length = [0u8; 8];
    stream.read_exact(&mut length)?;
    let length = u64::from_le_bytes(length);

    match status[0] {
        STATUS_OK => Ok(FileInfo::Size(length)),
        STATUS_ERR => {
            let mut msg = vec![0u8; length as usize];
            stream.read_exact(&mut msg)?;
            let msg = String::from_utf8(msg).map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidData, "error message is not UTF-8")
            })?;
            Ok(FileInfo::Error(msg))
        }
        other => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unknown status byte {other:#04x}"),
        )),
    }
}

/// Writes `name` into a fixed-width, null-padded field. Names longer than
/// the field are cut off at `field_size` bytes.
pub fn write_name_field<W: Write + ?Sized>(stream: &mut W, name: &str, field_size: usize) -> io::Result<()> {
    let mut field = vec![0u8; field_size];
    let bytes = name.as_bytes();
    let len = bytes.len().min(field_size);
    field[..len].copy_from_slice(&bytes[..len]);
    stream.write_all(&field)
}

/// Reads a fixed-width name field and strips the null padding.
pub fn read_name_field<R: Read + ?Sized>(stream: &mut R, field_size: usize) -> io::Result<String> {
    let mut field = vec![0u8; field_size];
    stream.read_exact(&mut field)?;
    Ok(String::from_utf8_lossy(&field)
        .trim_end_matches('\0')
        .to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn size_header_round_trip() {
        let mut wire = Vec::new();
        write_file_info(&mut wire, &FileInfo::Size(10000)).unwrap();
        assert_eq!(wire.len(), 9);
        assert_eq!(wire[0], STATUS_OK);

        let info = read_file_info(&mut Cursor::new(wire)).unwrap();
        assert_eq!(info, FileInfo::Size(10000));
    }

    #[test]
    fn error_header_carries_message() {
        let mut wire = Vec::new();
        write_file_info(&mut wire, &FileInfo::Error(String::from("File not found"))).unwrap();
        assert_eq!(wire[0], STATUS_ERR);

        let info = read_file_info(&mut Cursor::new(wire)).unwrap();
        assert_eq!(info, FileInfo::Error(String::from("File not found")));
    }

    #[test]
    fn unknown_status_byte_is_rejected() {
        let wire = vec![0x7f; 9];
        let err = read_file_info(&mut Cursor::new(wire)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn name_field_pads_and_trims() {
        let mut wire = Vec::new();
        write_name_field(&mut wire, "a.txt", 16).unwrap();
        assert_eq!(wire.len(), 16);
        assert_eq!(&wire[..5], b"a.txt");
        assert_eq!(wire[5], 0);

        let name = read_name_field(&mut Cursor::new(wire), 16).unwrap();
        assert_eq!(name, "a.txt");
    }

    #[test]
    fn name_field_truncates_long_names() {
        let mut wire = Vec::new();
        write_name_field(&mut wire, "a-rather-long-name.txt", 8).unwrap();
        assert_eq!(wire.len(), 8);

        let name = read_name_field(&mut Cursor::new(wire), 8).unwrap();
        assert_eq!(name, "a-rather");
    }
}
