//! QGC WPL waypoint file format: reader and writer (§6).
//!
//! Grounded on `UBPlanner::loadWaypoints`/`storeWaypoints`: a one-line
//! `QGC WPL <version>` header with a minimum supported version, followed by
//! one tab-separated record per waypoint. The writer always emits version
//! 110 with CRLF line endings, matching the original's `"QGC WPL 110\r\n"`.

use std::io::{BufRead, Write};

use thiserror::Error;
use tracing::debug;

/// Minimum waypoint file version this reader accepts.
pub const MIN_SUPPORTED_VERSION: u32 = 110;

/// MAVLink navigation command codes used by the mission emitter.
pub mod command {
    pub const WAYPOINT: u16 = 16;
    pub const RETURN_TO_LAUNCH: u16 = 20;
    pub const LAND: u16 = 21;
    pub const TAKEOFF: u16 = 22;
}

/// `MAV_FRAME_GLOBAL_RELATIVE_ALT`, the frame every emitted waypoint uses.
pub const FRAME_GLOBAL_RELATIVE_ALT: u8 = 3;

/// Errors raised while reading or writing a waypoint file.
#[derive(Error, Debug)]
pub enum WaypointError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("waypoint file is empty")]
    EmptyFile,

    #[error("waypoint file header {0:?} is malformed, version not detectable")]
    MalformedHeader(String),

    #[error("waypoint file is version {found}, but {min_supported} or higher is required")]
    UnsupportedVersion { found: u32, min_supported: u32 },

    #[error("waypoint record {0} is corrupt: expected 12 tab-separated fields")]
    MalformedRecord(usize),
}

/// One waypoint record (§6).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub seq: u32,
    pub current: bool,
    pub frame: u8,
    pub command: u16,
    pub param1: f64,
    pub param2: f64,
    pub param3: f64,
    pub param4: f64,
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
    pub autocontinue: bool,
}

impl Waypoint {
    fn to_line(self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.8}\t{:.8}\t{}\t{}\r\n",
            self.seq,
            self.current as u8,
            self.frame,
            self.command,
            self.param1,
            self.param2,
            self.param3,
            self.param4,
            self.lat,
            self.lon,
            self.alt,
            self.autocontinue as u8,
        )
    }

    fn from_fields(seq: usize, fields: &[&str]) -> Result<Self, WaypointError> {
        if fields.len() != 12 {
            return Err(WaypointError::MalformedRecord(seq));
        }
        let parse_u32 = |s: &str| s.parse::<u32>().map_err(|_| WaypointError::MalformedRecord(seq));
        let parse_u16 = |s: &str| s.parse::<u16>().map_err(|_| WaypointError::MalformedRecord(seq));
        let parse_u8 = |s: &str| s.parse::<u8>().map_err(|_| WaypointError::MalformedRecord(seq));
        let parse_f64 = |s: &str| s.parse::<f64>().map_err(|_| WaypointError::MalformedRecord(seq));
        let parse_bool = |s: &str| match s.trim() {
            "0" => Ok(false),
            "1" => Ok(true),
            _ => Err(WaypointError::MalformedRecord(seq)),
        };

        Ok(Waypoint {
            seq: parse_u32(fields[0])?,
            current: parse_bool(fields[1])?,
            frame: parse_u8(fields[2])?,
            command: parse_u16(fields[3])?,
            param1: parse_f64(fields[4])?,
            param2: parse_f64(fields[5])?,
            param3: parse_f64(fields[6])?,
            param4: parse_f64(fields[7])?,
            lat: parse_f64(fields[8])?,
            lon: parse_f64(fields[9])?,
            alt: parse_f64(fields[10])?,
            autocontinue: parse_bool(fields[11])?,
        })
    }
}

/// Parse a `QGC WPL <version>` file from any reader, rejecting versions
/// below [`MIN_SUPPORTED_VERSION`].
pub fn read<R: BufRead>(mut reader: R) -> Result<Vec<Waypoint>, WaypointError> {
    let mut header = String::new();
    if reader.read_line(&mut header)? == 0 {
        return Err(WaypointError::EmptyFile);
    }
    let header_fields: Vec<&str> = header.trim_end().split(' ').collect();
    if header_fields.len() != 3 || header_fields[0] != "QGC" || header_fields[1] != "WPL" {
        return Err(WaypointError::MalformedHeader(header.trim_end().to_string()));
    }
    let version: u32 = header_fields[2]
        .parse()
        .map_err(|_| WaypointError::MalformedHeader(header.trim_end().to_string()))?;
    if version < MIN_SUPPORTED_VERSION {
        return Err(WaypointError::UnsupportedVersion {
            found: version,
            min_supported: MIN_SUPPORTED_VERSION,
        });
    }

    let mut waypoints = Vec::new();
    for (seq, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        waypoints.push(Waypoint::from_fields(seq, &fields)?);
    }

    debug!(count = waypoints.len(), version, "read waypoint file");
    Ok(waypoints)
}

/// Write `waypoints` as a `QGC WPL 110` file, with CRLF line endings, to any
/// writer. Waypoint `seq` values are renumbered to their position in the
/// list, matching `UBPlanner::storeWaypoints`.
pub fn write<W: Write>(mut writer: W, waypoints: &[Waypoint]) -> Result<(), WaypointError> {
    write!(writer, "QGC WPL 110\r\n")?;
    for (seq, wp) in waypoints.iter().enumerate() {
        let mut wp = *wp;
        wp.seq = seq as u32;
        writer.write_all(wp.to_line().as_bytes())?;
    }
    debug!(count = waypoints.len(), "wrote waypoint file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Waypoint> {
        vec![
            Waypoint {
                seq: 0,
                current: true,
                frame: FRAME_GLOBAL_RELATIVE_ALT,
                command: command::TAKEOFF,
                param1: 0.0,
                param2: 0.0,
                param3: 0.0,
                param4: 0.0,
                lat: 40.0,
                lon: -105.0,
                alt: 20.0,
                autocontinue: true,
            },
            Waypoint {
                seq: 1,
                current: false,
                frame: FRAME_GLOBAL_RELATIVE_ALT,
                command: command::LAND,
                param1: 0.0,
                param2: 0.0,
                param3: 0.0,
                param4: 0.0,
                lat: 40.0001,
                lon: -105.0001,
                alt: 0.0,
                autocontinue: true,
            },
        ]
    }

    #[test]
    fn round_trips_through_write_and_read() {
        let mut buf = Vec::new();
        write(&mut buf, &sample()).expect("write should succeed");
        assert!(buf.starts_with(b"QGC WPL 110\r\n"));

        let parsed = read(&buf[..]).expect("read should succeed");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].command, command::TAKEOFF);
        assert_eq!(parsed[1].command, command::LAND);
        assert!((parsed[0].lat - 40.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_versions_below_110() {
        let input = b"QGC WPL 100\r\n";
        assert!(matches!(
            read(&input[..]),
            Err(WaypointError::UnsupportedVersion { found: 100, .. })
        ));
    }

    #[test]
    fn rejects_missing_header() {
        let input = b"not a waypoint file\r\n";
        assert!(matches!(
            read(&input[..]),
            Err(WaypointError::MalformedHeader(_))
        ));
    }
}
