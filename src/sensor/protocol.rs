//! Sensor wire format
//!
//! Datagrams from the sensor come in three shapes:
//!
//! | Length / prefix | Content                                       |
//! |-----------------|-----------------------------------------------|
//! | 2 bytes         | processed heartbeat sample, `u16` big endian  |
//! | 8 bytes         | raw, processed, BPM, IBI as `u16` big endian  |
//! | starts with `{` | JSON status snapshot                          |
//!
//! Commands go the other way as JSON `{"command": .., "data": ..}`.

use super::SensorCommand;
use crate::error::{DashError, Result};
use crate::events::SensorEvent;
use crate::store::SensorStatus;
use crate::window::Sample;
use bytes::Buf;
use serde::Serialize;

#[derive(Serialize)]
struct CommandFrame<'a> {
    command: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<String>,
}

/// Decode one datagram into the events it carries.
///
/// Samples are stamped with the time of decoding.
pub fn decode_datagram(datagram: &[u8]) -> Result<Vec<SensorEvent>> {
    let len = datagram.len();
    let captured_at = chrono::Local::now();

    if datagram.first() == Some(&b'{') {
        let status: SensorStatus =
            serde_json::from_slice(datagram).map_err(|e| DashError::Decode {
                len,
                reason: e.to_string(),
            })?;
        return Ok(vec![SensorEvent::Status(status)]);
    }

    let mut buf = datagram;
    match len {
        2 => Ok(vec![SensorEvent::HeartbeatSample(Sample::at(
            f64::from(buf.get_u16()),
            captured_at,
        ))]),
        8 => {
            let raw = f64::from(buf.get_u16());
            let heartbeat = f64::from(buf.get_u16());
            let bpm = f64::from(buf.get_u16());
            let ibi = f64::from(buf.get_u16());
            Ok(vec![
                SensorEvent::RawSample(Sample::at(raw, captured_at)),
                SensorEvent::HeartbeatSample(Sample::at(heartbeat, captured_at)),
                SensorEvent::Bpm(bpm),
                SensorEvent::Ibi(ibi),
            ])
        }
        _ => Err(DashError::Decode {
            len,
            reason: "unknown datagram layout".into(),
        }),
    }
}

/// Encode a command for the sensor
pub fn encode_command(command: &SensorCommand) -> Vec<u8> {
    let frame = CommandFrame {
        command: command.name(),
        data: command.data(),
    };
    // Plain struct of strings, serialization cannot fail
    serde_json::to_vec(&frame).unwrap_or_default()
}

/// Encode a sample frame the way the sensor does (used by tests and the dummy source)
pub fn encode_samples(raw: u16, heartbeat: u16, bpm: u16, ibi: u16) -> [u8; 8] {
    let mut out = [0u8; 8];
    out[0..2].copy_from_slice(&raw.to_be_bytes());
    out[2..4].copy_from_slice(&heartbeat.to_be_bytes());
    out[4..6].copy_from_slice(&bpm.to_be_bytes());
    out[6..8].copy_from_slice(&ibi.to_be_bytes());
    out
}
