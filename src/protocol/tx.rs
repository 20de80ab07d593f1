//! Host-originated packets
//!
//! These packet types are built by the controller and encoded for
//! transmission; they also decode, which keeps round-trip tests honest.
//! Length fields are recomputed from the payload at encode time; a stored
//! value, e.g. one picked up by a decode, is never trusted.

use crate::core::constants::WORK_DATA_SIZE;
use crate::core::Work;
use crate::error::{Error, Result};
use crate::protocol::frame;
use bytes::{Buf, BufMut};

/// Job dispatch carrying one or more hardware payloads (type `0xA1`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobPacket {
    /// Stored length field; recomputed on encode
    pub length: u32,
    /// Share target in the device's compact form
    pub target: u64,
    /// First nonce of the scan range
    pub start_nonce: u64,
    /// Last nonce of the scan range
    pub end_nonce: u64,
    /// Number of work units in `job_data`
    pub job_num: u8,
    /// Device-local job slot
    pub job_id: u8,
    /// Concatenated 136-byte hardware payloads
    pub job_data: Vec<u8>,
}

impl JobPacket {
    /// Packet type tag
    pub const TYPE: u8 = 0xA1;

    /// Payload bytes preceding `job_data`
    const HEAD_SIZE: usize = 30;

    /// Append one work unit's hardware payload
    pub fn push_work(&mut self, work: &Work) {
        self.job_data.extend_from_slice(work.data());
        self.job_num += 1;
    }

    /// Decode a job packet from a complete frame
    pub fn decode(frame: &[u8]) -> Result<Self> {
        let payload = frame::validate(frame, Self::TYPE)?;
        frame::require_payload(payload, Self::HEAD_SIZE)?;

        let mut buf = payload;
        let length = buf.get_u32_le();
        let target = buf.get_u64_le();
        let start_nonce = buf.get_u64_le();
        let end_nonce = buf.get_u64_le();
        let job_num = buf.get_u8();
        let job_id = buf.get_u8();

        Ok(Self {
            length,
            target,
            start_nonce,
            end_nonce,
            job_num,
            job_id,
            job_data: buf.to_vec(),
        })
    }

    /// Encode for transmission, recomputing the length field
    pub fn encode(&self) -> Result<Vec<u8>> {
        if !self.job_data.is_empty() && self.job_data.len() % WORK_DATA_SIZE != 0 {
            return Err(Error::invalid_length(
                "job_data",
                WORK_DATA_SIZE * self.job_num.max(1) as usize,
                self.job_data.len(),
            ));
        }

        let mut payload = Vec::with_capacity(Self::HEAD_SIZE + self.job_data.len());
        payload.put_u32_le(frame::length_field(
            Self::HEAD_SIZE - 4 + self.job_data.len(),
        ));
        payload.put_u64_le(self.target);
        payload.put_u64_le(self.start_nonce);
        payload.put_u64_le(self.end_nonce);
        payload.put_u8(self.job_num);
        payload.put_u8(self.job_id);
        payload.put_slice(&self.job_data);
        Ok(frame::encode(Self::TYPE, &payload))
    }
}

/// Device parameter values carried by a set request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceParams {
    /// Core voltage in millivolts
    pub voltage: u16,
    /// Chip frequency in MHz
    pub freq: u16,
    /// Operating mode
    pub mode: u32,
    /// Temperature limit in degrees Celsius
    pub temp: u8,
}

/// What a parameter packet asks the device to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamsAction {
    /// Ask the device to report its current parameters
    Query,
    /// Push new parameter values to the device
    Set(DeviceParams),
}

/// Parameter query/set request (type `0xA2`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamsPacket {
    /// Stored length field; recomputed on encode
    pub length: u32,
    /// Query or set, with the values for a set
    pub action: ParamsAction,
}

impl ParamsPacket {
    /// Packet type tag
    pub const TYPE: u8 = 0xA2;

    /// Flag byte selecting a parameter query
    pub const FLAG_QUERY: u8 = 0x52;

    /// Flag byte selecting a parameter set
    pub const FLAG_SET: u8 = 0xA2;

    /// Build a parameter query
    pub fn query() -> Self {
        Self {
            length: frame::length_field(1),
            action: ParamsAction::Query,
        }
    }

    /// Build a parameter set request
    pub fn set(params: DeviceParams) -> Self {
        Self {
            length: frame::length_field(10),
            action: ParamsAction::Set(params),
        }
    }

    /// Decode a parameter packet from a complete frame
    pub fn decode(frame: &[u8]) -> Result<Self> {
        let payload = frame::validate(frame, Self::TYPE)?;
        frame::require_payload(payload, 5)?;

        let mut buf = payload;
        let length = buf.get_u32_le();
        let action = match buf.get_u8() {
            Self::FLAG_QUERY => ParamsAction::Query,
            Self::FLAG_SET => {
                frame::require_payload(payload, 14)?;
                ParamsAction::Set(DeviceParams {
                    voltage: buf.get_u16_le(),
                    freq: buf.get_u16_le(),
                    mode: buf.get_u32_le(),
                    temp: buf.get_u8(),
                })
            }
            flag => {
                return Err(Error::unsupported(format!(
                    "unknown parameter flag {flag:#04x}"
                )))
            }
        };

        Ok(Self { length, action })
    }

    /// Encode for transmission, recomputing the length field.
    ///
    /// A query truncates the payload after the flag byte; a set carries
    /// the full parameter block.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut payload = Vec::new();
        match self.action {
            ParamsAction::Query => {
                payload.put_u32_le(frame::length_field(1));
                payload.put_u8(Self::FLAG_QUERY);
            }
            ParamsAction::Set(params) => {
                payload.put_u32_le(frame::length_field(10));
                payload.put_u8(Self::FLAG_SET);
                payload.put_u16_le(params.voltage);
                payload.put_u16_le(params.freq);
                payload.put_u32_le(params.mode);
                payload.put_u8(params.temp);
            }
        }
        Ok(frame::encode(Self::TYPE, &payload))
    }
}

/// Request for a device identification report (type `0xA4`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfoQueryPacket {
    /// Stored length field; recomputed on encode
    pub length: u32,
}

impl DeviceInfoQueryPacket {
    /// Packet type tag
    pub const TYPE: u8 = 0xA4;

    /// Decode a device-info query from a complete frame
    pub fn decode(frame: &[u8]) -> Result<Self> {
        let payload = frame::validate(frame, Self::TYPE)?;
        frame::require_payload(payload, 4)?;

        let mut buf = payload;
        Ok(Self {
            length: buf.get_u32_le(),
        })
    }

    /// Encode for transmission, recomputing the length field
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(frame::encode(
            Self::TYPE,
            &frame::length_field(0).to_le_bytes(),
        ))
    }
}

impl Default for DeviceInfoQueryPacket {
    fn default() -> Self {
        Self {
            length: frame::length_field(0),
        }
    }
}

/// Device restart command (type `0xAC`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestartPacket {
    /// Stored length field; recomputed on encode
    pub length: u32,
}

impl RestartPacket {
    /// Packet type tag
    pub const TYPE: u8 = 0xAC;

    /// Decode a restart command from a complete frame
    pub fn decode(frame: &[u8]) -> Result<Self> {
        let payload = frame::validate(frame, Self::TYPE)?;
        frame::require_payload(payload, 4)?;

        let mut buf = payload;
        Ok(Self {
            length: buf.get_u32_le(),
        })
    }

    /// Encode for transmission, recomputing the length field
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(frame::encode(
            Self::TYPE,
            &frame::length_field(0).to_le_bytes(),
        ))
    }
}

impl Default for RestartPacket {
    fn default() -> Self {
        Self {
            length: frame::length_field(0),
        }
    }
}
