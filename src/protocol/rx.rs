//! Device-originated packets
//!
//! These packet types only ever flow device → host, so they decode from
//! captured frames but refuse to encode. Decoders return fully initialized
//! values or a typed error; nothing is mutated in place.

use crate::error::{Error, Result};
use crate::protocol::frame;
use bytes::Buf;

/// Periodic device status report (type `0x52`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusPacket {
    /// Stored length field
    pub length: u32,
    /// Number of hashing chips
    pub chips: u8,
    /// Cores per chip
    pub cores: u8,
    /// Cores currently passing self-test
    pub good_cores: u8,
    /// Width of the per-core nonce scan window, in bits
    pub scanbits: u8,
    /// Scan interval in seconds
    pub scantime: u16,
    /// Core voltage in millivolts
    pub voltage: u16,
    /// Chip frequency in MHz
    pub freq: u16,
    /// Operating mode
    pub mode: u32,
    /// Board temperature in degrees Celsius
    pub temp: u8,
    /// Number of reboots since power-on
    pub reboot_count: u8,
    /// Temperature warning flag
    pub temp_warn: u8,
    /// Fan warning flag
    pub fan_warn: u8,
    /// Power warning flag
    pub power_warn: u8,
    /// Fan speed in RPM
    pub rpm: u16,
}

impl StatusPacket {
    /// Packet type tag
    pub const TYPE: u8 = 0x52;

    /// Fixed payload size in bytes
    const PAYLOAD_SIZE: usize = 25;

    /// Decode a status packet from a complete frame
    pub fn decode(frame: &[u8]) -> Result<Self> {
        let payload = frame::validate(frame, Self::TYPE)?;
        frame::require_payload(payload, Self::PAYLOAD_SIZE)?;

        let mut buf = payload;
        Ok(Self {
            length: buf.get_u32_le(),
            chips: buf.get_u8(),
            cores: buf.get_u8(),
            good_cores: buf.get_u8(),
            scanbits: buf.get_u8(),
            scantime: buf.get_u16_le(),
            voltage: buf.get_u16_le(),
            freq: buf.get_u16_le(),
            mode: buf.get_u32_le(),
            temp: buf.get_u8(),
            reboot_count: buf.get_u8(),
            temp_warn: buf.get_u8(),
            fan_warn: buf.get_u8(),
            power_warn: buf.get_u8(),
            rpm: buf.get_u16_le(),
        })
    }

    /// Status packets originate from the device; encoding is not supported
    pub fn encode(&self) -> Result<Vec<u8>> {
        Err(Error::unsupported(
            "status packets originate from the device and cannot be encoded",
        ))
    }

    /// Whether any warning flag is raised
    pub fn has_warnings(&self) -> bool {
        self.temp_warn != 0 || self.fan_warn != 0 || self.power_warn != 0
    }
}

/// Nonce candidate reported by the device (type `0x51`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NoncePacket {
    /// Stored length field
    pub length: u32,
    /// Device-local job slot the nonce belongs to
    pub job_id: u8,
    /// Chip that found the candidate
    pub chip_id: u8,
    /// Core that found the candidate
    pub core_id: u8,
    /// Candidate value: low four bytes nonce, high four bytes time roll
    pub nonce: u64,
}

impl NoncePacket {
    /// Packet type tag
    pub const TYPE: u8 = 0x51;

    /// Payload size up to and including the hash-present flag
    const PAYLOAD_SIZE: usize = 16;

    /// Decode a nonce packet from a complete frame.
    ///
    /// The byte after the nonce signals an attached hash payload. No
    /// firmware observed so far sets it, so that variant is rejected as
    /// unsupported until a sample frame exists to decode against.
    pub fn decode(frame: &[u8]) -> Result<Self> {
        let payload = frame::validate(frame, Self::TYPE)?;
        frame::require_payload(payload, Self::PAYLOAD_SIZE)?;

        if payload[Self::PAYLOAD_SIZE - 1] != 0 {
            return Err(Error::unsupported(
                "nonce packet with attached hash payload is not implemented",
            ));
        }

        let mut buf = payload;
        Ok(Self {
            length: buf.get_u32_le(),
            job_id: buf.get_u8(),
            chip_id: buf.get_u8(),
            core_id: buf.get_u8(),
            nonce: buf.get_u64_le(),
        })
    }

    /// Nonce packets originate from the device; encoding is not supported
    pub fn encode(&self) -> Result<Vec<u8>> {
        Err(Error::unsupported(
            "nonce packets originate from the device and cannot be encoded",
        ))
    }

    /// The candidate as the 8 little-endian bytes fed to nonce
    /// verification
    pub fn candidate(&self) -> [u8; 8] {
        self.nonce.to_le_bytes()
    }
}

/// Acknowledgement for a dispatched job (type `0x55`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobResultPacket {
    /// Stored length field
    pub length: u32,
    /// Result code
    pub data: u8,
}

impl JobResultPacket {
    /// Packet type tag
    pub const TYPE: u8 = 0x55;

    /// Fixed payload size in bytes
    const PAYLOAD_SIZE: usize = 5;

    /// Decode a job-result packet from a complete frame
    pub fn decode(frame: &[u8]) -> Result<Self> {
        let payload = frame::validate(frame, Self::TYPE)?;
        frame::require_payload(payload, Self::PAYLOAD_SIZE)?;

        let mut buf = payload;
        Ok(Self {
            length: buf.get_u32_le(),
            data: buf.get_u8(),
        })
    }

    /// Job-result packets originate from the device; encoding is not
    /// supported
    pub fn encode(&self) -> Result<Vec<u8>> {
        Err(Error::unsupported(
            "job result packets originate from the device and cannot be encoded",
        ))
    }
}

/// Device identification report (type `0x54`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfoPacket {
    /// Stored length field
    pub length: u8,
    /// Valid bytes in `model_name`
    pub model_name_len: u8,
    /// Reserved field
    pub reserved: u32,
    /// Model name, zero-padded
    pub model_name: [u8; 16],
    /// Valid bytes in `firmware_version`
    pub firmware_version_len: u8,
    /// Firmware version, zero-padded
    pub firmware_version: [u8; 8],
    /// Serial number
    pub serial_number: [u8; 21],
    /// Job queue depth the firmware supports
    pub work_depth: u8,
}

impl DeviceInfoPacket {
    /// Packet type tag
    pub const TYPE: u8 = 0x54;

    /// Fixed payload size in bytes
    const PAYLOAD_SIZE: usize = 53;

    /// Decode a device-info packet from a complete frame
    pub fn decode(frame: &[u8]) -> Result<Self> {
        let payload = frame::validate(frame, Self::TYPE)?;
        frame::require_payload(payload, Self::PAYLOAD_SIZE)?;

        let mut buf = payload;
        let length = buf.get_u8();
        let model_name_len = buf.get_u8();
        let reserved = buf.get_u32_le();

        let mut model_name = [0u8; 16];
        buf.copy_to_slice(&mut model_name);
        let firmware_version_len = buf.get_u8();
        let mut firmware_version = [0u8; 8];
        buf.copy_to_slice(&mut firmware_version);
        let mut serial_number = [0u8; 21];
        buf.copy_to_slice(&mut serial_number);

        Ok(Self {
            length,
            model_name_len,
            reserved,
            model_name,
            firmware_version_len,
            firmware_version,
            serial_number,
            work_depth: buf.get_u8(),
        })
    }

    /// Device-info packets originate from the device; encoding is not
    /// supported
    pub fn encode(&self) -> Result<Vec<u8>> {
        Err(Error::unsupported(
            "device info packets originate from the device and cannot be encoded",
        ))
    }

    /// Model name as text, bounded by the reported length
    pub fn model_name_str(&self) -> String {
        let len = (self.model_name_len as usize).min(self.model_name.len());
        String::from_utf8_lossy(&self.model_name[..len]).into_owned()
    }

    /// Firmware version as text, bounded by the reported length
    pub fn firmware_version_str(&self) -> String {
        let len = (self.firmware_version_len as usize).min(self.firmware_version.len());
        String::from_utf8_lossy(&self.firmware_version[..len]).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // Captured from a live device.
    const STATUS_FRAME: &str = "a53c9652101b000000087878203c00ae01ee02000000003f00000000fc0869c35a";
    const NONCE_FRAME: &str = "a53c9651101200000011010511dba0d13a0000000069c35a";

    #[test]
    fn test_status_decode_captured_frame() {
        let frame = hex::decode(STATUS_FRAME).unwrap();
        let packet = StatusPacket::decode(&frame).unwrap();

        assert_eq!(
            packet,
            StatusPacket {
                length: 27,
                chips: 8,
                cores: 120,
                good_cores: 120,
                scanbits: 32,
                scantime: 60,
                voltage: 430,
                freq: 750,
                mode: 0,
                temp: 63,
                reboot_count: 0,
                temp_warn: 0,
                fan_warn: 0,
                power_warn: 0,
                rpm: 2300,
            }
        );
        assert!(!packet.has_warnings());
    }

    #[test]
    fn test_nonce_decode_captured_frame() {
        let frame = hex::decode(NONCE_FRAME).unwrap();
        let packet = NoncePacket::decode(&frame).unwrap();

        assert_eq!(packet.length, 18);
        assert_eq!(packet.job_id, 17);
        assert_eq!(packet.chip_id, 1);
        assert_eq!(packet.core_id, 5);
        assert_eq!(packet.nonce, 252625083153);
        assert_eq!(packet.candidate(), packet.nonce.to_le_bytes());
    }

    #[test]
    fn test_nonce_with_hash_flag_is_unsupported() {
        let mut frame = hex::decode(NONCE_FRAME).unwrap();
        frame[20] = 0x01;
        let err = NoncePacket::decode(&frame).unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
    }

    #[test]
    fn test_job_result_decode() {
        let frame = frame::encode(JobResultPacket::TYPE, &[0x07, 0, 0, 0, 0x01]);
        let packet = JobResultPacket::decode(&frame).unwrap();
        assert_eq!(packet.length, 7);
        assert_eq!(packet.data, 1);
    }

    #[test]
    fn test_device_info_decode() {
        let mut payload = Vec::new();
        payload.push(59u8); // length
        payload.push(3); // model name length
        payload.extend_from_slice(&0u32.to_le_bytes());
        let mut model = [0u8; 16];
        model[..3].copy_from_slice(b"LB1");
        payload.extend_from_slice(&model);
        payload.push(5); // firmware version length
        let mut firmware = [0u8; 8];
        firmware[..5].copy_from_slice(b"1.0.2");
        payload.extend_from_slice(&firmware);
        payload.extend_from_slice(&[0x30u8; 21]);
        payload.push(2); // work depth

        let frame = frame::encode(DeviceInfoPacket::TYPE, &payload);
        let packet = DeviceInfoPacket::decode(&frame).unwrap();

        assert_eq!(packet.model_name_str(), "LB1");
        assert_eq!(packet.firmware_version_str(), "1.0.2");
        assert_eq!(packet.serial_number, [0x30; 21]);
        assert_eq!(packet.work_depth, 2);
    }

    #[test]
    fn test_rx_packets_refuse_to_encode() {
        let frame = hex::decode(STATUS_FRAME).unwrap();
        let status = StatusPacket::decode(&frame).unwrap();
        assert!(matches!(status.encode(), Err(Error::Unsupported(_))));

        let frame = hex::decode(NONCE_FRAME).unwrap();
        let nonce = NoncePacket::decode(&frame).unwrap();
        assert!(matches!(nonce.encode(), Err(Error::Unsupported(_))));

        assert!(matches!(
            JobResultPacket::default().encode(),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn test_status_rejects_corrupt_envelope() {
        let good = hex::decode(STATUS_FRAME).unwrap();

        for index in 0..3 {
            let mut frame = good.clone();
            frame[index] ^= 0xFF;
            assert!(matches!(
                StatusPacket::decode(&frame),
                Err(Error::BadPreamble { .. })
            ));
        }

        let mut frame = good.clone();
        let last = frame.len() - 1;
        frame[last] ^= 0xFF;
        assert!(matches!(
            StatusPacket::decode(&frame),
            Err(Error::BadFinalizer { .. })
        ));

        let mut frame = good.clone();
        frame[3] = 0x51;
        assert!(matches!(
            StatusPacket::decode(&frame),
            Err(Error::TypeMismatch { .. })
        ));

        let mut frame = good;
        frame[4] = 0x20;
        assert!(matches!(
            StatusPacket::decode(&frame),
            Err(Error::VersionMismatch { .. })
        ));
    }
}
