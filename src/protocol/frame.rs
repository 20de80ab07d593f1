//! Shared framing envelope for the device protocol
//!
//! Every frame on the wire looks like:
//!
//! ```text
//! preamble(3) | type(1) | version(1) | payload | finalizer(3)
//! ```
//!
//! The length field every payload starts with counts all bytes between
//! preamble and finalizer, i.e. `frame_len - 6`. Encoders always recompute
//! it from the payload they are about to write; a stored value is never
//! trusted.

use crate::error::{Error, Result};

/// Frame preamble marker
pub const PREAMBLE: [u8; 3] = [0xA5, 0x3C, 0x96];

/// Frame finalizer marker
pub const FINALIZER: [u8; 3] = [0x69, 0xC3, 0x5A];

/// Protocol version spoken by this crate
pub const VERSION: u8 = 0x10;

/// Offset of the type byte within a frame
pub const TYPE_OFFSET: usize = 3;

/// Bytes the envelope adds around a payload
pub const ENVELOPE_SIZE: usize = PREAMBLE.len() + 2 + FINALIZER.len();

/// Compute the value of a packet's length field.
///
/// `after_length` is the number of payload bytes following the length
/// field itself; the field counts those plus its own four bytes plus the
/// type and version bytes.
pub fn length_field(after_length: usize) -> u32 {
    (after_length + 4 + 2) as u32
}

/// Validate the framing envelope and return the payload region.
///
/// Checks, in order: minimum length, preamble, finalizer, type, version.
/// Each failure is a distinct error naming the offending byte; the frame
/// must be discarded by the caller.
pub fn validate(frame: &[u8], expected_type: u8) -> Result<&[u8]> {
    if frame.len() < ENVELOPE_SIZE {
        return Err(Error::TruncatedFrame {
            expected: ENVELOPE_SIZE,
            actual: frame.len(),
        });
    }

    for (offset, (&actual, &expected)) in frame.iter().zip(PREAMBLE.iter()).enumerate() {
        if actual != expected {
            return Err(Error::BadPreamble {
                offset,
                expected,
                actual,
            });
        }
    }

    let tail = &frame[frame.len() - FINALIZER.len()..];
    for (offset, (&actual, &expected)) in tail.iter().zip(FINALIZER.iter()).enumerate() {
        if actual != expected {
            return Err(Error::BadFinalizer {
                offset,
                expected,
                actual,
            });
        }
    }

    if frame[TYPE_OFFSET] != expected_type {
        return Err(Error::TypeMismatch {
            expected: expected_type,
            actual: frame[TYPE_OFFSET],
        });
    }
    if frame[TYPE_OFFSET + 1] != VERSION {
        return Err(Error::VersionMismatch {
            expected: VERSION,
            actual: frame[TYPE_OFFSET + 1],
        });
    }

    Ok(&frame[TYPE_OFFSET + 2..frame.len() - FINALIZER.len()])
}

/// Wrap a payload in the framing envelope for the given packet type
pub fn encode(packet_type: u8, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(payload.len() + ENVELOPE_SIZE);
    frame.extend_from_slice(&PREAMBLE);
    frame.push(packet_type);
    frame.push(VERSION);
    frame.extend_from_slice(payload);
    frame.extend_from_slice(&FINALIZER);
    frame
}

/// Ensure a payload is at least `expected` bytes long
pub fn require_payload(payload: &[u8], expected: usize) -> Result<()> {
    if payload.len() < expected {
        return Err(Error::TruncatedFrame {
            expected: expected + ENVELOPE_SIZE,
            actual: payload.len() + ENVELOPE_SIZE,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_validate_round_trip() {
        let frame = encode(0x55, &[0x07, 0, 0, 0, 0x01]);
        assert_eq!(frame[..3], PREAMBLE);
        assert_eq!(frame[3], 0x55);
        assert_eq!(frame[4], VERSION);
        assert_eq!(frame[frame.len() - 3..], FINALIZER);

        let payload = validate(&frame, 0x55).unwrap();
        assert_eq!(payload, &[0x07, 0, 0, 0, 0x01]);
    }

    #[test]
    fn test_length_field_counts_envelope_interior() {
        // A bare length field yields 6: type + version + the field itself.
        assert_eq!(length_field(0), 6);
        assert_eq!(length_field(1), 7);
        // Params-set payload and the captured report frames.
        assert_eq!(length_field(10), 16);
        assert_eq!(length_field(12), 18);
        assert_eq!(length_field(21), 27);
    }

    #[test]
    fn test_validate_rejects_short_frame() {
        let err = validate(&[0xA5, 0x3C], 0x55).unwrap_err();
        assert!(matches!(err, Error::TruncatedFrame { actual: 2, .. }));
    }

    #[test]
    fn test_validate_rejects_bad_preamble() {
        let mut frame = encode(0x55, &[0; 5]);
        frame[1] = 0x00;
        let err = validate(&frame, 0x55).unwrap_err();
        assert!(matches!(
            err,
            Error::BadPreamble {
                offset: 1,
                expected: 0x3C,
                actual: 0x00,
            }
        ));
    }

    #[test]
    fn test_validate_rejects_bad_finalizer() {
        let mut frame = encode(0x55, &[0; 5]);
        let last = frame.len() - 1;
        frame[last] = 0xFF;
        let err = validate(&frame, 0x55).unwrap_err();
        assert!(matches!(
            err,
            Error::BadFinalizer {
                offset: 2,
                expected: 0x5A,
                actual: 0xFF,
            }
        ));
    }

    #[test]
    fn test_validate_rejects_wrong_type() {
        let frame = encode(0x55, &[0; 5]);
        let err = validate(&frame, 0x52).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                expected: 0x52,
                actual: 0x55,
            }
        ));
    }

    #[test]
    fn test_validate_rejects_wrong_version() {
        let mut frame = encode(0x55, &[0; 5]);
        frame[4] = 0x11;
        let err = validate(&frame, 0x55).unwrap_err();
        assert!(matches!(
            err,
            Error::VersionMismatch {
                expected: VERSION,
                actual: 0x11,
            }
        ));
    }
}
