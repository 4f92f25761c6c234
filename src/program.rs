//! Abstract representation of a bytecode program.
//!
//! A program is an immutable flat byte stream with no header, labels or
//! sections: each byte is either an opcode tag or part of the 8-byte double
//! immediate that follows a `dconst` tag. The immediate is always encoded
//! big-endian regardless of host architecture so that programs stay portable.
use byteorder::{BigEndian, ByteOrder};

/// Representation of bytecode programs that we want to run.
#[derive(Debug, Clone)]
pub struct Program {
    code: Vec<u8>,
}

impl Program {
    /// Build a new program from a raw byte stream. An empty stream is a
    /// valid program; running it faults on the first fetch.
    pub fn new(code: Vec<u8>) -> Self {
        Self { code }
    }

    /// Returns the byte at `pc`, or `None` past the end of the stream.
    pub fn fetch(&self, pc: usize) -> Option<u8> {
        self.code.get(pc).copied()
    }

    /// Reads the 8 bytes starting at `pc` as a big-endian double. Returns
    /// `None` when fewer than 8 bytes remain.
    pub fn read_f64(&self, pc: usize) -> Option<f64> {
        let end = pc.checked_add(8)?;
        let bytes = self.code.get(pc..end)?;
        Some(BigEndian::read_f64(bytes))
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

/// Appends `value` to `buf` as the 8-byte big-endian immediate expected
/// after a `dconst` tag. Producers of bytecode use this to stay in sync
/// with [`Program::read_f64`].
pub fn encode_f64(buf: &mut Vec<u8>, value: f64) {
    let mut raw = [0u8; 8];
    BigEndian::write_f64(&mut raw, value);
    buf.extend_from_slice(&raw);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_is_bounds_checked() {
        let program = Program::new(vec![0x00, 0xF0]);
        assert_eq!(program.fetch(0), Some(0x00));
        assert_eq!(program.fetch(1), Some(0xF0));
        assert_eq!(program.fetch(2), None);
        assert!(Program::new(Vec::new()).fetch(0).is_none());
    }

    #[test]
    fn reads_big_endian_doubles() {
        // 1.0 encoded big-endian, most significant byte first.
        let program =
            Program::new(vec![0x3F, 0xF0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
        assert_eq!(program.read_f64(0), Some(1.0));
    }

    #[test]
    fn truncated_double_reads_none() {
        let program = Program::new(vec![0x3F, 0xF0, 0x00]);
        assert!(program.read_f64(0).is_none());
        assert!(program.read_f64(usize::MAX).is_none());
    }

    #[test]
    fn encode_read_roundtrip_is_bit_exact() {
        let values = [
            0.0,
            -0.0,
            -1.0,
            1.0,
            2.0,
            f64::NAN,
            f64::INFINITY,
            f64::NEG_INFINITY,
        ];
        for value in values {
            let mut buf = Vec::new();
            encode_f64(&mut buf, value);
            let read = Program::new(buf).read_f64(0).unwrap();
            assert_eq!(read.to_bits(), value.to_bits());
        }
    }
}
