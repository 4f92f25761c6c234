//! Instruction set for the arithmetic virtual machine.
use std::fmt;

/// `OPCode` is the closed set of instruction tags the machine understands.
/// Discriminants are the wire encoding, one byte per instruction. Only
/// `Dconst` carries an immediate: the 8 bytes that follow it in the stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum OPCode {
    Halt = 0x00,
    DconstM1 = 0x0A,
    Dconst0 = 0x0B,
    Dconst1 = 0x0C,
    Dconst2 = 0x0D,
    Dconst = 0x0F,
    Add = 0x60,
    Sub = 0x61,
    Mul = 0x62,
    Div = 0x64,
    Neg = 0x70,
    Nop = 0xF0,
    Print = 0xF2,
    St1 = 0xF4,
    Ld1 = 0xF5,
    St2 = 0xF6,
    Ld2 = 0xF7,
}

impl TryFrom<u8> for OPCode {
    type Error = u8;

    /// Decode a raw tag, returning the byte back when it matches no
    /// instruction so callers can report it.
    fn try_from(tag: u8) -> Result<Self, u8> {
        match tag {
            0x00 => Ok(Self::Halt),
            0x0A => Ok(Self::DconstM1),
            0x0B => Ok(Self::Dconst0),
            0x0C => Ok(Self::Dconst1),
            0x0D => Ok(Self::Dconst2),
            0x0F => Ok(Self::Dconst),
            0x60 => Ok(Self::Add),
            0x61 => Ok(Self::Sub),
            0x62 => Ok(Self::Mul),
            0x64 => Ok(Self::Div),
            0x70 => Ok(Self::Neg),
            0xF0 => Ok(Self::Nop),
            0xF2 => Ok(Self::Print),
            0xF4 => Ok(Self::St1),
            0xF5 => Ok(Self::Ld1),
            0xF6 => Ok(Self::St2),
            0xF7 => Ok(Self::Ld2),
            _ => Err(tag),
        }
    }
}

impl fmt::Display for OPCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mnemonic = match self {
            Self::Halt => "halt",
            Self::DconstM1 => "dconst_m1",
            Self::Dconst0 => "dconst_0",
            Self::Dconst1 => "dconst_1",
            Self::Dconst2 => "dconst_2",
            Self::Dconst => "dconst",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Neg => "neg",
            Self::Nop => "nop",
            Self::Print => "print",
            Self::St1 => "st1",
            Self::Ld1 => "ld1",
            Self::St2 => "st2",
            Self::Ld2 => "ld2",
        };
        write!(f, "{mnemonic}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_every_defined_tag() {
        let tags = [
            0x00, 0x0A, 0x0B, 0x0C, 0x0D, 0x0F, 0x60, 0x61, 0x62, 0x64, 0x70,
            0xF0, 0xF2, 0xF4, 0xF6, 0xF5, 0xF7,
        ];
        for tag in tags {
            let opcode = OPCode::try_from(tag).unwrap();
            assert_eq!(opcode as u8, tag);
        }
    }

    #[test]
    fn rejects_undefined_tags() {
        assert_eq!(OPCode::try_from(0xFF), Err(0xFF));
        assert_eq!(OPCode::try_from(0x01), Err(0x01));
        // 0x63 sits in the gap between mul and div.
        assert_eq!(OPCode::try_from(0x63), Err(0x63));
    }
}
