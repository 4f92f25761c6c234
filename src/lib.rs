//! A small stack-based virtual machine for arithmetic over IEEE-754 doubles.
//!
//! Programs are flat byte streams: one opcode tag per instruction, with the
//! `dconst` opcode followed by an 8-byte big-endian double immediate. The
//! [`runtime::Runtime`] fetches, decodes and executes instructions against a
//! bounded operand stack and two scalar registers until a halt opcode or a
//! fatal runtime error.

pub mod bytecode;
pub mod program;
pub mod runtime;
