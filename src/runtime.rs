//! Runtime module responsible for creating a new execution environment
//! and running programs to completion.
use crate::bytecode::OPCode;
use crate::program::Program;

use std::fmt;
use std::io::{self, Write};

use tracing::{debug, trace};

type Result<T> = std::result::Result<T, RuntimeError>;

/// Maximum number of values on the operand stack.
pub const STACK_SIZE: usize = 256;

/// `RuntimeErrorKind` represents the possible errors that can occur
/// during execution. Every one of them is fatal for the machine instance.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    /// The fetched tag matches no defined instruction.
    UnknownOpcode(u8),
    /// A `div` opcode found 0.0 (or -0.0) on top of the stack.
    DivisionByZero,
    /// An opcode tried to pop from an empty stack.
    StackUnderflow,
    /// A push would exceed the stack capacity.
    StackOverflow,
    /// A `dconst` opcode sits within 8 bytes of the end of the stream.
    TruncatedConstant,
    /// The program counter ran past the end of the stream without a halt.
    EndOfStream,
    /// The print sink rejected a write.
    Io,
}

/// `RuntimeError` is a custom type used to handle and represent
/// possible execution failures.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RuntimeError {
    kind: RuntimeErrorKind,
    at: usize,
}

impl RuntimeError {
    pub fn kind(&self) -> RuntimeErrorKind {
        self.kind
    }

    /// Offset into the instruction stream of the faulting instruction.
    pub fn at(&self) -> usize {
        self.at
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            RuntimeErrorKind::UnknownOpcode(tag) => {
                write!(f, "unknown opcode 0x{tag:02X} at offset {}", self.at)
            }
            RuntimeErrorKind::DivisionByZero => {
                write!(f, "division by zero at offset {}", self.at)
            }
            RuntimeErrorKind::StackUnderflow => {
                write!(f, "stack underflow at offset {}", self.at)
            }
            RuntimeErrorKind::StackOverflow => {
                write!(f, "stack overflow at offset {}", self.at)
            }
            RuntimeErrorKind::TruncatedConstant => {
                write!(f, "truncated double constant at offset {}", self.at)
            }
            RuntimeErrorKind::EndOfStream => {
                write!(f, "ran past end of stream at offset {}", self.at)
            }
            RuntimeErrorKind::Io => write!(f, "failed to write print output"),
        }
    }
}

impl std::error::Error for RuntimeError {}

/// `Runtime` represents an execution context for one bytecode program.
/// It owns the operand stack and the two scalar registers, fetches one
/// opcode at a time and executes it until a halt opcode or a fatal error.
///
/// A runtime is single use: once `run` returns, the instance is retired.
/// The `print` opcode writes one line per value to the output sink, which
/// is stdout for programs run through [`Runtime::new`].
pub struct Runtime<W = io::Stdout> {
    program: Program,
    // Program counter, monotonic: no branch opcodes exist.
    pc: usize,
    // Operand stack, bounded at STACK_SIZE values.
    stack: Vec<f64>,
    r1: f64,
    r2: f64,
    out: W,
}

impl Runtime<io::Stdout> {
    pub fn new(program: Program) -> Self {
        Self::with_output(program, io::stdout())
    }
}

impl<W: Write> Runtime<W> {
    /// Build a runtime that emits `print` output to `out` instead of stdout.
    pub fn with_output(program: Program, out: W) -> Self {
        Self {
            program,
            pc: 0,
            stack: Vec::with_capacity(STACK_SIZE),
            r1: 0.0,
            r2: 0.0,
            out,
        }
    }

    /// Execute the program until a halt opcode or a fatal error. Errors
    /// terminate the machine immediately; no further bytes are decoded.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let at = self.pc;
            let tag = self
                .program
                .fetch(at)
                .ok_or(RuntimeError { kind: RuntimeErrorKind::EndOfStream, at })?;
            self.pc += 1;
            let opcode = OPCode::try_from(tag).map_err(|tag| RuntimeError {
                kind: RuntimeErrorKind::UnknownOpcode(tag),
                at,
            })?;
            trace!(pc = at, %opcode, "dispatch");
            match opcode {
                OPCode::Halt => {
                    debug!(pc = at, "halt");
                    return Ok(());
                }
                OPCode::Nop => {}
                OPCode::DconstM1 => self.push(-1.0)?,
                OPCode::Dconst0 => self.push(0.0)?,
                OPCode::Dconst1 => self.push(1.0)?,
                OPCode::Dconst2 => self.push(2.0)?,
                OPCode::Dconst => {
                    let value =
                        self.program.read_f64(self.pc).ok_or(RuntimeError {
                            kind: RuntimeErrorKind::TruncatedConstant,
                            at,
                        })?;
                    self.pc += 8;
                    self.push(value)?;
                }
                OPCode::Add => {
                    let b = self.pop()?;
                    let a = self.pop()?;
                    self.push(a + b)?;
                }
                OPCode::Sub => {
                    let b = self.pop()?;
                    let a = self.pop()?;
                    self.push(a - b)?;
                }
                OPCode::Mul => {
                    let b = self.pop()?;
                    let a = self.pop()?;
                    self.push(a * b)?;
                }
                OPCode::Div => {
                    let b = self.pop()?;
                    let a = self.pop()?;
                    // -0.0 compares equal to 0.0, so both divisors fault.
                    if b == 0.0 {
                        return Err(RuntimeError {
                            kind: RuntimeErrorKind::DivisionByZero,
                            at,
                        });
                    }
                    self.push(a / b)?;
                }
                OPCode::Neg => {
                    let v = self.pop()?;
                    self.push(-v)?;
                }
                OPCode::St1 => self.r1 = self.pop()?,
                OPCode::Ld1 => {
                    let v = self.r1;
                    self.push(v)?;
                }
                OPCode::St2 => self.r2 = self.pop()?,
                OPCode::Ld2 => {
                    let v = self.r2;
                    self.push(v)?;
                }
                OPCode::Print => {
                    let v = self.pop()?;
                    writeln!(self.out, "{v:.6}").map_err(|_| RuntimeError {
                        kind: RuntimeErrorKind::Io,
                        at,
                    })?;
                }
            }
        }
    }

    fn push(&mut self, value: f64) -> Result<()> {
        if self.stack.len() == STACK_SIZE {
            return Err(RuntimeError {
                kind: RuntimeErrorKind::StackOverflow,
                at: self.pc,
            });
        }
        self.stack.push(value);
        Ok(())
    }

    fn pop(&mut self) -> Result<f64> {
        self.stack.pop().ok_or(RuntimeError {
            kind: RuntimeErrorKind::StackUnderflow,
            at: self.pc,
        })
    }
}
