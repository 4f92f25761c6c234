use arithvm::bytecode::OPCode;
use arithvm::program::{encode_f64, Program};
use arithvm::runtime::Runtime;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

/// Example programs, kept as inline byte arrays for brevity. A real machine
/// would read bytecode from a file.
fn example_programs() -> Vec<Vec<u8>> {
    // push 2.0, push 1.0, subtract, print the result (1.0), exit.
    let simple = vec![
        OPCode::Dconst2 as u8,
        OPCode::Dconst1 as u8,
        OPCode::Sub as u8,
        OPCode::Print as u8,
        OPCode::Halt as u8,
    ];

    // Same result through a wide constant: push 1.0 from an 8-byte
    // big-endian immediate and print it.
    let mut wide = vec![OPCode::Dconst as u8];
    encode_f64(&mut wide, 1.0);
    wide.push(OPCode::Print as u8);
    wide.push(OPCode::Halt as u8);

    // Registers: 2.0 goes through r1, then -1.0 / 2.0 prints -0.5.
    let registers = vec![
        OPCode::Dconst2 as u8,
        OPCode::St1 as u8,
        OPCode::DconstM1 as u8,
        OPCode::Ld1 as u8,
        OPCode::Div as u8,
        OPCode::Print as u8,
        OPCode::Halt as u8,
    ];

    vec![simple, wide, registers]
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    for code in example_programs() {
        let mut vm = Runtime::new(Program::new(code));
        if let Err(err) = vm.run() {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
