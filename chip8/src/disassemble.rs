use std::error::Error;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use chipvm::constants::PROGRAM_START;
use chipvm::Instruction;

pub fn disassemble(rom: &Path, output: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let program = fs::read(rom)?;

    let mut out: Box<dyn Write> = match &output {
        Some(path) => {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            Box::new(BufWriter::new(File::create(path)?))
        }
        None => Box::new(io::stdout().lock()),
    };

    writeln!(out, "== {} ==", rom.display())?;
    write_listing(&program, &mut out)?;
    out.flush()?;

    if let Some(path) = output {
        info!("Wrote disassembled ROM to {}", path.display());
    }
    Ok(())
}

/// Writes one `ADDR  OPCODE  MNEMONIC` line per word, as if loaded at `PROGRAM_START`.
/// Words that aren't instructions, usually sprite data, are listed as `DW`.
fn write_listing(program: &[u8], out: &mut impl Write) -> io::Result<()> {
    for (index, word) in program.chunks(2).enumerate() {
        let addr = PROGRAM_START as usize + index * 2;
        let op = u16::from_be_bytes([word[0], word.get(1).copied().unwrap_or(0)]);
        match Instruction::decode(op) {
            Ok(instruction) => writeln!(out, "{:03X}  {:04X}  {}", addr, op, instruction)?,
            Err(_) => writeln!(out, "{:03X}  {:04X}  DW {:#06X}", addr, op, op)?,
        }
    }
    Ok(())
}
