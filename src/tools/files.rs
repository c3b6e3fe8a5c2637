//! Drives compress / decompress / test / list over files or the standard streams.
//!
//! Outputs are written to a uniquely named temporary file in the target directory and moved
//! into place only after the whole result is ready, so a failed run never leaves a partial
//! output behind.

use std::ffi::OsString;
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use log::{error, info, warn};
use tempfile::NamedTempFile;

use super::cli::{HuffOpts, Mode, Output};
use crate::compression::artifact::CompressedArtifact;
use crate::compression::compress::compress;
use crate::compression::decompress::decompress;
use crate::error::{HuffError, Result};

/// Suffix of compressed files.
pub const EXTENSION: &str = "huf";

/// Run the selected mode over every input. Returns the number of inputs that failed.
pub fn run(opts: &HuffOpts) -> Result<usize> {
    if opts.output == Output::Stdout {
        refuse_terminal(opts.op_mode, opts.force_overwrite, io::stdout().is_terminal())?;
    }
    if opts.files.is_empty() {
        let mut data = Vec::new();
        io::stdin().lock().read_to_end(&mut data)?;
        if let Some(out) = transform(&data, opts.op_mode, "(stdin)")? {
            write_stdout(&out)?;
        }
        return Ok(0);
    }

    let mut failed = 0;
    for name in &opts.files {
        if let Err(e) = process_file(Path::new(name), opts) {
            error!("{}: {}", name, e);
            failed += 1;
        }
    }
    Ok(failed)
}

/// Handle one input file according to the options.
pub fn process_file(input: &Path, opts: &HuffOpts) -> Result<()> {
    let data = fs::read(input)?;
    let name = input.display().to_string();
    let out = match transform(&data, opts.op_mode, &name)? {
        Some(out) => out,
        None => return Ok(()),
    };

    match opts.output {
        Output::Stdout => write_stdout(&out)?,
        Output::File => {
            let target = output_path(input, opts.op_mode);
            write_atomically(&target, &out, opts.force_overwrite)?;
            info!("{}: wrote {}", name, target.display());
            if !opts.keep_input_files {
                fs::remove_file(input)?;
                info!("{}: removed input", name);
            }
        }
    }
    Ok(())
}

/// Compressed data is never written to a terminal.
fn refuse_terminal(mode: Mode, force: bool, stdout_is_terminal: bool) -> Result<()> {
    if mode == Mode::Zip && stdout_is_terminal && !force {
        return Err(HuffError::Io(io::Error::new(
            io::ErrorKind::Other,
            "compressed data not written to a terminal, use -f to force",
        )));
    }
    Ok(())
}

/// Apply the mode to a whole input. Returns the bytes to write, if the mode writes any.
fn transform(data: &[u8], mode: Mode, name: &str) -> Result<Option<Vec<u8>>> {
    match mode {
        Mode::Zip => {
            let artifact = compress(data)?;
            let stats = artifact.stats();
            info!(
                "{}: {} -> {} bytes ({:.1}%), {} symbols",
                name,
                data.len(),
                stats.total_bytes(),
                ratio(stats.total_bytes(), data.len()),
                stats.entries
            );
            Ok(Some(artifact.to_bytes()))
        }
        Mode::Unzip => {
            let out = decompress(&CompressedArtifact::from_bytes(data)?)?;
            info!("{}: {} -> {} bytes", name, data.len(), out.len());
            Ok(Some(out))
        }
        Mode::Test => {
            let out = decompress(&CompressedArtifact::from_bytes(data)?)?;
            info!("{}: ok ({} bytes)", name, out.len());
            Ok(None)
        }
        Mode::List => {
            let artifact = CompressedArtifact::from_bytes(data)?;
            print!("{}", listing(&artifact, name));
            Ok(None)
        }
    }
}

/// Human readable summary of an artifact and its code table.
pub fn listing(artifact: &CompressedArtifact, name: &str) -> String {
    let stats = artifact.stats();
    let mut out = format!(
        "{}: {} symbols, header {} bytes, payload {} bits ({} bytes), total {} bytes\n",
        name,
        stats.entries,
        stats.header_bytes,
        stats.valid_bits,
        stats.payload_bytes,
        stats.total_bytes()
    );
    for (sym, code) in artifact.table.entries() {
        let shown = if sym.is_ascii_graphic() {
            format!("'{}'", sym as char)
        } else {
            format!("0x{:02x}", sym)
        };
        out.push_str(&format!("  {:>3} {:>6} {:>3} {}\n", sym, shown, code.len(), code));
    }
    out
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 * 100.0 / whole as f64
}

/// Where the result for `input` goes. Compressing adds `.huf`; decompressing strips it, or
/// adds `.out` when the input has some other name.
pub fn output_path(input: &Path, mode: Mode) -> PathBuf {
    let has_suffix = input.extension().map_or(false, |ext| ext == EXTENSION);
    match mode {
        Mode::Unzip if has_suffix => input.with_extension(""),
        Mode::Unzip => with_suffix(input, "out"),
        _ => {
            if has_suffix {
                warn!("{} already has a .{} suffix", input.display(), EXTENSION);
            }
            with_suffix(input, EXTENSION)
        }
    }
}

fn with_suffix(input: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = input.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// Write the whole output to a fresh temporary file next to `target`, then move it over.
/// The temporary file is removed if anything fails before the move.
pub fn write_atomically(target: &Path, data: &[u8], force: bool) -> Result<()> {
    if target.exists() && !force {
        return Err(already_exists(target));
    }
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;

    let placed = if force {
        tmp.persist(target)
    } else {
        // Something may have appeared at the target since the check above.
        tmp.persist_noclobber(target)
    };
    match placed {
        Ok(_) => Ok(()),
        Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => Err(already_exists(target)),
        Err(e) => Err(e.error.into()),
    }
}

fn already_exists(target: &Path) -> HuffError {
    HuffError::Io(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("{} already exists, use --force to overwrite", target.display()),
    ))
}

fn write_stdout(data: &[u8]) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(data)?;
    stdout.flush()?;
    Ok(())
}
