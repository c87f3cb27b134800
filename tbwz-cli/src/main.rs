//! tbwz CLI - block compression with BWT tunneling.
//!
//! ```text
//! tbwz -c file            -> file.tbwz
//! tbwz -c --bwt file      -> file.bwz
//! tbwz -d file.tbwz       -> file
//! ```

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tbwz_compress::{BlockCompressor, BwtCompressor, DEFAULT_BLOCK_SIZE, TbwtCompressor};

const TBWZ_SUFFIX: &str = "tbwz";
const BWZ_SUFFIX: &str = "bwz";

#[derive(Parser)]
#[command(name = "tbwz")]
#[command(
    author,
    version,
    about = "Block compressor built on Burrows-Wheeler tunneling"
)]
#[command(group = clap::ArgGroup::new("mode").required(true).args(["compress", "decompress"]))]
struct Cli {
    /// Compress INFILE
    #[arg(short = 'c')]
    compress: bool,

    /// Decompress INFILE
    #[arg(short = 'd')]
    decompress: bool,

    /// Print timing and size telemetry
    #[arg(short = 'i')]
    info: bool,

    /// Use the plain BWT pipeline (.bwz) instead of tunneling (.tbwz)
    #[arg(long)]
    bwt: bool,

    /// Block size in bytes (clamped to the 1.5 GiB maximum)
    #[arg(short = 'b', long)]
    block_size: Option<usize>,

    /// Input file
    infile: PathBuf,

    /// Output file; derived from INFILE and the pipeline suffix if omitted
    outfile: Option<PathBuf>,
}

fn default_outfile(infile: &Path, compress: bool, suffix: &str) -> PathBuf {
    if compress {
        let mut name = infile.as_os_str().to_owned();
        name.push(".");
        name.push(suffix);
        PathBuf::from(name)
    } else if infile.extension().is_some_and(|e| e == suffix) {
        infile.with_extension("")
    } else {
        let mut name = infile.as_os_str().to_owned();
        name.push(".out");
        PathBuf::from(name)
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let suffix = if cli.bwt { BWZ_SUFFIX } else { TBWZ_SUFFIX };
    let outfile = cli
        .outfile
        .clone()
        .unwrap_or_else(|| default_outfile(&cli.infile, cli.compress, suffix));

    let input = std::fs::read(&cli.infile)
        .map_err(|e| format!("unable to read \"{}\": {e}", cli.infile.display()))?;

    let block_size = cli.block_size.unwrap_or(DEFAULT_BLOCK_SIZE);
    let result = if cli.bwt {
        let mut c = BwtCompressor::new(block_size);
        c.set_quiet(!cli.info);
        if cli.compress {
            c.compress(&input)
        } else {
            c.decompress(&input)
        }
    } else {
        let mut c = TbwtCompressor::new(block_size);
        c.set_quiet(!cli.info);
        if cli.compress {
            c.compress(&input)
        } else {
            c.decompress(&input)
        }
    };

    let output = result.map_err(|e| e.to_string())?;
    if cli.info {
        println!("> input bytes\t\t{}", input.len());
        println!("> output bytes\t\t{}", output.len());
    }
    std::fs::write(&outfile, &output)
        .map_err(|e| format!("unable to write \"{}\": {e}", outfile.display()))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("tbwz: {msg}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_outfile_compress_appends_suffix() {
        assert_eq!(
            default_outfile(Path::new("data.txt"), true, TBWZ_SUFFIX),
            PathBuf::from("data.txt.tbwz")
        );
        assert_eq!(
            default_outfile(Path::new("data.txt"), true, BWZ_SUFFIX),
            PathBuf::from("data.txt.bwz")
        );
    }

    #[test]
    fn test_default_outfile_decompress_strips_suffix() {
        assert_eq!(
            default_outfile(Path::new("data.txt.tbwz"), false, TBWZ_SUFFIX),
            PathBuf::from("data.txt")
        );
        assert_eq!(
            default_outfile(Path::new("archive.bwz"), false, BWZ_SUFFIX),
            PathBuf::from("archive")
        );
    }

    #[test]
    fn test_default_outfile_decompress_unknown_suffix() {
        assert_eq!(
            default_outfile(Path::new("blob.bin"), false, TBWZ_SUFFIX),
            PathBuf::from("blob.bin.out")
        );
    }
}
