use clap::{Parser, Subcommand};
use dsc::{dsc_info, DscError, Encoder};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "dsc")]
#[command(author, version, about = "BGI/Ethornell DSC archive-entry compressor", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file into a DSC container
    #[command(alias = "c")]
    Compress {
        /// Input file
        input: PathBuf,

        /// Output DSC file
        output: PathBuf,

        /// Obfuscation key as a 32-bit hex value (e.g. 02207D06)
        #[arg(value_parser = parse_key)]
        key: u32,

        /// Print encoding statistics to stderr
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the header of an existing DSC container
    #[command(alias = "i")]
    Info {
        /// DSC file to inspect
        file: PathBuf,
    },
}

fn parse_key(s: &str) -> Result<u32, String> {
    let digits = s.trim_start_matches("0x").trim_start_matches("0X");
    u32::from_str_radix(digits, 16).map_err(|e| format!("key must be a 32-bit hex value: {e}"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), DscError> {
    match cli.command {
        Commands::Compress {
            input,
            output,
            key,
            verbose,
        } => {
            let mut log = io::stderr();
            let mut encoder = Encoder::for_file(&input)?;
            encoder.key(key);
            if verbose {
                encoder.with_logging(&mut log);
            }
            encoder.encode_to_file(&output)
        }
        Commands::Info { file } => {
            let data = fs::read(&file)?;
            let header = dsc_info(data.as_slice())?;

            println!("File: {}", file.display());
            println!("Key: 0x{:08X}", header.key);
            println!("Original size: {} bytes", header.decompressed_size);
            println!("Symbol count: {}", header.symbol_count);
            println!("Compressed size: {} bytes", data.len());
            if header.decompressed_size > 0 {
                let ratio = data.len() as f64 / header.decompressed_size as f64 * 100.0;
                println!("Ratio: {ratio:.1}%");
            }

            Ok(())
        }
    }
}
