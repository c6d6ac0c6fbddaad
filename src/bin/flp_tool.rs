//! Example: .\flp_tool.exe info .\project.flp
//! Example: .\flp_tool.exe list-events .\project.flp --id 0xC9
//! Example: .\flp_tool.exe set-text .\project.flp 0xCB "New Title" -o .\out.flp
//! Example: .\flp_tool.exe verify-roundtrip ".\projects\*.flp"

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use clap::{command, Parser, Subcommand};

use flp::accessors::write_text;
use flp::binutils::{get_final_output_folder, get_input_output_pairs, open_file_overwrite_rw, VERSION};
use flp::event::PatchAction;
use flp::{parse, patch, serialize};

#[derive(Parser)]
#[command(author = "Adakite", version = VERSION, about = "Tools for inspecting and editing FL Studio project files", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parses one file and prints a summary of its header and event stream.
    Info {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
    /// Lists every event in one file, optionally filtered to a single id.
    ListEvents {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Only list events with this id (decimal or 0x-prefixed hex).
        #[arg(long, value_parser = parse_id)]
        id: Option<u8>,
    },
    /// Rewrites the first event with the given id to a new text payload.
    SetText {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Target event id (decimal or 0x-prefixed hex).
        #[arg(value_parser = parse_id)]
        id: u8,

        #[arg(value_name = "TEXT")]
        text: String,

        /// Sets the folder to write the edited file into.
        #[arg(short = 'o', long, value_name = "OUTPUT")]
        output_folder: Option<PathBuf>,
    },
    /// Batch-verifies that every matching file serializes back to itself
    /// byte for byte.
    VerifyRoundtrip {
        #[arg(value_name = "GLOB")]
        input_glob: String,
    },
}

fn parse_id(s: &str) -> Result<u8, String> {
    let s = s.trim();
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16)
    } else {
        s.parse::<u8>()
    };
    parsed.map_err(|e| format!("invalid event id {s:?}: {e}"))
}

fn main() -> flp::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { input } => cmd_info(&input)?,
        Commands::ListEvents { input, id } => cmd_list_events(&input, id)?,
        Commands::SetText {
            input,
            id,
            text,
            output_folder,
        } => cmd_set_text(&input, id, &text, output_folder)?,
        Commands::VerifyRoundtrip { input_glob } => cmd_verify_roundtrip(&input_glob)?,
    }

    Ok(())
}

fn cmd_info(input: &PathBuf) -> flp::Result<()> {
    let bytes = fs::read(input)?;
    let parsed = parse(&bytes)?;
    println!("format:        {}", parsed.format());
    println!("channels:      {}", parsed.channel_count());
    println!("ppq:           {}", parsed.ppq());
    println!("events:        {}", parsed.events.len());
    println!("version:       {}", parsed.detected_version);
    println!("use_unicode:   {}", parsed.use_unicode);
    Ok(())
}

fn cmd_list_events(input: &PathBuf, filter_id: Option<u8>) -> flp::Result<()> {
    let bytes = fs::read(input)?;
    let parsed = parse(&bytes)?;
    for (index, event) in parsed.events.iter().enumerate() {
        if let Some(id) = filter_id {
            if event.id != id {
                continue;
            }
        }
        println!(
            "#{index:<5} id={:#04x} kind={:?} framing_len={} payload_len={}",
            event.id,
            event.kind,
            event.framing_or_synthesize().len(),
            event.payload.len()
        );
    }
    Ok(())
}

fn cmd_set_text(
    input: &PathBuf,
    id: u8,
    text: &str,
    output_folder: Option<PathBuf>,
) -> flp::Result<()> {
    let bytes = fs::read(input)?;
    let parsed = parse(&bytes)?;
    let use_unicode = parsed.use_unicode;

    let mut found = false;
    let patched = patch(&parsed, |event, _| {
        if !found && event.id == id {
            found = true;
            PatchAction::Replace(write_text(id, text, use_unicode))
        } else {
            PatchAction::Keep
        }
    });
    if !found {
        return Err(flp::FlpError::NoSuchEvent(id));
    }

    let output_folder = get_final_output_folder(&output_folder)?;
    let mut output_path = output_folder;
    output_path.push(
        input
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("out.flp")),
    );

    print!("Writing {}... ", output_path.display());
    open_file_overwrite_rw(&output_path)?.write_all(&serialize(&patched))?;
    println!("done!");
    Ok(())
}

fn cmd_verify_roundtrip(input_glob: &str) -> flp::Result<()> {
    let output_folder = get_final_output_folder(&None)?;
    let pairs = get_input_output_pairs(input_glob, &output_folder)?;

    let mut passed = 0usize;
    let mut failed = 0usize;
    for (input_path, _) in pairs {
        print!("Checking {}... ", input_path.display());
        let bytes = fs::read(&input_path)?;
        match parse(&bytes) {
            Ok(parsed) if serialize(&parsed) == bytes => {
                println!("ok!");
                passed += 1;
            }
            Ok(_) => {
                println!("FAILED (round-trip mismatch)");
                failed += 1;
            }
            Err(e) => {
                println!("FAILED ({e})");
                failed += 1;
            }
        }
    }

    println!("\n{passed} passed, {failed} failed.");
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
