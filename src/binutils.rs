//! Batch file-processing helpers shared by `flp_tool`'s subcommands: glob
//! expansion, input/output path pairing, and `.flp` extension filtering.

use std::fs::{File, OpenOptions};
use std::io::Seek;
use std::path::{Path, PathBuf};

use crate::error::FlpError;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Opens `path` for reading and writing, truncating any existing contents.
pub fn open_file_overwrite_rw<P: AsRef<Path>>(path: P) -> Result<File, FlpError> {
    let mut file = OpenOptions::new()
        .append(false)
        .create(true)
        .read(true)
        .write(true)
        .open(path)?;
    file.set_len(0)?;
    file.seek(std::io::SeekFrom::Start(0))?;
    Ok(file)
}

/// Expands `input_glob`, keeping only `.flp` files, and pairs each with an
/// output path under `output_folder` sharing its file name.
pub fn get_input_output_pairs(
    input_glob: &str,
    output_folder: &Path,
) -> Result<Vec<(PathBuf, PathBuf)>, FlpError> {
    let mut pairs = Vec::new();
    for entry in glob::glob(input_glob)? {
        match entry {
            Ok(path) => {
                if !valid_flp_file(&path) {
                    println!("Skipping {}!", path.display());
                    continue;
                }
                if let Some(input_file_name) = path.file_name() {
                    let mut output_path = output_folder.to_path_buf();
                    output_path.push(input_file_name);
                    pairs.push((path, output_path));
                }
            }
            Err(e) => println!("{e:?}"),
        }
    }
    Ok(pairs)
}

/// Resolves the folder subcommands should write into: the caller-supplied
/// folder if given, else the current working directory.
pub fn get_final_output_folder(output_folder: &Option<PathBuf>) -> Result<PathBuf, FlpError> {
    match output_folder {
        Some(custom) => {
            if std::fs::metadata(custom)?.is_dir() {
                Ok(custom.clone())
            } else {
                Err(FlpError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "output path must be a folder",
                )))
            }
        }
        None => Ok(std::env::current_dir()?),
    }
}

/// True iff `path` is a file with a `.flp` extension (case-insensitive).
pub fn valid_flp_file<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("flp"))
            .unwrap_or(false)
}
