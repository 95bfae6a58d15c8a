use std::{
    path::{Path, PathBuf},
    process::exit,
};

use anyhow::Context as _;

/// Program files picked up when none is given on the command line.
pub const DEFAULT_PROGRAM_GLOB: &str = "[mM]ain.*";

pub fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|e| {
        eprintln!("Failed to get current dir: {}", e);
        exit(1);
    })
}

pub fn replace_homedir_to_tilde(path: impl Into<PathBuf>) -> PathBuf {
    let path = path.into();
    let Some(home_dir) = ::dirs::home_dir() else {
        return path
    };
    path.strip_prefix(home_dir)
        .map(|path| Path::new("~").join(path))
        .unwrap_or(path)
}

/// `program_file_or_dir` itself if it is a file, else the most recently modified
/// `main.*` in it (or in the current dir).
pub fn determine_program_file(program_file_or_dir: &Option<PathBuf>) -> anyhow::Result<PathBuf> {
    let dir = match program_file_or_dir {
        Some(path) if path.is_file() => return Ok(path.clone()),
        Some(dir) => dir.clone(),
        None => current_dir(),
    };
    let pattern = glob::Pattern::new(DEFAULT_PROGRAM_GLOB)?;
    fsutil::find_most_recently_modified_file(&dir, &pattern)
        .with_context(|| format!("Cannot determine program file in {:?}", dir))
}

/// `None` and `-` both stand for stdin.
pub fn is_stdin(path: Option<&Path>) -> bool {
    path.map_or(true, |p| p == Path::new("-"))
}

/// Reads `path`, or stdin when it is `None` or `-`.
pub fn read_file_or_stdin(path: Option<&Path>, what: &str) -> anyhow::Result<String> {
    match path {
        Some(p) if !is_stdin(path) => {
            fsutil::read_to_string(p).with_context(|| format!("Failed to read {}", what))
        }
        _ => {
            eprintln!("Enter {} (finish with Ctrl-D):", what);
            std::io::read_to_string(std::io::stdin())
                .with_context(|| format!("Failed to read {} from stdin", what))
        }
    }
}
