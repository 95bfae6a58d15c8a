use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs::{self, File, ReadDir},
    io::{self, BufReader},
    path::{Path, PathBuf},
    time::SystemTime,
};

pub mod error {
    use std::{io, path::PathBuf};

    pub type Result<T> = std::result::Result<T, self::Error>;

    type Msg = &'static str;

    #[derive(Debug, thiserror::Error)]
    pub enum Error {
        #[error("{0} ({1}): {2}")]
        SingleIO(Msg, PathBuf, #[source] io::Error),

        #[error("No entry matched glob '{0}' in '{1}'")]
        NoEntryMatchedGlob(::glob::Pattern, PathBuf),

        #[error("Cannot serialize to JSON (dest='{0}'): {1}")]
        SerializeToJson(PathBuf, #[source] serde_json::Error),

        #[error("Cannot deserialize from JSON (src='{0}'): {1}")]
        DeserializeFromJson(PathBuf, #[source] serde_json::Error),
    }

    impl Error {
        pub fn is_not_found(&self) -> bool {
            matches!(self, Error::SingleIO(_, _, e) if e.kind() == io::ErrorKind::NotFound)
        }
    }
}
pub use error::{Error, Result};

pub fn mkdir_all(path: impl AsRef<Path>) -> Result<()> {
    let dir = path.as_ref();
    fs::create_dir_all(dir).map_err(|e| Error::SingleIO("Cannot create dir", dir.to_owned(), e))
}

pub fn write_with_mkdir<P, C>(filepath: P, contents: C) -> Result<()>
where
    P: AsRef<Path>,
    C: AsRef<[u8]>,
{
    let filepath = filepath.as_ref();
    if let Some(dir) = filepath.parent().filter(|d| !d.as_os_str().is_empty()) {
        self::mkdir_all(dir)?;
    }
    fs::write(filepath, contents)
        .map_err(|e| Error::SingleIO("Cannot write file", filepath.to_owned(), e))
}

/// Writes to a sibling temporary file and renames it over `filepath`,
/// so that readers never observe a half-written file.
pub fn replace_with_mkdir<P, C>(filepath: P, contents: C) -> Result<()>
where
    P: AsRef<Path>,
    C: AsRef<[u8]>,
{
    let filepath = filepath.as_ref();
    let mut tmp = filepath.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    self::write_with_mkdir(&tmp, contents)?;
    fs::rename(&tmp, filepath)
        .map_err(|e| Error::SingleIO("Cannot replace file", filepath.to_owned(), e))
}

pub fn read_to_string(filepath: impl AsRef<Path>) -> Result<String> {
    fs::read_to_string(&filepath)
        .map_err(|e| Error::SingleIO("Cannot read file", filepath.as_ref().to_owned(), e))
}

pub fn read_dir(dir: impl AsRef<Path>) -> Result<ReadDir> {
    fs::read_dir(&dir).map_err(|e| Error::SingleIO("Cannot read dir", dir.as_ref().to_owned(), e))
}

pub fn write_json_with_mkdir<P, T>(filepath: P, data: &T) -> Result<()>
where
    P: AsRef<Path>,
    T: Serialize,
{
    let s = serde_json::to_string_pretty(data)
        .map_err(|e| Error::SerializeToJson(filepath.as_ref().to_owned(), e))?;
    self::replace_with_mkdir(filepath, s + "\n")
}

pub fn read_json_with_deserialize<P, T>(filepath: P) -> Result<T>
where
    P: AsRef<Path>,
    T: DeserializeOwned,
{
    let filepath = filepath.as_ref();
    let f = File::open(filepath)
        .map_err(|e| Error::SingleIO("Cannot read file", filepath.to_owned(), e))?;
    serde_json::from_reader(BufReader::new(f))
        .map_err(|e| Error::DeserializeFromJson(filepath.to_owned(), e))
}

/// Like [`read_json_with_deserialize`], but a missing file yields `T::default()`.
pub fn read_json_or_default<P, T>(filepath: P) -> Result<T>
where
    P: AsRef<Path>,
    T: DeserializeOwned + Default,
{
    match self::read_json_with_deserialize(&filepath) {
        Err(e) if e.is_not_found() => {
            log::debug!("{:?} not found; using default", filepath.as_ref());
            Ok(T::default())
        }
        res => res,
    }
}

pub fn find_most_recently_modified_file(
    dir: impl AsRef<Path>,
    filename_pattern: &::glob::Pattern,
) -> Result<PathBuf> {
    let mut ans_filepath = None;
    let mut max_modified = SystemTime::UNIX_EPOCH;

    for entry in self::read_dir(&dir)?.filter_map(io::Result::ok) {
        let file_type = entry.file_type();
        let modified = entry.metadata().and_then(|info| info.modified());
        let (Ok(file_type), Ok(modified)) = (file_type, modified) else {
            continue
        };
        if file_type.is_dir() {
            continue;
        }
        let filename = entry.file_name();
        if filename_pattern.matches(filename.to_string_lossy().as_ref()) && max_modified <= modified
        {
            max_modified = modified;
            ans_filepath = Some(entry.path());
        }
    }
    ans_filepath.ok_or_else(|| {
        Error::NoEntryMatchedGlob(filename_pattern.to_owned(), dir.as_ref().to_owned())
    })
}
