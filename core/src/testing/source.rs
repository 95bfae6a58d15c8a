use std::path::Path;

use anyhow::Context as _;
use cph_webclient::Language;

/// A program to be executed remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCode {
    pub language: Language,
    pub code: String,
}

impl SourceCode {
    pub fn new(language: Language, code: impl Into<String>) -> Self {
        Self {
            language,
            code: code.into(),
        }
    }

    /// Reads `filepath`; the language is detected from its extension unless given.
    pub fn from_file(filepath: impl AsRef<Path>, language: Option<Language>) -> anyhow::Result<Self> {
        let filepath = filepath.as_ref();
        let language = match language {
            Some(lang) => lang,
            None => Language::from_path(filepath).with_context(|| {
                format!(
                    "Cannot detect language from file extension: {:?}",
                    filepath
                )
            })?,
        };
        let code = fsutil::read_to_string(filepath)?;
        Ok(Self { language, code })
    }
}
