//! Where rendered forms end up.

use crate::error::{FormError, FormResult};
use crate::render::RenderedForm;
use std::path::PathBuf;

/// Output target for rendered forms.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormOutput {
    /// Keep the PDF in memory only.
    #[default]
    Memory,
    /// Write the PDF into this directory under its generated filename.
    Directory(PathBuf),
}

/// A delivered form. `path` is set when the form was written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub path: Option<PathBuf>,
}

impl FormOutput {
    /// # Errors
    ///
    /// Returns `FormError::Write` if the directory cannot be created or the file written.
    pub fn deliver(&self, form: RenderedForm) -> FormResult<FormArtifact> {
        match self {
            FormOutput::Memory => Ok(FormArtifact {
                filename: form.filename,
                bytes: form.bytes,
                path: None,
            }),
            FormOutput::Directory(dir) => {
                std::fs::create_dir_all(dir).map_err(|source| FormError::Write {
                    path: dir.clone(),
                    source,
                })?;
                let path = dir.join(&form.filename);
                std::fs::write(&path, &form.bytes).map_err(|source| FormError::Write {
                    path: path.clone(),
                    source,
                })?;
                tracing::info!("referral form written to {}", path.display());

                Ok(FormArtifact {
                    filename: form.filename,
                    bytes: form.bytes,
                    path: Some(path),
                })
            }
        }
    }
}
