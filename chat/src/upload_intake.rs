use crate::error::IntakeError;
use crate::models::*;
use bytes::Bytes;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeSource {
    Drop,
    Picker,
}

/// A file offered to the intake, described by metadata only.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub name: String,
    pub size: u64,
    pub declared_type: String,
    pub path: PathBuf,
}

impl IncomingFile {
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, IntakeError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|source| IntakeError::Unreadable {
                name: name.clone(),
                source,
            })?;

        Ok(Self {
            declared_type: declared_type_for(path).to_string(),
            size: metadata.len(),
            path: path.to_path_buf(),
            name,
        })
    }

    fn has_pdf_extension(&self) -> bool {
        declared_type_for(&self.path) == PDF_CONTENT_TYPE
    }
}

/// Content type a file manager would announce for `path`, inferred from its extension.
pub fn declared_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => PDF_CONTENT_TYPE,
        _ => "application/octet-stream",
    }
}

pub fn validate(source: IntakeSource, file: &IncomingFile) -> Result<(), IntakeError> {
    if file.size > MAX_UPLOAD_BYTES {
        return Err(IntakeError::TooLarge {
            name: file.name.clone(),
            size: file.size,
        });
    }

    let accepted = match source {
        IntakeSource::Drop => file.declared_type == PDF_CONTENT_TYPE,
        IntakeSource::Picker => file.has_pdf_extension(),
    };
    if !accepted {
        return Err(IntakeError::UnsupportedType {
            name: file.name.clone(),
            declared_type: file.declared_type.clone(),
        });
    }

    Ok(())
}

#[derive(Debug, Default)]
pub struct UploadIntake {
    drag_active: bool,
}

impl UploadIntake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_drag_active(&self) -> bool {
        self.drag_active
    }

    pub fn drag_enter(&mut self) {
        self.drag_active = true;
    }

    pub fn drag_over(&mut self) {
        self.drag_active = true;
    }

    pub fn drag_leave(&mut self) {
        self.drag_active = false;
    }

    /// Handles a drop event. Only the first dropped file is considered.
    pub async fn drop_files(
        &mut self,
        files: &[IncomingFile],
    ) -> Result<Option<AttachedFile>, IntakeError> {
        self.drag_active = false;

        match files.first() {
            Some(file) => accept(IntakeSource::Drop, file).await.map(Some),
            None => Ok(None),
        }
    }

    /// Handles a file-picker change event.
    pub async fn pick_file(
        &self,
        file: Option<&IncomingFile>,
    ) -> Result<Option<AttachedFile>, IntakeError> {
        match file {
            Some(file) => accept(IntakeSource::Picker, file).await.map(Some),
            None => Ok(None),
        }
    }
}

async fn accept(source: IntakeSource, file: &IncomingFile) -> Result<AttachedFile, IntakeError> {
    if let Err(e) = validate(source, file) {
        log::warn!("Rejected {:?} upload of {}: {}", source, file.name, e);
        return Err(e);
    }

    let bytes = tokio::fs::read(&file.path)
        .await
        .map_err(|source| IntakeError::Unreadable {
            name: file.name.clone(),
            source,
        })?;

    // The file may have grown between the metadata check and the read
    let size = bytes.len() as u64;
    if size > MAX_UPLOAD_BYTES {
        log::warn!("Rejected {} after read: {} bytes", file.name, size);
        return Err(IntakeError::TooLarge {
            name: file.name.clone(),
            size,
        });
    }

    log::info!("Accepted {} ({} bytes)", file.name, size);
    Ok(AttachedFile {
        name: file.name.clone(),
        size,
        content_type: PDF_CONTENT_TYPE.to_string(),
        bytes: Bytes::from(bytes),
    })
}
