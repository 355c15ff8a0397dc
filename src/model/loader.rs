//! Reading and writing model artifacts.

use std::io::ErrorKind;
use std::path::Path;

use log::debug;

use super::ModelArtifact;
use crate::error::WithErrorContext;
use crate::serialization::Serializer;
use crate::{Error, Result};

/// Load and check the artifact at `path`.
///
/// A missing file is [`Error::NotFound`]; an unreadable one is [`Error::Io`];
/// a file that does not decode, or decodes to inconsistent tables, is
/// [`Error::Serialization`].
pub fn load(path: &Path) -> Result<ModelArtifact> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::not_found(format!(
                "Model file not found at {}. Please ensure the model is trained and saved at the specified location.",
                path.display()
            )));
        }
        Err(e) => {
            return Err(Error::Io(e)).with_context(format!("cannot read model file {}", path.display()));
        }
    };

    let serializer = Serializer::for_path(path);
    debug!(
        "Decoding {} bytes from {} as {}",
        bytes.len(),
        path.display(),
        serializer.format().name()
    );

    let artifact: ModelArtifact = serializer
        .deserialize(&bytes)
        .with_context(format!("Error loading model from {}", path.display()))?;
    artifact
        .validate()
        .with_context(format!("Inconsistent model artifact at {}", path.display()))?;

    Ok(artifact)
}

/// Write `artifact` to `path`, creating parent directories.
pub fn save(artifact: &ModelArtifact, path: &Path) -> Result<()> {
    artifact.validate()?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let bytes = Serializer::for_path(path).serialize(artifact)?;
    std::fs::write(path, bytes)?;
    debug!("Saved {} model to {}", artifact.kind(), path.display());
    Ok(())
}
