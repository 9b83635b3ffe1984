use thiserror::Error;

/// Reasons a file is turned away before it reaches a conversation.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Le fichier est trop volumineux. La taille maximale est de 5 Mo.")]
    TooLarge { name: String, size: u64 },

    #[error("Seuls les fichiers PDF sont acceptés ({name}: {declared_type}).")]
    UnsupportedType { name: String, declared_type: String },

    #[error("Impossible de lire {name}: {source}")]
    Unreadable {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl IntakeError {
    pub fn file_name(&self) -> &str {
        match self {
            Self::TooLarge { name, .. }
            | Self::UnsupportedType { name, .. }
            | Self::Unreadable { name, .. } => name,
        }
    }
}
