use bedrock_errors::FoundationError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// A configuration model that can be tracked, loaded and registered.
///
/// Field names of the serialized form become the dotted paths used for source tracking,
/// so models should serialize every field (avoid `skip_serializing_if`).
pub trait ConfigModel:
    Serialize + DeserializeOwned + Default + Clone + Debug + Send + Sync + 'static
{
    /// Cross-field checks run after every successful mutation.
    ///
    /// # Errors
    /// Returns a [`FoundationError::Validation`] describing the offending field.
    fn validate(&self) -> Result<(), FoundationError> {
        Ok(())
    }
}
