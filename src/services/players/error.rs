use super::TabId;

/// Errors that can occur when acting on a tracked tab
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No player is tracked for the given tab
    #[error("tab not found")]
    TabNotFound(TabId),

    /// Action name is not one of the recognized control operations
    #[error("unknown action '{0}'")]
    UnknownAction(String),

    /// The control command could not be handed to the upstream writer
    #[error("failed to control tab: {0}")]
    ControlFailed(String),
}
