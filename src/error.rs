//! Error types for the kiln engine
//!
//! Each component reports its own failures through a dedicated enum so callers
//! can match on exactly what went wrong. [`EngineError`] wraps all of them for
//! code that drives the whole engine.

use std::io;
use std::path::PathBuf;

use crate::gfx::scene::object::ObjectId;

/// Result alias used by engine-level operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Failures raised while loading assets from disk
#[derive(thiserror::Error, Debug)]
pub enum LoaderError {
    /// The requested asset path does not exist. Checked before any decode.
    #[error("failed to load image {}: file not found", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    #[error(transparent)]
    Object(#[from] ObjectError),
}

impl LoaderError {
    /// The I/O error kind behind this failure, if it is an I/O failure
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            LoaderError::NotFound(_) => Some(io::ErrorKind::NotFound),
            LoaderError::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

/// Violations of the object arena's invariants
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ObjectError {
    #[error("object {0} is not owned by this manager")]
    UnknownObject(ObjectId),

    #[error("object {0} already has a parent")]
    AlreadyParented(ObjectId),

    #[error("object {0} cannot be its own parent")]
    SelfParent(ObjectId),

    #[error("object {0} is not a scene")]
    NotAScene(ObjectId),

    #[error("failed to construct object: {0}")]
    Construct(String),
}

impl ObjectError {
    pub fn construct(msg: impl Into<String>) -> Self {
        Self::Construct(msg.into())
    }
}

/// Usage errors raised by the renderer
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RendererError {
    #[error("cannot render object {0}: it is already rendered")]
    AlreadyRendered(ObjectId),

    #[error(transparent)]
    Object(#[from] ObjectError),

    #[error(transparent)]
    Display(#[from] DisplayError),
}

/// Failures of the display and its presentation backend
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DisplayError {
    #[error("display has been destroyed")]
    Destroyed,

    #[error("platform error: {0}")]
    Platform(String),

    #[error("surface error: {0}")]
    Surface(String),
}

impl DisplayError {
    pub fn platform(msg: impl Into<String>) -> Self {
        Self::Platform(msg.into())
    }

    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }
}

/// Top-level engine error
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("loader error: {0}")]
    Loader(#[from] LoaderError),

    #[error("renderer error: {0}")]
    Renderer(#[from] RendererError),

    #[error("display error: {0}")]
    Display(#[from] DisplayError),

    #[error("object error: {0}")]
    Object(#[from] ObjectError),

    /// The main loop observed an interrupt request
    #[error("interrupted")]
    Interrupted,

    #[error("engine has already been destroyed")]
    Destroyed,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
