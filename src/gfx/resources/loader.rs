//! Asset loading
//!
//! The loader decodes files into surfaces and registers them with the object
//! arena it is handed. It keeps no assets itself.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::LoaderError;
use crate::gfx::scene::{GameObjectManager, ObjectBuilder, ObjectDescriptor, ObjectId, SceneHook};
use crate::gfx::surface::Surface;

#[derive(Debug, Clone, Default)]
pub struct Loader {
    asset_root: Option<PathBuf>,
}

impl Loader {
    /// Creates a loader; relative paths resolve under `asset_root` when given
    pub fn new(asset_root: Option<PathBuf>) -> Self {
        Self { asset_root }
    }

    pub fn asset_root(&self) -> Option<&Path> {
        self.asset_root.as_deref()
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.asset_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Decodes an image file and registers it as a new object
    ///
    /// # Arguments
    /// * `objects` - Arena the new object is registered in
    /// * `path` - Image file, resolved against the asset root
    /// * `is_transparent` - Enable per-pixel alpha blending for the surface
    /// * `flipped` - Flip the image vertically
    ///
    /// # Errors
    /// [`LoaderError::NotFound`] when the file does not exist, in which case
    /// nothing is registered; [`LoaderError::Io`] or [`LoaderError::Decode`]
    /// when it cannot be read as an image.
    pub fn load_image(
        &self,
        objects: &mut GameObjectManager,
        path: impl AsRef<Path>,
        is_transparent: bool,
        flipped: bool,
    ) -> Result<ObjectId, LoaderError> {
        let path = self.resolve(path.as_ref());
        if !path.exists() {
            return Err(LoaderError::NotFound(path));
        }

        let surface = decode_surface(&path, is_transparent, flipped)?;
        let mut builder = ObjectBuilder::new(surface);
        if let Some(stem) = path.file_stem() {
            builder = builder.with_name(stem.to_string_lossy());
        }

        let id = objects.register(builder);
        debug!("Loaded image {} as {}", path.display(), id);
        Ok(id)
    }

    pub fn load_transparent_image(
        &self,
        objects: &mut GameObjectManager,
        path: impl AsRef<Path>,
        flipped: bool,
    ) -> Result<ObjectId, LoaderError> {
        self.load_image(objects, path, true, flipped)
    }

    /// Audio is not supported; always fails with [`LoaderError::NotImplemented`]
    pub fn load_audio(&self, path: impl AsRef<Path>, is_music: bool) -> Result<(), LoaderError> {
        warn!(
            "Ignoring audio asset {} (music: {}): audio loading is not implemented",
            path.as_ref().display(),
            is_music
        );
        Err(LoaderError::NotImplemented("audio loading"))
    }

    /// Constructs an object from a descriptor with default arguments
    pub fn load_object<D>(
        &self,
        objects: &mut GameObjectManager,
        descriptor: &D,
    ) -> Result<ObjectId, LoaderError>
    where
        D: ObjectDescriptor + ?Sized,
        D::Args: Default,
    {
        Ok(objects.create_with(descriptor, D::Args::default())?)
    }

    pub fn load_scene<H>(&self, objects: &mut GameObjectManager, hook: H) -> ObjectId
    where
        H: SceneHook + 'static,
    {
        objects.create_scene(hook)
    }

    pub fn destroy(&mut self) {
        debug!("Loader destroyed");
    }
}

fn decode_surface(path: &Path, is_transparent: bool, flipped: bool) -> Result<Surface, LoaderError> {
    let image = image::open(path).map_err(|err| match err {
        image::ImageError::IoError(source) => LoaderError::Io {
            path: path.to_path_buf(),
            source,
        },
        source => LoaderError::Decode {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let has_alpha = image.color().has_alpha();
    let mut pixels = image.into_rgba8();
    if flipped {
        image::imageops::flip_vertical_in_place(&mut pixels);
    }

    let mut surface = Surface::from_image(pixels, has_alpha);
    if is_transparent {
        surface.convert_alpha();
    }
    Ok(surface)
}
