//! Image lookup for shaders synthesized from raw textures
//!
//! Only the lookup matters here: whether an image with a given name exists,
//! its size and the sampling mode it was requested with. Pixel decoding and
//! upload belong to the renderer.

use hashbrown::HashMap;
use std::path::{Component, Path, PathBuf};

use shaderdex_shared::strip_extension;

/// Extensions probed, in order, when a name has none or its file is missing.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["tga", "jpg", "png"];

/// How an image found for a shader should be sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MipPolicy {
    /// World and model textures: mipmapped, picmip applies, repeating
    #[default]
    Mipmap,
    /// Menu graphics: full resolution, clamped
    NoMip,
}

impl MipPolicy {
    pub fn from_mip_raw(mip_raw_image: bool) -> Self {
        if mip_raw_image {
            Self::Mipmap
        } else {
            Self::NoMip
        }
    }

    pub fn mipmap(self) -> bool {
        self == Self::Mipmap
    }

    pub fn wrap(self) -> WrapMode {
        match self {
            Self::Mipmap => WrapMode::Repeat,
            Self::NoMip => WrapMode::Clamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    Repeat,
    Clamp,
}

/// An image available to shaders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    /// Name as requested, without extension
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub mipmap: bool,
    pub picmip: bool,
    pub wrap: WrapMode,
}

impl ImageInfo {
    pub fn new(name: impl Into<String>, width: u32, height: u32, mip: MipPolicy) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            mipmap: mip.mipmap(),
            picmip: mip.mipmap(),
            wrap: mip.wrap(),
        }
    }
}

/// Finds images by name.
pub trait ImageLoader {
    /// Look up `name` (extension optional), applying `mip` to a newly found
    /// image. Returns `None` if no such image exists.
    fn find_image(&mut self, name: &str, mip: MipPolicy) -> Option<ImageInfo>;
}

/// Images stored as files under a root directory.
///
/// Found images are remembered by lowercase name; a later request with a
/// different mip policy gets the first one's settings.
#[derive(Debug)]
pub struct DirImageLoader {
    root: PathBuf,
    images: HashMap<String, ImageInfo>,
}

impl DirImageLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            images: HashMap::new(),
        }
    }

    /// Number of distinct images found so far.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    fn probe(&self, name: &str) -> Option<(u32, u32)> {
        let stripped = strip_extension(name);
        let explicit = (stripped.len() < name.len()).then(|| name.to_string());
        let candidates = explicit.into_iter().chain(
            IMAGE_EXTENSIONS
                .iter()
                .map(|ext| format!("{stripped}.{ext}")),
        );

        for candidate in candidates {
            let path = self.root.join(&candidate);
            if !path.is_file() {
                continue;
            }
            match image::image_dimensions(&path) {
                Ok(size) => return Some(size),
                Err(e) => tracing::warn!("unreadable image {}: {}", path.display(), e),
            }
        }
        None
    }
}

impl ImageLoader for DirImageLoader {
    fn find_image(&mut self, name: &str, mip: MipPolicy) -> Option<ImageInfo> {
        let stripped = strip_extension(name);
        let key = stripped.to_ascii_lowercase();

        if let Some(image) = self.images.get(&key) {
            if image.mipmap != mip.mipmap() {
                tracing::debug!("reused image {} with mixed mipmap parm", stripped);
            }
            return Some(image.clone());
        }

        if !stays_under_root(name) {
            tracing::warn!("image name '{}' leaves the image root", name);
            return None;
        }

        let (width, height) = self.probe(name)?;
        let image = ImageInfo::new(stripped, width, height, mip);
        self.images.insert(key, image.clone());
        Some(image)
    }
}

/// True for relative names without `..` or a drive prefix.
fn stays_under_root(name: &str) -> bool {
    let path = Path::new(name);
    !path.has_root()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(root: &std::path::Path, name: &str, width: u32, height: u32) {
        let path = root.join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        image::RgbaImage::new(width, height).save(&path).unwrap();
    }

    #[test]
    fn mip_policy_sampling() {
        let mip = ImageInfo::new("a", 1, 1, MipPolicy::Mipmap);
        assert!(mip.mipmap && mip.picmip);
        assert_eq!(mip.wrap, WrapMode::Repeat);

        let flat = ImageInfo::new("a", 1, 1, MipPolicy::from_mip_raw(false));
        assert!(!flat.mipmap && !flat.picmip);
        assert_eq!(flat.wrap, WrapMode::Clamp);
    }

    #[test]
    fn finds_image_with_alternate_extension() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "textures/base/wall.png", 8, 4);

        let mut loader = DirImageLoader::new(dir.path());
        let image = loader
            .find_image("textures/base/wall.tga", MipPolicy::Mipmap)
            .unwrap();
        assert_eq!(image.name, "textures/base/wall");
        assert_eq!((image.width, image.height), (8, 4));

        let again = loader.find_image("textures/base/wall", MipPolicy::Mipmap);
        assert_eq!(again, Some(image));
        assert_eq!(loader.len(), 1);
    }

    #[test]
    fn cached_image_keeps_first_sampling() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "gfx/2d/menu.png", 2, 2);

        let mut loader = DirImageLoader::new(dir.path());
        let first = loader.find_image("gfx/2d/menu", MipPolicy::NoMip).unwrap();
        let second = loader.find_image("GFX/2D/MENU", MipPolicy::Mipmap).unwrap();
        assert_eq!(first.wrap, WrapMode::Clamp);
        assert_eq!(second.wrap, WrapMode::Clamp);
    }

    #[test]
    fn missing_image_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = DirImageLoader::new(dir.path());
        assert_eq!(loader.find_image("textures/nope", MipPolicy::Mipmap), None);
        assert!(loader.is_empty());
    }

    #[test]
    fn names_outside_root_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "outside.png", 2, 2);
        write_png(dir.path(), "game/textures/inside.png", 2, 2);

        let mut loader = DirImageLoader::new(dir.path().join("game"));
        assert_eq!(loader.find_image("../outside", MipPolicy::Mipmap), None);
        assert_eq!(
            loader.find_image("textures/../../outside.png", MipPolicy::Mipmap),
            None
        );
        let absolute = dir.path().join("outside.png");
        assert_eq!(
            loader.find_image(absolute.to_str().unwrap(), MipPolicy::Mipmap),
            None
        );
        assert!(loader.is_empty());

        assert!(loader.find_image("textures/inside", MipPolicy::Mipmap).is_some());
    }

    #[test]
    fn corrupt_image_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.png"), b"not a png").unwrap();
        let mut loader = DirImageLoader::new(dir.path());
        assert_eq!(loader.find_image("broken", MipPolicy::Mipmap), None);
    }
}
