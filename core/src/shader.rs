//! Shader objects and their parsed description

use smallvec::SmallVec;
use std::fmt;

use crate::image::ImageInfo;

/// Most stages a single shader may declare.
pub const MAX_SHADER_STAGES: usize = 8;

/// Raw lighting index for dynamic diffuse lighting.
pub const LIGHTMAP_NONE: i32 = -1;
/// Raw lighting index for a white base stage.
pub const LIGHTMAP_WHITEIMAGE: i32 = -2;
/// Raw lighting index for per-vertex colour.
pub const LIGHTMAP_BY_VERTEX: i32 = -3;
/// Raw lighting index for 2D (screen-space) drawing. Lowest valid raw value.
pub const LIGHTMAP_2D: i32 = -4;

/// Numeric shader handle handed to callers. Zero means "no explicit shader".
pub type ShaderHandle = u32;

/// Handle returned when a shader could not be registered.
pub const INVALID_HANDLE: ShaderHandle = 0;

/// Stable index of a realized shader.
///
/// Indices are assigned in creation order and never reused while the
/// registry lives. Index 0 is the built-in default shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderId(u32);

impl ShaderId {
    /// The built-in default shader.
    pub const DEFAULT: Self = Self(0);

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn handle(self) -> ShaderHandle {
        self.0
    }
}

impl fmt::Display for ShaderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a surface using the shader receives light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightingMode {
    /// Dynamic diffuse lighting (entity skins)
    None,
    /// White base stage modulated by the texture
    WhiteImage,
    /// Per-vertex colour (pre-lit models)
    ByVertex,
    /// 2D drawing, no depth test
    ScreenSpace,
    /// Lightmapped world surface using lightmap slot `n`
    Lightmap(u32),
}

impl LightingMode {
    /// Convert a raw lighting index. Values below [`LIGHTMAP_2D`] are invalid.
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            LIGHTMAP_NONE => Some(Self::None),
            LIGHTMAP_WHITEIMAGE => Some(Self::WhiteImage),
            LIGHTMAP_BY_VERTEX => Some(Self::ByVertex),
            LIGHTMAP_2D => Some(Self::ScreenSpace),
            n if n >= 0 => Some(Self::Lightmap(n as u32)),
            _ => None,
        }
    }

    pub fn raw(self) -> i32 {
        match self {
            Self::None => LIGHTMAP_NONE,
            Self::WhiteImage => LIGHTMAP_WHITEIMAGE,
            Self::ByVertex => LIGHTMAP_BY_VERTEX,
            Self::ScreenSpace => LIGHTMAP_2D,
            Self::Lightmap(n) => n as i32,
        }
    }
}

impl fmt::Display for LightingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "dynamic"),
            Self::WhiteImage => write!(f, "white-image"),
            Self::ByVertex => write!(f, "vertex"),
            Self::ScreenSpace => write!(f, "2d"),
            Self::Lightmap(n) => write!(f, "lightmap {n}"),
        }
    }
}

/// Where a shader's description came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderOrigin {
    /// Parsed from a script definition
    Script,
    /// Synthesized from an image
    Image(ImageInfo),
    /// No definition or image; the default look
    Default,
}

/// A realized shader.
#[derive(Debug, Clone, PartialEq)]
pub struct Shader {
    /// Name without extension, at most `MAX_QPATH - 1` bytes
    pub name: String,
    pub lighting: LightingMode,
    pub id: ShaderId,
    /// True when no authored definition exists for this name
    pub default_shader: bool,
    /// Shader to use in place of this one; resolve with
    /// [`ShaderRegistry::effective`](crate::ShaderRegistry::effective)
    pub remapped: Option<ShaderId>,
    /// Seconds added to the shader clock
    pub time_offset: f32,
    pub origin: ShaderOrigin,
    pub body: ShaderBody,
    pub(crate) next: Option<ShaderId>,
}

/// Parsed or synthesized description of how a shader draws.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShaderBody {
    /// Explicit sort key, if the definition set one
    pub sort: Option<f32>,
    pub cull: Cull,
    /// `surfaceparm` values, lowercased
    pub surface_params: Vec<String>,
    /// Top-level keywords kept verbatim
    pub directives: Vec<Directive>,
    pub stages: SmallVec<[Stage; 2]>,
}

/// A keyword and its arguments as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub keyword: String,
    pub args: Vec<String>,
}

/// Face culling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cull {
    #[default]
    Front,
    Back,
    None,
}

/// One rendering pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub map: StageMap,
    pub blend: Option<BlendFunc>,
    pub rgb_gen: RgbGen,
    pub depth_test: bool,
    /// Stage keywords kept verbatim
    pub directives: Vec<Directive>,
}

impl Stage {
    pub fn new(map: StageMap) -> Self {
        Self {
            map,
            blend: None,
            rgb_gen: RgbGen::Identity,
            depth_test: true,
            directives: Vec::new(),
        }
    }
}

/// Texture source of a stage.
#[derive(Debug, Clone, PartialEq)]
pub enum StageMap {
    Image(String),
    Clamp(String),
    Anim { frequency: f32, frames: Vec<String> },
    Lightmap,
    WhiteImage,
}

/// `blendFunc` source and destination factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendFunc {
    pub src: BlendFactor,
    pub dst: BlendFactor,
}

impl BlendFunc {
    pub const ADD: Self = Self::new(BlendFactor::One, BlendFactor::One);
    pub const FILTER: Self = Self::new(BlendFactor::DstColor, BlendFactor::Zero);
    pub const BLEND: Self = Self::new(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);

    pub const fn new(src: BlendFactor, dst: BlendFactor) -> Self {
        Self { src, dst }
    }

    /// Look up the single-word forms `add`, `filter` and `blend`.
    pub fn from_shorthand(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "add" => Some(Self::ADD),
            "filter" => Some(Self::FILTER),
            "blend" => Some(Self::BLEND),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    One,
    Zero,
    SrcColor,
    OneMinusSrcColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstColor,
    OneMinusDstColor,
    DstAlpha,
    OneMinusDstAlpha,
    SrcAlphaSaturate,
}

impl BlendFactor {
    /// Parse a `GL_*` factor name, ignoring case.
    pub fn parse(name: &str) -> Option<Self> {
        let factor = match name.to_ascii_uppercase().as_str() {
            "GL_ONE" => Self::One,
            "GL_ZERO" => Self::Zero,
            "GL_SRC_COLOR" => Self::SrcColor,
            "GL_ONE_MINUS_SRC_COLOR" => Self::OneMinusSrcColor,
            "GL_SRC_ALPHA" => Self::SrcAlpha,
            "GL_ONE_MINUS_SRC_ALPHA" => Self::OneMinusSrcAlpha,
            "GL_DST_COLOR" => Self::DstColor,
            "GL_ONE_MINUS_DST_COLOR" => Self::OneMinusDstColor,
            "GL_DST_ALPHA" => Self::DstAlpha,
            "GL_ONE_MINUS_DST_ALPHA" => Self::OneMinusDstAlpha,
            "GL_SRC_ALPHA_SATURATE" => Self::SrcAlphaSaturate,
            _ => return None,
        };
        Some(factor)
    }
}

/// Colour source of a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RgbGen {
    Identity,
    IdentityLighting,
    LightingDiffuse,
    ExactVertex,
    Vertex,
    /// Any other generator, lowercased with its arguments
    Other(String),
}

impl RgbGen {
    pub fn parse(words: &[&str]) -> Self {
        let Some(first) = words.first() else {
            return Self::Identity;
        };
        match first.to_ascii_lowercase().as_str() {
            "identity" => Self::Identity,
            "identitylighting" => Self::IdentityLighting,
            "lightingdiffuse" => Self::LightingDiffuse,
            "exactvertex" => Self::ExactVertex,
            "vertex" => Self::Vertex,
            _ => Self::Other(words.join(" ").to_ascii_lowercase()),
        }
    }
}

impl ShaderBody {
    /// Default shading for an image with no script definition.
    pub fn from_image(image: &ImageInfo, lighting: LightingMode) -> Self {
        let texture = StageMap::Image(image.name.clone());
        let mut stages = SmallVec::new();

        match lighting {
            LightingMode::None => {
                let mut stage = Stage::new(texture);
                stage.rgb_gen = RgbGen::LightingDiffuse;
                stages.push(stage);
            }
            LightingMode::ByVertex => {
                let mut stage = Stage::new(texture);
                stage.rgb_gen = RgbGen::ExactVertex;
                stages.push(stage);
            }
            LightingMode::ScreenSpace => {
                let mut stage = Stage::new(texture);
                stage.rgb_gen = RgbGen::Vertex;
                stage.blend = Some(BlendFunc::BLEND);
                stage.depth_test = false;
                stages.push(stage);
            }
            LightingMode::WhiteImage => {
                let mut white = Stage::new(StageMap::WhiteImage);
                white.rgb_gen = RgbGen::IdentityLighting;
                stages.push(white);

                let mut stage = Stage::new(texture);
                stage.blend = Some(BlendFunc::FILTER);
                stages.push(stage);
            }
            LightingMode::Lightmap(_) => {
                stages.push(Stage::new(StageMap::Lightmap));

                let mut stage = Stage::new(texture);
                stage.blend = Some(BlendFunc::FILTER);
                stages.push(stage);
            }
        }

        Self {
            stages,
            ..Self::default()
        }
    }
}
