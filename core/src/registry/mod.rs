//! Shader registry
//!
//! Resolves `(name, lighting mode)` requests to realized shaders and caches
//! them. A request is answered from, in order:
//!
//! 1. the shader cache
//! 2. a script definition in the corpus
//! 3. an image with the same name
//! 4. a default-flagged shader for the name
//!
//! Resolution never fails. Shaders live in an arena indexed by [`ShaderId`];
//! cache buckets are chains linked through [`Shader::next`], newest first.
//! A default-flagged shader answers every lighting mode for its name, so a
//! name without a definition is only looked up once.

mod remap;

use shaderdex_shared::{MAX_QPATH, hash_name, names_equal, strip_extension};

use crate::config::RegistryConfig;
use crate::corpus::CorpusIndex;
use crate::error::CorpusError;
use crate::image::{ImageInfo, ImageLoader, MipPolicy};
use crate::parser::DefinitionParser;
use crate::script::{ScriptSource, ScriptWarning, load_corpus};
use crate::shader::{
    INVALID_HANDLE, LIGHTMAP_2D, LightingMode, Shader, ShaderBody, ShaderHandle, ShaderId,
    ShaderOrigin,
};
use crate::text::Lexer;

/// Name of the built-in default shader.
pub const DEFAULT_SHADER_NAME: &str = "<default>";

/// Most shaders a registry holds. Further requests get the default shader.
pub const MAX_SHADERS: usize = 16384;

/// Owns the script corpus, its index and every realized shader.
pub struct ShaderRegistry {
    config: RegistryConfig,
    corpus: CorpusIndex,
    script_files: Vec<String>,
    script_warnings: Vec<ScriptWarning>,
    shaders: Vec<Shader>,
    heads: Vec<Option<ShaderId>>,
    parser: Box<dyn DefinitionParser>,
    images: Box<dyn ImageLoader>,
}

impl ShaderRegistry {
    /// Create a registry with an empty corpus and only the default shader.
    ///
    /// Table sizes that are not powers of two are replaced by their defaults.
    pub fn new(
        mut config: RegistryConfig,
        parser: impl DefinitionParser + 'static,
        images: impl ImageLoader + 'static,
    ) -> Self {
        config.tables.repair();
        let mut registry = Self {
            corpus: CorpusIndex::empty(config.tables.corpus_hash_size),
            heads: vec![None; config.tables.shader_hash_size],
            config,
            script_files: Vec::new(),
            script_warnings: Vec::new(),
            shaders: Vec::new(),
            parser: Box::new(parser),
            images: Box::new(images),
        };
        registry.create_default_shader();
        registry
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Load all scripts from `source` and index them.
    pub fn load(&mut self, source: &dyn ScriptSource) -> Result<(), CorpusError> {
        let loaded = load_corpus(source, &self.config.scripts)?;
        self.corpus = CorpusIndex::build(loaded.text, self.config.tables.corpus_hash_size);
        self.script_files = loaded.files;
        self.script_warnings = loaded.warnings;
        tracing::info!(
            "loaded {} shader definitions from {} files",
            self.corpus.definition_count(),
            self.script_files.len()
        );
        Ok(())
    }

    /// Replace the corpus with a fresh load from `source`.
    ///
    /// Shaders resolved before the rebuild stay cached and keep the
    /// description they were parsed with. If the load fails the previous
    /// corpus stays in place.
    pub fn rebuild(&mut self, source: &dyn ScriptSource) -> Result<(), CorpusError> {
        tracing::debug!("rebuilding shader corpus");
        self.load(source).inspect_err(|e| {
            tracing::warn!("corpus rebuild failed, keeping previous corpus: {}", e);
        })
    }

    /// Forget every realized shader and recreate the default shader.
    ///
    /// The corpus is kept. Ids handed out before the reset are invalid.
    pub fn reset(&mut self) {
        self.shaders.clear();
        self.heads.fill(None);
        self.create_default_shader();
    }

    pub fn corpus(&self) -> &CorpusIndex {
        &self.corpus
    }

    /// Script files in the current corpus.
    pub fn script_files(&self) -> &[String] {
        &self.script_files
    }

    /// Structure problems found while loading the current corpus.
    pub fn script_warnings(&self) -> &[ScriptWarning] {
        &self.script_warnings
    }

    pub fn num_lightmaps(&self) -> i32 {
        self.config.resolve.num_lightmaps
    }

    /// Set how many lightmaps the loaded world provides.
    pub fn set_num_lightmaps(&mut self, count: i32) {
        self.config.resolve.num_lightmaps = count;
    }

    /// Number of realized shaders, the default shader included.
    pub fn len(&self) -> usize {
        self.shaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }

    /// All realized shaders in creation order.
    pub fn shaders(&self) -> impl Iterator<Item = &Shader> {
        self.shaders.iter()
    }

    /// The shader with `id`; the default shader for ids from before a reset.
    pub fn shader(&self, id: ShaderId) -> &Shader {
        self.shaders
            .get(id.index())
            .unwrap_or(&self.shaders[ShaderId::DEFAULT.index()])
    }

    /// Map a numeric handle back to its shader, warning on bad handles.
    pub fn shader_by_handle(&self, handle: ShaderHandle) -> ShaderId {
        if handle as usize >= self.shaders.len() {
            tracing::warn!("shader_by_handle: out of range handle {}", handle);
            return ShaderId::DEFAULT;
        }
        ShaderId::from_index(handle as usize)
    }

    /// Find a realized shader by name in any lighting mode, newest first.
    pub fn find_loaded(&self, name: &str) -> Option<ShaderId> {
        let stripped = strip_extension(name);
        self.chain(stripped)
            .find(|shader| names_equal(&shader.name, stripped))
            .map(|shader| shader.id)
    }

    /// Resolve a shader, realizing it if needed.
    ///
    /// `lightmap` is a raw lighting index (see [`LightingMode::from_raw`]).
    /// Indices past the world's lightmaps fall back to vertex lighting. Always
    /// returns a usable shader; `None` yields the default shader.
    pub fn resolve(&mut self, name: Option<&str>, lightmap: i32, mip: MipPolicy) -> ShaderId {
        let Some(name) = name else {
            tracing::warn!("find shader: name = NULL");
            return ShaderId::DEFAULT;
        };

        let lighting = self.clamp_lighting(name, lightmap);
        let stripped = strip_extension(name);

        if let Some(id) = self.find_cached(stripped, lighting) {
            return id;
        }

        if let Some(cursor) = self.corpus.find_definition(stripped) {
            if self.config.resolve.print_shaders {
                tracing::info!("*SHADER* {}", name);
            }

            let mut lexer = Lexer::at(self.corpus.text(), cursor);
            let (origin, body, default_shader) = match self.parser.parse(stripped, &mut lexer) {
                Ok(body) => (ShaderOrigin::Script, body, false),
                Err(e) => {
                    tracing::warn!("ParseShader: {} had errors: {}", stripped, e);
                    (ShaderOrigin::Default, ShaderBody::default(), true)
                }
            };
            return self.finish(stripped, lighting, origin, body, default_shader);
        }

        match self.images.find_image(name, mip) {
            Some(image) => {
                let body = ShaderBody::from_image(&image, lighting);
                self.finish(stripped, lighting, ShaderOrigin::Image(image), body, false)
            }
            None => {
                tracing::debug!("no shader or image for '{}', using default", name);
                self.finish(
                    stripped,
                    lighting,
                    ShaderOrigin::Default,
                    ShaderBody::default(),
                    true,
                )
            }
        }
    }

    /// Register a shader built from an already loaded image.
    ///
    /// Uses the same cache check as [`resolve`](Self::resolve) but never
    /// consults the corpus. `lightmap` is not checked against the world's
    /// lightmap count. `mip` decides how the image is sampled.
    pub fn register_by_image(
        &mut self,
        name: &str,
        lightmap: i32,
        image: &ImageInfo,
        mip: MipPolicy,
    ) -> ShaderHandle {
        let lighting = lighting_from_raw(name, lightmap);
        let stripped = strip_extension(name);

        if let Some(id) = self.find_cached(stripped, lighting) {
            return id.handle();
        }

        let image = ImageInfo::new(image.name.clone(), image.width, image.height, mip);
        let body = ShaderBody::from_image(&image, lighting);
        self.finish(stripped, lighting, ShaderOrigin::Image(image), body, false)
            .handle()
    }

    /// Register a 2D shader (menus, HUD). Mipmapped.
    ///
    /// Returns [`INVALID_HANDLE`] for names that are too long or have no
    /// shader or image. The failed lookup stays cached.
    pub fn register_shader(&mut self, name: &str) -> ShaderHandle {
        self.register(name, LIGHTMAP_2D, MipPolicy::Mipmap)
    }

    /// Like [`register_shader`](Self::register_shader) without mipmaps.
    pub fn register_shader_no_mip(&mut self, name: &str) -> ShaderHandle {
        self.register(name, LIGHTMAP_2D, MipPolicy::NoMip)
    }

    /// Register a shader for an explicit raw lighting index.
    pub fn register_shader_lightmap(&mut self, name: &str, lightmap: i32) -> ShaderHandle {
        self.register(name, lightmap, MipPolicy::Mipmap)
    }

    fn register(&mut self, name: &str, lightmap: i32, mip: MipPolicy) -> ShaderHandle {
        if name.len() >= MAX_QPATH {
            tracing::warn!("Shader name exceeds MAX_QPATH: {}", name);
            return INVALID_HANDLE;
        }

        let id = self.resolve(Some(name), lightmap, mip);
        if self.shader(id).default_shader {
            return INVALID_HANDLE;
        }
        id.handle()
    }

    fn clamp_lighting(&self, name: &str, lightmap: i32) -> LightingMode {
        if lightmap >= 0 && lightmap >= self.config.resolve.num_lightmaps {
            return LightingMode::ByVertex;
        }
        lighting_from_raw(name, lightmap)
    }

    /// Cached shader for `name` in `lighting`, or a default-flagged shader
    /// for `name` in any mode.
    fn find_cached(&self, name: &str, lighting: LightingMode) -> Option<ShaderId> {
        self.chain(name)
            .find(|shader| {
                names_equal(&shader.name, name)
                    && (shader.lighting == lighting || shader.default_shader)
            })
            .map(|shader| shader.id)
    }

    /// Walk the cache bucket `name` hashes to.
    fn chain(&self, name: &str) -> impl Iterator<Item = &Shader> + use<'_> {
        let shaders = &self.shaders;
        let bucket = hash_name(name, self.heads.len());
        std::iter::successors(self.heads[bucket].map(|id| &shaders[id.index()]), move |shader| {
            shader.next.map(|id| &shaders[id.index()])
        })
    }

    fn finish(
        &mut self,
        name: &str,
        lighting: LightingMode,
        origin: ShaderOrigin,
        body: ShaderBody,
        default_shader: bool,
    ) -> ShaderId {
        if self.shaders.len() >= MAX_SHADERS {
            tracing::warn!("MAX_SHADERS hit, '{}' uses the default shader", name);
            return ShaderId::DEFAULT;
        }

        let id = ShaderId::from_index(self.shaders.len());
        let bucket = hash_name(name, self.heads.len());
        self.shaders.push(Shader {
            name: name.to_string(),
            lighting,
            id,
            default_shader,
            remapped: None,
            time_offset: 0.0,
            origin,
            body,
            next: self.heads[bucket],
        });
        self.heads[bucket] = Some(id);
        id
    }

    fn create_default_shader(&mut self) {
        let id = self.finish(
            DEFAULT_SHADER_NAME,
            LightingMode::None,
            ShaderOrigin::Default,
            ShaderBody::default(),
            true,
        );
        debug_assert_eq!(id, ShaderId::DEFAULT);
    }
}

/// Lighting mode for a raw index; indices below 2D fall back to vertex.
fn lighting_from_raw(name: &str, lightmap: i32) -> LightingMode {
    LightingMode::from_raw(lightmap).unwrap_or_else(|| {
        tracing::warn!(
            "shader '{}' has invalid lightmap index of {}",
            name,
            lightmap
        );
        LightingMode::ByVertex
    })
}
