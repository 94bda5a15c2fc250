//! Shader remapping
//!
//! A remap redirects every realized shader of one name to a target shader.
//! Renderers draw [`ShaderRegistry::effective`] instead of the shader they
//! resolved.

use shaderdex_shared::{names_equal, strip_extension};
use smallvec::SmallVec;

use super::ShaderRegistry;
use crate::image::MipPolicy;
use crate::shader::{INVALID_HANDLE, ShaderId};

impl ShaderRegistry {
    /// Redirect every realized shader named `source` to `target`.
    ///
    /// `target` is resolved with lightmap 0 if no shader of that name exists
    /// yet. A target that cannot be found is replaced by the default shader.
    /// Remapping a name onto itself clears the redirection. `time_offset` is
    /// stored on the target.
    pub fn remap(&mut self, source: &str, target: &str, time_offset: Option<&str>) {
        let target_id = match self.find_loaded(target) {
            Some(id) if id != ShaderId::DEFAULT => id,
            _ => {
                let id = self.resolve(Some(target), 0, MipPolicy::Mipmap);
                let handle = if self.shader(id).default_shader {
                    INVALID_HANDLE
                } else {
                    id.handle()
                };
                let id = self.shader_by_handle(handle);
                if id == ShaderId::DEFAULT {
                    tracing::warn!("remap: shader {} not found", target);
                }
                id
            }
        };

        let source = strip_extension(source);
        let cancel = names_equal(source, &self.shader(target_id).name);
        let aliases: SmallVec<[ShaderId; 4]> = self
            .chain(source)
            .filter(|shader| names_equal(&shader.name, source))
            .map(|shader| shader.id)
            .collect();

        for id in &aliases {
            self.shaders[id.index()].remapped = if cancel { None } else { Some(target_id) };
        }
        tracing::debug!(
            "remapped {} shaders named '{}' to {}",
            aliases.len(),
            source,
            self.shader(target_id).name
        );

        if let Some(text) = time_offset {
            self.shaders[target_id.index()].time_offset = parse_time_offset(text);
        }
    }

    /// The shader to draw in place of `id`.
    ///
    /// Follows remaps for at most `resolve.max_remap_depth` hops. A cycle
    /// stops at whichever shader the last hop reached.
    pub fn effective(&self, id: ShaderId) -> ShaderId {
        let max_depth = self.config.resolve.max_remap_depth;
        let mut current = id;
        for _ in 0..max_depth {
            match self.shader(current).remapped {
                Some(next) => current = next,
                None => return current,
            }
        }

        if self.shader(current).remapped.is_some() {
            tracing::warn!(
                "remap chain from '{}' is longer than {} hops",
                self.shader(id).name,
                max_depth
            );
        }
        current
    }
}

fn parse_time_offset(text: &str) -> f32 {
    text.trim().parse().unwrap_or_else(|_| {
        tracing::warn!("remap: bad time offset '{}', using 0", text);
        0.0
    })
}
