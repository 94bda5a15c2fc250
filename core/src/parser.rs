//! Shader definition parsing
//!
//! [`DefinitionParser`] is the seam between the registry and whatever turns
//! a definition's text into a [`ShaderBody`]. [`ScriptParser`] handles the
//! common subset of the script language: top-level keywords, `surfaceparm`,
//! `cull`, `sort`, and stages with `map`/`clampMap`/`animMap`, `blendFunc`
//! and `rgbGen`. Anything else is kept as a [`Directive`].

use crate::error::ParseError;
use crate::shader::{
    BlendFactor, BlendFunc, Cull, Directive, MAX_SHADER_STAGES, RgbGen, ShaderBody, Stage,
    StageMap,
};
use crate::text::Lexer;

/// Turns the text of one shader definition into a [`ShaderBody`].
pub trait DefinitionParser {
    /// Parse the definition of `shader`. `lexer` is positioned just before
    /// the definition's opening brace.
    fn parse(&mut self, shader: &str, lexer: &mut Lexer<'_>) -> Result<ShaderBody, ParseError>;
}

/// Parser for the shader script language.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptParser;

impl DefinitionParser for ScriptParser {
    fn parse(&mut self, shader: &str, lexer: &mut Lexer<'_>) -> Result<ShaderBody, ParseError> {
        let token = lexer.next_token(true);
        if token != "{" {
            return Err(ParseError::MissingOpeningBrace {
                shader: shader.to_string(),
                found: token.to_string(),
            });
        }

        let mut body = ShaderBody::default();
        loop {
            let token = lexer.next_token(true);
            match token {
                "" => return Err(eof(shader)),
                "}" => break,
                "{" => {
                    if body.stages.len() >= MAX_SHADER_STAGES {
                        return Err(ParseError::TooManyStages {
                            shader: shader.to_string(),
                            max: MAX_SHADER_STAGES,
                        });
                    }
                    let stage = parse_stage(shader, body.stages.len(), lexer)?;
                    body.stages.push(stage);
                }
                keyword => {
                    let args = line_args(lexer);
                    match keyword.to_ascii_lowercase().as_str() {
                        "surfaceparm" => {
                            if let Some(param) = args.first() {
                                body.surface_params.push(param.to_ascii_lowercase());
                            }
                        }
                        "cull" => body.cull = parse_cull(&args),
                        "sort" => body.sort = args.first().map(|s| parse_sort(s)),
                        _ => body.directives.push(directive(keyword, &args)),
                    }
                }
            }
        }

        Ok(body)
    }
}

fn parse_stage(shader: &str, index: usize, lexer: &mut Lexer<'_>) -> Result<Stage, ParseError> {
    let mut map = None;
    let mut blend = None;
    let mut rgb_gen = RgbGen::Identity;
    let mut directives = Vec::new();

    loop {
        let token = lexer.next_token(true);
        match token {
            "" => return Err(eof(shader)),
            "}" => break,
            keyword => {
                let args = line_args(lexer);
                match keyword.to_ascii_lowercase().as_str() {
                    "map" => map = args.first().map(|arg| stage_map(arg)),
                    "clampmap" => map = args.first().map(|arg| StageMap::Clamp(arg.to_string())),
                    "animmap" => {
                        let frequency = args.first().and_then(|f| f.parse().ok()).unwrap_or(0.0);
                        let frames = args.iter().skip(1).map(|f| f.to_string()).collect();
                        map = Some(StageMap::Anim { frequency, frames });
                    }
                    "blendfunc" => blend = Some(parse_blend(shader, &args)?),
                    "rgbgen" => rgb_gen = RgbGen::parse(&args),
                    _ => directives.push(directive(keyword, &args)),
                }
            }
        }
    }

    let map = map.ok_or_else(|| ParseError::StageWithoutMap {
        shader: shader.to_string(),
        stage: index,
    })?;

    Ok(Stage {
        map,
        blend,
        rgb_gen,
        depth_test: true,
        directives,
    })
}

/// Remaining tokens on the current line, stopping before any brace.
fn line_args<'a>(lexer: &mut Lexer<'a>) -> Vec<&'a str> {
    let mut args = Vec::new();
    loop {
        let mut peek = lexer.clone();
        let token = peek.next_token(false);
        if token.is_empty() || token == "{" || token == "}" {
            return args;
        }
        *lexer = peek;
        args.push(token);
    }
}

fn eof(shader: &str) -> ParseError {
    ParseError::UnexpectedEof {
        shader: shader.to_string(),
    }
}

fn directive(keyword: &str, args: &[&str]) -> Directive {
    Directive {
        keyword: keyword.to_string(),
        args: args.iter().map(|a| a.to_string()).collect(),
    }
}

fn stage_map(arg: &str) -> StageMap {
    match arg.to_ascii_lowercase().as_str() {
        "$lightmap" => StageMap::Lightmap,
        "$whiteimage" => StageMap::WhiteImage,
        _ => StageMap::Image(arg.to_string()),
    }
}

fn parse_blend(shader: &str, args: &[&str]) -> Result<BlendFunc, ParseError> {
    let unknown = |factor: &str| ParseError::UnknownBlendFactor {
        shader: shader.to_string(),
        factor: factor.to_string(),
    };

    match args {
        [] => Err(unknown("")),
        [word] => BlendFunc::from_shorthand(word).ok_or_else(|| unknown(word)),
        [src, dst, ..] => {
            let src = BlendFactor::parse(src).ok_or_else(|| unknown(src))?;
            let dst = BlendFactor::parse(dst).ok_or_else(|| unknown(dst))?;
            Ok(BlendFunc::new(src, dst))
        }
    }
}

fn parse_cull(args: &[&str]) -> Cull {
    match args.first().map(|a| a.to_ascii_lowercase()).as_deref() {
        Some("none" | "twosided" | "disable") => Cull::None,
        Some("back" | "backside" | "backsided") => Cull::Back,
        _ => Cull::Front,
    }
}

fn parse_sort(value: &str) -> f32 {
    match value.to_ascii_lowercase().as_str() {
        "portal" => 1.0,
        "sky" => 2.0,
        "opaque" => 3.0,
        "decal" => 4.0,
        "seethrough" => 5.0,
        "banner" => 6.0,
        "underwater" => 8.0,
        "additive" => 10.0,
        "nearest" => 16.0,
        other => other.parse().unwrap_or(0.0),
    }
}
