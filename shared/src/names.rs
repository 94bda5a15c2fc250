//! Helpers for the bounded, case-insensitive names used by shaders and images.

/// Maximum length of a game path, including the terminator slot.
///
/// Names of `MAX_QPATH` bytes or more are rejected by the public
/// registration entry points; stripped names are cut to `MAX_QPATH - 1`.
pub const MAX_QPATH: usize = 64;

/// Remove a trailing extension from `name` and bound it to `MAX_QPATH - 1` bytes.
///
/// Only a `.` after the last `/` counts as an extension, so directory names
/// containing dots are preserved.
pub fn strip_extension(name: &str) -> &str {
    let mut end = name.len();
    if let Some(dot) = name.rfind('.') {
        let slash = name.rfind('/');
        if slash.is_none_or(|slash| slash < dot) {
            end = dot;
        }
    }
    truncate(name, end.min(MAX_QPATH - 1))
}

/// ASCII case-insensitive comparison, the identity used for shader names.
pub fn names_equal(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

fn truncate(name: &str, mut len: usize) -> &str {
    while !name.is_char_boundary(len) {
        len -= 1;
    }
    &name[..len]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_extension() {
        assert_eq!(strip_extension("textures/base/wall.tga"), "textures/base/wall");
        assert_eq!(strip_extension("textures/base/wall"), "textures/base/wall");
        assert_eq!(strip_extension("gfx/2d/crosshaira.jpg"), "gfx/2d/crosshaira");
    }

    #[test]
    fn keeps_dots_in_directories() {
        assert_eq!(strip_extension("maps/q3dm1.old/floor"), "maps/q3dm1.old/floor");
        assert_eq!(strip_extension("maps/q3dm1.old/floor.tga"), "maps/q3dm1.old/floor");
    }

    #[test]
    fn bounds_long_names() {
        let long = "x".repeat(100);
        assert_eq!(strip_extension(&long).len(), MAX_QPATH - 1);
    }

    #[test]
    fn bounding_respects_char_boundaries() {
        let long = "\u{e9}".repeat(40);
        let stripped = strip_extension(&long);
        assert!(stripped.len() < MAX_QPATH);
        assert!(stripped.chars().all(|c| c == '\u{e9}'));
    }

    #[test]
    fn compares_without_case() {
        assert!(names_equal("Textures/Wall", "textures/WALL"));
        assert!(!names_equal("textures/wall", "textures/wall2"));
    }
}
