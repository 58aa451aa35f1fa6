/// Returns `true` when the pattern contains glob magic (`*` or `?`).
///
/// Bracket classes are not supported; `[` is an ordinary character.
pub fn has_magic(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Match a glob pattern against an object path, segment by segment.
///
/// `*` and `?` never cross a `/`. A `**` segment matches zero or more
/// whole segments, so `**/*.png` matches both `cat.png` and
/// `images/cat.png`.
pub fn path_match(pattern: &str, path: &str) -> bool {
    let pat: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let segs: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match_segments(&pat, &segs)
}

fn match_segments(pat: &[&str], segs: &[&str]) -> bool {
    let Some(first) = pat.first() else {
        return segs.is_empty();
    };
    if *first == "**" {
        (0..=segs.len()).any(|skip| match_segments(&pat[1..], &segs[skip..]))
    } else {
        match segs.first() {
            Some(seg) => {
                fnmatch(first.as_bytes(), seg.as_bytes())
                    && match_segments(&pat[1..], &segs[1..])
            }
            None => false,
        }
    }
}

/// The literal directory prefix of a pattern: every segment before the
/// first one containing magic, with a trailing `/` when non-empty.
///
/// Used to narrow server-side listings before matching client-side.
pub fn glob_prefix(pattern: &str) -> String {
    let mut literal: Vec<&str> = Vec::new();
    let segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    for (i, seg) in segments.iter().enumerate() {
        if has_magic(seg) || *seg == "**" {
            break;
        }
        if i == segments.len() - 1 {
            // a fully literal pattern names one object
            literal.push(seg);
            return literal.join("/");
        }
        literal.push(seg);
    }
    if literal.is_empty() {
        String::new()
    } else {
        let mut prefix = literal.join("/");
        prefix.push('/');
        prefix
    }
}

/// Simple fnmatch for one path segment: `*` matches any chars, `?` matches
/// a single char.
pub fn fnmatch(pat: &[u8], name: &[u8]) -> bool {
    let mut pi = 0;
    let mut ni = 0;
    let mut star_pi = usize::MAX;
    let mut star_ni = 0;

    while ni < name.len() {
        if pi < pat.len() && (pat[pi] == b'?' || pat[pi] == name[ni]) {
            pi += 1;
            ni += 1;
        } else if pi < pat.len() && pat[pi] == b'*' {
            star_pi = pi;
            star_ni = ni;
            pi += 1;
        } else if star_pi != usize::MAX {
            pi = star_pi + 1;
            star_ni += 1;
            ni = star_ni;
        } else {
            return false;
        }
    }

    while pi < pat.len() && pat[pi] == b'*' {
        pi += 1;
    }

    pi == pat.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(pattern: &str, name: &str) -> bool {
        fnmatch(pattern.as_bytes(), name.as_bytes())
    }

    #[test]
    fn test_star() {
        assert!(seg("*", "hello"));
        assert!(seg("*.txt", "hello.txt"));
        assert!(!seg("*.txt", "hello.rs"));
        assert!(seg("h*o", "hello"));
    }

    #[test]
    fn test_question() {
        assert!(seg("h?llo", "hello"));
        assert!(!seg("h?llo", "hllo"));
    }

    #[test]
    fn test_exact() {
        assert!(seg("hello", "hello"));
        assert!(!seg("hello", "world"));
    }

    #[test]
    fn test_star_stays_in_segment() {
        assert!(path_match("*.png", "cat.png"));
        assert!(!path_match("*.png", "images/cat.png"));
        assert!(path_match("images/*.png", "images/cat.png"));
        assert!(!path_match("images/*.png", "images/deep/cat.png"));
    }

    #[test]
    fn test_doublestar_spans_segments() {
        assert!(path_match("**/*.png", "cat.png"));
        assert!(path_match("**/*.png", "images/cat.png"));
        assert!(path_match("**/*.png", "images/deep/cat.png"));
        assert!(path_match("data/**", "data/a/b/c"));
        assert!(!path_match("**/*.png", "images/cat.txt"));
    }

    #[test]
    fn test_doublestar_in_middle() {
        assert!(path_match("src/**/*.rs", "src/main.rs"));
        assert!(path_match("src/**/*.rs", "src/a/b/lib.rs"));
        assert!(!path_match("src/**/*.rs", "other/main.rs"));
    }

    #[test]
    fn test_has_magic() {
        assert!(has_magic("*.png"));
        assert!(has_magic("file-?.txt"));
        assert!(!has_magic("images/cat.png"));
    }

    #[test]
    fn test_glob_prefix() {
        assert_eq!(glob_prefix("images/*.png"), "images/");
        assert_eq!(glob_prefix("**/*.png"), "");
        assert_eq!(glob_prefix("a/b/*.txt"), "a/b/");
        assert_eq!(glob_prefix("a/b/file.txt"), "a/b/file.txt");
        assert_eq!(glob_prefix("*"), "");
    }
}
