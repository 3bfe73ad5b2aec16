/// Checks if a key matches a Redis-style glob pattern
///
/// Supported syntax:
/// - `*` matches any run of characters, including none
/// - `?` matches exactly one character
/// - `[abc]`, `[a-z]` match one character from a class; `[^...]` negates it
/// - `\x` matches `x` literally
///
/// An unterminated `[` is treated as a literal character.
///
/// # Examples
///
/// ```
/// use sumi_kv::kv::matches_glob;
///
/// assert!(matches_glob("crawler:cookie:*", "crawler:cookie:example.com"));
/// assert!(!matches_glob("crawler:cookie:*", "crawler:request:42"));
/// assert!(matches_glob("h?llo", "hello"));
/// assert!(matches_glob("h[ae]llo", "hallo"));
/// ```
pub fn matches_glob(pattern: &str, candidate: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let candidate: Vec<char> = candidate.chars().collect();
    match_from(&pattern, &candidate)
}

fn match_from(pattern: &[char], candidate: &[char]) -> bool {
    match pattern.first() {
        None => candidate.is_empty(),
        Some('*') => {
            // Consecutive stars behave like one
            let rest = pattern.iter().position(|&c| c != '*').map_or(&[][..], |i| &pattern[i..]);
            if rest.is_empty() {
                return true;
            }
            (0..=candidate.len()).any(|i| match_from(rest, &candidate[i..]))
        }
        Some('?') => !candidate.is_empty() && match_from(&pattern[1..], &candidate[1..]),
        Some('[') => {
            let Some(&c) = candidate.first() else {
                return false;
            };
            match match_class(&pattern[1..], c) {
                Some((matched, consumed)) => {
                    matched && match_from(&pattern[1 + consumed..], &candidate[1..])
                }
                None => c == '[' && match_from(&pattern[1..], &candidate[1..]),
            }
        }
        Some('\\') if pattern.len() > 1 => {
            candidate.first() == Some(&pattern[1]) && match_from(&pattern[2..], &candidate[1..])
        }
        Some(&literal) => {
            candidate.first() == Some(&literal) && match_from(&pattern[1..], &candidate[1..])
        }
    }
}

/// Matches `c` against a character class that starts right after `[`
///
/// Returns whether it matched and how many pattern characters the class
/// used (including the closing `]`), or `None` if the class never closes.
fn match_class(class: &[char], c: char) -> Option<(bool, usize)> {
    let negate = class.first() == Some(&'^');
    let mut i = usize::from(negate);
    let mut matched = false;

    while i < class.len() {
        match class[i] {
            ']' => return Some((matched != negate, i + 1)),
            '\\' if i + 1 < class.len() => {
                matched |= class[i + 1] == c;
                i += 2;
            }
            start if i + 2 < class.len() && class[i + 1] == '-' && class[i + 2] != ']' => {
                let end = class[i + 2];
                let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
                matched |= lo <= c && c <= hi;
                i += 3;
            }
            other => {
                matched |= other == c;
                i += 1;
            }
        }
    }

    None
}
