//! Query minification and expansion
//!
//! Wire format: a header line holding the extra names (names used by the
//! query but missing from the caller's baseline) joined by single spaces,
//! then the coded body. The coded body is the query with every name
//! replaced by its code, comments dropped, and whitespace kept only where
//! two tokens would otherwise run together. Consecutive codes are written
//! back to back; the expander splits them by the fixed code width.

use crate::alphabet::Alphabet;
use crate::dictionary::Dictionary;
use crate::error::*;
use crate::lexer::{needs_gap, tokenize, Token, TokenKind};
use crate::names::used_names;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use regex::Regex;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Marks the optional baseline fingerprint field in the header
pub const FINGERPRINT_MARKER: char = '#';

/// Options shared by minify and expand
///
/// Both sides of a transfer must use the same alphabet.
#[derive(Debug, Clone, Default)]
pub struct CodecOpts {
    /// Symbols codes are drawn from
    pub alphabet: Alphabet,
    /// Prefix the header with a fingerprint of the baseline
    pub fingerprint: bool,
}

impl CodecOpts {
    /// Options that stamp the baseline fingerprint into the header
    pub fn fingerprinted() -> Self {
        Self {
            fingerprint: true,
            ..Self::default()
        }
    }

    /// Options with a custom alphabet
    pub fn with_alphabet(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            ..Self::default()
        }
    }
}

/// Minify a query with default options
pub fn minify<S: AsRef<str>>(input: &str, baseline: &[S]) -> Result<String> {
    minify_with_opts(input, baseline, &CodecOpts::default())
}

/// Expand a minified query with default options
pub fn expand<S: AsRef<str>>(input: &str, baseline: &[S]) -> Result<String> {
    expand_with_opts(input, baseline, &CodecOpts::default())
}

/// Minify with custom options
pub fn minify_with_opts<S: AsRef<str>>(
    input: &str,
    baseline: &[S],
    opts: &CodecOpts,
) -> Result<String> {
    let known: HashSet<&str> = baseline.iter().map(|s| s.as_ref()).collect();
    let extra: Vec<String> = used_names(input)?
        .into_vec()
        .into_iter()
        .filter(|name| !known.contains(name.as_str()))
        .collect();

    let effective = effective_names(baseline, &extra);
    let dictionary = Dictionary::with_alphabet(&effective, &opts.alphabet);

    let mut buf = String::with_capacity(input.len() / 2);
    if opts.fingerprint {
        buf.push(FINGERPRINT_MARKER);
        buf.push_str(&fingerprint(baseline, &opts.alphabet));
        if !extra.is_empty() {
            buf.push(' ');
        }
    }
    buf.push_str(&extra.join(" "));
    buf.push('\n');

    let mut prev: Option<Token<'_>> = None;
    for token in tokenize(input) {
        let token = token?;
        if token.kind == TokenKind::Comment {
            continue;
        }
        if prev.is_some_and(|p| needs_gap(&p, &token)) {
            buf.push(' ');
        }
        match token.kind {
            // Every used name is in the baseline or the extras
            TokenKind::Name => match dictionary.code(token.text) {
                Some(code) => buf.push_str(code),
                None => return Err(CodecError::UnmappedName(token.text.to_string())),
            },
            _ => buf.push_str(token.text),
        }
        prev = Some(token);
    }

    tracing::debug!(
        extra = extra.len(),
        names = dictionary.len(),
        width = dictionary.width(),
        input_len = input.len(),
        output_len = buf.len(),
        "minified query"
    );
    Ok(buf)
}

/// Expand with custom options
pub fn expand_with_opts<S: AsRef<str>>(
    input: &str,
    baseline: &[S],
    opts: &CodecOpts,
) -> Result<String> {
    let (header, body) = input.split_once('\n').ok_or(CodecError::MissingHeader)?;
    let header = Header::parse(header)?;

    if let Some(found) = header.fingerprint {
        let expected = fingerprint(baseline, &opts.alphabet);
        if found != expected {
            return Err(CodecError::BaselineMismatch {
                expected,
                found: found.to_string(),
            });
        }
    }

    let effective = effective_names(baseline, &header.names);
    let dictionary = Dictionary::with_alphabet(&effective, &opts.alphabet);
    let width = dictionary.width();

    let mut buf = String::with_capacity(body.len() * 4);
    let mut prev: Option<Token<'_>> = None;
    for token in tokenize(body) {
        let token = token?;
        if token.kind == TokenKind::Comment {
            continue;
        }
        if let Some(p) = prev {
            let both_names = p.kind == TokenKind::Name && token.kind == TokenKind::Name;
            if both_names || needs_gap(&p, &token) {
                buf.push(' ');
            }
        }
        match token.kind {
            TokenKind::Name => write_names(&mut buf, token.text, width, &dictionary)?,
            _ => buf.push_str(token.text),
        }
        prev = Some(token);
    }

    tracing::debug!(
        extra = header.names.len(),
        names = dictionary.len(),
        width,
        output_len = buf.len(),
        "expanded query"
    );
    Ok(buf)
}

/// Fingerprint of a baseline under an alphabet
///
/// First 6 bytes of SHA-256 over the alphabet and the names, in order,
/// as 8 URL-safe base64 characters.
pub fn fingerprint<S: AsRef<str>>(baseline: &[S], alphabet: &Alphabet) -> String {
    let mut hasher = Sha256::new();
    let symbols: String = alphabet.symbols().iter().collect();
    hasher.update(symbols.as_bytes());
    for name in baseline {
        hasher.update(b"\n");
        hasher.update(name.as_ref().as_bytes());
    }
    let digest = hasher.finalize();
    URL_SAFE_NO_PAD.encode(&digest[..6])
}

/// Baseline followed by extra names, never re-sorted
fn effective_names<'a, S: AsRef<str>>(baseline: &'a [S], extra: &'a [String]) -> Vec<&'a str> {
    baseline
        .iter()
        .map(|s| s.as_ref())
        .chain(extra.iter().map(String::as_str))
        .collect()
}

/// Decode one lexed name, which may be several codes run together
fn write_names(buf: &mut String, text: &str, width: usize, dictionary: &Dictionary) -> Result<()> {
    if !text.is_ascii() || text.len() % width != 0 {
        return Err(CodecError::MalformedCode(text.to_string()));
    }
    for (i, start) in (0..text.len()).step_by(width).enumerate() {
        let code = &text[start..start + width];
        let name = dictionary
            .name(code)
            .ok_or_else(|| CodecError::UnknownCode(code.to_string()))?;
        if i > 0 {
            buf.push(' ');
        }
        buf.push_str(name);
    }
    Ok(())
}

/// Parsed header line
#[derive(Debug, Clone, PartialEq, Eq)]
struct Header<'a> {
    fingerprint: Option<&'a str>,
    names: Vec<String>,
}

impl<'a> Header<'a> {
    fn parse(line: &'a str) -> Result<Self> {
        let mut fields = line.split(' ').peekable();
        let fingerprint = match fields.peek() {
            Some(first) if first.starts_with(FINGERPRINT_MARKER) => {
                fields.next().map(|f| &f[FINGERPRINT_MARKER.len_utf8()..])
            }
            _ => None,
        };

        let mut names = Vec::new();
        // An empty header carries no names rather than one empty name
        if !line.is_empty() {
            for field in fields {
                if !is_graphql_name(field) {
                    return Err(CodecError::InvalidName(field.to_string()));
                }
                names.push(field.to_string());
            }
        }

        Ok(Self { fingerprint, names })
    }
}

fn is_graphql_name(s: &str) -> bool {
    static NAME_PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = NAME_PATTERN
        .get_or_init(|| Regex::new(r"^[_A-Za-z][_0-9A-Za-z]*$").expect("regex pattern compiles"));
    re.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NONE: [&str; 0] = [];

    #[test]
    fn test_minify_with_full_baseline() {
        let out = minify("query { on }", &["on", "query"]).unwrap();
        assert_eq!(out, "\nb{a}");
    }

    #[test]
    fn test_expand_with_full_baseline() {
        let out = expand("\nb{a}", &["on", "query"]).unwrap();
        assert_eq!(out, "query{on}");
    }

    #[test]
    fn test_minify_without_baseline() {
        let out = minify("{ user { id name } }", &NONE).unwrap();
        assert_eq!(out, "id name user\n{c{ab}}");
        assert_eq!(expand(&out, &NONE).unwrap(), "{user{id name}}");
    }

    #[test]
    fn test_extra_names_follow_baseline() {
        let out = minify("{ user { id email } }", &["user", "id"]).unwrap();
        // user=a id=b, extras sorted after the baseline: email=c
        assert_eq!(out, "email\n{a{bc}}");
        assert_eq!(expand(&out, &["user", "id"]).unwrap(), "{user{id email}}");
    }

    #[test]
    fn test_comments_dropped() {
        let out = minify("# leading\n{ a # trailing\n}", &NONE).unwrap();
        assert_eq!(out, "a\n{a}");
    }

    #[test]
    fn test_numbers_keep_separators() {
        let out = minify("{ f(v: [A 1 B 2.5]) }", &NONE).unwrap();
        assert_eq!(out, "A B f v\n{c(d:[a 1 b 2.5])}");
        assert_eq!(expand(&out, &NONE).unwrap(), "{f(v:[A 1 B 2.5])}");
    }

    #[test]
    fn test_adjacent_strings_keep_separators() {
        let out = minify(r#"{ f(v: ["" "x"]) }"#, &NONE).unwrap();
        assert_eq!(out, "f v\n{a(b:[\"\" \"x\"])}");
    }

    #[test]
    fn test_strings_pass_through_verbatim() {
        let query = r#"{ f(a: "say \"hi\"\n", b: """ block "quoted" """) }"#;
        let out = minify(query, &NONE).unwrap();
        assert!(out.contains(r#""say \"hi\"\n""#));
        assert!(out.contains(r#"""" block "quoted" """"#));
        let restored = expand(&out, &NONE).unwrap();
        assert_eq!(restored, r#"{f(a:"say \"hi\"\n"b:""" block "quoted" """)}"#);
    }

    #[test]
    fn test_header_parse() {
        assert_eq!(
            Header::parse("").unwrap(),
            Header { fingerprint: None, names: vec![] }
        );
        assert_eq!(
            Header::parse("a b").unwrap(),
            Header { fingerprint: None, names: vec!["a".to_string(), "b".to_string()] }
        );
        assert_eq!(
            Header::parse("#abc").unwrap(),
            Header { fingerprint: Some("abc"), names: vec![] }
        );
        assert_eq!(
            Header::parse("#abc x").unwrap(),
            Header { fingerprint: Some("abc"), names: vec!["x".to_string()] }
        );
        assert!(matches!(Header::parse("a  b"), Err(CodecError::InvalidName(n)) if n.is_empty()));
        assert!(matches!(Header::parse("9a"), Err(CodecError::InvalidName(_))));
    }

    #[test]
    fn test_expand_errors() {
        assert!(matches!(expand("{a}", &NONE), Err(CodecError::MissingHeader)));
        assert!(matches!(expand("\n{z}", &["a"]), Err(CodecError::UnknownCode(c)) if c == "z"));
        assert!(matches!(expand("\n{a}", &NONE), Err(CodecError::UnknownCode(_))));
        assert!(matches!(expand("bad-name\n{a}", &NONE), Err(CodecError::InvalidName(_))));

        let wide: Vec<String> = (0..60).map(|i| format!("n{i}")).collect();
        assert!(matches!(expand("\n{aaa}", &wide), Err(CodecError::MalformedCode(c)) if c == "aaa"));
    }

    #[test]
    fn test_lex_error_propagates() {
        assert!(matches!(minify("{ a(x: \"open) }", &NONE), Err(CodecError::Lex { .. })));
    }

    #[test]
    fn test_fingerprint_roundtrip() {
        let baseline = ["query", "user", "id"];
        let opts = CodecOpts::fingerprinted();
        let out = minify_with_opts("query { user { id name } }", &baseline, &opts).unwrap();

        let (header, _) = out.split_once('\n').unwrap();
        let fp = fingerprint(&baseline, &opts.alphabet);
        assert_eq!(fp.len(), 8);
        assert_eq!(header, format!("#{fp} name"));

        let restored = expand_with_opts(&out, &baseline, &opts).unwrap();
        assert_eq!(restored, "query{user{id name}}");
        // Plain expand honours the fingerprint too
        assert_eq!(expand(&out, &baseline).unwrap(), restored);
    }

    #[test]
    fn test_fingerprint_mismatch() {
        let opts = CodecOpts::fingerprinted();
        let out = minify_with_opts("{ user { id } }", &["user", "id"], &opts).unwrap();
        let err = expand(&out, &["id", "user"]).unwrap_err();
        assert!(matches!(err, CodecError::BaselineMismatch { .. }));
    }

    #[test]
    fn test_fingerprint_depends_on_alphabet() {
        let baseline = ["a", "b"];
        let custom = Alphabet::new("xyz").unwrap();
        assert_ne!(
            fingerprint(&baseline, &Alphabet::default()),
            fingerprint(&baseline, &custom)
        );
    }

    #[test]
    fn test_custom_alphabet_roundtrip() {
        let opts = CodecOpts::with_alphabet(Alphabet::new("xy").unwrap());
        let out = minify_with_opts("{ a { b c } }", &NONE, &opts).unwrap();
        assert_eq!(out, "a b c\n{xx{xyyx}}");
        assert_eq!(expand_with_opts(&out, &NONE, &opts).unwrap(), "{a{b c}}");
    }

    #[test]
    fn test_is_graphql_name() {
        assert!(is_graphql_name("_private"));
        assert!(is_graphql_name("User2"));
        assert!(!is_graphql_name(""));
        assert!(!is_graphql_name("2fast"));
        assert!(!is_graphql_name("a-b"));
    }
}
