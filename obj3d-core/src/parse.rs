//! Line classification and token parsers shared by both passes
//!
//! The analyzer and the decoder must agree on what every line is, so both
//! go through [`classify`]. Numeric tokens are parsed with nom and must be
//! consumed entirely; `1.5x` is a malformed token, not `1.5`.
use nom::{
    bytes::complete::take_till,
    character::complete::{char, u32 as index},
    combinator::{all_consuming, opt},
    number::complete::float,
    sequence::{preceded, tuple},
    IResult,
};
use std::borrow::Cow;
use std::io::BufRead;

use crate::error::{LineIssue, Result};

/// What a geometry line declares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Vertex,
    TexCoord,
    Normal,
    Face,
    MaterialLib,
    UseMaterial,
    Group,
    Smoothing,
    Object,
    Comment,
    Unknown,
}

impl LineKind {
    pub fn keyword(self) -> &'static str {
        match self {
            LineKind::Vertex => "v",
            LineKind::TexCoord => "vt",
            LineKind::Normal => "vn",
            LineKind::Face => "f",
            LineKind::MaterialLib => "mtllib",
            LineKind::UseMaterial => "usemtl",
            LineKind::Group => "g",
            LineKind::Smoothing => "s",
            LineKind::Object => "o",
            LineKind::Comment => "#",
            LineKind::Unknown => "?",
        }
    }
}

/// Split a trimmed, non-blank line into its kind and the text after the
/// keyword.
pub fn classify(line: &str) -> (LineKind, &str) {
    if line.starts_with('#') {
        return (LineKind::Comment, line);
    }

    let (keyword, rest) = match line.find(|c: char| c.is_whitespace()) {
        Some(at) => (&line[..at], line[at..].trim_start()),
        None => (line, ""),
    };

    let kind = match keyword {
        "v" => LineKind::Vertex,
        "vt" => LineKind::TexCoord,
        "vn" => LineKind::Normal,
        "f" => LineKind::Face,
        "mtllib" => LineKind::MaterialLib,
        "usemtl" => LineKind::UseMaterial,
        "g" => LineKind::Group,
        "s" => LineKind::Smoothing,
        "o" => LineKind::Object,
        _ => LineKind::Unknown,
    };

    (kind, rest)
}

/// A trimmed, non-blank line of a text stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SourceLine<'a> {
    /// 1-based, counting blank lines
    pub number: usize,
    pub text: &'a str,
    /// Invalid UTF-8 was replaced with U+FFFD
    pub lossy: bool,
}

/// Feed every trimmed, non-blank line to `handle`.
///
/// Bytes that aren't UTF-8 are decoded lossily rather than failing the read;
/// only an error from the underlying stream is returned. The read buffer is
/// reused across lines.
pub(crate) fn for_each_line<R, F>(mut reader: R, mut handle: F) -> Result<()>
where
    R: BufRead,
    F: FnMut(SourceLine<'_>) -> Result<()>,
{
    let mut buf = Vec::new();
    let mut number = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        number += 1;

        let decoded = String::from_utf8_lossy(&buf);
        let text = decoded.trim();
        if !text.is_empty() {
            handle(SourceLine {
                number,
                text,
                lossy: matches!(decoded, Cow::Owned(_)),
            })?;
        }
    }

    Ok(())
}

pub(crate) fn parse_float(token: &str) -> std::result::Result<f32, LineIssue> {
    let parsed: IResult<&str, f32> = all_consuming(float)(token);
    parsed
        .map(|(_, value)| value)
        .map_err(|_| LineIssue::InvalidNumber {
            token: token.to_string(),
        })
}

/// Read the first `arity` whitespace-separated floats of `rest`.
///
/// Unparsable or missing components are left at `0.0`; the first problem
/// found is returned alongside the values. Tokens past `arity` are ignored.
pub(crate) fn parse_components(rest: &str, arity: usize) -> ([f32; 3], Option<LineIssue>) {
    let mut values = [0.0f32; 3];
    let mut issue = None;
    let mut found = 0;

    for (slot, token) in values.iter_mut().take(arity).zip(rest.split_whitespace()) {
        found += 1;
        match parse_float(token) {
            Ok(value) => *slot = value,
            Err(err) => {
                issue.get_or_insert(err);
            }
        }
    }

    if found < arity && issue.is_none() {
        issue = Some(LineIssue::MissingComponents {
            expected: arity,
            found,
        });
    }

    (values, issue)
}

/// One corner of a face, with indices already shifted to 0-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaceRef {
    pub vertex: u32,
    pub tex: Option<u32>,
    pub normal: Option<u32>,
}

fn index_field(input: &str) -> IResult<&str, &str> {
    take_till(|c: char| c == '/')(input)
}

/// `vertex[/tex][/normal]`, where any field after the first may be empty
fn face_ref_fields(input: &str) -> IResult<&str, (&str, Option<&str>, Option<&str>)> {
    all_consuming(tuple((
        index_field,
        opt(preceded(char('/'), index_field)),
        opt(preceded(char('/'), index_field)),
    )))(input)
}

/// Map a 1-based source index to a 0-based buffer offset. Zero, negative
/// and overflowing indices have no mapping.
fn source_index(field: &str) -> Option<u32> {
    let parsed: IResult<&str, u32> = all_consuming(index)(field);
    match parsed {
        Ok((_, n)) if n > 0 => Some(n - 1),
        _ => None,
    }
}

/// Parse one face reference token.
///
/// A malformed field falls back to index 0; a malformed texture or normal
/// field still counts as present for that corner.
pub(crate) fn parse_face_ref(token: &str) -> (FaceRef, Option<LineIssue>) {
    let invalid = || LineIssue::InvalidFaceRef {
        token: token.to_string(),
    };

    let Ok((_, (vertex, tex, normal))) = face_ref_fields(token) else {
        return (FaceRef::default(), Some(invalid()));
    };

    let mut issue = None;
    let mut optional = |field: Option<&str>| match field {
        None | Some("") => None,
        Some(field) => Some(source_index(field).unwrap_or_else(|| {
            issue.get_or_insert_with(invalid);
            0
        })),
    };

    let tex = optional(tex);
    let normal = optional(normal);
    let vertex = source_index(vertex).unwrap_or_else(|| {
        issue.get_or_insert_with(invalid);
        0
    });

    (FaceRef { vertex, tex, normal }, issue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_classify_keywords() {
        assert_eq!(classify("v 1 2 3"), (LineKind::Vertex, "1 2 3"));
        assert_eq!(classify("vt\t0.5 0.5"), (LineKind::TexCoord, "0.5 0.5"));
        assert_eq!(classify("vn 0 1 0"), (LineKind::Normal, "0 1 0"));
        assert_eq!(classify("f  1  2   3"), (LineKind::Face, "1  2   3"));
        assert_eq!(
            classify("usemtl dark wood"),
            (LineKind::UseMaterial, "dark wood")
        );
        assert_eq!(classify("#v 1 2 3").0, LineKind::Comment);
        assert_eq!(classify("g").0, LineKind::Group);
        assert_eq!(classify("vp 0.1").0, LineKind::Unknown);
        assert_eq!(classify("V 1 2 3").0, LineKind::Unknown);
    }

    #[test]
    fn test_for_each_line_skips_blank_and_counts_all() {
        let input = "v 1 2 3\n\n   \n  f 1 2 3  \r\n";
        let mut seen = Vec::new();
        for_each_line(Cursor::new(input), |line| {
            seen.push((line.number, line.text.to_string(), line.lossy));
            Ok(())
        })
        .unwrap();

        assert_eq!(
            seen,
            vec![
                (1, "v 1 2 3".to_string(), false),
                (4, "f 1 2 3".to_string(), false)
            ]
        );
    }

    #[test]
    fn test_for_each_line_decodes_latin1_lossily() {
        let input: &[u8] = b"# Cr\xe9\xe9 par Blender\nusemtl caf\xe9\nv 0 0 0";
        let mut seen = Vec::new();
        for_each_line(Cursor::new(input), |line| {
            seen.push((line.number, line.text.to_string(), line.lossy));
            Ok(())
        })
        .unwrap();

        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].1, "# Cr\u{fffd}\u{fffd} par Blender");
        assert!(seen[0].2);
        assert_eq!(seen[1], (2, "usemtl caf\u{fffd}".to_string(), true));
        assert_eq!(seen[2], (3, "v 0 0 0".to_string(), false));
    }

    #[test]
    fn test_parse_float_rejects_trailing_garbage() {
        assert_eq!(parse_float("1.5"), Ok(1.5));
        assert_eq!(parse_float("-2e-1"), Ok(-0.2));
        assert!(parse_float("1.5x").is_err());
        assert!(parse_float("a").is_err());
    }

    #[test]
    fn test_parse_components_recovers() {
        let (values, issue) = parse_components("1 b 3", 3);
        assert_eq!(values, [1.0, 0.0, 3.0]);
        assert_eq!(
            issue,
            Some(LineIssue::InvalidNumber {
                token: "b".to_string()
            })
        );

        let (values, issue) = parse_components("4 5", 3);
        assert_eq!(values, [4.0, 5.0, 0.0]);
        assert_eq!(
            issue,
            Some(LineIssue::MissingComponents {
                expected: 3,
                found: 2
            })
        );

        let (values, issue) = parse_components("0.25 0.75 0.5", 2);
        assert_eq!(values, [0.25, 0.75, 0.0]);
        assert!(issue.is_none());
    }

    #[test]
    fn test_face_ref_forms() {
        assert_eq!(
            parse_face_ref("3"),
            (
                FaceRef {
                    vertex: 2,
                    tex: None,
                    normal: None
                },
                None
            )
        );
        assert_eq!(
            parse_face_ref("3/4"),
            (
                FaceRef {
                    vertex: 2,
                    tex: Some(3),
                    normal: None
                },
                None
            )
        );
        assert_eq!(
            parse_face_ref("3//5"),
            (
                FaceRef {
                    vertex: 2,
                    tex: None,
                    normal: Some(4)
                },
                None
            )
        );
        assert_eq!(
            parse_face_ref("1/2/3"),
            (
                FaceRef {
                    vertex: 0,
                    tex: Some(1),
                    normal: Some(2)
                },
                None
            )
        );
    }

    #[test]
    fn test_face_ref_malformed() {
        let (face_ref, issue) = parse_face_ref("x/2");
        assert_eq!(face_ref.vertex, 0);
        assert_eq!(face_ref.tex, Some(1));
        assert!(issue.is_some());

        let (face_ref, issue) = parse_face_ref("0");
        assert_eq!(face_ref.vertex, 0);
        assert!(issue.is_some());

        let (face_ref, issue) = parse_face_ref("-1");
        assert_eq!(face_ref.vertex, 0);
        assert!(issue.is_some());

        let (face_ref, issue) = parse_face_ref("2/q/3");
        assert_eq!(face_ref.vertex, 1);
        assert_eq!(face_ref.tex, Some(0));
        assert_eq!(face_ref.normal, Some(2));
        assert!(issue.is_some());

        let (_, issue) = parse_face_ref("1/2/3/4");
        assert!(issue.is_some());
    }
}
