use std::io::BufRead;

use log::{debug, trace};

use crate::objects::document::{
    Document, FaceCorner, Group, Object, Primitive, Vec2f, Vec3f, DEFAULT_NAME, MAX_FACE_POINTS,
};
use crate::objects::error::{ObjError, Result};
use crate::objects::lexer::{Lexer, Token};

/// Builder state that only lives for one parse call.
struct Parser {
    document: Document,
    smooth: bool,
    group_open: bool,
}

impl Document {
    /// Reads a Wavefront OBJ stream until it is exhausted.
    pub fn parse<R: BufRead>(reader: R) -> Result<Document> {
        let mut lexer = Lexer::new(reader);
        let mut parser = Parser {
            document: Document::new(),
            smooth: false,
            group_open: false,
        };

        loop {
            let token = lexer.next_token()?;
            let row = lexer.row();

            match token {
                Token::Vertice => {
                    let [x, y, z] = parse_floats::<3>(row, "v", &lexer.rest_of_line()?)?;
                    parser.document.positions.push(Vec3f::new(x, y, z));
                }

                Token::Normal => {
                    let [x, y, z] = parse_floats::<3>(row, "vn", &lexer.rest_of_line()?)?;
                    parser.document.normals.push(Vec3f::new(x, y, z));
                }

                Token::Texture => {
                    let [u, v] = parse_floats::<2>(row, "vt", &lexer.rest_of_line()?)?;
                    parser.document.texture_coordinates.push(Vec2f::new(u, v));
                }

                Token::Object => {
                    let name = parse_name(row, "o", &lexer.rest_of_line()?)?;
                    parser.document.objects.push(Object::new(&name));
                    parser.group_open = false;
                    parser.smooth = false;
                }

                Token::Group => {
                    let name = parse_name(row, "g", &lexer.rest_of_line()?)?;
                    parser.current_object().groups.push(Group::new(&name));
                    parser.group_open = true;
                }

                Token::Smoothing => {
                    parser.smooth = parse_smoothing(row, &lexer.rest_of_line()?)?;
                }

                Token::Face => {
                    let words = lexer.rest_of_line()?;
                    let primitive = parser.parse_face(row, &words)?;
                    parser.current_group().primitives.push(primitive);
                }

                Token::Identifier(directive) => {
                    trace!("line {}: ignoring directive {:?}", row, directive);
                    lexer.rest_of_line()?;
                }

                Token::Comment | Token::EOL => {
                    continue;
                }

                Token::Word(word) => {
                    return Err(ObjError::malformed(
                        row,
                        format!("unexpected argument {:?}", word),
                    ));
                }

                Token::EOF => {
                    break;
                }
            }
        }

        let document = parser.document;
        debug!(
            "parsed {} positions, {} normals, {} texture coordinates, {} objects, {} primitives",
            document.positions.len(),
            document.normals.len(),
            document.texture_coordinates.len(),
            document.objects.len(),
            document.primitive_count()
        );

        return Ok(document);
    }

    pub fn parse_str(source: &str) -> Result<Document> {
        return Document::parse(source.as_bytes());
    }
}

impl Parser {
    fn current_object(&mut self) -> &mut Object {
        if self.document.objects.is_empty() {
            self.document.objects.push(Object::new(DEFAULT_NAME));
            self.group_open = false;
        }

        let last = self.document.objects.len() - 1;
        return &mut self.document.objects[last];
    }

    fn current_group(&mut self) -> &mut Group {
        let open = self.group_open;
        let object = self.current_object();
        if !open || object.groups.is_empty() {
            object.groups.push(Group::new(DEFAULT_NAME));
        }
        self.group_open = true;

        let object = self.current_object();
        let last = object.groups.len() - 1;
        return &mut object.groups[last];
    }

    fn parse_face(&self, row: usize, words: &[String]) -> Result<Primitive> {
        if words.len() < 3 {
            return Err(ObjError::malformed(
                row,
                format!("face needs at least 3 corners, got {}", words.len()),
            ));
        }

        if words.len() > MAX_FACE_POINTS {
            return Err(ObjError::malformed(
                row,
                format!(
                    "face has {} corners, at most {} are supported",
                    words.len(),
                    MAX_FACE_POINTS
                ),
            ));
        }

        let corners = words
            .iter()
            .map(|word| self.parse_corner(row, word))
            .collect::<Result<Vec<FaceCorner>>>()?;

        return Primitive::new(&corners, self.smooth)
            .ok_or_else(|| ObjError::malformed(row, "too many face corners"));
    }

    /// Parses `v`, `v/t`, `v//n` or `v/t/n`.
    fn parse_corner(&self, row: usize, word: &str) -> Result<FaceCorner> {
        let parts: Vec<&str> = word.split('/').collect();
        if parts.len() > 3 {
            return Err(ObjError::malformed(
                row,
                format!("face corner {:?} has too many components", word),
            ));
        }

        let document = &self.document;

        let vertex = match parts[0] {
            "" => {
                return Err(ObjError::malformed(
                    row,
                    format!("face corner {:?} has no vertex index", word),
                ));
            }

            index => resolve_index(row, index, document.positions.len())?,
        };

        let texture_coordinate = match parts.get(1) {
            Some(index) if !index.is_empty() => Some(resolve_index(
                row,
                index,
                document.texture_coordinates.len(),
            )?),
            _ => None,
        };

        let normal = match parts.get(2) {
            Some(index) if !index.is_empty() => {
                Some(resolve_index(row, index, document.normals.len())?)
            }
            _ => None,
        };

        return Ok(FaceCorner::new(vertex, texture_coordinate, normal));
    }
}

/// Turns a textual reference into a 1-based index. Negative references
/// count back from the end of a list of `len` entries; one reaching past
/// the start becomes `0`, which assembly rejects.
fn resolve_index(row: usize, text: &str, len: usize) -> Result<usize> {
    let raw: i64 = text
        .parse()
        .map_err(|_| ObjError::malformed(row, format!("invalid index {:?}", text)))?;

    if raw >= 0 {
        return usize::try_from(raw)
            .map_err(|_| ObjError::malformed(row, format!("index {} is too large", raw)));
    }

    let back = usize::try_from(raw.unsigned_abs()).unwrap_or(usize::MAX);
    if back > len {
        return Ok(0);
    }

    return Ok(len - back + 1);
}

/// Reads the first `N` fields as floats. Extra fields must still be numeric
/// and are ignored.
fn parse_floats<const N: usize>(row: usize, directive: &str, words: &[String]) -> Result<[f32; N]> {
    if words.len() < N {
        return Err(ObjError::malformed(
            row,
            format!(
                "{} needs {} numeric fields, got {}",
                directive,
                N,
                words.len()
            ),
        ));
    }

    let mut values = [0.; N];
    for (i, word) in words.iter().enumerate() {
        let value = word.parse::<f32>().map_err(|e| {
            ObjError::malformed(row, format!("{} field {:?}: {}", directive, word, e))
        })?;

        if i < N {
            values[i] = value;
        }
    }

    return Ok(values);
}

fn parse_name(row: usize, directive: &str, words: &[String]) -> Result<String> {
    if words.is_empty() {
        return Err(ObjError::malformed(
            row,
            format!("{} needs a name", directive),
        ));
    }

    return Ok(words.join(" "));
}

fn parse_smoothing(row: usize, words: &[String]) -> Result<bool> {
    let [flag] = words else {
        return Err(ObjError::malformed(row, "s needs exactly one flag"));
    };

    match flag.as_str() {
        "on" => Ok(true),
        "off" => Ok(false),
        number => number
            .parse::<i64>()
            .map(|group| group != 0)
            .map_err(|_| ObjError::malformed(row, format!("invalid smoothing flag {:?}", number))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn malformed_row(result: Result<Document>) -> usize {
        match result {
            Err(ObjError::MalformedRecord { row, .. }) => row,
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn parses_attributes() {
        let document = Document::parse_str(
            "v 1 2 3\nv -1.5 0 2e1 1.0\nvn 0 0 1\nvt 0.25 0.75\nvt 1 0 0\n",
        )
        .unwrap();

        assert_eq!(
            document.positions,
            vec![Vec3f::new(1., 2., 3.), Vec3f::new(-1.5, 0., 20.)]
        );
        assert_eq!(document.normals, vec![Vec3f::new(0., 0., 1.)]);
        assert_eq!(
            document.texture_coordinates,
            vec![Vec2f::new(0.25, 0.75), Vec2f::new(1., 0.)]
        );
        assert!(document.objects.is_empty());
    }

    #[test]
    fn short_or_bad_vertex_is_malformed() {
        assert_eq!(malformed_row(Document::parse_str("v 1 2\n")), 1);
        assert_eq!(malformed_row(Document::parse_str("v 0 0 0\nvn 1 x 0\n")), 2);
        assert_eq!(malformed_row(Document::parse_str("vt 1\n")), 1);
        assert_eq!(malformed_row(Document::parse_str("v 1 2 3 w\n")), 1);
    }

    #[test]
    fn corner_forms() {
        let document = Document::parse_str(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\nf 1 2/1 3//1\nf 1/1/1 2/1/1 3/1/1\n",
        )
        .unwrap();

        let group = &document.objects[0].groups[0];
        assert_eq!(
            group.primitives[0].corners(),
            &[
                FaceCorner::new(1, None, None),
                FaceCorner::new(2, Some(1), None),
                FaceCorner::new(3, None, Some(1)),
            ]
        );
        assert_eq!(
            group.primitives[1].corners(),
            &[
                FaceCorner::new(1, Some(1), Some(1)),
                FaceCorner::new(2, Some(1), Some(1)),
                FaceCorner::new(3, Some(1), Some(1)),
            ]
        );
    }

    #[test]
    fn negative_indices_are_relative() {
        let document = Document::parse_str(
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nvn 0 0 1\nf -3 -2 -1//-1\nv 0 1 0\nf -1 -4 -2\n",
        )
        .unwrap();

        let primitives = &document.objects[0].groups[0].primitives;
        assert_eq!(
            primitives[0].corners(),
            &[
                FaceCorner::new(1, None, None),
                FaceCorner::new(2, None, None),
                FaceCorner::new(3, None, Some(1)),
            ]
        );
        assert_eq!(
            primitives[1].corners(),
            &[
                FaceCorner::new(4, None, None),
                FaceCorner::new(1, None, None),
                FaceCorner::new(3, None, None),
            ]
        );
    }

    #[test]
    fn negative_index_before_start_becomes_zero() {
        let document = Document::parse_str("v 0 0 0\nf -2 1 1\n").unwrap();
        assert_eq!(document.objects[0].groups[0].primitives[0].corners()[0].vertex, 0);
    }

    #[test]
    fn face_arity_is_checked() {
        assert_eq!(malformed_row(Document::parse_str("v 0 0 0\nf 1 1\n")), 2);
        assert_eq!(
            malformed_row(Document::parse_str("f 1 2 3 4 5 6 7 8 9\n")),
            1
        );
        assert!(Document::parse_str("f 1 2 3 4 5 6 7 8\n").is_ok());
    }

    #[test]
    fn bad_corners_are_malformed() {
        assert_eq!(malformed_row(Document::parse_str("f /1 2 3\n")), 1);
        assert_eq!(malformed_row(Document::parse_str("f a 2 3\n")), 1);
        assert_eq!(malformed_row(Document::parse_str("f 1/2/3/4 2 3\n")), 1);
        assert_eq!(malformed_row(Document::parse_str("f 1/x 2 3\n")), 1);
    }

    #[test]
    fn implicit_object_and_group() {
        let document = Document::parse_str("f 1 2 3\n").unwrap();

        assert_eq!(document.objects.len(), 1);
        assert_eq!(document.objects[0].name, DEFAULT_NAME);
        assert_eq!(document.objects[0].groups[0].name, DEFAULT_NAME);
        assert_eq!(document.primitive_count(), 1);
    }

    #[test]
    fn object_and_group_hierarchy() {
        let document = Document::parse_str(
            "o first one\ng a\nf 1 2 3\ng b\nf 1 2 3\nf 1 2 3\no second\nf 1 2 3\ng a\n",
        )
        .unwrap();

        assert_eq!(document.objects.len(), 2);
        let first = &document.objects[0];
        assert_eq!(first.name, "first one");
        assert_eq!(first.groups.len(), 2);
        assert_eq!(first.find_group("b").unwrap().primitives.len(), 2);

        let second = &document.objects[1];
        assert_eq!(second.groups[0].name, DEFAULT_NAME);
        assert_eq!(second.groups[1].name, "a");
        assert!(second.groups[1].is_empty());
    }

    #[test]
    fn group_before_object_creates_default_object() {
        let document = Document::parse_str("g lonely\nf 1 2 3\n").unwrap();

        assert_eq!(document.objects[0].name, DEFAULT_NAME);
        assert_eq!(document.objects[0].groups.len(), 1);
        assert_eq!(document.objects[0].groups[0].name, "lonely");
    }

    #[test]
    fn smoothing_flag_applies_forward() {
        let document = Document::parse_str(
            "f 1 2 3\ns 1\nf 1 2 3\ng other\nf 1 2 3\ns off\nf 1 2 3\ns on\no next\nf 1 2 3\n",
        )
        .unwrap();

        let smooth: Vec<bool> = document
            .objects
            .iter()
            .flat_map(|object| &object.groups)
            .flat_map(|group| &group.primitives)
            .map(Primitive::is_smooth)
            .collect();
        assert_eq!(smooth, vec![false, true, true, false, false]);
    }

    #[test]
    fn bad_smoothing_and_names() {
        assert_eq!(malformed_row(Document::parse_str("s maybe\n")), 1);
        assert_eq!(malformed_row(Document::parse_str("s\n")), 1);
        assert_eq!(malformed_row(Document::parse_str("o\n")), 1);
        assert_eq!(malformed_row(Document::parse_str("\ng\n")), 2);
    }

    #[test]
    fn unknown_directives_and_comments_are_ignored() {
        let document = Document::parse_str(
            "# exported\nmtllib scene.mtl\nusemtl red\nv 0 0 0 # origin\nl 1 2\n",
        )
        .unwrap();

        assert_eq!(document.positions.len(), 1);
        assert!(document.objects.is_empty());
    }

    #[test]
    fn latin1_comment_does_not_abort() {
        let document =
            Document::parse(&b"# exported by \xE9\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n"[..])
                .unwrap();

        assert_eq!(document.positions.len(), 3);
        assert_eq!(document.primitive_count(), 1);
    }

    #[test]
    fn names_may_contain_hash() {
        let document = Document::parse_str("o a#b\ng part#2 # trailing\nf 1 2 3\n").unwrap();

        assert_eq!(document.objects[0].name, "a#b");
        assert_eq!(document.objects[0].groups[0].name, "part#2");
    }

    #[test]
    fn parsing_is_deterministic() {
        let source = "o a\nv 0 0 0\nv 1 0 0\nv 0 1 0\ns 1\nf 1 2 3\ng b\nf -1 -2 -3\n";
        assert_eq!(
            Document::parse_str(source).unwrap(),
            Document::parse_str(source).unwrap()
        );
    }
}
