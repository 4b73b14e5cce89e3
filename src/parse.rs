use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::tree::Child;
use crate::tree::NUM_QUADRANTS;
use crate::tree::Node;
use crate::tree::Quadrant;

/// Path from the root to a node, used to locate shape errors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodePath(Vec<Quadrant>);

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("root")?;

        for quadrant in &self.0 {
            write!(f, ".{quadrant}")?;
        }

        Ok(())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ShapeError {
    #[error("Expected 4 children at {path}, found {len}")]
    BadArity { path: NodePath, len: usize },

    #[error("Expected a boolean or numeric leaf at {path}, found {found}")]
    BadLeaf {
        path: NodePath,
        found: &'static str,
    },
}

/// Convert a decoded JSON value into a tree.
///
/// A 4-element array becomes a node whose children are converted in
/// traversal order. Booleans become leaves as-is, and numbers follow the
/// integer leaf encoding: `0` is unset, any other number is set. Every
/// other shape is malformed.
pub fn from_value(value: &Value) -> Result<Child, ShapeError> {
    let mut path = Vec::new();

    convert(value, &mut path)
}

fn convert(value: &Value, path: &mut Vec<Quadrant>) -> Result<Child, ShapeError> {
    match value {
        Value::Array(children) => {
            if children.len() != NUM_QUADRANTS {
                return Err(ShapeError::BadArity {
                    path: NodePath(path.clone()),
                    len: children.len(),
                });
            }

            let tl = convert_at(children, Quadrant::Tl, path)?;
            let tr = convert_at(children, Quadrant::Tr, path)?;
            let br = convert_at(children, Quadrant::Br, path)?;
            let bl = convert_at(children, Quadrant::Bl, path)?;

            Ok(Child::Node(Box::new(Node::new(tl, tr, br, bl))))
        }

        Value::Bool(value) => Ok(Child::Leaf(*value)),

        Value::Number(number) => Ok(Child::Leaf(number.as_f64().is_some_and(|n| n != 0.0))),

        value => Err(ShapeError::BadLeaf {
            path: NodePath(path.clone()),
            found: json_kind(value),
        }),
    }
}

fn convert_at(
    children: &[Value],
    quadrant: Quadrant,
    path: &mut Vec<Quadrant>,
) -> Result<Child, ShapeError> {
    path.push(quadrant);
    let child = convert(&children[quadrant.index()], path)?;
    path.pop();

    Ok(child)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse a JSON-encoded nested-list tree document.
pub fn read_tree(input: &str) -> anyhow::Result<Child> {
    let value: Value =
        serde_json::from_str(input).context("Tree document is not valid JSON")?;

    Ok(from_value(&value)?)
}

/// Load a tree from a JSON document on disk.
pub fn read_tree_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Child> {
    let path = path.as_ref();
    let input = fs::read_to_string(path)
        .with_context(|| format!("Failed to read tree file {}", path.display()))?;

    debug!(path = %path.display(), bytes = input.len(), "loaded tree file");

    read_tree(&input)
}

#[cfg(test)]
mod test {
    use super::ShapeError;
    use super::read_tree;
    use super::read_tree_file;
    use crate::tree::Child;

    fn parse(input: &str) -> Child {
        read_tree(input).unwrap()
    }

    #[test]
    fn flat_document() {
        let tree = parse("[0, 1, 1, 0]");

        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.paint(), "0110");
    }

    #[test]
    fn nested_document() {
        let Child::Node(node) = parse("[[1, 0, 0, 1], 0, 1, 0]") else {
            panic!("expected a node root");
        };

        assert_eq!(node.depth(), 2);
        assert!(matches!(node.tl, Child::Node(_)));
        assert_eq!(node.tr, Child::Leaf(false));
        assert_eq!(node.br, Child::Leaf(true));
        assert_eq!(node.bl, Child::Leaf(false));
    }

    #[test]
    fn scalar_root_is_a_leaf() {
        assert_eq!(parse("true"), Child::Leaf(true));
        assert_eq!(parse("0"), Child::Leaf(false));
        assert_eq!(parse("0").depth(), 0);
    }

    #[test]
    fn numbers_keep_integer_truthiness() {
        assert_eq!(parse("[0, 1, 7, 0]"), parse("[false, true, true, false]"));
    }

    #[test]
    fn bad_arity_is_rejected() {
        let err = read_tree("[0, 1, 1]").unwrap_err();
        let err = err.downcast_ref::<ShapeError>().expect("a shape error");

        insta::assert_snapshot!(err, @"Expected 4 children at root, found 3");
    }

    #[test]
    fn bad_arity_reports_the_offending_path() {
        let err = read_tree("[[0, 1], 0, 1, 0]").unwrap_err();
        let err = err.downcast_ref::<ShapeError>().expect("a shape error");

        insta::assert_snapshot!(err, @"Expected 4 children at root.tl, found 2");
    }

    #[test]
    fn non_coercible_scalars_are_rejected() {
        let err = read_tree(r#"[[0, 1, "1", 0], 0, 1, 0]"#).unwrap_err();
        let err = err.downcast_ref::<ShapeError>().expect("a shape error");

        insta::assert_snapshot!(
            err,
            @"Expected a boolean or numeric leaf at root.tl.br, found a string"
        );

        assert!(read_tree("null").is_err());
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = read_tree("[0, 1, 1, 0").unwrap_err();

        assert!(err.downcast_ref::<serde_json::Error>().is_some());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_tree_file("no/such/tree.json").unwrap_err();

        assert!(err.downcast_ref::<std::io::Error>().is_some());
    }
}
