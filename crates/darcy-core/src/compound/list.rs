//! List (table) parameters
//!
//! A list is a run of rows terminated by a peeked `END` line. The column
//! layout is derived once from the schema: unshaped and `(:)`-shaped
//! columns take one token, a dimension-shaped column takes as many tokens
//! as the dimension resolves to, and at most one *jagged* column takes as
//! many tokens as an earlier column's value on the same row. Storage is
//! column-wise: array-declared numeric columns become internal arrays with
//! a unit factor, everything else an ordered generic value list.

use std::io::Write;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use darcy_schema::{ElemType, KeyPath, ListSpec, ParamKind, ParamSpec, ScalarKind, ShapeExpr, Value};

use crate::array::{Array, Element};
use crate::error::{Error, Result};
use crate::param::{Param, ValueList};
use crate::resolve::LoadContext;
use crate::stream::{words, words_maxsplit, LineStream};

const PAD: &str = "  ";

/// Column names recognized but currently unsupported; they are skipped
/// entirely when the layout is derived.
const SKIPPED_COLUMNS: [&str; 2] = ["aux", "boundname"];

struct Column<'s> {
    spec: &'s ParamSpec,
    width: usize,
    free: bool,
}

struct Jagged {
    /// Index of the jagged column in the derived layout
    col: usize,
    /// Index of the earlier column carrying the per-row width
    src: usize,
}

struct Layout<'s> {
    cols: Vec<Column<'s>>,
    jagged: Option<Jagged>,
    trailing_free: bool,
}

/// A loaded list parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct List {
    name: String,
    columns: IndexMap<String, Param>,
    nrows: usize,
}

impl List {
    /// Load list rows until an `END` line is peeked.
    pub fn load(
        stream: &mut LineStream<'_>,
        name: &str,
        spec: &ListSpec,
        ctx: &LoadContext<'_>,
    ) -> Result<Self> {
        let mut layout = derive_layout(spec, ctx)?;
        let mut data: Vec<ColData> = layout.cols.iter().map(ColData::for_column).collect();

        let mut nrows = 0;
        loop {
            let Some((pos, line)) = stream.next_content() else {
                return Err(Error::Eof(format!("list {name}")));
            };
            let first = line.split_whitespace().next().unwrap_or("");
            if first.eq_ignore_ascii_case("end") {
                stream.rewind(pos);
                break;
            }
            read_row(line, &mut layout, &mut data)?;
            nrows += 1;
        }

        if let Some(bound_path) = &spec.bound {
            check_bound(name, nrows, bound_path, ctx)?;
        }

        let mut columns = IndexMap::new();
        for (col, cells) in layout.cols.iter().zip(data) {
            columns.insert(col.spec.name.clone(), cells.into_param(col, nrows)?);
        }
        debug!(name, nrows, "list loaded");
        Ok(Self {
            name: name.to_lowercase(),
            columns,
            nrows,
        })
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows read.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Look up a column by name.
    pub fn get(&self, name: &str) -> Option<&Param> {
        self.columns.get(name)
    }

    /// Column names and storage, in layout order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Write one tab-separated line per row; array-valued cells expand
    /// inline. Columns of unequal length fail.
    pub fn write(&self, w: &mut impl Write) -> Result<()> {
        let mut col_rows: Vec<Vec<String>> = Vec::with_capacity(self.columns.len());
        let mut nrows: Option<usize> = None;
        for (name, param) in &self.columns {
            let rows = column_row_tokens(param)?;
            match nrows {
                None => nrows = Some(rows.len()),
                Some(n) if n == rows.len() => {}
                Some(n) => {
                    return Err(Error::LengthMismatch(format!(
                        "column {name} has {} rows, expected {n}",
                        rows.len()
                    )))
                }
            }
            col_rows.push(rows);
        }
        for i in 0..nrows.unwrap_or(0) {
            let cells: Vec<&str> = col_rows.iter().map(|rows| rows[i].as_str()).collect();
            writeln!(w, "{PAD}{}", cells.join("\t"))?;
        }
        Ok(())
    }
}

fn derive_layout<'s>(spec: &'s ListSpec, ctx: &LoadContext<'_>) -> Result<Layout<'s>> {
    let mut cols: Vec<Column<'s>> = Vec::new();
    let mut jagged: Option<Jagged> = None;
    for param in &spec.columns {
        if SKIPPED_COLUMNS.contains(&param.name.as_str()) {
            debug!(column = %param.name, "skipping unsupported list column");
            continue;
        }
        let (width, free) = match &param.shape {
            ShapeExpr::Scalar => (1, false),
            ShapeExpr::Free => (1, true),
            ShapeExpr::Dims(_) => (ctx.resolve_shape(&param.shape)?.iter().product(), false),
            ShapeExpr::RowDependent(src) => {
                if jagged.is_some() {
                    return Err(Error::AmbiguousLayout(
                        "more than one jagged column".to_string(),
                    ));
                }
                let Some(src_idx) = cols.iter().position(|c| c.spec.name == *src) else {
                    return Err(Error::AmbiguousLayout(format!(
                        "jagged column {} references no earlier column {src}",
                        param.name
                    )));
                };
                jagged = Some(Jagged {
                    col: cols.len(),
                    src: src_idx,
                });
                (0, false)
            }
        };
        cols.push(Column { spec: param, width, free });
    }
    let trailing_free = cols.last().is_some_and(|c| c.free);
    if jagged.is_some() && trailing_free {
        return Err(Error::AmbiguousLayout(
            "a jagged column and a trailing (:) column are mutually exclusive".to_string(),
        ));
    }
    Ok(Layout {
        cols,
        jagged,
        trailing_free,
    })
}

fn read_row(line: &str, layout: &mut Layout<'_>, data: &mut [ColData]) -> Result<()> {
    if let Some(jagged) = &layout.jagged {
        let src_token: usize = layout.cols[..jagged.src].iter().map(|c| c.width).sum();
        let tokens = words(line);
        let token = tokens
            .get(src_token)
            .ok_or_else(|| Error::Eof("jagged column width".to_string()))?;
        let width = token
            .parse::<usize>()
            .map_err(|_| Error::bad_token(*token, "per-row column width".to_string()))?;
        layout.cols[jagged.col].width = width;
    }

    let total: usize = layout.cols.iter().map(|c| c.width).sum();
    let tokens = if layout.trailing_free {
        words_maxsplit(line, total)
    } else {
        words(line)
    };
    if tokens.len() != total {
        return Err(Error::ShapeMismatch {
            expected: total,
            got: tokens.len(),
        });
    }

    let mut cursor = 0;
    for (col, cells) in layout.cols.iter().zip(data.iter_mut()) {
        let group = &tokens[cursor..cursor + col.width];
        cursor += col.width;
        cells.push_cell(col, group)?;
    }
    Ok(())
}

fn check_bound(name: &str, nrows: usize, bound: &KeyPath, ctx: &LoadContext<'_>) -> Result<()> {
    match ctx.try_dim(bound) {
        Some(limit) if nrows > limit => Err(Error::BoundExceeded {
            count: nrows,
            bound: limit,
        }),
        Some(_) => Ok(()),
        None => {
            debug!(list = name, %bound, "row bound not resolvable, skipping check");
            Ok(())
        }
    }
}

/// Column-wise accumulation during the row loop.
enum ColData {
    Int(Vec<i64>),
    Double(Vec<f64>),
    Values(Vec<Value>),
}

impl ColData {
    fn for_column(col: &Column<'_>) -> Self {
        match &col.spec.kind {
            // jagged columns are never rectangular, keep them generic
            ParamKind::Array(ElemType::Int) if !col.spec.shape.is_row_dependent() => {
                ColData::Int(Vec::new())
            }
            ParamKind::Array(ElemType::Double) if !col.spec.shape.is_row_dependent() => {
                ColData::Double(Vec::new())
            }
            _ => ColData::Values(Vec::new()),
        }
    }

    fn push_cell(&mut self, col: &Column<'_>, tokens: &[&str]) -> Result<()> {
        match self {
            ColData::Int(out) => {
                for &token in tokens {
                    out.push(parse_elem::<i64>(col, token)?);
                }
            }
            ColData::Double(out) => {
                for &token in tokens {
                    out.push(parse_elem::<f64>(col, token)?);
                }
            }
            ColData::Values(out) => {
                if col.free {
                    out.push(Value::Text(tokens[0].to_string()));
                } else if tokens.len() == 1 {
                    out.push(parse_value(col.spec, tokens[0])?);
                } else {
                    let cell = tokens
                        .iter()
                        .map(|t| parse_value(col.spec, t))
                        .collect::<Result<Vec<_>>>()?;
                    out.push(Value::Seq(cell));
                }
            }
        }
        Ok(())
    }

    fn into_param(self, col: &Column<'_>, nrows: usize) -> Result<Param> {
        let shape = if col.width == 1 {
            vec![nrows]
        } else {
            vec![nrows, col.width]
        };
        match self {
            ColData::Int(data) => Ok(Param::IntArray(Array::from_dense(
                &col.spec.name,
                shape,
                data,
            )?)),
            ColData::Double(data) => Ok(Param::DoubleArray(Array::from_dense(
                &col.spec.name,
                shape,
                data,
            )?)),
            ColData::Values(values) => Ok(Param::Values(ValueList::new(&col.spec.name, values))),
        }
    }
}

fn parse_elem<T: Element>(col: &Column<'_>, token: &str) -> Result<T> {
    T::parse(token).ok_or_else(|| {
        Error::bad_token(
            token,
            format!("{} value for column {}", T::TYPE_NAME, col.spec.name),
        )
    })
}

fn parse_value(spec: &ParamSpec, token: &str) -> Result<Value> {
    match &spec.kind {
        ParamKind::Scalar(ScalarKind::Int) | ParamKind::Array(ElemType::Int) => token
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| Error::bad_token(token, format!("integer value for {}", spec.name))),
        ParamKind::Scalar(ScalarKind::Double) | ParamKind::Array(ElemType::Double) => token
            .parse::<f64>()
            .map(Value::Double)
            .map_err(|_| Error::bad_token(token, format!("double value for {}", spec.name))),
        ParamKind::Scalar(ScalarKind::Filename) => Ok(Value::Path(token.into())),
        _ => Ok(Value::Word(token.to_string())),
    }
}

fn column_row_tokens(param: &Param) -> Result<Vec<String>> {
    match param {
        Param::IntArray(a) => array_row_tokens(a),
        Param::DoubleArray(a) => array_row_tokens(a),
        Param::Values(v) => Ok(v
            .values()
            .iter()
            .map(|value| match value {
                Value::Seq(items) => items
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\t"),
                other => other.to_string(),
            })
            .collect()),
        other => Err(Error::LengthMismatch(format!(
            "column {} is not list storage",
            other.name()
        ))),
    }
}

fn array_row_tokens<T: Element>(array: &Array<T>) -> Result<Vec<String>> {
    let width = array.shape().get(1).copied().unwrap_or(1).max(1);
    let values = array.value()?;
    Ok(values
        .chunks(width)
        .map(|chunk| {
            chunk
                .iter()
                .map(Element::format)
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::Node;

    fn chd_spec() -> ListSpec {
        ListSpec {
            columns: vec![
                ParamSpec::int_array("cellid", ShapeExpr::named("dis/ncelldim")),
                ParamSpec::double("head"),
            ],
            bound: Some(KeyPath::from("dimensions/maxbound")),
        }
    }

    fn tree(ncelldim: i64, maxbound: i64) -> Node {
        let mut root = Node::branch();
        root.set(&KeyPath::from("dis/ncelldim"), Value::Int(ncelldim));
        root.set(&KeyPath::from("dimensions/maxbound"), Value::Int(maxbound));
        root
    }

    #[test]
    fn test_multi_token_leading_column() {
        let root = tree(3, 10);
        let ctx = LoadContext::new(".").with_tree(&root);
        let mut stream = LineStream::new("1 2 3 100.0\nEND PERIOD\n");
        let list = List::load(&mut stream, "stress_period_data", &chd_spec(), &ctx).unwrap();
        assert_eq!(list.nrows(), 1);
        let cellid = list.get("cellid").unwrap().as_int_array().unwrap();
        assert_eq!(cellid.shape(), &[1, 3]);
        assert_eq!(cellid.value().unwrap(), vec![1, 2, 3]);
        let head = list.get("head").unwrap().as_values().unwrap();
        assert_eq!(head.values()[0].as_double(), Some(100.0));
    }

    #[test]
    fn test_bound_violation() {
        let root = tree(3, 1);
        let ctx = LoadContext::new(".").with_tree(&root);
        let mut stream = LineStream::new("1 8 8 100.0\n1 9 9 105.0\nEND PERIOD\n");
        let err = List::load(&mut stream, "stress_period_data", &chd_spec(), &ctx).unwrap_err();
        assert!(matches!(err, Error::BoundExceeded { count: 2, bound: 1 }));
    }

    #[test]
    fn test_unresolvable_bound_is_skipped() {
        let ctx = LoadContext::new(".");
        let spec = ListSpec {
            columns: vec![ParamSpec::int("icell"), ParamSpec::double("head")],
            bound: Some(KeyPath::from("dimensions/maxbound")),
        };
        let mut stream = LineStream::new("1 100.0\n2 105.0\nEND PERIOD\n");
        let list = List::load(&mut stream, "stress_period_data", &spec, &ctx).unwrap();
        assert_eq!(list.nrows(), 2);
    }

    #[test]
    fn test_jagged_column() {
        let ctx = LoadContext::new(".");
        let spec = ListSpec {
            columns: vec![
                ParamSpec::int("icell"),
                ParamSpec::int("ncvert"),
                ParamSpec::int_array("icvert", ShapeExpr::RowDependent("ncvert".to_string())),
            ],
            bound: None,
        };
        let mut stream = LineStream::new("1 3 10 11 12\n2 2 20 21\nEND CELL2D\n");
        let list = List::load(&mut stream, "cell2d", &spec, &ctx).unwrap();
        assert_eq!(list.nrows(), 2);
        let icvert = list.get("icvert").unwrap().as_values().unwrap();
        assert_eq!(
            icvert.values()[0],
            Value::Seq(vec![Value::Int(10), Value::Int(11), Value::Int(12)])
        );
        assert_eq!(
            icvert.values()[1],
            Value::Seq(vec![Value::Int(20), Value::Int(21)])
        );
    }

    #[test]
    fn test_jagged_and_trailing_free_rejected() {
        let ctx = LoadContext::new(".");
        let spec = ListSpec {
            columns: vec![
                ParamSpec::int("ncvert"),
                ParamSpec::int_array("icvert", ShapeExpr::RowDependent("ncvert".to_string())),
                ParamSpec::int_array("tail", ShapeExpr::Free),
            ],
            bound: None,
        };
        let mut stream = LineStream::new("END CELL2D\n");
        let err = List::load(&mut stream, "cell2d", &spec, &ctx).unwrap_err();
        assert!(matches!(err, Error::AmbiguousLayout(_)));
    }

    #[test]
    fn test_aux_columns_skipped() {
        let root = tree(3, 10);
        let ctx = LoadContext::new(".").with_tree(&root);
        let spec = ListSpec {
            columns: vec![
                ParamSpec::int_array("cellid", ShapeExpr::named("dis/ncelldim")),
                ParamSpec::double("head"),
                ParamSpec::double("aux"),
                ParamSpec::word("boundname"),
            ],
            bound: None,
        };
        let mut stream = LineStream::new("1 2 3 100.0\nEND PERIOD\n");
        let list = List::load(&mut stream, "stress_period_data", &spec, &ctx).unwrap();
        assert!(list.get("aux").is_none());
        assert!(list.get("boundname").is_none());
        assert_eq!(list.nrows(), 1);
    }

    #[test]
    fn test_write_tab_separated() {
        let root = tree(3, 10);
        let ctx = LoadContext::new(".").with_tree(&root);
        let mut stream = LineStream::new("1 8 8 100.0\n1 9 9 105.0\nEND PERIOD\n");
        let list = List::load(&mut stream, "stress_period_data", &chd_spec(), &ctx).unwrap();
        let mut out = Vec::new();
        list.write(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "  1\t8\t8\t100.0\n  1\t9\t9\t105.0\n"
        );
    }
}
