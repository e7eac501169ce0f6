//! Array parameters and their storage-mode engine.
//!
//! An array parameter's value is held in one of three representations:
//!
//! - **Constant** — one value and a target shape; expanded only on
//!   resolution.
//! - **Internal** — a materialized dense buffer.
//! - **External** — a reference to a companion file holding the dense
//!   values, resolved relative to the directory of the owning stream.
//!
//! Every representation carries its own multiplicative *factor*, applied
//! only when the value is resolved; the stored representation is never
//! altered by a factor change. A *layered* array replaces the single
//! representation with one per leading-axis index, each independently
//! constant, internal, or external — reading or editing one layer never
//! forces another layer to materialize.
//!
//! Assignment (element, slice, or bulk) demotes exactly the affected layer
//! to internal, storing the prior resolved value with the edit applied.
//! Elementwise transforms and reductions always operate on the fully
//! resolved dense value.

use std::fmt;
use std::fs;
use std::io::Write;
use std::ops::Range;
use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use darcy_schema::value::format_double;

use crate::error::{Error, Result};
use crate::resolve::LoadContext;
use crate::stream::{words, LineStream};

const PAD: &str = "  ";

mod private {
    pub trait Sealed {}
    impl Sealed for i64 {}
    impl Sealed for f64 {}
}

/// Numeric element of an array: 64-bit integers or doubles.
///
/// Sealed; the format knows exactly these two element types.
pub trait Element: Copy + PartialEq + fmt::Debug + private::Sealed + 'static {
    /// Type name used in diagnostics.
    const TYPE_NAME: &'static str;

    /// Multiplicative identity (the default factor).
    fn one() -> Self;

    /// Parse one token.
    fn parse(token: &str) -> Option<Self>;

    /// Format one token.
    fn format(&self) -> String;

    /// Multiply, for factor application.
    fn mul(self, rhs: Self) -> Self;

    /// Lossy widening for reductions.
    fn to_f64(self) -> f64;
}

impl Element for i64 {
    const TYPE_NAME: &'static str = "integer";

    fn one() -> Self {
        1
    }

    fn parse(token: &str) -> Option<Self> {
        token.parse().ok()
    }

    fn format(&self) -> String {
        self.to_string()
    }

    fn mul(self, rhs: Self) -> Self {
        self * rhs
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Element for f64 {
    const TYPE_NAME: &'static str = "double";

    fn one() -> Self {
        1.0
    }

    fn parse(token: &str) -> Option<Self> {
        token.parse().ok()
    }

    fn format(&self) -> String {
        format_double(*self)
    }

    fn mul(self, rhs: Self) -> Self {
        self * rhs
    }

    fn to_f64(self) -> f64 {
        self
    }
}

/// Storage mode of one array (or one layer of a layered array).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArrayMode {
    /// Single value, expanded on resolution
    Constant,
    /// Materialized dense buffer
    Internal,
    /// Companion file reference
    External,
}

impl fmt::Display for ArrayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArrayMode::Constant => "constant",
            ArrayMode::Internal => "internal",
            ArrayMode::External => "external",
        };
        write!(f, "{name}")
    }
}

/// One stored representation with its factor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ArrayStorage<T: Element> {
    /// `CONSTANT <value>`
    Constant { value: T, factor: T },
    /// `INTERNAL [FACTOR f]` plus a dense buffer
    Internal { data: Vec<T>, factor: T },
    /// `OPEN <path> [FACTOR f]`; `path` as written, resolved against `dir`
    External { path: PathBuf, dir: PathBuf, factor: T },
}

impl<T: Element> ArrayStorage<T> {
    /// Current mode.
    pub fn mode(&self) -> ArrayMode {
        match self {
            ArrayStorage::Constant { .. } => ArrayMode::Constant,
            ArrayStorage::Internal { .. } => ArrayMode::Internal,
            ArrayStorage::External { .. } => ArrayMode::External,
        }
    }

    /// Active factor.
    pub fn factor(&self) -> T {
        match self {
            ArrayStorage::Constant { factor, .. }
            | ArrayStorage::Internal { factor, .. }
            | ArrayStorage::External { factor, .. } => *factor,
        }
    }

    /// Replace the factor. The stored representation is untouched.
    pub fn set_factor(&mut self, f: T) {
        match self {
            ArrayStorage::Constant { factor, .. }
            | ArrayStorage::Internal { factor, .. }
            | ArrayStorage::External { factor, .. } => *factor = f,
        }
    }

    /// Resolve to a dense buffer of `len` elements with the factor applied.
    ///
    /// External representations re-read the backing file on every call.
    pub fn resolve(&self, len: usize) -> Result<Vec<T>> {
        match self {
            ArrayStorage::Constant { value, factor } => Ok(vec![value.mul(*factor); len]),
            ArrayStorage::Internal { data, factor } => {
                if data.len() != len {
                    return Err(Error::ShapeMismatch {
                        expected: len,
                        got: data.len(),
                    });
                }
                Ok(data.iter().map(|v| v.mul(*factor)).collect())
            }
            ArrayStorage::External { path, dir, factor } => {
                let text = fs::read_to_string(dir.join(path))?;
                let mut data = Vec::with_capacity(len);
                for token in text.split_whitespace() {
                    let v = T::parse(token).ok_or_else(|| {
                        Error::bad_token(token, format!("{} array value", T::TYPE_NAME))
                    })?;
                    data.push(v.mul(*factor));
                }
                if data.len() != len {
                    return Err(Error::ShapeMismatch {
                        expected: len,
                        got: data.len(),
                    });
                }
                Ok(data)
            }
        }
    }
}

/// One replacement representation for [`Array::set_data`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LayerData<T: Element> {
    /// Constant layer
    Constant(T),
    /// Materialized layer
    Internal(Vec<T>),
}

impl<T: Element> From<T> for LayerData<T> {
    fn from(value: T) -> Self {
        LayerData::Constant(value)
    }
}

impl<T: Element> From<Vec<T>> for LayerData<T> {
    fn from(data: Vec<T>) -> Self {
        LayerData::Internal(data)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
enum Layers<T: Element> {
    Single(ArrayStorage<T>),
    Layered(Vec<ArrayStorage<T>>),
}

/// A dense or compressed multi-dimensional numeric array parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Array<T: Element> {
    name: String,
    shape: Vec<usize>,
    layers: Layers<T>,
}

impl<T: Element> Array<T> {
    /// Constant array over the given shape.
    pub fn constant(name: impl Into<String>, shape: Vec<usize>, value: T) -> Self {
        Self {
            name: name.into().to_lowercase(),
            shape,
            layers: Layers::Single(ArrayStorage::Constant {
                value,
                factor: T::one(),
            }),
        }
    }

    /// Internal array over the given shape from a dense buffer.
    pub fn from_dense(name: impl Into<String>, shape: Vec<usize>, data: Vec<T>) -> Result<Self> {
        let expected = shape.iter().product();
        if data.len() != expected {
            return Err(Error::ShapeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            name: name.into().to_lowercase(),
            shape,
            layers: Layers::Single(ArrayStorage::Internal {
                data,
                factor: T::one(),
            }),
        })
    }

    /// Load an array from the stream.
    ///
    /// With `header`, the parameter's name line is consumed first (an
    /// optional `LAYERED` tag after the name is accepted). A layered array
    /// reads one stanza per leading-axis index; otherwise one stanza covers
    /// the whole shape. Each stanza begins with its storage-mode keyword.
    pub fn load(
        stream: &mut LineStream<'_>,
        ctx: &LoadContext<'_>,
        name: &str,
        shape: &[usize],
        layered: bool,
        header: bool,
    ) -> Result<Self> {
        if header {
            let (_, line) = stream.expect_content(name)?;
            let tokens = words(line);
            match tokens.as_slice() {
                [head] if head.eq_ignore_ascii_case(name) => {}
                [head, tag] if head.eq_ignore_ascii_case(name)
                    && tag.eq_ignore_ascii_case("layered") => {}
                [head, ..] if head.eq_ignore_ascii_case(name) => {
                    return Err(Error::bad_token(tokens[1], format!("end of {name}")));
                }
                [head, ..] => {
                    return Err(Error::bad_token(*head, format!("array parameter {name}")));
                }
                [] => return Err(Error::Eof(name.to_string())),
            }
        }

        let layers = if layered {
            let (&nlay, rest) = shape
                .split_first()
                .ok_or_else(|| Error::bad_token("()", format!("layered shape for {name}")))?;
            let layer_len = rest.iter().product();
            let mut layers = Vec::with_capacity(nlay);
            for _ in 0..nlay {
                layers.push(load_stanza(stream, ctx, name, layer_len)?);
            }
            Layers::Layered(layers)
        } else {
            let len = shape.iter().product();
            Layers::Single(load_stanza(stream, ctx, name, len)?)
        };

        debug!(name, ?shape, layered, "array loaded");
        Ok(Self {
            name: name.to_lowercase(),
            shape: shape.to_vec(),
            layers,
        })
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared shape.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Total element count.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    /// Check for a zero-extent shape.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the array is stored per layer.
    pub fn is_layered(&self) -> bool {
        matches!(self.layers, Layers::Layered(_))
    }

    /// Number of layers (1 for a plain array).
    pub fn nlay(&self) -> usize {
        match &self.layers {
            Layers::Single(_) => 1,
            Layers::Layered(layers) => layers.len(),
        }
    }

    fn layer_len(&self) -> usize {
        self.shape.iter().skip(1).product()
    }

    /// Current mode per layer (one entry for a plain array).
    pub fn how(&self) -> Vec<ArrayMode> {
        match &self.layers {
            Layers::Single(s) => vec![s.mode()],
            Layers::Layered(layers) => layers.iter().map(ArrayStorage::mode).collect(),
        }
    }

    /// Active factor per layer (one entry for a plain array).
    pub fn factor(&self) -> Vec<T> {
        match &self.layers {
            Layers::Single(s) => vec![s.factor()],
            Layers::Layered(layers) => layers.iter().map(ArrayStorage::factor).collect(),
        }
    }

    /// Set the factor on every layer. Stored representations are
    /// untouched; only subsequent resolutions see the change.
    pub fn set_factor(&mut self, f: T) {
        match &mut self.layers {
            Layers::Single(s) => s.set_factor(f),
            Layers::Layered(layers) => {
                for layer in layers {
                    layer.set_factor(f);
                }
            }
        }
    }

    /// Set the factor on one layer.
    pub fn set_layer_factor(&mut self, index: usize, f: T) -> Result<()> {
        self.layer_mut(index)?.set_factor(f);
        Ok(())
    }

    /// Storage of one layer, for introspection.
    pub fn layer(&self, index: usize) -> Result<&ArrayStorage<T>> {
        match &self.layers {
            Layers::Single(s) if index == 0 => Ok(s),
            Layers::Single(_) => Err(Error::LayerOutOfRange { index, layers: 1 }),
            Layers::Layered(layers) => layers.get(index).ok_or(Error::LayerOutOfRange {
                index,
                layers: layers.len(),
            }),
        }
    }

    fn layer_mut(&mut self, index: usize) -> Result<&mut ArrayStorage<T>> {
        match &mut self.layers {
            Layers::Single(s) if index == 0 => Ok(s),
            Layers::Single(_) => Err(Error::LayerOutOfRange { index, layers: 1 }),
            Layers::Layered(layers) => {
                let n = layers.len();
                layers
                    .get_mut(index)
                    .ok_or(Error::LayerOutOfRange { index, layers: n })
            }
        }
    }

    /// Resolve the full dense value, factors applied, layers concatenated
    /// along the leading axis.
    pub fn value(&self) -> Result<Vec<T>> {
        match &self.layers {
            Layers::Single(s) => s.resolve(self.len()),
            Layers::Layered(layers) => {
                let layer_len = self.layer_len();
                let mut out = Vec::with_capacity(self.len());
                for layer in layers {
                    out.extend(layer.resolve(layer_len)?);
                }
                Ok(out)
            }
        }
    }

    /// Resolve one layer's dense value.
    pub fn layer_value(&self, index: usize) -> Result<Vec<T>> {
        let len = match &self.layers {
            Layers::Single(_) => self.len(),
            Layers::Layered(_) => self.layer_len(),
        };
        self.layer(index)?.resolve(len)
    }

    /// Assign one element. Demotes only the containing layer to internal.
    pub fn set(&mut self, index: &[usize], value: T) -> Result<()> {
        let offset = self.flat_offset(index)?;
        match &self.layers {
            Layers::Single(_) => self.demote(0, |data| data[offset] = value),
            Layers::Layered(_) => {
                let layer_len = self.layer_len();
                self.demote(offset / layer_len, |data| data[offset % layer_len] = value)
            }
        }
    }

    /// Assign one value across a leading-axis slice. Demotes only the
    /// affected layers.
    pub fn fill_range(&mut self, range: Range<usize>, value: T) -> Result<()> {
        self.apply_range(range, |_| value)
    }

    /// Apply an elementwise function over a leading-axis slice, in place.
    /// Demotes only the affected layers.
    pub fn apply_range(&mut self, range: Range<usize>, f: impl Fn(T) -> T) -> Result<()> {
        let nrows = self.shape.first().copied().unwrap_or(1);
        if range.end > nrows {
            return Err(Error::IndexOutOfBounds {
                index: vec![range.end],
                shape: self.shape.clone(),
            });
        }
        match &self.layers {
            Layers::Single(_) => {
                let row_len = self.layer_len();
                self.demote(0, |data| {
                    for v in &mut data[range.start * row_len..range.end * row_len] {
                        *v = f(*v);
                    }
                })
            }
            Layers::Layered(_) => {
                for li in range {
                    self.demote(li, |data| {
                        for v in data.iter_mut() {
                            *v = f(*v);
                        }
                    })?;
                }
                Ok(())
            }
        }
    }

    /// Apply an elementwise function to the whole array, in place. Every
    /// layer materializes as internal.
    pub fn apply(&mut self, f: impl Fn(T) -> T) -> Result<()> {
        let nrows = self.shape.first().copied().unwrap_or(1);
        self.apply_range(0..nrows, f)
    }

    /// Elementwise transform into a new array with every layer
    /// materialized.
    pub fn map(&self, f: impl Fn(T) -> T) -> Result<Self> {
        let mut out = self.clone();
        out.apply(f)?;
        Ok(out)
    }

    /// Replace the whole value with a dense buffer. The replaced scope is
    /// always internal afterwards.
    pub fn replace(&mut self, data: Vec<T>) -> Result<()> {
        if data.len() != self.len() {
            return Err(Error::ShapeMismatch {
                expected: self.len(),
                got: data.len(),
            });
        }
        match &mut self.layers {
            Layers::Single(s) => {
                *s = ArrayStorage::Internal {
                    data,
                    factor: T::one(),
                };
            }
            Layers::Layered(layers) => {
                let layer_len: usize = self.shape.iter().skip(1).product();
                for (li, chunk) in data.chunks(layer_len.max(1)).enumerate() {
                    if li < layers.len() {
                        layers[li] = ArrayStorage::Internal {
                            data: chunk.to_vec(),
                            factor: T::one(),
                        };
                    }
                }
            }
        }
        Ok(())
    }

    /// Replace one layer's representation.
    pub fn set_layer(&mut self, index: usize, data: LayerData<T>) -> Result<()> {
        let len = match &self.layers {
            Layers::Single(_) => self.len(),
            Layers::Layered(_) => self.layer_len(),
        };
        let storage = storage_from(data, len)?;
        *self.layer_mut(index)? = storage;
        Ok(())
    }

    /// Bulk-assign one representation per layer from a mixed sequence:
    /// a scalar becomes a constant layer, a dense buffer an internal one.
    pub fn set_data(&mut self, items: Vec<LayerData<T>>) -> Result<()> {
        let nlay = self.nlay();
        if items.len() != nlay {
            return Err(Error::ShapeMismatch {
                expected: nlay,
                got: items.len(),
            });
        }
        for (li, item) in items.into_iter().enumerate() {
            self.set_layer(li, item)?;
        }
        Ok(())
    }

    /// Convert a plain array into its layered equivalent, splitting on the
    /// leading axis so layers can be replaced independently.
    ///
    /// A constant splits without materializing; an internal buffer splits
    /// into per-layer buffers; an external reference is resolved once and
    /// split into internal layers.
    pub fn make_layered(&mut self) -> Result<()> {
        let single = match &self.layers {
            Layers::Layered(_) => return Ok(()),
            Layers::Single(s) => s.clone(),
        };
        if self.shape.is_empty() {
            return Err(Error::bad_token("()", "a shape with a leading axis"));
        }
        let nlay = self.shape[0];
        let layer_len = self.layer_len();
        let layers = match single {
            ArrayStorage::Constant { value, factor } => {
                vec![ArrayStorage::Constant { value, factor }; nlay]
            }
            ArrayStorage::Internal { data, factor } => data
                .chunks(layer_len.max(1))
                .map(|chunk| ArrayStorage::Internal {
                    data: chunk.to_vec(),
                    factor,
                })
                .collect(),
            external @ ArrayStorage::External { .. } => {
                let resolved = external.resolve(self.len())?;
                resolved
                    .chunks(layer_len.max(1))
                    .map(|chunk| ArrayStorage::Internal {
                        data: chunk.to_vec(),
                        factor: T::one(),
                    })
                    .collect()
            }
        };
        self.layers = Layers::Layered(layers);
        Ok(())
    }

    /// Sum of all resolved elements.
    pub fn sum(&self) -> Result<f64> {
        Ok(self.value()?.iter().map(|v| v.to_f64()).sum())
    }

    /// Arithmetic mean of all resolved elements.
    pub fn mean(&self) -> Result<f64> {
        let values = self.value()?;
        if values.is_empty() {
            return Err(Error::ShapeMismatch { expected: 1, got: 0 });
        }
        Ok(values.iter().map(|v| v.to_f64()).sum::<f64>() / values.len() as f64)
    }

    /// Minimum resolved element.
    pub fn min(&self) -> Result<f64> {
        self.fold_values(f64::INFINITY, f64::min)
    }

    /// Maximum resolved element.
    pub fn max(&self) -> Result<f64> {
        self.fold_values(f64::NEG_INFINITY, f64::max)
    }

    /// Median of the resolved elements.
    pub fn median(&self) -> Result<f64> {
        let mut values: Vec<f64> = self.value()?.iter().map(|v| v.to_f64()).collect();
        if values.is_empty() {
            return Err(Error::ShapeMismatch { expected: 1, got: 0 });
        }
        values.sort_by(f64::total_cmp);
        let mid = values.len() / 2;
        if values.len() % 2 == 0 {
            Ok((values[mid - 1] + values[mid]) / 2.0)
        } else {
            Ok(values[mid])
        }
    }

    /// Population standard deviation of the resolved elements.
    pub fn std(&self) -> Result<f64> {
        let values = self.value()?;
        if values.is_empty() {
            return Err(Error::ShapeMismatch { expected: 1, got: 0 });
        }
        let n = values.len() as f64;
        let mean = values.iter().map(|v| v.to_f64()).sum::<f64>() / n;
        let var = values
            .iter()
            .map(|v| {
                let d = v.to_f64() - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        Ok(var.sqrt())
    }

    /// Write the stored representation: the name line, then one stanza per
    /// layer. External file contents are never rewritten here.
    pub fn write(&self, w: &mut impl Write) -> Result<()> {
        match &self.layers {
            Layers::Single(s) => {
                writeln!(w, "{PAD}{}", self.name.to_uppercase())?;
                write_stanza(w, s, &self.shape)?;
            }
            Layers::Layered(layers) => {
                writeln!(w, "{PAD}{} LAYERED", self.name.to_uppercase())?;
                let stanza_shape = &self.shape[1..];
                for layer in layers {
                    write_stanza(w, layer, stanza_shape)?;
                }
            }
        }
        Ok(())
    }

    fn fold_values(&self, init: f64, f: impl Fn(f64, f64) -> f64) -> Result<f64> {
        let values = self.value()?;
        if values.is_empty() {
            return Err(Error::ShapeMismatch { expected: 1, got: 0 });
        }
        Ok(values.iter().map(|v| v.to_f64()).fold(init, f))
    }

    fn flat_offset(&self, index: &[usize]) -> Result<usize> {
        if index.len() != self.shape.len() {
            return Err(Error::IndexOutOfBounds {
                index: index.to_vec(),
                shape: self.shape.clone(),
            });
        }
        let mut offset = 0;
        for (&ix, &dim) in index.iter().zip(&self.shape) {
            if ix >= dim {
                return Err(Error::IndexOutOfBounds {
                    index: index.to_vec(),
                    shape: self.shape.clone(),
                });
            }
            offset = offset * dim + ix;
        }
        Ok(offset)
    }

    /// Demote one layer to internal: resolve it, apply the edit, store the
    /// result with a unit factor. Other layers are untouched.
    fn demote(&mut self, index: usize, edit: impl FnOnce(&mut Vec<T>)) -> Result<()> {
        let len = match &self.layers {
            Layers::Single(_) => self.len(),
            Layers::Layered(_) => self.layer_len(),
        };
        let layer = self.layer(index)?;
        let mut data = layer.resolve(len)?;
        edit(&mut data);
        *self.layer_mut(index)? = ArrayStorage::Internal {
            data,
            factor: T::one(),
        };
        Ok(())
    }
}

fn storage_from<T: Element>(data: LayerData<T>, len: usize) -> Result<ArrayStorage<T>> {
    match data {
        LayerData::Constant(value) => Ok(ArrayStorage::Constant {
            value,
            factor: T::one(),
        }),
        LayerData::Internal(data) => {
            if data.len() != len {
                return Err(Error::ShapeMismatch {
                    expected: len,
                    got: data.len(),
                });
            }
            Ok(ArrayStorage::Internal {
                data,
                factor: T::one(),
            })
        }
    }
}

/// Read one storage stanza: the control line, plus value lines for
/// `INTERNAL`.
fn load_stanza<T: Element>(
    stream: &mut LineStream<'_>,
    ctx: &LoadContext<'_>,
    name: &str,
    len: usize,
) -> Result<ArrayStorage<T>> {
    let (_, line) = stream.expect_content(&format!("array control record for {name}"))?;
    let tokens = words(line);
    let Some((keyword, rest)) = tokens.split_first() else {
        return Err(Error::Eof(name.to_string()));
    };

    if keyword.eq_ignore_ascii_case("constant") {
        let token = rest
            .first()
            .ok_or_else(|| Error::bad_token("", format!("constant value for {name}")))?;
        let value = T::parse(token)
            .ok_or_else(|| Error::bad_token(*token, format!("{} value", T::TYPE_NAME)))?;
        return Ok(ArrayStorage::Constant {
            value,
            factor: T::one(),
        });
    }

    if keyword.eq_ignore_ascii_case("internal") {
        let (factor, inline) = parse_factor::<T>(rest, name)?;
        let mut data = Vec::with_capacity(len);
        parse_values(inline, &mut data, name)?;
        while data.len() < len {
            let (_, line) = stream.expect_content(&format!("array values for {name}"))?;
            parse_values(&words(line), &mut data, name)?;
        }
        if data.len() != len {
            return Err(Error::ShapeMismatch {
                expected: len,
                got: data.len(),
            });
        }
        return Ok(ArrayStorage::Internal { data, factor });
    }

    if keyword.eq_ignore_ascii_case("open") || keyword.eq_ignore_ascii_case("open/close") {
        let Some((path, rest)) = rest.split_first() else {
            return Err(Error::bad_token("", format!("file path for {name}")));
        };
        let (factor, extra) = parse_factor::<T>(rest, name)?;
        if let Some(tok) = extra.first() {
            return Err(Error::bad_token(*tok, format!("end of {name}")));
        }
        return Ok(ArrayStorage::External {
            path: PathBuf::from(path),
            dir: ctx.dir().to_path_buf(),
            factor,
        });
    }

    Err(Error::bad_token(
        *keyword,
        "CONSTANT, INTERNAL, or OPEN".to_string(),
    ))
}

/// Parse an optional leading `FACTOR <f>` clause, returning the factor and
/// the remaining tokens.
fn parse_factor<'a, T: Element>(tokens: &'a [&'a str], name: &str) -> Result<(T, &'a [&'a str])> {
    match tokens.split_first() {
        Some((kw, rest)) if kw.eq_ignore_ascii_case("factor") => {
            let Some((token, rest)) = rest.split_first() else {
                return Err(Error::bad_token("", format!("factor value for {name}")));
            };
            let factor = T::parse(token)
                .ok_or_else(|| Error::bad_token(*token, format!("{} factor", T::TYPE_NAME)))?;
            Ok((factor, rest))
        }
        _ => Ok((T::one(), tokens)),
    }
}

fn parse_values<T: Element>(tokens: &[&str], out: &mut Vec<T>, name: &str) -> Result<()> {
    for token in tokens {
        let v = T::parse(token).ok_or_else(|| {
            Error::bad_token(*token, format!("{} value for {name}", T::TYPE_NAME))
        })?;
        out.push(v);
    }
    Ok(())
}

fn write_stanza<T: Element>(
    w: &mut impl Write,
    storage: &ArrayStorage<T>,
    shape: &[usize],
) -> Result<()> {
    match storage {
        ArrayStorage::Constant { value, .. } => {
            writeln!(w, "{PAD}{PAD}CONSTANT {}", value.format())?;
        }
        ArrayStorage::Internal { data, factor } => {
            if *factor == T::one() {
                writeln!(w, "{PAD}{PAD}INTERNAL")?;
            } else {
                writeln!(w, "{PAD}{PAD}INTERNAL FACTOR {}", factor.format())?;
            }
            let row = shape.last().copied().unwrap_or(data.len()).max(1);
            for chunk in data.chunks(row) {
                let line: Vec<String> = chunk.iter().map(Element::format).collect();
                writeln!(w, "{PAD}{PAD}{PAD}{}", line.join(" "))?;
            }
        }
        ArrayStorage::External { path, factor, .. } => {
            if *factor == T::one() {
                writeln!(w, "{PAD}{PAD}OPEN {}", path.display())?;
            } else {
                writeln!(w, "{PAD}{PAD}OPEN {} FACTOR {}", path.display(), factor.format())?;
            }
        }
    }
    Ok(())
}
