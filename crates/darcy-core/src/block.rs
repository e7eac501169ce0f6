//! Block load/write protocol
//!
//! A block is the `BEGIN <NAME> [INDEX]` … `END <NAME>` unit of the input
//! format: an ordered, schema-validated mapping from parameter name to
//! parameter value. Loading runs a small state machine — seek the begin
//! line, dispatch body lines to parameter loaders by leading token, stop
//! at the end line — and writing walks the schema in declared order.

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use darcy_schema::{BlockSpec, ParamKind};

use crate::error::{Error, Result};
use crate::param::Param;
use crate::resolve::LoadContext;
use crate::scalar::Scalar;
use crate::stream::{words, LineStream};

/// A loaded input block.
///
/// Holds exactly the parameters its schema declares; unknown names are
/// rejected both while loading and on value assignment. Repeated blocks of
/// the same name (per-stress-period blocks) are distinguished by the
/// optional numeric index captured from the begin line.
#[derive(Debug, Clone)]
pub struct Block {
    name: String,
    index: Option<u32>,
    spec: Arc<BlockSpec>,
    params: IndexMap<String, Param>,
}

impl Block {
    /// Construct an empty block with declared defaults applied.
    pub fn new(spec: Arc<BlockSpec>) -> Self {
        let mut block = Self {
            name: spec.name.clone(),
            index: None,
            spec,
            params: IndexMap::new(),
        };
        block.apply_defaults();
        block
    }

    /// Load a block from the stream.
    ///
    /// Skips to the `BEGIN` line, captures the block name (case
    /// insensitive) and optional integer index, then dispatches each body
    /// line to the owning parameter's loader: the leading token is matched
    /// against declared names and against every keystring member key, the
    /// stream is rewound to the line start, and the parameter kind's
    /// loader takes over. An unmatched leading token fails the load.
    pub fn load(
        spec: Arc<BlockSpec>,
        stream: &mut LineStream<'_>,
        ctx: &LoadContext<'_>,
    ) -> Result<Self> {
        let (name, index) = seek_begin(stream)?;
        if name != spec.name {
            warn!(found = %name, expected = %spec.name, "block name differs from schema");
        }
        debug!(block = %name, ?index, "loading block");

        let mut params = IndexMap::new();
        loop {
            let (pos, line) = stream.expect_content(&format!("block {name}"))?;
            let tokens = words(line);
            let key = tokens[0].to_lowercase();
            if key == "end" {
                break;
            }
            let Some(pspec) = spec.entry_for(&key) else {
                // period-style blocks carry bare table rows with no leading
                // parameter name; route them to the block's one list
                if let Some(lspec) = sole_list_param(&spec) {
                    if !params.contains_key(&lspec.name) {
                        stream.rewind(pos);
                        let param = Param::load(lspec, stream, ctx)?;
                        params.insert(lspec.name.clone(), param);
                        continue;
                    }
                }
                return Err(Error::UnknownParam(key.to_uppercase()));
            };
            stream.rewind(pos);
            debug!(block = %name, param = %pspec.name, "loading parameter");
            let param = Param::load(pspec, stream, ctx)?;
            params.insert(pspec.name.clone(), param);
        }

        debug!(block = %name, params = params.len(), "block loaded");
        Ok(Self {
            name,
            index,
            spec,
            params,
        })
    }

    /// Block name (lowercase).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Optional numeric index from the begin line.
    pub fn index(&self) -> Option<u32> {
        self.index
    }

    /// Set the numeric index.
    pub fn set_index(&mut self, index: Option<u32>) {
        self.index = index;
    }

    /// The block's schema.
    pub fn spec(&self) -> &BlockSpec {
        &self.spec
    }

    /// Look up a parameter value by name.
    pub fn get(&self, name: &str) -> Option<&Param> {
        self.params.get(name)
    }

    /// Mutable parameter access.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Param> {
        self.params.get_mut(name)
    }

    /// Set parameter values in bulk.
    ///
    /// Every supplied key must be declared by the schema; unknown keys
    /// reject the whole assignment. Omitted parameters fall back to their
    /// declared defaults.
    pub fn set_values(&mut self, values: IndexMap<String, Param>) -> Result<()> {
        let spec = self.spec.clone();
        let unknown: Vec<String> = values
            .keys()
            .filter(|key| !spec.params.contains_key(*key))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(Error::UnknownParams(unknown));
        }
        let mut values = values;
        self.params.clear();
        for name in spec.params.keys() {
            if let Some(param) = values.shift_remove(name) {
                self.params.insert(name.clone(), param);
            }
        }
        self.apply_defaults();
        Ok(())
    }

    /// Directly set one parameter value. The name must be declared.
    pub fn set(&mut self, name: &str, param: Param) -> Result<()> {
        if !self.spec.params.contains_key(name) {
            return Err(Error::UnknownParams(vec![name.to_string()]));
        }
        self.params.insert(name.to_string(), param);
        Ok(())
    }

    /// Parameter names and values in declared order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Write the block: begin line, parameters in declared order, end
    /// line.
    pub fn write(&self, w: &mut impl Write) -> Result<()> {
        let name = self.name.to_uppercase();
        match self.index {
            Some(index) => writeln!(w, "BEGIN {name} {index}")?,
            None => writeln!(w, "BEGIN {name}")?,
        }
        let spec = self.spec.clone();
        for pname in spec.params.keys() {
            if let Some(param) = self.params.get(pname) {
                param.write(w)?;
            }
        }
        writeln!(w, "END {name}")?;
        Ok(())
    }

    /// Fill unset parameters that declare a scalar default.
    fn apply_defaults(&mut self) {
        let spec = self.spec.clone();
        for (name, pspec) in &spec.params {
            if self.params.contains_key(name) {
                continue;
            }
            if let (Some(default), ParamKind::Scalar(kind)) = (&pspec.default, &pspec.kind) {
                self.params.insert(
                    name.clone(),
                    Param::Scalar(Scalar::from_value(name, *kind, default.clone())),
                );
            }
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = Vec::new();
        self.write(&mut out).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&out))
    }
}

/// The block's single list parameter, if it declares exactly one.
fn sole_list_param(spec: &BlockSpec) -> Option<&darcy_schema::ParamSpec> {
    let mut lists = spec
        .params
        .values()
        .filter(|p| matches!(p.kind, ParamKind::List(_)));
    match (lists.next(), lists.next()) {
        (Some(list), None) => Some(list),
        _ => None,
    }
}

/// Skip to the `BEGIN <name> [index]` line and capture name and index.
fn seek_begin(stream: &mut LineStream<'_>) -> Result<(String, Option<u32>)> {
    loop {
        let (_, line) = stream.expect_content("block begin")?;
        let tokens = words(line);
        if !tokens[0].eq_ignore_ascii_case("begin") {
            continue;
        }
        let name = tokens
            .get(1)
            .ok_or_else(|| Error::bad_token("", "block name after BEGIN"))?
            .to_lowercase();
        let index = tokens.get(2).and_then(|t| t.parse::<u32>().ok());
        return Ok((name, index));
    }
}

/// Ordered mapping of block names to loaded blocks.
///
/// Repeated same-named blocks are keyed by `name` and `name.index`.
#[derive(Debug, Clone, Default)]
pub struct Blocks {
    blocks: IndexMap<String, Block>,
}

impl Blocks {
    /// Empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a block, keyed by its name and index.
    pub fn insert(&mut self, block: Block) {
        let key = match block.index() {
            Some(index) => format!("{}.{index}", block.name()),
            None => block.name().to_string(),
        };
        self.blocks.insert(key, block);
    }

    /// Look up a block by key.
    pub fn get(&self, key: &str) -> Option<&Block> {
        self.blocks.get(key)
    }

    /// Blocks in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Block)> {
        self.blocks.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Write every block in insertion order.
    pub fn write(&self, w: &mut impl Write) -> Result<()> {
        for block in self.blocks.values() {
            block.write(w)?;
        }
        Ok(())
    }
}
