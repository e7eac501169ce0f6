//! Block descriptors
//!
//! A [`BlockSpec`] is the ordered table of parameters one block declares.
//! Blocks never accept parameters outside their table.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::param::{ParamKind, ParamSpec};

/// Schema of one named block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSpec {
    /// Block name (lowercase)
    pub name: String,
    /// Parameter descriptors in declaration order
    pub params: IndexMap<String, ParamSpec>,
}

impl BlockSpec {
    /// Build a block schema from an ordered parameter list.
    ///
    /// Each parameter's `block` field is stamped with this block's name.
    pub fn new(name: impl Into<String>, params: Vec<ParamSpec>) -> Self {
        let name = name.into().to_lowercase();
        let params = params
            .into_iter()
            .map(|p| (p.name.clone(), p.in_block(name.clone())))
            .collect();
        Self { name, params }
    }

    /// Look up a parameter by name.
    pub fn get(&self, name: &str) -> Option<&ParamSpec> {
        self.params.get(name)
    }

    /// Find the parameter a block line with the given leading token belongs
    /// to.
    ///
    /// The token is matched against declared parameter names and against
    /// every key of every keystring parameter, so a union member line is
    /// routed to its owning keystring.
    pub fn entry_for(&self, token: &str) -> Option<&ParamSpec> {
        for param in self.params.values() {
            if let ParamKind::Keystring(ks) = &param.kind {
                if ks.has_key(token) {
                    return Some(param);
                }
            }
        }
        self.params.get(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> BlockSpec {
        BlockSpec::new(
            "options",
            vec![
                ParamSpec::keyword("save_flows"),
                ParamSpec::keystring(
                    "ocsetting",
                    vec![ParamSpec::keyword("first"), ParamSpec::int("frequency")],
                ),
            ],
        )
    }

    #[test]
    fn test_block_stamps_param_block() {
        let spec = options();
        assert_eq!(spec.get("save_flows").unwrap().block.as_deref(), Some("options"));
    }

    #[test]
    fn test_entry_for_direct_name() {
        let spec = options();
        assert_eq!(spec.entry_for("save_flows").unwrap().name, "save_flows");
    }

    #[test]
    fn test_entry_for_union_key() {
        let spec = options();
        assert_eq!(spec.entry_for("frequency").unwrap().name, "ocsetting");
        assert!(spec.entry_for("unknown").is_none());
    }
}
