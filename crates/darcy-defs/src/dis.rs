//! Structured discretization (DIS) package definition.

use darcy_schema::{BlockSpec, Dim, KeyPath, ParamSpec, ShapeExpr, Value};

fn grid2d() -> ShapeExpr {
    ShapeExpr::dims(vec![
        Dim::Named(KeyPath::from("dis/nrow")),
        Dim::Named(KeyPath::from("dis/ncol")),
    ])
}

fn grid3d() -> ShapeExpr {
    ShapeExpr::dims(vec![
        Dim::Named(KeyPath::from("dis/nlay")),
        Dim::Named(KeyPath::from("dis/nrow")),
        Dim::Named(KeyPath::from("dis/ncol")),
    ])
}

/// OPTIONS block.
pub fn options() -> BlockSpec {
    BlockSpec::new(
        "options",
        vec![
            ParamSpec::word("length_units").with_longname("model length units"),
            ParamSpec::keyword("nogrb").with_longname("do not write binary grid file"),
        ],
    )
}

/// DIMENSIONS block.
pub fn dimensions() -> BlockSpec {
    BlockSpec::new(
        "dimensions",
        vec![
            ParamSpec::int("nlay")
                .required()
                .with_default(Value::Int(1))
                .with_longname("number of layers"),
            ParamSpec::int("nrow")
                .required()
                .with_default(Value::Int(1))
                .with_longname("number of rows"),
            ParamSpec::int("ncol")
                .required()
                .with_default(Value::Int(1))
                .with_longname("number of columns"),
        ],
    )
}

/// GRIDDATA block.
pub fn griddata() -> BlockSpec {
    BlockSpec::new(
        "griddata",
        vec![
            ParamSpec::double_array("delr", ShapeExpr::named("dis/ncol"))
                .with_longname("spacing along a row"),
            ParamSpec::double_array("delc", ShapeExpr::named("dis/nrow"))
                .with_longname("spacing along a column"),
            ParamSpec::double_array("top", grid2d()).with_longname("cell top elevation"),
            ParamSpec::double_array("botm", grid3d())
                .layered()
                .with_longname("cell bottom elevation"),
            ParamSpec::int_array("idomain", grid3d())
                .layered()
                .with_longname("idomain existence array"),
        ],
    )
}
