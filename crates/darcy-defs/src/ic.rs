//! Initial conditions (IC) package definition.

use darcy_schema::{BlockSpec, Dim, KeyPath, ParamSpec, ShapeExpr};

/// OPTIONS block.
pub fn options() -> BlockSpec {
    BlockSpec::new(
        "options",
        vec![
            ParamSpec::keyword("export_array_ascii")
                .with_longname("export array variables to ascii files"),
        ],
    )
}

/// GRIDDATA block.
pub fn griddata() -> BlockSpec {
    BlockSpec::new(
        "griddata",
        vec![ParamSpec::double_array(
            "strt",
            ShapeExpr::dims(vec![
                Dim::Named(KeyPath::from("dis/nlay")),
                Dim::Named(KeyPath::from("dis/nrow")),
                Dim::Named(KeyPath::from("dis/ncol")),
            ]),
        )
        .layered()
        .required()
        .with_longname("starting head")],
    )
}
