//! Constant head (CHD) package definition.

use darcy_schema::{BlockSpec, ParamSpec, ShapeExpr};

/// OPTIONS block.
pub fn options() -> BlockSpec {
    BlockSpec::new(
        "options",
        vec![
            ParamSpec::word("auxmultname")
                .with_longname("name of auxiliary variable for multiplier"),
            ParamSpec::keyword("boundnames"),
            ParamSpec::keyword("print_input").with_longname("print input to listing file"),
            ParamSpec::keyword("print_flows").with_longname("print CHD flows to listing file"),
            ParamSpec::keyword("save_flows").with_longname("save CHD flows to budget file"),
            ParamSpec::record(
                "ts_filerecord",
                vec![
                    ParamSpec::keyword("filein").required(),
                    ParamSpec::filename("ts6_filename").required(),
                ],
            ),
        ],
    )
}

/// DIMENSIONS block.
pub fn dimensions() -> BlockSpec {
    BlockSpec::new(
        "dimensions",
        vec![ParamSpec::int("maxbound")
            .required()
            .with_longname("maximum number of constant heads")],
    )
}

/// PERIOD block.
pub fn period() -> BlockSpec {
    BlockSpec::new(
        "period",
        vec![ParamSpec::list(
            "stress_period_data",
            vec![
                ParamSpec::int_array("cellid", ShapeExpr::named("dis/ncelldim"))
                    .with_longname("cell identifier"),
                ParamSpec::double("head").with_longname("constant head value"),
                ParamSpec::double("aux"),
                ParamSpec::word("boundname"),
            ],
        )
        .with_bound("chd/maxbound")],
    )
}
