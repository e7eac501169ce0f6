//! Output control (OC) package definition.

use darcy_schema::{BlockSpec, ParamSpec, ShapeExpr};

fn ocsetting() -> ParamSpec {
    ParamSpec::keystring(
        "ocsetting",
        vec![
            ParamSpec::keyword("all").with_longname("save for all time steps in period"),
            ParamSpec::keyword("first").with_longname("save for first step in period"),
            ParamSpec::keyword("last").with_longname("save for last step in period"),
            ParamSpec::int("frequency").with_longname("save at the specified step frequency"),
            ParamSpec::int_array("steps", ShapeExpr::Free)
                .with_longname("save for each step specified"),
        ],
    )
    .required()
}

/// OPTIONS block.
pub fn options() -> BlockSpec {
    BlockSpec::new(
        "options",
        vec![
            ParamSpec::filename("budget_file")
                .with_longname("name of the output file to write budget information"),
            ParamSpec::filename("budget_csv_file")
                .with_longname("name of the csv output file to write budget summary information"),
            ParamSpec::filename("head_file")
                .with_longname("name of the output file to write head information"),
            ParamSpec::record(
                "print_format",
                vec![
                    ParamSpec::keyword("columns").required(),
                    ParamSpec::int("ncolumns").required(),
                    ParamSpec::keyword("width").required(),
                    ParamSpec::int("nwidth").required(),
                    ParamSpec::keyword("digits").required(),
                    ParamSpec::int("ndigits").required(),
                    ParamSpec::word("array_format").required(),
                ],
            ),
        ],
    )
}

/// PERIOD block.
pub fn period() -> BlockSpec {
    BlockSpec::new(
        "period",
        vec![
            ParamSpec::record(
                "saverecord",
                vec![ParamSpec::word("rtype").required(), ocsetting()],
            ),
            ParamSpec::record(
                "printrecord",
                vec![ParamSpec::word("rtype").required(), ocsetting()],
            ),
        ],
    )
}
