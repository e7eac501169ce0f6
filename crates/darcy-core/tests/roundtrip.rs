// Round-trip integration tests: a successfully loaded block writes back to
// text that loads to the same resolved values, even when the stored
// representation differs (factors, storage modes).

use std::sync::Arc;

use indexmap::IndexMap;

use darcy_core::{Block, LineStream, LoadContext, Node, Param};
use darcy_schema::{BlockSpec, KeyPath, ParamSpec, ShapeExpr, Value};

fn options_spec() -> Arc<BlockSpec> {
    Arc::new(BlockSpec::new(
        "options",
        vec![
            ParamSpec::keyword("print_input"),
            ParamSpec::keyword("save_flows"),
            ParamSpec::filename("budget_file"),
            ParamSpec::record(
                "print_format",
                vec![
                    ParamSpec::keyword("columns"),
                    ParamSpec::int("ncol").required(),
                    ParamSpec::keyword("width"),
                    ParamSpec::int("nwidth").required(),
                    ParamSpec::keyword("digits"),
                    ParamSpec::int("ndigits").required(),
                    ParamSpec::word("format").required(),
                ],
            ),
        ],
    ))
}

fn griddata_spec() -> Arc<BlockSpec> {
    Arc::new(BlockSpec::new(
        "griddata",
        vec![
            ParamSpec::double_array("delr", ShapeExpr::named("dis/ncol")),
            ParamSpec::double_array(
                "botm",
                ShapeExpr::dims(vec![
                    darcy_schema::Dim::Named(KeyPath::from("dis/nlay")),
                    darcy_schema::Dim::Named(KeyPath::from("dis/ncol")),
                ]),
            )
            .layered(),
        ],
    ))
}

fn dis_tree() -> Node {
    let mut root = Node::branch();
    root.set(&KeyPath::from("dis/nlay"), Value::Int(2));
    root.set(&KeyPath::from("dis/ncol"), Value::Int(4));
    root
}

fn trace_init() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn reload(block: &Block, spec: Arc<BlockSpec>, ctx: &LoadContext<'_>) -> Block {
    let mut out = Vec::new();
    block.write(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let mut stream = LineStream::new(&text);
    Block::load(spec, &mut stream, ctx).unwrap()
}

#[test]
fn options_block_round_trip() {
    trace_init();
    let text = "BEGIN OPTIONS\n\
                  PRINT_INPUT\n\
                  BUDGET_FILE flow.cbc\n\
                  PRINT_FORMAT COLUMNS 10 WIDTH 15 DIGITS 6 GENERAL\n\
                END OPTIONS\n";
    let ctx = LoadContext::new(".");
    let mut stream = LineStream::new(text);
    let block = Block::load(options_spec(), &mut stream, &ctx).unwrap();

    let again = reload(&block, options_spec(), &ctx);
    assert_eq!(
        again.get("print_input").unwrap().value().unwrap().as_keyword(),
        Some(true)
    );
    assert!(again.get("save_flows").is_none());
    assert_eq!(
        again.get("budget_file").unwrap().value().unwrap().as_path().unwrap(),
        &std::path::PathBuf::from("flow.cbc")
    );
    let record = again.get("print_format").unwrap().as_record().unwrap();
    assert_eq!(
        record.get("ncol").unwrap().value().unwrap().as_int(),
        Some(10)
    );
    assert_eq!(
        record.get("format").unwrap().value().unwrap().as_str(),
        Some("GENERAL")
    );
}

#[test]
fn griddata_round_trip_preserves_resolved_values() {
    trace_init();
    let text = "BEGIN GRIDDATA\n\
                  DELR\n\
                    CONSTANT 4.0\n\
                  BOTM LAYERED\n\
                    CONSTANT -10.0\n\
                    INTERNAL FACTOR 2.0\n\
                      -10.0 -11.0 -12.0 -13.0\n\
                END GRIDDATA\n";
    let tree = dis_tree();
    let ctx = LoadContext::new(".").with_tree(&tree);
    let mut stream = LineStream::new(text);
    let block = Block::load(griddata_spec(), &mut stream, &ctx).unwrap();

    let botm = block.get("botm").unwrap().as_double_array().unwrap();
    assert_eq!(
        botm.value().unwrap(),
        vec![-10.0, -10.0, -10.0, -10.0, -20.0, -22.0, -24.0, -26.0]
    );

    let again = reload(&block, griddata_spec(), &ctx);
    let botm2 = again.get("botm").unwrap().as_double_array().unwrap();
    assert_eq!(botm.value().unwrap(), botm2.value().unwrap());
    let delr2 = again.get("delr").unwrap().as_double_array().unwrap();
    assert_eq!(delr2.value().unwrap(), vec![4.0; 4]);
}

#[test]
fn period_list_round_trip() {
    trace_init();
    let spec = Arc::new(BlockSpec::new(
        "period",
        vec![ParamSpec::list(
            "stress_period_data",
            vec![
                ParamSpec::int_array("cellid", ShapeExpr::named("dis/ncelldim")),
                ParamSpec::double("head"),
            ],
        )
        .with_bound("dimensions/maxbound")],
    ));
    let mut tree = Node::branch();
    tree.set(&KeyPath::from("dis/ncelldim"), Value::Int(3));
    tree.set(&KeyPath::from("dimensions/maxbound"), Value::Int(4));
    let ctx = LoadContext::new(".").with_tree(&tree);

    let text = "BEGIN PERIOD 1\n\
                  1 8 8 100.0\n\
                  1 9 9 105.0\n\
                END PERIOD\n";
    let mut stream = LineStream::new(text);
    let block = Block::load(spec.clone(), &mut stream, &ctx).unwrap();
    assert_eq!(block.index(), Some(1));

    let again = reload(&block, spec, &ctx);
    let list = again.get("stress_period_data").unwrap().as_list().unwrap();
    assert_eq!(list.nrows(), 2);
    let cellid = list.get("cellid").unwrap().as_int_array().unwrap();
    assert_eq!(cellid.value().unwrap(), vec![1, 8, 8, 1, 9, 9]);
    let head = list.get("head").unwrap().as_values().unwrap();
    assert_eq!(head.values()[1].as_double(), Some(105.0));
}

#[test]
fn assignment_then_write_round_trips() {
    trace_init();
    let ctx = LoadContext::new(".");
    let mut block = Block::new(options_spec());
    let mut values = IndexMap::new();
    values.insert(
        "save_flows".to_string(),
        Param::Scalar(darcy_core::Scalar::from_value(
            "save_flows",
            darcy_schema::ScalarKind::Keyword,
            Value::Keyword(true),
        )),
    );
    block.set_values(values).unwrap();

    let again = reload(&block, options_spec(), &ctx);
    assert_eq!(
        again.get("save_flows").unwrap().value().unwrap().as_keyword(),
        Some(true)
    );
}
