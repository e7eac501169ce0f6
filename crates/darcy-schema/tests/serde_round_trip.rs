// Schema tables serialize cleanly: definitions can be dumped and reloaded
// without losing structure.

use darcy_schema::{BlockSpec, ParamSpec, ShapeExpr, Value};

#[test]
fn block_spec_survives_json() {
    let spec = BlockSpec::new(
        "griddata",
        vec![
            ParamSpec::double_array("strt", ShapeExpr::named("dis/nodes"))
                .layered()
                .required()
                .with_longname("starting head"),
            ParamSpec::int("nlay").with_default(Value::Int(1)),
        ],
    );
    let json = serde_json::to_string(&spec).unwrap();
    let back: BlockSpec = serde_json::from_str(&json).unwrap();
    assert_eq!(spec, back);
}

#[test]
fn shape_expr_variants_survive_json() {
    for shape in [
        ShapeExpr::Scalar,
        ShapeExpr::Free,
        ShapeExpr::fixed(&[2, 3]),
        ShapeExpr::named("dis/ncelldim"),
        ShapeExpr::RowDependent("ncvert".to_string()),
    ] {
        let json = serde_json::to_string(&shape).unwrap();
        let back: ShapeExpr = serde_json::from_str(&json).unwrap();
        assert_eq!(shape, back);
    }
}
