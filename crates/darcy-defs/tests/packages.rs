// End-to-end package loading against the static definitions: full block
// sequences for DIS, CHD, and OC as they appear in input files.

use std::sync::Arc;

use darcy_core::{Block, Blocks, LineStream, LoadContext, Node};
use darcy_schema::{KeyPath, Value};
use darcy_defs::{chd, dis, ic, oc};

fn dis_tree(nlay: i64, nrow: i64, ncol: i64) -> Node {
    let mut root = Node::branch();
    root.set(&KeyPath::from("dis/nlay"), Value::Int(nlay));
    root.set(&KeyPath::from("dis/nrow"), Value::Int(nrow));
    root.set(&KeyPath::from("dis/ncol"), Value::Int(ncol));
    root.set(&KeyPath::from("dis/ncelldim"), Value::Int(3));
    root
}

#[test]
fn dis_package_loads_and_round_trips() {
    let text = "BEGIN OPTIONS\n\
                  LENGTH_UNITS METERS\n\
                  NOGRB\n\
                END OPTIONS\n\
                \n\
                BEGIN DIMENSIONS\n\
                  NLAY 2\n\
                  NROW 2\n\
                  NCOL 3\n\
                END DIMENSIONS\n\
                \n\
                BEGIN GRIDDATA\n\
                  DELR\n\
                    CONSTANT 4.0\n\
                  DELC\n\
                    CONSTANT 4.0\n\
                  TOP\n\
                    CONSTANT 0.0\n\
                  BOTM LAYERED\n\
                    CONSTANT -5.0\n\
                    INTERNAL\n\
                      -10.0 -10.0 -10.0 -10.0 -10.0 -10.0\n\
                END GRIDDATA\n";
    let tree = dis_tree(2, 2, 3);
    let ctx = LoadContext::new(".").with_tree(&tree);
    let mut stream = LineStream::new(text);

    let options = Block::load(Arc::new(dis::options()), &mut stream, &ctx).unwrap();
    let dimensions = Block::load(Arc::new(dis::dimensions()), &mut stream, &ctx).unwrap();
    let griddata = Block::load(Arc::new(dis::griddata()), &mut stream, &ctx).unwrap();

    assert_eq!(
        options.get("length_units").unwrap().value().unwrap().as_str(),
        Some("METERS")
    );
    assert_eq!(
        dimensions.get("nlay").unwrap().value().unwrap().as_int(),
        Some(2)
    );
    let botm = griddata.get("botm").unwrap().as_double_array().unwrap();
    assert_eq!(botm.nlay(), 2);
    assert_eq!(botm.layer_value(0).unwrap(), vec![-5.0; 6]);
    assert_eq!(botm.layer_value(1).unwrap(), vec![-10.0; 6]);

    let mut blocks = Blocks::new();
    blocks.insert(options);
    blocks.insert(dimensions);
    blocks.insert(griddata.clone());
    let mut out = Vec::new();
    blocks.write(&mut out).unwrap();
    let rendered = String::from_utf8(out).unwrap();

    // everything loads back to the same resolved values
    let mut stream = LineStream::new(&rendered);
    let _ = Block::load(Arc::new(dis::options()), &mut stream, &ctx).unwrap();
    let _ = Block::load(Arc::new(dis::dimensions()), &mut stream, &ctx).unwrap();
    let griddata2 = Block::load(Arc::new(dis::griddata()), &mut stream, &ctx).unwrap();
    let botm2 = griddata2.get("botm").unwrap().as_double_array().unwrap();
    assert_eq!(botm.value().unwrap(), botm2.value().unwrap());
}

#[test]
fn chd_package_with_period_rows() {
    let mut tree = dis_tree(2, 10, 10);
    tree.set(&KeyPath::from("chd/maxbound"), Value::Int(2));
    let ctx = LoadContext::new(".").with_tree(&tree);

    let text = "BEGIN OPTIONS\n\
                  PRINT_INPUT\n\
                  SAVE_FLOWS\n\
                END OPTIONS\n\
                \n\
                BEGIN DIMENSIONS\n\
                  MAXBOUND 2\n\
                END DIMENSIONS\n\
                \n\
                BEGIN PERIOD 1\n\
                  1 8 8 100.0\n\
                  1 9 9 105.0\n\
                END PERIOD\n";
    let mut stream = LineStream::new(text);
    let _options = Block::load(Arc::new(chd::options()), &mut stream, &ctx).unwrap();
    let dimensions = Block::load(Arc::new(chd::dimensions()), &mut stream, &ctx).unwrap();
    let period = Block::load(Arc::new(chd::period()), &mut stream, &ctx).unwrap();

    assert_eq!(
        dimensions.get("maxbound").unwrap().value().unwrap().as_int(),
        Some(2)
    );
    assert_eq!(period.index(), Some(1));
    let list = period.get("stress_period_data").unwrap().as_list().unwrap();
    assert_eq!(list.nrows(), 2);
    let cellid = list.get("cellid").unwrap().as_int_array().unwrap();
    assert_eq!(cellid.shape(), &[2, 3]);
    assert_eq!(cellid.value().unwrap(), vec![1, 8, 8, 1, 9, 9]);
    let head = list.get("head").unwrap().as_values().unwrap();
    assert_eq!(head.values()[0].as_double(), Some(100.0));
    assert_eq!(head.values()[1].as_double(), Some(105.0));
}

#[test]
fn chd_period_rejects_rows_beyond_maxbound() {
    let mut tree = dis_tree(2, 10, 10);
    tree.set(&KeyPath::from("chd/maxbound"), Value::Int(1));
    let ctx = LoadContext::new(".").with_tree(&tree);

    let text = "BEGIN PERIOD 1\n\
                  1 8 8 100.0\n\
                  1 9 9 105.0\n\
                END PERIOD\n";
    let mut stream = LineStream::new(text);
    let err = Block::load(Arc::new(chd::period()), &mut stream, &ctx).unwrap_err();
    assert!(matches!(
        err,
        darcy_core::Error::BoundExceeded { count: 2, bound: 1 }
    ));
}

#[test]
fn ic_starting_head_is_layered() {
    let tree = dis_tree(2, 1, 3);
    let ctx = LoadContext::new(".").with_tree(&tree);
    let text = "BEGIN GRIDDATA\n\
                  STRT LAYERED\n\
                    CONSTANT 10.0\n\
                    INTERNAL FACTOR 0.5\n\
                      8.0 8.0 8.0\n\
                END GRIDDATA\n";
    let mut stream = LineStream::new(text);
    let griddata = Block::load(Arc::new(ic::griddata()), &mut stream, &ctx).unwrap();
    let strt = griddata.get("strt").unwrap().as_double_array().unwrap();
    assert_eq!(strt.layer_value(0).unwrap(), vec![10.0; 3]);
    assert_eq!(strt.layer_value(1).unwrap(), vec![4.0; 3]);
    assert_eq!(strt.factor(), vec![1.0, 0.5]);
}

#[test]
fn ic_starting_head_from_external_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("strt_l1.txt"), "10.0 10.0 10.0\n").unwrap();
    std::fs::write(dir.path().join("strt_l2.txt"), "8.0 8.0 8.0\n").unwrap();

    let tree = dis_tree(2, 1, 3);
    let ctx = LoadContext::new(dir.path()).with_tree(&tree);
    let text = "BEGIN GRIDDATA\n\
                  STRT LAYERED\n\
                    OPEN strt_l1.txt\n\
                    OPEN strt_l2.txt FACTOR 2.0\n\
                END GRIDDATA\n";
    let mut stream = LineStream::new(text);
    let griddata = Block::load(Arc::new(ic::griddata()), &mut stream, &ctx).unwrap();
    let strt = griddata.get("strt").unwrap().as_double_array().unwrap();
    assert_eq!(strt.layer_value(0).unwrap(), vec![10.0; 3]);
    assert_eq!(strt.layer_value(1).unwrap(), vec![16.0; 3]);
}

#[test]
fn oc_period_records_parse_unions() {
    let ctx = LoadContext::new(".");
    let text = "BEGIN PERIOD 1\n\
                  SAVERECORD HEAD ALL\n\
                  PRINTRECORD BUDGET STEPS 1 3 5\n\
                END PERIOD\n";
    let mut stream = LineStream::new(text);
    let period = Block::load(Arc::new(oc::period()), &mut stream, &ctx).unwrap();

    let save = period.get("saverecord").unwrap().as_record().unwrap();
    assert_eq!(
        save.get("rtype").unwrap().value().unwrap().as_str(),
        Some("HEAD")
    );
    let save_setting = save.get("ocsetting").unwrap().as_keystring().unwrap();
    assert_eq!(
        save_setting.get("all").unwrap().value().unwrap().as_keyword(),
        Some(true)
    );

    let print = period.get("printrecord").unwrap().as_record().unwrap();
    let print_setting = print.get("ocsetting").unwrap().as_keystring().unwrap();
    let steps = print_setting.get("steps").unwrap().as_int_array().unwrap();
    assert_eq!(steps.value().unwrap(), vec![1, 3, 5]);
}

#[test]
fn oc_options_print_format_record() {
    let ctx = LoadContext::new(".");
    let text = "BEGIN OPTIONS\n\
                  BUDGET_FILE flow.cbc\n\
                  HEAD_FILE flow.hds\n\
                  PRINT_FORMAT COLUMNS 10 WIDTH 15 DIGITS 6 GENERAL\n\
                END OPTIONS\n";
    let mut stream = LineStream::new(text);
    let options = Block::load(Arc::new(oc::options()), &mut stream, &ctx).unwrap();

    let record = options.get("print_format").unwrap().as_record().unwrap();
    assert_eq!(
        record.get("ncolumns").unwrap().value().unwrap().as_int(),
        Some(10)
    );
    assert_eq!(
        record.get("ndigits").unwrap().value().unwrap().as_int(),
        Some(6)
    );
    assert_eq!(
        record.get("array_format").unwrap().value().unwrap().as_str(),
        Some("GENERAL")
    );
}
