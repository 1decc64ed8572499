mod common;

use std::fs;

use wishcalc::{
    core::AllocationEngine,
    domain::{Importance, Item, WishList},
    export::{export_csv_to_path, ExportOptions, ExportScope, CSV_HEADERS},
};

use common::temp_dir;

fn nested_list() -> WishList {
    let mut list = WishList::with_cash(100, 0);
    list.items = vec![
        Item::group(
            "Garden",
            vec![
                Item::new("Hose", 25),
                Item::group("Tools", vec![Item::new("Rake", 15)]),
            ],
        ),
        Item::new("Chair, folding", 40).with_importance(Importance::Low),
    ];
    AllocationEngine::recalculate(&mut list);
    list
}

#[test]
fn writes_every_node_with_depth_indentation() {
    let dir = temp_dir();
    let path = dir.join("out.csv");
    let rows = export_csv_to_path(&nested_list(), ExportOptions::default(), &path).unwrap();
    assert_eq!(rows, 5);

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], CSV_HEADERS.join(","));
    assert!(lines[1].starts_with("Garden,40,1,40,"));
    assert!(lines[2].starts_with("  Hose,25"));
    assert!(lines[3].starts_with("  Tools,15"));
    assert!(lines[4].starts_with("    Rake,15"));
    assert!(lines[5].starts_with("\"Chair, folding\",40"));
}

#[test]
fn checked_scope_keeps_descendants_of_checked_nodes() {
    let mut list = nested_list();
    list.items[0].children[1].selected = true;
    let dir = temp_dir();
    let path = dir.join("checked.csv");

    let options = ExportOptions {
        human_readable: true,
        scope: ExportScope::CheckedOnly,
    };
    let rows = export_csv_to_path(&list, options, &path).unwrap();
    assert_eq!(rows, 2);

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[1].starts_with("Tools,"));
    assert!(lines[2].starts_with("  Rake,"));
    assert!(lines[2].ends_with(",нет,нет"));
}
