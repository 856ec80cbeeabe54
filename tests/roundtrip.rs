mod common;

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Reader};
use sheetjoin::model::CellValue;
use sheetjoin::{export, join, load, validate, JoinKind, Table};

#[test]
fn test_export_then_load_preserves_table() {
    let table = Table::from_rows(
        &["sku", "qty", "price", "note"],
        vec![
            vec!["A-1".into(), CellValue::Int(3), CellValue::Float(9.99), "first".into()],
            vec!["A-2".into(), CellValue::Int(0), CellValue::Float(-1.5), CellValue::Null],
            vec!["007".into(), CellValue::Int(12), CellValue::Float(0.25), "lead zeros".into()],
        ],
    );

    let loaded = load(&export(&table).unwrap(), 0).unwrap();

    assert_eq!(loaded.column_names(), table.column_names());
    assert_eq!(loaded.row_count(), 3);
    assert_eq!(loaded.rows[0].cells[0], CellValue::from("A-1"));
    assert_eq!(loaded.rows[0].cells[1], CellValue::Int(3));
    assert_eq!(loaded.rows[0].cells[2], CellValue::Float(9.99));
    assert!(loaded.rows[1].cells[3].is_null());
    // Text that looks numeric stays text
    assert_eq!(loaded.rows[2].cells[0], CellValue::from("007"));
}

#[test]
fn test_export_writes_single_named_sheet() {
    let bytes = export(&common::people()).unwrap();
    let workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["MergedData".to_string()]);
}

#[test]
fn test_scenario_through_files() {
    let a = load(&export(&common::people()).unwrap(), 0).unwrap();
    let b = load(&export(&common::values()).unwrap(), 0).unwrap();

    let keys = validate(&a, "id", &b, "id").unwrap();
    assert_eq!(keys.iter().collect::<Vec<_>>(), vec!["2"]);

    let inner = join(&a, "id", &b, "id", JoinKind::Inner).unwrap();
    assert_eq!(inner.column_names(), vec!["id", "name", "val"]);
    assert_eq!(inner.row_count(), 1);
    assert_eq!(inner.rows[0].cells, vec![CellValue::Int(2), "y".into(), "p".into()]);

    let left = join(&a, "id", &b, "id", JoinKind::Left).unwrap();
    assert_eq!(left.row_count(), 2);
    assert_eq!(
        left.rows[0].cells,
        vec![CellValue::Int(1), "x".into(), CellValue::Null]
    );

    let full = join(&a, "id", &b, "id", JoinKind::FullOuter).unwrap();
    let ids: Vec<&CellValue> = full.column_values(0).collect();
    assert_eq!(ids, vec![&CellValue::Int(1), &CellValue::Int(2), &CellValue::Int(3)]);
    assert_eq!(full.rows[2].cells, vec![CellValue::Int(3), CellValue::Null, "q".into()]);
}

#[test]
fn test_merged_result_survives_export() {
    let a = common::people();
    let b = common::values();
    let merged = join(&a, "id", &b, "id", JoinKind::FullOuter).unwrap();

    let reloaded = load(&export(&merged).unwrap(), 0).unwrap();

    assert_eq!(reloaded.column_names(), merged.column_names());
    assert_eq!(reloaded.row_count(), merged.row_count());
    for (got, want) in reloaded.rows.iter().zip(&merged.rows) {
        assert_eq!(got.cells, want.cells);
    }
}

#[test]
fn test_left_join_row_count_matches_multiplicity() {
    // Left keys 0..20, right has two rows for every even key
    let left = Table::from_rows(
        &["k"],
        (0..20).map(|i| vec![CellValue::Int(i)]).collect(),
    );
    let right = Table::from_rows(
        &["k", "tag"],
        (0..20)
            .filter(|i| i % 2 == 0)
            .flat_map(|i| {
                vec![
                    vec![CellValue::Int(i), "a".into()],
                    vec![CellValue::Int(i), "b".into()],
                ]
            })
            .collect(),
    );

    let merged = join(&left, "k", &right, "k", JoinKind::Left).unwrap();
    // 10 odd keys once, 10 even keys twice
    assert_eq!(merged.row_count(), 30);

    let inner = join(&left, "k", &right, "k", JoinKind::Inner).unwrap();
    assert_eq!(inner.row_count(), 20);
}
