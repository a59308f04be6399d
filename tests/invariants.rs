use serde_json::{Value, json};

use catalogs::config::IndexTableConfig;
use catalogs::data::{Catalog, Record};
use catalogs::fields::FieldPath;
use catalogs::index_table::{IndexDefinition, emit_index_table};
use catalogs::store::catalog_to_bytes;
use catalogs::{CatalogError, aggregate, merge_batch};

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => panic!("fixture must be an object"),
    }
}

fn recipe(id: &str, category: &str) -> Record {
    record(json!({
        "recipeId": id,
        "category": category,
        "ingredients": [{"name": "豆腐", "amount": 300, "unit": "g"}],
        "tags": ["素食", "家常"]
    }))
}

fn key() -> FieldPath {
    FieldPath::new("recipeId")
}

fn catalog_of(size: usize, prefix: &str) -> Catalog {
    (0..size)
        .map(|idx| recipe(&format!("{prefix}_{idx:03}"), if idx % 3 == 0 { "A" } else { "B" }))
        .collect()
}

#[test]
fn disjoint_merge_preserves_both_orders() {
    for (existing_len, batch_len) in [(0, 0), (0, 4), (5, 0), (7, 3), (18, 32)] {
        let existing = catalog_of(existing_len, "old");
        let batch = catalog_of(batch_len, "new").into_records();
        let merged = merge_batch(&existing, &batch, &key()).unwrap();

        assert_eq!(merged.len(), existing_len + batch_len);
        assert_eq!(&merged.records()[..existing_len], existing.records());
        assert_eq!(&merged.records()[existing_len..], batch.as_slice());
    }
}

#[test]
fn any_existing_identifier_in_batch_is_rejected() {
    let existing = catalog_of(6, "old");
    for idx in 0..6 {
        let clash = format!("old_{idx:03}");
        let batch = vec![recipe("fresh", "A"), recipe(&clash, "C")];
        let err = merge_batch(&existing, &batch, &key()).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::DuplicateKey { ref id, .. } if *id == clash
        ));
    }
}

#[test]
fn aggregate_counts_sum_to_catalog_length() {
    for size in [0, 1, 3, 10, 50] {
        let catalog = catalog_of(size, "r");
        let summary = aggregate(&catalog, &FieldPath::new("category"), "unknown");
        assert_eq!(summary.total(), size);
        assert_eq!(summary.count("unknown"), 0);
    }
}

#[test]
fn three_record_catalog_groups_two_to_one() {
    let catalog = Catalog::new(vec![recipe("1", "A"), recipe("2", "A"), recipe("3", "B")]);
    let summary = aggregate(&catalog, &FieldPath::new("category"), "unknown");
    assert_eq!(summary.len(), 2);
    assert_eq!(summary.count("A"), 2);
    assert_eq!(summary.count("B"), 1);
}

#[test]
fn one_new_record_becomes_the_third() {
    let existing = Catalog::new(vec![recipe("1", "A"), recipe("2", "B")]);
    let batch = vec![recipe("3", "A")];
    let merged = merge_batch(&existing, &batch, &key()).unwrap();
    assert_eq!(merged.len(), 3);
    assert_eq!(merged.records()[2], batch[0]);
}

#[test]
fn serialized_catalog_parses_back_to_equal_catalog() {
    let catalog = Catalog::new(vec![
        record(json!({
            "recipeId": "taiwan_vegan_007",
            "name": "台式素卤味",
            "cookingTime": 60,
            "carbonComparison": {
                "meatVersion": "台式卤肉卤味",
                "meatCarbon": 8.5,
                "veganCarbon": 0.7,
                "savingsPercent": 91.8
            },
            "cookingSteps": ["所有食材切块", "锅中加水和香料"],
            "optional": null,
            "seasonal": false
        })),
        record(json!({"recipeId": "emoji", "name": "🌱 sprout", "nested": [[1, 2], {"k": []}]})),
    ]);
    let bytes = catalog_to_bytes(&catalog).unwrap();
    let parsed: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(Catalog::from_value(parsed).unwrap(), catalog);
}

#[test]
fn index_table_scenario_emits_header_and_single_row() {
    let definitions = vec![IndexDefinition::new(
        "users", "idx1", "a", "1", "是", "高", "d", "p",
    )];
    let mut out = Vec::new();
    emit_index_table(
        &definitions,
        &mut out,
        &IndexTableConfig::default().with_bom(false),
    )
    .unwrap();
    let text = String::from_utf8(out).unwrap();
    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(
        rows,
        vec![
            "集合名称,索引名称,索引字段,字段排序,唯一索引,优先级,说明,用途",
            "users,idx1,a,1,是,高,d,p",
        ]
    );
}

#[test]
fn index_table_rows_follow_input_order() {
    let definitions: Vec<IndexDefinition> = ["meals", "users", "audit_logs", "users"]
        .iter()
        .enumerate()
        .map(|(idx, collection)| {
            IndexDefinition::new(*collection, format!("idx{idx}"), "f", "1", "否", "中", "", "")
        })
        .collect();
    let mut out = Vec::new();
    emit_index_table(&definitions, &mut out, &IndexTableConfig::default().with_bom(false))
        .unwrap();
    let text = String::from_utf8(out).unwrap();
    let names: Vec<&str> = text
        .lines()
        .skip(1)
        .map(|row| row.split(',').nth(1).unwrap())
        .collect();
    assert_eq!(names, vec!["idx0", "idx1", "idx2", "idx3"]);
}
