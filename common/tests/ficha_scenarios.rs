use std::fs;

use common::geo::GeoCatalogs;
use common::model::ficha::{Ficha, FichaStatus};
use common::model::form::Form;
use common::quality::{analyze, analyze_value};
use common::report::{ReportBlock, build_report};
use common::store::{FormAction, FormStore};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn read_json(name: &str) -> Value {
    let raw = fs::read_to_string(fixture_path(name)).expect("fixture missing");
    serde_json::from_str(&raw).expect("fixture is not valid JSON")
}

fn load() -> (Value, Form, Ficha) {
    let schema = read_json("ficha_form.json");
    let form = Form::from_value(&schema).expect("schema does not decode");
    let ficha: Ficha = serde_json::from_value(read_json("ficha_record.json")).expect("record does not decode");
    (schema, form, ficha)
}

#[test]
fn stored_record_matches_golden_quality_report() {
    let (schema, _, ficha) = load();

    let analysis = analyze_value(&schema, &ficha.datos);
    let actual = serde_json::to_value(&analysis).expect("analysis does not serialize");

    assert_eq!(actual, read_json("ficha_quality.json"));
}

#[test]
fn editing_from_scratch_reaches_the_same_score() {
    let (_, form, mut ficha) = load();
    ficha.datos.clear();

    let mut store = FormStore::load(&form, &ficha);
    assert_eq!(store.rows("numero_miembros_data"), &[] as &[Value]);

    store.apply(FormAction::UserSelect {
        name: "numero_miembros".to_string(),
        value: "1".to_string(),
    });
    store.apply(FormAction::AppendRow {
        key: "numero_miembros_data".to_string(),
        columns: vec!["nombres".to_string()],
    });
    store.apply(FormAction::Set {
        name: "jefe_hogar".to_string(),
        value: json!("Manuel Quishpe"),
    });
    store.apply(FormAction::Set {
        name: "direccion".to_string(),
        value: json!("La Tola"),
    });
    assert_eq!(analyze(&form, store.data()).score, 67);

    store.apply(FormAction::SetCell {
        key: "numero_miembros_data".to_string(),
        row: 0,
        column: "nombres".to_string(),
        value: json!("Lucía"),
    });
    assert_eq!(analyze(&form, store.data()).score, 100);
}

#[test]
fn legacy_status_loads_as_pending() {
    let (_, form, ficha) = load();
    assert_eq!(ficha.status, FichaStatus::Pending);

    let update = FormStore::load(&form, &ficha).to_update();
    assert_eq!(update.status, FichaStatus::Pending);
    assert_eq!(update.nombre_familia, "Familia Quishpe");
}

#[test]
fn report_orders_sections_and_formats_audit() {
    let (_, form, ficha) = load();

    let report = build_report(&form, &ficha, &GeoCatalogs::default());

    let titles: Vec<&str> = report.sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["INFORMACIÓN GENERAL", "MIEMBROS"]);
    assert_eq!(
        report.audit.rows[0],
        vec![
            "SM-A155M",
            "2.4.1",
            "Lat: -0.2201 | Lng: -78.5123",
            "Rosa Tipán",
            "18/10/2026 15:42"
        ]
    );
    assert_eq!(report.risk_level, "Riesgo Bajo");
    assert_eq!(
        report.sections[0].blocks,
        vec![ReportBlock::KeyValues {
            entries: vec![
                ("Jefe de hogar".to_string(), "Manuel Quishpe".to_string()),
                ("Dirección".to_string(), "Barrio La Tola, calle Oriente".to_string()),
                ("Número de miembros".to_string(), "1".to_string()),
            ]
        }]
    );
    assert!(report.sections[1].blocks.is_empty());
}
