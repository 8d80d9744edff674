use dollar_suite::chart::{ChartOptions, TimeSeries, render_svg};
use dollar_suite::ingestion::{IngestionOptions, ingest_from_path};
use dollar_suite::processing::{CleaningPipeline, NullPolicy, PipelineConfig, ReduceOp, describe, reduce};
use dollar_suite::store::{TableStore, WriteMode, table_name_for_upload};
use dollar_suite::types::{DataType, Value};

#[test]
fn comma_file_cleans_saves_and_charts() {
    let raw = ingest_from_path("tests/fixtures/carteras.csv", &IngestionOptions::default()).unwrap();

    let config = PipelineConfig {
        keep_columns: Some(vec!["Fecha".into(), "Cartera A".into(), "Cartera B".into()]),
        ..Default::default()
    };
    let clean = CleaningPipeline::new(config).run(&raw).unwrap();

    let a: Vec<Value> = clean.column(1).cloned().collect();
    assert_eq!(
        a,
        vec![
            Value::Float64(1234.56),
            Value::Float64(1300.0),
            Value::Float64(0.0),
            Value::Float64(1280.1),
        ]
    );
    let b: Vec<Value> = clean.column(2).cloned().collect();
    assert_eq!(
        b,
        vec![
            Value::Float64(7.15),
            Value::Float64(7.2),
            Value::Float64(7.05),
            Value::Float64(0.0),
        ]
    );
    assert_eq!(reduce(&clean, "Cartera A", ReduceOp::Max), Some(Value::Float64(1300.0)));

    let mut store = TableStore::open_in_memory().unwrap();
    let name = table_name_for_upload("carteras.csv").unwrap();
    store.save(&name, &clean, WriteMode::Replace).unwrap();
    let back = store.load("carteras").unwrap();
    assert_eq!(back.column_names(), vec!["fecha", "cartera_a", "cartera_b"]);
    assert_eq!(back.schema.fields[1].data_type, DataType::Float64);

    let series = TimeSeries::from_dataset(&clean, "Fecha", "Cartera B").unwrap();
    let svg = render_svg(&series, &ChartOptions::default());
    assert!(svg.contains("Evolution: Cartera B"));
    assert_eq!(svg.matches("<circle").count(), 4);
}

#[test]
fn latin1_file_with_null_drop_and_summary() {
    let raw = ingest_from_path("tests/fixtures/carteras_latin1.csv", &IngestionOptions::default()).unwrap();
    let config = PipelineConfig::from_json_str(
        r#"{
            "rename": {"Cartera Año": "anual"},
            "nulls": "drop",
            "numeric_columns": ["anual", "Cartera B"]
        }"#,
    )
    .unwrap();
    let clean = CleaningPipeline::new(config).run(&raw).unwrap();

    assert_eq!(clean.column_names(), vec!["Fecha", "anual", "Cartera B"]);
    let summary = describe(&clean, "anual").unwrap();
    assert_eq!(summary.count, 3);
    assert_eq!(summary.min, 1234.56);
    assert_eq!(summary.max, 1300.0);
    assert_eq!(summary.p50, 1280.1);

    let b = describe(&clean, "Cartera B").unwrap();
    assert_eq!(b.min, 7.05);
    assert_eq!(b.max, 7.2);
}

#[test]
fn consolidated_table_accumulates_uploads() {
    let mut store = TableStore::open_in_memory().unwrap();
    let config = PipelineConfig {
        nulls: NullPolicy::FillZero,
        keep_columns: Some(vec!["Fecha".into(), "Cartera B".into()]),
        ..Default::default()
    };
    let pipeline = CleaningPipeline::new(config);

    for path in ["tests/fixtures/carteras.csv", "tests/fixtures/carteras_latin1.csv"] {
        let raw = ingest_from_path(path, &IngestionOptions::default()).unwrap();
        let clean = pipeline.run(&raw).unwrap();
        store.save("consolidado", &clean, WriteMode::Append).unwrap();
    }

    let all = store.load("consolidado").unwrap();
    assert_eq!(all.row_count(), 7);
    assert_eq!(all.column_names(), vec!["fecha", "cartera_b"]);
}
