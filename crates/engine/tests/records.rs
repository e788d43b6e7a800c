use std::path::PathBuf;

use chrono::NaiveDate;
use engine::{Amount, Database, DateRange, Engine, EngineError, EntryForm, ExportRequest, Variant};
use uuid::Uuid;

fn scratch_path(prefix: &str, extension: &str) -> PathBuf {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();
    root.join(format!("{prefix}_{}.{extension}", Uuid::new_v4()))
}

async fn engine_with_file_db(variant: Variant) -> (Engine, PathBuf) {
    let path = scratch_path("engine", "db");
    let engine = Engine::builder()
        .database(Database::sqlite(&path))
        .variant(variant)
        .build()
        .await
        .unwrap();
    (engine, path)
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn save(engine: &Engine, date: NaiveDate, revenue: &str, expenses: &str, kind: &str) {
    engine
        .save(&EntryForm::new(date, revenue, expenses, kind))
        .await
        .unwrap();
}

#[tokio::test]
async fn saved_profit_is_revenue_minus_expenses() {
    let (engine, _path) = engine_with_file_db(Variant::Persistent).await;

    let pairs = [("1000", "400"), ("0.1", "0.2"), ("12,5", "0"), ("99999.99", "0.01")];
    for (revenue, expenses) in pairs {
        let saved = engine
            .save(&EntryForm::new(day(2024, 1, 1), revenue, expenses, "Payroll"))
            .await
            .unwrap();
        assert_eq!(saved.profit, saved.revenue - saved.expenses);
    }

    let records = engine.records().await.unwrap();
    assert_eq!(records.len(), pairs.len());
    for record in &records {
        assert_eq!(record.profit, record.revenue - record.expenses);
    }
    assert_eq!(records[1].profit, Amount::new(-10));
}

#[tokio::test]
async fn identical_saves_create_distinct_rows() {
    let (engine, _path) = engine_with_file_db(Variant::Persistent).await;

    save(&engine, day(2024, 2, 1), "10", "5", "Sales").await;
    save(&engine, day(2024, 2, 1), "10", "5", "Sales").await;

    let records = engine.records().await.unwrap();
    assert_eq!(records.len(), 2);
    assert!(records[0].id < records[1].id);
    assert_eq!(records[0].date, records[1].date);
}

#[tokio::test]
async fn rejected_input_writes_nothing() {
    let (engine, _path) = engine_with_file_db(Variant::Persistent).await;

    let err = engine
        .save(&EntryForm::new(day(2024, 1, 1), "", "5", "Payroll"))
        .await
        .unwrap_err();
    assert!(err.is_input_error());

    let err = engine
        .save(&EntryForm::new(day(2024, 1, 1), "5", "5", "Car Purchase"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::UnknownExpenseType("Car Purchase".to_string()));

    assert!(engine.records().await.unwrap().is_empty());
}

#[tokio::test]
async fn ephemeral_delete_removes_every_row_on_that_date() {
    let (engine, _path) = engine_with_file_db(Variant::Ephemeral).await;

    let first = engine
        .save(&EntryForm::new(day(2024, 1, 1), "1000", "400", "Payroll"))
        .await
        .unwrap();
    assert_eq!(first.profit, Amount::new(600_00));
    let second = engine
        .save(&EntryForm::new(day(2024, 1, 1), "200", "50", "Payroll"))
        .await
        .unwrap();
    assert_eq!(second.profit, Amount::new(150_00));
    save(&engine, day(2024, 1, 2), "30", "", "Rent").await;

    let deleted = engine.delete_selected(Some(1)).await.unwrap();

    assert_eq!(deleted, 2);
    let records = engine.records().await.unwrap();
    assert_eq!(records.len(), 1);
    assert!(records.iter().all(|r| r.date != day(2024, 1, 1)));
}

#[tokio::test]
async fn persistent_delete_removes_only_the_selected_id() {
    let (engine, _path) = engine_with_file_db(Variant::Persistent).await;

    for revenue in ["1", "2", "3", "4"] {
        save(&engine, day(2024, 1, 1), revenue, "0", "Sales").await;
    }
    let ids: Vec<i32> = engine.records().await.unwrap().iter().map(|r| r.id).collect();
    assert_eq!(engine.delete_by_id(ids[0]).await.unwrap(), 1);

    // Display rows are now ids[1..]; row 1 is ids[2].
    let deleted = engine.delete_selected(Some(1)).await.unwrap();

    assert_eq!(deleted, 1);
    let remaining: Vec<i32> = engine.records().await.unwrap().iter().map(|r| r.id).collect();
    assert_eq!(remaining, vec![ids[1], ids[3]]);
}

#[tokio::test]
async fn delete_needs_a_valid_selection() {
    let (engine, _path) = engine_with_file_db(Variant::Persistent).await;
    save(&engine, day(2024, 1, 1), "1", "0", "Sales").await;

    assert_eq!(
        engine.delete_selected(None).await.unwrap_err(),
        EngineError::NoSelection
    );
    assert_eq!(
        engine.delete_selected(Some(5)).await.unwrap_err(),
        EngineError::RowNotFound(5)
    );
    assert_eq!(engine.records().await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_by_date_reports_the_count() {
    let (engine, _path) = engine_with_file_db(Variant::Persistent).await;
    save(&engine, day(2024, 3, 1), "1", "0", "Sales").await;
    save(&engine, day(2024, 3, 1), "2", "0", "Sales").await;
    save(&engine, day(2024, 3, 2), "3", "0", "Sales").await;

    assert_eq!(engine.delete_by_date(day(2024, 3, 1)).await.unwrap(), 2);
    assert_eq!(engine.delete_by_date(day(2024, 3, 1)).await.unwrap(), 0);
    assert_eq!(engine.records().await.unwrap().len(), 1);
}

#[tokio::test]
async fn export_round_trips_the_table() {
    let (engine, _path) = engine_with_file_db(Variant::Persistent).await;
    save(&engine, day(2024, 1, 3), "1000", "400", "Payroll").await;
    save(&engine, day(2023, 12, 31), "200.5", "50", "Office Supplies").await;
    save(&engine, day(2024, 1, 1), "0", "75.25", "Utilities").await;

    let output = scratch_path("export", "csv");
    let summary = engine
        .export(&ExportRequest {
            range: None,
            path: Some(output.clone()),
        })
        .await
        .unwrap();
    assert_eq!(summary.rows, 3);

    let mut reader = csv::Reader::from_path(&output).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(
        headers,
        ["id", "date", "revenue", "expenses", "expense_type", "profit"]
    );
    let exported: Vec<(String, f64, f64, String, f64)> = reader
        .deserialize::<(i32, String, f64, f64, String, f64)>()
        .map(|row| {
            let (_id, date, revenue, expenses, kind, profit) = row.unwrap();
            (date, revenue, expenses, kind, profit)
        })
        .collect();

    let expected: Vec<(String, f64, f64, String, f64)> = engine
        .records()
        .await
        .unwrap()
        .iter()
        .map(|r| {
            (
                r.date_text(),
                r.revenue.to_units(),
                r.expenses.to_units(),
                r.expense_type.clone(),
                r.profit.to_units(),
            )
        })
        .collect();
    assert_eq!(exported, expected);

    let _ = std::fs::remove_file(output);
}

#[tokio::test]
async fn export_range_is_inclusive_and_may_be_empty() {
    let (engine, _path) = engine_with_file_db(Variant::Persistent).await;
    save(&engine, day(2024, 1, 1), "1", "0", "Sales").await;
    save(&engine, day(2024, 1, 15), "2", "0", "Sales").await;
    save(&engine, day(2024, 2, 1), "3", "0", "Sales").await;

    let mut out = Vec::new();
    let rows = engine
        .export_to_writer(
            Some(DateRange::new(day(2024, 1, 1), day(2024, 1, 15))),
            &mut out,
        )
        .await
        .unwrap();
    assert_eq!(rows, 2);

    let output = scratch_path("export", "csv");
    let summary = engine
        .export(&ExportRequest {
            range: Some(DateRange::new(day(2025, 1, 1), day(2025, 12, 31))),
            path: Some(output.clone()),
        })
        .await
        .unwrap();
    assert_eq!(summary.rows, 0);
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "id,date,revenue,expenses,expense_type,profit\n"
    );

    let _ = std::fs::remove_file(output);
}

#[tokio::test]
async fn ephemeral_export_needs_a_path() {
    let (engine, _path) = engine_with_file_db(Variant::Ephemeral).await;
    save(&engine, day(2024, 1, 1), "1", "0", "Rent").await;

    assert_eq!(
        engine.export(&ExportRequest::default()).await.unwrap_err(),
        EngineError::MissingExportPath
    );

    let mut out = Vec::new();
    engine.export_to_writer(None, &mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("ID,Date,Revenue,Expenses,Expense Type,Profit\n"));
    assert!(text.ends_with(",2024-01-01,1.00,0.00,Rent,1.00\n"));
}

#[tokio::test]
async fn persistent_start_keeps_previous_data() {
    let path = scratch_path("engine", "db");
    {
        let engine = Engine::builder()
            .database(Database::sqlite(&path))
            .variant(Variant::Persistent)
            .build()
            .await
            .unwrap();
        save(&engine, day(2024, 1, 1), "10", "1", "Sales").await;
    }

    let engine = Engine::builder()
        .database(Database::sqlite(&path))
        .variant(Variant::Persistent)
        .build()
        .await
        .unwrap();
    assert_eq!(engine.records().await.unwrap().len(), 1);
}

#[tokio::test]
async fn ephemeral_start_discards_previous_data() {
    let path = scratch_path("engine", "db");
    {
        let engine = Engine::builder()
            .database(Database::sqlite(&path))
            .variant(Variant::Persistent)
            .build()
            .await
            .unwrap();
        save(&engine, day(2024, 1, 1), "10", "1", "Sales").await;
    }

    let engine = Engine::builder()
        .database(Database::sqlite(&path))
        .variant(Variant::Ephemeral)
        .build()
        .await
        .unwrap();
    assert!(engine.records().await.unwrap().is_empty());
}

#[tokio::test]
async fn table_and_charts_reflect_latest_state() {
    let (engine, _path) = engine_with_file_db(Variant::Ephemeral).await;
    assert!(engine.table().await.unwrap().is_empty());

    save(&engine, day(2024, 4, 2), "300", "100", "Inventory").await;
    save(&engine, day(2024, 4, 1), "50", "80", "Advertising").await;

    let table = engine.table().await.unwrap();
    assert_eq!(
        table.rows,
        vec![
            vec!["2024-04-02", "300.00", "100.00", "Inventory", "200.00"],
            vec!["2024-04-01", "50.00", "80.00", "Advertising", "-30.00"],
        ]
    );

    let series = engine.chart_series().await.unwrap();
    assert_eq!(
        series.profit(),
        vec![(day(2024, 4, 2), 200.0), (day(2024, 4, 1), -30.0)]
    );
}

#[tokio::test]
async fn in_memory_database_keeps_its_connection() {
    let engine = Engine::builder()
        .database(Database::Memory)
        .variant(Variant::Persistent)
        .build()
        .await
        .unwrap();

    save(&engine, day(2024, 1, 1), "5", "2", "Sales").await;
    assert_eq!(engine.records().await.unwrap().len(), 1);
}

#[tokio::test]
async fn largest_amount_keeps_every_cent() {
    let (engine, _path) = engine_with_file_db(Variant::Persistent).await;

    save(&engine, day(2024, 3, 1), "999999999999.99", "0.01", "Sales").await;
    let err = engine
        .save(&EntryForm::new(day(2024, 3, 1), "90071992547409.93", "0.01", "Sales"))
        .await
        .unwrap_err();
    assert!(err.is_input_error());

    let records = engine.records().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].revenue, Amount::MAX);
    assert_eq!(records[0].profit, records[0].revenue - records[0].expenses);
    assert_eq!(records[0].profit.to_string(), "999999999999.98");
}

#[tokio::test]
async fn unreadable_stored_row_is_reported_as_storage_failure() {
    use sea_orm::{ConnectionTrait, Statement};

    let (engine, path) = engine_with_file_db(Variant::Persistent).await;
    save(&engine, day(2024, 1, 1), "1", "0", "Sales").await;

    let db = sea_orm::Database::connect(format!("sqlite:{}?mode=rwc", path.display()))
        .await
        .unwrap();
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "INSERT INTO financial_data (date, revenue, expenses, expense_type, profit) \
         VALUES ('01/02/2024', 1.0, 0.0, 'Sales', 1.0);"
            .to_string(),
    ))
    .await
    .unwrap();
    db.close().await.unwrap();

    let err = engine.table().await.unwrap_err();
    assert_eq!(
        err,
        EngineError::CorruptRecord {
            id: 2,
            date: "01/02/2024".to_string()
        }
    );
    assert!(!err.is_input_error());
}
