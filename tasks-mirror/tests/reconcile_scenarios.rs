use common::{FakeNotion, FakeTasks, Write, task};
use tasks_mirror::connectors::google_tasks::Task;
use tasks_mirror::connectors::notion::{DatabasePage, Properties, PropertyValue};
use tasks_mirror::sync::{Pass, PassSummary, Reconciler, schema};

mod common;

const DATABASE_ID: &str = "db-test";

fn mirror_row(id: &str, title: &str, list: &str, status: &str) -> DatabasePage {
    let mut properties = Properties::new();
    properties.insert(schema::NAME.into(), PropertyValue::title(title));
    properties.insert(schema::LIST.into(), PropertyValue::rich_text(list));
    properties.insert(schema::STATUS.into(), PropertyValue::select(status));
    DatabasePage {
        id: id.into(),
        properties,
    }
}

#[tokio::test]
async fn inserts_task_missing_from_empty_mirror() {
    // Arrange
    let tasks = FakeTasks::new(10);
    tasks.add_list("l1", "Work", vec![task("Write report", "needsAction")]);
    let notion = FakeNotion::new(100);
    let reconciler = Reconciler::new(&tasks, &notion, DATABASE_ID);

    // Act
    let summary = reconciler.run_pass().await.expect("pass should succeed");

    // Assert
    assert_eq!(summary.inserted, 1);
    let writes = notion.writes();
    assert_eq!(writes.len(), 1);
    let Write::Create(properties) = &writes[0] else {
        panic!("Expected a create, got {:?}", writes[0]);
    };
    assert_eq!(properties[schema::NAME].first_text(), Some("Write report"));
    assert_eq!(properties[schema::LIST].first_text(), Some("Work"));
    assert_eq!(properties[schema::STATUS].select_label(), Some("needsAction"));
    for date in [
        schema::START_DATE,
        schema::DUE_DATE,
        schema::COMPLETED_AT,
        schema::UPDATED_AT,
    ] {
        assert!(!properties.contains_key(date), "{} should be omitted", date);
    }
}

#[tokio::test]
async fn updates_status_and_completion_of_existing_task() {
    // Arrange
    let tasks = FakeTasks::new(10);
    tasks.add_list(
        "l1",
        "Work",
        vec![Task {
            completed: Some("2024-01-01".into()),
            ..task("Write report", "completed")
        }],
    );
    let notion = FakeNotion::with_rows(
        100,
        vec![mirror_row("page-a", "Write report", "Work", "needsAction")],
    );
    let reconciler = Reconciler::new(&tasks, &notion, DATABASE_ID);

    // Act
    let summary = reconciler.run_pass().await.expect("pass should succeed");

    // Assert
    assert_eq!(
        summary,
        PassSummary {
            inserted: 0,
            updated: 1,
            unchanged: 0
        }
    );
    let writes = notion.writes();
    let [Write::Update(page_id, properties)] = writes.as_slice() else {
        panic!("Expected exactly one update, got {:?}", writes);
    };
    assert_eq!(page_id, "page-a");
    assert_eq!(properties[schema::STATUS].select_label(), Some("completed"));
    assert_eq!(
        properties[schema::COMPLETED_AT].date_start(),
        Some("2024-01-01")
    );
}

#[tokio::test]
async fn skips_unchanged_task_without_writing() {
    // Arrange
    let tasks = FakeTasks::new(10);
    tasks.add_list("l1", "Home", vec![task("Pay bills", "needsAction")]);
    let notion = FakeNotion::with_rows(
        100,
        vec![mirror_row("page-b", "Pay bills", "Home", "needsAction")],
    );
    let reconciler = Reconciler::new(&tasks, &notion, DATABASE_ID);

    // Act
    let summary = reconciler.run_pass().await.expect("pass should succeed");

    // Assert
    assert_eq!(summary.unchanged, 1);
    assert!(notion.writes().is_empty());
}

#[tokio::test]
async fn fetches_every_page_before_reconciling() {
    // Arrange: page size 1 forces pagination of both lists and tasks
    let tasks = FakeTasks::new(1);
    tasks.add_list(
        "l1",
        "Work",
        vec![task("First", "needsAction"), task("Second", "needsAction")],
    );
    tasks.add_list("l2", "Home", vec![task("Third", "completed")]);
    let notion = FakeNotion::new(1);
    let reconciler = Reconciler::new(&tasks, &notion, DATABASE_ID);

    // Act
    let summary = reconciler.run_pass().await.expect("pass should succeed");

    // Assert
    assert_eq!(summary.inserted, 3);
    let titles: Vec<String> = notion
        .rows()
        .iter()
        .filter_map(|row| row.properties[schema::NAME].first_text().map(String::from))
        .collect();
    assert_eq!(titles, vec!["First", "Second", "Third"]);
}

#[tokio::test]
async fn second_pass_without_source_change_writes_nothing() {
    // Arrange
    let tasks = FakeTasks::new(2);
    tasks.add_list(
        "l1",
        "Work",
        vec![
            Task {
                notes: Some("quarterly numbers".into()),
                due: Some("2024-02-01T00:00:00.000Z".into()),
                updated: Some("2024-01-15T12:00:00.000Z".into()),
                ..task("Write report", "needsAction")
            },
            task("Review PR", "completed"),
            task("Plan sprint", "needsAction"),
        ],
    );
    let notion = FakeNotion::new(2);
    let reconciler = Reconciler::new(&tasks, &notion, DATABASE_ID);
    reconciler.run_pass().await.expect("first pass should succeed");
    notion.clear_writes();

    // Act
    let summary = reconciler.run_pass().await.expect("second pass should succeed");

    // Assert
    assert_eq!(summary.writes(), 0);
    assert_eq!(summary.unchanged, 3);
    assert!(notion.writes().is_empty());
}

#[tokio::test]
async fn update_never_clears_field_missing_from_source() {
    // Arrange
    let tasks = FakeTasks::new(10);
    tasks.add_list(
        "l1",
        "Work",
        vec![Task {
            notes: Some("keep me".into()),
            ..task("Write report", "needsAction")
        }],
    );
    let notion = FakeNotion::new(100);
    let reconciler = Reconciler::new(&tasks, &notion, DATABASE_ID);
    reconciler.run_pass().await.expect("first pass should succeed");
    tasks.set_tasks("l1", vec![task("Write report", "completed")]);
    notion.clear_writes();

    // Act
    reconciler.run_pass().await.expect("second pass should succeed");

    // Assert
    let writes = notion.writes();
    let [Write::Update(_, properties)] = writes.as_slice() else {
        panic!("Expected exactly one update, got {:?}", writes);
    };
    assert!(!properties.contains_key(schema::DESCRIPTION));
    let row = &notion.rows()[0];
    assert_eq!(
        row.properties[schema::DESCRIPTION].first_text(),
        Some("keep me")
    );
    assert_eq!(row.properties[schema::STATUS].select_label(), Some("completed"));
}

#[tokio::test]
async fn duplicate_source_tasks_insert_once_with_last_values() {
    // Arrange
    let tasks = FakeTasks::new(10);
    tasks.add_list(
        "l1",
        "Work",
        vec![
            task("Standup", "needsAction"),
            task("Standup", "completed"),
        ],
    );
    let notion = FakeNotion::new(100);
    let reconciler = Reconciler::new(&tasks, &notion, DATABASE_ID);

    // Act
    let summary = reconciler.run_pass().await.expect("pass should succeed");

    // Assert
    assert_eq!(summary.inserted, 1);
    let rows = notion.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].properties[schema::STATUS].select_label(),
        Some("completed")
    );
}

#[tokio::test]
async fn same_title_in_different_lists_are_separate_records() {
    // Arrange
    let tasks = FakeTasks::new(10);
    tasks.add_list("l1", "Work", vec![task("Groceries", "needsAction")]);
    tasks.add_list("l2", "Home", vec![task("Groceries", "needsAction")]);
    let notion = FakeNotion::with_rows(
        100,
        vec![mirror_row("page-h", "Groceries", "Home", "needsAction")],
    );
    let reconciler = Reconciler::new(&tasks, &notion, DATABASE_ID);

    // Act
    let summary = reconciler.run_pass().await.expect("pass should succeed");

    // Assert
    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.unchanged, 1);
}

#[tokio::test]
async fn mirror_rows_without_identity_are_ignored() {
    // Arrange
    let tasks = FakeTasks::new(10);
    tasks.add_list("l1", "Work", vec![task("Write report", "needsAction")]);
    let mut orphan = mirror_row("page-x", "Write report", "Work", "needsAction");
    orphan.properties.remove(schema::LIST);
    let notion = FakeNotion::with_rows(100, vec![orphan]);
    let reconciler = Reconciler::new(&tasks, &notion, DATABASE_ID);

    // Act
    let summary = reconciler.run_pass().await.expect("pass should succeed");

    // Assert
    assert_eq!(summary.inserted, 1);
    assert_eq!(notion.rows().len(), 2);
}

#[tokio::test]
async fn list_with_blank_title_is_skipped_every_pass() {
    // Arrange
    let tasks = FakeTasks::new(10);
    tasks.add_list("l1", "", vec![task("Write report", "needsAction")]);
    tasks.add_list("l2", "Home", vec![task("Pay bills", "needsAction")]);
    let notion = FakeNotion::new(100);
    let reconciler = Reconciler::new(&tasks, &notion, DATABASE_ID);

    // Act
    let first = reconciler.run_pass().await.expect("first pass should succeed");
    let second = reconciler.run_pass().await.expect("second pass should succeed");

    // Assert
    assert_eq!(first.inserted, 1);
    assert_eq!(second.writes(), 0);
    let rows = notion.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].properties[schema::LIST].first_text(), Some("Home"));
}
