use kanban_core::{
    DataError, DataField, KanbanStore, Outcome, Period, RepoError, Task, TaskStatus,
};

fn ready_store() -> KanbanStore {
    let mut store = KanbanStore::new();
    assert_eq!(store.connect_in_memory(), Outcome::Success);
    assert_eq!(store.create_schema(), Outcome::Success);
    store
}

fn sprint(store: &KanbanStore, name: &str) -> Period {
    store
        .periods()
        .unwrap()
        .create_period(name, "01/01/25", "01/14/25")
        .unwrap()
}

#[test]
fn create_task_starts_unassigned_and_trimmed() {
    let store = ready_store();
    let tasks = store.tasks().unwrap();

    let task = tasks
        .create_task("  Test Task  ", "Test Description", "  Test Project ")
        .unwrap();

    assert_eq!(task.title, "Test Task");
    assert_eq!(task.project, "Test Project");
    assert_eq!(task.description.as_deref(), Some("Test Description"));
    assert_eq!(task.status, TaskStatus::Unassigned);
    assert_eq!(task.period_id, None);
    assert_eq!(task.resource, None);
    assert!(task.todo_at.is_none() && task.inwork_at.is_none() && task.completed_at.is_none());
}

#[test]
fn empty_description_is_stored_as_null() {
    let store = ready_store();
    let task = store
        .tasks()
        .unwrap()
        .create_task("Test Task", "   ", "Test Project")
        .unwrap();
    assert_eq!(task.description, None);
}

#[test]
fn blank_title_or_project_is_rejected() {
    let store = ready_store();
    let tasks = store.tasks().unwrap();

    let err = tasks.create_task("   ", "", "Project").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(DataError::EmptyField(DataField::TaskTitle))
    ));
    let err = tasks.create_task("Title", "", "").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(DataError::EmptyField(DataField::TaskProject))
    ));

    assert!(tasks.unassigned_tasks().unwrap().is_empty());
}

#[test]
fn full_lifecycle_sets_status_and_timestamps() {
    let store = ready_store();
    let period = sprint(&store, "Sprint 1");
    let tasks = store.tasks().unwrap();
    let created = tasks.create_task("Ship it", "", "Release").unwrap();

    let planned = tasks.move_to_todo(created.id, period.id).unwrap();
    assert_eq!(planned.status, TaskStatus::Todo);
    assert_eq!(planned.period_id, Some(period.id));
    let todo_at = planned.todo_at.unwrap();
    assert!(todo_at >= created.created_at);

    let started = tasks.start_task(created.id).unwrap();
    assert_eq!(started.status, TaskStatus::InWork);
    let inwork_at = started.inwork_at.unwrap();
    assert!(inwork_at >= todo_at);

    let done = tasks.complete_task(created.id).unwrap();
    assert_eq!(done.status, TaskStatus::Completed);
    assert!(done.completed_at.unwrap() >= inwork_at);
    assert_eq!(done.todo_at, Some(todo_at));
}

#[test]
fn out_of_order_moves_are_rejected() {
    let store = ready_store();
    let period = sprint(&store, "Sprint 1");
    let tasks = store.tasks().unwrap();
    let task = tasks.create_task("Title", "", "Project").unwrap();

    let err = tasks.start_task(task.id).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(DataError::InvalidTransition {
            from: TaskStatus::Unassigned,
            to: TaskStatus::InWork,
            ..
        })
    ));
    assert!(tasks.complete_task(task.id).is_err());

    tasks.move_to_todo(task.id, period.id).unwrap();
    tasks.start_task(task.id).unwrap();
    tasks.complete_task(task.id).unwrap();
    let err = tasks.move_to_todo(task.id, period.id).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let stored = tasks.get_task(task.id).unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::Completed);
}

#[test]
fn planned_task_can_move_to_another_period() {
    let store = ready_store();
    let first = sprint(&store, "Sprint 1");
    let second = sprint(&store, "Sprint 2");
    let tasks = store.tasks().unwrap();
    let task = tasks.create_task("Title", "", "Project").unwrap();

    tasks.move_to_todo(task.id, first.id).unwrap();
    let moved = tasks.move_to_todo(task.id, second.id).unwrap();

    assert_eq!(moved.period_id, Some(second.id));
    assert!(tasks.tasks_by_period(first.id).unwrap().is_empty());
    assert_eq!(tasks.tasks_by_period(second.id).unwrap().len(), 1);
}

#[test]
fn moves_on_missing_records_are_not_found() {
    let store = ready_store();
    let period = sprint(&store, "Sprint 1");
    let tasks = store.tasks().unwrap();
    let task = tasks.create_task("Title", "", "Project").unwrap();

    let err = tasks.move_to_todo(999, period.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "task", id: 999 }));

    let err = tasks.move_to_todo(task.id, 999).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "period", id: 999 }));
    assert_eq!(
        tasks.get_task(task.id).unwrap().unwrap().status,
        TaskStatus::Unassigned
    );

    let err = tasks.assign_resource(999, "alice").unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "task", .. }));
}

#[test]
fn assign_resource_sets_and_clears() {
    let store = ready_store();
    let tasks = store.tasks().unwrap();
    let task = tasks.create_task("Title", "", "Project").unwrap();

    let assigned = tasks.assign_resource(task.id, " alice ").unwrap();
    assert_eq!(assigned.resource.as_deref(), Some("alice"));

    let cleared = tasks.assign_resource(task.id, "").unwrap();
    assert_eq!(cleared.resource, None);
}

#[test]
fn board_and_backlog_queries_split_by_status() {
    let store = ready_store();
    let period = sprint(&store, "Sprint 1");
    let tasks = store.tasks().unwrap();
    let backlog = tasks.create_task("Backlog", "", "Project").unwrap();
    let planned = tasks.create_task("Planned", "", "Project").unwrap();
    let working = tasks.create_task("Working", "", "Project").unwrap();
    tasks.move_to_todo(planned.id, period.id).unwrap();
    tasks.move_to_todo(working.id, period.id).unwrap();
    tasks.start_task(working.id).unwrap();

    let board: Vec<(String, TaskStatus)> = tasks
        .tasks_by_period(period.id)
        .unwrap()
        .into_iter()
        .map(|task| (task.title, task.status))
        .collect();
    assert_eq!(
        board,
        vec![
            ("Planned".to_string(), TaskStatus::Todo),
            ("Working".to_string(), TaskStatus::InWork),
        ]
    );

    let unassigned: Vec<Task> = tasks.unassigned_tasks().unwrap();
    assert_eq!(unassigned.len(), 1);
    assert_eq!(unassigned[0].id, backlog.id);
}

#[test]
fn history_joins_period_names() {
    let store = ready_store();
    let first = sprint(&store, "Sprint 1");
    let second = sprint(&store, "Sprint 2");
    let tasks = store.tasks().unwrap();
    let a = tasks.create_task("A", "", "Project").unwrap();
    let b = tasks.create_task("B", "", "Project").unwrap();
    tasks.create_task("C", "", "Project").unwrap();
    tasks.move_to_todo(a.id, first.id).unwrap();
    tasks.move_to_todo(b.id, second.id).unwrap();

    let all = tasks.task_history(None).unwrap();
    let names: Vec<Option<&str>> = all.iter().map(|e| e.period_name.as_deref()).collect();
    assert_eq!(names, vec![Some("Sprint 1"), Some("Sprint 2"), None]);

    let only_second = tasks.task_history(Some(second.id)).unwrap();
    assert_eq!(only_second.len(), 1);
    assert_eq!(only_second[0].task.id, b.id);
}

#[test]
fn records_serialize_with_storage_status_names() {
    let store = ready_store();
    let task = store
        .tasks()
        .unwrap()
        .create_task("Title", "", "Project")
        .unwrap();

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["status"], "unassigned");
    assert_eq!(json["title"], "Title");

    let history = store.tasks().unwrap().task_history(None).unwrap();
    let json = serde_json::to_value(&history[0]).unwrap();
    assert_eq!(json["id"], task.id);
    assert!(json["period_name"].is_null());
}
