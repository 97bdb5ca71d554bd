//! Command handlers over `KanbanStore`.

use crate::cli::{Commands, PeriodCommand, PeriodSelector, TaskCommand};
use kanban_core::{parse_period_date, KanbanStore, Period, SchemaReport, Task, TaskHistoryEntry};
use serde::Serialize;
use std::error::Error;

pub type CliResult = Result<(), Box<dyn Error>>;

/// Runs one command against an already connected store.
pub fn run(store: &mut KanbanStore, command: Commands, json: bool) -> CliResult {
    let out = Printer { json };
    match command {
        Commands::Init => init(store, &out),
        Commands::Verify => verify(store, &out),
        Commands::Period(command) => period(store, command, &out),
        Commands::Task(command) => task(store, command, &out),
    }
}

fn init(store: &mut KanbanStore, out: &Printer) -> CliResult {
    if !store.create_schema().is_success() {
        return Err("schema creation failed; see log for details".into());
    }
    verify(store, out)
}

fn verify(store: &KanbanStore, out: &Printer) -> CliResult {
    let report = store.schema_report()?;
    if out.json {
        let issues: Vec<String> = report.issues.iter().map(ToString::to_string).collect();
        out.json_value(&serde_json::json!({ "valid": report.is_valid(), "issues": issues }))?;
    } else {
        print_report(&report);
    }

    if report.is_valid() {
        Ok(())
    } else {
        Err("schema verification failed; run `kanban init` to repair".into())
    }
}

fn period(store: &KanbanStore, command: PeriodCommand, out: &Printer) -> CliResult {
    let periods = store.periods()?;
    match command {
        PeriodCommand::Add {
            name,
            start_date,
            end_date,
        } => {
            let period = periods.create_period(&name, &start_date, &end_date)?;
            out.period(&period)
        }
        PeriodCommand::List => out.periods(&periods.list_periods()?),
        PeriodCommand::Show { name } => match periods.get_period_by_name(&name)? {
            Some(period) => out.period(&period),
            None => Err(format!("period `{name}` not found").into()),
        },
        PeriodCommand::Current { on } => {
            let period = match on {
                Some(on) => {
                    let date = parse_period_date(&on)
                        .ok_or_else(|| format!("invalid date `{on}`"))?;
                    store.current_period_on(date)
                }
                None => store.get_current_period(),
            };
            match period {
                Some(period) => out.period(&period),
                None => Err("no period contains that date".into()),
            }
        }
    }
}

fn task(store: &KanbanStore, command: TaskCommand, out: &Printer) -> CliResult {
    let tasks = store.tasks()?;
    match command {
        TaskCommand::Add {
            title,
            project,
            desc,
        } => out.task(&tasks.create_task(&title, &desc, &project)?),
        TaskCommand::Todo { id, period } => {
            let period = resolve_period(store, &period)?;
            out.task(&tasks.move_to_todo(id, period.id)?)
        }
        TaskCommand::Assign { id, resource } => out.task(&tasks.assign_resource(id, &resource)?),
        TaskCommand::Start { id } => out.task(&tasks.start_task(id)?),
        TaskCommand::Done { id } => out.task(&tasks.complete_task(id)?),
        TaskCommand::Show { id } => match tasks.get_task(id)? {
            Some(task) => out.task(&task),
            None => Err(format!("task {id} not found").into()),
        },
        TaskCommand::Board { period } => {
            let period = resolve_period(store, &period)?;
            out.tasks(&tasks.tasks_by_period(period.id)?)
        }
        TaskCommand::Backlog => out.tasks(&tasks.unassigned_tasks()?),
        TaskCommand::History { period } => {
            let period_id = match &period.name {
                Some(_) => Some(resolve_period(store, &period)?.id),
                None => None,
            };
            out.history(&tasks.task_history(period_id)?)
        }
    }
}

/// Named period, or the current one when no name is given.
fn resolve_period(
    store: &KanbanStore,
    selector: &PeriodSelector,
) -> Result<Period, Box<dyn Error>> {
    match &selector.name {
        Some(name) => store
            .periods()?
            .get_period_by_name(name)?
            .ok_or_else(|| format!("period `{name}` not found").into()),
        None => store
            .get_current_period()
            .ok_or_else(|| "no current period; pass --period".into()),
    }
}

fn print_report(report: &SchemaReport) {
    if report.is_valid() {
        println!("schema ok");
        return;
    }
    for issue in &report.issues {
        println!("schema issue: {issue}");
    }
}

struct Printer {
    json: bool,
}

impl Printer {
    fn json_value<T: Serialize + ?Sized>(&self, value: &T) -> CliResult {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    fn period(&self, period: &Period) -> CliResult {
        if self.json {
            return self.json_value(period);
        }
        println!("{}", period_line(period));
        Ok(())
    }

    fn periods(&self, periods: &[Period]) -> CliResult {
        if self.json {
            return self.json_value(periods);
        }
        for period in periods {
            println!("{}", period_line(period));
        }
        Ok(())
    }

    fn task(&self, task: &Task) -> CliResult {
        if self.json {
            return self.json_value(task);
        }
        println!("{}", task_line(task));
        Ok(())
    }

    fn tasks(&self, tasks: &[Task]) -> CliResult {
        if self.json {
            return self.json_value(tasks);
        }
        for task in tasks {
            println!("{}", task_line(task));
        }
        Ok(())
    }

    fn history(&self, entries: &[TaskHistoryEntry]) -> CliResult {
        if self.json {
            return self.json_value(entries);
        }
        for entry in entries {
            println!(
                "{}  period={}",
                task_line(&entry.task),
                entry.period_name.as_deref().unwrap_or("-")
            );
        }
        Ok(())
    }
}

fn period_line(period: &Period) -> String {
    format!(
        "#{} {} [{} .. {}]",
        period.id, period.name, period.start_date, period.end_date
    )
}

fn task_line(task: &Task) -> String {
    format!(
        "#{} [{}] {} (project={}, resource={})",
        task.id,
        task.status.as_str(),
        task.title,
        task.project,
        task.resource.as_deref().unwrap_or("-")
    )
}

#[cfg(test)]
mod tests {
    use super::run;
    use crate::cli::{Commands, PeriodCommand, PeriodSelector, TaskCommand};
    use kanban_core::{KanbanStore, TaskStatus};

    fn store() -> KanbanStore {
        let mut store = KanbanStore::new();
        assert!(store.connect_in_memory().is_success());
        run(&mut store, Commands::Init, false).unwrap();
        store
    }

    #[test]
    fn verify_fails_before_init() {
        let mut store = KanbanStore::new();
        assert!(store.connect_in_memory().is_success());
        assert!(run(&mut store, Commands::Verify, true).is_err());
    }

    #[test]
    fn plans_task_into_named_period() {
        let mut store = store();
        run(
            &mut store,
            Commands::Period(PeriodCommand::Add {
                name: "Sprint 1".to_string(),
                start_date: "01/01/25".to_string(),
                end_date: "01/14/25".to_string(),
            }),
            false,
        )
        .unwrap();
        run(
            &mut store,
            Commands::Task(TaskCommand::Add {
                title: "Write docs".to_string(),
                project: "Website".to_string(),
                desc: String::new(),
            }),
            false,
        )
        .unwrap();

        run(
            &mut store,
            Commands::Task(TaskCommand::Todo {
                id: 1,
                period: PeriodSelector {
                    name: Some("Sprint 1".to_string()),
                },
            }),
            true,
        )
        .unwrap();

        let task = store.tasks().unwrap().get_task(1).unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Todo);
    }

    #[test]
    fn unknown_period_is_an_error() {
        let mut store = store();
        let err = run(
            &mut store,
            Commands::Task(TaskCommand::Board {
                period: PeriodSelector {
                    name: Some("Nope".to_string()),
                },
            }),
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Nope"));
    }
}
