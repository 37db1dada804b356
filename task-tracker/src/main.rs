use anyhow::Result;
use std::io::{self, BufRead, Write};
use task_tracker::{LoadOutcome, TaskStore};

const TASK_FILE: &str = "tasks.json";

type InputLines = dyn Iterator<Item = io::Result<String>>;

fn main() -> Result<()> {
    let (mut store, outcome) = TaskStore::load(TASK_FILE);
    if outcome == LoadOutcome::Corrupt {
        println!("Warning: {TASK_FILE} could not be read, starting with an empty list.");
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_menu();
        let Some(choice) = prompt("Choose an option (1-6): ", &mut lines)? else {
            break;
        };
        match choice.trim() {
            "1" => view_tasks(&store),
            "2" => add_task(&mut store, &mut lines)?,
            "3" => complete_task(&mut store, &mut lines)?,
            "4" => delete_task(&mut store, &mut lines)?,
            "5" => show_statistics(&store),
            "6" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice, pick 1-6."),
        }
    }
    Ok(())
}

fn print_menu() {
    println!();
    println!("==== TASK TRACKER ====");
    println!("1. View tasks");
    println!("2. Add task");
    println!("3. Complete task");
    println!("4. Delete task");
    println!("5. Statistics");
    println!("6. Quit");
}

fn prompt(label: &str, lines: &mut InputLines) -> Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    Ok(lines.next().transpose()?)
}

fn view_tasks(store: &TaskStore) {
    if store.tasks().is_empty() {
        println!("No tasks yet. Add one!");
        return;
    }
    println!("{:<5} {:<8} {:<35} {:<19}", "ID", "Status", "Task", "Created");
    for task in store.tasks() {
        let status = if task.completed { "done" } else { "active" };
        println!(
            "{:<5} {:<8} {:<35} {:<19}",
            task.id, status, task.description, task.created_at
        );
    }
}

fn add_task(store: &mut TaskStore, lines: &mut InputLines) -> Result<()> {
    let Some(input) = prompt("Task description: ", lines)? else {
        return Ok(());
    };
    let description = input.trim();
    if description.is_empty() {
        println!("Description cannot be empty.");
        return Ok(());
    }
    let task = store.add(description.to_string())?;
    println!("Added '{}' with id {}.", task.description, task.id);
    Ok(())
}

fn complete_task(store: &mut TaskStore, lines: &mut InputLines) -> Result<()> {
    view_tasks(store);
    let Some(id) = prompt_for_id("Id of the completed task: ", lines)? else {
        return Ok(());
    };
    match store.complete(id)? {
        Some(task) => println!("Completed '{}'.", task.description),
        None => println!("No task with id {id}."),
    }
    Ok(())
}

fn delete_task(store: &mut TaskStore, lines: &mut InputLines) -> Result<()> {
    view_tasks(store);
    let Some(id) = prompt_for_id("Id of the task to delete: ", lines)? else {
        return Ok(());
    };
    match store.delete(id)? {
        Some(task) => println!("Deleted '{}'.", task.description),
        None => println!("No task with id {id}."),
    }
    Ok(())
}

/// Returns `None` on EOF or non-numeric input; the id itself is not
/// checked for existence here.
fn prompt_for_id(label: &str, lines: &mut InputLines) -> Result<Option<u32>> {
    let Some(input) = prompt(label, lines)? else {
        return Ok(None);
    };
    match input.trim().parse::<u32>() {
        Ok(id) => Ok(Some(id)),
        Err(_) => {
            println!("Id must be a number.");
            Ok(None)
        }
    }
}

fn show_statistics(store: &TaskStore) {
    let stats = store.statistics();
    println!("Total: {}", stats.total);
    println!("Completed: {}", stats.completed);
    println!("Active: {}", stats.active);
    if let Some(percentage) = stats.percentage {
        println!("Progress: {percentage:.1}%");
    }
}
