//! Interactive menu over a TaskManager.
//!
//! Saves after add and update and on exit. Deletes are only written right
//! away when `save_after_delete` is set; otherwise they ride along with the
//! next save. End of input behaves like choosing Exit.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use taskline_core::{Change, TaskManager, TaskUpdate, parse_due_date};
use tracing::debug;

use crate::display::task_line;

#[derive(Debug, Clone, Copy, Default)]
pub struct ShellOptions {
    pub save_after_delete: bool,
}

enum Flow {
    Continue,
    Exit,
}

pub fn run<R: BufRead, W: Write>(
    manager: &mut TaskManager,
    opts: ShellOptions,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    loop {
        writeln!(out, "\nTask Management System")?;
        writeln!(out, "1. Add Task")?;
        writeln!(out, "2. List Tasks")?;
        writeln!(out, "3. Update Task")?;
        writeln!(out, "4. Delete Task")?;
        writeln!(out, "5. Exit")?;

        let Some(choice) = prompt(input, out, "Select an option")? else {
            break;
        };

        let flow = match choice.trim() {
            "1" => add(manager, input, out)?,
            "2" => list(manager, input, out)?,
            "3" => update(manager, input, out)?,
            "4" => delete(manager, opts, input, out)?,
            "5" => Flow::Exit,
            other => {
                debug!(choice = other, "unknown menu choice");
                writeln!(out, "Invalid choice. Please try again.")?;
                Flow::Continue
            }
        };

        if let Flow::Exit = flow {
            break;
        }
    }

    save(manager)?;
    writeln!(out, "Tasks saved. Exiting.")?;
    Ok(())
}

/// Answer as typed, minus the line ending. `None` at end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<Option<String>> {
    write!(out, "{}: ", label)?;
    out.flush().ok();
    let mut s = String::new();
    if input.read_line(&mut s)? == 0 {
        return Ok(None);
    }
    let len = s.trim_end_matches(['\n', '\r']).len();
    s.truncate(len);
    Ok(Some(s))
}

pub(crate) fn save(manager: &TaskManager) -> Result<()> {
    manager
        .save()
        .with_context(|| format!("saving {}", manager.store_path().display()))
}

/// Blank input means "leave unchanged".
fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}

fn add<R: BufRead, W: Write>(manager: &mut TaskManager, input: &mut R, out: &mut W) -> Result<Flow> {
    let Some(title) = prompt(input, out, "Enter task title")? else {
        return Ok(Flow::Exit);
    };
    let Some(description) = prompt(input, out, "Enter task description")? else {
        return Ok(Flow::Exit);
    };
    let Some(due) = prompt(input, out, "Enter due date (YYYY-MM-DD)")? else {
        return Ok(Flow::Exit);
    };

    let due_date = match parse_due_date(&due) {
        Ok(d) => d,
        Err(e) => {
            writeln!(out, "{e}")?;
            return Ok(Flow::Continue);
        }
    };

    let task_id = manager.add(title, description, due_date, None).task_id;
    save(manager)?;
    writeln!(out, "Task {task_id} added.")?;
    Ok(Flow::Continue)
}

fn list<R: BufRead, W: Write>(manager: &TaskManager, input: &mut R, out: &mut W) -> Result<Flow> {
    let Some(filter) = prompt(input, out, "Enter status to filter (or leave blank for all)")? else {
        return Ok(Flow::Exit);
    };

    let filter = non_blank(filter);
    for t in manager.list(filter.as_deref()) {
        writeln!(out, "{}", task_line(t))?;
    }
    Ok(Flow::Continue)
}

fn read_id<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
) -> Result<Result<u64, Flow>> {
    let Some(raw) = prompt(input, out, label)? else {
        return Ok(Err(Flow::Exit));
    };
    match raw.trim().parse::<u64>() {
        Ok(id) => Ok(Ok(id)),
        Err(_) => {
            writeln!(out, "Invalid task ID: '{raw}'")?;
            Ok(Err(Flow::Continue))
        }
    }
}

fn update<R: BufRead, W: Write>(manager: &mut TaskManager, input: &mut R, out: &mut W) -> Result<Flow> {
    let task_id = match read_id(input, out, "Enter task ID to update")? {
        Ok(id) => id,
        Err(flow) => return Ok(flow),
    };

    let Some(title) = prompt(input, out, "Enter new title (or leave blank to keep current)")? else {
        return Ok(Flow::Exit);
    };
    let Some(description) =
        prompt(input, out, "Enter new description (or leave blank to keep current)")?
    else {
        return Ok(Flow::Exit);
    };
    let Some(due) = prompt(
        input,
        out,
        "Enter new due date (YYYY-MM-DD, or leave blank to keep current)",
    )?
    else {
        return Ok(Flow::Exit);
    };
    let Some(status) = prompt(input, out, "Enter new status (or leave blank to keep current)")? else {
        return Ok(Flow::Exit);
    };

    let due_date = match non_blank(due).as_deref().map(parse_due_date).transpose() {
        Ok(d) => d,
        Err(e) => {
            writeln!(out, "{e}")?;
            return Ok(Flow::Continue);
        }
    };

    let patch = TaskUpdate {
        title: non_blank(title),
        description: non_blank(description),
        due_date,
        status: non_blank(status),
    };

    match manager.update(task_id, patch) {
        Change::Applied => writeln!(out, "Task {task_id} updated.")?,
        Change::NoMatch => writeln!(out, "No task with ID {task_id}.")?,
    }
    save(manager)?;
    Ok(Flow::Continue)
}

fn delete<R: BufRead, W: Write>(
    manager: &mut TaskManager,
    opts: ShellOptions,
    input: &mut R,
    out: &mut W,
) -> Result<Flow> {
    let task_id = match read_id(input, out, "Enter task ID to delete")? {
        Ok(id) => id,
        Err(flow) => return Ok(flow),
    };

    let removed = manager.delete(task_id);
    if removed == 0 {
        writeln!(out, "No task with ID {task_id}.")?;
    } else {
        writeln!(out, "Deleted {removed} task(s).")?;
    }

    if opts.save_after_delete {
        save(manager)?;
    }
    Ok(Flow::Continue)
}
