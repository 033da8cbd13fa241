use taskline_core::Task;

/// One listing line, e.g. `1: Buy milk - 2% (Due: 2024-05-01, Status: Pending)`.
pub fn task_line(t: &Task) -> String {
    format!(
        "{}: {} - {} (Due: {}, Status: {})",
        t.task_id,
        t.title,
        t.description,
        t.due_date.date(),
        t.status
    )
}
