use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Unassigned,
    Allocated,
    Freed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let status = match self {
            Self::Unassigned => "unassigned",
            Self::Allocated => "allocated",
            Self::Freed => "freed",
        };

        write!(f, "{}", status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub name: String,
    pub size: u64,
    pub start: Option<u64>,
    pub status: TaskStatus,
}

impl Task {
    pub fn new(name: &str, size: u64) -> Self {
        Self {
            name: name.to_string(),
            size,
            start: None,
            status: TaskStatus::Unassigned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tasks_start_out_unassigned() {
        let task = Task::new("editor", 64);

        assert_eq!(task.start, None);
        assert_eq!(task.status, TaskStatus::Unassigned);
    }

    #[test]
    fn statuses_display_as_plain_words() {
        assert_eq!(TaskStatus::Allocated.to_string(), "allocated");
        assert_eq!(TaskStatus::Freed.to_string(), "freed");
    }
}
