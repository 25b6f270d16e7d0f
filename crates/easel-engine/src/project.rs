//! Domain model: projects, briefings, statuses, due dates
//!
//! These types mirror the studio's project tracker, not the whiteboard. The
//! one derived notion the engine adds is [`Project::effective_status`]: the
//! column a card belongs in right now, which folds the due date into the
//! stored status.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a project in the studio tracker
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// Wrap a tracker identifier
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier as a string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Workflow status, which doubles as the timeline column set
///
/// `Done` is terminal: once there, no due date can pull a card back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Not started
    Todo,
    /// Being worked on
    InProgress,
    /// Waiting on review
    Review,
    /// Past its due date (derived, never stored by the tracker)
    Overdue,
    /// Delivered
    Done,
}

impl ProjectStatus {
    /// Column order on the timeline, left to right
    pub const COLUMN_ORDER: [Self; 5] = [
        Self::Todo,
        Self::InProgress,
        Self::Review,
        Self::Overdue,
        Self::Done,
    ];

    /// Human-readable column label
    #[inline]
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Review => "Review",
            Self::Overdue => "Overdue",
            Self::Done => "Done",
        }
    }

    /// Machine name used in furniture markers
    #[inline]
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Review => "review",
            Self::Overdue => "overdue",
            Self::Done => "done",
        }
    }

    /// Column accent color
    #[inline]
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Todo => "#8795a1",
            Self::InProgress => "#2d9bf0",
            Self::Review => "#f5a623",
            Self::Overdue => "#e0455a",
            Self::Done => "#3fae7a",
        }
    }

    /// Whether this status ends the workflow
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Project priority, shown on the briefing badge row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Can slip
    Low,
    /// Default
    #[default]
    Normal,
    /// Watch it
    High,
    /// Drop everything
    Urgent,
}

impl Priority {
    /// Badge label
    #[inline]
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }

    /// Badge accent color
    #[inline]
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Low => "#8795a1",
            Self::Normal => "#2d9bf0",
            Self::High => "#f5a623",
            Self::Urgent => "#e0455a",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Invalid due-date string
#[derive(Debug, thiserror::Error)]
#[error("invalid due date: {0}")]
pub struct DueDateError(String);

/// A due date, keeping the tracker's date-only / timestamp distinction
///
/// The distinction matters for overdue checks: a date-only deadline covers
/// its whole day (overdue starts the NEXT day, UTC), while a timestamp is
/// overdue the moment it passes. Collapsing both to midnight would flag
/// date-only work as late a day early, so the two forms never normalize
/// into each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DueDate {
    /// Whole-day deadline, e.g. `2026-03-05`
    DateOnly(NaiveDate),
    /// Exact deadline, e.g. `2026-03-05T17:00:00Z`
    Timestamp(DateTime<Utc>),
}

impl DueDate {
    /// Parse either form from the tracker's wire format
    pub fn parse(text: &str) -> Result<Self, DueDateError> {
        let text = text.trim();
        if text.contains('T') {
            let ts = DateTime::parse_from_rfc3339(text)
                .map_err(|_| DueDateError(text.to_string()))?;
            Ok(Self::Timestamp(ts.with_timezone(&Utc)))
        } else {
            let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .map_err(|_| DueDateError(text.to_string()))?;
            Ok(Self::DateOnly(date))
        }
    }

    /// Whether the deadline has passed at `now`
    #[must_use]
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        match self {
            Self::DateOnly(date) => now.date_naive() > *date,
            Self::Timestamp(ts) => now > *ts,
        }
    }

    /// Calendar date, for card due metadata
    #[inline]
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::DateOnly(date) => *date,
            Self::Timestamp(ts) => ts.date_naive(),
        }
    }

    /// Short badge label, e.g. `Mar 5` or `Mar 5, 17:00`
    #[must_use]
    pub fn badge_label(&self) -> String {
        match self {
            Self::DateOnly(date) => date.format("%b %-d").to_string(),
            Self::Timestamp(ts) => ts.format("%b %-d, %H:%M").to_string(),
        }
    }
}

impl TryFrom<String> for DueDate {
    type Error = DueDateError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::parse(&text)
    }
}

impl From<DueDate> for String {
    fn from(due: DueDate) -> Self {
        match due {
            DueDate::DateOnly(date) => date.format("%Y-%m-%d").to_string(),
            DueDate::Timestamp(ts) => ts.to_rfc3339(),
        }
    }
}

impl std::fmt::Display for DueDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&String::from(*self))
    }
}

/// A studio project as the tracker knows it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Tracker identifier
    pub id: ProjectId,
    /// Display name
    pub name: String,
    /// Stored workflow status
    pub status: ProjectStatus,
    /// Priority
    #[serde(default)]
    pub priority: Priority,
    /// Deadline, if any
    #[serde(default)]
    pub due: Option<DueDate>,
    /// Whether the client signed off on the deadline
    #[serde(default)]
    pub due_approved: bool,
    /// Client, if external work
    #[serde(default)]
    pub client_name: Option<String>,
    /// Review happened
    #[serde(default)]
    pub was_reviewed: bool,
    /// Client approved the work
    #[serde(default)]
    pub was_approved: bool,
    /// When the project was archived
    #[serde(default)]
    pub archived_at: Option<DateTime<Utc>>,
    /// When the project was delivered
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Project {
    /// Fresh project in `Todo`
    #[must_use]
    pub fn new(id: impl Into<ProjectId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: ProjectStatus::Todo,
            priority: Priority::default(),
            due: None,
            due_approved: false,
            client_name: None,
            was_reviewed: false,
            was_approved: false,
            archived_at: None,
            completed_at: None,
        }
    }

    /// Set the stored status
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the priority
    #[inline]
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the deadline
    #[inline]
    #[must_use]
    pub fn with_due(mut self, due: DueDate) -> Self {
        self.due = Some(due);
        self
    }

    /// Mark the deadline as client-approved
    #[inline]
    #[must_use]
    pub fn due_approved(mut self) -> Self {
        self.due_approved = true;
        self
    }

    /// Set the client
    #[inline]
    #[must_use]
    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client_name = Some(client.into());
        self
    }

    /// Mark as reviewed
    #[inline]
    #[must_use]
    pub fn reviewed(mut self) -> Self {
        self.was_reviewed = true;
        self
    }

    /// Mark as client-approved
    #[inline]
    #[must_use]
    pub fn approved(mut self) -> Self {
        self.was_approved = true;
        self
    }

    /// Mark as archived
    #[inline]
    #[must_use]
    pub fn archived(mut self, when: DateTime<Utc>) -> Self {
        self.archived_at = Some(when);
        self
    }

    /// Mark as delivered
    #[inline]
    #[must_use]
    pub fn completed(mut self, when: DateTime<Utc>) -> Self {
        self.completed_at = Some(when);
        self.status = ProjectStatus::Done;
        self
    }

    /// Whether the project sits in the archive
    #[inline]
    #[must_use]
    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    /// Client name for badges, `Internal` for in-house work
    #[inline]
    #[must_use]
    pub fn client_label(&self) -> &str {
        self.client_name.as_deref().unwrap_or("Internal")
    }

    /// The column this project belongs in at `now`
    ///
    /// Terminal statuses win outright. Otherwise a passed deadline overrides
    /// whatever the tracker stores.
    #[must_use]
    pub fn effective_status(&self, now: DateTime<Utc>) -> ProjectStatus {
        if self.status.is_terminal() {
            return self.status;
        }
        match &self.due {
            Some(due) if due.is_overdue_at(now) => ProjectStatus::Overdue,
            _ => self.status,
        }
    }
}

/// Briefing content for one project
///
/// All fields are optional; missing ones render as attention placeholders on
/// the board rather than being omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectBriefing {
    /// What the project is
    #[serde(default)]
    pub overview: Option<String>,
    /// What success looks like
    #[serde(default)]
    pub goals: Option<String>,
    /// What gets produced
    #[serde(default)]
    pub deliverables: Option<String>,
    /// Who it is for
    #[serde(default)]
    pub audience: Option<String>,
    /// Look and feel guidance
    #[serde(default)]
    pub style_notes: Option<String>,
    /// Links and prior art
    #[serde(default)]
    pub references: Option<String>,
}

impl ProjectBriefing {
    /// Empty briefing
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the overview
    #[inline]
    #[must_use]
    pub fn with_overview(mut self, text: impl Into<String>) -> Self {
        self.overview = Some(text.into());
        self
    }

    /// Set the goals
    #[inline]
    #[must_use]
    pub fn with_goals(mut self, text: impl Into<String>) -> Self {
        self.goals = Some(text.into());
        self
    }

    /// Set the deliverables
    #[inline]
    #[must_use]
    pub fn with_deliverables(mut self, text: impl Into<String>) -> Self {
        self.deliverables = Some(text.into());
        self
    }

    /// Set the audience
    #[inline]
    #[must_use]
    pub fn with_audience(mut self, text: impl Into<String>) -> Self {
        self.audience = Some(text.into());
        self
    }

    /// Set the style notes
    #[inline]
    #[must_use]
    pub fn with_style_notes(mut self, text: impl Into<String>) -> Self {
        self.style_notes = Some(text.into());
        self
    }

    /// Set the references
    #[inline]
    #[must_use]
    pub fn with_references(mut self, text: impl Into<String>) -> Self {
        self.references = Some(text.into());
        self
    }

    /// Labelled field values, in board order
    #[must_use]
    pub fn fields(&self) -> [(&'static str, Option<&str>); 6] {
        [
            ("Overview", self.overview.as_deref()),
            ("Goals", self.goals.as_deref()),
            ("Deliverables", self.deliverables.as_deref()),
            ("Audience", self.audience.as_deref()),
            ("Style notes", self.style_notes.as_deref()),
            ("References", self.references.as_deref()),
        ]
    }
}

/// Per-call sync switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Render the card as reviewed even if the tracker lags behind
    pub mark_as_reviewed: bool,
}

impl SyncOptions {
    /// Defaults: render the tracker state as-is
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the reviewed marker on
    #[inline]
    #[must_use]
    pub fn with_mark_as_reviewed(mut self, mark: bool) -> Self {
        self.mark_as_reviewed = mark;
        self
    }
}
