//! Punch list aggregation: status counts, filtering, and grouped buckets.
//!
//! Bucket order is the order in which each bucket's first issue appears, so
//! callers must pass issues already sorted by `(created_at, id)`.

use indexmap::IndexMap;
use serde::Serialize;

use crate::status::{define_text_enum, IssuePriority, IssueStatus};

/// Bucket name for issues without an area or trade label.
pub const UNASSIGNED_BUCKET: &str = "Unassigned";

define_text_enum! {
    /// Grouping dimension for punch list reports.
    GroupBy {
        Area = "area",
        Trade = "trade",
        Priority = "priority",
    }
}

impl Default for GroupBy {
    fn default() -> Self {
        Self::Area
    }
}

/// The fields of an issue that reporting reads.
pub trait ReportIssue {
    fn status(&self) -> IssueStatus;
    fn priority(&self) -> IssuePriority;
    fn area_name(&self) -> Option<&str>;
    fn trade_label(&self) -> Option<&str>;
}

/// Issue counts by status, shared by the dashboard and grouped reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total_issues: i64,
    pub open_issues: i64,
    pub assigned_issues: i64,
    pub in_progress_issues: i64,
    pub ready_for_reinspect: i64,
    pub closed_issues: i64,
    /// High-priority issues that are not closed.
    pub high_priority_open: i64,
}

impl StatusCounts {
    /// Count a slice of issues.
    pub fn tally<I: ReportIssue>(issues: &[I]) -> Self {
        let mut counts = Self::default();
        for issue in issues {
            counts.add(issue.status(), issue.priority());
        }
        counts
    }

    fn add(&mut self, status: IssueStatus, priority: IssuePriority) {
        self.total_issues += 1;
        match status {
            IssueStatus::Open => self.open_issues += 1,
            IssueStatus::Assigned => self.assigned_issues += 1,
            IssueStatus::InProgress => self.in_progress_issues += 1,
            IssueStatus::ReadyForReinspect => self.ready_for_reinspect += 1,
            IssueStatus::Closed => self.closed_issues += 1,
        }
        if priority == IssuePriority::High && status != IssueStatus::Closed {
            self.high_priority_open += 1;
        }
    }
}

/// Which issues a grouped report includes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub status: Option<IssueStatus>,
    pub include_closed: bool,
}

impl ReportFilter {
    /// An explicit status wins; otherwise closed issues are dropped unless
    /// `include_closed` is set.
    pub fn admits(&self, status: IssueStatus) -> bool {
        match self.status {
            Some(wanted) => status == wanted,
            None => self.include_closed || status != IssueStatus::Closed,
        }
    }
}

/// The bucket name an issue falls into.
pub fn bucket_key<I: ReportIssue>(issue: &I, group_by: GroupBy) -> String {
    let label = match group_by {
        GroupBy::Area => issue.area_name(),
        GroupBy::Trade => issue.trade_label(),
        GroupBy::Priority => return issue.priority().bucket_label(),
    };
    match label {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => UNASSIGNED_BUCKET.to_string(),
    }
}

/// A named group of issues in a report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportBucket<I> {
    pub name: String,
    pub issues: Vec<I>,
}

/// Filter, count and group issues.
pub fn build_groups<I: ReportIssue>(
    issues: Vec<I>,
    group_by: GroupBy,
    filter: ReportFilter,
) -> (Vec<ReportBucket<I>>, StatusCounts) {
    let mut counts = StatusCounts::default();
    let mut buckets: IndexMap<String, Vec<I>> = IndexMap::new();

    for issue in issues.into_iter().filter(|i| filter.admits(i.status())) {
        counts.add(issue.status(), issue.priority());
        buckets
            .entry(bucket_key(&issue, group_by))
            .or_default()
            .push(issue);
    }

    let buckets = buckets
        .into_iter()
        .map(|(name, issues)| ReportBucket { name, issues })
        .collect();
    (buckets, counts)
}

/// Attachment file name for an exported punch list.
pub fn export_filename(project_name: &str, group_by: GroupBy, extension: &str) -> String {
    let safe: String = project_name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!("punch_list_{safe}_{}.{extension}", group_by.as_str())
}
