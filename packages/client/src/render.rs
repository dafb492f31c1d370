//! Terminal rendering of bugs and test cases.

use colored::{ColoredString, Colorize};

use crate::dashboard::{Dashboard, SortDirection, SortField};
use crate::test_cases::{TestCase, TestCaseStatus};
use crate::types::{priority_label, Bug, BugStatus, UserRef};

pub fn status_badge(status: BugStatus) -> ColoredString {
    let label = status.label();
    match status {
        BugStatus::Open => label.blue(),
        BugStatus::InProgress => label.yellow(),
        BugStatus::Resolved => label.green(),
        BugStatus::Closed => label.dimmed(),
    }
}

pub fn priority_badge(priority: i16) -> ColoredString {
    let label = priority_label(priority);
    match priority {
        1 => label.dimmed(),
        2 => label.blue(),
        3 => label.yellow(),
        4 => label.bright_red(),
        _ => label.red().bold(),
    }
}

fn user_name(user: Option<&UserRef>) -> String {
    match user {
        Some(UserRef {
            name: Some(name), ..
        }) => name.clone(),
        Some(UserRef { id, name: None }) => id.to_string(),
        None => "Unassigned".to_string(),
    }
}

fn sort_label(dashboard: &Dashboard) -> String {
    let field = match dashboard.sort_field() {
        SortField::SerialNo => "serial",
        SortField::Date => "date",
        SortField::Priority => "priority",
    };
    let arrow = match dashboard.sort_direction() {
        SortDirection::Asc => "↑",
        SortDirection::Desc => "↓",
    };
    format!("{} {}", field, arrow)
}

pub fn print_dashboard(dashboard: &Dashboard) {
    println!("{}", "Bug Tracking Dashboard".yellow().bold());

    if let Some(error) = &dashboard.error {
        println!("{}", error.red());
        return;
    }

    let visible = dashboard.visible();
    println!(
        "{}",
        format!(
            "{} of {} bugs, sorted by {}",
            visible.len(),
            dashboard.all().len(),
            sort_label(dashboard)
        )
        .dimmed()
    );
    println!();

    if visible.is_empty() {
        println!("{}", "No bugs found".dimmed());
        return;
    }

    for bug in visible {
        print_bug_line(bug);
    }
}

pub fn print_bug_line(bug: &Bug) {
    println!(
        "  {} {}  [{}] [{}]  {}",
        format!("#{}", bug.serial_no).dimmed(),
        bug.title.bold(),
        status_badge(bug.status),
        priority_badge(bug.priority),
        bug.created_at.format("%b %-d, %Y").to_string().dimmed()
    );
}

pub fn print_bug(bug: &Bug, server: &str) {
    println!(
        "{} {}",
        format!("#{}", bug.serial_no).dimmed(),
        bug.title.bold()
    );
    println!("  {:<12} {}", "Id:".dimmed(), bug.id);
    println!("  {:<12} {}", "Status:".dimmed(), status_badge(bug.status));
    println!("  {:<12} {}", "Priority:".dimmed(), priority_badge(bug.priority));
    println!(
        "  {:<12} {}",
        "Reporter:".dimmed(),
        user_name(Some(&bug.created_by))
    );
    println!(
        "  {:<12} {}",
        "Assignee:".dimmed(),
        user_name(bug.assigned_to.as_ref())
    );
    println!(
        "  {:<12} {}",
        "Created:".dimmed(),
        bug.created_at.format("%b %-d, %Y %H:%M")
    );
    println!(
        "  {:<12} {}",
        "Updated:".dimmed(),
        bug.updated_at.format("%b %-d, %Y %H:%M")
    );
    println!();
    println!("{}", "Description".cyan());
    println!("{}", bug.description);

    if let Some(steps) = &bug.steps {
        println!();
        println!("{}", "Steps to reproduce".cyan());
        println!("{}", steps);
    }

    if let Some(screenshot) = &bug.screenshot {
        println!();
        println!("{} {}{}", "Screenshot:".cyan(), server, screenshot);
    }
}

fn test_status_badge(status: TestCaseStatus) -> ColoredString {
    match status {
        TestCaseStatus::Passed => "✔ passed".green(),
        TestCaseStatus::Failed => "✘ failed".red(),
        TestCaseStatus::Pending => "⚠ pending".yellow(),
    }
}

pub fn print_test_cases(cases: &[&TestCase]) {
    println!("{}", "Test Cases".yellow().bold());
    println!();

    if cases.is_empty() {
        println!("{}", "No test cases match this filter".dimmed());
        return;
    }

    for case in cases {
        println!("{}  {}", test_status_badge(case.status), case.title.bold());
        for (i, step) in case.steps.iter().enumerate() {
            println!("    {}. {}", i + 1, step);
        }
        println!("    {} {}", "Expected:".dimmed(), case.expected_result);
        if let Some(bug) = case.related_bug {
            println!("    {} #{}", "Related bug:".dimmed(), bug);
        }
        if let Some(notes) = case.notes {
            println!("    {} {}", "Notes:".dimmed(), notes);
        }
        println!();
    }
}
