mod common;

use common::{date, statuses, task};
use proptest::prelude::*;
use rstest::rstest;
use taskboard::filter::{filter_tasks, StatusFilter, TaskQuery};
use taskboard::models::{Category, Priority, Status, Task};
use taskboard::stats::{aggregate_stats, build_report, Stats};

fn sample() -> Vec<Task> {
    vec![
        task(1, "Write report", Status::Todo),
        task(2, "Review PR", Status::Done),
        task(3, "Report expenses", Status::InProgress),
        task(4, "Gym", Status::Done),
    ]
}

#[test]
fn test_aggregate_stats_example() {
    let stats = aggregate_stats(&sample());
    assert_eq!(
        stats,
        Stats { total: 4, completed: 2, in_progress: 1, todo: 1, completion_rate: 50 }
    );
}

#[test]
fn test_aggregate_stats_empty() {
    assert_eq!(aggregate_stats(&[]), Stats::default());
    assert_eq!(aggregate_stats(&[]).completion_rate, 0);
}

#[test]
fn test_completion_rate_rounds() {
    let tasks = vec![
        task(1, "a", Status::Done),
        task(2, "b", Status::Todo),
        task(3, "c", Status::Todo),
    ];
    // 33.33 rounds down
    assert_eq!(aggregate_stats(&tasks).completion_rate, 33);

    let tasks = vec![task(1, "a", Status::Done), task(2, "b", Status::Done), task(3, "c", Status::Todo)];
    // 66.67 rounds up
    assert_eq!(aggregate_stats(&tasks).completion_rate, 67);
}

#[test]
fn test_cancelled_counts_toward_total_only() {
    let tasks = vec![task(1, "a", Status::Done), task(2, "b", Status::Cancelled)];
    let stats = aggregate_stats(&tasks);
    assert_eq!(stats.total, 2);
    assert_eq!(stats.completed + stats.in_progress + stats.todo, 1);
    assert_eq!(stats.completion_rate, 50);
}

#[test]
fn test_filter_all_empty_search_is_identity() {
    let tasks = sample();
    let filtered = filter_tasks(&tasks, StatusFilter::All, "");
    let expected: Vec<&Task> = tasks.iter().collect();
    assert_eq!(filtered, expected);
}

#[test]
fn test_filter_done_keeps_only_done_in_order() {
    let tasks = sample();
    let filtered = filter_tasks(&tasks, StatusFilter::Done, "");
    assert_eq!(filtered.iter().map(|t| t.title.as_str()).collect::<Vec<_>>(), vec!["Review PR", "Gym"]);
}

#[rstest]
#[case(StatusFilter::All, "report", vec![Status::Todo, Status::InProgress])]
#[case(StatusFilter::All, "REPORT", vec![Status::Todo, Status::InProgress])]
#[case(StatusFilter::Todo, "report", vec![Status::Todo])]
#[case(StatusFilter::InProgress, "", vec![Status::InProgress])]
#[case(StatusFilter::Done, "report", vec![])]
#[case(StatusFilter::All, "nothing like this", vec![])]
fn test_filter_combines_status_and_search(
    #[case] filter: StatusFilter,
    #[case] search: &str,
    #[case] expected: Vec<Status>,
) {
    let tasks = sample();
    assert_eq!(statuses(&filter_tasks(&tasks, filter, search)), expected);
}

#[test]
fn test_status_filter_rejects_unknown_values() {
    assert_eq!("in-progress".parse::<StatusFilter>().unwrap(), StatusFilter::InProgress);
    assert_eq!(" Done ".parse::<StatusFilter>().unwrap(), StatusFilter::Done);
    assert!("cancelled".parse::<StatusFilter>().is_err());
    assert!("bogus".parse::<StatusFilter>().is_err());
}

#[test]
fn test_status_filter_never_matches_cancelled_except_all() {
    for filter in StatusFilter::ALL {
        assert_eq!(filter.matches(Status::Cancelled), filter == StatusFilter::All);
    }
}

#[test]
fn test_task_query_narrows_by_category_and_priority() {
    let mut tasks = sample();
    tasks[0].category = Category::Finance;
    tasks[2].category = Category::Finance;
    tasks[2].priority = Priority::Urgent;

    let query = TaskQuery { category: Some(Category::Finance), ..TaskQuery::default() };
    assert_eq!(query.apply(&tasks).len(), 2);

    let query = TaskQuery {
        category: Some(Category::Finance),
        priority: Some(Priority::Urgent),
        search: "expenses".into(),
        ..TaskQuery::default()
    };
    let hits = query.apply(&tasks);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Report expenses");
}

#[test]
fn test_report_breakdowns_and_overdue() {
    let mut tasks = sample();
    tasks.push(task(5, "Dropped", Status::Cancelled));
    tasks[0].category = Category::Health;
    tasks[0].priority = Priority::High;
    tasks[0].actual_hours = 1.5;
    // Sample tasks end 2025-06-08; the todo and in-progress ones are overdue on the 10th.
    let report = build_report(&tasks, date(2025, 6, 10));

    assert_eq!(report.stats.total, 5);
    assert_eq!(report.cancelled, 1);
    assert_eq!(report.overdue, 2);
    assert_eq!(report.by_category.len(), Category::ALL.len());
    assert_eq!(report.by_category[0], (Category::Work, 4));
    assert!(report.by_category.contains(&(Category::Health, 1)));
    assert!(report.by_category.contains(&(Category::Education, 0)));
    assert_eq!(report.by_priority, vec![
        (Priority::Low, 0),
        (Priority::Medium, 4),
        (Priority::High, 1),
        (Priority::Urgent, 0),
    ]);
    assert_eq!(report.estimated_hours, 10.0);
    assert_eq!(report.actual_hours, 1.5);

    assert_eq!(build_report(&tasks, date(2025, 6, 8)).overdue, 0);
}

fn cycle_status() -> impl Strategy<Value = Status> {
    prop_oneof![Just(Status::Todo), Just(Status::InProgress), Just(Status::Done)]
}

proptest! {
    #[test]
    fn prop_counts_sum_to_total(all in prop::collection::vec(cycle_status(), 0..40)) {
        let tasks: Vec<Task> = all.iter().enumerate().map(|(i, s)| task(i as u64 + 1, "t", *s)).collect();
        let stats = aggregate_stats(&tasks);
        prop_assert_eq!(stats.completed + stats.in_progress + stats.todo, tasks.len());
        prop_assert!(stats.completion_rate <= 100);
    }

    #[test]
    fn prop_filter_is_a_subsequence(all in prop::collection::vec(cycle_status(), 0..20), f in 0usize..4) {
        let tasks: Vec<Task> = all.iter().enumerate().map(|(i, s)| task(i as u64 + 1, "t", *s)).collect();
        let filter = StatusFilter::ALL[f];
        let ids: Vec<_> = filter_tasks(&tasks, filter, "").iter().map(|t| t.id).collect();
        let expected: Vec<_> = tasks.iter().filter(|t| filter.matches(t.status)).map(|t| t.id).collect();
        prop_assert_eq!(ids, expected);
    }
}
