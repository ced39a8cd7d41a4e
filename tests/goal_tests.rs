// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{leaf_matches, resource_matches, ymd, FakeBackend};
use finpulse::api::Backend;
use finpulse::calc::goals::{progress_percentage, projected_progress, summarize};
use finpulse::commands::goals;
use finpulse::error::Error;
use finpulse::models::{GoalStatus, SavingsGoal};
use rust_decimal::Decimal;

fn goal(name: &str, target: i64, saved: i64, deadline: (i32, u32, u32), status: GoalStatus) -> SavingsGoal {
    SavingsGoal {
        id: None,
        goal_name: name.into(),
        category: "Travel".into(),
        target_amount: Decimal::from(target),
        current_saved: Decimal::from(saved),
        deadline: ymd(deadline.0, deadline.1, deadline.2),
        status,
    }
}

#[test]
fn summary_covers_active_goals_only() {
    let today = ymd(2025, 1, 1);
    let list = vec![
        goal("Trip", 1200, 200, (2025, 1, 1), GoalStatus::Active),
        goal("Phone", 600, 600, (2025, 6, 1), GoalStatus::Active),
        goal("Bike", 9000, 9000, (2024, 12, 1), GoalStatus::Completed),
    ];
    let s = summarize(&list, today);
    assert_eq!(s.active, 2);
    assert_eq!(s.completed, 1);
    assert_eq!(s.total_saved, Decimal::from(800));
    assert_eq!(s.total_target, Decimal::from(1800));
    // Trip is due today and needs its whole remainder; Phone is met
    assert_eq!(s.total_required_monthly, Decimal::from(1000));
}

#[test]
fn progress_is_capped_when_projected() {
    assert_eq!(
        progress_percentage(Decimal::from(250), Decimal::from(1000)),
        Decimal::from(25)
    );
    assert_eq!(progress_percentage(Decimal::from(5), Decimal::ZERO), Decimal::ZERO);
    assert_eq!(
        projected_progress(Decimal::from(900), Decimal::from(1000), Decimal::from(500)),
        Decimal::from(100)
    );
}

#[test]
fn rows_zero_rate_for_completed() {
    let today = ymd(2025, 1, 1);
    let rows = goals::goal_rows(
        &[goal("Bike", 9000, 8000, (2024, 12, 1), GoalStatus::Completed)],
        today,
    );
    assert_eq!(rows[0].required_monthly, Decimal::ZERO);
    assert_eq!(rows[0].remaining, Decimal::from(1000));
    assert_eq!(rows[0].status, "Completed");
}

#[test]
fn add_money_requires_positive_amount() {
    let api = FakeBackend::new();
    api.seed(&[goal("Trip", 1200, 200, (2025, 12, 1), GoalStatus::Active)]);
    let m = resource_matches(&["finpulse", "goal", "add-money", "--id", "id1", "--amount", "0"]);
    let err = goals::handle(&api, &m).unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Validation(_))));
    assert!(api.calls().is_empty());
}

#[test]
fn add_money_posts_and_refetches() {
    let api = FakeBackend::new();
    api.seed(&[goal("Trip", 1200, 200, (2025, 12, 1), GoalStatus::Active)]);
    let m = resource_matches(&["finpulse", "goal", "add-money", "--id", "id1", "--amount", "1000"]);
    goals::handle(&api, &m).unwrap();
    assert_eq!(
        api.calls(),
        vec!["GET savinggoals", "POST savinggoals/id1/add-money", "GET savinggoals"]
    );
    let after: Vec<SavingsGoal> = api.list().unwrap();
    assert_eq!(after[0].current_saved, Decimal::from(1200));
    assert_eq!(after[0].status, GoalStatus::Completed);
}

#[test]
fn add_defaults_to_active_with_nothing_saved() {
    let m = leaf_matches(&[
        "finpulse", "goal", "add", "--name", "Laptop", "--category", "Gadget", "--target",
        "90000", "--deadline", "2026-03-31",
    ]);
    let g = goals::goal_from_args(&m).unwrap();
    assert_eq!(g.status, GoalStatus::Active);
    assert_eq!(g.current_saved, Decimal::ZERO);
    assert_eq!(g.deadline, ymd(2026, 3, 31));
}
