//! Integration tests for the demo data seed routine

use bugtrack::bootstrap::{seed_demo_data, SeedOutcome};
use bugtrack::models::BugStatus;
use bugtrack::services::{BugService, UsersService};
use pretty_assertions::assert_eq;

use crate::common::{create_bug, create_user, TestDb};

#[tokio::test]
async fn test_seed_creates_demo_users_and_bugs() {
    let db = TestDb::new().await;

    let outcome = seed_demo_data(&db.pool).await.unwrap();
    assert_eq!(outcome, SeedOutcome::Seeded { users: 2, bugs: 5 });

    let admin = UsersService::get_by_email(&db.pool, "admin1@gmail.com")
        .await
        .unwrap()
        .expect("admin should exist");
    assert!(admin.verify_password("admin").unwrap());

    let developer = UsersService::get_by_email(&db.pool, "shivam1@gmail.com")
        .await
        .unwrap()
        .expect("developer should exist");

    let bugs = BugService::list(&db.pool).await.unwrap();
    let mut serials: Vec<i32> = bugs.iter().map(|b| b.serial_no).collect();
    serials.sort_unstable();
    assert_eq!(serials, vec![1, 2, 3, 4, 5]);

    let blocker = bugs.iter().find(|b| b.serial_no == 3).unwrap();
    assert_eq!(blocker.title, "Application crashes on file upload");
    assert_eq!(blocker.priority, 5);
    assert_eq!(blocker.created_by, developer.id);

    let dashboard = bugs.iter().find(|b| b.serial_no == 2).unwrap();
    assert_eq!(dashboard.status, BugStatus::InProgress);
    assert_eq!(dashboard.assigned_to, Some(developer.id));
    assert_eq!(dashboard.assigned_to_name.as_deref(), Some("shivam1"));

    let menu = bugs.iter().find(|b| b.serial_no == 5).unwrap();
    assert_eq!(menu.assigned_to, Some(admin.id));
}

#[tokio::test]
async fn test_serials_continue_after_seed() {
    let db = TestDb::seeded().await;

    let (user, _) = create_user(&db.pool, "reporter").await;
    let bug = create_bug(&db.pool, user.id, "After seed", "Next serial").await;

    assert_eq!(bug.serial_no, 6);
}

#[tokio::test]
async fn test_seed_rerun_rolls_back() {
    let db = TestDb::seeded().await;

    // Two users is below the threshold, so the routine runs again and collides
    assert!(seed_demo_data(&db.pool).await.is_err());

    assert_eq!(UsersService::user_count(&db.pool).await.unwrap(), 2);
    assert_eq!(BugService::count(&db.pool).await.unwrap(), 5);
}

#[tokio::test]
async fn test_seed_skipped_with_many_users() {
    let db = TestDb::new().await;

    for i in 0..6 {
        create_user(&db.pool, &format!("user{}", i)).await;
    }

    let outcome = seed_demo_data(&db.pool).await.unwrap();
    assert_eq!(outcome, SeedOutcome::Skipped);
    assert_eq!(BugService::count(&db.pool).await.unwrap(), 0);
}
