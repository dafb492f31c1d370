use log::{error, info};
use sqlx::PgPool;

use crate::error::AppResult;
use crate::models::{BugStatus, NewBug, UserRole};
use crate::services::{BugService, UsersService};

/// Seeding is skipped once the installation has more users than this
pub const SEED_USER_THRESHOLD: i64 = 5;

/// Outcome of the seed routine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Skipped,
    Seeded { users: usize, bugs: usize },
}

/// Which demo user a sample bug references
#[derive(Clone, Copy)]
enum DemoUser {
    Admin,
    Developer,
}

struct SampleBug {
    serial_no: i32,
    title: &'static str,
    description: &'static str,
    steps: Option<&'static str>,
    priority: i16,
    status: BugStatus,
    created_by: DemoUser,
    assigned_to: Option<DemoUser>,
}

const SAMPLE_BUGS: [SampleBug; 5] = [
    SampleBug {
        serial_no: 1,
        title: "Login button not working on Safari",
        description: "When using Safari browser, clicking the login button does nothing. No errors in console.",
        steps: Some("1. Open the application in Safari\n2. Enter valid credentials\n3. Click login button\n4. Observe that nothing happens"),
        priority: 3,
        status: BugStatus::Open,
        created_by: DemoUser::Admin,
        assigned_to: None,
    },
    SampleBug {
        serial_no: 2,
        title: "Dashboard shows incorrect statistics",
        description: "The total count on the dashboard is showing 250 but there are only 200 items in the database.",
        steps: Some("1. Login as admin\n2. Navigate to dashboard\n3. Check the total count vs actual items"),
        priority: 2,
        status: BugStatus::InProgress,
        created_by: DemoUser::Admin,
        assigned_to: Some(DemoUser::Developer),
    },
    SampleBug {
        serial_no: 3,
        title: "Application crashes on file upload",
        description: "When uploading files larger than 5MB, the entire application crashes and shows a white screen.",
        steps: None,
        priority: 5,
        status: BugStatus::Open,
        created_by: DemoUser::Developer,
        assigned_to: None,
    },
    SampleBug {
        serial_no: 4,
        title: "Text formatting issue in reports",
        description: "When generating PDF reports, the text formatting is broken for non-latin characters.",
        steps: None,
        priority: 2,
        status: BugStatus::Resolved,
        created_by: DemoUser::Admin,
        assigned_to: Some(DemoUser::Developer),
    },
    SampleBug {
        serial_no: 5,
        title: "Mobile menu not closing",
        description: "On mobile devices, after opening the hamburger menu, it cannot be closed again.",
        steps: Some("1. Open app on mobile device\n2. Click hamburger menu to open\n3. Try to close the menu\n4. Observe it remains open"),
        priority: 3,
        status: BugStatus::InProgress,
        created_by: DemoUser::Admin,
        assigned_to: Some(DemoUser::Admin),
    },
];

/// Populates demo users and sample bugs when the installation is (nearly) empty.
///
/// Serial numbers of the sample bugs are fixed (1-5). Everything runs in one
/// transaction: a re-run that collides with existing emails or serials is
/// rolled back as a whole.
pub async fn seed_demo_data(pool: &PgPool) -> AppResult<SeedOutcome> {
    let user_count = UsersService::user_count(pool).await?;
    if user_count > SEED_USER_THRESHOLD {
        info!("Database already has users, skipping seed");
        return Ok(SeedOutcome::Skipped);
    }

    let mut tx = pool.begin().await?;

    let admin =
        UsersService::create_user_tx(&mut tx, "admin1", "admin1@gmail.com", "admin", UserRole::Admin)
            .await?;
    info!("Demo user created");

    let developer = UsersService::create_user_tx(
        &mut tx,
        "shivam1",
        "shivam1@gmail.com",
        "shivam",
        UserRole::Developer,
    )
    .await?;
    info!("Developer user created");

    let user_id = |who: DemoUser| match who {
        DemoUser::Admin => admin.id,
        DemoUser::Developer => developer.id,
    };

    for sample in &SAMPLE_BUGS {
        let input = NewBug {
            title: sample.title.to_string(),
            description: sample.description.to_string(),
            steps: sample.steps.map(str::to_string),
            priority: sample.priority,
            screenshot: None,
            created_by: user_id(sample.created_by),
        };

        BugService::insert_with_serial(
            &mut tx,
            sample.serial_no,
            &input,
            sample.status,
            sample.assigned_to.map(user_id),
        )
        .await?;
    }
    info!("Sample bugs created");

    tx.commit().await?;
    info!("Seed data created successfully");

    Ok(SeedOutcome::Seeded {
        users: 2,
        bugs: SAMPLE_BUGS.len(),
    })
}

/// Runs the seed routine at startup. Failures are logged, never fatal.
pub async fn run_seed(pool: &PgPool) {
    if let Err(e) = seed_demo_data(pool).await {
        error!("Error creating seed data: {}", e);
    }
}
