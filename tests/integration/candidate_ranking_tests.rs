use crewcall::db::repositories::assignment_repository::AssignmentRepository;
use crewcall::db::repositories::employee_repository::EmployeeRepository;
use crewcall::db::repositories::job_repository::JobRepository;
use crewcall::db::repositories::shift_repository::ShiftRepository;
use crewcall::db::DbPool;
use crewcall::models::employee::EmployeeCreateInput;
use crewcall::models::shift::{AssignmentCreateInput, RoleCode, ShiftCreateInput};
use crewcall::services::conflict_service::ConflictService;
use tempfile::tempdir;

fn create_service() -> (ConflictService, DbPool, tempfile::TempDir) {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("ranking.sqlite")).expect("db pool");
    let service = ConflictService::new(pool.clone());
    pool.with_connection(|conn| {
        JobRepository::insert_client(conn, "client-1", "Harbor Arena")?;
        JobRepository::insert_job(conn, "job-1", "client-1", "Arena Load-In")
    })
    .expect("seed job");
    (service, pool, dir)
}

fn seed_employee(pool: &DbPool, id: &str, input: EmployeeCreateInput) {
    pool.with_connection(|conn| EmployeeRepository::insert(conn, id, &input))
        .expect("insert employee");
}

fn seed_assigned_shift(
    pool: &DbPool,
    shift_id: &str,
    employee_id: &str,
    date: &str,
    start: &str,
    end: &str,
) {
    pool.with_connection(|conn| {
        ShiftRepository::insert(
            conn,
            shift_id,
            &ShiftCreateInput {
                job_id: "job-1".into(),
                shift_date: date.into(),
                start_time: start.into(),
                end_time: end.into(),
                status: None,
            },
        )?;
        AssignmentRepository::insert(
            conn,
            &AssignmentCreateInput {
                shift_id: shift_id.into(),
                employee_id: employee_id.into(),
                role_code: "GL".into(),
                status: None,
            },
        )
    })
    .expect("seed assigned shift");
}

#[tokio::test]
async fn higher_performance_never_ranks_below_equal_candidate() {
    let (service, pool, _dir) = create_service();
    seed_employee(
        &pool,
        "emp-low",
        EmployeeCreateInput {
            name: "Alex Low".into(),
            performance: Some(2.0),
            ..Default::default()
        },
    );
    seed_employee(
        &pool,
        "emp-high",
        EmployeeCreateInput {
            name: "Alex High".into(),
            performance: Some(4.5),
            ..Default::default()
        },
    );

    let ranked = service
        .rank_candidates(RoleCode::GeneralLabor, "2024-01-10", "08:00", "16:00", &[])
        .await;

    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].employee_id, "emp-high");
    assert!(ranked[0].score >= ranked[1].score);
    assert_eq!(ranked[0].score, 4.5);
    assert_eq!(ranked[1].score, 2.0);
}

#[tokio::test]
async fn conflicts_drag_the_score_down_and_clamp_at_zero() {
    let (service, pool, _dir) = create_service();
    // unrated employee defaults to 3; an overlap (-2) and a short rest leave 1
    seed_employee(
        &pool,
        "emp-busy",
        EmployeeCreateInput {
            name: "Busy Bee".into(),
            ..Default::default()
        },
    );
    seed_assigned_shift(&pool, "shift-mid", "emp-busy", "2024-01-10", "12:00", "20:00");

    // rated 1.0 with the same overlap clamps to zero rather than going negative
    seed_employee(
        &pool,
        "emp-floor",
        EmployeeCreateInput {
            name: "Flora Floor".into(),
            performance: Some(1.0),
            ..Default::default()
        },
    );
    seed_assigned_shift(&pool, "shift-mid-2", "emp-floor", "2024-01-10", "12:00", "20:00");

    let ranked = service
        .rank_candidates(RoleCode::GeneralLabor, "2024-01-10", "08:00", "16:00", &[])
        .await;

    let busy = ranked
        .iter()
        .find(|c| c.employee_id == "emp-busy")
        .expect("busy candidate");
    assert_eq!(busy.score, 1.0);
    assert!(busy.conflicts.has_conflicts);

    let floor = ranked
        .iter()
        .find(|c| c.employee_id == "emp-floor")
        .expect("floor candidate");
    assert_eq!(floor.score, 0.0);
}

#[tokio::test]
async fn sitting_crew_chiefs_get_the_leadership_bonus() {
    let (service, pool, _dir) = create_service();
    seed_employee(
        &pool,
        "emp-flag",
        EmployeeCreateInput {
            name: "Flag Holder".into(),
            crew_chief_eligible: true,
            performance: Some(3.0),
            ..Default::default()
        },
    );
    seed_employee(
        &pool,
        "emp-chief",
        EmployeeCreateInput {
            name: "Sam Chief".into(),
            title: Some("Crew Chief".into()),
            performance: Some(3.0),
            ..Default::default()
        },
    );

    let ranked = service
        .rank_candidates(RoleCode::CrewChief, "2024-01-10", "08:00", "16:00", &[])
        .await;

    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].employee_id, "emp-chief");
    assert_eq!(ranked[0].score, 4.0);
    assert_eq!(ranked[1].score, 3.0);
}

#[tokio::test]
async fn ranking_caps_at_ten_and_respects_exclusions() {
    let (service, pool, _dir) = create_service();
    for index in 0..12 {
        seed_employee(
            &pool,
            &format!("emp-{index:02}"),
            EmployeeCreateInput {
                name: format!("Worker {index:02}"),
                ..Default::default()
            },
        );
    }

    let excluded = vec!["emp-00".to_string()];
    let ranked = service
        .rank_candidates(
            RoleCode::GeneralLabor,
            "2024-01-10",
            "08:00",
            "16:00",
            &excluded,
        )
        .await;

    assert_eq!(ranked.len(), 10);
    assert!(ranked.iter().all(|c| c.employee_id != "emp-00"));
}

#[tokio::test]
async fn ineligible_employees_never_enter_the_pool() {
    let (service, pool, _dir) = create_service();
    seed_employee(
        &pool,
        "emp-plain",
        EmployeeCreateInput {
            name: "Pat Plain".into(),
            ..Default::default()
        },
    );
    seed_employee(
        &pool,
        "emp-cert",
        EmployeeCreateInput {
            name: "Fern Fork".into(),
            fork_operator_eligible: true,
            ..Default::default()
        },
    );

    let ranked = service
        .rank_candidates(RoleCode::ForkOperator, "2024-01-10", "08:00", "16:00", &[])
        .await;

    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].employee_id, "emp-cert");
    assert!(!ranked[0].conflicts.has_conflicts);
}
