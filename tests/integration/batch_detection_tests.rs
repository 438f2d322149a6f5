use crewcall::db::repositories::assignment_repository::AssignmentRepository;
use crewcall::db::repositories::employee_repository::EmployeeRepository;
use crewcall::db::repositories::job_repository::JobRepository;
use crewcall::db::repositories::shift_repository::ShiftRepository;
use crewcall::db::DbPool;
use crewcall::models::employee::EmployeeCreateInput;
use crewcall::models::shift::{AssignmentCreateInput, RoleCode, ShiftCreateInput};
use crewcall::services::conflict_service::{BatchAssignment, ConflictService};
use tempfile::tempdir;

fn create_service() -> (ConflictService, DbPool, tempfile::TempDir) {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("batch.sqlite")).expect("db pool");
    let service = ConflictService::new(pool.clone());
    pool.with_connection(|conn| {
        JobRepository::insert_client(conn, "client-1", "Harbor Arena")?;
        JobRepository::insert_job(conn, "job-1", "client-1", "Arena Load-In")
    })
    .expect("seed job");
    (service, pool, dir)
}

fn seed_employee(pool: &DbPool, id: &str, name: &str) {
    pool.with_connection(|conn| {
        EmployeeRepository::insert(
            conn,
            id,
            &EmployeeCreateInput {
                name: name.into(),
                ..Default::default()
            },
        )
    })
    .expect("insert employee");
}

fn seed_assigned_shift(pool: &DbPool, shift_id: &str, employee_id: &str) {
    pool.with_connection(|conn| {
        ShiftRepository::insert(
            conn,
            shift_id,
            &ShiftCreateInput {
                job_id: "job-1".into(),
                shift_date: "2024-01-10".into(),
                start_time: "10:00".into(),
                end_time: "18:00".into(),
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
async fn batch_keys_results_by_employee_and_isolates_conflicts() {
    let (service, pool, _dir) = create_service();
    seed_employee(&pool, "emp-free", "Freya Free");
    seed_employee(&pool, "emp-busy", "Busy Bee");
    seed_assigned_shift(&pool, "shift-existing", "emp-busy");

    let assignments = vec![
        BatchAssignment {
            employee_id: "emp-free".into(),
            role: RoleCode::GeneralLabor,
        },
        BatchAssignment {
            employee_id: "emp-busy".into(),
            role: RoleCode::GeneralLabor,
        },
    ];

    let results = service
        .detect_batch(&assignments, "shift-new", "2024-01-10", "09:00", "17:00")
        .await;

    assert_eq!(results.len(), 2);
    assert!(!results["emp-free"].has_conflicts);
    assert!(results["emp-busy"].has_conflicts);
    assert!(!results["emp-busy"].time_conflicts.is_empty());
}

#[tokio::test]
async fn duplicate_employee_ids_collapse_to_one_entry() {
    let (service, pool, _dir) = create_service();
    seed_employee(&pool, "emp-1", "Jo Field");

    let assignments = vec![
        BatchAssignment {
            employee_id: "emp-1".into(),
            role: RoleCode::GeneralLabor,
        },
        BatchAssignment {
            employee_id: "emp-1".into(),
            role: RoleCode::ForkOperator,
        },
    ];

    let results = service
        .detect_batch(&assignments, "shift-new", "2024-01-10", "09:00", "17:00")
        .await;

    // last write wins: the fork-operator check (which conflicts) survives
    assert_eq!(results.len(), 1);
    assert!(results["emp-1"].has_conflicts);
    assert_eq!(results["emp-1"].skill_conflicts.len(), 1);
}

#[tokio::test]
async fn unknown_employees_fail_open_without_poisoning_the_batch() {
    let (service, pool, _dir) = create_service();
    seed_employee(&pool, "emp-1", "Jo Field");

    let assignments = vec![
        BatchAssignment {
            employee_id: "emp-1".into(),
            role: RoleCode::GeneralLabor,
        },
        BatchAssignment {
            employee_id: "ghost".into(),
            role: RoleCode::CrewChief,
        },
    ];

    let results = service
        .detect_batch(&assignments, "shift-new", "2024-01-10", "09:00", "17:00")
        .await;

    assert_eq!(results.len(), 2);
    assert!(!results["emp-1"].has_conflicts);
    // missing entities are "no conflicts", not errors
    assert!(!results["ghost"].has_conflicts);
    assert!(!results["ghost"].degraded);
}
