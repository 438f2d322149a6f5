use crewcall::db::repositories::assignment_repository::AssignmentRepository;
use crewcall::db::repositories::employee_repository::EmployeeRepository;
use crewcall::db::repositories::job_repository::JobRepository;
use crewcall::db::repositories::shift_repository::ShiftRepository;
use crewcall::db::DbPool;
use crewcall::models::conflict::{ConflictSeverity, SuggestionKind, TimeConflictKind};
use crewcall::models::employee::EmployeeCreateInput;
use crewcall::models::shift::{AssignmentCreateInput, RoleCode, ShiftCreateInput};
use crewcall::services::conflict_service::ConflictService;
use tempfile::tempdir;

fn create_service() -> (ConflictService, DbPool, tempfile::TempDir) {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("conflicts.sqlite")).expect("db pool");
    let service = ConflictService::new(pool.clone());
    pool.with_connection(|conn| {
        JobRepository::insert_client(conn, "client-1", "Harbor Arena")?;
        JobRepository::insert_job(conn, "job-1", "client-1", "Arena Load-In")
    })
    .expect("seed job");
    (service, pool, dir)
}

fn seed_employee(pool: &DbPool, id: &str, name: &str, input: EmployeeCreateInput) {
    let input = EmployeeCreateInput {
        name: name.into(),
        ..input
    };
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
async fn overlapping_proposal_is_flagged_high() {
    let (service, pool, _dir) = create_service();
    seed_employee(&pool, "emp-1", "Jo Field", EmployeeCreateInput::default());
    seed_assigned_shift(&pool, "shift-existing", "emp-1", "2024-01-10", "08:00", "16:00");

    let result = service
        .detect(
            "emp-1",
            "shift-new",
            RoleCode::GeneralLabor,
            "2024-01-10",
            "12:00",
            "20:00",
        )
        .await;

    assert!(result.has_conflicts);
    assert!(!result.degraded);
    let overlaps: Vec<_> = result
        .time_conflicts
        .iter()
        .filter(|c| c.kind == TimeConflictKind::Overlap)
        .collect();
    assert_eq!(overlaps.len(), 1);
    assert_eq!(overlaps[0].severity, ConflictSeverity::High);
    assert_eq!(overlaps[0].conflicting_shift_id, "shift-existing");
    // a high-severity conflict earns a time-adjustment suggestion
    assert!(result
        .suggestions
        .iter()
        .any(|s| s.kind == SuggestionKind::TimeAdjustment && s.priority == ConflictSeverity::High));
}

#[tokio::test]
async fn thirty_minute_gap_is_back_to_back_only() {
    let (service, pool, _dir) = create_service();
    seed_employee(&pool, "emp-1", "Jo Field", EmployeeCreateInput::default());
    seed_assigned_shift(&pool, "shift-day", "emp-1", "2024-01-10", "09:00", "17:00");

    let result = service
        .detect(
            "emp-1",
            "shift-new",
            RoleCode::GeneralLabor,
            "2024-01-10",
            "17:30",
            "21:00",
        )
        .await;

    assert!(result.has_conflicts);
    assert_eq!(result.time_conflicts.len(), 1);
    assert_eq!(result.time_conflicts[0].kind, TimeConflictKind::BackToBack);
    assert_eq!(result.time_conflicts[0].severity, ConflictSeverity::Medium);
    assert!(!result
        .time_conflicts
        .iter()
        .any(|c| c.kind == TimeConflictKind::Overlap));
}

#[tokio::test]
async fn uncertified_fork_proposal_gets_alternatives_and_role_change() {
    let (service, pool, _dir) = create_service();
    seed_employee(&pool, "emp-1", "Jo Field", EmployeeCreateInput::default());
    seed_employee(
        &pool,
        "emp-2",
        "Morgan Lift",
        EmployeeCreateInput {
            fork_operator_eligible: true,
            ..Default::default()
        },
    );

    let result = service
        .detect(
            "emp-1",
            "shift-new",
            RoleCode::ForkOperator,
            "2024-01-10",
            "08:00",
            "16:00",
        )
        .await;

    assert!(result.has_conflicts);
    assert!(result.time_conflicts.is_empty());
    assert_eq!(result.skill_conflicts.len(), 1);
    assert_eq!(
        result.skill_conflicts[0].missing_certifications,
        vec!["Fork Operator Certification".to_string()]
    );

    let alternatives: Vec<_> = result
        .suggestions
        .iter()
        .filter(|s| s.kind == SuggestionKind::AlternativeEmployee)
        .collect();
    assert!(!alternatives.is_empty());
    assert_eq!(alternatives[0].employee_name.as_deref(), Some("Morgan Lift"));

    let role_change = result
        .suggestions
        .iter()
        .find(|s| s.kind == SuggestionKind::RoleChange)
        .expect("role change suggestion");
    assert_eq!(role_change.suggested_role, Some(RoleCode::StageHand));
}

#[tokio::test]
async fn clean_proposal_reports_nothing() {
    let (service, pool, _dir) = create_service();
    seed_employee(&pool, "emp-1", "Jo Field", EmployeeCreateInput::default());
    seed_assigned_shift(&pool, "shift-far", "emp-1", "2024-01-20", "08:00", "16:00");

    let result = service
        .detect(
            "emp-1",
            "shift-new",
            RoleCode::GeneralLabor,
            "2024-01-10",
            "08:00",
            "16:00",
        )
        .await;

    assert!(!result.has_conflicts);
    assert!(result.time_conflicts.is_empty());
    assert!(result.skill_conflicts.is_empty());
    assert!(result.suggestions.is_empty());
    assert!(!result.degraded);
}

#[tokio::test]
async fn inverted_window_degrades_instead_of_erroring() {
    let (service, pool, _dir) = create_service();
    seed_employee(&pool, "emp-1", "Jo Field", EmployeeCreateInput::default());

    let result = service
        .detect(
            "emp-1",
            "shift-new",
            RoleCode::GeneralLabor,
            "2024-01-10",
            "20:00",
            "08:00",
        )
        .await;

    // the advisory contract holds: no panic, no error, just a degraded result
    assert!(result.degraded);
    assert!(result.time_conflicts.is_empty());
    assert!(!result.has_conflicts);
}
