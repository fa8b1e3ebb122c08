//! End-to-end survey flow over the in-memory store.
//!
//! Provision → answer → progress → dashboard → export, wired through the
//! application handlers exactly as the HTTP layer wires them.

mod common;

use std::sync::Arc;

use tacticsphere::adapters::InMemorySurveyStore;
use tacticsphere::application::handlers::analytics::{
    ExportAuditLogHandler, ExportAuditLogQuery, ExportResponsesCommand, ExportResponsesHandler,
    GetDashboardAnalyticsHandler, GetDashboardAnalyticsQuery,
};
use tacticsphere::application::handlers::survey::{
    EnsureAutoAssignmentCommand, EnsureAutoAssignmentHandler, GetAssignmentProgressHandler,
    GetAssignmentProgressQuery, GetPillarQuestionsHandler, GetPillarQuestionsQuery,
    SubmitAnswersCommand, SubmitAnswersHandler,
};
use tacticsphere::domain::analytics::{AnalyticsError, AnalyticsFilters};
use tacticsphere::domain::assignment::{AnswerItem, Assignment, AssignmentError};
use tacticsphere::domain::audit::AuditAction;
use tacticsphere::domain::foundation::{CallerIdentity, EmployeeId, QuestionId};

use common::*;

// =============================================================================
// Helpers
// =============================================================================

async fn provision(store: &Arc<InMemorySurveyStore>, anonymous: bool) -> Assignment {
    EnsureAutoAssignmentHandler::new(store.clone(), store.clone(), store.clone(), store.clone())
        .handle(EnsureAutoAssignmentCommand {
            caller: system_admin(),
            company_id: ACME,
            anonymous,
        })
        .await
        .unwrap()
        .assignment
}

fn answer(question: i64, value: &str) -> AnswerItem {
    AnswerItem {
        question_id: QuestionId::new(question),
        value: Some(value.to_string()),
    }
}

async fn submit(
    store: &Arc<InMemorySurveyStore>,
    caller: CallerIdentity,
    assignment: &Assignment,
    employee_id: Option<EmployeeId>,
    answers: Vec<AnswerItem>,
) -> Result<(u32, u32), AssignmentError> {
    let outcome = SubmitAnswersHandler::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    )
    .handle(SubmitAnswersCommand {
        caller,
        assignment_id: assignment.id,
        employee_id,
        answers,
    })
    .await?;
    Ok((outcome.created, outcome.updated))
}

// =============================================================================
// Survey Flow
// =============================================================================

#[tokio::test]
async fn provisioning_twice_reuses_the_assignment() {
    let store = seeded_store().await;

    let first = provision(&store, false).await;
    let second = provision(&store, true).await;

    assert_eq!(first.id, second.id);
    assert!(second.anonymous);
    assert_eq!(store.assignment_count().await, 1);
}

#[tokio::test]
async fn answers_drive_progress_for_the_respondent() {
    let store = seeded_store().await;
    let assignment = provision(&store, false).await;

    let written = submit(
        &store,
        member_of(ACME),
        &assignment,
        Some(ANA),
        vec![answer(11, "5"), answer(12, "3"), answer(21, "yes")],
    )
    .await
    .unwrap();
    assert_eq!(written, (3, 0));

    let progress = GetAssignmentProgressHandler::new(store.clone(), store.clone())
        .handle(GetAssignmentProgressQuery {
            caller: member_of(ACME),
            assignment_id: assignment.id,
            employee_id: Some(ANA),
        })
        .await
        .unwrap();

    assert_eq!(progress.total, 4);
    assert_eq!(progress.answered, 3);
    assert!((progress.completion - 0.75).abs() < 1e-9);

    // Another employee has answered nothing
    let other = GetAssignmentProgressHandler::new(store.clone(), store.clone())
        .handle(GetAssignmentProgressQuery {
            caller: member_of(ACME),
            assignment_id: assignment.id,
            employee_id: Some(LUIS),
        })
        .await
        .unwrap();
    assert_eq!(other.answered, 0);
}

#[tokio::test]
async fn resubmission_updates_in_place() {
    let store = seeded_store().await;
    let assignment = provision(&store, true).await;

    submit(&store, member_of(ACME), &assignment, None, vec![answer(11, "2")])
        .await
        .unwrap();
    let written = submit(&store, member_of(ACME), &assignment, None, vec![answer(11, "4")])
        .await
        .unwrap();

    assert_eq!(written, (0, 1));
    assert_eq!(store.response_count().await, 1);
    assert_eq!(store.responses().await[0].value, "4");
}

#[tokio::test]
async fn identified_assignment_requires_an_employee() {
    let store = seeded_store().await;
    let assignment = provision(&store, false).await;

    let err = submit(&store, member_of(ACME), &assignment, None, vec![answer(11, "3")])
        .await
        .unwrap_err();

    assert_eq!(err, AssignmentError::EmployeeRequired);
}

#[tokio::test]
async fn other_tenants_cannot_answer() {
    let store = seeded_store().await;
    let assignment = provision(&store, true).await;

    let err = submit(&store, member_of(GLOBEX), &assignment, None, vec![answer(11, "3")])
        .await
        .unwrap_err();

    assert!(matches!(err, AssignmentError::Forbidden(_)));
    assert_eq!(store.response_count().await, 0);
}

#[tokio::test]
async fn pillar_questions_show_current_answers() {
    let store = seeded_store().await;
    let assignment = provision(&store, false).await;
    submit(&store, member_of(ACME), &assignment, Some(ANA), vec![answer(12, "4")])
        .await
        .unwrap();

    let handler = GetPillarQuestionsHandler::new(store.clone(), store.clone(), store.clone());
    let as_member = handler
        .handle(GetPillarQuestionsQuery {
            caller: member_of(ACME),
            assignment_id: assignment.id,
            pillar_id: INFRA,
            employee_id: Some(ANA),
        })
        .await
        .unwrap();

    let ids: Vec<i64> = as_member.iter().map(|q| q.id.get()).collect();
    assert_eq!(ids, vec![11, 12]);
    assert_eq!(as_member[0].answer, None);
    assert_eq!(as_member[1].answer.as_deref(), Some("4"));
    assert!(as_member.iter().all(|q| q.expected_answer.is_none()));

    let as_analyst = handler
        .handle(GetPillarQuestionsQuery {
            caller: analyst(),
            assignment_id: assignment.id,
            pillar_id: INFRA,
            employee_id: Some(ANA),
        })
        .await
        .unwrap();
    assert!(as_analyst.iter().all(|q| q.expected_answer.is_some()));
}

// =============================================================================
// Analytics and Exports
// =============================================================================

#[tokio::test]
async fn dashboard_reflects_submitted_likert_answers() {
    let store = seeded_store().await;
    let assignment = provision(&store, false).await;
    submit(
        &store,
        member_of(ACME),
        &assignment,
        Some(ANA),
        vec![answer(11, "5"), answer(12, "5"), answer(22, "free text")],
    )
    .await
    .unwrap();

    let report = GetDashboardAnalyticsHandler::new(store.clone())
        .handle(GetDashboardAnalyticsQuery {
            caller: analyst(),
            company_id: Some(ACME),
            filters: AnalyticsFilters::default(),
            include_timeline: true,
        })
        .await
        .unwrap();

    assert_eq!(report.pillars.len(), 1);
    assert_eq!(report.pillars[0].pillar_id, INFRA);
    assert_eq!(report.kpis.coverage_respondents, 1);
    assert_eq!(report.likert_levels.len(), 5);
}

#[tokio::test]
async fn global_dashboard_is_reserved_for_system_admins() {
    let store = seeded_store().await;
    let handler = GetDashboardAnalyticsHandler::new(store.clone());

    let err = handler
        .handle(GetDashboardAnalyticsQuery {
            caller: analyst(),
            company_id: None,
            filters: AnalyticsFilters::default(),
            include_timeline: false,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AnalyticsError::Forbidden(_)));

    let report = handler
        .handle(GetDashboardAnalyticsQuery {
            caller: system_admin(),
            company_id: None,
            filters: AnalyticsFilters::default(),
            include_timeline: false,
        })
        .await
        .unwrap();
    assert_eq!(report.filters.company_id, None);
}

#[tokio::test]
async fn response_export_is_audited() {
    let store = seeded_store().await;
    let assignment = provision(&store, false).await;
    submit(&store, member_of(ACME), &assignment, Some(LUIS), vec![answer(11, "2")])
        .await
        .unwrap();

    let export = ExportResponsesHandler::new(store.clone(), store.clone())
        .handle(ExportResponsesCommand {
            caller: analyst(),
            company_id: ACME,
            filters: AnalyticsFilters::default(),
        })
        .await
        .unwrap();

    assert_eq!(export.rows.len(), 1);
    assert_eq!(export.rows[0].employee_name.as_deref(), Some("Luis"));
    assert!(export.file_name.ends_with(".csv"));

    let actions: Vec<AuditAction> = store
        .audit_entries()
        .await
        .iter()
        .map(|r| r.entry.action)
        .collect();
    assert!(actions.contains(&AuditAction::ReportExport));

    let audit = ExportAuditLogHandler::new(store.clone())
        .handle(ExportAuditLogQuery {
            caller: analyst(),
            company_id: Some(ACME),
            limit: None,
        })
        .await
        .unwrap();
    assert_eq!(audit.rows.len(), actions.len());
}

#[tokio::test]
async fn members_cannot_export() {
    let store = seeded_store().await;

    let err = ExportResponsesHandler::new(store.clone(), store.clone())
        .handle(ExportResponsesCommand {
            caller: member_of(ACME),
            company_id: ACME,
            filters: AnalyticsFilters::default(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AnalyticsError::Forbidden(_)));
}
