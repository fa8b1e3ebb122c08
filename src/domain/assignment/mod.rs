//! Survey assignment aggregate and stored responses.
//!
//! An assignment is a time-boxed, scoped instance of a questionnaire.
//! Responses are keyed by `(assignment, question, employee)`; anonymous
//! responses share the null employee, so resubmitting overwrites.

mod errors;
mod response;
mod scope;
mod window;

pub use errors::AssignmentError;
pub use response::{AnswerItem, NewResponse, ResponseKey, SubmitOutcome, SurveyResponse};
pub use scope::{AssignmentScope, RespondentFilter, ScopeType};
pub use window::ValidityWindow;

use chrono::{DateTime, Utc};

use crate::domain::foundation::{AssignmentId, CompanyId, EmployeeId, QuestionnaireId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub id: AssignmentId,
    pub company_id: CompanyId,
    pub questionnaire_id: QuestionnaireId,
    pub scope: AssignmentScope,
    pub window: ValidityWindow,
    pub anonymous: bool,
}

impl Assignment {
    pub fn is_active(&self, at: DateTime<Utc>) -> bool {
        self.window.contains(at)
    }

    pub fn ensure_active(&self, at: DateTime<Utc>) -> Result<(), AssignmentError> {
        if self.is_active(at) {
            Ok(())
        } else {
            Err(AssignmentError::NotActive(self.id))
        }
    }

    pub fn is_company_wide(&self) -> bool {
        self.scope == AssignmentScope::Company
    }

    /// Respondent filter for reads against this assignment.
    pub fn respondent_filter(&self, employee_id: Option<EmployeeId>) -> RespondentFilter {
        RespondentFilter::resolve(self.anonymous, employee_id)
    }

    /// Points the assignment at another questionnaire and window in place.
    pub fn retarget(&mut self, questionnaire_id: QuestionnaireId, window: ValidityWindow, anonymous: bool) {
        self.questionnaire_id = questionnaire_id;
        self.window = window;
        self.anonymous = anonymous;
    }
}

/// An assignment not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssignment {
    pub company_id: CompanyId,
    pub questionnaire_id: QuestionnaireId,
    pub scope: AssignmentScope,
    pub window: ValidityWindow,
    pub anonymous: bool,
}

impl NewAssignment {
    /// Attaches the id assigned by the store.
    pub fn with_id(self, id: AssignmentId) -> Assignment {
        Assignment {
            id,
            company_id: self.company_id,
            questionnaire_id: self.questionnaire_id,
            scope: self.scope,
            window: self.window,
            anonymous: self.anonymous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn assignment(anonymous: bool) -> Assignment {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        NewAssignment {
            company_id: CompanyId::new(1),
            questionnaire_id: QuestionnaireId::new(1),
            scope: AssignmentScope::Company,
            window: ValidityWindow::new(start, start + Duration::days(30)).unwrap(),
            anonymous,
        }
        .with_id(AssignmentId::new(10))
    }

    #[test]
    fn ensure_active_rejects_outside_window() {
        let a = assignment(false);
        let inside = a.window.starts_at() + Duration::days(1);
        let after = a.window.ends_at() + Duration::seconds(1);
        assert!(a.ensure_active(inside).is_ok());
        assert_eq!(a.ensure_active(after), Err(AssignmentError::NotActive(AssignmentId::new(10))));
    }

    #[test]
    fn retarget_keeps_identity() {
        let mut a = assignment(false);
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        let window = ValidityWindow::around(now, Duration::hours(1), Duration::days(3650)).unwrap();
        a.retarget(QuestionnaireId::new(7), window, true);
        assert_eq!(a.id, AssignmentId::new(10));
        assert_eq!(a.questionnaire_id, QuestionnaireId::new(7));
        assert!(a.anonymous);
        assert!(a.is_active(now));
    }

    #[test]
    fn respondent_filter_ignores_employee_on_anonymous() {
        let a = assignment(true);
        assert_eq!(
            a.respondent_filter(Some(EmployeeId::new(3))),
            RespondentFilter::AnonymousOnly
        );
    }
}
