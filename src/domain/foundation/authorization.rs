//! Company-level access rules.
//!
//! Elevated roles see every company. Everyone else is confined to the
//! company recorded on their identity. Cross-tenant analytics is reserved
//! for platform operators.

use serde::Serialize;
use thiserror::Error;

use super::{CallerIdentity, CompanyId, DomainError, ErrorCode, Role};

/// Reasons an access check can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("Caller account is deactivated")]
    Inactive,

    #[error("Caller has no access to company {0}")]
    CompanyForbidden(CompanyId),

    #[error("Only platform administrators may query all companies")]
    GlobalScopeForbidden,
}

impl From<AccessError> for DomainError {
    fn from(err: AccessError) -> Self {
        DomainError::new(ErrorCode::Forbidden, err.to_string())
    }
}

/// Which companies an analytics query aggregates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnalyticsScope {
    SingleCompany(CompanyId),
    AllCompanies,
}

impl AnalyticsScope {
    /// The selected company, `None` for the global scope.
    pub fn company_id(&self) -> Option<CompanyId> {
        match self {
            AnalyticsScope::SingleCompany(id) => Some(*id),
            AnalyticsScope::AllCompanies => None,
        }
    }
}

/// Role table used to decide company access.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    elevated: Vec<Role>,
    global: Vec<Role>,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            elevated: vec![Role::SystemAdmin, Role::Admin, Role::Analyst],
            global: vec![Role::SystemAdmin],
        }
    }
}

impl AccessPolicy {
    /// True if the caller holds a role with access to every company.
    pub fn is_elevated(&self, caller: &CallerIdentity) -> bool {
        self.elevated.contains(&caller.role)
    }

    /// Checks the caller may read or write data of `company_id`.
    pub fn ensure_company_access(
        &self,
        caller: &CallerIdentity,
        company_id: CompanyId,
    ) -> Result<(), AccessError> {
        if !caller.active {
            return Err(AccessError::Inactive);
        }
        if self.is_elevated(caller) || caller.company_id == Some(company_id) {
            Ok(())
        } else {
            Err(AccessError::CompanyForbidden(company_id))
        }
    }

    /// Resolves the scope of an analytics query.
    ///
    /// Without a company only global-scope roles may proceed; everyone
    /// else gets `GlobalScopeForbidden`.
    pub fn resolve_analytics_scope(
        &self,
        caller: &CallerIdentity,
        company_id: Option<CompanyId>,
    ) -> Result<AnalyticsScope, AccessError> {
        if !caller.active {
            return Err(AccessError::Inactive);
        }
        match company_id {
            Some(id) => {
                self.ensure_company_access(caller, id)?;
                Ok(AnalyticsScope::SingleCompany(id))
            }
            None if self.global.contains(&caller.role) => Ok(AnalyticsScope::AllCompanies),
            None => Err(AccessError::GlobalScopeForbidden),
        }
    }
}
