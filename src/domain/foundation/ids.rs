//! Strongly-typed identifier value objects.
//!
//! Every persisted entity is keyed by a database-assigned integer. The
//! newtypes keep a `PillarId` from being passed where a `QuestionId` is
//! expected, which the aggregation maps rely on heavily.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw database id.
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw database id.
            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|_| ValidationError::invalid_format($label, format!("'{}' is not an integer id", s)))
            }
        }
    };
}

define_id!(
    /// Identifier of a tenant company.
    CompanyId, "company_id"
);
define_id!(
    /// Identifier of a department inside a company.
    DepartmentId, "department_id"
);
define_id!(
    /// Identifier of an employee (survey respondent).
    EmployeeId, "employee_id"
);
define_id!(
    /// Identifier of a maturity pillar.
    PillarId, "pillar_id"
);
define_id!(QuestionId, "question_id");
define_id!(QuestionnaireId, "questionnaire_id");
define_id!(
    /// Identifier of a survey assignment.
    AssignmentId, "assignment_id"
);
define_id!(ResponseId, "response_id");
define_id!(
    /// Identifier of a platform user (the caller, not the respondent).
    UserId, "user_id"
);

/// Parses a comma-separated id list such as `"1, 2,3"`.
///
/// Blank input yields an empty list.
pub fn parse_id_list<T>(raw: &str) -> Result<Vec<T>, ValidationError>
where
    T: FromStr<Err = ValidationError>,
{
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(T::from_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_display_and_parse() {
        let id = PillarId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!("42".parse::<PillarId>().unwrap(), id);
    }

    #[test]
    fn parse_rejects_non_integer() {
        let err = "abc".parse::<CompanyId>().unwrap_err();
        assert!(err.to_string().contains("company_id"));
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&AssignmentId::new(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn parse_id_list_skips_blanks() {
        let ids: Vec<DepartmentId> = parse_id_list("1, 2,,3 ").unwrap();
        assert_eq!(ids, vec![DepartmentId::new(1), DepartmentId::new(2), DepartmentId::new(3)]);

        let empty: Vec<DepartmentId> = parse_id_list("").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn parse_id_list_fails_on_garbage() {
        assert!(parse_id_list::<EmployeeId>("1,x").is_err());
    }
}
