//! Semantic roles and their resolution against a file header.
//!
//! Case files from different years name the same column differently
//! (`SOC_NAME` vs `LCA_CASE_SOC_NAME`, `CASE_STATUS` vs `STATUS`, ...). A
//! [`Role`] names the meaning; [`SchemaResolver`] picks the literal header
//! column carrying it, once, when the header is first read.
//!
//! ## Resolution rules
//!
//! - Header cells are compared after uppercasing.
//! - Matches are taken in header order, not candidate order.
//! - No match is fatal ([`SchemaError::MissingColumn`]).
//! - More than one match picks the first and records
//!   [`SchemaError::AmbiguousColumn`] as a warning.

use std::{fmt, str::FromStr};

use anyhow::anyhow;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

pub const OCCUPATION_CANDIDATES: &[&str] = &["SOC_NAME", "LCA_CASE_SOC_NAME", "OCCUPATIONAL_TITLE"];
pub const STATUS_CANDIDATES: &[&str] = &["CASE_STATUS", "STATUS", "APPROVAL_STATUS"];
pub const WORKSITE_STATE_CANDIDATES: &[&str] = &[
    "WORKSITE_STATE",
    "LCA_CASE_WORKLOC1_STATE",
    "WORK_LOCATION_STATE1",
    "STATE_1",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Occupation,
    Status,
    WorksiteState,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Occupation, Role::Status, Role::WorksiteState];

    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            Role::Occupation => OCCUPATION_CANDIDATES,
            Role::Status => STATUS_CANDIDATES,
            Role::WorksiteState => WORKSITE_STATE_CANDIDATES,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Occupation => "occupation",
            Role::Status => "status",
            Role::WorksiteState => "worksite-state",
        }
    }

    /// First header cell of a ranked report over this role.
    pub fn report_label(&self) -> &'static str {
        match self {
            Role::Occupation => "TOP_OCCUPATIONS",
            Role::Status => "TOP_STATUSES",
            Role::WorksiteState => "TOP_STATES",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "occupation" => Ok(Role::Occupation),
            "status" => Ok(Role::Status),
            "worksite-state" | "worksite_state" | "state" => Ok(Role::WorksiteState),
            other => Err(anyhow!("Unknown role '{other}'")),
        }
    }
}

/// A header column chosen to satisfy a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub name: String,
    pub index: usize,
}

/// Outcome of resolving a single role.
#[derive(Debug)]
pub struct Resolution {
    pub column: ResolvedColumn,
    pub ambiguity: Option<SchemaError>,
}

/// Finds the column in `header` satisfying `role`, given its candidate names.
///
/// `header` must already be uppercased.
pub fn resolve_column(
    header: &[String],
    role: Role,
    candidates: &[&str],
) -> Result<Resolution, SchemaError> {
    let matches = header
        .iter()
        .enumerate()
        .filter(|(_, name)| candidates.contains(&name.as_str()))
        .collect::<Vec<_>>();

    let Some(&(index, name)) = matches.first() else {
        return Err(SchemaError::MissingColumn {
            role,
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
        });
    };

    let ambiguity = (matches.len() > 1).then(|| SchemaError::AmbiguousColumn {
        role,
        matches: matches.iter().map(|(_, name)| name.to_string()).collect(),
        chosen: name.clone(),
    });

    Ok(Resolution {
        column: ResolvedColumn {
            name: name.clone(),
            index,
        },
        ambiguity,
    })
}

/// Uppercased header plus the column resolved for every [`Role`].
#[derive(Debug)]
pub struct SchemaResolver {
    header: Vec<String>,
    occupation: ResolvedColumn,
    status: ResolvedColumn,
    worksite_state: ResolvedColumn,
    warnings: Vec<SchemaError>,
}

impl SchemaResolver {
    pub fn new(raw_header: &[String]) -> Result<Self, SchemaError> {
        let header = raw_header
            .iter()
            .map(|name| name.to_uppercase())
            .collect::<Vec<_>>();

        let mut warnings = Vec::new();
        let mut resolve = |role: Role| -> Result<ResolvedColumn, SchemaError> {
            let resolution = resolve_column(&header, role, role.candidates())?;
            if let Some(ambiguity) = resolution.ambiguity {
                warn!("{ambiguity}");
                warnings.push(ambiguity);
            }
            Ok(resolution.column)
        };

        let occupation = resolve(Role::Occupation)?;
        let status = resolve(Role::Status)?;
        let worksite_state = resolve(Role::WorksiteState)?;

        Ok(Self {
            header,
            occupation,
            status,
            worksite_state,
            warnings,
        })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn resolved(&self, role: Role) -> &ResolvedColumn {
        match role {
            Role::Occupation => &self.occupation,
            Role::Status => &self.status,
            Role::WorksiteState => &self.worksite_state,
        }
    }

    pub fn column(&self, role: Role) -> &str {
        &self.resolved(role).name
    }

    /// Position of an uppercased column name within the header.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|column| column == name)
    }

    /// Roles whose resolved column is `name`.
    pub fn roles_for(&self, name: &str) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.column(*role) == name)
            .collect()
    }

    /// Ambiguities encountered while resolving; each is an
    /// [`SchemaError::AmbiguousColumn`].
    pub fn warnings(&self) -> &[SchemaError] {
        &self.warnings
    }
}
