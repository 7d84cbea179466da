//! YAML report plans.
//!
//! ```yaml
//! reports:
//!   - role: occupation
//!     output: ./output/top_10_occupations.txt
//!   - column: EMPLOYER_NAME
//!     label: TOP_EMPLOYERS
//!     top: 25
//!     output: ./output/top_25_employers.txt
//! ```
//!
//! `column` and `top` are kept as raw YAML values and only validated when the
//! plan is bound to a counter, so a malformed entry is reported the same way
//! as a malformed programmatic request.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use serde_yaml::Value as YamlValue;

use crate::{
    engine::CertifiedCounter,
    error::EngineError,
    request::{TopCount, value_kind},
    schema::Role,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportPlan {
    pub reports: Vec<ReportSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportSpec {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub column: Option<YamlValue>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default = "default_top")]
    pub top: YamlValue,
    pub output: PathBuf,
}

fn default_top() -> YamlValue {
    YamlValue::from(TopCount::default().get() as u64)
}

/// A report entry bound to a literal header column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundReport {
    pub column: String,
    pub label: String,
    pub top: TopCount,
    pub output: PathBuf,
}

impl ReportPlan {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening report plan {path:?}"))?;
        let plan: ReportPlan = serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("Parsing report plan {path:?}"))?;
        plan.ensure_not_empty()?;
        Ok(plan)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let plan: ReportPlan = serde_yaml::from_str(raw).context("Parsing report plan")?;
        plan.ensure_not_empty()?;
        Ok(plan)
    }

    /// Occupation and worksite-state reports written to the given paths.
    pub fn canonical(occupation_output: &Path, state_output: &Path, top: TopCount) -> Self {
        let entry = |role: Role, output: &Path| ReportSpec {
            role: Some(role),
            column: None,
            label: None,
            top: YamlValue::from(top.get() as u64),
            output: output.to_path_buf(),
        };
        Self {
            reports: vec![
                entry(Role::Occupation, occupation_output),
                entry(Role::WorksiteState, state_output),
            ],
        }
    }

    fn ensure_not_empty(&self) -> Result<()> {
        if self.reports.is_empty() {
            bail!("Report plan does not define any reports");
        }
        Ok(())
    }

    /// Validates every entry against `counter`'s resolved roles.
    pub fn bind(&self, counter: &CertifiedCounter) -> Result<Vec<BoundReport>> {
        self.reports
            .iter()
            .enumerate()
            .map(|(idx, spec)| {
                spec.bind(counter)
                    .with_context(|| format!("Report entry {}", idx + 1))
            })
            .collect()
    }
}

impl ReportSpec {
    pub fn bind(&self, counter: &CertifiedCounter) -> Result<BoundReport> {
        let (column, default_label) = match (&self.role, &self.column) {
            (Some(_), Some(_)) => bail!("Specify either 'role' or 'column', not both"),
            (None, None) => bail!("Specify a 'role' or a 'column'"),
            (Some(role), None) => (
                counter.column_for(*role).to_string(),
                role.report_label().to_string(),
            ),
            (None, Some(YamlValue::String(column))) => {
                let column = column.to_uppercase();
                let label = format!("TOP_{column}");
                (column, label)
            }
            (None, Some(other)) => {
                return Err(anyhow!(EngineError::InvalidColumnType {
                    found: value_kind(other),
                }));
            }
        };
        let top = TopCount::from_value(&self.top)?;
        Ok(BoundReport {
            column,
            label: self.label.clone().unwrap_or(default_label),
            top,
            output: self.output.clone(),
        })
    }
}
