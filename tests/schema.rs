mod common;

use common::TestWorkspace;
use h1b_counting::{
    CertifiedCounter, EngineError, Role, SchemaError,
    schema::{SchemaResolver, resolve_column},
};

fn header(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn missing_worksite_columns_abort_construction() {
    let workspace = TestWorkspace::new();
    let path = workspace.write(
        "no_state.csv",
        "CASE_STATUS;SOC_NAME;EMPLOYER_STATE\nCERTIFIED;ACTUARIES;FL\n",
    );

    let err = CertifiedCounter::open(&path).expect_err("no worksite column");

    match err {
        EngineError::Schema(SchemaError::MissingColumn { role, candidates }) => {
            assert_eq!(role, Role::WorksiteState);
            assert_eq!(
                candidates,
                vec![
                    "WORKSITE_STATE",
                    "LCA_CASE_WORKLOC1_STATE",
                    "WORK_LOCATION_STATE1",
                    "STATE_1"
                ]
            );
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn missing_status_column_is_fatal_too() {
    let raw = header(&["SOC_NAME", "WORKSITE_STATE", "VISA_STATUS"]);
    let err = SchemaResolver::new(&raw).expect_err("no status column");
    assert!(matches!(
        err,
        SchemaError::MissingColumn {
            role: Role::Status,
            ..
        }
    ));
    assert_eq!(
        err.to_string(),
        "Header did not contain any of the status columns: CASE_STATUS, STATUS, APPROVAL_STATUS"
    );
}

#[test]
fn ambiguous_roles_resolve_to_first_header_match_with_a_warning() {
    let workspace = TestWorkspace::new();
    let path = workspace.write(
        "ambiguous.csv",
        "STATUS;CASE_STATUS;OCCUPATIONAL_TITLE;SOC_NAME;WORKSITE_STATE\n\
         CERTIFIED;DENIED;CHEMISTS;ACTUARIES;FL\n\
         DENIED;CERTIFIED;CHEMISTS;ACTUARIES;CA\n",
    );

    let mut counter = CertifiedCounter::open(&path).expect("ambiguity is recoverable");

    assert_eq!(counter.status_column(), "STATUS");
    assert_eq!(counter.occupation_column(), "OCCUPATIONAL_TITLE");
    let warnings = counter.schema().warnings();
    assert_eq!(warnings.len(), 2);
    assert!(warnings.iter().all(|w| matches!(w, SchemaError::AmbiguousColumn { .. })));
    assert_eq!(
        warnings[0].to_string(),
        "Header contained more than one occupation column (OCCUPATIONAL_TITLE, SOC_NAME); \
         using 'OCCUPATIONAL_TITLE'"
    );
    assert_eq!(
        warnings[1].to_string(),
        "Header contained more than one status column (STATUS, CASE_STATUS); using 'STATUS'"
    );

    // Counting follows the chosen status column only.
    assert_eq!(
        counter.top_n("WORKSITE_STATE", 5).expect("top"),
        vec![("FL".to_string(), 1)]
    );
}

#[test]
fn resolving_twice_is_deterministic() {
    let raw = header(&[
        "lca_case_number",
        "approval_status",
        "lca_case_soc_name",
        "work_location_state1",
    ]);
    for role in Role::ALL {
        let upper = raw.iter().map(|h| h.to_uppercase()).collect::<Vec<_>>();
        let first = resolve_column(&upper, role, role.candidates()).expect("first");
        let second = resolve_column(&upper, role, role.candidates()).expect("second");
        assert_eq!(first.column, second.column);
        assert!(first.ambiguity.is_none());
    }
    let resolver = SchemaResolver::new(&raw).expect("resolver");
    assert_eq!(resolver.column(Role::WorksiteState), "WORK_LOCATION_STATE1");
}
