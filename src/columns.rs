//! Header listing.
//!
//! Prints the uppercased header of a case file with the role each resolved
//! column satisfies, flagging columns involved in an ambiguous resolution.

use anyhow::{Context, Result};
use itertools::Itertools;
use log::info;

use crate::{
    cli::ColumnsArgs,
    engine::CertifiedCounter,
    error::SchemaError,
    table::{self, Align},
};

pub fn execute(args: &ColumnsArgs) -> Result<()> {
    let options = args.source.engine_options()?;
    let counter = CertifiedCounter::with_options(&args.source.input, options)
        .with_context(|| format!("Reading columns of {:?}", args.source.input))?;
    let rows = column_rows(&counter);

    let headers = vec!["#".to_string(), "column".to_string(), "role".to_string()];
    table::print_table(&headers, &rows, &[Align::Right]);
    info!(
        "Listed {} column(s) from {:?}",
        counter.header().len(),
        args.source.input
    );
    Ok(())
}

pub fn column_rows(counter: &CertifiedCounter) -> Vec<Vec<String>> {
    let schema = counter.schema();
    let contested = schema
        .warnings()
        .iter()
        .filter_map(|warning| match warning {
            SchemaError::AmbiguousColumn { matches, chosen, .. } => Some((matches, chosen)),
            SchemaError::MissingColumn { .. } => None,
        })
        .flat_map(|(matches, chosen)| matches.iter().filter(move |name| *name != chosen))
        .collect::<Vec<_>>();

    schema
        .header()
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let mut role = schema.roles_for(name).iter().join(", ");
            if contested.contains(&name) {
                role = "(ignored duplicate)".to_string();
            }
            vec![(idx + 1).to_string(), name.clone(), role]
        })
        .collect()
}
