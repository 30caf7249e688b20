use std::time::Instant;

use cohort_analyzer::Result;
use cohort_analyzer::cohort::{attach_demographics, cad_cohort, cad_echo_breakdown};
use cohort_analyzer::config::AnalyzerConfig;
use cohort_analyzer::loader::load_sources;
use cohort_analyzer::reports::{
    prevalence, print_keyword_counts, print_prevalence, print_report, run_battery,
    standard_battery, standard_prevalence_specs, target_procedure_counts, to_table,
};
use cohort_analyzer::schema::columns::{DESCRIPTION, PATIENT};
use cohort_analyzer::schema::{PATIENTS, ensure_required_columns};
use cohort_analyzer::store::{Store, with_store};
use cohort_analyzer::utils::logging::console::{print_head, print_heading};
use log::info;

fn main() -> Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AnalyzerConfig::from_env();
    info!("Reading source files from: {}", config.data_dir.display());

    let start = Instant::now();
    with_store(&config, |store| run(store, &config))?;
    info!("Analysis finished in {:?}", start.elapsed());
    Ok(())
}

fn run(store: &mut Store, config: &AnalyzerConfig) -> Result<()> {
    load_sources(store, config)?;
    ensure_required_columns(store)?;
    println!("The data has loaded");
    if let Some(root) = store.root() {
        info!("Relations persisted under {}", root.display());
    }

    // CAD cohort and its demographics
    print_heading("Finding patients diagnosed with CAD");
    let cad = cad_cohort(store)?;
    println!(
        "CAD patients found: {} ({} distinct patients)",
        cad.distinct_rows(&[PATIENT, DESCRIPTION])?,
        cad.cohort.len()
    );

    print_heading("Joining CAD patients with demographics...");
    let demographics = attach_demographics(&cad.cohort, &*store.relation(PATIENTS)?)?;
    print_head(&demographics, config.preview_rows)?;

    // Diagnostic test orders
    print_heading("Procedure orders for target tests");
    print_keyword_counts(&target_procedure_counts(store)?);

    print_heading("Analyzing echocardiograms from imaging_studies...");
    let breakdown = cad_echo_breakdown(store)?;
    println!(
        "{} CAD patients, {} with an echocardiogram, {} in both",
        breakdown.cad_patients,
        breakdown.echo_patients,
        breakdown.both.len()
    );
    print_heading("Echocardiogram frequency by gender and race:");
    print_head(&to_table(&breakdown.groups)?, breakdown.groups.len())?;

    for spec in standard_prevalence_specs(config) {
        print_prevalence(&prevalence(store, &spec)?)?;
    }

    for result in run_battery(store, &standard_battery())? {
        print_report(&result);
    }

    Ok(())
}
