use crate::utils::{loaded_store, test_config, write_csv, write_sources};
use arrow::array::Array;
use cohort_analyzer::cohort::{DemographicCount, attach_demographics, cad_cohort};
use cohort_analyzer::loader::load_sources;
use cohort_analyzer::reports::{
    prevalence, run_battery, standard_battery, standard_prevalence_specs,
    target_procedure_counts, to_table,
};
use cohort_analyzer::schema::columns::{DESCRIPTION, PATIENT};
use cohort_analyzer::schema::{IMAGING_STUDIES, PATIENTS, ensure_required_columns};
use cohort_analyzer::{AnalyzerConfig, Result, Store, cad_echo_breakdown, with_store};

/// CAD rows, distinct pairs and distinct patients
#[test]
fn test_cad_cohort_counts() -> Result<()> {
    let (_dir, store) = loaded_store()?;
    let cad = cad_cohort(&store)?;

    assert_eq!(cad.rows.num_rows(), 4);
    assert_eq!(cad.distinct_rows(&[PATIENT, DESCRIPTION])?, 3);
    assert_eq!(cad.cohort.ids(), ["P1", "P4", "P9"]);

    // P9 has no patient record and keeps null demographics
    let demographics = attach_demographics(&cad.cohort, &*store.relation(PATIENTS)?)?;
    assert_eq!(demographics.num_rows(), 3);
    assert_eq!(demographics.column(1).null_count(), 1);
    Ok(())
}

/// Echocardiogram counts per (GENDER, RACE), nulls included
#[test]
fn test_echo_breakdown() -> Result<()> {
    let (_dir, store) = loaded_store()?;
    let breakdown = cad_echo_breakdown(&store)?;

    assert_eq!(breakdown.cad_patients, 3);
    assert_eq!(breakdown.echo_patients, 3);
    assert_eq!(breakdown.both.len(), 2);
    assert_eq!(
        breakdown.groups,
        vec![
            DemographicCount { gender: None, race: None, count: 1 },
            DemographicCount {
                gender: Some("M".into()),
                race: Some("white".into()),
                count: 1
            },
        ]
    );

    let total: usize = breakdown.groups.iter().map(|g| g.count).sum();
    assert_eq!(total, breakdown.both.len());

    let table = to_table(&breakdown.groups)?;
    assert_eq!(table.schema().field(2).name(), "Echocardiogram_Count");
    Ok(())
}

#[test]
fn test_procedure_keyword_counts() -> Result<()> {
    let (_dir, store) = loaded_store()?;
    let counts: Vec<(String, usize)> = target_procedure_counts(&store)?
        .into_iter()
        .map(|c| (c.keyword, c.matches))
        .collect();

    assert_eq!(
        counts,
        vec![
            ("computed tomography".to_string(), 1),
            ("ultrasound".to_string(), 2),
            ("calcium".to_string(), 1),
            ("ct angiography".to_string(), 1),
            ("thoracic".to_string(), 1),
        ]
    );
    Ok(())
}

/// Frequency tables, most frequent first
#[test]
fn test_prevalence_reports() -> Result<()> {
    let (_dir, store) = loaded_store()?;
    let reports = standard_prevalence_specs(&AnalyzerConfig::default())
        .iter()
        .map(|spec| prevalence(&store, spec))
        .collect::<Result<Vec<_>>>()?;
    assert_eq!(reports.len(), 4);

    let conditions = &reports[0];
    assert_eq!(conditions.total_rows, 8);
    assert_eq!(conditions.top.len(), 7);
    assert_eq!(conditions.top[0].value.as_deref(), Some("Coronary Heart Disease"));
    assert_eq!(conditions.top[0].count, 2);
    assert_eq!(conditions.top.iter().map(|v| v.count).sum::<usize>(), 8);

    let modalities = &reports[2];
    assert_eq!(modalities.top[0].value.as_deref(), Some("Ultrasound"));
    assert_eq!(modalities.top[0].count, 5);

    let body_sites = &reports[3];
    assert_eq!(body_sites.top.len(), 2);
    assert_eq!(body_sites.top[1].value.as_deref(), Some("Thoracic structure"));
    Ok(())
}

/// The four reports inner-join against patients and count non-null values
#[test]
fn test_report_battery() -> Result<()> {
    let (_dir, store) = loaded_store()?;
    let results = run_battery(&store, &standard_battery())?;

    let rows: Vec<usize> = results.iter().map(|r| r.rows).collect();
    assert_eq!(rows, vec![2, 4, 3, 2]);

    let ultrasound = &results[1];
    let race = ultrasound
        .non_null
        .iter()
        .find(|c| c.column == "RACE")
        .map(|c| c.non_null);
    assert_eq!(race, Some(4));

    let coronary: Vec<&str> = results[2].non_null.iter().map(|c| c.column.as_str()).collect();
    assert_eq!(coronary, vec!["PATIENT", "DESCRIPTION", "START", "BIRTHDATE"]);
    Ok(())
}

/// The whole run against a persistent store
#[test]
fn test_end_to_end_run() -> Result<()> {
    let data = tempfile::tempdir()?;
    let store_dir = tempfile::tempdir()?;
    write_sources(data.path());
    let config = test_config(data.path(), Some(store_dir.path()));

    let (both, reports) = with_store(&config, |store| {
        load_sources(store, &config)?;
        ensure_required_columns(store)?;
        let breakdown = cad_echo_breakdown(store)?;
        let reports = run_battery(store, &standard_battery())?;
        Ok((breakdown.both.len(), reports.len()))
    })?;

    assert_eq!(both, 2);
    assert_eq!(reports, 4);
    assert!(store_dir.path().join("manifest.json").exists());
    Ok(())
}

/// A source with no rows yields empty cohorts and reports, not an error
#[test]
fn test_header_only_imaging_studies() -> Result<()> {
    let data = tempfile::tempdir()?;
    write_sources(data.path());
    write_csv(
        data.path(),
        "imaging_studies",
        "Id,DATE,PATIENT,ENCOUNTER,BODYSITE_CODE,BODYSITE_DESCRIPTION,MODALITY_CODE,MODALITY_DESCRIPTION\n",
    );
    let config = test_config(data.path(), None);

    let (breakdown, results, imaging) = with_store(&config, |store| {
        load_sources(store, &config)?;
        ensure_required_columns(store)?;
        let breakdown = cad_echo_breakdown(store)?;
        let results = run_battery(store, &standard_battery())?;
        let imaging = standard_prevalence_specs(&config)
            .iter()
            .filter(|spec| spec.relation == IMAGING_STUDIES)
            .map(|spec| prevalence(store, spec))
            .collect::<Result<Vec<_>>>()?;
        target_procedure_counts(store)?;
        Ok((breakdown, results, imaging))
    })?;

    assert_eq!(breakdown.cad_patients, 3);
    assert_eq!(breakdown.echo_patients, 0);
    assert!(breakdown.both.is_empty());
    assert!(breakdown.groups.is_empty());
    assert_eq!(to_table(&breakdown.groups)?.num_rows(), 0);

    assert_eq!(results[1].rows, 0);
    assert!(results[1].non_null.iter().all(|c| c.non_null == 0));
    assert!(imaging.iter().all(|report| report.total_rows == 0 && report.top.is_empty()));
    Ok(())
}

/// A column left blank throughout the extract counts as entirely null
#[test]
fn test_blank_column_has_no_values() -> Result<()> {
    let data = tempfile::tempdir()?;
    write_sources(data.path());
    write_csv(
        data.path(),
        "patients",
        "Id,BIRTHDATE,DEATHDATE,FIRST,LAST,RACE,GENDER
P1,1950-03-01,,John,Doe,,M
P2,1962-07-15,,Mary,Roe,,F
P3,1970-01-20,,Ann,Lee,,F
P4,1948-11-30,,Bob,Ray,,M
P5,1985-06-09,,Eve,Kim,,F
",
    );

    let mut store = Store::in_memory();
    load_sources(&mut store, &test_config(data.path(), None))?;
    let results = run_battery(&store, &standard_battery())?;

    let counts: Vec<(&str, usize)> = results[0]
        .non_null
        .iter()
        .map(|c| (c.column.as_str(), c.non_null))
        .collect();
    assert_eq!(
        counts,
        vec![("PATIENT", 2), ("DESCRIPTION", 2), ("GENDER", 2), ("RACE", 0)]
    );

    // Demographic groups still form, with a null race bucket
    let breakdown = cad_echo_breakdown(&store)?;
    assert!(breakdown.groups.iter().all(|g| g.race.is_none()));
    Ok(())
}
