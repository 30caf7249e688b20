use std::fs;
use std::path::{Path, PathBuf};

use cohort_analyzer::loader::load_sources;
use cohort_analyzer::{AnalyzerConfig, Result, Store};
use tempfile::TempDir;

pub const PATIENTS_CSV: &str = "\
Id,BIRTHDATE,DEATHDATE,FIRST,LAST,RACE,GENDER
P1,1950-03-01,,John,Doe,white,M
P2,1962-07-15,,Mary,Roe,black,F
P3,1970-01-20,2020-05-05,Ann,Lee,asian,F
P4,1948-11-30,,Bob,Ray,white,M
P5,1985-06-09,,Eve,Kim,,F
";

pub const CONDITIONS_CSV: &str = "\
START,STOP,PATIENT,ENCOUNTER,CODE,DESCRIPTION
2001-04-02,,P1,E1,53741008,Coronary Heart Disease
2003-09-12,,P1,E2,53741008,Coronary Heart Disease
1999-01-01,,P2,E3,38341003,Hypertension
2005-06-30,,P3,E4,44054006,Diabetes
2010-02-14,,P4,E5,532001,Atherosclerosis of aorta
2012-12-01,2012-12-20,P5,E6,444814009,Viral sinusitis
2015-03-03,,P5,E7,88805009,Chronic congestive heart failure
2002-08-08,,P9,E8,53741008,Coronary artery disease
";

pub const PROCEDURES_CSV: &str = "\
START,PATIENT,ENCOUNTER,CODE,DESCRIPTION,BASE_COST
2001-04-02,P1,E1,418891003,Computed tomography of chest,1200.5
2003-09-12,P2,E2,419545005,CT angiography of coronary arteries,980.0
2005-06-30,P3,E4,448443007,Thoracic ultrasound,310.25
2010-02-14,P4,E5,429047008,Coronary artery calcium score,150.0
2012-12-01,P5,E6,80146002,Appendectomy,5400.0
2015-03-03,P1,E7,430193006,Medication reconciliation,45.0
2015-03-03,P2,E7,274025005,Ultrasound guided biopsy,720.0
";

pub const IMAGING_STUDIES_CSV: &str = "\
Id,DATE,PATIENT,ENCOUNTER,BODYSITE_CODE,BODYSITE_DESCRIPTION,MODALITY_CODE,MODALITY_DESCRIPTION
I1,2001-04-02,P1,E1,80891009,Heart,US,Ultrasound
I2,2003-09-12,P1,E2,80891009,Heart,US,Ultrasound
I3,1999-01-01,P2,E3,80891009,Heart,US,Ultrasound
I4,2010-02-14,P4,E5,80891009,Heart,DX,Digital Radiography
I5,2005-06-30,P3,E4,51185008,Thoracic structure,US,Ultrasound
I6,2002-08-08,P9,E8,80891009,Heart,US,Ultrasound
";

pub const ENCOUNTERS_CSV: &str = "\
Id,START,PATIENT,DESCRIPTION
E1,2001-04-02,P1,Encounter for problem
E2,2003-09-12,P1,Follow-up encounter
E3,1999-01-01,P2,General examination of patient
";

/// Write one CSV file into `dir`
pub fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(format!("{name}.csv"));
    fs::write(&path, contents).expect("write fixture CSV");
    path
}

/// Write the five source extracts into `dir`
pub fn write_sources(dir: &Path) {
    write_csv(dir, "patients", PATIENTS_CSV);
    write_csv(dir, "conditions", CONDITIONS_CSV);
    write_csv(dir, "procedures", PROCEDURES_CSV);
    write_csv(dir, "imaging_studies", IMAGING_STUDIES_CSV);
    write_csv(dir, "encounters", ENCOUNTERS_CSV);
}

/// Configuration reading from `data_dir`, persisting to `store_dir` if given
#[must_use]
pub fn test_config(data_dir: &Path, store_dir: Option<&Path>) -> AnalyzerConfig {
    AnalyzerConfig {
        data_dir: data_dir.to_path_buf(),
        store_dir: store_dir.map(Path::to_path_buf),
        batch_size: 4,
        ..AnalyzerConfig::default()
    }
}

/// An in-memory store loaded from a fresh copy of the fixture
///
/// The returned directory must outlive any further loads from it.
pub fn loaded_store() -> Result<(TempDir, Store)> {
    let dir = tempfile::tempdir()?;
    write_sources(dir.path());

    let mut store = Store::in_memory();
    load_sources(&mut store, &test_config(dir.path(), None))?;
    Ok((dir, store))
}
