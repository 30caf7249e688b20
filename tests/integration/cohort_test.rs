use crate::utils::loaded_store;
use cohort_analyzer::Result;
use cohort_analyzer::cohort::{
    Cohort, attach_demographics, cad_cohort, echo_cohort, select_by_keywords,
};
use cohort_analyzer::filter::KeywordSet;
use cohort_analyzer::filter::keywords::{CAD_KEYWORDS, HYPERTENSION_DIABETES_KEYWORDS};
use cohort_analyzer::schema::columns::DESCRIPTION;
use cohort_analyzer::schema::{CONDITIONS, PATIENTS};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Adding keywords to a set never removes patients from its cohort
#[test]
fn test_keyword_selection_is_monotonic() -> Result<()> {
    let (_dir, store) = loaded_store()?;
    let conditions = store.relation(CONDITIONS)?;

    let mut pool: Vec<&str> = CAD_KEYWORDS
        .iter()
        .chain(HYPERTENSION_DIABETES_KEYWORDS)
        .copied()
        .chain(["sinusitis", "failure", "aorta"])
        .collect();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        pool.shuffle(&mut rng);
        let narrow_len = rng.random_range(0..pool.len());
        let wide_len = rng.random_range(narrow_len..=pool.len());

        let narrow = select_by_keywords(
            &conditions,
            DESCRIPTION,
            &KeywordSet::new("narrow", &pool[..narrow_len]),
        )?;
        let wide = select_by_keywords(
            &conditions,
            DESCRIPTION,
            &KeywordSet::new("wide", &pool[..wide_len]),
        )?;

        assert!(narrow.rows.num_rows() <= wide.rows.num_rows());
        for id in narrow.cohort.ids() {
            assert!(wide.cohort.contains(id), "{id} lost when widening {:?}", &pool[..wide_len]);
        }
    }
    Ok(())
}

/// The empty keyword set selects nothing
#[test]
fn test_empty_keyword_set() -> Result<()> {
    let (_dir, store) = loaded_store()?;
    let selection = select_by_keywords(
        &*store.relation(CONDITIONS)?,
        DESCRIPTION,
        &KeywordSet::new("empty", Vec::<&str>::new()),
    )?;
    assert_eq!(selection.rows.num_rows(), 0);
    assert!(selection.cohort.is_empty());
    Ok(())
}

/// One demographic row per cohort member, known or not
#[test]
fn test_demographic_join_preserves_cardinality() -> Result<()> {
    let (_dir, store) = loaded_store()?;
    let patients = store.relation(PATIENTS)?;
    let candidates = ["P1", "P2", "P3", "P4", "P5", "P9", "P10", "P11"];
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..30 {
        let members: Vec<&str> = candidates
            .iter()
            .copied()
            .filter(|_| rng.random_bool(0.5))
            .collect();
        let cohort = Cohort::from_ids("random", members.iter().copied());

        let joined = attach_demographics(&cohort, &patients)?;
        assert_eq!(joined.num_rows(), cohort.len());
        assert_eq!(joined.num_columns(), 3);
    }
    Ok(())
}

/// CAD x echo is commutative and no larger than either side
#[test]
fn test_intersection_commutes() -> Result<()> {
    let (_dir, store) = loaded_store()?;
    let cad = cad_cohort(&store)?.cohort;
    let echo = echo_cohort(&store)?.cohort;

    let forward = cad.intersect(&echo)?;
    let backward = echo.intersect(&cad)?;

    let mut forward_ids = forward.ids().to_vec();
    let mut backward_ids = backward.ids().to_vec();
    forward_ids.sort();
    backward_ids.sort();

    assert_eq!(forward_ids, backward_ids);
    assert_eq!(forward_ids, vec!["P1".to_string(), "P9".to_string()]);
    assert!(forward.len() <= cad.len().min(echo.len()));
    Ok(())
}
