//! End-to-end checks on the small voice-pitch datasets used to introduce
//! linear models: a categorical predictor, a continuous predictor, and a
//! likelihood-ratio comparison between nested fits.

use approx::assert_relative_eq;

use lmstats_core::{
    compare_fits, fit_formula, fit_ols, Dataset, DesignMatrix, Formula, OlsOptions, ReferenceLevel,
    StatsError,
};

const PITCH: [f64; 6] = [233.0, 204.0, 242.0, 130.0, 112.0, 142.0];
const SEX: [&str; 6] = ["female", "female", "female", "male", "male", "male"];
const AGE: [f64; 6] = [14.0, 23.0, 35.0, 48.0, 52.0, 67.0];
const AGE_PITCH: [f64; 6] = [252.0, 244.0, 240.0, 233.0, 212.0, 204.0];

fn sex_data() -> Dataset {
    Dataset::new()
        .with_numeric("pitch", PITCH.to_vec())
        .unwrap()
        .with_categorical("sex", &SEX)
        .unwrap()
}

fn age_data() -> Dataset {
    Dataset::new()
        .with_numeric("pitch", AGE_PITCH.to_vec())
        .unwrap()
        .with_numeric("age", AGE.to_vec())
        .unwrap()
}

#[test]
fn categorical_predictor_recovers_group_means() {
    let formula = Formula::parse("pitch ~ sex").unwrap();
    let options =
        OlsOptions::default().with_reference("sex", ReferenceLevel::Named("female".into()));
    let fit = fit_formula(&formula, &sex_data(), &options).unwrap();

    let intercept = fit.coefficient("(Intercept)").unwrap();
    let slope = fit.coefficient("sexmale").unwrap();

    assert_relative_eq!(intercept, 226.333_333_333, epsilon = 1e-6);
    assert_relative_eq!(slope, -98.333_333_333, epsilon = 1e-6);
    assert_relative_eq!(intercept + slope, 128.0, epsilon = 1e-9);
    assert!(fit.inference.p_values[1] < 0.01);
}

#[test]
fn reference_level_only_changes_the_parametrisation() {
    let formula = Formula::parse("pitch ~ sex").unwrap();
    let female = fit_formula(
        &formula,
        &sex_data(),
        &OlsOptions::default().with_reference("sex", ReferenceLevel::Named("female".into())),
    )
    .unwrap();
    let male = fit_formula(
        &formula,
        &sex_data(),
        &OlsOptions::default().with_reference("sex", ReferenceLevel::Named("male".into())),
    )
    .unwrap();

    assert_relative_eq!(male.coefficient("(Intercept)").unwrap(), 128.0, epsilon = 1e-9);
    assert_relative_eq!(
        male.coefficient("sexfemale").unwrap(),
        -female.coefficient("sexmale").unwrap(),
        epsilon = 1e-9
    );
    assert_relative_eq!(male.core.r_squared, female.core.r_squared, epsilon = 1e-12);
    assert_relative_eq!(
        male.inference.p_values[1],
        female.inference.p_values[1],
        epsilon = 1e-12
    );
}

#[test]
fn continuous_predictor_matches_reference_output() {
    let formula = Formula::parse("pitch ~ age").unwrap();
    let fit = fit_formula(&formula, &age_data(), &OlsOptions::default()).unwrap();

    assert_relative_eq!(fit.core.coefficients[0], 267.08, epsilon = 1e-2);
    assert_relative_eq!(fit.core.coefficients[1], -0.9099, epsilon = 1e-2);
    assert_relative_eq!(fit.inference.std_errors[0], 6.8522, epsilon = 1e-3);
    assert_relative_eq!(fit.inference.std_errors[1], 0.15688, epsilon = 1e-4);
    assert_relative_eq!(fit.core.r_squared, 0.89373, epsilon = 1e-4);
    assert_relative_eq!(fit.core.residual_std_error, 6.8862, epsilon = 1e-3);
    assert_relative_eq!(fit.diagnostics.log_likelihood, -18.87438, epsilon = 1e-4);
    assert_eq!(fit.core.df_residual, 4);
}

#[test]
fn intercept_only_fit_is_the_mean() {
    let design = DesignMatrix::intercept_only(AGE_PITCH.len()).unwrap();
    let fit = fit_ols(&AGE_PITCH, &design, &OlsOptions::default()).unwrap();

    let mean = AGE_PITCH.iter().sum::<f64>() / AGE_PITCH.len() as f64;
    assert_relative_eq!(fit.core.coefficients[0], mean, epsilon = 1e-10);
    assert_eq!(fit.core.r_squared, 0.0);
}

#[test]
fn refitting_is_deterministic() {
    let formula = Formula::parse("pitch ~ age").unwrap();
    let a = fit_formula(&formula, &age_data(), &OlsOptions::default()).unwrap();
    let b = fit_formula(&formula, &age_data(), &OlsOptions::default()).unwrap();

    assert_eq!(a.core.coefficients, b.core.coefficients);
    assert_eq!(a.inference.p_values, b.inference.p_values);
    assert_eq!(a.core.residuals, b.core.residuals);
    assert_eq!(a.diagnostics.log_likelihood, b.diagnostics.log_likelihood);
}

#[test]
fn likelihood_ratio_against_intercept_only_model() {
    let data = age_data();
    let full = fit_formula(&Formula::parse("pitch ~ age").unwrap(), &data, &OlsOptions::default())
        .unwrap();
    let reduced = fit_formula(&Formula::parse("pitch ~ 1").unwrap(), &data, &OlsOptions::default())
        .unwrap();

    let result = compare_fits(&full, &reduced).unwrap();
    assert_eq!(result.df, 1);
    assert_relative_eq!(result.statistic, 13.4504, epsilon = 1e-3);
    assert!(result.p_value < 0.001);

    // Swapping the models is not a nested comparison
    assert!(matches!(
        compare_fits(&reduced, &full),
        Err(StatsError::NotNested(_))
    ));
}

#[test]
fn duplicated_column_is_rank_deficient() {
    let design = DesignMatrix::from_columns(&["age", "age2"], &[AGE.to_vec(), AGE.to_vec()], true)
        .unwrap();
    let result = fit_ols(&AGE_PITCH, &design, &OlsOptions::default());
    assert!(matches!(result, Err(StatsError::RankDeficient { .. })));
}

#[test]
fn non_nested_fits_are_rejected() {
    let data = Dataset::new()
        .with_numeric("pitch", PITCH.to_vec())
        .unwrap()
        .with_categorical("sex", &SEX)
        .unwrap()
        .with_numeric("age", AGE.to_vec())
        .unwrap()
        .with_numeric("height", vec![160.0, 171.0, 158.0, 180.0, 176.0, 183.0])
        .unwrap();
    let options = OlsOptions::default();
    let full = fit_formula(&Formula::parse("pitch ~ sex + age").unwrap(), &data, &options).unwrap();
    let other = fit_formula(&Formula::parse("pitch ~ height").unwrap(), &data, &options).unwrap();

    assert!(matches!(
        compare_fits(&full, &other),
        Err(StatsError::NotNested(_))
    ));
}

#[test]
fn fits_of_different_responses_are_rejected() {
    let options = OlsOptions::default();
    let full = fit_formula(&Formula::parse("pitch ~ age").unwrap(), &age_data(), &options).unwrap();
    let other = fit_formula(&Formula::parse("age ~ 1").unwrap(), &age_data(), &options).unwrap();

    assert!(matches!(
        compare_fits(&full, &other),
        Err(StatsError::InvalidComparison(_))
    ));
}
