use super::Record;

/// Built-in records returned when neither the cache nor a live crawl can
/// provide data
pub fn sample_records() -> Vec<Record> {
    [
        (
            "Verify Numerical Reasoning Test",
            "https://www.shl.com/solutions/products/verify-numerical-reasoning-test/",
            false,
            25,
            &["Ability & Aptitude", "Numerical Reasoning"][..],
        ),
        (
            "Verify Verbal Reasoning Test",
            "https://www.shl.com/solutions/products/verify-verbal-reasoning-test/",
            false,
            25,
            &["Ability & Aptitude", "Verbal Reasoning"][..],
        ),
        (
            "Verify General Ability Test",
            "https://www.shl.com/solutions/products/verify-general-ability-test/",
            false,
            36,
            &[
                "Ability & Aptitude",
                "Numerical Reasoning",
                "Verbal Reasoning",
                "Inductive Reasoning",
            ][..],
        ),
        (
            "Work Strengths Questionnaire",
            "https://www.shl.com/solutions/products/work-strengths-questionnaire/",
            true,
            25,
            &["Personality & Behavior"][..],
        ),
        (
            "ADEPT-15 Personality Assessment",
            "https://www.shl.com/solutions/products/adept-15-personality-assessment/",
            true,
            25,
            &["Personality & Behavior"][..],
        ),
    ]
    .into_iter()
    .map(|(name, url, adaptive_irt, duration, categories)| Record {
        name: name.to_string(),
        identity_url: url.to_string(),
        remote_testing: true,
        adaptive_irt,
        duration_minutes: Some(duration),
        categories: categories.iter().map(|c| c.to_string()).collect(),
    })
    .collect()
}
