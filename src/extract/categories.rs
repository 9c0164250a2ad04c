//! Category resolution for catalog rows
//!
//! The catalog encodes a product's categories as single-letter codes in one
//! table column. Cells that carry no recognizable code fall back to free text.

/// Single-letter category codes used by the catalog table
pub const CATEGORY_CODES: &[(char, &str)] = &[
    ('A', "Ability & Aptitude"),
    ('B', "Biodata & Situational Judgement"),
    ('C', "Competencies"),
    ('D', "Development & 360"),
    ('E', "Assessment Exercises"),
    ('K', "Knowledge & Skills"),
    ('P', "Personality & Behavior"),
    ('S', "Simulations"),
];

/// Names containing one of these are technical knowledge tests
pub const TECH_KEYWORDS: &[&str] = &["Java", "Python", "SQL", "JavaScript", ".NET", "C#"];

pub const KNOWLEDGE_CATEGORY: &str = "Knowledge & Skills";
pub const TECHNICAL_CATEGORY: &str = "Technical Skills";

/// Looks up the category for a single code letter
pub fn category_for_code(code: char) -> Option<&'static str> {
    CATEGORY_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
}

/// Resolves a category cell into labels
///
/// Every code letter in the cell maps to its label in order of appearance.
/// When no letter matches, comma-separated text is split into labels, and
/// anything else becomes a single label. Blank cells yield nothing.
///
/// # Examples
///
/// ```
/// use sumi_catalog::extract::parse_category_cell;
///
/// assert_eq!(
///     parse_category_cell("AP"),
///     vec!["Ability & Aptitude", "Personality & Behavior"]
/// );
/// assert_eq!(parse_category_cell("Xyz"), vec!["Xyz"]);
/// ```
pub fn parse_category_cell(text: &str) -> Vec<String> {
    let text = text.trim();

    let coded: Vec<String> = text
        .chars()
        .filter_map(category_for_code)
        .map(str::to_string)
        .collect();

    if !coded.is_empty() {
        return coded;
    }

    if text.is_empty() {
        return Vec::new();
    }

    if text.contains(',') {
        return text
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
    }

    vec![text.to_string()]
}

/// Appends the knowledge and technical categories when the name mentions a
/// technology keyword
pub fn apply_tech_keywords(name: &str, categories: &mut Vec<String>) {
    let lowered = name.to_lowercase();
    let is_technical = TECH_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(&keyword.to_lowercase()));

    if !is_technical {
        return;
    }

    for label in [KNOWLEDGE_CATEGORY, TECHNICAL_CATEGORY] {
        if !categories.iter().any(|c| c == label) {
            categories.push(label.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_in_order() {
        assert_eq!(
            parse_category_cell("AP"),
            vec!["Ability & Aptitude", "Personality & Behavior"]
        );
        assert_eq!(
            parse_category_cell("K S"),
            vec!["Knowledge & Skills", "Simulations"]
        );
    }

    #[test]
    fn test_unmatched_text_is_single_label() {
        assert_eq!(parse_category_cell("Xyz"), vec!["Xyz"]);
    }

    #[test]
    fn test_comma_split_fallback() {
        assert_eq!(
            parse_category_cell("numerical, verbal ,"),
            vec!["numerical", "verbal"]
        );
    }

    #[test]
    fn test_blank_cell() {
        assert!(parse_category_cell("   ").is_empty());
    }

    #[test]
    fn test_every_code_resolves() {
        for (code, label) in CATEGORY_CODES {
            assert_eq!(category_for_code(*code), Some(*label));
        }
        assert_eq!(category_for_code('Z'), None);
    }

    #[test]
    fn test_tech_keyword_appends_both() {
        let mut categories = vec!["Knowledge & Skills".to_string()];
        apply_tech_keywords("Core Java (Advanced Level)", &mut categories);
        assert_eq!(categories, vec!["Knowledge & Skills", "Technical Skills"]);
    }

    #[test]
    fn test_tech_keyword_case_insensitive() {
        let mut categories = Vec::new();
        apply_tech_keywords("Microsoft .net Framework 4.5", &mut categories);
        assert_eq!(categories, vec!["Knowledge & Skills", "Technical Skills"]);
    }

    #[test]
    fn test_no_tech_keyword() {
        let mut categories = vec!["Personality & Behavior".to_string()];
        apply_tech_keywords("OPQ32r", &mut categories);
        assert_eq!(categories, vec!["Personality & Behavior"]);
    }
}
