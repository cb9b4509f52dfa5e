//! Keyword taxonomy: the fixed vocabularies every heuristic matches against.

/// Technical keywords checked for in skills and free text, in suggestion order.
pub const TECHNICAL: &[&str] = &[
    "Java",
    "Python",
    "JavaScript",
    "TypeScript",
    "React",
    "Node.js",
    "Spring Boot",
    "SQL",
    "MongoDB",
    "PostgreSQL",
    "Git",
    "Docker",
    "Kubernetes",
    "AWS",
    "Azure",
    "REST API",
    "GraphQL",
    "Microservices",
    "CI/CD",
    "Agile",
    "Scrum",
    "DevOps",
];

pub const SOFT: &[&str] = &[
    "Leadership",
    "Communication",
    "Problem Solving",
    "Team Collaboration",
    "Project Management",
    "Critical Thinking",
    "Time Management",
    "Adaptability",
];

/// Strong verbs that open achievement-oriented bullets.
pub const ACTION_VERBS: &[&str] = &[
    "Developed",
    "Implemented",
    "Designed",
    "Led",
    "Managed",
    "Created",
    "Improved",
    "Optimized",
    "Collaborated",
    "Delivered",
    "Achieved",
    "Increased",
    "Reduced",
    "Streamlined",
    "Enhanced",
    "Built",
    "Maintained",
    "Deployed",
    "Integrated",
];

/// Verbs prepended when a description has none.
pub const REWRITE_VERBS: &[&str] = &["Developed", "Implemented", "Led", "Designed", "Created"];

/// Verbs that open a templated experience description.
pub const EXPERIENCE_LEAD_VERBS: &[&str] =
    &["Developed", "Implemented", "Led", "Designed", "Optimized"];

/// Lead-in words for a templated summary.
pub const SUMMARY_LEAD_INS: &[&str] = &["Experienced", "Skilled", "Proven", "Dedicated"];

/// Example metrics offered when a description has no numbers.
pub const METRIC_PHRASES: &[&str] = &[
    "by 30%",
    "by 25%",
    "by 40%",
    "by 50%",
    "for 100+ users",
    "with 99.9% uptime",
    "reducing costs by 20%",
];

/// True if any keyword appears in `haystack` (case-insensitive substring).
pub fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    let haystack = haystack.to_lowercase();
    keywords
        .iter()
        .any(|k| haystack.contains(&k.to_lowercase()))
}

/// Keywords, in list order, that appear in `haystack` (case-insensitive substring).
pub fn matching<'a>(haystack: &str, keywords: &[&'a str]) -> Vec<&'a str> {
    let haystack = haystack.to_lowercase();
    keywords
        .iter()
        .copied()
        .filter(|k| haystack.contains(&k.to_lowercase()))
        .collect()
}

/// Technical keywords that no skill name contains, in list order.
pub fn missing_technical(skill_names_lower: &[String]) -> Vec<&'static str> {
    TECHNICAL
        .iter()
        .copied()
        .filter(|tech| {
            let tech = tech.to_lowercase();
            !skill_names_lower.iter().any(|s| s.contains(&tech))
        })
        .collect()
}

/// Technical keywords (at most three) that some skill name contains.
pub fn tech_stack(skill_names_lower: &[String]) -> Vec<&'static str> {
    TECHNICAL
        .iter()
        .copied()
        .filter(|tech| {
            let tech = tech.to_lowercase();
            skill_names_lower.iter().any(|s| s.contains(&tech))
        })
        .take(3)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_any_is_case_insensitive() {
        assert!(contains_any("DEVELOPED a service", ACTION_VERBS));
        assert!(!contains_any("wrote some code", ACTION_VERBS));
    }

    #[test]
    fn test_matching_keeps_list_order() {
        let found = matching("docker, python and java", TECHNICAL);
        assert_eq!(found, vec!["Java", "Python", "Docker"]);
    }

    #[test]
    fn test_missing_technical_uses_substring_match() {
        let skills = vec!["javascript (es6)".to_string()];
        let missing = missing_technical(&skills);
        // "java" is a substring of "javascript"
        assert!(!missing.contains(&"Java"));
        assert!(!missing.contains(&"JavaScript"));
        assert!(missing.contains(&"Python"));
    }

    #[test]
    fn test_tech_stack_caps_at_three() {
        let skills = vec![
            "java".to_string(),
            "python".to_string(),
            "react".to_string(),
            "docker".to_string(),
        ];
        assert_eq!(tech_stack(&skills), vec!["Java", "Python", "React"]);
    }

    #[test]
    fn test_soft_skills_listed() {
        assert!(SOFT.contains(&"Leadership"));
    }
}
