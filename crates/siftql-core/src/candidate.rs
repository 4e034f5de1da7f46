//! Enumeration Candidate Matcher.
//!
//! A member is a candidate for a keyword when its name contains the keyword
//! case-insensitively, or when its custom predicate accepts the keyword.

use crate::{
    predicate::casefold,
    schema::{EnumMember, EnumModel},
    value::EnumValue,
};

/// Members matching `keyword`, in declaration order, each at most once.
/// The keyword is trimmed before both the name test and the custom predicate.
#[must_use]
pub fn match_candidates<'a>(model: &'a EnumModel, keyword: &str) -> Vec<&'a EnumMember> {
    let keyword = keyword.trim();
    let needle = casefold(keyword);

    model
        .members
        .iter()
        .filter(|member| casefold(&member.name).contains(&needle) || member.is_candidate(keyword))
        .collect()
}

/// Candidate members as resolved enum values.
#[must_use]
pub fn candidate_values(model: &EnumModel, keyword: &str) -> Vec<EnumValue> {
    match_candidates(model, keyword)
        .into_iter()
        .map(|member| EnumValue::new(&model.name, &member.name, member.ordinal))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{priority_enum, priority_enum_with_alias};

    fn names(model: &EnumModel, keyword: &str) -> Vec<String> {
        match_candidates(model, keyword)
            .into_iter()
            .map(|m| m.name.clone())
            .collect()
    }

    #[test]
    fn substring_of_name_matches() {
        assert_eq!(names(&priority_enum(), "hig"), ["HIGH"]);
    }

    #[test]
    fn single_letter_matches_only_names_containing_it() {
        assert_eq!(names(&priority_enum(), "h"), ["HIGH"]);
    }

    #[test]
    fn keyword_case_is_ignored() {
        assert_eq!(names(&priority_enum(), "MeD"), ["MEDIUM"]);
    }

    #[test]
    fn custom_predicate_adds_candidates() {
        assert_eq!(names(&priority_enum_with_alias(), "normal"), ["MEDIUM"]);
        assert!(names(&priority_enum(), "normal").is_empty());
    }

    #[test]
    fn custom_predicate_sees_the_trimmed_keyword() {
        assert_eq!(names(&priority_enum_with_alias(), "  normal "), ["MEDIUM"]);
    }

    #[test]
    fn name_and_predicate_hits_are_deduplicated() {
        let model = EnumModel::from_members(
            "Level",
            vec![
                EnumMember::new("HIGH", 0).with_candidate(|kw| kw.starts_with('h')),
                EnumMember::new("LOW", 1),
            ],
        );

        assert_eq!(names(&model, "h"), ["HIGH"]);
    }

    #[test]
    fn predicate_on_other_members_widens_single_letter_match() {
        let model = EnumModel::from_members(
            "Priority",
            vec![
                EnumMember::new("LOW", 0),
                EnumMember::new("MEDIUM", 1).with_candidate(|kw| kw == "h"),
                EnumMember::new("HIGH", 2),
            ],
        );

        assert_eq!(names(&model, "h"), ["MEDIUM", "HIGH"]);
    }

    #[test]
    fn values_carry_enum_identity() {
        let values = candidate_values(&priority_enum(), "low");
        assert_eq!(values, [EnumValue::new("Priority", "LOW", 0)]);
    }
}
