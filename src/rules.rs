//! Ordered first-match rule tables.
//!
//! Each recommendation ladder is a slice of [`Rule`]s evaluated top to bottom;
//! the first whose predicate holds decides the outcome. Keeping the ladders as
//! data makes their order visible and lets every rung be tested by name.

/// One rung of a ladder.
pub struct Rule<C, T> {
    pub name: &'static str,
    pub applies: fn(&C) -> bool,
    pub outcome: T,
}

/// First rule in `rules` that applies to `ctx`.
pub fn matching_rule<'a, C, T>(rules: &'a [Rule<C, T>], ctx: &C) -> Option<&'a Rule<C, T>> {
    rules.iter().find(|rule| (rule.applies)(ctx))
}

/// Outcome of the first applicable rule, or `default`.
pub fn first_match<C, T: Copy>(rules: &[Rule<C, T>], ctx: &C, default: T) -> T {
    matching_rule(rules, ctx).map_or(default, |rule| rule.outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LADDER: &[Rule<i32, &str>] = &[
        Rule {
            name: "negative",
            applies: |n: &i32| *n < 0,
            outcome: "neg",
        },
        Rule {
            name: "small",
            applies: |n: &i32| *n < 10,
            outcome: "small",
        },
        Rule {
            name: "even",
            applies: |n: &i32| n % 2 == 0,
            outcome: "even",
        },
    ];

    #[test]
    fn earlier_rules_shadow_later_ones() {
        assert_eq!(first_match(LADDER, &-4, "other"), "neg");
        assert_eq!(first_match(LADDER, &4, "other"), "small");
        assert_eq!(first_match(LADDER, &12, "other"), "even");
    }

    #[test]
    fn default_when_nothing_applies() {
        assert_eq!(first_match(LADDER, &13, "other"), "other");
        assert!(matching_rule(LADDER, &13).is_none());
    }

    #[test]
    fn matching_rule_reports_its_name() {
        assert_eq!(matching_rule(LADDER, &3).map(|r| r.name), Some("small"));
    }
}
