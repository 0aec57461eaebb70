//! Model formulas
//!
//! Supported grammar (a subset of the Wilkinson-Rogers notation):
//!
//! ```text
//! formula  := response "~" rhs
//! rhs      := term (("+" | "-") term)*
//! term     := name | "1" | "0" | "(" random ")"
//! random   := ("1" | "0" | name) ("+" name)* "|" name
//! ```
//!
//! `- 1` and `0` remove the intercept. Random-effect terms are carried for the
//! mixed-model solver; the OLS path rejects them.

use std::fmt;
use std::str::FromStr;

use crate::errors::{StatsError, StatsResult};

/// A random-effect term such as `(1 + attitude | subject)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomTerm {
    /// Grouping variable
    pub group: String,
    /// Random intercept per group
    pub intercept: bool,
    /// Random slopes per group
    pub slopes: Vec<String>,
}

impl fmt::Display for RandomTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<&str> = Vec::with_capacity(self.slopes.len() + 1);
        parts.push(if self.intercept { "1" } else { "0" });
        parts.extend(self.slopes.iter().map(String::as_str));
        write!(f, "({} | {})", parts.join(" + "), self.group)
    }
}

/// A parsed model formula
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    response: String,
    intercept: bool,
    fixed: Vec<String>,
    random: Vec<RandomTerm>,
}

impl Formula {
    pub fn parse(input: &str) -> StatsResult<Self> {
        let mut sides = input.split('~');
        let lhs = sides.next().unwrap_or_default().trim();
        let rhs = sides
            .next()
            .ok_or_else(|| StatsError::FormulaParse(format!("missing '~' in '{}'", input)))?;
        if sides.next().is_some() {
            return Err(StatsError::FormulaParse(format!(
                "more than one '~' in '{}'",
                input
            )));
        }

        let response = parse_name(lhs)?;
        let mut formula = Formula {
            response,
            intercept: true,
            fixed: Vec::new(),
            random: Vec::new(),
        };

        for (negated, term) in split_top_level(rhs)? {
            formula.add_term(negated, &term)?;
        }
        Ok(formula)
    }

    fn add_term(&mut self, negated: bool, term: &str) -> StatsResult<()> {
        match (negated, term) {
            (false, "1") => self.intercept = true,
            (false, "0") | (true, "1") => self.intercept = false,
            (true, other) => return Err(StatsError::UnsupportedTerm(format!("-{}", other))),
            (false, t) if t.starts_with('(') => {
                let inner = t
                    .strip_prefix('(')
                    .and_then(|t| t.strip_suffix(')'))
                    .ok_or_else(|| StatsError::FormulaParse(format!("unbalanced term '{}'", t)))?;
                self.random.push(parse_random(inner)?);
            }
            (false, t) => {
                let name = parse_name(t)?;
                if self.fixed.contains(&name) {
                    return Err(StatsError::FormulaParse(format!("duplicate term '{}'", name)));
                }
                self.fixed.push(name);
            }
        }
        Ok(())
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn has_intercept(&self) -> bool {
        self.intercept
    }

    pub fn fixed_terms(&self) -> &[String] {
        &self.fixed
    }

    pub fn random_terms(&self) -> &[RandomTerm] {
        &self.random
    }

    /// Every data column the formula reads
    pub fn referenced_columns(&self) -> Vec<&str> {
        let random = self
            .random
            .iter()
            .flat_map(|t| t.slopes.iter().chain(std::iter::once(&t.group)));

        let mut columns: Vec<&str> = Vec::new();
        for name in std::iter::once(&self.response)
            .chain(self.fixed.iter())
            .chain(random)
        {
            if !columns.contains(&name.as_str()) {
                columns.push(name);
            }
        }
        columns
    }

    /// The same formula with one fixed-effect term removed
    pub fn without_term(&self, name: &str) -> StatsResult<Formula> {
        if !self.fixed.iter().any(|t| t == name) {
            return Err(StatsError::InvalidInput(format!(
                "formula '{}' has no fixed term '{}'",
                self, name
            )));
        }
        let mut reduced = self.clone();
        reduced.fixed.retain(|t| t != name);
        Ok(reduced)
    }
}

impl FromStr for Formula {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::parse(s)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut terms: Vec<String> = self.fixed.clone();
        terms.extend(self.random.iter().map(RandomTerm::to_string));
        if terms.is_empty() {
            terms.push(if self.intercept { "1" } else { "0" }.to_string());
        } else if !self.intercept {
            terms.push("0".to_string());
        }
        write!(f, "{} ~ {}", self.response, terms.join(" + "))
    }
}

/// Split the right-hand side on `+` / `-` outside parentheses.
/// Returns `(negated, term)` pairs.
fn split_top_level(rhs: &str) -> StatsResult<Vec<(bool, String)>> {
    let mut terms = Vec::new();
    let mut current = String::new();
    let mut negated = false;
    let mut depth = 0usize;

    let flush = |current: &mut String,
                 negated: bool,
                 terms: &mut Vec<(bool, String)>|
     -> StatsResult<()> {
        let term = current.trim().to_string();
        current.clear();
        if term.is_empty() {
            return Err(StatsError::FormulaParse(format!("empty term in '{}'", rhs)));
        }
        terms.push((negated, term));
        Ok(())
    };

    for ch in rhs.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    StatsError::FormulaParse(format!("unbalanced ')' in '{}'", rhs))
                })?;
                current.push(ch);
            }
            '+' | '-' if depth == 0 => {
                // a sign may lead the right-hand side, as in `y ~ -1 + x`
                if !(current.trim().is_empty() && terms.is_empty()) {
                    flush(&mut current, negated, &mut terms)?;
                }
                negated = ch == '-';
            }
            _ => current.push(ch),
        }
    }
    if depth != 0 {
        return Err(StatsError::FormulaParse(format!("unbalanced '(' in '{}'", rhs)));
    }
    flush(&mut current, negated, &mut terms)?;
    Ok(terms)
}

fn parse_random(inner: &str) -> StatsResult<RandomTerm> {
    let (expr, group) = inner
        .split_once('|')
        .ok_or_else(|| StatsError::FormulaParse(format!("random term '({})' lacks '|'", inner)))?;
    let group = parse_name(group.trim())?;

    let mut intercept = true;
    let mut slopes = Vec::new();
    for part in expr.split('+').map(str::trim) {
        match part {
            "1" => intercept = true,
            "0" => intercept = false,
            name => slopes.push(parse_name(name)?),
        }
    }

    if !intercept && slopes.is_empty() {
        return Err(StatsError::FormulaParse(format!(
            "random term '({})' has no effects",
            inner
        )));
    }
    Ok(RandomTerm {
        group,
        intercept,
        slopes,
    })
}

fn parse_name(s: &str) -> StatsResult<String> {
    let s = s.trim();
    let valid = !s.is_empty()
        && !s.starts_with(|c: char| c.is_ascii_digit())
        && s.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.');
    if !valid {
        return Err(if s.contains([':', '*', '^', '/']) {
            StatsError::UnsupportedTerm(s.to_string())
        } else {
            StatsError::FormulaParse(format!("invalid name '{}'", s))
        });
    }
    Ok(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_formula() {
        let f = Formula::parse("pitch ~ sex").unwrap();
        assert_eq!(f.response(), "pitch");
        assert_eq!(f.fixed_terms(), &["sex".to_string()]);
        assert!(f.has_intercept());
        assert!(f.random_terms().is_empty());
    }

    #[test]
    fn test_intercept_only() {
        let f = Formula::parse("pitch ~ 1").unwrap();
        assert!(f.fixed_terms().is_empty());
        assert!(f.has_intercept());
        assert_eq!(f.to_string(), "pitch ~ 1");
    }

    #[test]
    fn test_removed_intercept() {
        let f: Formula = "y ~ x - 1".parse().unwrap();
        assert!(!f.has_intercept());
        assert_eq!(f.fixed_terms(), &["x".to_string()]);

        let g: Formula = "y ~ 0 + x".parse().unwrap();
        assert!(!g.has_intercept());
    }

    #[test]
    fn test_random_terms() {
        let f = Formula::parse("frequency ~ attitude + gender + (1|subject) + (1 + attitude | scenario)")
            .unwrap();
        assert_eq!(f.fixed_terms().len(), 2);
        assert_eq!(f.random_terms().len(), 2);
        assert_eq!(f.random_terms()[0].group, "subject");
        assert!(f.random_terms()[0].slopes.is_empty());
        assert_eq!(f.random_terms()[1].slopes, vec!["attitude".to_string()]);
        assert_eq!(
            f.to_string(),
            "frequency ~ attitude + gender + (1 | subject) + (1 + attitude | scenario)"
        );
    }

    #[test]
    fn test_without_term() {
        let f = Formula::parse("frequency ~ attitude + gender + (1|subject)").unwrap();
        let reduced = f.without_term("attitude").unwrap();
        assert_eq!(reduced.fixed_terms(), &["gender".to_string()]);
        assert_eq!(reduced.random_terms(), f.random_terms());
        assert!(f.without_term("age").is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Formula::parse("pitch sex"), Err(StatsError::FormulaParse(_))));
        assert!(matches!(Formula::parse("y ~ x ~ z"), Err(StatsError::FormulaParse(_))));
        assert!(matches!(Formula::parse("y ~ x + + z"), Err(StatsError::FormulaParse(_))));
        assert!(matches!(Formula::parse("y ~ (1 | g"), Err(StatsError::FormulaParse(_))));
        assert!(matches!(Formula::parse("y ~ x + x"), Err(StatsError::FormulaParse(_))));
        assert!(matches!(Formula::parse("y ~ a:b"), Err(StatsError::UnsupportedTerm(_))));
        assert!(matches!(Formula::parse("y ~ a - b"), Err(StatsError::UnsupportedTerm(_))));
    }

    #[test]
    fn test_referenced_columns() {
        let f = Formula::parse("y ~ x + (1 + x | g)").unwrap();
        assert_eq!(f.referenced_columns(), vec!["y", "x", "g"]);
    }
}
