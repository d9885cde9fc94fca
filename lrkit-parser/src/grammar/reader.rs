use super::{Grammar, GrammarBuilder};
use crate::{Body, GrammarError, Symbol};

use std::str::FromStr;

/// Reads a grammar from text.
///
/// Every non-empty line that is not a comment (`//` or `#`) has the form `Head -> alt | alt`.
/// Lines without `->` or with an empty side are skipped with a warning. The head of the first
/// valid line is the start variable.
impl FromStr for Grammar {
    type Err = GrammarError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut builder = Grammar::builder();

        for (index, line) in text.lines().enumerate() {
            read_line(&mut builder, index + 1, line)?;
        }

        builder.build()
    }
}

fn read_line(builder: &mut GrammarBuilder, number: usize, line: &str) -> Result<(), GrammarError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with("//") || line.starts_with('#') {
        return Ok(());
    }

    let Some((head, body)) = line.split_once("->") else {
        log::warn!("line {number}: no `->` found, skipping `{line}`");
        return Ok(());
    };

    let (head, body) = (head.trim(), body.trim());
    if head.is_empty() || body.is_empty() {
        log::warn!("line {number}: empty side in `{line}`, skipping");
        return Ok(());
    }

    if !is_variable_name(head) {
        return Err(GrammarError::InvalidHead {
            line: number,
            head: head.to_string(),
        });
    }

    let body = body.replace('｜', "|");
    let alternatives = body
        .split('|')
        .map(str::trim)
        .filter(|alternative| !alternative.is_empty())
        .map(tokenize_body)
        .collect::<Vec<_>>();

    if alternatives.is_empty() {
        log::warn!("line {number}: no alternatives in `{line}`, skipping");
        return Ok(());
    }

    if !builder.has_start_variable() {
        builder.set_start_variable(head);
    }
    builder.add_rules(head, alternatives);

    Ok(())
}

/// Variables are single uppercase letters, primed names are reserved for the augmented start.
fn is_variable_name(name: &str) -> bool {
    matches!(Symbol::classify(name), Symbol::Variable(_))
}

/// Splits the body of an alternative into symbols.
///
/// Whitespace separates tokens, a run of lowercase letters and digits is a single token, and
/// every other character is a token on its own. `ε` and `epsilon` denote the empty string.
pub(crate) fn tokenize_body(text: &str) -> Body {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            current.push(c);
            continue;
        }

        if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        if !c.is_whitespace() {
            tokens.push(c.to_string());
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
        .into_iter()
        .map(|token| match token.as_str() {
            "ε" | "epsilon" => Symbol::Epsilon,
            _ => Symbol::classify(token),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::tokenize_body;
    use crate::{Grammar, GrammarError, Symbol};

    fn v(name: &str) -> Symbol {
        Symbol::Variable(name.to_string())
    }

    fn t(name: &str) -> Symbol {
        Symbol::Terminal(name.to_string())
    }

    #[test]
    fn tokenize() {
        assert_eq!(tokenize_body("E + T"), vec![v("E"), t("+"), v("T")]);
        assert_eq!(tokenize_body("E+T"), vec![v("E"), t("+"), v("T")]);
        assert_eq!(tokenize_body("(E)"), vec![t("("), v("E"), t(")")]);
        assert_eq!(tokenize_body("id1 AB"), vec![t("id1"), v("A"), v("B")]);
        assert_eq!(tokenize_body("aB c"), vec![t("a"), v("B"), t("c")]);
        assert_eq!(tokenize_body("ε"), vec![Symbol::Epsilon]);
        assert_eq!(tokenize_body("epsilon"), vec![Symbol::Epsilon]);
    }

    #[test]
    fn read() {
        let grammar = "E -> E + T | T\nT -> ( E ) | a".parse::<Grammar>().unwrap();

        assert_eq!(grammar.start_variable(), "E");
        assert_eq!(
            grammar
                .productions()
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>(),
            vec!["E' -> E", "E -> E + T", "E -> T", "T -> ( E )", "T -> a"]
        );
    }

    #[test]
    fn comments_and_blank_lines() {
        let text = "
            // expressions
            # also a comment
            S -> a S b

            S -> ε
        ";
        let grammar = text.parse::<Grammar>().unwrap();

        assert_eq!(grammar.productions().len(), 3);
        assert_eq!(grammar.production(2).body(), &vec![Symbol::Epsilon]);
    }

    #[test]
    fn full_width_alternative() {
        let grammar = "A -> a ｜ b".parse::<Grammar>().unwrap();

        assert_eq!(grammar.rules_for("A").count(), 2);
    }

    #[test]
    fn skip_invalid_lines() {
        let grammar = "S -> a\nthis line has no arrow\nA ->\n-> b\nS -> b"
            .parse::<Grammar>()
            .unwrap();

        assert_eq!(grammar.productions().len(), 3);
    }

    #[test]
    fn skip_empty_alternatives() {
        let grammar = "S -> a | | b |".parse::<Grammar>().unwrap();

        assert_eq!(grammar.rules_for("S").count(), 2);
    }

    #[test]
    fn no_valid_lines() {
        assert_eq!(
            "no arrow here\n// comment".parse::<Grammar>(),
            Err(GrammarError::NoProductions)
        );
        assert_eq!("".parse::<Grammar>(), Err(GrammarError::NoProductions));
        assert_eq!("S -> |".parse::<Grammar>(), Err(GrammarError::NoProductions));
    }

    #[test]
    fn invalid_head() {
        assert_eq!(
            "S -> a\nexpr -> b".parse::<Grammar>(),
            Err(GrammarError::InvalidHead {
                line: 2,
                head: "expr".to_string()
            })
        );
        assert!(matches!(
            "S' -> S".parse::<Grammar>(),
            Err(GrammarError::InvalidHead { line: 1, .. })
        ));
    }
}
