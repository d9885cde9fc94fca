use crate::{Grammar, Production, Symbol};

use std::{
    collections::{BTreeSet, VecDeque},
    fmt::Display,
};

/// [Item](https://en.wikipedia.org/wiki/LR_parser#Items): a production with a bullet/cursor
/// marking how much of its body has been read.
///
/// Items order by production index, then cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    production: usize,
    cursor: usize,
}

/// Set of [`Item`]s in a state of the [`Cfsm`](super::Cfsm), kept in canonical (sorted) order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ItemSet {
    items: BTreeSet<Item>,
}

impl Item {
    /// Creates the item with the cursor at the start of the production body.
    pub fn new(production: &Production) -> Self {
        // `Symbol::Epsilon` has no meaning for the cursor, so when reading it, we immediately
        // skip it.
        let cursor = production
            .body()
            .iter()
            .take_while(|s| matches!(s, Symbol::Epsilon))
            .count();

        Self {
            production: production.index(),
            cursor,
        }
    }

    pub fn production(&self) -> usize {
        self.production
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the [`Symbol`] the bullet/cursor is currently reading.
    pub fn cursor_symbol<'g>(&self, grammar: &'g Grammar) -> Option<&'g Symbol> {
        grammar.production(self.production).body().get(self.cursor)
    }

    /// Whether the cursor is at the end of the body.
    pub fn is_complete(&self, grammar: &Grammar) -> bool {
        self.cursor_symbol(grammar).is_none()
    }

    /// Advances the bullet/cursor by one (or more if the next symbols are
    /// [`Epsilon`](Symbol::Epsilon)).
    pub(crate) fn advance(mut self, grammar: &Grammar) -> Self {
        let body = grammar.production(self.production).body();

        // advance the cursor by one, plus the amount of epsilon symbols (they are by definition
        // already read)
        self.cursor += 1 + body
            .iter()
            .skip(self.cursor + 1)
            .take_while(|s| matches!(s, Symbol::Epsilon))
            .count();
        self.cursor = self.cursor.min(body.len());

        self
    }

    /// Returns a value displaying the item as `E -> E • + T`.
    pub fn display<'a>(&'a self, grammar: &'a Grammar) -> impl Display + 'a {
        ItemDisplay {
            item: self,
            grammar,
        }
    }
}

struct ItemDisplay<'a> {
    item: &'a Item,
    grammar: &'a Grammar,
}

impl Display for ItemDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let production = self.grammar.production(self.item.production);
        let body = production.body();

        // every symbol in the body plus the bullet.
        let mut result = Vec::with_capacity(body.len() + 1);
        for (index, symbol) in body.iter().enumerate() {
            if index == self.item.cursor {
                result.push("•");
            }
            result.push(symbol.name());
        }
        if self.item.cursor >= body.len() {
            result.push("•");
        }

        write!(f, "{} -> {}", production.head(), result.join(" "))
    }
}

impl ItemSet {
    /// Creates the closed start item set `{ S' -> • S, ... }`.
    pub(crate) fn start(grammar: &Grammar) -> Self {
        Self::from_iter([Item::new(grammar.production(0))]).closure(grammar)
    }

    /// Adds the initial item of every production of each variable that follows a cursor, until
    /// nothing changes.
    pub fn closure(mut self, grammar: &Grammar) -> Self {
        let mut pending_items = VecDeque::from_iter(self.items.iter().copied());

        while let Some(item) = pending_items.pop_front() {
            let Some(Symbol::Variable(head)) = item.cursor_symbol(grammar) else {
                continue;
            };

            for production in grammar.rules_for(head) {
                let new_item = Item::new(production);
                if self.items.insert(new_item) {
                    pending_items.push_back(new_item);
                }
            }
        }

        self
    }

    /// Advances every item reading `symbol` and returns the closure of the result. Empty when no
    /// item reads `symbol`.
    pub fn goto(&self, grammar: &Grammar, symbol: &Symbol) -> Self {
        self.items
            .iter()
            .filter(|item| item.cursor_symbol(grammar) == Some(symbol))
            .map(|item| item.advance(grammar))
            .collect::<Self>()
            .closure(grammar)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.items.contains(item)
    }
}

impl FromIterator<Item> for ItemSet {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Item, ItemSet};
    use crate::{Grammar, Symbol};

    fn expression_grammar() -> Grammar {
        "E -> E + T | T\nT -> ( E ) | a".parse().unwrap()
    }

    #[test]
    fn item_body_epsilon() {
        let grammar = "A -> ε".parse::<Grammar>().unwrap();
        let item = Item::new(grammar.production(1));

        assert_eq!(item.cursor(), 1);
        assert_eq!(item.cursor_symbol(&grammar), None);
        assert!(item.is_complete(&grammar));
        assert_eq!(item.display(&grammar).to_string(), "A -> ε •");
    }

    #[test]
    fn item_body_epsilon_advance() {
        let grammar = Grammar::builder()
            .with_rule(
                "A",
                [
                    Symbol::Variable("B".to_string()),
                    Symbol::Epsilon,
                    Symbol::Epsilon,
                    Symbol::Terminal("x".to_string()),
                ],
            )
            .with_rule("B", [Symbol::Terminal("b".to_string())])
            .build()
            .unwrap();

        let item = Item::new(grammar.production(1));
        assert_eq!(item.cursor(), 0);

        let item = item.advance(&grammar);
        assert_eq!(item.cursor(), 3);
        assert_eq!(
            item.cursor_symbol(&grammar),
            Some(&Symbol::Terminal("x".to_string()))
        );

        let item = item.advance(&grammar);
        assert!(item.is_complete(&grammar));
    }

    #[test]
    fn display() {
        let grammar = expression_grammar();
        let item = Item::new(grammar.production(1)).advance(&grammar);

        assert_eq!(item.display(&grammar).to_string(), "E -> E • + T");
    }

    #[test]
    fn start_closure() {
        let grammar = expression_grammar();
        let start = ItemSet::start(&grammar);

        assert_eq!(start.len(), 5);
        assert!(grammar
            .productions()
            .iter()
            .all(|p| start.contains(&Item::new(p))));
    }

    #[test]
    fn closure_idempotent() {
        let grammar = expression_grammar();
        let start = ItemSet::start(&grammar);

        assert_eq!(start.clone().closure(&grammar), start);

        for symbol in grammar.iter_symbols() {
            let target = start.goto(&grammar, &symbol);
            assert_eq!(target.clone().closure(&grammar), target);
        }
    }

    #[test]
    fn goto() {
        let grammar = expression_grammar();
        let start = ItemSet::start(&grammar);

        let on_paren = start.goto(&grammar, &Symbol::Terminal("(".to_string()));
        // T -> ( • E ), plus the closure over E and T
        assert_eq!(on_paren.len(), 5);

        let on_a = start.goto(&grammar, &Symbol::Terminal("a".to_string()));
        assert_eq!(on_a.len(), 1);
        assert!(on_a.iter().all(|item| item.is_complete(&grammar)));

        assert!(start
            .goto(&grammar, &Symbol::Terminal("+".to_string()))
            .is_empty());
    }
}
