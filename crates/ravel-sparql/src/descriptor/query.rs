use ravel_core::{NamespaceResolver, Uri, Value};

use crate::builder::SortDirection;
use crate::lex::SyntaxKind;
use crate::rewrite::{Keyword, QueryRewriter, Token, TokenKind};
use crate::serialize::serialize_dataset_clauses;
use crate::Result;

use super::classify::{Classification, QueryForm, classify};

/// Parsed, classified and editable query text.
#[derive(Debug, Clone)]
pub struct QueryDescriptor {
    rewriter: QueryRewriter,
    classification: Classification,
}

impl QueryDescriptor {
    pub fn parse(text: &str) -> Self {
        Self::from_rewriter(QueryRewriter::new(text))
    }

    pub fn from_rewriter(rewriter: QueryRewriter) -> Self {
        let classification = classify(rewriter.tokens());
        Self {
            rewriter,
            classification,
        }
    }

    pub fn form(&self) -> QueryForm {
        self.classification.form.unwrap_or(QueryForm::Unknown)
    }

    /// Whether result rows can be read as a stream of triples.
    pub fn provides_statements(&self) -> bool {
        self.classification.provides_statements
    }

    pub fn is_wildcard(&self) -> bool {
        self.classification.wildcard
    }

    /// Projected variables without the sigil. Under `SELECT *`, the first
    /// three variables met in the pattern.
    pub fn global_variables(&self) -> &[String] {
        &self.classification.global_variables
    }

    /// Subject, predicate and object variables of a statement-providing SELECT.
    pub fn statement_variables(&self) -> Option<[&str; 3]> {
        if !self.provides_statements() || self.form() != QueryForm::Select {
            return None;
        }
        match self.classification.global_variables.as_slice() {
            [s, p, o] => Some([s.as_str(), p.as_str(), o.as_str()]),
            _ => None,
        }
    }

    /// The variable whose values identify the resources the query is about.
    pub fn primary_variable(&self) -> Option<&str> {
        match self.form() {
            QueryForm::Describe => self.classification.described.first(),
            QueryForm::Select => self.classification.global_variables.first(),
            _ => None,
        }
        .map(String::as_str)
    }

    pub fn rewriter(&self) -> &QueryRewriter {
        &self.rewriter
    }

    pub fn bind(&mut self, name: &str, value: &Value) -> Result<()> {
        self.rewriter.bind(name, value)
    }

    pub fn add_default_graph(&mut self, graph: &Uri) {
        self.rewriter.add_default_graph(graph);
    }

    pub fn add_named_graph(&mut self, graph: &Uri) {
        self.rewriter.add_named_graph(graph);
    }

    pub fn declare_prefixes(&mut self, resolver: &impl NamespaceResolver) -> Result<()> {
        self.rewriter.declare_prefixes(resolver)
    }

    /// The complete query text.
    pub fn serialize(&self) -> Result<String> {
        self.rewriter.serialize(0)
    }

    pub fn limit(&self) -> Option<u64> {
        self.modifier_value(Keyword::Limit)
    }

    pub fn offset(&self) -> Option<u64> {
        self.modifier_value(Keyword::Offset)
    }

    /// Replace the LIMIT literal in place, or append a LIMIT clause.
    pub fn set_limit(&mut self, limit: u64) {
        self.set_modifier(Keyword::Limit, limit);
    }

    /// Replace the OFFSET literal in place, or append an OFFSET clause.
    pub fn set_offset(&mut self, offset: u64) {
        self.set_modifier(Keyword::Offset, offset);
    }

    pub fn has_order_by(&self) -> bool {
        self.top_level_keyword(Keyword::Order).is_some()
    }

    /// Add a sort condition, after any existing ones.
    pub fn add_order_by(&mut self, variable: &str, direction: SortDirection) {
        let variable = variable.trim_start_matches(['?', '$']);
        let mut condition = vec![
            Token::keyword(match direction {
                SortDirection::Ascending => Keyword::Asc,
                SortDirection::Descending => Keyword::Desc,
            }),
            Token::punct(SyntaxKind::ParenOpen, "("),
            Token::variable(variable),
            Token::punct(SyntaxKind::ParenClose, ")"),
        ];

        let after = self.where_group().map_or(0, |(_, end)| end + 1);
        let paging = self
            .top_level_positions()
            .filter(|&i| i >= after)
            .find(|&i| {
                let token = &self.rewriter.tokens()[i];
                token.is_keyword(Keyword::Limit) || token.is_keyword(Keyword::Offset)
            });

        let at = match self.top_level_keyword(Keyword::Order) {
            Some(order) => paging.filter(|&p| p > order),
            None => {
                condition.splice(
                    0..0,
                    [Token::keyword(Keyword::Order), Token::keyword(Keyword::By)],
                );
                paging
            }
        };
        let tokens = self.rewriter.tokens_mut();
        let at = at.unwrap_or(tokens.len());
        tokens.splice(at..at, condition);
    }

    /// PREFIX and BASE declarations at the head of the query.
    pub fn prologue(&self) -> Result<String> {
        let end = self.rewriter.prologue_end();
        self.rewriter.render(&self.rewriter.tokens()[..end], 0)
    }

    /// The dataset the query is scoped to, as FROM / FROM NAMED clauses.
    pub fn dataset_clauses(&self) -> String {
        serialize_dataset_clauses(self.rewriter.default_graphs(), self.rewriter.named_graphs())
    }

    /// Contents of the outermost WHERE group, without its braces.
    pub fn where_body(&self) -> Result<String> {
        match self.where_group() {
            Some((start, end)) => self
                .rewriter
                .render(&self.rewriter.tokens()[start + 1..end], 0),
            None => Ok(String::new()),
        }
    }

    /// Everything after the WHERE group: ORDER BY, LIMIT, OFFSET.
    pub fn solution_modifiers(&self) -> Result<String> {
        match self.where_group() {
            Some((_, end)) => self.rewriter.render(&self.rewriter.tokens()[end + 1..], 0),
            None => Ok(String::new()),
        }
    }

    /// Indices of the braces delimiting the WHERE group.
    fn where_group(&self) -> Option<(usize, usize)> {
        let tokens = self.rewriter.tokens();
        let opens: Vec<usize> = self
            .top_level_positions()
            .filter(|&i| tokens[i].is_punct(SyntaxKind::BraceOpen))
            .collect();

        let start = match self.top_level_keyword(Keyword::Where) {
            Some(where_at) => opens.iter().copied().find(|&i| i > where_at)?,
            // CONSTRUCT's first group is its template.
            None if self.form() == QueryForm::Construct => *opens.get(1)?,
            None => *opens.first()?,
        };
        let end = self
            .top_level_positions()
            .find(|&i| i > start && tokens[i].is_punct(SyntaxKind::BraceClose))?;
        Some((start, end))
    }

    /// Positions of tokens outside any group, braces of depth-0 groups included.
    fn top_level_positions(&self) -> impl Iterator<Item = usize> + '_ {
        let mut depth = 0usize;
        self.rewriter
            .tokens()
            .iter()
            .enumerate()
            .filter_map(move |(i, token)| {
                let at = match token.kind {
                    TokenKind::Punct(SyntaxKind::BraceOpen) => {
                        depth += 1;
                        depth - 1
                    }
                    TokenKind::Punct(SyntaxKind::BraceClose) => {
                        depth = depth.saturating_sub(1);
                        depth
                    }
                    _ => depth,
                };
                (at == 0).then_some(i)
            })
    }

    fn top_level_keyword(&self, keyword: Keyword) -> Option<usize> {
        let tokens = self.rewriter.tokens();
        self.top_level_positions()
            .find(|&i| tokens[i].is_keyword(keyword))
    }

    fn modifier_value(&self, keyword: Keyword) -> Option<u64> {
        let at = self.top_level_keyword(keyword)?;
        self.rewriter.tokens().get(at + 1)?.text.parse().ok()
    }

    fn set_modifier(&mut self, keyword: Keyword, value: u64) {
        let at = self.top_level_keyword(keyword);
        let tokens = self.rewriter.tokens_mut();
        match at {
            Some(at)
                if tokens
                    .get(at + 1)
                    .is_some_and(|t| t.kind == TokenKind::NumericLiteral) =>
            {
                tokens[at + 1] = Token::numeric(value);
            }
            _ => {
                tokens.push(Token::keyword(keyword));
                tokens.push(Token::numeric(value));
            }
        }
    }
}
