//! SL text to abstract content.
//!
//! The parser is driven by the ontology: the head of every parenthesised
//! expression is looked up to decide whether it builds an aggregate, an
//! IRE, a predicate, an agent action or a concept, and positional
//! arguments are mapped onto the schema's slots in declaration order.
//! Heads the ontology does not know become predicates where a proposition
//! is expected and concepts elsewhere; validation reports them afterwards.

use chrono::{DateTime, NaiveDate, Utc};
use jade_content::schema::{AGENT_ACTION_BASE, CONTENT_ELEMENT_BASE, PREDICATE_BASE};
use jade_content::{
    AbsAgentAction, AbsAggregate, AbsConcept, AbsContentElementList, AbsIre, AbsObject,
    AbsPredicate, AbsVariable, CodecResult, ObjectSchema, Ontology, SchemaKind,
};

use super::lexer::{Token, TokenKind, parse_error, tokenize};

/// What an expression in a given position is expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Term,
    Proposition,
    Action,
}

impl Expect {
    fn for_slot(slot_schema: &str) -> Self {
        if slot_schema.eq_ignore_ascii_case(PREDICATE_BASE)
            || slot_schema.eq_ignore_ascii_case(CONTENT_ELEMENT_BASE)
        {
            Self::Proposition
        } else if slot_schema.eq_ignore_ascii_case(AGENT_ACTION_BASE) {
            Self::Action
        } else {
            Self::Term
        }
    }
}

/// Parse a complete content expression: one or more content elements
/// inside an outer pair of parentheses.
pub(crate) fn parse_content(input: &str, onto: &Ontology) -> CodecResult<AbsObject> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        end: input.len(),
        onto,
    };
    let open = parser.next()?;
    if open.kind != TokenKind::Open {
        return Err(parse_error(open.offset, "content must start with '('"));
    }
    let mut elements = Vec::new();
    while !parser.at_close()? {
        if let Some(token) = parser.peek()
            && token.kind != TokenKind::Open
        {
            return Err(parse_error(token.offset, "expected a parenthesised content element"));
        }
        elements.push(parser.expression(Expect::Proposition)?);
    }
    parser.next()?;
    if let Some(extra) = parser.peek() {
        return Err(parse_error(extra.offset, "unexpected input after content"));
    }
    match <[AbsObject; 1]>::try_from(elements) {
        Ok([single]) => Ok(single),
        Err(elements) if elements.is_empty() => Err(parse_error(open.offset, "empty content")),
        Err(elements) => {
            let mut list = AbsContentElementList::new();
            for element in elements {
                list.add(element);
            }
            Ok(list.into())
        }
    }
}

struct Parser<'t, 'o> {
    tokens: &'t [Token],
    pos: usize,
    end: usize,
    onto: &'o Ontology,
}

impl<'t> Parser<'t, '_> {
    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> CodecResult<&'t Token> {
        let token = self
            .peek()
            .ok_or_else(|| parse_error(self.end, "unexpected end of content"))?;
        self.pos = self.pos.saturating_add(1);
        Ok(token)
    }

    fn at_close(&self) -> CodecResult<bool> {
        self.peek()
            .map(|token| token.kind == TokenKind::Close)
            .ok_or_else(|| parse_error(self.end, "missing ')'"))
    }

    fn expression(&mut self, expect: Expect) -> CodecResult<AbsObject> {
        let token = self.next()?;
        match &token.kind {
            TokenKind::Open => self.compound(expect),
            TokenKind::Close => Err(parse_error(token.offset, "unexpected ')'")),
            TokenKind::Word(word) => Ok(word_value(word)),
            TokenKind::Quoted(text) => Ok(text.as_str().into()),
            TokenKind::Variable { name, meta } => Ok(if *meta {
                AbsVariable::meta(name.as_str())
            } else {
                AbsVariable::new(name.as_str())
            }
            .into()),
            TokenKind::Keyword(name) => {
                Err(parse_error(token.offset, format!("unexpected slot keyword :{name}")))
            }
            TokenKind::Bytes(bytes) => Ok(bytes.clone().into()),
        }
    }

    fn compound(&mut self, expect: Expect) -> CodecResult<AbsObject> {
        let head = self.next()?;
        let TokenKind::Word(type_name) = &head.kind else {
            return Err(parse_error(head.offset, "expected a type name or operator"));
        };
        let onto = self.onto;
        let schema = onto.find_schema(type_name);
        match schema.map(ObjectSchema::kind) {
            Some(SchemaKind::Aggregate) => self.aggregate(type_name),
            Some(SchemaKind::Ire) => self.ire(type_name),
            Some(SchemaKind::Predicate) => self.slotted(head, schema, Shape::Predicate),
            Some(SchemaKind::AgentAction) => self.slotted(head, schema, Shape::AgentAction),
            Some(SchemaKind::Concept) => self.slotted(head, schema, Shape::Concept),
            _ => {
                let shape = match expect {
                    Expect::Proposition => Shape::Predicate,
                    Expect::Action => Shape::AgentAction,
                    Expect::Term => Shape::Concept,
                };
                self.slotted(head, schema, shape)
            }
        }
    }

    fn aggregate(&mut self, type_name: &str) -> CodecResult<AbsObject> {
        let mut aggregate = AbsAggregate::new(type_name);
        while !self.at_close()? {
            aggregate.add(self.expression(Expect::Term)?);
        }
        self.next()?;
        Ok(aggregate.into())
    }

    fn ire(&mut self, type_name: &str) -> CodecResult<AbsObject> {
        let variable = self.expression(Expect::Term)?;
        let proposition = self.expression(Expect::Proposition)?;
        let close = self.next()?;
        if close.kind != TokenKind::Close {
            return Err(parse_error(
                close.offset,
                format!("{type_name} takes a variable and a proposition"),
            ));
        }
        Ok(AbsIre::new(type_name, variable, proposition).into())
    }

    fn slotted(
        &mut self,
        head: &Token,
        schema: Option<&ObjectSchema>,
        shape: Shape,
    ) -> CodecResult<AbsObject> {
        let TokenKind::Word(type_name) = &head.kind else {
            return Err(parse_error(head.offset, "expected a type name or operator"));
        };
        let declared = match schema {
            Some(schema) => schema
                .slots(self.onto)
                .map_err(|e| parse_error(head.offset, e.to_string()))?,
            None => Vec::new(),
        };
        let mut node = shape.build(type_name);
        let mut position = 0_usize;
        loop {
            let token = self
                .peek()
                .ok_or_else(|| parse_error(self.end, format!("missing ')' after {type_name}")))?;
            let (name, expect) = match &token.kind {
                TokenKind::Close => {
                    self.next()?;
                    return Ok(node);
                }
                TokenKind::Keyword(name) => {
                    self.next()?;
                    let expect = declared
                        .iter()
                        .find(|slot| slot.name.eq_ignore_ascii_case(name))
                        .map_or(Expect::Term, |slot| Expect::for_slot(&slot.schema));
                    (name.clone(), expect)
                }
                _ => {
                    let Some(slot) = declared.get(position) else {
                        return Err(parse_error(
                            token.offset,
                            format!("too many positional arguments for {type_name}"),
                        ));
                    };
                    position = position.saturating_add(1);
                    (slot.name.clone(), Expect::for_slot(&slot.schema))
                }
            };
            let value = self.expression(expect)?;
            if let Some(slots) = node.slots_mut() {
                slots.insert(name, value);
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Shape {
    Concept,
    AgentAction,
    Predicate,
}

impl Shape {
    fn build(self, type_name: &str) -> AbsObject {
        match self {
            Self::Concept => AbsConcept::new(type_name).into(),
            Self::AgentAction => AbsAgentAction::new(type_name).into(),
            Self::Predicate => AbsPredicate::new(type_name).into(),
        }
    }
}

/// Value of an unquoted word: boolean, integer, float, date, or else the
/// word itself as a string.
pub(crate) fn word_value(word: &str) -> AbsObject {
    match word {
        "true" => return true.into(),
        "false" => return false.into(),
        _ => {}
    }
    if let Ok(integer) = word.parse::<i64>() {
        return integer.into();
    }
    if looks_numeric(word)
        && let Ok(float) = word.parse::<f64>()
    {
        return float.into();
    }
    if let Some(date) = parse_date(word) {
        return date.into();
    }
    word.into()
}

fn looks_numeric(word: &str) -> bool {
    word.chars().any(|c| c.is_ascii_digit())
        && word
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
}

/// FIPA date format, always in UTC.
pub(crate) const DATE_FORMAT: &str = "%Y%m%dT%H%M%S%3fZ";

/// Parse a FIPA date such as `20240501T103000250Z`. The trailing `Z` is
/// optional; the value is read as UTC either way.
pub(crate) fn parse_date(word: &str) -> Option<DateTime<Utc>> {
    let body = word.strip_suffix('Z').unwrap_or(word);
    if body.len() != 18 || body.get(8..9) != Some("T") {
        return None;
    }
    let field = |range: std::ops::Range<usize>| -> Option<u32> {
        let digits = body.get(range)?;
        if digits.bytes().all(|b| b.is_ascii_digit()) {
            digits.parse().ok()
        } else {
            None
        }
    };
    let year = i32::try_from(field(0..4)?).ok()?;
    let date = NaiveDate::from_ymd_opt(year, field(4..6)?, field(6..8)?)?;
    let time = date.and_hms_milli_opt(field(9..11)?, field(11..13)?, field(13..15)?, field(15..18)?)?;
    Some(time.and_utc())
}
