//! Abstract content to SL text.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use jade_content::{AbsObject, CodecError, CodecResult, Ontology, PrimitiveValue, Slots};

use super::lexer::is_delimiter;
use super::ontology::is_positional;
use super::parser::{DATE_FORMAT, word_value};

/// Encode content, wrapped in the outer parentheses SL requires. A content
/// element list contributes each of its elements.
pub(crate) fn encode_content(content: &AbsObject, onto: &Ontology) -> CodecResult<String> {
    let mut encoder = Encoder {
        onto,
        out: String::from("("),
    };
    match content {
        AbsObject::ContentElementList(list) => {
            if list.is_empty() {
                return Err(CodecError::Encode("empty content element list".into()));
            }
            for (idx, element) in list.elements().iter().enumerate() {
                if idx > 0 {
                    encoder.out.push(' ');
                }
                encoder.expression(element)?;
            }
        }
        other => encoder.expression(other)?,
    }
    encoder.out.push(')');
    Ok(encoder.out)
}

struct Encoder<'o> {
    onto: &'o Ontology,
    out: String,
}

impl Encoder<'_> {
    fn expression(&mut self, abs: &AbsObject) -> CodecResult<()> {
        match abs {
            AbsObject::Primitive(primitive) => self.primitive(primitive.value()),
            AbsObject::Variable(variable) => {
                let name = symbol(variable.name(), "variable name")?;
                self.out.push_str(if variable.is_meta() { "??" } else { "?" });
                self.out.push_str(name);
                Ok(())
            }
            AbsObject::Aggregate(aggregate) => {
                self.open(aggregate.type_name())?;
                for element in aggregate.elements() {
                    self.out.push(' ');
                    self.expression(element)?;
                }
                self.out.push(')');
                Ok(())
            }
            AbsObject::Ire(ire) => {
                self.open(ire.type_name())?;
                self.out.push(' ');
                self.expression(ire.variable())?;
                self.out.push(' ');
                self.expression(ire.proposition())?;
                self.out.push(')');
                Ok(())
            }
            AbsObject::ContentElementList(_) => Err(CodecError::Encode(
                "content element lists cannot be nested".into(),
            )),
            AbsObject::Concept(_) | AbsObject::AgentAction(_) | AbsObject::Predicate(_) => {
                let slots = abs
                    .slots()
                    .ok_or_else(|| CodecError::Encode(format!("{abs} has no slots")))?;
                self.open(abs.type_name())?;
                match self.positional_order(abs.type_name(), slots) {
                    Some(order) => {
                        for name in order {
                            if let Some(value) = slots.get(&name) {
                                self.out.push(' ');
                                self.expression(value)?;
                            }
                        }
                    }
                    None => {
                        for (name, value) in slots.iter() {
                            self.out.push_str(" :");
                            self.out.push_str(symbol(name, "slot name")?);
                            self.out.push(' ');
                            self.expression(value)?;
                        }
                    }
                }
                self.out.push(')');
                Ok(())
            }
        }
    }

    fn open(&mut self, type_name: &str) -> CodecResult<()> {
        self.out.push('(');
        self.out.push_str(symbol(type_name, "type name")?);
        Ok(())
    }

    /// Slot names in schema order when the element is written positionally:
    /// the type must be an operator and the present slots must be a prefix
    /// of the declared ones.
    fn positional_order(&self, type_name: &str, slots: &Slots) -> Option<Vec<String>> {
        if !is_positional(type_name) {
            return None;
        }
        let declared = self.onto.find_schema(type_name)?.slots(self.onto).ok()?;
        let present = declared
            .iter()
            .take_while(|slot| slots.contains(&slot.name))
            .count();
        let all_declared = slots
            .names()
            .all(|name| declared.iter().any(|slot| slot.name.eq_ignore_ascii_case(name)));
        (present == slots.names().count() && all_declared)
            .then(|| declared.into_iter().take(present).map(|slot| slot.name).collect())
    }

    fn primitive(&mut self, value: &PrimitiveValue) -> CodecResult<()> {
        match value {
            PrimitiveValue::String(text) => {
                if is_bare_word(text) {
                    self.out.push_str(text);
                } else {
                    self.out.push('"');
                    for c in text.chars() {
                        if matches!(c, '"' | '\\') {
                            self.out.push('\\');
                        }
                        self.out.push(c);
                    }
                    self.out.push('"');
                }
            }
            PrimitiveValue::Boolean(flag) => self.out.push_str(if *flag { "true" } else { "false" }),
            PrimitiveValue::Integer(integer) => self.out.push_str(&integer.to_string()),
            PrimitiveValue::Float(float) => {
                if !float.is_finite() {
                    return Err(CodecError::Encode(format!("{float} has no SL form")));
                }
                let text = float.to_string();
                self.out.push_str(&text);
                if !text.contains(['.', 'e', 'E']) {
                    self.out.push_str(".0");
                }
            }
            PrimitiveValue::Date(date) => self.out.push_str(&date.format(DATE_FORMAT).to_string()),
            PrimitiveValue::ByteSequence(bytes) => {
                let encoded = STANDARD.encode(bytes);
                self.out.push('#');
                self.out.push_str(&encoded.len().to_string());
                self.out.push('"');
                self.out.push_str(&encoded);
            }
        }
        Ok(())
    }
}

/// Whether a string can be written without quotes and still read back as
/// the same string.
fn is_bare_word(text: &str) -> bool {
    let Some(first) = text.chars().next() else {
        return false;
    };
    !matches!(first, '?' | ':' | '#')
        && !text.chars().any(is_delimiter)
        && matches!(word_value(text), AbsObject::Primitive(p) if p.as_str() == Some(text))
}

fn symbol<'a>(name: &'a str, what: &str) -> CodecResult<&'a str> {
    let valid = name
        .chars()
        .next()
        .is_some_and(|first| !matches!(first, '?' | ':' | '#'))
        && !name.chars().any(is_delimiter);
    if valid {
        Ok(name)
    } else {
        Err(CodecError::Encode(format!("{what} {name:?} is not an SL symbol")))
    }
}
