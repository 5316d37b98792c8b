//! Turtle reader
//!
//! Parses the subset of Turtle the writer emits: `@prefix` directives,
//! IRI references, prefixed names, double-quoted literals with `\"`,
//! `\\`, `\n`, `\r`, `\t` escapes and optional `^^` datatypes, and
//! `;`/`,` continuation. Blank nodes, collections, and the `a` shorthand
//! are outside the subset.
//!
//! The reader recovers statements, not provenance: the returned graph
//! carries an empty document URI.

use crate::triple::{Graph, Iri, Literal, Term, Triple};
use std::collections::HashMap;
use thiserror::Error;

/// Turtle reading error
#[derive(Debug, Error)]
pub enum ReadError {
    /// Tokenizer failure
    #[error("lexical error at offset {offset}: {message}")]
    Lexical {
        /// Character offset of the failure
        offset: usize,
        /// What went wrong
        message: String,
    },

    /// Parser failure
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Prefixed name with no matching `@prefix`
    #[error("unknown prefix '{0}'")]
    UnknownPrefix(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    AtPrefix,
    IriRef(String),
    PName { prefix: String, local: String },
    LiteralStr(String),
    DoubleCaret,
    Dot,
    Semicolon,
    Comma,
}

fn tokenize(input: &str) -> Result<Vec<Token>, ReadError> {
    let mut tokens = Vec::new();
    let bytes: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < bytes.len() {
        let ch = bytes[i];
        match ch {
            c if c.is_whitespace() => i += 1,
            '<' => {
                let start = i + 1;
                let mut j = start;
                while j < bytes.len() && bytes[j] != '>' {
                    j += 1;
                }
                if j == bytes.len() {
                    return Err(ReadError::Lexical {
                        offset: i,
                        message: "unterminated IRI reference".into(),
                    });
                }
                tokens.push(Token::IriRef(bytes[start..j].iter().collect()));
                i = j + 1;
            }
            '"' => {
                let mut value = String::new();
                let mut j = i + 1;
                loop {
                    if j >= bytes.len() {
                        return Err(ReadError::Lexical {
                            offset: i,
                            message: "unterminated literal".into(),
                        });
                    }
                    match bytes[j] {
                        '"' => break,
                        '\\' => {
                            let escaped = bytes.get(j + 1).ok_or_else(|| ReadError::Lexical {
                                offset: j,
                                message: "dangling escape".into(),
                            })?;
                            match escaped {
                                '"' => value.push('"'),
                                '\\' => value.push('\\'),
                                'n' => value.push('\n'),
                                'r' => value.push('\r'),
                                't' => value.push('\t'),
                                other => {
                                    return Err(ReadError::Lexical {
                                        offset: j,
                                        message: format!("unsupported escape '\\{other}'"),
                                    })
                                }
                            }
                            j += 2;
                        }
                        other => {
                            value.push(other);
                            j += 1;
                        }
                    }
                }
                tokens.push(Token::LiteralStr(value));
                i = j + 1;
            }
            '^' => {
                if bytes.get(i + 1) == Some(&'^') {
                    tokens.push(Token::DoubleCaret);
                    i += 2;
                } else {
                    return Err(ReadError::Lexical {
                        offset: i,
                        message: "lone '^'".into(),
                    });
                }
            }
            '.' => {
                tokens.push(Token::Dot);
                i += 1;
            }
            ';' => {
                tokens.push(Token::Semicolon);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            '@' => {
                let start = i + 1;
                let mut j = start;
                while j < bytes.len() && bytes[j].is_alphabetic() {
                    j += 1;
                }
                let word: String = bytes[start..j].iter().collect();
                if word == "prefix" {
                    tokens.push(Token::AtPrefix);
                    i = j;
                } else {
                    return Err(ReadError::Lexical {
                        offset: i,
                        message: format!("unsupported directive '@{word}'"),
                    });
                }
            }
            _ => {
                // Prefixed name: word characters up to a delimiter, with
                // exactly one ':' separating prefix and local part.
                let start = i;
                let mut j = i;
                while j < bytes.len()
                    && !bytes[j].is_whitespace()
                    && !matches!(bytes[j], '<' | '"' | '^' | ';' | ',' | '.')
                {
                    j += 1;
                }
                let word: String = bytes[start..j].iter().collect();
                match word.split_once(':') {
                    Some((prefix, local)) => tokens.push(Token::PName {
                        prefix: prefix.to_string(),
                        local: local.to_string(),
                    }),
                    None => {
                        return Err(ReadError::Lexical {
                            offset: start,
                            message: format!("unexpected token '{word}'"),
                        })
                    }
                }
                i = j;
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
    prefixes: HashMap<String, String>,
}

impl Parser {
    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ReadError> {
        match self.next() {
            Some(token) if &token == expected => Ok(()),
            other => Err(ReadError::Syntax(format!(
                "expected {expected:?}, found {other:?}"
            ))),
        }
    }

    fn resolve_iri(&self, token: Token) -> Result<Iri, ReadError> {
        match token {
            Token::IriRef(iri) => Ok(Iri::new(iri)),
            Token::PName { prefix, local } => {
                let base = self
                    .prefixes
                    .get(&prefix)
                    .ok_or(ReadError::UnknownPrefix(prefix))?;
                Ok(Iri::new(format!("{base}{local}")))
            }
            other => Err(ReadError::Syntax(format!("expected IRI, found {other:?}"))),
        }
    }

    /// Parse one object term, consuming a `^^datatype` suffix if present
    fn parse_object(&mut self, token: Token) -> Result<Term, ReadError> {
        match token {
            Token::LiteralStr(value) => {
                if self.tokens.get(self.position) == Some(&Token::DoubleCaret) {
                    self.position += 1;
                    let datatype_token = self
                        .next()
                        .ok_or_else(|| ReadError::Syntax("datatype expected after '^^'".into()))?;
                    let datatype = self.resolve_iri(datatype_token)?;
                    Ok(Term::Literal(Literal {
                        value,
                        datatype: Some(datatype),
                    }))
                } else {
                    Ok(Term::Literal(Literal::string(value)))
                }
            }
            other => Ok(Term::Iri(self.resolve_iri(other)?)),
        }
    }
}

/// Parse Turtle text produced by [`to_turtle`](crate::turtle::to_turtle)
pub fn read_turtle(input: &str) -> Result<Graph, ReadError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        position: 0,
        prefixes: HashMap::new(),
    };
    let mut graph = Graph::new("");

    while let Some(token) = parser.next() {
        match token {
            Token::AtPrefix => {
                let name = match parser.next() {
                    Some(Token::PName { prefix, local }) if local.is_empty() => prefix,
                    other => {
                        return Err(ReadError::Syntax(format!(
                            "expected prefix name, found {other:?}"
                        )))
                    }
                };
                let iri = match parser.next() {
                    Some(Token::IriRef(iri)) => iri,
                    other => {
                        return Err(ReadError::Syntax(format!(
                            "expected prefix IRI, found {other:?}"
                        )))
                    }
                };
                parser.expect(&Token::Dot)?;
                parser.prefixes.insert(name, iri);
            }
            subject_token => {
                let subject = parser.resolve_iri(subject_token)?;
                'predicates: loop {
                    let predicate_token = parser
                        .next()
                        .ok_or_else(|| ReadError::Syntax("predicate expected".into()))?;
                    let predicate = parser.resolve_iri(predicate_token)?;
                    loop {
                        let object_token = parser
                            .next()
                            .ok_or_else(|| ReadError::Syntax("object expected".into()))?;
                        let object = parser.parse_object(object_token)?;
                        graph.insert(Triple::new(subject.clone(), predicate.clone(), object));

                        match parser.next() {
                            // Another object under the same predicate
                            Some(Token::Comma) => continue,
                            // Next predicate for the same subject
                            Some(Token::Semicolon) => break,
                            // Statement complete
                            Some(Token::Dot) => break 'predicates,
                            other => {
                                return Err(ReadError::Syntax(format!(
                                    "expected ',', ';', or '.', found {other:?}"
                                )))
                            }
                        }
                    }
                }
            }
        }
    }

    Ok(graph)
}
