pub mod token;
pub mod options;
pub mod lexer;
pub mod element;
pub mod parser;

use crate::error::Error;
use element::Element;
use lexer::Lexer;
use options::ParserOptions;
use parser::Parser;

/// Tokenize and parse `text` into an untyped element tree.
pub fn parse(text: &str, options: &ParserOptions) -> Result<Element, Error> {
    let tokens = Lexer::new(text, options).tokenize()?;
    Ok(Parser::new(tokens, options, text.len()).parse()?)
}
