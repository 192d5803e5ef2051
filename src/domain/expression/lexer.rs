//! Tokenizer for search-intent expressions.

/// A lexical token of the expression language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Bare word such as `remote` or `c++`.
    Word(String),
    /// Double-quoted phrase, stored without the quotes.
    Phrase(String),
    LParen,
    RParen,
    And,
    Or,
    Not,
}

/// Split an expression into tokens.
///
/// `-` is a negation only where a new token would start; inside a word it is
/// literal, so `front-end` stays a single word.
pub fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        match ch {
            c if c.is_whitespace() => i += 1,
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '&' if chars.get(i + 1) == Some(&'&') => {
                tokens.push(Token::And);
                i += 2;
            }
            '|' if chars.get(i + 1) == Some(&'|') => {
                tokens.push(Token::Or);
                i += 2;
            }
            '-' => {
                tokens.push(Token::Not);
                i += 1;
            }
            '"' => {
                let start = i + 1;
                let end = chars[start..]
                    .iter()
                    .position(|c| *c == '"')
                    .map(|offset| start + offset)
                    .ok_or_else(|| "unterminated quoted phrase".to_string())?;
                let phrase: String = chars[start..end].iter().collect();
                let phrase = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
                if phrase.is_empty() {
                    return Err("empty quoted phrase".to_string());
                }
                tokens.push(Token::Phrase(phrase));
                i = end + 1;
            }
            _ => {
                let start = i;
                while i < chars.len() && !ends_word(&chars, i) {
                    i += 1;
                }
                tokens.push(Token::Word(chars[start..i].iter().collect()));
            }
        }
    }

    Ok(tokens)
}

fn ends_word(chars: &[char], i: usize) -> bool {
    match chars[i] {
        c if c.is_whitespace() => true,
        '(' | ')' | '"' => true,
        '&' => chars.get(i + 1) == Some(&'&'),
        '|' => chars.get(i + 1) == Some(&'|'),
        _ => false,
    }
}
