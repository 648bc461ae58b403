use std::collections::VecDeque;
use std::io::{self, BufRead};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Comment,
    Vertice,
    Normal,
    Texture,
    Object,
    Group,
    Smoothing,
    Face,
    /// A directive this format subset does not know.
    Identifier(String),
    /// An argument following the directive.
    Word(String),
    EOL,
    EOF,
}

/// Splits a line-oriented stream into a directive token, its argument
/// words, and an end-of-line marker. Blank lines are skipped and a word
/// starting with `#` drops the rest of its line. Bytes that are not valid
/// UTF-8 are decoded lossily.
pub struct Lexer<R> {
    reader: R,

    row: usize,
    buffer: Vec<u8>,
    words: VecDeque<String>,
    in_line: bool,
}

impl<R: BufRead> Lexer<R> {
    pub fn new(reader: R) -> Self {
        return Lexer {
            reader,
            row: 0,
            buffer: Vec::new(),
            words: VecDeque::new(),
            in_line: false,
        };
    }

    /// 1-based number of the line the last token came from.
    pub fn row(&self) -> usize {
        return self.row;
    }

    fn read_line(&mut self) -> io::Result<bool> {
        self.buffer.clear();

        match self.reader.read_until(b'\n', &mut self.buffer)? {
            0 => {
                return Ok(false);
            }

            _ => {
                self.row += 1;
                return Ok(true);
            }
        }
    }

    pub fn next_token(&mut self) -> io::Result<Token> {
        if self.in_line {
            match self.words.pop_front() {
                Some(word) => {
                    return Ok(Token::Word(word));
                }

                None => {
                    self.in_line = false;
                    return Ok(Token::EOL);
                }
            }
        }

        loop {
            if !self.read_line()? {
                return Ok(Token::EOF);
            }

            let line = String::from_utf8_lossy(&self.buffer);
            let mut words = line.split_whitespace().peekable();

            match words.peek() {
                None => {
                    continue;
                }

                Some(first) if first.starts_with('#') => {
                    return Ok(Token::Comment);
                }

                Some(_) => {}
            }

            self.words = words
                .take_while(|word| !word.starts_with('#'))
                .map(str::to_string)
                .collect();
            let Some(directive) = self.words.pop_front() else {
                continue;
            };
            self.in_line = true;

            return Ok(Self::directive(directive));
        }
    }

    /// Consumes the argument words of the current line, including its EOL.
    pub fn rest_of_line(&mut self) -> io::Result<Vec<String>> {
        let mut words = Vec::new();

        loop {
            match self.next_token()? {
                Token::Word(word) => words.push(word),
                _ => break,
            }
        }

        return Ok(words);
    }

    fn directive(identifier: String) -> Token {
        match identifier.as_str() {
            "v" => Token::Vertice,
            "vn" => Token::Normal,
            "vt" => Token::Texture,
            "o" => Token::Object,
            "g" => Token::Group,
            "s" => Token::Smoothing,
            "f" => Token::Face,
            _ => Token::Identifier(identifier),
        }
    }
}
