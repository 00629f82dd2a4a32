//! Parsing utilities

#[must_use]
#[derive(Debug, Clone, Copy)]
/// `const`-capable string parser
pub struct Parser<'s> {
    /// Remaining unparsed input
    pub input: &'s str,
}

macro_rules! try_option {
    ($e:expr) => {
        match $e {
            Some(v) => v,
            None => return None,
        }
    };
}

impl<'s> Parser<'s> {
    /// Create new parser marking the beginning of the input
    pub const fn new(input: &'s str) -> Parser<'s> {
        Parser { input }
    }

    /// Remove whitespace from the beginning of the input
    pub const fn trim_whitespace(self) -> Parser<'s> {
        let mut bs = self.input.as_bytes();
        loop {
            match bs {
                [b'\t' | b'\n' | b'\r' | b' ', rest @ ..] => bs = rest,
                _ => {
                    return Parser {
                        input: {
                            // const-hack
                            match core::str::from_utf8(bs) {
                                Ok(input) => input,
                                Err(_) => unreachable!(),
                            }
                        },
                    };
                }
            }
        }
    }

    /// Parse one ascii char if input is non-empty
    pub const fn parse_any_ascii_char(self) -> Option<(Parser<'s>, char)> {
        match self.input.as_bytes() {
            [b, rest @ ..] if b.is_ascii() => Some((
                Parser {
                    // const-hack
                    input: match core::str::from_utf8(rest) {
                        Ok(input) => input,
                        Err(_) => unreachable!(),
                    },
                },
                *b as char,
            )),
            _ => None,
        }
    }

    /// Parse one ascii char if input is non-empty and it matches the `expected`
    pub const fn parse_ascii_char(self, expected: char) -> Option<Parser<'s>> {
        match self.parse_any_ascii_char() {
            Some((p, c)) if c == expected => Some(p),
            _ => None,
        }
    }

    /// Parse a single decimal digit
    pub const fn parse_digit(self) -> Option<(Parser<'s>, i64)> {
        match self.parse_any_ascii_char() {
            Some((p, c)) if c.is_ascii_digit() => Some((p, (c as u8 - b'0') as i64)),
            _ => None,
        }
    }

    /// Parse signed number
    pub const fn parse_i64(self) -> Option<(Parser<'s>, i64)> {
        let mut bs = self.input.as_bytes();

        let minus = match bs {
            [b'-', rest @ ..] => {
                bs = rest;
                true
            }
            _ => false,
        };

        let mut parsed_anything = false;
        let mut acc: i64 = 0;

        loop {
            match bs {
                [
                    b @ (b'0' | b'1' | b'2' | b'3' | b'4' | b'5' | b'6' | b'7' | b'8' | b'9'),
                    rest @ ..,
                ] => {
                    parsed_anything = true;
                    match acc.checked_mul(10) {
                        Some(a) => acc = a,
                        None => {
                            return None;
                        }
                    }
                    match acc.checked_add((*b - b'0') as i64) {
                        Some(a) => acc = a,
                        None => {
                            return None;
                        }
                    }

                    bs = rest;
                }
                _ => {
                    if !parsed_anything {
                        return None;
                    }

                    if minus {
                        acc = -acc;
                    }

                    return Some((
                        Parser {
                            // const-hack
                            input: match core::str::from_utf8(bs) {
                                Ok(input) => input,
                                Err(_) => unreachable!(),
                            },
                        },
                        acc,
                    ));
                }
            }
        }
    }

    /// Parse zero or more `item`s separated by `separator`. Whitespace around items is skipped.
    pub fn parse_separated<T, F>(self, separator: char, mut item: F) -> Option<(Parser<'s>, Vec<T>)>
    where
        F: FnMut(Parser<'s>) -> Option<(Parser<'s>, T)>,
    {
        let mut res = Vec::new();
        let p = self.trim_whitespace();
        let Some((mut p, first)) = item(p) else {
            return Some((p, res));
        };
        res.push(first);

        p = p.trim_whitespace();
        while let Some(after_separator) = p.parse_ascii_char(separator) {
            let (next, value) = try_option!(item(after_separator.trim_whitespace()));
            res.push(value);
            p = next.trim_whitespace();
        }

        Some((p, res))
    }

    /// Parse comma separated `item`s enclosed in square brackets
    pub fn parse_list<T, F>(self, item: F) -> Option<(Parser<'s>, Vec<T>)>
    where
        F: FnMut(Parser<'s>) -> Option<(Parser<'s>, T)>,
    {
        let p = try_option!(self.trim_whitespace().parse_ascii_char('['));
        let (p, res) = try_option!(p.parse_separated(',', item));
        let p = try_option!(p.parse_ascii_char(']'));
        Some((p.trim_whitespace(), res))
    }

    /// Check if the next non-whitespace character is `expected`
    pub const fn peek_ascii_char(self, expected: char) -> bool {
        self.trim_whitespace().parse_ascii_char(expected).is_some()
    }
}

/// Turn parser result into value, failing if not the whole input was consumed
pub fn finish<T>(result: Option<(Parser<'_>, T)>) -> Result<T, &'static str> {
    match result {
        Some((p, result)) if p.trim_whitespace().input.is_empty() => Ok(result),
        Some(_) => Err("Parse error: leftover input"),
        None => Err("Parse error: parser failed"),
    }
}
