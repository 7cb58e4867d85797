// Length and nesting limits enforced while reading

/// Longest identifier accepted, in bytes
pub const MAX_IDENTIFIER_LEN: usize = 128;

/// Most digits an integer literal may have, not counting its sign.
/// One more than `i64::MAX` has, so an extra leading digit on either
/// boundary value is a range error rather than a length error.
pub const MAX_INTEGER_DIGITS: usize = 20;

/// Longest string literal accepted, in bytes of raw (still escaped) content
pub const MAX_STRING_LEN: usize = 4096;

/// Deepest nesting of forms the parser will read
pub const MAX_FORM_DEPTH: usize = 256;

/// Deepest tree the display printer will descend into
pub const MAX_TREE_DEPTH: usize = 1024;

/// Reader limits, carried by every [`Lexer`](super::lexer::Lexer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_identifier_len: usize,
    pub max_integer_digits: usize,
    pub max_string_len: usize,
    pub max_depth: usize,
}

impl Limits {
    pub fn with_identifier_len(mut self, len: usize) -> Self {
        self.max_identifier_len = len;
        self
    }

    pub fn with_integer_digits(mut self, digits: usize) -> Self {
        self.max_integer_digits = digits;
        self
    }

    pub fn with_string_len(mut self, len: usize) -> Self {
        self.max_string_len = len;
        self
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_identifier_len: MAX_IDENTIFIER_LEN,
            max_integer_digits: MAX_INTEGER_DIGITS,
            max_string_len: MAX_STRING_LEN,
            max_depth: MAX_FORM_DEPTH,
        }
    }
}
