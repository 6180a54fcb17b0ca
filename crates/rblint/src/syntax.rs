pub const KEYWORDS_CONTROL: &[&str] = &[
    "begin",
    "case",
    "do",
    "else",
    "elsif",
    "end",
    "ensure",
    "if",
    "in",
    "rescue",
    "then",
    "unless",
    "until",
    "when",
    "while",
];

pub const KEYWORDS_VALUE: &[&str] = &["break", "next", "return"];

pub const KEYWORDS_FORWARDING: &[&str] = &["super", "yield"];

pub const KEYWORDS_NULLARY: &[&str] = &[
    "__ENCODING__",
    "__FILE__",
    "__LINE__",
    "redo",
    "retry",
    "self",
];

pub const KEYWORDS_OPERATOR: &[&str] = &["and", "not", "or"];

pub const KEYWORDS_OTHER: &[&str] = &["alias", "defined?", "false", "nil", "true"];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS_CONTROL.contains(&word)
        || KEYWORDS_VALUE.contains(&word)
        || KEYWORDS_FORWARDING.contains(&word)
        || KEYWORDS_NULLARY.contains(&word)
        || KEYWORDS_OPERATOR.contains(&word)
        || KEYWORDS_OTHER.contains(&word)
}

pub fn is_control_keyword(word: &str) -> bool {
    KEYWORDS_CONTROL.contains(&word)
}

pub const SYMBOLS_3: &[([char; 3], &str)] = &[(['.', '.', '.'], "...")];

pub const SYMBOLS_2: &[([char; 2], &str)] = &[
    (['=', '='], "=="),
    (['!', '='], "!="),
    (['<', '='], "<="),
    (['>', '='], ">="),
    (['&', '&'], "&&"),
    (['|', '|'], "||"),
    (['*', '*'], "**"),
    (['<', '<'], "<<"),
    (['>', '>'], ">>"),
    (['=', '>'], "=>"),
    (['.', '.'], ".."),
];

pub const SYMBOLS_1: &[char] = &[
    '{', '}', '(', ')', '[', ']', ',', '.', ':', ';', '=', '+', '-', '*', '/', '%', '|', '&',
    '!', '<', '>', '?', '^', '~',
];
