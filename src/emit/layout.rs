//! Token stream layout
//!
//! Lays out synthesized token streams as readable Rust. The rules cover the
//! shapes the synthesizers produce: items, impl blocks, struct fields,
//! `match` arms, paths, generics and closure types. Only whitespace is chosen
//! here; the text lexes back to the same tokens.
//!
//! - braces open an indented block; `;` and `,` end a line inside a block
//!   (but not inside `(..)`, `[..]` or `<..>`)
//! - braces holding only names and commas stay on one line, `Impl { soc }`
//! - a closing `}` ends the line unless `,` `;` `)` or `.` follows
//! - top-level items are separated by a blank line
//! - outer attributes sit on their own line; single-line `doc` attributes
//!   are written as `///` comments

use proc_macro2::{Delimiter, Spacing, TokenStream, TokenTree};

const INDENT: &str = "    ";

/// Keywords followed by a space even before `(` or `::`.
const SPACED_KEYWORDS: &[&str] = &[
    "as", "dyn", "else", "for", "if", "impl", "in", "let", "match", "move", "mut", "return",
    "where", "while",
];

/// Multi-character operators joined from adjacent punctuation.
const JOINED_OPS: &[&str] = &["::", "->", "=>", "==", "!=", "<=", ">=", "&&", "||", "..", "+=", "-="];

/// Lay out `tokens` as source text ending in exactly one line break.
pub fn layout(tokens: TokenStream) -> String {
    let mut printer = Printer::default();
    printer.stream(tokens, 0);
    printer.finish()
}

/// What was written last, to decide the whitespace before the next token.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Prev {
    LineStart,
    Ident { spaced: bool },
    Literal,
    Op(String),
    Open,
    Close(Delimiter),
}

impl Prev {
    fn is_op(&self, op: &str) -> bool {
        matches!(self, Prev::Op(o) if o == op)
    }
}

/// The token about to be written.
#[derive(Debug, Clone, Copy)]
enum Kind<'a> {
    Word,
    Op(&'a str),
    Open(Delimiter),
}

#[derive(Debug)]
struct Printer {
    out: String,
    depth: usize,
    /// Open `<` generic brackets in the current group.
    angle: usize,
    prev: Prev,
    /// A `}` ended inside a block; the line ends unless a continuation
    /// token follows.
    pending_break: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Printer {
            out: String::new(),
            depth: 0,
            angle: 0,
            prev: Prev::LineStart,
            pending_break: false,
        }
    }
}

impl Printer {
    /// `inline` counts the parentheses/brackets entered since the innermost
    /// brace; zero means block context.
    fn stream(&mut self, tokens: TokenStream, inline: usize) {
        let tokens: Vec<TokenTree> = tokens.into_iter().collect();
        let mut i = 0;
        while i < tokens.len() {
            match &tokens[i] {
                TokenTree::Punct(punct) if punct.as_char() == '#' && inline == 0 => {
                    if let Some(text) = tokens.get(i + 1).and_then(doc_text) {
                        self.doc_comment(&text);
                        i += 2;
                        continue;
                    }
                    let (op, next) = collect_op(&tokens, i);
                    self.op(&op, inline);
                    i = next;
                    continue;
                }
                TokenTree::Punct(_) => {
                    let (op, next) = collect_op(&tokens, i);
                    self.op(&op, inline);
                    i = next;
                    continue;
                }
                TokenTree::Ident(ident) => {
                    let text = ident.to_string();
                    self.token_start(Kind::Word);
                    self.out.push_str(&text);
                    self.prev = Prev::Ident {
                        spaced: SPACED_KEYWORDS.contains(&text.as_str()),
                    };
                }
                TokenTree::Literal(lit) => {
                    self.token_start(Kind::Word);
                    self.out.push_str(&lit.to_string());
                    self.prev = Prev::Literal;
                }
                TokenTree::Group(group) => {
                    let attribute =
                        group.delimiter() == Delimiter::Bracket && self.prev.is_op("#");
                    self.group(group.delimiter(), group.stream(), inline);
                    if attribute && inline == 0 {
                        self.newline();
                    }
                }
            }
            i += 1;
        }
    }

    fn group(&mut self, delimiter: Delimiter, inner: TokenStream, inline: usize) {
        let angle = std::mem::take(&mut self.angle);
        match delimiter {
            Delimiter::Brace if is_name_list(&inner) => {
                self.token_start(Kind::Open(Delimiter::Brace));
                self.out.push_str("{ ");
                for tree in inner {
                    match tree {
                        TokenTree::Punct(_) => self.out.push(','),
                        other => {
                            if self.out.ends_with(',') {
                                self.out.push(' ');
                            }
                            self.out.push_str(&other.to_string());
                        }
                    }
                }
                self.out.push_str(" }");
                self.prev = Prev::Close(Delimiter::Brace);
                self.pending_break = inline == 0;
            }
            Delimiter::Brace => {
                self.token_start(Kind::Open(Delimiter::Brace));
                if inner.is_empty() {
                    self.out.push_str("{}");
                } else {
                    self.out.push('{');
                    self.depth += 1;
                    self.prev = Prev::Open;
                    self.newline();
                    self.stream(inner, 0);
                    self.pending_break = false;
                    self.depth -= 1;
                    self.newline();
                    self.indent();
                    self.out.push('}');
                }
                self.prev = Prev::Close(Delimiter::Brace);
                self.pending_break = inline == 0;
            }
            Delimiter::Parenthesis | Delimiter::Bracket => {
                let (open, close) = if delimiter == Delimiter::Parenthesis {
                    ('(', ')')
                } else {
                    ('[', ']')
                };
                self.token_start(Kind::Open(delimiter));
                self.out.push(open);
                self.prev = Prev::Open;
                self.stream(inner, inline + 1);
                self.pending_break = false;
                self.out.push(close);
                self.prev = Prev::Close(delimiter);
            }
            Delimiter::None => self.stream(inner, inline),
        }
        self.angle = angle;
    }

    fn op(&mut self, op: &str, inline: usize) {
        let block = inline == 0 && self.angle == 0;
        match op {
            "," | ";" => {
                self.pending_break = false;
                self.out.push_str(op);
                self.prev = Prev::Op(op.to_string());
                if block {
                    self.newline();
                    if op == ";" && self.depth == 0 {
                        self.blank_line();
                    }
                }
            }
            _ => {
                self.token_start(Kind::Op(op));
                self.out.push_str(op);
                self.prev = Prev::Op(op.to_string());
                if op == "<" {
                    self.angle += 1;
                } else if op == ">" {
                    self.angle = self.angle.saturating_sub(1);
                }
            }
        }
    }

    /// Resolve a pending line break and write the separator before a token.
    fn token_start(&mut self, kind: Kind<'_>) {
        if self.pending_break {
            self.pending_break = false;
            if !matches!(kind, Kind::Op(".") | Kind::Op("?")) {
                self.newline();
                if self.depth == 0 {
                    self.blank_line();
                }
            }
        }
        if self.prev == Prev::LineStart {
            self.indent();
        } else if needs_space(&self.prev, kind) {
            self.out.push(' ');
        }
    }

    fn doc_comment(&mut self, text: &str) {
        if !self.pending_break {
            self.newline();
        }
        self.token_start(Kind::Word);
        self.out.push_str("///");
        self.out.push_str(text);
        self.prev = Prev::Literal;
        self.newline();
    }

    fn indent(&mut self) {
        if self.prev == Prev::LineStart {
            for _ in 0..self.depth {
                self.out.push_str(INDENT);
            }
        }
    }

    fn newline(&mut self) {
        if self.prev != Prev::LineStart {
            self.out.push('\n');
            self.prev = Prev::LineStart;
        }
    }

    fn blank_line(&mut self) {
        if !self.out.ends_with("\n\n") {
            self.out.push('\n');
        }
    }

    fn finish(self) -> String {
        let mut out = self.out.trim().to_string();
        out.push('\n');
        out
    }
}

fn needs_space(prev: &Prev, next: Kind<'_>) -> bool {
    // Never after an opening delimiter or a prefix/joining operator.
    match prev {
        Prev::LineStart | Prev::Open => return false,
        Prev::Op(op) if matches!(op.as_str(), "::" | "." | "&" | "#" | "!" | "'" | "*" | "<") => {
            return false;
        }
        _ => {}
    }

    match next {
        Kind::Word | Kind::Open(Delimiter::Brace) => true,
        Kind::Open(Delimiter::Parenthesis) => match prev {
            Prev::Ident { spaced } => *spaced,
            Prev::Close(Delimiter::Brace) => true,
            Prev::Close(_) => false,
            Prev::Op(op) => op != ">",
            _ => true,
        },
        Kind::Open(_) => !matches!(prev, Prev::Ident { spaced: false }),
        Kind::Op("::") => match prev {
            Prev::Ident { spaced } => *spaced,
            Prev::Close(_) => false,
            Prev::Op(op) => op != ">",
            _ => true,
        },
        Kind::Op("." | "?" | ":" | "!" | "<" | ">") => false,
        Kind::Op(_) => true,
    }
}

/// Value of a `[doc = "..."]` attribute body that fits a `///` comment.
fn doc_text(tree: &TokenTree) -> Option<String> {
    let TokenTree::Group(group) = tree else {
        return None;
    };
    if group.delimiter() != Delimiter::Bracket {
        return None;
    }
    let inner: Vec<TokenTree> = group.stream().into_iter().collect();
    let [TokenTree::Ident(name), TokenTree::Punct(eq), TokenTree::Literal(lit)] = inner.as_slice()
    else {
        return None;
    };
    if name != "doc" || eq.as_char() != '=' {
        return None;
    }
    let text = syn::parse2::<syn::LitStr>(TokenTree::Literal(lit.clone()).into())
        .ok()?
        .value();
    // `////` is a plain comment
    if text.contains(['\n', '\r']) || text.starts_with('/') {
        return None;
    }
    Some(text)
}

/// `{ a, b }`: only identifiers and commas.
fn is_name_list(inner: &TokenStream) -> bool {
    let mut names = 0;
    for tree in inner.clone() {
        match tree {
            TokenTree::Ident(_) => names += 1,
            TokenTree::Punct(punct) if punct.as_char() == ',' => {}
            _ => return false,
        }
    }
    names > 0
}

/// Join adjacent punctuation forming one of [`JOINED_OPS`]. Returns the
/// operator and the index after it.
fn collect_op(tokens: &[TokenTree], start: usize) -> (String, usize) {
    let first = match &tokens[start] {
        TokenTree::Punct(punct) => punct,
        _ => return (String::new(), start + 1),
    };
    let mut op = first.as_char().to_string();
    if first.spacing() == Spacing::Joint {
        if let Some(TokenTree::Punct(second)) = tokens.get(start + 1) {
            let mut joined = op.clone();
            joined.push(second.as_char());
            if JOINED_OPS.contains(&joined.as_str()) {
                op = joined;
                return (op, start + 2);
            }
        }
    }
    (op, start + 1)
}
