//! A parser for the declaration-level subset of Go, using winnow.
//!
//! Only the package clause, imports and type declarations are turned into a tree. Every
//! other top-level declaration is skipped token by token, with strings, runes and comments
//! honoured so that braces inside them do not confuse the skipping.

use winnow::{
    ascii::multispace1,
    combinator::{cut_err, preceded, repeat_till, separated, terminated},
    error::{ErrMode, InputError, ParserError},
    token::{literal, take_till, take_while},
    ModalResult, Parser,
};

use crate::decl::{FieldDecl, Import, SourceFile, StructType, TypeDecl, TypeExpr};

type PResult<'a, T> = ModalResult<T, InputError<&'a str>>;

/// A syntax error, located by line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    line: usize,
    message: String,
}

impl SyntaxError {
    /// The 1-based line the parser stopped at.
    pub fn line(&self) -> usize {
        self.line
    }

    /// What the parser found there.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl core::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl core::error::Error for SyntaxError {}

/// Parses one Go source file named `name`. A leading byte order mark is ignored.
pub fn parse_file(name: &str, source: &str) -> Result<SourceFile, SyntaxError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut input = source;
    match source_file(name, &mut input) {
        Ok(file) => Ok(file),
        Err(_) => {
            let consumed = source.len() - input.len();
            let line = source[..consumed].matches('\n').count() + 1;
            let snippet: String = input
                .lines()
                .next()
                .unwrap_or_default()
                .trim()
                .chars()
                .take(32)
                .collect();
            let message = if snippet.is_empty() {
                "unexpected end of input".to_string()
            } else {
                format!("unexpected `{snippet}`")
            };

            Err(SyntaxError { line, message })
        }
    }
}

/// Parses a single type expression, e.g. `[]*mp.Jump`.
pub fn parse_type(input: &str) -> Result<TypeExpr, SyntaxError> {
    let mut rest = input.trim();
    let ty = type_expr(&mut rest).map_err(|_| SyntaxError {
        line: 1,
        message: format!("invalid type expression `{input}`"),
    })?;
    if !rest.trim().is_empty() {
        return Err(SyntaxError {
            line: 1,
            message: format!("unexpected `{}` after type", rest.trim()),
        });
    }

    Ok(ty)
}

fn backtrack<'a, T>(input: &&'a str) -> PResult<'a, T> {
    Err(ErrMode::Backtrack(ParserError::from_input(input)))
}

/// `open`, then `item`s up to `close`, with trivia after each. Once `open` matched, an item
/// that fails is an error where it failed.
fn block<'a, T>(
    open: &'static str,
    item: impl Parser<&'a str, T, ErrMode<InputError<&'a str>>>,
    close: &'static str,
) -> impl Parser<&'a str, Vec<T>, ErrMode<InputError<&'a str>>> {
    preceded(
        (literal(open), trivia),
        repeat_till(0.., terminated(cut_err(item), trivia), literal(close)),
    )
    .map(|(items, _): (Vec<T>, &'a str)| items)
}

/// Whole file: package clause followed by top-level declarations.
fn source_file<'a>(name: &str, input: &mut &'a str) -> PResult<'a, SourceFile> {
    trivia(input)?;
    keyword(input, "package")?;
    blank(input)?;
    let package = ident(input)?;
    let mut file = SourceFile::new(name, package);

    loop {
        trivia(input)?;
        if input.is_empty() {
            break;
        }

        match peek_ident(input) {
            Some("import") => {
                for import in import_decl(input)? {
                    file = file.with_import(import);
                }
            }
            Some("type") => {
                for decl in type_decl(input)? {
                    file = file.with_type(decl);
                }
            }
            _ => skip_decl(input)?,
        }
    }

    Ok(file)
}

/// `import "path"` or `import ( ... )`.
fn import_decl<'a>(input: &mut &'a str) -> PResult<'a, Vec<Import>> {
    keyword(input, "import")?;
    blank(input)?;
    if input.starts_with('(') {
        return block("(", import_spec, ")").parse_next(input);
    }

    Ok(vec![import_spec(input)?])
}

fn import_spec<'a>(input: &mut &'a str) -> PResult<'a, Import> {
    let alias = if punct(input, ".").is_ok() {
        Some(".".to_string())
    } else {
        let mut ahead = *input;
        match ident(&mut ahead) {
            Ok(alias) => {
                *input = ahead;
                Some(alias.to_string())
            }
            Err(_) => None,
        }
    };
    blank(input)?;
    let path = string_lit(input)?;

    Ok(Import::new(alias, path))
}

/// `type Name T` or `type ( ... )`.
fn type_decl<'a>(input: &mut &'a str) -> PResult<'a, Vec<TypeDecl>> {
    keyword(input, "type")?;
    blank(input)?;
    if input.starts_with('(') {
        return block("(", type_spec, ")").parse_next(input);
    }

    Ok(vec![type_spec(input)?])
}

fn type_spec<'a>(input: &mut &'a str) -> PResult<'a, TypeDecl> {
    let name = ident(input)?;
    blank(input)?;
    if input.starts_with('[') {
        let mut ahead = *input;
        let params = bracketed(&mut ahead)?;
        if looks_like_type_params(params) {
            *input = ahead;
            blank(input)?;
        }
    }
    // Aliases describe the same way definitions do.
    let _ = punct(input, "=");
    let ty = type_expr(input)?;

    Ok(TypeDecl::new(name, ty))
}

/// Tells `type T[P any] ...` apart from `type T [N]int`.
fn looks_like_type_params(inner: &str) -> bool {
    let mut rest = inner.trim_start();
    if ident(&mut rest).is_err() {
        return false;
    }
    if rest.trim_start().starts_with(',') {
        return true;
    }
    let after = rest.trim_start();
    after.len() != rest.len()
        && after
            .chars()
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '~' || c == '[')
}

/// A type expression. Leading horizontal blanks are skipped.
fn type_expr<'a>(input: &mut &'a str) -> PResult<'a, TypeExpr> {
    blank(input)?;

    if punct(input, "*").is_ok() {
        return Ok(TypeExpr::Pointer(Box::new(type_expr(input)?)));
    }
    if punct(input, "(").is_ok() {
        let ty = type_expr(input)?;
        blank(input)?;
        punct(input, ")")?;
        return Ok(ty);
    }
    if input.starts_with('[') {
        let len = bracketed(input)?.trim();
        let elem = Box::new(type_expr(input)?);
        let len = (!len.is_empty()).then(|| len.to_string());
        return Ok(TypeExpr::Array { len, elem });
    }
    if punct(input, "<-").is_ok() {
        blank(input)?;
        keyword(input, "chan")?;
        return Ok(TypeExpr::Chan(Box::new(type_expr(input)?)));
    }

    let name = ident(input)?;
    match name {
        "struct" => Ok(TypeExpr::Struct(struct_body(input)?)),
        "interface" => {
            blank(input)?;
            if !input.starts_with('{') {
                return backtrack(input);
            }
            balanced(input)?;
            Ok(TypeExpr::Interface)
        }
        "map" => {
            let key = bracketed(input)?;
            let key = parse_nested(key)?;
            let value = type_expr(input)?;
            Ok(TypeExpr::Map {
                key: Box::new(key),
                value: Box::new(value),
            })
        }
        "chan" => {
            blank(input)?;
            let _ = punct(input, "<-");
            Ok(TypeExpr::Chan(Box::new(type_expr(input)?)))
        }
        "func" => {
            func_signature(input)?;
            Ok(TypeExpr::Func)
        }
        _ => {
            let base = if punct(input, ".").is_ok() {
                TypeExpr::selector(name, ident(input)?)
            } else {
                TypeExpr::ident(name)
            };
            if input.starts_with('[') {
                bracketed(input)?;
                return Ok(TypeExpr::Generic(Box::new(base)));
            }
            Ok(base)
        }
    }
}

fn parse_nested<'a>(inner: &'a str) -> PResult<'a, TypeExpr> {
    let mut rest = inner;
    let ty = type_expr(&mut rest)?;
    blank(&mut rest)?;
    if !rest.is_empty() {
        return backtrack(&rest);
    }

    Ok(ty)
}

/// Parameters and optional results of a `func` type; only skipped.
fn func_signature<'a>(input: &mut &'a str) -> PResult<'a, ()> {
    blank(input)?;
    if !input.starts_with('(') {
        return backtrack(input);
    }
    balanced(input)?;

    blank(input)?;
    if input.starts_with('(') {
        balanced(input)?;
    } else if starts_type(input) {
        type_expr(input)?;
    }

    Ok(())
}

/// Whether a type expression can start here, on the current line.
fn starts_type(input: &str) -> bool {
    match input.chars().next() {
        Some('*') | Some('[') => true,
        Some('<') => input.starts_with("<-"),
        Some(c) => c.is_alphabetic() || c == '_',
        None => false,
    }
}

/// `{ fields }` of a struct type.
fn struct_body<'a>(input: &mut &'a str) -> PResult<'a, StructType> {
    blank(input)?;
    block("{", field_decl, "}").map(StructType::new).parse_next(input)
}

/// One field line, with its optional tag and trailing comment.
fn field_decl<'a>(input: &mut &'a str) -> PResult<'a, FieldDecl> {
    let field = if input.starts_with('*') {
        FieldDecl::embedded(type_expr(input)?)
    } else {
        let start = *input;
        let first = ident(input)?;
        if input.starts_with('[') {
            // Embedded instantiation, e.g. `List[int]`; a named array field has a blank
            // between name and type.
            bracketed(input)?;
            return finish_field(
                input,
                FieldDecl::embedded(TypeExpr::Generic(Box::new(TypeExpr::ident(first)))),
            );
        }
        blank(input)?;
        if input.starts_with('.') {
            // Embedded qualified type, e.g. `mp.Sing`.
            *input = start;
            FieldDecl::embedded(type_expr(input)?)
        } else if input.starts_with(',') {
            *input = start;
            let names: Vec<&str> =
                separated(1.., ident, (blank, literal(","), trivia)).parse_next(input)?;
            let names = names.into_iter().map(str::to_string).collect();
            FieldDecl::with_names(names, type_expr(input)?)
        } else if ends_field(input) {
            FieldDecl::embedded(TypeExpr::ident(first))
        } else {
            FieldDecl::named(first, type_expr(input)?)
        }
    };

    finish_field(input, field)
}

/// The optional tag and trailing comment of a field, then its terminator.
fn finish_field<'a>(input: &mut &'a str, field: FieldDecl) -> PResult<'a, FieldDecl> {
    blank(input)?;
    let field = if input.starts_with('"') || input.starts_with('`') {
        let tag = string_lit(input)?;
        blank(input)?;
        field.with_tag(tag)
    } else {
        field
    };
    let field = match trailing_comment(input)? {
        Some(comment) => field.with_comment(comment),
        None => field,
    };

    blank(input)?;
    if punct(input, ";").is_ok()
        || input.is_empty()
        || input.starts_with('\n')
        || input.starts_with('}')
    {
        Ok(field)
    } else {
        backtrack(input)
    }
}

/// Whether the field declaration ends right here (nothing but a tag or comment follows).
fn ends_field(input: &str) -> bool {
    input.is_empty()
        || input.starts_with(['\n', ';', '}', '"', '`'])
        || input.starts_with("//")
        || input.starts_with("/*")
}

/// A `// ...` or `/* ... */` comment on the current line.
fn trailing_comment<'a>(input: &mut &'a str) -> PResult<'a, Option<&'a str>> {
    if punct(input, "//").is_ok() {
        let text = until(input, '\n')?;
        return Ok(Some(text.trim_end_matches('\r')));
    }
    if punct(input, "/*").is_ok() {
        let rest: &'a str = *input;
        let Some(end) = rest.find("*/") else {
            return backtrack(input);
        };
        *input = &rest[end + 2..];
        return Ok(Some(&rest[..end]));
    }

    Ok(None)
}

/// Skips a top-level declaration other than `import` and `type`.
///
/// Consumes tokens until the next line, at nesting depth zero, that starts with a top-level
/// keyword.
fn skip_decl<'a>(input: &mut &'a str) -> PResult<'a, ()> {
    let mut depth = 0usize;
    loop {
        if input.is_empty() {
            return if depth == 0 { Ok(()) } else { backtrack(input) };
        }

        match lexeme(input)? {
            Lexeme::Open => depth += 1,
            Lexeme::Close => {
                if depth == 0 {
                    return backtrack(input);
                }
                depth -= 1;
            }
            Lexeme::Newline if depth == 0 => {
                let mut ahead = *input;
                blank(&mut ahead)?;
                if matches!(
                    peek_ident(ahead),
                    Some("func" | "var" | "const" | "type" | "import")
                ) {
                    *input = ahead;
                    return Ok(());
                }
            }
            Lexeme::Newline | Lexeme::Other => (),
        }
    }
}

enum Lexeme {
    Open,
    Close,
    Newline,
    Other,
}

/// Consumes one lexical unit.
fn lexeme<'a>(input: &mut &'a str) -> PResult<'a, Lexeme> {
    if input.starts_with("//") {
        until(input, '\n')?;
        return Ok(Lexeme::Other);
    }
    let rest: &'a str = *input;
    if rest.starts_with("/*") {
        let Some(end) = rest.find("*/") else {
            return backtrack(input);
        };
        let newline = rest[..end].contains('\n');
        *input = &rest[end + 2..];
        return Ok(if newline {
            Lexeme::Newline
        } else {
            Lexeme::Other
        });
    }
    if input.starts_with(['"', '`']) {
        string_lit(input)?;
        return Ok(Lexeme::Other);
    }
    if input.starts_with('\'') {
        rune_lit(input)?;
        return Ok(Lexeme::Other);
    }

    let mut chars = rest.chars();
    let Some(c) = chars.next() else {
        return backtrack(input);
    };
    *input = chars.as_str();
    Ok(match c {
        '\n' => Lexeme::Newline,
        '{' | '(' | '[' => Lexeme::Open,
        '}' | ')' | ']' => Lexeme::Close,
        _ => Lexeme::Other,
    })
}

/// Consumes a balanced `(...)`, `[...]` or `{...}` group, returning what is inside it.
fn balanced<'a>(input: &mut &'a str) -> PResult<'a, &'a str> {
    let start = *input;
    let mut depth = 0usize;
    loop {
        if input.is_empty() {
            return backtrack(input);
        }
        match lexeme(input)? {
            Lexeme::Open => depth += 1,
            Lexeme::Close => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let end = start.len() - input.len();
                    return Ok(&start[1..end - 1]);
                }
            }
            Lexeme::Newline | Lexeme::Other if depth == 0 => return backtrack(input),
            Lexeme::Newline | Lexeme::Other => (),
        }
    }
}

/// A balanced `[...]` group.
fn bracketed<'a>(input: &mut &'a str) -> PResult<'a, &'a str> {
    if !input.starts_with('[') {
        return backtrack(input);
    }
    balanced(input)
}

/// An interpreted (`"..."`) or raw (`` `...` ``) string literal, decoded.
fn string_lit<'a>(input: &mut &'a str) -> PResult<'a, String> {
    if punct(input, "`").is_ok() {
        let raw = until(input, '`')?;
        punct(input, "`")?;
        return Ok(raw.replace('\r', ""));
    }

    punct(input, "\"")?;
    let rest: &'a str = *input;
    let mut out = String::new();
    let mut chars = rest.chars();
    loop {
        let Some(c) = chars.next() else {
            return backtrack(input);
        };
        match c {
            '"' => break,
            '\n' => return backtrack(input),
            '\\' => {
                let Some(escape) = chars.next() else {
                    return backtrack(input);
                };
                match escape {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    'a' => out.push('\x07'),
                    'b' => out.push('\x08'),
                    'f' => out.push('\x0c'),
                    'v' => out.push('\x0b'),
                    'x' | 'u' | 'U' => {
                        let digits = match escape {
                            'x' => 2,
                            'u' => 4,
                            _ => 8,
                        };
                        let hex: String = chars.by_ref().take(digits).collect();
                        match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                            Some(decoded) if hex.len() == digits => out.push(decoded),
                            _ => return backtrack(input),
                        }
                    }
                    '0'..='7' => {
                        let rest: String = chars.by_ref().take(2).collect();
                        let octal = format!("{escape}{rest}");
                        match u32::from_str_radix(&octal, 8).ok().and_then(char::from_u32) {
                            Some(decoded) => out.push(decoded),
                            None => return backtrack(input),
                        }
                    }
                    other => out.push(other),
                }
            }
            other => out.push(other),
        }
    }
    *input = chars.as_str();

    Ok(out)
}

/// A rune literal such as `'a'` or `'\''`; only skipped.
fn rune_lit<'a>(input: &mut &'a str) -> PResult<'a, ()> {
    punct(input, "'")?;
    let rest: &'a str = *input;
    let mut escaped = false;
    for (i, c) in rest.char_indices() {
        match c {
            '\n' => break,
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '\'' => {
                *input = &rest[i + 1..];
                return Ok(());
            }
            _ => (),
        }
    }

    backtrack(input)
}

/// An identifier: a letter or `_` followed by letters, digits and `_`.
fn ident<'a>(input: &mut &'a str) -> PResult<'a, &'a str> {
    match input.chars().next() {
        Some(c) if c.is_alphabetic() || c == '_' => (),
        _ => return backtrack(input),
    }

    take_while(1.., |c: char| c.is_alphanumeric() || c == '_').parse_next(input)
}

/// Everything up to (not including) `end`, or to the end of input.
fn until<'a>(input: &mut &'a str, end: char) -> PResult<'a, &'a str> {
    take_till(0.., end).parse_next(input)
}

fn peek_ident(input: &str) -> Option<&str> {
    let mut ahead = input;
    ident(&mut ahead).ok()
}

/// An identifier equal to `word`.
fn keyword<'a>(input: &mut &'a str, word: &str) -> PResult<'a, ()> {
    let mut ahead = *input;
    if ident(&mut ahead)? != word {
        return backtrack(input);
    }
    *input = ahead;

    Ok(())
}

fn punct<'a>(input: &mut &'a str, token: &'static str) -> PResult<'a, ()> {
    literal(token).void().parse_next(input)
}

/// Horizontal blanks: spaces, tabs and carriage returns. Never crosses a line.
fn blank<'a>(input: &mut &'a str) -> PResult<'a, ()> {
    take_while(0.., [' ', '\t', '\r']).void().parse_next(input)
}

/// Whitespace, newlines, semicolons and comments.
fn trivia<'a>(input: &mut &'a str) -> PResult<'a, ()> {
    loop {
        let start_len = input.len();

        let _ = multispace1::<_, InputError<&'a str>>.parse_next(input);
        let _ = punct(input, ";");
        if input.starts_with("//") || input.starts_with("/*") {
            lexeme(input)?;
        }

        if input.len() == start_len {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
