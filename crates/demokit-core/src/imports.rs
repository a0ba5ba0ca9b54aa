//! Import table extraction for TypeScript/TSX source files.
//!
//! Builds a flat table from local binding name to resolved module path.
//! Import statements are the one sub-grammar here that is genuinely regular,
//! so they are tokenized with `logos`; a small cursor consumes the tokens.
//! No scope resolution happens beyond this table.

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use logos::Logos;
use regex::Regex;

/// Token kinds for an `import` statement.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
enum ImportToken {
    #[token("import")]
    Import,

    #[token("type")]
    Type,

    #[token("from")]
    From,

    #[token("as")]
    As,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(",")]
    Comma,

    #[token("*")]
    Star,

    #[token(";")]
    Semi,

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Identifier,

    #[regex(r#""([^"\\]|\\.)*""#)]
    StringDouble,

    #[regex(r#"'([^'\\]|\\.)*'"#)]
    StringSingle,
}

impl ImportToken {
    fn is_string(self) -> bool {
        matches!(self, ImportToken::StringSingle | ImportToken::StringDouble)
    }
}

/// How a binding was imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Default,
    Named,
    Namespace,
}

/// One local binding from an import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    /// Resolved module path for relative imports, bare specifier otherwise.
    pub module_path: String,
    /// Original exported name before any `as` alias. `None` for default and
    /// namespace imports.
    pub exported_name: Option<String>,
    pub kind: ImportKind,
    /// `import type` bindings occupy a name slot but never resolve a variant.
    pub type_only: bool,
    /// True when the module specifier is not a relative path.
    pub external: bool,
}

/// Flat table of import bindings for one file.
#[derive(Debug, Clone, Default)]
pub struct ImportTable {
    bindings: HashMap<String, ImportBinding>,
    /// Non-relative modules imported solely for effect (`import 'foo'`).
    pub externals: Vec<String>,
}

impl ImportTable {
    /// Look up a binding, including type-only ones.
    pub fn get(&self, name: &str) -> Option<&ImportBinding> {
        self.bindings.get(name)
    }

    /// Look up a binding usable for variant resolution. Type-only imports
    /// do not count.
    pub fn resolve(&self, name: &str) -> Option<&ImportBinding> {
        self.bindings.get(name).filter(|b| !b.type_only)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn insert(&mut self, local: String, binding: ImportBinding) {
        self.bindings.insert(local, binding);
    }
}

fn import_statement_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^[ \t]*import\b").expect("static import pattern"))
}

/// Parse all import statements of `source` into a binding table.
///
/// Relative specifiers are resolved against the directory of `file_path`
/// with their extension stripped; non-relative specifiers are kept verbatim
/// and marked external.
pub fn parse_imports(source: &str, file_path: &str) -> ImportTable {
    let mut table = ImportTable::default();
    for m in import_statement_re().find_iter(source) {
        let start = m.end() - "import".len();
        if let Some(tokens) = lex_import_statement(&source[start..]) {
            parse_statement(&tokens, file_path, &mut table);
        }
    }
    table
}

/// Lex one import statement, stopping at the module string. Returns `None`
/// for anything that does not look like a complete import statement.
fn lex_import_statement(text: &str) -> Option<Vec<(ImportToken, String)>> {
    let mut lexer = ImportToken::lexer(text);
    let mut tokens: Vec<(ImportToken, String)> = Vec::new();

    while let Some(result) = lexer.next() {
        let token = result.ok()?;
        let complete = token.is_string()
            && match tokens.last() {
                Some((ImportToken::Import, _)) => tokens.len() == 1,
                Some((ImportToken::From, _)) => true,
                _ => false,
            };
        tokens.push((token, lexer.slice().to_string()));
        if complete {
            return Some(tokens);
        }
        // An import clause never gets this long; bail out of minified blobs
        if tokens.len() > 256 {
            return None;
        }
    }
    None
}

/// Cursor over a lexed import statement.
struct Cursor<'a> {
    tokens: &'a [(ImportToken, String)],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<ImportToken> {
        self.tokens.get(self.pos).map(|(t, _)| *t)
    }

    fn peek_second(&self) -> Option<ImportToken> {
        self.tokens.get(self.pos + 1).map(|(t, _)| *t)
    }

    fn next(&mut self) -> Option<(ImportToken, &'a str)> {
        let (token, text) = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some((*token, text))
    }

    fn eat(&mut self, token: ImportToken) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume an identifier-ish token. Contextual keywords (`type`, `as`,
    /// `from`) are valid binding names.
    fn ident(&mut self) -> Option<&'a str> {
        match self.peek() {
            Some(
                ImportToken::Identifier
                | ImportToken::Type
                | ImportToken::As
                | ImportToken::From,
            ) => self.next().map(|(_, text)| text),
            _ => None,
        }
    }
}

fn parse_statement(tokens: &[(ImportToken, String)], file_path: &str, table: &mut ImportTable) {
    let mut cursor = Cursor { tokens, pos: 0 };
    if !cursor.eat(ImportToken::Import) {
        return;
    }

    // Side-effect import: `import 'mod'`
    if let Some(token) = cursor.peek() {
        if token.is_string() {
            if let Some((_, text)) = cursor.next() {
                let specifier = unquote(text);
                if !is_relative(specifier) {
                    table.externals.push(specifier.to_string());
                }
            }
            return;
        }
    }

    // `import type { ... }` / `import type Default`
    let type_only = cursor.peek() == Some(ImportToken::Type)
        && matches!(
            cursor.peek_second(),
            Some(ImportToken::Identifier | ImportToken::LBrace | ImportToken::Star)
        );
    if type_only {
        cursor.pos += 1;
    }

    // Collect clause entries first; the module specifier comes last
    let mut pending: Vec<(String, Option<String>, ImportKind, bool)> = Vec::new();

    loop {
        match cursor.peek() {
            Some(ImportToken::Identifier) => {
                let Some(local) = cursor.ident() else { return };
                pending.push((local.to_string(), None, ImportKind::Default, type_only));
                if !cursor.eat(ImportToken::Comma) {
                    break;
                }
            }
            Some(ImportToken::Star) => {
                cursor.pos += 1;
                if !cursor.eat(ImportToken::As) {
                    return;
                }
                let Some(local) = cursor.ident() else { return };
                pending.push((local.to_string(), None, ImportKind::Namespace, type_only));
                break;
            }
            Some(ImportToken::LBrace) => {
                cursor.pos += 1;
                loop {
                    if cursor.eat(ImportToken::RBrace) {
                        break;
                    }
                    // Entry-level `type`: `import { type A, B }`
                    let entry_type_only = cursor.peek() == Some(ImportToken::Type)
                        && cursor.peek_second() == Some(ImportToken::Identifier);
                    if entry_type_only {
                        cursor.pos += 1;
                    }
                    let Some(exported) = cursor.ident() else { return };
                    let local = if cursor.eat(ImportToken::As) {
                        match cursor.ident() {
                            Some(alias) => alias,
                            None => return,
                        }
                    } else {
                        exported
                    };
                    pending.push((
                        local.to_string(),
                        Some(exported.to_string()),
                        ImportKind::Named,
                        type_only || entry_type_only,
                    ));
                    if !cursor.eat(ImportToken::Comma) && cursor.peek() != Some(ImportToken::RBrace)
                    {
                        return;
                    }
                }
                break;
            }
            _ => return,
        }
    }

    if !cursor.eat(ImportToken::From) {
        return;
    }
    let Some((token, text)) = cursor.next() else {
        return;
    };
    if !token.is_string() {
        return;
    }
    let specifier = unquote(text);
    let external = !is_relative(specifier);
    let module_path = resolve_module_path(specifier, file_path);

    for (local, exported_name, kind, type_only) in pending {
        table.insert(
            local,
            ImportBinding {
                module_path: module_path.clone(),
                exported_name,
                kind,
                type_only,
                external,
            },
        );
    }
}

fn unquote(text: &str) -> &str {
    let trimmed = text.trim();
    if trimmed.len() >= 2 {
        let bytes = trimmed.as_bytes();
        if (bytes[0] == b'\'' || bytes[0] == b'"') && bytes[bytes.len() - 1] == bytes[0] {
            return &trimmed[1..trimmed.len() - 1];
        }
    }
    trimmed
}

fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../") || specifier == "." || specifier == ".."
}

const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs", "mts", "cts"];

/// Resolve a module specifier against the importing file's directory.
///
/// Relative specifiers have `.` and `..` folded away and a known source
/// extension stripped, producing a path usable as a file system key.
/// Non-relative specifiers are returned unchanged.
pub fn resolve_module_path(specifier: &str, file_path: &str) -> String {
    if !is_relative(specifier) {
        return specifier.to_string();
    }

    let dir = Path::new(file_path)
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut segments: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();
    let absolute = dir.starts_with('/');

    for segment in specifier.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|s| *s != "..") {
                    segments.pop();
                } else {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let mut resolved = segments.join("/");
    if absolute {
        resolved.insert(0, '/');
    }

    for extension in SOURCE_EXTENSIONS {
        if let Some(stripped) = resolved.strip_suffix(&format!(".{extension}")) {
            resolved = stripped.to_string();
            break;
        }
    }
    resolved
}
