use std::fmt::Write;

/* Words that cannot be used as constructor parameter names */
const TS_RESERVED_WORDS: &[&str] = &[
  "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
  "else", "enum", "export", "extends", "false", "finally", "for", "function", "if", "import",
  "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw", "true",
  "try", "typeof", "var", "void", "while", "with", "as", "implements", "interface", "let",
  "package", "private", "protected", "public", "static", "yield", "any", "boolean",
  "constructor", "declare", "get", "module", "require", "number", "set", "string", "symbol",
  "type", "from", "of", "namespace", "async", "await", "undefined",
];

pub fn is_ts_reserved_word(name: &str) -> bool {
  TS_RESERVED_WORDS.contains(&name)
}

/* Escape a name that collides with a reserved word by appending '_' */
pub fn escape_ts_keyword(name: &str) -> String {
  if is_ts_reserved_word(name) {
    format!("{}_", name)
  } else {
    name.to_string()
  }
}

/* ASCII subset of the ECMAScript IdentifierName grammar */
pub fn is_ts_identifier(name: &str) -> bool {
  let mut chars = name.chars();
  match chars.next() {
    Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
    _ => return false,
  }
  chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/* Quote a string as a TypeScript double-quoted literal */
pub fn ts_string_literal(value: &str) -> String {
  let mut out = String::with_capacity(value.len() + 2);
  out.push('"');
  for c in value.chars() {
    match c {
      '"' => out.push_str("\\\""),
      '\\' => out.push_str("\\\\"),
      '\n' => out.push_str("\\n"),
      _ => out.push(c),
    }
  }
  out.push('"');
  out
}

/* Write a JSDoc block at the given indentation. Nothing is written for empty input. */
pub fn write_doc_block(output: &mut String, lines: &[String], indent: &str) {
  if lines.is_empty() {
    return;
  }
  writeln!(output, "{}/**", indent).unwrap();
  for line in lines {
    let line = line.replace("*/", "*\\/");
    if line.is_empty() {
      writeln!(output, "{} *", indent).unwrap();
    } else {
      writeln!(output, "{} * {}", indent, line).unwrap();
    }
  }
  writeln!(output, "{} */", indent).unwrap();
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn escapes_reserved_words() {
    assert_eq!(escape_ts_keyword("class"), "class_");
    assert_eq!(escape_ts_keyword("constructor"), "constructor_");
    assert_eq!(escape_ts_keyword("width"), "width");
  }

  #[test]
  fn identifier_check() {
    assert!(is_ts_identifier("kind"));
    assert!(is_ts_identifier("$case"));
    assert!(is_ts_identifier("_x1"));
    assert!(!is_ts_identifier(""));
    assert!(!is_ts_identifier("9lives"));
    assert!(!is_ts_identifier("a-b"));
  }

  #[test]
  fn string_literals_are_escaped() {
    assert_eq!(ts_string_literal("label"), "\"label\"");
    assert_eq!(ts_string_literal("a\"b"), "\"a\\\"b\"");
  }

  #[test]
  fn doc_block_layout() {
    let mut out = String::new();
    write_doc_block(&mut out, &["first".to_string(), String::new(), "a */ b".to_string()], "  ");
    assert_eq!(out, "  /**\n   * first\n   *\n   * a *\\/ b\n   */\n");

    let mut empty = String::new();
    write_doc_block(&mut empty, &[], "");
    assert!(empty.is_empty());
  }
}
