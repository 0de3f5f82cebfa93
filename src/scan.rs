//! Lexical scanning for top-level SQL keywords.
//!
//! This is not a parser: it only tracks parenthesis depth and skips quoted
//! literals, quoted identifiers, and comments so that keywords inside them or
//! inside subqueries are ignored.

/// Check whether `keyword` appears as a standalone keyword at position `i`
/// in the uppercased byte slice `bytes`.
///
/// "Standalone" means the character before and after the keyword (if present)
/// is not an identifier character (`[A-Z0-9_]`).
fn is_keyword_at(bytes: &[u8], i: usize, keyword: &[u8]) -> bool {
   let len = bytes.len();
   let klen = keyword.len();
   if i + klen > len || &bytes[i..i + klen] != keyword {
      return false;
   }

   let before_ok = i == 0 || (!bytes[i - 1].is_ascii_alphanumeric() && bytes[i - 1] != b'_');
   let after_ok =
      i + klen >= len || (!bytes[i + klen].is_ascii_alphanumeric() && bytes[i + klen] != b'_');

   before_ok && after_ok
}

/// Advance past a quoted literal or identifier opened at `i`, honoring
/// doubled-quote escapes (`''`, `""`). Returns the closing quote position.
fn skip_quoted(bytes: &[u8], i: usize, quote: u8) -> usize {
   let len = bytes.len();
   let mut j = i + 1;
   while j < len {
      if bytes[j] == quote {
         // Doubled quote escapes itself
         if j + 1 < len && bytes[j + 1] == quote {
            j += 2;
            continue;
         }
         return j;
      }
      j += 1;
   }
   j // unterminated: runs to the end
}

/// Advance past a `--` line comment (until newline or end).
fn skip_line_comment(bytes: &[u8], i: usize) -> usize {
   let mut j = i + 2; // past `--`
   while j < bytes.len() && bytes[j] != b'\n' {
      j += 1;
   }
   j
}

/// Advance past a `/* … */` block comment. Returns the closing `/` position.
fn skip_block_comment(bytes: &[u8], i: usize) -> usize {
   let len = bytes.len();
   let mut j = i + 2; // past `/*`
   while j + 1 < len {
      if bytes[j] == b'*' && bytes[j + 1] == b'/' {
         return j + 1;
      }
      j += 1;
   }
   len.saturating_sub(1) // unterminated: runs to the end
}

/// Match a multi-word keyword at `i`, allowing any whitespace run between
/// words.
fn phrase_at(bytes: &[u8], i: usize, words: &[&str]) -> bool {
   let mut pos = i;
   for (n, word) in words.iter().enumerate() {
      if n > 0 {
         // At least one whitespace byte between words
         let start = pos;
         while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
         }
         if pos == start {
            return false;
         }
      }
      if !is_keyword_at(bytes, pos, word.as_bytes()) {
         return false;
      }
      pos += word.len();
   }
   true
}

/// Whether `keyword` (uppercase, words separated by single spaces) occurs at
/// paren depth 0, outside quotes and comments.
pub(crate) fn has_top_level_keyword(sql: &str, keyword: &str) -> bool {
   let upper = sql.to_uppercase();
   let bytes = upper.as_bytes();
   let words: Vec<&str> = keyword.split(' ').collect();
   let mut depth: i32 = 0;
   let mut i = 0;

   while i < bytes.len() {
      match bytes[i] {
         b'(' => depth += 1,
         b')' => depth -= 1,
         // String literal or quoted identifier
         quote @ (b'\'' | b'"') => i = skip_quoted(bytes, i, quote),
         b'-' if bytes.get(i + 1) == Some(&b'-') => i = skip_line_comment(bytes, i),
         b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_block_comment(bytes, i),
         _ if depth == 0 && phrase_at(bytes, i, &words) => return true,
         _ => {}
      }
      i += 1;
   }

   false
}
