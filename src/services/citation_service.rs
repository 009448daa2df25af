//! 引用重新编号 - 业务能力层
//!
//! 把答案中的 `[n]` 改写成 `[{question_id}-{n}]`，让多个问题拼接后的引用编号不冲突。
//!
//! 处理分两步：先把文本切分成"普通文本 / 数字标记"的 token 列表，再对 token 改写。
//! 相邻的两个标记 `[i][j]` 组成一对，从左到右配对（`[a][b][c]` 配成 `(a, b)` 和单独的 `c`）。

use crate::models::question::QuestionId;
use crate::models::report::{CitationKey, RawAnswer, RenumberedAnswer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    /// `[digits]` 中的数字部分
    Marker(&'a str),
}

/// 切分文本，只识别 `[` + ASCII 数字 + `]` 形式的标记
fn tokenize(text: &str) -> Vec<Token<'_>> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'[' {
            i += 1;
            continue;
        }

        let digits_start = i + 1;
        let mut j = digits_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }

        if j > digits_start && j < bytes.len() && bytes[j] == b']' {
            if literal_start < i {
                tokens.push(Token::Text(&text[literal_start..i]));
            }
            tokens.push(Token::Marker(&text[digits_start..j]));
            i = j + 1;
            literal_start = i;
        } else {
            i += 1;
        }
    }

    if literal_start < bytes.len() {
        tokens.push(Token::Text(&text[literal_start..]));
    }

    tokens
}

/// 数字是 1..=count 中某个值的标准十进制写法时返回该值
fn local_index(digits: &str, count: usize) -> Option<usize> {
    let n: usize = digits.parse().ok()?;
    (n >= 1 && n <= count && n.to_string() == digits).then_some(n)
}

/// 重新编号答案中的引用标记
///
/// - `citations` 为空时原样返回
/// - 单个标记只在编号不超过引用数量、且后面没有紧跟 `[` 时改写
/// - 相邻标记对总是整体改写成两个带命名空间的标记
/// - 已经带命名空间的标记不是纯数字，不会再次改写
pub fn renumber(text: &str, citations: &[String], question_id: &QuestionId) -> String {
    if citations.is_empty() {
        return text.to_string();
    }

    let tokens = tokenize(text);
    let mut out = String::with_capacity(text.len() + tokens.len() * 4);
    let mut i = 0;

    while i < tokens.len() {
        match tokens[i] {
            Token::Text(s) => out.push_str(s),
            Token::Marker(first) => {
                if let Some(Token::Marker(second)) = tokens.get(i + 1) {
                    out.push_str(&format!("[{question_id}-{first}][{question_id}-{second}]"));
                    i += 2;
                    continue;
                }

                let followed_by_bracket =
                    matches!(tokens.get(i + 1), Some(Token::Text(s)) if s.starts_with('['));

                match local_index(first, citations.len()) {
                    Some(n) if !followed_by_bracket => {
                        out.push_str(&CitationKey::new(question_id.clone(), n).marker())
                    }
                    _ => {
                        out.push('[');
                        out.push_str(first);
                        out.push(']');
                    }
                }
            }
        }
        i += 1;
    }

    out
}

/// 重新编号文本并给每条引用配上对应的编号
pub fn renumber_answer(raw: &RawAnswer, question_id: &QuestionId) -> RenumberedAnswer {
    let text = renumber(&raw.text, &raw.citations, question_id);
    let citations = raw
        .citations
        .iter()
        .enumerate()
        .map(|(i, c)| (CitationKey::new(question_id.clone(), i + 1), c.clone()))
        .collect();

    RenumberedAnswer { text, citations }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cites(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("https://example.com/{i}")).collect()
    }

    fn q1() -> QuestionId {
        QuestionId::from("Q1")
    }

    #[test]
    fn test_single_markers_are_namespaced() {
        let text = "Revenue grew [1]. Margins fell [2], see also [3].";
        let out = renumber(text, &cites(3), &q1());
        assert_eq!(out, "Revenue grew [Q1-1]. Margins fell [Q1-2], see also [Q1-3].");
    }

    #[test]
    fn test_repeated_markers_all_replaced() {
        let out = renumber("[1] and again [1]", &cites(1), &q1());
        assert_eq!(out, "[Q1-1] and again [Q1-1]");
    }

    #[test]
    fn test_stacked_pair() {
        let out = renumber("fact [2][3] more", &cites(3), &q1());
        assert_eq!(out, "fact [Q1-2][Q1-3] more");
    }

    #[test]
    fn test_stacked_triple_pairs_left_to_right() {
        let out = renumber("a [1][2][3] b", &cites(3), &q1());
        assert_eq!(out, "a [Q1-1][Q1-2][Q1-3] b");

        let out = renumber("a [1][2][3][4] b", &cites(4), &q1());
        assert_eq!(out, "a [Q1-1][Q1-2][Q1-3][Q1-4] b");
    }

    #[test]
    fn test_stacked_pair_ignores_citation_count() {
        let out = renumber("x [4][9]", &cites(1), &q1());
        assert_eq!(out, "x [Q1-4][Q1-9]");
    }

    #[test]
    fn test_out_of_range_single_left_alone() {
        let out = renumber("see [1] and [5]", &cites(2), &q1());
        assert_eq!(out, "see [Q1-1] and [5]");
    }

    #[test]
    fn test_single_followed_by_bracket_left_alone() {
        let out = renumber("link [1][docs] and [2]", &cites(2), &q1());
        assert_eq!(out, "link [1][docs] and [Q1-2]");
    }

    #[test]
    fn test_empty_citations_is_identity() {
        let text = "fact [1][2] and [3] with # header";
        assert_eq!(renumber(text, &[], &q1()), text);
    }

    #[test]
    fn test_already_renumbered_text_is_stable() {
        let once = renumber("a [1][2] b [3]", &cites(3), &q1());
        let twice = renumber(&once, &cites(3), &q1());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_namespaces_do_not_collide() {
        let a = renumber("x [1]", &cites(1), &QuestionId::from("A"));
        let b = renumber("x [1]", &cites(1), &QuestionId::Int(2));
        assert_eq!(a, "x [A-1]");
        assert_eq!(b, "x [2-1]");
        assert_ne!(a, b);
    }

    #[test]
    fn test_multi_digit_and_leading_zero() {
        let out = renumber("[12] [012] [10][11]", &cites(12), &q1());
        assert_eq!(out, "[Q1-12] [012] [Q1-10][Q1-11]");
    }

    #[test]
    fn test_placeholder_lookalike_text_untouched() {
        let text = "literal [REF_1_2] stays";
        assert_eq!(renumber(text, &cites(2), &q1()), text);
    }

    #[test]
    fn test_non_marker_brackets_and_unicode() {
        let out = renumber("价格 [1] 和 [a1] 以及 [ 2] [", &cites(2), &q1());
        assert_eq!(out, "价格 [Q1-1] 和 [a1] 以及 [ 2] [");
    }

    #[test]
    fn test_renumber_answer_pairs_keys() {
        let raw = RawAnswer {
            text: "Revenue is [1].".to_string(),
            citations: vec!["https://example.com/report".to_string()],
        };
        let answer = renumber_answer(&raw, &q1());

        assert_eq!(answer.text, "Revenue is [Q1-1].");
        assert_eq!(answer.citations.len(), 1);
        assert_eq!(answer.citations[0].0.to_string(), "Q1-1");
    }
}
