//! 报告格式化 - 业务能力层
//!
//! 负责答案文本清理、Markdown 转 HTML、引用列表以及完整 HTML 文档的拼装

use chrono::{DateTime, Local};
use pulldown_cmark::escape::{escape_href, escape_html};
use pulldown_cmark::{html, Options, Parser};
use regex::Regex;
use std::sync::LazyLock;

use crate::models::report::{CitationRecord, Report, ReportEntry};

/// 答案中的标题统一降到这一级，不会压过报告自己的问题标题
pub const ANSWER_HEADING: &str = "#####";

/// LLM 用来表示金额的字符，会触发显示层的公式渲染
pub const STRIPPED_CHAR: char = '$';

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#+ (.+)$").expect("header pattern is valid"));

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s<>"]+|www\.[^\s<>"]+"#).expect("url pattern is valid")
});

const STYLE_SHEET: &str = r#"
        body { font-family: Arial, sans-serif; margin: 40px; }
        .question { font-size: 1.2em; font-weight: bold; margin-top: 20px; }
        .answer { margin-bottom: 20px; }
        hr { margin: 20px 0; }
        .answer p { margin: 10px 0; }
        .answer ul, .answer ol { margin: 10px 0; padding-left: 20px; }
        strong { color: #1a1a1a; }
"#;

/// 删除所有金额符号，其他字符不变
pub fn sanitize_currency(text: &str) -> String {
    text.replace(STRIPPED_CHAR, "")
}

/// 把任意级别的 Markdown 标题统一改写为最小级别
pub fn normalize_headers(text: &str) -> String {
    HEADER_RE
        .replace_all(text, format!("{ANSWER_HEADING} $1").as_str())
        .into_owned()
}

/// 重新编号之前对原始答案做的清理
pub fn clean_answer(text: &str) -> String {
    normalize_headers(&sanitize_currency(text))
}

/// 单个答案转为 HTML 片段，每次转换互不影响
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // 写入 String 不会失败
    let _ = escape_html(&mut out, text);
    out
}

fn escape_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    let _ = escape_href(&mut out, url);
    out
}

/// 单个问题在 HTML 报告中的区块
pub fn question_block(entry: &ReportEntry) -> String {
    format!(
        "<div class=\"question\">{}</div>\n<div class=\"answer\">{}</div>\n<hr>\n",
        escape(&entry.heading()),
        entry.html
    )
}

/// 引用列表中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceLine {
    /// `[Q1-2]`
    pub label: String,
    pub citation: String,
    /// 引用文本中找到的第一个链接
    pub url: Option<String>,
}

impl ReferenceLine {
    /// 屏幕显示形式，不加链接
    pub fn to_markdown(&self) -> String {
        format!("{} {}", self.label, self.citation)
    }

    pub fn to_html(&self) -> String {
        match &self.url {
            Some(url) => format!(
                "<p>{} <a href=\"{}\" target=\"_blank\">{}</a></p>",
                escape(&self.label),
                escape_url(url),
                escape(&self.citation)
            ),
            None => format!("<p>{} {}</p>", escape(&self.label), escape(&self.citation)),
        }
    }
}

/// 从引用文本中查找链接
pub fn detect_url(citation: &str) -> Option<&str> {
    URL_RE.find(citation).map(|m| m.as_str())
}

/// 按问题顺序展开所有引用
pub fn reference_lines(records: &[CitationRecord]) -> Vec<ReferenceLine> {
    records
        .iter()
        .flat_map(|record| record.keyed())
        .map(|(key, citation)| ReferenceLine {
            label: key.marker(),
            citation: citation.to_string(),
            url: detect_url(citation).map(str::to_string),
        })
        .collect()
}

/// HTML 形式的引用部分，没有引用时为空字符串
pub fn references_html(records: &[CitationRecord]) -> String {
    let lines = reference_lines(records);
    if lines.is_empty() {
        return String::new();
    }

    let mut out = String::from("<h2>References</h2>\n");
    for line in &lines {
        out.push_str(&line.to_html());
        out.push('\n');
    }
    out
}

/// 完整 HTML 报告的标题
pub fn report_title(company: &str) -> String {
    format!("{} - Sales Prospect Research Report", company)
}

/// 下载文件名
pub fn report_file_name(company: &str) -> String {
    format!("{}_sales_prospect_report.html", company)
}

/// 拼装自包含的 HTML 文档（内联样式，无外部资源）
pub fn render_document(
    company: &str,
    generated_at: &DateTime<Local>,
    body: &str,
    references: &str,
) -> String {
    let title = escape(&report_title(company));
    format!(
        r#"<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <style>{STYLE_SHEET}    </style>
</head>
<body>
    <h1>{title}</h1>
    <p>Generated on: {}</p>
{body}
{references}
</body>
</html>
"#,
        generated_at.format("%Y-%m-%d %H:%M:%S")
    )
}

/// 完整 HTML 报告
pub fn render_report_html(report: &Report) -> String {
    render_document(
        &report.company,
        &report.generated_at,
        &report.html_body,
        &references_html(&report.citations),
    )
}

/// 单个问题的屏幕显示形式
pub fn entry_markdown(entry: &ReportEntry) -> String {
    format!("## {}\n\n{}\n\n---\n\n", entry.heading(), entry.markdown)
}

/// 屏幕显示的引用部分，没有引用时为空字符串
pub fn references_markdown(records: &[CitationRecord]) -> String {
    let lines = reference_lines(records);
    if lines.is_empty() {
        return String::new();
    }

    let mut out = String::from("## References\n\n");
    for line in &lines {
        out.push_str(&line.to_markdown());
        out.push_str("\n\n");
    }
    out
}

/// 屏幕显示用的 Markdown 报告
pub fn render_report_markdown(report: &Report) -> String {
    let mut out: String = report.entries.iter().map(entry_markdown).collect();
    out.push_str(&references_markdown(&report.citations));
    out
}
