//! Behavioral tests for the pretty-printer: properties that must hold for any
//! input rather than exact layouts (those live in `tests/cases/`).

use htmlpretty::{Document, NodeKind, PrintError, PrintOptions, print, print_to_string};
use std::io::{self, Write};

fn pretty(html: &str, options: &PrintOptions) -> String {
    print_to_string(&Document::parse(html), options).expect("print should succeed")
}

fn words(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("word{i}")).collect()
}

/// Text between the first `<p>` and the following `</p>`.
fn paragraph(output: &str) -> &str {
    let start = output.find("<p>").expect("no <p> in output") + 3;
    let end = output[start..].find("</p>").expect("no </p> in output") + start;
    &output[start..end]
}

#[test]
fn test_lines_respect_wrap_width() {
    facet_testhelpers::setup();

    let paragraphs: Vec<String> = (0..4)
        .map(|p| format!("<p>{}</p>", words(30 + p * 7).join(" ")))
        .collect();
    let html = format!("<div>{}</div>", paragraphs.join("\n"));

    for width in [20, 30, 41, 80] {
        let output = pretty(&html, &PrintOptions::new().wrap(width));
        for line in output.lines() {
            assert!(
                line.len() <= width,
                "line exceeds {width} bytes: {line:?}\n{output}"
            );
        }
    }
}

#[test]
fn test_unbreakable_token_is_written_whole() {
    facet_testhelpers::setup();

    let long = "x".repeat(60);
    let output = pretty(&format!("<p>short {long} short</p>"), &PrintOptions::new().wrap(20));
    assert!(output.contains(&format!("\n      {long}\n")), "{output}");
}

#[test]
fn test_wrapping_preserves_word_sequence() {
    facet_testhelpers::setup();

    let words = words(40);
    let html = format!("<p>{}</p>", words.join(" \n\t "));
    for width in [0, 15, 41, 120] {
        let output = pretty(&html, &PrintOptions::new().wrap(width));
        let rejoined: Vec<&str> = paragraph(&output).split_whitespace().collect();
        assert_eq!(rejoined, words, "width {width}:\n{output}");
    }
}

#[test]
fn test_literal_content_is_byte_identical() {
    facet_testhelpers::setup();

    let script = "\n\t  if (a<b && c>d) {\n        return  \"&amp;\";\n  }\n   ";
    let style = "  div > p {  color: red }\n";
    let html = format!("<html><head><script>{script}</script><style>{style}</style></head></html>");
    for width in [0, 10, 80] {
        let output = pretty(&html, &PrintOptions::new().wrap(width));
        assert!(output.contains(&format!("<script>{script}</script>")), "{output}");
        assert!(output.contains(&format!("<style>{style}</style>")), "{output}");
    }
}

#[test]
fn test_void_elements_never_close() {
    facet_testhelpers::setup();

    let output = pretty(
        r#"<p>a<br>b<img src="x.png"><input type="text"><wbr></p><hr><table><colgroup><col></colgroup></table>"#,
        &PrintOptions::new(),
    );
    for tag in ["br", "img", "input", "wbr", "hr", "col"] {
        assert!(output.contains(&format!("<{tag}")), "missing <{tag}>:\n{output}");
        assert!(!output.contains(&format!("</{tag}>")), "closed <{tag}>:\n{output}");
    }
}

#[test]
fn test_text_escaping_round_trips() {
    facet_testhelpers::setup();

    let text = r#"a < b & c > d "quoted" it's"#;
    let mut doc = Document::new();
    let html = doc.append_element(doc.root, "html");
    let body = doc.append_element(html, "body");
    let p = doc.append_element(body, "p");
    doc.append_text(p, text);

    let output = print_to_string(&doc, &PrintOptions::new()).unwrap();
    assert!(output.contains(r#"a &lt; b &amp; c &gt; d "quoted" it's"#), "{output}");

    let reparsed = Document::parse(&output);
    let body = reparsed.body().unwrap();
    let p = reparsed
        .children(body)
        .find(|&id| reparsed.tag(id) == Some("p"))
        .unwrap();
    let child = reparsed.first_child(p).unwrap();
    match reparsed.get(child) {
        NodeKind::Text(t) => assert_eq!(&**t, text),
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn test_pre_keeps_whitespace_but_escapes() {
    facet_testhelpers::setup();

    let output = pretty(
        "<pre> Preserve  \n  space    &lt;here&gt;.\n\t</pre>",
        &PrintOptions::new().wrap(10),
    );
    assert!(
        output.contains("<pre> Preserve  \n  space    &lt;here&gt;.\n\t</pre>"),
        "{output}"
    );
}

#[test]
fn test_pre_leading_newline_survives_reparse() {
    facet_testhelpers::setup();

    let options = PrintOptions::new();
    let doc = Document::parse("<pre>\n\nline</pre>");
    let pre = doc
        .children(doc.body().unwrap())
        .find(|&id| doc.tag(id) == Some("pre"))
        .unwrap();
    let text = doc.first_child(pre).unwrap();
    match doc.get(text) {
        NodeKind::Text(t) => assert_eq!(&**t, "\nline"),
        other => panic!("expected text, got {other:?}"),
    }

    let first = print_to_string(&doc, &options).unwrap();
    assert!(first.contains("<pre>\n\nline</pre>"), "{first}");
    let second = pretty(&first, &options);
    assert_eq!(first, second);
}

#[test]
fn test_printing_is_idempotent() {
    facet_testhelpers::setup();

    let html = r#"<!DOCTYPE html>
<html lang="en"><head><meta charset="utf-8"><title>  A   page </title>
<link rel="stylesheet" href="/style.css"></head>
<body class="  main   page ">
<nav><ul><li><a href="/">Home</a><li><a href="/about">About us</a></ul></nav>
<h1>Heading with <em>emphasis</em>, and a trailing comma,</h1>
<p>Some (<a href="https://example.org/a/rather/long/path">linked text</a>) and <code>code()</code>.
More text <span>inside <b>nested</b> inline</span> elements goes here and keeps going.</p>
<p><picture> <source srcset="a.webp" type="image/webp"> <img src="a.png" alt="An image"> </picture></p>
<pre>  indented
    block</pre>
<div><div><div>deep</div></div></div>
<script>let x = 1 < 2;</script>
</body></html>"#;

    for (indent, width) in [("  ", 41), ("  ", 80), ("\t", 60), ("", 0), ("    ", 120)] {
        let options = PrintOptions::new().indent(indent).wrap(width);
        let first = pretty(html, &options);
        let second = pretty(&first, &options);
        assert_eq!(first, second, "indent {indent:?} wrap {width}");
    }
}

#[test]
fn test_inline_element_glued_to_text_does_not_gain_space() {
    facet_testhelpers::setup();

    // Wrapping before "<a" would read as a space in the rendered page
    let output = pretty(
        r#"<p>Text that is long enough to need wrapping(<a href="https://example.org/">link</a>).</p>"#,
        &PrintOptions::new().wrap(30),
    );
    assert!(output.contains("wrapping(<a"), "{output}");
    assert!(output.contains("</a>)."), "{output}");
}

#[test]
fn test_no_wrap_keeps_long_text_on_one_line() {
    facet_testhelpers::setup();

    let long = words(50).join(" ");
    let output = pretty(&format!("<p>{long}</p>"), &PrintOptions::new().no_wrap());
    assert!(output.contains(&format!("<p>{long}</p>")), "{output}");
}

#[test]
fn test_comment_under_document_is_an_error() {
    facet_testhelpers::setup();

    let doc = Document::parse("<!-- top --><html><body></body></html>");
    let err = print_to_string(&doc, &PrintOptions::new()).unwrap_err();
    assert!(
        matches!(err, PrintError::UnexpectedDocumentChild { ref kind } if kind == "comment"),
        "{err:?}"
    );
    assert_eq!(err.to_string(), "unhandled comment node under the document");
}

#[test]
fn test_comments_inside_elements_are_dropped() {
    facet_testhelpers::setup();

    let output = pretty(
        "<html><body><p>before<!-- hidden -->after</p></body></html>",
        &PrintOptions::new(),
    );
    assert!(!output.contains("hidden"));
    assert!(!output.contains("<!--"));
}

struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_write_failure_is_reported() {
    facet_testhelpers::setup();

    let doc = Document::parse("<p>hello</p>");
    let err = print(BrokenPipe, &doc, &PrintOptions::new()).unwrap_err();
    match err {
        PrintError::Io { ref message } => assert_eq!(message, "pipe closed"),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

#[test]
fn test_print_matches_string_conveniences() {
    facet_testhelpers::setup();

    let doc = Document::parse("<p>Hello <b>world</b></p>");
    let options = PrintOptions::new().wrap(40);

    let mut buf = Vec::new();
    print(&mut buf, &doc, &options).unwrap();
    let printed = String::from_utf8(buf).unwrap();

    assert_eq!(printed, print_to_string(&doc, &options).unwrap());
    assert_eq!(printed, doc.to_pretty_html(&options).unwrap());
}
