use quire_engine::{Node, from_markdown};

// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with *some* content and a [link](https://example.com).\n\n- Bullet point\n  - Nested item\n- Another item\n\n> Quoted **text** here\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_document(size: usize) -> Node {
    from_markdown(&generate_markdown_content(size))
}

/// A document nested `depth` blockquotes deep around a single paragraph.
#[allow(dead_code)]
pub fn generate_nested_document(depth: usize) -> Node {
    let mut markdown = ">".repeat(depth);
    markdown.push_str(" deeply nested paragraph text\n");
    from_markdown(&markdown)
}
