//! Shared Toolbar Example
//!
//! Two editors share one format toolbar. The toolbar follows whichever editor
//! the user last selected in, and its buttons act on that editor only.
//!
//! Run with: cargo run -p shared-toolbar --example two_editors

use std::sync::Arc;

use shared_toolbar::{
    Document, DocumentHandle, Format, FormatToolbar, Range, SharedToolbar, Source, TextDocument, Toolbar,
};
use tracing_subscriber::filter::LevelFilter;

fn print_toolbar(shared: &SharedToolbar<FormatToolbar>) {
    shared.with_toolbar(|toolbar| {
        let bound = toolbar.bound_document().map(|d| d.name()).unwrap_or("-");
        let controls: Vec<String> = toolbar
            .controls()
            .iter()
            .map(|control| {
                let mark = if control.is_active() { "x" } else { " " };
                format!("[{mark}] {}", control.format())
            })
            .collect();
        println!("toolbar -> {bound:<8} {}", controls.join("  "));
    });
}

fn main() -> shared_toolbar::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    let title = Arc::new(TextDocument::with_text("title", "Quarterly report"));
    let body = Arc::new(TextDocument::with_text("body", "Revenue grew in every region."));
    let documents = vec![
        DocumentHandle::new(title.clone()),
        DocumentHandle::new(body.clone()),
    ];

    let shared = SharedToolbar::new(documents, FormatToolbar::default())?;
    print_toolbar(&shared);

    println!("\nuser selects \"Quarterly\" in the title and presses bold");
    title.set_selection(Some(Range::new(0, 9)), Source::User);
    shared.toggle_format(Format::Bold);
    print_toolbar(&shared);

    println!("\nuser selects \"Revenue\" in the body");
    body.set_selection(Some(Range::new(0, 7)), Source::User);
    print_toolbar(&shared);

    println!("\nuser presses italic");
    shared.toggle_format(Format::Italic);
    print_toolbar(&shared);

    println!("\nscript moves the title selection; the toolbar stays on the body");
    title.set_selection(Some(Range::new(10, 6)), Source::Api);
    print_toolbar(&shared);

    println!(
        "\ntitle bold: {}  body italic: {}",
        title.format(Range::new(0, 9)).has(Format::Bold),
        body.format(Range::new(0, 7)).has(Format::Italic),
    );
    Ok(())
}
