//! Example: Merge two PDFs and render a page, printing the raw tool output
//!
//! Run with: API_BASE_URL=... API_BEARER_TOKEN=... cargo run -p pdfkit --example merge_pdfs
//!
//! Credentials fall back to ~/.api/config.json when the variables are unset.

use pdfkit::{to_args, MergeRequest, Tool, UrlToPdfRequest};
use std::time::Duration;

#[tokio::main]
async fn main() {
    let tool = Tool::builder().timeout(Duration::from_secs(60)).build();

    println!("Config: {}", tool.config_resource());

    let merge = MergeRequest::new(
        r#"["https://www.w3.org/WAI/ER/tests/xhtml/testfiles/resources/pdf/dummy.pdf","https://www.w3.org/WAI/ER/tests/xhtml/testfiles/resources/pdf/dummy.pdf"]"#,
    )
    .file_name("merged.pdf");

    println!("\npost_merge:");
    println!("{}", tool.invoke("post_merge", &to_args(&merge)).await);

    let page = UrlToPdfRequest::new("https://example.com")
        .file_name("example.pdf")
        .inline_pdf("true");

    println!("\npost_chrome_url:");
    println!("{}", tool.invoke("post_chrome_url", &to_args(&page)).await);
}
