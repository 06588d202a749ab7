pub mod api_doc;
pub mod markdown;
pub mod rust_decl;

pub use api_doc::ApiDocParser;
pub use markdown::{anchor_matches, github_slug, CodeBlock, Heading, Link, MarkdownDoc, Section};
pub use rust_decl::{
    function_name, normalize_signature, parameter_count, similar_signatures, similar_types,
    Declaration, DeclPatterns, SourceCleaner,
};
