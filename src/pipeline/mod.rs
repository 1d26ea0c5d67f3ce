pub mod processor;
pub mod report;

pub use processor::{
    generate_template, PlaceholderFields, SampleFieldSource, TemplateSummary,
};
pub use report::generate_report;
