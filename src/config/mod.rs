//! Configuration module

mod site;

pub use site::HighlightConfig;
pub use site::LabelsConfig;
pub use site::NotionConfig;
pub use site::PropertyNames;
pub use site::SiteConfig;
pub use site::{DATABASE_ID_ENV, TOKEN_ENV};
