pub mod account_helpers;
pub mod collection_browser_helpers;
pub mod content_helpers;
pub mod sanitization_helpers;
pub mod session_helpers;
pub mod site_helpers;
pub mod submission_helpers;
