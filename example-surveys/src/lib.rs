//! Ready-made surveys for demos and tests.
//!
//! Ids are small fixed numbers so tests can refer to questions directly.

pub mod job_application;
pub mod sandwich;
pub mod user_profile;

use canvass_types::Survey;

pub use job_application::job_application;
pub use sandwich::sandwich_order;
pub use user_profile::user_profile;

/// Every example, with a short name for each.
pub fn all() -> Vec<(&'static str, Survey)> {
    vec![
        ("user-profile", user_profile()),
        ("job-application", job_application()),
        ("sandwich", sandwich_order()),
    ]
}

/// Look up an example by the name used in [`all`].
pub fn by_name(name: &str) -> Option<Survey> {
    all()
        .into_iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, survey)| survey)
}
