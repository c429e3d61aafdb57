pub mod appraisal;
pub mod extraction;
pub mod sensitivity;
