pub mod domain;
pub mod pagination;
pub mod protocol;
