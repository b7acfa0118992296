pub mod corpus;
pub mod manager;
pub mod natural;
