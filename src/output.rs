//! Output formatters (human and JSON)

pub mod printer;

pub use printer::{
    ConfigHumanFormatter, ConfigJsonFormatter, MembershipHumanFormatter, MembershipJsonFormatter,
};
